//! Blocking JSON-RPC binding of [`LedgerQuery`] for Sui fullnodes.
//!
//! Uses `suix_queryEvents` for discovery and `sui_getObject` for hydration.
//! Transport failures (connection errors, HTTP 429 and 5xx) are retried with
//! a linear backoff; JSON-RPC error objects are returned immediately.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::{EventPage, EventQuery, LedgerObject, LedgerQuery, ObjectOptions};
use crate::config::NetworkConfig;
use crate::decode::parse_u64;
use crate::error::LedgerError;

const QUERY_EVENTS: &str = "suix_queryEvents";
const GET_OBJECT: &str = "sui_getObject";
const RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// JSON-RPC ledger client.
pub struct RpcLedger {
    agent: ureq::Agent,
    url: String,
    retries: u32,
    next_id: AtomicU64,
}

impl RpcLedger {
    #[must_use]
    pub fn new(url: impl Into<String>, timeout: Duration, retries: u32) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent("gigstream-cli")
            .build();
        Self {
            agent,
            url: url.into(),
            retries,
            next_id: AtomicU64::new(1),
        }
    }

    /// Build a client from the `[network]` config section.
    ///
    /// # Errors
    ///
    /// Returns an error if the fullnode URL cannot be resolved.
    pub fn from_config(network: &NetworkConfig) -> anyhow::Result<Self> {
        let url = network.resolved_rpc_url()?;
        Ok(Self::new(
            url,
            Duration::from_secs(network.timeout_secs),
            network.retries,
        ))
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    fn call(&self, method: &str, params: &Value) -> Result<Value, LedgerError> {
        let mut attempt = 0;
        loop {
            match self.call_once(method, params) {
                Err(err) if err.is_transient() && attempt < self.retries => {
                    attempt += 1;
                    warn!(method, attempt, error = %err, "retrying ledger request");
                    std::thread::sleep(RETRY_BACKOFF * attempt);
                }
                other => return other,
            }
        }
    }

    fn call_once(&self, method: &str, params: &Value) -> Result<Value, LedgerError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(method, id, url = %self.url, "ledger request");

        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let response = match self
            .agent
            .post(&self.url)
            .set("Content-Type", "application/json")
            .send_json(body)
        {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let text = response.into_string().unwrap_or_default();
                return Err(status_error(method, status, &text));
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(LedgerError::Transport {
                    method: method.to_string(),
                    details: transport.to_string(),
                });
            }
        };

        let envelope: RpcEnvelope =
            response
                .into_json()
                .map_err(|err| LedgerError::Malformed {
                    method: method.to_string(),
                    details: err.to_string(),
                })?;

        envelope.into_result(method)
    }
}

impl LedgerQuery for RpcLedger {
    fn query_events(&self, query: &EventQuery) -> Result<EventPage, LedgerError> {
        let params = json!([
            { "MoveEventType": query.event_type },
            Value::Null,
            query.limit,
            query.descending,
        ]);
        let result = self.call(QUERY_EVENTS, &params)?;
        parse_event_page(&result)
    }

    fn get_object(
        &self,
        object_id: &str,
        options: ObjectOptions,
    ) -> Result<LedgerObject, LedgerError> {
        let params = json!([
            object_id,
            {
                "showContent": options.show_content,
                "showType": options.show_type,
            },
        ]);
        let result = self.call(GET_OBJECT, &params)?;
        parse_object_response(object_id, &result)
    }
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

impl RpcEnvelope {
    fn into_result(self, method: &str) -> Result<Value, LedgerError> {
        if let Some(error) = self.error {
            return Err(LedgerError::Rpc {
                method: method.to_string(),
                code: error.code,
                message: error.message,
            });
        }
        self.result.ok_or_else(|| LedgerError::Malformed {
            method: method.to_string(),
            details: "response has neither result nor error".to_string(),
        })
    }
}

fn status_error(method: &str, status: u16, body: &str) -> LedgerError {
    if status == 429 || status >= 500 {
        LedgerError::Transport {
            method: method.to_string(),
            details: format!("HTTP {status}"),
        }
    } else {
        LedgerError::Rpc {
            method: method.to_string(),
            code: i64::from(status),
            message: body.trim().to_string(),
        }
    }
}

/// Decode the `result` of `suix_queryEvents`.
///
/// # Errors
///
/// Returns [`LedgerError::Malformed`] if the page does not match the
/// documented shape.
pub fn parse_event_page(result: &Value) -> Result<EventPage, LedgerError> {
    EventPage::deserialize(result).map_err(|err| LedgerError::Malformed {
        method: QUERY_EVENTS.to_string(),
        details: err.to_string(),
    })
}

/// Decode the `result` of `sui_getObject` into a [`LedgerObject`].
///
/// The node reports missing or deleted objects inside `result.error` rather
/// than as a JSON-RPC error, so both shapes are handled here.
///
/// # Errors
///
/// Returns [`LedgerError::ObjectNotFound`] for object-level errors and
/// [`LedgerError::MissingContent`] when the object carries no move fields.
pub fn parse_object_response(object_id: &str, result: &Value) -> Result<LedgerObject, LedgerError> {
    if let Some(error) = result.get("error").filter(|e| !e.is_null()) {
        let reason = error
            .get("code")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        return Err(LedgerError::ObjectNotFound {
            object_id: object_id.to_string(),
            reason,
        });
    }

    let Some(data) = result.get("data").filter(|d| d.is_object()) else {
        return Err(LedgerError::ObjectNotFound {
            object_id: object_id.to_string(),
            reason: "no data".to_string(),
        });
    };

    let content = data.get("content");
    let Some(fields) = content
        .and_then(|c| c.get("fields"))
        .and_then(Value::as_object)
    else {
        return Err(LedgerError::MissingContent {
            object_id: object_id.to_string(),
        });
    };

    let object_type = data
        .get("type")
        .or_else(|| content.and_then(|c| c.get("type")))
        .and_then(Value::as_str)
        .map(ToString::to_string);

    Ok(LedgerObject {
        object_id: data
            .get("objectId")
            .and_then(Value::as_str)
            .unwrap_or(object_id)
            .to_string(),
        version: parse_u64(data.get("version")),
        object_type,
        fields: fields.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_page_parses_node_shape() {
        let result = json!({
            "data": [{
                "id": {"txDigest": "9xQ", "eventSeq": "0"},
                "packageId": "0xabc",
                "transactionModule": "gigstream",
                "sender": "0xc1",
                "type": "0xabc::gigstream::JobListingCreated",
                "parsedJson": {"job_id": "0xj1", "client": "0xc1"},
                "bcs": "ignored",
                "timestampMs": "1700000000123"
            }],
            "nextCursor": {"txDigest": "9xQ", "eventSeq": "0"},
            "hasNextPage": false
        });

        let page = parse_event_page(&result).expect("valid page");
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].sender, "0xc1");
        assert_eq!(page.data[0].payload_str("job_id"), Some("0xj1"));
        assert_eq!(page.data[0].timestamp_ms, Some(1_700_000_000_123));
        assert!(!page.has_next_page);
    }

    #[test]
    fn event_page_without_data_is_malformed() {
        let err = parse_event_page(&json!({"hasNextPage": false})).expect_err("must fail");
        assert!(matches!(err, LedgerError::Malformed { .. }));
    }

    #[test]
    fn object_response_extracts_fields_and_type() {
        let result = json!({
            "data": {
                "objectId": "0xj1",
                "version": "17",
                "digest": "abc",
                "type": "0xabc::gigstream::JobListing",
                "content": {
                    "dataType": "moveObject",
                    "type": "0xabc::gigstream::JobListing",
                    "hasPublicTransfer": false,
                    "fields": {"title": "Audit", "budget": "5000"}
                }
            }
        });

        let object = parse_object_response("0xj1", &result).expect("valid object");
        assert_eq!(object.object_id, "0xj1");
        assert_eq!(object.version, Some(17));
        assert_eq!(object.object_type.as_deref(), Some("0xabc::gigstream::JobListing"));
        assert_eq!(object.field("title"), Some(&json!("Audit")));
    }

    #[test]
    fn object_level_error_is_not_found() {
        let result = json!({"error": {"code": "deleted", "object_id": "0xj9"}});
        let err = parse_object_response("0xj9", &result).expect_err("must fail");
        assert_eq!(
            err,
            LedgerError::ObjectNotFound {
                object_id: "0xj9".into(),
                reason: "deleted".into(),
            }
        );
    }

    #[test]
    fn package_content_has_no_fields() {
        let result = json!({
            "data": {
                "objectId": "0xabc",
                "content": {"dataType": "package", "disassembled": {}}
            }
        });
        let err = parse_object_response("0xabc", &result).expect_err("must fail");
        assert!(matches!(err, LedgerError::MissingContent { .. }));
    }

    #[test]
    fn envelope_error_wins_over_result() {
        let envelope: RpcEnvelope = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32602, "message": "Invalid params"}
        }))
        .expect("valid envelope");
        let err = envelope.into_result(GET_OBJECT).expect_err("must fail");
        assert!(matches!(err, LedgerError::Rpc { code: -32602, .. }));
    }

    #[test]
    fn throttling_and_server_errors_are_transient() {
        assert!(status_error(QUERY_EVENTS, 429, "").is_transient());
        assert!(status_error(QUERY_EVENTS, 503, "").is_transient());
        assert!(!status_error(QUERY_EVENTS, 400, "bad request").is_transient());
    }

    #[test]
    fn unreachable_node_reports_transport_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let ledger = RpcLedger::new("http://127.0.0.1:9", Duration::from_millis(200), 0);
        let err = ledger
            .get_object("0x1", ObjectOptions::content_and_type())
            .expect_err("must fail");
        assert!(err.is_transient());
    }
}
