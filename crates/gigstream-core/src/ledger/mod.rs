//! Ledger query interface.
//!
//! The projection layer only ever needs two reads from the ledger: a
//! filtered, ordered event query and a single-object fetch. [`LedgerQuery`]
//! captures exactly those two operations so the JSON-RPC client
//! ([`rpc::RpcLedger`]) and the in-memory snapshot ([`memory::MemoryLedger`])
//! are interchangeable.
//!
//! # Consistency
//!
//! Reads are eventually consistent. An object created by a transaction that
//! was just submitted may not be visible yet; callers re-query instead of
//! expecting read-your-writes.

pub mod memory;
pub mod rpc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::decode::parse_u64;
use crate::error::LedgerError;

pub use memory::MemoryLedger;
pub use rpc::RpcLedger;

/// Read access to a ledger's event log and object store.
///
/// Both operations are side-effect free. Implementations must be shareable
/// across threads because hydration fans object reads out concurrently.
pub trait LedgerQuery: Send + Sync {
    /// Query events of one fully-qualified move event type.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError`] when the query cannot be answered.
    fn query_events(&self, query: &EventQuery) -> Result<EventPage, LedgerError>;

    /// Fetch the current field set of one object.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError`] when the object is missing, has no move
    /// content, or the read fails.
    fn get_object(&self, object_id: &str, options: ObjectOptions)
    -> Result<LedgerObject, LedgerError>;
}

impl<T: LedgerQuery + ?Sized> LedgerQuery for Box<T> {
    fn query_events(&self, query: &EventQuery) -> Result<EventPage, LedgerError> {
        (**self).query_events(query)
    }

    fn get_object(
        &self,
        object_id: &str,
        options: ObjectOptions,
    ) -> Result<LedgerObject, LedgerError> {
        (**self).get_object(object_id, options)
    }
}

impl<T: LedgerQuery + ?Sized> LedgerQuery for &T {
    fn query_events(&self, query: &EventQuery) -> Result<EventPage, LedgerError> {
        (**self).query_events(query)
    }

    fn get_object(
        &self,
        object_id: &str,
        options: ObjectOptions,
    ) -> Result<LedgerObject, LedgerError> {
        (**self).get_object(object_id, options)
    }
}

/// Parameters of an event query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    /// Fully-qualified type, e.g. `0xabc::gigstream::JobListingCreated`.
    pub event_type: String,
    pub limit: usize,
    /// Most recent first when `true`.
    pub descending: bool,
}

impl EventQuery {
    /// Most-recent-first query capped at `limit` events.
    #[must_use]
    pub fn latest(event_type: impl Into<String>, limit: usize) -> Self {
        Self {
            event_type: event_type.into(),
            limit,
            descending: true,
        }
    }
}

/// Which parts of an object a read should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObjectOptions {
    pub show_content: bool,
    pub show_type: bool,
}

impl ObjectOptions {
    /// Content plus type metadata, what every decoder in this crate needs.
    #[must_use]
    pub const fn content_and_type() -> Self {
        Self {
            show_content: true,
            show_type: true,
        }
    }
}

/// Unique position of an event in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventId {
    pub tx_digest: String,
    pub event_seq: String,
}

/// One event record, with its payload left as loosely-typed JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEvent {
    pub id: EventId,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub parsed_json: Value,
    /// Milliseconds; nodes send it as a decimal string.
    #[serde(
        default,
        deserialize_with = "deserialize_loose_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp_ms: Option<u64>,
}

impl LedgerEvent {
    /// String-valued payload field, if present.
    #[must_use]
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.parsed_json.get(key).and_then(Value::as_str)
    }
}

/// A page of events in the order requested.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPage {
    pub data: Vec<LedgerEvent>,
    #[serde(default)]
    pub next_cursor: Option<EventId>,
    #[serde(default)]
    pub has_next_page: bool,
}

/// Current state of a move object: identity, type, and raw fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerObject {
    pub object_id: String,
    #[serde(
        default,
        deserialize_with = "deserialize_loose_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<u64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl LedgerObject {
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Accepts `123`, `"123"`, or `null`.
fn deserialize_loose_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(parse_u64(raw.as_ref()))
}
