//! In-memory ledger snapshot.
//!
//! Serves captured ledger state without a node: the CLI's `--fixture` flag
//! loads one from JSON, and tests build them with the `with_*` methods.
//! Failures can be injected per object and per event type.
//!
//! # Fixture format
//!
//! ```json
//! {
//!   "events": [ { "id": {...}, "type": "...", "parsedJson": {...}, "timestampMs": "..." } ],
//!   "objects": [ { "objectId": "0x..", "type": "...", "fields": {...} } ],
//!   "failing_objects": ["0x.."],
//!   "failing_event_types": ["0x..::gigstream::JobListingCreated"]
//! }
//! ```
//!
//! `events` are listed oldest first; descending queries walk them in reverse.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::{EventId, EventPage, EventQuery, LedgerEvent, LedgerObject, LedgerQuery, ObjectOptions};
use crate::error::LedgerError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryLedger {
    #[serde(default)]
    events: Vec<LedgerEvent>,
    #[serde(default, with = "object_list")]
    objects: BTreeMap<String, LedgerObject>,
    #[serde(default)]
    failing_objects: BTreeSet<String>,
    #[serde(default)]
    failing_event_types: BTreeSet<String>,
}

impl MemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot from a JSON fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse fixture {}", path.display()))
    }

    /// Append an event; later events are newer.
    #[must_use]
    pub fn with_event(mut self, event: LedgerEvent) -> Self {
        self.events.push(event);
        self
    }

    /// Append an event built from its type and JSON payload.
    #[must_use]
    pub fn with_event_json(
        self,
        event_type: impl Into<String>,
        parsed_json: serde_json::Value,
        timestamp_ms: u64,
    ) -> Self {
        let seq = self.events.len();
        self.with_event(LedgerEvent {
            id: EventId {
                tx_digest: format!("tx-{seq}"),
                event_seq: "0".to_string(),
            },
            event_type: event_type.into(),
            sender: String::new(),
            parsed_json,
            timestamp_ms: Some(timestamp_ms),
        })
    }

    #[must_use]
    pub fn with_object(mut self, object: LedgerObject) -> Self {
        self.objects.insert(object.object_id.clone(), object);
        self
    }

    /// Insert an object from a bare JSON field map.
    ///
    /// Non-object `fields` values are stored as an empty field set.
    #[must_use]
    pub fn with_object_fields(
        self,
        object_id: impl Into<String>,
        fields: serde_json::Value,
    ) -> Self {
        let fields = match fields {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        self.with_object(LedgerObject {
            object_id: object_id.into(),
            version: Some(1),
            object_type: None,
            fields,
        })
    }

    /// Make every read of `object_id` fail with a transport error.
    #[must_use]
    pub fn failing_object(mut self, object_id: impl Into<String>) -> Self {
        self.failing_objects.insert(object_id.into());
        self
    }

    /// Make every query for `event_type` fail with a transport error.
    #[must_use]
    pub fn failing_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.failing_event_types.insert(event_type.into());
        self
    }
}

impl LedgerQuery for MemoryLedger {
    fn query_events(&self, query: &EventQuery) -> Result<EventPage, LedgerError> {
        if self.failing_event_types.contains(&query.event_type) {
            return Err(LedgerError::Transport {
                method: "suix_queryEvents".to_string(),
                details: format!("injected failure for {}", query.event_type),
            });
        }

        let matching = self
            .events
            .iter()
            .filter(|event| event.event_type == query.event_type);

        let data: Vec<LedgerEvent> = if query.descending {
            matching.rev().take(query.limit).cloned().collect()
        } else {
            matching.take(query.limit).cloned().collect()
        };

        Ok(EventPage {
            next_cursor: data.last().map(|event| event.id.clone()),
            data,
            has_next_page: false,
        })
    }

    fn get_object(
        &self,
        object_id: &str,
        _options: ObjectOptions,
    ) -> Result<LedgerObject, LedgerError> {
        if self.failing_objects.contains(object_id) {
            return Err(LedgerError::Transport {
                method: "sui_getObject".to_string(),
                details: format!("injected failure for {object_id}"),
            });
        }

        self.objects
            .get(object_id)
            .cloned()
            .ok_or_else(|| LedgerError::ObjectNotFound {
                object_id: object_id.to_string(),
                reason: "notExists".to_string(),
            })
    }
}

/// Objects are written as a list in fixtures but looked up by id.
mod object_list {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::ledger::LedgerObject;

    pub fn serialize<S: Serializer>(
        objects: &BTreeMap<String, LedgerObject>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let list: Vec<&LedgerObject> = objects.values().collect();
        list.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, LedgerObject>, D::Error> {
        let list = Vec::<LedgerObject>::deserialize(deserializer)?;
        Ok(list
            .into_iter()
            .map(|object| (object.object_id.clone(), object))
            .collect())
    }
}
