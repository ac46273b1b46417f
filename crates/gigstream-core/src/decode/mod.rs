//! Tolerant decoding of raw ledger fields.
//!
//! Object fields arrive as loosely-typed JSON: integers may be numbers or
//! decimal strings, optional addresses may be wrapped in `{ "vec": [...] }`,
//! and list-valued fields have been written as arrays, pre-joined strings,
//! and keyed structs over the contract's lifetime. Every helper here maps
//! whatever it gets to a value or a documented default and never fails.

pub mod entities;

use serde_json::{Map, Value};

pub use entities::{
    DecodeContext, decode_client_profile, decode_freelancer_profile, decode_job,
    decode_platform_stats,
};

/// Separator used when joining list-valued fields for display.
pub const LIST_SEPARATOR: &str = ", ";

/// The encodings a list-valued field has been observed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListShape<'a> {
    /// A JSON array of scalars.
    List(&'a [Value]),
    /// A string already joined by the writer.
    Text(&'a str),
    /// A keyed struct whose values are the items, in key order.
    Keyed(&'a Map<String, Value>),
    /// Absent, null, or a bare scalar.
    Unrecognized,
}

impl<'a> ListShape<'a> {
    /// Classify a raw field value.
    ///
    /// Objects wrapping their payload in `fields` (struct encoding) or `vec`
    /// (vector encoding) are unwrapped first.
    #[must_use]
    pub fn classify(value: Option<&'a Value>) -> Self {
        match value {
            Some(Value::Array(items)) => Self::List(items),
            Some(Value::String(text)) => Self::Text(text),
            Some(Value::Object(map)) => match (map.get("fields"), map.get("vec")) {
                (Some(Value::Object(inner)), _) => Self::Keyed(inner),
                (_, Some(Value::Array(items))) => Self::List(items),
                _ => Self::Keyed(map),
            },
            _ => Self::Unrecognized,
        }
    }

    /// Render as a single `", "`-joined string.
    #[must_use]
    pub fn to_joined(self) -> String {
        match self {
            Self::List(items) => join_values(items.iter()),
            Self::Text(text) => text.to_string(),
            Self::Keyed(map) => join_values(map.values()),
            Self::Unrecognized => String::new(),
        }
    }
}

/// Normalize a list-valued field to its display string.
#[must_use]
pub fn joined_list(value: Option<&Value>) -> String {
    ListShape::classify(value).to_joined()
}

fn join_values<'v>(values: impl Iterator<Item = &'v Value>) -> String {
    values
        .filter_map(item_text)
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

/// Text of one list item. Nulls are dropped; nested containers flatten.
fn item_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Array(_) | Value::Object(_) => {
            let nested = joined_list(Some(value));
            (!nested.is_empty()).then_some(nested)
        }
    }
}

/// Parse an unsigned integer from a number or a decimal string.
///
/// Fractional numbers truncate toward zero. Negative numbers, non-numeric
/// strings, and every other shape yield `None`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_u64(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(number) => number.as_u64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.trunc() as u64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Integer field with a fallback.
#[must_use]
pub fn u64_or(value: Option<&Value>, default: u64) -> u64 {
    parse_u64(value).unwrap_or(default)
}

/// String field; numbers and booleans are rendered, anything else is empty.
#[must_use]
pub fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    }
}

/// Optional address: `{ "vec": [addr] }`, `{ "vec": [] }`, a bare string,
/// or null.
#[must_use]
pub fn optional_address(value: Option<&Value>) -> Option<String> {
    let candidate = match value? {
        Value::Object(map) => map.get("vec")?.as_array()?.first()?,
        other => other,
    };
    candidate
        .as_str()
        .filter(|address| !address.is_empty())
        .map(ToString::to_string)
}

/// List of string items. Non-list shapes yield an empty list.
#[must_use]
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    let items = match value {
        Some(Value::Array(items)) => items,
        Some(Value::Object(map)) => match map.get("vec") {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };
    items.iter().filter_map(item_text).collect()
}

/// Status label. Accepts a bare string or a move enum `{ "variant": .. }`.
///
/// Only a missing or null field takes `default`. Any other value is kept
/// as rendered, so an empty or malformed status never reads as `default`.
#[must_use]
pub fn status_label(value: Option<&Value>, default: &str) -> String {
    match value {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::Object(map)) => text(map.get("variant")),
        other => text(other),
    }
}
