//! Field names, values, and the ordered field mapping
//!
//! A record's payload is an insertion-ordered mapping from field name to
//! [`FieldValue`]. The archive places no constraints on field shapes;
//! interpretation belongs to caller-supplied validation policies.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered mapping of field name to value
pub type FieldMap = IndexMap<String, FieldValue>;

/// A single field value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Free-form text
    Text(String),
    /// Signed integer
    Integer(i64),
    /// Boolean flag
    Flag(bool),
}

impl FieldValue {
    /// Borrow the text content, if this is a text field
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// True for empty text; integers and flags are never empty
    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.is_empty())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Integer(n) => write!(f, "{n}"),
            FieldValue::Flag(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Integer(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Flag(b)
    }
}

/// Build a [`FieldMap`] from name/value pairs, preserving order
pub fn field_map<V: Into<FieldValue>>(
    pairs: impl IntoIterator<Item = (&'static str, V)>,
) -> FieldMap {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.into()))
        .collect()
}
