//! The slot model — the two pieces of information a reminder needs.
//!
//! A conversation fills at most one value per [`SlotKind`]. The kinds are a
//! closed enum and the values a tagged union, so a typo'd key or a text
//! value stored where a timestamp belongs cannot compile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of a slot. Exactly two exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    /// What to be reminded of (free text)
    Content,
    /// When to fire the reminder (resolved absolute timestamp)
    Time,
}

impl std::fmt::Display for SlotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotKind::Content => write!(f, "content"),
            SlotKind::Time => write!(f, "time"),
        }
    }
}

/// A resolved slot value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SlotValue {
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl SlotValue {
    /// The text payload, if this is a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SlotValue::Text(s) => Some(s),
            SlotValue::Timestamp(_) => None,
        }
    }

    /// The timestamp payload, if this is a `Timestamp` value.
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            SlotValue::Timestamp(t) => Some(*t),
            SlotValue::Text(_) => None,
        }
    }
}
