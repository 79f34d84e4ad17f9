//! Turn and session domain types.
//!
//! A [`Turn`] is one inbound message from one conversation: the raw sentence,
//! its whitespace tokens (display case preserved), and the session identity
//! that doubles as the reminder recipient.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a conversation (session). Also identifies the
/// recipient of any reminder scheduled from that conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single conversational turn handed to the dialogue core.
///
/// Tokenization happens upstream (in `nudge-language`); the core only ever
/// reads the token sequence and the raw sentence. Tokens keep their display
/// case — matching is done case-insensitively by whoever consumes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// The conversation this turn belongs to
    pub session_id: SessionId,

    /// The raw input text, unmodified
    pub sentence: String,

    /// Whitespace-delimited tokens of `sentence`, in order
    pub tokens: Vec<String>,

    /// When this turn was received
    pub received_at: DateTime<Utc>,
}

impl Turn {
    pub fn new(session_id: SessionId, sentence: impl Into<String>, tokens: Vec<String>) -> Self {
        Self {
            session_id,
            sentence: sentence.into(),
            tokens,
            received_at: Utc::now(),
        }
    }
}
