//! Error types for the Nudge domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each collaborator has its own error type.
//!
//! Note that neither parse failures nor unresolvable times are errors here:
//! the dialogue core signals those softly (an empty parse result, a state
//! that re-prompts) so the conversation can recover. `Error` is reserved for
//! infrastructure faults in the collaborators themselves.

use thiserror::Error;

/// The top-level error type for all Nudge operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Memory errors ---
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    // --- Scheduler errors ---
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Collaborator errors ---

#[derive(Debug, Clone, Error)]
pub enum MemoryError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Slot value has the wrong type for {slot}: {reason}")]
    TypeMismatch { slot: String, reason: String },
}

#[derive(Debug, Clone, Error)]
pub enum SchedulerError {
    #[error("Reminder queue is closed: {0}")]
    QueueClosed(String),

    #[error("Delivery failed for {recipient}: {reason}")]
    DeliveryFailed { recipient: String, reason: String },

    #[error("Fire time is in the past: {0}")]
    FireTimeInPast(String),
}
