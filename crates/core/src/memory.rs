//! ConversationMemory trait — per-session slot storage.
//!
//! The slot parser and the completion state machine share partial findings
//! through this store: the parser may write one slot and fail, and the state
//! machine then skips the question for the slot that is already present.
//!
//! Invariant: a slot is either absent or holds exactly one resolved value.
//! Memory for a session is created implicitly on first write and cleared
//! slot-by-slot on reset.

use async_trait::async_trait;

use crate::error::MemoryError;
use crate::slot::{SlotKind, SlotValue};
use crate::turn::SessionId;

/// The core ConversationMemory trait.
///
/// Implementations: in-memory (default). Persistence is deliberately out of
/// scope — a reminder conversation lives for a handful of turns.
#[async_trait]
pub trait ConversationMemory: Send + Sync {
    /// The backend name (e.g., "in_memory").
    fn name(&self) -> &str;

    /// Store a slot value for a session, replacing any previous value.
    async fn set(
        &self,
        session: &SessionId,
        kind: SlotKind,
        value: SlotValue,
    ) -> std::result::Result<(), MemoryError>;

    /// Read a slot value for a session.
    async fn get(
        &self,
        session: &SessionId,
        kind: SlotKind,
    ) -> std::result::Result<Option<SlotValue>, MemoryError>;

    /// Check whether a slot is filled for a session.
    async fn has(
        &self,
        session: &SessionId,
        kind: SlotKind,
    ) -> std::result::Result<bool, MemoryError>;

    /// Remove a slot value for a session. Removing an absent slot is a no-op.
    async fn delete(
        &self,
        session: &SessionId,
        kind: SlotKind,
    ) -> std::result::Result<(), MemoryError>;
}
