//! Conversation memory backends for Nudge.
//!
//! A reminder conversation lives for a handful of turns, so the default
//! backend is in-memory only. Anything longer-lived belongs to the
//! scheduler, not here.

mod in_memory;

pub use in_memory::InMemorySlots;
