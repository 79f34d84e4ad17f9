//! # Nudge Core
//!
//! Domain types, traits, and error definitions for the Nudge reminder bot.
//! This crate has **zero framework dependencies** — it defines the domain
//! model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every collaborator the dialogue core talks to (session memory, time
//! extraction, the preposition lexicon, the scheduler) is defined as a trait
//! here. Implementations live in their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod lexicon;
pub mod memory;
pub mod scheduler;
pub mod slot;
pub mod time;
pub mod turn;

// Re-export key types at crate root for ergonomics
pub use error::{Error, MemoryError, Result, SchedulerError};
pub use lexicon::Lexicon;
pub use memory::ConversationMemory;
pub use scheduler::{ScheduledReminder, Scheduler};
pub use slot::{SlotKind, SlotValue};
pub use time::{TimeExtractor, format_reminder_time};
pub use turn::{SessionId, Turn};
