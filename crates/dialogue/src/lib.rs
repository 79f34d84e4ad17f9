//! The Nudge dialogue core.
//!
//! Two pieces of information make a reminder: what to do (`Content`) and
//! when (`Time`). An incoming sentence goes to the [`SlotParser`] first,
//! which tries to pull both slots out of the one sentence using preposition
//! positions. When it can't, the [`DialogueMachine`] takes over and asks for
//! whatever is missing, one turn at a time, sharing the same conversation
//! memory so nothing already extracted is asked for again. The
//! [`ReminderBot`] facade owns the routing, the per-session locking, and the
//! hand-off to the scheduler.

mod bot;
mod parser;
mod states;

pub use bot::ReminderBot;
pub use parser::SlotParser;
pub use states::{DialogueMachine, DialogueState, StateDescriptor, StepOutcome, STATES};
