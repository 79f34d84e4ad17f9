//! The completion state machine.
//!
//! Three states in a fixed order — Content, Time, Confirmation — advanced
//! one conversational turn at a time. The state list is plain data processed
//! by one generic driver; the driver owns per-session positions and nothing
//! else. Slot values live in the shared conversation memory, so anything the
//! single-shot parser already extracted skips its question here.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use nudge_core::error::{Error, Result};
use nudge_core::memory::ConversationMemory;
use nudge_core::slot::{SlotKind, SlotValue};
use nudge_core::time::{TimeExtractor, format_reminder_time};
use nudge_core::turn::{SessionId, Turn};
use nudge_language::strip_fillers;
use tokio::sync::RwLock;
use tracing::debug;

/// The dialogue states, in conversation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueState {
    /// Asks what to be reminded of
    Content,
    /// Asks when to be reminded
    Time,
    /// Reads both slots back and ends the dialogue
    Confirmation,
}

/// A state plus its skip policy. Skippable states suppress their entry
/// prompt and advance immediately when their slot is already satisfied.
#[derive(Debug, Clone, Copy)]
pub struct StateDescriptor {
    pub state: DialogueState,
    pub skippable: bool,
}

/// The fixed state table the driver walks.
pub const STATES: [StateDescriptor; 3] = [
    StateDescriptor {
        state: DialogueState::Content,
        skippable: true,
    },
    StateDescriptor {
        state: DialogueState::Time,
        skippable: true,
    },
    StateDescriptor {
        state: DialogueState::Confirmation,
        skippable: false,
    },
];

/// What one driver step produced.
#[derive(Debug, Clone)]
pub enum StepOutcome {
    /// A question for the user; the dialogue is waiting on the next turn.
    Prompt(String),
    /// Both slots are filled; the dialogue is over and memory is cleared.
    /// The surrounding layer schedules the reminder from this payload.
    Finished {
        content: String,
        fire_at: DateTime<Utc>,
        confirmation: String,
    },
}

/// The generic driver over [`STATES`].
pub struct DialogueMachine {
    memory: Arc<dyn ConversationMemory>,
    times: Arc<dyn TimeExtractor>,
    positions: RwLock<HashMap<SessionId, usize>>,
}

impl DialogueMachine {
    pub fn new(memory: Arc<dyn ConversationMemory>, times: Arc<dyn TimeExtractor>) -> Self {
        Self {
            memory,
            times,
            positions: RwLock::new(HashMap::new()),
        }
    }

    /// Whether a dialogue is mid-flight for this session (a prompt has been
    /// issued and not yet satisfied).
    pub async fn in_progress(&self, session: &SessionId) -> bool {
        self.positions.read().await.contains_key(session)
    }

    /// Advance the dialogue by one turn.
    ///
    /// On fresh entry the triggering sentence was the parser's input, not an
    /// answer to any prompt, so no handler runs; the driver walks the state
    /// table from the top. Mid-dialogue, the turn is routed to the current
    /// state's input handler first. Either way the driver then advances past
    /// every satisfied skippable state and stops at the first state that
    /// still needs the user — or at the terminal confirmation.
    pub async fn step(&self, turn: &Turn) -> Result<StepOutcome> {
        let session = &turn.session_id;

        let current = { self.positions.read().await.get(session).copied() };
        let mut idx = match current {
            Some(idx) => {
                self.handle_input(STATES[idx].state, turn).await?;
                idx
            }
            None => 0,
        };

        loop {
            let descriptor = &STATES[idx];
            if self.is_complete(descriptor.state, session).await? {
                if descriptor.skippable {
                    idx += 1;
                    continue;
                }
                // Terminal state: its entry prompt is the slot read-back.
                let (content, fire_at) = self.read_slots(session).await?;
                let confirmation = format!(
                    "Ok. I'll remind you to {} {}.",
                    content,
                    format_reminder_time(&fire_at)
                );
                self.reset(session).await?;
                return Ok(StepOutcome::Finished {
                    content,
                    fire_at,
                    confirmation,
                });
            }

            // An unsatisfied state prompts (or re-prompts) and waits.
            self.positions.write().await.insert(session.clone(), idx);
            return Ok(StepOutcome::Prompt(entry_prompt(descriptor.state).into()));
        }
    }

    /// Clear both slots and forget the dialogue position. Runs after every
    /// completed dialogue and on any external reset trigger.
    pub async fn reset(&self, session: &SessionId) -> Result<()> {
        self.memory.delete(session, SlotKind::Content).await?;
        self.memory.delete(session, SlotKind::Time).await?;
        self.positions.write().await.remove(session);
        Ok(())
    }

    async fn handle_input(&self, state: DialogueState, turn: &Turn) -> Result<()> {
        let session = &turn.session_id;
        match state {
            DialogueState::Content => {
                let content = strip_fillers(&turn.tokens);
                if !content.is_empty() {
                    self.memory
                        .set(session, SlotKind::Content, SlotValue::Text(content))
                        .await?;
                }
            }
            DialogueState::Time => {
                let ts = self.times.extract(&turn.sentence);
                match ts.first() {
                    Some(&t) => {
                        self.memory
                            .set(session, SlotKind::Time, SlotValue::Timestamp(t))
                            .await?;
                    }
                    None => debug!(sentence = %turn.sentence, "found no times"),
                }
            }
            DialogueState::Confirmation => {}
        }
        Ok(())
    }

    async fn is_complete(&self, state: DialogueState, session: &SessionId) -> Result<bool> {
        Ok(match state {
            DialogueState::Content => self.memory.has(session, SlotKind::Content).await?,
            DialogueState::Time => self.memory.has(session, SlotKind::Time).await?,
            DialogueState::Confirmation => true,
        })
    }

    async fn read_slots(&self, session: &SessionId) -> Result<(String, DateTime<Utc>)> {
        let content = self
            .memory
            .get(session, SlotKind::Content)
            .await?
            .and_then(|v| v.as_text().map(str::to_string))
            .ok_or_else(|| Error::Internal("content slot missing at confirmation".into()))?;
        let fire_at = self
            .memory
            .get(session, SlotKind::Time)
            .await?
            .and_then(|v| v.as_timestamp())
            .ok_or_else(|| Error::Internal("time slot missing at confirmation".into()))?;
        Ok((content, fire_at))
    }
}

fn entry_prompt(state: DialogueState) -> &'static str {
    match state {
        DialogueState::Content => "What would you like me to remind you to do?",
        DialogueState::Time => "Ok. When should I remind you?",
        // The terminal state's prompt is built from the slots by the driver.
        DialogueState::Confirmation => "",
    }
}
