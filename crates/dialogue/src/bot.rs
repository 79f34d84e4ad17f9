//! The bot facade — routing, per-session locking, and the scheduler
//! hand-off.

use std::collections::HashMap;
use std::sync::Arc;

use nudge_core::error::Result;
use nudge_core::lexicon::Lexicon;
use nudge_core::memory::ConversationMemory;
use nudge_core::scheduler::{ScheduledReminder, Scheduler};
use nudge_core::time::TimeExtractor;
use nudge_core::turn::{SessionId, Turn};
use tokio::sync::Mutex;
use tracing::warn;

use crate::parser::SlotParser;
use crate::states::{DialogueMachine, StepOutcome};

const DEFAULT_MESSAGE_PREFIX: &str = "Hey! Remember to ";

/// Owns the slot parser and the completion state machine and routes each
/// inbound turn to the right one.
///
/// A turn belonging to a dialogue in progress goes straight to the state
/// machine. Anything else gets one single-shot parse attempt; a parse
/// failure enters the state machine, which asks for whatever is missing.
///
/// Turns for the same session are serialized on a per-session mutex held
/// across the whole step, so a step's memory reads and writes never
/// interleave with another turn's. Distinct sessions proceed concurrently.
pub struct ReminderBot {
    parser: SlotParser,
    machine: DialogueMachine,
    scheduler: Arc<dyn Scheduler>,
    message_prefix: String,
    locks: Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl ReminderBot {
    pub fn new(
        lexicon: Arc<dyn Lexicon>,
        times: Arc<dyn TimeExtractor>,
        memory: Arc<dyn ConversationMemory>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            parser: SlotParser::new(
                lexicon,
                times.clone(),
                memory.clone(),
                scheduler.clone(),
                DEFAULT_MESSAGE_PREFIX,
            ),
            machine: DialogueMachine::new(memory, times),
            scheduler,
            message_prefix: DEFAULT_MESSAGE_PREFIX.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Override the prefix prepended to reminder bodies at delivery time
    /// (from configuration).
    pub fn with_message_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.message_prefix = prefix.into();
        self.parser.set_message_prefix(self.message_prefix.clone());
        self
    }

    /// Process one inbound turn and produce the reply to show the user:
    /// a confirmation, or the next question of the completion dialogue.
    pub async fn handle(&self, turn: &Turn) -> Result<String> {
        let lock = self.session_lock(&turn.session_id).await;
        let _guard = lock.lock().await;

        if !self.machine.in_progress(&turn.session_id).await {
            if let Some(confirmation) = self.parser.parse(turn).await? {
                // Successful hand-off: the next request starts clean.
                self.machine.reset(&turn.session_id).await?;
                return Ok(confirmation);
            }
        }

        match self.machine.step(turn).await? {
            StepOutcome::Prompt(prompt) => Ok(prompt),
            StepOutcome::Finished {
                content,
                fire_at,
                confirmation,
            } => {
                let reminder = ScheduledReminder::new(
                    turn.session_id.clone(),
                    format!("{}{}", self.message_prefix, content),
                    fire_at,
                );
                if let Err(e) = self.scheduler.schedule(reminder).await {
                    // The user still gets the confirmation; see DESIGN.md.
                    warn!(error = %e, "failed to schedule reminder");
                }
                Ok(confirmation)
            }
        }
    }

    /// Abort any dialogue in progress for a session and clear its slots.
    pub async fn reset(&self, session: &SessionId) -> Result<()> {
        self.machine.reset(session).await
    }

    async fn session_lock(&self, session: &SessionId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(session.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nudge_core::error::SchedulerError;
    use nudge_core::slot::SlotKind;
    use nudge_language::{EnglishLexicon, tokenize};
    use nudge_memory::InMemorySlots;
    use nudge_scheduler::ReminderQueue;
    use nudge_timeparse::NaturalTimeExtractor;

    fn bot_with(memory: Arc<InMemorySlots>, queue: Arc<ReminderQueue>) -> ReminderBot {
        ReminderBot::new(
            Arc::new(EnglishLexicon::new()),
            Arc::new(NaturalTimeExtractor::new()),
            memory,
            queue,
        )
    }

    fn turn(session: &str, sentence: &str) -> Turn {
        Turn::new(SessionId::from(session), sentence, tokenize(sentence))
    }

    #[tokio::test]
    async fn one_shot_request_confirms_and_schedules() {
        let queue = Arc::new(ReminderQueue::new());
        let bot = bot_with(Arc::new(InMemorySlots::new()), queue.clone());

        let reply = bot
            .handle(&turn("u1", "Remind me to buy groceries at 2pm"))
            .await
            .unwrap();
        assert!(reply.contains("2:00PM"), "got {reply:?}");
        assert_eq!(queue.pending().await.len(), 1);
    }

    #[tokio::test]
    async fn one_shot_with_relative_time() {
        let bot = bot_with(Arc::new(InMemorySlots::new()), Arc::new(ReminderQueue::new()));

        let reply = bot
            .handle(&turn("u1", "Remind me to buy groceries next week"))
            .await
            .unwrap();
        assert!(reply.contains("buy groceries"), "got {reply:?}");
    }

    #[tokio::test]
    async fn missing_time_falls_back_to_the_time_question() {
        let bot = bot_with(Arc::new(InMemorySlots::new()), Arc::new(ReminderQueue::new()));

        let reply = bot.handle(&turn("u1", "Remind me to buy groceries")).await.unwrap();
        assert_eq!(reply, "Ok. When should I remind you?");
    }

    #[tokio::test]
    async fn missing_content_falls_back_to_the_content_question() {
        let bot = bot_with(Arc::new(InMemorySlots::new()), Arc::new(ReminderQueue::new()));

        let reply = bot.handle(&turn("u1", "Remind me next week")).await.unwrap();
        assert_eq!(reply, "What would you like me to remind you to do?");
    }

    #[tokio::test]
    async fn multi_turn_dialogue_completes_and_schedules() {
        let memory = Arc::new(InMemorySlots::new());
        let queue = Arc::new(ReminderQueue::new());
        let bot = bot_with(memory.clone(), queue.clone());
        let session = SessionId::from("u1");

        let first = bot.handle(&turn("u1", "Remind me")).await.unwrap();
        assert_eq!(first, "What would you like me to remind you to do?");

        let second = bot.handle(&turn("u1", "to buy groceries")).await.unwrap();
        assert_eq!(second, "Ok. When should I remind you?");

        let third = bot.handle(&turn("u1", "11PM")).await.unwrap();
        assert!(third.contains("11:00PM"), "got {third:?}");
        assert!(third.contains("buy groceries"), "got {third:?}");

        // The surrounding layer scheduled on completion.
        let pending = queue.pending().await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].body, "Hey! Remember to buy groceries");

        // Both slots are gone before the next request.
        assert!(!memory.has(&session, SlotKind::Content).await.unwrap());
        assert!(!memory.has(&session, SlotKind::Time).await.unwrap());
    }

    #[tokio::test]
    async fn mid_dialogue_turns_bypass_the_parser() {
        let bot = bot_with(Arc::new(InMemorySlots::new()), Arc::new(ReminderQueue::new()));

        bot.handle(&turn("u1", "Remind me")).await.unwrap();
        // This answer contains a preposition and a time; if it went through
        // the single-shot parser it could half-succeed. It must be treated
        // as the content answer instead.
        let reply = bot.handle(&turn("u1", "to water the plants")).await.unwrap();
        assert_eq!(reply, "Ok. When should I remind you?");
    }

    #[tokio::test]
    async fn sessions_are_independent_dialogues() {
        let bot = bot_with(Arc::new(InMemorySlots::new()), Arc::new(ReminderQueue::new()));

        let a = bot.handle(&turn("a", "Remind me to buy groceries")).await.unwrap();
        assert_eq!(a, "Ok. When should I remind you?");

        let b = bot.handle(&turn("b", "Remind me")).await.unwrap();
        assert_eq!(b, "What would you like me to remind you to do?");
    }

    #[tokio::test]
    async fn new_request_after_one_shot_success_starts_clean() {
        let memory = Arc::new(InMemorySlots::new());
        let bot = bot_with(memory.clone(), Arc::new(ReminderQueue::new()));
        let session = SessionId::from("u1");

        bot.handle(&turn("u1", "Remind me to buy groceries at 2pm")).await.unwrap();
        assert!(!memory.has(&session, SlotKind::Content).await.unwrap());
        assert!(!memory.has(&session, SlotKind::Time).await.unwrap());

        // The next incomplete request asks from the top.
        let reply = bot.handle(&turn("u1", "Remind me")).await.unwrap();
        assert_eq!(reply, "What would you like me to remind you to do?");
    }

    struct RejectingScheduler;

    #[async_trait]
    impl Scheduler for RejectingScheduler {
        fn name(&self) -> &str {
            "rejecting"
        }

        async fn schedule(
            &self,
            _reminder: ScheduledReminder,
        ) -> std::result::Result<(), SchedulerError> {
            Err(SchedulerError::QueueClosed("test".into()))
        }
    }

    #[tokio::test]
    async fn scheduling_failure_still_confirms() {
        // The confirmation is produced even when the scheduler rejects
        // the reminder; the failure is logged, not surfaced.
        let bot = ReminderBot::new(
            Arc::new(EnglishLexicon::new()),
            Arc::new(NaturalTimeExtractor::new()),
            Arc::new(InMemorySlots::new()),
            Arc::new(RejectingScheduler),
        );

        let reply = bot
            .handle(&turn("u1", "Remind me to buy groceries at 2pm"))
            .await
            .unwrap();
        assert!(reply.contains("Ok. I'll remind you to buy groceries"), "got {reply:?}");
    }
}
