//! The single-shot slot parser.
//!
//! Splits a sentence into an action-content fragment and a time fragment
//! using preposition positions, following one asymmetric policy:
//!
//! - a first preposition of "to" marks everything up to the LAST preposition
//!   as content, and the leftover tokens are assumed to be the time;
//! - any other first preposition marks everything after it as a time, and
//!   there is no way to recover content from the leftover tokens.
//!
//! A sentence with a single preposition is a *final* pass: the remainder is
//! re-scanned as a whole for the missing time. Whenever multiple time
//! candidates come back, the first (highest-confidence) one wins.
//!
//! `parse` returns `None` on any failure path; partial slots already written
//! to memory persist so the completion state machine can skip re-asking.

use std::sync::Arc;

use nudge_core::error::Result;
use nudge_core::lexicon::Lexicon;
use nudge_core::memory::ConversationMemory;
use nudge_core::scheduler::{ScheduledReminder, Scheduler};
use nudge_core::slot::{SlotKind, SlotValue};
use nudge_core::time::{TimeExtractor, format_reminder_time};
use nudge_core::turn::Turn;
use nudge_language::match_key;
use tracing::{debug, warn};

/// Single-shot heuristic parser over a tokenized sentence.
pub struct SlotParser {
    lexicon: Arc<dyn Lexicon>,
    times: Arc<dyn TimeExtractor>,
    memory: Arc<dyn ConversationMemory>,
    scheduler: Arc<dyn Scheduler>,
    message_prefix: String,
}

impl SlotParser {
    pub fn new(
        lexicon: Arc<dyn Lexicon>,
        times: Arc<dyn TimeExtractor>,
        memory: Arc<dyn ConversationMemory>,
        scheduler: Arc<dyn Scheduler>,
        message_prefix: impl Into<String>,
    ) -> Self {
        Self {
            lexicon,
            times,
            memory,
            scheduler,
            message_prefix: message_prefix.into(),
        }
    }

    pub(crate) fn set_message_prefix(&mut self, prefix: impl Into<String>) {
        self.message_prefix = prefix.into();
    }

    /// Try to fill both slots from one sentence. On success the reminder is
    /// scheduled and the confirmation text returned; `None` means the caller
    /// should fall back to the completion state machine.
    pub async fn parse(&self, turn: &Turn) -> Result<Option<String>> {
        debug!(sentence = %turn.sentence, "parsing");

        // Count and locate prepositions in the sentence.
        let prep_locs: Vec<usize> = turn
            .tokens
            .iter()
            .enumerate()
            .filter(|(_, w)| self.lexicon.is_preposition(w))
            .map(|(i, _)| i)
            .collect();

        // No prepositions means no structural anchor to split on.
        if prep_locs.is_empty() {
            debug!("found no prepositions, returning");
            return Ok(None);
        }
        let first = prep_locs[0];
        let last = prep_locs[prep_locs.len() - 1];

        // Check the first preposition. If it is "to", the words that follow
        // (until the final preposition) are the reminder content; anything
        // else means the words that follow must be a time.
        let mut final_pass = false;
        let mut content: Option<String> = None;
        let mut time_fragment: Option<String> = None;

        if match_key(&turn.tokens[first]) == "to" {
            debug!("first preposition is \"to\"");
            let end = if prep_locs.len() == 1 {
                final_pass = true;
                turn.tokens.len()
            } else {
                last
            };
            let s = turn.tokens[first + 1..end].join(" ");
            self.memory
                .set(&turn.session_id, SlotKind::Content, SlotValue::Text(s.clone()))
                .await?;
            content = Some(s);
        } else {
            debug!("first preposition is not \"to\"");
            if prep_locs.len() == 1 {
                final_pass = true;
            }
            time_fragment = Some(turn.tokens[first + 1..].join(" "));
        }

        // Resolve the time fragment, if one was identified.
        if let Some(fragment) = &time_fragment {
            if !fragment.is_empty() {
                debug!(fragment = %fragment, "resolving time fragment");
                let ts = self.times.extract(fragment);
                match ts.first() {
                    Some(&t) => {
                        self.memory
                            .set(&turn.session_id, SlotKind::Time, SlotValue::Timestamp(t))
                            .await?;
                    }
                    None if final_pass => return Ok(None),
                    None => {}
                }
            }
        }

        // A final pass extracted time OR content, not both: re-scan the
        // whole remainder after the first preposition for the missing time.
        if final_pass {
            let remainder = turn.tokens[first + 1..].join(" ");
            let ts = self.times.extract(&remainder);
            let Some(&t) = ts.first() else {
                return Ok(None);
            };
            self.memory
                .set(&turn.session_id, SlotKind::Time, SlotValue::Timestamp(t))
                .await?;
            debug!("extracted all data from the sentence");
        }

        // With content in hand, whatever follows the last preposition is
        // assumed to be the time. With only a time in hand there is no
        // symmetric recovery: content cannot be inferred from leftovers.
        let Some(content) = content else {
            return Ok(None);
        };
        let remainder = turn.tokens[last + 1..].join(" ");
        debug!(remainder = %remainder, "resolving the remaining time fragment");
        let ts = self.times.extract(&remainder);
        let Some(&fire_at) = ts.first() else {
            return Ok(None);
        };
        self.memory
            .set(&turn.session_id, SlotKind::Time, SlotValue::Timestamp(fire_at))
            .await?;

        let reminder = ScheduledReminder::new(
            turn.session_id.clone(),
            format!("{}{}", self.message_prefix, content),
            fire_at,
        );
        if let Err(e) = self.scheduler.schedule(reminder).await {
            warn!(error = %e, "failed to schedule reminder");
        }
        Ok(Some(format!(
            "Ok. I'll remind you to {} {}.",
            content,
            format_reminder_time(&fire_at)
        )))
    }
}
