//! Reminder scheduling for Nudge — an in-process queue with a background
//! delivery loop.
//!
//! The dialogue core hands a [`ScheduledReminder`] to the queue and never
//! sees it again. `start` spawns a tokio loop that checks the queue every
//! tick and emits due reminders over an mpsc channel; the surrounding layer
//! (the CLI, a chat channel) owns actual delivery to the user.

use chrono::{DateTime, Utc};
use nudge_core::error::SchedulerError;
use nudge_core::scheduler::{ScheduledReminder, Scheduler};
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, info};

/// The default scheduler: a shared, time-ordered pending list.
pub struct ReminderQueue {
    pending: Arc<RwLock<Vec<ScheduledReminder>>>,
}

impl ReminderQueue {
    pub fn new() -> Self {
        Self {
            pending: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// All reminders waiting to fire, soonest first.
    pub async fn pending(&self) -> Vec<ScheduledReminder> {
        self.pending.read().await.clone()
    }

    /// Remove and return every reminder due at or before `now`, soonest
    /// first. This is the single drain operation the delivery loop runs.
    pub async fn take_due(&self, now: DateTime<Utc>) -> Vec<ScheduledReminder> {
        let mut pending = self.pending.write().await;
        drain_due(&mut pending, now)
    }

    /// Start the delivery loop.
    ///
    /// Returns a receiver that yields reminders as they come due (the caller
    /// delivers them) and the loop's join handle. The loop stops when the
    /// receiver is dropped.
    pub fn start(
        &self,
        tick: std::time::Duration,
    ) -> (
        mpsc::Receiver<ScheduledReminder>,
        tokio::task::JoinHandle<()>,
    ) {
        let pending = self.pending.clone();
        let (tx, rx) = mpsc::channel::<ScheduledReminder>(64);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);

            loop {
                interval.tick().await;
                let now = Utc::now();

                let due = {
                    let mut list = pending.write().await;
                    drain_due(&mut list, now)
                };

                for reminder in due {
                    info!(reminder_id = %reminder.id, recipient = %reminder.recipient, "Reminder due");
                    if tx.send(reminder).await.is_err() {
                        debug!("Reminder receiver dropped, stopping delivery loop");
                        return;
                    }
                }
            }
        });

        (rx, handle)
    }
}

/// Pull everything due at or before `now` out of the pending list,
/// soonest first.
fn drain_due(pending: &mut Vec<ScheduledReminder>, now: DateTime<Utc>) -> Vec<ScheduledReminder> {
    let mut due: Vec<ScheduledReminder> = Vec::new();
    pending.retain(|r| {
        if r.fire_at <= now {
            due.push(r.clone());
            false
        } else {
            true
        }
    });
    due.sort_by_key(|r| r.fire_at);
    due
}

impl Default for ReminderQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Scheduler for ReminderQueue {
    fn name(&self) -> &str {
        "queue"
    }

    async fn schedule(&self, reminder: ScheduledReminder) -> Result<(), SchedulerError> {
        debug!(
            reminder_id = %reminder.id,
            recipient = %reminder.recipient,
            fire_at = %reminder.fire_at,
            "Scheduling reminder"
        );
        let mut pending = self.pending.write().await;
        pending.push(reminder);
        pending.sort_by_key(|r| r.fire_at);
        Ok(())
    }
}
