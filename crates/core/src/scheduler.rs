//! Scheduler trait — accepts a reminder for eventual delivery.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SchedulerError;
use crate::turn::SessionId;

/// The payload handed to the scheduler. Created once, never mutated;
/// ownership transfers to the scheduler on `schedule`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledReminder {
    /// Unique reminder ID
    pub id: String,

    /// Who receives the notification
    pub recipient: SessionId,

    /// The message body delivered at fire time
    pub body: String,

    /// When to deliver
    pub fire_at: DateTime<Utc>,

    /// When this reminder was created
    pub created_at: DateTime<Utc>,
}

impl ScheduledReminder {
    pub fn new(recipient: SessionId, body: impl Into<String>, fire_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            recipient,
            body: body.into(),
            fire_at,
            created_at: Utc::now(),
        }
    }
}

/// The core Scheduler trait.
///
/// Implementations own delivery; the dialogue core only hands reminders
/// over and never sees them again.
#[async_trait]
pub trait Scheduler: Send + Sync {
    /// The scheduler name (e.g., "queue").
    fn name(&self) -> &str;

    /// Accept a reminder for delivery at its fire time.
    async fn schedule(
        &self,
        reminder: ScheduledReminder,
    ) -> std::result::Result<(), SchedulerError>;
}
