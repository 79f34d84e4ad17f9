//! TimeExtractor trait and the shared reminder-time formatter.

use chrono::{DateTime, Utc};

/// Extracts absolute timestamps from a free-text fragment.
///
/// The returned candidates are ordered by extractor confidence: callers that
/// need a single time always take the first. An empty result means the
/// fragment contained nothing recognizable as a time — that is a normal
/// outcome, not an error.
pub trait TimeExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Vec<DateTime<Utc>>;
}

/// Format a fire time the way it appears in confirmation messages,
/// e.g. "Monday at 3:04PM".
pub fn format_reminder_time(t: &DateTime<Utc>) -> String {
    t.format("%A at %-I:%M%p").to_string()
}
