//! Natural-language time extraction for Nudge.
//!
//! Turns fragments like "at 2pm", "tomorrow", "next week", or "in 20
//! minutes" into absolute timestamps. The grammar is deliberately small: a
//! fragment contributes at most one *day* component (today, tonight,
//! tomorrow, a weekday, next week/month) and at most one *clock* component
//! (2pm, 14:00, noon, ...), which combine into a single candidate. A bare
//! clock time that has already passed today rolls over to tomorrow.
//!
//! Candidates are returned best-first; an empty result means the text
//! contained nothing recognizable as a time, which is a normal outcome.
//!
//! All arithmetic is in UTC. The only ambiguity the extractor surfaces is a
//! bare hour after "at" ("at 2"): both readings are returned, the sooner
//! one first.

use chrono::{DateTime, Datelike, Duration, Months, NaiveTime, TimeZone, Utc, Weekday};
use nudge_core::TimeExtractor;

/// The default time extractor, resolving relative expressions against
/// `Utc::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalTimeExtractor;

impl NaturalTimeExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TimeExtractor for NaturalTimeExtractor {
    fn extract(&self, text: &str) -> Vec<DateTime<Utc>> {
        extract_relative_to(text, Utc::now())
    }
}

/// The day component of a fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
enum DayPart {
    /// N whole days from today (0 = today, 1 = tomorrow, ...)
    OffsetDays(i64),
    /// Same day next month
    NextMonth,
}

/// The clock component of a fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ClockPart {
    Exact(NaiveTime),
    /// A bare 1-12 hour with no am/pm marker ("at 2")
    AmbiguousHour(u32),
}

/// Extract time candidates from `text`, resolving relative expressions
/// against `now`. Exposed separately so tests can pin the reference time.
pub fn extract_relative_to(text: &str, now: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    let tokens: Vec<String> = text.split_whitespace().map(normalize).collect();

    let mut day: Option<DayPart> = None;
    let mut clock: Option<ClockPart> = None;
    let mut relative: Option<Duration> = None;

    let mut i = 0;
    while i < tokens.len() {
        let tok = tokens[i].as_str();
        match tok {
            "today" => day = day.or(Some(DayPart::OffsetDays(0))),
            "tomorrow" | "tmrw" => day = day.or(Some(DayPart::OffsetDays(1))),
            "tonight" => {
                day = day.or(Some(DayPart::OffsetDays(0)));
                clock = clock.or(Some(ClockPart::Exact(hm(20, 0))));
            }
            "next" => {
                if let Some(next) = tokens.get(i + 1) {
                    match next.as_str() {
                        "week" => {
                            day = day.or(Some(DayPart::OffsetDays(7)));
                            i += 1;
                        }
                        "month" => {
                            day = day.or(Some(DayPart::NextMonth));
                            i += 1;
                        }
                        w => {
                            if let Some(wd) = parse_weekday(w) {
                                day = day.or(Some(DayPart::OffsetDays(days_until(now, wd))));
                                i += 1;
                            }
                        }
                    }
                }
            }
            "in" => {
                if let Some(dur) = parse_relative(&tokens, i + 1) {
                    relative = relative.or(Some(dur));
                    i += 2;
                }
            }
            "noon" | "midday" => clock = clock.or(Some(ClockPart::Exact(hm(12, 0)))),
            "midnight" => clock = clock.or(Some(ClockPart::Exact(hm(0, 0)))),
            "morning" => clock = clock.or(Some(ClockPart::Exact(hm(9, 0)))),
            "afternoon" => clock = clock.or(Some(ClockPart::Exact(hm(15, 0)))),
            "evening" => clock = clock.or(Some(ClockPart::Exact(hm(18, 0)))),
            _ => {
                if let Some(wd) = parse_weekday(tok) {
                    day = day.or(Some(DayPart::OffsetDays(days_until(now, wd))));
                } else {
                    // Bare hours only count as clock times right after "at",
                    // so "buy 2 apples" stays time-free.
                    let after_at = i > 0 && tokens[i - 1] == "at";
                    if let Some(c) = parse_clock(tok, after_at) {
                        clock = clock.or(Some(c));
                    }
                }
            }
        }
        i += 1;
    }

    if let Some(dur) = relative {
        return vec![now + dur];
    }

    build_candidates(now, day, clock)
}

/// Combine the day and clock components into ordered candidates.
fn build_candidates(
    now: DateTime<Utc>,
    day: Option<DayPart>,
    clock: Option<ClockPart>,
) -> Vec<DateTime<Utc>> {
    let base_date = match day {
        Some(DayPart::OffsetDays(n)) => now.date_naive() + Duration::days(n),
        Some(DayPart::NextMonth) => match now.date_naive().checked_add_months(Months::new(1)) {
            Some(d) => d,
            None => return vec![],
        },
        None => now.date_naive(),
    };

    match (day, clock) {
        (None, None) => vec![],

        // Day without a clock keeps the current clock time on the target day.
        (Some(_), None) => vec![at(base_date, now.time())],

        (_, Some(ClockPart::Exact(t))) => {
            let mut candidate = at(base_date, t);
            if day.is_none() && candidate <= now {
                candidate += Duration::days(1);
            }
            vec![candidate]
        }

        // "at 2" with no am/pm: offer both readings, the sooner one first.
        (_, Some(ClockPart::AmbiguousHour(h))) => {
            let mut candidates: Vec<DateTime<Utc>> = [h % 12, (h % 12) + 12]
                .iter()
                .map(|&hour| {
                    let mut c = at(base_date, hm(hour, 0));
                    if day.is_none() && c <= now {
                        c += Duration::days(1);
                    }
                    c
                })
                .collect();
            candidates.sort();
            candidates
        }
    }
}

/// Parse one token as a clock time: "2pm", "11PM", "2:30pm", "14:00", and —
/// only when `allow_bare_hour` — a bare "2".
fn parse_clock(token: &str, allow_bare_hour: bool) -> Option<ClockPart> {
    let (digits, meridiem) = if let Some(rest) = token.strip_suffix("am") {
        (rest, Some(false))
    } else if let Some(rest) = token.strip_suffix("pm") {
        (rest, Some(true))
    } else {
        (token, None)
    };

    let (h, m) = match digits.split_once(':') {
        Some((h, m)) => (h.parse::<u32>().ok()?, m.parse::<u32>().ok()?),
        None => (digits.parse::<u32>().ok()?, 0),
    };
    if m > 59 {
        return None;
    }

    match meridiem {
        Some(pm) => {
            if !(1..=12).contains(&h) {
                return None;
            }
            let hour = match (h, pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, false) => h,
                (h, true) => h + 12,
            };
            Some(ClockPart::Exact(hm(hour, m)))
        }
        None if digits.contains(':') => {
            if h > 23 {
                return None;
            }
            Some(ClockPart::Exact(hm(h, m)))
        }
        None if allow_bare_hour && (1..=12).contains(&h) => Some(ClockPart::AmbiguousHour(h)),
        None => None,
    }
}

/// Parse "<N> <unit>" starting at `start` for an "in ..." expression.
fn parse_relative(tokens: &[String], start: usize) -> Option<Duration> {
    let n: i64 = tokens.get(start)?.parse().ok()?;
    let unit = tokens.get(start + 1)?;
    match unit.as_str() {
        "minute" | "minutes" | "min" | "mins" => Some(Duration::minutes(n)),
        "hour" | "hours" | "hr" | "hrs" => Some(Duration::hours(n)),
        "day" | "days" => Some(Duration::days(n)),
        "week" | "weeks" => Some(Duration::weeks(n)),
        _ => None,
    }
}

fn parse_weekday(token: &str) -> Option<Weekday> {
    match token {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Days until the next occurrence of `target`, always 1..=7 (a weekday named
/// on that same weekday means next week).
fn days_until(now: DateTime<Utc>, target: Weekday) -> i64 {
    let today = now.weekday().num_days_from_monday() as i64;
    let wanted = target.num_days_from_monday() as i64;
    let ahead = (wanted - today).rem_euclid(7);
    if ahead == 0 { 7 } else { ahead }
}

fn normalize(token: &str) -> String {
    token
        .trim_end_matches(['.', ',', '!', '?', ';', ':'])
        .to_lowercase()
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

fn at(date: chrono::NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nudge_core::format_reminder_time;

    /// Monday 2026-08-24, 10:00 UTC.
    fn monday_morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 24, 10, 0, 0).unwrap()
    }

    #[test]
    fn plain_text_has_no_times() {
        assert!(extract_relative_to("buy groceries", monday_morning()).is_empty());
        assert!(extract_relative_to("", monday_morning()).is_empty());
    }

    #[test]
    fn bare_numbers_are_not_times() {
        assert!(extract_relative_to("buy 2 apples", monday_morning()).is_empty());
    }

    #[test]
    fn clock_time_later_today() {
        let ts = extract_relative_to("at 2pm", monday_morning());
        assert_eq!(ts.len(), 1);
        assert_eq!(format_reminder_time(&ts[0]), "Monday at 2:00PM");
    }

    #[test]
    fn clock_time_already_past_rolls_to_tomorrow() {
        let ts = extract_relative_to("at 8am", monday_morning());
        assert_eq!(format_reminder_time(&ts[0]), "Tuesday at 8:00AM");
    }

    #[test]
    fn uppercase_clock_time() {
        let ts = extract_relative_to("11PM", monday_morning());
        assert_eq!(format_reminder_time(&ts[0]), "Monday at 11:00PM");
    }

    #[test]
    fn clock_time_with_minutes() {
        let ts = extract_relative_to("at 2:30pm", monday_morning());
        assert_eq!(format_reminder_time(&ts[0]), "Monday at 2:30PM");
    }

    #[test]
    fn twenty_four_hour_clock() {
        let ts = extract_relative_to("at 14:00", monday_morning());
        assert_eq!(format_reminder_time(&ts[0]), "Monday at 2:00PM");
    }

    #[test]
    fn noon_and_midnight() {
        let noon = extract_relative_to("at noon", monday_morning());
        assert_eq!(format_reminder_time(&noon[0]), "Monday at 12:00PM");

        // Midnight has passed by 10:00, so it means tonight's midnight.
        let midnight = extract_relative_to("at midnight", monday_morning());
        assert_eq!(format_reminder_time(&midnight[0]), "Tuesday at 12:00AM");
    }

    #[test]
    fn twelve_am_and_pm_resolve_correctly() {
        let ts = extract_relative_to("tomorrow at 12pm", monday_morning());
        assert_eq!(format_reminder_time(&ts[0]), "Tuesday at 12:00PM");

        let ts = extract_relative_to("tomorrow at 12am", monday_morning());
        assert_eq!(format_reminder_time(&ts[0]), "Tuesday at 12:00AM");
    }

    #[test]
    fn tomorrow_keeps_clock_when_none_given() {
        let ts = extract_relative_to("tomorrow", monday_morning());
        assert_eq!(format_reminder_time(&ts[0]), "Tuesday at 10:00AM");
    }

    #[test]
    fn tomorrow_with_clock() {
        let ts = extract_relative_to("tomorrow at 9am", monday_morning());
        assert_eq!(format_reminder_time(&ts[0]), "Tuesday at 9:00AM");
    }

    #[test]
    fn tonight_defaults_to_eight() {
        let ts = extract_relative_to("tonight", monday_morning());
        assert_eq!(format_reminder_time(&ts[0]), "Monday at 8:00PM");
    }

    #[test]
    fn next_week_is_seven_days_out() {
        let ts = extract_relative_to("next week", monday_morning());
        assert_eq!(ts[0], monday_morning() + Duration::days(7));
    }

    #[test]
    fn next_month_keeps_day_of_month() {
        let ts = extract_relative_to("next month", monday_morning());
        assert_eq!(ts[0].date_naive().to_string(), "2026-09-24");
    }

    #[test]
    fn weekday_means_next_occurrence() {
        let ts = extract_relative_to("on friday at 3pm", monday_morning());
        assert_eq!(format_reminder_time(&ts[0]), "Friday at 3:00PM");
        assert_eq!(ts[0].date_naive().to_string(), "2026-08-28");
    }

    #[test]
    fn same_weekday_means_next_week() {
        let ts = extract_relative_to("on monday", monday_morning());
        assert_eq!(ts[0].date_naive().to_string(), "2026-08-31");
    }

    #[test]
    fn relative_offsets() {
        let now = monday_morning();
        assert_eq!(
            extract_relative_to("in 20 minutes", now)[0],
            now + Duration::minutes(20)
        );
        assert_eq!(
            extract_relative_to("in 3 hours", now)[0],
            now + Duration::hours(3)
        );
        assert_eq!(
            extract_relative_to("in 2 days", now)[0],
            now + Duration::days(2)
        );
    }

    #[test]
    fn bare_hour_after_at_is_ambiguous() {
        let ts = extract_relative_to("at 2", monday_morning());
        assert_eq!(ts.len(), 2);
        // 2PM today comes before 2AM tomorrow.
        assert_eq!(format_reminder_time(&ts[0]), "Monday at 2:00PM");
        assert_eq!(format_reminder_time(&ts[1]), "Tuesday at 2:00AM");
    }

    #[test]
    fn trailing_punctuation_is_ignored() {
        let ts = extract_relative_to("at 2pm.", monday_morning());
        assert_eq!(format_reminder_time(&ts[0]), "Monday at 2:00PM");
    }

    #[test]
    fn full_sentences_work_too() {
        let ts = extract_relative_to("Remind me to buy groceries at 2pm", monday_morning());
        assert_eq!(format_reminder_time(&ts[0]), "Monday at 2:00PM");
    }
}
