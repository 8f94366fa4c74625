//! Countdown arithmetic and display formatting.
//!
//! Two rules coexist and must stay separate:
//!
//! - day counts measure from the start of the current UTC day;
//! - the finalists announcement uses the full timestamp and drops to hour
//!   granularity inside the last 24 hours.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::PhaseResult;

const HOUR_MS: u64 = 60 * 60 * 1000;
const DAY_MS: u64 = 24 * HOUR_MS;

/// Day-based phases flag urgency at or below this many days.
pub const URGENT_WITHIN_DAYS: u32 = 7;

/// Midnight UTC of the day containing `now`.
pub fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Whole days between `target` and the start of today, rounded up.
///
/// Uses the absolute distance, so a target earlier today still counts as 0.
pub fn days_until(target: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let gap_ms = (target - start_of_day(now)).num_milliseconds().unsigned_abs();
    clamp_u32(gap_ms.div_ceil(DAY_MS))
}

/// Hour-sensitive countdown to a same-day announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FineCountdown {
    pub days: u32,
    pub message: String,
    pub in_hours: bool,
}

/// Countdown from the full `now` timestamp, switching to hours inside the
/// final day.
pub fn fine_countdown(target: DateTime<Utc>, now: DateTime<Utc>) -> FineCountdown {
    let gap_ms = (target - now).num_milliseconds();
    if gap_ms <= 0 {
        return FineCountdown {
            days: 0,
            message: "Today".to_string(),
            in_hours: false,
        };
    }

    let gap_ms = gap_ms.unsigned_abs();
    if gap_ms < DAY_MS {
        let hours = clamp_u32(gap_ms.div_ceil(HOUR_MS));
        FineCountdown {
            days: 0,
            message: in_units(hours, "hour"),
            in_hours: true,
        }
    } else {
        let days = clamp_u32(gap_ms.div_ceil(DAY_MS));
        FineCountdown {
            days,
            message: in_units(days, "day"),
            in_hours: false,
        }
    }
}

/// `"in 1 day"`, `"in 3 days"`.
pub(crate) fn in_units(n: u32, unit: &str) -> String {
    if n == 1 {
        format!("in {n} {unit}")
    } else {
        format!("in {n} {unit}s")
    }
}

fn clamp_u32(n: u64) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Display-ready countdown for a resolved phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Countdown {
    pub days: u32,
    pub message: String,
    pub is_urgent: bool,
}

/// Build the countdown banner, or `None` when there is nothing to count
/// down to.
pub fn format_countdown(result: &PhaseResult) -> Option<Countdown> {
    if result.days_until_next == 0 {
        return None;
    }
    Some(Countdown {
        days: result.days_until_next,
        message: result.next_milestone.clone(),
        is_urgent: result.is_urgent,
    })
}
