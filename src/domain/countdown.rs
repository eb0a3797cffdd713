use chrono::{DateTime, Utc};
use serde::Serialize;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Time left until departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TripCountdown {
    Started,
    Upcoming {
        days: i64,
        weeks: i64,
        remaining_days: i64,
    },
}

impl TripCountdown {
    /// Whole days are rounded up, so a departure later today counts as one day.
    pub fn until(start: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let seconds = (start - now).num_seconds();
        let days = seconds.div_euclid(SECONDS_PER_DAY)
            + i64::from(seconds.rem_euclid(SECONDS_PER_DAY) != 0);

        if days < 0 {
            return Self::Started;
        }

        Self::Upcoming {
            days,
            weeks: days / 7,
            remaining_days: days % 7,
        }
    }
}
