//! Writing streaks: runs of consecutive calendar days with at least one
//! journal entry.

use std::collections::BTreeSet;

use jiff::Zoned;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::JournalEntry;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Streak {
    /// Run ending on the most recent entry day, if that day is today or
    /// yesterday. Otherwise 0.
    pub current: u32,
    /// Longest run anywhere in the history.
    pub longest: u32,
}

/// Compute the streak of `entries` as seen at `now`.
///
/// Entry timestamps are converted to calendar days in `now`'s time zone,
/// so the result only depends on the arguments.
pub fn compute_streak(entries: &[JournalEntry], now: &Zoned) -> Streak {
    let tz = now.time_zone();
    let days = entries
        .iter()
        .map(|e| e.created_at.timestamp().to_zoned(tz.clone()).date());
    streak_from_dates(days, now.date())
}

/// Same as [`compute_streak`] for callers that already hold calendar days.
/// Duplicates and order do not matter.
pub fn streak_from_dates<I>(dates: I, today: Date) -> Streak
where
    I: IntoIterator<Item = Date>,
{
    let unique: BTreeSet<Date> = dates.into_iter().collect();
    let days: Vec<Date> = unique.into_iter().rev().collect();

    let Some(&latest) = days.first() else {
        return Streak::default();
    };

    let mut longest = 1u32;
    let mut run = 1u32;
    // Length of the run that starts at `latest`, fixed at the first break.
    let mut leading: Option<u32> = None;

    for pair in days.windows(2) {
        if is_previous_day(pair[1], pair[0]) {
            run += 1;
        } else {
            leading.get_or_insert(run);
            longest = longest.max(run);
            run = 1;
        }
    }
    let leading = leading.unwrap_or(run);
    longest = longest.max(run);

    // A day after `today` only shows up under clock skew; count it as today.
    let active = match today.yesterday() {
        Ok(yesterday) => latest >= yesterday,
        Err(_) => latest >= today,
    };

    Streak {
        current: if active { leading } else { 0 },
        longest,
    }
}

/// True when `earlier` is exactly one calendar day before `later`.
fn is_previous_day(earlier: Date, later: Date) -> bool {
    earlier.tomorrow().is_ok_and(|d| d == later)
}
