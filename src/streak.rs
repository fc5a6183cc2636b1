// 🔥 Streak Calculator
//
// Two separate definitions live here and must stay separate:
//
//   presence_streak  - consecutive days with at least one completion
//                      (habits, journal). One missed day of grace: the walk
//                      starts yesterday when today has no record yet.
//   goal_streak      - consecutive days whose total met a goal (water).
//                      Starts today, no grace, bounded lookback.

use chrono::{Days, NaiveDate};
use std::collections::BTreeSet;

/// Default upper bound for goal-streak walks.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 365;

/// Current presence streak ending today or yesterday.
///
/// Repeated dates count once. Always recomputed from the full set, so
/// deletions and out-of-order inserts need no bookkeeping.
pub fn presence_streak<I>(dates: I, today: NaiveDate) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    let dates: BTreeSet<NaiveDate> = dates.into_iter().collect();

    let Some(latest) = dates.last().copied() else {
        return 0;
    };

    let mut cursor = if latest == today {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) => yesterday,
            None => return 0,
        }
    };

    let mut streak = 0;
    while dates.contains(&cursor) {
        streak += 1;
        match cursor.pred_opt() {
            Some(previous) => cursor = previous,
            None => break,
        }
    }

    streak
}

/// Longest run of consecutive dates anywhere in the set.
pub fn longest_run<I>(dates: I) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    let dates: BTreeSet<NaiveDate> = dates.into_iter().collect();

    let mut longest = 0;
    let mut current = 0;
    let mut previous: Option<NaiveDate> = None;

    for date in dates {
        current = match previous.and_then(|p| p.succ_opt()) {
            Some(expected) if expected == date => current + 1,
            _ => 1,
        };
        longest = longest.max(current);
        previous = Some(date);
    }

    longest
}

/// Days in a row, ending today, whose total reached `goal`.
///
/// `total_on` is consulted once per day walking backward and the walk stops
/// after `max_lookback` days. A goal that is not positive yields 0.
pub fn goal_streak<F>(goal: f64, today: NaiveDate, max_lookback: u32, mut total_on: F) -> u32
where
    F: FnMut(NaiveDate) -> f64,
{
    if !(goal > 0.0) {
        return 0;
    }

    let mut streak = 0;
    for offset in 0..max_lookback {
        let Some(day) = today.checked_sub_days(Days::new(u64::from(offset))) else {
            break;
        };
        if total_on(day) >= goal {
            streak += 1;
        } else {
            break;
        }
    }

    streak
}

// ============================================================================
// TESTS
// ============================================================================
