// 📅 Date-Range Resolver - Named periods to inclusive date windows
//
// Every stats view filters records through a `DateWindow`. Windows are
// inclusive on both ends and never carry a time-of-day.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

// ============================================================================
// PERIOD
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Today,
    Week,
    Month,
    Year,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Today => "today",
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        }
    }

    /// Parse a period name. Unknown names resolve to `Today`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "week" => Period::Week,
            "month" => Period::Month,
            "year" => Period::Year,
            _ => Period::Today,
        }
    }
}

impl Default for Period {
    fn default() -> Self {
        Period::Today
    }
}

// ============================================================================
// DATE WINDOW
// ============================================================================

/// Inclusive `[start, end]` range of calendar dates.
///
/// A window with `start > end` is accepted but contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateWindow { start, end }
    }

    pub fn single_day(day: NaiveDate) -> Self {
        DateWindow { start: day, end: day }
    }

    /// The `days` calendar days ending at (and including) `end`.
    pub fn trailing(end: NaiveDate, days: u32) -> Self {
        let span = u64::from(days.saturating_sub(1));
        let start = end.checked_sub_days(Days::new(span)).unwrap_or(NaiveDate::MIN);
        DateWindow { start, end }
    }

    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days covered, 0 for an inverted window.
    pub fn len_days(&self) -> u32 {
        if !self.is_valid() {
            return 0;
        }
        (self.end - self.start).num_days() as u32 + 1
    }

    /// Iterate over every date in the window, oldest first.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start
            .iter_days()
            .take_while(move |day| *day <= end)
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

pub fn resolve(period: Period, reference: NaiveDate) -> DateWindow {
    match period {
        Period::Today => DateWindow::single_day(reference),
        Period::Week => {
            let offset = u64::from(reference.weekday().num_days_from_monday());
            let start = reference - Days::new(offset);
            DateWindow::new(start, start + Days::new(6))
        }
        Period::Month => {
            let start = reference.with_day(1).unwrap_or(reference);
            let end = start
                .checked_add_months(Months::new(1))
                .and_then(|next| next.pred_opt())
                .unwrap_or(NaiveDate::MAX);
            DateWindow::new(start, end)
        }
        Period::Year => {
            let year = reference.year();
            let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(reference);
            let end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(reference);
            DateWindow::new(start, end)
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
