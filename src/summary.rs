// ➕ Aggregate Summarizer - Windowed sums, averages and goal progress
//
// All ratios here go through `ratio_percent`, which answers 0 for a zero
// (or negative) denominator instead of producing NaN or infinity.

use crate::period::DateWindow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// AMOUNT RECORDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountKind {
    Income,
    Expense,
    Ml,
    Kcal,
}

impl AmountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AmountKind::Income => "income",
            AmountKind::Expense => "expense",
            AmountKind::Ml => "ml",
            AmountKind::Kcal => "kcal",
        }
    }
}

/// A dated amount as handed over by the store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmountRecord {
    pub occurred_on: NaiveDate,
    pub amount: f64,
    pub kind: AmountKind,
}

impl AmountRecord {
    pub fn new(occurred_on: NaiveDate, amount: f64, kind: AmountKind) -> Self {
        AmountRecord {
            occurred_on,
            amount,
            kind,
        }
    }
}

// ============================================================================
// SUMMARY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub total_by_kind: BTreeMap<AmountKind, f64>,
    pub count: usize,
    pub average: f64,
}

impl Summary {
    pub fn total(&self) -> f64 {
        self.total_by_kind.values().sum()
    }

    pub fn total_of(&self, kind: AmountKind) -> f64 {
        self.total_by_kind.get(&kind).copied().unwrap_or(0.0)
    }
}

/// Sum the records that fall inside `window`, grouped by kind.
pub fn summarize(records: &[AmountRecord], window: &DateWindow) -> Summary {
    let mut total_by_kind: BTreeMap<AmountKind, f64> = BTreeMap::new();
    let mut count = 0;
    let mut total = 0.0;

    for record in records.iter().filter(|r| window.contains(r.occurred_on)) {
        *total_by_kind.entry(record.kind).or_insert(0.0) += record.amount;
        total += record.amount;
        count += 1;
    }

    let average = if count > 0 { total / count as f64 } else { 0.0 };

    Summary {
        total_by_kind,
        count,
        average,
    }
}

/// Per-day totals for records inside `window`.
pub fn daily_totals(records: &[AmountRecord], window: &DateWindow) -> BTreeMap<NaiveDate, f64> {
    let mut totals = BTreeMap::new();
    for record in records.iter().filter(|r| window.contains(r.occurred_on)) {
        *totals.entry(record.occurred_on).or_insert(0.0) += record.amount;
    }
    totals
}

// ============================================================================
// RATIOS
// ============================================================================

/// `part / whole * 100`, or 0 when `whole` is not positive.
pub fn ratio_percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// ============================================================================
// GOAL PROGRESS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub total: f64,
    pub goal: f64,
    pub progress_percentage: f64,
    pub remaining: f64,
}

impl GoalProgress {
    pub fn new(total: f64, goal: f64) -> Self {
        GoalProgress {
            total,
            goal,
            progress_percentage: ratio_percent(total, goal),
            remaining: (goal - total).max(0.0),
        }
    }

    pub fn is_met(&self) -> bool {
        self.goal > 0.0 && self.total >= self.goal
    }
}

// ============================================================================
// WEATHER HINT
// ============================================================================

/// Environmental hint that scales the remaining water amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherHint {
    Hot,
    Cold,
}

impl WeatherHint {
    /// Free-text weather description to a hint; "hot"/"sunny" wins over "cold".
    pub fn from_description(description: &str) -> Option<Self> {
        let lower = description.to_lowercase();
        if lower.contains("hot") || lower.contains("sunny") {
            Some(WeatherHint::Hot)
        } else if lower.contains("cold") {
            Some(WeatherHint::Cold)
        } else {
            None
        }
    }

    /// Scale a remaining amount: ×1.2 when hot, ×0.9 when cold, truncated.
    pub fn adjust(hint: Option<WeatherHint>, remaining: i64) -> i64 {
        match hint {
            Some(WeatherHint::Hot) => remaining * 12 / 10,
            Some(WeatherHint::Cold) => remaining * 9 / 10,
            None => remaining,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
