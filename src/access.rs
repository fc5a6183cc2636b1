// 🔌 Data Access - What the statistics layer needs from storage
//
// Stats are computed from snapshots fetched through `DataAccess`; nothing in
// `stats/` touches SQL. Observability goes through an injected `Reporter`
// rather than the global logger.

use crate::db::Event;
use crate::entities::{
    FinanceBudget, FinanceCategory, FinanceEntry, Habit, JournalEntry, SportFood, SportGoals,
    SportWater, SportWorkout, UserId, VisitedCountry, WishlistCountry,
};
use crate::period::DateWindow;
use crate::summary::AmountRecord;
use anyhow::Result;
use chrono::NaiveDate;
use log::info;

/// Which table a stream of dated amounts comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSource {
    Water,
    Finance,
    SportWater,
    SportFood,
    SportWorkout,
}

impl RecordSource {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "water" => Some(RecordSource::Water),
            "finance" => Some(RecordSource::Finance),
            "sport_water" => Some(RecordSource::SportWater),
            "sport_food" => Some(RecordSource::SportFood),
            "sport_workouts" => Some(RecordSource::SportWorkout),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalDomain {
    Water,
    SportWater,
    SportCalories,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Goal {
    pub daily_target: f64,
}

/// Owned sport records for one window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SportRecords {
    pub water: Vec<SportWater>,
    pub food: Vec<SportFood>,
    pub workouts: Vec<SportWorkout>,
}

impl SportRecords {
    pub fn log(&self) -> crate::stats::SportLog<'_> {
        crate::stats::SportLog {
            water: &self.water,
            food: &self.food,
            workouts: &self.workouts,
        }
    }
}

/// User-scoped reads. Every method only ever returns rows owned by `user`.
pub trait DataAccess {
    fn fetch_records(&self, user: UserId, source: RecordSource, window: &DateWindow) -> Result<Vec<AmountRecord>>;

    /// Stored goal, if the user configured one.
    fn fetch_goal(&self, user: UserId, domain: GoalDomain) -> Result<Option<Goal>>;

    fn fetch_habits(&self, user: UserId) -> Result<Vec<Habit>>;

    /// Every completion date of one habit, oldest first.
    fn fetch_completion_dates(&self, user: UserId, habit_id: i64) -> Result<Vec<NaiveDate>>;

    fn count_completions_on(&self, user: UserId, day: NaiveDate) -> Result<usize>;

    fn fetch_finance_entries(&self, user: UserId, window: &DateWindow) -> Result<Vec<FinanceEntry>>;

    fn fetch_recent_finance_entries(&self, user: UserId, limit: u32) -> Result<Vec<FinanceEntry>>;

    fn fetch_finance_categories(&self, user: UserId) -> Result<Vec<FinanceCategory>>;

    fn fetch_budget(&self, user: UserId, year: i32, month: u32) -> Result<Option<FinanceBudget>>;

    fn fetch_journal_entries(&self, user: UserId) -> Result<Vec<JournalEntry>>;

    fn fetch_wishlist(&self, user: UserId) -> Result<Vec<WishlistCountry>>;

    fn fetch_visited(&self, user: UserId) -> Result<Vec<VisitedCountry>>;

    fn fetch_sport_records(&self, user: UserId, window: &DateWindow) -> Result<SportRecords>;

    fn fetch_sport_goals(&self, user: UserId) -> Result<Option<SportGoals>>;
}

// ============================================================================
// REPORTING
// ============================================================================

/// Receives every audited user action after it has been persisted.
pub trait Reporter {
    fn report(&self, event: &Event);
}

/// Drops everything. Used by tests and the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn report(&self, _event: &Event) {}
}

/// Writes one `info` line per action.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, event: &Event) {
        info!(
            "{} {} {} {} {}",
            event.actor, event.event_type, event.entity_type, event.entity_id, event.data
        );
    }
}
