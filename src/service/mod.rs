// 🧭 Dashboard Service - Validated, audited operations per user
//
// Every user-facing operation goes through `Dashboard`:
// - payloads are validated before anything touches storage
// - missing rows become `NotFound`, duplicate rows become `Conflict`
// - writes are persisted to the `events` audit table and handed to the
//   injected `Reporter`
// - stats are assembled from `DataAccess` snapshots with the pure `stats`
//   functions, against the service's notion of "today"

use crate::access::{DataAccess, RecordSource, Reporter};
use crate::config::Settings;
use crate::db::{get_events_for_actor, insert_event, Event, Page, SqliteStore};
use crate::entities::UserId;
use crate::error::{DashboardError, Result};
use crate::period::{resolve, DateWindow, Period};
use crate::stats::{FinanceSummary, HabitStats, WaterStats};
use crate::summary::{round_to, summarize, Summary};
use chrono::{NaiveDate, Utc};
use log::debug;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

mod finance;
mod habits;
mod journal;
mod sport;
mod travel;
mod water;

pub use finance::ImportReport;
pub use habits::{HabitCompleted, HabitDetail};
pub use journal::JournalDashboard;
pub use water::WaterDashboard;

/// `skip`/`limit` as received from a caller; `limit` is clamped by settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub skip: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl Paging {
    pub fn new(skip: u32, limit: u32) -> Self {
        Paging {
            skip: Some(skip),
            limit: Some(limit),
        }
    }
}

/// Headline numbers across habits, water and finance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub date: NaiveDate,
    pub habits: HabitStats,
    pub water: WaterStats,
    pub finance: FinanceSummary,
}

/// Totals of one record stream over a named period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub period: Period,
    pub window: DateWindow,
    pub days: u32,
    pub summary: Summary,
    /// Summed amount divided by `days`, one decimal
    pub daily_average: f64,
}

pub struct Dashboard<'a> {
    conn: &'a Connection,
    settings: &'a Settings,
    reporter: &'a dyn Reporter,
    today: NaiveDate,
}

impl<'a> Dashboard<'a> {
    /// `today` starts as the current UTC date, the clock every stored
    /// timestamp uses.
    pub fn new(conn: &'a Connection, settings: &'a Settings, reporter: &'a dyn Reporter) -> Self {
        Dashboard {
            conn,
            settings,
            reporter,
            today: Utc::now().date_naive(),
        }
    }

    /// Pin the reference date used for defaults and stats.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    fn store(&self) -> SqliteStore<'a> {
        SqliteStore::new(self.conn)
    }

    fn page(&self, paging: Paging) -> Page {
        Page::new(paging.skip.unwrap_or(0), self.settings.clamp_limit(paging.limit))
    }

    /// Persist an audit event for `user` and pass it to the reporter.
    fn record(
        &self,
        user: UserId,
        event_type: &str,
        entity_type: &str,
        entity_id: impl ToString,
        data: serde_json::Value,
    ) -> Result<()> {
        let event = Event::new(event_type, entity_type, &entity_id.to_string(), data, &actor(user));
        insert_event(self.conn, &event)?;
        self.reporter.report(&event);
        Ok(())
    }

    // ========================================================================
    // CROSS-DOMAIN
    // ========================================================================

    pub fn overview(&self, user: UserId) -> Result<Overview> {
        debug!("Building overview for user {} on {}", user, self.today);
        Ok(Overview {
            date: self.today,
            habits: self.habit_stats(user)?,
            water: self.water_today(user)?,
            finance: self.finance_summary(user)?,
        })
    }

    /// The user's own audit trail, newest first.
    pub fn activity(&self, user: UserId, limit: Option<u32>) -> Result<Vec<Event>> {
        let limit = self.settings.clamp_limit(limit);
        Ok(get_events_for_actor(self.conn, &actor(user), limit)?)
    }

    /// Sum `source` over the period called `period_name` ("today", "week",
    /// "month", "year"); any other name means today.
    pub fn period_totals(&self, user: UserId, source: &str, period_name: &str) -> Result<PeriodTotals> {
        let source = RecordSource::from_name(source).ok_or_else(|| {
            DashboardError::validation(
                "source",
                "must be one of water, finance, sport_water, sport_food, sport_workouts",
            )
        })?;
        let period = Period::from_name(period_name);
        let window = resolve(period, self.today);
        let records = self.store().fetch_records(user, source, &window)?;
        let summary = summarize(&records, &window);
        let days = window.len_days();
        let daily_average = if days > 0 { summary.total() / f64::from(days) } else { 0.0 };

        Ok(PeriodTotals {
            period,
            window,
            days,
            daily_average: round_to(daily_average, 1),
            summary,
        })
    }

    fn habit_completions_today(&self, user: UserId) -> Result<usize> {
        Ok(self.store().count_completions_on(user, self.today)?)
    }
}

pub fn actor(user: UserId) -> String {
    format!("user:{}", user)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::access::tests::RecordingReporter;
    use crate::db::tests::test_conn;
    use crate::entities::{NewFinanceEntry, NewHabit, NewWaterEntry, TransactionKind};

    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()
    }

    #[test]
    fn test_writes_are_audited_and_reported() {
        let conn = test_conn();
        let settings = Settings::default();
        let reporter = RecordingReporter::default();
        let dashboard = Dashboard::new(&conn, &settings, &reporter).with_today(today());

        let habit = dashboard.create_habit(1, &NewHabit::titled("Meditate")).unwrap();
        dashboard.add_water_entry(1, &NewWaterEntry::glass(300)).unwrap();

        let events = reporter.events.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, "create");
        assert_eq!(events[0].entity_type, "habit");
        assert_eq!(events[0].entity_id, habit.id.to_string());
        assert_eq!(events[0].actor, "user:1");

        let stored = dashboard.activity(1, None).unwrap();
        assert_eq!(stored.len(), 2);
        assert!(dashboard.activity(2, None).unwrap().is_empty());
    }

    #[test]
    fn test_overview_combines_domains() {
        let conn = test_conn();
        let settings = Settings::default();
        let reporter = RecordingReporter::default();
        let dashboard = Dashboard::new(&conn, &settings, &reporter).with_today(today());

        dashboard.create_habit(1, &NewHabit::titled("Walk")).unwrap();
        dashboard.add_water_entry(1, &NewWaterEntry::glass(1250)).unwrap();
        dashboard
            .create_finance_entry(1, &NewFinanceEntry::new(100.0, TransactionKind::Income, "Gift"))
            .unwrap();

        let overview = dashboard.overview(1).unwrap();
        assert_eq!(overview.date, today());
        assert_eq!(overview.habits.total_habits, 1);
        assert_eq!(overview.water.today_total, 1250);
        assert_eq!(overview.water.progress_percentage, 50.0);
        assert_eq!(overview.finance.today.total_income, 100.0);
    }

    #[test]
    fn test_period_totals_resolve_named_windows() {
        let conn = test_conn();
        let settings = Settings::default();
        let reporter = RecordingReporter::default();
        let dashboard = Dashboard::new(&conn, &settings, &reporter).with_today(today());

        let mut monday = NewWaterEntry::glass(700);
        monday.entry_date = NaiveDate::from_ymd_opt(2024, 6, 10);
        dashboard.add_water_entry(1, &monday).unwrap();
        dashboard.add_water_entry(1, &NewWaterEntry::glass(1400)).unwrap();

        let week = dashboard.period_totals(1, "water", "Week").unwrap();
        assert_eq!(week.period, Period::Week);
        assert_eq!(week.window.start, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        assert_eq!(week.days, 7);
        assert_eq!(week.summary.count, 2);
        assert_eq!(week.daily_average, 300.0);

        let fallback = dashboard.period_totals(1, "water", "fortnight").unwrap();
        assert_eq!(fallback.period, Period::Today);
        assert_eq!(fallback.days, 1);
        assert_eq!(fallback.summary.total(), 1400.0);

        assert!(matches!(
            dashboard.period_totals(1, "coffee", "week"),
            Err(DashboardError::Validation { field: "source", .. })
        ));
    }

    #[test]
    fn test_paging_is_clamped() {
        let conn = test_conn();
        let settings = Settings {
            page_limit: 5,
            ..Settings::default()
        };
        let reporter = RecordingReporter::default();
        let dashboard = Dashboard::new(&conn, &settings, &reporter);

        assert_eq!(dashboard.page(Paging::default()), Page::new(0, 5));
        assert_eq!(dashboard.page(Paging::new(10, 50)), Page::new(10, 5));
        assert_eq!(dashboard.page(Paging::new(0, 0)), Page::new(0, 1));
    }
}
