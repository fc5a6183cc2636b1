use super::sport::DateFilter;
use super::{finance, habits, journal, sport, travel, water, Page};
use crate::access::{DataAccess, Goal, GoalDomain, RecordSource, SportRecords};
use crate::entities::{
    FinanceBudget, FinanceCategory, FinanceEntry, Habit, JournalEntry, SportGoals, UserId,
    VisitedCountry, WishlistCountry,
};
use crate::period::DateWindow;
use crate::summary::AmountRecord;
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;

/// `DataAccess` over a borrowed SQLite connection.
pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        SqliteStore { conn }
    }
}

impl DataAccess for SqliteStore<'_> {
    fn fetch_records(&self, user: UserId, source: RecordSource, window: &DateWindow) -> Result<Vec<AmountRecord>> {
        let filter = DateFilter::from(window);
        let records: Vec<AmountRecord> = match source {
            RecordSource::Water => water::water_entries_between(self.conn, user, window)?
                .iter()
                .map(AmountRecord::from)
                .collect(),
            RecordSource::Finance => finance::finance_entries_between(self.conn, user, window)?
                .iter()
                .map(AmountRecord::from)
                .collect(),
            RecordSource::SportWater => sport::list_sport_water(self.conn, user, filter)?
                .iter()
                .map(AmountRecord::from)
                .collect(),
            RecordSource::SportFood => sport::list_sport_food(self.conn, user, filter)?
                .iter()
                .map(AmountRecord::from)
                .collect(),
            RecordSource::SportWorkout => sport::list_sport_workouts(self.conn, user, filter)?
                .iter()
                .map(AmountRecord::from)
                .collect(),
        };
        Ok(records)
    }

    fn fetch_goal(&self, user: UserId, domain: GoalDomain) -> Result<Option<Goal>> {
        let target = match domain {
            GoalDomain::Water => water::get_water_goal(self.conn, user)?.map(|g| g.daily_goal),
            GoalDomain::SportWater => sport::get_sport_goals(self.conn, user)?.map(|g| g.water_ml_per_day),
            GoalDomain::SportCalories => sport::get_sport_goals(self.conn, user)?.map(|g| g.kcal_per_day),
        };
        Ok(target.map(|t| Goal {
            daily_target: t as f64,
        }))
    }

    fn fetch_habits(&self, user: UserId) -> Result<Vec<Habit>> {
        habits::list_habits(self.conn, user, false, Page::first(u32::MAX))
    }

    fn fetch_completion_dates(&self, user: UserId, habit_id: i64) -> Result<Vec<NaiveDate>> {
        habits::completion_dates(self.conn, user, habit_id)
    }

    fn count_completions_on(&self, user: UserId, day: NaiveDate) -> Result<usize> {
        habits::count_completions_on(self.conn, user, day)
    }

    fn fetch_finance_entries(&self, user: UserId, window: &DateWindow) -> Result<Vec<FinanceEntry>> {
        finance::finance_entries_between(self.conn, user, window)
    }

    fn fetch_recent_finance_entries(&self, user: UserId, limit: u32) -> Result<Vec<FinanceEntry>> {
        finance::recent_finance_entries(self.conn, user, limit)
    }

    fn fetch_finance_categories(&self, user: UserId) -> Result<Vec<FinanceCategory>> {
        finance::list_finance_categories(self.conn, user, None)
    }

    fn fetch_budget(&self, user: UserId, year: i32, month: u32) -> Result<Option<FinanceBudget>> {
        finance::get_active_budget(self.conn, user, year, month)
    }

    fn fetch_journal_entries(&self, user: UserId) -> Result<Vec<JournalEntry>> {
        journal::all_journal_entries(self.conn, user)
    }

    fn fetch_wishlist(&self, user: UserId) -> Result<Vec<WishlistCountry>> {
        travel::list_wishlist(self.conn, user, None)
    }

    fn fetch_visited(&self, user: UserId) -> Result<Vec<VisitedCountry>> {
        travel::list_visited(self.conn, user)
    }

    fn fetch_sport_records(&self, user: UserId, window: &DateWindow) -> Result<SportRecords> {
        let filter = DateFilter::from(window);
        Ok(SportRecords {
            water: sport::list_sport_water(self.conn, user, filter)?,
            food: sport::list_sport_food(self.conn, user, filter)?,
            workouts: sport::list_sport_workouts(self.conn, user, filter)?,
        })
    }

    fn fetch_sport_goals(&self, user: UserId) -> Result<Option<SportGoals>> {
        sport::get_sport_goals(self.conn, user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::test_conn;
    use crate::entities::{NewFinanceEntry, NewWaterEntry, TransactionKind, WaterGoal};
    use crate::summary::AmountKind;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, d).unwrap()
    }

    #[test]
    fn test_fetch_records_by_source() {
        let conn = test_conn();
        water::insert_water_entry(&conn, 1, &NewWaterEntry::glass(400), date(3)).unwrap();
        water::insert_water_entry(&conn, 1, &NewWaterEntry::glass(600), date(9)).unwrap();
        let income = NewFinanceEntry::new(900.0, TransactionKind::Income, "Salary").on(date(3));
        finance::insert_finance_entry(&conn, 1, &income, date(3), None).unwrap();

        let store = SqliteStore::new(&conn);
        let window = DateWindow::new(date(1), date(5));

        let water = store.fetch_records(1, RecordSource::Water, &window).unwrap();
        assert_eq!(water, vec![AmountRecord::new(date(3), 400.0, AmountKind::Ml)]);

        let money = store.fetch_records(1, RecordSource::Finance, &window).unwrap();
        assert_eq!(money[0].kind, AmountKind::Income);
        assert!(store.fetch_records(2, RecordSource::Water, &window).unwrap().is_empty());
    }

    #[test]
    fn test_fetch_goal_is_optional() {
        let conn = test_conn();
        let store = SqliteStore::new(&conn);
        assert_eq!(store.fetch_goal(1, GoalDomain::Water).unwrap(), None);

        water::insert_water_goal(&conn, &WaterGoal::with_daily_goal(1, 2000)).unwrap();
        assert_eq!(
            store.fetch_goal(1, GoalDomain::Water).unwrap(),
            Some(Goal { daily_target: 2000.0 })
        );
        assert_eq!(store.fetch_goal(1, GoalDomain::SportCalories).unwrap(), None);
    }
}
