use super::{Dashboard, Paging};
use crate::access::{DataAccess, GoalDomain, RecordSource};
use crate::db::water;
use crate::entities::{NewWaterEntry, UserId, WaterEntry, WaterEntryUpdate, WaterGoal, WaterGoalUpdate};
use crate::error::{DashboardError, Result};
use crate::period::DateWindow;
use crate::stats::{
    water_history, water_recommendation, water_stats, water_stats_window, WaterHistoryDay,
    WaterRecommendation, WaterStats,
};
use crate::summary::{summarize, WeatherHint};
use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::json;

const MAX_HISTORY_DAYS: u32 = 30;
const DASHBOARD_RECENT_ENTRIES: u32 = 10;
const DASHBOARD_HISTORY_DAYS: u32 = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterDashboard {
    pub stats: WaterStats,
    pub goal: WaterGoal,
    pub recent_entries: Vec<WaterEntry>,
    pub weekly_history: Vec<WaterHistoryDay>,
}

impl Dashboard<'_> {
    fn water_entry_or_404(&self, user: UserId, id: i64) -> Result<WaterEntry> {
        water::get_water_entry(self.conn, user, id)?.ok_or(DashboardError::NotFound("water entry"))
    }

    /// Stored daily goal, or the configured default when the user has none.
    fn daily_water_goal(&self, user: UserId) -> Result<i64> {
        let goal = self.store().fetch_goal(user, GoalDomain::Water)?;
        Ok(goal
            .map(|goal| goal.daily_target.round() as i64)
            .unwrap_or(self.settings.default_water_goal))
    }

    pub fn list_water_entries(
        &self,
        user: UserId,
        date: Option<NaiveDate>,
        paging: Paging,
    ) -> Result<Vec<WaterEntry>> {
        Ok(water::list_water_entries(self.conn, user, date, self.page(paging))?)
    }

    pub fn add_water_entry(&self, user: UserId, entry: &NewWaterEntry) -> Result<WaterEntry> {
        entry.validate()?;
        let created = water::insert_water_entry(self.conn, user, entry, self.today)?;
        self.record(
            user,
            "create",
            "water_entry",
            created.id,
            json!({ "amount": created.amount, "date": created.entry_date }),
        )?;
        Ok(created)
    }

    pub fn update_water_entry(&self, user: UserId, id: i64, update: &WaterEntryUpdate) -> Result<WaterEntry> {
        update.validate()?;
        let updated = self.water_entry_or_404(user, id)?.merged(update);
        water::update_water_entry(self.conn, &updated)?;
        self.record(user, "update", "water_entry", id, json!({ "fields": update.changed_fields() }))?;
        Ok(updated)
    }

    pub fn delete_water_entry(&self, user: UserId, id: i64) -> Result<()> {
        if !water::delete_water_entry(self.conn, user, id)? {
            return Err(DashboardError::NotFound("water entry"));
        }
        self.record(user, "delete", "water_entry", id, json!({}))
    }

    /// The user's goal, created with the configured default on first access.
    pub fn water_goal(&self, user: UserId) -> Result<WaterGoal> {
        if let Some(goal) = water::get_water_goal(self.conn, user)? {
            return Ok(goal);
        }
        info!(
            "Creating default water goal of {} ml for user {}",
            self.settings.default_water_goal, user
        );
        let goal = WaterGoal::with_daily_goal(user, self.settings.default_water_goal);
        Ok(water::insert_water_goal(self.conn, &goal)?)
    }

    pub fn update_water_goal(&self, user: UserId, update: &WaterGoalUpdate) -> Result<WaterGoal> {
        update.validate()?;
        let updated = self.water_goal(user)?.merged(update);
        water::update_water_goal(self.conn, &updated)?;
        self.record(user, "update", "water_goal", updated.id, json!({ "fields": update.changed_fields() }))?;
        Ok(updated)
    }

    pub fn water_today(&self, user: UserId) -> Result<WaterStats> {
        let lookback = self.settings.streak_lookback_days;
        let window = water_stats_window(self.today, lookback);
        let records = self.store().fetch_records(user, RecordSource::Water, &window)?;
        Ok(water_stats(&records, self.today, self.daily_water_goal(user)?, lookback))
    }

    /// One row per day for the last `days` days (1..=30), oldest first.
    pub fn water_history(&self, user: UserId, days: u32) -> Result<Vec<WaterHistoryDay>> {
        if days == 0 || days > MAX_HISTORY_DAYS {
            return Err(DashboardError::validation(
                "days",
                format!("must be between 1 and {}", MAX_HISTORY_DAYS),
            ));
        }
        let window = DateWindow::trailing(self.today, days);
        let records = self.store().fetch_records(user, RecordSource::Water, &window)?;
        Ok(water_history(&records, &window, self.daily_water_goal(user)?))
    }

    pub fn water_dashboard(&self, user: UserId) -> Result<WaterDashboard> {
        Ok(WaterDashboard {
            stats: self.water_today(user)?,
            goal: self.water_goal(user)?,
            recent_entries: self.list_water_entries(user, None, Paging::new(0, DASHBOARD_RECENT_ENTRIES))?,
            weekly_history: self.water_history(user, DASHBOARD_HISTORY_DAYS)?,
        })
    }

    /// Hydration advice for the rest of today; `weather` is free text such as "sunny".
    pub fn water_recommendation(&self, user: UserId, weather: Option<&str>) -> Result<WaterRecommendation> {
        let today = DateWindow::single_day(self.today);
        let records = self.store().fetch_records(user, RecordSource::Water, &today)?;
        let total = summarize(&records, &today).total().round() as i64;
        let hint = weather.and_then(WeatherHint::from_description);
        Ok(water_recommendation(total, self.daily_water_goal(user)?, hint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::NoopReporter;
    use crate::config::Settings;
    use crate::db::tests::test_conn;
    use crate::service::tests::today;
    use crate::stats::Priority;
    use chrono::Days;

    fn on(amount: i64, date: NaiveDate) -> NewWaterEntry {
        let mut entry = NewWaterEntry::glass(amount);
        entry.entry_date = Some(date);
        entry
    }

    #[test]
    fn test_goal_is_created_with_configured_default() {
        let conn = test_conn();
        let settings = Settings {
            default_water_goal: 2000,
            ..Settings::default()
        };
        let dashboard = Dashboard::new(&conn, &settings, &NoopReporter).with_today(today());

        let goal = dashboard.water_goal(1).unwrap();
        assert_eq!(goal.daily_goal, 2000);
        assert_eq!(dashboard.water_goal(1).unwrap().id, goal.id);

        let update = WaterGoalUpdate {
            daily_goal: Some(3000),
            ..Default::default()
        };
        assert_eq!(dashboard.update_water_goal(1, &update).unwrap().daily_goal, 3000);
        assert_eq!(dashboard.water_today(1).unwrap().daily_goal, 3000);

        let bad = WaterGoalUpdate {
            daily_goal: Some(20),
            ..Default::default()
        };
        assert!(matches!(
            dashboard.update_water_goal(1, &bad),
            Err(DashboardError::Validation { .. })
        ));
    }

    #[test]
    fn test_today_stats_and_streak() {
        let conn = test_conn();
        let settings = Settings::default();
        let dashboard = Dashboard::new(&conn, &settings, &NoopReporter).with_today(today());

        let yesterday = today() - Days::new(1);
        dashboard.add_water_entry(1, &on(2500, yesterday)).unwrap();
        dashboard.add_water_entry(1, &NewWaterEntry::glass(1000)).unwrap();
        dashboard.add_water_entry(1, &NewWaterEntry::glass(800)).unwrap();

        let stats = dashboard.water_today(1).unwrap();
        assert_eq!(stats.today_total, 1800);
        assert_eq!(stats.entries_today, 2);
        assert_eq!(stats.progress_percentage, 72.0);
        assert_eq!(stats.remaining_to_goal, 700);
        // today is below goal, so the streak is broken at day zero
        assert_eq!(stats.streak_days, 0);
        assert_eq!(stats.weekly_average, 614.3);
    }

    #[test]
    fn test_weekly_average_ignores_short_lookback() {
        let conn = test_conn();
        let settings = Settings::from_lookup(|key| match key {
            "DASHBOARD_STREAK_LOOKBACK_DAYS" => Some("3".to_string()),
            _ => None,
        })
        .unwrap();
        let dashboard = Dashboard::new(&conn, &settings, &NoopReporter).with_today(today());

        for days_ago in 0..7 {
            dashboard.add_water_entry(1, &on(700, today() - Days::new(days_ago))).unwrap();
        }

        let stats = dashboard.water_today(1).unwrap();
        assert_eq!(stats.weekly_average, 700.0);
        assert_eq!(stats.streak_days, 0);
    }

    #[test]
    fn test_history_bounds_and_rows() {
        let conn = test_conn();
        let settings = Settings::default();
        let dashboard = Dashboard::new(&conn, &settings, &NoopReporter).with_today(today());
        dashboard.add_water_entry(1, &on(2600, today() - Days::new(2))).unwrap();

        assert!(dashboard.water_history(1, 0).is_err());
        assert!(dashboard.water_history(1, 31).is_err());

        let history = dashboard.water_history(1, 3).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].date, today() - Days::new(2));
        assert!(history[0].goal_met);
        assert_eq!(history[2].total_amount, 0);
        assert!(!history[2].goal_met);
    }

    #[test]
    fn test_recommendation_uses_weather() {
        let conn = test_conn();
        let settings = Settings::default();
        let dashboard = Dashboard::new(&conn, &settings, &NoopReporter).with_today(today());
        dashboard.add_water_entry(1, &NewWaterEntry::glass(1800)).unwrap();

        let plain = dashboard.water_recommendation(1, None).unwrap();
        assert_eq!(plain.remaining_amount, 700);
        assert_eq!(plain.priority, Priority::Low);

        let sunny = dashboard.water_recommendation(1, Some("Sunny and dry")).unwrap();
        assert_eq!(sunny.remaining_amount, 840);
        assert_eq!(sunny.recommended_glass_size, 250);
    }

    #[test]
    fn test_entry_update_delete_and_dashboard() {
        let conn = test_conn();
        let settings = Settings::default();
        let dashboard = Dashboard::new(&conn, &settings, &NoopReporter).with_today(today());
        let entry = dashboard.add_water_entry(1, &NewWaterEntry::glass(300)).unwrap();
        assert!(dashboard.add_water_entry(1, &NewWaterEntry::glass(0)).is_err());

        let update = WaterEntryUpdate {
            amount: Some(350),
            ..Default::default()
        };
        assert_eq!(dashboard.update_water_entry(1, entry.id, &update).unwrap().amount, 350);
        assert!(matches!(
            dashboard.update_water_entry(2, entry.id, &update),
            Err(DashboardError::NotFound(_))
        ));

        let board = dashboard.water_dashboard(1).unwrap();
        assert_eq!(board.stats.today_total, 350);
        assert_eq!(board.recent_entries.len(), 1);
        assert_eq!(board.weekly_history.len(), 7);
        assert_eq!(board.goal.daily_goal, 2500);

        dashboard.delete_water_entry(1, entry.id).unwrap();
        assert!(matches!(
            dashboard.delete_water_entry(1, entry.id),
            Err(DashboardError::NotFound(_))
        ));
    }
}
