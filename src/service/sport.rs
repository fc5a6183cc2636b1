use super::Dashboard;
use crate::access::DataAccess;
use crate::db::sport::{self, DateFilter};
use crate::entities::{
    NewSportFood, NewSportWater, NewSportWorkout, SportFood, SportGoals, SportGoalsUpdate,
    SportWater, SportWorkout, UserId,
};
use crate::error::{DashboardError, Result};
use crate::period::{resolve, DateWindow, Period};
use crate::stats::{sport_daily, sport_overview, sport_weekly, SportDailyStats, SportOverview, SportWeeklyStats};
use serde_json::json;

impl Dashboard<'_> {
    // ========================================================================
    // ENTRIES
    // ========================================================================

    pub fn add_sport_water(&self, user: UserId, water: &NewSportWater) -> Result<SportWater> {
        water.validate()?;
        let created = sport::insert_sport_water(self.conn, user, water)?;
        self.record(user, "create", "sport_water", created.id, json!({ "ml": created.ml, "date": created.date }))?;
        Ok(created)
    }

    pub fn list_sport_water(&self, user: UserId, filter: DateFilter) -> Result<Vec<SportWater>> {
        Ok(sport::list_sport_water(self.conn, user, filter)?)
    }

    pub fn delete_sport_water(&self, user: UserId, id: i64) -> Result<()> {
        if !sport::delete_sport_water(self.conn, user, id)? {
            return Err(DashboardError::NotFound("water record"));
        }
        self.record(user, "delete", "sport_water", id, json!({}))
    }

    pub fn add_sport_food(&self, user: UserId, food: &NewSportFood) -> Result<SportFood> {
        food.validate()?;
        let created = sport::insert_sport_food(self.conn, user, food)?;
        self.record(
            user,
            "create",
            "sport_food",
            created.id,
            json!({ "name": created.name, "kcal": created.kcal, "date": created.date }),
        )?;
        Ok(created)
    }

    pub fn list_sport_food(&self, user: UserId, filter: DateFilter) -> Result<Vec<SportFood>> {
        Ok(sport::list_sport_food(self.conn, user, filter)?)
    }

    pub fn delete_sport_food(&self, user: UserId, id: i64) -> Result<()> {
        if !sport::delete_sport_food(self.conn, user, id)? {
            return Err(DashboardError::NotFound("food record"));
        }
        self.record(user, "delete", "sport_food", id, json!({}))
    }

    pub fn add_sport_workout(&self, user: UserId, workout: &NewSportWorkout) -> Result<SportWorkout> {
        workout.validate()?;
        let created = sport::insert_sport_workout(self.conn, user, workout)?;
        self.record(
            user,
            "create",
            "sport_workout",
            created.id,
            json!({ "name": created.name, "kcal_burned": created.kcal_burned, "date": created.date }),
        )?;
        Ok(created)
    }

    pub fn list_sport_workouts(&self, user: UserId, filter: DateFilter) -> Result<Vec<SportWorkout>> {
        Ok(sport::list_sport_workouts(self.conn, user, filter)?)
    }

    pub fn delete_sport_workout(&self, user: UserId, id: i64) -> Result<()> {
        if !sport::delete_sport_workout(self.conn, user, id)? {
            return Err(DashboardError::NotFound("workout"));
        }
        self.record(user, "delete", "sport_workout", id, json!({}))
    }

    // ========================================================================
    // GOALS & STATS
    // ========================================================================

    /// Stored goals, or unsaved defaults.
    pub fn sport_goals(&self, user: UserId) -> Result<SportGoals> {
        Ok(self
            .store()
            .fetch_sport_goals(user)?
            .unwrap_or_else(|| SportGoals::defaults(user)))
    }

    pub fn update_sport_goals(&self, user: UserId, update: &SportGoalsUpdate) -> Result<SportGoals> {
        update.validate()?;
        let merged = self.sport_goals(user)?.merged(update);
        let saved = sport::save_sport_goals(self.conn, &merged)?;
        self.record(user, "update", "sport_goals", saved.id, json!({ "fields": update.changed_fields() }))?;
        Ok(saved)
    }

    pub fn sport_today(&self, user: UserId) -> Result<SportDailyStats> {
        let records = self.store().fetch_sport_records(user, &DateWindow::single_day(self.today))?;
        Ok(sport_daily(records.log(), self.today))
    }

    pub fn sport_week(&self, user: UserId) -> Result<SportWeeklyStats> {
        let week = resolve(Period::Week, self.today);
        let records = self.store().fetch_sport_records(user, &week)?;
        Ok(sport_weekly(records.log(), self.today))
    }

    pub fn sport_overview(&self, user: UserId) -> Result<SportOverview> {
        let week = resolve(Period::Week, self.today);
        let records = self.store().fetch_sport_records(user, &week)?;
        Ok(sport_overview(records.log(), self.sport_goals(user)?, self.today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::NoopReporter;
    use crate::config::Settings;
    use crate::db::tests::test_conn;
    use crate::service::tests::today;
    use chrono::Days;

    #[test]
    fn test_goals_default_until_updated() {
        let conn = test_conn();
        let settings = Settings::default();
        let dashboard = Dashboard::new(&conn, &settings, &NoopReporter).with_today(today());

        let goals = dashboard.sport_goals(1).unwrap();
        assert_eq!((goals.water_ml_per_day, goals.kcal_per_day), (3000, 2200));

        let update = SportGoalsUpdate {
            kcal_per_day: Some(2600),
            ..Default::default()
        };
        let saved = dashboard.update_sport_goals(1, &update).unwrap();
        assert_eq!(saved.kcal_per_day, 2600);
        assert_eq!(dashboard.sport_goals(1).unwrap().kcal_per_day, 2600);

        let too_low = SportGoalsUpdate {
            kcal_per_day: Some(100),
            ..Default::default()
        };
        assert!(dashboard.update_sport_goals(1, &too_low).is_err());
    }

    #[test]
    fn test_today_week_and_overview() {
        let conn = test_conn();
        let settings = Settings::default();
        let dashboard = Dashboard::new(&conn, &settings, &NoopReporter).with_today(today());
        // 2024-06-12 is a Wednesday; Monday is the 10th
        let monday = today() - Days::new(2);

        dashboard.add_sport_water(1, &NewSportWater { date: today(), ml: 1500 }).unwrap();
        dashboard.add_sport_water(1, &NewSportWater { date: monday, ml: 700 }).unwrap();
        dashboard
            .add_sport_food(
                1,
                &NewSportFood {
                    date: today(),
                    name: "Pasta".to_string(),
                    kcal: 1100,
                    protein: None,
                    carbs: None,
                    fat: None,
                },
            )
            .unwrap();
        let run = dashboard
            .add_sport_workout(
                1,
                &NewSportWorkout {
                    date: today(),
                    name: "Run".to_string(),
                    duration_min: 40,
                    kcal_burned: 400,
                },
            )
            .unwrap();

        let day = dashboard.sport_today(1).unwrap();
        assert_eq!(day.water_ml, 1500);
        assert_eq!(day.net_kcal, 700);

        let week = dashboard.sport_week(1).unwrap();
        assert_eq!(week.total_water_ml, 2200);

        let overview = dashboard.sport_overview(1).unwrap();
        assert_eq!(overview.water_progress.progress_percentage, 50.0);
        assert_eq!(overview.kcal_progress.progress_percentage, 50.0);

        dashboard.delete_sport_workout(1, run.id).unwrap();
        assert!(dashboard.delete_sport_workout(1, run.id).is_err());
        assert_eq!(dashboard.sport_today(1).unwrap().kcal_burned, 0);
    }
}
