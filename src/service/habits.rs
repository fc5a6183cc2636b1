use super::{Dashboard, Paging};
use crate::access::DataAccess;
use crate::db::habits;
use crate::entities::{Habit, HabitCompletion, HabitUpdate, NewCompletion, NewHabit, UserId};
use crate::error::{DashboardError, Result};
use crate::stats::{habit_stats, HabitStats};
use chrono::{Days, NaiveDate};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Completions shown alongside a single habit
const RECENT_COMPLETION_DAYS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitDetail {
    pub habit: Habit,
    pub recent_completions: Vec<HabitCompletion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitCompleted {
    pub completion: HabitCompletion,
    pub habit: Habit,
}

impl Dashboard<'_> {
    fn habit_or_404(&self, user: UserId, id: i64) -> Result<Habit> {
        habits::get_habit(self.conn, user, id)?.ok_or(DashboardError::NotFound("habit"))
    }

    /// Stored counters can be days old; re-derive them for `self.today`.
    fn as_of_today(&self, habit: Habit) -> Result<Habit> {
        let dates = self.store().fetch_completion_dates(habit.user_id, habit.id)?;
        Ok(habit.as_of(&dates, self.today))
    }

    pub fn list_habits(&self, user: UserId, active_only: bool, paging: Paging) -> Result<Vec<Habit>> {
        habits::list_habits(self.conn, user, active_only, self.page(paging))?
            .into_iter()
            .map(|habit| self.as_of_today(habit))
            .collect()
    }

    pub fn create_habit(&self, user: UserId, habit: &NewHabit) -> Result<Habit> {
        habit.validate()?;
        let created = habits::insert_habit(self.conn, user, habit)?;
        self.record(user, "create", "habit", created.id, json!({ "title": created.title }))?;
        Ok(created)
    }

    pub fn get_habit(&self, user: UserId, id: i64) -> Result<HabitDetail> {
        let habit = self.as_of_today(self.habit_or_404(user, id)?)?;
        let since = self
            .today
            .checked_sub_days(Days::new(RECENT_COMPLETION_DAYS))
            .unwrap_or(NaiveDate::MIN);
        let recent_completions = habits::completions_since(self.conn, user, id, since)?;
        Ok(HabitDetail {
            habit,
            recent_completions,
        })
    }

    pub fn update_habit(&self, user: UserId, id: i64, update: &HabitUpdate) -> Result<Habit> {
        update.validate()?;
        let updated = self.habit_or_404(user, id)?.merged(update);
        habits::update_habit(self.conn, &updated)?;
        self.record(user, "update", "habit", id, json!({ "fields": update.changed_fields() }))?;
        Ok(updated)
    }

    pub fn delete_habit(&self, user: UserId, id: i64) -> Result<()> {
        if !habits::delete_habit(self.conn, user, id)? {
            return Err(DashboardError::NotFound("habit"));
        }
        self.record(user, "delete", "habit", id, json!({}))
    }

    /// Re-derive the streak counters from the full completion history.
    fn refresh_streaks(&self, habit: &Habit) -> Result<Habit> {
        let dates = habits::completion_dates(self.conn, habit.user_id, habit.id)?;
        let refreshed = habit.with_streaks(&dates, self.today);
        habits::update_habit(self.conn, &refreshed)?;
        Ok(refreshed)
    }

    pub fn complete_habit(&self, user: UserId, id: i64, done: &NewCompletion) -> Result<HabitCompleted> {
        let tx = self.conn.unchecked_transaction()?;
        let habit = self.habit_or_404(user, id)?;

        let Some(completion) = habits::insert_completion(self.conn, user, id, done)? else {
            warn!("Habit {} already completed on {} by user {}", id, done.completion_date, user);
            return Err(DashboardError::conflict(format!(
                "habit already completed on {}",
                done.completion_date
            )));
        };

        let habit = self.refresh_streaks(&habit)?;
        self.record(
            user,
            "complete",
            "habit",
            id,
            json!({
                "date": completion.completion_date,
                "current_streak": habit.current_streak,
            }),
        )?;
        tx.commit()?;
        Ok(HabitCompleted { completion, habit })
    }

    pub fn uncomplete_habit(&self, user: UserId, id: i64, date: NaiveDate) -> Result<Habit> {
        let tx = self.conn.unchecked_transaction()?;
        let habit = self.habit_or_404(user, id)?;

        if !habits::delete_completion(self.conn, user, id, date)? {
            return Err(DashboardError::NotFound("habit completion"));
        }

        let habit = self.refresh_streaks(&habit)?;
        self.record(
            user,
            "uncomplete",
            "habit",
            id,
            json!({ "date": date, "current_streak": habit.current_streak }),
        )?;
        tx.commit()?;
        Ok(habit)
    }

    pub fn habit_stats(&self, user: UserId) -> Result<HabitStats> {
        let habits = self
            .store()
            .fetch_habits(user)?
            .into_iter()
            .map(|habit| self.as_of_today(habit))
            .collect::<Result<Vec<_>>>()?;
        Ok(habit_stats(&habits, self.habit_completions_today(user)?))
    }
}
