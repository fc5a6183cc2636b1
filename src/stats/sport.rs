use crate::entities::{SportFood, SportGoals, SportWater, SportWorkout};
use crate::period::{resolve, DateWindow, Period};
use crate::summary::GoalProgress;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Borrowed view over a user's sport records for some window.
#[derive(Debug, Clone, Copy, Default)]
pub struct SportLog<'a> {
    pub water: &'a [SportWater],
    pub food: &'a [SportFood],
    pub workouts: &'a [SportWorkout],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportDailyStats {
    pub date: NaiveDate,
    pub water_ml: i64,
    pub kcal_intake: i64,
    pub kcal_burned: i64,
    pub net_kcal: i64,
    pub foods_count: usize,
    pub workouts_count: usize,
}

pub fn sport_daily(log: SportLog<'_>, day: NaiveDate) -> SportDailyStats {
    let water_ml = log.water.iter().filter(|w| w.date == day).map(|w| w.ml).sum();

    let foods: Vec<&SportFood> = log.food.iter().filter(|f| f.date == day).collect();
    let kcal_intake: i64 = foods.iter().map(|f| f.kcal).sum();

    let workouts: Vec<&SportWorkout> = log.workouts.iter().filter(|w| w.date == day).collect();
    let kcal_burned: i64 = workouts.iter().map(|w| w.kcal_burned).sum();

    SportDailyStats {
        date: day,
        water_ml,
        kcal_intake,
        kcal_burned,
        net_kcal: kcal_intake - kcal_burned,
        foods_count: foods.len(),
        workouts_count: workouts.len(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportWeeklyStats {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_water_ml: i64,
    pub avg_water_ml: i64,
    pub total_kcal_intake: i64,
    pub avg_kcal_intake: i64,
    pub total_kcal_burned: i64,
    pub avg_kcal_burned: i64,
    pub daily_stats: Vec<SportDailyStats>,
}

/// Monday..Sunday week containing `today`. Averages divide by 7 whatever
/// the number of recorded days.
pub fn sport_weekly(log: SportLog<'_>, today: NaiveDate) -> SportWeeklyStats {
    let week: DateWindow = resolve(Period::Week, today);
    let daily_stats: Vec<SportDailyStats> = week.days().map(|day| sport_daily(log, day)).collect();

    let total_water_ml: i64 = daily_stats.iter().map(|d| d.water_ml).sum();
    let total_kcal_intake: i64 = daily_stats.iter().map(|d| d.kcal_intake).sum();
    let total_kcal_burned: i64 = daily_stats.iter().map(|d| d.kcal_burned).sum();

    SportWeeklyStats {
        start_date: week.start,
        end_date: week.end,
        total_water_ml,
        avg_water_ml: total_water_ml / 7,
        total_kcal_intake,
        avg_kcal_intake: total_kcal_intake / 7,
        total_kcal_burned,
        avg_kcal_burned: total_kcal_burned / 7,
        daily_stats,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportOverview {
    pub goals: SportGoals,
    pub today: SportDailyStats,
    pub this_week: SportWeeklyStats,
    pub water_progress: GoalProgress,
    pub kcal_progress: GoalProgress,
}

pub fn sport_overview(log: SportLog<'_>, goals: SportGoals, today: NaiveDate) -> SportOverview {
    let day = sport_daily(log, today);
    let water_progress = GoalProgress::new(day.water_ml as f64, goals.water_ml_per_day as f64);
    let kcal_progress = GoalProgress::new(day.kcal_intake as f64, goals.kcal_per_day as f64);

    SportOverview {
        this_week: sport_weekly(log, today),
        today: day,
        goals,
        water_progress,
        kcal_progress,
    }
}
