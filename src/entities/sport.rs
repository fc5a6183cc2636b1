// 🏃 Sport Entity - Hydration, meals, workouts and fitness goals

use super::{check_len, check_range, UserId};
use crate::error::Result;
use crate::summary::{AmountKind, AmountRecord};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_WATER_ML_PER_DAY: i64 = 3000;
pub const DEFAULT_KCAL_PER_DAY: i64 = 2200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportWater {
    pub id: i64,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub ml: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSportWater {
    pub date: NaiveDate,
    pub ml: i64,
}

impl NewSportWater {
    pub fn validate(&self) -> Result<()> {
        check_range("ml", self.ml, 1, 10_000)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportFood {
    pub id: i64,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub name: String,
    pub kcal: i64,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSportFood {
    pub date: NaiveDate,
    pub name: String,
    pub kcal: i64,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub carbs: Option<f64>,
    #[serde(default)]
    pub fat: Option<f64>,
}

impl NewSportFood {
    pub fn validate(&self) -> Result<()> {
        check_len("name", &self.name, 1, 255)?;
        check_range("kcal", self.kcal, 0, 20_000)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportWorkout {
    pub id: i64,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub name: String,
    pub duration_min: i64,
    pub kcal_burned: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSportWorkout {
    pub date: NaiveDate,
    pub name: String,
    pub duration_min: i64,
    pub kcal_burned: i64,
}

impl NewSportWorkout {
    pub fn validate(&self) -> Result<()> {
        check_len("name", &self.name, 1, 255)?;
        check_range("duration_min", self.duration_min, 1, 1440)?;
        check_range("kcal_burned", self.kcal_burned, 0, 20_000)?;
        Ok(())
    }
}

impl From<&SportWater> for AmountRecord {
    fn from(water: &SportWater) -> Self {
        AmountRecord::new(water.date, water.ml as f64, AmountKind::Ml)
    }
}

impl From<&SportFood> for AmountRecord {
    fn from(food: &SportFood) -> Self {
        AmountRecord::new(food.date, food.kcal as f64, AmountKind::Kcal)
    }
}

impl From<&SportWorkout> for AmountRecord {
    fn from(workout: &SportWorkout) -> Self {
        AmountRecord::new(workout.date, workout.kcal_burned as f64, AmountKind::Kcal)
    }
}

// ============================================================================
// GOALS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportGoals {
    pub id: i64,
    pub user_id: UserId,
    pub water_ml_per_day: i64,
    pub kcal_per_day: i64,
    pub updated_at: DateTime<Utc>,
}

impl SportGoals {
    pub fn defaults(user_id: UserId) -> Self {
        SportGoals {
            id: 0,
            user_id,
            water_ml_per_day: DEFAULT_WATER_ML_PER_DAY,
            kcal_per_day: DEFAULT_KCAL_PER_DAY,
            updated_at: Utc::now(),
        }
    }

    pub fn merged(&self, update: &SportGoalsUpdate) -> SportGoals {
        let mut next = self.clone();
        if let Some(water) = update.water_ml_per_day {
            next.water_ml_per_day = water;
        }
        if let Some(kcal) = update.kcal_per_day {
            next.kcal_per_day = kcal;
        }
        next.updated_at = Utc::now();
        next
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SportGoalsUpdate {
    pub water_ml_per_day: Option<i64>,
    pub kcal_per_day: Option<i64>,
}

impl SportGoalsUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(water) = self.water_ml_per_day {
            check_range("water_ml_per_day", water, 500, 10_000)?;
        }
        if let Some(kcal) = self.kcal_per_day {
            check_range("kcal_per_day", kcal, 800, 10_000)?;
        }
        Ok(())
    }

    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.water_ml_per_day.is_some() {
            fields.push("water_ml_per_day");
        }
        if self.kcal_per_day.is_some() {
            fields.push("kcal_per_day");
        }
        fields
    }
}
