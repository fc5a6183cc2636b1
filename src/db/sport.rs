use crate::entities::{
    NewSportFood, NewSportWater, NewSportWorkout, SportFood, SportGoals, SportWater, SportWorkout,
    UserId,
};
use crate::period::DateWindow;
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

/// Inclusive, open-ended date bounds for sport listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl From<&DateWindow> for DateFilter {
    fn from(window: &DateWindow) -> Self {
        DateFilter {
            start_date: Some(window.start),
            end_date: Some(window.end),
        }
    }
}

fn water_from_row(row: &Row<'_>) -> rusqlite::Result<SportWater> {
    Ok(SportWater {
        id: row.get(0)?,
        user_id: row.get(1)?,
        date: row.get(2)?,
        ml: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn food_from_row(row: &Row<'_>) -> rusqlite::Result<SportFood> {
    Ok(SportFood {
        id: row.get(0)?,
        user_id: row.get(1)?,
        date: row.get(2)?,
        name: row.get(3)?,
        kcal: row.get(4)?,
        protein: row.get(5)?,
        carbs: row.get(6)?,
        fat: row.get(7)?,
        created_at: row.get(8)?,
    })
}

fn workout_from_row(row: &Row<'_>) -> rusqlite::Result<SportWorkout> {
    Ok(SportWorkout {
        id: row.get(0)?,
        user_id: row.get(1)?,
        date: row.get(2)?,
        name: row.get(3)?,
        duration_min: row.get(4)?,
        kcal_burned: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn goals_from_row(row: &Row<'_>) -> rusqlite::Result<SportGoals> {
    Ok(SportGoals {
        id: row.get(0)?,
        user_id: row.get(1)?,
        water_ml_per_day: row.get(2)?,
        kcal_per_day: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

/// Delete one row of a sport table owned by `user`.
fn delete_owned(conn: &Connection, table: &str, user: UserId, id: i64) -> Result<bool> {
    let deleted = conn.execute(
        &format!("DELETE FROM {} WHERE id = ?1 AND user_id = ?2", table),
        params![id, user],
    )?;
    Ok(deleted > 0)
}

// ============================================================================
// WATER
// ============================================================================

pub fn insert_sport_water(conn: &Connection, user: UserId, water: &NewSportWater) -> Result<SportWater> {
    conn.execute(
        "INSERT INTO sport_water (user_id, date, ml, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![user, water.date, water.ml, Utc::now()],
    )
    .context("Failed to insert sport water")?;

    let inserted = conn.query_row(
        "SELECT id, user_id, date, ml, created_at FROM sport_water WHERE id = ?1",
        params![conn.last_insert_rowid()],
        water_from_row,
    )?;
    Ok(inserted)
}

/// Newest date first
pub fn list_sport_water(conn: &Connection, user: UserId, filter: DateFilter) -> Result<Vec<SportWater>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, date, ml, created_at FROM sport_water
         WHERE user_id = ?1 AND (?2 IS NULL OR date >= ?2) AND (?3 IS NULL OR date <= ?3)
         ORDER BY date DESC, created_at DESC, id DESC",
    )?;
    let rows = stmt
        .query_map(params![user, filter.start_date, filter.end_date], water_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn delete_sport_water(conn: &Connection, user: UserId, id: i64) -> Result<bool> {
    delete_owned(conn, "sport_water", user, id)
}

// ============================================================================
// FOOD
// ============================================================================

pub fn insert_sport_food(conn: &Connection, user: UserId, food: &NewSportFood) -> Result<SportFood> {
    conn.execute(
        "INSERT INTO sport_food (user_id, date, name, kcal, protein, carbs, fat, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            user,
            food.date,
            food.name.trim(),
            food.kcal,
            food.protein,
            food.carbs,
            food.fat,
            Utc::now(),
        ],
    )
    .context("Failed to insert food entry")?;

    let inserted = conn.query_row(
        "SELECT id, user_id, date, name, kcal, protein, carbs, fat, created_at
         FROM sport_food WHERE id = ?1",
        params![conn.last_insert_rowid()],
        food_from_row,
    )?;
    Ok(inserted)
}

pub fn list_sport_food(conn: &Connection, user: UserId, filter: DateFilter) -> Result<Vec<SportFood>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, date, name, kcal, protein, carbs, fat, created_at FROM sport_food
         WHERE user_id = ?1 AND (?2 IS NULL OR date >= ?2) AND (?3 IS NULL OR date <= ?3)
         ORDER BY date DESC, created_at DESC, id DESC",
    )?;
    let rows = stmt
        .query_map(params![user, filter.start_date, filter.end_date], food_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn delete_sport_food(conn: &Connection, user: UserId, id: i64) -> Result<bool> {
    delete_owned(conn, "sport_food", user, id)
}

// ============================================================================
// WORKOUTS
// ============================================================================

pub fn insert_sport_workout(conn: &Connection, user: UserId, workout: &NewSportWorkout) -> Result<SportWorkout> {
    conn.execute(
        "INSERT INTO sport_workouts (user_id, date, name, duration_min, kcal_burned, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user,
            workout.date,
            workout.name.trim(),
            workout.duration_min,
            workout.kcal_burned,
            Utc::now(),
        ],
    )
    .context("Failed to insert workout")?;

    let inserted = conn.query_row(
        "SELECT id, user_id, date, name, duration_min, kcal_burned, created_at
         FROM sport_workouts WHERE id = ?1",
        params![conn.last_insert_rowid()],
        workout_from_row,
    )?;
    Ok(inserted)
}

pub fn list_sport_workouts(conn: &Connection, user: UserId, filter: DateFilter) -> Result<Vec<SportWorkout>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, date, name, duration_min, kcal_burned, created_at FROM sport_workouts
         WHERE user_id = ?1 AND (?2 IS NULL OR date >= ?2) AND (?3 IS NULL OR date <= ?3)
         ORDER BY date DESC, created_at DESC, id DESC",
    )?;
    let rows = stmt
        .query_map(params![user, filter.start_date, filter.end_date], workout_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn delete_sport_workout(conn: &Connection, user: UserId, id: i64) -> Result<bool> {
    delete_owned(conn, "sport_workouts", user, id)
}

// ============================================================================
// GOALS
// ============================================================================

pub fn get_sport_goals(conn: &Connection, user: UserId) -> Result<Option<SportGoals>> {
    let goals = conn
        .query_row(
            "SELECT id, user_id, water_ml_per_day, kcal_per_day, updated_at
             FROM sport_goals WHERE user_id = ?1",
            params![user],
            goals_from_row,
        )
        .optional()?;
    Ok(goals)
}

/// Insert or replace the user's goals row.
pub fn save_sport_goals(conn: &Connection, goals: &SportGoals) -> Result<SportGoals> {
    conn.execute(
        "INSERT INTO sport_goals (user_id, water_ml_per_day, kcal_per_day, updated_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(user_id) DO UPDATE SET
            water_ml_per_day = excluded.water_ml_per_day,
            kcal_per_day = excluded.kcal_per_day,
            updated_at = excluded.updated_at",
        params![
            goals.user_id,
            goals.water_ml_per_day,
            goals.kcal_per_day,
            goals.updated_at,
        ],
    )
    .context("Failed to save sport goals")?;

    get_sport_goals(conn, goals.user_id)?.context("Saved sport goals vanished")
}
