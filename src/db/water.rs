use super::Page;
use crate::entities::{NewWaterEntry, UserId, WaterEntry, WaterGoal};
use crate::period::DateWindow;
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

const ENTRY_COLUMNS: &str =
    "id, user_id, amount, entry_date, entry_time, drink_type, temperature, notes";

const GOAL_COLUMNS: &str = "id, user_id, daily_goal, glass_size, reminder_enabled,
    reminder_interval, reminder_start_time, reminder_end_time, created_at, updated_at";

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<WaterEntry> {
    Ok(WaterEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        entry_date: row.get(3)?,
        entry_time: row.get(4)?,
        drink_type: row.get(5)?,
        temperature: row.get(6)?,
        notes: row.get(7)?,
    })
}

fn goal_from_row(row: &Row<'_>) -> rusqlite::Result<WaterGoal> {
    Ok(WaterGoal {
        id: row.get(0)?,
        user_id: row.get(1)?,
        daily_goal: row.get(2)?,
        glass_size: row.get(3)?,
        reminder_enabled: row.get(4)?,
        reminder_interval: row.get(5)?,
        reminder_start_time: row.get(6)?,
        reminder_end_time: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

/// Insert an entry dated `entry.entry_date`, or `today` when absent.
pub fn insert_water_entry(
    conn: &Connection,
    user: UserId,
    entry: &NewWaterEntry,
    today: NaiveDate,
) -> Result<WaterEntry> {
    conn.execute(
        "INSERT INTO water_entries (user_id, amount, entry_date, entry_time, drink_type, temperature, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user,
            entry.amount,
            entry.entry_date.unwrap_or(today),
            Utc::now(),
            entry.drink_type,
            entry.temperature,
            entry.notes,
        ],
    )
    .context("Failed to insert water entry")?;

    let id = conn.last_insert_rowid();
    get_water_entry(conn, user, id)?.context("Inserted water entry vanished")
}

pub fn get_water_entry(conn: &Connection, user: UserId, id: i64) -> Result<Option<WaterEntry>> {
    let entry = conn
        .query_row(
            &format!("SELECT {} FROM water_entries WHERE id = ?1 AND user_id = ?2", ENTRY_COLUMNS),
            params![id, user],
            entry_from_row,
        )
        .optional()?;
    Ok(entry)
}

/// Newest first, optionally restricted to a single day
pub fn list_water_entries(
    conn: &Connection,
    user: UserId,
    day: Option<NaiveDate>,
    page: Page,
) -> Result<Vec<WaterEntry>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM water_entries
         WHERE user_id = ?1 AND (?2 IS NULL OR entry_date = ?2)
         ORDER BY entry_time DESC, id DESC
         LIMIT ?3 OFFSET ?4",
        ENTRY_COLUMNS
    ))?;
    let entries = stmt
        .query_map(params![user, day, page.limit, page.skip], entry_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries)
}

/// Entries dated inside `window`, oldest first
pub fn water_entries_between(conn: &Connection, user: UserId, window: &DateWindow) -> Result<Vec<WaterEntry>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM water_entries
         WHERE user_id = ?1 AND entry_date >= ?2 AND entry_date <= ?3
         ORDER BY entry_date, entry_time",
        ENTRY_COLUMNS
    ))?;
    let entries = stmt
        .query_map(params![user, window.start, window.end], entry_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries)
}

pub fn update_water_entry(conn: &Connection, entry: &WaterEntry) -> Result<()> {
    conn.execute(
        "UPDATE water_entries SET amount = ?1, drink_type = ?2, temperature = ?3, notes = ?4
         WHERE id = ?5 AND user_id = ?6",
        params![
            entry.amount,
            entry.drink_type,
            entry.temperature,
            entry.notes,
            entry.id,
            entry.user_id,
        ],
    )
    .context("Failed to update water entry")?;
    Ok(())
}

pub fn delete_water_entry(conn: &Connection, user: UserId, id: i64) -> Result<bool> {
    let deleted = conn.execute(
        "DELETE FROM water_entries WHERE id = ?1 AND user_id = ?2",
        params![id, user],
    )?;
    Ok(deleted > 0)
}

// ============================================================================
// GOAL
// ============================================================================

pub fn get_water_goal(conn: &Connection, user: UserId) -> Result<Option<WaterGoal>> {
    let goal = conn
        .query_row(
            &format!("SELECT {} FROM water_goals WHERE user_id = ?1", GOAL_COLUMNS),
            params![user],
            goal_from_row,
        )
        .optional()?;
    Ok(goal)
}

pub fn insert_water_goal(conn: &Connection, goal: &WaterGoal) -> Result<WaterGoal> {
    conn.execute(
        "INSERT INTO water_goals (
            user_id, daily_goal, glass_size, reminder_enabled, reminder_interval,
            reminder_start_time, reminder_end_time, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            goal.user_id,
            goal.daily_goal,
            goal.glass_size,
            goal.reminder_enabled,
            goal.reminder_interval,
            goal.reminder_start_time,
            goal.reminder_end_time,
            goal.created_at,
        ],
    )
    .context("Failed to insert water goal")?;

    get_water_goal(conn, goal.user_id)?.context("Inserted water goal vanished")
}

pub fn update_water_goal(conn: &Connection, goal: &WaterGoal) -> Result<()> {
    conn.execute(
        "UPDATE water_goals SET
            daily_goal = ?1, glass_size = ?2, reminder_enabled = ?3, reminder_interval = ?4,
            reminder_start_time = ?5, reminder_end_time = ?6, updated_at = ?7
         WHERE user_id = ?8",
        params![
            goal.daily_goal,
            goal.glass_size,
            goal.reminder_enabled,
            goal.reminder_interval,
            goal.reminder_start_time,
            goal.reminder_end_time,
            goal.updated_at,
            goal.user_id,
        ],
    )
    .context("Failed to update water goal")?;
    Ok(())
}
