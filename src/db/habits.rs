use super::{is_constraint_violation, Page};
use crate::entities::{Habit, HabitCompletion, NewCompletion, NewHabit, UserId};
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

const HABIT_COLUMNS: &str = "id, user_id, title, description, icon, color, category, frequency,
    difficulty, target_count, current_streak, longest_streak, total_completions, is_active,
    is_paused, created_at, updated_at";

const COMPLETION_COLUMNS: &str =
    "id, habit_id, user_id, completion_date, completion_time, notes";

fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
    Ok(Habit {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        icon: row.get(4)?,
        color: row.get(5)?,
        category: row.get(6)?,
        frequency: row.get(7)?,
        difficulty: row.get(8)?,
        target_count: row.get(9)?,
        current_streak: row.get(10)?,
        longest_streak: row.get(11)?,
        total_completions: row.get(12)?,
        is_active: row.get(13)?,
        is_paused: row.get(14)?,
        created_at: row.get(15)?,
        updated_at: row.get(16)?,
    })
}

fn completion_from_row(row: &Row<'_>) -> rusqlite::Result<HabitCompletion> {
    Ok(HabitCompletion {
        id: row.get(0)?,
        habit_id: row.get(1)?,
        user_id: row.get(2)?,
        completion_date: row.get(3)?,
        completion_time: row.get(4)?,
        notes: row.get(5)?,
    })
}

pub fn insert_habit(conn: &Connection, user: UserId, habit: &NewHabit) -> Result<Habit> {
    conn.execute(
        "INSERT INTO habits (
            user_id, title, description, icon, color, category, frequency, difficulty,
            target_count, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            user,
            habit.title.trim(),
            habit.description,
            habit.icon,
            habit.color,
            habit.category,
            habit.frequency,
            habit.difficulty,
            habit.target_count,
            Utc::now(),
        ],
    )
    .context("Failed to insert habit")?;

    let id = conn.last_insert_rowid();
    get_habit(conn, user, id)?.context("Inserted habit vanished")
}

pub fn get_habit(conn: &Connection, user: UserId, id: i64) -> Result<Option<Habit>> {
    let habit = conn
        .query_row(
            &format!("SELECT {} FROM habits WHERE id = ?1 AND user_id = ?2", HABIT_COLUMNS),
            params![id, user],
            habit_from_row,
        )
        .optional()?;
    Ok(habit)
}

/// Newest first
pub fn list_habits(conn: &Connection, user: UserId, active_only: bool, page: Page) -> Result<Vec<Habit>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM habits
         WHERE user_id = ?1 AND (?2 = 0 OR is_active = 1)
         ORDER BY created_at DESC, id DESC
         LIMIT ?3 OFFSET ?4",
        HABIT_COLUMNS
    ))?;

    let habits = stmt
        .query_map(params![user, active_only, page.limit, page.skip], habit_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(habits)
}

/// Persist every mutable column of `habit`.
pub fn update_habit(conn: &Connection, habit: &Habit) -> Result<()> {
    conn.execute(
        "UPDATE habits SET
            title = ?1, description = ?2, icon = ?3, color = ?4, category = ?5,
            frequency = ?6, difficulty = ?7, target_count = ?8, current_streak = ?9,
            longest_streak = ?10, total_completions = ?11, is_active = ?12, is_paused = ?13,
            updated_at = ?14
         WHERE id = ?15 AND user_id = ?16",
        params![
            habit.title,
            habit.description,
            habit.icon,
            habit.color,
            habit.category,
            habit.frequency,
            habit.difficulty,
            habit.target_count,
            habit.current_streak,
            habit.longest_streak,
            habit.total_completions,
            habit.is_active,
            habit.is_paused,
            habit.updated_at,
            habit.id,
            habit.user_id,
        ],
    )
    .context("Failed to update habit")?;
    Ok(())
}

/// Remove a habit and its completions. Returns false when nothing matched.
pub fn delete_habit(conn: &Connection, user: UserId, id: i64) -> Result<bool> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "DELETE FROM habit_completions WHERE habit_id = ?1 AND user_id = ?2",
        params![id, user],
    )?;
    let deleted = tx.execute(
        "DELETE FROM habits WHERE id = ?1 AND user_id = ?2",
        params![id, user],
    )?;
    tx.commit()?;
    Ok(deleted > 0)
}

// ============================================================================
// COMPLETIONS
// ============================================================================

/// Record a completion. `None` if the habit was already completed that day.
pub fn insert_completion(
    conn: &Connection,
    user: UserId,
    habit_id: i64,
    completion: &NewCompletion,
) -> Result<Option<HabitCompletion>> {
    let result = conn.execute(
        "INSERT INTO habit_completions (habit_id, user_id, completion_date, completion_time, notes)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            habit_id,
            user,
            completion.completion_date,
            Utc::now(),
            completion.notes,
        ],
    );

    match result {
        Ok(_) => {
            let id = conn.last_insert_rowid();
            let inserted = conn.query_row(
                &format!("SELECT {} FROM habit_completions WHERE id = ?1", COMPLETION_COLUMNS),
                params![id],
                completion_from_row,
            )?;
            Ok(Some(inserted))
        }
        Err(err) if is_constraint_violation(&err) => Ok(None),
        Err(err) => Err(err).context("Failed to insert habit completion"),
    }
}

pub fn delete_completion(conn: &Connection, user: UserId, habit_id: i64, date: NaiveDate) -> Result<bool> {
    let deleted = conn.execute(
        "DELETE FROM habit_completions
         WHERE habit_id = ?1 AND user_id = ?2 AND completion_date = ?3",
        params![habit_id, user, date],
    )?;
    Ok(deleted > 0)
}

/// Every completion date of a habit, oldest first
pub fn completion_dates(conn: &Connection, user: UserId, habit_id: i64) -> Result<Vec<NaiveDate>> {
    let mut stmt = conn.prepare(
        "SELECT completion_date FROM habit_completions
         WHERE habit_id = ?1 AND user_id = ?2
         ORDER BY completion_date",
    )?;
    let dates = stmt
        .query_map(params![habit_id, user], |row| row.get(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(dates)
}

/// Completions on or after `since`, newest first
pub fn completions_since(
    conn: &Connection,
    user: UserId,
    habit_id: i64,
    since: NaiveDate,
) -> Result<Vec<HabitCompletion>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM habit_completions
         WHERE habit_id = ?1 AND user_id = ?2 AND completion_date >= ?3
         ORDER BY completion_date DESC",
        COMPLETION_COLUMNS
    ))?;
    let completions = stmt
        .query_map(params![habit_id, user, since], completion_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(completions)
}

pub fn count_completions_on(conn: &Connection, user: UserId, day: NaiveDate) -> Result<usize> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM habit_completions WHERE user_id = ?1 AND completion_date = ?2",
        params![user, day],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::test_conn;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    fn complete(conn: &Connection, habit_id: i64, d: u32) -> Option<HabitCompletion> {
        let completion = NewCompletion {
            completion_date: date(d),
            notes: None,
        };
        insert_completion(conn, 1, habit_id, &completion).unwrap()
    }

    #[test]
    fn test_insert_and_get_habit() {
        let conn = test_conn();
        let habit = insert_habit(&conn, 1, &NewHabit::titled("  Meditate ")).unwrap();

        assert_eq!(habit.title, "Meditate");
        assert_eq!(habit.current_streak, 0);
        assert!(habit.is_active);
        assert_eq!(get_habit(&conn, 1, habit.id).unwrap(), Some(habit.clone()));
        assert_eq!(get_habit(&conn, 2, habit.id).unwrap(), None);
    }

    #[test]
    fn test_list_habits_filters_and_pages() {
        let conn = test_conn();
        let first = insert_habit(&conn, 1, &NewHabit::titled("Run")).unwrap();
        insert_habit(&conn, 1, &NewHabit::titled("Read")).unwrap();
        insert_habit(&conn, 2, &NewHabit::titled("Other user")).unwrap();

        let mut paused = first.clone();
        paused.is_active = false;
        update_habit(&conn, &paused).unwrap();

        assert_eq!(list_habits(&conn, 1, false, Page::first(10)).unwrap().len(), 2);
        let active = list_habits(&conn, 1, true, Page::first(10)).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].title, "Read");
        assert_eq!(list_habits(&conn, 1, false, Page::new(1, 10)).unwrap().len(), 1);
    }

    #[test]
    fn test_completion_is_unique_per_day() {
        let conn = test_conn();
        let habit = insert_habit(&conn, 1, &NewHabit::titled("Stretch")).unwrap();

        assert!(complete(&conn, habit.id, 3).is_some());
        assert!(complete(&conn, habit.id, 3).is_none());
        assert!(complete(&conn, habit.id, 4).is_some());

        assert_eq!(completion_dates(&conn, 1, habit.id).unwrap(), vec![date(3), date(4)]);
        assert_eq!(count_completions_on(&conn, 1, date(4)).unwrap(), 1);
        assert_eq!(completions_since(&conn, 1, habit.id, date(4)).unwrap().len(), 1);

        assert!(delete_completion(&conn, 1, habit.id, date(3)).unwrap());
        assert!(!delete_completion(&conn, 1, habit.id, date(3)).unwrap());
    }

    #[test]
    fn test_delete_habit_removes_completions() {
        let conn = test_conn();
        let habit = insert_habit(&conn, 1, &NewHabit::titled("Journal")).unwrap();
        complete(&conn, habit.id, 1);

        assert!(!delete_habit(&conn, 2, habit.id).unwrap());
        assert!(delete_habit(&conn, 1, habit.id).unwrap());
        assert!(completion_dates(&conn, 1, habit.id).unwrap().is_empty());
    }
}
