use super::Page;
use crate::entities::{JournalEntry, NewJournalEntry, UserId};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const ENTRY_COLUMNS: &str = "id, user_id, title, content, mood, weather, location, tags,
    category, is_private, is_favorite, created_at, updated_at";

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<JournalEntry> {
    Ok(JournalEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        mood: row.get(4)?,
        weather: row.get(5)?,
        location: row.get(6)?,
        tags: row.get(7)?,
        category: row.get(8)?,
        is_private: row.get(9)?,
        is_favorite: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalListFilter {
    pub category: Option<String>,
    pub is_favorite: Option<bool>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Start of `day` (inclusive) and start of the next day (exclusive).
fn day_bounds(day: NaiveDate) -> (DateTime<Utc>, Option<DateTime<Utc>>) {
    let start = day.and_time(chrono::NaiveTime::MIN).and_utc();
    let next = day.succ_opt().map(|next| next.and_time(chrono::NaiveTime::MIN).and_utc());
    (start, next)
}

/// Insert an entry with the given final tag string.
pub fn insert_journal_entry(
    conn: &Connection,
    user: UserId,
    entry: &NewJournalEntry,
    tags: Option<&str>,
) -> Result<JournalEntry> {
    conn.execute(
        "INSERT INTO journal_entries (
            user_id, title, content, mood, weather, location, tags, category, is_private,
            is_favorite, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            user,
            entry.title.trim(),
            entry.content,
            entry.mood,
            entry.weather,
            entry.location,
            tags,
            entry.category,
            entry.is_private,
            entry.is_favorite,
            Utc::now(),
        ],
    )
    .context("Failed to insert journal entry")?;

    let id = conn.last_insert_rowid();
    get_journal_entry(conn, user, id)?.context("Inserted journal entry vanished")
}

pub fn get_journal_entry(conn: &Connection, user: UserId, id: i64) -> Result<Option<JournalEntry>> {
    let entry = conn
        .query_row(
            &format!("SELECT {} FROM journal_entries WHERE id = ?1 AND user_id = ?2", ENTRY_COLUMNS),
            params![id, user],
            entry_from_row,
        )
        .optional()?;
    Ok(entry)
}

/// Newest first
pub fn list_journal_entries(
    conn: &Connection,
    user: UserId,
    filter: &JournalListFilter,
    page: Page,
) -> Result<Vec<JournalEntry>> {
    let from = filter.start_date.map(|day| day_bounds(day).0);
    let until = filter.end_date.and_then(|day| day_bounds(day).1);

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM journal_entries
         WHERE user_id = ?1
           AND (?2 IS NULL OR category = ?2)
           AND (?3 IS NULL OR is_favorite = ?3)
           AND (?4 IS NULL OR created_at >= ?4)
           AND (?5 IS NULL OR created_at < ?5)
         ORDER BY created_at DESC, id DESC
         LIMIT ?6 OFFSET ?7",
        ENTRY_COLUMNS
    ))?;
    let entries = stmt
        .query_map(
            params![
                user,
                filter.category,
                filter.is_favorite,
                from,
                until,
                page.limit,
                page.skip,
            ],
            entry_from_row,
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries)
}

/// Every entry of the user, newest first
pub fn all_journal_entries(conn: &Connection, user: UserId) -> Result<Vec<JournalEntry>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM journal_entries WHERE user_id = ?1 ORDER BY created_at DESC, id DESC",
        ENTRY_COLUMNS
    ))?;
    let entries = stmt
        .query_map(params![user], entry_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries)
}

pub fn update_journal_entry(conn: &Connection, entry: &JournalEntry) -> Result<()> {
    conn.execute(
        "UPDATE journal_entries SET
            title = ?1, content = ?2, mood = ?3, weather = ?4, location = ?5, tags = ?6,
            category = ?7, is_private = ?8, is_favorite = ?9, updated_at = ?10
         WHERE id = ?11 AND user_id = ?12",
        params![
            entry.title,
            entry.content,
            entry.mood,
            entry.weather,
            entry.location,
            entry.tags,
            entry.category,
            entry.is_private,
            entry.is_favorite,
            entry.updated_at,
            entry.id,
            entry.user_id,
        ],
    )
    .context("Failed to update journal entry")?;
    Ok(())
}

pub fn delete_journal_entry(conn: &Connection, user: UserId, id: i64) -> Result<bool> {
    let deleted = conn.execute(
        "DELETE FROM journal_entries WHERE id = ?1 AND user_id = ?2",
        params![id, user],
    )?;
    Ok(deleted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::test_conn;
    use crate::entities::JournalEntryUpdate;

    #[test]
    fn test_insert_list_and_update() {
        let conn = test_conn();
        let mut favorite = NewJournalEntry::new("Good day", "Long walk by the river");
        favorite.is_favorite = true;
        let first = insert_journal_entry(&conn, 1, &favorite, Some("walk,river")).unwrap();
        insert_journal_entry(&conn, 1, &NewJournalEntry::new("Plain", "Nothing much"), None).unwrap();
        insert_journal_entry(&conn, 2, &NewJournalEntry::new("Other", "Not mine"), None).unwrap();

        assert_eq!(first.tag_list(), vec!["walk", "river"]);
        assert_eq!(all_journal_entries(&conn, 1).unwrap().len(), 2);

        let favorites = JournalListFilter {
            is_favorite: Some(true),
            ..Default::default()
        };
        let found = list_journal_entries(&conn, 1, &favorites, Page::first(20)).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Good day");

        let today = Utc::now().date_naive();
        let by_day = JournalListFilter {
            start_date: Some(today),
            end_date: Some(today),
            ..Default::default()
        };
        assert_eq!(list_journal_entries(&conn, 1, &by_day, Page::first(20)).unwrap().len(), 2);

        let update = JournalEntryUpdate {
            title: Some("Great day".to_string()),
            ..Default::default()
        };
        update_journal_entry(&conn, &first.merged(&update)).unwrap();
        let stored = get_journal_entry(&conn, 1, first.id).unwrap().unwrap();
        assert_eq!(stored.title, "Great day");
        assert!(stored.updated_at.is_some());

        assert!(delete_journal_entry(&conn, 1, first.id).unwrap());
        assert_eq!(get_journal_entry(&conn, 1, first.id).unwrap(), None);
    }
}
