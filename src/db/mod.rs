// 🗄️ Storage - SQLite schema, audit trail and per-domain queries
//
// Every query is scoped by user_id. Functions take a borrowed `Connection`
// so the CLI, the server and tests (in-memory) share the same code.

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::entities::{Difficulty, Frequency, Temperature, TransactionKind};

pub mod finance;
pub mod habits;
pub mod journal;
pub mod sport;
pub mod store;
pub mod travel;
pub mod water;

pub use store::SqliteStore;

// ============================================================================
// ENUM COLUMNS
// ============================================================================

macro_rules! sql_text_enum {
    ($($name:ty),+ $(,)?) => {
        $(
            impl ToSql for $name {
                fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                    Ok(ToSqlOutput::from(self.as_str()))
                }
            }

            impl FromSql for $name {
                fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                    value
                        .as_str()?
                        .parse()
                        .map_err(|err| FromSqlError::Other(Box::new(err)))
                }
            }
        )+
    };
}

sql_text_enum!(Frequency, Difficulty, Temperature, TransactionKind);

/// UNIQUE / CHECK failures, used to turn duplicate inserts into `None`.
pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// Offset pagination as accepted by every list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

impl Page {
    pub fn new(skip: u32, limit: u32) -> Self {
        Page { skip, limit }
    }

    pub fn first(limit: u32) -> Self {
        Page { skip: 0, limit }
    }
}

// ============================================================================
// AUDIT TRAIL
// ============================================================================

/// One audited user action
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Event {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub entity_type: String,
    pub entity_id: String,
    pub data: serde_json::Value,
    pub actor: String,
}

impl Event {
    pub fn new(
        event_type: &str,
        entity_type: &str,
        entity_id: &str,
        data: serde_json::Value,
        actor: &str,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type: event_type.to_string(),
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            data,
            actor: actor.to_string(),
        }
    }
}

pub fn insert_event(conn: &Connection, event: &Event) -> Result<()> {
    let data_json = serde_json::to_string(&event.data)?;

    conn.execute(
        "INSERT INTO events (
            event_id, timestamp, event_type, entity_type, entity_id, data, actor
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            event.event_id,
            event.timestamp.to_rfc3339(),
            event.event_type,
            event.entity_type,
            event.entity_id,
            data_json,
            event.actor,
        ],
    )?;

    Ok(())
}

fn event_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Event> {
    let timestamp_str: String = row.get(1)?;
    let data_json: String = row.get(5)?;

    Ok(Event {
        event_id: row.get(0)?,
        timestamp: DateTime::parse_from_rfc3339(&timestamp_str)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e)))?
            .with_timezone(&Utc),
        event_type: row.get(2)?,
        entity_type: row.get(3)?,
        entity_id: row.get(4)?,
        data: serde_json::from_str(&data_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e)))?,
        actor: row.get(6)?,
    })
}

/// Events for one entity, newest first
pub fn get_events_for_entity(
    conn: &Connection,
    entity_type: &str,
    entity_id: &str,
) -> Result<Vec<Event>> {
    let mut stmt = conn.prepare(
        "SELECT event_id, timestamp, event_type, entity_type, entity_id, data, actor
         FROM events
         WHERE entity_type = ?1 AND entity_id = ?2
         ORDER BY timestamp DESC, id DESC",
    )?;

    let events = stmt
        .query_map(params![entity_type, entity_id], event_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(events)
}

/// Most recent events recorded for an actor
pub fn get_events_for_actor(conn: &Connection, actor: &str, limit: u32) -> Result<Vec<Event>> {
    let mut stmt = conn.prepare(
        "SELECT event_id, timestamp, event_type, entity_type, entity_id, data, actor
         FROM events
         WHERE actor = ?1
         ORDER BY timestamp DESC, id DESC
         LIMIT ?2",
    )?;

    let events = stmt
        .query_map(params![actor, limit], event_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(events)
}

// ============================================================================
// SCHEMA
// ============================================================================

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // ==========================================================================
    // Habits
    // ==========================================================================
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS habits (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            icon TEXT NOT NULL,
            color TEXT NOT NULL,
            category TEXT NOT NULL,
            frequency TEXT NOT NULL,
            difficulty TEXT NOT NULL,
            target_count INTEGER NOT NULL DEFAULT 1,
            current_streak INTEGER NOT NULL DEFAULT 0,
            longest_streak INTEGER NOT NULL DEFAULT 0,
            total_completions INTEGER NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1,
            is_paused INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT
        );
        CREATE TABLE IF NOT EXISTS habit_completions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            habit_id INTEGER NOT NULL,
            user_id INTEGER NOT NULL,
            completion_date TEXT NOT NULL,
            completion_time TEXT NOT NULL,
            notes TEXT,
            UNIQUE (habit_id, completion_date)
        );
        CREATE INDEX IF NOT EXISTS idx_habits_user ON habits(user_id);
        CREATE INDEX IF NOT EXISTS idx_completions_user_date ON habit_completions(user_id, completion_date);",
    )?;

    // ==========================================================================
    // Water
    // ==========================================================================
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS water_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            amount INTEGER NOT NULL,
            entry_date TEXT NOT NULL,
            entry_time TEXT NOT NULL,
            drink_type TEXT NOT NULL,
            temperature TEXT NOT NULL,
            notes TEXT
        );
        CREATE TABLE IF NOT EXISTS water_goals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER UNIQUE NOT NULL,
            daily_goal INTEGER NOT NULL,
            glass_size INTEGER NOT NULL,
            reminder_enabled INTEGER NOT NULL,
            reminder_interval INTEGER NOT NULL,
            reminder_start_time TEXT NOT NULL,
            reminder_end_time TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_water_user_date ON water_entries(user_id, entry_date);",
    )?;

    // ==========================================================================
    // Finance
    // ==========================================================================
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS finance_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            amount REAL NOT NULL,
            transaction_type TEXT NOT NULL,
            category TEXT NOT NULL,
            description TEXT,
            notes TEXT,
            entry_date TEXT NOT NULL,
            entry_time TEXT NOT NULL,
            payment_method TEXT,
            location TEXT,
            tags TEXT,
            is_recurring INTEGER NOT NULL DEFAULT 0,
            recurring_frequency TEXT,
            recurring_end_date TEXT,
            idempotency_hash TEXT UNIQUE
        );
        CREATE TABLE IF NOT EXISTS finance_categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            category_type TEXT NOT NULL,
            color TEXT NOT NULL,
            icon TEXT NOT NULL,
            is_default INTEGER NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1,
            monthly_budget REAL,
            budget_warning_percentage INTEGER NOT NULL DEFAULT 80,
            created_at TEXT NOT NULL,
            updated_at TEXT
        );
        CREATE TABLE IF NOT EXISTS finance_budgets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            budget_year INTEGER NOT NULL,
            budget_month INTEGER NOT NULL,
            total_income REAL NOT NULL DEFAULT 0,
            total_expenses REAL NOT NULL DEFAULT 0,
            savings_goal REAL NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT,
            UNIQUE (user_id, budget_year, budget_month)
        );
        CREATE INDEX IF NOT EXISTS idx_finance_user_date ON finance_entries(user_id, entry_date);
        CREATE INDEX IF NOT EXISTS idx_finance_user_time ON finance_entries(user_id, entry_time);",
    )?;

    // ==========================================================================
    // Sport
    // ==========================================================================
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS sport_water (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            ml INTEGER NOT NULL,
            created_at TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS sport_food (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            name TEXT NOT NULL,
            kcal INTEGER NOT NULL,
            protein REAL,
            carbs REAL,
            fat REAL,
            created_at TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS sport_workouts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            name TEXT NOT NULL,
            duration_min INTEGER NOT NULL,
            kcal_burned INTEGER NOT NULL,
            created_at TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS sport_goals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER UNIQUE NOT NULL,
            water_ml_per_day INTEGER NOT NULL,
            kcal_per_day INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_sport_water_user_date ON sport_water(user_id, date);
        CREATE INDEX IF NOT EXISTS idx_sport_food_user_date ON sport_food(user_id, date);
        CREATE INDEX IF NOT EXISTS idx_sport_workouts_user_date ON sport_workouts(user_id, date);",
    )?;

    // ==========================================================================
    // Journal & Travel
    // ==========================================================================
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS journal_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            mood TEXT,
            weather TEXT,
            location TEXT,
            tags TEXT,
            category TEXT NOT NULL,
            is_private INTEGER NOT NULL DEFAULT 1,
            is_favorite INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT
        );
        CREATE TABLE IF NOT EXISTS travel_wishlist (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            country_iso3 TEXT NOT NULL,
            country_name TEXT NOT NULL,
            continent TEXT,
            added_date TEXT NOT NULL,
            UNIQUE (user_id, country_iso3)
        );
        CREATE TABLE IF NOT EXISTS travel_visited (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            country_iso3 TEXT NOT NULL,
            country_name TEXT NOT NULL,
            continent TEXT,
            visit_date TEXT,
            notes TEXT,
            created_at TEXT NOT NULL,
            UNIQUE (user_id, country_iso3)
        );
        CREATE INDEX IF NOT EXISTS idx_journal_user_created ON journal_entries(user_id, created_at);",
    )?;

    // ==========================================================================
    // Events Table (audit trail)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id TEXT UNIQUE NOT NULL,
            timestamp TEXT NOT NULL,
            event_type TEXT NOT NULL,
            entity_type TEXT NOT NULL,
            entity_id TEXT NOT NULL,
            data TEXT NOT NULL,
            actor TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_entity ON events(entity_type, entity_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_actor ON events(actor, timestamp)",
        [],
    )?;

    Ok(())
}
