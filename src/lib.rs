// Life Dashboard - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod access;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod import;
pub mod period;
pub mod service;
pub mod stats;
pub mod streak;
pub mod summary;

// Re-export commonly used types
pub use access::{DataAccess, LogReporter, NoopReporter, Reporter};
pub use config::Settings;
pub use db::{get_events_for_actor, get_events_for_entity, insert_event, setup_database, Event, Page, SqliteStore};
pub use error::{DashboardError, UnknownVariant};
pub use import::{load_finance_csv, read_finance_csv};
pub use period::{resolve, DateWindow, Period};
pub use service::{Dashboard, ImportReport, Overview, Paging, PeriodTotals};
pub use streak::{goal_streak, longest_run, presence_streak};
pub use summary::{daily_totals, summarize, AmountKind, AmountRecord, GoalProgress, Summary, WeatherHint};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
