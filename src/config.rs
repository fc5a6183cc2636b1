// ⚙️ Settings - Environment-driven configuration for the CLI and server

use anyhow::{Context, Result};
use dotenv::dotenv;
use log::info;
use std::env::var;
use std::str::FromStr;

pub const DEFAULT_DB_PATH: &str = "dashboard.db";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_WATER_GOAL: i64 = 2500;
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub db_path: String,
    pub bind_addr: String,
    /// Daily water goal (ml) used when a user has none stored yet
    pub default_water_goal: i64,
    /// Upper bound on days walked back by the water goal streak
    pub streak_lookback_days: u32,
    /// Largest `limit` a list request may ask for
    pub page_limit: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            db_path: DEFAULT_DB_PATH.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            default_water_goal: DEFAULT_WATER_GOAL,
            streak_lookback_days: crate::streak::DEFAULT_LOOKBACK_DAYS,
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// Process start-up for both binaries: `.env`, then the logger, then settings.
///
/// The logger reads `RUST_LOG`, which may come from `.env`.
pub fn init() -> Result<Settings> {
    let env_file = dotenv();
    let _ = pretty_env_logger::try_init();
    match env_file {
        Ok(path) => info!("Loaded {}", path.display()),
        Err(err) => info!("No .env file loaded: {}", err),
    }
    Settings::load()
}

impl Settings {
    /// Read the process environment. Call `init` first to pick up `.env`.
    pub fn load() -> Result<Settings> {
        Settings::from_lookup(|key| var(key).ok())
    }

    /// Build settings from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Settings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();

        let settings = Settings {
            db_path: lookup("DASHBOARD_DB_PATH").unwrap_or(defaults.db_path),
            bind_addr: lookup("DASHBOARD_BIND_ADDR").unwrap_or(defaults.bind_addr),
            default_water_goal: parse_or(
                &lookup,
                "DASHBOARD_DEFAULT_WATER_GOAL",
                defaults.default_water_goal,
            )?,
            streak_lookback_days: parse_or(
                &lookup,
                "DASHBOARD_STREAK_LOOKBACK_DAYS",
                defaults.streak_lookback_days,
            )?,
            page_limit: parse_or(&lookup, "DASHBOARD_PAGE_LIMIT", defaults.page_limit)?,
        };

        if settings.default_water_goal <= 0 {
            anyhow::bail!("DASHBOARD_DEFAULT_WATER_GOAL must be positive");
        }
        if settings.streak_lookback_days == 0 {
            anyhow::bail!("DASHBOARD_STREAK_LOOKBACK_DAYS must be at least 1");
        }
        if settings.page_limit == 0 {
            anyhow::bail!("DASHBOARD_PAGE_LIMIT must be at least 1");
        }

        Ok(settings)
    }

    /// Clamp a requested page size to `1..=page_limit`.
    pub fn clamp_limit(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.page_limit).clamp(1, self.page_limit)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: '{}'", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_init_is_repeatable() {
        let first = init().unwrap();
        let second = init().unwrap();
        assert_eq!(first, second);
        assert_eq!(first, Settings::load().unwrap());
    }

    #[test]
    fn test_defaults() {
        let settings = settings_from(&[]).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.default_water_goal, 2500);
        assert_eq!(settings.streak_lookback_days, 365);
    }

    #[test]
    fn test_overrides() {
        let settings = settings_from(&[
            ("DASHBOARD_DB_PATH", "/tmp/life.db"),
            ("DASHBOARD_DEFAULT_WATER_GOAL", " 3000 "),
            ("DASHBOARD_STREAK_LOOKBACK_DAYS", "30"),
        ])
        .unwrap();
        assert_eq!(settings.db_path, "/tmp/life.db");
        assert_eq!(settings.default_water_goal, 3000);
        assert_eq!(settings.streak_lookback_days, 30);
        assert_eq!(settings.bind_addr, DEFAULT_BIND_ADDR);
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        let err = settings_from(&[("DASHBOARD_PAGE_LIMIT", "lots")]).unwrap_err();
        assert!(err.to_string().contains("DASHBOARD_PAGE_LIMIT"));

        assert!(settings_from(&[("DASHBOARD_DEFAULT_WATER_GOAL", "0")]).is_err());
        assert!(settings_from(&[("DASHBOARD_STREAK_LOOKBACK_DAYS", "0")]).is_err());
    }

    #[test]
    fn test_clamp_limit() {
        let settings = Settings::default();
        assert_eq!(settings.clamp_limit(None), 100);
        assert_eq!(settings.clamp_limit(Some(0)), 1);
        assert_eq!(settings.clamp_limit(Some(500)), 100);
        assert_eq!(settings.clamp_limit(Some(20)), 20);
    }
}
