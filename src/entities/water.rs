// 💧 Water Entity - Intake entries and the per-user daily goal

use super::{check_max_len, check_range, UserId};
use crate::error::{DashboardError, Result};
use crate::summary::{AmountKind, AmountRecord};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

text_enum! {
    Temperature ("temperature") default Room {
        Cold => "cold",
        Room => "room",
        Warm => "warm",
        Hot => "hot",
    }
}

pub const DEFAULT_GLASS_SIZE: i64 = 250;

// ============================================================================
// ENTRIES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterEntry {
    pub id: i64,
    pub user_id: UserId,
    /// Milliliters
    pub amount: i64,
    pub entry_date: NaiveDate,
    pub entry_time: DateTime<Utc>,
    pub drink_type: String,
    pub temperature: Temperature,
    pub notes: Option<String>,
}

impl WaterEntry {
    pub fn merged(&self, update: &WaterEntryUpdate) -> WaterEntry {
        let mut next = self.clone();
        if let Some(amount) = update.amount {
            next.amount = amount;
        }
        if let Some(drink_type) = &update.drink_type {
            next.drink_type = drink_type.clone();
        }
        if let Some(temperature) = update.temperature {
            next.temperature = temperature;
        }
        if let Some(notes) = &update.notes {
            next.notes = Some(notes.clone());
        }
        next
    }
}

impl From<&WaterEntry> for AmountRecord {
    fn from(entry: &WaterEntry) -> Self {
        AmountRecord::new(entry.entry_date, entry.amount as f64, AmountKind::Ml)
    }
}

fn default_drink_type() -> String {
    "water".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWaterEntry {
    pub amount: i64,
    /// Defaults to the request's "today"
    #[serde(default)]
    pub entry_date: Option<NaiveDate>,
    #[serde(default = "default_drink_type")]
    pub drink_type: String,
    #[serde(default)]
    pub temperature: Temperature,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewWaterEntry {
    pub fn glass(amount: i64) -> Self {
        NewWaterEntry {
            amount,
            entry_date: None,
            drink_type: default_drink_type(),
            temperature: Temperature::default(),
            notes: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_range("amount", self.amount, 1, 5000)?;
        check_max_len("drink_type", Some(&self.drink_type), 50)?;
        check_max_len("notes", self.notes.as_deref(), 255)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaterEntryUpdate {
    pub amount: Option<i64>,
    pub drink_type: Option<String>,
    pub temperature: Option<Temperature>,
    pub notes: Option<String>,
}

impl WaterEntryUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(amount) = self.amount {
            check_range("amount", amount, 1, 5000)?;
        }
        check_max_len("drink_type", self.drink_type.as_deref(), 50)?;
        check_max_len("notes", self.notes.as_deref(), 255)?;
        Ok(())
    }

    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.amount.is_some() {
            fields.push("amount");
        }
        if self.drink_type.is_some() {
            fields.push("drink_type");
        }
        if self.temperature.is_some() {
            fields.push("temperature");
        }
        if self.notes.is_some() {
            fields.push("notes");
        }
        fields
    }
}

// ============================================================================
// GOAL
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterGoal {
    pub id: i64,
    pub user_id: UserId,
    /// Milliliters per day
    pub daily_goal: i64,
    pub glass_size: i64,
    pub reminder_enabled: bool,
    /// Minutes between reminders
    pub reminder_interval: u32,
    pub reminder_start_time: String,
    pub reminder_end_time: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl WaterGoal {
    /// Unsaved goal with default reminder settings.
    pub fn with_daily_goal(user_id: UserId, daily_goal: i64) -> Self {
        WaterGoal {
            id: 0,
            user_id,
            daily_goal,
            glass_size: DEFAULT_GLASS_SIZE,
            reminder_enabled: true,
            reminder_interval: 120,
            reminder_start_time: "08:00".to_string(),
            reminder_end_time: "22:00".to_string(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn merged(&self, update: &WaterGoalUpdate) -> WaterGoal {
        let mut next = self.clone();
        if let Some(daily_goal) = update.daily_goal {
            next.daily_goal = daily_goal;
        }
        if let Some(glass_size) = update.glass_size {
            next.glass_size = glass_size;
        }
        if let Some(enabled) = update.reminder_enabled {
            next.reminder_enabled = enabled;
        }
        if let Some(interval) = update.reminder_interval {
            next.reminder_interval = interval;
        }
        if let Some(start) = &update.reminder_start_time {
            next.reminder_start_time = start.clone();
        }
        if let Some(end) = &update.reminder_end_time {
            next.reminder_end_time = end.clone();
        }
        next.updated_at = Some(Utc::now());
        next
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaterGoalUpdate {
    pub daily_goal: Option<i64>,
    pub glass_size: Option<i64>,
    pub reminder_enabled: Option<bool>,
    pub reminder_interval: Option<u32>,
    pub reminder_start_time: Option<String>,
    pub reminder_end_time: Option<String>,
}

fn check_clock(field: &'static str, value: Option<&str>) -> Result<()> {
    match value {
        Some(value) if NaiveTime::parse_from_str(value, "%H:%M").is_err() => Err(
            DashboardError::validation(field, format!("'{}' is not a HH:MM time", value)),
        ),
        _ => Ok(()),
    }
}

impl WaterGoalUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(daily_goal) = self.daily_goal {
            check_range("daily_goal", daily_goal, 500, 10_000)?;
        }
        if let Some(glass_size) = self.glass_size {
            check_range("glass_size", glass_size, 50, 1000)?;
        }
        if let Some(interval) = self.reminder_interval {
            check_range("reminder_interval", interval, 30, 480)?;
        }
        check_clock("reminder_start_time", self.reminder_start_time.as_deref())?;
        check_clock("reminder_end_time", self.reminder_end_time.as_deref())?;
        Ok(())
    }

    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.daily_goal.is_some() {
            fields.push("daily_goal");
        }
        if self.glass_size.is_some() {
            fields.push("glass_size");
        }
        if self.reminder_enabled.is_some() {
            fields.push("reminder_enabled");
        }
        if self.reminder_interval.is_some() {
            fields.push("reminder_interval");
        }
        if self.reminder_start_time.is_some() {
            fields.push("reminder_start_time");
        }
        if self.reminder_end_time.is_some() {
            fields.push("reminder_end_time");
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_bounds() {
        assert!(NewWaterEntry::glass(250).validate().is_ok());
        assert!(NewWaterEntry::glass(0).validate().is_err());
        assert!(NewWaterEntry::glass(5001).validate().is_err());
    }

    #[test]
    fn test_temperature_rejects_unknown_json() {
        let parsed: std::result::Result<NewWaterEntry, _> =
            serde_json::from_str(r#"{"amount": 300, "temperature": "lukewarm"}"#);
        assert!(parsed.is_err());

        let parsed: NewWaterEntry =
            serde_json::from_str(r#"{"amount": 300, "temperature": "cold"}"#).unwrap();
        assert_eq!(parsed.temperature, Temperature::Cold);
        assert_eq!(parsed.drink_type, "water");
    }

    #[test]
    fn test_goal_update_validation() {
        let ok = WaterGoalUpdate {
            daily_goal: Some(3000),
            reminder_start_time: Some("07:30".to_string()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let low = WaterGoalUpdate {
            daily_goal: Some(100),
            ..Default::default()
        };
        assert!(low.validate().is_err());

        let bad_clock = WaterGoalUpdate {
            reminder_end_time: Some("25:00".to_string()),
            ..Default::default()
        };
        assert!(bad_clock.validate().is_err());
    }

    #[test]
    fn test_goal_merge() {
        let goal = WaterGoal::with_daily_goal(3, 2500);
        let update = WaterGoalUpdate {
            glass_size: Some(300),
            ..Default::default()
        };
        let next = goal.merged(&update);
        assert_eq!(next.glass_size, 300);
        assert_eq!(next.daily_goal, 2500);
        assert_eq!(update.changed_fields(), vec!["glass_size"]);
    }
}
