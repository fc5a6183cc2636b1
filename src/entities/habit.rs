// 🎯 Habit Entity - Daily habits and their completions
//
// Streak counters on the habit row are a cache: they are re-derived from
// the full completion history whenever a completion is added or removed,
// and again on every read so a missed day shows up without a write.

use super::{check_len, check_max_len, check_range, UserId};
use crate::error::Result;
use crate::streak::{longest_run, presence_streak};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

text_enum! {
    Frequency ("frequency") default Daily {
        Daily => "daily",
        Weekly => "weekly",
        Monthly => "monthly",
    }
}

text_enum! {
    Difficulty ("difficulty") default Easy {
        Easy => "easy",
        Medium => "medium",
        Hard => "hard",
    }
}

// ============================================================================
// HABIT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: i64,
    pub user_id: UserId,

    pub title: String,
    pub description: Option<String>,
    pub icon: String,
    pub color: String,
    pub category: String,

    pub frequency: Frequency,
    pub difficulty: Difficulty,
    /// Times per day
    pub target_count: u32,

    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completions: u32,

    pub is_active: bool,
    pub is_paused: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Habit {
    /// Apply the whitelisted fields of `update`, returning a new value.
    pub fn merged(&self, update: &HabitUpdate) -> Habit {
        let mut next = self.clone();
        if let Some(title) = &update.title {
            next.title = title.trim().to_string();
        }
        if let Some(description) = &update.description {
            next.description = Some(description.clone());
        }
        if let Some(icon) = &update.icon {
            next.icon = icon.clone();
        }
        if let Some(color) = &update.color {
            next.color = color.clone();
        }
        if let Some(category) = &update.category {
            next.category = category.clone();
        }
        if let Some(frequency) = update.frequency {
            next.frequency = frequency;
        }
        if let Some(difficulty) = update.difficulty {
            next.difficulty = difficulty;
        }
        if let Some(target_count) = update.target_count {
            next.target_count = target_count;
        }
        if let Some(is_active) = update.is_active {
            next.is_active = is_active;
        }
        if let Some(is_paused) = update.is_paused {
            next.is_paused = is_paused;
        }
        next.updated_at = Some(Utc::now());
        next
    }

    /// Counters as of `today`, derived from every completion date of this habit.
    ///
    /// The longest streak only ever grows. Backfilled runs that do not end
    /// today still count towards it.
    pub fn as_of(&self, completion_dates: &[NaiveDate], today: NaiveDate) -> Habit {
        let mut next = self.clone();
        next.current_streak = presence_streak(completion_dates.iter().copied(), today);
        next.longest_streak = self
            .longest_streak
            .max(longest_run(completion_dates.iter().copied()))
            .max(next.current_streak);
        next.total_completions = completion_dates.len() as u32;
        next
    }

    /// `as_of` for a write: also stamps `updated_at`.
    pub fn with_streaks(&self, completion_dates: &[NaiveDate], today: NaiveDate) -> Habit {
        let mut next = self.as_of(completion_dates, today);
        next.updated_at = Some(Utc::now());
        next
    }
}

// ============================================================================
// PAYLOADS
// ============================================================================

fn default_icon() -> String {
    "🎯".to_string()
}

fn default_color() -> String {
    "blue".to_string()
}

fn default_category() -> String {
    "personal".to_string()
}

fn default_target_count() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHabit {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "default_target_count")]
    pub target_count: u32,
}

impl NewHabit {
    pub fn titled(title: &str) -> Self {
        NewHabit {
            title: title.to_string(),
            description: None,
            icon: default_icon(),
            color: default_color(),
            category: default_category(),
            frequency: Frequency::default(),
            difficulty: Difficulty::default(),
            target_count: default_target_count(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_len("title", &self.title, 1, 200)?;
        check_len("icon", &self.icon, 1, 10)?;
        check_max_len("color", Some(&self.color), 20)?;
        check_max_len("category", Some(&self.category), 50)?;
        check_range("target_count", self.target_count, 1, 10)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HabitUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub category: Option<String>,
    pub frequency: Option<Frequency>,
    pub difficulty: Option<Difficulty>,
    pub target_count: Option<u32>,
    pub is_active: Option<bool>,
    pub is_paused: Option<bool>,
}

impl HabitUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            check_len("title", title, 1, 200)?;
        }
        check_max_len("icon", self.icon.as_deref(), 10)?;
        check_max_len("color", self.color.as_deref(), 20)?;
        check_max_len("category", self.category.as_deref(), 50)?;
        if let Some(target_count) = self.target_count {
            check_range("target_count", target_count, 1, 10)?;
        }
        Ok(())
    }

    /// Names of the fields this update touches, for the audit log.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.title.is_some() {
            fields.push("title");
        }
        if self.description.is_some() {
            fields.push("description");
        }
        if self.icon.is_some() {
            fields.push("icon");
        }
        if self.color.is_some() {
            fields.push("color");
        }
        if self.category.is_some() {
            fields.push("category");
        }
        if self.frequency.is_some() {
            fields.push("frequency");
        }
        if self.difficulty.is_some() {
            fields.push("difficulty");
        }
        if self.target_count.is_some() {
            fields.push("target_count");
        }
        if self.is_active.is_some() {
            fields.push("is_active");
        }
        if self.is_paused.is_some() {
            fields.push("is_paused");
        }
        fields
    }
}

// ============================================================================
// COMPLETIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitCompletion {
    pub id: i64,
    pub habit_id: i64,
    pub user_id: UserId,
    pub completion_date: NaiveDate,
    pub completion_time: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCompletion {
    pub completion_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

// ============================================================================
// TESTS
// ============================================================================
