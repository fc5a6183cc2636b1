// Entity Models
//
// Each tracked domain has:
// - The stored row (`Habit`, `WaterEntry`, ...)
// - A `New*` payload validated at the boundary before insert
// - An `*Update` payload of optional fields, merged into a fresh value by
//   `merged()`; only the fields listed there can ever change

use crate::error::{DashboardError, Result};

/// Text-backed enum with lowercase wire/storage names.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) default $default:ident {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::error::UnknownVariant;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(crate::error::UnknownVariant::new($label, s)),
                }
            }
        }
    };
}

pub mod finance;
pub mod habit;
pub mod journal;
pub mod sport;
pub mod travel;
pub mod water;

pub use finance::{
    FinanceBudget, FinanceCategory, FinanceEntry, FinanceEntryUpdate, NewFinanceBudget,
    NewFinanceCategory, NewFinanceEntry, TransactionKind,
};
pub use habit::{
    Difficulty, Frequency, Habit, HabitCompletion, HabitUpdate, NewCompletion, NewHabit,
};
pub use journal::{JournalEntry, JournalEntryUpdate, JournalSearch, NewJournalEntry};
pub use sport::{
    NewSportFood, NewSportWater, NewSportWorkout, SportFood, SportGoals, SportGoalsUpdate,
    SportWater, SportWorkout,
};
pub use travel::{NewVisitedCountry, NewWishlistCountry, VisitedCountry, WishlistCountry};
pub use water::{NewWaterEntry, Temperature, WaterEntry, WaterEntryUpdate, WaterGoal, WaterGoalUpdate};

/// Owner of every record. Supplied by the upstream auth layer.
pub type UserId = i64;

// ============================================================================
// VALIDATION HELPERS
// ============================================================================

pub(crate) fn check_len(field: &'static str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        return Err(DashboardError::validation(
            field,
            format!("length must be between {} and {} characters", min, max),
        ));
    }
    Ok(())
}

pub(crate) fn check_max_len(field: &'static str, value: Option<&str>, max: usize) -> Result<()> {
    match value {
        Some(value) if value.chars().count() > max => Err(DashboardError::validation(
            field,
            format!("must be at most {} characters", max),
        )),
        _ => Ok(()),
    }
}

pub(crate) fn check_range<T>(field: &'static str, value: T, min: T, max: T) -> Result<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(DashboardError::validation(
            field,
            format!("must be between {} and {}, got {}", min, max, value),
        ));
    }
    Ok(())
}

pub(crate) fn check_positive(field: &'static str, value: f64) -> Result<()> {
    if !(value > 0.0) || !value.is_finite() {
        return Err(DashboardError::validation(field, "must be greater than 0"));
    }
    Ok(())
}

pub(crate) fn check_non_negative(field: &'static str, value: f64) -> Result<()> {
    if !(value >= 0.0) || !value.is_finite() {
        return Err(DashboardError::validation(field, "must not be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_len_counts_chars() {
        assert!(check_len("title", "Drink water", 1, 200).is_ok());
        assert!(check_len("title", "   ", 1, 200).is_err());
        assert!(check_len("icon", "💧", 1, 1).is_ok());
    }

    #[test]
    fn test_check_range_reports_field() {
        let err = check_range("target_count", 11, 1, 10).unwrap_err();
        assert!(err.to_string().contains("target_count"));
    }

    #[test]
    fn test_check_positive_rejects_nan() {
        assert!(check_positive("amount", f64::NAN).is_err());
        assert!(check_positive("amount", 0.0).is_err());
        assert!(check_positive("amount", 0.01).is_ok());
        assert!(check_non_negative("savings_goal", 0.0).is_ok());
    }
}
