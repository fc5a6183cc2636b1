use crate::entities::Habit;
use crate::summary::{ratio_percent, round_to};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitStats {
    pub total_habits: usize,
    pub active_habits: usize,
    pub completed_today: usize,
    pub total_completions: u64,
    /// Mean of `current_streak` over all habits, one decimal
    pub average_streak: f64,
    pub longest_streak: u32,
    /// completed_today / active_habits * 100, two decimals
    pub completion_rate: f64,
}

/// Overview across all of a user's habits.
///
/// `completed_today` is the number of completion records dated today.
pub fn habit_stats(habits: &[Habit], completed_today: usize) -> HabitStats {
    let total_habits = habits.len();
    let active_habits = habits.iter().filter(|h| h.is_active).count();
    let total_completions = habits.iter().map(|h| u64::from(h.total_completions)).sum();

    let average_streak = if total_habits > 0 {
        let sum: u64 = habits.iter().map(|h| u64::from(h.current_streak)).sum();
        sum as f64 / total_habits as f64
    } else {
        0.0
    };

    let longest_streak = habits.iter().map(|h| h.longest_streak).max().unwrap_or(0);

    HabitStats {
        total_habits,
        active_habits,
        completed_today,
        total_completions,
        average_streak: round_to(average_streak, 1),
        longest_streak,
        completion_rate: round_to(
            ratio_percent(completed_today as f64, active_habits as f64),
            2,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Difficulty, Frequency};
    use chrono::Utc;

    fn habit(id: i64, active: bool, current: u32, longest: u32, completions: u32) -> Habit {
        Habit {
            id,
            user_id: 1,
            title: format!("Habit {}", id),
            description: None,
            icon: "🎯".to_string(),
            color: "blue".to_string(),
            category: "personal".to_string(),
            frequency: Frequency::Daily,
            difficulty: Difficulty::Easy,
            target_count: 1,
            current_streak: current,
            longest_streak: longest,
            total_completions: completions,
            is_active: active,
            is_paused: false,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_no_habits() {
        let stats = habit_stats(&[], 0);
        assert_eq!(stats.total_habits, 0);
        assert_eq!(stats.average_streak, 0.0);
        assert_eq!(stats.longest_streak, 0);
        assert_eq!(stats.completion_rate, 0.0);
    }

    #[test]
    fn test_overview() {
        let habits = vec![
            habit(1, true, 3, 10, 40),
            habit(2, true, 0, 2, 5),
            habit(3, false, 1, 7, 12),
        ];

        let stats = habit_stats(&habits, 1);
        assert_eq!(stats.total_habits, 3);
        assert_eq!(stats.active_habits, 2);
        assert_eq!(stats.completed_today, 1);
        assert_eq!(stats.total_completions, 57);
        assert_eq!(stats.average_streak, 1.3);
        assert_eq!(stats.longest_streak, 10);
        assert_eq!(stats.completion_rate, 50.0);
    }

    #[test]
    fn test_completion_rate_without_active_habits() {
        let habits = vec![habit(1, false, 0, 0, 0)];
        assert_eq!(habit_stats(&habits, 2).completion_rate, 0.0);
    }
}
