use crate::period::DateWindow;
use crate::streak::goal_streak;
use crate::summary::{daily_totals, round_to, summarize, AmountRecord, GoalProgress, WeatherHint};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Days averaged by the trailing weekly figure. Fixed denominator.
const WEEK_DAYS: u32 = 7;
const MAX_GLASS: i64 = 250;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterStats {
    pub today_total: i64,
    pub daily_goal: i64,
    pub progress_percentage: f64,
    pub entries_today: usize,
    pub average_per_entry: f64,
    pub remaining_to_goal: i64,
    /// Consecutive days, ending today, at or above the goal
    pub streak_days: u32,
    /// Total of the last seven days divided by seven
    pub weekly_average: f64,
}

/// Dates `water_stats` reads: the streak lookback, never shorter than a week.
pub fn water_stats_window(today: NaiveDate, max_lookback: u32) -> DateWindow {
    DateWindow::trailing(today, max_lookback.max(WEEK_DAYS))
}

/// Today's intake figures.
///
/// `records` should cover `water_stats_window(today, max_lookback)`; anything
/// older is ignored.
pub fn water_stats(
    records: &[AmountRecord],
    today: NaiveDate,
    daily_goal: i64,
    max_lookback: u32,
) -> WaterStats {
    let today_summary = summarize(records, &DateWindow::single_day(today));
    let today_total = today_summary.total();
    let progress = GoalProgress::new(today_total, daily_goal as f64);

    let lookback = DateWindow::trailing(today, max_lookback);
    let totals = daily_totals(records, &lookback);
    let streak_days = goal_streak(daily_goal as f64, today, max_lookback, |day| {
        totals.get(&day).copied().unwrap_or(0.0)
    });

    let week = summarize(records, &DateWindow::trailing(today, WEEK_DAYS));
    let weekly_average = week.total() / f64::from(WEEK_DAYS);

    WaterStats {
        today_total: today_total.round() as i64,
        daily_goal,
        progress_percentage: round_to(progress.progress_percentage, 1),
        entries_today: today_summary.count,
        average_per_entry: round_to(today_summary.average, 1),
        remaining_to_goal: progress.remaining.round() as i64,
        streak_days,
        weekly_average: round_to(weekly_average, 1),
    }
}

// ============================================================================
// HISTORY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterHistoryDay {
    pub date: NaiveDate,
    pub total_amount: i64,
    pub entries_count: usize,
    pub goal_met: bool,
}

/// One row per day of `window`, oldest first, including empty days.
pub fn water_history(
    records: &[AmountRecord],
    window: &DateWindow,
    daily_goal: i64,
) -> Vec<WaterHistoryDay> {
    window
        .days()
        .map(|day| {
            let summary = summarize(records, &DateWindow::single_day(day));
            let total_amount = summary.total().round() as i64;
            WaterHistoryDay {
                date: day,
                total_amount,
                entries_count: summary.count,
                goal_met: total_amount >= daily_goal,
            }
        })
        .collect()
}

// ============================================================================
// RECOMMENDATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterRecommendation {
    pub message: String,
    pub priority: Priority,
    pub remaining_amount: i64,
    pub percentage: f64,
    pub recommended_glass_size: i64,
}

pub fn water_recommendation(
    today_total: i64,
    daily_goal: i64,
    weather: Option<WeatherHint>,
) -> WaterRecommendation {
    let progress = GoalProgress::new(today_total as f64, daily_goal as f64);
    let percentage = progress.progress_percentage;

    let (mut message, priority) = if percentage < 25.0 {
        ("Start your day with a glass of water!".to_string(), Priority::High)
    } else if percentage < 50.0 {
        ("Keep hydrating! You're making good progress.".to_string(), Priority::Medium)
    } else if percentage < 75.0 {
        ("Great job! You're more than halfway there.".to_string(), Priority::Low)
    } else if percentage < 100.0 {
        ("Almost there! Just a bit more to reach your goal.".to_string(), Priority::Low)
    } else {
        ("Excellent! You've reached your daily goal!".to_string(), Priority::None)
    };

    if weather == Some(WeatherHint::Hot) {
        message.push_str(" It's hot today, so consider drinking a bit more!");
    }

    let remaining_amount = WeatherHint::adjust(weather, progress.remaining.round() as i64);
    let recommended_glass_size = if remaining_amount > 0 {
        remaining_amount.min(MAX_GLASS)
    } else {
        MAX_GLASS
    };

    WaterRecommendation {
        message,
        priority,
        remaining_amount,
        percentage: round_to(percentage, 1),
        recommended_glass_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::AmountKind;
    use chrono::Days;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn ml(days_ago: u64, amount: f64) -> AmountRecord {
        AmountRecord::new(today() - Days::new(days_ago), amount, AmountKind::Ml)
    }

    #[test]
    fn test_today_progress() {
        let records = vec![ml(0, 1000.0), ml(0, 500.0), ml(0, 300.0)];
        let stats = water_stats(&records, today(), 2500, 365);

        assert_eq!(stats.today_total, 1800);
        assert_eq!(stats.progress_percentage, 72.0);
        assert_eq!(stats.remaining_to_goal, 700);
        assert_eq!(stats.entries_today, 3);
        assert_eq!(stats.average_per_entry, 600.0);
        assert_eq!(stats.streak_days, 0);
    }

    #[test]
    fn test_stats_window_covers_a_week() {
        let short = water_stats_window(today(), 3);
        assert_eq!(short.start, today() - Days::new(6));
        assert_eq!(short.end, today());

        let long = water_stats_window(today(), 30);
        assert_eq!(long.start, today() - Days::new(29));
    }

    #[test]
    fn test_empty_day() {
        let stats = water_stats(&[], today(), 2500, 365);
        assert_eq!(stats.today_total, 0);
        assert_eq!(stats.average_per_entry, 0.0);
        assert_eq!(stats.remaining_to_goal, 2500);
        assert_eq!(stats.weekly_average, 0.0);
    }

    #[test]
    fn test_goal_streak_walks_back_from_today() {
        let records = vec![
            ml(0, 2000.0),
            ml(0, 600.0),
            ml(1, 2500.0),
            ml(2, 3000.0),
            ml(3, 100.0),
            ml(4, 4000.0),
        ];
        let stats = water_stats(&records, today(), 2500, 365);
        assert_eq!(stats.streak_days, 3);
    }

    #[test]
    fn test_goal_streak_respects_lookback() {
        let records: Vec<AmountRecord> = (0..20).map(|n| ml(n, 3000.0)).collect();
        let stats = water_stats(&records, today(), 2500, 10);
        assert_eq!(stats.streak_days, 10);
    }

    #[test]
    fn test_weekly_average_has_fixed_denominator() {
        // Only two days in the last week have data; day 7 is outside it.
        let records = vec![ml(0, 1400.0), ml(6, 700.0), ml(7, 7000.0)];
        let stats = water_stats(&records, today(), 2500, 365);
        assert_eq!(stats.weekly_average, 300.0);
    }

    #[test]
    fn test_history_includes_empty_days() {
        let records = vec![ml(0, 2500.0), ml(2, 300.0), ml(2, 200.0)];
        let window = DateWindow::trailing(today(), 3);
        let history = water_history(&records, &window, 2500);

        assert_eq!(history.len(), 3);
        assert_eq!(history[0].total_amount, 500);
        assert_eq!(history[0].entries_count, 2);
        assert!(!history[0].goal_met);
        assert_eq!(history[1].total_amount, 0);
        assert!(history[2].goal_met);
    }

    #[test]
    fn test_recommendation_bands() {
        let low = water_recommendation(200, 2500, None);
        assert_eq!(low.priority, Priority::High);
        assert_eq!(low.recommended_glass_size, 250);

        let done = water_recommendation(2600, 2500, None);
        assert_eq!(done.priority, Priority::None);
        assert_eq!(done.remaining_amount, 0);
        assert_eq!(done.recommended_glass_size, 250);
    }

    #[test]
    fn test_recommendation_weather() {
        let sunny = water_recommendation(1800, 2500, WeatherHint::from_description("sunny"));
        assert_eq!(sunny.percentage, 72.0);
        assert_eq!(sunny.remaining_amount, 840);
        assert!(sunny.message.contains("hot today"));

        let cold = water_recommendation(1800, 2500, Some(WeatherHint::Cold));
        assert_eq!(cold.remaining_amount, 630);

        let nearly = water_recommendation(2400, 2500, None);
        assert_eq!(nearly.recommended_glass_size, 100);
    }
}
