// 📊 Statistics Assembler
//
// Composes the resolver, streak and summary building blocks into the
// per-domain views returned to handlers. Every function here is pure: the
// caller fetches a consistent snapshot and passes it in, together with the
// reference date and goal values.

pub mod finance;
pub mod habit;
pub mod journal;
pub mod sport;
pub mod travel;
pub mod water;

pub use finance::{
    finance_summary, recent_transactions, top_categories, CategoryTotal, FinanceInputs,
    FinanceStats, FinanceSummary,
};
pub use habit::{habit_stats, HabitStats};
pub use journal::{journal_stats, JournalStats, MoodCount, TagCount};
pub use sport::{
    sport_daily, sport_overview, sport_weekly, SportDailyStats, SportLog, SportOverview,
    SportWeeklyStats,
};
pub use travel::{travel_dashboard, travel_stats, ContinentStats, TravelDashboard, TravelStats};
pub use water::{
    water_history, water_recommendation, water_stats, water_stats_window, Priority, WaterHistoryDay,
    WaterRecommendation, WaterStats,
};
