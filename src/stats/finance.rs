use crate::entities::{FinanceBudget, FinanceCategory, FinanceEntry, TransactionKind};
use crate::period::{resolve, DateWindow, Period};
use crate::summary::{ratio_percent, summarize, AmountKind, AmountRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const TOP_CATEGORIES: usize = 5;
const TOP_CATEGORIES_TODAY: usize = 3;
const RECENT_TRANSACTIONS: usize = 10;
const RECENT_TRANSACTIONS_TODAY: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub total_amount: f64,
    pub count: usize,
}

/// Spending grouped by (category, kind) within `window`, largest first.
///
/// Equal totals are ordered by category name so the result is stable.
pub fn top_categories(entries: &[FinanceEntry], window: &DateWindow, limit: usize) -> Vec<CategoryTotal> {
    let mut groups: BTreeMap<(String, TransactionKind), (f64, usize)> = BTreeMap::new();
    for entry in entries.iter().filter(|e| window.contains(e.entry_date)) {
        let slot = groups
            .entry((entry.category.clone(), entry.kind))
            .or_insert((0.0, 0));
        slot.0 += entry.amount;
        slot.1 += 1;
    }

    let mut totals: Vec<CategoryTotal> = groups
        .into_iter()
        .map(|((category, kind), (total_amount, count))| CategoryTotal {
            category,
            kind,
            total_amount,
            count,
        })
        .collect();

    totals.sort_by(|a, b| {
        b.total_amount
            .total_cmp(&a.total_amount)
            .then_with(|| a.category.cmp(&b.category))
    });
    totals.truncate(limit);
    totals
}

/// The `limit` most recently recorded entries, newest first.
pub fn recent_transactions(entries: &[FinanceEntry], limit: usize) -> Vec<FinanceEntry> {
    let mut recent = entries.to_vec();
    recent.sort_by(|a, b| b.entry_time.cmp(&a.entry_time).then_with(|| b.id.cmp(&a.id)));
    recent.truncate(limit);
    recent
}

// ============================================================================
// SUMMARY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceStats {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_balance: f64,
    /// net / income * 100, 0 without income
    pub savings_rate: f64,
    pub monthly_budget_remaining: f64,
    pub top_categories: Vec<CategoryTotal>,
    pub recent_transactions: Vec<FinanceEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceSummary {
    pub today: FinanceStats,
    pub this_month: FinanceStats,
    pub this_year: FinanceStats,
    pub categories: Vec<FinanceCategory>,
    pub current_budget: Option<FinanceBudget>,
}

/// Snapshot needed for a finance summary.
#[derive(Debug, Clone, Default)]
pub struct FinanceInputs {
    /// Every entry of the current year (a superset is fine)
    pub entries: Vec<FinanceEntry>,
    /// Most recent entries regardless of date
    pub recent: Vec<FinanceEntry>,
    pub categories: Vec<FinanceCategory>,
    pub current_budget: Option<FinanceBudget>,
}

struct WindowTotals {
    income: f64,
    expenses: f64,
}

fn window_totals(records: &[AmountRecord], window: &DateWindow) -> WindowTotals {
    let summary = summarize(records, window);
    WindowTotals {
        income: summary.total_of(AmountKind::Income),
        expenses: summary.total_of(AmountKind::Expense),
    }
}

fn window_stats(
    totals: &WindowTotals,
    budget_remaining: f64,
    top: &[CategoryTotal],
    recent: &[FinanceEntry],
) -> FinanceStats {
    let net_balance = totals.income - totals.expenses;
    FinanceStats {
        total_income: totals.income,
        total_expenses: totals.expenses,
        net_balance,
        savings_rate: ratio_percent(net_balance, totals.income),
        monthly_budget_remaining: budget_remaining,
        top_categories: top.to_vec(),
        recent_transactions: recent.to_vec(),
    }
}

/// Day, month and year views for `today`.
///
/// Category ranking always uses the month window. The month and year views
/// carry the full top-category and recent lists; the day view carries
/// their first entries only.
pub fn finance_summary(inputs: FinanceInputs, today: NaiveDate) -> FinanceSummary {
    let records: Vec<AmountRecord> = inputs.entries.iter().map(AmountRecord::from).collect();

    let day = window_totals(&records, &resolve(Period::Today, today));
    let month_window = resolve(Period::Month, today);
    let month = window_totals(&records, &month_window);
    let year = window_totals(&records, &resolve(Period::Year, today));

    let budget_remaining = inputs
        .current_budget
        .as_ref()
        .map(|budget| (budget.total_expenses - month.expenses).max(0.0))
        .unwrap_or(0.0);

    let top = top_categories(&inputs.entries, &month_window, TOP_CATEGORIES);
    let recent = recent_transactions(&inputs.recent, RECENT_TRANSACTIONS);

    FinanceSummary {
        today: window_stats(
            &day,
            budget_remaining,
            &top[..top.len().min(TOP_CATEGORIES_TODAY)],
            &recent[..recent.len().min(RECENT_TRANSACTIONS_TODAY)],
        ),
        this_month: window_stats(&month, budget_remaining, &top, &recent),
        this_year: window_stats(&year, budget_remaining, &top, &recent),
        categories: inputs.categories,
        current_budget: inputs.current_budget,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    fn entry(id: i64, date: NaiveDate, amount: f64, kind: TransactionKind, category: &str) -> FinanceEntry {
        FinanceEntry {
            id,
            user_id: 1,
            amount,
            kind,
            category: category.to_string(),
            description: None,
            notes: None,
            entry_date: date,
            entry_time: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap() + Duration::minutes(id),
            payment_method: None,
            location: None,
            tags: None,
            is_recurring: false,
            recurring_frequency: None,
            recurring_end_date: None,
        }
    }

    fn budget(total_expenses: f64) -> FinanceBudget {
        FinanceBudget {
            id: 1,
            user_id: 1,
            budget_year: 2024,
            budget_month: 5,
            total_income: 4000.0,
            total_expenses,
            savings_goal: 500.0,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn sample() -> Vec<FinanceEntry> {
        let d = |m, d| NaiveDate::from_ymd_opt(2024, m, d).unwrap();
        vec![
            entry(1, d(1, 10), 3000.0, TransactionKind::Income, "Salary"),
            entry(2, d(5, 1), 2000.0, TransactionKind::Income, "Salary"),
            entry(3, d(5, 3), 120.0, TransactionKind::Expense, "Food"),
            entry(4, d(5, 15), 30.0, TransactionKind::Expense, "Food"),
            entry(5, d(5, 15), 100.0, TransactionKind::Income, "Gift"),
            entry(6, d(5, 10), 150.0, TransactionKind::Expense, "Transport"),
            entry(7, d(4, 28), 999.0, TransactionKind::Expense, "Rent"),
        ]
    }

    #[test]
    fn test_window_totals() {
        let entries = sample();
        let summary = finance_summary(
            FinanceInputs {
                recent: entries.clone(),
                entries,
                ..Default::default()
            },
            today(),
        );

        assert_eq!(summary.today.total_income, 100.0);
        assert_eq!(summary.today.total_expenses, 30.0);
        assert_eq!(summary.today.net_balance, 70.0);
        assert_eq!(summary.today.savings_rate, 70.0);

        assert_eq!(summary.this_month.total_income, 2100.0);
        assert_eq!(summary.this_month.total_expenses, 300.0);

        assert_eq!(summary.this_year.total_income, 5100.0);
        assert_eq!(summary.this_year.total_expenses, 1299.0);
        assert_eq!(summary.this_year.monthly_budget_remaining, 0.0);
    }

    #[test]
    fn test_savings_rate_without_income() {
        let entries = vec![entry(1, today(), 50.0, TransactionKind::Expense, "Food")];
        let summary = finance_summary(
            FinanceInputs {
                entries,
                ..Default::default()
            },
            today(),
        );
        assert_eq!(summary.today.net_balance, -50.0);
        assert_eq!(summary.today.savings_rate, 0.0);
    }

    #[test]
    fn test_top_categories_use_month_window() {
        let entries = sample();
        let window = resolve(Period::Month, today());
        let top = top_categories(&entries, &window, 5);

        assert_eq!(top[0].category, "Salary");
        assert_eq!(top[0].count, 1);
        assert_eq!(top[1].category, "Food");
        assert_eq!(top[1].total_amount, 150.0);
        assert_eq!(top[1].count, 2);
        assert!(top.iter().all(|c| c.category != "Rent"));
    }

    #[test]
    fn test_day_view_gets_first_slices() {
        let entries = sample();
        let summary = finance_summary(
            FinanceInputs {
                recent: entries.clone(),
                entries,
                ..Default::default()
            },
            today(),
        );

        assert_eq!(summary.this_month.top_categories.len(), 4);
        assert_eq!(summary.today.top_categories.len(), 3);
        assert_eq!(summary.this_year.recent_transactions.len(), 7);
        assert_eq!(summary.today.recent_transactions.len(), 5);
        assert_eq!(summary.today.recent_transactions[0].id, 7);
    }

    #[test]
    fn test_budget_remaining_is_floored() {
        let entries = sample();
        let within = finance_summary(
            FinanceInputs {
                entries: entries.clone(),
                current_budget: Some(budget(1000.0)),
                ..Default::default()
            },
            today(),
        );
        assert_eq!(within.this_month.monthly_budget_remaining, 700.0);

        let over = finance_summary(
            FinanceInputs {
                entries,
                current_budget: Some(budget(100.0)),
                ..Default::default()
            },
            today(),
        );
        assert_eq!(over.today.monthly_budget_remaining, 0.0);
    }

    #[test]
    fn test_recent_transactions_order() {
        let recent = recent_transactions(&sample(), 2);
        assert_eq!(recent.iter().map(|e| e.id).collect::<Vec<_>>(), vec![7, 6]);
    }
}
