use super::{is_constraint_violation, Page};
use crate::entities::{
    FinanceBudget, FinanceCategory, FinanceEntry, NewFinanceBudget, NewFinanceCategory,
    NewFinanceEntry, TransactionKind, UserId,
};
use crate::period::DateWindow;
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const ENTRY_COLUMNS: &str = "id, user_id, amount, transaction_type, category, description, notes,
    entry_date, entry_time, payment_method, location, tags, is_recurring, recurring_frequency,
    recurring_end_date";

const CATEGORY_COLUMNS: &str = "id, user_id, name, category_type, color, icon, is_default,
    is_active, monthly_budget, budget_warning_percentage, created_at, updated_at";

const BUDGET_COLUMNS: &str = "id, user_id, budget_year, budget_month, total_income,
    total_expenses, savings_goal, is_active, created_at, updated_at";

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<FinanceEntry> {
    Ok(FinanceEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        kind: row.get(3)?,
        category: row.get(4)?,
        description: row.get(5)?,
        notes: row.get(6)?,
        entry_date: row.get(7)?,
        entry_time: row.get(8)?,
        payment_method: row.get(9)?,
        location: row.get(10)?,
        tags: row.get(11)?,
        is_recurring: row.get(12)?,
        recurring_frequency: row.get(13)?,
        recurring_end_date: row.get(14)?,
    })
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<FinanceCategory> {
    Ok(FinanceCategory {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        category_type: row.get(3)?,
        color: row.get(4)?,
        icon: row.get(5)?,
        is_default: row.get(6)?,
        is_active: row.get(7)?,
        monthly_budget: row.get(8)?,
        budget_warning_percentage: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn budget_from_row(row: &Row<'_>) -> rusqlite::Result<FinanceBudget> {
    Ok(FinanceBudget {
        id: row.get(0)?,
        user_id: row.get(1)?,
        budget_year: row.get(2)?,
        budget_month: row.get(3)?,
        total_income: row.get(4)?,
        total_expenses: row.get(5)?,
        savings_goal: row.get(6)?,
        is_active: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

/// Optional filters for listing entries; absent fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinanceEntryFilter {
    #[serde(rename = "transaction_type")]
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

// ============================================================================
// ENTRIES
// ============================================================================

/// Insert an entry. With an idempotency `hash`, a repeated insert returns
/// `None` instead of a second row.
pub fn insert_finance_entry(
    conn: &Connection,
    user: UserId,
    entry: &NewFinanceEntry,
    today: NaiveDate,
    hash: Option<&str>,
) -> Result<Option<FinanceEntry>> {
    let result = conn.execute(
        "INSERT INTO finance_entries (
            user_id, amount, transaction_type, category, description, notes, entry_date,
            entry_time, payment_method, location, tags, idempotency_hash
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            user,
            entry.amount,
            entry.kind,
            entry.category.trim(),
            entry.description,
            entry.notes,
            entry.entry_date.unwrap_or(today),
            Utc::now(),
            entry.payment_method,
            entry.location,
            entry.tags,
            hash,
        ],
    );

    match result {
        Ok(_) => {
            let id = conn.last_insert_rowid();
            let inserted = get_finance_entry(conn, user, id)?.context("Inserted finance entry vanished")?;
            Ok(Some(inserted))
        }
        Err(err) if is_constraint_violation(&err) => Ok(None),
        Err(err) => Err(err).context("Failed to insert finance entry"),
    }
}

pub fn get_finance_entry(conn: &Connection, user: UserId, id: i64) -> Result<Option<FinanceEntry>> {
    let entry = conn
        .query_row(
            &format!("SELECT {} FROM finance_entries WHERE id = ?1 AND user_id = ?2", ENTRY_COLUMNS),
            params![id, user],
            entry_from_row,
        )
        .optional()?;
    Ok(entry)
}

/// Newest entry date first
pub fn list_finance_entries(
    conn: &Connection,
    user: UserId,
    filter: &FinanceEntryFilter,
    page: Page,
) -> Result<Vec<FinanceEntry>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM finance_entries
         WHERE user_id = ?1
           AND (?2 IS NULL OR transaction_type = ?2)
           AND (?3 IS NULL OR category = ?3)
           AND (?4 IS NULL OR entry_date >= ?4)
           AND (?5 IS NULL OR entry_date <= ?5)
         ORDER BY entry_date DESC, entry_time DESC, id DESC
         LIMIT ?6 OFFSET ?7",
        ENTRY_COLUMNS
    ))?;
    let entries = stmt
        .query_map(
            params![
                user,
                filter.kind,
                filter.category,
                filter.start_date,
                filter.end_date,
                page.limit,
                page.skip,
            ],
            entry_from_row,
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries)
}

pub fn finance_entries_between(conn: &Connection, user: UserId, window: &DateWindow) -> Result<Vec<FinanceEntry>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM finance_entries
         WHERE user_id = ?1 AND entry_date >= ?2 AND entry_date <= ?3
         ORDER BY entry_date, id",
        ENTRY_COLUMNS
    ))?;
    let entries = stmt
        .query_map(params![user, window.start, window.end], entry_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries)
}

/// Most recently recorded entries regardless of their date
pub fn recent_finance_entries(conn: &Connection, user: UserId, limit: u32) -> Result<Vec<FinanceEntry>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM finance_entries
         WHERE user_id = ?1
         ORDER BY entry_time DESC, id DESC
         LIMIT ?2",
        ENTRY_COLUMNS
    ))?;
    let entries = stmt
        .query_map(params![user, limit], entry_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries)
}

pub fn update_finance_entry(conn: &Connection, entry: &FinanceEntry) -> Result<()> {
    conn.execute(
        "UPDATE finance_entries SET
            amount = ?1, transaction_type = ?2, category = ?3, description = ?4, notes = ?5,
            payment_method = ?6, location = ?7, tags = ?8
         WHERE id = ?9 AND user_id = ?10",
        params![
            entry.amount,
            entry.kind,
            entry.category,
            entry.description,
            entry.notes,
            entry.payment_method,
            entry.location,
            entry.tags,
            entry.id,
            entry.user_id,
        ],
    )
    .context("Failed to update finance entry")?;
    Ok(())
}

pub fn delete_finance_entry(conn: &Connection, user: UserId, id: i64) -> Result<bool> {
    let deleted = conn.execute(
        "DELETE FROM finance_entries WHERE id = ?1 AND user_id = ?2",
        params![id, user],
    )?;
    Ok(deleted > 0)
}

pub fn count_finance_entries(conn: &Connection, user: UserId) -> Result<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM finance_entries WHERE user_id = ?1",
        params![user],
        |row| row.get(0),
    )?;
    Ok(count)
}

// ============================================================================
// CATEGORIES
// ============================================================================

pub fn insert_finance_category(
    conn: &Connection,
    user: UserId,
    category: &NewFinanceCategory,
) -> Result<FinanceCategory> {
    conn.execute(
        "INSERT INTO finance_categories (
            user_id, name, category_type, color, icon, monthly_budget,
            budget_warning_percentage, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            user,
            category.name.trim(),
            category.category_type,
            category.color,
            category.icon,
            category.monthly_budget,
            category.budget_warning_percentage,
            Utc::now(),
        ],
    )
    .context("Failed to insert finance category")?;

    let id = conn.last_insert_rowid();
    let inserted = conn.query_row(
        &format!("SELECT {} FROM finance_categories WHERE id = ?1", CATEGORY_COLUMNS),
        params![id],
        category_from_row,
    )?;
    Ok(inserted)
}

/// Active categories, optionally of one kind, ordered by name
pub fn list_finance_categories(
    conn: &Connection,
    user: UserId,
    kind: Option<TransactionKind>,
) -> Result<Vec<FinanceCategory>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM finance_categories
         WHERE user_id = ?1 AND is_active = 1 AND (?2 IS NULL OR category_type = ?2)
         ORDER BY name",
        CATEGORY_COLUMNS
    ))?;
    let categories = stmt
        .query_map(params![user, kind], category_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(categories)
}

// ============================================================================
// BUDGETS
// ============================================================================

/// `None` when the user already has a budget for that month.
pub fn insert_finance_budget(
    conn: &Connection,
    user: UserId,
    budget: &NewFinanceBudget,
) -> Result<Option<FinanceBudget>> {
    let result = conn.execute(
        "INSERT INTO finance_budgets (
            user_id, budget_year, budget_month, total_income, total_expenses, savings_goal,
            created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user,
            budget.budget_year,
            budget.budget_month,
            budget.total_income,
            budget.total_expenses,
            budget.savings_goal,
            Utc::now(),
        ],
    );

    match result {
        Ok(_) => {
            let id = conn.last_insert_rowid();
            let inserted = conn.query_row(
                &format!("SELECT {} FROM finance_budgets WHERE id = ?1", BUDGET_COLUMNS),
                params![id],
                budget_from_row,
            )?;
            Ok(Some(inserted))
        }
        Err(err) if is_constraint_violation(&err) => Ok(None),
        Err(err) => Err(err).context("Failed to insert finance budget"),
    }
}

/// Newest month first
pub fn list_finance_budgets(conn: &Connection, user: UserId, year: Option<i32>) -> Result<Vec<FinanceBudget>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM finance_budgets
         WHERE user_id = ?1 AND (?2 IS NULL OR budget_year = ?2)
         ORDER BY budget_year DESC, budget_month DESC",
        BUDGET_COLUMNS
    ))?;
    let budgets = stmt
        .query_map(params![user, year], budget_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(budgets)
}

pub fn get_active_budget(conn: &Connection, user: UserId, year: i32, month: u32) -> Result<Option<FinanceBudget>> {
    let budget = conn
        .query_row(
            &format!(
                "SELECT {} FROM finance_budgets
                 WHERE user_id = ?1 AND budget_year = ?2 AND budget_month = ?3 AND is_active = 1",
                BUDGET_COLUMNS
            ),
            params![user, year, month],
            budget_from_row,
        )
        .optional()?;
    Ok(budget)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::test_conn;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn add(conn: &Connection, amount: f64, kind: TransactionKind, category: &str, on: NaiveDate) -> FinanceEntry {
        let entry = NewFinanceEntry::new(amount, kind, category).on(on);
        insert_finance_entry(conn, 1, &entry, on, None).unwrap().unwrap()
    }

    #[test]
    fn test_idempotency_hash_skips_duplicates() {
        let conn = test_conn();
        let entry = NewFinanceEntry::new(45.99, TransactionKind::Expense, "Dining").on(date(12, 31));
        let hash = entry.idempotency_hash(1);

        let first = insert_finance_entry(&conn, 1, &entry, date(12, 31), Some(&hash)).unwrap();
        let second = insert_finance_entry(&conn, 1, &entry, date(12, 31), Some(&hash)).unwrap();
        assert!(first.is_some());
        assert!(second.is_none());

        // Manual entries carry no hash and may repeat
        insert_finance_entry(&conn, 1, &entry, date(12, 31), None).unwrap();
        insert_finance_entry(&conn, 1, &entry, date(12, 31), None).unwrap();
        assert_eq!(count_finance_entries(&conn, 1).unwrap(), 3);

        println!("✅ Idempotency test PASSED: duplicate import skipped");
    }

    #[test]
    fn test_list_filters() {
        let conn = test_conn();
        add(&conn, 3000.0, TransactionKind::Income, "Salary", date(5, 1));
        add(&conn, 20.0, TransactionKind::Expense, "Food", date(5, 2));
        add(&conn, 35.0, TransactionKind::Expense, "Food", date(5, 20));
        add(&conn, 60.0, TransactionKind::Expense, "Transport", date(6, 1));

        let all = list_finance_entries(&conn, 1, &FinanceEntryFilter::default(), Page::first(100)).unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].category, "Transport");

        let expenses = FinanceEntryFilter {
            kind: Some(TransactionKind::Expense),
            ..Default::default()
        };
        assert_eq!(list_finance_entries(&conn, 1, &expenses, Page::first(100)).unwrap().len(), 3);

        let may_food = FinanceEntryFilter {
            category: Some("Food".to_string()),
            start_date: Some(date(5, 1)),
            end_date: Some(date(5, 10)),
            ..Default::default()
        };
        let found = list_finance_entries(&conn, 1, &may_food, Page::first(100)).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].amount, 20.0);

        let window = DateWindow::new(date(5, 1), date(5, 31));
        assert_eq!(finance_entries_between(&conn, 1, &window).unwrap().len(), 3);
        assert_eq!(recent_finance_entries(&conn, 1, 2).unwrap().len(), 2);
    }

    #[test]
    fn test_budget_unique_per_month() {
        let conn = test_conn();
        let budget = NewFinanceBudget {
            budget_year: 2024,
            budget_month: 5,
            total_income: 4000.0,
            total_expenses: 2500.0,
            savings_goal: 800.0,
        };

        assert!(insert_finance_budget(&conn, 1, &budget).unwrap().is_some());
        assert!(insert_finance_budget(&conn, 1, &budget).unwrap().is_none());
        assert!(insert_finance_budget(&conn, 2, &budget).unwrap().is_some());

        assert!(get_active_budget(&conn, 1, 2024, 5).unwrap().is_some());
        assert!(get_active_budget(&conn, 1, 2024, 6).unwrap().is_none());
        assert_eq!(list_finance_budgets(&conn, 1, Some(2023)).unwrap().len(), 0);
        assert_eq!(list_finance_budgets(&conn, 1, None).unwrap().len(), 1);
    }

    #[test]
    fn test_categories_by_kind() {
        let conn = test_conn();
        for (name, kind) in [("Salary", TransactionKind::Income), ("Food", TransactionKind::Expense)] {
            let category = NewFinanceCategory {
                name: name.to_string(),
                category_type: kind,
                color: "#10b981".to_string(),
                icon: "💰".to_string(),
                monthly_budget: None,
                budget_warning_percentage: 80,
            };
            insert_finance_category(&conn, 1, &category).unwrap();
        }

        assert_eq!(list_finance_categories(&conn, 1, None).unwrap().len(), 2);
        let income = list_finance_categories(&conn, 1, Some(TransactionKind::Income)).unwrap();
        assert_eq!(income.len(), 1);
        assert_eq!(income[0].name, "Salary");
    }
}
