use super::{Dashboard, Paging};
use crate::access::DataAccess;
use crate::db::finance::{self, FinanceEntryFilter};
use crate::entities::{
    FinanceBudget, FinanceCategory, FinanceEntry, FinanceEntryUpdate, NewFinanceBudget,
    NewFinanceCategory, NewFinanceEntry, TransactionKind, UserId,
};
use crate::error::{DashboardError, Result};
use crate::period::{resolve, Period};
use crate::stats::{finance_summary, FinanceInputs, FinanceSummary};
use chrono::Datelike;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;

const SUMMARY_RECENT_ENTRIES: u32 = 10;

/// Outcome of a bulk import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub inserted: usize,
    /// Rows whose idempotency hash was already stored
    pub duplicates: usize,
}

impl Dashboard<'_> {
    fn finance_entry_or_404(&self, user: UserId, id: i64) -> Result<FinanceEntry> {
        finance::get_finance_entry(self.conn, user, id)?.ok_or(DashboardError::NotFound("finance entry"))
    }

    pub fn list_finance_entries(
        &self,
        user: UserId,
        filter: &FinanceEntryFilter,
        paging: Paging,
    ) -> Result<Vec<FinanceEntry>> {
        Ok(finance::list_finance_entries(self.conn, user, filter, self.page(paging))?)
    }

    pub fn create_finance_entry(&self, user: UserId, entry: &NewFinanceEntry) -> Result<FinanceEntry> {
        entry.validate()?;
        let created = finance::insert_finance_entry(self.conn, user, entry, self.today, None)?
            .ok_or_else(|| DashboardError::conflict("finance entry already exists"))?;
        self.record(
            user,
            "create",
            "finance_entry",
            created.id,
            json!({
                "amount": created.amount,
                "transaction_type": created.kind,
                "category": created.category,
            }),
        )?;
        Ok(created)
    }

    /// Insert entries keyed by their idempotency hash; re-imported rows are skipped.
    ///
    /// Entries without a date are dated today before hashing.
    pub fn import_finance_entries(&self, user: UserId, entries: &[NewFinanceEntry]) -> Result<ImportReport> {
        for (index, entry) in entries.iter().enumerate() {
            entry.validate().map_err(|err| match err {
                DashboardError::Validation { field, reason } => DashboardError::Validation {
                    field,
                    reason: format!("row {}: {}", index + 1, reason),
                },
                other => other,
            })?;
        }

        let tx = self.conn.unchecked_transaction()?;
        let mut report = ImportReport::default();
        for entry in entries {
            let dated = entry.clone().on(entry.entry_date.unwrap_or(self.today));
            let hash = dated.idempotency_hash(user);
            match finance::insert_finance_entry(self.conn, user, &dated, self.today, Some(&hash))? {
                Some(_) => report.inserted += 1,
                None => report.duplicates += 1,
            }
        }
        self.record(
            user,
            "import",
            "finance_entry",
            "batch",
            json!({ "inserted": report.inserted, "duplicates": report.duplicates }),
        )?;
        tx.commit()?;

        info!(
            "Imported {} finance entries for user {} ({} duplicates skipped)",
            report.inserted, user, report.duplicates
        );
        Ok(report)
    }

    pub fn get_finance_entry(&self, user: UserId, id: i64) -> Result<FinanceEntry> {
        self.finance_entry_or_404(user, id)
    }

    pub fn update_finance_entry(&self, user: UserId, id: i64, update: &FinanceEntryUpdate) -> Result<FinanceEntry> {
        update.validate()?;
        let updated = self.finance_entry_or_404(user, id)?.merged(update);
        finance::update_finance_entry(self.conn, &updated)?;
        self.record(user, "update", "finance_entry", id, json!({ "fields": update.changed_fields() }))?;
        Ok(updated)
    }

    pub fn delete_finance_entry(&self, user: UserId, id: i64) -> Result<()> {
        if !finance::delete_finance_entry(self.conn, user, id)? {
            return Err(DashboardError::NotFound("finance entry"));
        }
        self.record(user, "delete", "finance_entry", id, json!({}))
    }

    // ========================================================================
    // CATEGORIES & BUDGETS
    // ========================================================================

    pub fn list_finance_categories(&self, user: UserId, kind: Option<TransactionKind>) -> Result<Vec<FinanceCategory>> {
        Ok(finance::list_finance_categories(self.conn, user, kind)?)
    }

    pub fn create_finance_category(&self, user: UserId, category: &NewFinanceCategory) -> Result<FinanceCategory> {
        category.validate()?;
        let created = finance::insert_finance_category(self.conn, user, category)?;
        self.record(
            user,
            "create",
            "finance_category",
            created.id,
            json!({ "name": created.name, "category_type": created.category_type }),
        )?;
        Ok(created)
    }

    pub fn list_finance_budgets(&self, user: UserId, year: Option<i32>) -> Result<Vec<FinanceBudget>> {
        Ok(finance::list_finance_budgets(self.conn, user, year)?)
    }

    pub fn create_finance_budget(&self, user: UserId, budget: &NewFinanceBudget) -> Result<FinanceBudget> {
        budget.validate()?;
        let Some(created) = finance::insert_finance_budget(self.conn, user, budget)? else {
            warn!(
                "Duplicate budget {}-{:02} for user {}",
                budget.budget_year, budget.budget_month, user
            );
            return Err(DashboardError::conflict(format!(
                "budget for {}-{:02} already exists",
                budget.budget_year, budget.budget_month
            )));
        };
        self.record(
            user,
            "create",
            "finance_budget",
            created.id,
            json!({ "year": created.budget_year, "month": created.budget_month }),
        )?;
        Ok(created)
    }

    // ========================================================================
    // SUMMARY
    // ========================================================================

    pub fn finance_summary(&self, user: UserId) -> Result<FinanceSummary> {
        let store = self.store();
        let year = resolve(Period::Year, self.today);
        let inputs = FinanceInputs {
            entries: store.fetch_finance_entries(user, &year)?,
            recent: store.fetch_recent_finance_entries(user, SUMMARY_RECENT_ENTRIES)?,
            categories: store.fetch_finance_categories(user)?,
            current_budget: store.fetch_budget(user, self.today.year(), self.today.month())?,
        };
        Ok(finance_summary(inputs, self.today))
    }
}
