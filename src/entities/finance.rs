// 💰 Finance Entity - Income/expense entries, categories and monthly budgets

use super::{check_len, check_max_len, check_non_negative, check_positive, check_range, UserId};
use crate::error::{DashboardError, Result};
use crate::summary::{AmountKind, AmountRecord};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

text_enum! {
    TransactionKind ("transaction_type") default Expense {
        Income => "income",
        Expense => "expense",
    }
}

impl From<TransactionKind> for AmountKind {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Income => AmountKind::Income,
            TransactionKind::Expense => AmountKind::Expense,
        }
    }
}

// ============================================================================
// ENTRIES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceEntry {
    pub id: i64,
    pub user_id: UserId,

    pub amount: f64,
    #[serde(rename = "transaction_type")]
    pub kind: TransactionKind,
    pub category: String,
    pub description: Option<String>,
    pub notes: Option<String>,

    pub entry_date: NaiveDate,
    pub entry_time: DateTime<Utc>,

    pub payment_method: Option<String>,
    pub location: Option<String>,
    /// Comma-separated
    pub tags: Option<String>,

    pub is_recurring: bool,
    pub recurring_frequency: Option<String>,
    pub recurring_end_date: Option<NaiveDate>,
}

impl FinanceEntry {
    pub fn merged(&self, update: &FinanceEntryUpdate) -> FinanceEntry {
        let mut next = self.clone();
        if let Some(amount) = update.amount {
            next.amount = amount;
        }
        if let Some(kind) = update.kind {
            next.kind = kind;
        }
        if let Some(category) = &update.category {
            next.category = category.trim().to_string();
        }
        if let Some(description) = &update.description {
            next.description = Some(description.clone());
        }
        if let Some(notes) = &update.notes {
            next.notes = Some(notes.clone());
        }
        if let Some(payment_method) = &update.payment_method {
            next.payment_method = Some(payment_method.clone());
        }
        if let Some(location) = &update.location {
            next.location = Some(location.clone());
        }
        if let Some(tags) = &update.tags {
            next.tags = Some(tags.clone());
        }
        next
    }
}

impl From<&FinanceEntry> for AmountRecord {
    fn from(entry: &FinanceEntry) -> Self {
        AmountRecord::new(entry.entry_date, entry.amount, entry.kind.into())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFinanceEntry {
    pub amount: f64,
    #[serde(rename = "transaction_type")]
    pub kind: TransactionKind,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Defaults to the request's "today"
    #[serde(default)]
    pub entry_date: Option<NaiveDate>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
}

impl NewFinanceEntry {
    pub fn new(amount: f64, kind: TransactionKind, category: &str) -> Self {
        NewFinanceEntry {
            amount,
            kind,
            category: category.to_string(),
            description: None,
            notes: None,
            entry_date: None,
            payment_method: None,
            location: None,
            tags: None,
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.entry_date = Some(date);
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_positive("amount", self.amount)?;
        check_len("category", &self.category, 1, 100)?;
        check_max_len("description", self.description.as_deref(), 255)?;
        check_max_len("payment_method", self.payment_method.as_deref(), 50)?;
        check_max_len("location", self.location.as_deref(), 255)?;
        check_max_len("tags", self.tags.as_deref(), 255)?;
        Ok(())
    }

    /// Hash used to skip re-imported rows. Manual entries carry no hash.
    pub fn idempotency_hash(&self, user_id: UserId) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!(
            "{}|{}|{}|{}|{}|{}",
            user_id,
            self.entry_date.map(|d| d.to_string()).unwrap_or_default(),
            self.amount,
            self.kind,
            self.category,
            self.description.as_deref().unwrap_or("")
        ));
        format!("{:x}", hasher.finalize())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinanceEntryUpdate {
    pub amount: Option<f64>,
    #[serde(rename = "transaction_type")]
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub payment_method: Option<String>,
    pub location: Option<String>,
    pub tags: Option<String>,
}

impl FinanceEntryUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(amount) = self.amount {
            check_positive("amount", amount)?;
        }
        if let Some(category) = &self.category {
            check_len("category", category, 1, 100)?;
        }
        check_max_len("description", self.description.as_deref(), 255)?;
        check_max_len("payment_method", self.payment_method.as_deref(), 50)?;
        check_max_len("location", self.location.as_deref(), 255)?;
        check_max_len("tags", self.tags.as_deref(), 255)?;
        Ok(())
    }

    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.amount.is_some() {
            fields.push("amount");
        }
        if self.kind.is_some() {
            fields.push("transaction_type");
        }
        if self.category.is_some() {
            fields.push("category");
        }
        if self.description.is_some() {
            fields.push("description");
        }
        if self.notes.is_some() {
            fields.push("notes");
        }
        if self.payment_method.is_some() {
            fields.push("payment_method");
        }
        if self.location.is_some() {
            fields.push("location");
        }
        if self.tags.is_some() {
            fields.push("tags");
        }
        fields
    }
}

// ============================================================================
// CATEGORIES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceCategory {
    pub id: i64,
    pub user_id: UserId,
    pub name: String,
    pub category_type: TransactionKind,
    pub color: String,
    pub icon: String,
    pub is_default: bool,
    pub is_active: bool,
    pub monthly_budget: Option<f64>,
    /// Warn once spending reaches this share of `monthly_budget`
    pub budget_warning_percentage: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_category_color() -> String {
    "#3b82f6".to_string()
}

fn default_category_icon() -> String {
    "💰".to_string()
}

fn default_warning_percentage() -> u32 {
    80
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFinanceCategory {
    pub name: String,
    pub category_type: TransactionKind,
    #[serde(default = "default_category_color")]
    pub color: String,
    #[serde(default = "default_category_icon")]
    pub icon: String,
    #[serde(default)]
    pub monthly_budget: Option<f64>,
    #[serde(default = "default_warning_percentage")]
    pub budget_warning_percentage: u32,
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

impl NewFinanceCategory {
    pub fn validate(&self) -> Result<()> {
        check_len("name", &self.name, 1, 100)?;
        if !is_hex_color(&self.color) {
            return Err(DashboardError::validation(
                "color",
                format!("'{}' is not a #RRGGBB color", self.color),
            ));
        }
        check_max_len("icon", Some(&self.icon), 10)?;
        if let Some(budget) = self.monthly_budget {
            check_non_negative("monthly_budget", budget)?;
        }
        check_range("budget_warning_percentage", self.budget_warning_percentage, 1, 100)?;
        Ok(())
    }
}

// ============================================================================
// BUDGETS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceBudget {
    pub id: i64,
    pub user_id: UserId,
    pub budget_year: i32,
    /// 1-12
    pub budget_month: u32,
    pub total_income: f64,
    pub total_expenses: f64,
    pub savings_goal: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFinanceBudget {
    pub budget_year: i32,
    pub budget_month: u32,
    #[serde(default)]
    pub total_income: f64,
    #[serde(default)]
    pub total_expenses: f64,
    #[serde(default)]
    pub savings_goal: f64,
}

impl NewFinanceBudget {
    pub fn validate(&self) -> Result<()> {
        check_range("budget_year", self.budget_year, 2020, 2030)?;
        check_range("budget_month", self.budget_month, 1, 12)?;
        check_non_negative("total_income", self.total_income)?;
        check_non_negative("total_expenses", self.total_expenses)?;
        check_non_negative("savings_goal", self.savings_goal)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_validation() {
        assert!(NewFinanceEntry::new(25.5, TransactionKind::Expense, "Food")
            .validate()
            .is_ok());
        assert!(NewFinanceEntry::new(0.0, TransactionKind::Expense, "Food")
            .validate()
            .is_err());
        assert!(NewFinanceEntry::new(10.0, TransactionKind::Income, "")
            .validate()
            .is_err());
    }

    #[test]
    fn test_entry_json_uses_transaction_type() {
        let entry: NewFinanceEntry = serde_json::from_str(
            r#"{"amount": 25.5, "transaction_type": "expense", "category": "Food"}"#,
        )
        .unwrap();
        assert_eq!(entry.kind, TransactionKind::Expense);
        assert_eq!(entry.entry_date, None);

        let bad: std::result::Result<NewFinanceEntry, _> = serde_json::from_str(
            r#"{"amount": 25.5, "transaction_type": "transfer", "category": "Food"}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_idempotency_hash_is_stable() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let entry = NewFinanceEntry::new(45.99, TransactionKind::Expense, "Dining").on(date);

        let hash1 = entry.idempotency_hash(1);
        let hash2 = entry.idempotency_hash(1);
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
        assert_ne!(hash1, entry.idempotency_hash(2));
    }

    #[test]
    fn test_category_color_validation() {
        let mut category = NewFinanceCategory {
            name: "Groceries".to_string(),
            category_type: TransactionKind::Expense,
            color: "#ef4444".to_string(),
            icon: "🛒".to_string(),
            monthly_budget: Some(500.0),
            budget_warning_percentage: 80,
        };
        assert!(category.validate().is_ok());

        category.color = "red".to_string();
        assert!(category.validate().is_err());
    }

    #[test]
    fn test_budget_validation() {
        let budget = NewFinanceBudget {
            budget_year: 2024,
            budget_month: 13,
            total_income: 5000.0,
            total_expenses: 3000.0,
            savings_goal: 1000.0,
        };
        assert!(budget.validate().is_err());
    }

    #[test]
    fn test_merged_entry() {
        let entry = FinanceEntry {
            id: 4,
            user_id: 1,
            amount: 12.0,
            kind: TransactionKind::Expense,
            category: "Food".to_string(),
            description: None,
            notes: None,
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            entry_time: Utc::now(),
            payment_method: None,
            location: None,
            tags: None,
            is_recurring: false,
            recurring_frequency: None,
            recurring_end_date: None,
        };
        let update = FinanceEntryUpdate {
            amount: Some(14.5),
            category: Some(" Dining ".to_string()),
            ..Default::default()
        };
        let next = entry.merged(&update);
        assert_eq!(next.amount, 14.5);
        assert_eq!(next.category, "Dining");
        assert_eq!(next.entry_date, entry.entry_date);
        assert_eq!(update.changed_fields(), vec!["amount", "category"]);
    }
}
