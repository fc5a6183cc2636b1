// 📥 Finance CSV Import
//
// Expected header (extra columns are ignored):
//   date,amount,type,category,description,payment_method,location,tags
//
// `date` is YYYY-MM-DD. `type` is income|expense. A negative amount with no
// type is read as an expense of the absolute value.

use crate::entities::{NewFinanceEntry, TransactionKind};
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One CSV line as written by spreadsheet exports
#[derive(Debug, Clone, Deserialize)]
struct CsvRow {
    date: String,
    amount: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    category: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    payment_method: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    tags: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Parse "1,234.50", "$12", "-8.00" into a signed amount.
fn parse_amount(raw: &str) -> Result<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    cleaned
        .parse::<f64>()
        .with_context(|| format!("'{}' is not an amount", raw))
}

impl CsvRow {
    fn into_entry(self) -> Result<NewFinanceEntry> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .with_context(|| format!("'{}' is not a YYYY-MM-DD date", self.date))?;
        let signed = parse_amount(&self.amount)?;

        let kind = match non_empty(self.kind) {
            Some(kind) => kind.parse::<TransactionKind>()?,
            None if signed < 0.0 => TransactionKind::Expense,
            None => bail!("missing type for a positive amount"),
        };

        let mut entry = NewFinanceEntry::new(signed.abs(), kind, self.category.trim()).on(date);
        entry.description = non_empty(self.description);
        entry.payment_method = non_empty(self.payment_method);
        entry.location = non_empty(self.location);
        entry.tags = non_empty(self.tags);
        Ok(entry)
    }
}

/// Read finance entries from any CSV source. Errors name the failing line.
pub fn read_finance_csv<R: Read>(source: R) -> Result<Vec<NewFinanceEntry>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut entries = Vec::new();
    for (line_num, result) in reader.deserialize::<CsvRow>().enumerate() {
        // +2: 1-indexed plus the header row
        let line = line_num + 2;
        let row = result.with_context(|| format!("Failed to parse CSV line {}", line))?;
        let entry = row
            .into_entry()
            .with_context(|| format!("Invalid finance row on line {}", line))?;
        entries.push(entry);
    }
    Ok(entries)
}

pub fn load_finance_csv(path: &Path) -> Result<Vec<NewFinanceEntry>> {
    let file = File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    read_finance_csv(file)
}
