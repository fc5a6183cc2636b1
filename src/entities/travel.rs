// 🌍 Travel Entity - Wishlist and visited countries keyed by ISO3 code

use super::{check_len, check_max_len, UserId};
use crate::error::{DashboardError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistCountry {
    pub id: i64,
    pub user_id: UserId,
    pub country_iso3: String,
    pub country_name: String,
    pub continent: Option<String>,
    pub added_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitedCountry {
    pub id: i64,
    pub user_id: UserId,
    pub country_iso3: String,
    pub country_name: String,
    pub continent: Option<String>,
    pub visit_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Normalize an ISO 3166-1 alpha-3 code to upper case.
pub fn normalize_iso3(code: &str) -> Result<String> {
    let code = code.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(DashboardError::validation(
            "country_iso3",
            format!("'{}' is not a three-letter country code", code),
        ));
    }
    Ok(code.to_ascii_uppercase())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWishlistCountry {
    pub country_iso3: String,
    pub country_name: String,
    #[serde(default)]
    pub continent: Option<String>,
}

impl NewWishlistCountry {
    pub fn validate(&self) -> Result<()> {
        normalize_iso3(&self.country_iso3)?;
        check_len("country_name", &self.country_name, 1, 255)?;
        check_max_len("continent", self.continent.as_deref(), 50)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVisitedCountry {
    pub country_iso3: String,
    pub country_name: String,
    #[serde(default)]
    pub continent: Option<String>,
    #[serde(default)]
    pub visit_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewVisitedCountry {
    pub fn validate(&self) -> Result<()> {
        normalize_iso3(&self.country_iso3)?;
        check_len("country_name", &self.country_name, 1, 255)?;
        check_max_len("continent", self.continent.as_deref(), 50)?;
        Ok(())
    }
}
