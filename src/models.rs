//! Data models for raw provider documents and normalized rate records

use crate::error::{CurrenseeError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw exchange rate document as returned by the provider and staged on disk.
///
/// `disclaimer` and `license` are passed through untouched when the provider
/// sends them. `date` is stamped in by the client with the requested date;
/// older staged files may lack it, in which case the record date is derived
/// from `timestamp` at transform time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRateDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// Unix timestamp of the rate observation
    pub timestamp: i64,
    /// Base currency code (e.g. "USD")
    pub base: String,
    /// Target currency code -> rate against base
    pub rates: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl RawRateDocument {
    /// Validate document shape invariants
    pub fn validate(&self) -> Result<()> {
        if self.base.trim().is_empty() {
            return Err(CurrenseeError::Validation(
                "base currency cannot be empty".to_string(),
            ));
        }
        if self.rates.is_empty() {
            return Err(CurrenseeError::Validation(
                "rates mapping cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// One normalized exchange rate observation.
///
/// `(base_currency, target_currency, date)` is the natural key, unique in
/// storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRateRecord {
    pub base_currency: String,
    pub target_currency: String,
    pub rate: f64,
    pub date: NaiveDate,
}

impl ExchangeRateRecord {
    /// Construct a record, validating field invariants
    pub fn new(
        base_currency: String,
        target_currency: String,
        rate: f64,
        date: NaiveDate,
    ) -> Result<Self> {
        if base_currency.trim().is_empty() {
            return Err(CurrenseeError::Validation(
                "base currency cannot be empty".to_string(),
            ));
        }
        if target_currency.trim().is_empty() {
            return Err(CurrenseeError::Validation(
                "target currency cannot be empty".to_string(),
            ));
        }
        if !rate.is_finite() || rate <= 0.0 {
            return Err(CurrenseeError::Validation(format!(
                "rate must be a positive number, got {}",
                rate
            )));
        }
        Ok(Self {
            base_currency,
            target_currency,
            rate,
            date,
        })
    }
}
