//! Transformation of raw documents into normalized exchange rate records

use crate::error::{CurrenseeError, Result};
use crate::models::{ExchangeRateRecord, RawRateDocument};
use chrono::{Local, NaiveDate, TimeZone};

/// Transform a raw document into one record per (currency, rate) pair.
///
/// The record date comes from the document's explicit `date` field when
/// present, otherwise from its Unix timestamp converted in local time.
/// An empty rates mapping yields an empty vec, not an error. A pair that
/// fails per-record validation is logged and skipped without aborting the
/// batch. Output order follows the (sorted) rates mapping, so it is
/// deterministic for the same input.
pub fn transform(document: &RawRateDocument) -> Result<Vec<ExchangeRateRecord>> {
    let record_date = determine_record_date(document)?;

    if document.rates.is_empty() {
        log::warn!("No rates found in raw data for date {}", record_date);
        return Ok(Vec::new());
    }

    let mut records = Vec::with_capacity(document.rates.len());

    for (currency, rate) in &document.rates {
        match ExchangeRateRecord::new(
            document.base.clone(),
            currency.clone(),
            *rate,
            record_date,
        ) {
            Ok(record) => records.push(record),
            Err(e) => {
                log::error!(
                    "Validation failed for record {} on {}: {}",
                    currency,
                    record_date,
                    e
                );
            }
        }
    }

    Ok(records)
}

/// Record date: explicit field if present, else local-time conversion of the
/// timestamp. Near midnight this conversion is timezone-sensitive; matching
/// the document's explicit date is always preferred.
fn determine_record_date(document: &RawRateDocument) -> Result<NaiveDate> {
    if let Some(date) = document.date {
        return Ok(date);
    }

    Local
        .timestamp_opt(document.timestamp, 0)
        .single()
        .map(|dt| dt.date_naive())
        .ok_or_else(|| {
            CurrenseeError::Validation(format!(
                "Cannot determine date for raw data (timestamp {})",
                document.timestamp
            ))
        })
}
