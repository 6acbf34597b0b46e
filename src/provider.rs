//! OpenExchangeRates API client
//!
//! API documentation:
//! - Latest rates: <https://openexchangerates.org/api/latest.json>
//! - Historical rates: <https://openexchangerates.org/api/historical/{date}.json>

use crate::config::Settings;
use crate::error::{CurrenseeError, Result};
use crate::models::RawRateDocument;
use chrono::{Local, NaiveDate};
use reqwest::blocking::Client;
use std::time::Duration;

/// Default base currency for rate requests
pub const DEFAULT_BASE_CURRENCY: &str = "USD";

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// A source of daily exchange rate documents.
///
/// Any implementation providing `fetch` is substitutable for the real API
/// client; tests use an in-memory stub.
pub trait RateProvider {
    /// Fetch the rate document for one date. Single attempt, no retries.
    fn fetch(&self, date: NaiveDate, base: &str) -> Result<RawRateDocument>;
}

/// OpenExchangeRates API client for latest and historical rates
pub struct OpenExchangeRatesClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl OpenExchangeRatesClient {
    /// Create a client with an explicit key and base URL
    pub fn new(api_key: String, base_url: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(CurrenseeError::Config(
                "API key is not set (OE_API_KEY or config file)".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| CurrenseeError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            base_url,
            client,
        })
    }

    /// Create a client from loaded settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.api_key.clone(), settings.api_base_url.clone())
    }

    /// Endpoint for a date: `latest.json` for today, historical otherwise
    fn endpoint_for(&self, date: NaiveDate, today: NaiveDate) -> String {
        if date == today {
            format!("{}/latest.json", self.base_url)
        } else {
            format!("{}/historical/{}.json", self.base_url, date.format("%Y-%m-%d"))
        }
    }
}

impl RateProvider for OpenExchangeRatesClient {
    fn fetch(&self, date: NaiveDate, base: &str) -> Result<RawRateDocument> {
        let today = Local::now().date_naive();
        let endpoint = self.endpoint_for(date, today);

        if date == today {
            log::info!("Using latest endpoint for today's rates");
        } else {
            log::info!("Using historical endpoint for {}", date);
        }

        let response = self
            .client
            .get(&endpoint)
            .query(&[("app_id", self.api_key.as_str()), ("base", base)])
            .send()
            .map_err(|e| CurrenseeError::Provider(format!("API request failed for {}: {}", date, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CurrenseeError::Provider(format!(
                "API returned {} for {}",
                status, date
            )));
        }

        let mut document: RawRateDocument = response.json().map_err(|e| {
            CurrenseeError::Provider(format!("Invalid JSON received from API for {}: {}", date, e))
        })?;

        document
            .validate()
            .map_err(|e| CurrenseeError::Provider(format!("Invalid API response format: {}", e)))?;

        // Stamp the requested date so transform never has to guess it
        document.date = Some(date);

        Ok(document)
    }
}
