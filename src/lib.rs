//! # currensee
//!
//! An idempotent, date-partitioned ETL pipeline for daily currency exchange
//! rates. Rates are fetched from the OpenExchangeRates API, staged as one
//! JSON document per date, then transformed and loaded into SQLite.
//!
//! The two phases are independently invokable and separated by the durable
//! stage, so a load can be re-run without re-fetching.
//!
//! ## Example
//!
//! ```rust,no_run
//! use currensee::prelude::*;
//!
//! let settings = Settings::load(None);
//! let provider = OpenExchangeRatesClient::from_settings(&settings)?;
//! let stage = LocalStageStore::from_settings(&settings);
//! let range = DateRange::new(
//!     chrono::NaiveDate::from_ymd_opt(2025, 4, 15).unwrap(),
//!     chrono::NaiveDate::from_ymd_opt(2025, 4, 19).unwrap(),
//! )?;
//!
//! run_extraction(&provider, &stage, &range, RunOptions::default())?;
//! run_transform_load(&stage, &settings.db_path, &range, RunOptions::default())?;
//! # Ok::<(), currensee::error::CurrenseeError>(())
//! ```

pub mod config;
pub mod dates;
pub mod db;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod provider;
pub mod stage;
pub mod transform;

pub mod prelude {
    //! Commonly used types and functions
    pub use crate::config::Settings;
    pub use crate::dates::DateRange;
    pub use crate::db::RateDb;
    pub use crate::error::{CurrenseeError, Result};
    pub use crate::models::{ExchangeRateRecord, RawRateDocument};
    pub use crate::pipeline::{run_extraction, run_transform_load, RunOptions};
    pub use crate::provider::{OpenExchangeRatesClient, RateProvider};
    pub use crate::stage::{LocalStageStore, StageStore};
    pub use crate::transform::transform;
}
