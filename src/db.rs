//! SQLite persistence for exchange rate records
//!
//! The `exchange_rates` table is append-only with a UNIQUE constraint on the
//! natural key `(base_currency, target_currency, date)`. Every load for a
//! date runs in a single transaction: partial loads never persist.

use crate::error::{CurrenseeError, Result};
use crate::models::ExchangeRateRecord;
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::fs;
use std::path::Path;

/// Exchange rate database with SQLite backend
pub struct RateDb {
    conn: Connection,
}

impl RateDb {
    /// Create or open database at path, ensuring the schema exists
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path)
            .map_err(|e| CurrenseeError::Storage(format!("Failed to open database: {}", e)))?;

        let db = Self { conn };
        db.ensure_schema()?;
        Ok(db)
    }

    /// Create in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            CurrenseeError::Storage(format!("Failed to create in-memory database: {}", e))
        })?;

        let db = Self { conn };
        db.ensure_schema()?;
        Ok(db)
    }

    /// Idempotently create the table and indexes
    pub fn ensure_schema(&self) -> Result<()> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS exchange_rates (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    base_currency TEXT NOT NULL,
                    target_currency TEXT NOT NULL,
                    rate REAL NOT NULL,
                    date TEXT NOT NULL,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                    UNIQUE(base_currency, target_currency, date)
                )",
                [],
            )
            .map_err(|e| {
                CurrenseeError::Storage(format!("Failed to create exchange_rates table: {}", e))
            })?;

        self.conn
            .execute(
                "CREATE INDEX IF NOT EXISTS idx_exchange_rates_date
                 ON exchange_rates(date)",
                [],
            )
            .map_err(|e| CurrenseeError::Storage(format!("Failed to create date index: {}", e)))?;

        self.conn
            .execute(
                "CREATE INDEX IF NOT EXISTS idx_exchange_rates_currencies
                 ON exchange_rates(base_currency, target_currency)",
                [],
            )
            .map_err(|e| {
                CurrenseeError::Storage(format!("Failed to create currency index: {}", e))
            })?;

        Ok(())
    }

    /// Number of stored rows for a date
    pub fn count_for_date(&self, date: NaiveDate) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM exchange_rates WHERE date = ?1",
                params![date.format("%Y-%m-%d").to_string()],
                |row| row.get(0),
            )
            .map_err(|e| CurrenseeError::Storage(format!("Failed to count rows: {}", e)))?;
        Ok(count as usize)
    }

    /// Load records for a date, returning the number of rows inserted.
    ///
    /// Empty input returns 0 without opening a transaction; `dry_run` returns
    /// `records.len()` without touching storage. Otherwise the whole load runs
    /// in one transaction. With `force_overwrite`, existing rows for the date
    /// are deleted first and all records inserted unconditionally; without it,
    /// inserts use conflict-ignore semantics against the natural key, so
    /// duplicates are silently skipped and the count reflects actual inserts.
    /// On any failure the transaction rolls back in full before the error
    /// surfaces.
    pub fn load(
        &mut self,
        records: &[ExchangeRateRecord],
        date: NaiveDate,
        force_overwrite: bool,
        dry_run: bool,
    ) -> Result<usize> {
        if records.is_empty() {
            log::info!("No transformed data to load for {}", date);
            return Ok(0);
        }

        if dry_run {
            log::info!("[DRY RUN] Would load {} records for {}", records.len(), date);
            return Ok(records.len());
        }

        let tx = self
            .conn
            .transaction()
            .map_err(|e| CurrenseeError::Storage(format!("Failed to begin transaction: {}", e)))?;

        let mut rows_affected = 0;
        {
            if force_overwrite {
                log::warn!("Deleting existing data for {} due to force_overwrite", date);
                tx.execute(
                    "DELETE FROM exchange_rates WHERE date = ?1",
                    params![date.format("%Y-%m-%d").to_string()],
                )
                .map_err(|e| {
                    CurrenseeError::Storage(format!(
                        "Failed to delete existing rows for {}: {}",
                        date, e
                    ))
                })?;
            }

            let sql = if force_overwrite {
                "INSERT INTO exchange_rates (base_currency, target_currency, rate, date)
                 VALUES (?1, ?2, ?3, ?4)"
            } else {
                "INSERT OR IGNORE INTO exchange_rates (base_currency, target_currency, rate, date)
                 VALUES (?1, ?2, ?3, ?4)"
            };

            let mut stmt = tx.prepare(sql).map_err(|e| {
                CurrenseeError::Storage(format!("Failed to prepare insert: {}", e))
            })?;

            for record in records {
                rows_affected += stmt
                    .execute(params![
                        record.base_currency,
                        record.target_currency,
                        record.rate,
                        record.date.format("%Y-%m-%d").to_string(),
                    ])
                    .map_err(|e| {
                        CurrenseeError::Storage(format!(
                            "Failed to insert record for {}: {}",
                            date, e
                        ))
                    })?;
            }
        }

        // Transaction rolls back on drop if any error above propagated
        tx.commit()
            .map_err(|e| CurrenseeError::Storage(format!("Failed to commit load: {}", e)))?;

        log::debug!("Committed {} records for {}", rows_affected, date);
        Ok(rows_affected)
    }
}
