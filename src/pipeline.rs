//! Date-range pipeline drivers for extraction and transform-load
//!
//! Both drivers share one shape: visit the range's dates in ascending order,
//! apply the skip / dry-run / overwrite policy per date, accumulate a result
//! map keyed by date string. Per-date errors are logged and swallowed under
//! dry-run; in a real run they propagate and abort the remaining range.
//! Strictly sequential, single pass, no retries.

use crate::dates::DateRange;
use crate::db::RateDb;
use crate::error::{CurrenseeError, Result};
use crate::provider::{RateProvider, DEFAULT_BASE_CURRENCY};
use crate::stage::StageStore;
use crate::transform::transform;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Execution flags shared by both pipeline phases
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub dry_run: bool,
    pub force_overwrite: bool,
}

/// Fetch and stage one document per date in the range.
///
/// Returns a map from date string to the staged (or would-be) file path.
pub fn run_extraction(
    provider: &dyn RateProvider,
    stage: &dyn StageStore,
    range: &DateRange,
    options: RunOptions,
) -> Result<BTreeMap<String, PathBuf>> {
    let mut result = BTreeMap::new();

    for date in range.days() {
        let date_str = date.format("%Y-%m-%d").to_string();

        match extract_one(provider, stage, date, options) {
            Ok(path) => {
                result.insert(date_str, path);
            }
            Err(e) => {
                log::error!("Failed to process {}: {}", date_str, e);
                if !options.dry_run {
                    return Err(e);
                }
            }
        }
    }

    Ok(result)
}

fn extract_one(
    provider: &dyn RateProvider,
    stage: &dyn StageStore,
    date: chrono::NaiveDate,
    options: RunOptions,
) -> Result<PathBuf> {
    if stage.exists(date) && !options.force_overwrite {
        log::info!("Data for {} already exists, skipping...", date);
        return Ok(stage.path_for(date));
    }

    if options.dry_run {
        log::info!("[DRY RUN] Would fetch exchange rates for {}", date);
        return Ok(stage.path_for(date));
    }

    log::info!("Fetching exchange rates for {}", date);
    let document = provider.fetch(date, DEFAULT_BASE_CURRENCY)?;

    let path = stage.write(&document, date, options.force_overwrite, false)?;
    log::info!(
        "Successfully saved exchange rates for {} to {}",
        date,
        path.display()
    );

    Ok(path)
}

/// Read, transform and load staged documents for each date in the range.
///
/// Returns a map from date string to rows affected (or existing/simulated
/// counts for skipped and dry-run dates). The database is opened once with
/// its schema ensured, except under dry-run, which must not create the
/// database file or write anything.
pub fn run_transform_load(
    stage: &dyn StageStore,
    db_path: &Path,
    range: &DateRange,
    options: RunOptions,
) -> Result<BTreeMap<String, usize>> {
    let mut db = if options.dry_run {
        None
    } else {
        Some(RateDb::open(db_path)?)
    };

    let mut result = BTreeMap::new();

    for date in range.days() {
        let date_str = date.format("%Y-%m-%d").to_string();

        if !stage.exists(date) {
            log::warn!(
                "No raw data file found for {} at {}, skipping...",
                date,
                stage.path_for(date).display()
            );
            result.insert(date_str, 0);
            continue;
        }

        match load_one(stage, db.as_mut(), date, options) {
            Ok(rows) => {
                result.insert(date_str, rows);
                if !options.dry_run {
                    log::info!("Successfully processed {} records for {}", rows, date);
                }
            }
            Err(CurrenseeError::NotFound(msg)) => {
                // File disappeared between the exists check and the read
                log::warn!("{}, skipping...", msg);
                result.insert(date_str, 0);
            }
            Err(e) => {
                log::error!("Failed to process {}: {}", date_str, e);
                if !options.dry_run {
                    return Err(e);
                }
            }
        }
    }

    Ok(result)
}

fn load_one(
    stage: &dyn StageStore,
    mut db: Option<&mut RateDb>,
    date: chrono::NaiveDate,
    options: RunOptions,
) -> Result<usize> {
    if !options.force_overwrite {
        if let Some(db) = db.as_deref_mut() {
            let existing = db.count_for_date(date)?;
            if existing > 0 {
                log::info!(
                    "Data for {} already loaded ({} rows), skipping...",
                    date,
                    existing
                );
                return Ok(existing);
            }
        }
    }

    log::info!("Processing data for {}", date);
    let document = stage.read(date)?;
    let records = transform(&document)?;

    if records.is_empty() {
        log::info!("No valid rates transformed for {}, skipping load.", date);
        return Ok(0);
    }

    match db {
        Some(db) => db.load(&records, date, options.force_overwrite, false),
        // Dry-run: report the would-be row count without touching storage
        None => {
            log::info!("[DRY RUN] Would load {} records for {}", records.len(), date);
            Ok(records.len())
        }
    }
}
