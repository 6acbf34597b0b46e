//! End-to-end pipeline tests: stub provider -> stage -> transform -> SQLite

use chrono::NaiveDate;
use currensee::dates::DateRange;
use currensee::db::RateDb;
use currensee::error::Result;
use currensee::models::RawRateDocument;
use currensee::pipeline::{run_extraction, run_transform_load, RunOptions};
use currensee::provider::RateProvider;
use currensee::stage::{LocalStageStore, StageStore};
use std::collections::BTreeMap;
use tempfile::TempDir;

/// In-memory provider returning a fixed three-currency document per date
struct FixedProvider;

impl RateProvider for FixedProvider {
    fn fetch(&self, date: NaiveDate, base: &str) -> Result<RawRateDocument> {
        let mut rates = BTreeMap::new();
        rates.insert("EUR".to_string(), 0.85);
        rates.insert("GBP".to_string(), 0.75);
        rates.insert("JPY".to_string(), 115.5);
        Ok(RawRateDocument {
            disclaimer: Some("test data".to_string()),
            license: None,
            timestamp: 1744704000,
            base: base.to_string(),
            rates,
            date: Some(date),
        })
    }
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
}

#[test]
fn test_extract_then_load_end_to_end() {
    let dir = TempDir::new().unwrap();
    let stage = LocalStageStore::new(dir.path(), "stage/exchange-rates/daily");
    let db_path = dir.path().join("exchange_rates.db");
    let range = DateRange::new(date(15), date(17)).unwrap();

    let staged = run_extraction(&FixedProvider, &stage, &range, RunOptions::default()).unwrap();
    assert_eq!(staged.len(), 3);
    for path in staged.values() {
        assert!(path.exists());
    }

    let loaded = run_transform_load(&stage, &db_path, &range, RunOptions::default()).unwrap();
    assert_eq!(loaded.len(), 3);
    assert!(loaded.values().all(|&rows| rows == 3));

    let db = RateDb::open(&db_path).unwrap();
    for d in range.days() {
        assert_eq!(db.count_for_date(d).unwrap(), 3);
    }
}

#[test]
fn test_reloading_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let stage = LocalStageStore::new(dir.path(), "stage");
    let db_path = dir.path().join("exchange_rates.db");
    let range = DateRange::new(date(15), date(16)).unwrap();

    run_extraction(&FixedProvider, &stage, &range, RunOptions::default()).unwrap();
    run_transform_load(&stage, &db_path, &range, RunOptions::default()).unwrap();

    // Second load skips dates that already have rows and reports the
    // existing counts; nothing is duplicated.
    let second = run_transform_load(&stage, &db_path, &range, RunOptions::default()).unwrap();
    assert!(second.values().all(|&rows| rows == 3));

    let db = RateDb::open(&db_path).unwrap();
    for d in range.days() {
        assert_eq!(db.count_for_date(d).unwrap(), 3);
    }
}

#[test]
fn test_force_overwrite_reloads_from_restaged_files() {
    let dir = TempDir::new().unwrap();
    let stage = LocalStageStore::new(dir.path(), "stage");
    let db_path = dir.path().join("exchange_rates.db");
    let range = DateRange::single(date(15));

    run_extraction(&FixedProvider, &stage, &range, RunOptions::default()).unwrap();
    run_transform_load(&stage, &db_path, &range, RunOptions::default()).unwrap();

    // Restage a smaller document for the same date, then force-reload
    let mut rates = BTreeMap::new();
    rates.insert("EUR".to_string(), 0.90);
    let smaller = RawRateDocument {
        disclaimer: None,
        license: None,
        timestamp: 1744704000,
        base: "USD".to_string(),
        rates,
        date: Some(date(15)),
    };
    stage.write(&smaller, date(15), true, false).unwrap();

    let force = RunOptions {
        force_overwrite: true,
        ..Default::default()
    };
    let result = run_transform_load(&stage, &db_path, &range, force).unwrap();

    // Row count reflects only the new set
    assert_eq!(result[&date(15).to_string()], 1);
    let db = RateDb::open(&db_path).unwrap();
    assert_eq!(db.count_for_date(date(15)).unwrap(), 1);
}

#[test]
fn test_dry_run_both_phases_write_nothing() {
    let dir = TempDir::new().unwrap();
    let stage = LocalStageStore::new(dir.path(), "stage");
    let db_path = dir.path().join("exchange_rates.db");
    let range = DateRange::new(date(15), date(19)).unwrap();
    let dry = RunOptions {
        dry_run: true,
        ..Default::default()
    };

    let staged = run_extraction(&FixedProvider, &stage, &range, dry).unwrap();
    assert_eq!(staged.len(), 5);
    for d in range.days() {
        assert!(!stage.exists(d));
    }

    // Load dry-run over an empty stage: full-sized result map, all zeros,
    // and no database file created
    let loaded = run_transform_load(&stage, &db_path, &range, dry).unwrap();
    assert_eq!(loaded.len(), 5);
    assert!(loaded.values().all(|&rows| rows == 0));
    assert!(!db_path.exists());
}

#[test]
fn test_dry_run_load_reports_counts_from_staged_files() {
    let dir = TempDir::new().unwrap();
    let stage = LocalStageStore::new(dir.path(), "stage");
    let db_path = dir.path().join("exchange_rates.db");
    let range = DateRange::new(date(15), date(16)).unwrap();

    run_extraction(&FixedProvider, &stage, &range, RunOptions::default()).unwrap();

    let dry = RunOptions {
        dry_run: true,
        ..Default::default()
    };
    let loaded = run_transform_load(&stage, &db_path, &range, dry).unwrap();

    assert_eq!(loaded.len(), 2);
    assert!(loaded.values().all(|&rows| rows == 3));
    assert!(!db_path.exists());
}

#[test]
fn test_load_survives_partially_staged_range() {
    let dir = TempDir::new().unwrap();
    let stage = LocalStageStore::new(dir.path(), "stage");
    let db_path = dir.path().join("exchange_rates.db");

    // Stage only the middle date of a three-day range
    run_extraction(
        &FixedProvider,
        &stage,
        &DateRange::single(date(16)),
        RunOptions::default(),
    )
    .unwrap();

    let range = DateRange::new(date(15), date(17)).unwrap();
    let loaded = run_transform_load(&stage, &db_path, &range, RunOptions::default()).unwrap();

    assert_eq!(loaded[&date(15).to_string()], 0);
    assert_eq!(loaded[&date(16).to_string()], 3);
    assert_eq!(loaded[&date(17).to_string()], 0);
}
