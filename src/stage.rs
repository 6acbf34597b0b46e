//! File staging for raw rate documents
//!
//! Staged files are one JSON document per date under
//! `<storage_base_path>/<stage_dir>/<YYYY-MM-DD>.json`. The stage is the
//! durable boundary between the extraction and load phases: load can be
//! re-run from staged files without re-fetching.

use crate::config::Settings;
use crate::error::{CurrenseeError, Result};
use crate::models::RawRateDocument;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

/// Staging destination for raw rate documents.
///
/// Any implementation providing `path_for`/`exists`/`write`/`read` is
/// substitutable for local disk.
pub trait StageStore {
    /// Would-be location for a date. Pure function of date and configuration.
    fn path_for(&self, date: NaiveDate) -> PathBuf;

    fn exists(&self, date: NaiveDate) -> bool;

    /// Write the document for a date, returning its path.
    ///
    /// Fails with `AlreadyExists` if a file is present and `force_overwrite`
    /// is not set. With `dry_run`, performs no I/O and returns the would-be
    /// path. No atomicity against concurrent writers: single-writer
    /// assumption.
    fn write(
        &self,
        document: &RawRateDocument,
        date: NaiveDate,
        force_overwrite: bool,
        dry_run: bool,
    ) -> Result<PathBuf>;

    /// Read back the staged document for a date.
    ///
    /// Fails with `NotFound` if absent, `Parse` if malformed.
    fn read(&self, date: NaiveDate) -> Result<RawRateDocument>;
}

/// Stage store backed by the local filesystem
pub struct LocalStageStore {
    base_path: PathBuf,
    stage_dir: PathBuf,
}

impl LocalStageStore {
    pub fn new(base_path: impl Into<PathBuf>, stage_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            stage_dir: stage_dir.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.storage_base_path.clone(),
            settings.stage_dir.clone(),
        )
    }

    fn file_name(date: NaiveDate) -> String {
        format!("{}.json", date.format("%Y-%m-%d"))
    }
}

impl StageStore for LocalStageStore {
    fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.base_path
            .join(&self.stage_dir)
            .join(Self::file_name(date))
    }

    fn exists(&self, date: NaiveDate) -> bool {
        self.path_for(date).exists()
    }

    fn write(
        &self,
        document: &RawRateDocument,
        date: NaiveDate,
        force_overwrite: bool,
        dry_run: bool,
    ) -> Result<PathBuf> {
        let path = self.path_for(date);

        if self.exists(date) && !force_overwrite {
            return Err(CurrenseeError::AlreadyExists(format!(
                "Data already exists for {} at {}",
                date,
                path.display()
            )));
        }

        if dry_run {
            return Ok(path);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Pretty-printed for human inspection of the stage
        let json = serde_json::to_string_pretty(document)?;
        fs::write(&path, json)?;

        Ok(path)
    }

    fn read(&self, date: NaiveDate) -> Result<RawRateDocument> {
        let path = self.path_for(date);

        if !path.exists() {
            return Err(CurrenseeError::NotFound(format!(
                "No data file found for {} at {}",
                date,
                path.display()
            )));
        }

        let contents = fs::read_to_string(&path)?;
        let document: RawRateDocument = serde_json::from_str(&contents).map_err(|e| {
            CurrenseeError::Parse(format!("Invalid JSON data for {}: {}", date, e))
        })?;
        document.validate()?;

        Ok(document)
    }
}
