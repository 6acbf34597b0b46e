//! Runtime configuration from TOML file and environment variables

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Runtime settings for the pipeline.
///
/// Resolution order: built-in defaults, then an optional TOML config file
/// (explicit path or `~/.currensee/config.toml`), then environment variable
/// overrides (`OE_API_KEY`, `OE_API_BASE_URL`, `STORAGE_BASE_PATH`,
/// `STAGE_DIR`, `DB_PATH`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// OpenExchangeRates API key
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Root directory for all file storage
    #[serde(default = "default_storage_base_path")]
    pub storage_base_path: PathBuf,
    /// Stage subdirectory under the storage root
    #[serde(default = "default_stage_dir")]
    pub stage_dir: PathBuf,
    /// SQLite database location
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

fn default_api_base_url() -> String {
    "https://openexchangerates.org/api".to_string()
}

fn default_storage_base_path() -> PathBuf {
    PathBuf::from("data")
}

fn default_stage_dir() -> PathBuf {
    PathBuf::from("stage/exchange-rates/daily")
}

fn default_db_path() -> PathBuf {
    PathBuf::from("data/exchange_rates.db")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: default_api_base_url(),
            storage_base_path: default_storage_base_path(),
            stage_dir: default_stage_dir(),
            db_path: default_db_path(),
        }
    }
}

impl Settings {
    /// Load settings from an optional config file, then apply env overrides
    pub fn load(config_path: Option<&Path>) -> Self {
        let mut settings = match config_path {
            Some(path) => Self::from_file(path),
            None => Self::from_default_location(),
        };
        settings.apply_env_overrides();
        settings
    }

    fn from_file(path: &Path) -> Self {
        if !path.exists() {
            log::warn!("Config file {} does not exist, using defaults", path.display());
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("Failed to parse config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Failed to read config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn from_default_location() -> Self {
        if let Some(home) = dirs::home_dir() {
            let default_config = home.join(".currensee").join("config.toml");
            if default_config.exists() {
                return Self::from_file(&default_config);
            }
        }
        Self::default()
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("OE_API_KEY") {
            self.api_key = value;
        }
        if let Ok(value) = env::var("OE_API_BASE_URL") {
            self.api_base_url = value;
        }
        if let Ok(value) = env::var("STORAGE_BASE_PATH") {
            self.storage_base_path = PathBuf::from(value);
        }
        if let Ok(value) = env::var("STAGE_DIR") {
            self.stage_dir = PathBuf::from(value);
        }
        if let Ok(value) = env::var("DB_PATH") {
            self.db_path = PathBuf::from(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.api_base_url, "https://openexchangerates.org/api");
        assert_eq!(settings.stage_dir, PathBuf::from("stage/exchange-rates/daily"));
        assert_eq!(settings.db_path, PathBuf::from("data/exchange_rates.db"));
        assert!(settings.api_key.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "api_key = \"test-key\"\nstorage_base_path = \"/tmp/currensee\""
        )
        .unwrap();
        file.flush().unwrap();

        let settings = Settings::from_file(file.path());
        assert_eq!(settings.api_key, "test-key");
        assert_eq!(settings.storage_base_path, PathBuf::from("/tmp/currensee"));
        // Unset fields fall back to defaults
        assert_eq!(settings.api_base_url, "https://openexchangerates.org/api");
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml [[[").unwrap();
        file.flush().unwrap();

        let settings = Settings::from_file(file.path());
        assert_eq!(settings.api_base_url, "https://openexchangerates.org/api");
    }
}
