//! currensee CLI - daily exchange rate extraction and loading
//!
//! ## Example Usage
//!
//! ```bash
//! # Fetch and stage rates for a date range
//! currensee extract --date-from 2025-04-15 --date-to 2025-04-19
//!
//! # Transform staged files and load them into SQLite
//! currensee load --date-from 2025-04-15 --date-to 2025-04-19
//!
//! # Simulate either phase without touching storage
//! currensee extract --dry-run
//! ```

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::Colorize;
use currensee::config::Settings;
use currensee::dates::DateRange;
use currensee::pipeline::{run_extraction, run_transform_load, RunOptions};
use currensee::provider::OpenExchangeRatesClient;
use currensee::stage::LocalStageStore;
use std::path::PathBuf;
use std::process;

/// currensee: daily currency exchange rate ETL
#[derive(Parser)]
#[command(name = "currensee")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fetch, stage and load daily currency exchange rates", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract exchange rates from the API into staged JSON files
    Extract {
        /// Start date in YYYY-MM-DD format. Required if --date-to is set.
        #[arg(long, value_parser = parse_date)]
        date_from: Option<NaiveDate>,

        /// End date in YYYY-MM-DD format. Required if --date-from is set.
        #[arg(long, value_parser = parse_date)]
        date_to: Option<NaiveDate>,

        /// Simulate the extraction without fetching or writing data
        #[arg(long)]
        dry_run: bool,

        /// Overwrite existing staged files
        #[arg(long)]
        force_overwrite: bool,
    },

    /// Transform staged files and load them into the database
    Load {
        /// Start date in YYYY-MM-DD format. Required if --date-to is set.
        #[arg(long, value_parser = parse_date)]
        date_from: Option<NaiveDate>,

        /// End date in YYYY-MM-DD format. Required if --date-from is set.
        #[arg(long, value_parser = parse_date)]
        date_to: Option<NaiveDate>,

        /// Path to the SQLite database file (default: from config)
        #[arg(long)]
        db_path: Option<PathBuf>,

        /// Simulate the transform and load without modifying the database
        #[arg(long)]
        dry_run: bool,

        /// Overwrite existing database rows for the specified dates
        #[arg(long)]
        force_overwrite: bool,
    },
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("'{}' is not a valid YYYY-MM-DD date", s))
}

/// Both bounds or neither; neither defaults to today/today
fn resolve_range(
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
) -> Result<DateRange, String> {
    match (date_from, date_to) {
        (None, None) => {
            let today = Local::now().date_naive();
            log::info!("No dates provided, defaulting to today: {}", today);
            Ok(DateRange::single(today))
        }
        (Some(from), Some(to)) => DateRange::new(from, to).map_err(|e| e.to_string()),
        _ => Err("Both --date-from and --date-to must be provided if either is set.".to_string()),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref());

    if cli.verbose {
        println!(
            "{} v{}",
            "currensee".cyan().bold(),
            env!("CARGO_PKG_VERSION")
        );
        println!(
            "Storage root: {}",
            settings.storage_base_path.display().to_string().dimmed()
        );
    }

    let outcome = match cli.command {
        Commands::Extract {
            date_from,
            date_to,
            dry_run,
            force_overwrite,
        } => cmd_extract(
            &settings,
            date_from,
            date_to,
            RunOptions {
                dry_run,
                force_overwrite,
            },
        ),
        Commands::Load {
            date_from,
            date_to,
            db_path,
            dry_run,
            force_overwrite,
        } => cmd_load(
            &settings,
            date_from,
            date_to,
            db_path,
            RunOptions {
                dry_run,
                force_overwrite,
            },
        ),
    };

    if let Err(message) = outcome {
        eprintln!("{} {}", "Error:".red().bold(), message);
        process::exit(1);
    }
}

fn cmd_extract(
    settings: &Settings,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    options: RunOptions,
) -> Result<(), String> {
    let range = resolve_range(date_from, date_to)?;
    let provider = OpenExchangeRatesClient::from_settings(settings).map_err(|e| e.to_string())?;
    let stage = LocalStageStore::from_settings(settings);

    let result =
        run_extraction(&provider, &stage, &range, options).map_err(|e| e.to_string())?;

    if options.dry_run {
        println!(
            "{} Would process {} date(s)",
            "[DRY RUN]".yellow().bold(),
            result.len()
        );
    } else {
        println!(
            "{} Processed {} date(s)",
            "Success:".green().bold(),
            result.len()
        );
    }
    Ok(())
}

fn cmd_load(
    settings: &Settings,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    db_path: Option<PathBuf>,
    options: RunOptions,
) -> Result<(), String> {
    let range = resolve_range(date_from, date_to)?;
    let stage = LocalStageStore::from_settings(settings);
    let db_path = db_path.unwrap_or_else(|| settings.db_path.clone());

    let result =
        run_transform_load(&stage, &db_path, &range, options).map_err(|e| e.to_string())?;

    let total_records: usize = result.values().sum();

    if options.dry_run {
        println!(
            "{} Would process {} record(s) for {} date(s)",
            "[DRY RUN]".yellow().bold(),
            total_records,
            result.len()
        );
    } else {
        println!(
            "{} Processed {} record(s) for {} date(s)",
            "Success:".green().bold(),
            total_records,
            result.len()
        );
    }
    Ok(())
}
