use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use scraper_integrity::{logging, ConfigStore, RecordValidator};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "integrity")]
#[command(version, about = "Check and repair the scraper's config and metadata records")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the configuration file
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or edit the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Validate a record file, or every record file in a directory
    Validate {
        /// Record file or directory
        path: PathBuf,

        /// Print the directory report as JSON
        #[arg(long)]
        json: bool,

        /// Record file extension
        #[arg(long, default_value = "json")]
        extension: String,
    },
    /// Repair a record file, or every record file in a directory
    Repair {
        /// Record file or directory
        path: PathBuf,

        /// Record file extension
        #[arg(long, default_value = "json")]
        extension: String,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the merged configuration
    Show,
    /// Print a section, or one key of it
    Get { section: String, key: Option<String> },
    /// Set a value (parsed as JSON, otherwise stored as a string)
    Set {
        section: String,
        key: String,
        value: String,
    },
    /// Check values are within acceptable ranges
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let store = ConfigStore::new(&cli.config);
    logging::init(&store.logging_config(), cli.verbose);
    debug!("Using config file {}", store.path().display());

    match cli.command {
        Commands::Config { action } => run_config(&store, action),
        Commands::Validate {
            path,
            json,
            extension,
        } => run_validate(&RecordValidator::new().with_extension(&extension), &path, json),
        Commands::Repair { path, extension } => {
            run_repair(&RecordValidator::new().with_extension(&extension), &path)
        }
    }
}

fn run_config(store: &ConfigStore, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(&store.load())?);
        }
        ConfigAction::Get { section, key } => {
            let value = match key {
                Some(key) => store
                    .get_value(&section, &key)
                    .with_context(|| format!("No setting {}.{}", section, key))?,
                None => store.get_section(&section),
            };
            if value.is_null() {
                bail!("No section named {}", section);
            }
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        ConfigAction::Set {
            section,
            key,
            value,
        } => {
            let parsed: Value = serde_json::from_str(&value).unwrap_or(Value::String(value));
            if !store.update_value(&section, &key, parsed) {
                bail!("Failed to update {}.{}", section, key);
            }
            info!("✅ Updated {}.{}", section, key);
        }
        ConfigAction::Check => {
            let problems = store.load().check();
            if !problems.is_empty() {
                for problem in &problems {
                    println!("❌ {}", problem);
                }
                bail!("{} configuration problem(s)", problems.len());
            }
            println!("✅ Configuration values are within range");
        }
    }
    Ok(())
}

fn run_validate(validator: &RecordValidator, path: &Path, json: bool) -> Result<()> {
    if !path.is_dir() {
        return match validator.validate_file(path) {
            Ok(()) => {
                println!("✅ {}: Valid video info", path.display());
                Ok(())
            }
            Err(e) => bail!("{} ({})", e, e.kind().label()),
        };
    }

    let report = validator.validate_directory(path);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("📊 Validation summary for {}", report.directory.display());
        println!("  Total files:   {}", report.total_files);
        println!("  Valid files:   {}", report.valid_files);
        println!("  Invalid files: {}", report.invalid_files);
        println!("  Success rate:  {:.1}%", report.success_rate());
        for failure in &report.errors {
            println!("  ✗ {}: {}", failure.file, failure.error);
        }
    }

    if !report.is_clean() {
        bail!("{} invalid record file(s)", report.invalid_files);
    }
    Ok(())
}

fn run_repair(validator: &RecordValidator, path: &Path) -> Result<()> {
    if !path.is_dir() {
        return match validator.repair_file(path) {
            Ok(outcome) => {
                println!("✅ {}: {}", path.display(), outcome);
                Ok(())
            }
            Err(e) => bail!("{} ({})", e, e.kind().label()),
        };
    }

    let report = validator.repair_directory(path);
    println!("🔧 Repair summary for {}", path.display());
    println!("  Total files:   {}", report.total_files);
    println!("  Already valid: {}", report.already_valid);
    println!("  Repaired:      {}", report.repaired);
    println!("  Failed:        {}", report.failed.len());
    for failure in &report.failed {
        println!("  ✗ {}: {}", failure.file, failure.error);
    }

    if !report.failed.is_empty() {
        bail!("{} record file(s) could not be repaired", report.failed.len());
    }
    Ok(())
}
