mod cli;

use chrono::Utc;
use clap::Parser;
use cli::{Cli, Commands};
use serde::Serialize;
use serde_json::{Map, Value};
use soilsense::datasources;
use soilsense::logic::{
    classify_reading, label_payload, validate_conditions, AlertEngine, CropRanker,
    SustainedAlertEvaluator,
};
use soilsense::models::{CropCatalog, CropConditions, ThresholdStore};
use soilsense::{Config, Result, SoilSenseError};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logs go to stderr so command output stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Classify { reading } => run_classify(reading),
        Commands::Ingest { payload, timestamp } => {
            let payload = datasources::load_payload(payload)?;
            let labeled = label_payload(&payload, timestamp.unwrap_or_else(Utc::now))?;
            print_json(&labeled)
        }
        Commands::Recommend {
            reading,
            catalog,
            strict,
        } => run_recommend(&config, reading, catalog.as_deref(), *strict),
        Commands::Alerts {
            history,
            thresholds,
            water_tank,
        } => run_alerts(&config, history, thresholds.as_deref(), *water_tank),
        Commands::Check => run_check(&config),
    }
}

fn run_classify(path: &Path) -> Result<()> {
    let reading = datasources::load_reading(path)?;

    let mut labels = Map::new();
    for (attribute, label) in classify_reading(&reading) {
        match label {
            Ok(label) => {
                labels.insert(attribute.reading_key().to_string(), Value::from(label.as_str()));
            }
            Err(e) => tracing::warn!("{}", e),
        }
    }

    print_json(&labels)
}

fn run_recommend(
    config: &Config,
    reading: &Path,
    catalog: Option<&Path>,
    strict: bool,
) -> Result<()> {
    let catalog = resolve_catalog(config, catalog)?;
    let reading = datasources::load_reading(reading)?;
    let conditions = CropConditions::from_reading(&reading)?;

    let violations = validate_conditions(&conditions, &config.input_ranges);
    for violation in &violations {
        tracing::warn!("Input out of reference range: {}", violation);
    }
    if strict {
        if let Some(first) = violations.first() {
            for violation in &violations {
                eprintln!("  {}", violation);
            }
            return Err(SoilSenseError::invalid_reading(
                first.parameter.key(),
                format!("{} value(s) outside the accepted input ranges", violations.len()),
            ));
        }
    }

    let ranker = CropRanker::new(&config.scoring);
    let recommendation = ranker.rank(&conditions, &catalog)?;
    print_json(&recommendation)
}

fn run_alerts(
    config: &Config,
    history: &Path,
    thresholds: Option<&Path>,
    water_tank: bool,
) -> Result<()> {
    let history = datasources::load_history(history)?;
    let thresholds = resolve_thresholds(config, thresholds);

    let engine = AlertEngine::new(SustainedAlertEvaluator::new(config.alerts.window));
    let alerts: Vec<_> = if water_tank {
        engine.water_tank_alert(&history, &thresholds).into_iter().collect()
    } else {
        engine.evaluate(&history, &thresholds)
    };
    print_json(&alerts)
}

fn run_check(config: &Config) -> Result<()> {
    println!("Config: OK (alert window {})", config.alerts.window);

    let catalog = resolve_catalog(config, None)?;
    println!("Crop catalog: {} crops", catalog.len());
    for (crop, parameter) in catalog.degenerate_entries() {
        println!(
            "  warning: {} has an unusable ideal for {} and will never be recommended",
            crop,
            parameter.key()
        );
    }

    match &config.data.thresholds_path {
        Some(path) => {
            let store = datasources::load_thresholds(path);
            if store.is_empty() {
                println!("Thresholds: none configured in {}", path.display());
            } else {
                println!("Thresholds: loaded from {}", path.display());
            }
            for key in store.unknown_keys() {
                println!("  warning: unknown attribute '{}'", key);
            }
        }
        None => println!("Thresholds: no thresholds_path configured"),
    }

    Ok(())
}

/// Command-line path, then config, then the built-in catalog.
fn resolve_catalog(config: &Config, catalog: Option<&Path>) -> Result<CropCatalog> {
    match catalog.or(config.data.catalog_path.as_deref()) {
        Some(path) => datasources::load_catalog(path),
        None => {
            tracing::debug!("Using built-in crop catalog");
            Ok(CropCatalog::builtin())
        }
    }
}

fn resolve_thresholds(config: &Config, thresholds: Option<&Path>) -> ThresholdStore {
    match thresholds.or(config.data.thresholds_path.as_deref()) {
        Some(path) => datasources::load_thresholds(path),
        None => {
            tracing::warn!("No threshold file given or configured - no alerts can fire");
            ThresholdStore::new()
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
