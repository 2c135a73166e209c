use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "soilsense",
    version,
    about = "Soil sensor labelling, threshold alerts and crop recommendations"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Label every attribute present in a reading
    Classify {
        /// Reading JSON file
        reading: PathBuf,
    },
    /// Map and label a raw device payload
    Ingest {
        /// Device payload JSON file
        payload: PathBuf,

        /// Timestamp to stamp the reading with (RFC 3339, defaults to now)
        #[arg(short, long)]
        timestamp: Option<DateTime<Utc>>,
    },
    /// Recommend a crop for the conditions in a reading
    Recommend {
        /// Reading JSON file with temperature, ph, humidity, rainfall, n, p, k
        reading: PathBuf,

        /// Crop catalog JSON (overrides config, defaults to the built-in catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Refuse inputs outside the configured input ranges
        #[arg(long)]
        strict: bool,
    },
    /// Report sustained threshold alerts over a reading history
    Alerts {
        /// History JSON file (array of readings, any order)
        history: PathBuf,

        /// Threshold config JSON (overrides config)
        #[arg(long)]
        thresholds: Option<PathBuf>,

        /// Only report the tank refill reminder
        #[arg(long)]
        water_tank: bool,
    },
    /// Validate config, crop catalog and thresholds
    Check,
}

impl Cli {
    /// Log filter implied by `-v` flags; `RUST_LOG` still takes precedence.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}
