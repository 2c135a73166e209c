use crate::error::{Result, SoilSenseError};
use crate::models::{default_input_ranges, InputRanges, ScoredParameter, ScoringTables};
use crate::logic::alerts::DEFAULT_WINDOW;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub alerts: AlertConfig,
    #[serde(default)]
    pub scoring: ScoringTables,
    #[serde(default = "default_input_ranges")]
    pub input_ranges: InputRanges,
}

/// Where the JSON inputs live when not given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DataConfig {
    /// Crop catalog JSON. The built-in catalog is used when unset.
    pub catalog_path: Option<PathBuf>,
    pub thresholds_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AlertConfig {
    /// Consecutive readings that must all breach a bound.
    #[serde(default = "default_window")]
    pub window: usize,
}

fn default_window() -> usize {
    DEFAULT_WINDOW
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
        }
    }
}

impl Config {
    /// Loads from an explicit path, or the first config found in a standard
    /// location. With no config anywhere the built-in defaults are used.
    pub fn load(config_override: Option<&Path>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) if !p.exists() => {
                return Err(SoilSenseError::Config(format!(
                    "Config file not found at {:?}",
                    p
                )));
            }
            Some(p) => p.to_path_buf(),
            None => match Self::find_config_path() {
                Some(p) => p,
                None => {
                    tracing::debug!("No config.yaml found, using built-in defaults");
                    return Ok(Self::default());
                }
            },
        };

        tracing::debug!("Loading config from {}", config_path.display());

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| SoilSenseError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_yaml_str(&config_str)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // Substitute environment variables
        let content = Self::substitute_env_vars(content)?;

        let config: Config = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(&content)
                .map_err(|e| SoilSenseError::Config(format!("Failed to parse config: {}", e)))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Search for config.yaml in standard locations.
    fn find_config_path() -> Option<PathBuf> {
        // Try current directory first
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        // Try XDG config directory
        let xdg_config = dirs::config_dir()?.join("soilsense").join("config.yaml");
        xdg_config.exists().then_some(xdg_config)
    }

    pub fn validate(&self) -> Result<()> {
        self.scoring.validate()?;

        if self.alerts.window == 0 {
            return Err(SoilSenseError::Config(
                "alerts.window must be at least 1".into(),
            ));
        }

        for parameter in ScoredParameter::ALL {
            let range = self.input_ranges.get(parameter);
            if !(range.min <= range.max) {
                return Err(SoilSenseError::Config(format!(
                    "input range for {} must satisfy min <= max, got {}",
                    parameter.key(),
                    range
                )));
            }
        }

        Ok(())
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut result = content.to_string();

        // Find all ${VAR_NAME} patterns and substitute
        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| SoilSenseError::Config(format!("Bad substitution pattern: {}", e)))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            match std::env::var(var_name) {
                Ok(value) => result = result.replace(placeholder, &value),
                Err(_) => tracing::warn!("Environment variable {} is not set", var_name),
            }
        }

        Ok(result)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            alerts: AlertConfig::default(),
            scoring: ScoringTables::default(),
            input_ranges: default_input_ranges(),
        }
    }
}
