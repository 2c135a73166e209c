use thiserror::Error;

#[derive(Error, Debug)]
pub enum SoilSenseError {
    #[error("Invalid reading for '{key}': {reason}")]
    InvalidReading { key: String, reason: String },

    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("Degenerate ideal value {ideal} for {parameter}")]
    DegenerateIdeal { parameter: String, ideal: f64 },

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl SoilSenseError {
    pub fn invalid_reading(key: impl Into<String>, reason: impl Into<String>) -> Self {
        SoilSenseError::InvalidReading {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SoilSenseError>;
