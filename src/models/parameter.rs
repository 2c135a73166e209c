use super::reading::SensorReading;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// One of the seven parameters a crop is scored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoredParameter {
    Temperature,
    Ph,
    Humidity,
    Rainfall,
    N,
    P,
    K,
}

impl ScoredParameter {
    /// Scoring order. Also the order per-crop scoring stops at on a critical failure.
    pub const ALL: [ScoredParameter; 7] = [
        ScoredParameter::Temperature,
        ScoredParameter::Ph,
        ScoredParameter::Humidity,
        ScoredParameter::Rainfall,
        ScoredParameter::N,
        ScoredParameter::P,
        ScoredParameter::K,
    ];

    /// Key the value is stored under in a reading and in a crop profile.
    pub fn key(&self) -> &'static str {
        match self {
            ScoredParameter::Temperature => "temperature",
            ScoredParameter::Ph => "ph",
            ScoredParameter::Humidity => "humidity",
            ScoredParameter::Rainfall => "rainfall",
            ScoredParameter::N => "n",
            ScoredParameter::P => "p",
            ScoredParameter::K => "k",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoredParameter::Temperature => "Temperature",
            ScoredParameter::Ph => "pH",
            ScoredParameter::Humidity => "Humidity",
            ScoredParameter::Rainfall => "Rainfall",
            ScoredParameter::N => "Nitrogen",
            ScoredParameter::P => "Phosphorus",
            ScoredParameter::K => "Potassium",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "temperature" | "temp" => Some(ScoredParameter::Temperature),
            "ph" => Some(ScoredParameter::Ph),
            "humidity" => Some(ScoredParameter::Humidity),
            "rainfall" => Some(ScoredParameter::Rainfall),
            "n" | "nitrogen" => Some(ScoredParameter::N),
            "p" | "phosphorus" => Some(ScoredParameter::P),
            "k" | "potassium" => Some(ScoredParameter::K),
            _ => None,
        }
    }
}

impl std::fmt::Display for ScoredParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One value per scored parameter.
///
/// Used for crop ideals, measured conditions, weights and per-parameter
/// ranges, so every table is total over the seven parameters by construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet<T> {
    pub temperature: T,
    pub ph: T,
    pub humidity: T,
    pub rainfall: T,
    #[serde(alias = "N")]
    pub n: T,
    #[serde(alias = "P")]
    pub p: T,
    #[serde(alias = "K")]
    pub k: T,
}

impl<T> ParameterSet<T> {
    pub fn get(&self, parameter: ScoredParameter) -> &T {
        match parameter {
            ScoredParameter::Temperature => &self.temperature,
            ScoredParameter::Ph => &self.ph,
            ScoredParameter::Humidity => &self.humidity,
            ScoredParameter::Rainfall => &self.rainfall,
            ScoredParameter::N => &self.n,
            ScoredParameter::P => &self.p,
            ScoredParameter::K => &self.k,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScoredParameter, &T)> {
        ScoredParameter::ALL.into_iter().map(move |p| (p, self.get(p)))
    }

    /// Builds a set by calling `f` once per parameter in [`ScoredParameter::ALL`]
    /// order, stopping at the first error.
    pub fn try_from_fn<E>(
        mut f: impl FnMut(ScoredParameter) -> std::result::Result<T, E>,
    ) -> std::result::Result<Self, E> {
        Ok(Self {
            temperature: f(ScoredParameter::Temperature)?,
            ph: f(ScoredParameter::Ph)?,
            humidity: f(ScoredParameter::Humidity)?,
            rainfall: f(ScoredParameter::Rainfall)?,
            n: f(ScoredParameter::N)?,
            p: f(ScoredParameter::P)?,
            k: f(ScoredParameter::K)?,
        })
    }
}

/// Ideal growing conditions for one crop.
pub type CropProfile = ParameterSet<f64>;

/// Measured conditions fed to the crop ranker.
pub type CropConditions = ParameterSet<f64>;

impl ParameterSet<f64> {
    /// Extracts the seven scored parameters from a stored reading, failing on
    /// the first one that is missing or non-numeric.
    pub fn from_reading(reading: &SensorReading) -> Result<Self> {
        Self::try_from_fn(|p| reading.value(p.key()))
    }

    pub fn sum(&self) -> f64 {
        self.iter().map(|(_, v)| *v).sum()
    }
}
