use super::parameter::{CropProfile, ParameterSet, ScoredParameter};
use crate::error::{Result, SoilSenseError};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Named crop profiles in a fixed iteration order.
///
/// The order is the order crops were added (or appeared in the source JSON)
/// and decides ties when two crops end up with the same score.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct CropCatalog {
    crops: Vec<(String, CropProfile)>,
}

impl CropCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a crop, replacing the profile in place if the name already exists.
    pub fn with_crop(mut self, name: impl Into<String>, profile: CropProfile) -> Self {
        self.insert(name, profile);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, profile: CropProfile) {
        let name = name.into();
        match self.crops.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = profile,
            None => self.crops.push((name, profile)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CropProfile> {
        self.crops.iter().find(|(n, _)| n == name).map(|(_, p)| p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CropProfile)> {
        self.crops.iter().map(|(n, p)| (n.as_str(), p))
    }

    pub fn names(&self) -> Vec<&str> {
        self.crops.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.crops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let map: Map<String, Value> = serde_json::from_str(s)?;
        Self::try_from(map)
    }

    /// Profiles whose ideal for some parameter cannot be used as a relative
    /// reference (zero, negative or non-finite). Such crops never rank.
    pub fn degenerate_entries(&self) -> Vec<(&str, ScoredParameter)> {
        self.iter()
            .flat_map(|(name, profile)| {
                profile
                    .iter()
                    .filter(|(_, ideal)| !(ideal.is_finite() && **ideal > 0.0))
                    .map(move |(param, _)| (name, param))
            })
            .collect()
    }

    /// Reference catalog: per-crop averages of the public crop recommendation
    /// dataset the scoring weights were tuned against.
    pub fn builtin() -> Self {
        BUILTIN_CROPS
            .iter()
            .fold(Self::new(), |catalog, &(name, [n, p, k, temperature, humidity, ph, rainfall])| {
                catalog.with_crop(
                    name,
                    ParameterSet {
                        temperature,
                        ph,
                        humidity,
                        rainfall,
                        n,
                        p,
                        k,
                    },
                )
            })
    }
}

impl TryFrom<Map<String, Value>> for CropCatalog {
    type Error = SoilSenseError;

    fn try_from(map: Map<String, Value>) -> Result<Self> {
        let mut catalog = Self::new();
        for (name, value) in map {
            if name.trim().is_empty() {
                return Err(SoilSenseError::Config(
                    "crop catalog contains an entry with an empty name".into(),
                ));
            }
            let profile: CropProfile = serde_json::from_value(value).map_err(|e| {
                SoilSenseError::Config(format!("invalid profile for crop '{}': {}", name, e))
            })?;
            catalog.insert(name, profile);
        }
        Ok(catalog)
    }
}

// name, [n, p, k, temperature, humidity, ph, rainfall]
const BUILTIN_CROPS: &[(&str, [f64; 7])] = &[
    ("rice", [79.89, 47.58, 39.87, 23.69, 82.27, 6.43, 236.18]),
    ("maize", [77.76, 48.44, 19.79, 22.39, 65.09, 6.25, 84.77]),
    ("chickpea", [40.09, 67.79, 79.92, 18.87, 16.86, 7.34, 80.06]),
    ("kidneybeans", [20.75, 67.54, 20.05, 20.12, 21.61, 5.75, 105.92]),
    ("pigeonpeas", [20.73, 67.73, 20.29, 27.74, 48.06, 5.79, 149.46]),
    ("mungbean", [20.99, 47.28, 19.87, 28.53, 85.50, 6.72, 48.40]),
    ("blackgram", [40.02, 67.47, 19.24, 29.97, 65.12, 7.13, 67.88]),
    ("lentil", [18.77, 68.36, 19.41, 24.51, 64.80, 6.93, 45.68]),
    ("banana", [100.23, 82.01, 50.05, 27.38, 80.36, 5.98, 104.63]),
    ("mango", [20.07, 27.18, 29.92, 31.21, 50.16, 5.77, 94.70]),
    ("watermelon", [99.42, 17.00, 50.22, 25.59, 85.16, 6.50, 50.79]),
    ("papaya", [49.88, 59.05, 50.04, 33.72, 92.40, 6.74, 142.63]),
    ("cotton", [117.77, 46.24, 19.56, 23.99, 79.84, 6.91, 80.40]),
    ("jute", [78.40, 46.86, 39.99, 24.96, 79.64, 6.73, 174.79]),
    ("coffee", [101.20, 28.74, 29.94, 25.54, 58.87, 6.79, 158.07]),
];
