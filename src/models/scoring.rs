use super::parameter::{ParameterSet, ScoredParameter};
use super::recommendation::Confidence;
use crate::error::{Result, SoilSenseError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Inclusive `[min, max]` bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

impl std::fmt::Display for ValueRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.min, self.max)
    }
}

/// Fractional deviations from an ideal value bounding the optimal and
/// acceptable scoring bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimalRange {
    pub optimal: f64,
    pub acceptable: f64,
}

impl OptimalRange {
    pub const fn new(optimal: f64, acceptable: f64) -> Self {
        Self {
            optimal,
            acceptable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceTiers {
    pub high: u32,
    pub moderate: u32,
}

impl ConfidenceTiers {
    pub fn tier(&self, score: u32) -> Confidence {
        if score >= self.high {
            Confidence::High
        } else if score >= self.moderate {
            Confidence::Moderate
        } else {
            Confidence::Low
        }
    }
}

impl Default for ConfidenceTiers {
    fn default() -> Self {
        Self {
            high: 80,
            moderate: 60,
        }
    }
}

/// Every constant the crop scorer and ranker read.
///
/// Loaded once and never mutated; swapping configuration means building a
/// whole new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTables {
    pub weights: ParameterSet<f64>,
    pub critical: BTreeMap<ScoredParameter, ValueRange>,
    pub optimal_ranges: ParameterSet<OptimalRange>,
    /// Ambient temperature (°C) outside which no crop is considered at all.
    pub survival: ValueRange,
    pub confidence: ConfidenceTiers,
}

impl ScoringTables {
    pub fn weight(&self, parameter: ScoredParameter) -> f64 {
        *self.weights.get(parameter)
    }

    pub fn critical_threshold(&self, parameter: ScoredParameter) -> Option<&ValueRange> {
        self.critical.get(&parameter)
    }

    pub fn optimal_range(&self, parameter: ScoredParameter) -> &OptimalRange {
        self.optimal_ranges.get(parameter)
    }

    pub fn validate(&self) -> Result<()> {
        for (param, weight) in self.weights.iter() {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(SoilSenseError::Config(format!(
                    "weight for {} must be a non-negative number, got {}",
                    param.key(),
                    weight
                )));
            }
        }

        let total = self.weights.sum();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(SoilSenseError::Config(format!(
                "parameter weights must sum to 1.0, got {:.4}",
                total
            )));
        }

        for (param, range) in self.optimal_ranges.iter() {
            let ordered = range.optimal > 0.0 && range.acceptable > range.optimal;
            if !(range.optimal.is_finite() && range.acceptable.is_finite() && ordered) {
                return Err(SoilSenseError::Config(format!(
                    "optimal range for {} must satisfy 0 < optimal < acceptable, got {}/{}",
                    param.key(),
                    range.optimal,
                    range.acceptable
                )));
            }
        }

        for (param, range) in &self.critical {
            if !range.is_valid() {
                return Err(SoilSenseError::Config(format!(
                    "critical threshold for {} must satisfy min <= max, got {}",
                    param.key(),
                    range
                )));
            }
        }

        if !self.survival.is_valid() {
            return Err(SoilSenseError::Config(format!(
                "survival temperature bound must satisfy min <= max, got {}",
                self.survival
            )));
        }

        if self.confidence.moderate > self.confidence.high || self.confidence.high > 100 {
            return Err(SoilSenseError::Config(format!(
                "confidence tiers must satisfy moderate <= high <= 100, got {}/{}",
                self.confidence.moderate, self.confidence.high
            )));
        }

        Ok(())
    }
}

impl Default for ScoringTables {
    fn default() -> Self {
        Self {
            weights: ParameterSet {
                temperature: 0.25,
                ph: 0.20,
                humidity: 0.15,
                rainfall: 0.15,
                n: 0.10,
                p: 0.08,
                k: 0.07,
            },
            critical: BTreeMap::from([
                (ScoredParameter::Temperature, ValueRange::new(8.0, 50.0)),
                (ScoredParameter::Ph, ValueRange::new(2.0, 12.0)),
                (ScoredParameter::Humidity, ValueRange::new(10.0, 100.0)),
            ]),
            optimal_ranges: ParameterSet {
                temperature: OptimalRange::new(0.10, 0.20),
                ph: OptimalRange::new(0.05, 0.10),
                humidity: OptimalRange::new(0.10, 0.20),
                rainfall: OptimalRange::new(0.15, 0.30),
                n: OptimalRange::new(0.10, 0.30),
                p: OptimalRange::new(0.10, 0.30),
                k: OptimalRange::new(0.10, 0.30),
            },
            survival: ValueRange::new(8.0, 50.0),
            confidence: ConfidenceTiers::default(),
        }
    }
}

/// Value ranges covered by the reference crop data. Inputs outside them are
/// still scored; these only back the optional strict input check.
pub type InputRanges = ParameterSet<ValueRange>;

pub fn default_input_ranges() -> InputRanges {
    ParameterSet {
        temperature: ValueRange::new(18.0, 27.0),
        ph: ValueRange::new(5.0, 8.0),
        humidity: ValueRange::new(55.0, 85.0),
        rainfall: ValueRange::new(60.0, 200.0),
        n: ValueRange::new(60.0, 100.0),
        p: ValueRange::new(35.0, 60.0),
        k: ValueRange::new(15.0, 45.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tables_are_valid() {
        let tables = ScoringTables::default();
        assert!(tables.validate().is_ok());
        assert!((tables.weights.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn critical_thresholds_cover_temperature_ph_humidity_only() {
        let tables = ScoringTables::default();
        assert!(tables.critical_threshold(ScoredParameter::Temperature).is_some());
        assert!(tables.critical_threshold(ScoredParameter::Ph).is_some());
        assert!(tables.critical_threshold(ScoredParameter::Humidity).is_some());
        assert!(tables.critical_threshold(ScoredParameter::Rainfall).is_none());
        assert!(tables.critical_threshold(ScoredParameter::N).is_none());
    }

    #[test]
    fn validate_rejects_weights_not_summing_to_one() {
        let mut tables = ScoringTables::default();
        tables.weights.k = 0.5;
        let err = tables.validate().unwrap_err();
        assert!(err.to_string().contains("sum to 1.0"));
    }

    #[test]
    fn validate_rejects_inverted_optimal_range() {
        let mut tables = ScoringTables::default();
        tables.optimal_ranges.ph = OptimalRange::new(0.2, 0.1);
        assert!(tables.validate().is_err());

        tables.optimal_ranges.ph = OptimalRange::new(0.0, 0.1);
        assert!(tables.validate().is_err());
    }

    #[test]
    fn validate_rejects_inverted_critical_range() {
        let mut tables = ScoringTables::default();
        tables
            .critical
            .insert(ScoredParameter::Rainfall, ValueRange::new(500.0, 10.0));
        assert!(tables.validate().is_err());
    }

    #[test]
    fn confidence_tier_boundaries() {
        let tiers = ConfidenceTiers::default();
        assert_eq!(tiers.tier(100), Confidence::High);
        assert_eq!(tiers.tier(80), Confidence::High);
        assert_eq!(tiers.tier(79), Confidence::Moderate);
        assert_eq!(tiers.tier(60), Confidence::Moderate);
        assert_eq!(tiers.tier(59), Confidence::Low);
        assert_eq!(tiers.tier(0), Confidence::Low);
    }

    #[test]
    fn value_range_is_inclusive() {
        let range = ValueRange::new(8.0, 50.0);
        assert!(range.contains(8.0));
        assert!(range.contains(50.0));
        assert!(!range.contains(7.99));
        assert!(!range.contains(50.01));
        assert!(!range.contains(f64::NAN));
    }

    #[test]
    fn tables_deserialize_partially_from_yaml() {
        let yaml = "confidence:\n  high: 90\n  moderate: 70\n";
        let tables: ScoringTables = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(tables.confidence.high, 90);
        assert_eq!(tables.weights, ScoringTables::default().weights);
        assert!(tables.validate().is_ok());
    }
}
