use super::alert::AlertDirection;
use super::attribute::Attribute;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Configured low/high bounds for one attribute. `None` means not configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdBounds {
    pub low: Option<f64>,
    pub high: Option<f64>,
}

impl ThresholdBounds {
    pub fn get(&self, direction: AlertDirection) -> Option<f64> {
        match direction {
            AlertDirection::Low => self.low,
            AlertDirection::High => self.high,
        }
    }
}

/// User-configured alert bounds keyed by threshold key (`temperature`, `ph`, ...).
///
/// Built leniently: bounds arrive as stringified numbers, and anything
/// missing, unparsable or non-finite is simply left unconfigured.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct ThresholdStore {
    bounds: BTreeMap<String, ThresholdBounds>,
}

impl ThresholdStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bounds(
        mut self,
        attribute: Attribute,
        low: Option<f64>,
        high: Option<f64>,
    ) -> Self {
        self.bounds.insert(
            attribute.threshold_key().to_string(),
            ThresholdBounds {
                low: low.filter(|v| v.is_finite()),
                high: high.filter(|v| v.is_finite()),
            },
        );
        self
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s)?;
        Ok(Self::from(value))
    }

    pub fn bounds(&self, attribute: Attribute) -> ThresholdBounds {
        self.bounds
            .get(attribute.threshold_key())
            .copied()
            .unwrap_or_default()
    }

    pub fn bound(&self, attribute: Attribute, direction: AlertDirection) -> Option<f64> {
        self.bounds(attribute).get(direction)
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.values().all(|b| b.low.is_none() && b.high.is_none())
    }

    /// Threshold keys present in the source that match no known attribute.
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.bounds
            .keys()
            .map(String::as_str)
            .filter(|key| Attribute::ALL.iter().all(|a| a.threshold_key() != *key))
            .collect()
    }
}

impl From<Value> for ThresholdStore {
    fn from(value: Value) -> Self {
        let Value::Object(entries) = value else {
            tracing::warn!("Threshold config is not a JSON object - no thresholds configured");
            return Self::default();
        };

        let bounds = entries
            .into_iter()
            .map(|(key, entry)| {
                let bounds = ThresholdBounds {
                    low: entry.get("low").and_then(parse_bound),
                    high: entry.get("high").and_then(parse_bound),
                };
                (key, bounds)
            })
            .collect();

        Self { bounds }
    }
}

fn parse_bound(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_stringified_bounds() {
        let store = ThresholdStore::from(json!({
            "temperature": {"low": "10", "high": "35.5"},
            "ph": {"low": " 5.5 ", "high": 7.5}
        }));

        assert_eq!(store.bound(Attribute::Temperature, AlertDirection::Low), Some(10.0));
        assert_eq!(store.bound(Attribute::Temperature, AlertDirection::High), Some(35.5));
        assert_eq!(store.bound(Attribute::Ph, AlertDirection::Low), Some(5.5));
        assert_eq!(store.bound(Attribute::Ph, AlertDirection::High), Some(7.5));
    }

    #[test]
    fn malformed_bounds_are_unconfigured_per_direction() {
        let store = ThresholdStore::from(json!({
            "moisture": {"low": "abc", "high": "60"},
            "nitrogen": {"low": "NaN", "high": "inf"},
            "potassium": {"low": null},
            "waterLevel": "20"
        }));

        assert_eq!(store.bound(Attribute::Moisture, AlertDirection::Low), None);
        assert_eq!(store.bound(Attribute::Moisture, AlertDirection::High), Some(60.0));
        assert_eq!(store.bounds(Attribute::Nitrogen), ThresholdBounds::default());
        assert_eq!(store.bound(Attribute::Potassium, AlertDirection::Low), None);
        assert_eq!(store.bound(Attribute::WaterLevel, AlertDirection::Low), None);
        assert_eq!(store.bound(Attribute::Phosphorus, AlertDirection::High), None);
    }

    #[test]
    fn non_object_config_yields_empty_store() {
        let store = ThresholdStore::from(json!(["temperature", 10]));
        assert!(store.is_empty());
    }

    #[test]
    fn ph_uses_lowercase_threshold_key() {
        let store = ThresholdStore::from(json!({"pH": {"low": "5"}}));
        assert_eq!(store.bound(Attribute::Ph, AlertDirection::Low), None);
        assert_eq!(store.unknown_keys(), vec!["pH"]);
    }

    #[test]
    fn with_bounds_drops_non_finite() {
        let store = ThresholdStore::new().with_bounds(Attribute::Uv, Some(f64::NAN), Some(8.0));
        assert_eq!(store.bound(Attribute::Uv, AlertDirection::Low), None);
        assert_eq!(store.bound(Attribute::Uv, AlertDirection::High), Some(8.0));
    }
}
