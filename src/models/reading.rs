use super::attribute::Attribute;
use crate::error::{Result, SoilSenseError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One sensor sample: a flat key/value mapping plus the time it was taken.
///
/// Values are kept as raw JSON so that a stored entry with a string or
/// `null` where a number belongs can be told apart from a missing key.
/// A reading without a timestamp can still be classified or ranked, but has
/// no place in a history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

impl SensorReading {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp: Some(timestamp),
            values: Map::new(),
        }
    }

    /// Non-finite numbers are stored as `null`, which later reads as invalid.
    pub fn with_value(mut self, key: &str, value: f64) -> Self {
        self.values.insert(key.to_string(), Value::from(value));
        self
    }

    pub fn with_raw(mut self, key: &str, value: Value) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Numeric value stored under `key`.
    pub fn value(&self, key: &str) -> Result<f64> {
        match self.values.get(key) {
            None => Err(SoilSenseError::invalid_reading(key, "value is missing")),
            Some(Value::Number(n)) => n
                .as_f64()
                .filter(|v| v.is_finite())
                .ok_or_else(|| SoilSenseError::invalid_reading(key, "not a finite number")),
            Some(other) => Err(SoilSenseError::invalid_reading(
                key,
                format!("expected a number, found {}", json_kind(other)),
            )),
        }
    }

    pub fn numeric(&self, key: &str) -> Option<f64> {
        self.value(key).ok()
    }

    pub fn attribute_value(&self, attribute: Attribute) -> Result<f64> {
        self.value(attribute.reading_key())
    }
}

/// Orders a history newest-first, the order the alert evaluator expects.
/// Untimed readings sort last.
pub fn sort_newest_first(history: &mut [SensorReading]) {
    history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn value_reads_numbers() {
        let reading = SensorReading::default().with_value("moisture", 42.5);
        assert_eq!(reading.value("moisture").unwrap(), 42.5);
        assert_eq!(reading.numeric("moisture"), Some(42.5));
    }

    #[test]
    fn value_rejects_missing_and_non_numeric() {
        let reading = SensorReading::default()
            .with_raw("temperature", json!("21"))
            .with_raw("pH", Value::Null)
            .with_value("UV", f64::NAN);

        assert!(matches!(
            reading.value("moisture"),
            Err(SoilSenseError::InvalidReading { .. })
        ));
        assert!(reading.value("temperature").is_err());
        assert!(reading.value("pH").is_err());
        assert!(reading.value("UV").is_err());
        assert!(reading.numeric("temperature").is_none());
    }

    #[test]
    fn attribute_value_uses_reading_key() {
        let reading = SensorReading::default().with_value("pH", 6.2);
        assert_eq!(reading.attribute_value(Attribute::Ph).unwrap(), 6.2);
        assert!(reading.value("ph").is_err());
    }

    #[test]
    fn deserializes_flat_json() {
        let reading: SensorReading = serde_json::from_value(json!({
            "id": "1717000000000",
            "timestamp": "2024-05-29T10:00:00Z",
            "temperature": 24.1,
            "pH": 6.4
        }))
        .unwrap();

        assert_eq!(
            reading.timestamp,
            Some(Utc.with_ymd_and_hms(2024, 5, 29, 10, 0, 0).unwrap())
        );
        assert_eq!(reading.value("temperature").unwrap(), 24.1);
        assert!(reading.contains("id"));
        assert!(!reading.contains("timestamp"));
    }

    #[test]
    fn sort_newest_first_orders_by_timestamp_descending() {
        let t = |h| Utc.with_ymd_and_hms(2024, 5, 29, h, 0, 0).unwrap();
        let mut history = vec![
            SensorReading::new(t(8)),
            SensorReading::new(t(10)),
            SensorReading::new(t(9)),
        ];
        sort_newest_first(&mut history);
        let hours: Vec<_> = history.iter().map(|r| r.timestamp).collect();
        assert_eq!(hours, vec![Some(t(10)), Some(t(9)), Some(t(8))]);
    }

    #[test]
    fn missing_timestamp_is_not_invented() {
        let reading: SensorReading = serde_json::from_value(json!({"temperature": 20})).unwrap();
        assert_eq!(reading.timestamp, None);
        assert!(serde_json::to_value(&reading).unwrap().get("timestamp").is_none());
    }
}
