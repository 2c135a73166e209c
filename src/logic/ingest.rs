use super::classify::classify;
use crate::error::{Result, SoilSenseError};
use crate::models::{Attribute, Label, SensorReading};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Device payload key, stored reading key's attribute, and the key its label is written under.
const DEVICE_FIELDS: [(&str, Attribute, &str); 9] = [
    ("moisture", Attribute::Moisture, "moistureEvent"),
    ("temp", Attribute::Temperature, "temperatureEvent"),
    ("ph", Attribute::Ph, "phEvent"),
    ("ec", Attribute::ElectricConductivity, "ecEvent"),
    ("n", Attribute::Nitrogen, "nitrogenEvent"),
    ("p", Attribute::Phosphorus, "phosphorusEvent"),
    ("k", Attribute::Potassium, "potassiumEvent"),
    ("uv", Attribute::Uv, "uvEvent"),
    ("waterLevel", Attribute::WaterLevel, "waterLevelEvent"),
];

/// A device payload mapped onto canonical reading keys, with its labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledReading {
    pub reading: SensorReading,
    pub labels: BTreeMap<Attribute, Label>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<Attribute>,
}

impl LabeledReading {
    pub fn label(&self, attribute: Attribute) -> Option<Label> {
        self.labels.get(&attribute).copied()
    }
}

/// Converts a raw device payload (`temp`, `ph`, `ec`, `n`, ...) into a labelled reading.
///
/// All nine device fields must be present. A present but non-numeric field is
/// kept as-is and listed in `rejected` rather than failing the whole payload.
pub fn label_payload(
    payload: &Map<String, Value>,
    timestamp: DateTime<Utc>,
) -> Result<LabeledReading> {
    let missing: Vec<String> = DEVICE_FIELDS
        .iter()
        .filter(|(device_key, _, _)| !payload.contains_key(*device_key))
        .map(|(device_key, _, _)| device_key.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SoilSenseError::MissingFields(missing));
    }

    let mut reading = SensorReading::new(timestamp);
    let mut labels = BTreeMap::new();
    let mut rejected = Vec::new();

    for (device_key, attribute, event_key) in DEVICE_FIELDS {
        let Some(raw) = payload.get(device_key) else {
            continue;
        };
        reading = reading.with_raw(attribute.reading_key(), raw.clone());

        match reading.attribute_value(attribute).and_then(|v| classify(attribute, v)) {
            Ok(label) => {
                reading = reading.with_raw(event_key, Value::from(label.as_str()));
                labels.insert(attribute, label);
            }
            Err(e) => {
                tracing::warn!("Rejected {} from payload: {}", attribute.reading_key(), e);
                rejected.push(attribute);
            }
        }
    }

    for (key, value) in payload {
        let is_device_field = DEVICE_FIELDS
            .iter()
            .any(|(device_key, _, _)| *device_key == key.as_str());
        if is_device_field || key == "timestamp" {
            continue;
        }
        if reading.contains(key) {
            tracing::debug!("Ignoring payload key '{}' that collides with a mapped field", key);
            continue;
        }
        reading = reading.with_raw(key, value.clone());
    }

    Ok(LabeledReading {
        reading,
        labels,
        rejected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("payload must be an object"),
        }
    }

    fn full_payload() -> Map<String, Value> {
        payload(json!({
            "moisture": 45,
            "temp": 24.5,
            "ph": 6.3,
            "ec": 850,
            "n": 60,
            "p": 30,
            "k": 180,
            "uv": 0.5,
            "waterLevel": 70,
            "deviceId": "esp32-01"
        }))
    }

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap()
    }

    #[test]
    fn maps_device_keys_and_labels_everything() {
        let labeled = label_payload(&full_payload(), ts()).unwrap();
        let reading = &labeled.reading;

        assert_eq!(reading.timestamp, Some(ts()));
        assert_eq!(reading.value("temperature").unwrap(), 24.5);
        assert_eq!(reading.value("pH").unwrap(), 6.3);
        assert_eq!(reading.value("electricConductivity").unwrap(), 850.0);
        assert_eq!(reading.value("nitrogen").unwrap(), 60.0);
        assert_eq!(reading.value("UV").unwrap(), 0.5);
        assert!(!reading.contains("temp"));
        assert!(!reading.contains("ph"));

        assert_eq!(labeled.labels.len(), 9);
        assert!(labeled.rejected.is_empty());
        assert_eq!(labeled.label(Attribute::Temperature), Some(Label::Optimal));
        assert_eq!(labeled.label(Attribute::Uv), Some(Label::Indoor));
        assert_eq!(reading.values["temperatureEvent"], "optimal");
        assert_eq!(reading.values["uvEvent"], "indoor");
    }

    #[test]
    fn extra_keys_pass_through() {
        let labeled = label_payload(&full_payload(), ts()).unwrap();
        assert_eq!(labeled.reading.values["deviceId"], "esp32-01");
    }

    #[test]
    fn extra_keys_do_not_override_mapped_fields() {
        let mut p = full_payload();
        p.insert("temperature".into(), json!(99));
        p.insert("timestamp".into(), json!("not a time"));
        let labeled = label_payload(&p, ts()).unwrap();
        assert_eq!(labeled.reading.value("temperature").unwrap(), 24.5);
        assert_eq!(labeled.reading.timestamp, Some(ts()));
    }

    #[test]
    fn missing_fields_are_reported_together() {
        let mut p = full_payload();
        p.remove("temp");
        p.remove("waterLevel");
        match label_payload(&p, ts()) {
            Err(SoilSenseError::MissingFields(fields)) => {
                assert_eq!(fields, vec!["temp".to_string(), "waterLevel".to_string()]);
            }
            other => panic!("expected MissingFields, got {:?}", other),
        }
    }

    #[test]
    fn non_numeric_value_is_rejected_not_fatal() {
        let mut p = full_payload();
        p.insert("ph".into(), json!("acidic"));
        let labeled = label_payload(&p, ts()).unwrap();

        assert_eq!(labeled.rejected, vec![Attribute::Ph]);
        assert_eq!(labeled.label(Attribute::Ph), None);
        assert!(!labeled.reading.contains("phEvent"));
        assert_eq!(labeled.reading.values["pH"], "acidic");
        assert_eq!(labeled.labels.len(), 8);
    }
}
