use crate::error::{Result, SoilSenseError};
use crate::models::{sort_newest_first, CropCatalog, SensorReading, ThresholdStore};
use serde_json::{Map, Value};
use std::path::Path;

fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(SoilSenseError::NotFound(format!("{}", path.display())));
    }
    Ok(std::fs::read_to_string(path)?)
}

/// A single reading object.
pub fn load_reading(path: &Path) -> Result<SensorReading> {
    let content = read_file(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// A JSON array of readings, returned newest-first whatever the file order.
/// Entries without a timestamp cannot be placed in time and are dropped.
pub fn load_history(path: &Path) -> Result<Vec<SensorReading>> {
    let content = read_file(path)?;
    let entries: Vec<SensorReading> = serde_json::from_str(&content)?;
    let total = entries.len();

    let mut history: Vec<SensorReading> = entries
        .into_iter()
        .filter(|reading| reading.timestamp.is_some())
        .collect();
    if history.len() < total {
        tracing::warn!(
            "Skipped {} of {} readings in {} with no timestamp",
            total - history.len(),
            total,
            path.display()
        );
    }

    sort_newest_first(&mut history);
    tracing::debug!("Loaded {} readings from {}", history.len(), path.display());
    Ok(history)
}

/// A raw device payload. Anything but a JSON object is rejected.
pub fn load_payload(path: &Path) -> Result<Map<String, Value>> {
    let content = read_file(path)?;
    match serde_json::from_str::<Value>(&content)? {
        Value::Object(map) => Ok(map),
        _ => Err(SoilSenseError::invalid_reading(
            "payload",
            "device payload must be a JSON object",
        )),
    }
}

pub fn load_catalog(path: &Path) -> Result<CropCatalog> {
    let content = read_file(path)?;
    let catalog = CropCatalog::from_json_str(&content)?;
    tracing::debug!("Loaded {} crops from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Threshold config. A missing or unreadable file means no alerts are
/// configured, so it degrades to an empty store instead of failing.
pub fn load_thresholds(path: &Path) -> ThresholdStore {
    let store = read_file(path).and_then(|content| ThresholdStore::from_json_str(&content));
    match store {
        Ok(store) => {
            for key in store.unknown_keys() {
                tracing::warn!("Ignoring threshold for unknown attribute '{}'", key);
            }
            store
        }
        Err(e) => {
            tracing::warn!(
                "Could not load thresholds from {}: {} - no thresholds configured",
                path.display(),
                e
            );
            ThresholdStore::new()
        }
    }
}
