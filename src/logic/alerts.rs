use crate::models::{
    Alert, AlertActions, AlertDirection, Attribute, SensorReading, ThresholdStore,
};

pub const DEFAULT_WINDOW: usize = 5;

/// Decides whether a low/high condition has held across the latest readings.
///
/// Every reading in the window must carry a numeric value strictly past the
/// configured bound. Too few readings, an unconfigured bound or a single gap
/// in the window all resolve to "no alert".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SustainedAlertEvaluator {
    window: usize,
}

impl SustainedAlertEvaluator {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// `history` must be ordered newest-first.
    pub fn is_sustained(
        &self,
        attribute: Attribute,
        direction: AlertDirection,
        history: &[SensorReading],
        thresholds: &ThresholdStore,
    ) -> bool {
        let Some(bound) = thresholds.bound(attribute, direction) else {
            return false;
        };

        if history.len() < self.window {
            return false;
        }

        history[..self.window].iter().all(|reading| {
            reading
                .numeric(attribute.reading_key())
                .is_some_and(|value| direction.breaches(value, bound))
        })
    }

    pub fn is_sustained_low(
        &self,
        attribute: Attribute,
        history: &[SensorReading],
        thresholds: &ThresholdStore,
    ) -> bool {
        self.is_sustained(attribute, AlertDirection::Low, history, thresholds)
    }

    pub fn is_sustained_high(
        &self,
        attribute: Attribute,
        history: &[SensorReading],
        thresholds: &ThresholdStore,
    ) -> bool {
        self.is_sustained(attribute, AlertDirection::High, history, thresholds)
    }
}

impl Default for SustainedAlertEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

/// What to announce, per direction, when an attribute's alert fires. Every
/// table alert sounds the buzzer and blinks the red LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertRule {
    pub attribute: Attribute,
    pub low_message: &'static str,
    pub high_message: &'static str,
}

impl AlertRule {
    const fn new(
        attribute: Attribute,
        low_message: &'static str,
        high_message: &'static str,
    ) -> Self {
        Self {
            attribute,
            low_message,
            high_message,
        }
    }

    pub fn id(&self, direction: AlertDirection) -> String {
        format!("{}_{}", self.attribute.threshold_key(), direction)
    }

    pub fn message(&self, direction: AlertDirection) -> &'static str {
        match direction {
            AlertDirection::Low => self.low_message,
            AlertDirection::High => self.high_message,
        }
    }

    fn to_alert(self, direction: AlertDirection) -> Alert {
        Alert {
            attribute: self.attribute,
            direction,
            message: self.message(direction).to_string(),
            actions: AlertActions::ALARM,
        }
    }
}

/// Alertable attributes. UV and conductivity are labelled but never alerted on.
pub static ALERT_RULES: [AlertRule; 7] = [
    AlertRule::new(Attribute::Temperature, "Low temperature", "Critical temperature"),
    AlertRule::new(Attribute::Moisture, "Low moisture", "Critical moisture"),
    AlertRule::new(Attribute::WaterLevel, "Low water level", "Critical water level"),
    AlertRule::new(Attribute::Ph, "Low pH", "Critical pH"),
    AlertRule::new(Attribute::Nitrogen, "Low nitrogen", "Critical nitrogen"),
    AlertRule::new(Attribute::Phosphorus, "Low phosphorus", "Critical phosphorus"),
    AlertRule::new(Attribute::Potassium, "Low potassium", "Critical potassium"),
];

pub const WATER_TANK_MESSAGE: &str = "Water tank level is low, fill the tank";

/// Runs the sustained-alert check for every rule in [`ALERT_RULES`].
pub struct AlertEngine {
    evaluator: SustainedAlertEvaluator,
    rules: &'static [AlertRule],
}

impl AlertEngine {
    pub fn new(evaluator: SustainedAlertEvaluator) -> Self {
        Self {
            evaluator,
            rules: &ALERT_RULES,
        }
    }

    /// Active alerts in rule order, high before low for each attribute.
    pub fn evaluate(&self, history: &[SensorReading], thresholds: &ThresholdStore) -> Vec<Alert> {
        let alerts: Vec<Alert> = self
            .rules
            .iter()
            .flat_map(|rule| AlertDirection::ALL.into_iter().map(move |d| (rule, d)))
            .filter(|(rule, direction)| {
                self.evaluator
                    .is_sustained(rule.attribute, *direction, history, thresholds)
            })
            .map(|(rule, direction)| rule.to_alert(direction))
            .collect();

        if !alerts.is_empty() {
            tracing::info!(
                "{} sustained alert(s) over the last {} readings",
                alerts.len(),
                self.evaluator.window()
            );
        }
        alerts
    }

    pub fn evaluate_rule(
        &self,
        attribute: Attribute,
        direction: AlertDirection,
        history: &[SensorReading],
        thresholds: &ThresholdStore,
    ) -> Option<Alert> {
        let rule = self.rules.iter().find(|r| r.attribute == attribute)?;
        self.evaluator
            .is_sustained(attribute, direction, history, thresholds)
            .then(|| rule.to_alert(direction))
    }

    /// Refill reminder for the irrigation tank: same low water level
    /// condition as the table rule, but only blinks the red LED.
    pub fn water_tank_alert(
        &self,
        history: &[SensorReading],
        thresholds: &ThresholdStore,
    ) -> Option<Alert> {
        self.evaluator
            .is_sustained_low(Attribute::WaterLevel, history, thresholds)
            .then(|| Alert {
                attribute: Attribute::WaterLevel,
                direction: AlertDirection::Low,
                message: WATER_TANK_MESSAGE.to_string(),
                actions: AlertActions::INDICATOR,
            })
    }

    pub fn list_rules(&self) -> Vec<(String, &'static str)> {
        self.rules
            .iter()
            .flat_map(|rule| {
                AlertDirection::ALL
                    .into_iter()
                    .map(move |d| (rule.id(d), rule.message(d)))
            })
            .collect()
    }
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::new(SustainedAlertEvaluator::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    /// Newest-first history with one `key` value per reading.
    fn history(key: &str, values: &[f64]) -> Vec<SensorReading> {
        let newest = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                SensorReading::new(newest - Duration::minutes(i as i64)).with_value(key, *v)
            })
            .collect()
    }

    fn thresholds() -> ThresholdStore {
        ThresholdStore::new()
            .with_bounds(Attribute::Temperature, Some(10.0), Some(35.0))
            .with_bounds(Attribute::Ph, Some(5.5), Some(7.5))
            .with_bounds(Attribute::WaterLevel, Some(20.0), None)
    }

    #[test]
    fn five_below_low_bound_is_sustained() {
        let evaluator = SustainedAlertEvaluator::default();
        let h = history("temperature", &[9.0, 8.0, 9.5, 7.0, 9.9]);
        assert!(evaluator.is_sustained_low(Attribute::Temperature, &h, &thresholds()));
        assert!(!evaluator.is_sustained_high(Attribute::Temperature, &h, &thresholds()));
    }

    #[test]
    fn one_reading_at_bound_breaks_the_streak() {
        let evaluator = SustainedAlertEvaluator::default();
        let h = history("temperature", &[9.0, 8.0, 10.0, 7.0, 9.9]);
        assert!(!evaluator.is_sustained_low(Attribute::Temperature, &h, &thresholds()));

        let h = history("temperature", &[36.0, 40.0, 35.0, 38.0, 37.0]);
        assert!(!evaluator.is_sustained_high(Attribute::Temperature, &h, &thresholds()));
    }

    #[test]
    fn short_history_never_alerts() {
        let evaluator = SustainedAlertEvaluator::default();
        let h = history("temperature", &[1.0, 1.0, 1.0]);
        assert!(!evaluator.is_sustained_low(Attribute::Temperature, &h, &thresholds()));
        assert!(!evaluator.is_sustained_low(Attribute::Temperature, &[], &thresholds()));
    }

    #[test]
    fn only_the_latest_window_counts() {
        let evaluator = SustainedAlertEvaluator::default();
        // Sixth (oldest) reading is fine but outside the window
        let h = history("temperature", &[40.0, 41.0, 42.0, 43.0, 44.0, 20.0]);
        assert!(evaluator.is_sustained_high(Attribute::Temperature, &h, &thresholds()));

        // Newest reading is fine, so the streak is broken
        let h = history("temperature", &[20.0, 41.0, 42.0, 43.0, 44.0, 45.0]);
        assert!(!evaluator.is_sustained_high(Attribute::Temperature, &h, &thresholds()));
    }

    #[test]
    fn missing_or_non_numeric_value_breaks_the_streak() {
        let evaluator = SustainedAlertEvaluator::default();
        let mut h = history("temperature", &[1.0, 1.0, 1.0, 1.0, 1.0]);
        h[2] = h[2].clone().with_raw("temperature", json!("1.0"));
        assert!(!evaluator.is_sustained_low(Attribute::Temperature, &h, &thresholds()));

        let mut h = history("temperature", &[1.0, 1.0, 1.0, 1.0, 1.0]);
        h[4].values.remove("temperature");
        assert!(!evaluator.is_sustained_low(Attribute::Temperature, &h, &thresholds()));
    }

    #[test]
    fn unconfigured_bound_never_alerts() {
        let evaluator = SustainedAlertEvaluator::default();
        let h = history("waterLevel", &[99.0, 99.0, 99.0, 99.0, 99.0]);
        assert!(!evaluator.is_sustained_high(Attribute::WaterLevel, &h, &thresholds()));

        let h = history("moisture", &[0.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(!evaluator.is_sustained_low(Attribute::Moisture, &h, &ThresholdStore::new()));
    }

    #[test]
    fn ph_reads_from_uppercase_key() {
        let evaluator = SustainedAlertEvaluator::default();
        let h = history("pH", &[8.0, 8.1, 7.9, 8.4, 7.6]);
        assert!(evaluator.is_sustained_high(Attribute::Ph, &h, &thresholds()));

        let h = history("ph", &[8.0, 8.1, 7.9, 8.4, 7.6]);
        assert!(!evaluator.is_sustained_high(Attribute::Ph, &h, &thresholds()));
    }

    #[test]
    fn custom_window() {
        let evaluator = SustainedAlertEvaluator::new(2);
        let h = history("temperature", &[1.0, 2.0, 50.0]);
        assert!(evaluator.is_sustained_low(Attribute::Temperature, &h, &thresholds()));
        assert_eq!(SustainedAlertEvaluator::new(0).window(), 1);
    }

    #[test]
    fn engine_reports_low_water_as_alarm() {
        let engine = AlertEngine::default();
        let h = history("waterLevel", &[5.0, 6.0, 7.0, 8.0, 9.0]);
        let alerts = engine.evaluate(&h, &thresholds());

        assert_eq!(alerts.len(), 1);
        let alert = &alerts[0];
        assert_eq!(alert.attribute, Attribute::WaterLevel);
        assert_eq!(alert.direction, AlertDirection::Low);
        assert_eq!(alert.message, "Low water level");
        assert_eq!(alert.actions, AlertActions::ALARM);
    }

    #[test]
    fn water_tank_alert_blinks_led_only() {
        let engine = AlertEngine::default();
        let h = history("waterLevel", &[5.0, 6.0, 7.0, 8.0, 9.0]);
        let alert = engine.water_tank_alert(&h, &thresholds()).unwrap();
        assert_eq!(alert.message, WATER_TANK_MESSAGE);
        assert_eq!(alert.actions, AlertActions::INDICATOR);
        assert_eq!(alert.actions.buzzer_seconds, None);

        let h = history("waterLevel", &[5.0, 6.0, 25.0, 8.0, 9.0]);
        assert!(engine.water_tank_alert(&h, &thresholds()).is_none());
    }

    #[test]
    fn engine_reports_every_sustained_attribute() {
        let engine = AlertEngine::default();
        let newest = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let h: Vec<_> = (0..5)
            .map(|i| {
                SensorReading::new(newest - Duration::minutes(i))
                    .with_value("temperature", 40.0)
                    .with_value("pH", 5.0)
                    .with_value("UV", 12.0)
            })
            .collect();

        let alerts = engine.evaluate(&h, &thresholds());
        let ids: Vec<_> = alerts.iter().map(Alert::id).collect();
        assert_eq!(ids, vec!["temperature_high", "ph_low"]);
        assert_eq!(alerts[0].message, "Critical temperature");
        assert_eq!(alerts[0].actions, AlertActions::ALARM);
        assert_eq!(alerts[1].message, "Low pH");
    }

    #[test]
    fn evaluate_rule_ignores_unalertable_attributes() {
        let engine = AlertEngine::default();
        let h = history("UV", &[12.0, 12.0, 12.0, 12.0, 12.0]);
        let store = ThresholdStore::new().with_bounds(Attribute::Uv, None, Some(10.0));
        assert!(engine
            .evaluate_rule(Attribute::Uv, AlertDirection::High, &h, &store)
            .is_none());
    }

    #[test]
    fn list_rules_covers_both_directions() {
        let engine = AlertEngine::default();
        let rules = engine.list_rules();
        assert_eq!(rules.len(), ALERT_RULES.len() * 2);
        assert!(rules.contains(&("moisture_low".to_string(), "Low moisture")));
        assert!(rules.contains(&("potassium_high".to_string(), "Critical potassium")));
    }
}
