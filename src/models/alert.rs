use super::attribute::Attribute;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertDirection {
    Low,
    High,
}

impl AlertDirection {
    pub const ALL: [AlertDirection; 2] = [AlertDirection::High, AlertDirection::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertDirection::Low => "low",
            AlertDirection::High => "high",
        }
    }

    /// Strict comparison: a value equal to the bound never breaches it.
    pub fn breaches(&self, value: f64, bound: f64) -> bool {
        match self {
            AlertDirection::Low => value < bound,
            AlertDirection::High => value > bound,
        }
    }
}

impl std::fmt::Display for AlertDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedColor {
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedSignal {
    pub color: LedColor,
    pub blink: bool,
}

/// Actuator commands a dispatcher should issue for an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertActions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buzzer_seconds: Option<u32>,
    pub led: LedSignal,
}

impl AlertActions {
    /// Buzzer for three seconds plus a blinking red LED.
    pub const ALARM: AlertActions = AlertActions {
        buzzer_seconds: Some(3),
        led: LedSignal {
            color: LedColor::Red,
            blink: true,
        },
    };

    /// Blinking red LED only.
    pub const INDICATOR: AlertActions = AlertActions {
        buzzer_seconds: None,
        led: LedSignal {
            color: LedColor::Red,
            blink: true,
        },
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub attribute: Attribute,
    pub direction: AlertDirection,
    pub message: String,
    pub actions: AlertActions,
}

impl Alert {
    pub fn id(&self) -> String {
        format!("{}_{}", self.attribute.threshold_key(), self.direction)
    }
}
