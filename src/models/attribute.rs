use serde::{Deserialize, Serialize};

/// A measured quantity that gets a qualitative label.
///
/// Each attribute has two spellings: the key it is stored under in a
/// reading, and the key it is configured under in the threshold file.
/// They only differ for pH (`pH` vs `ph`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Attribute {
    Temperature,
    Moisture,
    Nitrogen,
    Phosphorus,
    Potassium,
    Ph,
    ElectricConductivity,
    Uv,
    WaterLevel,
}

impl Attribute {
    pub const ALL: [Attribute; 9] = [
        Attribute::Temperature,
        Attribute::Moisture,
        Attribute::Nitrogen,
        Attribute::Phosphorus,
        Attribute::Potassium,
        Attribute::Ph,
        Attribute::ElectricConductivity,
        Attribute::Uv,
        Attribute::WaterLevel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Temperature => "Temperature",
            Attribute::Moisture => "Moisture",
            Attribute::Nitrogen => "Nitrogen",
            Attribute::Phosphorus => "Phosphorus",
            Attribute::Potassium => "Potassium",
            Attribute::Ph => "pH",
            Attribute::ElectricConductivity => "Electric Conductivity",
            Attribute::Uv => "UV Index",
            Attribute::WaterLevel => "Water Level",
        }
    }

    /// Key the value is stored under in a [`SensorReading`](super::SensorReading).
    pub fn reading_key(&self) -> &'static str {
        match self {
            Attribute::Temperature => "temperature",
            Attribute::Moisture => "moisture",
            Attribute::Nitrogen => "nitrogen",
            Attribute::Phosphorus => "phosphorus",
            Attribute::Potassium => "potassium",
            Attribute::Ph => "pH",
            Attribute::ElectricConductivity => "electricConductivity",
            Attribute::Uv => "UV",
            Attribute::WaterLevel => "waterLevel",
        }
    }

    /// Key the low/high bounds are configured under.
    pub fn threshold_key(&self) -> &'static str {
        match self {
            Attribute::Ph => "ph",
            other => other.reading_key(),
        }
    }

    /// Accepts either the reading key or the threshold key, case-insensitively.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "temperature" | "temp" => Some(Attribute::Temperature),
            "moisture" => Some(Attribute::Moisture),
            "nitrogen" => Some(Attribute::Nitrogen),
            "phosphorus" => Some(Attribute::Phosphorus),
            "potassium" => Some(Attribute::Potassium),
            "ph" => Some(Attribute::Ph),
            "electricconductivity" | "electric conductivity" | "ec" => {
                Some(Attribute::ElectricConductivity)
            }
            "uv" | "uv index" => Some(Attribute::Uv),
            "waterlevel" | "water level" => Some(Attribute::WaterLevel),
            _ => None,
        }
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Qualitative bucket a raw value falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "cold")]
    Cold,
    #[serde(rename = "cool")]
    Cool,
    #[serde(rename = "optimal")]
    Optimal,
    #[serde(rename = "too hot")]
    TooHot,
    #[serde(rename = "dry")]
    Dry,
    #[serde(rename = "moderate")]
    Moderate,
    #[serde(rename = "wet")]
    Wet,
    #[serde(rename = "saturated")]
    Saturated,
    #[serde(rename = "very low")]
    VeryLow,
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "adequate")]
    Adequate,
    #[serde(rename = "good")]
    Good,
    #[serde(rename = "high")]
    High,
    #[serde(rename = "very high")]
    VeryHigh,
    #[serde(rename = "indoor")]
    Indoor,
    #[serde(rename = "critical")]
    Critical,
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "acidic")]
    Acidic,
    #[serde(rename = "alkaline")]
    Alkaline,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Cold => "cold",
            Label::Cool => "cool",
            Label::Optimal => "optimal",
            Label::TooHot => "too hot",
            Label::Dry => "dry",
            Label::Moderate => "moderate",
            Label::Wet => "wet",
            Label::Saturated => "saturated",
            Label::VeryLow => "very low",
            Label::Low => "low",
            Label::Adequate => "adequate",
            Label::Good => "good",
            Label::High => "high",
            Label::VeryHigh => "very high",
            Label::Indoor => "indoor",
            Label::Critical => "critical",
            Label::Normal => "normal",
            Label::Acidic => "acidic",
            Label::Alkaline => "alkaline",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
