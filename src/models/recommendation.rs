use super::parameter::{ParameterSet, ScoredParameter};
use super::scoring::ValueRange;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreStatus {
    Critical,
    Optimal,
    Acceptable,
    Suboptimal,
}

impl ScoreStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreStatus::Critical => "critical",
            ScoreStatus::Optimal => "optimal",
            ScoreStatus::Acceptable => "acceptable",
            ScoreStatus::Suboptimal => "suboptimal",
        }
    }
}

impl std::fmt::Display for ScoreStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Moderate,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "Low",
            Confidence::Moderate => "Moderate",
            Confidence::High => "High",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Score of one parameter of one reading against one crop's ideal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterScore {
    pub parameter: ScoredParameter,
    pub raw_score: f64,
    pub weighted_score: f64,
    pub status: ScoreStatus,
    /// Deviation from the ideal as a percentage. Absent for critical results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_diff: Option<f64>,
    pub actual: f64,
    pub ideal: f64,
}

impl ParameterScore {
    pub fn critical(parameter: ScoredParameter, actual: f64, ideal: f64) -> Self {
        Self {
            parameter,
            raw_score: 0.0,
            weighted_score: 0.0,
            status: ScoreStatus::Critical,
            percent_diff: None,
            actual,
            ideal,
        }
    }

    pub fn is_critical(&self) -> bool {
        self.status == ScoreStatus::Critical
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativeCrop {
    pub name: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientAnalysis {
    pub n: ParameterScore,
    pub p: ParameterScore,
    pub k: ParameterScore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilAnalysis {
    pub ph: ParameterScore,
    pub nutrients: NutrientAnalysis,
}

/// Per-parameter breakdown of the recommended crop, grouped the way it is
/// presented: climate, moisture, soil chemistry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreAnalysis {
    pub temperature: ParameterScore,
    pub moisture: ParameterScore,
    pub soil: SoilAnalysis,
    pub rainfall: ParameterScore,
}

impl From<&ParameterSet<ParameterScore>> for ScoreAnalysis {
    fn from(scores: &ParameterSet<ParameterScore>) -> Self {
        Self {
            temperature: scores.temperature,
            moisture: scores.humidity,
            soil: SoilAnalysis {
                ph: scores.ph,
                nutrients: NutrientAnalysis {
                    n: scores.n,
                    p: scores.p,
                    k: scores.k,
                },
            },
            rainfall: scores.rainfall,
        }
    }
}

/// A bound the reading failed, reported when no recommendation can be made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionReport {
    pub parameter: ScoredParameter,
    pub current: f64,
    pub acceptable: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Crop name on success, advisory text otherwise.
    pub recommended_crop: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<u32>,
    pub alternative_crops: Vec<AlternativeCrop>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<ScoreAnalysis>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub conditions: Vec<ConditionReport>,
}

impl Recommendation {
    pub const TOO_EXTREME_MESSAGE: &'static str = "Temperature is too extreme for crop growth";
    pub const TOO_EXTREME_ADVICE: &'static str = "Temperature too extreme for farming";
    pub const NO_VIABLE_CROP_MESSAGE: &'static str =
        "No suitable crops found due to other critical condition failures";
    pub const NO_VIABLE_CROP_ADVICE: &'static str = "Improve soil conditions first";

    pub fn matched(
        crop: impl Into<String>,
        score: u32,
        confidence: Confidence,
        analysis: ScoreAnalysis,
    ) -> Self {
        Self {
            success: true,
            message: None,
            recommended_crop: crop.into(),
            confidence: Some(confidence),
            match_score: Some(score),
            alternative_crops: Vec::new(),
            analysis: Some(analysis),
            conditions: Vec::new(),
        }
    }

    /// The ambient temperature is outside what any crop survives.
    pub fn too_extreme(temperature: f64, survival: &ValueRange) -> Self {
        let status = if temperature < survival.min {
            "Too cold"
        } else {
            "Too hot"
        };

        Self::unsuccessful(Self::TOO_EXTREME_MESSAGE, Self::TOO_EXTREME_ADVICE).with_condition(
            ConditionReport {
                parameter: ScoredParameter::Temperature,
                current: temperature,
                acceptable: format!("{}°C - {}°C", survival.min, survival.max),
                status: Some(status.to_string()),
            },
        )
    }

    /// Every crop in the catalog was excluded by a critical threshold.
    pub fn no_viable_crop(conditions: Vec<ConditionReport>) -> Self {
        Self {
            conditions,
            ..Self::unsuccessful(Self::NO_VIABLE_CROP_MESSAGE, Self::NO_VIABLE_CROP_ADVICE)
        }
    }

    fn unsuccessful(message: &str, advice: &str) -> Self {
        Self {
            success: false,
            message: Some(message.to_string()),
            recommended_crop: advice.to_string(),
            confidence: None,
            match_score: None,
            alternative_crops: Vec::new(),
            analysis: None,
            conditions: Vec::new(),
        }
    }

    pub fn with_alternative(mut self, name: impl Into<String>, score: u32) -> Self {
        self.alternative_crops.push(AlternativeCrop {
            name: name.into(),
            score,
        });
        self
    }

    pub fn with_condition(mut self, condition: ConditionReport) -> Self {
        self.conditions.push(condition);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_extreme_reports_direction() {
        let survival = ValueRange::new(8.0, 50.0);

        let cold = Recommendation::too_extreme(5.0, &survival);
        assert!(!cold.success);
        assert_eq!(cold.recommended_crop, Recommendation::TOO_EXTREME_ADVICE);
        assert_eq!(cold.conditions[0].status.as_deref(), Some("Too cold"));
        assert_eq!(cold.conditions[0].acceptable, "8°C - 50°C");

        let hot = Recommendation::too_extreme(51.0, &survival);
        assert_eq!(hot.conditions[0].status.as_deref(), Some("Too hot"));
        assert!(hot.alternative_crops.is_empty());
    }

    #[test]
    fn serializes_camel_case_and_skips_empty_fields() {
        let rec = Recommendation::no_viable_crop(Vec::new());
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["recommendedCrop"], Recommendation::NO_VIABLE_CROP_ADVICE);
        assert!(json["alternativeCrops"].as_array().unwrap().is_empty());
        assert!(json.get("matchScore").is_none());
        assert!(json.get("conditions").is_none());
    }

    #[test]
    fn confidence_orders_low_to_high() {
        assert!(Confidence::High > Confidence::Moderate);
        assert!(Confidence::Moderate > Confidence::Low);
        assert_eq!(Confidence::Moderate.to_string(), "Moderate");
    }

    #[test]
    fn parameter_score_critical_is_zero() {
        let score = ParameterScore::critical(ScoredParameter::Ph, 1.5, 6.5);
        assert!(score.is_critical());
        assert_eq!(score.raw_score, 0.0);
        assert_eq!(score.weighted_score, 0.0);
        assert!(score.percent_diff.is_none());
    }
}
