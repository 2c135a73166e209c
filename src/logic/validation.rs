use crate::models::{CropConditions, InputRanges, ScoredParameter, ValueRange};
use serde::Serialize;

/// A measured parameter outside the range the reference crop data covers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeViolation {
    pub parameter: ScoredParameter,
    pub value: f64,
    pub allowed: ValueRange,
}

impl std::fmt::Display for RangeViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} = {} is outside {}",
            self.parameter.key(),
            self.value,
            self.allowed
        )
    }
}

/// Every parameter whose value falls outside its configured input range.
pub fn validate_conditions(
    conditions: &CropConditions,
    ranges: &InputRanges,
) -> Vec<RangeViolation> {
    ScoredParameter::ALL
        .into_iter()
        .filter_map(|parameter| {
            let value = *conditions.get(parameter);
            let allowed = *ranges.get(parameter);
            (!allowed.contains(value)).then_some(RangeViolation {
                parameter,
                value,
                allowed,
            })
        })
        .collect()
}
