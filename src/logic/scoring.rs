use crate::error::{Result, SoilSenseError};
use crate::models::{OptimalRange, ParameterScore, ScoreStatus, ScoredParameter, ScoringTables};

/// Scores one measured parameter against one crop's ideal value.
///
/// Bands, by relative deviation `d = |actual - ideal| / ideal`:
/// - optimal (`d <= optimal`): linear from 1.0 down to 0 at the boundary
/// - acceptable (`d <= acceptable`): steps down to 0.7, then linear to 0
/// - suboptimal: at most 0.4, decaying with distance past `acceptable`
///
/// A value outside the parameter's critical threshold scores 0 with status
/// `critical` before any of that is computed.
#[derive(Debug, Clone, Copy)]
pub struct ParameterScorer<'a> {
    tables: &'a ScoringTables,
}

impl<'a> ParameterScorer<'a> {
    pub fn new(tables: &'a ScoringTables) -> Self {
        Self { tables }
    }

    pub fn score(
        &self,
        parameter: ScoredParameter,
        actual: f64,
        ideal: f64,
    ) -> Result<ParameterScore> {
        if !actual.is_finite() {
            return Err(SoilSenseError::invalid_reading(
                parameter.key(),
                format!("cannot score non-finite value {}", actual),
            ));
        }

        if let Some(threshold) = self.tables.critical_threshold(parameter) {
            if !threshold.contains(actual) {
                return Ok(ParameterScore::critical(parameter, actual, ideal));
            }
        }

        // Relative deviation is meaningless against a zero or negative reference
        if !(ideal.is_finite() && ideal > 0.0) {
            return Err(SoilSenseError::DegenerateIdeal {
                parameter: parameter.key().to_string(),
                ideal,
            });
        }

        let percent_diff = (actual - ideal).abs() / ideal;
        let (raw_score, status) = band_score(percent_diff, self.tables.optimal_range(parameter));

        Ok(ParameterScore {
            parameter,
            raw_score,
            weighted_score: raw_score * self.tables.weight(parameter),
            status,
            percent_diff: Some(percent_diff * 100.0),
            actual,
            ideal,
        })
    }
}

/// Raw score in `[0, 1]` and band for a non-negative relative deviation.
pub fn band_score(percent_diff: f64, range: &OptimalRange) -> (f64, ScoreStatus) {
    if percent_diff <= range.optimal {
        (1.0 - percent_diff / range.optimal, ScoreStatus::Optimal)
    } else if percent_diff <= range.acceptable {
        let into_band = percent_diff - range.optimal;
        let band_width = range.acceptable - range.optimal;
        (0.7 * (1.0 - into_band / band_width), ScoreStatus::Acceptable)
    } else {
        let past_band = percent_diff - range.acceptable;
        ((0.4 * (1.0 - past_band)).max(0.0), ScoreStatus::Suboptimal)
    }
}
