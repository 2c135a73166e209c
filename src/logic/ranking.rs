use super::scoring::ParameterScorer;
use crate::error::{Result, SoilSenseError};
use crate::models::{
    ConditionReport, CropCatalog, CropConditions, CropProfile, ParameterScore, ParameterSet,
    Recommendation, ScoreAnalysis, ScoredParameter, ScoringTables, SensorReading,
};

const MAX_ALTERNATIVES: usize = 2;

/// Outcome of scoring one crop against the measured conditions.
#[derive(Debug, Clone, PartialEq)]
pub enum CropEvaluation {
    Viable {
        score: u32,
        details: ParameterSet<ParameterScore>,
    },
    /// A parameter breached its critical threshold.
    Critical { parameter: ScoredParameter },
    /// The profile's ideal for a parameter can't serve as a reference.
    Inapplicable { parameter: ScoredParameter },
}

struct RankedCrop<'c> {
    name: &'c str,
    score: u32,
    details: ParameterSet<ParameterScore>,
}

/// Ranks every crop in a catalog against one set of conditions.
pub struct CropRanker<'a> {
    tables: &'a ScoringTables,
    scorer: ParameterScorer<'a>,
}

impl<'a> CropRanker<'a> {
    pub fn new(tables: &'a ScoringTables) -> Self {
        Self {
            tables,
            scorer: ParameterScorer::new(tables),
        }
    }

    /// Rank crops for a stored reading, failing if any of the seven scored
    /// parameters is missing or non-numeric.
    pub fn rank_reading(
        &self,
        reading: &SensorReading,
        catalog: &CropCatalog,
    ) -> Result<Recommendation> {
        let conditions = CropConditions::from_reading(reading)?;
        self.rank(&conditions, catalog)
    }

    /// Best crop plus up to two alternatives.
    ///
    /// Crops are visited in catalog order and the sort is stable, so on equal
    /// scores the crop listed first wins.
    pub fn rank(
        &self,
        conditions: &CropConditions,
        catalog: &CropCatalog,
    ) -> Result<Recommendation> {
        for (param, value) in conditions.iter() {
            if !value.is_finite() {
                return Err(SoilSenseError::invalid_reading(
                    param.key(),
                    format!("cannot rank crops on non-finite value {}", value),
                ));
            }
        }

        let temperature = conditions.temperature;
        if !self.tables.survival.contains(temperature) {
            tracing::info!(
                "Temperature {:.1}°C outside survival range {} - no crop evaluated",
                temperature,
                self.tables.survival
            );
            return Ok(Recommendation::too_extreme(temperature, &self.tables.survival));
        }

        let mut ranked: Vec<RankedCrop> = Vec::with_capacity(catalog.len());
        for (name, profile) in catalog.iter() {
            match self.evaluate_crop(conditions, profile)? {
                CropEvaluation::Viable { score, details } => {
                    ranked.push(RankedCrop {
                        name,
                        score,
                        details,
                    });
                }
                CropEvaluation::Critical { parameter } => {
                    tracing::debug!("Excluding {}: {} outside critical threshold", name, parameter);
                }
                CropEvaluation::Inapplicable { parameter } => {
                    tracing::warn!(
                        "Excluding {}: ideal {} is not a usable reference value",
                        name,
                        parameter.key()
                    );
                }
            }
        }

        if ranked.is_empty() {
            tracing::info!("No viable crop among {} candidates", catalog.len());
            return Ok(Recommendation::no_viable_crop(self.critical_conditions(conditions)));
        }

        ranked.sort_by(|a, b| b.score.cmp(&a.score));

        let best = &ranked[0];
        let confidence = self.tables.confidence.tier(best.score);
        tracing::debug!(
            "Best match {} scored {} ({} confidence)",
            best.name,
            best.score,
            confidence
        );

        let recommendation = ranked.iter().skip(1).take(MAX_ALTERNATIVES).fold(
            Recommendation::matched(
                best.name,
                best.score,
                confidence,
                ScoreAnalysis::from(&best.details),
            ),
            |rec, alt| rec.with_alternative(alt.name, alt.score),
        );

        Ok(recommendation)
    }

    /// Score all seven parameters of one crop and reduce them to a 0-100 match.
    pub fn evaluate_crop(
        &self,
        conditions: &CropConditions,
        profile: &CropProfile,
    ) -> Result<CropEvaluation> {
        let scored = ParameterSet::try_from_fn(|param| {
            match self
                .scorer
                .score(param, *conditions.get(param), *profile.get(param))
            {
                Ok(score) if score.is_critical() => Err(Exclusion::Critical(param)),
                Ok(score) => Ok(score),
                Err(SoilSenseError::DegenerateIdeal { .. }) => Err(Exclusion::Inapplicable(param)),
                Err(e) => Err(Exclusion::Failed(e)),
            }
        });

        match scored {
            Ok(details) => {
                let total: f64 = details.iter().map(|(_, s)| s.weighted_score).sum();
                Ok(CropEvaluation::Viable {
                    score: to_match_score(total),
                    details,
                })
            }
            Err(Exclusion::Critical(parameter)) => Ok(CropEvaluation::Critical { parameter }),
            Err(Exclusion::Inapplicable(parameter)) => {
                Ok(CropEvaluation::Inapplicable { parameter })
            }
            Err(Exclusion::Failed(e)) => Err(e),
        }
    }

    fn critical_conditions(&self, conditions: &CropConditions) -> Vec<ConditionReport> {
        self.tables
            .critical
            .iter()
            .map(|(param, range)| ConditionReport {
                parameter: *param,
                current: *conditions.get(*param),
                acceptable: range.to_string(),
                status: None,
            })
            .collect()
    }
}

enum Exclusion {
    Critical(ScoredParameter),
    Inapplicable(ScoredParameter),
    Failed(SoilSenseError),
}

fn to_match_score(total_weighted: f64) -> u32 {
    (total_weighted * 100.0).round().clamp(0.0, 100.0) as u32
}
