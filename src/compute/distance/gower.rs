//! Gower distance over mixed-scale phenotypes.

use super::DistanceMeasure;
use crate::data::{CoreHunterData, PhenotypeData, PhenotypeValue, Scale};
use crate::error::{DataKind, Result};
use crate::schema::MissingValuesPolicy;

/// Weighted average of per-feature distances, each in `[0, 1]`.
///
/// - binary: asymmetric, two absences carry no weight
/// - nominal: 0 when equal, 1 otherwise
/// - ranged: `|x - y| / range`
///
/// A feature missing on either side has weight 1 and contributes the policy
/// distance (0 or 1). This holds for cached and uncached use alike.
#[derive(Debug, Clone, Default)]
pub struct Gower {
    policy: MissingValuesPolicy,
}

impl Gower {
    pub fn new(policy: MissingValuesPolicy) -> Self {
        Self { policy }
    }

    /// Distance on one feature, `None` when the comparison carries no weight.
    fn feature_term(
        &self,
        phenotypes: &PhenotypeData,
        feature: usize,
        x: usize,
        y: usize,
    ) -> Option<f64> {
        let (Some(a), Some(b)) = (phenotypes.value(x, feature), phenotypes.value(y, feature))
        else {
            return Some(self.policy.resolve(1.0));
        };
        match (&phenotypes.features()[feature].scale, a, b) {
            (Scale::Binary, PhenotypeValue::Binary(a), PhenotypeValue::Binary(b)) => {
                if !a && !b {
                    None
                } else if a == b {
                    Some(0.0)
                } else {
                    Some(1.0)
                }
            }
            (Scale::Ranged { .. }, PhenotypeValue::Number(a), PhenotypeValue::Number(b)) => {
                match phenotypes.range(feature) {
                    Some(range) if range > 0.0 => Some((a - b).abs() / range),
                    _ => Some(0.0),
                }
            }
            (_, a, b) => Some(if a == b { 0.0 } else { 1.0 }),
        }
    }
}

impl DistanceMeasure for Gower {
    fn distance(&self, x: usize, y: usize, data: &CoreHunterData) -> Result<f64> {
        let phenotypes = data.phenotypes()?;
        if x == y {
            return Ok(0.0);
        }
        let mut total = 0.0;
        let mut weight = 0.0;
        for feature in 0..phenotypes.num_features() {
            if let Some(d) = self.feature_term(phenotypes, feature, x, y) {
                total += d;
                weight += 1.0;
            }
        }
        Ok(if weight > 0.0 { total / weight } else { 0.0 })
    }

    fn missing_values_policy(&self) -> MissingValuesPolicy {
        self.policy
    }

    fn set_missing_values_policy(&mut self, policy: MissingValuesPolicy) {
        self.policy = policy;
    }

    fn required_data(&self) -> DataKind {
        DataKind::Phenotypes
    }

    fn name(&self) -> &'static str {
        "Gower"
    }
}
