//! Modified Rogers distance between allele frequency profiles.

use super::{DistanceMeasure, allele_frequency_distance};
use crate::data::CoreHunterData;
use crate::error::{DataKind, Result};
use crate::schema::MissingValuesPolicy;

/// `sqrt(sum_markers sum_alleles (p_x - p_y)^2 / (2 * numMarkers))`, in `[0, 1]`.
#[derive(Debug, Clone, Default)]
pub struct ModifiedRogers {
    policy: MissingValuesPolicy,
}

impl ModifiedRogers {
    pub fn new(policy: MissingValuesPolicy) -> Self {
        Self { policy }
    }
}

impl DistanceMeasure for ModifiedRogers {
    fn distance(&self, x: usize, y: usize, data: &CoreHunterData) -> Result<f64> {
        let genotypes = data.genotypes()?;
        Ok(allele_frequency_distance(genotypes, x, y, self.policy, |px, py| {
            let diff = px - py;
            diff * diff
        }))
    }

    fn missing_values_policy(&self) -> MissingValuesPolicy {
        self.policy
    }

    fn set_missing_values_policy(&mut self, policy: MissingValuesPolicy) {
        self.policy = policy;
    }

    fn required_data(&self) -> DataKind {
        DataKind::Genotypes
    }

    fn name(&self) -> &'static str {
        "Modified Rogers"
    }
}
