//! Cavalli-Sforza and Edwards chord distance.

use super::{DistanceMeasure, allele_frequency_distance};
use crate::data::CoreHunterData;
use crate::error::{DataKind, Result};
use crate::schema::MissingValuesPolicy;

/// Like [`ModifiedRogers`](super::ModifiedRogers) with `(sqrt(p_x) - sqrt(p_y))^2`
/// as the per-allele term.
#[derive(Debug, Clone, Default)]
pub struct CavalliSforzaEdwards {
    policy: MissingValuesPolicy,
}

impl CavalliSforzaEdwards {
    pub fn new(policy: MissingValuesPolicy) -> Self {
        Self { policy }
    }
}

impl DistanceMeasure for CavalliSforzaEdwards {
    fn distance(&self, x: usize, y: usize, data: &CoreHunterData) -> Result<f64> {
        let genotypes = data.genotypes()?;
        Ok(allele_frequency_distance(genotypes, x, y, self.policy, |px, py| {
            let diff = px.sqrt() - py.sqrt();
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
        "Cavalli-Sforza and Edwards"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::distance::test_data;

    #[test]
    fn test_known_value() {
        let data = test_data::genotype_dataset();
        let ce = CavalliSforzaEdwards::default();

        // marker 0: 2 * (1 - sqrt(0.5))^2, marker 1: 1 + 1
        let m0 = 2.0 * (1.0 - 0.5f64.sqrt()).powi(2);
        let expected = ((m0 + 2.0) / 4.0).sqrt();
        assert!((ce.distance(0, 1, &data).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_ceil_not_below_floor() {
        let data = test_data::genotype_dataset();
        let floor = CavalliSforzaEdwards::new(MissingValuesPolicy::Floor);
        let ceil = CavalliSforzaEdwards::new(MissingValuesPolicy::Ceil);
        for x in data.ids() {
            assert!(ceil.distance(x, 4, &data).unwrap() >= floor.distance(x, 4, &data).unwrap());
        }
    }
}
