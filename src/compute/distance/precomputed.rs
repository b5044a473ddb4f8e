//! Distances read from a precomputed matrix.

use super::DistanceMeasure;
use crate::data::CoreHunterData;
use crate::error::{DataKind, Result};
use crate::schema::MissingValuesPolicy;

/// Looks distances up in the dataset's distance matrix.
///
/// The matrix has no missing values, so the policy is kept only to honour
/// the [`DistanceMeasure`] contract.
#[derive(Debug, Clone, Default)]
pub struct Precomputed {
    policy: MissingValuesPolicy,
}

impl Precomputed {
    pub fn new(policy: MissingValuesPolicy) -> Self {
        Self { policy }
    }
}

impl DistanceMeasure for Precomputed {
    fn distance(&self, x: usize, y: usize, data: &CoreHunterData) -> Result<f64> {
        Ok(data.distances()?.distance(x, y))
    }

    fn missing_values_policy(&self) -> MissingValuesPolicy {
        self.policy
    }

    fn set_missing_values_policy(&mut self, policy: MissingValuesPolicy) {
        self.policy = policy;
    }

    fn required_data(&self) -> DataKind {
        DataKind::DistanceMatrix
    }

    fn name(&self) -> &'static str {
        "Precomputed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::distance::test_data;
    use crate::data::DistanceMatrixData;
    use crate::error::CoreHunterError;

    #[test]
    fn test_lookup() {
        let matrix = DistanceMatrixData::new(
            test_data::headers(2),
            vec![vec![0.0, 0.3], vec![0.3, 0.0]],
        )
        .unwrap();
        let data = CoreHunterData::new(None, None, Some(matrix)).unwrap();
        let measure = Precomputed::default();
        assert_eq!(measure.distance(0, 1, &data).unwrap(), 0.3);
        assert_eq!(measure.distance(1, 0, &data).unwrap(), 0.3);
    }

    #[test]
    fn test_fails_without_matrix() {
        let data = test_data::genotype_dataset();
        let result = Precomputed::default().distance(0, 1, &data);
        assert!(matches!(
            result,
            Err(CoreHunterError::MissingData {
                kind: DataKind::DistanceMatrix
            })
        ));
    }
}
