//! Expected proportion of heterozygous loci.

use super::allelic::{evaluate_allelic, evaluate_allelic_delta};
use super::{Evaluation, Objective};
use crate::compute::diversity::AverageGenotype;
use crate::compute::{Subset, SubsetMove};
use crate::data::CoreHunterData;
use crate::error::Result;
use crate::schema::MissingAlleleResolution;

/// `mean_markers (1 - sum_alleles f^2)` over resolved average frequencies.
#[derive(Debug, Clone, Default)]
pub struct HeterozygousLoci {
    resolution: MissingAlleleResolution,
}

impl HeterozygousLoci {
    pub fn new(resolution: MissingAlleleResolution) -> Self {
        Self { resolution }
    }

    pub fn formula(average: &AverageGenotype) -> f64 {
        let num_markers = average.num_markers();
        if num_markers == 0 {
            return 0.0;
        }
        let total: f64 = average
            .markers()
            .map(|frequencies| 1.0 - frequencies.iter().map(|f| f * f).sum::<f64>())
            .sum();
        total / num_markers as f64
    }
}

impl Objective for HeterozygousLoci {
    fn evaluate(&self, subset: &Subset, data: &CoreHunterData) -> Result<Evaluation> {
        evaluate_allelic(self.name(), subset, data, self.resolution, Self::formula)
    }

    fn evaluate_delta(
        &self,
        mv: &SubsetMove,
        subset: &Subset,
        current: &Evaluation,
        data: &CoreHunterData,
    ) -> Result<Evaluation> {
        evaluate_allelic_delta(
            self.name(),
            mv,
            subset,
            current,
            data,
            self.resolution,
            Self::formula,
        )
    }

    fn is_minimizing(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "Expected proportion of heterozygous loci"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::distance::test_data;
    use crate::compute::objective::allelic::test_support;
    use crate::error::CoreHunterError;

    #[test]
    fn test_heterozygosity_value() {
        let data = test_data::genotype_dataset();
        let he = HeterozygousLoci::default();

        let eval = he.evaluate(&Subset::new(5, [0]).unwrap(), &data).unwrap();
        assert_eq!(eval.value(), 0.0);

        // m0 [0.75, 0.25] -> 0.375, m1 [0.5, 0.5, 0] -> 0.5
        let eval = he
            .evaluate(&Subset::new(5, [0, 1]).unwrap(), &data)
            .unwrap();
        assert!((eval.value() - 0.4375).abs() < 1e-12);
    }

    #[test]
    fn test_missing_values_lower_diversity() {
        let data = test_data::genotype_dataset();
        let he = HeterozygousLoci::default();
        // item 4 misses marker 1: its mass goes to the dominant allele of item 2
        let resolved = he
            .evaluate(&Subset::new(5, [2, 4]).unwrap(), &data)
            .unwrap();
        // m0 [0.5, 0.5] -> 0.5, m1 [0, 0.75, 0.25] -> 0.375
        assert!((resolved.value() - 0.4375).abs() < 1e-12);
    }

    #[test]
    fn test_heterozygosity_delta() {
        test_support::assert_delta_matches(&HeterozygousLoci::default());
    }

    #[test]
    fn test_wrong_evaluation_kind() {
        let data = test_data::genotype_dataset();
        let subset = Subset::new(5, [0, 1]).unwrap();
        let pairwise_eval = crate::compute::objective::AverageEntryToEntry::new(
            crate::compute::distance::ModifiedRogers::default(),
        )
        .evaluate(&subset, &data)
        .unwrap();
        let result = HeterozygousLoci::default().evaluate_delta(
            &SubsetMove::addition(2),
            &subset,
            &pairwise_eval,
            &data,
        );
        assert!(matches!(result, Err(CoreHunterError::IncompatibleMove { .. })));
    }

    #[test]
    fn test_other_allelic_objective_rejected() {
        let data = test_data::genotype_dataset();
        let subset = Subset::new(5, [0, 1]).unwrap();
        let coverage_eval = crate::compute::objective::Coverage::default()
            .evaluate(&subset, &data)
            .unwrap();
        let result = HeterozygousLoci::default().evaluate_delta(
            &SubsetMove::addition(2),
            &subset,
            &coverage_eval,
            &data,
        );
        assert!(matches!(result, Err(CoreHunterError::IncompatibleMove { .. })));
    }

    #[test]
    fn test_other_resolution_rejected() {
        let data = test_data::genotype_dataset();
        let subset = Subset::new(5, [2, 4]).unwrap();
        let unresolved = HeterozygousLoci::new(MissingAlleleResolution::Unresolved)
            .evaluate(&subset, &data)
            .unwrap();
        let result = HeterozygousLoci::default().evaluate_delta(
            &SubsetMove::addition(0),
            &subset,
            &unresolved,
            &data,
        );
        assert!(matches!(result, Err(CoreHunterError::IncompatibleMove { .. })));
    }
}
