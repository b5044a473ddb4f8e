//! Shannon diversity index.

use super::allelic::{evaluate_allelic, evaluate_allelic_delta};
use super::{Evaluation, Objective};
use crate::compute::diversity::AverageGenotype;
use crate::compute::{Subset, SubsetMove};
use crate::data::CoreHunterData;
use crate::error::Result;
use crate::schema::MissingAlleleResolution;

/// `-sum_markers sum_alleles (f / M) ln(f / M)` over resolved average
/// frequencies `f` and `M` markers, skipping zero frequencies.
#[derive(Debug, Clone, Default)]
pub struct Shannon {
    resolution: MissingAlleleResolution,
}

impl Shannon {
    pub fn new(resolution: MissingAlleleResolution) -> Self {
        Self { resolution }
    }

    pub fn formula(average: &AverageGenotype) -> f64 {
        let num_markers = average.num_markers() as f64;
        -average
            .markers()
            .flatten()
            .filter(|&&f| f > 0.0)
            .map(|&f| {
                let p = f / num_markers;
                p * p.ln()
            })
            .sum::<f64>()
    }
}

impl Objective for Shannon {
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
        "Shannon diversity"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::distance::test_data;
    use crate::compute::objective::allelic::test_support;

    #[test]
    fn test_shannon_value() {
        let data = test_data::genotype_dataset();
        let shannon = Shannon::default();

        // single homozygous item: two alleles at frequency 1, M = 2
        let eval = shannon
            .evaluate(&Subset::new(5, [0]).unwrap(), &data)
            .unwrap();
        assert!((eval.value() - 2f64.ln()).abs() < 1e-12);

        // items 0 and 1: m0 [0.75, 0.25], m1 [0.5, 0.5, 0]
        let eval = shannon
            .evaluate(&Subset::new(5, [0, 1]).unwrap(), &data)
            .unwrap();
        let expected: f64 = [0.75, 0.25, 0.5, 0.5]
            .iter()
            .map(|f: &f64| {
                let p = f / 2.0;
                -p * p.ln()
            })
            .sum();
        assert!((eval.value() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_shannon_empty_is_zero() {
        let data = test_data::genotype_dataset();
        let eval = Shannon::default().evaluate(&Subset::empty(5), &data).unwrap();
        assert_eq!(eval.value(), 0.0);
    }

    #[test]
    fn test_shannon_delta() {
        test_support::assert_delta_matches(&Shannon::default());
    }
}
