//! Allele coverage.

use super::allelic::{evaluate_allelic, evaluate_allelic_delta};
use super::{Evaluation, Objective};
use crate::compute::diversity::AverageGenotype;
use crate::compute::{Subset, SubsetMove};
use crate::data::CoreHunterData;
use crate::error::Result;
use crate::schema::MissingAlleleResolution;

/// Proportion of (marker, allele) pairs observed in the selection.
#[derive(Debug, Clone, Default)]
pub struct Coverage {
    resolution: MissingAlleleResolution,
}

impl Coverage {
    pub fn new(resolution: MissingAlleleResolution) -> Self {
        Self { resolution }
    }

    /// Fraction of resolved average frequencies above zero.
    pub fn formula(average: &AverageGenotype) -> f64 {
        let total = average.total_alleles();
        if total == 0 {
            return 0.0;
        }
        let observed = average.markers().flatten().filter(|&&f| f > 0.0).count();
        observed as f64 / total as f64
    }
}

impl Objective for Coverage {
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
        "Coverage"
    }
}
