//! Evaluation results with the bookkeeping needed for delta evaluation.

use super::nearest_entry::Tracking;
use crate::compute::diversity::AverageGenotype;
use crate::error::{CoreHunterError, Result};

/// Result of evaluating an objective on a subset.
///
/// Beyond the value, each variant keeps what its objective needs to score a
/// move without starting over. Pass it back unchanged into
/// [`Objective::evaluate_delta`](super::Objective::evaluate_delta).
#[derive(Debug, Clone)]
pub enum Evaluation {
    PairwiseSum(PairwiseSumEvaluation),
    NearestEntry(NearestEntryEvaluation),
    AlleleFrequency(AlleleFrequencyEvaluation),
    Weighted(WeightedEvaluation),
}

impl Evaluation {
    pub fn value(&self) -> f64 {
        match self {
            Self::PairwiseSum(e) => e.value(),
            Self::NearestEntry(e) => e.value(),
            Self::AlleleFrequency(e) => e.value(),
            Self::Weighted(e) => e.value(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::PairwiseSum(_) => "pairwise sum",
            Self::NearestEntry(_) => "nearest entry",
            Self::AlleleFrequency(_) => "allele frequency",
            Self::Weighted(_) => "weighted",
        }
    }

    pub(crate) fn as_pairwise_sum(&self) -> Result<&PairwiseSumEvaluation> {
        match self {
            Self::PairwiseSum(e) => Ok(e),
            other => Err(mismatch("pairwise sum", other)),
        }
    }

    pub(crate) fn as_nearest_entry(&self) -> Result<&NearestEntryEvaluation> {
        match self {
            Self::NearestEntry(e) => Ok(e),
            other => Err(mismatch("nearest entry", other)),
        }
    }

    pub(crate) fn as_allele_frequency(&self) -> Result<&AlleleFrequencyEvaluation> {
        match self {
            Self::AlleleFrequency(e) => Ok(e),
            other => Err(mismatch("allele frequency", other)),
        }
    }

    pub(crate) fn as_weighted(&self) -> Result<&WeightedEvaluation> {
        match self {
            Self::Weighted(e) => Ok(e),
            other => Err(mismatch("weighted", other)),
        }
    }
}

fn mismatch(expected: &str, found: &Evaluation) -> CoreHunterError {
    CoreHunterError::incompatible_move(format!(
        "expected a {} evaluation, got a {} evaluation",
        expected,
        found.kind()
    ))
}

/// Sum of all pairwise distances within the selection.
#[derive(Debug, Clone)]
pub struct PairwiseSumEvaluation {
    pub(crate) sum: f64,
    pub(crate) count: usize,
}

impl PairwiseSumEvaluation {
    /// Mean pairwise distance, 0 with fewer than two entries.
    pub fn value(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        let pairs = (self.count * (self.count - 1) / 2) as f64;
        self.sum / pairs
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

/// Closest selected entry of a tracked item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestEntry {
    pub id: usize,
    pub distance: f64,
}

/// Nearest selected entry of each tracked item, indexed by item id.
#[derive(Debug, Clone)]
pub struct NearestEntryEvaluation {
    pub(crate) tracking: Tracking,
    pub(crate) nearest: Vec<Option<NearestEntry>>,
    pub(crate) sum: f64,
    pub(crate) tracked: usize,
}

impl NearestEntryEvaluation {
    /// Mean distance to the nearest entry over tracked items.
    pub fn value(&self) -> f64 {
        if self.tracked == 0 {
            self.tracking.empty_value()
        } else {
            self.sum / self.tracked as f64
        }
    }

    pub fn nearest(&self, id: usize) -> Option<NearestEntry> {
        self.nearest.get(id).copied().flatten()
    }

    /// Sum of nearest-entry distances.
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Number of items with a nearest entry.
    pub fn tracked(&self) -> usize {
        self.tracked
    }
}

/// Average genotype of the selection and the objective value derived from it.
#[derive(Debug, Clone)]
pub struct AlleleFrequencyEvaluation {
    /// Name of the objective whose formula produced `value`.
    pub(crate) objective: &'static str,
    pub(crate) average: AverageGenotype,
    pub(crate) value: f64,
}

impl AlleleFrequencyEvaluation {
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn objective(&self) -> &'static str {
        self.objective
    }

    pub fn average(&self) -> &AverageGenotype {
        &self.average
    }
}

/// Component evaluations of a weighted objective.
#[derive(Debug, Clone)]
pub struct WeightedEvaluation {
    pub(crate) components: Vec<Evaluation>,
    pub(crate) value: f64,
}

impl WeightedEvaluation {
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn components(&self) -> &[Evaluation] {
        &self.components
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairwise_sum_value() {
        let single = PairwiseSumEvaluation { sum: 0.0, count: 1 };
        assert_eq!(single.value(), 0.0);
        let three = PairwiseSumEvaluation { sum: 1.5, count: 3 };
        assert!((three.value() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_nearest_entry_empty_value() {
        let eval = NearestEntryEvaluation {
            tracking: Tracking::Accessions,
            nearest: vec![None; 3],
            sum: 0.0,
            tracked: 0,
        };
        assert_eq!(eval.value(), f64::INFINITY);
        assert_eq!(eval.nearest(1), None);
    }

    #[test]
    fn test_kind_mismatch() {
        let eval = Evaluation::PairwiseSum(PairwiseSumEvaluation { sum: 0.0, count: 0 });
        assert!(eval.as_pairwise_sum().is_ok());
        assert!(matches!(
            eval.as_nearest_entry(),
            Err(CoreHunterError::IncompatibleMove { .. })
        ));
    }
}
