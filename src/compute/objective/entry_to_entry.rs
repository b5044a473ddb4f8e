//! Average distance between all pairs of selected entries.

use super::{Evaluation, Objective, PairwiseSumEvaluation, check_subset};
use crate::compute::distance::DistanceMeasure;
use crate::compute::{Subset, SubsetMove};
use crate::data::CoreHunterData;
use crate::error::{CoreHunterError, Result};

/// Mean pairwise distance over the selection, 0 for fewer than two entries.
#[derive(Debug)]
pub struct AverageEntryToEntry<M = Box<dyn DistanceMeasure>> {
    measure: M,
}

impl<M: DistanceMeasure> AverageEntryToEntry<M> {
    pub fn new(measure: M) -> Self {
        Self { measure }
    }

    pub fn measure(&self) -> &M {
        &self.measure
    }

    /// Sum of distances from `id` to every item of `others`.
    fn sum_to<'a>(
        &self,
        id: usize,
        others: impl IntoIterator<Item = &'a usize>,
        data: &CoreHunterData,
    ) -> Result<f64> {
        let mut sum = 0.0;
        for &other in others {
            sum += self.measure.distance(id, other, data)?;
        }
        Ok(sum)
    }

    /// Sum of distances over all unordered pairs of `ids`.
    fn sum_within(&self, ids: &[usize], data: &CoreHunterData) -> Result<f64> {
        let mut sum = 0.0;
        for (k, &id) in ids.iter().enumerate() {
            sum += self.sum_to(id, &ids[k + 1..], data)?;
        }
        Ok(sum)
    }
}

impl<M: DistanceMeasure + 'static> Objective for AverageEntryToEntry<M> {
    fn evaluate(&self, subset: &Subset, data: &CoreHunterData) -> Result<Evaluation> {
        check_subset(subset, data)?;
        data.require(self.measure.required_data())?;
        let selected: Vec<usize> = subset.selected().iter().copied().collect();
        Ok(Evaluation::PairwiseSum(PairwiseSumEvaluation {
            sum: self.sum_within(&selected, data)?,
            count: selected.len(),
        }))
    }

    fn evaluate_delta(
        &self,
        mv: &SubsetMove,
        subset: &Subset,
        current: &Evaluation,
        data: &CoreHunterData,
    ) -> Result<Evaluation> {
        check_subset(subset, data)?;
        subset.validate_move(mv)?;
        let current = current.as_pairwise_sum()?;
        if current.count != subset.num_selected() {
            return Err(CoreHunterError::incompatible_move(format!(
                "evaluation covers {} entries, subset has {}",
                current.count,
                subset.num_selected()
            )));
        }
        data.require(self.measure.required_data())?;

        let retained: Vec<usize> = subset
            .selected()
            .iter()
            .copied()
            .filter(|id| !mv.removed.contains(id))
            .collect();
        let removed: Vec<usize> = mv.removed.iter().copied().collect();
        let added: Vec<usize> = mv.added.iter().copied().collect();

        let mut sum = current.sum;
        for &id in &removed {
            sum -= self.sum_to(id, &retained, data)?;
        }
        sum -= self.sum_within(&removed, data)?;
        for &id in &added {
            sum += self.sum_to(id, &retained, data)?;
        }
        sum += self.sum_within(&added, data)?;

        let count = retained.len() + added.len();
        if count < 2 {
            sum = 0.0;
        }
        Ok(Evaluation::PairwiseSum(PairwiseSumEvaluation { sum, count }))
    }

    fn is_minimizing(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "Average entry-to-entry distance"
    }

    fn measure_name(&self) -> Option<&'static str> {
        Some(self.measure.name())
    }
}
