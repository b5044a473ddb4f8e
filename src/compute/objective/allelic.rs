//! Shared evaluation of objectives computed from the average genotype.

use super::{AlleleFrequencyEvaluation, Evaluation, check_subset};
use crate::compute::diversity::AverageGenotype;
use crate::compute::{Subset, SubsetMove};
use crate::data::CoreHunterData;
use crate::error::{CoreHunterError, Result};
use crate::schema::MissingAlleleResolution;

/// Diversity formula over resolved average frequencies.
pub(crate) type AlleleFormula = fn(&AverageGenotype) -> f64;

pub(crate) fn evaluate_allelic(
    objective: &'static str,
    subset: &Subset,
    data: &CoreHunterData,
    resolution: MissingAlleleResolution,
    formula: AlleleFormula,
) -> Result<Evaluation> {
    check_subset(subset, data)?;
    let genotypes = data.genotypes()?;
    let average =
        AverageGenotype::from_scratch(subset.selected().iter().copied(), genotypes, resolution);
    let value = formula(&average);
    Ok(Evaluation::AlleleFrequency(AlleleFrequencyEvaluation {
        objective,
        average,
        value,
    }))
}

/// Update the average genotype with the move, then recompute the formula.
pub(crate) fn evaluate_allelic_delta(
    objective: &'static str,
    mv: &SubsetMove,
    subset: &Subset,
    current: &Evaluation,
    data: &CoreHunterData,
    resolution: MissingAlleleResolution,
    formula: AlleleFormula,
) -> Result<Evaluation> {
    check_subset(subset, data)?;
    subset.validate_move(mv)?;
    let current = current.as_allele_frequency()?;
    if current.objective != objective {
        return Err(CoreHunterError::incompatible_move(format!(
            "evaluation of {} passed to {}",
            current.objective, objective
        )));
    }
    if current.average.resolution() != resolution {
        return Err(CoreHunterError::incompatible_move(format!(
            "evaluation resolves missing alleles with {:?}, objective with {:?}",
            current.average.resolution(),
            resolution
        )));
    }
    if current.average.count() != subset.num_selected() {
        return Err(CoreHunterError::incompatible_move(format!(
            "evaluation averages {} items, subset has {}",
            current.average.count(),
            subset.num_selected()
        )));
    }
    let genotypes = data.genotypes()?;
    let average = current.average.update(&mv.added, &mv.removed, genotypes);
    let value = formula(&average);
    Ok(Evaluation::AlleleFrequency(AlleleFrequencyEvaluation {
        objective,
        average,
        value,
    }))
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::compute::distance::test_data;
    use crate::compute::objective::Objective;
    use crate::compute::{Subset, SubsetMove};

    /// Apply a fixed move sequence and compare delta against full evaluation.
    pub fn assert_delta_matches(objective: &dyn Objective) {
        let data = test_data::genotype_dataset();
        let moves = [
            SubsetMove::addition(4),
            SubsetMove::new([0, 2], []),
            SubsetMove::swap(3, 4),
            SubsetMove::new([1, 4], [0, 2, 3]),
            SubsetMove::new([], [1, 4]),
            SubsetMove::new([0, 1, 2, 3, 4], []),
        ];
        let mut subset = Subset::empty(5);
        let mut eval = objective.evaluate(&subset, &data).unwrap();
        for mv in &moves {
            let delta = objective.evaluate_delta(mv, &subset, &eval, &data).unwrap();
            subset.apply(mv).unwrap();
            let full = objective.evaluate(&subset, &data).unwrap();
            assert!(
                (delta.value() - full.value()).abs() < 1e-10,
                "{} on {:?}: delta {} vs full {}",
                objective.name(),
                subset.selected(),
                delta.value(),
                full.value()
            );
            eval = delta;
        }
    }
}
