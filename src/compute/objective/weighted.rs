//! Weighted combination of objectives into a single maximized score.

use super::{Evaluation, Objective, WeightedEvaluation, build_objective};
use crate::compute::{Subset, SubsetMove};
use crate::data::CoreHunterData;
use crate::error::{CoreHunterError, Result};
use crate::schema::{NormalizationRange, ObjectiveConfig, ObjectiveType};

/// One term of a [`WeightedObjective`].
#[derive(Debug)]
pub struct WeightedComponent {
    pub objective_type: ObjectiveType,
    pub objective: Box<dyn Objective>,
    pub weight: f64,
    pub normalization: Option<NormalizationRange>,
}

impl WeightedComponent {
    /// Contribution of a component value to the weighted score.
    pub fn score(&self, value: f64) -> f64 {
        if self.weight == 0.0 {
            return 0.0;
        }
        let value = match self.normalization {
            Some(range) => range.normalize(value),
            None => value,
        };
        let score = self.weight * value;
        if self.objective.is_minimizing() {
            -score
        } else {
            score
        }
    }
}

/// Sum of weighted, optionally normalized component values.
///
/// Minimizing components enter with a negative sign so that the combined
/// score is always maximized.
#[derive(Debug)]
pub struct WeightedObjective {
    components: Vec<WeightedComponent>,
}

impl WeightedObjective {
    pub fn new(components: Vec<WeightedComponent>) -> Result<Self> {
        if components.is_empty() {
            return Err(CoreHunterError::construction(
                "weighted objective needs at least one component",
            ));
        }
        Ok(Self { components })
    }

    /// Build every configured objective against `data`.
    pub fn from_config(configs: &[ObjectiveConfig], data: &CoreHunterData) -> Result<Self> {
        let components = configs
            .iter()
            .map(|config| {
                Ok(WeightedComponent {
                    objective_type: config.objective,
                    objective: build_objective(config, data)?,
                    weight: config.weight,
                    normalization: config.normalization,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(components)
    }

    pub fn components(&self) -> &[WeightedComponent] {
        &self.components
    }

    fn combine(&self, evaluations: Vec<Evaluation>) -> Evaluation {
        let value = self
            .components
            .iter()
            .zip(&evaluations)
            .map(|(component, eval)| component.score(eval.value()))
            .sum();
        Evaluation::Weighted(WeightedEvaluation {
            components: evaluations,
            value,
        })
    }
}

impl Objective for WeightedObjective {
    fn evaluate(&self, subset: &Subset, data: &CoreHunterData) -> Result<Evaluation> {
        let evaluations = self
            .components
            .iter()
            .map(|c| c.objective.evaluate(subset, data))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.combine(evaluations))
    }

    fn evaluate_delta(
        &self,
        mv: &SubsetMove,
        subset: &Subset,
        current: &Evaluation,
        data: &CoreHunterData,
    ) -> Result<Evaluation> {
        let current = current.as_weighted()?;
        if current.components.len() != self.components.len() {
            return Err(CoreHunterError::incompatible_move(format!(
                "evaluation has {} components, objective has {}",
                current.components.len(),
                self.components.len()
            )));
        }
        let evaluations = self
            .components
            .iter()
            .zip(&current.components)
            .map(|(c, eval)| c.objective.evaluate_delta(mv, subset, eval, data))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.combine(evaluations))
    }

    fn is_minimizing(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "Weighted objective"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::distance::test_data;

    fn configs() -> Vec<ObjectiveConfig> {
        let mut accession = ObjectiveConfig::new(ObjectiveType::AverageAccessionToNearestEntry);
        accession.weight = 0.5;
        let mut coverage = ObjectiveConfig::new(ObjectiveType::Coverage);
        coverage.normalization = Some(NormalizationRange {
            lower: 0.5,
            upper: 1.0,
        });
        vec![
            ObjectiveConfig::new(ObjectiveType::AverageEntryToEntry).with_weight(2.0),
            accession,
            coverage,
        ]
    }

    #[test]
    fn test_weighted_value() {
        let data = test_data::genotype_dataset();
        let weighted = WeightedObjective::from_config(&configs(), &data).unwrap();
        let subset = Subset::new(5, [0, 1, 2]).unwrap();
        let eval = weighted.evaluate(&subset, &data).unwrap();

        let Evaluation::Weighted(weighted_eval) = &eval else {
            panic!("unexpected evaluation kind");
        };
        let parts: Vec<f64> = weighted_eval.components().iter().map(|e| e.value()).collect();
        // coverage of items 0, 1, 2 is 1, normalized to 1
        let expected = 2.0 * parts[0] - 0.5 * parts[1] + 1.0;
        assert_eq!(parts[2], 1.0);
        assert!((eval.value() - expected).abs() < 1e-12);
        assert!(!weighted.is_minimizing());
    }

    #[test]
    fn test_weighted_delta() {
        let data = test_data::genotype_dataset();
        let weighted = WeightedObjective::from_config(&configs(), &data).unwrap();
        let mut subset = Subset::new(5, [0, 3]).unwrap();
        let mut eval = weighted.evaluate(&subset, &data).unwrap();
        for mv in [
            SubsetMove::swap(1, 0),
            SubsetMove::addition(4),
            SubsetMove::new([0, 2], [3, 4]),
        ] {
            let delta = weighted.evaluate_delta(&mv, &subset, &eval, &data).unwrap();
            subset.apply(&mv).unwrap();
            let full = weighted.evaluate(&subset, &data).unwrap();
            assert!((delta.value() - full.value()).abs() < 1e-10);
            eval = delta;
        }
    }

    #[test]
    fn test_zero_weight_ignores_infinite_values() {
        let data = test_data::genotype_dataset();
        let mut accession = ObjectiveConfig::new(ObjectiveType::AverageAccessionToNearestEntry);
        accession.weight = 0.0;
        let weighted = WeightedObjective::from_config(
            &[accession, ObjectiveConfig::new(ObjectiveType::Coverage)],
            &data,
        )
        .unwrap();
        let eval = weighted.evaluate(&Subset::empty(5), &data).unwrap();
        assert_eq!(eval.value(), 0.0);
    }

    #[test]
    fn test_empty_components_rejected() {
        assert!(matches!(
            WeightedObjective::new(Vec::new()),
            Err(CoreHunterError::Construction { .. })
        ));
    }
}
