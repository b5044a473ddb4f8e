//! Objectives scoring a candidate core, with full and delta evaluation.
//!
//! Every objective evaluates a [`Subset`] from scratch and re-scores it after
//! a [`SubsetMove`] given the previous [`Evaluation`]. Both paths agree up to
//! floating point rounding.
//!
//! # Objectives
//!
//! - [`AverageEntryToEntry`]: mean pairwise distance within the core
//! - [`AverageEntryToNearestEntry`]: mean distance of each entry to its closest other entry
//! - [`AverageAccessionToNearestEntry`]: mean distance of every accession to the core
//! - [`Coverage`], [`Shannon`], [`HeterozygousLoci`]: allelic diversity of the core
//! - [`WeightedObjective`]: weighted combination of the above

mod allelic;
mod coverage;
mod entry_to_entry;
mod evaluation;
mod heterozygous_loci;
mod nearest_entry;
mod shannon;
mod weighted;

use std::fmt;
use std::sync::Arc;

use crate::compute::distance::{CachedDistance, DistanceCache, DistanceMeasure, build_measure};
use crate::compute::{Subset, SubsetMove};
use crate::data::CoreHunterData;
use crate::error::{CoreHunterError, Result};
use crate::schema::{DistanceMeasureType, ObjectiveConfig, ObjectiveType};

pub use coverage::Coverage;
pub use entry_to_entry::AverageEntryToEntry;
pub use evaluation::{
    AlleleFrequencyEvaluation, Evaluation, NearestEntry, NearestEntryEvaluation,
    PairwiseSumEvaluation, WeightedEvaluation,
};
pub use heterozygous_loci::HeterozygousLoci;
pub use nearest_entry::{AverageAccessionToNearestEntry, AverageEntryToNearestEntry};
pub use shannon::Shannon;
pub use weighted::{WeightedComponent, WeightedObjective};

/// A scalar scoring function over subsets of a dataset.
pub trait Objective: Send + Sync + fmt::Debug {
    /// Evaluate `subset` from scratch.
    fn evaluate(&self, subset: &Subset, data: &CoreHunterData) -> Result<Evaluation>;

    /// Evaluate the subset obtained by applying `mv` to `subset`, given the
    /// evaluation of `subset` itself.
    fn evaluate_delta(
        &self,
        mv: &SubsetMove,
        subset: &Subset,
        current: &Evaluation,
        data: &CoreHunterData,
    ) -> Result<Evaluation>;

    /// Whether lower values are better.
    fn is_minimizing(&self) -> bool;

    fn name(&self) -> &'static str;

    /// Distance measure used by pairwise objectives.
    fn measure_name(&self) -> Option<&'static str> {
        None
    }
}

/// Fail unless `subset` ranges over exactly the items of `data`.
pub(crate) fn check_subset(subset: &Subset, data: &CoreHunterData) -> Result<()> {
    if subset.total_size() != data.size() {
        return Err(CoreHunterError::invalid_data(format!(
            "subset ranges over {} items, dataset has {}",
            subset.total_size(),
            data.size()
        )));
    }
    Ok(())
}

/// Measure used when the configuration names none: the distance matrix if
/// present, else Modified Rogers on genotypes, else Gower on phenotypes.
pub fn default_measure(data: &CoreHunterData) -> DistanceMeasureType {
    if data.has_distances() {
        DistanceMeasureType::Precomputed
    } else if data.has_genotypes() {
        DistanceMeasureType::ModifiedRogers
    } else {
        DistanceMeasureType::Gower
    }
}

/// Build the objective described by `config`, failing early when `data`
/// lacks what it needs.
///
/// With `cache_distances` set, pairwise objectives get a fresh
/// [`DistanceCache`] owned by the returned objective.
pub fn build_objective(
    config: &ObjectiveConfig,
    data: &CoreHunterData,
) -> Result<Box<dyn Objective>> {
    let cache = (config.objective.uses_distance() && config.cache_distances)
        .then(|| Arc::new(DistanceCache::for_data(data)));
    build_objective_with_cache(config, data, cache)
}

/// Like [`build_objective`], memoizing distances in a caller-provided cache.
///
/// The cache must be sized for `data` and reserved for this objective's
/// measure configuration.
pub fn build_objective_with_cache(
    config: &ObjectiveConfig,
    data: &CoreHunterData,
    cache: Option<Arc<DistanceCache>>,
) -> Result<Box<dyn Objective>> {
    if let Some(cache) = &cache
        && cache.size() != data.size()
    {
        return Err(CoreHunterError::invalid_data(format!(
            "distance cache holds {} items but the dataset has {}",
            cache.size(),
            data.size()
        )));
    }
    let objective: Box<dyn Objective> = match config.objective {
        ObjectiveType::Coverage => {
            data.genotypes()?;
            Box::new(Coverage::new(config.allele_resolution))
        }
        ObjectiveType::Shannon => {
            data.genotypes()?;
            Box::new(Shannon::new(config.allele_resolution))
        }
        ObjectiveType::HeterozygousLoci => {
            data.genotypes()?;
            Box::new(HeterozygousLoci::new(config.allele_resolution))
        }
        pairwise => {
            let kind = config.measure.unwrap_or_else(|| default_measure(data));
            let measure = build_measure(kind, config.missing_values);
            data.require(measure.required_data())?;
            let measure: Box<dyn DistanceMeasure> = match cache {
                Some(cache) => Box::new(CachedDistance::new(measure, cache)),
                None => measure,
            };
            match pairwise {
                ObjectiveType::AverageEntryToEntry => Box::new(AverageEntryToEntry::new(measure)),
                ObjectiveType::AverageEntryToNearestEntry => {
                    Box::new(AverageEntryToNearestEntry::new(measure))
                }
                _ => Box::new(AverageAccessionToNearestEntry::new(measure)),
            }
        }
    };
    Ok(objective)
}
