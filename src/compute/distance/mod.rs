//! Pairwise distance measures over a [`CoreHunterData`] dataset.
//!
//! Every measure is symmetric with `distance(id, id) == 0` and carries a
//! [`MissingValuesPolicy`] that decides what a term with a missing value
//! contributes: nothing (`Floor`) or the largest possible amount (`Ceil`).
//!
//! # Measures
//!
//! - [`ModifiedRogers`]: Euclidean distance between allele frequency vectors
//! - [`CavalliSforzaEdwards`]: chord distance on square-rooted frequencies
//! - [`Gower`]: mixed-scale phenotype distance
//! - [`Precomputed`]: lookup in a distance matrix
//!
//! [`CachedDistance`] memoizes any of them in a caller-owned [`DistanceCache`].

mod cache;
mod cavalli_sforza;
mod gower;
mod modified_rogers;
mod precomputed;

use std::fmt;

use crate::data::{CoreHunterData, GenotypeData};
use crate::error::{DataKind, Result};
use crate::schema::{DistanceMeasureType, MissingValuesPolicy};

pub use cache::{CachedDistance, DistanceCache};
pub use cavalli_sforza::CavalliSforzaEdwards;
pub use gower::Gower;
pub use modified_rogers::ModifiedRogers;
pub use precomputed::Precomputed;

/// A symmetric pairwise distance between items of a dataset.
pub trait DistanceMeasure: Send + Sync + fmt::Debug {
    /// Distance between items `x` and `y`.
    fn distance(&self, x: usize, y: usize, data: &CoreHunterData) -> Result<f64>;

    fn missing_values_policy(&self) -> MissingValuesPolicy;

    fn set_missing_values_policy(&mut self, policy: MissingValuesPolicy);

    /// Sub-dataset this measure reads.
    fn required_data(&self) -> DataKind;

    fn name(&self) -> &'static str;
}

impl<M: DistanceMeasure + ?Sized> DistanceMeasure for Box<M> {
    fn distance(&self, x: usize, y: usize, data: &CoreHunterData) -> Result<f64> {
        (**self).distance(x, y, data)
    }

    fn missing_values_policy(&self) -> MissingValuesPolicy {
        (**self).missing_values_policy()
    }

    fn set_missing_values_policy(&mut self, policy: MissingValuesPolicy) {
        (**self).set_missing_values_policy(policy)
    }

    fn required_data(&self) -> DataKind {
        (**self).required_data()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl MissingValuesPolicy {
    /// Contribution of a term with a missing value, given the term's maximum.
    #[inline]
    pub fn resolve(self, max_contribution: f64) -> f64 {
        match self {
            Self::Floor => 0.0,
            Self::Ceil => max_contribution,
        }
    }
}

/// Build an uncached measure of the given type.
pub fn build_measure(
    kind: DistanceMeasureType,
    policy: MissingValuesPolicy,
) -> Box<dyn DistanceMeasure> {
    match kind {
        DistanceMeasureType::ModifiedRogers => Box::new(ModifiedRogers::new(policy)),
        DistanceMeasureType::CavalliSforzaEdwards => Box::new(CavalliSforzaEdwards::new(policy)),
        DistanceMeasureType::Gower => Box::new(Gower::new(policy)),
        DistanceMeasureType::Precomputed => Box::new(Precomputed::new(policy)),
    }
}

/// Largest per-marker sum of squared frequency differences.
const MAX_MARKER_TERM: f64 = 2.0;

/// Shared skeleton of the allele-frequency distances:
/// `sqrt(sum_markers sum_alleles term(p_x, p_y) / (2 * numMarkers))`.
///
/// A marker where either item has a missing frequency contributes the
/// policy value for the whole marker (0 or 2).
pub(crate) fn allele_frequency_distance(
    genotypes: &GenotypeData,
    x: usize,
    y: usize,
    policy: MissingValuesPolicy,
    term: impl Fn(f64, f64) -> f64,
) -> f64 {
    if x == y {
        return 0.0;
    }
    let num_markers = genotypes.num_markers();
    let mut total = 0.0;
    for m in 0..num_markers {
        if genotypes.has_missing(x, m) || genotypes.has_missing(y, m) {
            total += policy.resolve(MAX_MARKER_TERM);
            continue;
        }
        for (px, py) in genotypes
            .marker_frequencies(x, m)
            .iter()
            .zip(genotypes.marker_frequencies(y, m))
        {
            if let (Some(px), Some(py)) = (px, py) {
                total += term(*px, *py);
            }
        }
    }
    (total / (2.0 * num_markers as f64)).sqrt()
}
