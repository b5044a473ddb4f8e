//! Objective and distance measure selection.

use serde::{Deserialize, Serialize};

/// Scoring function applied to a candidate core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectiveType {
    /// Mean distance over all pairs of selected entries (maximized).
    AverageEntryToEntry,
    /// Mean distance from each selected entry to its closest other entry (maximized).
    AverageEntryToNearestEntry,
    /// Mean distance from every accession to its closest selected entry (minimized).
    AverageAccessionToNearestEntry,
    /// Proportion of observed alleles (maximized).
    Coverage,
    /// Shannon diversity index of the average allele frequencies (maximized).
    Shannon,
    /// Expected proportion of heterozygous loci (maximized).
    HeterozygousLoci,
}

impl ObjectiveType {
    /// Whether the objective scores subsets through pairwise distances.
    pub fn uses_distance(self) -> bool {
        matches!(
            self,
            Self::AverageEntryToEntry
                | Self::AverageEntryToNearestEntry
                | Self::AverageAccessionToNearestEntry
        )
    }
}

/// Pairwise distance measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistanceMeasureType {
    ModifiedRogers,
    CavalliSforzaEdwards,
    Gower,
    Precomputed,
}

/// Contribution of a distance term with a missing value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissingValuesPolicy {
    /// Missing terms contribute nothing.
    #[default]
    Floor,
    /// Missing terms contribute the largest possible amount.
    Ceil,
}

/// How missing allele mass is restored in averaged genotypes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissingAlleleResolution {
    /// The most frequent allele absorbs the missing mass (worst-case diversity).
    #[default]
    MostFrequentAllele,
    /// Leave averaged frequencies below one where data is missing.
    Unresolved,
}

/// Linear rescaling `(value - lower) / (upper - lower)` applied before weighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationRange {
    pub lower: f64,
    pub upper: f64,
}

impl NormalizationRange {
    pub fn normalize(&self, value: f64) -> f64 {
        (value - self.lower) / (self.upper - self.lower)
    }
}

/// One weighted objective of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectiveConfig {
    pub objective: ObjectiveType,
    /// Distance measure for pairwise objectives; chosen from the data if absent.
    #[serde(default)]
    pub measure: Option<DistanceMeasureType>,
    #[serde(default)]
    pub missing_values: MissingValuesPolicy,
    #[serde(default)]
    pub allele_resolution: MissingAlleleResolution,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub normalization: Option<NormalizationRange>,
    /// Memoize pairwise distances for the run.
    #[serde(default = "default_cache_distances")]
    pub cache_distances: bool,
}

impl ObjectiveConfig {
    pub fn new(objective: ObjectiveType) -> Self {
        Self {
            objective,
            measure: None,
            missing_values: MissingValuesPolicy::default(),
            allele_resolution: MissingAlleleResolution::default(),
            weight: default_weight(),
            normalization: None,
            cache_distances: default_cache_distances(),
        }
    }

    pub fn with_measure(mut self, measure: DistanceMeasureType) -> Self {
        self.measure = Some(measure);
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

impl Default for ObjectiveConfig {
    fn default() -> Self {
        Self::new(ObjectiveType::AverageEntryToNearestEntry)
    }
}

fn default_weight() -> f64 {
    1.0
}
fn default_cache_distances() -> bool {
    true
}
