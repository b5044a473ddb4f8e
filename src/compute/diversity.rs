//! Average genotype of a selection, maintained from scratch or incrementally.
//!
//! The average is taken per allele with missing values counted as 0. For
//! every marker where a selected item has a missing value, the resolved
//! frequencies are then completed to sum to one by giving the missing mass to
//! the most frequent allele. This is a worst-case (minimal diversity) policy
//! choice, selectable through [`MissingAlleleResolution`].

use log::trace;

use crate::data::GenotypeData;
use crate::schema::MissingAlleleResolution;

/// Frequencies closer than this to the maximum count as tied.
const TIE_TOLERANCE: f64 = 1e-12;

/// Averaged allele frequencies over a set of items.
#[derive(Debug, Clone)]
pub struct AverageGenotype {
    resolution: MissingAlleleResolution,
    count: usize,
    /// First allele of each marker, plus the total allele count.
    offsets: Vec<usize>,
    /// Per allele: mean frequency with missing values as 0.
    averages: Vec<f64>,
    /// Per allele: number of items with a positive frequency.
    observed: Vec<usize>,
    /// Per marker: number of items with a missing value.
    missing: Vec<usize>,
    /// Per allele: averages after missing-value resolution.
    resolved: Vec<f64>,
}

impl AverageGenotype {
    /// Average over `items`, computed from scratch.
    pub fn from_scratch(
        items: impl IntoIterator<Item = usize>,
        genotypes: &GenotypeData,
        resolution: MissingAlleleResolution,
    ) -> Self {
        let num_markers = genotypes.num_markers();
        let offsets: Vec<usize> = (0..num_markers)
            .map(|m| genotypes.allele_offset(m))
            .chain(std::iter::once(genotypes.total_alleles()))
            .collect();
        let total = genotypes.total_alleles();

        let mut sums = vec![0.0; total];
        let mut observed = vec![0; total];
        let mut missing = vec![0; num_markers];
        let mut count = 0;
        for id in items {
            accumulate(genotypes, id, &mut sums, &mut observed, &mut missing, true);
            count += 1;
        }

        let mut average = Self {
            resolution,
            count,
            offsets,
            averages: Vec::new(),
            observed,
            missing,
            resolved: Vec::new(),
        };
        average.finish(sums);
        average
    }

    /// Average after adding `added` to and removing `removed` from the items
    /// this average was computed over.
    ///
    /// Undoes the previous division, adjusts the raw sums with the changed
    /// items only, divides by the new count and resolves missing values again.
    pub fn update<'a>(
        &self,
        added: impl IntoIterator<Item = &'a usize>,
        removed: impl IntoIterator<Item = &'a usize>,
        genotypes: &GenotypeData,
    ) -> Self {
        let scale = self.count as f64;
        let mut sums: Vec<f64> = if self.count > 0 {
            self.averages.iter().map(|a| a * scale).collect()
        } else {
            vec![0.0; self.averages.len()]
        };
        let mut observed = self.observed.clone();
        let mut missing = self.missing.clone();
        let mut count = self.count;

        for &id in added {
            accumulate(genotypes, id, &mut sums, &mut observed, &mut missing, true);
            count += 1;
        }
        for &id in removed {
            accumulate(genotypes, id, &mut sums, &mut observed, &mut missing, false);
            count -= 1;
        }
        trace!("average genotype update: {} -> {} items", self.count, count);

        let mut average = Self {
            resolution: self.resolution,
            count,
            offsets: self.offsets.clone(),
            averages: Vec::new(),
            observed,
            missing,
            resolved: Vec::new(),
        };
        average.finish(sums);
        average
    }

    /// Divide the raw sums and resolve missing values.
    fn finish(&mut self, sums: Vec<f64>) {
        let count = self.count as f64;
        self.averages = sums
            .into_iter()
            .zip(&self.observed)
            .map(|(sum, &observed)| {
                if self.count == 0 || observed == 0 {
                    0.0
                } else {
                    sum / count
                }
            })
            .collect();

        self.resolved = self.averages.clone();
        if self.count == 0 || self.resolution == MissingAlleleResolution::Unresolved {
            return;
        }
        for m in 0..self.num_markers() {
            if self.missing[m] == 0 {
                continue;
            }
            let frequencies = &mut self.resolved[self.offsets[m]..self.offsets[m + 1]];
            let max = frequencies.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let deficit = 1.0 - frequencies.iter().sum::<f64>();
            if let Some(top) = frequencies.iter_mut().find(|f| **f >= max - TIE_TOLERANCE) {
                *top += deficit;
            }
        }
    }

    /// Number of averaged items.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn num_markers(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Total number of (marker, allele) pairs.
    #[inline]
    pub fn total_alleles(&self) -> usize {
        self.resolved.len()
    }

    pub fn resolution(&self) -> MissingAlleleResolution {
        self.resolution
    }

    /// Resolved frequencies at one marker.
    #[inline]
    pub fn frequencies(&self, marker: usize) -> &[f64] {
        &self.resolved[self.offsets[marker]..self.offsets[marker + 1]]
    }

    /// Frequencies at one marker before missing-value resolution.
    pub fn raw_frequencies(&self, marker: usize) -> &[f64] {
        &self.averages[self.offsets[marker]..self.offsets[marker + 1]]
    }

    /// Resolved frequencies, marker by marker.
    pub fn markers(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.num_markers()).map(move |m| self.frequencies(m))
    }

    /// Whether any averaged item has a missing value at `marker`.
    pub fn has_missing(&self, marker: usize) -> bool {
        self.missing[marker] > 0
    }
}

/// Add (or subtract) one item's raw frequencies, missing as 0.
fn accumulate(
    genotypes: &GenotypeData,
    id: usize,
    sums: &mut [f64],
    observed: &mut [usize],
    missing: &mut [usize],
    add: bool,
) {
    for (k, value) in genotypes.item_frequencies(id).iter().enumerate() {
        let Some(f) = *value else { continue };
        if f > 0.0 {
            if add {
                sums[k] += f;
                observed[k] += 1;
            } else {
                sums[k] -= f;
                observed[k] -= 1;
            }
        }
    }
    for (m, slot) in missing.iter_mut().enumerate() {
        if genotypes.has_missing(id, m) {
            if add {
                *slot += 1;
            } else {
                *slot -= 1;
            }
        }
    }
}
