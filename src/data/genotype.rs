//! Genotype data: per-item allele frequencies for a set of markers.

use serde::{Deserialize, Serialize};

use super::Header;
use crate::error::{CoreHunterError, Result};

/// Tolerance used when checking that allele frequencies sum to one.
pub const FREQUENCY_TOLERANCE: f64 = 1e-6;

/// A genomic locus with two or more alleles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Marker {
    #[serde(default)]
    pub name: Option<String>,
    pub alleles: Vec<String>,
}

impl Marker {
    pub fn new(name: Option<String>, alleles: Vec<String>) -> Self {
        Self { name, alleles }
    }

    /// Marker whose alleles are labelled by their index.
    pub fn with_allele_count(name: Option<String>, count: usize) -> Self {
        Self {
            name,
            alleles: (0..count).map(|a| a.to_string()).collect(),
        }
    }

    #[inline]
    pub fn num_alleles(&self) -> usize {
        self.alleles.len()
    }
}

/// Allele frequencies for every (item, marker, allele), item-major.
///
/// Frequencies are relative (in `[0, 1]`) and sum to one per item and marker
/// unless a value is missing at that marker.
#[derive(Debug, Clone)]
pub struct GenotypeData {
    headers: Vec<Header>,
    markers: Vec<Marker>,
    /// Start of each marker's alleles within an item row (`markers.len() + 1` entries).
    offsets: Vec<usize>,
    frequencies: Vec<Option<f64>>,
    /// Whether item `id` has any missing allele at marker `m` (`id * markers + m`).
    missing: Vec<bool>,
}

impl GenotypeData {
    /// Build from nested frequencies indexed as `[item][marker][allele]`.
    pub fn new(
        headers: Vec<Header>,
        markers: Vec<Marker>,
        frequencies: Vec<Vec<Vec<Option<f64>>>>,
    ) -> Result<Self> {
        if headers.len() != frequencies.len() {
            return Err(CoreHunterError::invalid_data(format!(
                "{} genotype headers for {} items",
                headers.len(),
                frequencies.len()
            )));
        }
        if markers.is_empty() {
            return Err(CoreHunterError::invalid_data("genotype data has no markers"));
        }

        let mut offsets = Vec::with_capacity(markers.len() + 1);
        offsets.push(0);
        for (m, marker) in markers.iter().enumerate() {
            if marker.num_alleles() < 2 {
                return Err(CoreHunterError::invalid_data(format!(
                    "marker {} has {} alleles, at least 2 required",
                    m,
                    marker.num_alleles()
                )));
            }
            offsets.push(offsets[m] + marker.num_alleles());
        }
        let total = offsets[markers.len()];

        let mut flat = Vec::with_capacity(frequencies.len() * total);
        let mut missing = Vec::with_capacity(frequencies.len() * markers.len());
        for (id, item) in frequencies.into_iter().enumerate() {
            if item.len() != markers.len() {
                return Err(CoreHunterError::invalid_data(format!(
                    "item {} has {} markers, expected {}",
                    id,
                    item.len(),
                    markers.len()
                )));
            }
            for (m, values) in item.into_iter().enumerate() {
                if values.len() != markers[m].num_alleles() {
                    return Err(CoreHunterError::invalid_data(format!(
                        "item {} marker {} has {} allele frequencies, expected {}",
                        id,
                        m,
                        values.len(),
                        markers[m].num_alleles()
                    )));
                }
                let mut sum = 0.0;
                let mut any_missing = false;
                for value in &values {
                    match value {
                        Some(f) if !f.is_finite() || *f < 0.0 || *f > 1.0 => {
                            return Err(CoreHunterError::invalid_data(format!(
                                "item {} marker {}: frequency {} outside [0, 1]",
                                id, m, f
                            )));
                        }
                        Some(f) => sum += f,
                        None => any_missing = true,
                    }
                }
                let sum_ok = if any_missing {
                    sum <= 1.0 + FREQUENCY_TOLERANCE
                } else {
                    (sum - 1.0).abs() <= FREQUENCY_TOLERANCE
                };
                if !sum_ok {
                    return Err(CoreHunterError::invalid_data(format!(
                        "item {} marker {}: allele frequencies sum to {}",
                        id, m, sum
                    )));
                }
                missing.push(any_missing);
                flat.extend(values);
            }
        }

        Ok(Self {
            headers,
            markers,
            offsets,
            frequencies: flat,
            missing,
        })
    }

    /// Build from observed allele indices for a fixed ploidy.
    ///
    /// `observations[item][marker]` lists `ploidy` allele indices (e.g. the two
    /// alleles of a diploid call); each observation adds `1 / ploidy` to its
    /// allele. `None` marks the whole marker as missing for that item.
    pub fn from_observations(
        headers: Vec<Header>,
        markers: Vec<Marker>,
        ploidy: usize,
        observations: Vec<Vec<Option<Vec<usize>>>>,
    ) -> Result<Self> {
        if ploidy == 0 {
            return Err(CoreHunterError::invalid_data("ploidy must be positive"));
        }
        let share = 1.0 / ploidy as f64;
        let mut frequencies = Vec::with_capacity(observations.len());
        for (id, item) in observations.into_iter().enumerate() {
            let mut row = Vec::with_capacity(item.len());
            for (m, call) in item.into_iter().enumerate() {
                let num_alleles = markers.get(m).map(Marker::num_alleles).unwrap_or(0);
                match call {
                    None => row.push(vec![None; num_alleles]),
                    Some(alleles) => {
                        if alleles.len() != ploidy {
                            return Err(CoreHunterError::invalid_data(format!(
                                "item {} marker {}: {} observed alleles, ploidy is {}",
                                id,
                                m,
                                alleles.len(),
                                ploidy
                            )));
                        }
                        let mut values = vec![Some(0.0); num_alleles];
                        for a in alleles {
                            let slot = values.get_mut(a).ok_or_else(|| {
                                CoreHunterError::invalid_data(format!(
                                    "item {} marker {}: allele index {} out of range",
                                    id, m, a
                                ))
                            })?;
                            *slot = slot.map(|f| f + share);
                        }
                        row.push(values);
                    }
                }
            }
            frequencies.push(row);
        }
        Self::new(headers, markers, frequencies)
    }

    /// Number of items.
    #[inline]
    pub fn size(&self) -> usize {
        self.headers.len()
    }

    #[inline]
    pub fn num_markers(&self) -> usize {
        self.markers.len()
    }

    #[inline]
    pub fn num_alleles(&self, marker: usize) -> usize {
        self.markers[marker].num_alleles()
    }

    /// Sum of allele counts over all markers.
    #[inline]
    pub fn total_alleles(&self) -> usize {
        self.offsets[self.markers.len()]
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    pub fn header(&self, id: usize) -> &Header {
        &self.headers[id]
    }

    /// Frequency of `allele` at `marker` for item `id`, `None` if missing.
    #[inline]
    pub fn allele_frequency(&self, id: usize, marker: usize, allele: usize) -> Option<f64> {
        self.marker_frequencies(id, marker)[allele]
    }

    /// All allele frequencies of one item at one marker.
    #[inline]
    pub fn marker_frequencies(&self, id: usize, marker: usize) -> &[Option<f64>] {
        let row = id * self.total_alleles();
        &self.frequencies[row + self.offsets[marker]..row + self.offsets[marker + 1]]
    }

    /// Position of the first allele of `marker` within an item row.
    #[inline]
    pub fn allele_offset(&self, marker: usize) -> usize {
        self.offsets[marker]
    }

    /// All allele frequencies of one item, marker after marker.
    #[inline]
    pub fn item_frequencies(&self, id: usize) -> &[Option<f64>] {
        let total = self.total_alleles();
        &self.frequencies[id * total..(id + 1) * total]
    }

    /// Whether item `id` has any missing allele frequency at `marker`.
    #[inline]
    pub fn has_missing(&self, id: usize, marker: usize) -> bool {
        self.missing[id * self.markers.len() + marker]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(n: usize) -> Vec<Header> {
        (0..n).map(|i| Header::named(format!("item-{}", i))).collect()
    }

    #[test]
    fn test_frequency_access() {
        let markers = vec![
            Marker::with_allele_count(Some("m1".into()), 2),
            Marker::with_allele_count(Some("m2".into()), 3),
        ];
        let data = GenotypeData::new(
            headers(2),
            markers,
            vec![
                vec![vec![Some(1.0), Some(0.0)], vec![Some(0.2), Some(0.3), Some(0.5)]],
                vec![vec![None, None], vec![Some(0.0), Some(1.0), Some(0.0)]],
            ],
        )
        .unwrap();

        assert_eq!(data.size(), 2);
        assert_eq!(data.total_alleles(), 5);
        assert_eq!(data.allele_frequency(0, 1, 2), Some(0.5));
        assert_eq!(data.allele_frequency(1, 0, 0), None);
        assert!(data.has_missing(1, 0));
        assert!(!data.has_missing(1, 1));
        assert_eq!(data.marker_frequencies(1, 1), &[Some(0.0), Some(1.0), Some(0.0)]);
    }

    #[test]
    fn test_rejects_bad_sum() {
        let result = GenotypeData::new(
            headers(1),
            vec![Marker::with_allele_count(None, 2)],
            vec![vec![vec![Some(0.7), Some(0.7)]]],
        );
        assert!(matches!(result, Err(CoreHunterError::InvalidData { .. })));
    }

    #[test]
    fn test_rejects_single_allele_marker() {
        let result = GenotypeData::new(
            headers(1),
            vec![Marker::with_allele_count(None, 1)],
            vec![vec![vec![Some(1.0)]]],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_from_diploid_observations() {
        let data = GenotypeData::from_observations(
            headers(3),
            vec![Marker::with_allele_count(None, 3)],
            2,
            vec![
                vec![Some(vec![0, 0])],
                vec![Some(vec![0, 2])],
                vec![None],
            ],
        )
        .unwrap();

        assert_eq!(data.marker_frequencies(0, 0), &[Some(1.0), Some(0.0), Some(0.0)]);
        assert_eq!(data.marker_frequencies(1, 0), &[Some(0.5), Some(0.0), Some(0.5)]);
        assert!(data.has_missing(2, 0));
    }

    #[test]
    fn test_observation_out_of_range() {
        let result = GenotypeData::from_observations(
            headers(1),
            vec![Marker::with_allele_count(None, 2)],
            2,
            vec![vec![Some(vec![0, 5])]],
        );
        assert!(result.is_err());
    }
}
