//! The unified dataset handed to distance measures and objectives.

use log::debug;

use super::{DistanceMatrixData, GenotypeData, Header, PhenotypeData};
use crate::error::{CoreHunterError, DataKind, Result};

/// Immutable union of genotype, phenotype and precomputed distance data for
/// the same ordered set of items.
///
/// Items are addressed by dense ids in `0..size()`. All present sub-datasets
/// share the same size and agree on every item's header.
#[derive(Debug, Clone)]
pub struct CoreHunterData {
    size: usize,
    headers: Vec<Header>,
    genotypes: Option<GenotypeData>,
    phenotypes: Option<PhenotypeData>,
    distances: Option<DistanceMatrixData>,
}

impl CoreHunterData {
    /// Combine up to three sub-datasets.
    ///
    /// Fails when all are absent, when their sizes differ, or when headers of
    /// the same item conflict.
    pub fn new(
        genotypes: Option<GenotypeData>,
        phenotypes: Option<PhenotypeData>,
        distances: Option<DistanceMatrixData>,
    ) -> Result<Self> {
        let mut sources: Vec<(&str, &[Header])> = Vec::with_capacity(3);
        if let Some(g) = &genotypes {
            sources.push(("genotype", g.headers()));
        }
        if let Some(p) = &phenotypes {
            sources.push(("phenotype", p.headers()));
        }
        if let Some(d) = &distances {
            sources.push(("distance matrix", d.headers()));
        }

        let Some(&(first_name, first_headers)) = sources.first() else {
            return Err(CoreHunterError::construction(
                "at least one of genotype, phenotype or distance data is required",
            ));
        };
        let size = first_headers.len();

        let mut headers = first_headers.to_vec();
        for &(name, other) in &sources[1..] {
            if other.len() != size {
                return Err(CoreHunterError::construction(format!(
                    "{} data has {} items but {} data has {}",
                    name,
                    other.len(),
                    first_name,
                    size
                )));
            }
            for (id, (merged, header)) in headers.iter_mut().zip(other).enumerate() {
                if merged.conflicts_with(header) {
                    return Err(CoreHunterError::construction(format!(
                        "conflicting headers for item {}: {:?} vs {:?} ({} data)",
                        id, merged, header, name
                    )));
                }
                *merged = merged.merge(header);
            }
        }

        debug!(
            "Dataset with {} items (genotypes: {}, phenotypes: {}, distances: {})",
            size,
            genotypes.is_some(),
            phenotypes.is_some(),
            distances.is_some()
        );

        Ok(Self {
            size,
            headers,
            genotypes,
            phenotypes,
            distances,
        })
    }

    /// Number of items.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// All item ids, in order.
    pub fn ids(&self) -> std::ops::Range<usize> {
        0..self.size
    }

    /// Merged header of an item.
    pub fn header(&self, id: usize) -> &Header {
        &self.headers[id]
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    pub fn has_genotypes(&self) -> bool {
        self.genotypes.is_some()
    }

    pub fn has_phenotypes(&self) -> bool {
        self.phenotypes.is_some()
    }

    pub fn has_distances(&self) -> bool {
        self.distances.is_some()
    }

    pub fn genotypes(&self) -> Result<&GenotypeData> {
        self.genotypes
            .as_ref()
            .ok_or_else(|| CoreHunterError::missing_data(DataKind::Genotypes))
    }

    pub fn phenotypes(&self) -> Result<&PhenotypeData> {
        self.phenotypes
            .as_ref()
            .ok_or_else(|| CoreHunterError::missing_data(DataKind::Phenotypes))
    }

    pub fn distances(&self) -> Result<&DistanceMatrixData> {
        self.distances
            .as_ref()
            .ok_or_else(|| CoreHunterError::missing_data(DataKind::DistanceMatrix))
    }

    /// Fail with a missing-data error unless `kind` is present.
    pub fn require(&self, kind: DataKind) -> Result<()> {
        let present = match kind {
            DataKind::Genotypes => self.has_genotypes(),
            DataKind::Phenotypes => self.has_phenotypes(),
            DataKind::DistanceMatrix => self.has_distances(),
        };
        if present {
            Ok(())
        } else {
            Err(CoreHunterError::missing_data(kind))
        }
    }
}
