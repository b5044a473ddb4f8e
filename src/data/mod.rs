//! In-memory datasets: genotypes, phenotypes and precomputed distances.

mod dataset;
mod distances;
mod genotype;
mod header;
mod phenotype;

pub use dataset::CoreHunterData;
pub use distances::DistanceMatrixData;
pub use genotype::{FREQUENCY_TOLERANCE, GenotypeData, Marker};
pub use header::Header;
pub use phenotype::{Feature, PhenotypeData, PhenotypeValue, Scale};
