//! Serializable dataset input, converted into [`CoreHunterData`].

use serde::{Deserialize, Serialize};

use super::CoreHunterConfig;
use crate::data::{
    CoreHunterData, DistanceMatrixData, Feature, GenotypeData, Header, Marker, PhenotypeData,
    PhenotypeValue,
};
use crate::error::CoreHunterError;

/// Dataset as read from a run file. At least one part must be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetInput {
    #[serde(default)]
    pub genotypes: Option<GenotypeInput>,
    #[serde(default)]
    pub phenotypes: Option<PhenotypeInput>,
    #[serde(default)]
    pub distances: Option<DistanceMatrixInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenotypeInput {
    pub headers: Vec<Header>,
    pub markers: Vec<Marker>,
    pub values: GenotypeValues,
}

/// Encoding of genotype values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "format")]
pub enum GenotypeValues {
    /// Allele frequencies as `[item][marker][allele]`, `null` for missing.
    Frequencies {
        frequencies: Vec<Vec<Vec<Option<f64>>>>,
    },
    /// Observed allele indices as `[item][marker]`, `ploidy` per call, `null` for missing.
    Observations {
        ploidy: usize,
        alleles: Vec<Vec<Option<Vec<usize>>>>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhenotypeInput {
    pub headers: Vec<Header>,
    pub features: Vec<Feature>,
    /// Values as `[item][feature]`, `null` for missing.
    pub values: Vec<Vec<Option<PhenotypeValue>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceMatrixInput {
    pub headers: Vec<Header>,
    /// Full symmetric matrix with a zero diagonal.
    pub matrix: Vec<Vec<f64>>,
}

/// Contents of a run file: the dataset and how to select from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInput {
    pub dataset: DatasetInput,
    pub config: CoreHunterConfig,
}

impl TryFrom<GenotypeInput> for GenotypeData {
    type Error = CoreHunterError;

    fn try_from(input: GenotypeInput) -> Result<Self, Self::Error> {
        match input.values {
            GenotypeValues::Frequencies { frequencies } => {
                GenotypeData::new(input.headers, input.markers, frequencies)
            }
            GenotypeValues::Observations { ploidy, alleles } => {
                GenotypeData::from_observations(input.headers, input.markers, ploidy, alleles)
            }
        }
    }
}

impl TryFrom<DatasetInput> for CoreHunterData {
    type Error = CoreHunterError;

    fn try_from(input: DatasetInput) -> Result<Self, Self::Error> {
        let genotypes = input.genotypes.map(GenotypeData::try_from).transpose()?;
        let phenotypes = input
            .phenotypes
            .map(|p| PhenotypeData::new(p.headers, p.features, p.values))
            .transpose()?;
        let distances = input
            .distances
            .map(|d| DistanceMatrixData::new(d.headers, d.matrix))
            .transpose()?;
        CoreHunterData::new(genotypes, phenotypes, distances)
    }
}
