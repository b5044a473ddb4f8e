//! Crate-wide error type for dataset construction and objective evaluation.

use std::fmt;

use crate::schema::ConfigError;

/// Kind of data an objective or distance measure may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    Genotypes,
    Phenotypes,
    DistanceMatrix,
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Genotypes => write!(f, "genotype"),
            Self::Phenotypes => write!(f, "phenotype"),
            Self::DistanceMatrix => write!(f, "distance matrix"),
        }
    }
}

/// Main error type for Core Hunter operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreHunterError {
    /// Inconsistent dataset sizes or headers, or no sub-dataset at all.
    #[error("Dataset construction failed: {message}")]
    Construction { message: String },

    /// Invalid values inside a single sub-dataset (frequencies, ranges, matrix entries).
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// An objective or distance measure needs data the dataset does not carry.
    #[error("Dataset has no {kind} data")]
    MissingData { kind: DataKind },

    /// A delta evaluation received a move or evaluation it cannot interpret.
    #[error("Incompatible move: {message}")]
    IncompatibleMove { message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Type alias for Results using CoreHunterError.
pub type Result<T> = std::result::Result<T, CoreHunterError>;

impl CoreHunterError {
    pub fn construction(message: impl Into<String>) -> Self {
        Self::Construction {
            message: message.into(),
        }
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    pub fn missing_data(kind: DataKind) -> Self {
        Self::MissingData { kind }
    }

    pub fn incompatible_move(message: impl Into<String>) -> Self {
        Self::IncompatibleMove {
            message: message.into(),
        }
    }
}
