//! Core Hunter - Selection of diverse core collections from genebank data.
//!
//! A core collection is a small subset of accessions that retains as much of
//! the diversity of the full collection as possible. This crate scores
//! candidate cores with distance-based and allelic-diversity objectives, and
//! re-scores them after small moves without recomputing everything.
//!
//! # Architecture
//!
//! - `data`: Genotypes, phenotypes and precomputed distances of the accessions
//! - `schema`: Serializable configuration, dataset input and result types
//! - `compute`: Distance measures, objectives and a reference search
//!
//! # Example
//!
//! ```rust,no_run
//! use corehunter::{
//!     compute::{Objective, Subset, SubsetMove, objective::Coverage},
//!     schema::RunInput,
//!     CoreHunterData,
//! };
//!
//! let input: RunInput = serde_json::from_str(&std::fs::read_to_string("run.json")?)?;
//! let data = CoreHunterData::try_from(input.dataset)?;
//!
//! let coverage = Coverage::default();
//! let subset = Subset::new(data.size(), [0, 1, 2])?;
//! let eval = coverage.evaluate(&subset, &data)?;
//! let next = coverage.evaluate_delta(&SubsetMove::swap(3, 0), &subset, &eval, &data)?;
//! println!("coverage {} -> {}", eval.value(), next.value());
//! # Ok::<(), corehunter::CoreHunterError>(())
//! ```

pub mod compute;
pub mod data;
pub mod error;
pub mod schema;

// Re-export commonly used types
pub use compute::{Objective, RandomDescent, Subset, SubsetMove};
pub use data::CoreHunterData;
pub use error::{CoreHunterError, Result};
pub use schema::{CoreHunterConfig, SearchResult};
