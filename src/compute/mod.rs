//! Compute module - distance measures, objectives and search.

pub mod distance;
pub mod diversity;
pub mod objective;
pub mod search;
mod subset;

pub use distance::{DistanceCache, DistanceMeasure};
pub use diversity::AverageGenotype;
pub use objective::{Evaluation, Objective, WeightedObjective};
pub use search::RandomDescent;
pub use subset::{Subset, SubsetMove};
