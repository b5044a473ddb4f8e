//! Schema module - Configuration, dataset input and result types.

mod config;
mod dataset;
mod objective;
mod result;

pub use config::*;
pub use dataset::*;
pub use objective::*;
pub use result::*;
