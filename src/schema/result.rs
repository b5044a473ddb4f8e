//! Search outcome types.

use serde::{Deserialize, Serialize};

use super::ObjectiveType;

/// Final value of one objective in the selected core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectiveValue {
    pub objective: ObjectiveType,
    /// Name of the distance measure, for pairwise objectives.
    pub measure: Option<String>,
    pub value: f64,
    pub weight: f64,
}

/// Result of a core selection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Selected item ids, ascending.
    pub selection: Vec<usize>,
    /// Header label (unique id or name) of each selected item, if any.
    pub labels: Vec<Option<String>>,
    /// Weighted objective value of the selection.
    pub value: f64,
    pub objectives: Vec<ObjectiveValue>,
    pub stats: SearchStats,
}

/// Statistics of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchStats {
    /// Moves evaluated.
    pub steps: u64,
    /// Moves accepted.
    pub accepted_moves: u64,
    /// Time taken (in seconds).
    pub elapsed_seconds: f64,
    /// Evaluated moves per second.
    pub steps_per_second: f64,
    /// Reason for stopping.
    pub stop_reason: StopReason,
}

/// Reason the search stopped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    /// Reached maximum number of steps.
    MaxSteps,
    /// No improvement for the configured number of steps.
    Stagnation,
    /// Time limit reached.
    TimeLimit,
    /// No valid move exists (e.g. every item selected at fixed size).
    NoMoves,
    /// Cancelled through the engine's cancel handle.
    Cancelled,
}
