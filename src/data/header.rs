//! Item headers (name and unique identifier).

use serde::{Deserialize, Serialize};

/// Optional name and unique identifier attached to an item.
///
/// Headers are only used to validate and merge sub-datasets and to report
/// selections; objectives address items by their integer id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub unique_id: Option<String>,
}

impl Header {
    pub fn new(name: Option<String>, unique_id: Option<String>) -> Self {
        Self { name, unique_id }
    }

    /// Header with a name that doubles as unique identifier.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            unique_id: Some(name.clone()),
            name: Some(name),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.unique_id.is_none()
    }

    /// Compares by unique id when either side has one, else by name.
    pub fn matches(&self, other: &Header) -> bool {
        if self.unique_id.is_some() || other.unique_id.is_some() {
            self.unique_id == other.unique_id
        } else {
            self.name == other.name
        }
    }

    /// Two headers conflict when both carry a unique id and the ids differ,
    /// or both carry a name and the names differ.
    pub fn conflicts_with(&self, other: &Header) -> bool {
        let differ = |a: &Option<String>, b: &Option<String>| match (a, b) {
            (Some(a), Some(b)) => a != b,
            _ => false,
        };
        differ(&self.unique_id, &other.unique_id) || differ(&self.name, &other.name)
    }

    /// Combine two non-conflicting headers, keeping every field either side knows.
    pub fn merge(&self, other: &Header) -> Header {
        Header {
            name: self.name.clone().or_else(|| other.name.clone()),
            unique_id: self.unique_id.clone().or_else(|| other.unique_id.clone()),
        }
    }

    /// Label used in reports: unique id, then name.
    pub fn label(&self) -> Option<&str> {
        self.unique_id.as_deref().or(self.name.as_deref())
    }
}

impl PartialEq for Header {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other)
    }
}
