//! Candidate cores and the moves that transform them.

use std::collections::BTreeSet;

use crate::error::{CoreHunterError, Result};

/// A partition of the item ids `0..size` into selected and unselected items.
///
/// Owned by the optimizer; objectives only read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subset {
    size: usize,
    selected: BTreeSet<usize>,
}

impl Subset {
    /// Empty selection over `size` items.
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            selected: BTreeSet::new(),
        }
    }

    /// Selection of the given ids; fails on ids outside `0..size`.
    pub fn new(size: usize, selected: impl IntoIterator<Item = usize>) -> Result<Self> {
        let selected: BTreeSet<usize> = selected.into_iter().collect();
        if let Some(&id) = selected.iter().find(|&&id| id >= size) {
            return Err(CoreHunterError::invalid_data(format!(
                "item id {} out of range for {} items",
                id, size
            )));
        }
        Ok(Self { size, selected })
    }

    /// Selection containing every item.
    pub fn full(size: usize) -> Self {
        Self {
            size,
            selected: (0..size).collect(),
        }
    }

    /// Total number of items (selected or not).
    #[inline]
    pub fn total_size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn num_selected(&self) -> usize {
        self.selected.len()
    }

    #[inline]
    pub fn is_selected(&self, id: usize) -> bool {
        self.selected.contains(&id)
    }

    /// Selected ids in ascending order.
    pub fn selected(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    /// Unselected ids in ascending order.
    pub fn unselected(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.size).filter(move |id| !self.selected.contains(id))
    }

    /// Check that `mv` can be applied to this selection.
    pub fn validate_move(&self, mv: &SubsetMove) -> Result<()> {
        if let Some(id) = mv.added.iter().find(|&&id| id >= self.size) {
            return Err(CoreHunterError::incompatible_move(format!(
                "added item {} out of range for {} items",
                id, self.size
            )));
        }
        if let Some(id) = mv.added.iter().find(|id| self.selected.contains(id)) {
            return Err(CoreHunterError::incompatible_move(format!(
                "item {} is already selected",
                id
            )));
        }
        if let Some(id) = mv.removed.iter().find(|id| !self.selected.contains(id)) {
            return Err(CoreHunterError::incompatible_move(format!(
                "item {} is not selected",
                id
            )));
        }
        Ok(())
    }

    /// Selection after `mv`, leaving `self` untouched.
    pub fn with_move(&self, mv: &SubsetMove) -> Result<Subset> {
        let mut next = self.clone();
        next.apply(mv)?;
        Ok(next)
    }

    /// Apply `mv` in place.
    pub fn apply(&mut self, mv: &SubsetMove) -> Result<()> {
        self.validate_move(mv)?;
        for id in &mv.removed {
            self.selected.remove(id);
        }
        self.selected.extend(mv.added.iter().copied());
        Ok(())
    }
}

/// A perturbation of a selection: ids to add and ids to remove.
///
/// Added ids must be unselected and removed ids selected; the two sets are
/// disjoint by construction when the move is valid for a subset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubsetMove {
    pub added: BTreeSet<usize>,
    pub removed: BTreeSet<usize>,
}

impl SubsetMove {
    pub fn new(
        added: impl IntoIterator<Item = usize>,
        removed: impl IntoIterator<Item = usize>,
    ) -> Self {
        Self {
            added: added.into_iter().collect(),
            removed: removed.into_iter().collect(),
        }
    }

    /// Replace `remove` with `add`.
    pub fn swap(add: usize, remove: usize) -> Self {
        Self::new([add], [remove])
    }

    pub fn addition(id: usize) -> Self {
        Self::new([id], [])
    }

    pub fn deletion(id: usize) -> Self {
        Self::new([], [id])
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Change in selection size.
    pub fn size_delta(&self) -> isize {
        self.added.len() as isize - self.removed.len() as isize
    }

    /// The move that undoes this one.
    pub fn inverse(&self) -> Self {
        Self {
            added: self.removed.clone(),
            removed: self.added.clone(),
        }
    }
}
