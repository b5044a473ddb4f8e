//! Nearest-entry objectives.
//!
//! Both objectives track, per item, the closest selected entry. A move only
//! rescans the full selection for items whose nearest entry was removed (or
//! that had none); every other item is compared against the added entries
//! alone. The running sum changes by exactly the updated contributions.

use std::collections::BTreeSet;

use super::{Evaluation, NearestEntry, NearestEntryEvaluation, Objective, check_subset};
use crate::compute::distance::DistanceMeasure;
use crate::compute::{Subset, SubsetMove};
use crate::data::CoreHunterData;
use crate::error::{CoreHunterError, Result};

/// Which items are scored and whether an entry may be its own nearest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tracking {
    /// Selected entries, each against the other selected entries.
    Entries,
    /// Every accession, against all selected entries (itself included).
    Accessions,
}

impl Tracking {
    pub(crate) fn empty_value(self) -> f64 {
        match self {
            Self::Entries => 0.0,
            Self::Accessions => f64::INFINITY,
        }
    }
}

/// Closest item of `candidates` to `id`; ties keep the first candidate.
fn find_nearest<'a>(
    measure: &impl DistanceMeasure,
    data: &CoreHunterData,
    id: usize,
    candidates: impl IntoIterator<Item = &'a usize>,
    tracking: Tracking,
) -> Result<Option<NearestEntry>> {
    let mut best: Option<NearestEntry> = None;
    for &candidate in candidates {
        if candidate == id && tracking == Tracking::Entries {
            continue;
        }
        let distance = measure.distance(id, candidate, data)?;
        if best.is_none_or(|b| distance < b.distance) {
            best = Some(NearestEntry {
                id: candidate,
                distance,
            });
        }
    }
    Ok(best)
}

fn evaluate_nearest(
    measure: &impl DistanceMeasure,
    tracking: Tracking,
    subset: &Subset,
    data: &CoreHunterData,
) -> Result<Evaluation> {
    check_subset(subset, data)?;
    data.require(measure.required_data())?;
    let selected = subset.selected();
    let items: Vec<usize> = match tracking {
        Tracking::Entries => selected.iter().copied().collect(),
        Tracking::Accessions => (0..subset.total_size()).collect(),
    };

    let mut nearest = vec![None; subset.total_size()];
    let mut sum = 0.0;
    let mut tracked = 0;
    for id in items {
        if let Some(entry) = find_nearest(measure, data, id, selected, tracking)? {
            sum += entry.distance;
            tracked += 1;
            nearest[id] = Some(entry);
        }
    }

    Ok(Evaluation::NearestEntry(NearestEntryEvaluation {
        tracking,
        nearest,
        sum,
        tracked,
    }))
}

fn evaluate_nearest_delta(
    measure: &impl DistanceMeasure,
    tracking: Tracking,
    mv: &SubsetMove,
    subset: &Subset,
    current: &Evaluation,
    data: &CoreHunterData,
) -> Result<Evaluation> {
    check_subset(subset, data)?;
    subset.validate_move(mv)?;
    let current = current.as_nearest_entry()?;
    if current.tracking != tracking {
        return Err(CoreHunterError::incompatible_move(format!(
            "evaluation tracks {:?}, objective tracks {:?}",
            current.tracking, tracking
        )));
    }
    if current.nearest.len() != subset.total_size() {
        return Err(CoreHunterError::incompatible_move(format!(
            "evaluation covers {} items, subset has {}",
            current.nearest.len(),
            subset.total_size()
        )));
    }
    data.require(measure.required_data())?;

    let next: BTreeSet<usize> = subset
        .selected()
        .iter()
        .copied()
        .filter(|id| !mv.removed.contains(id))
        .chain(mv.added.iter().copied())
        .collect();

    let mut nearest = current.nearest.clone();
    let mut sum = current.sum;
    let mut tracked = current.tracked;

    // removed entries are no longer scored
    if tracking == Tracking::Entries {
        for &id in &mv.removed {
            if let Some(entry) = nearest[id].take() {
                sum -= entry.distance;
                tracked -= 1;
            }
        }
    }

    let items: Vec<usize> = match tracking {
        Tracking::Entries => next
            .iter()
            .copied()
            .filter(|id| !mv.added.contains(id))
            .collect(),
        Tracking::Accessions => (0..subset.total_size()).collect(),
    };

    for id in items {
        let previous = nearest[id];
        match previous {
            Some(entry) if !mv.removed.contains(&entry.id) => {
                if let Some(closer) = find_nearest(measure, data, id, &mv.added, tracking)? {
                    if closer.distance < entry.distance {
                        sum += closer.distance - entry.distance;
                        nearest[id] = Some(closer);
                    }
                }
            }
            _ => {
                if let Some(entry) = previous {
                    sum -= entry.distance;
                    tracked -= 1;
                }
                let rescanned = find_nearest(measure, data, id, &next, tracking)?;
                if let Some(entry) = rescanned {
                    sum += entry.distance;
                    tracked += 1;
                }
                nearest[id] = rescanned;
            }
        }
    }

    if tracking == Tracking::Entries {
        for &id in &mv.added {
            let entry = find_nearest(measure, data, id, &next, tracking)?;
            if let Some(entry) = entry {
                sum += entry.distance;
                tracked += 1;
            }
            nearest[id] = entry;
        }
    }

    if tracked == 0 {
        sum = 0.0;
    }
    Ok(Evaluation::NearestEntry(NearestEntryEvaluation {
        tracking,
        nearest,
        sum,
        tracked,
    }))
}

/// Mean distance from each selected entry to its closest other selected
/// entry; 0 for fewer than two entries.
#[derive(Debug)]
pub struct AverageEntryToNearestEntry<M = Box<dyn DistanceMeasure>> {
    measure: M,
}

impl<M: DistanceMeasure> AverageEntryToNearestEntry<M> {
    pub fn new(measure: M) -> Self {
        Self { measure }
    }

    pub fn measure(&self) -> &M {
        &self.measure
    }
}

impl<M: DistanceMeasure + 'static> Objective for AverageEntryToNearestEntry<M> {
    fn evaluate(&self, subset: &Subset, data: &CoreHunterData) -> Result<Evaluation> {
        evaluate_nearest(&self.measure, Tracking::Entries, subset, data)
    }

    fn evaluate_delta(
        &self,
        mv: &SubsetMove,
        subset: &Subset,
        current: &Evaluation,
        data: &CoreHunterData,
    ) -> Result<Evaluation> {
        evaluate_nearest_delta(&self.measure, Tracking::Entries, mv, subset, current, data)
    }

    fn is_minimizing(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "Average entry-to-nearest-entry distance"
    }

    fn measure_name(&self) -> Option<&'static str> {
        Some(self.measure.name())
    }
}

/// Mean distance from every accession, selected or not, to its closest
/// selected entry; infinite for an empty selection.
#[derive(Debug)]
pub struct AverageAccessionToNearestEntry<M = Box<dyn DistanceMeasure>> {
    measure: M,
}

impl<M: DistanceMeasure> AverageAccessionToNearestEntry<M> {
    pub fn new(measure: M) -> Self {
        Self { measure }
    }

    pub fn measure(&self) -> &M {
        &self.measure
    }
}

impl<M: DistanceMeasure + 'static> Objective for AverageAccessionToNearestEntry<M> {
    fn evaluate(&self, subset: &Subset, data: &CoreHunterData) -> Result<Evaluation> {
        evaluate_nearest(&self.measure, Tracking::Accessions, subset, data)
    }

    fn evaluate_delta(
        &self,
        mv: &SubsetMove,
        subset: &Subset,
        current: &Evaluation,
        data: &CoreHunterData,
    ) -> Result<Evaluation> {
        evaluate_nearest_delta(&self.measure, Tracking::Accessions, mv, subset, current, data)
    }

    fn is_minimizing(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "Average accession-to-nearest-entry distance"
    }

    fn measure_name(&self) -> Option<&'static str> {
        Some(self.measure.name())
    }
}
