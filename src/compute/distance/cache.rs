//! Memoization of pairwise distances.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, trace};
use rayon::prelude::*;

use super::DistanceMeasure;
use crate::data::CoreHunterData;
use crate::error::{CoreHunterError, DataKind, Result};
use crate::schema::MissingValuesPolicy;

/// Symmetric store of lazily computed distances for one dataset and one
/// measure configuration.
///
/// Owned by the caller and shared through an `Arc`; reads and writes go
/// through a lock so several runs may share one cache. Only the strict lower
/// triangle is stored: the diagonal is always 0.
///
/// Stored distances are only valid for one measure with one missing-values
/// policy. Share a cache between objectives only when they use the same
/// measure configuration.
#[derive(Debug)]
pub struct DistanceCache {
    size: usize,
    /// `NaN` marks an entry that has not been computed yet.
    entries: RwLock<Vec<f64>>,
}

impl DistanceCache {
    /// Empty cache for `size` items.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            entries: RwLock::new(vec![f64::NAN; size * size.saturating_sub(1) / 2]),
        }
    }

    /// Empty cache sized for `data`.
    pub fn for_data(data: &CoreHunterData) -> Self {
        Self::new(data.size())
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn index(x: usize, y: usize) -> usize {
        let (i, j) = if x > y { (x, y) } else { (y, x) };
        i * (i - 1) / 2 + j
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<f64>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<f64>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached distance, if already computed.
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x == y {
            return Some(0.0);
        }
        let d = self.read()[Self::index(x, y)];
        (!d.is_nan()).then_some(d)
    }

    /// Store a distance. Diagonal entries are ignored.
    pub fn insert(&self, x: usize, y: usize, distance: f64) {
        if x != y {
            self.write()[Self::index(x, y)] = distance;
        }
    }

    /// Number of computed off-diagonal pairs.
    pub fn computed(&self) -> usize {
        self.read().iter().filter(|d| !d.is_nan()).count()
    }

    /// Forget every stored distance.
    pub fn clear(&self) {
        self.write().fill(f64::NAN);
    }

    /// Fill every pair in parallel.
    pub fn precompute(&self, measure: &dyn DistanceMeasure, data: &CoreHunterData) -> Result<()> {
        self.check_size(data)?;
        let rows = (1..self.size)
            .into_par_iter()
            .map(|i| {
                (0..i)
                    .map(|j| measure.distance(i, j, data))
                    .collect::<Result<Vec<f64>>>()
            })
            .collect::<Result<Vec<Vec<f64>>>>()?;

        let mut entries = self.write();
        for (slot, d) in entries.iter_mut().zip(rows.into_iter().flatten()) {
            *slot = d;
        }
        debug!(
            "Precomputed {} {} distances for {} items",
            entries.len(),
            measure.name(),
            self.size
        );
        Ok(())
    }

    fn check_size(&self, data: &CoreHunterData) -> Result<()> {
        if data.size() != self.size {
            return Err(CoreHunterError::invalid_data(format!(
                "distance cache holds {} items but the dataset has {}",
                self.size,
                data.size()
            )));
        }
        Ok(())
    }
}

/// A distance measure whose results are memoized in a [`DistanceCache`].
#[derive(Debug, Clone)]
pub struct CachedDistance<M> {
    inner: M,
    cache: Arc<DistanceCache>,
}

impl<M: DistanceMeasure> CachedDistance<M> {
    pub fn new(inner: M, cache: Arc<DistanceCache>) -> Self {
        Self { inner, cache }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    pub fn cache(&self) -> &Arc<DistanceCache> {
        &self.cache
    }
}

impl<M: DistanceMeasure> DistanceMeasure for CachedDistance<M> {
    fn distance(&self, x: usize, y: usize, data: &CoreHunterData) -> Result<f64> {
        self.cache.check_size(data)?;
        if let Some(d) = self.cache.get(x, y) {
            return Ok(d);
        }
        let d = self.inner.distance(x, y, data)?;
        trace!("cache miss ({}, {}) = {}", x, y, d);
        self.cache.insert(x, y, d);
        Ok(d)
    }

    fn missing_values_policy(&self) -> MissingValuesPolicy {
        self.inner.missing_values_policy()
    }

    /// Changing the policy detaches this measure onto a fresh cache; other
    /// holders of the previous cache keep their entries.
    fn set_missing_values_policy(&mut self, policy: MissingValuesPolicy) {
        if policy != self.inner.missing_values_policy() {
            self.cache = Arc::new(DistanceCache::new(self.cache.size()));
        }
        self.inner.set_missing_values_policy(policy);
    }

    fn required_data(&self) -> DataKind {
        self.inner.required_data()
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
