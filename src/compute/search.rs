//! Random descent over subsets, driven by delta evaluation.
//!
//! Each step draws a random swap, addition or deletion that keeps the core
//! size within bounds, scores it with [`Objective::evaluate_delta`] and keeps
//! it only if the weighted score strictly improves.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use log::{debug, info};
use rand::prelude::*;
use rand::seq::index;

use crate::compute::objective::{Evaluation, Objective, WeightedObjective};
use crate::compute::{Subset, SubsetMove};
use crate::data::CoreHunterData;
use crate::error::Result;
use crate::schema::{
    CoreHunterConfig, ObjectiveValue, RunInput, SearchResult, SearchStats, SizeBounds, StopReason,
};

/// Kind of random move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MoveKind {
    Swap,
    Add,
    Remove,
}

/// Local search that accepts improving random moves.
pub struct RandomDescent<'a> {
    config: CoreHunterConfig,
    data: &'a CoreHunterData,
    objective: WeightedObjective,
    rng: StdRng,
    subset: Subset,
    evaluation: Option<Evaluation>,
    steps: u64,
    accepted_moves: u64,
    stagnation_count: u64,
    cancelled: Arc<AtomicBool>,
}

impl<'a> RandomDescent<'a> {
    /// Validate `config` against `data` and build its objectives.
    pub fn new(config: CoreHunterConfig, data: &'a CoreHunterData) -> Result<Self> {
        config.validate_for(data.size())?;
        let objective = WeightedObjective::from_config(&config.objectives, data)?;
        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            data,
            objective,
            rng,
            subset: Subset::empty(data.size()),
            evaluation: None,
            steps: 0,
            accepted_moves: 0,
            stagnation_count: 0,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Get cancellation handle.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn objective(&self) -> &WeightedObjective {
        &self.objective
    }

    /// Current subset.
    pub fn subset(&self) -> &Subset {
        &self.subset
    }

    /// Start from a random subset with a size drawn within bounds.
    fn initialize(&mut self) -> Result<()> {
        let SizeBounds { min, max } = self.config.subset_size;
        let size = self.rng.gen_range(min..=max);
        let ids = index::sample(&mut self.rng, self.data.size(), size);
        self.subset = Subset::new(self.data.size(), ids.into_iter())?;
        self.evaluation = Some(self.objective.evaluate(&self.subset, self.data)?);
        self.steps = 0;
        self.accepted_moves = 0;
        self.stagnation_count = 0;
        debug!(
            "initial subset of {} items, value {}",
            size,
            self.current_value()
        );
        Ok(())
    }

    fn current_value(&self) -> f64 {
        self.evaluation
            .as_ref()
            .map_or(f64::NEG_INFINITY, Evaluation::value)
    }

    /// Move kinds that keep the subset within size bounds.
    fn available_moves(&self) -> Vec<MoveKind> {
        let selected = self.subset.num_selected();
        let unselected = self.subset.total_size() - selected;
        let bounds = self.config.subset_size;

        let mut kinds = Vec::with_capacity(3);
        if selected > 0 && unselected > 0 {
            kinds.push(MoveKind::Swap);
        }
        if unselected > 0 && bounds.contains(selected + 1) {
            kinds.push(MoveKind::Add);
        }
        if selected > 0 && bounds.contains(selected - 1) {
            kinds.push(MoveKind::Remove);
        }
        kinds
    }

    /// Draw a random move, or `None` if the subset cannot change.
    fn random_move(&mut self) -> Option<SubsetMove> {
        let kind = *self.available_moves().choose(&mut self.rng)?;
        let subset = &self.subset;
        let rng = &mut self.rng;
        match kind {
            MoveKind::Swap => {
                let added = subset.unselected().choose(rng)?;
                let removed = *subset.selected().iter().choose(rng)?;
                Some(SubsetMove::swap(added, removed))
            }
            MoveKind::Add => subset.unselected().choose(rng).map(SubsetMove::addition),
            MoveKind::Remove => subset
                .selected()
                .iter()
                .choose(rng)
                .map(|&id| SubsetMove::deletion(id)),
        }
    }

    fn should_stop(&self, start_time: Instant) -> Option<StopReason> {
        if self.cancelled.load(Ordering::Relaxed) {
            return Some(StopReason::Cancelled);
        }

        let search = &self.config.search;
        if let Some(limit) = search.max_steps
            && self.steps >= limit
        {
            return Some(StopReason::MaxSteps);
        }

        if let Some(limit) = search.max_steps_without_improvement
            && self.stagnation_count >= limit
        {
            return Some(StopReason::Stagnation);
        }

        if let Some(seconds) = search.max_time_seconds
            && start_time.elapsed().as_secs_f64() >= seconds
        {
            return Some(StopReason::TimeLimit);
        }

        None
    }

    /// Evaluate one random move and keep it if it improves the score.
    fn step(&mut self, mv: SubsetMove) -> Result<()> {
        let Some(current) = self.evaluation.as_ref() else {
            return Ok(());
        };
        let candidate = self
            .objective
            .evaluate_delta(&mv, &self.subset, current, self.data)?;
        self.steps += 1;

        if candidate.value() > current.value() {
            self.subset.apply(&mv)?;
            self.evaluation = Some(candidate);
            self.accepted_moves += 1;
            self.stagnation_count = 0;
        } else {
            self.stagnation_count += 1;
        }
        Ok(())
    }

    /// Run the search to completion (blocking).
    pub fn run(&mut self) -> Result<SearchResult> {
        let start_time = Instant::now();
        self.initialize()?;

        let stop_reason = loop {
            if let Some(reason) = self.should_stop(start_time) {
                break reason;
            }
            let Some(mv) = self.random_move() else {
                break StopReason::NoMoves;
            };
            self.step(mv)?;
        };

        let elapsed = start_time.elapsed().as_secs_f64();
        let value = self.current_value();
        info!(
            "search stopped ({:?}) after {} steps, {} accepted, value {}",
            stop_reason, self.steps, self.accepted_moves, value
        );

        Ok(SearchResult {
            selection: self.subset.selected().iter().copied().collect(),
            labels: self
                .subset
                .selected()
                .iter()
                .map(|&id| self.data.header(id).label().map(str::to_owned))
                .collect(),
            value,
            objectives: self.objective_values(),
            stats: SearchStats {
                steps: self.steps,
                accepted_moves: self.accepted_moves,
                elapsed_seconds: elapsed,
                steps_per_second: if elapsed > 0.0 {
                    self.steps as f64 / elapsed
                } else {
                    0.0
                },
                stop_reason,
            },
        })
    }

    fn objective_values(&self) -> Vec<ObjectiveValue> {
        let Some(Evaluation::Weighted(evaluation)) = &self.evaluation else {
            return Vec::new();
        };
        self.objective
            .components()
            .iter()
            .zip(evaluation.components())
            .map(|(component, eval)| ObjectiveValue {
                objective: component.objective_type,
                measure: component.objective.measure_name().map(str::to_owned),
                value: eval.value(),
                weight: component.weight,
            })
            .collect()
    }
}

/// Build the dataset of a run file and search it.
pub fn run(input: RunInput) -> Result<SearchResult> {
    let data = CoreHunterData::try_from(input.dataset)?;
    info!(
        "dataset of {} items (genotypes: {}, phenotypes: {}, distances: {})",
        data.size(),
        data.has_genotypes(),
        data.has_phenotypes(),
        data.has_distances()
    );
    RandomDescent::new(input.config, &data)?.run()
}
