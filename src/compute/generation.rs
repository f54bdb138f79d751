//! Generation engine for the toroidal life automaton.
//!
//! Only cells adjacent to at least one live cell are ever visited, so a step
//! costs O(|active| * 8) regardless of grid size.

use std::collections::HashMap;

use crate::schema::RuleVariants;

use super::{ActiveSet, CellLocation, ChangeSink, GridSize};

/// Advance the automaton by one generation.
///
/// Survival on 2 or 3 neighbors (or more than 3 with `over_populate`),
/// birth on exactly 3 (or 6 with `high_life`).
pub fn step_generation(active: &ActiveSet, size: GridSize, variants: RuleVariants) -> ActiveSet {
    let mut counts: HashMap<CellLocation, u8> = HashMap::with_capacity(active.len() * 8);

    for loc in active.iter() {
        for neighbor in loc.neighbors(size) {
            *counts.entry(neighbor).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .filter(|&(loc, count)| {
            if active.contains(loc) {
                survives(count, variants)
            } else {
                is_born(count, variants)
            }
        })
        .map(|(loc, _)| loc)
        .collect()
}

#[inline]
fn survives(count: u8, variants: RuleVariants) -> bool {
    count == 2 || count == 3 || (variants.over_populate && count > 3)
}

#[inline]
fn is_born(count: u8, variants: RuleVariants) -> bool {
    count == 3 || (variants.high_life && count == 6)
}

/// Automaton driver holding the live set and the generation counter.
pub struct LifeSimulation {
    active: ActiveSet,
    size: GridSize,
    variants: RuleVariants,
    generation: u64,
}

impl LifeSimulation {
    /// Create an empty simulation.
    pub fn new(size: GridSize, variants: RuleVariants) -> Self {
        Self {
            active: ActiveSet::new(),
            size,
            variants,
            generation: 0,
        }
    }

    /// Replace the live set, notifying every transition.
    ///
    /// Off-grid locations are wrapped onto the torus.
    pub fn seed<S: ChangeSink>(&mut self, cells: ActiveSet, sink: &mut S) {
        let size = self.size;
        let next: ActiveSet = cells.into_iter().map(|loc| loc.wrapped(size)).collect();
        self.replace(next, sink);
        self.generation = 0;
    }

    /// Flip a single cell.
    pub fn toggle<S: ChangeSink>(&mut self, loc: CellLocation, sink: &mut S) {
        let loc = loc.wrapped(self.size);
        if self.active.remove(loc) {
            sink.notify_deactivated(loc);
        } else {
            self.active.insert(loc);
            sink.notify_activated(loc);
        }
    }

    /// Perform one generation.
    pub fn step<S: ChangeSink>(&mut self, sink: &mut S) -> LifeStats {
        let next = step_generation(&self.active, self.size, self.variants);
        let (births, deaths) = self.replace(next, sink);
        self.generation += 1;

        LifeStats {
            generation: self.generation,
            population: self.active.len(),
            births,
            deaths,
        }
    }

    /// Run for the given number of generations, returning the last stats.
    pub fn run<S: ChangeSink>(&mut self, generations: u64, sink: &mut S) -> LifeStats {
        let mut stats = self.stats();
        for _ in 0..generations {
            stats = self.step(sink);
        }
        stats
    }

    /// Clear all live cells and reset the counter.
    pub fn erase_all<S: ChangeSink>(&mut self, sink: &mut S) {
        self.replace(ActiveSet::new(), sink);
        self.generation = 0;
    }

    /// Current statistics without stepping.
    pub fn stats(&self) -> LifeStats {
        LifeStats {
            generation: self.generation,
            population: self.active.len(),
            births: 0,
            deaths: 0,
        }
    }

    pub fn active(&self) -> &ActiveSet {
        &self.active
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn variants(&self) -> RuleVariants {
        self.variants
    }

    /// Swap in a new live set; returns (births, deaths).
    fn replace<S: ChangeSink>(&mut self, next: ActiveSet, sink: &mut S) -> (usize, usize) {
        let mut deaths = 0;
        for loc in next.died_since(&self.active) {
            sink.notify_deactivated(loc);
            deaths += 1;
        }
        let mut births = 0;
        for loc in next.born_since(&self.active) {
            sink.notify_activated(loc);
            births += 1;
        }
        self.active = next;
        (births, deaths)
    }
}

/// Per-generation statistics for monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LifeStats {
    pub generation: u64,
    pub population: usize,
    pub births: usize,
    pub deaths: usize,
}
