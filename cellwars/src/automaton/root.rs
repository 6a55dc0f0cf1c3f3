use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use super::{AutomatonRun, Cell, ConquestRule, SURROUNDING};
use crate::ChangeRecord;

/// Lowest starting probability for a cell, however deep it is.
pub const MIN_START_PROBABILITY: f64 = 0.1;
/// Lowest probability for any single attempt.
pub const MIN_ATTEMPT_PROBABILITY: f64 = 0.05;

/// Probabilistic branching in all eight directions that dies out with depth.
///
/// Each cell remembers its depth (the seed is at depth 0, a conquered cell
/// is one deeper than the cell it grew from). A cell starts with a chance of
/// `initial_probability - depth * generation_decay` and tries its neighbours
/// in random order, losing `probability_decrement` after every neighbour
/// that could have been taken. The first directions tried are therefore the
/// likeliest to grow.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RootGrowth {
    pub initial_probability: f64,
    pub probability_decrement: f64,
    pub generation_decay: f64,
    /// Cells at depth `max_generations - 1` or deeper do not grow.
    /// `None` uses the budget of the run.
    pub max_generations: Option<u32>,
}

impl Default for RootGrowth {
    fn default() -> Self {
        Self {
            initial_probability: 0.9,
            probability_decrement: 0.3,
            generation_decay: 0.25,
            max_generations: None,
        }
    }
}

impl RootGrowth {
    /// The chance for each of the eight possible attempts made by a cell at
    /// `depth`, in the order in which they are used.
    pub fn attempt_probabilities(&self, depth: u32) -> [f64; 8] {
        let mut probabilities = [0.0; 8];
        let mut probability = (self.initial_probability - depth as f64 * self.generation_decay)
            .max(MIN_START_PROBABILITY);
        for p in probabilities.iter_mut() {
            *p = probability;
            probability = (probability - self.probability_decrement).max(MIN_ATTEMPT_PROBABILITY);
        }
        probabilities
    }
}

#[derive(Clone, Debug, Default)]
pub struct RootState {
    /// Depth of every cell conquered by this run, including the seed.
    pub depths: HashMap<Cell, u32>,
}

impl ConquestRule for RootGrowth {
    type State = RootState;

    fn start(&self, _run: &mut AutomatonRun<'_>, seed: Cell) -> RootState {
        RootState {
            depths: HashMap::from([(seed, 0)]),
        }
    }

    fn grow(
        &self,
        run: &mut AutomatonRun<'_>,
        state: &mut RootState,
        (x, y): Cell,
        next: &mut Vec<Cell>,
        changes: &mut Vec<ChangeRecord>,
    ) {
        let depth = state.depths.get(&(x, y)).copied().unwrap_or(0);
        let max_generations = self.max_generations.unwrap_or(run.settings().budget);
        if depth + 1 >= max_generations {
            return;
        }

        let probabilities = self.attempt_probabilities(depth);
        let mut directions = SURROUNDING;
        directions.shuffle(run.rng());

        let mut attempt = 0;
        for (dx, dy) in directions {
            let (nx, ny) = (x + dx, y + dy);
            if !run.can_conquer(nx, ny) {
                continue;
            }
            if run.rng().gen::<f64>() < probabilities[attempt] {
                run.conquer(nx, ny, changes);
                next.push((nx, ny));
                state.depths.insert((nx, ny), depth + 1);
            }
            attempt += 1;
        }
    }
}
