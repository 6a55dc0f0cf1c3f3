//! Growth rules that turn a single picked cell into a conquered region.
//!
//! Every rule runs against a private copy of the grid and only reports what
//! it would change, so a run can be replayed, sent to the other peer, or
//! thrown away without side effects.

mod diamond;
mod root;
mod snake;

pub use diamond::*;
pub use root::*;
pub use snake::*;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{CellState, ChangeRecord, Grid, Player};

/// Grid coordinates `(x, y)`.
pub type Cell = (i32, i32);

/// Up, down, left, right. Diamond expansion relies on this order.
pub const ORTHOGONAL: [Cell; 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// All eight neighbours, clockwise from up.
pub const SURROUNDING: [Cell; 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Which kinds of cells a run may take over. Own cells are never taken.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverwritePolicy {
    pub overwrite_neutral: bool,
    pub overwrite_enemy: bool,
}

impl Default for OverwritePolicy {
    fn default() -> Self {
        Self {
            overwrite_neutral: true,
            overwrite_enemy: false,
        }
    }
}

/// Who runs a rule, for how many generations, and what it may overwrite.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RunSettings {
    pub player: Player,
    /// Upper bound on the number of generations. Runs may stop earlier.
    pub budget: u32,
    pub policy: OverwritePolicy,
}

/// The transient state of one simulation, handed to the rule for every cell
/// it grows from.
pub struct AutomatonRun<'a> {
    settings: RunSettings,
    /// Starts out as a copy of the real grid, with the seed already conquered.
    sim: Grid,
    rng: &'a mut StdRng,
}

impl<'a> AutomatonRun<'a> {
    pub fn settings(&self) -> RunSettings {
        self.settings
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut *self.rng
    }

    /// The conquer rule.
    pub fn can_conquer(&self, x: i32, y: i32) -> bool {
        match self.sim.get(x, y) {
            None => false,
            Some(CellState::Neutral) => self.settings.policy.overwrite_neutral,
            Some(state) if state.owner() == Some(self.settings.player) => false,
            Some(_) => self.settings.policy.overwrite_enemy,
        }
    }

    /// Marks a cell as taken in the simulated grid and records the change.
    pub fn conquer(&mut self, x: i32, y: i32, changes: &mut Vec<ChangeRecord>) {
        let state = CellState::from(self.settings.player);
        self.sim.set(x, y, state);
        changes.push(ChangeRecord::new(x, y, state));
    }
}

/// A growth rule.
///
/// Implementors only describe how a single frontier cell grows; the
/// generation loop is shared.
pub trait ConquestRule {
    /// Rule-specific state carried across generations of one run.
    type State;

    /// Called once with the seed cell before the first generation.
    fn start(&self, run: &mut AutomatonRun<'_>, seed: Cell) -> Self::State;

    /// Grows from `cell`, pushing newly conquered cells to `next` (the
    /// frontier of the following generation) and to `changes`.
    fn grow(
        &self,
        run: &mut AutomatonRun<'_>,
        state: &mut Self::State,
        cell: Cell,
        next: &mut Vec<Cell>,
        changes: &mut Vec<ChangeRecord>,
    );

    /// Runs the rule from `start` and returns the changes it would make, in
    /// generation order. The seed cell itself is not part of the result.
    ///
    /// `grid` is not modified. A start outside of the grid yields no changes.
    fn simulate(
        &self,
        grid: &Grid,
        start: Cell,
        settings: RunSettings,
        rng: &mut StdRng,
    ) -> Vec<ChangeRecord> {
        let (x, y) = start;
        if !grid.is_in_bounds(x, y) {
            return Vec::new();
        }
        let mut run = AutomatonRun {
            settings,
            sim: grid.clone(),
            rng,
        };
        run.sim.set(x, y, CellState::from(settings.player));

        let mut state = self.start(&mut run, start);
        let mut frontier = vec![start];
        let mut changes = Vec::new();
        for generation in 0..settings.budget {
            if frontier.is_empty() {
                break;
            }
            let mut next = Vec::new();
            let num_changes_before = changes.len();
            for &cell in &frontier {
                self.grow(&mut run, &mut state, cell, &mut next, &mut changes);
            }
            trace!(
                generation,
                frontier = frontier.len(),
                conquered = changes.len() - num_changes_before,
                "Generation finished"
            );
            frontier = next;
        }
        changes
    }
}

/// The three growth rules, selectable at runtime.
#[derive(Clone, Debug, PartialEq)]
pub enum Automaton {
    Diamond(DiamondExpansion),
    Snake(SnakePath),
    Root(RootGrowth),
}

impl Automaton {
    pub fn diamond() -> Self {
        Automaton::Diamond(DiamondExpansion)
    }

    pub fn snake() -> Self {
        Automaton::Snake(SnakePath::default())
    }

    pub fn root() -> Self {
        Automaton::Root(RootGrowth::default())
    }

    /// See [`ConquestRule::simulate()`].
    pub fn simulate(
        &self,
        grid: &Grid,
        start: Cell,
        settings: RunSettings,
        rng: &mut StdRng,
    ) -> Vec<ChangeRecord> {
        match self {
            Automaton::Diamond(rule) => rule.simulate(grid, start, settings, rng),
            Automaton::Snake(rule) => rule.simulate(grid, start, settings, rng),
            Automaton::Root(rule) => rule.simulate(grid, start, settings, rng),
        }
    }
}
