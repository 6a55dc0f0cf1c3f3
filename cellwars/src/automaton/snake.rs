use rand::seq::SliceRandom;
use rand::Rng;

use super::{AutomatonRun, Cell, ConquestRule};
use crate::ChangeRecord;

/// One of the four directions the snake can move in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Heading {
    Up,
    Right,
    Down,
    Left,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::Up, Heading::Right, Heading::Down, Heading::Left];

    pub fn offset(self) -> Cell {
        match self {
            Heading::Up => (0, -1),
            Heading::Right => (1, 0),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
        }
    }

    pub fn reverse(self) -> Self {
        match self {
            Heading::Up => Heading::Down,
            Heading::Right => Heading::Left,
            Heading::Down => Heading::Up,
            Heading::Left => Heading::Right,
        }
    }
}

/// A single path that moves one cell per generation.
///
/// The heading is random at the start and occasionally changes. When the
/// next cell is blocked the snake turns, but never straight back, and if it
/// cannot turn either it stops for good.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SnakePath {
    /// Chance per generation of picking a new heading before moving.
    pub turn_probability: f64,
}

impl Default for SnakePath {
    fn default() -> Self {
        Self {
            turn_probability: 0.2,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SnakeState {
    pub heading: Heading,
    /// Every head position so far, starting with the seed.
    pub path: Vec<Cell>,
}

impl SnakePath {
    fn try_move(
        run: &mut AutomatonRun<'_>,
        state: &mut SnakeState,
        (x, y): Cell,
        heading: Heading,
        next: &mut Vec<Cell>,
        changes: &mut Vec<ChangeRecord>,
    ) -> bool {
        let (dx, dy) = heading.offset();
        let (nx, ny) = (x + dx, y + dy);
        if !run.can_conquer(nx, ny) {
            return false;
        }
        run.conquer(nx, ny, changes);
        next.push((nx, ny));
        state.path.push((nx, ny));
        state.heading = heading;
        true
    }
}

impl ConquestRule for SnakePath {
    type State = SnakeState;

    fn start(&self, run: &mut AutomatonRun<'_>, seed: Cell) -> SnakeState {
        let heading = Heading::ALL[run.rng().gen_range(0..Heading::ALL.len())];
        SnakeState {
            heading,
            path: vec![seed],
        }
    }

    fn grow(
        &self,
        run: &mut AutomatonRun<'_>,
        state: &mut SnakeState,
        head: Cell,
        next: &mut Vec<Cell>,
        changes: &mut Vec<ChangeRecord>,
    ) {
        let current = state.heading;
        let backwards = current.reverse();

        let mut heading = current;
        if run
            .rng()
            .gen_bool(self.turn_probability.clamp(0.0, 1.0))
        {
            let options: Vec<Heading> = Heading::ALL
                .into_iter()
                .filter(|&h| h != backwards)
                .collect();
            heading = options[run.rng().gen_range(0..options.len())];
        }
        if Self::try_move(run, state, head, heading, next, changes) {
            return;
        }

        let mut fallbacks: Vec<Heading> = Heading::ALL
            .into_iter()
            .filter(|&h| h != heading && h != backwards)
            .collect();
        fallbacks.shuffle(run.rng());
        for fallback in fallbacks {
            if Self::try_move(run, state, head, fallback, next, changes) {
                return;
            }
        }
        // Stuck: nothing is pushed to `next`, which ends the run.
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::automaton::tests::settings;
    use crate::{CellState, Grid, Player};

    #[test]
    fn moves_at_most_one_cell_per_generation() {
        let grid = Grid::new(20, 20);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let budget = 15;
            let changes = SnakePath::default().simulate(&grid, (10, 10), settings(Player::One, budget), &mut rng);
            assert!(changes.len() <= budget as usize);

            // Every step is orthogonally adjacent to the previous head
            let mut head = (10, 10);
            for change in &changes {
                let dist = (change.x - head.0).abs() + (change.y - head.1).abs();
                assert_eq!(dist, 1, "seed {} made a non-adjacent step", seed);
                head = (change.x, change.y);
            }
        }
    }

    #[test]
    fn never_steps_back_onto_its_previous_cell() {
        let grid = Grid::new(12, 12);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let changes = SnakePath { turn_probability: 0.5 }.simulate(&grid, (6, 6), settings(Player::Two, 30), &mut rng);
            let mut cells: Vec<Cell> = vec![(6, 6)];
            cells.extend(changes.iter().map(|c| (c.x, c.y)));
            for window in cells.windows(3) {
                assert_ne!(window[0], window[2]);
            }
            let unique: std::collections::HashSet<_> = cells.iter().collect();
            assert_eq!(unique.len(), cells.len());
        }
    }

    #[test]
    fn same_seed_same_path() {
        let grid = Grid::new(20, 20);
        let a = SnakePath::default().simulate(&grid, (3, 3), settings(Player::One, 10), &mut StdRng::seed_from_u64(7));
        let b = SnakePath::default().simulate(&grid, (3, 3), settings(Player::One, 10), &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn corridor_without_turns() {
        // Starting at the top of a 1-wide corridor, the snake either heads up
        // into the wall (and may not reverse), or ends up going straight down.
        let grid = Grid::new(1, 10);
        let mut saw_straight_line = false;
        for seed in 0..40 {
            let mut rng = StdRng::seed_from_u64(seed);
            let changes = SnakePath { turn_probability: 0.0 }.simulate(&grid, (0, 0), settings(Player::One, 5), &mut rng);
            let cells: Vec<Cell> = changes.iter().map(|c| (c.x, c.y)).collect();
            if !cells.is_empty() {
                assert_eq!(cells, vec![(0, 1), (0, 2), (0, 3), (0, 4), (0, 5)]);
                saw_straight_line = true;
            }
        }
        assert!(saw_straight_line);
    }

    #[test]
    fn stops_when_boxed_in() {
        let mut grid = Grid::new(3, 3);
        for (x, y) in [(1, 0), (0, 1), (2, 1), (1, 2)] {
            grid.set(x, y, CellState::Player2);
        }
        let mut rng = StdRng::seed_from_u64(0);
        let changes = SnakePath::default().simulate(&grid, (1, 1), settings(Player::One, 10), &mut rng);
        assert!(changes.is_empty());
    }
}
