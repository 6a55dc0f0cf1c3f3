use super::{AutomatonRun, Cell, ConquestRule, ORTHOGONAL};
use crate::ChangeRecord;

/// Flood fill over the four orthogonal neighbours.
///
/// On an open board, `n` generations conquer every cell within Manhattan
/// distance `n` of the seed. Uses no randomness.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DiamondExpansion;

impl ConquestRule for DiamondExpansion {
    type State = ();

    fn start(&self, _run: &mut AutomatonRun<'_>, _seed: Cell) {}

    fn grow(
        &self,
        run: &mut AutomatonRun<'_>,
        _state: &mut (),
        (x, y): Cell,
        next: &mut Vec<Cell>,
        changes: &mut Vec<ChangeRecord>,
    ) {
        for (dx, dy) in ORTHOGONAL {
            let (nx, ny) = (x + dx, y + dy);
            if run.can_conquer(nx, ny) {
                run.conquer(nx, ny, changes);
                next.push((nx, ny));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::automaton::tests::settings;
    use crate::{CellState, Grid, Player};

    fn diamond(width: usize, height: usize, (sx, sy): Cell, n: i32) -> BTreeSet<Cell> {
        let mut set = BTreeSet::new();
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                if (x - sx).abs() + (y - sy).abs() <= n {
                    set.insert((x, y));
                }
            }
        }
        set
    }

    #[test]
    fn conquers_exactly_a_diamond() {
        let grid = Grid::new(15, 15);
        for n in 0..6 {
            let mut rng = StdRng::seed_from_u64(0);
            let changes =
                DiamondExpansion.simulate(&grid, (7, 7), settings(Player::One, n as u32), &mut rng);
            let mut conquered: BTreeSet<Cell> = changes.iter().map(|c| (c.x, c.y)).collect();
            assert_eq!(conquered.len(), changes.len());
            conquered.insert((7, 7));
            assert_eq!(conquered, diamond(15, 15, (7, 7), n));
        }
    }

    #[test]
    fn is_clipped_by_the_border() {
        let grid = Grid::new(5, 5);
        let mut rng = StdRng::seed_from_u64(0);
        let changes = DiamondExpansion.simulate(&grid, (0, 0), settings(Player::Two, 2), &mut rng);
        let mut conquered: BTreeSet<Cell> = changes.iter().map(|c| (c.x, c.y)).collect();
        conquered.insert((0, 0));
        assert_eq!(conquered, diamond(5, 5, (0, 0), 2));
        assert_eq!(conquered.len(), 6);
    }

    #[test]
    fn is_deterministic_regardless_of_rng() {
        let grid = Grid::new(9, 9);
        let a = DiamondExpansion.simulate(
            &grid,
            (3, 5),
            settings(Player::One, 4),
            &mut StdRng::seed_from_u64(1),
        );
        let b = DiamondExpansion.simulate(
            &grid,
            (3, 5),
            settings(Player::One, 4),
            &mut StdRng::seed_from_u64(99),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn first_generation_follows_up_down_left_right() {
        let grid = Grid::new(5, 5);
        let mut rng = StdRng::seed_from_u64(0);
        let changes = DiamondExpansion.simulate(&grid, (2, 2), settings(Player::One, 1), &mut rng);
        let cells: Vec<Cell> = changes.iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(cells, vec![(2, 1), (2, 3), (1, 2), (3, 2)]);
    }

    #[test]
    fn stops_at_enemy_cells() {
        let mut grid = Grid::new(5, 1);
        grid.set(3, 0, CellState::Player2);
        let mut rng = StdRng::seed_from_u64(0);
        let changes = DiamondExpansion.simulate(&grid, (0, 0), settings(Player::One, 10), &mut rng);
        let cells: Vec<Cell> = changes.iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(cells, vec![(1, 0), (2, 0)]);
    }
}
