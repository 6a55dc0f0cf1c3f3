use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::InvalidCellState;

/// One of the two players.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// Position of the player in per-player arrays, 0 or 1.
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    /// The owner id written into cells and onto the wire, 1 or 2.
    pub fn id(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.id())
    }
}

/// Ownership of a single cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum CellState {
    #[default]
    Neutral = 0,
    Player1 = 1,
    Player2 = 2,
}

impl CellState {
    pub fn id(self) -> u8 {
        self as u8
    }

    /// The player owning this cell, if any.
    pub fn owner(self) -> Option<Player> {
        match self {
            CellState::Neutral => None,
            CellState::Player1 => Some(Player::One),
            CellState::Player2 => Some(Player::Two),
        }
    }
}

impl From<Player> for CellState {
    fn from(player: Player) -> Self {
        match player {
            Player::One => CellState::Player1,
            Player::Two => CellState::Player2,
        }
    }
}

impl TryFrom<u8> for CellState {
    type Error = InvalidCellState;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(CellState::Neutral),
            1 => Ok(CellState::Player1),
            2 => Ok(CellState::Player2),
            _ => Err(InvalidCellState(id)),
        }
    }
}

/// The new state of one cell.
///
/// This is the unit of replay as well as of network transfer. On the wire it
/// is the array `[x, y, ownerId]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "(i32, i32, u8)", try_from = "(i32, i32, u8)")]
pub struct ChangeRecord {
    pub x: i32,
    pub y: i32,
    pub state: CellState,
}

impl ChangeRecord {
    pub fn new(x: i32, y: i32, state: CellState) -> Self {
        Self { x, y, state }
    }
}

impl From<ChangeRecord> for (i32, i32, u8) {
    fn from(change: ChangeRecord) -> Self {
        (change.x, change.y, change.state.id())
    }
}

impl TryFrom<(i32, i32, u8)> for ChangeRecord {
    type Error = InvalidCellState;

    fn try_from((x, y, id): (i32, i32, u8)) -> Result<Self, Self::Error> {
        Ok(Self {
            x,
            y,
            state: CellState::try_from(id)?,
        })
    }
}

/// A fixed-size rectangle of cells.
///
/// Reads and writes outside of the rectangle are not errors: reads return
/// `None` and writes are ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Row-major.
    cells: Vec<CellState>,
}

impl Grid {
    /// Creates a grid where every cell is neutral.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![CellState::Neutral; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.is_in_bounds(x, y)
            .then(|| y as usize * self.width + x as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<CellState> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// The single mutation entry point. Out-of-range coordinates are a no-op.
    pub fn set(&mut self, x: i32, y: i32, state: CellState) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = state;
        }
    }

    pub fn apply(&mut self, change: ChangeRecord) {
        self.set(change.x, change.y, change.state);
    }

    /// Applies a whole change list in order.
    pub fn apply_all(&mut self, changes: &[ChangeRecord]) {
        for &change in changes {
            self.apply(change);
        }
    }

    /// Number of cells in each state. All three states are always present.
    pub fn count_by_owner(&self) -> BTreeMap<CellState, usize> {
        let mut counts = BTreeMap::from([
            (CellState::Neutral, 0),
            (CellState::Player1, 0),
            (CellState::Player2, 0),
        ]);
        for &cell in &self.cells {
            *counts.entry(cell).or_insert(0) += 1;
        }
        counts
    }

    /// Number of cells owned by `player`.
    pub fn count_owned(&self, player: Player) -> usize {
        let state = CellState::from(player);
        self.cells.iter().filter(|&&cell| cell == state).count()
    }

    /// Iterates over all cells as `(x, y, state)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, CellState)> + '_ {
        self.cells.iter().enumerate().map(move |(idx, &state)| {
            ((idx % self.width) as i32, (idx / self.width) as i32, state)
        })
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;
    use crate::arbitrary::{GridInput, PaintInput};

    quickcheck! {
        fn set_then_get(input: GridInput) -> bool {
            let mut grid = Grid::new(input.width, input.height);
            let (x, y) = input.in_bounds;
            grid.set(x, y, input.state);
            grid.get(x, y) == Some(input.state)
        }

        fn out_of_range_set_is_noop(input: GridInput) -> bool {
            let mut grid = Grid::new(input.width, input.height);
            grid.set(input.in_bounds.0, input.in_bounds.1, CellState::Player2);
            let before = grid.clone();
            let (x, y) = input.out_of_bounds;
            grid.set(x, y, input.state);
            grid == before && grid.get(x, y).is_none()
        }

        fn replay_is_a_pure_function(input: PaintInput) -> bool {
            let mut a = Grid::new(input.width, input.height);
            let mut b = Grid::new(input.width, input.height);
            a.apply_all(&input.changes);
            for &change in &input.changes {
                b.set(change.x, change.y, change.state);
            }
            a == b
        }
    }

    #[test]
    fn counts_include_every_state() {
        let mut grid = Grid::new(3, 2);
        grid.set(0, 0, CellState::Player1);
        grid.set(2, 1, CellState::Player1);
        grid.set(1, 1, CellState::Player2);
        let counts = grid.count_by_owner();
        assert_eq!(counts[&CellState::Neutral], 3);
        assert_eq!(counts[&CellState::Player1], 2);
        assert_eq!(counts[&CellState::Player2], 1);
        assert_eq!(grid.count_owned(Player::One), 2);
    }

    #[test]
    fn change_record_wire_shape() {
        let change = ChangeRecord::new(3, -1, CellState::Player2);
        let json = serde_json::to_string(&change).unwrap();
        assert_eq!(json, "[3,-1,2]");
        let parsed: ChangeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, change);
        assert!(serde_json::from_str::<ChangeRecord>("[0,0,7]").is_err());
    }

    #[test]
    fn iter_is_row_major() {
        let mut grid = Grid::new(2, 2);
        grid.set(1, 0, CellState::Player1);
        let cells: Vec<_> = grid.iter().collect();
        assert_eq!(cells[1], (1, 0, CellState::Player1));
        assert_eq!(cells[2], (0, 1, CellState::Neutral));
    }
}
