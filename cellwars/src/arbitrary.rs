use quickcheck::{Arbitrary, Gen};

use crate::{CellState, ChangeRecord};

fn arbitrary_dimension(g: &mut Gen) -> usize {
    (u8::arbitrary(g) % 32) as usize + 1
}

fn arbitrary_state(g: &mut Gen) -> CellState {
    *g.choose(&[CellState::Neutral, CellState::Player1, CellState::Player2])
        .unwrap()
}

/// A grid size with one coordinate inside and one outside of it.
#[derive(Clone, Debug)]
pub struct GridInput {
    pub width: usize,
    pub height: usize,
    pub in_bounds: (i32, i32),
    pub out_of_bounds: (i32, i32),
    pub state: CellState,
}

impl Arbitrary for GridInput {
    fn arbitrary(g: &mut Gen) -> Self {
        let width = arbitrary_dimension(g);
        let height = arbitrary_dimension(g);
        let in_bounds = (
            (u16::arbitrary(g) as usize % width) as i32,
            (u16::arbitrary(g) as usize % height) as i32,
        );

        // Overshoot by up to 8 cells on one of the four sides
        let overshoot = (u8::arbitrary(g) % 8) as i32;
        let out_of_bounds = match u8::arbitrary(g) % 4 {
            0 => (-1 - overshoot, in_bounds.1),
            1 => (width as i32 + overshoot, in_bounds.1),
            2 => (in_bounds.0, -1 - overshoot),
            _ => (in_bounds.0, height as i32 + overshoot),
        };

        Self {
            width,
            height,
            in_bounds,
            out_of_bounds,
            state: arbitrary_state(g),
        }
    }
}

/// A grid size and a list of changes, some of which may fall outside of it.
#[derive(Clone, Debug)]
pub struct PaintInput {
    pub width: usize,
    pub height: usize,
    pub changes: Vec<ChangeRecord>,
}

impl Arbitrary for PaintInput {
    fn arbitrary(g: &mut Gen) -> Self {
        let width = arbitrary_dimension(g);
        let height = arbitrary_dimension(g);
        let num_changes = usize::arbitrary(g) % 64;
        let changes = (0..num_changes)
            .map(|_| {
                let x = (i8::arbitrary(g) % 40) as i32;
                let y = (i8::arbitrary(g) % 40) as i32;
                ChangeRecord::new(x, y, arbitrary_state(g))
            })
            .collect();
        Self {
            width,
            height,
            changes,
        }
    }
}
