use crate::{CellState, Grid};

fn cell_char(state: CellState) -> char {
    match state {
        CellState::Neutral => '·',
        CellState::Player1 => '●',
        CellState::Player2 => '○',
    }
}

/// Draws the grid in a box, one character per cell, with the x coordinates
/// of the first column and y coordinates along the left edge.
pub fn visualize_grid(grid: &Grid) -> String {
    let mut result = String::from("     0");
    result += "\n    ╭";
    for _ in 0..grid.width() {
        result += "─";
    }
    result += "╮";

    for y in 0..grid.height() as i32 {
        result += &format!("\n{:>3} │", y);
        for x in 0..grid.width() as i32 {
            result.push(grid.get(x, y).map_or(' ', cell_char));
        }
        result += "│";
    }

    result += "\n    ╰";
    for _ in 0..grid.width() {
        result += "─";
    }
    result += "╯";
    result
}
