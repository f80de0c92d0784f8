//! Terminal outcome classification.

use super::{Cell, Cells, Outcome};

/// The eight winning lines, checked in this order: rows, columns, diagonals.
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Classify a board by its cells alone.
///
/// The first line in [`WINNING_LINES`] holding three equal marks decides the
/// result, so boards with lines for both players (never reachable in play)
/// still get a deterministic outcome. A full board with no line is a draw;
/// anything else is undecided.
pub fn classify(cells: &Cells) -> Outcome {
    for [a, b, c] in WINNING_LINES {
        let mark = cells[a];
        if mark != Cell::Empty && mark == cells[b] && mark == cells[c] {
            if let Some(outcome) = Outcome::win_for(mark) {
                return outcome;
            }
        }
    }

    if cells.iter().any(|&c| c == Cell::Empty) {
        Outcome::Undecided
    } else {
        Outcome::Draw
    }
}
