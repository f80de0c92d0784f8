//! Tic-Tac-Toe position model.
//!
//! This module holds the pure, stateless pieces of the solver:
//! - [`codec`]: the bijection between a position id and (cells, player to move)
//! - [`outcome`]: terminal classification from raw cell contents
//! - [`moves`]: successor generation for undecided positions
//!
//! Nothing here allocates a table or keeps state; the [`crate::retro`] module
//! calls into these functions once per id to build the state space.
//!
//! ## Board Layout
//!
//! ```text
//!  0 | 1 | 2
//! ---+---+---
//!  3 | 4 | 5
//! ---+---+---
//!  6 | 7 | 8
//! ```

pub mod codec;
pub mod moves;
pub mod outcome;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use codec::{decode, encode, CodecError, PositionId, MAX_ID, NUM_BOARDS, NUM_POSITIONS};
pub use moves::successors;
pub use outcome::{classify, WINNING_LINES};

/// Number of cells on the board.
pub const BOARD_CELLS: usize = 9;

/// Contents of a single cell.
///
/// The discriminant is the base-3 digit used by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// No mark yet
    Empty = 0,
    /// Marked by O
    O = 1,
    /// Marked by X
    X = 2,
}

impl Cell {
    /// Cell for a base-3 digit (0, 1 or 2).
    #[inline]
    pub fn from_digit(digit: usize) -> Self {
        debug_assert!(digit < 3, "cell digit must be 0-2");
        match digit {
            1 => Cell::O,
            2 => Cell::X,
            _ => Cell::Empty,
        }
    }

    /// Base-3 digit of this cell.
    #[inline]
    pub fn digit(self) -> usize {
        self as usize
    }

    /// Display glyph: `-` for empty, otherwise the mark.
    pub fn glyph(self) -> char {
        match self {
            Cell::Empty => '-',
            Cell::O => 'O',
            Cell::X => 'X',
        }
    }

    /// Parse a display glyph. Accepts `-`, `.` and space for empty.
    pub fn from_glyph(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            '-' | '.' | ' ' => Some(Cell::Empty),
            'O' => Some(Cell::O),
            'X' => Some(Cell::X),
            _ => None,
        }
    }
}

/// Whose move it is.
///
/// The discriminant is the low bit of the position id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// O moves (O always opens the game)
    O = 0,
    /// X moves
    X = 1,
}

impl Player {
    /// The other player.
    #[inline]
    pub fn opponent(self) -> Self {
        match self {
            Player::O => Player::X,
            Player::X => Player::O,
        }
    }

    /// The mark this player places.
    #[inline]
    pub fn mark(self) -> Cell {
        match self {
            Player::O => Cell::O,
            Player::X => Cell::X,
        }
    }

    /// The outcome in which this player wins.
    #[inline]
    pub fn winning_outcome(self) -> Outcome {
        match self {
            Player::O => Outcome::OWins,
            Player::X => Outcome::XWins,
        }
    }

    /// The outcome in which this player loses.
    #[inline]
    pub fn losing_outcome(self) -> Outcome {
        self.opponent().winning_outcome()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::O => write!(f, "O"),
            Player::X => write!(f, "X"),
        }
    }
}

/// Game result, either terminal classification or value under optimal play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Not decided (yet)
    Undecided,
    /// O has three in a line
    OWins,
    /// Board full with no line
    Draw,
    /// X has three in a line
    XWins,
}

impl Outcome {
    /// All outcome values, in display order.
    pub const ALL: [Outcome; 4] = [
        Outcome::Undecided,
        Outcome::OWins,
        Outcome::Draw,
        Outcome::XWins,
    ];

    /// Whether this is a decided value.
    #[inline]
    pub fn is_decided(self) -> bool {
        self != Outcome::Undecided
    }

    /// The outcome that wins for the player owning `mark`, or `None` for empty.
    #[inline]
    pub fn win_for(mark: Cell) -> Option<Self> {
        match mark {
            Cell::O => Some(Outcome::OWins),
            Cell::X => Some(Outcome::XWins),
            Cell::Empty => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Outcome::Undecided => "Undecided",
            Outcome::OWins => "OWins",
            Outcome::Draw => "Draw",
            Outcome::XWins => "XWins",
        };
        f.pad(name)
    }
}

/// The nine cells of a board, row-major.
pub type Cells = [Cell; BOARD_CELLS];

/// Parse a 9-character board string like `"OOO------"`.
///
/// `/` and `|` row separators and line breaks are ignored, so `"OOO/---/---"`
/// parses too. A space counts as an empty cell. Returns `None` for any other
/// length or glyph.
pub fn parse_cells(s: &str) -> Option<Cells> {
    let glyphs: Vec<char> = s
        .chars()
        .filter(|c| !matches!(c, '/' | '|' | '\n' | '\t'))
        .collect();
    if glyphs.len() != BOARD_CELLS {
        return None;
    }

    let mut cells = [Cell::Empty; BOARD_CELLS];
    for (cell, &c) in cells.iter_mut().zip(glyphs.iter()) {
        *cell = Cell::from_glyph(c)?;
    }
    Some(cells)
}

/// Render cells as a 9-character string of glyphs.
pub fn cells_to_string(cells: &Cells) -> String {
    cells.iter().map(|c| c.glyph()).collect()
}

/// Number of non-empty cells (the ply count of a reachable board).
#[inline]
pub fn filled_count(cells: &Cells) -> usize {
    cells.iter().filter(|&&c| c != Cell::Empty).count()
}
