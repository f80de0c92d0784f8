//! Position id codec.
//!
//! Every position is a pair (board, player to move) packed into one integer:
//!
//! ```text
//! board = cells[0]·3^8 + cells[1]·3^7 + ... + cells[8]·3^0   (Empty=0, O=1, X=2)
//! id    = board·2 + next_player                               (O=0, X=1)
//! ```
//!
//! Cell 8 is the least significant base-3 digit. The mapping is a bijection
//! between `0..=MAX_ID` and all (cells, player) pairs, including boards that
//! can never occur in a real game.

use std::fmt;

use super::{Cell, Cells, Player, BOARD_CELLS};

/// Integer handle for a position.
pub type PositionId = usize;

/// Number of distinct boards (3^9).
pub const NUM_BOARDS: usize = 19_683;

/// Largest valid position id, inclusive: `2·(3^9 − 1) + 1`.
pub const MAX_ID: PositionId = 2 * (NUM_BOARDS - 1) + 1;

/// Number of valid position ids.
pub const NUM_POSITIONS: usize = MAX_ID + 1;

/// Place value of cell 0 (3^8).
const TOP_PLACE: usize = NUM_BOARDS / 3;

/// Errors raised at the id boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// Id is greater than [`MAX_ID`].
    OutOfRange {
        /// The rejected id
        id: usize,
    },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::OutOfRange { id } => {
                write!(f, "Position id {} is out of range [0, {}]", id, MAX_ID)
            }
        }
    }
}

impl std::error::Error for CodecError {}

/// Check that `id` is a valid position id.
#[inline]
pub fn check_id(id: usize) -> Result<PositionId, CodecError> {
    if id > MAX_ID {
        return Err(CodecError::OutOfRange { id });
    }
    Ok(id)
}

/// Decode an id into its cells and the player to move.
pub fn decode(id: PositionId) -> Result<(Cells, Player), CodecError> {
    check_id(id)?;

    let next_player = if id % 2 == 0 { Player::O } else { Player::X };
    let mut board = id / 2;
    let mut cells = [Cell::Empty; BOARD_CELLS];
    for cell in cells.iter_mut().rev() {
        *cell = Cell::from_digit(board % 3);
        board /= 3;
    }

    Ok((cells, next_player))
}

/// Encode cells and the player to move into an id.
///
/// Total: every (cells, player) pair has an id in `0..=MAX_ID`.
pub fn encode(cells: &Cells, next_player: Player) -> PositionId {
    board_index(cells) * 2 + next_player as usize
}

/// Base-3 board number of `cells`, in `0..NUM_BOARDS`.
#[inline]
pub fn board_index(cells: &Cells) -> usize {
    cells.iter().fold(0, |acc, cell| acc * 3 + cell.digit())
}

/// Base-3 place value of a cell index (cell 0 is most significant).
#[inline]
pub fn place_value(index: usize) -> usize {
    debug_assert!(index < BOARD_CELLS, "cell index must be 0-8");
    TOP_PLACE / 3usize.pow(index as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::parse_cells;

    #[test]
    fn test_max_id() {
        assert_eq!(MAX_ID, 39_365);
        assert_eq!(NUM_POSITIONS, 39_366);
        assert_eq!(place_value(0), 6561);
        assert_eq!(place_value(8), 1);
    }

    #[test]
    fn test_round_trip_all_ids() {
        for id in 0..=MAX_ID {
            let (cells, player) = decode(id).unwrap();
            assert_eq!(encode(&cells, player), id, "round trip failed for {}", id);
        }
    }

    #[test]
    fn test_decode_layout() {
        // Root: empty board, O to move
        let (cells, player) = decode(0).unwrap();
        assert_eq!(cells, [Cell::Empty; BOARD_CELLS]);
        assert_eq!(player, Player::O);

        // Cell 8 is the least significant digit
        let (cells, player) = decode(3).unwrap();
        assert_eq!(player, Player::X);
        assert_eq!(cells[8], Cell::O);
        assert!(cells[..8].iter().all(|&c| c == Cell::Empty));

        // Cell 0 is the most significant digit
        let (cells, _) = decode(2 * 2 * 6561).unwrap();
        assert_eq!(cells[0], Cell::X);

        let (cells, player) = decode(MAX_ID).unwrap();
        assert_eq!(cells, [Cell::X; BOARD_CELLS]);
        assert_eq!(player, Player::X);
    }

    #[test]
    fn test_encode_known_board() {
        let cells = parse_cells("OOO------").unwrap();
        let board = 6561 + 2187 + 729;
        assert_eq!(encode(&cells, Player::O), board * 2);
        assert_eq!(encode(&cells, Player::X), board * 2 + 1);
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            decode(MAX_ID + 1),
            Err(CodecError::OutOfRange { id: MAX_ID + 1 })
        );
        assert!(check_id(MAX_ID).is_ok());
        let message = CodecError::OutOfRange { id: 40_000 }.to_string();
        assert!(message.contains("40000"));
    }
}
