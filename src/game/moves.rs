//! Successor generation.

use super::codec::{board_index, place_value, PositionId};
use super::{Cell, Cells, Outcome, Player};

/// Ids of every position reachable from (cells, next_player) in one move.
///
/// Terminal boards have no successors. Otherwise one successor per empty
/// cell, in ascending cell order: the mover's mark is placed there and the
/// opponent is to move.
pub fn successors(cells: &Cells, next_player: Player, outcome: Outcome) -> Vec<PositionId> {
    if outcome.is_decided() {
        return Vec::new();
    }

    let board = board_index(cells);
    let mark = next_player.mark().digit();
    let after = next_player.opponent() as usize;

    cells
        .iter()
        .enumerate()
        .filter(|&(_, &cell)| cell == Cell::Empty)
        .map(|(index, _)| (board + mark * place_value(index)) * 2 + after)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{classify, decode, encode, filled_count, parse_cells, MAX_ID};

    fn successors_of(id: PositionId) -> Vec<PositionId> {
        let (cells, player) = decode(id).unwrap();
        successors(&cells, player, classify(&cells))
    }

    #[test]
    fn test_root_successors() {
        let next = successors_of(0);
        assert_eq!(next.len(), 9);

        // Ascending cell order: first successor marks cell 0
        let (cells, player) = decode(next[0]).unwrap();
        assert_eq!(cells[0], Cell::O);
        assert_eq!(player, Player::X);

        let (cells, _) = decode(next[8]).unwrap();
        assert_eq!(cells[8], Cell::O);
    }

    #[test]
    fn test_matches_encode() {
        let cells = parse_cells("OX--O----").unwrap();
        let next = successors(&cells, Player::X, classify(&cells));
        assert_eq!(next.len(), 6);

        let mut expected = cells;
        expected[2] = Cell::X;
        assert_eq!(next[0], encode(&expected, Player::O));
    }

    #[test]
    fn test_terminal_has_none() {
        let won = parse_cells("OOO-X-X--").unwrap();
        assert!(successors(&won, Player::X, classify(&won)).is_empty());

        let full = parse_cells("OXOOXXXOO").unwrap();
        assert!(successors(&full, Player::O, classify(&full)).is_empty());
    }

    #[test]
    fn test_ply_increases_along_edges() {
        for id in (0..=MAX_ID).step_by(7) {
            let (cells, _) = decode(id).unwrap();
            let before = filled_count(&cells);
            for next in successors_of(id) {
                let (next_cells, _) = decode(next).unwrap();
                assert_eq!(filled_count(&next_cells), before + 1);
            }
        }
    }

    #[test]
    fn test_empty_iff_terminal() {
        for id in 0..=MAX_ID {
            let (cells, _) = decode(id).unwrap();
            let terminal = classify(&cells).is_decided();
            assert_eq!(successors_of(id).is_empty(), terminal, "id {}", id);
        }
    }
}
