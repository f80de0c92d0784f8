//! The indexed state space.
//!
//! Every id in `0..=MAX_ID` owns exactly one [`Position`] record in a flat
//! table. Successor and predecessor links are plain ids into that table, so
//! the game graph can be walked both ways without any record owning another.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::game::{
    cells_to_string, classify, codec::check_id, decode, filled_count, successors, Cells,
    CodecError, Outcome, Player, PositionId, NUM_POSITIONS,
};

use super::config::{OutcomeCounts, SolverConfig};
use super::error::SolveError;
use super::progress;
use super::solver::evaluate;

/// One game position: board, player to move, and its solved value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Position {
    id: PositionId,
    cells: Cells,
    next_player: Player,
    outcome: Outcome,
    expected_outcome: Outcome,
    successor_ids: Vec<PositionId>,
    predecessor_ids: Vec<PositionId>,
}

impl Position {
    /// Decode and classify the position for `id`.
    ///
    /// Terminal positions start with `expected_outcome == outcome`; all others
    /// start undecided. Predecessors are left empty until the table is linked.
    pub fn new(id: PositionId) -> Result<Self, CodecError> {
        let (cells, next_player) = decode(id)?;
        let outcome = classify(&cells);
        let successor_ids = successors(&cells, next_player, outcome);

        Ok(Self {
            id,
            cells,
            next_player,
            outcome,
            expected_outcome: outcome,
            successor_ids,
            predecessor_ids: Vec::new(),
        })
    }

    /// Position id.
    #[inline]
    pub fn id(&self) -> PositionId {
        self.id
    }

    /// The nine cells, row-major.
    #[inline]
    pub fn cells(&self) -> &Cells {
        &self.cells
    }

    /// Player to move.
    #[inline]
    pub fn next_player(&self) -> Player {
        self.next_player
    }

    /// Terminal classification of the cells.
    #[inline]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Value under optimal play by both sides.
    #[inline]
    pub fn expected_outcome(&self) -> Outcome {
        self.expected_outcome
    }

    /// Ids reachable in one move, in ascending cell order.
    #[inline]
    pub fn successor_ids(&self) -> &[PositionId] {
        &self.successor_ids
    }

    /// Ids that reach this position in one move.
    #[inline]
    pub fn predecessor_ids(&self) -> &[PositionId] {
        &self.predecessor_ids
    }

    /// Whether the cells alone decide the game.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_decided()
    }

    /// Number of marks on the board.
    pub fn ply(&self) -> usize {
        filled_count(&self.cells)
    }

    /// Cells as a 9-character glyph string.
    pub fn board_string(&self) -> String {
        cells_to_string(&self.cells)
    }
}

/// Flat table of every position, indexed by id.
#[derive(Debug, Clone)]
pub struct StateSpace {
    positions: Vec<Position>,
    edges: usize,
}

impl StateSpace {
    /// Build every position and link predecessors.
    pub fn build(config: &SolverConfig) -> Result<Self, SolveError> {
        config.validate()?;

        let positions = if config.parallel_build {
            match config.num_threads {
                Some(threads) => {
                    let pool = rayon::ThreadPoolBuilder::new()
                        .num_threads(threads)
                        .build()
                        .map_err(|e| SolveError::ThreadPool(e.to_string()))?;
                    pool.install(|| Self::create_parallel(config.show_progress))?
                }
                None => Self::create_parallel(config.show_progress)?,
            }
        } else {
            Self::create_sequential(config.show_progress)?
        };

        let mut space = Self {
            positions,
            edges: 0,
        };
        space.link_predecessors();
        Ok(space)
    }

    fn create_sequential(show_progress: bool) -> Result<Vec<Position>, SolveError> {
        let pb = progress::bar(NUM_POSITIONS as u64, "build", show_progress);
        let mut positions = Vec::with_capacity(NUM_POSITIONS);
        for id in 0..NUM_POSITIONS {
            positions.push(Position::new(id)?);
            pb.inc(1);
        }
        pb.finish_and_clear();
        Ok(positions)
    }

    fn create_parallel(show_progress: bool) -> Result<Vec<Position>, SolveError> {
        let pb = progress::bar(NUM_POSITIONS as u64, "build", show_progress);
        let positions = (0..NUM_POSITIONS)
            .into_par_iter()
            .map(|id| {
                let position = Position::new(id);
                pb.inc(1);
                position
            })
            .collect::<Result<Vec<_>, _>>()?;
        pb.finish_and_clear();
        Ok(positions)
    }

    /// Invert the successor relation into predecessor lists.
    ///
    /// Ids are visited in ascending order, so every predecessor list is sorted.
    fn link_predecessors(&mut self) {
        for position in &mut self.positions {
            position.predecessor_ids.clear();
        }

        let mut edges = 0;
        for id in 0..self.positions.len() {
            for k in 0..self.positions[id].successor_ids.len() {
                let next = self.positions[id].successor_ids[k];
                self.positions[next].predecessor_ids.push(id);
                edges += 1;
            }
        }
        self.edges = edges;
    }

    /// Number of positions (always `MAX_ID + 1`).
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Always false for a built table.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Total successor edges.
    pub fn edge_count(&self) -> usize {
        self.edges
    }

    /// Look up a position by id.
    pub fn get(&self, id: PositionId) -> Result<&Position, CodecError> {
        check_id(id)?;
        self.positions
            .get(id)
            .ok_or(CodecError::OutOfRange { id })
    }

    /// The empty board with O to move (id 0).
    pub fn root(&self) -> &Position {
        &self.positions[0]
    }

    /// All positions in id order.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Iterate positions in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.positions.iter()
    }

    /// Ids of all terminal positions, ascending.
    pub fn terminal_ids(&self) -> impl Iterator<Item = PositionId> + '_ {
        self.positions
            .iter()
            .filter(|p| p.is_terminal())
            .map(|p| p.id)
    }

    /// Unchecked access for the solver; `id` comes from the table itself.
    #[inline]
    pub(crate) fn position(&self, id: PositionId) -> &Position {
        &self.positions[id]
    }

    #[inline]
    pub(crate) fn expected(&self, id: PositionId) -> Outcome {
        self.positions[id].expected_outcome
    }

    /// Record a solved value. Only moves a position out of `Undecided`.
    #[inline]
    pub(crate) fn set_expected(&mut self, id: PositionId, outcome: Outcome) {
        let position = &mut self.positions[id];
        debug_assert!(
            !position.expected_outcome.is_decided(),
            "position #{} already solved",
            id
        );
        position.expected_outcome = outcome;
    }

    /// Ids reachable from the root by legal play, ascending.
    ///
    /// Boards with lines for both players, or with mark counts no game can
    /// produce, are never reached.
    pub fn reachable_ids(&self) -> Vec<PositionId> {
        let mut ids: Vec<PositionId> = self.reachable_set().into_iter().collect();
        ids.sort_unstable();
        ids
    }

    /// Set of ids reachable from the root.
    pub fn reachable_set(&self) -> FxHashSet<PositionId> {
        let mut seen = FxHashSet::default();
        let mut frontier = VecDeque::new();
        seen.insert(0);
        frontier.push_back(0);

        while let Some(id) = frontier.pop_front() {
            for &next in &self.positions[id].successor_ids {
                if seen.insert(next) {
                    frontier.push_back(next);
                }
            }
        }
        seen
    }

    /// Whether `id` can arise in a game started from the empty board.
    pub fn is_reachable(&self, id: PositionId) -> Result<bool, CodecError> {
        check_id(id)?;
        Ok(self.reachable_set().contains(&id))
    }

    /// Expected outcome counts over the given ids.
    pub fn expected_counts<I>(&self, ids: I) -> OutcomeCounts
    where
        I: IntoIterator<Item = PositionId>,
    {
        let mut counts = OutcomeCounts::default();
        for id in ids {
            counts.record(self.expected(id));
        }
        counts
    }

    /// Successor records of `id`, for tree views.
    pub fn children(&self, id: PositionId) -> Result<Vec<&Position>, CodecError> {
        let position = self.get(id)?;
        Ok(position
            .successor_ids
            .iter()
            .map(|&next| &self.positions[next])
            .collect())
    }

    /// Moves that keep the position's optimal value.
    ///
    /// These are the successors whose expected outcome equals this position's.
    /// Empty for terminal positions.
    pub fn best_moves(&self, id: PositionId) -> Result<Vec<PositionId>, CodecError> {
        let position = self.get(id)?;
        Ok(position
            .successor_ids
            .iter()
            .copied()
            .filter(|&next| self.expected(next) == position.expected_outcome)
            .collect())
    }

    /// Follow the first best move from `id` until a terminal position.
    ///
    /// The returned line starts with `id` itself.
    pub fn principal_line(&self, id: PositionId) -> Result<Vec<PositionId>, CodecError> {
        let mut line = vec![check_id(id)?];
        let mut current = id;
        while let Some(&next) = self.best_moves(current)?.first() {
            line.push(next);
            current = next;
        }
        Ok(line)
    }

    /// Pick up to `count` distinct reachable ids at random.
    pub fn sample_reachable<R: Rng>(&self, rng: &mut R, count: usize) -> Vec<PositionId> {
        let reachable = self.reachable_ids();
        let mut picked: Vec<PositionId> = reachable.choose_multiple(rng, count).copied().collect();
        picked.sort_unstable();
        picked
    }

    /// Check every solved position against its successors.
    ///
    /// Fails on the first position that is still undecided, whose moves
    /// disagree with its terminal status, or whose value differs from the one
    /// its successors imply.
    pub fn verify(&self) -> Result<(), SolveError> {
        for position in &self.positions {
            let id = position.id;
            let inconsistent = |reason: String| SolveError::Inconsistent { id, reason };

            if position.is_terminal() != position.successor_ids.is_empty() {
                return Err(inconsistent(format!(
                    "outcome {} with {} successors",
                    position.outcome,
                    position.successor_ids.len()
                )));
            }

            if !position.expected_outcome.is_decided() {
                return Err(inconsistent("still undecided".to_string()));
            }

            let implied = if position.is_terminal() {
                position.outcome
            } else {
                evaluate(
                    position.next_player,
                    position.successor_ids.iter().map(|&next| self.expected(next)),
                )
            };
            if implied != position.expected_outcome {
                return Err(inconsistent(format!(
                    "expected {} but successors imply {}",
                    position.expected_outcome, implied
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{encode, parse_cells, MAX_ID};
    use crate::retro::BackwardSolver;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn unsolved() -> StateSpace {
        StateSpace::build(&SolverConfig::sequential()).unwrap()
    }

    #[test]
    fn test_build_covers_all_ids() {
        let space = unsolved();
        assert_eq!(space.len(), MAX_ID + 1);
        for (index, position) in space.iter().enumerate() {
            assert_eq!(position.id(), index);
        }
        assert_eq!(space.root().id(), 0);
        assert_eq!(space.root().ply(), 0);
        assert_eq!(space.root().next_player(), Player::O);
    }

    #[test]
    fn test_parallel_build_matches_sequential() {
        let sequential = unsolved();
        let parallel =
            StateSpace::build(&SolverConfig::default().with_parallel_build(true).with_threads(2))
                .unwrap();
        assert_eq!(sequential.positions(), parallel.positions());
        assert_eq!(sequential.edge_count(), parallel.edge_count());
    }

    #[test]
    fn test_predecessors_invert_successors() {
        let space = unsolved();
        let mut edges = 0;
        for position in space.iter() {
            for &next in position.successor_ids() {
                assert!(space.get(next).unwrap().predecessor_ids().contains(&position.id()));
                edges += 1;
            }
            for &prev in position.predecessor_ids() {
                assert!(space.get(prev).unwrap().successor_ids().contains(&position.id()));
            }
        }
        assert_eq!(edges, space.edge_count());
        assert!(space.root().predecessor_ids().is_empty());
    }

    #[test]
    fn test_terminal_initial_values() {
        let space = unsolved();
        for position in space.iter() {
            if position.is_terminal() {
                assert_eq!(position.expected_outcome(), position.outcome());
                assert!(position.successor_ids().is_empty());
            } else {
                assert_eq!(position.expected_outcome(), Outcome::Undecided);
                assert!(!position.successor_ids().is_empty());
            }
        }
    }

    #[test]
    fn test_get_out_of_range() {
        let space = unsolved();
        assert_eq!(
            space.get(MAX_ID + 1).unwrap_err(),
            CodecError::OutOfRange { id: MAX_ID + 1 }
        );
        assert!(space.children(MAX_ID + 5).is_err());
        assert!(space.principal_line(MAX_ID + 5).is_err());
    }

    #[test]
    fn test_reachable_counts() {
        let space = unsolved();
        let reachable = space.reachable_ids();
        assert_eq!(reachable.len(), 5478);
        assert_eq!(reachable[0], 0);

        let terminal = reachable
            .iter()
            .filter(|&&id| space.get(id).unwrap().is_terminal())
            .count();
        assert_eq!(terminal, 958);

        // Both players completing a line never happens in play
        let both = parse_cells("OOOXXX---").unwrap();
        let set = space.reachable_set();
        assert!(!set.contains(&encode(&both, Player::O)));
        assert!(!set.contains(&encode(&both, Player::X)));
    }

    #[test]
    fn test_children_match_successors() {
        let space = unsolved();
        let children = space.children(0).unwrap();
        assert_eq!(children.len(), 9);
        for child in children {
            assert_eq!(child.ply(), 1);
            assert_eq!(child.next_player(), Player::X);
            assert_eq!(child.predecessor_ids(), &[0]);
        }
    }

    #[test]
    fn test_verify_rejects_unsolved() {
        let space = unsolved();
        assert!(matches!(
            space.verify(),
            Err(SolveError::Inconsistent { .. })
        ));
    }

    #[test]
    fn test_is_reachable() {
        let space = unsolved();
        assert_eq!(space.is_reachable(0), Ok(true));

        let opening = encode(&parse_cells("----O----").unwrap(), Player::X);
        assert_eq!(space.is_reachable(opening), Ok(true));

        // Wrong player to move for the mark count
        let wrong_turn = encode(&parse_cells("----O----").unwrap(), Player::O);
        assert_eq!(space.is_reachable(wrong_turn), Ok(false));

        let both = parse_cells("OOOXXX---").unwrap();
        assert_eq!(space.is_reachable(encode(&both, Player::O)), Ok(false));
        assert_eq!(space.is_reachable(encode(&both, Player::X)), Ok(false));

        assert_eq!(
            space.is_reachable(MAX_ID + 1),
            Err(CodecError::OutOfRange { id: MAX_ID + 1 })
        );
    }

    #[test]
    fn test_solve_fails_on_position_without_moves() {
        let mut space = unsolved();
        let id = encode(&parse_cells("OO-XX-OXX").unwrap(), Player::O);
        assert!(!space.get(id).unwrap().is_terminal());
        space.positions[id].successor_ids.clear();

        let mut solver = BackwardSolver::new(SolverConfig::sequential());
        assert_eq!(
            solver.solve(&mut space).unwrap_err(),
            SolveError::NoMoves { id }
        );
    }

    #[test]
    fn test_solve_reports_unresolved_root() {
        let mut space = unsolved();
        // Nothing points back at the root, so it is never queued
        for position in &mut space.positions {
            position.predecessor_ids.retain(|&prev| prev != 0);
        }

        let mut solver = BackwardSolver::new(SolverConfig::sequential());
        assert_eq!(
            solver.solve(&mut space).unwrap_err(),
            SolveError::Unresolved { count: 1, first: 0 }
        );
    }

    #[test]
    fn test_solve_detects_stall() {
        let mut space = unsolved();
        // Detach the first opening move: it is never queued, and the root
        // waits on it forever.
        let opening = space.root().successor_ids()[0];
        for position in &mut space.positions {
            position.predecessor_ids.retain(|&prev| prev != opening);
        }

        let mut solver = BackwardSolver::new(SolverConfig::sequential());
        assert!(matches!(
            solver.solve(&mut space),
            Err(SolveError::Stalled { unresolved: 2, .. })
        ));
    }

    #[test]
    fn test_sample_reachable_is_seeded() {
        let space = unsolved();
        let reachable = space.reachable_set();

        let first = space.sample_reachable(&mut StdRng::seed_from_u64(1), 5);
        let second = space.sample_reachable(&mut StdRng::seed_from_u64(1), 5);
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
        assert!(first.windows(2).all(|w| w[0] < w[1]));
        assert!(first.iter().all(|id| reachable.contains(id)));

        let all = space.sample_reachable(&mut StdRng::seed_from_u64(2), 10_000);
        assert_eq!(all.len(), 5478);
    }
}
