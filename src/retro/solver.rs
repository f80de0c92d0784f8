//! Backward (retrograde) solver.
//!
//! Terminal positions are labelled first. A FIFO worklist then pulls solved
//! values backward along the move relation until every position has a value
//! under optimal play:
//!
//! ```text
//! seed queue with all terminal ids
//! while queue not empty:
//!     pop id
//!     if id undecided:
//!         any successor wins for the mover  -> win
//!         else any successor undecided      -> wait
//!         else any successor draws          -> draw
//!         else                              -> loss
//!     if still undecided: push id back
//!     else: push every undecided predecessor
//! ```
//!
//! Every move adds a mark, so the graph is acyclic and layered by ply; each
//! value depends only on positions with more marks, and the frontier of
//! solved positions moves monotonically toward the empty board.

use std::collections::VecDeque;
use std::time::Instant;

use crate::game::{Outcome, Player};

use super::config::{SolveStats, SolverConfig};
use super::error::SolveError;
use super::progress;
use super::space::StateSpace;

/// Value of a position for `mover`, given its successors' current values.
///
/// Priority is fixed: a winning successor decides immediately, then any
/// undecided successor means "wait" (`Undecided`), then a drawn successor
/// gives a draw, and only when every successor wins for the opponent is the
/// position lost.
pub fn evaluate<I>(mover: Player, successors: I) -> Outcome
where
    I: IntoIterator<Item = Outcome>,
{
    let winning = mover.winning_outcome();
    let mut has_undecided = false;
    let mut has_draw = false;

    for outcome in successors {
        match outcome {
            o if o == winning => return winning,
            Outcome::Undecided => has_undecided = true,
            Outcome::Draw => has_draw = true,
            _ => {}
        }
    }

    if has_undecided {
        Outcome::Undecided
    } else if has_draw {
        Outcome::Draw
    } else {
        mover.losing_outcome()
    }
}

/// Worklist solver over a linked [`StateSpace`].
///
/// # Example
/// ```no_run
/// use tictactoe_solver::game::Outcome;
/// use tictactoe_solver::retro::{BackwardSolver, SolverConfig, StateSpace};
///
/// let config = SolverConfig::default();
/// let mut space = StateSpace::build(&config).unwrap();
/// let mut solver = BackwardSolver::new(config);
/// solver.solve(&mut space).unwrap();
/// assert_eq!(space.root().expected_outcome(), Outcome::Draw);
/// ```
#[derive(Debug, Clone)]
pub struct BackwardSolver {
    /// Configuration for the solver.
    config: SolverConfig,

    /// Statistics from the last solve.
    stats: SolveStats,
}

impl BackwardSolver {
    /// Create a new solver.
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            stats: SolveStats::new(),
        }
    }

    /// Solve every undecided position in `space` in place.
    ///
    /// Fails if a non-terminal position has no moves, if the worklist stops
    /// making progress, or if anything is left undecided afterwards. With
    /// `verify` set, the solved table is also checked position by position.
    pub fn solve(&mut self, space: &mut StateSpace) -> Result<&SolveStats, SolveError> {
        let start_time = Instant::now();

        let mut queue: VecDeque<_> = space.terminal_ids().collect();
        let terminal = queue.len();
        let undecided_at_start = space
            .iter()
            .filter(|p| !p.expected_outcome().is_decided())
            .count();

        self.stats.positions = space.len();
        self.stats.terminal_positions = terminal;
        self.stats.edges = space.edge_count();
        self.stats.pops = 0;
        self.stats.requeues = 0;
        self.stats.resolved = 0;

        let pb = progress::bar(undecided_at_start as u64, "solve", self.config.show_progress);

        // Consecutive pops that pushed themselves back without any change
        let mut retries = 0usize;

        while let Some(id) = queue.pop_front() {
            self.stats.pops += 1;

            if !space.expected(id).is_decided() {
                let value = {
                    let position = space.position(id);
                    if position.successor_ids().is_empty() {
                        return Err(SolveError::NoMoves { id });
                    }
                    evaluate(
                        position.next_player(),
                        position
                            .successor_ids()
                            .iter()
                            .map(|&next| space.expected(next)),
                    )
                };

                if value.is_decided() {
                    space.set_expected(id, value);
                    self.stats.resolved += 1;
                    pb.inc(1);
                }
            }

            if !space.expected(id).is_decided() {
                // Wait for the remaining successors
                queue.push_back(id);
                self.stats.requeues += 1;
                retries += 1;
                if retries >= queue.len() {
                    pb.abandon();
                    return Err(SolveError::Stalled {
                        unresolved: undecided_at_start - self.stats.resolved,
                        queued: queue.len(),
                    });
                }
            } else {
                retries = 0;
                for &prev in space.position(id).predecessor_ids() {
                    if !space.expected(prev).is_decided() {
                        queue.push_back(prev);
                    }
                }
            }
        }
        pb.finish_and_clear();

        if let Some(first) = space
            .iter()
            .find(|p| !p.expected_outcome().is_decided())
            .map(|p| p.id())
        {
            return Err(SolveError::Unresolved {
                count: undecided_at_start - self.stats.resolved,
                first,
            });
        }

        if self.config.verify {
            space.verify()?;
        }

        self.stats.expected = space.expected_counts(0..space.len());
        self.stats.solve_seconds = start_time.elapsed().as_secs_f64();

        Ok(&self.stats)
    }

    /// Statistics from the last solve.
    pub fn stats(&self) -> &SolveStats {
        &self.stats
    }

    /// Solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Give back the collected statistics.
    pub fn into_stats(self) -> SolveStats {
        self.stats
    }
}

/// Build, link, and solve the whole state space with default settings.
pub fn solve_all() -> Result<StateSpace, SolveError> {
    solve_with_config(&SolverConfig::default()).map(|(space, _)| space)
}

/// Build, link, and solve the whole state space.
///
/// Returns the solved table and statistics, including reachable-only counts.
pub fn solve_with_config(config: &SolverConfig) -> Result<(StateSpace, SolveStats), SolveError> {
    let build_start = Instant::now();
    let mut space = StateSpace::build(config)?;
    let build_seconds = build_start.elapsed().as_secs_f64();

    let mut solver = BackwardSolver::new(config.clone());
    solver.solve(&mut space)?;
    let mut stats = solver.into_stats();
    stats.build_seconds = build_seconds;

    let reachable = space.reachable_ids();
    stats.reachable_positions = reachable.len();
    stats.reachable_terminal = reachable
        .iter()
        .filter(|&&id| space.position(id).is_terminal())
        .count();
    stats.expected_reachable = space.expected_counts(reachable);

    Ok((space, stats))
}
