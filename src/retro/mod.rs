//! Retrograde analysis of the full Tic-Tac-Toe state space.
//!
//! This module builds one record per position id, links the game graph in
//! both directions, and labels every position with its value under optimal
//! play by backward induction.
//!
//! # Overview
//!
//! 1. **Build**: decode, classify, and expand every id in `0..=MAX_ID`
//!    (optionally in parallel, since each record depends only on its id)
//! 2. **Link**: invert successor lists into predecessor lists
//! 3. **Solve**: seed a worklist with the terminal positions and pull values
//!    backward until nothing is undecided
//! 4. **Verify** (optional): re-derive every value from its successors
//!
//! # Example
//!
//! ```no_run
//! use tictactoe_solver::game::Outcome;
//! use tictactoe_solver::retro::{solve_with_config, SolverConfig};
//!
//! let (space, stats) = solve_with_config(&SolverConfig::default()).unwrap();
//! println!("Solved {} positions in {:.2}s", stats.positions, stats.total_seconds());
//!
//! // Perfect play from the empty board is a draw
//! assert_eq!(space.root().expected_outcome(), Outcome::Draw);
//! ```
//!
//! # Theory
//!
//! Retrograde analysis is the technique behind endgame tablebases: label
//! terminal positions, then repeatedly pull resolved values backward along
//! the move relation.
//!
//! ```text
//! value(p) = win   if some move leads to a win for the mover
//!          = draw  if no winning move and some move leads to a draw
//!          = loss  if every move leads to a win for the opponent
//! ```
//!
//! A position stays undecided while it has no winning move and some
//! successor is still undecided.

pub mod config;
pub mod error;
mod progress;
pub mod solver;
pub mod space;

// Re-export main types for convenient access
pub use config::{ConfigError, OutcomeCounts, SolveStats, SolverConfig};
pub use error::SolveError;
pub use solver::{evaluate, solve_all, solve_with_config, BackwardSolver};
pub use space::{Position, StateSpace};
