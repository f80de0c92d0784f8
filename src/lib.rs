//! # Tic-Tac-Toe Solver
//!
//! Computes the value under optimal play (O wins, X wins, or draw) of every
//! Tic-Tac-Toe position by exhaustive retrograde analysis.
//!
//! ## Features
//!
//! - **Bijective Position Ids**: every (board, player to move) pair maps to one
//!   integer in `0..=MAX_ID` and back
//! - **Full State Space**: all 39,366 ids are built, including boards no game
//!   can reach
//! - **Backward Induction**: a worklist pulls terminal values back through the
//!   game graph until nothing is undecided
//! - **Verification**: every solved value can be re-derived from its successors
//! - **Export**: solved tables serialize to JSON
//!
//! ## Quick Start
//!
//! ```no_run
//! use tictactoe_solver::retro::solve_all;
//!
//! let space = solve_all().unwrap();
//! println!("{}", space.root());
//! ```
//!
//! ## Modules
//!
//! - [`game`]: Position codec, outcome classifier, successor generator
//! - [`retro`]: State space, graph linking, backward solver
//! - [`output`]: Text rendering, summaries, JSON export
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ Position     │   │ Outcome      │   │ Successor    │
//! │ Codec        │   │ Classifier   │   │ Generator    │
//! └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!        └──────────────────┼──────────────────┘
//!                           ▼ once per id
//!                  ┌──────────────────┐
//!                  │ StateSpace       │  + predecessor links
//!                  └────────┬─────────┘
//!                           ▼
//!                  ┌──────────────────┐
//!                  │ BackwardSolver   │  worklist fixed point
//!                  └────────┬─────────┘
//!                           ▼
//!                  output (render, JSON)
//! ```

#![warn(missing_docs)]

/// Position model: codec, classifier, and successor generation.
pub mod game;

/// Output formatting for solved tables.
pub mod output;

/// Retrograde solver module.
///
/// Builds, links, and solves the indexed state space.
pub mod retro;

// Re-export commonly used types at crate root for convenience
pub use game::{Cell, Cells, Outcome, Player, PositionId, MAX_ID};
pub use retro::{solve_all, BackwardSolver, Position, SolveError, SolverConfig, StateSpace};
