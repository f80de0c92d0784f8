//! Configuration options for the retrograde solver.
//!
//! This module provides the configuration struct that controls how the
//! state space is built and checked, plus the statistics collected by a run.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::game::Outcome;

/// Configuration for building and solving the state space.
///
/// # Example
/// ```
/// use tictactoe_solver::retro::SolverConfig;
///
/// let config = SolverConfig::default();
/// assert!(config.verify); // verification is enabled by default
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Build position records in parallel with rayon.
    ///
    /// Records are pure functions of their id, so the resulting table is
    /// identical either way. The backward solve is always single-threaded.
    pub parallel_build: bool,

    /// Number of threads for the parallel build.
    ///
    /// Set to `None` to use all available cores.
    pub num_threads: Option<usize>,

    /// Run the consistency checker after solving.
    pub verify: bool,

    /// Draw progress bars on stderr while building and solving.
    pub show_progress: bool,

    /// Random seed for position sampling.
    ///
    /// If `None`, sampling uses entropy.
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            parallel_build: true,
            num_threads: None,
            verify: true,
            show_progress: false,
            seed: None,
        }
    }
}

impl SolverConfig {
    /// Create a new SolverConfig with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-threaded build, no progress output.
    ///
    /// This is what the tests and benchmarks use.
    pub fn sequential() -> Self {
        Self {
            parallel_build: false,
            ..Default::default()
        }
    }

    /// Parallel build with verification skipped.
    pub fn fast() -> Self {
        Self {
            parallel_build: true,
            verify: false,
            ..Default::default()
        }
    }

    /// Builder method: set whether to build in parallel.
    pub fn with_parallel_build(mut self, enable: bool) -> Self {
        self.parallel_build = enable;
        self
    }

    /// Builder method: set number of threads.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.num_threads = Some(threads);
        self
    }

    /// Builder method: set whether to verify after solving.
    pub fn with_verify(mut self, enable: bool) -> Self {
        self.verify = enable;
        self
    }

    /// Builder method: set whether to show progress bars.
    pub fn with_progress(mut self, enable: bool) -> Self {
        self.show_progress = enable;
        self
    }

    /// Builder method: set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_json_str(&content)
    }

    /// Parse configuration from a JSON string.
    ///
    /// Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_threads == Some(0) {
            return Err(ConfigError::InvalidThreads(0));
        }
        Ok(())
    }
}

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Thread count must be at least 1.
    InvalidThreads(usize),
    /// Config file could not be read.
    IoError(String),
    /// Config file is not valid JSON for this struct.
    ParseError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidThreads(n) => {
                write!(f, "Thread count {} is invalid, must be at least 1", n)
            }
            ConfigError::IoError(msg) => write!(f, "Failed to read config: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "Failed to parse config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Counts per outcome value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    /// Positions still undecided
    pub undecided: usize,
    /// Positions valued as an O win
    pub o_wins: usize,
    /// Positions valued as a draw
    pub draws: usize,
    /// Positions valued as an X win
    pub x_wins: usize,
}

impl OutcomeCounts {
    /// Add one position with the given outcome.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Undecided => self.undecided += 1,
            Outcome::OWins => self.o_wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::XWins => self.x_wins += 1,
        }
    }

    /// Count for one outcome value.
    pub fn get(&self, outcome: Outcome) -> usize {
        match outcome {
            Outcome::Undecided => self.undecided,
            Outcome::OWins => self.o_wins,
            Outcome::Draw => self.draws,
            Outcome::XWins => self.x_wins,
        }
    }

    /// Total positions counted.
    pub fn total(&self) -> usize {
        self.undecided + self.o_wins + self.draws + self.x_wins
    }
}

/// Statistics tracked while building and solving.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolveStats {
    /// Number of positions in the table.
    pub positions: usize,

    /// Positions with a terminal outcome.
    pub terminal_positions: usize,

    /// Total successor edges.
    pub edges: usize,

    /// Positions reachable from the empty board.
    pub reachable_positions: usize,

    /// Reachable positions with a terminal outcome.
    pub reachable_terminal: usize,

    /// Ids popped from the worklist.
    pub pops: u64,

    /// Ids pushed back because a successor was still undecided.
    pub requeues: u64,

    /// Non-terminal positions valued by the solver.
    pub resolved: usize,

    /// Expected outcome counts over all ids.
    pub expected: OutcomeCounts,

    /// Expected outcome counts over reachable ids only.
    pub expected_reachable: OutcomeCounts,

    /// Time spent building and linking the table (in seconds).
    pub build_seconds: f64,

    /// Time spent in the backward solve (in seconds).
    pub solve_seconds: f64,
}

impl SolveStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build plus solve time.
    pub fn total_seconds(&self) -> f64 {
        self.build_seconds + self.solve_seconds
    }
}
