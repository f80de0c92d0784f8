//! Output formatting for solved positions.
//!
//! Read-only views over a solved [`StateSpace`]: the three-row text
//! rendering of a position, a per-ply summary table, and a JSON export.

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::game::{Outcome, Player, PositionId, MAX_ID};
use crate::retro::{OutcomeCounts, Position, SolveStats, StateSpace};

impl fmt::Display for Position {
    /// Three rows of glyphs, annotated with id, player to move, and value.
    ///
    /// ```text
    /// OX-  #3429
    /// -O-  Next player: X
    /// --X  Expected outcome: Draw
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let glyphs: Vec<char> = self.cells().iter().map(|c| c.glyph()).collect();
        let row = |r: usize| -> String { glyphs[r * 3..r * 3 + 3].iter().collect() };

        writeln!(f, "{}  #{}", row(0), self.id())?;
        writeln!(f, "{}  Next player: {}", row(1), self.next_player())?;
        write!(f, "{}  Expected outcome: {}", row(2), self.expected_outcome())
    }
}

/// Flat record of one solved position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionRecord {
    /// Position id
    pub id: PositionId,
    /// Cells as a 9-character glyph string
    pub board: String,
    /// Player to move
    pub next_player: Player,
    /// Marks on the board
    pub ply: usize,
    /// Terminal classification
    pub outcome: Outcome,
    /// Value under optimal play
    pub expected_outcome: Outcome,
    /// Ids reachable in one move
    pub successors: Vec<PositionId>,
    /// Successors that keep the optimal value
    pub best_moves: Vec<PositionId>,
}

impl PositionRecord {
    /// Snapshot a position from a solved table.
    pub fn new(space: &StateSpace, position: &Position) -> Self {
        Self {
            id: position.id(),
            board: position.board_string(),
            next_player: position.next_player(),
            ply: position.ply(),
            outcome: position.outcome(),
            expected_outcome: position.expected_outcome(),
            successors: position.successor_ids().to_vec(),
            best_moves: space.best_moves(position.id()).unwrap_or_default(),
        }
    }
}

/// Complete solver output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionOutput {
    /// Name of this solution
    pub name: String,
    /// Largest position id
    pub max_id: PositionId,
    /// Whether only positions reachable from the root are listed
    pub reachable_only: bool,
    /// Run statistics
    pub stats: SolveStats,
    /// Position records, ascending by id
    pub positions: Vec<PositionRecord>,
}

impl SolutionOutput {
    /// Create output from a solved table.
    pub fn new(name: &str, space: &StateSpace, stats: &SolveStats, reachable_only: bool) -> Self {
        let positions = if reachable_only {
            space
                .reachable_ids()
                .into_iter()
                .filter_map(|id| space.get(id).ok())
                .map(|p| PositionRecord::new(space, p))
                .collect()
        } else {
            space.iter().map(|p| PositionRecord::new(space, p)).collect()
        };

        Self {
            name: name.to_string(),
            max_id: MAX_ID,
            reachable_only,
            stats: stats.clone(),
            positions,
        }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Save to JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())
    }
}

/// Expected outcome counts per ply over the given ids, ascending by ply.
pub fn ply_breakdown<I>(space: &StateSpace, ids: I) -> Vec<(usize, OutcomeCounts)>
where
    I: IntoIterator<Item = PositionId>,
{
    let mut by_ply: FxHashMap<usize, OutcomeCounts> = FxHashMap::default();
    for id in ids {
        if let Ok(position) = space.get(id) {
            by_ply
                .entry(position.ply())
                .or_default()
                .record(position.expected_outcome());
        }
    }

    let mut rows: Vec<(usize, OutcomeCounts)> = by_ply.into_iter().collect();
    rows.sort_unstable_by_key(|&(ply, _)| ply);
    rows
}

/// Print run statistics and the reachable per-ply table.
pub fn print_summary(space: &StateSpace, stats: &SolveStats) {
    println!("=== Summary ===");
    println!("Positions:           {:>8}", stats.positions);
    println!("Terminal positions:  {:>8}", stats.terminal_positions);
    println!("Edges:               {:>8}", stats.edges);
    println!("Reachable positions: {:>8}", stats.reachable_positions);
    println!("Reachable terminal:  {:>8}", stats.reachable_terminal);
    println!("Worklist pops:       {:>8}", stats.pops);
    println!("Requeues:            {:>8}", stats.requeues);
    println!(
        "Time:                {:>8.3}s (build {:.3}s, solve {:.3}s)",
        stats.total_seconds(),
        stats.build_seconds,
        stats.solve_seconds
    );
    println!();

    print_counts_header();
    print_counts_row("all ids", &stats.expected);
    print_counts_row("reachable", &stats.expected_reachable);
    println!();

    println!("Reachable positions by ply:");
    print_counts_header();
    for (ply, counts) in ply_breakdown(space, space.reachable_ids()) {
        print_counts_row(&format!("ply {}", ply), &counts);
    }
}

fn print_counts_header() {
    let mut header = format!("{:<12}", "");
    for outcome in decided_outcomes() {
        header.push_str(&format!(" {:>8}", outcome));
    }
    println!("{} {:>8}", header, "Total");
}

fn print_counts_row(label: &str, counts: &OutcomeCounts) {
    println!("{}", counts_row(label, counts));
}

/// One table row: decided counts in display order, then the total.
fn counts_row(label: &str, counts: &OutcomeCounts) -> String {
    let mut row = format!("{:<12}", label);
    for outcome in decided_outcomes() {
        row.push_str(&format!(" {:>8}", counts.get(outcome)));
    }
    row.push_str(&format!(" {:>8}", counts.total()));
    row
}

fn decided_outcomes() -> impl Iterator<Item = Outcome> {
    Outcome::ALL.into_iter().filter(|o| o.is_decided())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{encode, parse_cells};
    use crate::retro::{solve_with_config, SolverConfig};

    fn solved() -> (StateSpace, SolveStats) {
        solve_with_config(&SolverConfig::sequential()).unwrap()
    }

    #[test]
    fn test_render_root() {
        let (space, _) = solved();
        assert_eq!(
            space.root().to_string(),
            "---  #0\n---  Next player: O\n---  Expected outcome: Draw"
        );
    }

    #[test]
    fn test_render_win() {
        let (space, _) = solved();
        let id = encode(&parse_cells("OOOX-X---").unwrap(), Player::X);
        let text = space.get(id).unwrap().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], format!("OOO  #{}", id));
        assert_eq!(lines[1], "X-X  Next player: X");
        assert_eq!(lines[2], "---  Expected outcome: OWins");
    }

    #[test]
    fn test_reachable_output() {
        let (space, stats) = solved();
        let output = SolutionOutput::new("test", &space, &stats, true);
        assert_eq!(output.positions.len(), 5478);
        assert_eq!(output.positions[0].id, 0);
        assert_eq!(output.positions[0].best_moves.len(), 9);
        assert!(output
            .positions
            .iter()
            .all(|r| r.expected_outcome != Outcome::Undecided));

        let json = output.to_json().unwrap();
        let parsed: SolutionOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.positions.len(), 5478);
        assert_eq!(parsed.positions[0].board, "---------");
    }

    #[test]
    fn test_ply_breakdown() {
        let (space, _) = solved();
        let rows = ply_breakdown(&space, space.reachable_ids());
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].0, 0);
        assert_eq!(rows[0].1.draws, 1);
        assert_eq!(rows[1].1.total(), 9);
        let total: usize = rows.iter().map(|(_, c)| c.total()).sum();
        assert_eq!(total, 5478);
    }

    #[test]
    fn test_counts_row_columns() {
        let mut counts = OutcomeCounts::default();
        counts.record(Outcome::OWins);
        counts.record(Outcome::Draw);
        counts.record(Outcome::Draw);
        counts.record(Outcome::XWins);
        counts.record(Outcome::XWins);
        counts.record(Outcome::XWins);

        let row = counts_row("terminal", &counts);
        let columns: Vec<&str> = row.split_whitespace().collect();
        assert_eq!(columns, ["terminal", "1", "2", "3", "6"]);
    }
}
