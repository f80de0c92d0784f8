//! Full Tic-Tac-Toe solver binary.
//!
//! Usage:
//!   cargo run --release --bin solve_tictactoe -- [OPTIONS]
//!
//! Options:
//!   --config <FILE>      Configuration JSON file (optional)
//!   --threads <N>        Number of build threads (default: auto)
//!   --sequential         Build the table on one thread
//!   --progress           Show progress bars
//!   --no-verify          Skip the post-solve consistency check
//!   --output <FILE>      Write the solved table as JSON
//!   --reachable-only     Only export positions reachable from the empty board
//!   --show <ID>          Print a position and its best moves (repeatable)
//!   --sample <N>         Print N random reachable positions
//!   --seed <N>           Random seed for --sample

use std::env;
use std::process;
use std::str::FromStr;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use tictactoe_solver::game::PositionId;
use tictactoe_solver::output::{print_summary, SolutionOutput};
use tictactoe_solver::retro::{solve_with_config, SolverConfig, StateSpace};

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse arguments
    let mut config_file: Option<String> = None;
    let mut threads: usize = 0;
    let mut sequential = false;
    let mut progress = false;
    let mut verify = true;
    let mut output_file: Option<String> = None;
    let mut reachable_only = false;
    let mut show_ids: Vec<PositionId> = Vec::new();
    let mut sample: usize = 0;
    let mut seed: Option<u64> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                i += 1;
                if i < args.len() {
                    config_file = Some(args[i].clone());
                }
            }
            "--threads" | "-t" => {
                i += 1;
                if i < args.len() {
                    if let Some(n) = parse_value("thread count", &args[i]) {
                        threads = n;
                    }
                }
            }
            "--sequential" => {
                sequential = true;
            }
            "--progress" | "-p" => {
                progress = true;
            }
            "--no-verify" => {
                verify = false;
            }
            "--output" | "-o" => {
                i += 1;
                if i < args.len() {
                    output_file = Some(args[i].clone());
                }
            }
            "--reachable-only" => {
                reachable_only = true;
            }
            "--show" => {
                i += 1;
                if i < args.len() {
                    if let Some(id) = parse_value("id", &args[i]) {
                        show_ids.push(id);
                    }
                }
            }
            "--sample" | "-n" => {
                i += 1;
                if i < args.len() {
                    if let Some(n) = parse_value("sample count", &args[i]) {
                        sample = n;
                    }
                }
            }
            "--seed" | "-s" => {
                i += 1;
                if i < args.len() {
                    if let Some(n) = parse_value("seed", &args[i]) {
                        seed = Some(n);
                    }
                }
            }
            "--help" | "-h" => {
                print_help();
                return;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                return;
            }
        }
        i += 1;
    }

    println!("=================================================");
    println!("  Tic-Tac-Toe Retrograde Solver");
    println!("=================================================");
    println!();

    // Load or create configuration
    let mut config = if let Some(path) = &config_file {
        println!("Loading configuration from: {}", path);
        match SolverConfig::from_json_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                process::exit(1);
            }
        }
    } else {
        SolverConfig::default()
    };

    // Command-line flags override the file
    if threads > 0 {
        config = config.with_threads(threads);
    }
    if sequential {
        config = config.with_parallel_build(false);
    }
    if progress {
        config = config.with_progress(true);
    }
    if !verify {
        config = config.with_verify(false);
    }
    if seed.is_some() {
        config.seed = seed;
    }

    println!(
        "Build: {}",
        if config.parallel_build {
            match config.num_threads {
                Some(n) => format!("parallel ({} threads)", n),
                None => "parallel (auto)".to_string(),
            }
        } else {
            "sequential".to_string()
        }
    );
    println!("Verify: {}", if config.verify { "yes" } else { "no" });
    if let Some(s) = config.seed {
        println!("Seed: {}", s);
    }
    println!();

    println!("Solving...");
    let start_time = Instant::now();
    let (space, stats) = match solve_with_config(&config) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Solve failed: {}", e);
            process::exit(1);
        }
    };
    println!("Done in {:.3}s", start_time.elapsed().as_secs_f64());
    println!();

    print_summary(&space, &stats);
    println!();

    println!("=== Root ===");
    println!("{}", space.root());
    println!();

    print_principal_line(&space, 0);

    for id in show_ids {
        print_position(&space, id);
    }

    if sample > 0 {
        let mut rng = match config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        println!("=== {} sampled positions ===", sample);
        for id in space.sample_reachable(&mut rng, sample) {
            print_position(&space, id);
        }
    }

    if let Some(path) = output_file {
        let output = SolutionOutput::new("Tic-Tac-Toe", &space, &stats, reachable_only);
        match output.save_json(&path) {
            Ok(_) => println!("Saved {} positions to {}", output.positions.len(), path),
            Err(e) => eprintln!("Error saving JSON: {}", e),
        }
    }
}

/// Parse a flag value, warning and returning `None` when it is malformed.
fn parse_value<T: FromStr>(what: &str, value: &str) -> Option<T> {
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            eprintln!("Ignoring invalid {}: {}", what, value);
            None
        }
    }
}

fn print_position(space: &StateSpace, id: PositionId) {
    let position = match space.get(id) {
        Ok(position) => position,
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };

    println!("{}", position);
    let best = space.best_moves(id).unwrap_or_default();
    if !best.is_empty() {
        let moves: Vec<String> = best.iter().map(|next| format!("#{}", next)).collect();
        println!("Best moves: {}", moves.join(", "));
    }
    println!();
}

fn print_principal_line(space: &StateSpace, id: PositionId) {
    let line = match space.principal_line(id) {
        Ok(line) => line,
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };

    println!("=== Principal line from #{} ({} plies) ===", id, line.len() - 1);
    for next in line {
        if let Ok(position) = space.get(next) {
            println!("{}", position);
            println!();
        }
    }
}

fn print_help() {
    println!("Tic-Tac-Toe Retrograde Solver");
    println!();
    println!("Usage: solve_tictactoe [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --config <FILE>     Configuration JSON file");
    println!("  -t, --threads <N>       Number of build threads (default: auto)");
    println!("      --sequential        Build the table on one thread");
    println!("  -p, --progress          Show progress bars");
    println!("      --no-verify         Skip the post-solve consistency check");
    println!("  -o, --output <FILE>     Write the solved table as JSON");
    println!("      --reachable-only    Only export positions reachable from the empty board");
    println!("      --show <ID>         Print a position and its best moves (repeatable)");
    println!("  -n, --sample <N>        Print N random reachable positions");
    println!("  -s, --seed <N>          Random seed for --sample");
    println!("  -h, --help              Show this help");
}
