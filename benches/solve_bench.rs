//! Benchmarks for the retrograde solver.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tictactoe_solver::game::{decode, MAX_ID};
use tictactoe_solver::retro::{BackwardSolver, SolverConfig, StateSpace};

fn decode_all_benchmark(c: &mut Criterion) {
    c.bench_function("decode_all_ids", |b| {
        b.iter(|| {
            for id in 0..=MAX_ID {
                black_box(decode(black_box(id)).ok());
            }
        })
    });
}

fn build_benchmark(c: &mut Criterion) {
    let sequential = SolverConfig::sequential();
    c.bench_function("build_sequential", |b| {
        b.iter(|| StateSpace::build(black_box(&sequential)).ok())
    });

    let parallel = SolverConfig::default();
    c.bench_function("build_parallel", |b| {
        b.iter(|| StateSpace::build(black_box(&parallel)).ok())
    });
}

fn solve_benchmark(c: &mut Criterion) {
    let config = SolverConfig::sequential().with_verify(false);
    let unsolved = match StateSpace::build(&config) {
        Ok(space) => space,
        Err(e) => panic!("build failed: {}", e),
    };

    c.bench_function("backward_solve", |b| {
        b.iter(|| {
            let mut space = unsolved.clone();
            let mut solver = BackwardSolver::new(config.clone());
            solver.solve(&mut space).map(|stats| stats.resolved).ok()
        })
    });
}

criterion_group!(benches, decode_all_benchmark, build_benchmark, solve_benchmark);
criterion_main!(benches);
