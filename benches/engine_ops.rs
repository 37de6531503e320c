use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use slide_2048::engine::{apply_move, is_terminal, spawn_tile, Direction, Grid, MoveOutcome};
use std::hint::black_box;

fn corpus() -> Vec<Grid> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut grids = Vec::new();
    // Empty and two-tile starts
    grids.push(Grid::EMPTY);
    let mut g = Grid::new();
    spawn_tile(&mut g, &mut rng).unwrap();
    spawn_tile(&mut g, &mut rng).unwrap();
    grids.push(g);
    // Derive a variety of densities deterministically
    let seq = [Direction::Left, Direction::Up, Direction::Right, Direction::Down];
    let mut score = 0;
    for i in 0..40 {
        if let MoveOutcome::Moved { grid, score: s, .. } = apply_move(&g, score, seq[i % seq.len()]) {
            g = grid;
            score = s;
            if spawn_tile(&mut g, &mut rng).is_err() {
                break;
            }
        }
        grids.push(g);
    }
    grids
}

fn bench_moves(c: &mut Criterion) {
    for dir in Direction::ALL {
        c.bench_function(&format!("move/{dir:?}").to_lowercase(), |bch| {
            let grids = corpus();
            bch.iter(|| {
                let mut moved = 0u32;
                for g in &grids {
                    if apply_move(g, 0, dir).is_moved() { moved += 1; }
                }
                black_box(moved)
            })
        });
    }
}

fn bench_spawn(c: &mut Criterion) {
    c.bench_function("grid/spawn_fill", |bch| {
        bch.iter_batched(
            || (Grid::new(), StdRng::seed_from_u64(7)),
            |(mut g, mut rng)| {
                for _ in 0..16 { let _ = spawn_tile(&mut g, &mut rng); }
                black_box(g)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_terminal(c: &mut Criterion) {
    c.bench_function("query/is_terminal", |bch| {
        let grids = corpus();
        bch.iter(|| {
            let mut over = 0u32;
            for g in &grids {
                if is_terminal(g) { over += 1; }
            }
            black_box(over)
        })
    });
}

criterion_group!(engine_ops, bench_moves, bench_spawn, bench_terminal);
criterion_main!(engine_ops);
