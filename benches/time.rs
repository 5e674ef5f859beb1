//! Criterion benchmarks measure time of the clearly separated pieces of code.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tabiya::chess::board::Board;
use tabiya::chess::game::Game;

/// Middlegame and endgame placements with White to move.
const POSITIONS: [&str; 4] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
    "r2qkb1r/1pp1pp1p/p1np1np1/1B6/3PP1b1/2N1BN2/PPP2PPP/R2QK2R",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8",
];

fn games() -> Vec<Game> {
    POSITIONS
        .iter()
        .map(|diagram| Game::with_board(Board::from_diagram(diagram).unwrap()))
        .collect()
}

fn legal_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("Legal moves");
    for (index, game) in games().iter().enumerate() {
        let _ = group.bench_with_input(BenchmarkId::new("position", index), game, |b, game| {
            b.iter(|| black_box(game.legal_moves(game.turn())));
        });
    }
    group.finish();
}

fn state(c: &mut Criterion) {
    let mut group = c.benchmark_group("Game state");
    for (index, game) in games().iter().enumerate() {
        let _ = group.bench_with_input(BenchmarkId::new("position", index), game, |b, game| {
            b.iter(|| black_box(game.state()));
        });
    }
    group.finish();
}

fn next_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("Move selection");
    let mut rng = StdRng::seed_from_u64(0);
    for (index, game) in games().iter().enumerate() {
        let _ = group.bench_with_input(BenchmarkId::new("position", index), game, |b, game| {
            b.iter(|| black_box(game.next_move(game.turn(), &mut rng)));
        });
    }
    group.finish();
}

criterion_group! {
    name = rules;
    config = Criterion::default().sample_size(20);
    targets = legal_moves, state
}

criterion_group! {
    name = selector;
    config = Criterion::default().sample_size(10);
    targets = next_move
}

criterion_main!(rules, selector);
