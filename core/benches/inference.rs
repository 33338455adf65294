use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use neonsweeper_core::*;

/// Board after a seeded opening click, the usual input of a recompute.
fn opened_board(size: Coord, mines: CellCount, seed: u64) -> Board {
    let config = GameConfig::new(size, mines).unwrap();
    let mut board = Board::new(config).unwrap();
    let mut generator = ShuffleGenerator::from_seed(seed);
    board.reveal((size / 2, size / 2), &mut generator).unwrap();
    board
}

fn inference_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("inference");
    for (size, mines) in [(10, 15), (16, 40), (30, 150)] {
        let obs = Observation::from_board(&opened_board(size, mines, 7));
        group.bench_function(format!("infer_{size}x{size}_{mines}"), |b| {
            b.iter(|| infer(black_box(&obs)))
        });
    }
    group.finish();
}

criterion_group!(benches, inference_bench);
criterion_main!(benches);
