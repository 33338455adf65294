use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use neonsweeper_core::*;

fn generation_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");
    for (size, mines) in [(10, 15), (30, 150), (64, 800)] {
        let config = GameConfig::new(size, mines).unwrap();
        let mut generator = ShuffleGenerator::from_seed(42);
        group.bench_function(format!("shuffle_{size}x{size}_{mines}"), |b| {
            b.iter(|| generator.generate(black_box(config), (size / 2, size / 2)))
        });
    }
    group.finish();
}

fn flood_fill_bench(c: &mut Criterion) {
    // A single mine in the corner: the opening click floods the whole board.
    let layout = MineLayout::from_mine_coords(64, &[(0, 0)]).unwrap();
    c.bench_function("flood_fill_64x64", |b| {
        b.iter(|| {
            let mut board = Board::from_layout(layout.clone());
            let mut generator = FixedLayoutGenerator::new(layout.clone());
            board.reveal(black_box((63, 63)), &mut generator).unwrap()
        })
    });
}

criterion_group!(benches, generation_bench, flood_fill_bench);
criterion_main!(benches);
