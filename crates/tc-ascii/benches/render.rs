use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tc_ascii::render::{render, render_into};
use tc_core::charset::WidenFactor;
use tc_core::frame::GrayscaleGrid;

fn gradient(rows: usize, cols: usize) -> GrayscaleGrid {
    let data = (0..rows * cols).map(|i| (i % 256) as u8).collect();
    GrayscaleGrid::from_raw(rows, cols, data).unwrap_or_else(|_| GrayscaleGrid::new(rows, cols))
}

fn bench_render(c: &mut Criterion) {
    let widen = WidenFactor::DEFAULT;
    for (rows, cols) in [(30, 40), (120, 160)] {
        let grid = gradient(rows, cols);
        c.bench_function(&format!("render_{rows}x{cols}"), |b| {
            b.iter(|| render(black_box(&grid), widen));
        });
        let mut out = String::new();
        c.bench_function(&format!("render_into_{rows}x{cols}"), |b| {
            b.iter(|| render_into(black_box(&grid), widen, &mut out));
        });
    }
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
