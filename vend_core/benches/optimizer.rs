use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use vend_core::dashboard::Analysis;
use vend_core::optimizer::{OptimizerParams, infer, optimize_with};
use vend_core::TelemetrySample;

// Readings on a grid covering every membership region.
fn grid(n: usize) -> Vec<(f64, f64)> {
    let mut v = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            let vib = 40.0 * i as f64 / n as f64;
            let rpm = 100.0 * j as f64 / n as f64;
            v.push((vib, rpm));
        }
    }
    v
}

pub fn bench_optimizer(c: &mut Criterion) {
    let mut g = c.benchmark_group("optimizer");
    // Allow quick tweaking without CLI flags (Criterion 0.5):
    //   BENCH_SAMPLE_SIZE=10 cargo bench -p vend_core --bench optimizer
    if let Some(n) = std::env::var("BENCH_SAMPLE_SIZE")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
    {
        g.sample_size(n.max(10));
    }

    let params = OptimizerParams::default();
    let readings = grid(32);

    g.bench_function("optimize_grid_32x32", |b| {
        b.iter(|| {
            let mut acc = 0i64;
            for &(vib, rpm) in &readings {
                acc += optimize_with(&params, black_box(vib), black_box(rpm), None).optimal_rpm;
            }
            black_box(acc)
        })
    });

    g.bench_function("infer_single", |b| {
        b.iter(|| infer(&params, black_box(12.5), black_box(40.0)))
    });

    g.bench_function("activation_analysis", |b| {
        b.iter_batched(
            || TelemetrySample::new(45.0, 7.0),
            |s| Analysis::optimized(&params, s),
            BatchSize::SmallInput,
        )
    });

    g.finish();
}

criterion_group!(benches, bench_optimizer);
criterion_main!(benches);
