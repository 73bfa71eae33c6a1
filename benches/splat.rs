//! Benchmarks for the pool and the splat pass.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};

use vbpe::prelude::*;

fn bench_pool_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_churn");

    for capacity in [20, 256, 4096] {
        group.bench_with_input(
            BenchmarkId::new("alloc_release", capacity),
            &capacity,
            |b, &capacity| {
                let mut pool = BeamPool::new(capacity);
                b.iter(|| {
                    while let Some(idx) = pool.allocate() {
                        black_box(idx);
                    }
                    for idx in 0..pool.capacity() {
                        pool.release(idx);
                    }
                })
            },
        );
    }

    group.finish();
}

fn bench_splat(c: &mut Criterion) {
    let mut group = c.benchmark_group("splat");
    let field = VoxelField::new(GridConfig::new(21, 21, 21));
    let splat = SplatConfig::new(0.5);
    let mut frame = FrameSplat::new(field.config().total_cells());
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);

    for beams in [1, 20, 100] {
        let inputs: Vec<(Vec3, Vec3)> = (0..beams)
            .map(|_| {
                (
                    Vec3::new(
                        rng.gen_range(-10.0..10.0),
                        rng.gen_range(-10.0..10.0),
                        rng.gen_range(-10.0..10.0),
                    ),
                    Vec3::new(
                        rng.gen_range(0.5..1.5),
                        rng.gen_range(0.5..1.5),
                        rng.gen_range(2.0..5.0),
                    ),
                )
            })
            .collect();
        group.bench_with_input(BenchmarkId::new("beams", beams), &inputs, |b, inputs| {
            b.iter(|| {
                frame.begin_frame();
                for &(pos, scale) in inputs {
                    field.splat(pos, scale, Rgba::WHITE, &splat, &mut frame);
                }
                black_box(frame.touched_count())
            })
        });
    }

    group.finish();
}

fn bench_full_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_step");

    group.bench_function("step_60hz", |b| {
        let mut sim = Simulation::new()
            .with_capacity(20)
            .with_seed(12345)
            .with_splat(SplatConfig::new(0.5));
        // Warm the pool so the bench measures a busy frame.
        while sim.spawn().is_some() {}
        b.iter(|| black_box(sim.step(1.0 / 60.0).len()))
    });

    group.finish();
}

criterion_group!(benches, bench_pool_churn, bench_splat, bench_full_step);
criterion_main!(benches);
