use criterion::{Criterion, black_box, criterion_group, criterion_main};
use glam::{Vec2, Vec3};
use nebula_noise::*;

fn bench_mix(c: &mut Criterion) {
    for kind in NoiseType::ALL {
        c.bench_function(&format!("mix_u64_{kind}"), |bencher| {
            bencher.iter(|| black_box(mix(black_box(5_u64), black_box(42_u64), kind)))
        });
        c.bench_function(&format!("mix_u32_{kind}"), |bencher| {
            bencher.iter(|| black_box(mix(black_box(5_u32), black_box(42_u32), kind)))
        });
    }
}

fn bench_gradient_noise(c: &mut Criterion) {
    let hasher = NoiseHasher::<u64>::from_seed(42);
    let p2 = black_box(Vec2::new(12.34, -56.78));
    let p3 = black_box(Vec3::new(12.34, -56.78, 9.01));
    c.bench_function("perlin_2d", |bencher| bencher.iter(|| black_box(perlin_2d(p2, hasher))));
    c.bench_function("perlin_3d", |bencher| bencher.iter(|| black_box(perlin_3d(p3, hasher))));
    c.bench_function("perlin_3d_with_gradient", |bencher| {
        bencher.iter(|| black_box(perlin_3d_with_gradient(p3, hasher)))
    });
    c.bench_function("simplex_2d", |bencher| bencher.iter(|| black_box(simplex_2d(p2, hasher))));
    c.bench_function("simplex_3d", |bencher| bencher.iter(|| black_box(simplex_3d(p3, hasher))));
}

fn bench_cellular(c: &mut Criterion) {
    let hasher = NoiseHasher::<u64>::from_seed(42);
    let params = CellularParams::wormy();
    let p2 = black_box(Vec2::new(12.34, -56.78));
    let p3 = black_box(Vec3::new(12.34, -56.78, 9.01));
    c.bench_function("cellular_2d", |bencher| {
        bencher.iter(|| black_box(cellular_2d(p2, hasher, params.frequency, params.jitter, params.metric)))
    });
    c.bench_function("cellular_3d", |bencher| {
        bencher.iter(|| black_box(cellular_3d(p3, hasher, params.frequency, params.jitter, params.metric)))
    });
}

fn bench_fractal(c: &mut Criterion) {
    let hasher = NoiseHasher::<u64>::from_seed(42);
    let params = FractalParams::default();
    let p3 = black_box(Vec3::new(12.34, -56.78, 9.01));
    c.bench_function("fbm_3d_5_octaves", |bencher| bencher.iter(|| black_box(fbm_3d(p3, hasher, &params))));
    c.bench_function("ridge_3d_5_octaves", |bencher| {
        bencher.iter(|| black_box(ridge_3d(p3, hasher, &params)))
    });
    let uber = UberParams::default();
    c.bench_function("uber_2d", |bencher| {
        bencher.iter(|| black_box(uber_2d(p3.truncate(), hasher, &uber)))
    });
}

fn bench_rng(c: &mut Criterion) {
    let mut rng = NoiseRng::<u64>::new(42);
    c.bench_function("noise_rng_value", |bencher| bencher.iter(|| black_box(rng.value())));
    c.bench_function("noise_rng_rotation", |bencher| bencher.iter(|| black_box(rng.rotation())));
    let mut bytes = [0_u8; 256];
    c.bench_function("noise_rng_fill_256_bytes", |bencher| {
        bencher.iter(|| rng.fill_bytes(black_box(&mut bytes)))
    });
}

criterion_group!(
    benches,
    bench_mix,
    bench_gradient_noise,
    bench_cellular,
    bench_fractal,
    bench_rng,
);
criterion_main!(benches);
