use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use trapmap::{generators, PointLocator};

fn build_grid(c: &mut Criterion) {
    let (bbox, segments) = generators::slanted_grid(30);

    c.bench_function("build slanted grid", |b| {
        b.iter(|| {
            let mut rng = ChaCha8Rng::seed_from_u64(0);
            black_box(PointLocator::build(bbox, segments.clone(), &mut rng).unwrap())
        })
    });
}

fn build_diamonds(c: &mut Criterion) {
    let (bbox, segments) = generators::diamonds(20);

    c.bench_function("build diamonds", |b| {
        b.iter(|| {
            let mut rng = ChaCha8Rng::seed_from_u64(0);
            black_box(PointLocator::build(bbox, segments.clone(), &mut rng).unwrap())
        })
    });
}

fn build_comb(c: &mut Criterion) {
    let (bbox, segments) = generators::comb(500);

    c.bench_function("build comb", |b| {
        b.iter(|| {
            let mut rng = ChaCha8Rng::seed_from_u64(0);
            black_box(PointLocator::build(bbox, segments.clone(), &mut rng).unwrap())
        })
    });

    // Inserting the spine last is the worst case for merging.
    c.bench_function("build comb, spine last", |b| {
        b.iter(|| {
            let mut locator = PointLocator::new(bbox).unwrap();
            for seg in segments.iter().skip(1).chain(segments.first()) {
                locator.insert(*seg).unwrap();
            }
            black_box(locator)
        })
    });
}

fn locate(c: &mut Criterion) {
    let (bbox, segments) = generators::diamonds(20);
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let locator = PointLocator::build(bbox, segments, &mut rng).unwrap();
    let queries: Vec<_> = locator
        .map()
        .live_trapezoids()
        .map(|(_, t)| t.interior_point())
        .collect();

    c.bench_function("locate diamonds", |b| {
        b.iter(|| {
            for q in &queries {
                black_box(locator.locate(*q));
            }
        })
    });
}

criterion_group!(benches, build_grid, build_diamonds, build_comb, locate);
criterion_main!(benches);
