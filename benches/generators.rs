use criterion::{criterion_group, criterion_main, Criterion};
use mazeforge::{
    braiding, generators,
    grid::Grid,
    settings::{BraidConfig, GrowingTreeConfig},
    units::{Height, Width},
};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

fn bench_simple_maze_32_u16(c: &mut Criterion) {
    let mut rng = XorShiftRng::seed_from_u64(32);
    c.bench_function("simple_maze_32_u16", move |b| {
        b.iter(|| {
            let mut g = Grid::<u16>::new(Width(32), Height(32)).unwrap();
            generators::simple(&mut g, &mut rng).unwrap();
            g
        })
    });
}

fn bench_growing_tree_maze_32_u16(c: &mut Criterion) {
    let mut rng = XorShiftRng::seed_from_u64(32);
    let config = GrowingTreeConfig::default();
    c.bench_function("growing_tree_maze_32_u16", move |b| {
        b.iter(|| {
            let mut g = Grid::<u16>::new(Width(32), Height(32)).unwrap();
            generators::growing_tree(&mut g, &config, &mut rng).unwrap();
            g
        })
    });
}

fn bench_depth_first_maze_128_u32(c: &mut Criterion) {
    let mut rng = XorShiftRng::seed_from_u64(128);
    let config = GrowingTreeConfig::new(100, 0).unwrap();
    c.bench_function("depth_first_maze_128_u32", move |b| {
        b.iter(|| {
            let mut g = Grid::<u32>::new(Width(128), Height(128)).unwrap();
            generators::growing_tree(&mut g, &config, &mut rng).unwrap();
            g
        })
    });
}

fn bench_remove_dead_ends_32_u16(c: &mut Criterion) {
    let mut rng = XorShiftRng::seed_from_u64(7);
    let mut perfect = Grid::<u16>::new(Width(32), Height(32)).unwrap();
    generators::simple(&mut perfect, &mut rng).unwrap();
    let config = BraidConfig::new(-1).unwrap();
    c.bench_function("remove_dead_ends_32_u16", move |b| {
        b.iter(|| {
            let mut g = perfect.clone();
            braiding::braid(&mut g, &config, &mut rng)
        })
    });
}

criterion_group!(
    benches,
    bench_simple_maze_32_u16,
    bench_growing_tree_maze_32_u16,
    bench_depth_first_maze_128_u32,
    bench_remove_dead_ends_32_u16
);
criterion_main!(benches);
