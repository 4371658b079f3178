use criterion::{criterion_group, criterion_main, Criterion};
use mazeforge::{
    maze::Maze,
    settings::{ImageSettings, MazeOptions},
    units::{Height, Width},
};

fn built_maze(size: usize) -> Maze {
    Maze::build(&MazeOptions::new(Width(size), Height(size)).with_seed(99)).unwrap()
}

fn bench_text_64(c: &mut Criterion) {
    let maze = built_maze(64);
    c.bench_function("text_64", move |b| b.iter(|| maze.text_rows()));
}

fn bench_distances_text_64(c: &mut Criterion) {
    let maze = built_maze(64);
    c.bench_function("distances_text_64", move |b| b.iter(|| maze.distance_rows()));
}

fn bench_rgb_image_64(c: &mut Criterion) {
    let maze = built_maze(64);
    let style = ImageSettings::default().validate().unwrap();
    c.bench_function("rgb_image_64", move |b| b.iter(|| maze.image(&style).unwrap()));
}

criterion_group!(benches, bench_text_64, bench_distances_text_64, bench_rgb_image_64);
criterion_main!(benches);
