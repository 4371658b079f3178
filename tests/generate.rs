use mazeforge::{
    braiding,
    errors::{Error, ErrorKind},
    maze::{generate_maze, Maze, Rendering},
    pathing::Distances,
    renderers::{DistanceTile, ENTRY, EXIT, FLOOR, WALL},
    settings::{AlgorithmSettings, ImageMode, ImageSettings, MazeOptions, OutputMode,
               PlacementConfig, WallSide},
};

fn options(w: usize, h: usize, algorithm: &str, settings: AlgorithmSettings) -> MazeOptions {
    MazeOptions::from_settings(w, h, "TestMaze", algorithm, &settings)
        .unwrap()
        .with_seed(2024)
}

fn list(rendering: Rendering) -> Vec<Vec<char>> {
    match rendering {
        Rendering::List(rows) => rows,
        other => panic!("expected a list rendering, got {:?}", other),
    }
}

fn count(rows: &[Vec<char>], wanted: char) -> usize {
    rows.iter().flat_map(|row| row.iter()).filter(|&&c| c == wanted).count()
}

#[test]
fn simple_five_by_five() {
    let opts = options(5, 5, "simple", AlgorithmSettings::default());
    let maze = Maze::build(&opts).unwrap();
    assert_eq!(maze.grid().passages_count(), 24);

    let rows = list(generate_maze(&opts, &OutputMode::List).unwrap());
    assert_eq!(rows.len(), 11);
    assert!(rows.iter().all(|row| row.len() == 11));
    assert_eq!(count(&rows, ENTRY), 1);
    assert_eq!(count(&rows, EXIT), 1);
    // 25 cells plus 24 passages
    assert_eq!(count(&rows, FLOOR), 49);
    assert!(rows.iter().flat_map(|row| row.iter()).all(|&c| [WALL, FLOOR, ENTRY, EXIT].contains(&c)));

    // entry and exit only ever sit in the outer ring
    for (r, row) in rows.iter().enumerate() {
        for (c, &tile) in row.iter().enumerate() {
            if tile == ENTRY || tile == EXIT {
                assert!(r == 0 || r == 10 || c == 0 || c == 10);
            }
        }
    }
}

#[test]
fn same_seed_same_output() {
    let settings = AlgorithmSettings { weight_braid: 25, ..AlgorithmSettings::default() };
    let opts = options(15, 9, "braided", settings);
    let a = list(generate_maze(&opts, &OutputMode::List).unwrap());
    let b = list(generate_maze(&opts, &OutputMode::List).unwrap());
    assert_eq!(a, b);

    let other_seed = opts.clone().with_seed(2025);
    let c = list(generate_maze(&other_seed, &OutputMode::List).unwrap());
    assert_ne!(a, c);
}

#[test]
fn braided_without_dead_ends() {
    let settings = AlgorithmSettings { weight_braid: -1, ..AlgorithmSettings::default() };
    for seed in 0..10 {
        let opts = options(12, 12, "braided", settings).with_seed(seed);
        let maze = Maze::build(&opts).unwrap();
        assert!(braiding::dead_ends(maze.grid()).is_empty());
    }
}

#[test]
fn entry_exit_distance_threshold() {
    for seed in 0..10 {
        let opts = options(20, 10, "growing_tree", AlgorithmSettings::default()).with_seed(seed);
        let maze = Maze::build(&opts).unwrap();
        let placed = maze.entry_exit();
        assert_ne!(placed.entry, placed.exit);
        assert!(f64::from(placed.distance) >= 0.30 * 20.0);

        let distances = Distances::<u32>::new(maze.grid(), placed.entry).unwrap();
        assert_eq!(distances.reachable_count(), 200);
    }
}

#[test]
fn entry_and_exit_walls() {
    let placement = PlacementConfig::new(WallSide::West, WallSide::East, 0.30, 50).unwrap();
    let opts = options(9, 7, "growing_tree", AlgorithmSettings::default()).with_placement(placement);
    let rows = list(generate_maze(&opts, &OutputMode::List).unwrap());
    assert!(rows.iter().any(|row| row[0] == ENTRY));
    assert!(rows.iter().any(|row| row[18] == EXIT));
}

#[test]
fn distances_mode() {
    let opts = options(6, 6, "growing_tree", AlgorithmSettings::default());
    let rows = match generate_maze(&opts, &OutputMode::Distances).unwrap() {
        Rendering::Distances(rows) => rows,
        other => panic!("expected a distances rendering, got {:?}", other),
    };
    let tiles = rows.iter().flat_map(|row| row.iter()).collect::<Vec<_>>();
    // the entry opening is the only tile at step 0
    assert_eq!(tiles.iter().filter(|&&&t| t == DistanceTile::Steps(0)).count(), 1);
    assert_eq!(tiles.iter().filter(|&&&t| t == DistanceTile::Exit).count(), 1);
    assert!(!tiles.contains(&&DistanceTile::Unreachable));
    assert!(tiles.contains(&&DistanceTile::Steps(1)));
}

#[test]
fn bilevel_image_mode() {
    let image_settings = ImageSettings {
        mode: ImageMode::Bilevel,
        wall_color: mazeforge::settings::ColourSpec::Level(0),
        floor_color: mazeforge::settings::ColourSpec::Level(1),
        pixel_size: 4,
    };
    let output = OutputMode::from_settings("image", &image_settings).unwrap();
    let opts = options(4, 3, "simple", AlgorithmSettings::default());
    match generate_maze(&opts, &output).unwrap() {
        Rendering::Image(image::DynamicImage::ImageLuma8(buffer)) => {
            assert_eq!(buffer.dimensions(), (36, 28));
        }
        other => panic!("expected a luma image, got {:?}", other),
    }
}

#[test]
fn invalid_settings_fail_fast() {
    let is_kind = |result: mazeforge::Result<MazeOptions>, expected: &str| match result {
        Err(Error(ErrorKind::InvalidDimension(..), _)) => expected == "dimension",
        Err(Error(ErrorKind::InvalidAlgorithmSetting(_), _)) => expected == "algorithm",
        _ => false,
    };
    let defaults = AlgorithmSettings::default();
    assert!(is_kind(MazeOptions::from_settings(0, 5, "m", "simple", &defaults), "dimension"));
    assert!(is_kind(MazeOptions::from_settings(5, 5, "m", "wilson", &defaults), "algorithm"));

    let too_high = AlgorithmSettings { weight_high: 150, ..defaults };
    assert!(is_kind(MazeOptions::from_settings(5, 5, "m", "growing_tree", &too_high), "algorithm"));
    let both_zero = AlgorithmSettings { weight_high: 0, weight_low: 0, ..defaults };
    assert!(is_kind(MazeOptions::from_settings(5, 5, "m", "growing_tree", &both_zero), "algorithm"));
    let bad_braid = AlgorithmSettings { weight_braid: -5, ..defaults };
    assert!(is_kind(MazeOptions::from_settings(5, 5, "m", "braided", &bad_braid), "algorithm"));

    match OutputMode::from_settings("json", &ImageSettings::default()) {
        Err(Error(ErrorKind::InvalidRenderSetting(_), _)) => {}
        other => panic!("expected a render setting error, got {:?}", other),
    }
}

#[test]
fn dict_mode_matches_list_and_distances() {
    let settings = AlgorithmSettings { weight_braid: 30, ..AlgorithmSettings::default() };
    let opts = options(7, 5, "braided", settings);
    let output = OutputMode::from_settings("dict", &ImageSettings::default()).unwrap();
    let detailed = match generate_maze(&opts, &output).unwrap() {
        Rendering::Detailed(rows) => rows,
        other => panic!("expected a detailed rendering, got {:?}", other),
    };
    let text = list(generate_maze(&opts, &OutputMode::List).unwrap());
    let distances = match generate_maze(&opts, &OutputMode::Distances).unwrap() {
        Rendering::Distances(rows) => rows,
        other => panic!("expected a distances rendering, got {:?}", other),
    };

    for (r, row) in detailed.iter().enumerate() {
        for (c, info) in row.iter().enumerate() {
            assert_eq!(info.tile, text[r][c]);
            match distances[r][c] {
                DistanceTile::Wall => assert!(info.is_wall() && info.distance.is_none()),
                DistanceTile::Steps(steps) => assert_eq!(info.distance, Some(steps)),
                DistanceTile::Exit => assert!(info.distance.is_some()),
                DistanceTile::Unreachable => panic!("braided mazes are connected"),
            }
        }
    }
}

#[test]
fn single_cell_maze_cannot_place_entry_and_exit() {
    let opts = options(1, 1, "simple", AlgorithmSettings::default());
    match generate_maze(&opts, &OutputMode::List) {
        Err(Error(ErrorKind::UnreachableConfiguration(_), _)) => {}
        other => panic!("expected an unreachable configuration error, got {:?}", other),
    }
}
