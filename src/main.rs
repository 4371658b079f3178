use std::{
    fs::File,
    io::{self, prelude::*},
    path::Path,
};

use docopt::Docopt;
use log::info;
use serde_derive::Deserialize;

use mazeforge::{
    maze::Maze,
    renderers,
    settings::{AlgorithmSettings, ColourSpec, ImageMode, ImageSettings, MazeOptions, OutputMode,
               PlacementConfig, WallSide, DEFAULT_PLACEMENT_ATTEMPTS},
};

mod logging;

const USAGE: &str = "Mazeforge

Generate perfect or braided mazes and print them as text or save them as PNG images.

Usage:
    mazeforge_driver -h | --help
    mazeforge_driver [options]

Options:
    -h --help                Show this screen.
    --width=<w>              Maze width in cells [default: 10].
    --height=<h>             Maze height in cells [default: 10].
    --name=<name>            Maze name, also used for the default image file name [default: GeneratedMaze].
    --algorithm=<alg>        simple, growing_tree or braided [default: growing_tree].
    --weight-high=<n>        Growing tree weight for picking the newest frontier cell, 0-100 [default: 99].
    --weight-low=<n>         Growing tree weight for picking a random frontier cell, 0-100 [default: 97].
    --weight-braid=<n>       Braiding: -1 removes all dead ends, 0-100 is the chance of opening each closed wall [default: -1].
    --start-wall=<side>      Border for the entry: N, S, E, W or Any [default: Any].
    --end-wall=<side>        Border for the exit: N, S, E, W or Any [default: Any].
    --min-distance=<ratio>   Minimum entry to exit distance as a fraction of the longest side [default: 0.3].
    --seed=<n>               Seed for a reproducible maze. Random when not given.
    --mode=<mode>            Output: list, distances, dict or image [default: list].
    --image-mode=<m>         Image colour mode: 1 (black and white) or RGB [default: RGB].
    --wall-color=<c>         Wall colour: a name, #rrggbb, r,g,b or 0/1 in mode 1 [default: Black].
    --floor-color=<c>        Floor colour: a name, #rrggbb, r,g,b or 0/1 in mode 1 [default: White].
    --pixel-size=<n>         Pixels per maze tile in images [default: 10].
    --out=<path>             Output file. Text goes to stdout and images to <name>-<w>_<h>.png when not given.
    --verbose                Log generation details to stderr. RUST_LOG overrides the level.
";

#[derive(Debug, Deserialize)]
struct DriverArgs {
    flag_width: usize,
    flag_height: usize,
    flag_name: String,
    flag_algorithm: String,
    flag_weight_high: i32,
    flag_weight_low: i32,
    flag_weight_braid: i32,
    flag_start_wall: String,
    flag_end_wall: String,
    flag_min_distance: f64,
    flag_seed: Option<u64>,
    flag_mode: String,
    flag_image_mode: String,
    flag_wall_color: String,
    flag_floor_color: String,
    flag_pixel_size: u32,
    flag_out: Option<String>,
    flag_verbose: bool,
}

mod errors {
    use error_chain::*;
    error_chain! {
        links {
            Maze(::mazeforge::errors::Error, ::mazeforge::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    let args: DriverArgs = match Docopt::new(USAGE).and_then(|d| d.deserialize()) {
        Ok(args) => args,
        Err(e) if e.fatal() => return Err(e.into()),
        // --help
        Err(e) => e.exit(),
    };

    logging::init(args.flag_verbose).map_err(|e| e.to_string())?;

    let options = maze_options(&args)?;
    let image_mode = args.flag_image_mode.parse::<ImageMode>()?;
    let image_settings = ImageSettings {
        mode: image_mode,
        wall_color: colour_spec(&args.flag_wall_color, image_mode),
        floor_color: colour_spec(&args.flag_floor_color, image_mode),
        pixel_size: args.flag_pixel_size,
    };
    let output = OutputMode::from_settings(&args.flag_mode, &image_settings)?;

    let maze = Maze::build(&options)?;
    if let Some(seed) = maze.seed() {
        info!("built maze '{}' with seed {}", maze.name(), seed);
    }

    match output {
        OutputMode::List => {
            write_text(&renderers::rows_to_string(&maze.text_rows()), args.flag_out.as_ref())?
        }
        OutputMode::Distances => {
            let text = renderers::distance_rows_to_string(&maze.distance_rows());
            write_text(&text, args.flag_out.as_ref())?
        }
        OutputMode::Detailed => {
            let text = renderers::detailed_rows_to_string(&maze.detailed_rows());
            write_text(&text, args.flag_out.as_ref())?
        }
        OutputMode::Image(style) => {
            let path = maze.save_image(&style, args.flag_out.as_ref().map(Path::new))?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

fn maze_options(args: &DriverArgs) -> Result<MazeOptions> {
    let settings = AlgorithmSettings {
        weight_high: args.flag_weight_high,
        weight_low: args.flag_weight_low,
        weight_braid: args.flag_weight_braid,
    };
    let placement = PlacementConfig::new(args.flag_start_wall.parse::<WallSide>()?,
                                         args.flag_end_wall.parse::<WallSide>()?,
                                         args.flag_min_distance,
                                         DEFAULT_PLACEMENT_ATTEMPTS)?;
    let options = MazeOptions::from_settings(args.flag_width,
                                             args.flag_height,
                                             &args.flag_name,
                                             &args.flag_algorithm,
                                             &settings)?
        .with_placement(placement);

    Ok(match args.flag_seed {
        Some(seed) => options.with_seed(seed),
        None => options,
    })
}

/// `0`/`1` are bilevel levels in mode 1, `r,g,b` is a channel triple, anything else a name.
fn colour_spec(text: &str, mode: ImageMode) -> ColourSpec {
    let trimmed = text.trim();
    if mode == ImageMode::Bilevel {
        if let Ok(level) = trimmed.parse::<i64>() {
            return ColourSpec::Level(level);
        }
    }

    let channels = trimmed.split(',')
        .map(|part| part.trim().parse::<i64>())
        .collect::<::std::result::Result<Vec<i64>, _>>();
    match channels {
        Ok(ref values) if values.len() == 3 => ColourSpec::Channels(values[0], values[1], values[2]),
        _ => ColourSpec::Name(trimmed.to_owned()),
    }
}

fn write_text(text: &str, out_path: Option<&String>) -> Result<()> {
    match out_path {
        Some(path) => {
            let mut f = File::create(path)
                .chain_err(|| format!("Failed to create maze text file {}", path))?;
            f.write_all(text.as_bytes())?;
            f.write_all(b"\n")?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", text)?;
        }
    }
    Ok(())
}
