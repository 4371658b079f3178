use std::path::{Path, PathBuf};

use image::DynamicImage;
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

use crate::braiding;
use crate::errors::*;
use crate::generators;
use crate::grid::MazeGrid;
use crate::placement::{self, EntryExit};
use crate::renderers::{self, DistanceTile, TileInfo};
use crate::settings::{Algorithm, ImageStyle, MazeOptions, OutputMode};
use crate::units::PixelSize;
use crate::utils;

const MAX_FILE_STEM_LEN: usize = 120;

/// A finished maze: the carved grid, its entry and exit and the seed that reproduces it.
#[derive(Debug, Clone)]
pub struct Maze {
    grid: MazeGrid,
    entry_exit: EntryExit,
    name: String,
    seed: Option<u64>,
}

/// The output of `generate_maze`, one variant per `OutputMode`.
#[derive(Debug, Clone)]
pub enum Rendering {
    List(Vec<Vec<char>>),
    Distances(Vec<Vec<DistanceTile>>),
    Detailed(Vec<Vec<TileInfo>>),
    Image(DynamicImage),
}

/// Build a maze and render it in one call.
///
/// All options are validated before the grid is allocated, so a configuration error never
/// costs a carve.
pub fn generate_maze(options: &MazeOptions, output: &OutputMode) -> Result<Rendering> {
    options.validate()?;
    if let OutputMode::Image(ref style) = *output {
        let _ = renderers::checked_image_dimensions(options.width,
                                                    options.height,
                                                    style.pixel_size)?;
    }

    let maze = Maze::build(options)?;
    Ok(match *output {
        OutputMode::List => Rendering::List(maze.text_rows()),
        OutputMode::Distances => Rendering::Distances(maze.distance_rows()),
        OutputMode::Detailed => Rendering::Detailed(maze.detailed_rows()),
        OutputMode::Image(ref style) => Rendering::Image(maze.image(style)?),
    })
}

impl Maze {
    /// Build a maze with a generator seeded from `options.seed`, or a fresh random seed.
    pub fn build(options: &MazeOptions) -> Result<Maze> {
        options.validate()?;
        let seed = options.seed.unwrap_or_else(|| rand::thread_rng().gen());
        debug!("maze '{}' uses seed {}", options.name, seed);
        let mut rng = XorShiftRng::seed_from_u64(seed);
        let mut maze = Maze::build_with_rng(options, &mut rng)?;
        maze.seed = Some(seed);
        Ok(maze)
    }

    /// Build a maze drawing every random decision from `rng`. The recorded seed is
    /// `options.seed`, which only reproduces the maze if `rng` was seeded from it.
    pub fn build_with_rng<R: Rng + ?Sized>(options: &MazeOptions, rng: &mut R) -> Result<Maze> {
        options.validate()?;
        let mut grid = MazeGrid::new(options.width, options.height)?;

        match options.algorithm {
            Algorithm::Simple(_) => generators::simple(&mut grid, rng)?,
            Algorithm::GrowingTree(ref config) => generators::growing_tree(&mut grid, config, rng)?,
            Algorithm::Braided(ref config, ref braid_config) => {
                generators::growing_tree(&mut grid, config, rng)?;
                let _ = braiding::braid(&mut grid, braid_config, rng);
            }
        }

        let entry_exit = placement::place_entry_exit(&grid, &options.placement, rng)?;
        info!("maze '{}': {}x{} {} with {} passages, entry {} exit {} ({} steps)",
              options.name,
              options.width.0,
              options.height.0,
              options.algorithm.kind(),
              grid.passages_count(),
              entry_exit.entry,
              entry_exit.exit,
              entry_exit.distance);

        Ok(Maze {
            grid,
            entry_exit,
            name: options.name.clone(),
            seed: options.seed,
        })
    }

    #[inline]
    pub fn grid(&self) -> &MazeGrid {
        &self.grid
    }

    #[inline]
    pub fn entry_exit(&self) -> &EntryExit {
        &self.entry_exit
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Always set for mazes from `build`. None for `build_with_rng` without a seed option.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn text_rows(&self) -> Vec<Vec<char>> {
        renderers::text_rows(&self.grid, Some(&self.entry_exit))
    }

    pub fn distance_rows(&self) -> Vec<Vec<DistanceTile>> {
        renderers::distance_rows(&self.grid, &self.entry_exit)
    }

    pub fn detailed_rows(&self) -> Vec<Vec<TileInfo>> {
        renderers::detailed_rows(&self.grid, &self.entry_exit)
    }

    pub fn image(&self, style: &ImageStyle) -> Result<DynamicImage> {
        renderers::to_image(&self.grid, Some(&self.entry_exit), style)
    }

    /// `<name>-<pixel width>_<pixel height>.png`, the name reduced to `[A-Za-z0-9_]` and at
    /// most 120 characters.
    pub fn image_file_name(&self, pixel_size: PixelSize) -> String {
        let pixels = u64::from(pixel_size.0);
        let width = pixels * (2 * self.grid.width().0 as u64 + 1);
        let height = pixels * (2 * self.grid.height().0 as u64 + 1);
        format!("{}-{}_{}.png",
                utils::sanitise_file_stem(&self.name, MAX_FILE_STEM_LEN),
                width,
                height)
    }

    /// Render and write a PNG, to `path` or to `image_file_name` in the working directory.
    pub fn save_image(&self, style: &ImageStyle, path: Option<&Path>) -> Result<PathBuf> {
        let path = path.map_or_else(|| PathBuf::from(self.image_file_name(style.pixel_size)),
                                    Path::to_path_buf);
        let image = self.image(style)?;
        image.save(&path)
            .chain_err(|| format!("failed to save maze image to {}", path.display()))?;
        debug!("saved maze image {}", path.display());
        Ok(path)
    }
}
