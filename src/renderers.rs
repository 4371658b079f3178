//! Text, distance and image renderings of a maze.
//!
//! All renderings share one lattice layout: a `(2 * height + 1) x (2 * width + 1)` block of
//! tiles where cell `(r, c)` sits at `(2r + 1, 2c + 1)`, the tiles between two cells are the
//! walls they share and the outermost ring is the maze boundary.

use std::collections::VecDeque;
use std::fmt;

use image::{DynamicImage, ImageBuffer, Luma, Rgb};
use petgraph::graph::IndexType;

use crate::cells::{CompassPrimary, GridCoordinate, WallState};
use crate::colours::{Rgb8, BLACK};
use crate::errors::*;
use crate::grid::Grid;
use crate::placement::EntryExit;
use crate::settings::{ImageMode, ImageStyle};
use crate::units::{Height, PixelSize, Width};

pub const WALL: char = '#';
pub const FLOOR: char = ' ';
pub const ENTRY: char = 'S';
pub const EXIT: char = 'E';

/// Lattice position as (row, column).
type LatticePosition = (usize, usize);

/// Lattice rows and columns for a grid.
#[inline]
fn lattice_dimensions<GridIndexType: IndexType>(grid: &Grid<GridIndexType>) -> (usize, usize) {
    (2 * grid.height().0 + 1, 2 * grid.width().0 + 1)
}

#[inline]
fn cell_position(coord: GridCoordinate) -> LatticePosition {
    (2 * coord.row as usize + 1, 2 * coord.column as usize + 1)
}

/// The boundary tile opened for an entry or exit on the `side` wall of `coord`.
pub fn opening_position(coord: GridCoordinate, side: CompassPrimary) -> LatticePosition {
    let (row, column) = cell_position(coord);
    match side {
        CompassPrimary::North => (row - 1, column),
        CompassPrimary::South => (row + 1, column),
        CompassPrimary::West => (row, column - 1),
        CompassPrimary::East => (row, column + 1),
    }
}

/// True for every lattice tile that can be walked on: cells and open passages.
fn floor_lattice<GridIndexType: IndexType>(grid: &Grid<GridIndexType>) -> Vec<Vec<bool>> {
    let (rows, columns) = lattice_dimensions(grid);
    let mut floor = vec![vec![false; columns]; rows];

    for coord in grid.iter() {
        let (row, column) = cell_position(coord);
        floor[row][column] = true;

        // Only look east and south, each passage is then visited once.
        if grid.is_neighbour_open(coord, CompassPrimary::East) {
            floor[row][column + 1] = true;
        }
        if grid.is_neighbour_open(coord, CompassPrimary::South) {
            floor[row + 1][column] = true;
        }
    }
    floor
}

/// The maze as rows of `#` (wall), ` ` (floor), `S` (entry) and `E` (exit) characters.
pub fn text_rows<GridIndexType: IndexType>(grid: &Grid<GridIndexType>,
                                           entry_exit: Option<&EntryExit>)
                                           -> Vec<Vec<char>> {
    let mut rows = floor_lattice(grid)
        .into_iter()
        .map(|row| row.into_iter().map(|floor| if floor { FLOOR } else { WALL }).collect())
        .collect::<Vec<Vec<char>>>();

    if let Some(placed) = entry_exit {
        let (entry_row, entry_column) = opening_position(placed.entry, placed.entry_side);
        rows[entry_row][entry_column] = ENTRY;
        let (exit_row, exit_column) = opening_position(placed.exit, placed.exit_side);
        rows[exit_row][exit_column] = EXIT;
    }
    rows
}

/// Join character rows into newline separated text.
pub fn rows_to_string(rows: &[Vec<char>]) -> String {
    rows.iter()
        .map(|row| row.iter().collect::<String>())
        .collect::<Vec<String>>()
        .join("\n")
}

/// One tile of the distance rendering.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DistanceTile {
    Wall,
    Exit,
    /// Walkable tile, so many lattice steps from the entry opening. The opening itself is 0.
    Steps(u32),
    /// Walkable tile with no route from the entry.
    Unreachable,
}

impl fmt::Display for DistanceTile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DistanceTile::Wall => write!(f, "{}", WALL),
            DistanceTile::Exit => write!(f, "{}", EXIT),
            DistanceTile::Steps(steps) => write!(f, "{}", steps),
            DistanceTile::Unreachable => write!(f, "?"),
        }
    }
}

/// One tile of the detailed rendering.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TileInfo {
    /// The text rendering character: `#`, ` `, `S` or `E`.
    pub tile: char,
    /// Lattice steps from the entry opening. None on walls and on floor the entry cannot reach.
    pub distance: Option<u32>,
    /// A wall flag is cleared when the adjacent tile in that direction can be walked on.
    pub walls: WallState,
}

impl TileInfo {
    #[inline]
    pub fn is_wall(&self) -> bool {
        self.tile == WALL
    }

    /// Floor, entry or exit that no route from the entry reaches.
    #[inline]
    pub fn is_unreachable(&self) -> bool {
        !self.is_wall() && self.distance.is_none()
    }
}

/// `<tile>|<steps or ->|<open directions>`, e.g. `S|0|N` or `#|-|SE`.
impl fmt::Display for TileInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let open = CompassPrimary::ALL
            .iter()
            .filter(|&&dir| !self.walls.has_wall(dir))
            .map(|&dir| match dir {
                CompassPrimary::North => 'N',
                CompassPrimary::South => 'S',
                CompassPrimary::East => 'E',
                CompassPrimary::West => 'W',
            })
            .collect::<String>();
        match self.distance {
            Some(steps) => write!(f, "{}|{}|{}", self.tile, steps, open),
            None => write!(f, "{}|-|{}", self.tile, open),
        }
    }
}

/// The lattice tile one step in `direction`, None past the lattice edge.
fn lattice_step(position: LatticePosition,
                direction: CompassPrimary,
                rows: usize,
                columns: usize)
                -> Option<LatticePosition> {
    let (row, column) = position;
    let next = match direction {
        CompassPrimary::North => (row.checked_sub(1)?, column),
        CompassPrimary::South => (row + 1, column),
        CompassPrimary::West => (row, column.checked_sub(1)?),
        CompassPrimary::East => (row, column + 1),
    };
    if next.0 < rows && next.1 < columns {
        Some(next)
    } else {
        None
    }
}

/// Breadth first step counts over the non wall tiles of a text rendering.
fn lattice_steps(tiles: &[Vec<char>], start: LatticePosition) -> Vec<Vec<Option<u32>>> {
    let rows = tiles.len();
    let columns = tiles.first().map_or(0, |row| row.len());
    let mut steps: Vec<Vec<Option<u32>>> = vec![vec![None; columns]; rows];
    let mut queue = VecDeque::new();
    steps[start.0][start.1] = Some(0);
    queue.push_back((start, 0));

    while let Some((position, distance)) = queue.pop_front() {
        for &direction in CompassPrimary::ALL.iter() {
            if let Some((r, c)) = lattice_step(position, direction, rows, columns) {
                if tiles[r][c] != WALL && steps[r][c].is_none() {
                    steps[r][c] = Some(distance + 1);
                    queue.push_back(((r, c), distance + 1));
                }
            }
        }
    }
    steps
}

/// The lattice with every floor tile replaced by its step count from the entry opening.
///
/// Steps are counted on the lattice, so moving from one cell to the next is two steps.
pub fn distance_rows<GridIndexType: IndexType>(grid: &Grid<GridIndexType>,
                                               entry_exit: &EntryExit)
                                               -> Vec<Vec<DistanceTile>> {
    let tiles = text_rows(grid, Some(entry_exit));
    let steps = lattice_steps(&tiles, opening_position(entry_exit.entry, entry_exit.entry_side));

    tiles.iter()
        .zip(steps)
        .map(|(row, row_steps)| {
            row.iter()
                .zip(row_steps)
                .map(|(&tile, tile_steps)| match tile {
                    WALL => DistanceTile::Wall,
                    EXIT => DistanceTile::Exit,
                    _ => tile_steps.map_or(DistanceTile::Unreachable, DistanceTile::Steps),
                })
                .collect()
        })
        .collect()
}

/// Every lattice tile with its character, step count and which neighbouring tiles are open.
pub fn detailed_rows<GridIndexType: IndexType>(grid: &Grid<GridIndexType>,
                                               entry_exit: &EntryExit)
                                               -> Vec<Vec<TileInfo>> {
    let tiles = text_rows(grid, Some(entry_exit));
    let steps = lattice_steps(&tiles, opening_position(entry_exit.entry, entry_exit.entry_side));
    let (rows, columns) = lattice_dimensions(grid);

    (0..rows)
        .map(|r| {
            (0..columns)
                .map(|c| {
                    let mut walls = WallState::all_walls();
                    for &direction in CompassPrimary::ALL.iter() {
                        let open = lattice_step((r, c), direction, rows, columns)
                            .map_or(false, |(nr, nc)| tiles[nr][nc] != WALL);
                        if open {
                            walls.clear(direction);
                        }
                    }
                    TileInfo {
                        tile: tiles[r][c],
                        distance: steps[r][c],
                        walls,
                    }
                })
                .collect()
        })
        .collect()
}

/// Distance rows as text, every tile right aligned to the widest one.
pub fn distance_rows_to_string(rows: &[Vec<DistanceTile>]) -> String {
    let width = rows.iter()
        .flat_map(|row| row.iter())
        .map(|tile| tile.to_string().len())
        .max()
        .unwrap_or(1);
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|tile| format!("{:>width$}", tile.to_string(), width = width))
                .collect::<Vec<String>>()
                .join(" ")
        })
        .collect::<Vec<String>>()
        .join("\n")
}

/// Detailed rows as text, one tile record per column separated by spaces.
pub fn detailed_rows_to_string(rows: &[Vec<TileInfo>]) -> String {
    rows.iter()
        .map(|row| row.iter().map(|info| info.to_string()).collect::<Vec<String>>().join(" "))
        .collect::<Vec<String>>()
        .join("\n")
}

/// Pixel width and height of the image rendering, None if it does not fit u32.
pub fn image_dimensions(width: Width, height: Height, pixel_size: PixelSize) -> Option<(u32, u32)> {
    let pixels = pixel_size.0 as usize;
    let lattice = |cells: usize| -> Option<usize> {
        cells.checked_mul(2)?.checked_add(1)?.checked_mul(pixels)
    };
    let pixel_width = lattice(width.0)?;
    let pixel_height = lattice(height.0)?;
    if pixel_width > u32::max_value() as usize || pixel_height > u32::max_value() as usize {
        None
    } else {
        Some((pixel_width as u32, pixel_height as u32))
    }
}

/// `image_dimensions`, failing with `InvalidRenderSetting` when the image would be too large.
pub fn checked_image_dimensions(width: Width,
                                height: Height,
                                pixel_size: PixelSize)
                                -> Result<(u32, u32)> {
    image_dimensions(width, height, pixel_size).ok_or_else(|| {
        ErrorKind::InvalidRenderSetting(format!("a {}x{} maze with pixel_size {} is too large \
                                                 for an image",
                                                width.0,
                                                height.0,
                                                pixel_size.0))
            .into()
    })
}

/// Rasterise the maze, each lattice tile a `pixel_size` square block.
///
/// Mode "1" gives an 8 bit luma image holding only black and white, "RGB" an 8 bit RGB image.
pub fn to_image<GridIndexType: IndexType>(grid: &Grid<GridIndexType>,
                                          entry_exit: Option<&EntryExit>,
                                          style: &ImageStyle)
                                          -> Result<DynamicImage> {
    let (width, height) = checked_image_dimensions(grid.width(), grid.height(), style.pixel_size)?;

    let mut floor = floor_lattice(grid);
    if let Some(placed) = entry_exit {
        for &(coord, side) in &[(placed.entry, placed.entry_side), (placed.exit, placed.exit_side)] {
            let (row, column) = opening_position(coord, side);
            floor[row][column] = true;
        }
    }

    let image = match style.mode {
        ImageMode::Bilevel => {
            let luma = |colour: Rgb8| Luma([if colour == BLACK { 0 } else { 0xff }]);
            let (wall, floor_pixel) = (luma(style.wall), luma(style.floor));
            let mut buffer = ImageBuffer::from_pixel(width, height, wall);
            paint_floor(&mut buffer, &floor, style.pixel_size, floor_pixel);
            DynamicImage::ImageLuma8(buffer)
        }
        ImageMode::Rgb => {
            let mut buffer = ImageBuffer::from_pixel(width, height, Rgb(style.wall));
            paint_floor(&mut buffer, &floor, style.pixel_size, Rgb(style.floor));
            DynamicImage::ImageRgb8(buffer)
        }
    };
    Ok(image)
}

fn paint_floor<P>(buffer: &mut ImageBuffer<P, Vec<u8>>,
                  floor: &[Vec<bool>],
                  pixel_size: PixelSize,
                  colour: P)
    where P: image::Pixel<Subpixel = u8>
{
    let block = pixel_size.0;
    for (row, tiles) in floor.iter().enumerate() {
        for (column, _) in tiles.iter().enumerate().filter(|&(_, &is_floor)| is_floor) {
            let (x0, y0) = (column as u32 * block, row as u32 * block);
            for y in y0..y0 + block {
                for x in x0..x0 + block {
                    buffer.put_pixel(x, y, colour);
                }
            }
        }
    }
}
