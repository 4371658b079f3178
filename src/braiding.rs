//! Post processing of perfect mazes: dead end removal and loop introduction.

use log::debug;
use petgraph::graph::IndexType;
use rand::Rng;
use smallvec::SmallVec;

use crate::cells::{CompassPrimary, GridCoordinate};
use crate::grid::Grid;
use crate::settings::{BraidConfig, BraidMode};

/// Apply the braid configuration to a carved grid, returning how many walls were opened.
///
/// Walls are only ever opened, so a connected maze stays connected.
pub fn braid<GridIndexType, R>(grid: &mut Grid<GridIndexType>,
                               config: &BraidConfig,
                               rng: &mut R)
                               -> usize
    where GridIndexType: IndexType,
          R: Rng + ?Sized
{
    let opened = match config.mode() {
        BraidMode::Disabled => 0,
        BraidMode::RemoveDeadEnds => remove_dead_ends(grid, rng),
        BraidMode::Loops(percent) => introduce_loops(grid, percent, rng),
    };
    debug!("braiding ({:?}) opened {} walls", config.mode(), opened);
    opened
}

/// Give every dead end a second exit.
///
/// One row major pass. A dead end opens a wall to a neighbour it is not yet connected to,
/// preferring neighbours that are dead ends themselves and picking uniformly at random among
/// equally good candidates. Opening only ever raises the number of links of a cell, so no
/// cell becomes a dead end after the pass has moved on.
/// A dead end without any closed interior wall (a 1 cell wide strip's end) stays as it is.
pub fn remove_dead_ends<GridIndexType, R>(grid: &mut Grid<GridIndexType>, rng: &mut R) -> usize
    where GridIndexType: IndexType,
          R: Rng + ?Sized
{
    let mut opened = 0;
    for cell in grid.iter() {
        if !is_dead_end(grid, cell) {
            continue;
        }

        let closed = grid.neighbours(cell)
            .iter()
            .map(|&(_, neighbour)| neighbour)
            .filter(|&neighbour| !grid.is_open(cell, neighbour))
            .collect::<SmallVec<[GridCoordinate; 4]>>();
        let dead_end_neighbours = closed.iter()
            .cloned()
            .filter(|&neighbour| is_dead_end(grid, neighbour))
            .collect::<SmallVec<[GridCoordinate; 4]>>();

        let candidates = if dead_end_neighbours.is_empty() {
            closed
        } else {
            dead_end_neighbours
        };
        if candidates.is_empty() {
            continue;
        }

        let chosen = candidates[rng.gen_range(0..candidates.len())];
        grid.open(cell, chosen);
        opened += 1;
    }
    opened
}

/// Open each closed interior wall with a `percent` chance.
///
/// Visits the east and south wall of every cell in row major order, so every interior wall is
/// considered exactly once. A percentage of 0 draws nothing from `rng`.
pub fn introduce_loops<GridIndexType, R>(grid: &mut Grid<GridIndexType>,
                                         percent: u8,
                                         rng: &mut R)
                                         -> usize
    where GridIndexType: IndexType,
          R: Rng + ?Sized
{
    if percent == 0 {
        return 0;
    }

    let mut opened = 0;
    for cell in grid.iter() {
        for &direction in &[CompassPrimary::East, CompassPrimary::South] {
            let neighbour = match grid.neighbour_at_direction(cell, direction) {
                Some(neighbour) => neighbour,
                None => continue,
            };
            if grid.is_open(cell, neighbour) {
                continue;
            }
            if rng.gen_range(0..100u8) < percent {
                grid.open(cell, neighbour);
                opened += 1;
            }
        }
    }
    opened
}

/// Cells with exactly one open passage.
pub fn dead_ends<GridIndexType: IndexType>(grid: &Grid<GridIndexType>) -> Vec<GridCoordinate> {
    grid.iter().filter(|&cell| is_dead_end(grid, cell)).collect()
}

#[inline]
fn is_dead_end<GridIndexType: IndexType>(grid: &Grid<GridIndexType>, cell: GridCoordinate) -> bool {
    grid.links_count(cell) == 1
}
