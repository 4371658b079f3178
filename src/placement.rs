use error_chain::bail;
use log::{debug, warn};
use petgraph::graph::IndexType;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::cells::{CompassPrimary, GridCoordinate};
use crate::errors::*;
use crate::grid::Grid;
use crate::pathing::Distances;
use crate::settings::{PlacementConfig, WallSide};

/// Where the maze is entered and left. Both cells sit on the outer border and the sides
/// name which outer wall gets the opening.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct EntryExit {
    pub entry: GridCoordinate,
    pub exit: GridCoordinate,
    pub entry_side: CompassPrimary,
    pub exit_side: CompassPrimary,
    /// Steps between entry and exit through open passages.
    pub distance: u32,
}

/// Pick an entry and an exit on the requested border sides, far apart in the maze.
///
/// Entry candidates are shuffled with `rng` and tried one at a time, up to the configured
/// number of attempts. For each, the exit is the reachable exit candidate furthest away
/// (first in row major order on ties). The first pair at least
/// `min_distance_ratio * max(width, height)` steps apart wins. If none is, the furthest pair
/// seen is used instead. Fails only when no two distinct connected candidate cells exist.
pub fn place_entry_exit<GridIndexType, R>(grid: &Grid<GridIndexType>,
                                          config: &PlacementConfig,
                                          rng: &mut R)
                                          -> Result<EntryExit>
    where GridIndexType: IndexType,
          R: Rng + ?Sized
{
    let mut entry_candidates = border_cells(grid, config.start_wall());
    let exit_candidates = border_cells(grid, config.end_wall());
    entry_candidates.shuffle(rng);

    let longest_side = grid.width().0.max(grid.height().0);
    let threshold = config.min_distance_ratio() * longest_side as f64;

    let mut best: Option<(GridCoordinate, GridCoordinate, u32)> = None;
    for &entry in entry_candidates.iter().take(config.max_attempts()) {
        let distances = Distances::<u32>::new(grid, entry)
            .ok_or_else(|| ErrorKind::UnreachableConfiguration(
                format!("entry candidate {} is outside the grid", entry)))?;

        let furthest_exit = furthest_candidate(&distances, &exit_candidates, entry);
        if let Some((exit, distance)) = furthest_exit {
            if f64::from(distance) >= threshold {
                let placed = entry_exit(grid, config, entry, exit, distance);
                debug!("placed entry {} and exit {} {} steps apart", entry, exit, distance);
                return Ok(placed);
            }
            if best.map_or(true, |(_, _, best_distance)| distance > best_distance) {
                best = Some((entry, exit, distance));
            }
        }
    }

    match best {
        Some((entry, exit, distance)) => {
            warn!("no entry/exit pair is {:.1} steps apart in the {}x{} maze, using the best \
                   found: {} steps",
                  threshold, grid.width().0, grid.height().0, distance);
            Ok(entry_exit(grid, config, entry, exit, distance))
        }
        None => bail!(ErrorKind::UnreachableConfiguration(
            format!("no two distinct connected cells on the {:?} and {:?} walls of a {}x{} maze",
                    config.start_wall(), config.end_wall(), grid.width().0, grid.height().0))),
    }
}

/// Cells touching the requested outer wall, in row major order. `Any` is the whole perimeter.
pub fn border_cells<GridIndexType: IndexType>(grid: &Grid<GridIndexType>,
                                              side: WallSide)
                                              -> Vec<GridCoordinate> {
    grid.iter().filter(|&cell| on_wall(grid, cell, side)).collect()
}

/// The outer wall to open for a border cell.
///
/// A specific side is used as is. For `Any`, top row cells open North, then bottom row South,
/// then left column West, anything else East.
pub fn opening_side<GridIndexType: IndexType>(grid: &Grid<GridIndexType>,
                                              cell: GridCoordinate,
                                              side: WallSide)
                                              -> CompassPrimary {
    match side {
        WallSide::North => CompassPrimary::North,
        WallSide::South => CompassPrimary::South,
        WallSide::East => CompassPrimary::East,
        WallSide::West => CompassPrimary::West,
        WallSide::Any => {
            if cell.row == 0 {
                CompassPrimary::North
            } else if cell.row as usize == grid.height().0 - 1 {
                CompassPrimary::South
            } else if cell.column == 0 {
                CompassPrimary::West
            } else {
                CompassPrimary::East
            }
        }
    }
}

fn on_wall<GridIndexType: IndexType>(grid: &Grid<GridIndexType>,
                                     cell: GridCoordinate,
                                     side: WallSide)
                                     -> bool {
    let last_row = grid.height().0 - 1;
    let last_column = grid.width().0 - 1;
    let (row, column) = (cell.row as usize, cell.column as usize);
    match side {
        WallSide::North => row == 0,
        WallSide::South => row == last_row,
        WallSide::West => column == 0,
        WallSide::East => column == last_column,
        WallSide::Any => row == 0 || row == last_row || column == 0 || column == last_column,
    }
}

fn furthest_candidate(distances: &Distances<u32>,
                      candidates: &[GridCoordinate],
                      entry: GridCoordinate)
                      -> Option<(GridCoordinate, u32)> {
    let mut furthest: Option<(GridCoordinate, u32)> = None;
    for &candidate in candidates.iter().filter(|&&candidate| candidate != entry) {
        if let Some(distance) = distances.distance_from_start_to(candidate) {
            if furthest.map_or(true, |(_, furthest_distance)| distance > furthest_distance) {
                furthest = Some((candidate, distance));
            }
        }
    }
    furthest
}

fn entry_exit<GridIndexType: IndexType>(grid: &Grid<GridIndexType>,
                                        config: &PlacementConfig,
                                        entry: GridCoordinate,
                                        exit: GridCoordinate,
                                        distance: u32)
                                        -> EntryExit {
    EntryExit {
        entry,
        exit,
        entry_side: opening_side(grid, entry, config.start_wall()),
        exit_side: opening_side(grid, exit, config.end_wall()),
        distance,
    }
}

#[cfg(test)]
mod tests {

    use quickcheck::quickcheck;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use super::*;
    use crate::generators;
    use crate::units::{Height, Width};

    type SmallGrid = Grid<u16>;

    fn perfect_maze(w: usize, h: usize, seed: u64) -> (SmallGrid, XorShiftRng) {
        let mut g = SmallGrid::new(Width(w), Height(h)).unwrap();
        let mut rng = XorShiftRng::seed_from_u64(seed);
        generators::simple(&mut g, &mut rng).unwrap();
        (g, rng)
    }

    fn exhaustive(start: WallSide, end: WallSide) -> PlacementConfig {
        PlacementConfig::new(start, end, 0.30, usize::max_value()).unwrap()
    }

    fn is_unreachable_configuration(result: Result<EntryExit>) -> bool {
        match result {
            Err(Error(ErrorKind::UnreachableConfiguration(_), _)) => true,
            _ => false,
        }
    }

    #[test]
    fn border_cells_per_side() {
        let g = SmallGrid::new(Width(3), Height(3)).unwrap();
        let gc = |r, c| GridCoordinate::new(r, c);
        assert_eq!(border_cells(&g, WallSide::North), vec![gc(0, 0), gc(0, 1), gc(0, 2)]);
        assert_eq!(border_cells(&g, WallSide::East), vec![gc(0, 2), gc(1, 2), gc(2, 2)]);
        let perimeter = border_cells(&g, WallSide::Any);
        assert_eq!(perimeter.len(), 8);
        assert!(!perimeter.contains(&gc(1, 1)));
    }

    #[test]
    fn opening_side_priority() {
        let g = SmallGrid::new(Width(4), Height(3)).unwrap();
        let gc = |r, c| GridCoordinate::new(r, c);
        assert_eq!(opening_side(&g, gc(0, 0), WallSide::Any), CompassPrimary::North);
        assert_eq!(opening_side(&g, gc(2, 3), WallSide::Any), CompassPrimary::South);
        assert_eq!(opening_side(&g, gc(1, 0), WallSide::Any), CompassPrimary::West);
        assert_eq!(opening_side(&g, gc(1, 3), WallSide::Any), CompassPrimary::East);
        assert_eq!(opening_side(&g, gc(0, 0), WallSide::West), CompassPrimary::West);
    }

    #[test]
    fn single_cell_maze_has_no_placement() {
        let (g, mut rng) = perfect_maze(1, 1, 0);
        let result = place_entry_exit(&g, &PlacementConfig::default(), &mut rng);
        assert!(is_unreachable_configuration(result));
    }

    #[test]
    fn single_candidate_for_both_ends() {
        let (g, mut rng) = perfect_maze(1, 3, 0);
        let config = exhaustive(WallSide::North, WallSide::North);
        assert!(is_unreachable_configuration(place_entry_exit(&g, &config, &mut rng)));
    }

    #[test]
    fn two_cell_maze_relaxes_to_its_only_pair() {
        let (g, mut rng) = perfect_maze(2, 1, 0);
        let placed = place_entry_exit(&g, &PlacementConfig::default(), &mut rng).unwrap();
        assert_ne!(placed.entry, placed.exit);
        assert_eq!(placed.distance, 1);
    }

    #[test]
    fn requested_sides_are_respected() {
        let (g, mut rng) = perfect_maze(8, 6, 21);
        let config = exhaustive(WallSide::North, WallSide::South);
        let placed = place_entry_exit(&g, &config, &mut rng).unwrap();
        assert_eq!(placed.entry.row, 0);
        assert_eq!(placed.exit.row, 5);
        assert_eq!(placed.entry_side, CompassPrimary::North);
        assert_eq!(placed.exit_side, CompassPrimary::South);

        let config = exhaustive(WallSide::West, WallSide::East);
        let placed = place_entry_exit(&g, &config, &mut rng).unwrap();
        assert_eq!(placed.entry.column, 0);
        assert_eq!(placed.exit.column, 7);
    }

    #[test]
    fn reported_distance_is_the_maze_distance() {
        let (g, mut rng) = perfect_maze(10, 10, 3);
        let placed = place_entry_exit(&g, &PlacementConfig::default(), &mut rng).unwrap();
        let distances = Distances::<u32>::new(&g, placed.entry).unwrap();
        assert_eq!(distances.distance_from_start_to(placed.exit), Some(placed.distance));
    }

    #[test]
    fn same_seed_same_placement() {
        let (g, _) = perfect_maze(12, 8, 4);
        let config = PlacementConfig::default();
        let a = place_entry_exit(&g, &config, &mut XorShiftRng::seed_from_u64(5)).unwrap();
        let b = place_entry_exit(&g, &config, &mut XorShiftRng::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn threshold_met_or_best_possible() {
        fn prop(w: u8, h: u8, seed: u64) -> bool {
            let (w, h) = (w as usize % 12 + 1, h as usize % 12 + 1);
            if w * h < 2 {
                return true;
            }
            let (g, mut rng) = perfect_maze(w, h, seed);
            let config = exhaustive(WallSide::Any, WallSide::Any);
            let placed = match place_entry_exit(&g, &config, &mut rng) {
                Ok(placed) => placed,
                Err(_) => return false,
            };

            let threshold = 0.30 * w.max(h) as f64;
            let perimeter = border_cells(&g, WallSide::Any);
            let best_possible = perimeter.iter()
                .map(|&a| {
                    let distances = Distances::<u32>::new(&g, a).unwrap();
                    perimeter.iter()
                        .filter_map(|&b| distances.distance_from_start_to(b))
                        .max()
                        .unwrap_or(0)
                })
                .max()
                .unwrap_or(0);

            placed.entry != placed.exit &&
            (f64::from(placed.distance) >= threshold || placed.distance == best_possible)
        }
        quickcheck(prop as fn(u8, u8, u64) -> bool);
    }
}
