use bit_set::BitSet;
use error_chain::bail;
use log::debug;
use petgraph::graph::IndexType;
use rand::Rng;
use smallvec::SmallVec;

use crate::cells::GridCoordinate;
use crate::errors::*;
use crate::grid::Grid;
use crate::settings::{Algorithm, GrowingTreeConfig};

/// How the carve picks the next frontier cell to grow from.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SelectionPolicy {
    /// Any frontier cell with equal chance. A random Prim's style carve.
    UniformRandom,
    /// The newest frontier cell with probability `weight_high / (weight_high + weight_low)`,
    /// otherwise a uniformly random one.
    GrowingTree(GrowingTreeConfig),
}

impl SelectionPolicy {
    pub fn for_algorithm(algorithm: &Algorithm) -> SelectionPolicy {
        match *algorithm {
            Algorithm::Simple(_) => SelectionPolicy::UniformRandom,
            Algorithm::GrowingTree(config) |
            Algorithm::Braided(config, _) => SelectionPolicy::GrowingTree(config),
        }
    }

    /// Position in the frontier of the cell to grow from. `frontier_len` must be non zero.
    fn select<R: Rng + ?Sized>(&self, frontier_len: usize, rng: &mut R) -> usize {
        match *self {
            SelectionPolicy::UniformRandom => rng.gen_range(0..frontier_len),
            SelectionPolicy::GrowingTree(config) => {
                if rng.gen_bool(config.most_recent_probability()) {
                    frontier_len - 1
                } else {
                    rng.gen_range(0..frontier_len)
                }
            }
        }
    }
}

/// Carved cells that may still have unvisited neighbours, in insertion order.
#[derive(Debug)]
struct Frontier {
    cells: Vec<GridCoordinate>,
    members: BitSet,
}

impl Frontier {
    fn with_capacity(cells_count: usize) -> Frontier {
        Frontier {
            cells: Vec::with_capacity(cells_count),
            members: BitSet::with_capacity(cells_count),
        }
    }

    fn push(&mut self, coord: GridCoordinate, index: usize) {
        if self.members.insert(index) {
            self.cells.push(coord);
        }
    }

    fn remove(&mut self, position: usize, index: usize) {
        let _ = self.cells.remove(position);
        let _ = self.members.remove(index);
    }

    #[inline]
    fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Carve a perfect maze with uniformly random frontier selection, starting from a random cell.
pub fn simple<GridIndexType, R>(grid: &mut Grid<GridIndexType>, rng: &mut R) -> Result<()>
    where GridIndexType: IndexType,
          R: Rng + ?Sized
{
    carve(grid, SelectionPolicy::UniformRandom, None, rng)
}

/// Carve a perfect maze with the growing tree selection bias, starting from a random cell.
///
/// `weight_high: 100, weight_low: 0` is a depth first carve with long winding corridors;
/// `weight_high: 0` behaves like `simple` and branches a lot more.
pub fn growing_tree<GridIndexType, R>(grid: &mut Grid<GridIndexType>,
                                      config: &GrowingTreeConfig,
                                      rng: &mut R)
                                      -> Result<()>
    where GridIndexType: IndexType,
          R: Rng + ?Sized
{
    carve(grid, SelectionPolicy::GrowingTree(*config), None, rng)
}

/// Turn a fully walled grid into a spanning tree of passages.
///
/// Every cell ends up reachable from every other by exactly one path, so the grid ends with
/// `size() - 1` passages. `start` defaults to a random cell. Walls that were already open are
/// left open, so call this on a fresh grid for a perfect maze.
pub fn carve<GridIndexType, R>(grid: &mut Grid<GridIndexType>,
                               policy: SelectionPolicy,
                               start: Option<GridCoordinate>,
                               rng: &mut R)
                               -> Result<()>
    where GridIndexType: IndexType,
          R: Rng + ?Sized
{
    let start = match start {
        Some(coord) if !grid.is_valid_coordinate(coord) => {
            bail!(ErrorKind::InvalidAlgorithmSetting(
                format!("carve start {} is outside the {}x{} grid",
                        coord, grid.width().0, grid.height().0)))
        }
        Some(coord) => coord,
        None => grid.random_cell(rng),
    };
    debug!("carving {}x{} grid from {} with {:?}",
           grid.width().0, grid.height().0, start, policy);

    let cells_count = grid.size();
    let mut carved = BitSet::with_capacity(cells_count);
    let mut frontier = Frontier::with_capacity(cells_count);
    let start_index = cell_index(grid, start);
    let _ = carved.insert(start_index);
    frontier.push(start, start_index);

    while !frontier.is_empty() {
        let position = policy.select(frontier.len(), rng);
        let cell = frontier.cells[position];

        let unvisited = grid.neighbours(cell)
            .iter()
            .map(|&(_, neighbour)| neighbour)
            .filter(|&neighbour| !carved.contains(cell_index(&*grid, neighbour)))
            .collect::<SmallVec<[GridCoordinate; 4]>>();

        if unvisited.is_empty() {
            frontier.remove(position, cell_index(grid, cell));
            continue;
        }

        let next = unvisited[rng.gen_range(0..unvisited.len())];
        grid.open(cell, next);
        let next_index = cell_index(grid, next);
        let _ = carved.insert(next_index);
        frontier.push(next, next_index);
    }

    debug!("carve finished with {} passages", grid.passages_count());
    Ok(())
}

#[inline]
fn cell_index<GridIndexType: IndexType>(grid: &Grid<GridIndexType>, coord: GridCoordinate) -> usize {
    grid.grid_coordinate_to_index(coord)
        .unwrap_or_else(|| panic!("neighbour {} is outside the grid", coord))
}

#[cfg(test)]
mod tests {

    use quickcheck::quickcheck;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use super::*;
    use crate::pathing::Distances;
    use crate::units::{Height, Width};

    type SmallGrid = Grid<u16>;

    fn small_grid(w: usize, h: usize) -> SmallGrid {
        SmallGrid::new(Width(w), Height(h)).expect("grid dimensions too large for small grid")
    }

    fn is_fully_connected(g: &SmallGrid) -> bool {
        let distances = Distances::<u32>::new(g, GridCoordinate::new(0, 0))
            .expect("origin is always inside the grid");
        g.iter().all(|coord| distances.distance_from_start_to(coord).is_some())
    }

    // Passages per corridor end. Cells with exactly two links are corridor interiors, every
    // other cell is a junction or a dead end.
    fn mean_corridor_length(g: &SmallGrid) -> f64 {
        let corridor_ends = g.iter().filter(|&coord| g.links_count(coord) != 2).count();
        g.passages_count() as f64 / corridor_ends as f64
    }

    fn carved_with(policy: SelectionPolicy, w: usize, h: usize, seed: u64) -> SmallGrid {
        let mut g = small_grid(w, h);
        let mut rng = XorShiftRng::seed_from_u64(seed);
        carve(&mut g, policy, None, &mut rng).unwrap();
        g
    }

    #[test]
    fn simple_is_a_spanning_tree() {
        fn prop(w: u8, h: u8, seed: u64) -> bool {
            let (w, h) = (w as usize % 20 + 1, h as usize % 20 + 1);
            let g = carved_with(SelectionPolicy::UniformRandom, w, h, seed);
            g.passages_count() == w * h - 1 && is_fully_connected(&g)
        }
        quickcheck(prop as fn(u8, u8, u64) -> bool);
    }

    #[test]
    fn growing_tree_is_a_spanning_tree() {
        fn prop(w: u8, h: u8, high: u8, low: u8, seed: u64) -> bool {
            let (w, h) = (w as usize % 20 + 1, h as usize % 20 + 1);
            let (high, low) = (i32::from(high % 101), i32::from(low % 101));
            let config = match GrowingTreeConfig::new(high, low) {
                Ok(config) => config,
                Err(_) => return high == 0 && low == 0,
            };
            let g = carved_with(SelectionPolicy::GrowingTree(config), w, h, seed);
            g.passages_count() == w * h - 1 && is_fully_connected(&g)
        }
        quickcheck(prop as fn(u8, u8, u8, u8, u64) -> bool);
    }

    #[test]
    fn single_cell_grid() {
        let g = carved_with(SelectionPolicy::UniformRandom, 1, 1, 3);
        assert_eq!(g.passages_count(), 0);
    }

    #[test]
    fn same_seed_same_maze() {
        let config = GrowingTreeConfig::default();
        let a = carved_with(SelectionPolicy::GrowingTree(config), 12, 9, 42);
        let b = carved_with(SelectionPolicy::GrowingTree(config), 12, 9, 42);
        assert_eq!(a.sorted_passages(), b.sorted_passages());

        let c = carved_with(SelectionPolicy::GrowingTree(config), 12, 9, 43);
        assert_ne!(a.sorted_passages(), c.sorted_passages());
    }

    #[test]
    fn explicit_start_cell() {
        let mut g = small_grid(5, 4);
        let mut rng = XorShiftRng::seed_from_u64(1);
        carve(&mut g, SelectionPolicy::UniformRandom, Some(GridCoordinate::new(3, 4)), &mut rng)
            .unwrap();
        assert_eq!(g.passages_count(), 19);

        let mut g = small_grid(5, 4);
        let outside = carve(&mut g,
                            SelectionPolicy::UniformRandom,
                            Some(GridCoordinate::new(4, 0)),
                            &mut rng);
        match outside {
            Err(Error(ErrorKind::InvalidAlgorithmSetting(_), _)) => {}
            other => panic!("expected an invalid setting error, got {:?}", other),
        }
        assert_eq!(g.passages_count(), 0);
    }

    #[test]
    fn depth_first_bias_makes_longer_corridors() {
        let depth_first = GrowingTreeConfig::new(100, 0).unwrap();
        let random = GrowingTreeConfig::new(0, 100).unwrap();
        let mean_over_seeds = |config: GrowingTreeConfig| {
            (0..8u64)
                .map(|seed| {
                    let g = carved_with(SelectionPolicy::GrowingTree(config), 25, 25, seed);
                    mean_corridor_length(&g)
                })
                .sum::<f64>() / 8.0
        };
        assert!(mean_over_seeds(depth_first) > mean_over_seeds(random));
    }

    #[test]
    fn policy_for_algorithm() {
        use crate::settings::{BraidConfig, SimpleConfig};
        let config = GrowingTreeConfig::new(10, 20).unwrap();
        assert_eq!(SelectionPolicy::for_algorithm(&Algorithm::Simple(SimpleConfig)),
                   SelectionPolicy::UniformRandom);
        assert_eq!(SelectionPolicy::for_algorithm(&Algorithm::GrowingTree(config)),
                   SelectionPolicy::GrowingTree(config));
        assert_eq!(SelectionPolicy::for_algorithm(&Algorithm::Braided(config,
                                                                      BraidConfig::default())),
                   SelectionPolicy::GrowingTree(config));
    }

    #[test]
    fn most_recent_only_policy_always_picks_the_newest() {
        let policy = SelectionPolicy::GrowingTree(GrowingTreeConfig::new(100, 0).unwrap());
        let mut rng = XorShiftRng::seed_from_u64(9);
        for len in 1..50 {
            assert_eq!(policy.select(len, &mut rng), len - 1);
        }
    }
}
