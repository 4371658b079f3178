use std::fmt;
use std::u32;

use petgraph::graph;
pub use petgraph::graph::IndexType;
use petgraph::{Graph, Undirected};
use rand::Rng;

use crate::cells::{CompassPrimary, CoordinateSmallVec, GridCoordinate, NeighbourSmallVec,
                   WallState};
use crate::errors::*;
use crate::grid_iterators::{index_to_grid_coordinate, CellIter, PassagesIter};
use crate::units::{ColumnsCount, EdgesCount, Height, NodesCount, RowsCount, Width};

/// A rectangular lattice of cells.
///
/// Every cell starts fully walled in. An open passage between two adjacent cells is an
/// undirected graph edge, so clearing the wall on one side always clears it on the other.
/// `GridIndexType` bounds how many cells the grid can hold (u8, u16, u32 or usize).
#[derive(Clone)]
pub struct Grid<GridIndexType: IndexType = u32> {
    graph: Graph<(), (), Undirected, GridIndexType>,
    width: Width,
    height: Height,
}

pub type MazeGrid = Grid<u32>;

impl<GridIndexType: IndexType> fmt::Debug for Grid<GridIndexType> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: graph: {:?}, width: {:?}, height: {:?}",
               self.graph, self.width, self.height)
    }
}

impl<GridIndexType: IndexType> Grid<GridIndexType> {
    /// Allocate a `width` x `height` grid with all walls present.
    ///
    /// Fails with `InvalidDimension` if either side is zero or the cell count does not
    /// fit `GridIndexType`.
    pub fn new(width: Width, height: Height) -> Result<Grid<GridIndexType>> {
        let (Width(w), Height(h)) = (width, height);
        let invalid = || Error::from(ErrorKind::InvalidDimension(w, h));

        if w < 1 || h < 1 || w > u32::MAX as usize || h > u32::MAX as usize {
            return Err(invalid());
        }
        let cells_count = w.checked_mul(h).ok_or_else(invalid)?;
        // The maximum index value is reserved by petgraph as the "end" marker.
        if cells_count >= <GridIndexType as IndexType>::max().index() {
            return Err(invalid());
        }

        let (NodesCount(nodes), EdgesCount(edges)) = graph_size(width, height);
        let mut grid = Grid {
            graph: Graph::with_capacity(nodes, edges),
            width,
            height,
        };
        for _ in 0..nodes {
            let _ = grid.graph.add_node(());
        }

        Ok(grid)
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        RowsCount(self.height.0)
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        ColumnsCount(self.width.0)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.width.0 * self.height.0
    }

    /// Number of open passages between cells.
    #[inline]
    pub fn passages_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of walls shared by two cells, open or not. The outer boundary is not counted.
    #[inline]
    pub fn interior_walls_count(&self) -> usize {
        let (_, EdgesCount(walls)) = graph_size(self.width, self.height);
        walls
    }

    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> GridCoordinate {
        let index = rng.gen_range(0..self.size());
        index_to_grid_coordinate(self.width, index)
    }

    /// Clear the wall shared by two adjacent cells. Opening an already open wall is a no-op.
    ///
    /// Panics if either cell is outside the grid or the cells are not adjacent.
    pub fn open(&mut self, a: GridCoordinate, b: GridCoordinate) {
        assert!(a.direction_to(b).is_some(),
                "cannot open a wall between non adjacent cells {} and {}", a, b);
        let a_index = self.grid_coordinate_graph_index(a)
            .unwrap_or_else(|| panic!("cell {} is outside the grid", a));
        let b_index = self.grid_coordinate_graph_index(b)
            .unwrap_or_else(|| panic!("cell {} is outside the grid", b));
        let _ = self.graph.update_edge(a_index, b_index, ());
    }

    /// Is there an open passage between `a` and `b`? Symmetric; false for non adjacent or
    /// out of grid cells.
    pub fn is_open(&self, a: GridCoordinate, b: GridCoordinate) -> bool {
        let a_index_opt = self.grid_coordinate_graph_index(a);
        let b_index_opt = self.grid_coordinate_graph_index(b);
        if let (Some(a_index), Some(b_index)) = (a_index_opt, b_index_opt) {
            self.graph.find_edge(a_index, b_index).is_some()
        } else {
            false
        }
    }

    /// Cells to the North, South, East or West that lie within the grid, paired with the
    /// direction of the shared wall. Not necessarily open.
    pub fn neighbours(&self, coord: GridCoordinate) -> NeighbourSmallVec {
        CompassPrimary::ALL
            .iter()
            .filter_map(|&dir| self.neighbour_at_direction(coord, dir).map(|n| (dir, n)))
            .collect()
    }

    pub fn neighbour_at_direction(&self,
                                  coord: GridCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<GridCoordinate> {
        coord.offset(direction).filter(|&neighbour| self.is_valid_coordinate(neighbour))
    }

    pub fn is_neighbour_open(&self, coord: GridCoordinate, direction: CompassPrimary) -> bool {
        self.neighbour_at_direction(coord, direction)
            .map_or(false, |neighbour| self.is_open(coord, neighbour))
    }

    /// Neighbours joined to `coord` by an open passage, in compass order N, S, E, W.
    pub fn links(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        self.neighbours(coord)
            .iter()
            .filter(|&&(_, neighbour)| self.is_open(coord, neighbour))
            .map(|&(_, neighbour)| neighbour)
            .collect()
    }

    /// Number of open passages leading out of a cell. A dead end has exactly one.
    #[inline]
    pub fn links_count(&self, coord: GridCoordinate) -> usize {
        self.grid_coordinate_graph_index(coord)
            .map_or(0, |index| self.graph.neighbors(index).count())
    }

    /// The wall flags of a single cell. Walls on the grid boundary are always present.
    pub fn walls(&self, coord: GridCoordinate) -> WallState {
        let mut walls = WallState::all_walls();
        for &dir in CompassPrimary::ALL.iter() {
            if self.is_neighbour_open(coord, dir) {
                walls.clear(dir);
            }
        }
        walls
    }

    /// Convert a grid coordinate to a one dimensional row major index in the range 0..grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: GridCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.row as usize * self.width.0 + coord.column as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_valid_coordinate(&self, coord: GridCoordinate) -> bool {
        (coord.row as usize) < self.height.0 && (coord.column as usize) < self.width.0
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.width, self.height)
    }

    pub fn iter_passages(&self) -> PassagesIter<GridIndexType> {
        PassagesIter::new(self.graph.raw_edges(), self.width)
    }

    /// All open passages with each pair ordered and the list sorted, for comparing grids.
    pub fn sorted_passages(&self) -> Vec<(GridCoordinate, GridCoordinate)> {
        let mut passages = self.iter_passages()
            .map(|(a, b)| if a <= b { (a, b) } else { (b, a) })
            .collect::<Vec<_>>();
        passages.sort();
        passages
    }

    /// Convert a grid coordinate into petgraph nodeindex
    /// Returns None if the grid coordinate is invalid (out of the grid's dimensions).
    #[inline]
    fn grid_coordinate_graph_index(&self,
                                   coord: GridCoordinate)
                                   -> Option<graph::NodeIndex<GridIndexType>> {
        self.grid_coordinate_to_index(coord)
            .map(graph::NodeIndex::<GridIndexType>::new)
    }
}

impl<'a, GridIndexType: IndexType> IntoIterator for &'a Grid<GridIndexType> {
    type Item = GridCoordinate;
    type IntoIter = CellIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Node count and interior wall count (the maximum number of passages) of a grid.
fn graph_size(width: Width, height: Height) -> (NodesCount, EdgesCount) {
    let (Width(w), Height(h)) = (width, height);
    let horizontal_walls = w * (h - 1);
    let vertical_walls = h * (w - 1);
    (NodesCount(w * h), EdgesCount(horizontal_walls + vertical_walls))
}
