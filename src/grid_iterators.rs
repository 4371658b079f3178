use std::slice;

use petgraph::graph::{self, IndexType};

use crate::cells::GridCoordinate;
use crate::units::{Height, Width};

/// Row major conversion of a one dimensional cell index into a coordinate.
#[inline]
pub(crate) fn index_to_grid_coordinate(width: Width, one_dimensional_index: usize) -> GridCoordinate {
    let row = one_dimensional_index / width.0;
    let column = one_dimensional_index % width.0;
    GridCoordinate::new(row as u32, column as u32)
}

/// Every cell of a grid in row major order: west to east, then north to south.
#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    width: Width,
    cells_count: usize,
}

impl CellIter {
    pub(crate) fn new(width: Width, height: Height) -> CellIter {
        CellIter {
            current_cell_number: 0,
            width,
            cells_count: width.0 * height.0,
        }
    }
}

impl Iterator for CellIter {
    type Item = GridCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = index_to_grid_coordinate(self.width, self.current_cell_number);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}
impl ExactSizeIterator for CellIter {} // default impl using size_hint()

/// The open passages of a grid as pairs of adjacent coordinates, in the order they were carved.
pub struct PassagesIter<'a, GridIndexType: IndexType> {
    graph_edge_iter: slice::Iter<'a, graph::Edge<(), GridIndexType>>,
    width: Width,
}

impl<'a, GridIndexType: IndexType> PassagesIter<'a, GridIndexType> {
    pub(crate) fn new(edges: &'a [graph::Edge<(), GridIndexType>],
                      width: Width)
                      -> PassagesIter<'a, GridIndexType> {
        PassagesIter {
            graph_edge_iter: edges.iter(),
            width,
        }
    }
}

impl<'a, GridIndexType: IndexType> Iterator for PassagesIter<'a, GridIndexType> {
    type Item = (GridCoordinate, GridCoordinate);

    fn next(&mut self) -> Option<Self::Item> {
        let width = self.width;
        self.graph_edge_iter.next().map(|edge| {
            (index_to_grid_coordinate(width, edge.source().index()),
             index_to_grid_coordinate(width, edge.target().index()))
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.graph_edge_iter.size_hint()
    }
}
impl<'a, GridIndexType: IndexType> ExactSizeIterator for PassagesIter<'a, GridIndexType> {}
