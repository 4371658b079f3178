use std::fmt;

use smallvec::SmallVec;

/// A cell address on the grid. Rows grow southwards, columns grow eastwards.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct GridCoordinate {
    pub row: u32,
    pub column: u32,
}

impl GridCoordinate {
    pub fn new(row: u32, column: u32) -> GridCoordinate {
        GridCoordinate { row, column }
    }

    /// Creates a new coordinate offset 1 cell away in the given direction.
    /// Returns None if the coordinate would be negative. It is up to the grid to
    /// decide whether the southern/eastern result is in bounds.
    pub fn offset(self, dir: CompassPrimary) -> Option<GridCoordinate> {
        let (row, column) = (self.row, self.column);
        match dir {
            CompassPrimary::North => row.checked_sub(1).map(|r| GridCoordinate::new(r, column)),
            CompassPrimary::South => row.checked_add(1).map(|r| GridCoordinate::new(r, column)),
            CompassPrimary::East => column.checked_add(1).map(|c| GridCoordinate::new(row, c)),
            CompassPrimary::West => column.checked_sub(1).map(|c| GridCoordinate::new(row, c)),
        }
    }

    /// The direction to travel from `self` to reach the adjacent cell `other`.
    /// None when the two coordinates are not orthogonally adjacent.
    pub fn direction_to(self, other: GridCoordinate) -> Option<CompassPrimary> {
        CompassPrimary::ALL
            .iter()
            .cloned()
            .find(|&dir| self.offset(dir) == Some(other))
    }
}

impl From<(u32, u32)> for GridCoordinate {
    fn from(row_column_pair: (u32, u32)) -> GridCoordinate {
        GridCoordinate::new(row_column_pair.0, row_column_pair.1)
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

pub type CoordinateSmallVec = SmallVec<[GridCoordinate; 4]>;
pub type NeighbourSmallVec = SmallVec<[(CompassPrimary, GridCoordinate); 4]>;

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl CompassPrimary {
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::North,
                                          CompassPrimary::South,
                                          CompassPrimary::East,
                                          CompassPrimary::West];

    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::East,
        }
    }

    #[inline]
    fn bit(self) -> u8 {
        match self {
            CompassPrimary::North => 0b0001,
            CompassPrimary::South => 0b0010,
            CompassPrimary::East => 0b0100,
            CompassPrimary::West => 0b1000,
        }
    }
}

/// The four boundary flags of a single cell. A set flag means the wall is present.
///
/// This is a snapshot read off the grid; the grid itself stores passages, so the two
/// sides of a shared wall can never disagree.
#[derive(Hash, Eq, PartialEq, Copy, Clone)]
pub struct WallState(u8);

impl WallState {
    pub fn all_walls() -> WallState {
        WallState(0b1111)
    }

    pub fn has_wall(self, dir: CompassPrimary) -> bool {
        self.0 & dir.bit() != 0
    }

    pub fn clear(&mut self, dir: CompassPrimary) {
        self.0 &= !dir.bit();
    }

    /// Count of walls that are absent.
    pub fn open_count(self) -> usize {
        4 - self.0.count_ones() as usize
    }
}

impl fmt::Debug for WallState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let flags: String = CompassPrimary::ALL
            .iter()
            .map(|&dir| {
                let letter = match dir {
                    CompassPrimary::North => 'N',
                    CompassPrimary::South => 'S',
                    CompassPrimary::East => 'E',
                    CompassPrimary::West => 'W',
                };
                if self.has_wall(dir) { letter } else { '-' }
            })
            .collect();
        write!(f, "WallState({})", flags)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn offsets() {
        let gc = |r, c| GridCoordinate::new(r, c);
        assert_eq!(gc(1, 1).offset(CompassPrimary::North), Some(gc(0, 1)));
        assert_eq!(gc(1, 1).offset(CompassPrimary::South), Some(gc(2, 1)));
        assert_eq!(gc(1, 1).offset(CompassPrimary::East), Some(gc(1, 2)));
        assert_eq!(gc(1, 1).offset(CompassPrimary::West), Some(gc(1, 0)));
        assert_eq!(gc(0, 0).offset(CompassPrimary::North), None);
        assert_eq!(gc(0, 0).offset(CompassPrimary::West), None);
    }

    #[test]
    fn direction_between_adjacent_cells() {
        let gc = |r, c| GridCoordinate::new(r, c);
        assert_eq!(gc(2, 2).direction_to(gc(1, 2)), Some(CompassPrimary::North));
        assert_eq!(gc(2, 2).direction_to(gc(2, 3)), Some(CompassPrimary::East));
        assert_eq!(gc(2, 2).direction_to(gc(3, 3)), None);
        assert_eq!(gc(2, 2).direction_to(gc(2, 2)), None);
    }

    #[test]
    fn opposites_are_involutions() {
        for &dir in CompassPrimary::ALL.iter() {
            assert_ne!(dir, dir.opposite());
            assert_eq!(dir, dir.opposite().opposite());
        }
    }

    #[test]
    fn wall_state_flags() {
        let mut walls = WallState::all_walls();
        assert_eq!(walls.open_count(), 0);
        walls.clear(CompassPrimary::East);
        assert!(!walls.has_wall(CompassPrimary::East));
        assert!(walls.has_wall(CompassPrimary::West));
        assert_eq!(walls.open_count(), 1);
        assert_eq!(format!("{:?}", walls), "WallState(NS-W)");
    }
}
