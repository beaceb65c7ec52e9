//! Axial hex coordinates and the offset addressing used by map loaders.

use serde::{Deserialize, Serialize};

/// Axial offsets of the six direct neighbours, in a fixed order.
pub const HEX_DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// Location of a hex cell expressed in axial coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexCoord {
    q: i32,
    r: i32,
}

impl HexCoord {
    /// Creates a new axial coordinate.
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Column axis of the axial coordinate.
    #[must_use]
    pub const fn q(&self) -> i32 {
        self.q
    }

    /// Diagonal row axis of the axial coordinate.
    #[must_use]
    pub const fn r(&self) -> i32 {
        self.r
    }

    /// Implicit third cube axis, so that `q + r + s == 0`.
    #[must_use]
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Computes the hex distance between two coordinates.
    ///
    /// This ignores terrain entirely and is used for range checks; movement
    /// budgets are always measured with a breadth-first search instead.
    #[must_use]
    pub fn distance(self, other: HexCoord) -> u32 {
        let dq = self.q - other.q;
        let dr = self.r - other.r;
        (dq.unsigned_abs() + (dq + dr).unsigned_abs() + dr.unsigned_abs()) / 2
    }

    /// Reports whether the two coordinates are direct neighbours.
    #[must_use]
    pub fn is_adjacent(self, other: HexCoord) -> bool {
        self.distance(other) == 1
    }

    /// Iterator over the six neighbouring coordinates, whether or not they
    /// exist on any particular board.
    pub fn neighbors(self) -> impl Iterator<Item = HexCoord> {
        HEX_DIRECTIONS
            .into_iter()
            .map(move |(dq, dr)| HexCoord::new(self.q + dq, self.r + dr))
    }

    /// Converts the coordinate back into the row/column addressing used by
    /// map files and the presentation layer.
    #[must_use]
    pub const fn to_offset(self) -> OffsetCoord {
        OffsetCoord::new(self.r + self.q.div_euclid(2), self.q)
    }
}

/// Row and column address of a cell as written by map loaders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OffsetCoord {
    row: i32,
    col: i32,
}

impl OffsetCoord {
    /// Creates a new offset coordinate.
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Column index of the cell.
    #[must_use]
    pub const fn col(&self) -> i32 {
        self.col
    }

    /// Converts the offset address into axial coordinates.
    ///
    /// Columns become the `q` axis and every second column shifts the row
    /// down by one, so `r = row - floor(col / 2)`.
    #[must_use]
    pub const fn to_hex(self) -> HexCoord {
        HexCoord::new(self.col, self.row - self.col.div_euclid(2))
    }
}

impl From<OffsetCoord> for HexCoord {
    fn from(offset: OffsetCoord) -> Self {
        offset.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric_and_zero_on_self() {
        let a = HexCoord::new(2, -1);
        let b = HexCoord::new(-1, 3);
        assert_eq!(a.distance(a), 0);
        assert_eq!(a.distance(b), b.distance(a));
        assert_eq!(a.distance(b), 4);
    }

    #[test]
    fn every_neighbor_is_one_step_away() {
        let origin = HexCoord::new(3, 5);
        let neighbors: Vec<_> = origin.neighbors().collect();
        assert_eq!(neighbors.len(), 6);
        for neighbor in neighbors {
            assert_eq!(origin.distance(neighbor), 1);
            assert!(origin.is_adjacent(neighbor));
        }
    }

    #[test]
    fn offset_round_trips_for_odd_and_negative_columns() {
        for row in -3..4 {
            for col in -3..4 {
                let offset = OffsetCoord::new(row, col);
                assert_eq!(offset.to_hex().to_offset(), offset);
            }
        }
    }

    #[test]
    fn offset_distance_matches_cube_formula() {
        // (row 1, col 1) and (row 2, col 2) from a loader's point of view.
        let a = OffsetCoord::new(1, 1).to_hex();
        let b = OffsetCoord::new(2, 2).to_hex();
        assert_eq!(a, HexCoord::new(1, 1));
        assert_eq!(b, HexCoord::new(2, 1));
        assert_eq!(a.distance(b), 1);
    }

    #[test]
    fn cube_axes_sum_to_zero() {
        let coord = HexCoord::new(-4, 7);
        assert_eq!(coord.q() + coord.r() + coord.s(), 0);
    }
}
