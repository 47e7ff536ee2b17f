//! Offset hex coordinates (odd-q layout)
//!
//! Columns of flat-top hexes; odd columns are shifted half a hex down, so
//! adjacency depends on column parity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Neighbor offsets for tiles in an even column
pub const EVEN_COL_DIRECTIONS: [(i32, i32); 6] = [
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (0, 1),
];

/// Neighbor offsets for tiles in an odd column
pub const ODD_COL_DIRECTIONS: [(i32, i32); 6] = [
    (1, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
];

/// Offset hex coordinate (col, row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct OffsetCoord {
    pub col: i32,
    pub row: i32,
}

impl OffsetCoord {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Direction table for this tile's column parity
    pub fn directions(&self) -> &'static [(i32, i32); 6] {
        if self.col & 1 == 0 {
            &EVEN_COL_DIRECTIONS
        } else {
            &ODD_COL_DIRECTIONS
        }
    }

    /// All 6 adjacent coordinates
    pub fn neighbors(&self) -> [OffsetCoord; 6] {
        let dirs = self.directions();
        let mut out = [*self; 6];
        for (slot, (dc, dr)) in out.iter_mut().zip(dirs.iter()) {
            slot.col += dc;
            slot.row += dr;
        }
        out
    }

    /// Convert to cube coordinates for distance math
    pub fn to_cube(&self) -> (i32, i32, i32) {
        let x = self.col;
        let z = self.row - (self.col - (self.col & 1)) / 2;
        let y = -x - z;
        (x, y, z)
    }

    /// Build from cube coordinates
    pub fn from_cube(x: i32, z: i32) -> Self {
        Self {
            col: x,
            row: z + (x - (x & 1)) / 2,
        }
    }

    /// Distance in hex hops
    pub fn distance(&self, other: &Self) -> u32 {
        let (ax, ay, az) = self.to_cube();
        let (bx, by, bz) = other.to_cube();
        (((ax - bx).abs() + (ay - by).abs() + (az - bz).abs()) / 2) as u32
    }

    /// Tile center in layout space (flat-top hexes of unit size)
    pub fn center(&self) -> Vec2 {
        let parity = (self.col & 1) as f32;
        Vec2::new(
            1.5 * self.col as f32,
            3.0_f32.sqrt() * (self.row as f32 + 0.5 * parity),
        )
    }

    /// Resolve a layout-space point to the tile it falls in
    pub fn from_point(point: Vec2) -> Self {
        let q = (2.0 / 3.0) * point.x;
        let r = (-1.0 / 3.0) * point.x + (3.0_f32.sqrt() / 3.0) * point.y;
        let (x, z) = cube_round(q, r);
        Self::from_cube(x, z)
    }
}

/// Round fractional axial coordinates to the nearest hex
fn cube_round(q: f32, r: f32) -> (i32, i32) {
    let s = -q - r;
    let mut rq = q.round();
    let mut rr = r.round();
    let rs = s.round();

    let q_diff = (rq - q).abs();
    let r_diff = (rr - r).abs();
    let s_diff = (rs - s).abs();

    if q_diff > r_diff && q_diff > s_diff {
        rq = -rr - rs;
    } else if r_diff > s_diff {
        rr = -rq - rs;
    }

    (rq as i32, rr as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_are_distance_one() {
        for coord in [
            OffsetCoord::new(0, 0),
            OffsetCoord::new(3, 2),
            OffsetCoord::new(4, 7),
            OffsetCoord::new(5, 5),
        ] {
            for n in coord.neighbors() {
                assert_eq!(coord.distance(&n), 1, "{:?} -> {:?}", coord, n);
            }
        }
    }

    #[test]
    fn test_neighbor_parity_tables_differ() {
        let even = OffsetCoord::new(2, 4).neighbors();
        let odd = OffsetCoord::new(3, 4).neighbors();
        // Offsets relative to each origin are not the same set
        let even_offsets: Vec<_> = even.iter().map(|n| (n.col - 2, n.row - 4)).collect();
        let odd_offsets: Vec<_> = odd.iter().map(|n| (n.col - 3, n.row - 4)).collect();
        assert_ne!(even_offsets, odd_offsets);
    }

    #[test]
    fn test_distance_symmetric() {
        let a = OffsetCoord::new(1, 1);
        let b = OffsetCoord::new(6, 3);
        assert_eq!(a.distance(&b), b.distance(&a));
        assert_eq!(a.distance(&a), 0);
    }

    #[test]
    fn test_cube_round_trip() {
        for col in -3..6 {
            for row in -3..6 {
                let coord = OffsetCoord::new(col, row);
                let (x, _, z) = coord.to_cube();
                assert_eq!(OffsetCoord::from_cube(x, z), coord);
            }
        }
    }

    #[test]
    fn test_center_resolves_back() {
        for col in 0..8 {
            for row in 0..8 {
                let coord = OffsetCoord::new(col, row);
                assert_eq!(OffsetCoord::from_point(coord.center()), coord);
            }
        }
    }

    #[test]
    fn test_adjacent_centers_equidistant() {
        let origin = OffsetCoord::new(4, 4);
        let base = origin.center();
        for n in origin.neighbors() {
            let d = base.distance(n.center());
            assert!((d - 3.0_f32.sqrt()).abs() < 1e-4, "center spacing {}", d);
        }
    }
}
