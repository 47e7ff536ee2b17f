//! Line-of-sight raycasting over the grid
//!
//! Sight is evaluated by sampling points along the segment joining two tile
//! centers in layout space. A sample landing deep inside a sight-blocking
//! tile stops the ray; a sample near a blocker's edge may graze past it if
//! the tile beyond the edge is open.

use glam::Vec2;

use crate::grid::coord::OffsetCoord;
use crate::grid::map::HexGrid;

/// Samples taken per unit of ray length in layout space
///
/// Layout units equal the hex size, so this is roughly samples-per-hex.
const SAMPLE_DENSITY: f32 = 4.0;

/// Fraction of a tile's incircle radius inside which a sample counts as a
/// solid hit rather than an edge graze
const SOLID_HIT_FRACTION: f32 = 0.7;

/// Incircle radius of a unit-size flat-top hex
const INCIRCLE_RADIUS: f32 = 0.866_025_4;

/// Outcome of a sight-line query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SightLine {
    Clear,
    Blocked(OffsetCoord),
}

impl SightLine {
    pub fn is_clear(&self) -> bool {
        matches!(self, SightLine::Clear)
    }

    pub fn blocker(&self) -> Option<OffsetCoord> {
        match self {
            SightLine::Clear => None,
            SightLine::Blocked(coord) => Some(*coord),
        }
    }
}

impl HexGrid {
    /// Is there an unobstructed sight line between two tile centers?
    ///
    /// Tiles at hop distance 1 or less are always mutually visible.
    pub fn line_of_sight(&self, from: OffsetCoord, to: OffsetCoord) -> SightLine {
        if from.distance(&to) <= 1 {
            return SightLine::Clear;
        }

        let start = from.center();
        let end = to.center();
        let length = start.distance(end);
        let ray = (end - start) / length;
        let samples = (length * SAMPLE_DENSITY).ceil() as i32;

        for step in 1..samples {
            let t = step as f32 / samples as f32;
            let point = start.lerp(end, t);
            let coord = OffsetCoord::from_point(point);
            if coord == from || coord == to {
                continue;
            }
            // Absent tiles never obstruct
            let Some(tile) = self.tile(coord) else {
                continue;
            };
            if !tile.terrain.blocks_sight() {
                continue;
            }

            if point.distance(coord.center()) <= SOLID_HIT_FRACTION * INCIRCLE_RADIUS {
                return SightLine::Blocked(coord);
            }
            // Edge graze: allowed past the rim only when the tile beyond it
            // is open in the ray direction
            if !self.exit_is_open(coord, ray) {
                return SightLine::Blocked(coord);
            }
        }

        SightLine::Clear
    }

    /// Is the blocker's neighbor most aligned with the ray passable?
    fn exit_is_open(&self, blocker: OffsetCoord, ray: Vec2) -> bool {
        let origin = blocker.center();
        let mut best: Option<(f32, OffsetCoord)> = None;
        for n in blocker.neighbors() {
            let alignment = (n.center() - origin).normalize().dot(ray);
            if best.map(|(a, _)| alignment > a).unwrap_or(true) {
                best = Some((alignment, n));
            }
        }
        match best {
            Some((_, ahead)) => self
                .tile(ahead)
                .map(|t| t.is_land())
                .unwrap_or(false),
            None => false,
        }
    }
}
