//! Hex-grid topology, terrain, range queries, and line of sight

pub mod coord;
pub mod los;
pub mod map;
pub mod terrain;

pub use coord::OffsetCoord;
pub use los::SightLine;
pub use map::{HexGrid, OccupancyView, Tile};
pub use terrain::{Terrain, TileAttributes};
