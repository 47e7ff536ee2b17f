//! Terrain kinds affecting movement, vision, and sight lines

use serde::{Deserialize, Serialize};

/// Terrain kind of a single tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terrain {
    Water,
    Plains,
    Hills,
    Forest,
    Mountains,
}

impl Terrain {
    /// Can ground units occupy and traverse this tile?
    pub fn is_land(&self) -> bool {
        !matches!(self, Self::Water | Self::Mountains)
    }

    /// Movement-cost multiplier relative to plains
    pub fn movement_multiplier(&self) -> u32 {
        match self {
            Self::Plains => 1,
            Self::Hills => 2,
            Self::Forest => 2,
            Self::Water => 1,
            Self::Mountains => 3,
        }
    }

    /// Extra vision range granted to a unit standing here
    pub fn view_bonus(&self) -> u32 {
        match self {
            Self::Hills => 1,
            Self::Mountains => 2,
            _ => 0,
        }
    }

    /// Does this tile stop a sight line?
    ///
    /// Impassable terrain is exactly the terrain that blocks sight.
    pub fn blocks_sight(&self) -> bool {
        !self.is_land()
    }
}

impl Default for Terrain {
    fn default() -> Self {
        Self::Plains
    }
}

/// Per-cell record consumed from an external terrain generator
///
/// Applied exactly once per tile at map setup, before gameplay begins.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TileAttributes {
    pub terrain: Terrain,
    /// Marks this cell as a resource site
    pub resource: bool,
}

impl TileAttributes {
    pub fn new(terrain: Terrain) -> Self {
        Self {
            terrain,
            resource: false,
        }
    }

    pub fn with_resource(mut self) -> Self {
        self.resource = true;
        self
    }
}
