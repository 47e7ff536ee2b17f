//! The wargame grid: tile storage and breadth-first range queries
//!
//! The grid owns topology and terrain only. Units and teams enter the
//! picture solely through the occupancy view passed into `reachable`.

use ahash::{AHashMap, AHashSet};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::core::types::Team;
use crate::grid::coord::OffsetCoord;
use crate::grid::terrain::{Terrain, TileAttributes};

/// A single tile on the grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub coord: OffsetCoord,
    pub terrain: Terrain,
}

impl Tile {
    pub fn new(coord: OffsetCoord, terrain: Terrain) -> Self {
        Self { coord, terrain }
    }

    pub fn is_land(&self) -> bool {
        self.terrain.is_land()
    }
}

/// Which units sit where, as far as the grid needs to know
///
/// Maps an occupied coordinate to the occupying unit's team.
pub type OccupancyView = AHashMap<OffsetCoord, Team>;

/// The full hex grid, stored row-major
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HexGrid {
    tiles: Vec<Tile>,
    width: i32,
    height: i32,
}

impl HexGrid {
    /// Create a grid of open plains
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        let mut tiles = Vec::with_capacity((width * height) as usize);
        for row in 0..height {
            for col in 0..width {
                tiles.push(Tile::new(OffsetCoord::new(col, row), Terrain::Plains));
            }
        }
        Self {
            tiles,
            width,
            height,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    fn index(&self, coord: OffsetCoord) -> Option<usize> {
        if coord.col < 0 || coord.row < 0 || coord.col >= self.width || coord.row >= self.height {
            return None;
        }
        Some((coord.row * self.width + coord.col) as usize)
    }

    /// Bounds-checked lookup; out-of-bounds is absent, never an error
    pub fn tile_at(&self, col: i32, row: i32) -> Option<&Tile> {
        self.tile(OffsetCoord::new(col, row))
    }

    /// Bounds-checked lookup by coordinate
    pub fn tile(&self, coord: OffsetCoord) -> Option<&Tile> {
        self.index(coord).map(|i| &self.tiles[i])
    }

    pub fn in_bounds(&self, coord: OffsetCoord) -> bool {
        self.index(coord).is_some()
    }

    /// Iterate over every tile
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Set terrain at a coordinate (silently ignores out-of-bounds)
    pub fn set_terrain(&mut self, coord: OffsetCoord, terrain: Terrain) {
        if let Some(i) = self.index(coord) {
            self.tiles[i].terrain = terrain;
        }
    }

    /// Apply generator output cell by cell, once, at map setup
    ///
    /// Returns the coordinates the generator marked as resource sites.
    pub fn apply_attributes<I>(&mut self, cells: I) -> Vec<OffsetCoord>
    where
        I: IntoIterator<Item = (OffsetCoord, TileAttributes)>,
    {
        let mut sites = Vec::new();
        for (coord, attrs) in cells {
            if let Some(i) = self.index(coord) {
                self.tiles[i].terrain = attrs.terrain;
                if attrs.resource {
                    sites.push(coord);
                }
            }
        }
        sites
    }

    /// Pick `count` distinct land tiles for resource sites, seeded
    pub fn scatter_resources(&self, count: u32, seed: u64) -> Vec<OffsetCoord> {
        let mut land: Vec<OffsetCoord> = self
            .tiles
            .iter()
            .filter(|t| t.is_land())
            .map(|t| t.coord)
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        land.shuffle(&mut rng);
        land.truncate(count as usize);
        land
    }

    /// All tiles within `range` hops of `origin`, ignoring terrain
    ///
    /// Excludes the origin itself. An absent origin yields an empty set.
    pub fn neighbors(&self, origin: OffsetCoord, range: u32) -> AHashSet<OffsetCoord> {
        let mut out = AHashSet::new();
        if self.index(origin).is_none() {
            return out;
        }

        let mut visited = vec![false; (self.width * self.height) as usize];
        let mut frontier = VecDeque::new();
        visited[self.index(origin).unwrap()] = true;
        frontier.push_back((origin, 0u32));

        while let Some((coord, dist)) = frontier.pop_front() {
            if dist >= range {
                continue;
            }
            for next in coord.neighbors() {
                let Some(i) = self.index(next) else {
                    continue;
                };
                if visited[i] {
                    continue;
                }
                visited[i] = true;
                out.insert(next);
                frontier.push_back((next, dist + 1));
            }
        }

        out
    }

    /// Terrain- and occupancy-aware reachability out to `range` hops
    ///
    /// Expands only through passable land. A tile occupied by a unit whose
    /// team differs from `team` is recorded at its distance but never
    /// expanded through. Returns coord -> hop distance, origin included at
    /// distance 0; an absent or impassable origin yields an empty map.
    pub fn reachable(
        &self,
        origin: OffsetCoord,
        range: u32,
        team: Team,
        occupancy: &OccupancyView,
    ) -> AHashMap<OffsetCoord, u32> {
        let mut out = AHashMap::new();
        let passable = match self.tile(origin) {
            Some(tile) => tile.is_land(),
            None => false,
        };
        if !passable {
            return out;
        }

        let mut visited = vec![false; (self.width * self.height) as usize];
        let mut frontier = VecDeque::new();
        visited[self.index(origin).unwrap()] = true;
        out.insert(origin, 0);
        frontier.push_back((origin, 0u32));

        while let Some((coord, dist)) = frontier.pop_front() {
            if dist >= range {
                continue;
            }
            for next in coord.neighbors() {
                let Some(i) = self.index(next) else {
                    continue;
                };
                if visited[i] {
                    continue;
                }
                if !self.tiles[i].is_land() {
                    continue;
                }
                visited[i] = true;
                out.insert(next, dist + 1);

                // Hostile occupants are seen but not passed through
                let blocked = occupancy
                    .get(&next)
                    .map(|occupant| *occupant != team)
                    .unwrap_or(false);
                if !blocked {
                    frontier.push_back((next, dist + 1));
                }
            }
        }

        out
    }
}
