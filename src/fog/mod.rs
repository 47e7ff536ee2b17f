//! Per-team fog of war
//!
//! Each faction keeps a visible set, rebuilt from scratch every recompute,
//! and an explored set that only ever grows. Vision sources are the
//! starting corner, living placed units, and placed bases.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::core::config::RulesConfig;
use crate::core::types::{PerTeam, Team};
use crate::game::bases::{Base, BaseKind};
use crate::game::units::Unit;
use crate::grid::coord::OffsetCoord;
use crate::grid::map::{HexGrid, OccupancyView};

/// External judge of local air control, evaluated per tile
///
/// Airbase vision defers to this collaborator; the core never computes air
/// superiority itself.
pub trait AirSuperiority {
    fn holds_air_superiority(&self, team: Team, at: OffsetCoord) -> bool;
}

/// Default collaborator: nobody contests the skies
#[derive(Debug, Clone, Copy, Default)]
pub struct UncontestedSkies;

impl AirSuperiority for UncontestedSkies {
    fn holds_air_superiority(&self, _team: Team, _at: OffsetCoord) -> bool {
        true
    }
}

/// What one faction currently sees and has ever seen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamFog {
    /// Rebuilt every recompute
    pub visible: AHashSet<OffsetCoord>,
    /// Monotone: never shrinks for the rest of the game
    pub explored: AHashSet<OffsetCoord>,
}

impl TeamFog {
    pub fn is_visible(&self, coord: OffsetCoord) -> bool {
        self.visible.contains(&coord)
    }

    pub fn is_explored(&self, coord: OffsetCoord) -> bool {
        self.explored.contains(&coord)
    }

    fn reveal(&mut self, coord: OffsetCoord) {
        self.visible.insert(coord);
        self.explored.insert(coord);
    }

    fn mark_explored(&mut self, coord: OffsetCoord) {
        self.explored.insert(coord);
    }
}

/// Fog state for both factions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FogOfWarEngine {
    teams: PerTeam<TeamFog>,
}

impl FogOfWarEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn team(&self, team: Team) -> &TeamFog {
        self.teams.get(team)
    }

    /// Rebuild both factions' visible sets from their current vision sources
    pub fn recompute(
        &mut self,
        grid: &HexGrid,
        config: &RulesConfig,
        units: &[Unit],
        bases: &[Base],
        occupancy: &OccupancyView,
        air: &dyn AirSuperiority,
    ) {
        for team in Team::both() {
            let fog = self.teams.get_mut(team);
            fog.visible.clear();

            // The home corner is watched for the whole game, no sight lines
            let (col, row) = config.starting_corner(team);
            let corner = OffsetCoord::new(col, row);
            if grid.in_bounds(corner) {
                fog.reveal(corner);
                for coord in grid.neighbors(corner, config.starting_area_radius) {
                    fog.reveal(coord);
                }
            }

            for unit in units.iter().filter(|u| u.team == team && u.is_alive()) {
                let Some(pos) = unit.position else {
                    continue;
                };
                let bonus = grid
                    .tile(pos)
                    .map(|t| t.terrain.view_bonus())
                    .unwrap_or(0);
                let range = unit.stats().vision_range + bonus;
                for (coord, _) in grid.reachable(pos, range, team, occupancy) {
                    if grid.line_of_sight(pos, coord).is_clear() {
                        fog.reveal(coord);
                    }
                }
            }

            for base in bases.iter().filter(|b| b.team == team) {
                let Some(pos) = base.position else {
                    continue;
                };
                let radius = base.kind.radius();
                if base.kind == BaseKind::Airbase {
                    // Air cover sees everything in radius where the skies
                    // are held; contested tiles stay explored only
                    for coord in std::iter::once(pos).chain(grid.neighbors(pos, radius)) {
                        if air.holds_air_superiority(team, coord) {
                            fog.reveal(coord);
                        } else {
                            fog.mark_explored(coord);
                        }
                    }
                } else {
                    for (coord, _) in grid.reachable(pos, radius, team, occupancy) {
                        if grid.line_of_sight(pos, coord).is_clear() {
                            fog.reveal(coord);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::units::UnitKind;
    use crate::grid::terrain::Terrain;

    struct NoAirCover;

    impl AirSuperiority for NoAirCover {
        fn holds_air_superiority(&self, _team: Team, _at: OffsetCoord) -> bool {
            false
        }
    }

    fn small_config() -> RulesConfig {
        RulesConfig {
            map_width: 16,
            map_height: 12,
            starting_area_radius: 2,
            ..RulesConfig::default()
        }
    }

    fn placed_unit(kind: UnitKind, team: Team, col: i32, row: i32) -> Unit {
        let mut unit = Unit::new(kind, team);
        unit.position = Some(OffsetCoord::new(col, row));
        unit
    }

    #[test]
    fn test_corner_always_visible() {
        let grid = HexGrid::new(16, 12);
        let config = small_config();
        let mut engine = FogOfWarEngine::new();
        engine.recompute(
            &grid,
            &config,
            &[],
            &[],
            &OccupancyView::new(),
            &UncontestedSkies,
        );

        assert!(engine.team(Team::Red).is_visible(OffsetCoord::new(0, 0)));
        assert!(engine.team(Team::Blue).is_visible(OffsetCoord::new(15, 11)));
        // Red's corner is not Blue's business
        assert!(!engine.team(Team::Blue).is_visible(OffsetCoord::new(0, 0)));
    }

    #[test]
    fn test_unit_reveals_surroundings() {
        let grid = HexGrid::new(16, 12);
        let config = small_config();
        let units = [placed_unit(UnitKind::Infantry, Team::Red, 8, 6)];
        let mut engine = FogOfWarEngine::new();
        engine.recompute(
            &grid,
            &config,
            &units,
            &[],
            &OccupancyView::new(),
            &UncontestedSkies,
        );

        let fog = engine.team(Team::Red);
        assert!(fog.is_visible(OffsetCoord::new(8, 6)));
        assert!(fog.is_visible(OffsetCoord::new(9, 6)));
        // Beyond infantry vision
        assert!(!fog.is_visible(OffsetCoord::new(14, 6)));
    }

    #[test]
    fn test_visible_implies_explored() {
        let grid = HexGrid::new(16, 12);
        let config = small_config();
        let units = [placed_unit(UnitKind::Recon, Team::Red, 8, 6)];
        let mut engine = FogOfWarEngine::new();
        engine.recompute(
            &grid,
            &config,
            &units,
            &[],
            &OccupancyView::new(),
            &UncontestedSkies,
        );

        let fog = engine.team(Team::Red);
        for coord in &fog.visible {
            assert!(fog.is_explored(*coord));
        }
    }

    #[test]
    fn test_explored_persists_after_moving_away() {
        let grid = HexGrid::new(16, 12);
        let config = small_config();
        let mut engine = FogOfWarEngine::new();

        let here = [placed_unit(UnitKind::Infantry, Team::Red, 8, 6)];
        engine.recompute(
            &grid,
            &config,
            &here,
            &[],
            &OccupancyView::new(),
            &UncontestedSkies,
        );
        assert!(engine.team(Team::Red).is_visible(OffsetCoord::new(8, 6)));

        let gone: [Unit; 0] = [];
        engine.recompute(
            &grid,
            &config,
            &gone,
            &[],
            &OccupancyView::new(),
            &UncontestedSkies,
        );
        let fog = engine.team(Team::Red);
        assert!(!fog.is_visible(OffsetCoord::new(8, 6)));
        assert!(fog.is_explored(OffsetCoord::new(8, 6)));
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let grid = HexGrid::new(16, 12);
        let config = small_config();
        let units = [
            placed_unit(UnitKind::Recon, Team::Red, 5, 5),
            placed_unit(UnitKind::Infantry, Team::Blue, 11, 8),
        ];
        let mut engine = FogOfWarEngine::new();
        let occupancy = OccupancyView::new();

        engine.recompute(&grid, &config, &units, &[], &occupancy, &UncontestedSkies);
        let first: AHashSet<_> = engine.team(Team::Red).visible.clone();
        engine.recompute(&grid, &config, &units, &[], &occupancy, &UncontestedSkies);
        assert_eq!(engine.team(Team::Red).visible, first);
    }

    #[test]
    fn test_mountains_hide_tiles_behind() {
        let mut grid = HexGrid::new(16, 12);
        for row in 0..12 {
            grid.set_terrain(OffsetCoord::new(10, row), Terrain::Mountains);
        }
        let config = small_config();
        let units = [placed_unit(UnitKind::Recon, Team::Red, 8, 6)];
        let mut engine = FogOfWarEngine::new();
        engine.recompute(
            &grid,
            &config,
            &units,
            &[],
            &OccupancyView::new(),
            &UncontestedSkies,
        );

        // The wall itself is impassable, so reachability stops there too
        assert!(!engine.team(Team::Red).is_visible(OffsetCoord::new(12, 6)));
    }

    #[test]
    fn test_hill_extends_vision() {
        let mut grid = HexGrid::new(16, 12);
        grid.set_terrain(OffsetCoord::new(8, 6), Terrain::Hills);
        let config = small_config();
        let units = [placed_unit(UnitKind::Infantry, Team::Red, 8, 6)];
        let mut engine = FogOfWarEngine::new();
        engine.recompute(
            &grid,
            &config,
            &units,
            &[],
            &OccupancyView::new(),
            &UncontestedSkies,
        );

        // Infantry vision is 3; the hill adds one more hop
        let fog = engine.team(Team::Red);
        let far = OffsetCoord::new(12, 6);
        assert_eq!(OffsetCoord::new(8, 6).distance(&far), 4);
        assert!(fog.is_visible(far));
    }

    #[test]
    fn test_airbase_vision_follows_air_superiority() {
        let grid = HexGrid::new(16, 12);
        let config = small_config();
        let mut base = Base::new(BaseKind::Airbase, Team::Red);
        base.position = Some(OffsetCoord::new(8, 6));
        let bases = [base];

        let mut engine = FogOfWarEngine::new();
        engine.recompute(
            &grid,
            &config,
            &[],
            &bases,
            &OccupancyView::new(),
            &UncontestedSkies,
        );
        assert!(engine.team(Team::Red).is_visible(OffsetCoord::new(10, 6)));

        // Contested skies: the zone is charted but not watched
        let mut engine = FogOfWarEngine::new();
        engine.recompute(
            &grid,
            &config,
            &[],
            &bases,
            &OccupancyView::new(),
            &NoAirCover,
        );
        let fog = engine.team(Team::Red);
        assert!(!fog.is_visible(OffsetCoord::new(10, 6)));
        assert!(fog.is_explored(OffsetCoord::new(10, 6)));
    }
}
