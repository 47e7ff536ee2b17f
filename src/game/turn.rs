//! Turn and phase control
//!
//! The controller owns every mutable collection — units, bases, resources,
//! mines, treasuries, fog — and validates every action itself. Illegal
//! actions are silent no-ops; the UI's precomputed legal sets are a
//! convenience, never trusted.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::core::config::RulesConfig;
use crate::core::error::Result;
use crate::core::types::{PerTeam, Team, UnitId};
use crate::fog::{AirSuperiority, FogOfWarEngine};
use crate::game::bases::{Base, BaseKind};
use crate::game::economy::Treasury;
use crate::game::resources::{Minefield, Resource};
use crate::game::units::{Unit, UnitKind};
use crate::grid::coord::OffsetCoord;
use crate::grid::map::{HexGrid, OccupancyView};

/// What the active team is currently placing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementSubphase {
    Units,
    Bases,
}

/// Global game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Placement {
        team: Team,
        subphase: PlacementSubphase,
    },
    Playing {
        team: Team,
    },
    GameOver,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Placement {
                subphase: PlacementSubphase::Units,
                ..
            } => "placement_units",
            Phase::Placement {
                subphase: PlacementSubphase::Bases,
                ..
            } => "placement_bases",
            Phase::Playing { .. } => "playing",
            Phase::GameOver => "game_over",
        }
    }
}

/// The authoritative game state and its phase machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnController {
    pub config: RulesConfig,
    pub grid: HexGrid,
    pub units: Vec<Unit>,
    pub bases: Vec<Base>,
    pub resources: Vec<Resource>,
    pub minefield: Minefield,
    pub treasuries: PerTeam<Treasury>,
    pub fog: FogOfWarEngine,
    pub phase: Phase,
    /// Team-turn counter; 0 during placement, 1 from the first playing turn
    pub turn: u32,
    pub(crate) selected: Option<UnitId>,
    pub(crate) valid_moves: AHashSet<OffsetCoord>,
    pub(crate) valid_attacks: AHashSet<OffsetCoord>,
}

impl TurnController {
    /// Build a game on an already-terraformed grid
    ///
    /// Roster names come from content data; an unknown name fails here,
    /// before any gameplay. Resources are scattered on land with the
    /// config's map seed.
    pub fn new(config: RulesConfig, grid: HexGrid) -> Result<Self> {
        config.validate()?;

        let mut units = Vec::new();
        let mut bases = Vec::new();
        for team in Team::both() {
            for name in &config.unit_roster {
                units.push(Unit::new(UnitKind::from_name(name)?, team));
            }
            for name in &config.base_roster {
                bases.push(Base::new(BaseKind::from_name(name)?, team));
            }
        }

        let resources = grid
            .scatter_resources(config.resource_count, config.map_seed)
            .into_iter()
            .map(Resource::new)
            .collect();

        let treasuries = PerTeam::new(
            Treasury::new(config.starting_credits),
            Treasury::new(config.starting_credits),
        );

        Ok(Self {
            config,
            grid,
            units,
            bases,
            resources,
            minefield: Minefield::new(),
            treasuries,
            fog: FogOfWarEngine::new(),
            phase: Phase::Placement {
                team: Team::Red,
                subphase: PlacementSubphase::Units,
            },
            turn: 0,
            selected: None,
            valid_moves: AHashSet::new(),
            valid_attacks: AHashSet::new(),
        })
    }

    // --- read-only query surface ---

    /// The team whose input is currently expected, if any
    pub fn current_team(&self) -> Option<Team> {
        match self.phase {
            Phase::Placement { team, .. } => Some(team),
            Phase::Playing { team } => Some(team),
            Phase::GameOver => None,
        }
    }

    pub fn credits(&self, team: Team) -> u32 {
        self.treasuries.get(team).credits()
    }

    pub fn selected_unit(&self) -> Option<&Unit> {
        self.selected
            .and_then(|id| self.units.iter().find(|u| u.id == id))
    }

    pub fn valid_moves(&self) -> &AHashSet<OffsetCoord> {
        &self.valid_moves
    }

    pub fn valid_attacks(&self) -> &AHashSet<OffsetCoord> {
        &self.valid_attacks
    }

    /// The placed, living unit on a tile, if any
    pub fn unit_at(&self, coord: OffsetCoord) -> Option<&Unit> {
        self.units
            .iter()
            .find(|u| u.is_alive() && u.position == Some(coord))
    }

    pub fn base_at(&self, coord: OffsetCoord) -> Option<&Base> {
        self.bases.iter().find(|b| b.position == Some(coord))
    }

    pub fn resource_at(&self, coord: OffsetCoord) -> Option<&Resource> {
        self.resources.iter().find(|r| r.position == coord)
    }

    /// Occupied coordinates and their occupants' teams
    pub fn occupancy(&self) -> OccupancyView {
        self.units
            .iter()
            .filter(|u| u.is_alive())
            .filter_map(|u| u.position.map(|p| (p, u.team)))
            .collect()
    }

    /// The fixed-radius region a team may place into, anchored at its corner
    pub fn starting_area(&self, team: Team) -> ahash::AHashMap<OffsetCoord, u32> {
        let (col, row) = self.config.starting_corner(team);
        self.grid.reachable(
            OffsetCoord::new(col, row),
            self.config.starting_area_radius,
            team,
            &self.occupancy(),
        )
    }

    pub(crate) fn unit_index(&self, id: UnitId) -> Option<usize> {
        self.units.iter().position(|u| u.id == id)
    }

    // --- placement phase ---

    /// Place the active team's next unplaced unit or base on `coord`
    ///
    /// Legal only on an empty land tile inside the team's starting area.
    pub fn place(&mut self, coord: OffsetCoord) -> bool {
        let Phase::Placement { team, subphase } = self.phase else {
            tracing::debug!(?coord, "placement outside placement phase ignored");
            return false;
        };

        let on_land = self.grid.tile(coord).map(|t| t.is_land()).unwrap_or(false);
        if !on_land || !self.starting_area(team).contains_key(&coord) {
            tracing::debug!(?coord, ?team, "placement outside starting area ignored");
            return false;
        }

        match subphase {
            PlacementSubphase::Units => {
                if self.unit_at(coord).is_some() {
                    return false;
                }
                let Some(unit) = self
                    .units
                    .iter_mut()
                    .find(|u| u.team == team && !u.is_placed())
                else {
                    return false;
                };
                unit.position = Some(coord);
                tracing::debug!(kind = unit.kind.name(), ?coord, ?team, "unit placed");
            }
            PlacementSubphase::Bases => {
                if self.base_at(coord).is_some() {
                    return false;
                }
                let Some(base) = self
                    .bases
                    .iter_mut()
                    .find(|b| b.team == team && !b.is_placed())
                else {
                    return false;
                };
                base.position = Some(coord);
                tracing::debug!(kind = base.kind.name(), ?coord, ?team, "base placed");
            }
        }

        self.advance_placement(team, subphase);
        true
    }

    fn advance_placement(&mut self, team: Team, subphase: PlacementSubphase) {
        match subphase {
            PlacementSubphase::Units => {
                let done = self
                    .units
                    .iter()
                    .filter(|u| u.team == team)
                    .all(|u| u.is_placed());
                if done {
                    self.phase = Phase::Placement {
                        team,
                        subphase: PlacementSubphase::Bases,
                    };
                }
            }
            PlacementSubphase::Bases => {
                let done = self
                    .bases
                    .iter()
                    .filter(|b| b.team == team)
                    .all(|b| b.is_placed());
                if !done {
                    return;
                }
                match team {
                    Team::Red => {
                        self.phase = Phase::Placement {
                            team: Team::Blue,
                            subphase: PlacementSubphase::Units,
                        };
                    }
                    Team::Blue => self.begin_playing(),
                }
            }
        }
    }

    fn begin_playing(&mut self) {
        for unit in &mut self.units {
            unit.has_moved = false;
        }
        self.turn = 1;
        self.phase = Phase::Playing { team: Team::Red };
        tracing::info!("placement complete, turn 1 begins");
    }

    // --- selection ---

    /// Select the unit on `coord`, recomputing its legal sets
    ///
    /// Re-selecting the selected unit deselects it; anything other than a
    /// friendly, placed, unmoved unit clears the selection.
    pub fn select(&mut self, coord: OffsetCoord) {
        let Phase::Playing { team } = self.phase else {
            self.clear_selection();
            return;
        };

        let candidate = self
            .unit_at(coord)
            .filter(|u| u.team == team && !u.has_moved)
            .map(|u| u.id);

        match candidate {
            Some(id) if self.selected == Some(id) => self.clear_selection(),
            Some(id) => {
                self.selected = Some(id);
                self.refresh_legal_sets();
            }
            None => self.clear_selection(),
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.valid_moves.clear();
        self.valid_attacks.clear();
    }

    /// Recompute the selected unit's legal move and attack sets
    ///
    /// Attack candidates deliberately derive from movement range; the
    /// declared attack-range stat is not consulted here.
    pub(crate) fn refresh_legal_sets(&mut self) {
        self.valid_moves.clear();
        self.valid_attacks.clear();

        let Some((pos, team, range, has_ammo)) = self
            .selected_unit()
            .and_then(|u| u.position.map(|p| (p, u.team, u.stats().move_range, u.ammo > 0)))
        else {
            return;
        };

        let occupancy = self.occupancy();
        let reach = self.grid.reachable(pos, range, team, &occupancy);

        let mut moves = AHashSet::new();
        let mut attacks = AHashSet::new();
        for (coord, dist) in reach {
            if dist == 0 {
                continue;
            }
            match occupancy.get(&coord) {
                None => {
                    moves.insert(coord);
                }
                Some(&occupant) if occupant != team && has_ammo => {
                    attacks.insert(coord);
                }
                _ => {}
            }
        }

        self.valid_moves = moves;
        self.valid_attacks = attacks;
    }

    // --- movement ---

    /// Move the selected unit to `dest` if it is in the legal move set
    pub fn move_selected(&mut self, dest: OffsetCoord) -> bool {
        let Phase::Playing { team } = self.phase else {
            return false;
        };
        let Some(id) = self.selected else {
            return false;
        };
        if !self.valid_moves.contains(&dest) {
            tracing::debug!(?dest, "move outside legal set ignored");
            return false;
        }
        // Re-validate against the live state, not just the cached set
        if self.unit_at(dest).is_some() {
            return false;
        }
        let Some(idx) = self.unit_index(id) else {
            return false;
        };
        if self.units[idx].has_moved || !self.units[idx].is_alive() {
            return false;
        }

        self.units[idx].position = Some(dest);
        self.units[idx].has_moved = true;
        let can_capture = self.units[idx].stats().can_capture;
        self.capture_resource(dest, team, can_capture);

        tracing::debug!(?dest, ?team, "unit moved");
        // Fresh sets for UI feedback; the moved flag keeps them inert
        self.refresh_legal_sets();
        true
    }

    /// Transfer resource ownership on an entered tile
    pub(crate) fn capture_resource(&mut self, coord: OffsetCoord, team: Team, can_capture: bool) {
        if !can_capture {
            return;
        }
        if let Some(resource) = self.resources.iter_mut().find(|r| r.position == coord) {
            if resource.owner != Some(team) {
                resource.owner = Some(team);
                tracing::debug!(?coord, ?team, "resource captured");
            }
        }
    }

    // --- lifecycle ---

    /// Terminal transition, triggered from outside the core
    pub fn set_game_over(&mut self) {
        self.phase = Phase::GameOver;
        self.clear_selection();
        tracing::info!("game over");
    }

    /// Recompute both teams' fog from the current vision sources
    pub fn update_fog(&mut self, air: &dyn AirSuperiority) {
        let occupancy = self.occupancy();
        self.fog.recompute(
            &self.grid,
            &self.config,
            &self.units,
            &self.bases,
            &occupancy,
            air,
        );
    }
}
