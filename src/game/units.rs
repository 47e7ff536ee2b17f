//! Unit kinds and their stat blocks
//!
//! Kinds are a closed set; per-kind behavior hangs off accessor methods on
//! the enum rather than an inheritance chain.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::core::error::{GameError, Result};
use crate::core::types::{MineId, Team, UnitId};
use crate::grid::coord::OffsetCoord;
use crate::grid::terrain::Terrain;

/// Type of unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Infantry,
    Recon,
    Armor,
    Artillery,
    Engineer,
}

/// Static stat block for a unit kind
#[derive(Debug, Clone)]
pub struct UnitStats {
    pub name: &'static str,
    pub move_range: u32,
    /// Declared attack reach. The active ruleset derives attack candidates
    /// from movement range instead; the declared value is carried for
    /// display and future ruleset variants.
    pub attack_range: u32,
    pub max_hp: u32,
    pub damage: u32,
    pub max_ammo: u32,
    pub max_supply: u32,
    pub vision_range: u32,
    pub can_build: bool,
    pub can_capture: bool,
}

const INFANTRY: UnitStats = UnitStats {
    name: "infantry",
    move_range: 3,
    attack_range: 1,
    max_hp: 10,
    damage: 3,
    max_ammo: 6,
    max_supply: 8,
    vision_range: 3,
    can_build: false,
    can_capture: true,
};

const RECON: UnitStats = UnitStats {
    name: "recon",
    move_range: 5,
    attack_range: 1,
    max_hp: 8,
    damage: 2,
    max_ammo: 4,
    max_supply: 6,
    vision_range: 5,
    can_build: false,
    can_capture: true,
};

const ARMOR: UnitStats = UnitStats {
    name: "armor",
    move_range: 4,
    attack_range: 1,
    max_hp: 14,
    damage: 5,
    max_ammo: 5,
    max_supply: 6,
    vision_range: 2,
    can_build: false,
    can_capture: true,
};

const ARTILLERY: UnitStats = UnitStats {
    name: "artillery",
    move_range: 2,
    attack_range: 3,
    max_hp: 8,
    damage: 6,
    max_ammo: 3,
    max_supply: 5,
    vision_range: 2,
    can_build: false,
    can_capture: false,
};

const ENGINEER: UnitStats = UnitStats {
    name: "engineer",
    move_range: 3,
    attack_range: 1,
    max_hp: 8,
    damage: 1,
    max_ammo: 2,
    max_supply: 8,
    vision_range: 2,
    can_build: true,
    can_capture: true,
};

impl UnitKind {
    /// Stat block for this kind
    pub fn stats(&self) -> &'static UnitStats {
        match self {
            UnitKind::Infantry => &INFANTRY,
            UnitKind::Recon => &RECON,
            UnitKind::Armor => &ARMOR,
            UnitKind::Artillery => &ARTILLERY,
            UnitKind::Engineer => &ENGINEER,
        }
    }

    pub fn name(&self) -> &'static str {
        self.stats().name
    }

    /// Resolve a kind from content data; unknown names are a content bug
    pub fn from_name(name: &str) -> Result<UnitKind> {
        match name {
            "infantry" => Ok(UnitKind::Infantry),
            "recon" => Ok(UnitKind::Recon),
            "armor" => Ok(UnitKind::Armor),
            "artillery" => Ok(UnitKind::Artillery),
            "engineer" => Ok(UnitKind::Engineer),
            other => Err(GameError::UnknownUnitKind(other.to_string())),
        }
    }

    /// Movement-cost hook; recon crews ignore rough going
    pub fn move_cost(&self, terrain: Terrain) -> u32 {
        match self {
            UnitKind::Recon => 1,
            _ => terrain.movement_multiplier(),
        }
    }
}

/// A unit in play
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub kind: UnitKind,
    pub team: Team,
    /// None until the unit is placed during the placement phase
    pub position: Option<OffsetCoord>,
    pub hp: u32,
    pub ammo: u32,
    pub supply: u32,
    pub has_moved: bool,
    /// In-progress construction, if any
    pub build: Option<super::build::BuildOrder>,
    /// Mines this unit has placed, oldest first
    pub mines: VecDeque<MineId>,
}

impl Unit {
    pub fn new(kind: UnitKind, team: Team) -> Self {
        let stats = kind.stats();
        Self {
            id: UnitId::new(),
            kind,
            team,
            position: None,
            hp: stats.max_hp,
            ammo: stats.max_ammo,
            supply: stats.max_supply,
            has_moved: false,
            build: None,
            mines: VecDeque::new(),
        }
    }

    pub fn stats(&self) -> &'static UnitStats {
        self.kind.stats()
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_placed(&self) -> bool {
        self.position.is_some()
    }

    /// Apply damage, clamping at zero
    pub fn take_damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
    }

    pub fn refill_ammo(&mut self) {
        self.ammo = self.stats().max_ammo;
    }

    pub fn refill_supply(&mut self) {
        self.supply = self.stats().max_supply;
    }
}
