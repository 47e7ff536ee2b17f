//! Base kinds and instances
//!
//! Bases project supply and ammo over a radius and anchor each team's
//! logistics. The roster is fixed at setup; bases are never destroyed.

use serde::{Deserialize, Serialize};

use crate::core::error::{GameError, Result};
use crate::core::types::{BaseId, Team};
use crate::grid::coord::OffsetCoord;

/// Type of base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseKind {
    Headquarters,
    AmmoDepot,
    SupplyDepot,
    Airbase,
}

impl BaseKind {
    /// Effect radius in hops
    pub fn radius(&self) -> u32 {
        match self {
            BaseKind::Headquarters => 3,
            BaseKind::AmmoDepot => 2,
            BaseKind::SupplyDepot => 2,
            BaseKind::Airbase => 3,
        }
    }

    /// Does this base refill ammo at end of turn?
    pub fn provides_ammo(&self) -> bool {
        matches!(self, BaseKind::Headquarters | BaseKind::AmmoDepot)
    }

    /// Does this base refill supply at end of turn?
    pub fn provides_supply(&self) -> bool {
        matches!(self, BaseKind::Headquarters | BaseKind::SupplyDepot)
    }

    pub fn name(&self) -> &'static str {
        match self {
            BaseKind::Headquarters => "headquarters",
            BaseKind::AmmoDepot => "ammo_depot",
            BaseKind::SupplyDepot => "supply_depot",
            BaseKind::Airbase => "airbase",
        }
    }

    /// Resolve a kind from content data; unknown names are a content bug
    pub fn from_name(name: &str) -> Result<BaseKind> {
        match name {
            "headquarters" => Ok(BaseKind::Headquarters),
            "ammo_depot" => Ok(BaseKind::AmmoDepot),
            "supply_depot" => Ok(BaseKind::SupplyDepot),
            "airbase" => Ok(BaseKind::Airbase),
            other => Err(GameError::UnknownBaseKind(other.to_string())),
        }
    }
}

/// A base in play
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Base {
    pub id: BaseId,
    pub kind: BaseKind,
    pub team: Team,
    /// None until positioned during the placement phase
    pub position: Option<OffsetCoord>,
}

impl Base {
    pub fn new(kind: BaseKind, team: Team) -> Self {
        Self {
            id: BaseId::new(),
            kind,
            team,
            position: None,
        }
    }

    pub fn is_placed(&self) -> bool {
        self.position.is_some()
    }
}
