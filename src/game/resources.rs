//! Resource sites and engineer-laid mines
//!
//! Resources change owner when a unit enters their tile; mines live in a
//! global index mirrored by each engineer's bounded placement list.

use serde::{Deserialize, Serialize};

use crate::core::types::{MineId, PerTeam, Team, UnitId};
use crate::game::units::Unit;
use crate::grid::coord::OffsetCoord;

/// A resource site on the map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub position: OffsetCoord,
    pub owner: Option<Team>,
    /// Set once a resource mine has been constructed here
    pub has_mine: bool,
}

impl Resource {
    pub fn new(position: OffsetCoord) -> Self {
        Self {
            position,
            owner: None,
            has_mine: false,
        }
    }
}

/// A mine placed by an engineer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mine {
    pub id: MineId,
    pub position: OffsetCoord,
    /// The engineer that placed it
    pub owner: UnitId,
    pub team: Team,
    pub damage: u32,
    pub placed_turn: u32,
    /// Which factions know this mine exists
    pub revealed: PerTeam<bool>,
}

impl Mine {
    pub fn is_revealed_to(&self, team: Team) -> bool {
        *self.revealed.get(team)
    }

    pub fn reveal_to(&mut self, team: Team) {
        *self.revealed.get_mut(team) = true;
    }
}

/// Global index of every mine in the field
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Minefield {
    mines: Vec<Mine>,
}

impl Minefield {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mine_at(&self, position: OffsetCoord) -> Option<&Mine> {
        self.mines.iter().find(|m| m.position == position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mine> {
        self.mines.iter()
    }

    pub fn len(&self) -> usize {
        self.mines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mines.is_empty()
    }

    /// Place a mine for `engineer`, evicting its oldest if over `cap`
    ///
    /// The new mine is revealed to the placing team immediately. Returns the
    /// new mine's id and the evicted mine's id, if any. The caller has
    /// already validated the tile.
    pub fn place(
        &mut self,
        engineer: &mut Unit,
        position: OffsetCoord,
        damage: u32,
        turn: u32,
        cap: usize,
    ) -> (MineId, Option<MineId>) {
        let mut mine = Mine {
            id: MineId::new(),
            position,
            owner: engineer.id,
            team: engineer.team,
            damage,
            placed_turn: turn,
            revealed: PerTeam::default(),
        };
        mine.reveal_to(engineer.team);

        let id = mine.id;
        self.mines.push(mine);
        engineer.mines.push_back(id);

        let evicted = if engineer.mines.len() > cap {
            engineer.mines.pop_front()
        } else {
            None
        };
        if let Some(old) = evicted {
            self.mines.retain(|m| m.id != old);
        }

        (id, evicted)
    }

    /// Mines a faction currently knows about
    pub fn known_to(&self, team: Team) -> impl Iterator<Item = &Mine> {
        self.mines.iter().filter(move |m| m.is_revealed_to(team))
    }
}
