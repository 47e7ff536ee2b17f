//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub Uuid);

impl UnitId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UnitId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for bases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaseId(pub Uuid);

impl BaseId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BaseId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for placed mines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MineId(pub Uuid);

impl MineId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MineId {
    fn default() -> Self {
        Self::new()
    }
}

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// One of the two playing factions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    /// The opposing faction
    pub fn opponent(self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    /// Wire encoding (1-based, matches the intent contract)
    pub fn to_wire(self) -> u8 {
        match self {
            Team::Red => 1,
            Team::Blue => 2,
        }
    }

    /// Decode from the wire encoding
    pub fn from_wire(value: u8) -> Option<Team> {
        match value {
            1 => Some(Team::Red),
            2 => Some(Team::Blue),
            _ => None,
        }
    }

    /// Both factions, in turn order
    pub fn both() -> [Team; 2] {
        [Team::Red, Team::Blue]
    }
}

/// A value held separately for each faction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerTeam<T> {
    pub red: T,
    pub blue: T,
}

impl<T> PerTeam<T> {
    pub fn new(red: T, blue: T) -> Self {
        Self { red, blue }
    }

    pub fn get(&self, team: Team) -> &T {
        match team {
            Team::Red => &self.red,
            Team::Blue => &self.blue,
        }
    }

    pub fn get_mut(&mut self, team: Team) -> &mut T {
        match team {
            Team::Red => &mut self.red,
            Team::Blue => &mut self.blue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_id_uniqueness() {
        let a = UnitId::new();
        let b = UnitId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_team_opponent_involution() {
        assert_eq!(Team::Red.opponent(), Team::Blue);
        assert_eq!(Team::Blue.opponent(), Team::Red);
        assert_eq!(Team::Red.opponent().opponent(), Team::Red);
    }

    #[test]
    fn test_team_wire_round_trip() {
        for team in Team::both() {
            assert_eq!(Team::from_wire(team.to_wire()), Some(team));
        }
        assert_eq!(Team::from_wire(0), None);
        assert_eq!(Team::from_wire(3), None);
    }

    #[test]
    fn test_unit_id_hash() {
        use std::collections::HashMap;
        let id = UnitId::new();
        let mut map: HashMap<UnitId, &str> = HashMap::new();
        map.insert(id, "rifles");
        assert_eq!(map.get(&id), Some(&"rifles"));
    }
}
