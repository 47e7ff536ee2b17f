//! Game rules configuration with documented constants
//!
//! All tunable numbers are collected here with explanations of their purpose
//! and how they interact with each other. A config is built from defaults or
//! parsed from TOML, validated once, then passed explicitly to the systems
//! that need it.

use serde::{Deserialize, Serialize};

use crate::core::error::{GameError, Result};
use crate::core::types::Team;

/// Rules configuration for a single game
///
/// These values have been tuned for a 24x18 map and a five-unit roster.
/// Changing them will affect pacing, attrition pressure, and map control.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    // === MAP ===
    /// Grid width in columns
    pub map_width: i32,

    /// Grid height in rows
    pub map_height: i32,

    /// Seed for map-setup randomness (resource scatter)
    ///
    /// The simulation itself is deterministic; this seed only controls
    /// where resources land during setup.
    pub map_seed: u64,

    /// Number of resource sites scattered on unoccupied land at setup
    pub resource_count: u32,

    // === PLACEMENT ===
    /// Radius in hops of each team's starting area, anchored at its corner
    ///
    /// Placement is legal only inside this region. The same radius grants
    /// unconditional fog visibility around the corner for the whole game.
    pub starting_area_radius: u32,

    /// Unit roster each team places during the placement phase
    ///
    /// Names resolve through the unit-kind table; an unknown name is a
    /// content error and fails game construction.
    pub unit_roster: Vec<String>,

    /// Base roster each team places after its units
    pub base_roster: Vec<String>,

    // === ECONOMY ===
    /// Credits each team starts with
    pub starting_credits: u32,

    /// Credits earned per owned resource site at end of turn
    pub income_per_resource: u32,

    /// Damage taken at end of turn by a unit whose supply was already
    /// exhausted before this turn's consumption
    ///
    /// A unit that reaches zero supply this turn is damaged only from the
    /// following end of turn onward.
    pub attrition_damage: u32,

    // === MINES ===
    /// Maximum mines a single engineer may have in the field
    ///
    /// Placing beyond the cap evicts that engineer's oldest mine.
    pub mine_cap_per_engineer: usize,

    /// Damage dealt by a triggered mine (consumed by the trigger
    /// collaborator, carried here as placement data)
    pub mine_damage: u32,

    /// Credit cost of placing one mine
    pub mine_cost: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            // Map
            map_width: 24,
            map_height: 18,
            map_seed: 7,
            resource_count: 8,

            // Placement
            starting_area_radius: 5,
            unit_roster: vec![
                "infantry".into(),
                "infantry".into(),
                "recon".into(),
                "armor".into(),
                "engineer".into(),
            ],
            base_roster: vec![
                "headquarters".into(),
                "ammo_depot".into(),
                "supply_depot".into(),
                "airbase".into(),
            ],

            // Economy
            starting_credits: 20,
            income_per_resource: 1,
            attrition_damage: 2,

            // Mines
            mine_cap_per_engineer: 3,
            mine_damage: 4,
            mine_cost: 5,
        }
    }
}

impl RulesConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text, falling back to defaults for
    /// omitted fields
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: RulesConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Starting corner for a team, in (col, row)
    ///
    /// Red anchors at the north-west corner, Blue at the south-east.
    pub fn starting_corner(&self, team: Team) -> (i32, i32) {
        match team {
            Team::Red => (0, 0),
            Team::Blue => (self.map_width - 1, self.map_height - 1),
        }
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.map_width < 4 || self.map_height < 4 {
            return Err(GameError::InvalidConfig(format!(
                "map {}x{} is too small (minimum 4x4)",
                self.map_width, self.map_height
            )));
        }

        // Starting areas must not meet in the middle
        let span = self.starting_area_radius as i32 * 2;
        if span >= self.map_width.min(self.map_height) {
            return Err(GameError::InvalidConfig(format!(
                "starting_area_radius {} overlaps opposing areas on a {}x{} map",
                self.starting_area_radius, self.map_width, self.map_height
            )));
        }

        if self.unit_roster.is_empty() {
            return Err(GameError::InvalidConfig("unit_roster is empty".into()));
        }
        if self.base_roster.is_empty() {
            return Err(GameError::InvalidConfig("base_roster is empty".into()));
        }

        if self.attrition_damage == 0 {
            return Err(GameError::InvalidConfig(
                "attrition_damage must be positive".into(),
            ));
        }
        if self.mine_cap_per_engineer == 0 {
            return Err(GameError::InvalidConfig(
                "mine_cap_per_engineer must be positive".into(),
            ));
        }

        Ok(())
    }
}
