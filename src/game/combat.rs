//! Attack resolution
//!
//! One action per unit per turn: an attack marks the attacker as moved
//! whether or not the defender survives. Damage is deterministic.

use serde::{Deserialize, Serialize};

use crate::core::types::UnitId;
use crate::game::turn::{Phase, TurnController};
use crate::grid::coord::OffsetCoord;

/// What an attack did
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CombatReport {
    pub attacker: UnitId,
    pub defender: UnitId,
    pub damage: u32,
    pub defender_destroyed: bool,
    /// True when the attacker advanced onto the vacated tile
    pub attacker_advanced: bool,
}

impl TurnController {
    /// Resolve an attack by the selected unit against `target`
    ///
    /// Legal only when `target` is in the precomputed attack set and the
    /// attacker still has ammo; otherwise a silent no-op.
    pub fn attack_selected(&mut self, target: OffsetCoord) -> Option<CombatReport> {
        let Phase::Playing { team } = self.phase else {
            return None;
        };
        let attacker_id = self.selected?;
        if !self.valid_attacks.contains(&target) {
            tracing::debug!(?target, "attack outside legal set ignored");
            return None;
        }

        let attacker_idx = self.unit_index(attacker_id)?;
        {
            let attacker = &self.units[attacker_idx];
            if attacker.team != team
                || attacker.has_moved
                || !attacker.is_alive()
                || attacker.ammo == 0
            {
                tracing::debug!(?target, "attacker cannot act");
                return None;
            }
        }
        let defender_id = {
            let defender = self.unit_at(target)?;
            if defender.team == team {
                return None;
            }
            defender.id
        };

        let (damage, can_capture) = {
            let attacker = &mut self.units[attacker_idx];
            attacker.ammo -= 1;
            attacker.has_moved = true;
            (attacker.stats().damage, attacker.stats().can_capture)
        };

        let defender_idx = self.unit_index(defender_id)?;
        self.units[defender_idx].take_damage(damage);
        let destroyed = !self.units[defender_idx].is_alive();

        if destroyed {
            self.units.retain(|u| u.id != defender_id);
            // Advance onto the vacated tile, claiming whatever sits there
            let attacker_idx = self.unit_index(attacker_id)?;
            self.units[attacker_idx].position = Some(target);
            self.capture_resource(target, team, can_capture);
            tracing::debug!(?target, ?team, "defender destroyed, attacker advanced");
        } else {
            tracing::debug!(?target, ?team, damage, "defender held");
        }

        self.clear_selection();
        Some(CombatReport {
            attacker: attacker_id,
            defender: defender_id,
            damage,
            defender_destroyed: destroyed,
            attacker_advanced: destroyed,
        })
    }
}
