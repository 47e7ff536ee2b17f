//! Treasuries and the end-of-turn economy
//!
//! Supply is consumed at the end of each team's turn, starving units take
//! attrition, bases refill what they project, corpses are cleared, and
//! resource income is credited before possession flips.

use serde::{Deserialize, Serialize};

use crate::core::types::{BaseId, Team, UnitId};
use crate::game::turn::{Phase, TurnController};
use crate::grid::coord::OffsetCoord;

/// Per-team credit ledger, non-negative by construction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Treasury {
    credits: u32,
}

impl Treasury {
    pub fn new(credits: u32) -> Self {
        Self { credits }
    }

    pub fn credits(&self) -> u32 {
        self.credits
    }

    /// Deduct `amount` if the balance covers it
    pub fn try_spend(&mut self, amount: u32) -> bool {
        if self.credits < amount {
            return false;
        }
        self.credits -= amount;
        true
    }

    /// Hand back an escrowed deduction
    pub fn refund(&mut self, amount: u32) {
        self.credits += amount;
    }

    pub fn credit(&mut self, amount: u32) {
        self.credits += amount;
    }
}

/// End-of-turn bookkeeping, in resolution order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EconomyEvent {
    SupplyExhausted { unit: UnitId },
    Attrition { unit: UnitId, damage: u32 },
    Resupplied {
        unit: UnitId,
        base: BaseId,
        ammo: bool,
        supply: bool,
    },
    UnitLost { unit: UnitId },
    BuildCompleted { unit: UnitId, site: OffsetCoord },
    BuildRefunded { unit: UnitId, refund: u32 },
    Income { team: Team, amount: u32 },
}

impl TurnController {
    /// End the current team's turn and hand possession to the other side
    ///
    /// Applies, in order: supply consumption, attrition for units that were
    /// already dry, base resupply by plain hop distance, removal of the
    /// fallen, build progress, and resource income. The incoming team's
    /// moved-flags are cleared.
    pub fn end_turn(&mut self) -> Vec<EconomyEvent> {
        let Phase::Playing { team } = self.phase else {
            tracing::debug!("end turn outside playing phase ignored");
            return Vec::new();
        };
        let mut events = Vec::new();

        // Supply consumption; units dry since last turn take attrition
        let attrition = self.config.attrition_damage;
        for unit in self
            .units
            .iter_mut()
            .filter(|u| u.team == team && u.is_placed() && u.is_alive())
        {
            let was_dry = unit.supply == 0;
            unit.supply = unit.supply.saturating_sub(1);
            if unit.supply == 0 && !was_dry {
                events.push(EconomyEvent::SupplyExhausted { unit: unit.id });
            }
            if was_dry {
                unit.take_damage(attrition);
                events.push(EconomyEvent::Attrition {
                    unit: unit.id,
                    damage: attrition,
                });
            }
        }

        // Resupply from every friendly base in hop range. Plain adjacency
        // distance here, not the occupancy-aware query.
        let depots: Vec<(BaseId, OffsetCoord, bool, bool, u32)> = self
            .bases
            .iter()
            .filter(|b| b.team == team)
            .filter_map(|b| {
                b.position.map(|pos| {
                    (
                        b.id,
                        pos,
                        b.kind.provides_ammo(),
                        b.kind.provides_supply(),
                        b.kind.radius(),
                    )
                })
            })
            .collect();
        for (base_id, base_pos, gives_ammo, gives_supply, radius) in depots {
            if !gives_ammo && !gives_supply {
                continue;
            }
            let zone = self.grid.neighbors(base_pos, radius);
            for unit in self
                .units
                .iter_mut()
                .filter(|u| u.team == team && u.is_alive())
            {
                let Some(pos) = unit.position else {
                    continue;
                };
                if pos != base_pos && !zone.contains(&pos) {
                    continue;
                }
                if gives_ammo {
                    unit.refill_ammo();
                }
                if gives_supply {
                    unit.refill_supply();
                }
                events.push(EconomyEvent::Resupplied {
                    unit: unit.id,
                    base: base_id,
                    ammo: gives_ammo,
                    supply: gives_supply,
                });
            }
        }

        // Clear the fallen
        for unit in self.units.iter().filter(|u| !u.is_alive()) {
            events.push(EconomyEvent::UnitLost { unit: unit.id });
            tracing::debug!(unit = ?unit.id, "unit lost to attrition");
        }
        self.units.retain(|u| u.is_alive());

        // Construction advances for the team ending its turn
        events.extend(self.tick_builds(team));

        // Resource income
        let owned = self
            .resources
            .iter()
            .filter(|r| r.owner == Some(team))
            .count() as u32;
        let amount = owned * self.config.income_per_resource;
        if amount > 0 {
            self.treasuries.get_mut(team).credit(amount);
            events.push(EconomyEvent::Income { team, amount });
        }

        // Possession flips
        let next = team.opponent();
        self.turn += 1;
        self.phase = Phase::Playing { team: next };
        for unit in self.units.iter_mut().filter(|u| u.team == next) {
            unit.has_moved = false;
        }
        self.clear_selection();
        tracing::info!(turn = self.turn, ?next, "turn passed");

        events
    }
}
