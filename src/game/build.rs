//! Engineer construction and mine placement
//!
//! Builds span several turns. The cost is escrowed up front and either
//! consumed by completion or refunded when the site has gone invalid.

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::Team;
use crate::game::bases::{Base, BaseKind};
use crate::game::economy::EconomyEvent;
use crate::game::turn::{Phase, TurnController};
use crate::grid::coord::OffsetCoord;

/// What an engineer can construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstructionTarget {
    Base(BaseKind),
    /// Extraction works on a resource site
    ResourceMine,
}

impl ConstructionTarget {
    /// Credit cost, escrowed when the build starts
    pub fn cost(&self) -> u32 {
        match self {
            ConstructionTarget::Base(BaseKind::Headquarters) => 25,
            ConstructionTarget::Base(BaseKind::AmmoDepot) => 12,
            ConstructionTarget::Base(BaseKind::SupplyDepot) => 12,
            ConstructionTarget::Base(BaseKind::Airbase) => 20,
            ConstructionTarget::ResourceMine => 15,
        }
    }

    /// Turns of work until completion
    pub fn build_turns(&self) -> u32 {
        match self {
            ConstructionTarget::Base(BaseKind::Headquarters) => 4,
            ConstructionTarget::Base(BaseKind::AmmoDepot) => 2,
            ConstructionTarget::Base(BaseKind::SupplyDepot) => 2,
            ConstructionTarget::Base(BaseKind::Airbase) => 3,
            ConstructionTarget::ResourceMine => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConstructionTarget::Base(kind) => kind.name(),
            ConstructionTarget::ResourceMine => "resource_mine",
        }
    }

    /// Resolve a target from content or wire data
    pub fn from_name(name: &str) -> Result<ConstructionTarget> {
        if name == "resource_mine" {
            return Ok(ConstructionTarget::ResourceMine);
        }
        BaseKind::from_name(name).map(ConstructionTarget::Base)
    }
}

/// An in-progress build carried by its engineer
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BuildOrder {
    pub target: ConstructionTarget,
    pub site: OffsetCoord,
    pub turns_left: u32,
    /// Credits to hand back if the site goes invalid
    pub escrow: u32,
}

impl TurnController {
    /// Start a build with the selected engineer on its own tile
    ///
    /// Deducts the cost immediately; starting marks the engineer as having
    /// acted this turn.
    pub fn start_build(&mut self, target: ConstructionTarget) -> bool {
        let Phase::Playing { team } = self.phase else {
            return false;
        };
        let Some((id, site)) = self.selected_unit().and_then(|u| {
            if u.team == team && u.stats().can_build && !u.has_moved && u.build.is_none() {
                u.position.map(|p| (u.id, p))
            } else {
                None
            }
        }) else {
            tracing::debug!("build request without a ready engineer ignored");
            return false;
        };

        if !self.build_site_valid(site, target) {
            tracing::debug!(?site, target = target.name(), "build site invalid");
            return false;
        }

        let cost = target.cost();
        if !self.treasuries.get_mut(team).try_spend(cost) {
            tracing::debug!(cost, ?team, "insufficient credits for build");
            return false;
        }

        let Some(idx) = self.unit_index(id) else {
            self.treasuries.get_mut(team).refund(cost);
            return false;
        };
        self.units[idx].build = Some(BuildOrder {
            target,
            site,
            turns_left: target.build_turns(),
            escrow: cost,
        });
        self.units[idx].has_moved = true;
        self.clear_selection();
        tracing::debug!(?site, target = target.name(), ?team, "build started");
        true
    }

    /// Can `target` (still) be built on `site`?
    pub(crate) fn build_site_valid(&self, site: OffsetCoord, target: ConstructionTarget) -> bool {
        let on_land = self.grid.tile(site).map(|t| t.is_land()).unwrap_or(false);
        if !on_land {
            return false;
        }
        match target {
            ConstructionTarget::Base(_) => self.base_at(site).is_none(),
            ConstructionTarget::ResourceMine => self
                .resource_at(site)
                .map(|r| !r.has_mine)
                .unwrap_or(false),
        }
    }

    /// Advance the ending team's builds by one turn of work
    pub(crate) fn tick_builds(&mut self, team: Team) -> Vec<EconomyEvent> {
        let mut events = Vec::new();

        for idx in 0..self.units.len() {
            if self.units[idx].team != team {
                continue;
            }
            let finished = match &mut self.units[idx].build {
                Some(order) => {
                    order.turns_left -= 1;
                    order.turns_left == 0
                }
                None => false,
            };
            if !finished {
                continue;
            }

            let unit_id = self.units[idx].id;
            let Some(order) = self.units[idx].build.take() else {
                continue;
            };

            if self.build_site_valid(order.site, order.target) {
                match order.target {
                    ConstructionTarget::Base(kind) => {
                        let mut base = Base::new(kind, team);
                        base.position = Some(order.site);
                        self.bases.push(base);
                    }
                    ConstructionTarget::ResourceMine => {
                        if let Some(resource) = self
                            .resources
                            .iter_mut()
                            .find(|r| r.position == order.site)
                        {
                            resource.has_mine = true;
                        }
                    }
                }
                tracing::debug!(site = ?order.site, target = order.target.name(), "build completed");
                events.push(EconomyEvent::BuildCompleted {
                    unit: unit_id,
                    site: order.site,
                });
            } else {
                self.treasuries.get_mut(team).refund(order.escrow);
                tracing::debug!(site = ?order.site, refund = order.escrow, "build site lost, cost refunded");
                events.push(EconomyEvent::BuildRefunded {
                    unit: unit_id,
                    refund: order.escrow,
                });
            }
        }

        events
    }

    /// Place a mine with the selected engineer on its own tile
    pub fn place_mine(&mut self) -> bool {
        let Phase::Playing { team } = self.phase else {
            return false;
        };
        let Some((id, site)) = self.selected_unit().and_then(|u| {
            if u.team == team && u.stats().can_build {
                u.position.map(|p| (u.id, p))
            } else {
                None
            }
        }) else {
            tracing::debug!("mine request without an engineer ignored");
            return false;
        };

        let on_land = self.grid.tile(site).map(|t| t.is_land()).unwrap_or(false);
        if !on_land || self.minefield.mine_at(site).is_some() {
            tracing::debug!(?site, "mine site invalid");
            return false;
        }
        if !self.treasuries.get_mut(team).try_spend(self.config.mine_cost) {
            tracing::debug!(?team, "insufficient credits for mine");
            return false;
        }

        let Some(idx) = self.unit_index(id) else {
            self.treasuries.get_mut(team).refund(self.config.mine_cost);
            return false;
        };
        let turn = self.turn;
        let (mine, evicted) = self.minefield.place(
            &mut self.units[idx],
            site,
            self.config.mine_damage,
            turn,
            self.config.mine_cap_per_engineer,
        );
        tracing::debug!(?site, ?mine, ?evicted, ?team, "mine placed");
        true
    }
}
