//! Read-only snapshot for presentation and network adapters
//!
//! Everything a renderer needs to draw the board from one faction's point
//! of view. Mines the viewer has not discovered are omitted; filtering
//! units by fog is the renderer's call, since it has both lists.

use serde::Serialize;

use crate::core::types::{Team, UnitId};
use crate::game::bases::BaseKind;
use crate::game::turn::TurnController;
use crate::game::units::UnitKind;
use crate::grid::coord::OffsetCoord;
use crate::grid::terrain::Terrain;

#[derive(Debug, Clone, Serialize)]
pub struct TileView {
    pub coord: OffsetCoord,
    pub terrain: Terrain,
    pub visible: bool,
    pub explored: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitView {
    pub id: UnitId,
    pub kind: UnitKind,
    pub team: Team,
    pub position: Option<OffsetCoord>,
    pub hp: u32,
    pub ammo: u32,
    pub supply: u32,
    pub has_moved: bool,
    pub building: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BaseView {
    pub kind: BaseKind,
    pub team: Team,
    pub position: Option<OffsetCoord>,
    pub radius: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceView {
    pub position: OffsetCoord,
    pub owner: Option<Team>,
    pub has_mine: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MineView {
    pub position: OffsetCoord,
    pub team: Team,
}

/// One faction's complete picture of the game
#[derive(Debug, Clone, Serialize)]
pub struct GameView {
    pub viewer: Team,
    pub phase: &'static str,
    pub turn: u32,
    pub current_team: Option<Team>,
    pub credits: u32,
    pub tiles: Vec<TileView>,
    pub units: Vec<UnitView>,
    pub bases: Vec<BaseView>,
    pub resources: Vec<ResourceView>,
    pub mines: Vec<MineView>,
    pub selected: Option<UnitId>,
    pub valid_moves: Vec<OffsetCoord>,
    pub valid_attacks: Vec<OffsetCoord>,
}

impl TurnController {
    /// Snapshot the game as seen by `viewer`
    pub fn view(&self, viewer: Team) -> GameView {
        let fog = self.fog.team(viewer);

        GameView {
            viewer,
            phase: self.phase.label(),
            turn: self.turn,
            current_team: self.current_team(),
            credits: self.credits(viewer),
            tiles: self
                .grid
                .tiles()
                .map(|t| TileView {
                    coord: t.coord,
                    terrain: t.terrain,
                    visible: fog.is_visible(t.coord),
                    explored: fog.is_explored(t.coord),
                })
                .collect(),
            units: self
                .units
                .iter()
                .map(|u| UnitView {
                    id: u.id,
                    kind: u.kind,
                    team: u.team,
                    position: u.position,
                    hp: u.hp,
                    ammo: u.ammo,
                    supply: u.supply,
                    has_moved: u.has_moved,
                    building: u.build.is_some(),
                })
                .collect(),
            bases: self
                .bases
                .iter()
                .map(|b| BaseView {
                    kind: b.kind,
                    team: b.team,
                    position: b.position,
                    radius: b.kind.radius(),
                })
                .collect(),
            resources: self
                .resources
                .iter()
                .map(|r| ResourceView {
                    position: r.position,
                    owner: r.owner,
                    has_mine: r.has_mine,
                })
                .collect(),
            mines: self
                .minefield
                .known_to(viewer)
                .map(|m| MineView {
                    position: m.position,
                    team: m.team,
                })
                .collect(),
            selected: self.selected,
            valid_moves: self.valid_moves.iter().copied().collect(),
            valid_attacks: self.valid_attacks.iter().copied().collect(),
        }
    }
}
