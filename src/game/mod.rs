//! Entities, the turn state machine, combat, construction, and economy

pub mod bases;
pub mod build;
pub mod combat;
pub mod economy;
pub mod resources;
pub mod turn;
pub mod units;
pub mod view;

pub use bases::{Base, BaseKind};
pub use build::{BuildOrder, ConstructionTarget};
pub use combat::CombatReport;
pub use economy::{EconomyEvent, Treasury};
pub use resources::{Mine, Minefield, Resource};
pub use turn::{Phase, PlacementSubphase, TurnController};
pub use units::{Unit, UnitKind, UnitStats};
pub use view::GameView;
