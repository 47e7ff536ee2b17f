//! Turn machine integration tests: placement, actions, combat, economy

use hexfront::core::config::RulesConfig;
use hexfront::core::types::Team;
use hexfront::game::bases::{Base, BaseKind};
use hexfront::game::build::ConstructionTarget;
use hexfront::game::resources::Resource;
use hexfront::game::turn::{Phase, PlacementSubphase, TurnController};
use hexfront::game::units::UnitKind;
use hexfront::grid::coord::OffsetCoord;
use hexfront::grid::map::HexGrid;

fn test_config() -> RulesConfig {
    RulesConfig {
        map_width: 20,
        map_height: 14,
        starting_area_radius: 4,
        resource_count: 0,
        unit_roster: vec!["infantry".into(), "engineer".into()],
        // Airbases project neither supply nor ammo, keeping economy
        // scenarios free of accidental resupply
        base_roster: vec!["airbase".into()],
        starting_credits: 40,
        ..RulesConfig::default()
    }
}

/// Run the full placement phase on an open map
fn placed_game() -> TurnController {
    let mut game = TurnController::new(test_config(), HexGrid::new(20, 14)).unwrap();
    // Red: two units, one base
    assert!(game.place(OffsetCoord::new(0, 0)));
    assert!(game.place(OffsetCoord::new(1, 0)));
    assert!(game.place(OffsetCoord::new(0, 1)));
    // Blue: the same in its own corner
    assert!(game.place(OffsetCoord::new(19, 13)));
    assert!(game.place(OffsetCoord::new(18, 13)));
    assert!(game.place(OffsetCoord::new(19, 12)));
    game
}

fn unit_id_at(game: &TurnController, col: i32, row: i32) -> hexfront::core::types::UnitId {
    game.unit_at(OffsetCoord::new(col, row)).unwrap().id
}

#[test]
fn test_placement_order_and_transition() {
    let mut game = TurnController::new(test_config(), HexGrid::new(20, 14)).unwrap();
    assert_eq!(
        game.phase,
        Phase::Placement {
            team: Team::Red,
            subphase: PlacementSubphase::Units
        }
    );

    assert!(game.place(OffsetCoord::new(0, 0)));
    assert!(game.place(OffsetCoord::new(1, 0)));
    assert_eq!(
        game.phase,
        Phase::Placement {
            team: Team::Red,
            subphase: PlacementSubphase::Bases
        }
    );

    assert!(game.place(OffsetCoord::new(0, 1)));
    assert_eq!(
        game.phase,
        Phase::Placement {
            team: Team::Blue,
            subphase: PlacementSubphase::Units
        }
    );

    assert!(game.place(OffsetCoord::new(19, 13)));
    assert!(game.place(OffsetCoord::new(18, 13)));
    assert!(game.place(OffsetCoord::new(19, 12)));

    assert_eq!(game.phase, Phase::Playing { team: Team::Red });
    assert_eq!(game.turn, 1);
    assert!(game.units.iter().all(|u| !u.has_moved));
}

#[test]
fn test_placement_bounds() {
    let mut game = TurnController::new(test_config(), HexGrid::new(20, 14)).unwrap();
    // (5, 2) is five hops from the red corner, one past the radius
    assert_eq!(OffsetCoord::new(0, 0).distance(&OffsetCoord::new(5, 2)), 5);
    assert!(!game.place(OffsetCoord::new(5, 2)));
    // (4, 2) sits exactly on the boundary
    assert_eq!(OffsetCoord::new(0, 0).distance(&OffsetCoord::new(4, 2)), 4);
    assert!(game.place(OffsetCoord::new(4, 2)));
}

#[test]
fn test_placement_rejects_occupied_and_wrong_phase() {
    let mut game = TurnController::new(test_config(), HexGrid::new(20, 14)).unwrap();
    assert!(game.place(OffsetCoord::new(1, 1)));
    // Stacking a second unit on the same tile fails
    assert!(!game.place(OffsetCoord::new(1, 1)));
    assert!(game.place(OffsetCoord::new(2, 1)));

    let mut done = placed_game();
    // Placement after the phase has ended is a no-op
    assert!(!done.place(OffsetCoord::new(2, 2)));
}

#[test]
fn test_selection_lifecycle() {
    let mut game = placed_game();
    let infantry = OffsetCoord::new(0, 0);

    game.select(infantry);
    assert!(game.selected_unit().is_some());
    assert!(!game.valid_moves().is_empty());

    // Re-selecting deselects
    game.select(infantry);
    assert!(game.selected_unit().is_none());
    assert!(game.valid_moves().is_empty());

    // Selecting an enemy clears everything
    game.select(infantry);
    game.select(OffsetCoord::new(19, 13));
    assert!(game.selected_unit().is_none());
    assert!(game.valid_attacks().is_empty());
}

#[test]
fn test_move_marks_unit_and_is_single_action() {
    let mut game = placed_game();
    let id = unit_id_at(&game, 0, 0);

    game.select(OffsetCoord::new(0, 0));
    assert!(game.move_selected(OffsetCoord::new(2, 1)));

    let unit = game.units.iter().find(|u| u.id == id).unwrap();
    assert_eq!(unit.position, Some(OffsetCoord::new(2, 1)));
    assert!(unit.has_moved);

    // A second action this turn is refused, even after re-selecting
    game.select(OffsetCoord::new(2, 1));
    assert!(game.selected_unit().is_none());
    assert!(!game.move_selected(OffsetCoord::new(3, 1)));
}

#[test]
fn test_move_captures_resource() {
    let mut game = placed_game();
    game.resources.push(Resource::new(OffsetCoord::new(2, 1)));

    game.select(OffsetCoord::new(0, 0));
    assert!(game.move_selected(OffsetCoord::new(2, 1)));

    let resource = game.resource_at(OffsetCoord::new(2, 1)).unwrap();
    assert_eq!(resource.owner, Some(Team::Red));
}

#[test]
fn test_kill_and_capture() {
    let mut game = placed_game();
    // Stage a point-blank fight over an unowned resource
    let red = unit_id_at(&game, 0, 0);
    let target = OffsetCoord::new(9, 6);
    game.units
        .iter_mut()
        .find(|u| u.id == red)
        .unwrap()
        .position = Some(OffsetCoord::new(8, 6));
    let blue = unit_id_at(&game, 19, 13);
    {
        let defender = game.units.iter_mut().find(|u| u.id == blue).unwrap();
        defender.position = Some(target);
        defender.hp = 2; // one infantry volley finishes it
    }
    game.resources.push(Resource::new(target));

    game.select(OffsetCoord::new(8, 6));
    let report = game.attack_selected(target).unwrap();

    assert!(report.defender_destroyed);
    assert!(game.units.iter().all(|u| u.id != blue));
    let attacker = game.units.iter().find(|u| u.id == red).unwrap();
    assert_eq!(attacker.position, Some(target));
    assert_eq!(game.resource_at(target).unwrap().owner, Some(Team::Red));
}

#[test]
fn test_attrition_takes_two_turns() {
    let mut game = placed_game();
    let id = unit_id_at(&game, 0, 0);
    let attrition = game.config.attrition_damage;
    {
        let unit = game.units.iter_mut().find(|u| u.id == id).unwrap();
        unit.supply = 1;
    }

    // First end of turn: supply runs dry, no damage yet
    game.end_turn();
    let (hp_full, supply) = {
        let unit = game.units.iter().find(|u| u.id == id).unwrap();
        (unit.hp, unit.supply)
    };
    assert_eq!(supply, 0);
    assert_eq!(hp_full, UnitKind::Infantry.stats().max_hp);

    // Blue's turn passes without touching red units
    game.end_turn();

    // Second red end of turn: the dry unit takes the fixed damage
    game.end_turn();
    let unit = game.units.iter().find(|u| u.id == id).unwrap();
    assert_eq!(unit.hp, hp_full - attrition);
}

#[test]
fn test_resupply_precedence_over_attrition() {
    let mut game = placed_game();
    let id = unit_id_at(&game, 0, 0);
    // Both depot kinds in range of the worn-down unit
    let mut ammo_depot = Base::new(BaseKind::AmmoDepot, Team::Red);
    ammo_depot.position = Some(OffsetCoord::new(1, 1));
    game.bases.push(ammo_depot);
    let mut supply_depot = Base::new(BaseKind::SupplyDepot, Team::Red);
    supply_depot.position = Some(OffsetCoord::new(0, 2));
    game.bases.push(supply_depot);
    {
        let unit = game.units.iter_mut().find(|u| u.id == id).unwrap();
        unit.supply = 0;
        unit.ammo = 0;
    }

    game.end_turn();

    let unit = game.units.iter().find(|u| u.id == id).unwrap();
    // Attrition landed first, then the depots topped everything back up
    assert_eq!(
        unit.hp,
        UnitKind::Infantry.stats().max_hp - game.config.attrition_damage
    );
    assert_eq!(unit.ammo, UnitKind::Infantry.stats().max_ammo);
    assert_eq!(unit.supply, UnitKind::Infantry.stats().max_supply);
}

#[test]
fn test_income_per_owned_resource() {
    let mut game = placed_game();
    let mut owned = Resource::new(OffsetCoord::new(5, 5));
    owned.owner = Some(Team::Red);
    game.resources.push(owned);
    let mut owned_too = Resource::new(OffsetCoord::new(6, 5));
    owned_too.owner = Some(Team::Red);
    game.resources.push(owned_too);
    game.resources.push(Resource::new(OffsetCoord::new(7, 5)));

    let before = game.credits(Team::Red);
    game.end_turn();
    assert_eq!(
        game.credits(Team::Red),
        before + 2 * game.config.income_per_resource
    );
    // Neutral and enemy turns earn red nothing
    let after = game.credits(Team::Red);
    game.end_turn();
    assert_eq!(game.credits(Team::Red), after);
}

#[test]
fn test_build_completes_after_its_turns() {
    let mut game = placed_game();
    let site = OffsetCoord::new(1, 0);

    game.select(site);
    assert!(game.start_build(ConstructionTarget::Base(BaseKind::AmmoDepot)));
    let cost = ConstructionTarget::Base(BaseKind::AmmoDepot).cost();
    assert_eq!(game.credits(Team::Red), 40 - cost);

    // Two of red's turn-ends finish a depot
    game.end_turn(); // red -> blue, one turn of work done
    game.end_turn(); // blue -> red
    assert!(game.base_at(site).is_none());
    game.end_turn(); // red -> blue, work complete
    let base = game.base_at(site).unwrap();
    assert_eq!(base.kind, BaseKind::AmmoDepot);
    assert_eq!(base.team, Team::Red);
    // Escrow was consumed, not refunded
    assert_eq!(game.credits(Team::Red), 40 - cost);
}

#[test]
fn test_build_refunds_when_site_goes_invalid() {
    let mut game = placed_game();
    let site = OffsetCoord::new(1, 0);

    game.select(site);
    assert!(game.start_build(ConstructionTarget::Base(BaseKind::AmmoDepot)));
    let spent = game.credits(Team::Red);

    // Another base claims the site before completion
    let mut squatter = Base::new(BaseKind::SupplyDepot, Team::Red);
    squatter.position = Some(site);
    game.bases.push(squatter);

    game.end_turn();
    game.end_turn();
    game.end_turn();

    // The depot never materialized and the escrow came back
    assert_eq!(game.base_at(site).unwrap().kind, BaseKind::SupplyDepot);
    assert_eq!(
        game.credits(Team::Red),
        spent + ConstructionTarget::Base(BaseKind::AmmoDepot).cost()
    );
}

#[test]
fn test_rejected_actions_conserve_credits() {
    let mut game = placed_game();

    // Build on a tile with no resource
    game.select(OffsetCoord::new(1, 0));
    let before = game.credits(Team::Red);
    assert!(!game.start_build(ConstructionTarget::ResourceMine));
    assert_eq!(game.credits(Team::Red), before);

    // Build the engineer cannot afford
    game.treasuries.get_mut(Team::Red).try_spend(before);
    game.select(OffsetCoord::new(1, 0));
    assert!(!game.start_build(ConstructionTarget::Base(BaseKind::AmmoDepot)));
    assert_eq!(game.credits(Team::Red), 0);

    // Mine the engineer cannot afford
    game.select(OffsetCoord::new(1, 0));
    assert!(!game.place_mine());
    assert_eq!(game.credits(Team::Red), 0);
    assert!(game.minefield.is_empty());
}

#[test]
fn test_resource_mine_built_on_resource_site() {
    let mut game = placed_game();
    let site = OffsetCoord::new(1, 0);
    game.resources.push(Resource::new(site));

    game.select(site);
    assert!(game.start_build(ConstructionTarget::ResourceMine));
    game.end_turn();
    game.end_turn();
    game.end_turn();

    assert!(game.resource_at(site).unwrap().has_mine);
}

#[test]
fn test_engineer_lays_capped_mines() {
    let mut game = placed_game();
    let engineer = unit_id_at(&game, 1, 0);
    let cap = game.config.mine_cap_per_engineer;

    // Lay one mine per red turn, walking east a tile each time
    for i in 0..(cap as i32 + 1) {
        let at = OffsetCoord::new(1 + i, 0);
        game.units
            .iter_mut()
            .find(|u| u.id == engineer)
            .unwrap()
            .position = Some(at);
        game.select(at);
        assert!(game.place_mine());
        // Same tile again is refused
        game.select(at);
        assert!(!game.place_mine());
        game.end_turn();
        game.end_turn();
    }

    // The cap evicted the oldest mine
    assert_eq!(game.minefield.len(), cap);
    assert!(game.minefield.mine_at(OffsetCoord::new(1, 0)).is_none());
    assert!(game
        .minefield
        .mine_at(OffsetCoord::new(1 + cap as i32, 0))
        .is_some());
    // All surviving mines are hidden from blue
    assert_eq!(game.minefield.known_to(Team::Blue).count(), 0);
    assert_eq!(game.minefield.known_to(Team::Red).count(), cap);
}

#[test]
fn test_game_over_freezes_actions() {
    let mut game = placed_game();
    game.set_game_over();
    assert_eq!(game.phase, Phase::GameOver);
    assert_eq!(game.current_team(), None);

    game.select(OffsetCoord::new(0, 0));
    assert!(game.selected_unit().is_none());
    assert!(!game.move_selected(OffsetCoord::new(1, 1)));
    assert!(game.end_turn().is_empty());
}

#[test]
fn test_view_filters_mines_by_viewer() {
    let mut game = placed_game();
    game.select(OffsetCoord::new(1, 0));
    assert!(game.place_mine());
    game.update_fog(&hexfront::fog::UncontestedSkies);

    let red_view = game.view(Team::Red);
    let blue_view = game.view(Team::Blue);
    assert_eq!(red_view.mines.len(), 1);
    assert!(blue_view.mines.is_empty());
    assert_eq!(red_view.tiles.len(), (20 * 14) as usize);
    assert!(red_view.tiles.iter().any(|t| t.visible));

    // Snapshots serialize for the render boundary
    let json = serde_json::to_string(&red_view).unwrap();
    assert!(json.contains("\"phase\":\"playing\""));
}

#[test]
fn test_unknown_roster_name_fails_construction() {
    let config = RulesConfig {
        unit_roster: vec!["infantry".into(), "dragoon".into()],
        ..test_config()
    };
    assert!(TurnController::new(config, HexGrid::new(20, 14)).is_err());
}
