//! Hexfront - Entry Point
//!
//! A headless host loop for driving the simulation from a terminal: place
//! the rosters, then move, fight, build, and pass turns. Terrain comes from
//! a small seeded generator standing in for the real one.

use std::io::{self, Write};

use hexfront::core::config::RulesConfig;
use hexfront::core::error::Result;
use hexfront::core::types::Team;
use hexfront::fog::UncontestedSkies;
use hexfront::game::build::ConstructionTarget;
use hexfront::game::turn::TurnController;
use hexfront::grid::coord::OffsetCoord;
use hexfront::grid::map::HexGrid;
use hexfront::grid::terrain::Terrain;

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("hexfront=debug")
        .init();

    tracing::info!("Hexfront starting...");

    let config = RulesConfig::default();
    let grid = generate_terrain(config.map_width, config.map_height, config.map_seed);
    let mut game = TurnController::new(config, grid)?;
    game.update_fog(&UncontestedSkies);

    println!("\n=== HEXFRONT ===");
    println!("A turn-based hex wargame simulation core");
    println!();
    println!("Commands:");
    println!("  place <col> <row>    - Place the next unit or base");
    println!("  select <col> <row>   - Select a unit and show its options");
    println!("  move <col> <row>     - Move the selected unit");
    println!("  attack <col> <row>   - Attack with the selected unit");
    println!("  build <target>       - Start building on the engineer's tile");
    println!("  mine                 - Lay a mine on the engineer's tile");
    println!("  end                  - End the current turn");
    println!("  status / s           - Show the board summary");
    println!("  fog                  - Show the current team's fog counters");
    println!("  over                 - End the game");
    println!("  quit / q             - Exit");
    println!();

    loop {
        display_status(&game);

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "q" {
            break;
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        match parts.as_slice() {
            ["place", col, row] => {
                if let Some(coord) = parse_coord(col, row) {
                    if !game.place(coord) {
                        println!("Cannot place there.");
                    }
                } else {
                    println!("Usage: place <col> <row>");
                }
            }
            ["select", col, row] => {
                if let Some(coord) = parse_coord(col, row) {
                    game.select(coord);
                    match game.selected_unit() {
                        Some(unit) => println!(
                            "Selected {} ({} moves, {} attacks possible)",
                            unit.kind.name(),
                            game.valid_moves().len(),
                            game.valid_attacks().len()
                        ),
                        None => println!("Nothing selected."),
                    }
                } else {
                    println!("Usage: select <col> <row>");
                }
            }
            ["move", col, row] => {
                if let Some(coord) = parse_coord(col, row) {
                    if !game.move_selected(coord) {
                        println!("Illegal move.");
                    }
                } else {
                    println!("Usage: move <col> <row>");
                }
            }
            ["attack", col, row] => {
                if let Some(coord) = parse_coord(col, row) {
                    match game.attack_selected(coord) {
                        Some(report) if report.defender_destroyed => {
                            println!("Target destroyed, attacker advanced.")
                        }
                        Some(report) => println!("Hit for {} damage.", report.damage),
                        None => println!("Illegal attack."),
                    }
                } else {
                    println!("Usage: attack <col> <row>");
                }
            }
            ["build", target] => match ConstructionTarget::from_name(target) {
                Ok(target) => {
                    if game.start_build(target) {
                        println!("Construction started.");
                    } else {
                        println!("Cannot build that here.");
                    }
                }
                Err(_) => println!(
                    "Unknown target. Try: headquarters, ammo_depot, supply_depot, airbase, resource_mine"
                ),
            },
            ["mine"] => {
                if game.place_mine() {
                    println!("Mine laid.");
                } else {
                    println!("Cannot lay a mine here.");
                }
            }
            ["end"] => {
                let events = game.end_turn();
                println!("Turn ended ({} economy events).", events.len());
            }
            ["status"] | ["s"] => display_detailed_status(&game),
            ["fog"] => {
                if let Some(team) = game.current_team() {
                    let fog = game.fog.team(team);
                    println!(
                        "{:?} sees {} tiles, has explored {}.",
                        team,
                        fog.visible.len(),
                        fog.explored.len()
                    );
                } else {
                    println!("No active team.");
                }
            }
            ["over"] => game.set_game_over(),
            _ => println!("Unknown command."),
        }

        game.update_fog(&UncontestedSkies);
    }

    println!(
        "\nGoodbye! Final state: {} units on the board, turn {}.",
        game.units.iter().filter(|u| u.is_placed()).count(),
        game.turn
    );
    Ok(())
}

fn parse_coord(col: &str, row: &str) -> Option<OffsetCoord> {
    Some(OffsetCoord::new(col.parse().ok()?, row.parse().ok()?))
}

/// Stand-in terrain generator: seeded hash noise over the grid
fn generate_terrain(width: i32, height: i32, seed: u64) -> HexGrid {
    let mut grid = HexGrid::new(width, height);
    for col in 0..width {
        for row in 0..height {
            let hash = simple_hash(col, row, seed);
            let terrain = match hash % 10 {
                0..=5 => Terrain::Plains,
                6 => Terrain::Forest,
                7 => Terrain::Hills,
                8 => Terrain::Water,
                _ => Terrain::Mountains,
            };
            grid.set_terrain(OffsetCoord::new(col, row), terrain);
        }
    }
    // Keep both starting corners open
    for corner in [
        OffsetCoord::new(0, 0),
        OffsetCoord::new(width - 1, height - 1),
    ] {
        grid.set_terrain(corner, Terrain::Plains);
        for coord in corner.neighbors() {
            grid.set_terrain(coord, Terrain::Plains);
        }
    }
    grid
}

fn simple_hash(col: i32, row: i32, seed: u64) -> u64 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(col as u64);
    h = h.wrapping_mul(31).wrapping_add(row as u64);
    h ^ (h >> 16)
}

/// Display a brief status summary
fn display_status(game: &TurnController) {
    println!();
    match game.current_team() {
        Some(team) => println!(
            "--- {} | Turn {} | {:?} to act | {} credits ---",
            game.phase.label(),
            game.turn,
            team,
            game.credits(team)
        ),
        None => println!("--- {} ---", game.phase.label()),
    }
}

/// Display detailed status of the board
fn display_detailed_status(game: &TurnController) {
    println!();
    println!("=== Board (turn {}) ===", game.turn);
    for team in Team::both() {
        println!("{:?} - {} credits", team, game.credits(team));
        for unit in game.units.iter().filter(|u| u.team == team) {
            let at = match unit.position {
                Some(coord) => format!("({}, {})", coord.col, coord.row),
                None => "unplaced".to_string(),
            };
            println!(
                "  {} {} hp={} ammo={} supply={}{}{}",
                unit.kind.name(),
                at,
                unit.hp,
                unit.ammo,
                unit.supply,
                if unit.has_moved { " moved" } else { "" },
                if unit.build.is_some() { " building" } else { "" },
            );
        }
        for base in game.bases.iter().filter(|b| b.team == team) {
            let at = match base.position {
                Some(coord) => format!("({}, {})", coord.col, coord.row),
                None => "unplaced".to_string(),
            };
            println!("  {} {}", base.kind.name(), at);
        }
    }
    let owned: Vec<String> = game
        .resources
        .iter()
        .map(|r| {
            format!(
                "({}, {}) {}",
                r.position.col,
                r.position.row,
                match r.owner {
                    Some(team) => format!("{team:?}"),
                    None => "neutral".to_string(),
                }
            )
        })
        .collect();
    println!("Resources: {}", owned.join(", "));
    println!();
}
