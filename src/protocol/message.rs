//! Intent and sync messages with a key=value wire codec
//!
//! Every record is a single line of `key=value` fields led by a `type`
//! discriminator. Decoding is total: anything malformed yields `None` and
//! the sessions drop it without a reply.

use ahash::AHashMap;
use std::fmt::Write as _;
use std::str::FromStr;

use crate::core::types::Team;

/// A message on the host/client boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Join {
        name: String,
    },
    JoinAck {
        team: Team,
    },
    StartGame,
    PlaceRequest {
        team: Team,
        col: i32,
        row: i32,
    },
    MoveRequest {
        team: Team,
        from_col: i32,
        from_row: i32,
        to_col: i32,
        to_row: i32,
    },
    AttackRequest {
        team: Team,
        from_col: i32,
        from_row: i32,
        at_col: i32,
        at_row: i32,
    },
    StartBuildingRequest {
        team: Team,
        col: i32,
        row: i32,
        building: String,
    },
    PlaceMineRequest {
        team: Team,
        col: i32,
        row: i32,
    },
    EndTurnRequest {
        team: Team,
    },
    StateSync {
        turn: u32,
        phase: String,
        current_team: Option<Team>,
        red_credits: u32,
        blue_credits: u32,
    },
}

/// Parsed key=value fields of one record
struct Record<'a> {
    fields: AHashMap<&'a str, &'a str>,
}

impl<'a> Record<'a> {
    /// Every whitespace-separated token must be `key=value`
    fn parse(line: &'a str) -> Option<Record<'a>> {
        let mut fields = AHashMap::new();
        for token in line.split_whitespace() {
            let (key, value) = token.split_once('=')?;
            if key.is_empty() {
                return None;
            }
            fields.insert(key, value);
        }
        if fields.contains_key("type") {
            Some(Record { fields })
        } else {
            None
        }
    }

    fn text(&self, key: &str) -> Option<&'a str> {
        self.fields.get(key).copied()
    }

    fn num<T: FromStr>(&self, key: &str) -> Option<T> {
        self.text(key)?.parse().ok()
    }

    fn team(&self, key: &str) -> Option<Team> {
        Team::from_wire(self.num(key)?)
    }
}

impl Message {
    /// Serialize to one wire line
    pub fn encode(&self) -> String {
        let mut out = String::new();
        match self {
            Message::Join { name } => {
                let _ = write!(out, "type=join name={name}");
            }
            Message::JoinAck { team } => {
                let _ = write!(out, "type=join_ack team={}", team.to_wire());
            }
            Message::StartGame => out.push_str("type=start_game"),
            Message::PlaceRequest { team, col, row } => {
                let _ = write!(
                    out,
                    "type=place_request team={} col={col} row={row}",
                    team.to_wire()
                );
            }
            Message::MoveRequest {
                team,
                from_col,
                from_row,
                to_col,
                to_row,
            } => {
                let _ = write!(
                    out,
                    "type=move_request team={} from_col={from_col} from_row={from_row} to_col={to_col} to_row={to_row}",
                    team.to_wire()
                );
            }
            Message::AttackRequest {
                team,
                from_col,
                from_row,
                at_col,
                at_row,
            } => {
                let _ = write!(
                    out,
                    "type=attack_request team={} from_col={from_col} from_row={from_row} at_col={at_col} at_row={at_row}",
                    team.to_wire()
                );
            }
            Message::StartBuildingRequest {
                team,
                col,
                row,
                building,
            } => {
                let _ = write!(
                    out,
                    "type=start_building_request team={} col={col} row={row} building={building}",
                    team.to_wire()
                );
            }
            Message::PlaceMineRequest { team, col, row } => {
                let _ = write!(
                    out,
                    "type=place_mine_request team={} col={col} row={row}",
                    team.to_wire()
                );
            }
            Message::EndTurnRequest { team } => {
                let _ = write!(out, "type=end_turn_request team={}", team.to_wire());
            }
            Message::StateSync {
                turn,
                phase,
                current_team,
                red_credits,
                blue_credits,
            } => {
                let team = current_team.map(Team::to_wire).unwrap_or(0);
                let _ = write!(
                    out,
                    "type=state_sync turn={turn} phase={phase} team={team} red_credits={red_credits} blue_credits={blue_credits}"
                );
            }
        }
        out
    }

    /// Parse one wire line; malformed input is `None`, never an error
    pub fn decode(line: &str) -> Option<Message> {
        let record = Record::parse(line)?;
        match record.text("type")? {
            "join" => Some(Message::Join {
                name: record.text("name")?.to_string(),
            }),
            "join_ack" => Some(Message::JoinAck {
                team: record.team("team")?,
            }),
            "start_game" => Some(Message::StartGame),
            "place_request" => Some(Message::PlaceRequest {
                team: record.team("team")?,
                col: record.num("col")?,
                row: record.num("row")?,
            }),
            "move_request" => Some(Message::MoveRequest {
                team: record.team("team")?,
                from_col: record.num("from_col")?,
                from_row: record.num("from_row")?,
                to_col: record.num("to_col")?,
                to_row: record.num("to_row")?,
            }),
            "attack_request" => Some(Message::AttackRequest {
                team: record.team("team")?,
                from_col: record.num("from_col")?,
                from_row: record.num("from_row")?,
                at_col: record.num("at_col")?,
                at_row: record.num("at_row")?,
            }),
            "start_building_request" => Some(Message::StartBuildingRequest {
                team: record.team("team")?,
                col: record.num("col")?,
                row: record.num("row")?,
                building: record.text("building")?.to_string(),
            }),
            "place_mine_request" => Some(Message::PlaceMineRequest {
                team: record.team("team")?,
                col: record.num("col")?,
                row: record.num("row")?,
            }),
            "end_turn_request" => Some(Message::EndTurnRequest {
                team: record.team("team")?,
            }),
            "state_sync" => Some(Message::StateSync {
                turn: record.num("turn")?,
                phase: record.text("phase")?.to_string(),
                current_team: match record.num::<u8>("team")? {
                    0 => None,
                    n => Some(Team::from_wire(n)?),
                },
                red_credits: record.num("red_credits")?,
                blue_credits: record.num("blue_credits")?,
            }),
            _ => None,
        }
    }
}
