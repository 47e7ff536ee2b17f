//! Host and client session roles
//!
//! The host owns the only authoritative game; clients send intents that the
//! host validates under the same rules as local input, then answers with a
//! state summary. There is no error reply and no client rollback: an intent
//! either takes effect on the host or silently does not.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::core::types::Team;
use crate::game::build::ConstructionTarget;
use crate::game::turn::TurnController;
use crate::grid::coord::OffsetCoord;
use crate::protocol::message::Message;

/// Transport abstraction: one line out, one line in
///
/// Real transports live outside the core; tests and local play use the
/// in-process loopback below.
pub trait Wire {
    fn send(&mut self, line: String);
    fn recv(&mut self) -> Option<String>;
    fn is_connected(&self) -> bool;
}

#[derive(Debug, Default)]
struct LinkState {
    to_host: VecDeque<String>,
    to_client: VecDeque<String>,
    connected: bool,
}

/// An in-process bidirectional link between a host and a client
#[derive(Debug, Clone)]
pub struct LoopbackLink {
    state: Rc<RefCell<LinkState>>,
}

impl LoopbackLink {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(LinkState {
                connected: true,
                ..LinkState::default()
            })),
        }
    }

    pub fn host_end(&self) -> LoopbackWire {
        LoopbackWire {
            state: Rc::clone(&self.state),
            host_side: true,
        }
    }

    pub fn client_end(&self) -> LoopbackWire {
        LoopbackWire {
            state: Rc::clone(&self.state),
            host_side: false,
        }
    }

    /// Drop the connection, as a transport failure would
    pub fn sever(&self) {
        self.state.borrow_mut().connected = false;
    }
}

impl Default for LoopbackLink {
    fn default() -> Self {
        Self::new()
    }
}

/// One endpoint of a [`LoopbackLink`]
#[derive(Debug, Clone)]
pub struct LoopbackWire {
    state: Rc<RefCell<LinkState>>,
    host_side: bool,
}

impl Wire for LoopbackWire {
    fn send(&mut self, line: String) {
        let mut state = self.state.borrow_mut();
        if !state.connected {
            return;
        }
        if self.host_side {
            state.to_client.push_back(line);
        } else {
            state.to_host.push_back(line);
        }
    }

    fn recv(&mut self) -> Option<String> {
        let mut state = self.state.borrow_mut();
        if self.host_side {
            state.to_host.pop_front()
        } else {
            state.to_client.pop_front()
        }
    }

    fn is_connected(&self) -> bool {
        self.state.borrow().connected
    }
}

/// The authoritative end of the connection
pub struct HostSession<W: Wire> {
    wire: W,
    pub client_team: Option<Team>,
}

impl<W: Wire> HostSession<W> {
    pub fn new(wire: W) -> Self {
        Self {
            wire,
            client_team: None,
        }
    }

    /// Tell the joined client the match is starting
    pub fn announce_start(&mut self) {
        self.wire.send(Message::StartGame.encode());
    }

    /// Drain the inbox once, applying each valid intent in arrival order
    ///
    /// Returns how many intents were applied. A lost client is logged and
    /// forgotten; the host keeps listening for the next one.
    pub fn poll(&mut self, game: &mut TurnController) -> usize {
        if self.client_team.is_some() && !self.wire.is_connected() {
            tracing::warn!("client connection lost; host keeps listening");
            self.client_team = None;
        }

        let mut applied = 0;
        while let Some(line) = self.wire.recv() {
            match Message::decode(&line) {
                Some(message) => {
                    if self.apply(game, message) {
                        applied += 1;
                        self.send_sync(game);
                    }
                }
                None => {
                    tracing::debug!(%line, "malformed intent dropped");
                }
            }
        }
        applied
    }

    /// Validate and apply one intent under the normal game rules
    fn apply(&mut self, game: &mut TurnController, message: Message) -> bool {
        match message {
            Message::Join { name } => {
                // A single remote seat: the joiner plays Blue
                self.client_team = Some(Team::Blue);
                self.wire
                    .send(Message::JoinAck { team: Team::Blue }.encode());
                tracing::info!(%name, "client joined as blue");
                true
            }
            Message::PlaceRequest { team, col, row } => {
                self.from_client(team, game)
                    && game.place(OffsetCoord::new(col, row))
            }
            Message::MoveRequest {
                team,
                from_col,
                from_row,
                to_col,
                to_row,
            } => {
                if !self.from_client(team, game) {
                    return false;
                }
                game.select(OffsetCoord::new(from_col, from_row));
                let moved = game.move_selected(OffsetCoord::new(to_col, to_row));
                game.clear_selection();
                moved
            }
            Message::AttackRequest {
                team,
                from_col,
                from_row,
                at_col,
                at_row,
            } => {
                if !self.from_client(team, game) {
                    return false;
                }
                game.select(OffsetCoord::new(from_col, from_row));
                let hit = game
                    .attack_selected(OffsetCoord::new(at_col, at_row))
                    .is_some();
                game.clear_selection();
                hit
            }
            Message::StartBuildingRequest {
                team,
                col,
                row,
                building,
            } => {
                if !self.from_client(team, game) {
                    return false;
                }
                let Ok(target) = ConstructionTarget::from_name(&building) else {
                    tracing::debug!(%building, "unknown build target dropped");
                    return false;
                };
                game.select(OffsetCoord::new(col, row));
                let started = game.start_build(target);
                game.clear_selection();
                started
            }
            Message::PlaceMineRequest { team, col, row } => {
                if !self.from_client(team, game) {
                    return false;
                }
                game.select(OffsetCoord::new(col, row));
                let placed = game.place_mine();
                game.clear_selection();
                placed
            }
            Message::EndTurnRequest { team } => {
                if !self.from_client(team, game) {
                    return false;
                }
                game.end_turn();
                true
            }
            // Host-to-client traffic arriving here is noise
            Message::JoinAck { .. } | Message::StartGame | Message::StateSync { .. } => {
                tracing::debug!("unexpected message direction dropped");
                false
            }
        }
    }

    /// An intent is honored only for the joined client's own team, and only
    /// when that team holds the initiative
    fn from_client(&self, team: Team, game: &TurnController) -> bool {
        self.client_team == Some(team) && game.current_team() == Some(team)
    }

    fn send_sync(&mut self, game: &TurnController) {
        self.wire.send(
            Message::StateSync {
                turn: game.turn,
                phase: game.phase.label().to_string(),
                current_team: game.current_team(),
                red_credits: game.credits(Team::Red),
                blue_credits: game.credits(Team::Blue),
            }
            .encode(),
        );
    }
}

/// The last state summary confirmed by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSummary {
    pub turn: u32,
    pub phase: String,
    pub current_team: Option<Team>,
    pub red_credits: u32,
    pub blue_credits: u32,
}

/// Connection lifecycle of the non-authoritative end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Connecting,
    Joined(Team),
    /// Terminal: a client-side disconnect ends the session
    Closed,
}

/// The non-authoritative end of the connection
///
/// Requests are speculative; only a host `state_sync` confirms anything.
pub struct ClientSession<W: Wire> {
    wire: W,
    pub state: ClientState,
    pub last_sync: Option<StateSummary>,
}

impl<W: Wire> ClientSession<W> {
    pub fn new(wire: W) -> Self {
        Self {
            wire,
            state: ClientState::Connecting,
            last_sync: None,
        }
    }

    pub fn team(&self) -> Option<Team> {
        match self.state {
            ClientState::Joined(team) => Some(team),
            _ => None,
        }
    }

    pub fn join(&mut self, name: &str) {
        self.wire.send(
            Message::Join {
                name: name.to_string(),
            }
            .encode(),
        );
    }

    fn request(&mut self, message: Message) {
        if matches!(self.state, ClientState::Closed) {
            return;
        }
        self.wire.send(message.encode());
    }

    pub fn request_place(&mut self, team: Team, col: i32, row: i32) {
        self.request(Message::PlaceRequest { team, col, row });
    }

    pub fn request_move(&mut self, team: Team, from: OffsetCoord, to: OffsetCoord) {
        self.request(Message::MoveRequest {
            team,
            from_col: from.col,
            from_row: from.row,
            to_col: to.col,
            to_row: to.row,
        });
    }

    pub fn request_attack(&mut self, team: Team, from: OffsetCoord, at: OffsetCoord) {
        self.request(Message::AttackRequest {
            team,
            from_col: from.col,
            from_row: from.row,
            at_col: at.col,
            at_row: at.row,
        });
    }

    pub fn request_start_building(&mut self, team: Team, at: OffsetCoord, building: &str) {
        self.request(Message::StartBuildingRequest {
            team,
            col: at.col,
            row: at.row,
            building: building.to_string(),
        });
    }

    pub fn request_place_mine(&mut self, team: Team, at: OffsetCoord) {
        self.request(Message::PlaceMineRequest {
            team,
            col: at.col,
            row: at.row,
        });
    }

    pub fn request_end_turn(&mut self, team: Team) {
        self.request(Message::EndTurnRequest { team });
    }

    /// Drain host traffic once; returns how many messages were handled
    pub fn poll(&mut self) -> usize {
        if !self.wire.is_connected() && self.state != ClientState::Closed {
            tracing::warn!("connection to host lost; session closed");
            self.state = ClientState::Closed;
            return 0;
        }

        let mut handled = 0;
        while let Some(line) = self.wire.recv() {
            match Message::decode(&line) {
                Some(Message::JoinAck { team }) => {
                    self.state = ClientState::Joined(team);
                    tracing::info!(?team, "joined game");
                    handled += 1;
                }
                Some(Message::StartGame) => {
                    tracing::info!("host started the game");
                    handled += 1;
                }
                Some(Message::StateSync {
                    turn,
                    phase,
                    current_team,
                    red_credits,
                    blue_credits,
                }) => {
                    self.last_sync = Some(StateSummary {
                        turn,
                        phase,
                        current_team,
                        red_credits,
                        blue_credits,
                    });
                    handled += 1;
                }
                Some(_) => {
                    tracing::debug!(%line, "unexpected message direction dropped");
                }
                None => {
                    tracing::debug!(%line, "malformed message dropped");
                }
            }
        }
        handled
    }
}
