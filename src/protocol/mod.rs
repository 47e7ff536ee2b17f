//! Host-authoritative intent protocol and session roles

pub mod message;
pub mod session;

pub use message::Message;
pub use session::{ClientSession, ClientState, HostSession, LoopbackLink, StateSummary, Wire};
