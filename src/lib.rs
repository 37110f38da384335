//! Turn-based two-player grid combat on an odd-column-shifted grid.
//!
//! Callers submit tagged moves to a [`GameEngine`]; each move is checked
//! against the ruleset's move table and, when legal, applied to the players'
//! boards. Every submission answers with a [`MoveResult`] carrying a full
//! [`GameState`] snapshot.

mod board;
mod common;
mod config;
mod game;
pub mod geometry;
mod logging;
mod player;
pub mod protocol;
pub mod rules;
#[cfg(feature = "service")]
pub mod service;
mod ship;
mod tile;

pub use board::*;
pub use common::*;
pub use config::*;
pub use game::*;
pub use geometry::{Angle, Position};
pub use logging::{init_logging, LogFilter};
pub use player::*;
pub use protocol::{Move, MoveField, MoveResult, MoveType};
#[cfg(feature = "service")]
pub use protocol::GameApi;
pub use rules::{MoveRule, Ruleset, Targeting};
#[cfg(feature = "service")]
pub use service::EngineHandle;
pub use ship::*;
pub use tile::*;
