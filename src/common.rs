//! Common types for hexfleet: identifiers and the error taxonomy.

use core::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::game::Phase;
use crate::geometry::Position;
use crate::protocol::MoveType;

/// Errors that reject an argument outright or expose a broken invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Malformed position, angle, count or construction input.
    #[error("invalid argument(s): {0}")]
    InvalidArgument(String),
    /// State the engine should never be able to reach.
    #[error("internal consistency error: {0}")]
    InternalConsistency(String),
}

/// Reason a board refuses to commit a ship.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    /// The ship belongs to a different board.
    #[error("ship {ship} is owned by another Board ({owner})")]
    NotOwned { ship: ShipId, owner: PlayerId },
    /// The ship was never positioned.
    #[error("ship {0} has no position: null")]
    Unpositioned(ShipId),
    /// At least one segment lies outside the grid.
    #[error("ship {0} has a position outside the board")]
    OutOfBounds(ShipId),
    /// The ship overlaps an already placed ship.
    #[error("ship {ship} collides with placed ship {other} at position {at}")]
    Collision {
        ship: ShipId,
        other: ShipId,
        at: Position,
    },
}

/// Validation failures reported back to the submitter of a move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("malformed move: {0}")]
    Malformed(String),
    #[error("invalid move type: {0}")]
    UnknownMoveType(String),
    #[error("missing move data for move {move_type}: {}", .fields.join(", "))]
    MissingFields {
        move_type: MoveType,
        fields: Vec<String>,
    },
    #[error("extra move data for move {move_type}: {}", .fields.join(", "))]
    ExtraFields {
        move_type: MoveType,
        fields: Vec<String>,
    },
    #[error("unknown player: {0}")]
    UnknownPlayer(PlayerId),
    #[error("move {move_type} is not allowed during {phase}")]
    InvalidState { move_type: MoveType, phase: Phase },
    #[error("move {move_type} may not target player {target} from player {player}")]
    InvalidTarget {
        move_type: MoveType,
        player: String,
        target: String,
    },
    #[error("player {player} has no ship {ship}")]
    UnknownShip { player: PlayerId, ship: ShipId },
    #[error("ship {0} is already placed")]
    ShipAlreadyPlaced(ShipId),
    #[error("ship {0} is not placed")]
    ShipNotPlaced(ShipId),
    #[error("player {player} still has {count} ship(s) to place")]
    ShipsNotPlaced { player: PlayerId, count: usize },
    #[error("it is not player {player}'s turn (expected {expected})")]
    NotYourTurn { player: PlayerId, expected: PlayerId },
    #[error("position {0} is outside the target board")]
    OutsideBoard(Position),
    #[error("tile at {0} has already been fired upon")]
    AlreadyFiredAt(Position),
    #[error("ship {ship} cannot be laid out from {position}: {source}")]
    Unlayable {
        ship: ShipId,
        position: Position,
        source: GameError,
    },
    #[error("invalid ship location: {0}")]
    Placement(#[from] PlacementError),
    #[error(transparent)]
    Internal(#[from] GameError),
}

impl MoveError {
    /// Whether this error exposes a bug rather than a bad move.
    pub fn is_internal(&self) -> bool {
        matches!(self, MoveError::Internal(GameError::InternalConsistency(_)))
    }
}

/// Identifier of a player, accepted on the wire as a string or an integer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayerId(String);

/// Identifier of a ship, unique within one board.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShipId(String);

macro_rules! string_id {
    ($name:ident, $expecting:literal) => {
        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id.to_string())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                struct IdVisitor;

                impl<'de> Visitor<'de> for IdVisitor {
                    type Value = $name;

                    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                        f.write_str($expecting)
                    }

                    fn visit_str<E: de::Error>(self, v: &str) -> Result<$name, E> {
                        Ok($name(v.to_string()))
                    }

                    fn visit_string<E: de::Error>(self, v: String) -> Result<$name, E> {
                        Ok($name(v))
                    }

                    fn visit_i64<E: de::Error>(self, v: i64) -> Result<$name, E> {
                        Ok($name(v.to_string()))
                    }

                    fn visit_u64<E: de::Error>(self, v: u64) -> Result<$name, E> {
                        Ok($name(v.to_string()))
                    }
                }

                deserializer.deserialize_any(IdVisitor)
            }
        }
    };
}

string_id!(PlayerId, "a player id (string or integer)");
string_id!(ShipId, "a ship id (string or integer)");
