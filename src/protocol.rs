//! Wire records exchanged with the engine: moves in, results out.

use core::fmt;
use core::str::FromStr;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::common::{MoveError, PlayerId, ShipId};
use crate::game::GameState;
use crate::geometry::{Angle, Position};

/// Tag naming one entry of a ruleset's move table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MoveType {
    StartGame,
    MoveShip,
    PlaceShip,
    UnplaceShip,
    Fire,
}

impl MoveType {
    pub const ALL: [MoveType; 5] = [
        MoveType::StartGame,
        MoveType::MoveShip,
        MoveType::PlaceShip,
        MoveType::UnplaceShip,
        MoveType::Fire,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            MoveType::StartGame => "START_GAME",
            MoveType::MoveShip => "MOVE_SHIP",
            MoveType::PlaceShip => "PLACE_SHIP",
            MoveType::UnplaceShip => "UNPLACE_SHIP",
            MoveType::Fire => "FIRE",
        }
    }
}

impl fmt::Display for MoveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MoveType {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MoveType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| MoveError::UnknownMoveType(s.to_string()))
    }
}

/// A named field of the move record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MoveField {
    MoveType,
    PlayerId,
    TargetPlayerId,
    ShipId,
    Position,
    Angle,
}

impl MoveField {
    /// Key used for this field on the wire.
    pub const fn key(self) -> &'static str {
        match self {
            MoveField::MoveType => "moveType",
            MoveField::PlayerId => "playerID",
            MoveField::TargetPlayerId => "targetPlayerID",
            MoveField::ShipId => "shipID",
            MoveField::Position => "position",
            MoveField::Angle => "angle",
        }
    }
}

impl fmt::Display for MoveField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A move as submitted by a caller.
///
/// Fields are optional so the engine can report exactly which ones are
/// missing; unknown keys end up in `extra` and are reported as surplus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    #[serde(rename = "moveType")]
    pub move_type: String,
    #[serde(rename = "playerID", default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<PlayerId>,
    #[serde(rename = "targetPlayerID", default, skip_serializing_if = "Option::is_none")]
    pub target_player_id: Option<PlayerId>,
    #[serde(rename = "shipID", default, skip_serializing_if = "Option::is_none")]
    pub ship_id: Option<ShipId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<Angle>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Move {
    /// A bare move carrying only its type tag.
    pub fn new(move_type: impl Into<String>) -> Self {
        Move {
            move_type: move_type.into(),
            player_id: None,
            target_player_id: None,
            ship_id: None,
            position: None,
            angle: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn start_game() -> Self {
        Move::new(MoveType::StartGame.name())
    }

    pub fn move_ship(
        player: impl Into<PlayerId>,
        ship: impl Into<ShipId>,
        position: impl Into<Position>,
        angle: Angle,
    ) -> Self {
        let player = player.into();
        Move::new(MoveType::MoveShip.name())
            .with_player(player.clone())
            .with_target(player)
            .with_ship(ship)
            .with_position(position)
            .with_angle(angle)
    }

    pub fn place_ship(player: impl Into<PlayerId>, ship: impl Into<ShipId>) -> Self {
        let player = player.into();
        Move::new(MoveType::PlaceShip.name())
            .with_player(player.clone())
            .with_target(player)
            .with_ship(ship)
    }

    pub fn unplace_ship(player: impl Into<PlayerId>, ship: impl Into<ShipId>) -> Self {
        let player = player.into();
        Move::new(MoveType::UnplaceShip.name())
            .with_player(player.clone())
            .with_target(player)
            .with_ship(ship)
    }

    pub fn fire(
        player: impl Into<PlayerId>,
        target: impl Into<PlayerId>,
        position: impl Into<Position>,
    ) -> Self {
        Move::new(MoveType::Fire.name())
            .with_player(player)
            .with_target(target)
            .with_position(position)
    }

    pub fn with_player(mut self, player: impl Into<PlayerId>) -> Self {
        self.player_id = Some(player.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<PlayerId>) -> Self {
        self.target_player_id = Some(target.into());
        self
    }

    pub fn with_ship(mut self, ship: impl Into<ShipId>) -> Self {
        self.ship_id = Some(ship.into());
        self
    }

    pub fn with_position(mut self, position: impl Into<Position>) -> Self {
        self.position = Some(position.into());
        self
    }

    pub fn with_angle(mut self, angle: Angle) -> Self {
        self.angle = Some(angle);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Decode a move from its JSON wire form.
    pub fn from_json(raw: &str) -> Result<Self, MoveError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| MoveError::Malformed(e.to_string()))?;
        if !value.is_object() {
            return Err(MoveError::Malformed("a move must be a JSON object".to_string()));
        }
        serde_json::from_value(value).map_err(|e| MoveError::Malformed(e.to_string()))
    }

    /// Which record fields are present.
    pub fn known_fields(&self) -> Vec<MoveField> {
        let mut fields = vec![MoveField::MoveType];
        if self.player_id.is_some() {
            fields.push(MoveField::PlayerId);
        }
        if self.target_player_id.is_some() {
            fields.push(MoveField::TargetPlayerId);
        }
        if self.ship_id.is_some() {
            fields.push(MoveField::ShipId);
        }
        if self.position.is_some() {
            fields.push(MoveField::Position);
        }
        if self.angle.is_some() {
            fields.push(MoveField::Angle);
        }
        fields
    }

    pub(crate) fn player(&self) -> Result<&PlayerId, MoveError> {
        required(&self.player_id, MoveField::PlayerId)
    }

    pub(crate) fn target(&self) -> Result<&PlayerId, MoveError> {
        required(&self.target_player_id, MoveField::TargetPlayerId)
    }

    pub(crate) fn ship(&self) -> Result<&ShipId, MoveError> {
        required(&self.ship_id, MoveField::ShipId)
    }

    pub(crate) fn at(&self) -> Result<Position, MoveError> {
        required(&self.position, MoveField::Position).copied()
    }

    pub(crate) fn facing(&self) -> Result<Angle, MoveError> {
        required(&self.angle, MoveField::Angle).copied()
    }
}

fn required<T>(value: &Option<T>, field: MoveField) -> Result<&T, MoveError> {
    value
        .as_ref()
        .ok_or_else(|| MoveError::Malformed(format!("move has no {field}")))
}

/// Answer to every submitted move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResult {
    /// The move passed every rule predicate.
    pub valid: bool,
    /// The move was applied and archived.
    pub processed: bool,
    pub error: Option<String>,
    pub game_state: GameState,
}

/// Submission surface shared by the engine itself and its queued handle.
#[cfg(feature = "service")]
#[async_trait::async_trait]
pub trait GameApi: Send {
    async fn input_move(&mut self, mv: Move) -> anyhow::Result<MoveResult>;
    async fn input_move_json(&mut self, raw: &str) -> anyhow::Result<MoveResult>;
    async fn game_state(&mut self) -> anyhow::Result<GameState>;
}
