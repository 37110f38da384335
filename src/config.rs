use serde::{Deserialize, Serialize};

use crate::common::{GameError, PlayerId};
use crate::ship::ShipClass;

pub const MIN_BOARD_DIM: usize = 1;
pub const MAX_BOARD_DIM: usize = 15;
pub const BOARD_ROWS: usize = 10;
pub const BOARD_COLUMNS: usize = 10;

pub const DEFAULT_RULESET: &str = "DEFAULT";

/// Roster handed to every player under the default rules, in id order.
pub const DEFAULT_SHIP_LIST: [ShipClass; 5] = [
    ShipClass::Destroyer,
    ShipClass::Submarine,
    ShipClass::Cruiser,
    ShipClass::Battleship,
    ShipClass::AircraftCarrier,
];

pub const DEFAULT_PLAYERS: [(&str, &str); 2] =
    [("p1", "DEFAULT-PLAYER-1"), ("p2", "DEFAULT-PLAYER-2")];

/// Environment variable read by `init_logging`.
pub const LOG_ENV_VAR: &str = "HEXFLEET_LOG";

/// Player entry of an engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub id: PlayerId,
    pub name: String,
}

impl PlayerSpec {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Everything needed to construct a `GameEngine`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_players")]
    pub players: Vec<PlayerSpec>,
    #[serde(default)]
    pub ruleset: Option<String>,
}

impl EngineConfig {
    pub fn from_json(raw: &str) -> Result<Self, GameError> {
        serde_json::from_str(raw)
            .map_err(|e| GameError::InvalidArgument(format!("engine config: {e}")))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            players: default_players(),
            ruleset: None,
        }
    }
}

fn default_players() -> Vec<PlayerSpec> {
    DEFAULT_PLAYERS
        .iter()
        .map(|(id, name)| PlayerSpec::new(*id, *name))
        .collect()
}
