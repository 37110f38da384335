//! A single grid cell and its append-only marker history.

use serde::{Deserialize, Serialize};

use crate::ship::ShipClass;

/// Marker applied to a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TileType {
    Empty,
    Ship(ShipClass),
    Hit,
    Miss,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    markers: Vec<TileType>,
}

impl Tile {
    pub fn new() -> Self {
        Tile {
            markers: vec![TileType::Empty],
        }
    }

    /// Current effective type: the most recent marker.
    pub fn tile_type(&self) -> TileType {
        self.markers.last().copied().unwrap_or(TileType::Empty)
    }

    /// Push a new marker; earlier markers are kept.
    pub fn set_type(&mut self, tile_type: TileType) {
        self.markers.push(tile_type);
    }

    /// Every marker ever applied, oldest first.
    pub fn markers(&self) -> &[TileType] {
        &self.markers
    }

    /// Whether a HIT or MISS has ever landed here.
    pub fn fired_upon(&self) -> bool {
        self.markers
            .iter()
            .any(|m| matches!(m, TileType::Hit | TileType::Miss))
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileState {
    #[serde(rename = "type")]
    pub tile_type: TileType,
    pub markers: Vec<TileType>,
}

impl From<&Tile> for TileState {
    fn from(tile: &Tile) -> Self {
        TileState {
            tile_type: tile.tile_type(),
            markers: tile.markers.clone(),
        }
    }
}
