//! One player's grid: tiles, assigned ships and the committed placements.

use std::collections::{BTreeMap, BTreeSet};

use log::warn;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::common::{GameError, PlacementError, PlayerId, ShipId};
use crate::config::{BOARD_COLUMNS, BOARD_ROWS, DEFAULT_SHIP_LIST, MAX_BOARD_DIM, MIN_BOARD_DIM};
use crate::geometry::{Angle, Position};
use crate::ship::{Ship, ShipClass, ShipState};
use crate::tile::{Tile, TileState, TileType};

/// Outcome of a shot resolved against this board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FireOutcome {
    Hit(ShipId),
    Sink(ShipId),
    Miss,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    owner: PlayerId,
    rows: usize,
    columns: usize,
    tiles: Vec<Vec<Tile>>,
    ships: Vec<Ship>,
    placed: BTreeSet<ShipId>,
}

impl Board {
    /// Create an empty `rows` x `columns` board holding one ship per roster entry.
    pub fn new(
        owner: PlayerId,
        rows: usize,
        columns: usize,
        ship_list: &[ShipClass],
    ) -> Result<Self, GameError> {
        let tiles = Self::init_tiles(rows, columns)?;
        Ok(Self::assemble(owner, tiles, ship_list))
    }

    /// The default-rules board: 10x10 with the standard roster.
    pub(crate) fn default_for(owner: PlayerId) -> Self {
        let tiles = vec![vec![Tile::new(); BOARD_COLUMNS]; BOARD_ROWS];
        Self::assemble(owner, tiles, &DEFAULT_SHIP_LIST)
    }

    fn assemble(owner: PlayerId, tiles: Vec<Vec<Tile>>, ship_list: &[ShipClass]) -> Self {
        let mut board = Board {
            owner,
            rows: tiles.len(),
            columns: tiles.first().map_or(0, Vec::len),
            tiles,
            ships: Vec::new(),
            placed: BTreeSet::new(),
        };
        board.init_ships(ship_list);
        board
    }

    /// Row-major grid of fresh tiles. Both dimensions must be within 1..=15.
    pub fn init_tiles(rows: usize, columns: usize) -> Result<Vec<Vec<Tile>>, GameError> {
        let valid = MIN_BOARD_DIM..=MAX_BOARD_DIM;
        if !valid.contains(&rows) || !valid.contains(&columns) {
            let err = GameError::InvalidArgument(format!(
                "board dimensions must be {MIN_BOARD_DIM}-{MAX_BOARD_DIM}, got {rows}x{columns}"
            ));
            warn!("{err}");
            return Err(err);
        }
        Ok(vec![vec![Tile::new(); columns]; rows])
    }

    /// Replace the ship collection with one fresh ship per entry, ids `ship0..`.
    pub fn init_ships(&mut self, ship_list: &[ShipClass]) -> &[Ship] {
        self.placed.clear();
        self.ships = ship_list
            .iter()
            .enumerate()
            .map(|(i, class)| Ship::new(*class, ShipId::new(format!("ship{i}")), self.owner.clone()))
            .collect();
        &self.ships
    }

    pub fn owner(&self) -> &PlayerId {
        &self.owner
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Bottom-right cell of the grid.
    pub fn max_position(&self) -> Position {
        Position::new(self.columns as i32 - 1, self.rows as i32 - 1)
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn ship(&self, id: &ShipId) -> Option<&Ship> {
        self.ships.iter().find(|s| s.id() == id)
    }

    pub fn ship_mut(&mut self, id: &ShipId) -> Option<&mut Ship> {
        self.ships.iter_mut().find(|s| s.id() == id)
    }

    /// Ships committed to the board, in roster order.
    pub fn placed_ships(&self) -> impl Iterator<Item = &Ship> {
        self.ships.iter().filter(|s| self.placed.contains(s.id()))
    }

    pub fn is_placed(&self, id: &ShipId) -> bool {
        self.placed.contains(id)
    }

    pub fn all_ships_placed(&self) -> bool {
        self.ships.iter().all(|s| self.placed.contains(s.id()))
    }

    pub fn unplaced_count(&self) -> usize {
        self.ships.len() - self.placed.len()
    }

    /// Whether any ship still has positive total hp.
    pub fn has_ships_alive(&self) -> bool {
        self.ships.iter().any(Ship::is_alive)
    }

    /// Commit a ship of this board at its current position.
    pub fn place_ship(&mut self, ship: &Ship) -> Result<(), PlacementError> {
        let (class, cells) = {
            let own = self
                .ship(ship.id())
                .filter(|_| ship.owner() == &self.owner)
                .ok_or_else(|| PlacementError::NotOwned {
                    ship: ship.id().clone(),
                    owner: ship.owner().clone(),
                })?;
            self.check_ship_location(own)?;
            (own.class(), own.positions().unwrap_or_default())
        };
        for cell in cells {
            if let Some(tile) = self.tile_at_mut(cell) {
                tile.set_type(TileType::Ship(class));
            }
        }
        self.placed.insert(ship.id().clone());
        Ok(())
    }

    /// Withdraw a committed ship. Returns `false` if it was not placed.
    pub fn unplace_ship(&mut self, id: &ShipId) -> bool {
        if !self.placed.remove(id) {
            return false;
        }
        let cells = self.ship(id).and_then(Ship::positions).unwrap_or_default();
        for cell in cells {
            if let Some(tile) = self.tile_at_mut(cell) {
                tile.set_type(TileType::Empty);
            }
        }
        true
    }

    /// Take a ship off this board entirely.
    pub fn remove_ship(&mut self, id: &ShipId) -> Option<Ship> {
        self.placed.remove(id);
        let index = self.ships.iter().position(|s| s.id() == id)?;
        Some(self.ships.remove(index))
    }

    pub fn valid_ship_location(&self, ship: &Ship) -> bool {
        self.check_ship_location(ship).is_ok()
    }

    /// Like `valid_ship_location`, but says why a location is refused.
    pub fn check_ship_location(&self, ship: &Ship) -> Result<(), PlacementError> {
        if ship.positions().is_none() {
            return Err(PlacementError::Unpositioned(ship.id().clone()));
        }
        if !self.entire_ship_inside_board(ship) {
            return Err(PlacementError::OutOfBounds(ship.id().clone()));
        }
        if let Some(hit) = self.first_collision(ship) {
            return Err(PlacementError::Collision {
                ship: ship.id().clone(),
                other: hit.ship,
                at: hit.collisions[0],
            });
        }
        Ok(())
    }

    pub fn entire_ship_inside_board(&self, ship: &Ship) -> bool {
        ship.segments().iter().all(|s| {
            s.position
                .is_some_and(|p| self.position_is_inside_board(p))
        })
    }

    /// True when `ship` overlaps none of the placed ships other than itself.
    pub fn no_ship_collisions(&self, ship: &Ship) -> bool {
        self.first_collision(ship).is_none()
    }

    fn first_collision(&self, ship: &Ship) -> Option<crate::ship::Collision> {
        self.placed_ships()
            .filter(|placed| placed.id() != ship.id() || placed.owner() != ship.owner())
            .find_map(|placed| ship.collides_with_ship(placed))
    }

    pub fn position_is_inside_board(&self, position: Position) -> bool {
        let max = self.max_position();
        (0..=max.x).contains(&position.x) && (0..=max.y).contains(&position.y)
    }

    /// First ship in roster order with a segment on `position`.
    pub fn ship_at(&self, position: Position) -> Option<&Ship> {
        self.ships
            .iter()
            .find(|s| !s.collides_with(&[position]).is_empty())
    }

    fn ship_at_mut(&mut self, position: Position) -> Option<&mut Ship> {
        self.ships
            .iter_mut()
            .find(|s| !s.collides_with(&[position]).is_empty())
    }

    /// Tile under `position`; the grid is stored as `tiles[y][x]`.
    pub fn tile_at(&self, position: Position) -> Option<&Tile> {
        if !self.position_is_inside_board(position) {
            return None;
        }
        self.tiles
            .get(position.y as usize)
            .and_then(|row| row.get(position.x as usize))
    }

    pub fn tile_at_mut(&mut self, position: Position) -> Option<&mut Tile> {
        if !self.position_is_inside_board(position) {
            return None;
        }
        self.tiles
            .get_mut(position.y as usize)
            .and_then(|row| row.get_mut(position.x as usize))
    }

    /// Resolve a shot: damage the ship segment under `position` and mark the tile.
    pub fn receive_fire(&mut self, position: Position) -> Result<FireOutcome, GameError> {
        if self.tile_at(position).is_none() {
            return Err(GameError::InvalidArgument(format!(
                "position {position} is outside the board"
            )));
        }
        let outcome = match self.ship_at_mut(position) {
            Some(ship) => {
                if ship.segment_at(position)?.is_none() {
                    return Err(GameError::InternalConsistency(format!(
                        "ship {} reported at {position} without a segment there",
                        ship.id()
                    )));
                }
                let was_alive = ship.is_alive();
                ship.damage_segments(&[position], 1);
                if was_alive && ship.is_destroyed() {
                    FireOutcome::Sink(ship.id().clone())
                } else {
                    FireOutcome::Hit(ship.id().clone())
                }
            }
            None => FireOutcome::Miss,
        };
        let marker = match outcome {
            FireOutcome::Miss => TileType::Miss,
            _ => TileType::Hit,
        };
        if let Some(tile) = self.tile_at_mut(position) {
            tile.set_type(marker);
        }
        Ok(outcome)
    }

    /// A legal `(position, angle)` for `ship_id` against the ships placed so far.
    pub fn random_placement<R: Rng>(
        &self,
        rng: &mut R,
        ship_id: &ShipId,
    ) -> Result<(Position, Angle), GameError> {
        let mut candidate = self
            .ship(ship_id)
            .cloned()
            .ok_or_else(|| GameError::InvalidArgument(format!("no ship {ship_id} on this board")))?;
        for _ in 0..1000 {
            let position = Position::new(
                rng.random_range(0..self.columns as i32),
                rng.random_range(0..self.rows as i32),
            );
            let angle = Angle::ALL[rng.random_range(0..Angle::ALL.len())];
            candidate.set_positions(position, angle)?;
            if self.valid_ship_location(&candidate) {
                return Ok((position, angle));
            }
        }
        Err(GameError::InvalidArgument(format!(
            "unable to find a free location for ship {ship_id}"
        )))
    }
}

/// Serializable board view used in game snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardState {
    pub owner: PlayerId,
    pub rows: usize,
    pub columns: usize,
    pub tiles: Vec<Vec<TileState>>,
    pub ships: BTreeMap<ShipId, ShipState>,
    pub placed_ships: BTreeMap<ShipId, ShipState>,
}

impl From<&Board> for BoardState {
    fn from(b: &Board) -> Self {
        let state_of = |s: &Ship| (s.id().clone(), ShipState::from(s));
        BoardState {
            owner: b.owner.clone(),
            rows: b.rows,
            columns: b.columns,
            tiles: b
                .tiles
                .iter()
                .map(|row| row.iter().map(TileState::from).collect())
                .collect(),
            ships: b.ships.iter().map(state_of).collect(),
            placed_ships: b.placed_ships().map(state_of).collect(),
        }
    }
}
