//! Declarative move tables.
//!
//! A `Ruleset` maps each `MoveType` to a `MoveRule`: the exact field set the
//! move must carry, the phases it is legal in, how its player and target must
//! relate, one extra predicate and the function that applies it. The engine
//! only ever walks this table, so adding a move means adding an entry.

use std::collections::BTreeMap;

use log::info;

use crate::common::{GameError, MoveError, PlayerId, ShipId};
use crate::config::{BOARD_COLUMNS, BOARD_ROWS, DEFAULT_RULESET, DEFAULT_SHIP_LIST};
use crate::game::{GameEngine, Phase};
use crate::geometry::Position;
use crate::protocol::{Move, MoveField, MoveType};
use crate::ship::ShipClass;

pub type Validator = fn(&GameEngine, &Move) -> Result<(), MoveError>;
pub type Processor = fn(&mut GameEngine, &Move) -> Result<(), MoveError>;

/// Required relation between `playerID` and `targetPlayerID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Targeting {
    /// A player acting on its own board.
    OwnBoard,
    /// A player acting on someone else's board.
    Opponent,
    Any,
}

impl Targeting {
    pub fn permits(self, player: Option<&PlayerId>, target: Option<&PlayerId>) -> bool {
        match self {
            Targeting::OwnBoard => matches!((player, target), (Some(a), Some(b)) if a == b),
            Targeting::Opponent => matches!((player, target), (Some(a), Some(b)) if a != b),
            Targeting::Any => true,
        }
    }
}

/// One entry of the move table.
#[derive(Debug, Clone, Copy)]
pub struct MoveRule {
    pub move_type: MoveType,
    pub requires: &'static [MoveField],
    pub valid_states: &'static [Phase],
    pub valid_target: Targeting,
    pub valid_other: Validator,
    pub process: Processor,
}

/// Ship roster, board size and move table for one flavour of the game.
#[derive(Debug, Clone)]
pub struct Ruleset {
    name: String,
    ship_list: Vec<ShipClass>,
    rows: usize,
    columns: usize,
    moves: BTreeMap<MoveType, MoveRule>,
}

impl Ruleset {
    /// A ruleset with an empty move table.
    pub fn new(
        name: impl Into<String>,
        ship_list: Vec<ShipClass>,
        rows: usize,
        columns: usize,
    ) -> Self {
        Ruleset {
            name: name.into(),
            ship_list,
            rows,
            columns,
            moves: BTreeMap::new(),
        }
    }

    /// Resolve a built-in ruleset.
    pub fn by_name(name: &str) -> Result<Self, GameError> {
        match name {
            DEFAULT_RULESET => Ok(Self::default_rules()),
            other => Err(GameError::InvalidArgument(format!("unknown ruleset: {other}"))),
        }
    }

    /// Five ships on a 10x10 board with the standard move table.
    pub fn default_rules() -> Self {
        Ruleset::new(DEFAULT_RULESET, DEFAULT_SHIP_LIST.to_vec(), BOARD_ROWS, BOARD_COLUMNS)
            .with_rule(START_GAME)
            .with_rule(MOVE_SHIP)
            .with_rule(PLACE_SHIP)
            .with_rule(UNPLACE_SHIP)
            .with_rule(FIRE)
    }

    /// Add or replace the entry for `rule.move_type`.
    pub fn with_rule(mut self, rule: MoveRule) -> Self {
        self.moves.insert(rule.move_type, rule);
        self
    }

    pub fn without_rule(mut self, move_type: MoveType) -> Self {
        self.moves.remove(&move_type);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ship_list(&self) -> &[ShipClass] {
        &self.ship_list
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rule(&self, move_type: MoveType) -> Option<&MoveRule> {
        self.moves.get(&move_type)
    }

    pub fn rules(&self) -> impl Iterator<Item = &MoveRule> {
        self.moves.values()
    }
}

impl Default for Ruleset {
    fn default() -> Self {
        Self::default_rules()
    }
}

const SETUP: &[Phase] = &[Phase::PlaceShips];
const COMBAT: &[Phase] = &[Phase::TakeTurns];
const SHIP_MOVE_FIELDS: &[MoveField] = &[
    MoveField::MoveType,
    MoveField::PlayerId,
    MoveField::TargetPlayerId,
    MoveField::ShipId,
];

pub const START_GAME: MoveRule = MoveRule {
    move_type: MoveType::StartGame,
    requires: &[MoveField::MoveType],
    valid_states: SETUP,
    valid_target: Targeting::Any,
    valid_other: all_ships_placed,
    process: start_game,
};

pub const MOVE_SHIP: MoveRule = MoveRule {
    move_type: MoveType::MoveShip,
    requires: &[
        MoveField::MoveType,
        MoveField::PlayerId,
        MoveField::TargetPlayerId,
        MoveField::ShipId,
        MoveField::Position,
        MoveField::Angle,
    ],
    valid_states: SETUP,
    valid_target: Targeting::OwnBoard,
    valid_other: ship_movable,
    process: move_ship,
};

pub const PLACE_SHIP: MoveRule = MoveRule {
    move_type: MoveType::PlaceShip,
    requires: SHIP_MOVE_FIELDS,
    valid_states: SETUP,
    valid_target: Targeting::OwnBoard,
    valid_other: ship_placeable,
    process: place_ship,
};

pub const UNPLACE_SHIP: MoveRule = MoveRule {
    move_type: MoveType::UnplaceShip,
    requires: SHIP_MOVE_FIELDS,
    valid_states: SETUP,
    valid_target: Targeting::OwnBoard,
    valid_other: ship_unplaceable,
    process: unplace_ship,
};

pub const FIRE: MoveRule = MoveRule {
    move_type: MoveType::Fire,
    requires: &[
        MoveField::MoveType,
        MoveField::PlayerId,
        MoveField::TargetPlayerId,
        MoveField::Position,
    ],
    valid_states: COMBAT,
    valid_target: Targeting::Opponent,
    valid_other: target_open,
    process: fire,
};

fn all_ships_placed(engine: &GameEngine, _mv: &Move) -> Result<(), MoveError> {
    match engine.players().find(|p| !p.board().all_ships_placed()) {
        Some(p) => Err(MoveError::ShipsNotPlaced {
            player: p.id().clone(),
            count: p.board().unplaced_count(),
        }),
        None => Ok(()),
    }
}

fn start_game(engine: &mut GameEngine, _mv: &Move) -> Result<(), MoveError> {
    engine.push_phase(Phase::TakeTurns);
    Ok(())
}

fn ship_movable(engine: &GameEngine, mv: &Move) -> Result<(), MoveError> {
    let board = engine.board_of(mv.target()?)?;
    let id = mv.ship()?;
    let ship = board.ship(id).ok_or_else(|| MoveError::UnknownShip {
        player: board.owner().clone(),
        ship: id.clone(),
    })?;
    if board.is_placed(id) {
        return Err(MoveError::ShipAlreadyPlaced(id.clone()));
    }
    let position = mv.at()?;
    ship.footprint(position, mv.facing()?)
        .map_err(|source| unlayable(id, position, source))?;
    Ok(())
}

fn move_ship(engine: &mut GameEngine, mv: &Move) -> Result<(), MoveError> {
    let (position, angle) = (mv.at()?, mv.facing()?);
    let board = engine.board_of_mut(mv.target()?)?;
    let id = mv.ship()?;
    let owner = board.owner().clone();
    let ship = board.ship_mut(id).ok_or_else(|| MoveError::UnknownShip {
        player: owner,
        ship: id.clone(),
    })?;
    ship.set_positions(position, angle)
        .map_err(|source| unlayable(id, position, source))?;
    Ok(())
}

fn unlayable(ship: &ShipId, position: Position, source: GameError) -> MoveError {
    MoveError::Unlayable {
        ship: ship.clone(),
        position,
        source,
    }
}

fn ship_placeable(engine: &GameEngine, mv: &Move) -> Result<(), MoveError> {
    let board = engine.board_of(mv.target()?)?;
    let id = mv.ship()?;
    let ship = board.ship(id).ok_or_else(|| MoveError::UnknownShip {
        player: board.owner().clone(),
        ship: id.clone(),
    })?;
    if board.is_placed(id) {
        return Err(MoveError::ShipAlreadyPlaced(id.clone()));
    }
    board.check_ship_location(ship)?;
    Ok(())
}

fn place_ship(engine: &mut GameEngine, mv: &Move) -> Result<(), MoveError> {
    let board = engine.board_of_mut(mv.target()?)?;
    let id = mv.ship()?;
    let ship = board.ship(id).cloned().ok_or_else(|| MoveError::UnknownShip {
        player: board.owner().clone(),
        ship: id.clone(),
    })?;
    board.place_ship(&ship)?;
    Ok(())
}

fn ship_unplaceable(engine: &GameEngine, mv: &Move) -> Result<(), MoveError> {
    let board = engine.board_of(mv.target()?)?;
    let id = mv.ship()?;
    if board.ship(id).is_none() {
        return Err(MoveError::UnknownShip {
            player: board.owner().clone(),
            ship: id.clone(),
        });
    }
    if !board.is_placed(id) {
        return Err(MoveError::ShipNotPlaced(id.clone()));
    }
    Ok(())
}

fn unplace_ship(engine: &mut GameEngine, mv: &Move) -> Result<(), MoveError> {
    let board = engine.board_of_mut(mv.target()?)?;
    let id = mv.ship()?;
    if board.unplace_ship(id) {
        Ok(())
    } else {
        Err(MoveError::ShipNotPlaced(id.clone()))
    }
}

fn target_open(engine: &GameEngine, mv: &Move) -> Result<(), MoveError> {
    let player = mv.player()?;
    if let Some(expected) = engine.current_player() {
        if expected != player {
            return Err(MoveError::NotYourTurn {
                player: player.clone(),
                expected: expected.clone(),
            });
        }
    }
    let position = mv.at()?;
    let tile = engine
        .board_of(mv.target()?)?
        .tile_at(position)
        .ok_or(MoveError::OutsideBoard(position))?;
    if tile.fired_upon() {
        return Err(MoveError::AlreadyFiredAt(position));
    }
    Ok(())
}

fn fire(engine: &mut GameEngine, mv: &Move) -> Result<(), MoveError> {
    let position = mv.at()?;
    let outcome = engine.board_of_mut(mv.target()?)?.receive_fire(position)?;
    info!(
        "{} fired at {} on {}'s board: {:?}",
        mv.player()?,
        position,
        mv.target()?,
        outcome
    );
    engine.advance_players();
    Ok(())
}
