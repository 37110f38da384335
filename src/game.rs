use core::fmt;
use std::collections::{BTreeMap, VecDeque};

use log::{debug, error, info};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardState};
use crate::common::{GameError, MoveError, PlayerId};
use crate::config::{EngineConfig, PlayerSpec, DEFAULT_PLAYERS};
use crate::player::Player;
use crate::protocol::{Move, MoveResult, MoveType};
use crate::rules::{MoveRule, Ruleset};

/// Macro phase of a game. The current phase is the top of the phase stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Initializing,
    PlaceShips,
    TakeTurns,
    GameOver,
    Paused,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Initializing => "INITIALIZING",
            Phase::PlaceShips => "PLACE_SHIPS",
            Phase::TakeTurns => "TAKE_TURNS",
            Phase::GameOver => "GAME_OVER",
            Phase::Paused => "PAUSED",
        };
        f.write_str(name)
    }
}

/// Public state of one player inside a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub name: String,
    pub board: BoardState,
}

/// Serializable snapshot of a whole game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub ruleset: String,
    pub players: BTreeMap<PlayerId, PlayerState>,
    pub player_order: Vec<PlayerId>,
    pub state_stack: Vec<Phase>,
    pub move_history: Vec<Move>,
    #[serde(rename = "winnerID")]
    pub winner_id: Option<PlayerId>,
}

impl GameState {
    /// Phase on top of the stack.
    pub fn phase(&self) -> Option<Phase> {
        self.state_stack.last().copied()
    }
}

// Everything a move processor may touch, saved so a failed move can be undone.
struct Checkpoint {
    players: Vec<Player>,
    player_order: VecDeque<PlayerId>,
    state_stack: Vec<Phase>,
}

/// Rules engine owning every player, board and ship of one game.
pub struct GameEngine {
    rules: Ruleset,
    players: Vec<Player>,
    player_order: VecDeque<PlayerId>,
    state_stack: Vec<Phase>,
    move_history: Vec<Move>,
    winner: Option<PlayerId>,
}

impl GameEngine {
    /// Two default players under the default rules.
    pub fn new() -> Self {
        let players = DEFAULT_PLAYERS
            .iter()
            .map(|(id, name)| {
                let id = PlayerId::new(*id);
                Player::from_parts(id.clone(), *name, Board::default_for(id))
            })
            .collect();
        Self::assemble(players, Ruleset::default_rules())
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self, GameError> {
        let rules = match &config.ruleset {
            Some(name) => Ruleset::by_name(name)?,
            None => Ruleset::default_rules(),
        };
        Self::with_rules(&config.players, rules)
    }

    /// Build a game for `players` (at least two, unique ids) under `rules`.
    pub fn with_rules(players: &[PlayerSpec], rules: Ruleset) -> Result<Self, GameError> {
        if players.len() < 2 {
            return Err(GameError::InvalidArgument(format!(
                "a game needs at least two players, got {}",
                players.len()
            )));
        }
        let mut built: Vec<Player> = Vec::with_capacity(players.len());
        for spec in players {
            if built.iter().any(|p| p.id() == &spec.id) {
                return Err(GameError::InvalidArgument(format!(
                    "duplicate player id: {}",
                    spec.id
                )));
            }
            built.push(Player::new(spec.id.clone(), spec.name.clone(), &rules)?);
        }
        Ok(Self::assemble(built, rules))
    }

    fn assemble(players: Vec<Player>, rules: Ruleset) -> Self {
        let player_order = players.iter().map(|p| p.id().clone()).collect();
        let mut engine = GameEngine {
            rules,
            players,
            player_order,
            state_stack: vec![Phase::Initializing],
            move_history: Vec::new(),
            winner: None,
        };
        engine.push_phase(Phase::PlaceShips);
        engine
    }

    /// Randomize who fires first. Only allowed before combat starts.
    pub fn shuffle_turn_order<R: Rng>(&mut self, rng: &mut R) -> Result<(), GameError> {
        if self.phase() != Phase::PlaceShips {
            return Err(GameError::InvalidArgument(format!(
                "turn order is fixed once the game leaves PLACE_SHIPS (now {})",
                self.phase()
            )));
        }
        self.player_order.make_contiguous().shuffle(rng);
        Ok(())
    }

    pub fn rules(&self) -> &Ruleset {
        &self.rules
    }

    pub fn phase(&self) -> Phase {
        self.state_stack.last().copied().unwrap_or(Phase::Initializing)
    }

    pub fn state_stack(&self) -> &[Phase] {
        &self.state_stack
    }

    pub fn winner(&self) -> Option<&PlayerId> {
        self.winner.as_ref()
    }

    pub fn move_history(&self) -> &[Move] {
        &self.move_history
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }

    pub fn player_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id() == id)
    }

    pub fn board_of(&self, id: &PlayerId) -> Result<&Board, MoveError> {
        self.player(id)
            .map(Player::board)
            .ok_or_else(|| MoveError::UnknownPlayer(id.clone()))
    }

    pub fn board_of_mut(&mut self, id: &PlayerId) -> Result<&mut Board, MoveError> {
        self.player_mut(id)
            .map(Player::board_mut)
            .ok_or_else(|| MoveError::UnknownPlayer(id.clone()))
    }

    /// Player whose FIRE is currently legal.
    pub fn current_player(&self) -> Option<&PlayerId> {
        self.player_order.front()
    }

    pub fn player_order(&self) -> impl Iterator<Item = &PlayerId> {
        self.player_order.iter()
    }

    /// Rotate the turn order so the current player goes last.
    pub fn advance_players(&mut self) {
        self.player_order.rotate_left(1);
    }

    /// Enter `phase` unless it is already current.
    pub fn push_phase(&mut self, phase: Phase) {
        if self.state_stack.last() != Some(&phase) {
            info!("phase {} -> {}", self.phase(), phase);
            self.state_stack.push(phase);
        }
    }

    /// Suspend the game; no move rule accepts PAUSED.
    pub fn pause(&mut self) -> Result<(), GameError> {
        match self.phase() {
            Phase::PlaceShips | Phase::TakeTurns => {
                self.push_phase(Phase::Paused);
                Ok(())
            }
            other => Err(GameError::InvalidArgument(format!("cannot pause during {other}"))),
        }
    }

    /// Return to the phase that was current before `pause`.
    pub fn resume(&mut self) -> Result<(), GameError> {
        if self.phase() != Phase::Paused {
            return Err(GameError::InvalidArgument(format!(
                "cannot resume during {}",
                self.phase()
            )));
        }
        let previous = self
            .state_stack
            .iter()
            .rev()
            .copied()
            .find(|p| *p != Phase::Paused)
            .ok_or_else(|| {
                GameError::InternalConsistency("paused with no phase to resume".to_string())
            })?;
        self.push_phase(previous);
        Ok(())
    }

    /// Validate `mv` against the move table and, when valid, apply it.
    pub fn input_move(&mut self, mv: Move) -> MoveResult {
        let rule = match self.validate_move(&mv) {
            Ok(rule) => rule,
            Err(err) => {
                debug!("rejected {}: {}", mv.move_type, err);
                return self.result(false, false, Some(err));
            }
        };

        let checkpoint = self.checkpoint();
        if let Err(err) = (rule.process)(self, &mv) {
            if err.is_internal() {
                error!("processing {} failed: {}", rule.move_type, err);
            } else {
                debug!("processing {} failed: {}", rule.move_type, err);
            }
            self.restore(checkpoint);
            return self.result(true, false, Some(err));
        }

        info!("processed {}", rule.move_type);
        self.move_history.push(mv);
        self.update_winner();
        self.result(true, true, None)
    }

    /// Decode a JSON move and submit it.
    pub fn input_move_json(&mut self, raw: &str) -> MoveResult {
        match Move::from_json(raw) {
            Ok(mv) => self.input_move(mv),
            Err(err) => {
                debug!("rejected undecodable move: {err}");
                self.result(false, false, Some(err))
            }
        }
    }

    /// Run every check `input_move` runs, without applying anything.
    pub fn validate_move(&self, mv: &Move) -> Result<MoveRule, MoveError> {
        let move_type: MoveType = mv.move_type.parse()?;
        let rule = *self
            .rules
            .rule(move_type)
            .ok_or_else(|| MoveError::UnknownMoveType(mv.move_type.clone()))?;
        self.validate_fields(&rule, mv)?;

        for id in [&mv.player_id, &mv.target_player_id].into_iter().flatten() {
            if self.player(id).is_none() {
                return Err(MoveError::UnknownPlayer(id.clone()));
            }
        }

        let phase = self.phase();
        if !rule.valid_states.contains(&phase) {
            return Err(MoveError::InvalidState { move_type, phase });
        }

        if !rule
            .valid_target
            .permits(mv.player_id.as_ref(), mv.target_player_id.as_ref())
        {
            let show = |id: &Option<PlayerId>| id.as_ref().map_or("none".to_string(), |i| i.to_string());
            return Err(MoveError::InvalidTarget {
                move_type,
                player: show(&mv.player_id),
                target: show(&mv.target_player_id),
            });
        }

        (rule.valid_other)(self, mv)?;
        Ok(rule)
    }

    fn validate_fields(&self, rule: &MoveRule, mv: &Move) -> Result<(), MoveError> {
        let present = mv.known_fields();
        let missing: Vec<String> = rule
            .requires
            .iter()
            .filter(|f| !present.contains(*f))
            .map(|f| f.key().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(MoveError::MissingFields {
                move_type: rule.move_type,
                fields: missing,
            });
        }
        let extra: Vec<String> = present
            .iter()
            .filter(|f| !rule.requires.contains(*f))
            .map(|f| f.key().to_string())
            .chain(mv.extra.keys().cloned())
            .collect();
        if !extra.is_empty() {
            return Err(MoveError::ExtraFields {
                move_type: rule.move_type,
                fields: extra,
            });
        }
        Ok(())
    }

    /// Declare a winner once exactly one player has a ship afloat.
    fn update_winner(&mut self) {
        if self.winner.is_some() {
            return;
        }
        let mut alive = self.players.iter().filter(|p| p.board().has_ships_alive());
        if let (Some(survivor), None) = (alive.next(), alive.next()) {
            let id = survivor.id().clone();
            info!("player {id} wins");
            self.winner = Some(id);
            self.push_phase(Phase::GameOver);
        }
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            players: self.players.clone(),
            player_order: self.player_order.clone(),
            state_stack: self.state_stack.clone(),
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.players = checkpoint.players;
        self.player_order = checkpoint.player_order;
        self.state_stack = checkpoint.state_stack;
    }

    fn result(&self, valid: bool, processed: bool, error: Option<MoveError>) -> MoveResult {
        MoveResult {
            valid,
            processed,
            error: error.map(|e| e.to_string()),
            game_state: self.state(),
        }
    }

    /// Generate a serializable snapshot of the current state.
    pub fn state(&self) -> GameState {
        GameState {
            ruleset: self.rules.name().to_string(),
            players: self
                .players
                .iter()
                .map(|p| {
                    let state = PlayerState {
                        id: p.id().clone(),
                        name: p.name().to_string(),
                        board: BoardState::from(p.board()),
                    };
                    (p.id().clone(), state)
                })
                .collect(),
            player_order: self.player_order.iter().cloned().collect(),
            state_stack: self.state_stack.clone(),
            move_history: self.move_history.clone(),
            winner_id: self.winner.clone(),
        }
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "service")]
#[async_trait::async_trait]
impl crate::protocol::GameApi for GameEngine {
    async fn input_move(&mut self, mv: Move) -> anyhow::Result<MoveResult> {
        Ok(GameEngine::input_move(self, mv))
    }

    async fn input_move_json(&mut self, raw: &str) -> anyhow::Result<MoveResult> {
        Ok(GameEngine::input_move_json(self, raw))
    }

    async fn game_state(&mut self) -> anyhow::Result<GameState> {
        Ok(self.state())
    }
}
