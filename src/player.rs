use crate::board::Board;
use crate::common::{GameError, PlayerId};
use crate::rules::Ruleset;

/// A participant and the board it defends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    id: PlayerId,
    name: String,
    board: Board,
}

impl Player {
    /// Create a player whose board is sized and stocked per `rules`.
    pub fn new(id: PlayerId, name: impl Into<String>, rules: &Ruleset) -> Result<Self, GameError> {
        let name = name.into();
        if id.as_str().is_empty() {
            return Err(GameError::InvalidArgument("player id must not be empty".to_string()));
        }
        if name.trim().is_empty() {
            return Err(GameError::InvalidArgument(format!(
                "player {id} needs a non-empty name"
            )));
        }
        let board = Board::new(id.clone(), rules.rows(), rules.columns(), rules.ship_list())?;
        Ok(Self::from_parts(id, name, board))
    }

    pub(crate) fn from_parts(id: PlayerId, name: impl Into<String>, board: Board) -> Self {
        Player {
            id,
            name: name.into(),
            board,
        }
    }

    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }
}
