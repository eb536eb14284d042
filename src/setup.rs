use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::SetupError;
use crate::types::{PLAYER_BLACK, Player};

/// A starting position: 8 text rows plus the side to move.
///
/// Row characters: `.` empty, `B` black, `W` white (`X`/`O` also accepted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSetup {
    pub rows: Vec<String>,
    /// 1=black, 2=white.
    #[serde(default = "default_to_move")]
    pub to_move: u8,
}

fn default_to_move() -> u8 {
    PLAYER_BLACK
}

impl GameSetup {
    pub fn new<S: Into<String>>(rows: impl IntoIterator<Item = S>, to_move: Player) -> Self {
        Self {
            rows: rows.into_iter().map(Into::into).collect(),
            to_move: to_move.code(),
        }
    }

    pub fn board(&self) -> Result<Board, SetupError> {
        Board::from_rows(&self.rows)
    }

    pub fn player(&self) -> Result<Player, SetupError> {
        Player::from_code(self.to_move).ok_or(SetupError::UnknownPlayer(self.to_move))
    }
}

impl Default for GameSetup {
    /// The standard opening position, black to move.
    fn default() -> Self {
        let rows = Board::new().to_string();
        Self::new(rows.lines(), Player::Black)
    }
}
