use serde::{Deserialize, Serialize};

pub const PLAYER_BLACK: u8 = 1;
pub const PLAYER_WHITE: u8 = 2;

/// Contents of a single board square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Black,
    White,
}

impl Cell {
    /// Wire encoding: 0=empty, 1=black, 2=white.
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Black => PLAYER_BLACK,
            Cell::White => PLAYER_WHITE,
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::Black => Cell::Black,
            Player::White => Cell::White,
        }
    }
}

/// One of the two sides. Black moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Player {
    #[default]
    Black,
    White,
}

impl Player {
    pub fn code(self) -> u8 {
        match self {
            Player::Black => PLAYER_BLACK,
            Player::White => PLAYER_WHITE,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            PLAYER_BLACK => Some(Player::Black),
            PLAYER_WHITE => Some(Player::White),
            _ => None,
        }
    }
}

impl std::ops::Not for Player {
    type Output = Self;

    /// The opponent.
    fn not(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }
}

/// A board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Row-major square index; in `0..64` for on-board positions.
    pub fn index(self) -> usize {
        self.row as usize * 8 + self.col as usize
    }
}

/// Piece tally by color. Empty squares are not counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PieceCount {
    pub black: u8,
    pub white: u8,
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Winner(Player),
    Draw,
}

/// What the most recent successful move did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveReport {
    pub player: Player,
    pub position: Position,
    /// Recolored squares, row-major.
    pub flipped: Vec<Position>,
    /// `true` when the opponent had no reply and `player` moves again.
    pub opponent_passed: bool,
}

/// Public game state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    pub board: Vec<u8>,
    pub current_player: u8,
    pub black_count: u8,
    pub white_count: u8,
    pub is_game_over: bool,
    /// Contract:
    /// - `true` when the previous move left the opponent without a reply,
    ///   so `current_player` did not change.
    /// - `false` otherwise, including before the first move.
    pub is_pass: bool,
    /// Contract:
    /// - After a move: flipped square indices (0..=63), row-major.
    /// - Before the first move: empty.
    pub flipped: Vec<u8>,
}

/// Final result after game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    /// 1=black, 2=white, 0=draw.
    pub winner: u8,
    pub black_count: u8,
    pub white_count: u8,
}
