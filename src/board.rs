use std::fmt;
use std::str::FromStr;

use crate::error::SetupError;
use crate::types::{Cell, PieceCount, Player, Position};

pub const BOARD_SIZE: usize = 8;
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

/// A (row-delta, col-delta) step. Never `(0, 0)`.
pub type Direction = (i32, i32);

pub const DIRECTIONS: [Direction; 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Othello board state represented by two disjoint bitboards.
/// Bit `row * 8 + col` is set in at most one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    black: u64,
    white: u64,
}

impl Board {
    /// Creates the initial board:
    /// (3,3)=white, (3,4)=black, (4,3)=black, (4,4)=white.
    pub fn new() -> Self {
        Self {
            black: bit(3, 4) | bit(4, 3),
            white: bit(3, 3) | bit(4, 4),
        }
    }

    pub fn empty() -> Self {
        Self { black: 0, white: 0 }
    }

    /// Parses 8 rows of 8 cell characters (see [`parse_cell`]).
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, SetupError> {
        if rows.len() != BOARD_SIZE {
            return Err(SetupError::RowCount { found: rows.len() });
        }

        let mut board = Self::empty();
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref().trim();
            let width = line.chars().count();
            if width != BOARD_SIZE {
                return Err(SetupError::RowWidth { row, found: width });
            }
            for (col, ch) in line.chars().enumerate() {
                let cell = parse_cell(ch).ok_or(SetupError::UnknownCell { row, col, ch })?;
                board.set(row as i32, col as i32, cell);
            }
        }
        Ok(board)
    }

    /// Returns the cell at `(row, col)`, or `None` off the board.
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        if !is_valid_position(row, col) {
            return None;
        }
        let square = bit(row, col);
        Some(if self.black & square != 0 {
            Cell::Black
        } else if self.white & square != 0 {
            Cell::White
        } else {
            Cell::Empty
        })
    }

    /// Returns `true` if a run of `!player` pieces starting one step from
    /// `(row, col)` along `direction` is closed by a `player` piece.
    pub fn can_flip_in_direction(
        &self,
        row: i32,
        col: i32,
        direction: Direction,
        player: Player,
    ) -> bool {
        let (me, opp) = self.sides(player);
        let mut found_opponent = false;
        let mut cursor = step(row, col, direction);

        while let Some((r, c)) = cursor {
            let square = bit(r, c);
            if opp & square != 0 {
                found_opponent = true;
            } else if me & square != 0 {
                return found_opponent;
            } else {
                return false;
            }
            cursor = step(r, c, direction);
        }

        false
    }

    /// Recolors the run of `!player` pieces along `direction` if a `player`
    /// piece closes it. Leaves the board untouched otherwise.
    /// Returns the flipped bit mask.
    pub fn flip_in_direction(
        &mut self,
        row: i32,
        col: i32,
        direction: Direction,
        player: Player,
    ) -> u64 {
        let (me, opp) = self.sides(player);
        let mut pending = 0u64;
        let mut cursor = step(row, col, direction);

        while let Some((r, c)) = cursor {
            let square = bit(r, c);
            if opp & square != 0 {
                pending |= square;
            } else if me & square != 0 {
                self.set_sides(player, me | pending, opp & !pending);
                return pending;
            } else {
                return 0;
            }
            cursor = step(r, c, direction);
        }

        0
    }

    /// A move is valid on an empty in-bounds square that sandwiches at least
    /// one opponent piece in some direction.
    pub fn is_valid_move(&self, row: i32, col: i32, player: Player) -> bool {
        if self.get(row, col) != Some(Cell::Empty) {
            return false;
        }
        DIRECTIONS
            .iter()
            .any(|&direction| self.can_flip_in_direction(row, col, direction, player))
    }

    /// Returns legal move mask for the given side.
    pub fn legal_moves(&self, player: Player) -> u64 {
        let mut legal = 0u64;
        for pos in 0..NUM_SQUARES {
            let (row, col) = pos_to_row_col(pos);
            if self.is_valid_move(row, col, player) {
                legal |= bit(row, col);
            }
        }
        legal
    }

    /// Legal moves for `player` in row-major order.
    pub fn valid_moves(&self, player: Player) -> Vec<Position> {
        mask_to_positions(self.legal_moves(player))
    }

    /// Places one stone and flips captured stones.
    /// Returns flipped bit mask. Returns 0 and leaves the board unchanged when the move is illegal.
    pub fn place(&mut self, row: i32, col: i32, player: Player) -> u64 {
        if !self.is_valid_move(row, col, player) {
            return 0;
        }

        self.set(row, col, Cell::from(player));

        let mut flips = 0u64;
        for direction in DIRECTIONS {
            if self.can_flip_in_direction(row, col, direction, player) {
                flips |= self.flip_in_direction(row, col, direction, player);
            }
        }
        flips
    }

    pub fn count(&self) -> PieceCount {
        PieceCount {
            black: self.black.count_ones() as u8,
            white: self.white.count_ones() as u8,
        }
    }

    /// Returns the number of empty squares.
    pub fn empty_count(&self) -> u8 {
        NUM_SQUARES as u8 - (self.black | self.white).count_ones() as u8
    }

    pub fn is_full(&self) -> bool {
        self.empty_count() == 0
    }

    /// Converts board to `[u8; 64]` where 0=empty, 1=black, 2=white.
    pub fn to_array(&self) -> [u8; NUM_SQUARES] {
        let mut board = [0u8; NUM_SQUARES];
        for (pos, cell) in board.iter_mut().enumerate() {
            let (row, col) = pos_to_row_col(pos);
            *cell = self.get(row, col).map_or(0, Cell::code);
        }
        board
    }

    fn sides(&self, player: Player) -> (u64, u64) {
        match player {
            Player::Black => (self.black, self.white),
            Player::White => (self.white, self.black),
        }
    }

    fn set_sides(&mut self, player: Player, me: u64, opp: u64) {
        match player {
            Player::Black => {
                self.black = me;
                self.white = opp;
            }
            Player::White => {
                self.white = me;
                self.black = opp;
            }
        }
    }

    fn set(&mut self, row: i32, col: i32, cell: Cell) {
        let square = bit(row, col);
        self.black &= !square;
        self.white &= !square;
        match cell {
            Cell::Black => self.black |= square,
            Cell::White => self.white |= square,
            Cell::Empty => {}
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    /// One line per row: `.` empty, `B` black, `W` white.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE as i32 {
            for col in 0..BOARD_SIZE as i32 {
                let ch = match self.get(row, col) {
                    Some(Cell::Black) => 'B',
                    Some(Cell::White) => 'W',
                    _ => '.',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        Self::from_rows(&rows)
    }
}

/// `.`/`-` empty, `B`/`X`/`●` black, `W`/`O`/`○` white.
pub fn parse_cell(ch: char) -> Option<Cell> {
    match ch {
        '.' | '-' => Some(Cell::Empty),
        'B' | 'b' | 'X' | 'x' | '●' => Some(Cell::Black),
        'W' | 'w' | 'O' | 'o' | '○' => Some(Cell::White),
        _ => None,
    }
}

pub fn is_valid_position(row: i32, col: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col)
}

/// Converts a mask to positions in row-major order.
pub fn mask_to_positions(mask: u64) -> Vec<Position> {
    let mut bits = mask;
    let mut out = Vec::with_capacity(bits.count_ones() as usize);

    while bits != 0 {
        let idx = bits.trailing_zeros() as u8;
        out.push(Position::new(idx / BOARD_SIZE as u8, idx % BOARD_SIZE as u8));
        bits &= bits - 1;
    }

    out
}

fn step(row: i32, col: i32, (dr, dc): Direction) -> Option<(i32, i32)> {
    let r = row.checked_add(dr)?;
    let c = col.checked_add(dc)?;
    is_valid_position(r, c).then_some((r, c))
}

fn bit(row: i32, col: i32) -> u64 {
    if is_valid_position(row, col) {
        1u64 << (row as usize * BOARD_SIZE + col as usize)
    } else {
        0
    }
}

fn pos_to_row_col(pos: usize) -> (i32, i32) {
    ((pos / BOARD_SIZE) as i32, (pos % BOARD_SIZE) as i32)
}
