use log::{debug, info, trace};

use crate::board::{self, Board, Direction};
use crate::error::SetupError;
use crate::setup::GameSetup;
use crate::types::{GameResult, GameState, MoveReport, Outcome, PieceCount, Player, Position};

/// A single in-memory Othello session.
///
/// `make_move` is the only way the position changes once play starts.
/// After the game is over every mutating call is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEngine {
    board: Board,
    current_player: Player,
    game_over: bool,
    last_move: Option<MoveReport>,
}

impl GameEngine {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Player::Black,
            game_over: false,
            last_move: None,
        }
    }

    /// Starts from an arbitrary position. If `current_player` has no move the
    /// turn goes to the opponent; if neither side can move the game is over.
    pub fn from_board(board: Board, current_player: Player) -> Self {
        let mut engine = Self {
            board,
            current_player,
            game_over: false,
            last_move: None,
        };

        if !engine.has_valid_moves(current_player) && engine.has_valid_moves(!current_player) {
            info!(
                "{current_player:?} has no valid move in the setup; {:?} moves first",
                !current_player
            );
            engine.current_player = !current_player;
        }
        engine.check_game_over();
        engine
    }

    pub fn from_setup(setup: &GameSetup) -> Result<Self, SetupError> {
        Ok(Self::from_board(setup.board()?, setup.player()?))
    }

    /// Restores the standard opening position.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn last_move(&self) -> Option<&MoveReport> {
        self.last_move.as_ref()
    }

    pub fn is_valid_position(&self, row: i32, col: i32) -> bool {
        board::is_valid_position(row, col)
    }

    pub fn can_flip_in_direction(
        &self,
        row: i32,
        col: i32,
        direction: Direction,
        player: Player,
    ) -> bool {
        self.board.can_flip_in_direction(row, col, direction, player)
    }

    pub fn is_valid_move(&self, row: i32, col: i32, player: Player) -> bool {
        self.board.is_valid_move(row, col, player)
    }

    /// Legal moves for `player` in row-major order.
    pub fn valid_moves(&self, player: Player) -> Vec<Position> {
        self.board.valid_moves(player)
    }

    pub fn has_valid_moves(&self, player: Player) -> bool {
        self.board.legal_moves(player) != 0
    }

    pub fn count_pieces(&self) -> PieceCount {
        self.board.count()
    }

    /// `None` until the game is over.
    pub fn winner(&self) -> Option<Outcome> {
        if !self.game_over {
            return None;
        }

        let PieceCount { black, white } = self.count_pieces();
        Some(if black > white {
            Outcome::Winner(Player::Black)
        } else if white > black {
            Outcome::Winner(Player::White)
        } else {
            Outcome::Draw
        })
    }

    /// Recolors the closed run along `direction`. Returns the flipped squares,
    /// empty when the run is not closed by a `player` piece.
    pub fn flip_in_direction(
        &mut self,
        row: i32,
        col: i32,
        direction: Direction,
        player: Player,
    ) -> Vec<Position> {
        if self.game_over {
            return Vec::new();
        }
        board::mask_to_positions(self.board.flip_in_direction(row, col, direction, player))
    }

    /// Plays `(row, col)` for the current player.
    /// Returns `false` without touching any state if the game is over or the move is illegal.
    pub fn make_move(&mut self, row: i32, col: i32) -> bool {
        if self.game_over {
            trace!("rejected move ({row}, {col}): game is over");
            return false;
        }

        let player = self.current_player;
        if !self.is_valid_move(row, col, player) {
            trace!("rejected move ({row}, {col}) for {player:?}: illegal");
            return false;
        }

        let flips = self.board.place(row, col, player);
        debug_assert_ne!(flips, 0, "valid move must flip at least one piece");
        debug!("{player:?} played ({row}, {col}), flipped {}", flips.count_ones());

        self.switch_player();
        self.check_game_over();

        let opponent_passed = !self.game_over && self.current_player == player;
        if opponent_passed {
            info!("{:?} has no valid move; {player:?} moves again", !player);
        }

        self.last_move = Some(MoveReport {
            player,
            position: Position::new(row as u8, col as u8),
            flipped: board::mask_to_positions(flips),
            opponent_passed,
        });
        trace!("board after move:\n{}", self.board);

        true
    }

    /// Hands the turn to the opponent if they can move, keeps it with the
    /// current player if only they can move, and ends the game otherwise.
    pub fn switch_player(&mut self) {
        if self.game_over {
            return;
        }

        let next = !self.current_player;
        if self.has_valid_moves(next) {
            self.current_player = next;
        } else if !self.has_valid_moves(self.current_player) {
            self.finish();
        }
    }

    /// Ends the game when neither side has a valid move.
    /// Works on any position, not only ones reached through `make_move`.
    pub fn check_game_over(&mut self) -> bool {
        if !self.game_over
            && !self.has_valid_moves(Player::Black)
            && !self.has_valid_moves(Player::White)
        {
            self.finish();
        }
        self.game_over
    }

    pub fn to_game_state(&self) -> GameState {
        let PieceCount { black, white } = self.count_pieces();
        let (is_pass, flipped) = match &self.last_move {
            Some(report) => (
                report.opponent_passed,
                report.flipped.iter().map(|pos| pos.index() as u8).collect(),
            ),
            None => (false, Vec::new()),
        };

        GameState {
            board: self.board.to_array().to_vec(),
            current_player: self.current_player.code(),
            black_count: black,
            white_count: white,
            is_game_over: self.game_over,
            is_pass,
            flipped,
        }
    }

    /// `None` until the game is over.
    pub fn to_game_result(&self) -> Option<GameResult> {
        let winner = match self.winner()? {
            Outcome::Winner(player) => player.code(),
            Outcome::Draw => 0,
        };
        let PieceCount { black, white } = self.count_pieces();
        Some(GameResult {
            winner,
            black_count: black,
            white_count: white,
        })
    }

    fn finish(&mut self) {
        self.game_over = true;
        let PieceCount { black, white } = self.count_pieces();
        let reason = if self.board.is_full() {
            "board full"
        } else {
            "no valid moves"
        };
        info!("game over ({reason}): black {black}, white {white}");
    }

    #[cfg(test)]
    fn set_board_for_test(&mut self, board: Board, current_player: Player) {
        self.board = board;
        self.current_player = current_player;
        self.game_over = false;
        self.last_move = None;
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;

    /// Installs the position as-is, without the turn and game-over checks of `from_board`.
    fn engine(rows: &[&str], to_move: Player) -> GameEngine {
        let mut game = GameEngine::new();
        game.set_board_for_test(Board::from_rows(rows).unwrap(), to_move);
        game
    }

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col)
    }

    fn sorted(mut moves: Vec<Position>) -> Vec<Position> {
        moves.sort_by_key(|p| p.index());
        moves
    }

    /// Black has an immediate move that leaves white without a reply while
    /// black keeps a capture at (7,2).
    fn forced_pass_position() -> GameEngine {
        engine(
            &[
                "BW......", //
                "........",
                "........",
                "........",
                "........",
                "........",
                "........",
                "BW......",
            ],
            Player::Black,
        )
    }

    #[test]
    fn initial_state_is_correct() {
        let game = GameEngine::new();

        assert_eq!(game.board().get(3, 3), Some(Cell::White));
        assert_eq!(game.board().get(3, 4), Some(Cell::Black));
        assert_eq!(game.board().get(4, 3), Some(Cell::Black));
        assert_eq!(game.board().get(4, 4), Some(Cell::White));
        assert_eq!(game.board().empty_count(), 60);
        assert_eq!(game.current_player(), Player::Black);
        assert!(!game.is_game_over());
        assert_eq!(game.count_pieces(), PieceCount { black: 2, white: 2 });
        assert_eq!(game.winner(), None);
        assert!(game.last_move().is_none());

        let state = game.to_game_state();
        assert_eq!(state.board.len(), 64);
        assert!(!state.is_pass);
        assert!(state.flipped.is_empty());
    }

    #[test]
    fn initial_valid_moves_for_black() {
        let game = GameEngine::new();

        assert_eq!(
            sorted(game.valid_moves(Player::Black)),
            vec![pos(2, 3), pos(3, 2), pos(4, 5), pos(5, 4)]
        );
    }

    #[test]
    fn illegal_moves_are_rejected_without_mutation() {
        let mut game = GameEngine::new();
        let before = game.clone();

        for (row, col) in [(0, 0), (3, 3), (4, 4), (-1, 0), (0, -1), (8, 0), (0, 8), (2, 2)] {
            assert!(!game.is_valid_move(row, col, Player::Black));
            assert!(!game.make_move(row, col));
        }

        assert_eq!(game, before);
    }

    #[test]
    fn first_move_flips_and_switches_turn() {
        let mut game = GameEngine::new();

        assert!(game.make_move(2, 3));

        assert_eq!(game.board().get(2, 3), Some(Cell::Black));
        assert_eq!(game.board().get(3, 3), Some(Cell::Black));
        assert_eq!(game.current_player(), Player::White);
        assert_eq!(game.count_pieces(), PieceCount { black: 4, white: 1 });

        let report = game.last_move().unwrap();
        assert_eq!(report.player, Player::Black);
        assert_eq!(report.position, pos(2, 3));
        assert_eq!(report.flipped, vec![pos(3, 3)]);
        assert!(!report.opponent_passed);

        let state = game.to_game_state();
        assert_eq!(state.current_player, 2);
        assert_eq!(state.flipped, vec![27]);
    }

    #[test]
    fn move_sequence_updates_counts() {
        let mut game = GameEngine::new();

        assert!(game.make_move(2, 3));
        assert!(game.make_move(2, 2));

        assert_eq!(game.count_pieces(), PieceCount { black: 3, white: 3 });
        assert_eq!(game.current_player(), Player::Black);
    }

    #[test]
    fn forced_pass_keeps_the_turn() {
        let mut game = forced_pass_position();

        assert!(game.make_move(0, 2));

        assert_eq!(game.current_player(), Player::Black);
        assert!(!game.is_game_over());
        assert!(game.valid_moves(Player::White).is_empty());
        assert_eq!(game.valid_moves(Player::Black), vec![pos(7, 2)]);
        assert!(game.last_move().unwrap().opponent_passed);
        assert!(game.to_game_state().is_pass);
    }

    #[test]
    fn game_ends_when_neither_side_can_move() {
        let mut game = forced_pass_position();

        assert!(game.make_move(0, 2));
        assert!(game.make_move(7, 2));

        assert!(game.is_game_over());
        assert_eq!(game.current_player(), Player::Black);
        assert!(!game.last_move().unwrap().opponent_passed);
        assert_eq!(game.count_pieces(), PieceCount { black: 6, white: 0 });
        assert_eq!(game.winner(), Some(Outcome::Winner(Player::Black)));
    }

    #[test]
    fn no_moves_after_game_over() {
        let mut game = forced_pass_position();
        game.make_move(0, 2);
        game.make_move(7, 2);
        let before = game.clone();

        assert!(!game.make_move(0, 3));
        assert!(game.flip_in_direction(0, 3, (0, -1), Player::White).is_empty());
        game.switch_player();
        assert!(game.check_game_over());

        assert_eq!(game, before);
    }

    #[test]
    fn full_board_is_game_over_on_check() {
        let mut game = engine(&["BBBBBBBB"; 8], Player::White);

        assert!(game.board().is_full());
        assert!(!game.is_game_over());
        assert_eq!(game.winner(), None);

        assert!(game.check_game_over());
        assert!(game.is_game_over());
        assert!(!game.make_move(0, 0));
    }

    #[test]
    fn check_game_over_leaves_live_positions_alone() {
        let mut game = GameEngine::new();

        assert!(!game.check_game_over());
        assert!(!game.is_game_over());
        assert_eq!(game, GameEngine::new());
    }

    #[test]
    fn stuck_position_with_empty_squares_is_game_over() {
        let mut game = engine(
            &[
                "B.......", //
                "........",
                "........",
                "........",
                "........",
                "........",
                "........",
                ".......W",
            ],
            Player::Black,
        );

        assert!(game.check_game_over());
        assert_eq!(game.winner(), Some(Outcome::Draw));
    }

    #[test]
    fn winner_by_piece_count() {
        let mut black_wins = engine(
            &[
                "BBBBBBBB", "BBBBBBBB", "BBBBBBBB", "BBBBBBBB", "BBBBBBBB", "WWWWWWWW", "WWWWWWWW",
                "WWWWWWWW",
            ],
            Player::Black,
        );
        let mut white_wins = engine(
            &[
                "BBBBBBBB", "WWWWWWWW", "WWWWWWWW", "WWWWWWWW", "WWWWWWWW", "WWWWWWWW", "WWWWWWWW",
                "WWWWWWWW",
            ],
            Player::Black,
        );
        let mut draw = engine(
            &[
                "BBBBBBBB", "BBBBBBBB", "BBBBBBBB", "BBBBBBBB", "WWWWWWWW", "WWWWWWWW", "WWWWWWWW",
                "WWWWWWWW",
            ],
            Player::Black,
        );

        for game in [&mut black_wins, &mut white_wins, &mut draw] {
            assert_eq!(game.winner(), None);
            assert!(game.check_game_over());
        }

        assert_eq!(black_wins.winner(), Some(Outcome::Winner(Player::Black)));
        assert_eq!(white_wins.winner(), Some(Outcome::Winner(Player::White)));
        assert_eq!(draw.winner(), Some(Outcome::Draw));

        assert_eq!(
            black_wins.to_game_result(),
            Some(GameResult {
                winner: 1,
                black_count: 40,
                white_count: 24
            })
        );
        assert_eq!(white_wins.to_game_result().map(|r| r.winner), Some(2));
        assert_eq!(draw.to_game_result().map(|r| r.winner), Some(0));
    }

    #[test]
    fn queries_are_idempotent() {
        let mut game = GameEngine::new();
        game.make_move(2, 3);
        let before = game.clone();

        assert_eq!(game.count_pieces(), game.count_pieces());
        assert_eq!(game.valid_moves(Player::White), game.valid_moves(Player::White));
        assert_eq!(game.winner(), game.winner());
        assert_eq!(game.to_game_state(), game.to_game_state());
        assert_eq!(game, before);
    }

    #[test]
    fn valid_moves_are_row_major() {
        let mut game = GameEngine::new();
        game.make_move(2, 3);

        let moves = game.valid_moves(Player::White);
        assert_eq!(moves, sorted(moves.clone()));
        assert_eq!(moves, vec![pos(2, 2), pos(2, 4), pos(4, 2)]);
    }

    #[test]
    fn reset_restores_the_opening() {
        let mut game = forced_pass_position();
        game.make_move(0, 2);
        game.make_move(7, 2);

        game.reset();

        assert_eq!(game, GameEngine::new());
    }

    #[test]
    fn from_setup_uses_rows_and_side() {
        let setup = GameSetup::new(
            [
                "........", "........", "........", "...WB...", "...BW...", "........", "........",
                "........",
            ],
            Player::White,
        );
        let game = GameEngine::from_setup(&setup).unwrap();

        assert_eq!(game.board(), &Board::new());
        assert_eq!(game.current_player(), Player::White);

        let bad = GameSetup {
            rows: vec!["........".to_string()],
            to_move: 1,
        };
        assert_eq!(
            GameEngine::from_setup(&bad),
            Err(SetupError::RowCount { found: 1 })
        );
    }

    #[test]
    fn flip_in_direction_without_closing_piece_is_safe() {
        let mut game = GameEngine::new();
        let before = game.clone();

        // (3,3) white, closed by (4,3) black.
        assert!(game.can_flip_in_direction(2, 3, (1, 0), Player::Black));
        // (3,4) is already black.
        assert!(!game.can_flip_in_direction(2, 4, (1, 0), Player::Black));
        assert!(game.flip_in_direction(2, 4, (1, 0), Player::Black).is_empty());
        assert_eq!(game, before);

        assert_eq!(
            game.flip_in_direction(2, 3, (1, 0), Player::Black),
            vec![pos(3, 3)]
        );
    }

    #[test]
    fn from_board_hands_the_turn_to_the_side_that_can_move() {
        let rows = [
            "BW......", "........", "........", "........", "........", "........", "........",
            "BW......",
        ];
        let mut game = GameEngine::from_setup(&GameSetup::new(rows, Player::White)).unwrap();

        assert_eq!(game.current_player(), Player::Black);
        assert!(!game.is_game_over());
        assert!(game.make_move(0, 2));
    }

    #[test]
    fn from_board_ends_a_position_where_nobody_can_move() {
        let full = GameEngine::from_board(
            Board::from_rows(&["WWWWWWWW"; 8]).unwrap(),
            Player::Black,
        );
        assert!(full.is_game_over());
        assert_eq!(full.current_player(), Player::Black);
        assert_eq!(full.winner(), Some(Outcome::Winner(Player::White)));

        let sparse = GameEngine::from_board(
            Board::from_rows(&[
                "B.......", "........", "........", "........", "........", "........", "........",
                ".......W",
            ])
            .unwrap(),
            Player::White,
        );
        assert!(sparse.is_game_over());
        assert_eq!(sparse.winner(), Some(Outcome::Draw));
    }

    #[test]
    fn from_board_keeps_a_live_side_to_move() {
        let game = GameEngine::from_board(Board::new(), Player::White);

        assert_eq!(game.current_player(), Player::White);
        assert!(!game.is_game_over());
    }
}
