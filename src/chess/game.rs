//! The game: a [`Board`] plus the history of executed moves.
//!
//! Turn and [`GameState`] are never stored: they are derived from the board
//! and the history every time they are queried. "What if" questions (does this
//! move leave the king in check? what state does it lead to?) are answered by
//! cloning the whole game, making the move on the clone and inspecting it.

use std::fmt;

use anyhow::bail;
use arrayvec::ArrayVec;

use crate::chess::board::Board;
use crate::chess::core::{Color, Move, MoveEffects, Piece, PieceKind, Position};
use crate::chess::rules;

/// Upper bound on the number of destinations of a single piece (a queen in the
/// middle of an empty board).
pub const MAX_DESTINATIONS: usize = 27;

/// Termination state of the game for the side to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameState {
    /// Regular position: the side to move is not in check and has moves.
    Idle,
    /// The king of the side to move is attacked, but it can escape.
    Check,
    /// The king is attacked and there is no way out.
    CheckMate,
    /// No legal moves while not being in check.
    StaleMate,
}

impl GameState {
    /// Returns `true` for checkmate and stalemate.
    #[must_use]
    pub const fn is_over(self) -> bool {
        matches!(self, Self::CheckMate | Self::StaleMate)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Check => "check",
            Self::CheckMate => "checkmate",
            Self::StaleMate => "stalemate",
        })
    }
}

/// State of the chess game: placement and the append-only list of moves that
/// led to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game {
    pub(super) board: Board,
    pub(super) history: Vec<Move>,
}

impl Game {
    /// Starts a new game from the standard starting position.
    #[must_use]
    pub fn new() -> Self {
        Self::with_board(Board::starting())
    }

    /// Starts a game from an arbitrary placement with White to move.
    #[must_use]
    pub const fn with_board(board: Board) -> Self {
        Self {
            board,
            history: Vec::new(),
        }
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Executed moves, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// The side to move: opponent of whoever made the last move, White if no
    /// moves were made yet.
    #[must_use]
    pub fn turn(&self) -> Color {
        self.history
            .last()
            .and_then(|last| self.board.piece(last.to))
            .map_or(Color::White, |piece| piece.color().opponent())
    }

    /// Derives the termination state for the side to move.
    #[must_use]
    pub fn state(&self) -> GameState {
        let color = self.turn();
        let has_moves = self
            .candidate_moves(color)
            .into_iter()
            .any(|next_move| !self.leaves_king_in_check(next_move));
        match (self.king_is_in_check(color), has_moves) {
            (true, true) => GameState::Check,
            (true, false) => GameState::CheckMate,
            (false, true) => GameState::Idle,
            (false, false) => GameState::StaleMate,
        }
    }

    /// Only the pieces of the side to move can be picked up.
    #[must_use]
    pub fn can_select_piece(&self, at: Position) -> bool {
        self.board
            .piece(at)
            .is_some_and(|piece| piece.color() == self.turn())
    }

    /// All moves of `color` pieces allowed by [`Game::can_move`], including the
    /// ones leaving own king in check.
    #[must_use]
    pub fn candidate_moves(&self, color: Color) -> Vec<Move> {
        self.board
            .iter()
            .filter(|(_, piece)| piece.color() == color)
            .flat_map(|(from, _)| {
                Position::iter()
                    .filter(move |&to| self.can_move(from, to))
                    .map(move |to| Move::new(from, to))
            })
            .collect()
    }

    /// Moves of `color` that are legal under full chess rules: allowed by
    /// [`Game::can_move`] and not leaving own king in check.
    #[must_use]
    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        self.candidate_moves(color)
            .into_iter()
            .filter(|&next_move| !self.leaves_king_in_check(next_move))
            .collect()
    }

    /// Combines [`Game::can_move`] with the simulation checking that the mover
    /// does not end up in check.
    #[must_use]
    pub fn is_legal(&self, from: Position, to: Position) -> bool {
        self.can_move(from, to) && !self.leaves_king_in_check(Move::new(from, to))
    }

    /// Destinations of legal moves of the piece at `at`.
    #[must_use]
    pub fn moves_for_piece(&self, at: Position) -> ArrayVec<Position, MAX_DESTINATIONS> {
        Position::iter().filter(|&to| self.is_legal(at, to)).collect()
    }

    /// Simulates the move on a copy of the game and checks the mover's king.
    pub(crate) fn leaves_king_in_check(&self, next_move: Move) -> bool {
        let Some(piece) = self.board.piece(next_move.from) else {
            return true;
        };
        let mut next = self.clone();
        let _ = next.make_move(next_move.from, next_move.to);
        next.king_is_in_check(piece.color())
    }

    /// Executes the move and appends it to the history. Castling relocates the
    /// rook and en passant removes the captured pawn.
    ///
    /// The caller is responsible for checking [`Game::can_move`] first: no
    /// legality derivation is done here. Use [`Game::try_make_move`] for
    /// untrusted input.
    pub fn make_move(&mut self, from: Position, to: Position) -> MoveEffects {
        debug_assert!(
            self.can_move(from, to),
            "illegal move {}:\n{:?}",
            Move::new(from, to),
            self.board
        );
        let mut effects = MoveEffects::empty();
        let Some(piece) = self.board.piece(from) else {
            return effects;
        };
        if self.board.piece(to).is_some() {
            effects |= MoveEffects::CAPTURE;
        }
        let delta = to - from;
        match piece.kind() {
            PieceKind::Pawn if delta.dx != 0 && self.board.piece(to).is_none() => {
                let passed = Position::new(to.x, from.y);
                log::debug!("{from}{to} captures {passed} en passant");
                self.board.remove_piece(passed);
                effects |= MoveEffects::CAPTURE | MoveEffects::EN_PASSANT;
            },
            PieceKind::Pawn if delta.dy.abs() == 2 => effects |= MoveEffects::DOUBLE_PAWN_PUSH,
            PieceKind::King if delta.dx.abs() == 2 => {
                let (rook_from, rook_to) = rules::castling_rook_move(to);
                log::debug!("{from}{to} castles, rook {rook_from}{rook_to}");
                self.board.move_piece(rook_from, rook_to);
                effects |= MoveEffects::CASTLE;
            },
            _ => (),
        }
        self.board.move_piece(from, to);
        self.history.push(Move::new(from, to));
        effects
    }

    /// Validating counterpart of [`Game::make_move`] for the public boundary.
    ///
    /// # Errors
    ///
    /// Returns an error and leaves the game untouched if there is no piece of
    /// the side to move at `from` or the move is not legal.
    pub fn try_make_move(&mut self, from: Position, to: Position) -> anyhow::Result<MoveEffects> {
        let Some(piece) = self.board.piece(from) else {
            bail!("no piece at {from}");
        };
        let turn = self.turn();
        if piece.color() != turn {
            bail!("it is {turn}'s turn, {from} holds a {} piece", piece.color());
        }
        if !self.is_legal(from, to) {
            bail!("illegal move {}", Move::new(from, to));
        }
        Ok(self.make_move(from, to))
    }

    /// A pawn standing on the opponent's home rank has to be promoted.
    #[must_use]
    pub fn can_promote_piece(&self, at: Position) -> bool {
        self.board.piece(at).is_some_and(|piece| {
            piece.kind() == PieceKind::Pawn && at.y == piece.color().promotion_rank()
        })
    }

    /// Changes the kind of the pawn at `at`. The caller is responsible for
    /// checking [`Game::can_promote_piece`] first.
    pub fn promote_piece(&mut self, at: Position, kind: PieceKind) {
        debug_assert!(self.can_promote_piece(at), "nothing to promote at {at}");
        log::debug!("promoting {at} to {kind}");
        self.board.promote_piece(at, kind);
    }

    /// Validating counterpart of [`Game::promote_piece`].
    ///
    /// # Errors
    ///
    /// Returns an error if there is no pawn to promote at `at` or `kind` is
    /// not a rook, knight, bishop or queen.
    pub fn try_promote_piece(&mut self, at: Position, kind: PieceKind) -> anyhow::Result<()> {
        if !self.can_promote_piece(at) {
            bail!("there is no pawn to promote at {at}");
        }
        if matches!(kind, PieceKind::Pawn | PieceKind::King) {
            bail!("pawn can not be promoted to {kind}");
        }
        self.promote_piece(at, kind);
        Ok(())
    }

    /// The piece that the move would capture, including en passant.
    #[must_use]
    pub fn captured_piece(&self, next_move: Move) -> Option<Piece> {
        self.board.piece(next_move.to).or_else(|| {
            if self.can_take_en_passant(next_move.from, next_move.to) {
                self.board
                    .piece(Position::new(next_move.to.x, next_move.from.y))
            } else {
                None
            }
        })
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn at(square: &str) -> Position {
        Position::try_from(square).unwrap()
    }

    fn play(game: &mut Game, moves: &[&str]) {
        for next_move in moves {
            let next_move = Move::try_from(*next_move).unwrap();
            let _ = game.try_make_move(next_move.from, next_move.to).unwrap();
        }
    }

    #[test]
    fn starting_game() {
        let game = Game::new();
        assert_eq!(game.turn(), Color::White);
        assert_eq!(game.state(), GameState::Idle);
        assert!(game.history().is_empty());
        assert_eq!(game.legal_moves(Color::White).len(), 20);
        assert_eq!(game.legal_moves(Color::Black).len(), 20);
        assert!(game.can_select_piece(at("e2")));
        assert!(!game.can_select_piece(at("e7")));
        assert!(!game.can_select_piece(at("e4")));
    }

    #[test]
    fn turns_alternate() {
        let mut game = Game::new();
        play(&mut game, &["e2e4"]);
        assert_eq!(game.turn(), Color::Black);
        assert!(game.can_select_piece(at("e7")));
        play(&mut game, &["e7e5"]);
        assert_eq!(game.turn(), Color::White);
        assert_eq!(
            game.history(),
            &[
                Move::try_from("e2e4").unwrap(),
                Move::try_from("e7e5").unwrap()
            ]
        );
    }

    #[test]
    fn moves_for_piece() {
        let game = Game::new();
        assert_eq!(
            game.moves_for_piece(at("g1")).as_slice(),
            &[at("f3"), at("h3")]
        );
        assert_eq!(
            game.moves_for_piece(at("e2")).as_slice(),
            &[at("e4"), at("e3")]
        );
        assert!(game.moves_for_piece(at("a1")).is_empty());
        assert!(game.moves_for_piece(at("e4")).is_empty());
    }

    #[test]
    fn pinned_piece_has_no_moves() {
        // The bishop on e2 shields the king from the rook.
        let game = Game::with_board(Board::from_diagram("4r2k/8/8/8/8/8/4B3/4K3").unwrap());
        assert!(game.candidate_moves(Color::White).contains(&Move::new(at("e2"), at("d3"))));
        assert!(game.moves_for_piece(at("e2")).is_empty());
        assert!(!game.is_legal(at("e2"), at("d3")));
        assert_eq!(game.state(), GameState::Idle);
    }

    #[test]
    fn rejects_untrusted_moves() {
        let mut game = Game::new();
        assert!(game.try_make_move(at("e4"), at("e5")).is_err());
        assert!(game.try_make_move(at("e7"), at("e5")).is_err());
        assert!(game.try_make_move(at("e2"), at("e5")).is_err());
        assert_eq!(game, Game::new());
        assert_eq!(
            game.try_make_move(at("e2"), at("e4")).unwrap(),
            MoveEffects::DOUBLE_PAWN_PUSH
        );
    }

    #[test]
    fn move_effects() {
        let mut game = Game::new();
        play(&mut game, &["e2e4", "d7d5"]);
        assert_eq!(
            game.make_move(at("e4"), at("d5")),
            MoveEffects::CAPTURE
        );
        assert_eq!(game.board().iter().count(), 31);
        assert_eq!(game.make_move(at("g8"), at("f6")), MoveEffects::empty());
    }

    #[test]
    fn promotion() {
        let mut game = Game::with_board(Board::from_diagram("7k/P7/8/8/8/8/8/K7").unwrap());
        assert!(!game.can_promote_piece(at("a7")));
        let _ = game.make_move(at("a7"), at("a8"));
        assert!(game.can_promote_piece(at("a8")));
        assert_eq!(game.board().piece(at("a8")).unwrap().kind(), PieceKind::Pawn);
        assert!(game.try_promote_piece(at("a8"), PieceKind::King).is_err());
        assert!(game.try_promote_piece(at("h8"), PieceKind::Queen).is_err());
        game.try_promote_piece(at("a8"), PieceKind::Queen).unwrap();
        let queen = game.board().piece(at("a8")).unwrap();
        assert_eq!(queen.kind(), PieceKind::Queen);
        assert_eq!(queen.code(), "WQ0");
        assert_eq!(queen.id().to_string(), "WP0");
        assert!(!game.can_promote_piece(at("a8")));
        // Black king is attacked along the rank.
        assert_eq!(game.state(), GameState::Check);
    }

    #[test]
    fn captured_pieces() {
        let mut game = Game::new();
        play(&mut game, &["e2e4", "d7d5"]);
        assert_eq!(
            game.captured_piece(Move::try_from("e4d5").unwrap())
                .map(|piece| piece.code()),
            Some("BP3".to_string())
        );
        assert_eq!(game.captured_piece(Move::try_from("e4e5").unwrap()), None);
    }

    #[test]
    fn state_display() {
        assert_eq!(GameState::CheckMate.to_string(), "checkmate");
        assert!(GameState::StaleMate.is_over());
        assert!(!GameState::Check.is_over());
    }
}
