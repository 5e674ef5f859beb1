//! Threat detection: which squares and pieces are attacked, and whether the
//! king is in check.
//!
//! Attacks are derived from [`Game::can_move`] with one exception: pawns attack
//! diagonally regardless of what stands on the target square, which matters
//! for empty squares the king would castle through.

use crate::chess::core::{Color, PieceKind, Position};
use crate::chess::game::Game;
use crate::chess::rules;

impl Game {
    /// Returns `true` if any piece of the opposite color can capture the piece
    /// standing at `at`. Empty squares are never threatened.
    #[must_use]
    pub fn piece_is_threatened(&self, at: Position) -> bool {
        self.board.piece(at).is_some() && Position::iter().any(|from| self.can_move(from, at))
    }

    /// Returns `true` if a piece of color `by` attacks `position`, whether or
    /// not it is occupied.
    ///
    /// ```
    /// use tabiya::chess::core::{Color, Position};
    /// use tabiya::chess::game::Game;
    ///
    /// let game = Game::new();
    /// // Covered by the pawns on d7 and f7.
    /// assert!(game.position_is_threatened(Position::try_from("e6").unwrap(), Color::Black));
    /// assert!(!game.position_is_threatened(Position::try_from("e4").unwrap(), Color::Black));
    /// ```
    #[must_use]
    pub fn position_is_threatened(&self, position: Position, by: Color) -> bool {
        if !position.is_on_board() {
            return false;
        }
        self.board
            .iter()
            .filter(|(_, piece)| piece.color() == by)
            .any(|(from, piece)| match piece.kind() {
                PieceKind::Pawn => rules::pawn_can_take(by, position - from),
                _ => self.can_move(from, position),
            })
    }

    /// Square of the `color` king. Falls back to `a8` for boards without one,
    /// which only happen in hand-made setups.
    #[must_use]
    pub fn king_position(&self, color: Color) -> Position {
        self.board
            .first_position(|piece| piece.color() == color && piece.kind() == PieceKind::King)
            .unwrap_or_default()
    }

    #[must_use]
    #[allow(missing_docs)]
    pub fn king_is_in_check(&self, color: Color) -> bool {
        let king = self.king_position(color);
        self.board
            .piece(king)
            .is_some_and(|piece| piece.kind() == PieceKind::King && piece.color() == color)
            && self.position_is_threatened(king, color.opponent())
    }

    /// Squares of `color` pieces that the opponent can capture right away.
    pub fn threatened_pieces(&self, color: Color) -> impl Iterator<Item = Position> + '_ {
        self.board
            .iter()
            .filter(move |(_, piece)| piece.color() == color)
            .map(|(at, _)| at)
            .filter(move |&at| self.piece_is_threatened(at))
    }
}
