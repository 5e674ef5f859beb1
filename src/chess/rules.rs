//! Movement rules of each piece kind, including the special moves: castling,
//! en passant and the double pawn push.
//!
//! [`Game::can_move`] answers whether the piece can go from one square to the
//! other. It does not look at whose turn it is and it does not care whether
//! the move exposes the mover's own king: that is decided by simulating the
//! move (see [`Game::is_legal`]).

use crate::chess::core::{Color, Delta, PieceKind, Position};
use crate::chess::game::Game;

const KNIGHT_OFFSETS: [Delta; 8] = [
    Delta::new(1, 2),
    Delta::new(2, 1),
    Delta::new(2, -1),
    Delta::new(1, -2),
    Delta::new(-1, -2),
    Delta::new(-2, -1),
    Delta::new(-2, 1),
    Delta::new(-1, 2),
];

/// Column of the king before castling.
const KING_FILE: i8 = 4;
/// Destination columns of the king when castling queenside and kingside.
const QUEENSIDE_KING_FILE: i8 = 2;
const KINGSIDE_KING_FILE: i8 = 6;

/// A pawn captures one square diagonally forward.
pub(super) const fn pawn_can_take(color: Color, delta: Delta) -> bool {
    delta.dx.abs() == 1 && delta.dy == color.forward()
}

/// Squares the rook moves between when the king castles to `king_to`.
pub(super) const fn castling_rook_move(king_to: Position) -> (Position, Position) {
    if king_to.x == KINGSIDE_KING_FILE {
        (Position::new(7, king_to.y), Position::new(king_to.x - 1, king_to.y))
    } else {
        (Position::new(0, king_to.y), Position::new(king_to.x + 1, king_to.y))
    }
}

impl Game {
    /// Checks whether the piece standing at `from` is allowed to move to `to`
    /// by the movement rules of its kind.
    ///
    /// ```
    /// use tabiya::chess::core::Position;
    /// use tabiya::chess::game::Game;
    ///
    /// let game = Game::new();
    /// let e2 = Position::try_from("e2").unwrap();
    /// assert!(game.can_move(e2, Position::try_from("e4").unwrap()));
    /// assert!(!game.can_move(e2, Position::try_from("e5").unwrap()));
    /// assert!(!game.can_move(e2, e2));
    /// ```
    #[must_use]
    pub fn can_move(&self, from: Position, to: Position) -> bool {
        let Some(piece) = self.board.piece(from) else {
            return false;
        };
        if !to.is_on_board() {
            return false;
        }
        let color = piece.color();
        let delta = to - from;
        match self.board.piece(to) {
            Some(target) if target.color() == color => return false,
            // Pawns capture differently from how they move.
            Some(_) if piece.kind() == PieceKind::Pawn => return pawn_can_take(color, delta),
            _ => (),
        }
        match piece.kind() {
            PieceKind::Pawn => {
                self.can_take_en_passant(from, to) || self.pawn_can_push(color, from, to)
            },
            PieceKind::Rook => delta.is_straight() && !self.board.pieces_exist(from, to),
            PieceKind::Bishop => delta.is_diagonal() && !self.board.pieces_exist(from, to),
            PieceKind::Queen => {
                (delta.is_straight() || delta.is_diagonal())
                    && !self.board.pieces_exist(from, to)
            },
            PieceKind::King => {
                (delta.dx.abs() <= 1 && delta.dy.abs() <= 1) || self.castling_permitted(from, to)
            },
            PieceKind::Knight => KNIGHT_OFFSETS.contains(&delta),
        }
    }

    /// Forward moves onto an empty square: one step, or two from the starting
    /// row when nothing stands in between.
    fn pawn_can_push(&self, color: Color, from: Position, to: Position) -> bool {
        let delta = to - from;
        if delta.dx != 0 {
            return false;
        }
        if delta.dy == color.forward() {
            return true;
        }
        delta.dy == 2 * color.forward()
            && from.y == color.pawn_rank()
            && self
                .board
                .piece(Position::new(from.x, from.y + color.forward()))
                .is_none()
    }

    /// A pawn can capture an enemy pawn that has just advanced two squares
    /// past it, moving to the square the enemy pawn skipped over.
    pub(super) fn can_take_en_passant(&self, from: Position, to: Position) -> bool {
        let Some(pawn) = self.board.piece(from) else {
            return false;
        };
        if pawn.kind() != PieceKind::Pawn || !pawn_can_take(pawn.color(), to - from) {
            return false;
        }
        let Some(last) = self.history.last() else {
            return false;
        };
        self.board.piece(last.to).is_some_and(|passed| {
            passed.kind() == PieceKind::Pawn
                && passed.color() != pawn.color()
                && last.to.x == to.x
                && (last.to.y - last.from.y).abs() == 2
                && last.to.y == from.y
        })
    }

    /// [Castling] is permitted when:
    ///
    /// - The king moves two squares along its home rank from the `e` file.
    /// - Neither the king nor the castling rook has ever moved (and the rook
    ///   was not captured on its corner).
    /// - There are no pieces between the king and the rook.
    /// - The king does not start on, pass through or land on an attacked
    ///   square.
    ///
    /// [Castling]: https://www.chessprogramming.org/Castling
    fn castling_permitted(&self, from: Position, to: Position) -> bool {
        let Some(king) = self.board.piece(from) else {
            return false;
        };
        let color = king.color();
        let rank = color.home_rank();
        if king.kind() != PieceKind::King
            || from != Position::new(KING_FILE, rank)
            || to.y != rank
            || (to.x != QUEENSIDE_KING_FILE && to.x != KINGSIDE_KING_FILE)
        {
            return false;
        }
        let (rook_from, _) = castling_rook_move(to);
        let rook_in_place = self
            .board
            .piece(rook_from)
            .is_some_and(|rook| rook.kind() == PieceKind::Rook && rook.color() == color);
        if !rook_in_place
            || self.square_was_disturbed(from)
            || self.square_was_disturbed(rook_from)
            || self.board.pieces_exist(from, rook_from)
        {
            return false;
        }
        let step = (to - from).unit();
        [from, from + step, to]
            .into_iter()
            .all(|square| !self.position_is_threatened(square, color.opponent()))
    }

    /// A move started or ended on the square at some point in the game.
    fn square_was_disturbed(&self, square: Position) -> bool {
        self.history
            .iter()
            .any(|past| past.from == square || past.to == square)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::board::Board;

    fn at(square: &str) -> Position {
        Position::try_from(square).unwrap()
    }

    fn setup(diagram: &str) -> Game {
        Game::with_board(Board::from_diagram(diagram).unwrap())
    }

    fn destinations(game: &Game, from: &str) -> Vec<String> {
        let mut result = Position::iter()
            .filter(|&to| game.can_move(at(from), to))
            .map(|to| to.to_string())
            .collect::<Vec<_>>();
        result.sort();
        result
    }

    #[test]
    fn nothing_moves_in_place() {
        let game = Game::new();
        for square in Position::iter() {
            assert!(!game.can_move(square, square));
        }
    }

    #[test]
    fn empty_square_and_off_board() {
        let game = Game::new();
        assert!(!game.can_move(at("e4"), at("e5")));
        assert!(!game.can_move(at("b1"), Position::new(-1, 5)));
        assert!(!game.can_move(Position::new(8, 8), at("e4")));
    }

    #[test]
    fn pawn_moves() {
        let game = setup("4k3/8/8/8/8/3p4/4P3/4K3");
        assert_eq!(destinations(&game, "e2"), ["d3", "e3", "e4"]);
        assert_eq!(destinations(&game, "d3"), ["d2", "e2"]);

        // Blocked pawns.
        let game = setup("4k3/8/8/8/8/4n3/4P3/4K3");
        assert!(destinations(&game, "e2").is_empty());
        let game = setup("4k3/8/8/8/4n3/8/4P3/4K3");
        assert_eq!(destinations(&game, "e2"), ["e3"]);

        // Double push only from the starting row.
        let game = setup("4k3/8/8/8/8/4P3/8/4K3");
        assert_eq!(destinations(&game, "e3"), ["e4"]);
    }

    #[test]
    fn sliding_pieces() {
        let game = setup("4k3/8/8/8/1p6/8/8/R3K3");
        assert_eq!(
            destinations(&game, "a1"),
            ["a2", "a3", "a4", "a5", "a6", "a7", "a8", "b1", "c1", "d1"]
        );
        let game = setup("4k3/8/8/8/8/8/1p6/B3K3");
        assert_eq!(destinations(&game, "a1"), ["b2"]);
        let game = setup("4k3/8/8/8/8/2p5/1P6/Q3K3");
        assert_eq!(
            destinations(&game, "a1"),
            ["a2", "a3", "a4", "a5", "a6", "a7", "a8", "b1", "c1", "d1"]
        );
    }

    #[test]
    fn knight_jumps() {
        let game = Game::new();
        assert_eq!(destinations(&game, "b1"), ["a3", "c3"]);
        let game = setup("4k3/8/8/8/3N4/8/8/4K3");
        assert_eq!(
            destinations(&game, "d4"),
            ["b3", "b5", "c2", "c6", "e2", "e6", "f3", "f5"]
        );
    }

    #[test]
    fn king_steps() {
        let game = setup("4k3/8/8/8/8/8/8/4K3");
        assert_eq!(destinations(&game, "e1"), ["d1", "d2", "e2", "f1", "f2"]);
    }

    #[test]
    fn castling() {
        let game = setup("r3k2r/8/8/8/8/8/8/R3K2R");
        assert_eq!(
            destinations(&game, "e1"),
            ["c1", "d1", "d2", "e2", "f1", "f2", "g1"]
        );
        assert_eq!(
            destinations(&game, "e8"),
            ["c8", "d7", "d8", "e7", "f7", "f8", "g8"]
        );
        // Rook squares on the way are blocked.
        let game = setup("4k3/8/8/8/8/8/8/RN2K1NR");
        assert_eq!(destinations(&game, "e1"), ["d1", "d2", "e2", "f1", "f2"]);
        // b1 is attacked, which does not matter: the king does not pass it.
        let game = setup("1r2k3/8/8/8/8/8/8/R3K3");
        assert!(game.can_move(at("e1"), at("c1")));
        // d1 is attacked.
        let game = setup("3rk3/8/8/8/8/8/8/R3K3");
        assert!(!game.can_move(at("e1"), at("c1")));
        // Can not castle out of check.
        let game = setup("4r1k1/8/8/8/8/8/8/4K2R");
        assert!(!game.can_move(at("e1"), at("g1")));
        // The rook has to be there.
        let game = setup("4k3/8/8/8/8/8/8/4K2B");
        assert!(!game.can_move(at("e1"), at("g1")));
    }

    #[test]
    fn castling_through_pawn_attacks() {
        // The pawn on e2 attacks f1 even though the square is empty.
        let game = setup("4k3/8/8/8/8/8/4p3/4K2R");
        assert!(!game.can_move(at("e1"), at("g1")));
    }

    #[test]
    fn en_passant_requires_fresh_double_push() {
        let mut game = setup("4k3/3p4/8/4P3/8/8/8/4K3");
        let _ = game.make_move(at("e1"), at("e2"));
        let _ = game.make_move(at("d7"), at("d5"));
        assert!(game.can_move(at("e5"), at("d6")));
        assert_eq!(
            game.captured_piece(crate::chess::core::Move::new(at("e5"), at("d6")))
                .map(|piece| piece.kind()),
            Some(PieceKind::Pawn)
        );

        let _ = game.make_move(at("e2"), at("e3"));
        let _ = game.make_move(at("e8"), at("e7"));
        assert!(!game.can_move(at("e5"), at("d6")));
    }

    #[test]
    fn rook_move_disables_castling() {
        let mut game = setup("4k3/8/8/8/8/8/8/4K2R");
        assert!(game.can_move(at("e1"), at("g1")));
        let _ = game.make_move(at("h1"), at("h2"));
        let _ = game.make_move(at("e8"), at("d8"));
        let _ = game.make_move(at("h2"), at("h1"));
        let _ = game.make_move(at("d8"), at("e8"));
        assert!(!game.can_move(at("e1"), at("g1")));
    }

    #[test]
    fn rook_squares() {
        assert_eq!(
            castling_rook_move(at("g1")),
            (at("h1"), at("f1"))
        );
        assert_eq!(
            castling_rook_move(at("c8")),
            (at("a8"), at("d8"))
        );
    }
}
