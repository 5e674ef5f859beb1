//! Square-centric ("[mailbox]") board representation: an 8×8 grid of optional
//! pieces.
//!
//! The board only knows about placement. It has no notion of turns, history
//! or legality: those live in [`crate::chess::game::Game`].
//!
//! [mailbox]: https://www.chessprogramming.org/Mailbox

use std::fmt::{self, Write};

use anyhow::{bail, Context};

use crate::chess::core::{Color, Delta, Piece, PieceKind, Position, BOARD_SIZE, BOARD_WIDTH};

const STARTING_DIAGRAM: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// Piece placement. Cloning is cheap (a fixed-size array copy), which is what
/// simulating a move relies on.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; BOARD_SIZE],
}

impl Board {
    /// Creates a board without any pieces.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            squares: [None; BOARD_SIZE],
        }
    }

    /// Creates the starting position of the standard chess variant. Piece
    /// codes are `<color><kind><file>`, e.g. `WK4` for the white king and
    /// `BP0` for the black pawn on the `a` file.
    ///
    /// ```
    /// use tabiya::chess::board::Board;
    /// use tabiya::chess::core::Position;
    ///
    /// let board = Board::starting();
    /// assert_eq!(board.piece(Position::new(4, 7)).unwrap().code(), "WK4");
    /// assert_eq!(board.piece(Position::new(0, 1)).unwrap().code(), "BP0");
    /// assert_eq!(board.iter().count(), 32);
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        const BACK_RANK: [PieceKind; BOARD_WIDTH as usize] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut board = Self::empty();
        for color in [Color::White, Color::Black] {
            for (x, kind) in (0..BOARD_WIDTH).zip(BACK_RANK) {
                let disambiguator = b'0' + x as u8;
                board.put_piece(
                    Position::new(x, color.home_rank()),
                    Piece::new(color, kind, disambiguator),
                );
                board.put_piece(
                    Position::new(x, color.pawn_rank()),
                    Piece::new(color, PieceKind::Pawn, disambiguator),
                );
            }
        }
        debug_assert_eq!(board.to_string(), STARTING_DIAGRAM);
        board
    }

    /// Parses the piece placement part of [Forsyth-Edwards Notation]: ranks
    /// from 8 to 1 separated by `/`, uppercase letters for White, lowercase for
    /// Black and digits for runs of empty squares.
    ///
    /// Pieces get codes in reading order, counted separately for each color
    /// and kind: the first white rook is `WR0`, the second one `WR1` and so
    /// on.
    ///
    /// # Errors
    ///
    /// Returns an error if the diagram does not describe exactly 8 ranks of 8
    /// squares or contains unknown symbols.
    ///
    /// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
    pub fn from_diagram(diagram: &str) -> anyhow::Result<Self> {
        const DISAMBIGUATORS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

        let ranks: Vec<&str> = diagram.trim().split('/').collect();
        if ranks.len() != BOARD_WIDTH as usize {
            bail!(
                "board diagram should have {BOARD_WIDTH} ranks, got {}",
                ranks.len()
            );
        }
        let mut board = Self::empty();
        // Number of pieces already placed, per (color, kind).
        let mut counts = [[0_usize; 6]; 2];
        for (y, rank) in (0..BOARD_WIDTH).zip(ranks) {
            let mut x = 0;
            for symbol in rank.chars() {
                if let Some(skip) = symbol.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        bail!("empty square run should be within 1..=8, got {skip}");
                    }
                    x += skip as i8;
                    if x > BOARD_WIDTH {
                        bail!("rank \"{rank}\" is longer than {BOARD_WIDTH} squares");
                    }
                    continue;
                }
                let kind = PieceKind::try_from(symbol)
                    .with_context(|| format!("parsing rank \"{rank}\""))?;
                let color = if symbol.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let position = Position::new(x, y);
                if !position.is_on_board() {
                    bail!("rank \"{rank}\" is longer than {BOARD_WIDTH} squares");
                }
                let count = &mut counts[color as usize][kind as usize];
                let Some(&disambiguator) = DISAMBIGUATORS.get(*count) else {
                    bail!("too many {color} {kind} pieces");
                };
                *count += 1;
                board.put_piece(position, Piece::new(color, kind, disambiguator));
                x += 1;
            }
            if x != BOARD_WIDTH {
                bail!("rank \"{rank}\" should describe {BOARD_WIDTH} squares, got {x}");
            }
        }
        Ok(board)
    }

    /// Returns the piece standing at `at`, `None` if the square is empty or
    /// off the board.
    #[must_use]
    pub fn piece(&self, at: Position) -> Option<Piece> {
        at.index().and_then(|index| self.squares[index])
    }

    /// Puts a piece on the board, replacing whatever stood there. Off-board
    /// positions are ignored.
    pub fn put_piece(&mut self, at: Position, piece: Piece) {
        if let Some(square) = self.square_mut(at) {
            *square = Some(piece);
        }
    }

    /// Relocates the piece standing on `from` to `to`, capturing anything that
    /// stood there. This does not check any rules.
    pub fn move_piece(&mut self, from: Position, to: Position) {
        debug_assert!(from.is_on_board() && to.is_on_board());
        let piece = self.square_mut(from).and_then(Option::take);
        if let Some(square) = self.square_mut(to) {
            *square = piece;
        }
    }

    /// Clears the square.
    pub fn remove_piece(&mut self, at: Position) {
        if let Some(square) = self.square_mut(at) {
            *square = None;
        }
    }

    /// Changes the kind of the piece standing at `at`, keeping its color and
    /// identity.
    pub fn promote_piece(&mut self, at: Position, kind: PieceKind) {
        if let Some(Some(piece)) = self.square_mut(at) {
            *piece = piece.promoted(kind);
        }
    }

    /// Returns the first position in row-major order holding a piece that
    /// satisfies the predicate.
    pub fn first_position(&self, predicate: impl Fn(&Piece) -> bool) -> Option<Position> {
        self.iter()
            .find(|(_, piece)| predicate(piece))
            .map(|(position, _)| position)
    }

    /// Checks whether any square strictly between two positions is occupied.
    ///
    /// The positions have to be on the same row, column or diagonal.
    #[must_use]
    pub fn pieces_exist(&self, between: Position, and: Position) -> bool {
        let delta = and - between;
        debug_assert!(delta.is_straight() || delta.is_diagonal() || delta == Delta::new(0, 0));
        let step = delta.unit();
        let mut current = between + step;
        while current != and && current.is_on_board() {
            if self.piece(current).is_some() {
                return true;
            }
            current = current + step;
        }
        false
    }

    /// Iterates over occupied squares in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::iter().filter_map(|position| self.piece(position).map(|piece| (position, piece)))
    }

    /// The 8×8 arrangement of squares for rendering: rows from `y = 0` (Black's
    /// back rank) to `y = 7`.
    #[must_use]
    pub fn rows(&self) -> [[Option<Piece>; BOARD_WIDTH as usize]; BOARD_WIDTH as usize] {
        let mut rows = [[None; BOARD_WIDTH as usize]; BOARD_WIDTH as usize];
        for (position, piece) in self.iter() {
            rows[position.y as usize][position.x as usize] = Some(piece);
        }
        rows
    }

    fn square_mut(&mut self, at: Position) -> Option<&mut Option<Piece>> {
        at.index().map(|index| &mut self.squares[index])
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

impl TryFrom<&str> for Board {
    type Error = anyhow::Error;

    fn try_from(diagram: &str) -> anyhow::Result<Self> {
        Self::from_diagram(diagram)
    }
}

impl fmt::Display for Board {
    /// Dumps the board in the same format [`Board::from_diagram`] accepts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows().iter().enumerate() {
            if y != 0 {
                f.write_char('/')?;
            }
            let mut empty_squares = 0;
            for square in row {
                match square {
                    Some(piece) => {
                        if empty_squares != 0 {
                            write!(f, "{empty_squares}")?;
                            empty_squares = 0;
                        }
                        write!(f, "{piece}")?;
                    },
                    None => empty_squares += 1,
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    /// Dumps the board in a human-readable format ('.' for empty square, FEN
    /// algebraic symbol for piece), rank 8 first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows().iter().enumerate() {
            write!(f, "{} ", BOARD_WIDTH as usize - y)?;
            for (x, square) in row.iter().enumerate() {
                if x != 0 {
                    f.write_char(' ')?;
                }
                match square {
                    Some(piece) => write!(f, "{piece}")?,
                    None => f.write_char('.')?,
                }
            }
            f.write_char('\n')?;
        }
        f.write_str("  a b c d e f g h\n")
    }
}
