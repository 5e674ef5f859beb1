//! Chess primitives commonly used within [`crate::chess`].

use std::fmt::{self, Write};
use std::ops::{Add, Sub};

use anyhow::{bail, Context};
use itertools::Itertools;

#[allow(missing_docs)]
pub const BOARD_WIDTH: i8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: usize = (BOARD_WIDTH * BOARD_WIDTH) as usize;

/// Coordinates of a square on the board.
///
/// `x` is the column (file `a` is 0) and `y` is the row counted from the top
/// of the board: Black's back rank is `y = 0` and White's back rank is
/// `y = 7`. Positions outside of `[0, 7] × [0, 7]` can be constructed (e.g. as
/// an intermediate result of [`Delta`] arithmetic) but never hold a piece.
///
/// ```
/// use tabiya::chess::core::Position;
///
/// assert_eq!(Position::try_from("a8").unwrap(), Position::new(0, 0));
/// assert_eq!(Position::try_from("e2").unwrap(), Position::new(4, 6));
/// assert_eq!(Position::new(7, 7).to_string(), "h1");
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    #[allow(missing_docs)]
    pub x: i8,
    #[allow(missing_docs)]
    pub y: i8,
}

impl Position {
    #[must_use]
    #[allow(missing_docs)]
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Returns `true` if the position refers to one of the 64 board squares.
    #[must_use]
    pub const fn is_on_board(self) -> bool {
        self.x >= 0 && self.x < BOARD_WIDTH && self.y >= 0 && self.y < BOARD_WIDTH
    }

    /// Iterates over all board squares in row-major order: by `y`, then `x`.
    pub fn iter() -> impl Iterator<Item = Self> {
        itertools::iproduct!(0..BOARD_WIDTH, 0..BOARD_WIDTH).map(|(y, x)| Self::new(x, y))
    }

    /// Row-major index of the square, `None` if it is off the board.
    pub(super) fn index(self) -> Option<usize> {
        if self.is_on_board() {
            Some(self.y as usize * BOARD_WIDTH as usize + self.x as usize)
        } else {
            None
        }
    }
}

impl Sub for Position {
    type Output = Delta;

    fn sub(self, rhs: Self) -> Delta {
        Delta::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add<Delta> for Position {
    type Output = Self;

    fn add(self, delta: Delta) -> Self {
        Self::new(self.x + delta.dx, self.y + delta.dy)
    }
}

impl TryFrom<&str> for Position {
    type Error = anyhow::Error;

    /// Parses a square in algebraic notation (e.g. `e4`).
    fn try_from(square: &str) -> anyhow::Result<Self> {
        let Some((file, rank)) = square.chars().collect_tuple() else {
            bail!(
                "square should be two-char, got {square} with {} chars",
                square.chars().count()
            );
        };
        let x = match file {
            'a'..='h' => file as i8 - 'a' as i8,
            _ => bail!("file should be within 'a'..='h', got '{file}'"),
        };
        let y = match rank {
            '1'..='8' => '8' as i8 - rank as i8,
            _ => bail!("rank should be within '1'..='8', got '{rank}'"),
        };
        Ok(Self::new(x, y))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_on_board() {
            return write!(f, "({}, {})", self.x, self.y);
        }
        f.write_char(char::from(b'a' + self.x as u8))?;
        f.write_char(char::from(b'8' - self.y as u8))
    }
}

/// Displacement between two [`Position`]s.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Delta {
    #[allow(missing_docs)]
    pub dx: i8,
    #[allow(missing_docs)]
    pub dy: i8,
}

impl Delta {
    #[must_use]
    #[allow(missing_docs)]
    pub const fn new(dx: i8, dy: i8) -> Self {
        Self { dx, dy }
    }

    /// A single step in the same direction: each component is reduced to its
    /// sign.
    #[must_use]
    pub const fn unit(self) -> Self {
        Self::new(self.dx.signum(), self.dy.signum())
    }

    /// Purely horizontal or purely vertical, non-zero.
    #[must_use]
    pub const fn is_straight(self) -> bool {
        (self.dx == 0) != (self.dy == 0)
    }

    /// Purely diagonal, non-zero.
    #[must_use]
    pub const fn is_diagonal(self) -> bool {
        self.dx != 0 && self.dx.abs() == self.dy.abs()
    }
}

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Row of the king and rooks in the starting position.
    #[must_use]
    pub const fn home_rank(self) -> i8 {
        match self {
            Self::White => BOARD_WIDTH - 1,
            Self::Black => 0,
        }
    }

    /// Row the pawns start from (and can push two squares from).
    #[must_use]
    pub const fn pawn_rank(self) -> i8 {
        match self {
            Self::White => BOARD_WIDTH - 2,
            Self::Black => 1,
        }
    }

    /// The row a pawn has to reach to be promoted: opponent's home rank.
    #[must_use]
    pub const fn promotion_rank(self) -> i8 {
        self.opponent().home_rank()
    }

    /// Direction of pawn pushes along the `y` axis.
    #[must_use]
    pub const fn forward(self) -> i8 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }
}

impl TryFrom<&str> for Color {
    type Error = anyhow::Error;

    fn try_from(color: &str) -> anyhow::Result<Self> {
        match color {
            "w" | "white" => Ok(Self::White),
            "b" | "black" => Ok(Self::Black),
            _ => bail!("color should be 'white' or 'black', got '{color}'"),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::White => "white",
            Self::Black => "black",
        })
    }
}

/// Standard [chess pieces].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceKind {
    /// "[Standard piece valuation]" in pawns. The king can not be captured and
    /// is worth nothing.
    ///
    /// [Standard piece valuation]: https://en.wikipedia.org/wiki/Chess_piece_relative_value
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Pawn => 1,
            Self::Knight | Self::Bishop => 3,
            Self::Rook => 5,
            Self::Queen => 9,
            Self::King => 0,
        }
    }

    const fn symbol(self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Rook => 'R',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }
}

impl TryFrom<char> for PieceKind {
    type Error = anyhow::Error;

    /// Accepts both upper- and lowercase symbols.
    fn try_from(symbol: char) -> anyhow::Result<Self> {
        match symbol.to_ascii_uppercase() {
            'P' => Ok(Self::Pawn),
            'R' => Ok(Self::Rook),
            'N' => Ok(Self::Knight),
            'B' => Ok(Self::Bishop),
            'Q' => Ok(Self::Queen),
            'K' => Ok(Self::King),
            _ => bail!("piece kind should be within \"PRNBQK\", got '{symbol}'"),
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.symbol())
    }
}

/// Stable identity of a piece: the 3-character code it was created with.
///
/// It is never consulted by the rules and only exists so that consumers can
/// track a piece across moves (and promotions).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PieceId([u8; 3]);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            f.write_char(char::from(byte))?;
        }
        Ok(())
    }
}

/// Represents a specific piece owned by a player.
///
/// The piece is created from a code: color (`B`/`W`), kind (`P`, `R`, `N`,
/// `B`, `Q`, `K`) and an opaque disambiguator.
///
/// ```
/// use tabiya::chess::core::{Color, Piece, PieceKind};
///
/// let knight = Piece::try_from("WN6").unwrap();
/// assert_eq!(knight.color(), Color::White);
/// assert_eq!(knight.kind(), PieceKind::Knight);
/// assert_eq!(knight.id().to_string(), "WN6");
/// assert!(Piece::try_from("XN6").is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    color: Color,
    kind: PieceKind,
    id: PieceId,
}

impl Piece {
    /// Creates a piece without going through the textual code. The
    /// disambiguator has to be an ASCII character.
    #[must_use]
    pub fn new(color: Color, kind: PieceKind, disambiguator: u8) -> Self {
        debug_assert!(disambiguator.is_ascii_graphic());
        let color_symbol = match color {
            Color::White => b'W',
            Color::Black => b'B',
        };
        Self {
            color,
            kind,
            id: PieceId([color_symbol, kind.symbol() as u8, disambiguator]),
        }
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Identity assigned at creation. Survives promotion.
    #[must_use]
    pub const fn id(&self) -> PieceId {
        self.id
    }

    /// Current code of the piece: same as [`Piece::id`] unless the piece was
    /// promoted, in which case the kind character reflects the new kind.
    #[must_use]
    pub fn code(&self) -> String {
        let [color, _, disambiguator] = self.id.0;
        [
            char::from(color),
            self.kind.symbol(),
            char::from(disambiguator),
        ]
        .iter()
        .collect()
    }

    pub(super) const fn promoted(self, kind: PieceKind) -> Self {
        Self { kind, ..self }
    }
}

impl TryFrom<&str> for Piece {
    type Error = anyhow::Error;

    fn try_from(code: &str) -> anyhow::Result<Self> {
        let Some((color, kind, disambiguator)) = code.chars().collect_tuple() else {
            bail!(
                "piece code should have 3 characters, got \"{code}\" with {}",
                code.chars().count()
            );
        };
        let color = match color {
            'W' => Color::White,
            'B' => Color::Black,
            _ => bail!("piece color should be 'W' or 'B', got '{color}'"),
        };
        if !kind.is_ascii_uppercase() {
            bail!("piece kind should be within \"PRNBQK\", got '{kind}'");
        }
        let kind =
            PieceKind::try_from(kind).with_context(|| format!("parsing piece code \"{code}\""))?;
        if !disambiguator.is_ascii_graphic() {
            bail!("piece disambiguator should be a printable ASCII character, got {disambiguator:?}");
        }
        Ok(Self::new(color, kind, disambiguator as u8))
    }
}

impl fmt::Display for Piece {
    /// Single-letter symbol: uppercase for White, lowercase for Black.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match self.color {
            Color::White => self.kind.symbol(),
            Color::Black => self.kind.symbol().to_ascii_lowercase(),
        })
    }
}

/// A move of the piece standing on `from` to `to`. Castling is represented as
/// the king's move and en passant as the capturing pawn's move, the side
/// effects are derived by [`crate::chess::game::Game::make_move`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    #[allow(missing_docs)]
    pub from: Position,
    #[allow(missing_docs)]
    pub to: Position,
}

impl Move {
    #[must_use]
    #[allow(missing_docs)]
    pub const fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }

    /// The move that would bring the piece back.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self::new(self.to, self.from)
    }
}

impl TryFrom<&str> for Move {
    type Error = anyhow::Error;

    /// Parses moves in coordinate notation, e.g. `e2e4`.
    fn try_from(input: &str) -> anyhow::Result<Self> {
        if input.len() != 4 || !input.is_ascii() {
            bail!("move should be 4 chars (e.g. e2e4), got \"{input}\"");
        }
        let from = Position::try_from(&input[..2])?;
        let to = Position::try_from(&input[2..])?;
        Ok(Self::new(from, to))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

bitflags::bitflags! {
    /// Side effects of an executed move, as reported by
    /// [`crate::chess::game::Game::make_move`].
    ///
    /// - [En passant] removes the captured pawn from a square other than the
    ///   destination.
    /// - [Castle] also relocates the rook next to the king's destination.
    ///
    /// [Castle]: https://en.wikipedia.org/wiki/Castling
    /// [En passant]: https://en.wikipedia.org/wiki/En_passant
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MoveEffects: u8 {
        /// A piece was removed from the board.
        const CAPTURE = 0b0001;
        /// The captured pawn was taken "in passing".
        const EN_PASSANT = 0b0010;
        /// The king castled, the rook moved too.
        const CASTLE = 0b0100;
        /// Pawn advanced by 2 squares from its starting row.
        const DOUBLE_PAWN_PUSH = 0b1000;
    }
}
