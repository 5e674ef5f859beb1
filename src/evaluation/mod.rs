//! Static assessment of single-ply outcomes used by [`crate::search`].
//!
//! Scores use fixed-point "centipawn" units: 100 CP is the value of a pawn.
//! Material values are the "[standard piece valuations]" and the heuristic
//! penalties (e.g. 0.9 of the value of a piece left hanging) stay exact
//! integers, so comparing two scores never involves floating point rounding.
//!
//! [standard piece valuations]: https://en.wikipedia.org/wiki/Chess_piece_relative_value

use std::fmt::Display;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use crate::chess::core::PieceKind;

/// A thin wrapper around i32: same size and ergonomics, but keeps the units
/// explicit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score {
    /// Relative value in centipawn (100 CP = 1 "pawn") units.
    value: i32,
}

impl Score {
    #[allow(missing_docs)]
    pub const ZERO: Self = Self { value: 0 };

    /// Creates a new score in centipawn units.
    #[must_use]
    pub const fn cp(value: i32) -> Self {
        Self { value }
    }

    /// Material value of a piece kind.
    ///
    /// ```
    /// use tabiya::chess::core::PieceKind;
    /// use tabiya::evaluation::Score;
    ///
    /// assert_eq!(Score::material(PieceKind::Rook), Score::cp(500));
    /// assert_eq!(Score::material(PieceKind::King), Score::ZERO);
    /// ```
    #[must_use]
    pub const fn material(kind: PieceKind) -> Self {
        Self::cp(kind.value() as i32 * 100)
    }

    /// Scales the score by `numerator / 10`, e.g. `tenths(9)` is 90%.
    #[must_use]
    pub const fn tenths(self, numerator: i32) -> Self {
        Self::cp(self.value * numerator / 10)
    }

    /// Raw value in centipawns.
    #[must_use]
    pub const fn centipawns(self) -> i32 {
        self.value
    }
}

impl Add for Score {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::cp(self.value + rhs.value)
    }
}

impl AddAssign for Score {
    fn add_assign(&mut self, rhs: Self) {
        self.value += rhs.value;
    }
}

impl Sub for Score {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::cp(self.value - rhs.value)
    }
}

impl SubAssign for Score {
    fn sub_assign(&mut self, rhs: Self) {
        self.value -= rhs.value;
    }
}

impl Neg for Score {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            value: self.value.neg(),
        }
    }
}

impl From<i32> for Score {
    fn from(value: i32) -> Self {
        Self { value }
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cp {}", self.value)
    }
}
