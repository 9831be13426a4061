use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A square on the checkers board, addressed by row and column.
///
/// Rows and columns are numbered `0` through `7`.
/// Row `0` is the edge where red pieces start.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(try_from = "Coordinates", into = "Coordinates")]
pub struct Square {
    #[cfg_attr(test, strategy(0i8..8))]
    row: i8,
    #[cfg_attr(test, strategy(0i8..8))]
    col: i8,
}

impl Square {
    /// The number of rows and columns on the board.
    pub const SIZE: i8 = 8;

    /// Constructs [`Square`] from a pair of coordinates, if within the board.
    #[inline(always)]
    pub fn new(row: i8, col: i8) -> Option<Self> {
        if (0..Self::SIZE).contains(&row) && (0..Self::SIZE).contains(&col) {
            Some(Square { row, col })
        } else {
            None
        }
    }

    /// This square's row.
    #[inline(always)]
    pub fn row(&self) -> i8 {
        self.row
    }

    /// This square's column.
    #[inline(always)]
    pub fn col(&self) -> i8 {
        self.col
    }

    /// Whether pieces may stand on this square.
    #[inline(always)]
    pub fn is_dark(&self) -> bool {
        (self.row + self.col) % 2 == 0
    }

    /// The square displaced by the given amount of rows and columns, if any.
    #[inline(always)]
    pub fn offset(&self, rows: i8, cols: i8) -> Option<Self> {
        Square::new(self.row + rows, self.col + cols)
    }

    /// An iterator over all squares, row by row.
    pub fn iter() -> impl DoubleEndedIterator<Item = Square> {
        (0..Self::SIZE).flat_map(|row| (0..Self::SIZE).map(move |col| Square { row, col }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, self.col)
    }
}

/// The reason why parsing [`Square`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "failed to parse square")]
pub struct ParseSquareError;

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.as_bytes() {
            [r @ b'0'..=b'7', c @ b'0'..=b'7'] => Square::new((r - b'0') as _, (c - b'0') as _),
            _ => None,
        }
        .ok_or(ParseSquareError)
    }
}

/// The reason why a pair of coordinates is not a [`Square`].
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "coordinates ({row}, {col}) are off the board")]
pub struct OffBoard {
    pub row: i8,
    pub col: i8,
}

#[derive(Deserialize, Serialize)]
struct Coordinates {
    row: i8,
    col: i8,
}

impl TryFrom<Coordinates> for Square {
    type Error = OffBoard;

    fn try_from(Coordinates { row, col }: Coordinates) -> Result<Self, Self::Error> {
        Square::new(row, col).ok_or(OffBoard { row, col })
    }
}

impl From<Square> for Coordinates {
    fn from(sq: Square) -> Self {
        Coordinates {
            row: sq.row,
            col: sq.col,
        }
    }
}
