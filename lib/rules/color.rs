use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::{ops::Not, str::FromStr};

/// The color of a checkers [`Piece`][`crate::rules::Piece`].
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Color {
    #[display(fmt = "white")]
    White,
    #[display(fmt = "red")]
    Red,
}

impl Color {
    /// Both colors, in the order they move.
    pub const ALL: [Color; 2] = [Color::White, Color::Red];

    /// The row direction in which pawns of this color advance.
    #[inline(always)]
    pub fn forward(&self) -> i8 {
        match self {
            Color::White => -1,
            Color::Red => 1,
        }
    }

    /// The row where pawns of this color are promoted.
    #[inline(always)]
    pub fn promotion_row(&self) -> i8 {
        match self {
            Color::White => 0,
            Color::Red => 7,
        }
    }
}

impl Not for Color {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        match self {
            Color::White => Color::Red,
            Color::Red => Color::White,
        }
    }
}

/// The reason why parsing [`Color`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "failed to parse color")]
pub struct ParseColorError;

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "white" => Ok(Color::White),
            "red" => Ok(Color::Red),
            _ => Err(ParseColorError),
        }
    }
}
