use crate::rules::{PieceId, Square};
use arrayvec::ArrayVec;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The pieces captured by a [`Move`], in the order they were jumped.
///
/// No side ever has more than 12 pieces, which bounds the length of a capture sequence.
pub type Captures = ArrayVec<PieceId, 12>;

/// A checkers move, possibly a sequence of captures.
///
/// A move is only meaningful relative to the board and side to move it was generated for.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct Move {
    /// The piece moved.
    pub piece: PieceId,
    /// The source [`Square`].
    pub from: Square,
    /// The final destination [`Square`].
    pub to: Square,
    /// The pieces captured along the way.
    #[serde(default)]
    pub captured: Captures,
    /// Whether the piece is promoted when it lands.
    #[serde(default)]
    pub promotes: bool,
}

impl Move {
    /// Whether this move captures any pieces.
    #[inline(always)]
    pub fn is_capture(&self) -> bool {
        !self.captured.is_empty()
    }

    /// Whether this move captures the given piece.
    #[inline(always)]
    pub fn captures(&self, id: PieceId) -> bool {
        self.captured.contains(&id)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.is_capture() { 'x' } else { '-' };
        write!(f, "{}{sep}{}", self.from, self.to)
    }
}

/// The reason why parsing [`Move`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "failed to parse move")]
pub struct ParseMoveError;

/// Parses a [`Move`] from its RON representation.
impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ron::de::from_str(s).map_err(|_| ParseMoveError)
    }
}
