use crate::rules::{Color, Role, Square};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Identifies a [`Piece`] for as long as it stays on the board.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, From)]
#[derive(Deserialize, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[display(fmt = "#{_0}")]
#[serde(transparent)]
pub struct PieceId(pub u8);

/// A checkers piece standing on a [`Square`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub struct Piece {
    pub id: PieceId,
    pub color: Color,
    pub role: Role,
    pub square: Square,
}

impl Piece {
    /// Constructs a [`Piece`].
    pub fn new(id: PieceId, color: Color, role: Role, square: Square) -> Self {
        Piece {
            id,
            color,
            role,
            square,
        }
    }

    /// The same piece standing on another [`Square`].
    #[inline(always)]
    pub fn relocate(self, square: Square) -> Self {
        Piece { square, ..self }
    }

    /// The same piece upgraded to a [`Role::King`].
    #[inline(always)]
    pub fn crown(self) -> Self {
        Piece {
            role: Role::King,
            ..self
        }
    }

    /// Whether this piece would be promoted by landing on the given [`Square`].
    #[inline(always)]
    pub fn promotes_on(&self, square: Square) -> bool {
        self.role == Role::Pawn && square.row() == self.color.promotion_row()
    }

    /// The character representing this piece in the board notation.
    pub fn symbol(&self) -> char {
        match (self.color, self.role) {
            (Color::White, Role::Pawn) => 'w',
            (Color::White, Role::King) => 'W',
            (Color::Red, Role::Pawn) => 'r',
            (Color::Red, Role::King) => 'R',
        }
    }
}
