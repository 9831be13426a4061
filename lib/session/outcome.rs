use crate::rules::Color;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// How a match ended.
///
/// The color carried by decisive outcomes is the side that lost.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    #[display(fmt = "{_0} has no legal moves")]
    Immobilized(Color),
    #[display(fmt = "{_0} lost on time")]
    LossOnTime(Color),
    #[display(fmt = "{_0} resigned")]
    Resignation(Color),
    #[display(fmt = "{_0} abandoned the match")]
    Abandonment(Color),
    #[display(fmt = "draw by agreement")]
    DrawByAgreement,
}

/// The result of a finished match.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    #[display(fmt = "white")]
    White,
    #[display(fmt = "red")]
    Red,
    #[display(fmt = "draw")]
    Draw,
}

impl From<Color> for Winner {
    fn from(c: Color) -> Self {
        match c {
            Color::White => Winner::White,
            Color::Red => Winner::Red,
        }
    }
}

impl Outcome {
    /// The side that lost, unless the match was drawn.
    pub fn loser(&self) -> Option<Color> {
        match *self {
            Outcome::Immobilized(c)
            | Outcome::LossOnTime(c)
            | Outcome::Resignation(c)
            | Outcome::Abandonment(c) => Some(c),
            Outcome::DrawByAgreement => None,
        }
    }

    /// Whether the match was drawn.
    pub fn is_draw(&self) -> bool {
        self.loser().is_none()
    }

    /// The [`Winner`] of the match.
    pub fn winner(&self) -> Winner {
        match self.loser() {
            Some(c) => Winner::from(!c),
            None => Winner::Draw,
        }
    }
}
