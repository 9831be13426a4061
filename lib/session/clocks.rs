use crate::rules::Color;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// The remaining time of each side, in whole seconds.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub struct Clocks {
    pub red: u32,
    pub white: u32,
}

impl Clocks {
    /// Both sides with the same remaining time.
    pub fn new(seconds: u32) -> Self {
        Clocks {
            red: seconds,
            white: seconds,
        }
    }

    /// Adds time to the clock of a side.
    pub fn credit(self, side: Color, seconds: u32) -> Self {
        self.with(side, self[side].saturating_add(seconds))
    }

    /// Takes one second from the clock of a side, stopping at zero.
    pub fn tick(self, side: Color) -> Self {
        self.with(side, self[side].saturating_sub(1))
    }

    /// Whether a side has run out of time.
    pub fn is_flagged(&self, side: Color) -> bool {
        self[side] == 0
    }

    fn with(self, side: Color, seconds: u32) -> Self {
        match side {
            Color::White => Clocks {
                white: seconds,
                ..self
            },
            Color::Red => Clocks {
                red: seconds,
                ..self
            },
        }
    }
}

impl Index<Color> for Clocks {
    type Output = u32;

    fn index(&self, side: Color) -> &u32 {
        match side {
            Color::White => &self.white,
            Color::Red => &self.red,
        }
    }
}
