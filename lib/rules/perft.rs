use crate::rules::{Board, Color};
use rayon::prelude::*;

impl Board {
    /// Counts the leaf nodes of the move tree of the given depth.
    pub fn perft(&self, side: Color, depth: u8) -> usize {
        match depth {
            0 => 1,
            1 => self.moves(side).len(),
            d => self
                .moves(side)
                .iter()
                .par_bridge()
                .map(|m| self.play(m).perft(!side, d - 1))
                .sum(),
        }
    }
}
