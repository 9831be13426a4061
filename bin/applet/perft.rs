use anyhow::Error as Anyhow;
use clap::Parser;
use lib::rules::{Board, Color};
use std::time::Instant;
use tokio::task::block_in_place;
use tracing::{info, instrument};

/// Counts the leaf nodes of the move tree rooted at a board.
#[derive(Debug, Parser)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Perft {
    /// The side to move.
    #[clap(short, long, default_value_t = Color::White)]
    turn: Color,

    /// The board, one row per `/`, with `.` for empty squares.
    #[clap(short, long, default_value_t)]
    board: Board,

    /// How many plies to expand.
    depth: u8,
}

impl Perft {
    #[instrument(level = "trace", skip(self), err)]
    pub async fn execute(self) -> Result<(), Anyhow> {
        let timer = Instant::now();
        let nodes = block_in_place(|| self.board.perft(self.turn, self.depth));
        let elapsed = timer.elapsed();

        info!(
            depth = self.depth,
            nodes,
            ?elapsed,
            nps = nodes as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
        );

        println!("{nodes}");
        Ok(())
    }
}
