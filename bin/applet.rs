use anyhow::Error as Anyhow;
use clap::Subcommand;
use derive_more::From;

mod perft;
mod practice;

#[derive(From, Subcommand)]
pub enum Applet {
    Perft(perft::Perft),
    Practice(practice::Practice),
}

impl Default for Applet {
    fn default() -> Self {
        practice::Practice::default().into()
    }
}

impl Applet {
    pub async fn execute(self) -> Result<(), Anyhow> {
        match self {
            Applet::Perft(a) => Ok(a.execute().await?),
            Applet::Practice(a) => Ok(a.execute().await?),
        }
    }
}
