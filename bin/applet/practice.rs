use crate::io::{Console, Terminal};
use anyhow::{Context, Error as Anyhow};
use clap::Parser;
use futures_util::StreamExt;
use lib::rules::{Color, Move};
use lib::service::*;
use lib::session::*;
use std::{fmt::Write, sync::Arc, time::SystemTime};
use tokio::io::{stdin, stdout};
use tokio::{select, task::JoinHandle};
use tracing::{info, instrument, warn};

const HELP: &str = "\
commands:
  <n>          play the n-th move listed by `moves`
  <from>-<to>  play a simple move, e.g. 51-42
  <from>x<to>  play a capture, e.g. 51x33
  moves        list the legal moves
  board        show the board
  resign       concede the match
  restart      start a new match with colors swapped
  quit         leave the session";

/// The participant at the terminal.
const PLAYER: ParticipantId = ParticipantId(1);

/// A practice game played at the terminal, moving both sides.
#[derive(Debug, Default, Parser)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Practice {
    /// The match configuration.
    #[clap(short, long, default_value_t)]
    config: MatchConfig,

    /// The arbiter configuration.
    #[clap(short, long, default_value_t)]
    arbiter: ArbiterConfig,
}

impl Practice {
    #[instrument(level = "trace", skip(self), err)]
    pub async fn execute(self) -> Result<(), Anyhow> {
        let console = Terminal::new(stdout(), stdin());
        Table::new(self.config, self.arbiter, console).run().await
    }
}

type SharedArbiter = Arc<Arbiter<Arc<InMemoryRepository>>>;

struct Table<C: Console> {
    arbiter: SharedArbiter,
    driver: ClockDriver,
    config: MatchConfig,
    console: C,
    clock: Option<JoinHandle<()>>,
}

impl<C: Console> Table<C> {
    fn new(config: MatchConfig, arbiter: ArbiterConfig, console: C) -> Self {
        Table {
            arbiter: Arc::new(Arbiter::new(Arc::default(), arbiter)),
            driver: ClockDriver::new(arbiter.tick),
            config,
            console,
            clock: None,
        }
    }

    async fn run(mut self) -> Result<(), Anyhow> {
        let session = self.arbiter.open(PLAYER, Mode::Practice, self.config).await?;
        let id = session.id();
        let mut updates = self.arbiter.repository().subscribe(id).await?;

        let mut session = self.perform(id, Action::Start).await?.unwrap_or(session);
        self.console.print(HELP).await?;
        self.show(&session).await?;

        loop {
            select! {
                line = self.console.read_line() => {
                    let line = match line.context("failed to read from the console")? {
                        Some(line) => line,
                        None => break,
                    };

                    match line.trim() {
                        "" => continue,
                        "quit" | "exit" => {
                            self.perform(id, Action::Leave).await?;
                            break;
                        }
                        command => {
                            if let Some(next) = self.command(&session, command).await? {
                                session = next;
                            }
                        }
                    }
                }

                Some(notification) = updates.next() => {
                    if let Notification::Updated(next) = notification {
                        if next.version() > session.version() {
                            let changed = next.status() != session.status()
                                || next.history().len() != session.history().len();

                            session = next;
                            if changed {
                                self.show(&session).await?;
                            }
                        }
                    }
                }
            }
        }

        if let Some(clock) = self.clock.take() {
            clock.abort();
        }

        Ok(())
    }

    async fn command(&mut self, session: &Session, command: &str) -> Result<Option<Session>, Anyhow> {
        let moves = session.board().moves(session.turn());

        let action = match command {
            "help" => {
                self.console.print(HELP).await?;
                return Ok(None);
            }

            "board" => {
                self.show(session).await?;
                return Ok(None);
            }

            "moves" => {
                let mut listing = String::new();
                for (i, m) in moves.iter().enumerate() {
                    writeln!(listing, "{:>3}. {m}", i + 1)?;
                }

                self.console.print(listing.trim_end()).await?;
                return Ok(None);
            }

            "resign" => Action::Resign,
            "restart" | "rematch" => Action::Start,

            notation => match pick(moves.iter(), notation) {
                Ok(m) => Action::SubmitMove(m.clone()),
                Err(reason) => {
                    self.console.print(reason).await?;
                    return Ok(None);
                }
            },
        };

        let next = self.perform(session.id(), action).await?;
        if let Some(next) = &next {
            self.show(next).await?;
        }

        Ok(next)
    }

    /// Submits an action, reporting rejections at the console.
    async fn perform(&mut self, id: SessionId, action: Action) -> Result<Option<Session>, Anyhow> {
        let restart = action == Action::Start;

        match self.arbiter.execute(id, PLAYER, action, SystemTime::now()).await {
            Ok(t) => {
                for event in &t.events {
                    info!(%event);
                }

                if restart {
                    self.spawn_clock(id);
                }

                Ok(Some(t.session))
            }

            Err(ArbiterError::Rejected(r)) => {
                self.console.print(&r.to_string()).await?;
                Ok(None)
            }

            Err(e) => Err(e.into()),
        }
    }

    fn spawn_clock(&mut self, id: SessionId) {
        if let Some(clock) = self.clock.take() {
            clock.abort();
        }

        let arbiter = self.arbiter.clone();
        let driver = self.driver;

        self.clock = Some(tokio::spawn(async move {
            match driver.drive(&arbiter, id).await {
                Ok(outcome) => info!(%outcome),
                Err(e) => warn!(error = %e, "clock stopped"),
            }
        }));
    }

    async fn show(&mut self, session: &Session) -> Result<(), Anyhow> {
        self.console.print(&render(session)?).await?;
        Ok(())
    }
}

/// Picks a move either by its position in the listing or by its notation.
fn pick<'a>(moves: impl Iterator<Item = &'a Move>, notation: &str) -> Result<&'a Move, &'static str> {
    let moves = Vec::from_iter(moves);

    if let Ok(n) = notation.parse::<usize>() {
        return match n.checked_sub(1).and_then(|i| moves.get(i)) {
            Some(m) => Ok(*m),
            None => Err("no such move, type `moves` to list them"),
        };
    }

    let mut candidates = moves.into_iter().filter(|m| m.to_string() == notation);

    match (candidates.next(), candidates.next()) {
        (Some(m), None) => Ok(m),
        (Some(_), Some(_)) => Err("ambiguous move, pick it by number from `moves`"),
        (None, _) => Err("unknown command or illegal move, type `help` for usage"),
    }
}

fn render(session: &Session) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    let board = session.board();

    writeln!(out, "   0 1 2 3 4 5 6 7")?;
    for row in 0..8 {
        write!(out, "{row} ")?;
        for col in 0..8 {
            let symbol = board.at(row, col).map_or('.', |p| p.symbol());
            write!(out, " {symbol}")?;
        }

        writeln!(out)?;
    }

    let clocks = session.clocks();
    write!(
        out,
        "white {}  red {}  ",
        format_clock(clocks[Color::White]),
        format_clock(clocks[Color::Red])
    )?;

    match session.outcome() {
        Some(outcome) => write!(out, "{outcome}, result: {}", outcome.winner())?,
        None => write!(out, "{} to move", session.turn())?,
    }

    Ok(out)
}

fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
