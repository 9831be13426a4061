use crate::rules::{Board, Color, Move};
use crate::session::*;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use tracing::instrument;

/// The lifecycle stage of a [`Session`].
#[derive(Debug, Display, Default, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    #[default]
    #[display(fmt = "waiting")]
    Waiting,
    #[display(fmt = "playing")]
    Playing,
    #[display(fmt = "finished")]
    Finished,
}

/// An immutable snapshot of a room and the match played in it.
///
/// Transitions never modify a snapshot, instead they produce the next one,
/// whose `version` is always one above its predecessor's.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub struct Session {
    id: SessionId,
    host: ParticipantId,
    mode: Mode,
    seats: Seats,
    spectators: Vec<ParticipantId>,
    config: MatchConfig,
    status: Status,
    rotated: bool,
    turn: Color,
    board: Board,
    clocks: Clocks,
    history: Vec<Move>,
    draw_offer: Option<ParticipantId>,
    outcome: Option<Outcome>,
    #[serde(default, with = "humantime_serde")]
    last_move_at: Option<SystemTime>,
    version: u64,
}

impl Session {
    /// Opens a room with the host in the first seat.
    pub fn new(id: SessionId, host: ParticipantId, mode: Mode, config: MatchConfig) -> Self {
        let mut seats = Seats::default();
        seats.take(Seat::First, host);

        Session {
            id,
            host,
            mode,
            seats,
            spectators: Vec::new(),
            config,
            status: Status::Waiting,
            rotated: false,
            turn: Color::White,
            board: Board::default(),
            clocks: Clocks::new(config.time_limit()),
            history: Vec::new(),
            draw_offer: None,
            outcome: None,
            last_move_at: None,
            version: 0,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn host(&self) -> ParticipantId {
        self.host
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn seats(&self) -> &Seats {
        &self.seats
    }

    pub fn spectators(&self) -> &[ParticipantId] {
        &self.spectators
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Whether seats and colors are swapped with respect to the first match.
    pub fn is_rotated(&self) -> bool {
        self.rotated
    }

    /// The side to move.
    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn clocks(&self) -> &Clocks {
        &self.clocks
    }

    /// The moves committed in the current match, in order.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// The participant whose draw offer is outstanding, if any.
    pub fn draw_offer(&self) -> Option<ParticipantId> {
        self.draw_offer
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// The [`Winner`] of the match, once finished.
    pub fn winner(&self) -> Option<Winner> {
        self.outcome.map(|o| o.winner())
    }

    /// When the last move was committed.
    pub fn last_move_at(&self) -> Option<SystemTime> {
        self.last_move_at
    }

    /// Incremented by every accepted transition.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The [`Color`] played from a [`Seat`].
    pub fn color_of(&self, seat: Seat) -> Color {
        match (seat, self.rotated) {
            (Seat::First, false) | (Seat::Second, true) => Color::White,
            (Seat::First, true) | (Seat::Second, false) => Color::Red,
        }
    }

    /// The [`Seat`] playing a [`Color`].
    pub fn seat_of(&self, side: Color) -> Seat {
        match (side, self.rotated) {
            (Color::White, false) | (Color::Red, true) => Seat::First,
            (Color::Red, false) | (Color::White, true) => Seat::Second,
        }
    }

    /// The participant playing a [`Color`], if seated.
    pub fn player(&self, side: Color) -> Option<ParticipantId> {
        self.seats.get(self.seat_of(side))
    }

    /// The [`Color`] a participant plays, if seated.
    pub fn side_of(&self, who: ParticipantId) -> Option<Color> {
        self.seats.of(who).map(|s| self.color_of(s))
    }

    /// Whether a participant is seated or spectating.
    pub fn is_present(&self, who: ParticipantId) -> bool {
        self.seats.of(who).is_some() || self.spectators.contains(&who)
    }

    /// Dispatches an [`Action`] submitted by a participant.
    #[instrument(level = "trace", skip(self), fields(session = %self.id, version = self.version), err)]
    pub fn execute(
        &self,
        who: ParticipantId,
        action: Action,
        now: SystemTime,
    ) -> Result<Transition, Rejection> {
        match action {
            Action::Join(presence) => self.join(who, presence),
            Action::SelectSeat(seat) => self.select_seat(who, seat),
            Action::Leave => self.leave(who),
            Action::Configure(config) => self.configure(who, config),
            Action::Start => self.start(who),
            Action::SubmitMove(m) => self.submit_move(who, m, now),
            Action::ProposeDraw => self.propose_draw(who),
            Action::RespondDraw { accept } => self.respond_draw(who, accept),
            Action::Resign => self.resign(who),
        }
    }

    /// Enters the room either as a spectator or into the first vacant seat.
    pub fn join(&self, who: ParticipantId, presence: Presence) -> Result<Transition, Rejection> {
        if self.is_present(who) {
            return Err(Rejection::AlreadyPresent(who));
        }

        let mut next = self.clone();
        let mut events = vec![Event::Joined(who, presence)];

        match presence {
            Presence::Spectator => next.spectators.push(who),
            Presence::Player => {
                self.expect_status(&[Status::Waiting, Status::Finished])?;
                let seat = self.seats.vacant().ok_or(Rejection::NoVacantSeat)?;
                next.seats.take(seat, who);
                events.push(Event::Seated(who, seat));
            }
        }

        Ok(self.advance(next, events))
    }

    /// Moves a participant into a [`Seat`] that is vacant or already theirs.
    pub fn select_seat(&self, who: ParticipantId, seat: Seat) -> Result<Transition, Rejection> {
        self.expect_status(&[Status::Waiting])?;

        if !self.is_present(who) {
            return Err(Rejection::NotPresent(who));
        }

        match self.seats.get(seat) {
            Some(occupant) if occupant != who => return Err(Rejection::SeatTaken(seat)),
            _ => {}
        }

        let mut next = self.clone();
        next.spectators.retain(|&s| s != who);
        next.seats.vacate(who);
        next.seats.take(seat, who);

        Ok(self.advance(next, vec![Event::Seated(who, seat)]))
    }

    /// Departs from the room, forfeiting the match if playing in it.
    pub fn leave(&self, who: ParticipantId) -> Result<Transition, Rejection> {
        if !self.is_present(who) {
            return Err(Rejection::NotPresent(who));
        }

        let mut next = self.clone();
        let mut events = vec![Event::Left(who)];

        if let (Status::Playing, Some(side)) = (self.status, self.side_of(who)) {
            events.push(next.finish(Outcome::Abandonment(side)));
        }

        next.seats.vacate(who);
        next.spectators.retain(|&s| s != who);

        Ok(self.advance(next, events))
    }

    /// Changes the configuration of the next match.
    pub fn configure(&self, who: ParticipantId, config: MatchConfig) -> Result<Transition, Rejection> {
        self.expect_status(&[Status::Waiting])?;

        if who != self.host {
            return Err(Rejection::NotHost(who));
        }

        let mut next = self.clone();
        next.config = config;
        next.clocks = Clocks::new(config.time_limit());

        Ok(self.advance(next, vec![Event::Reconfigured(config)]))
    }

    /// Starts a match, or a rematch with seats and colors swapped.
    pub fn start(&self, who: ParticipantId) -> Result<Transition, Rejection> {
        let rotated = match self.status {
            Status::Playing => return Err(Rejection::Unavailable(self.status)),

            Status::Waiting => {
                match self.mode {
                    Mode::Match if who != self.host => return Err(Rejection::NotHost(who)),
                    Mode::Practice if !self.is_present(who) => return Err(Rejection::NotPresent(who)),
                    _ => {}
                }

                self.rotated
            }

            Status::Finished => {
                if !self.is_present(who) {
                    return Err(Rejection::NotPresent(who));
                }

                if who != self.host && self.seats.of(who).is_none() {
                    return Err(Rejection::NotSeated(who));
                }

                !self.rotated
            }
        };

        if self.mode == Mode::Match && !self.seats.is_full() {
            return Err(Rejection::SeatsVacant);
        }

        let next = Session {
            status: Status::Playing,
            rotated,
            turn: Color::White,
            board: Board::default(),
            clocks: Clocks::new(self.config.time_limit()),
            history: Vec::new(),
            draw_offer: None,
            outcome: None,
            last_move_at: None,
            ..self.clone()
        };

        Ok(self.advance(next, vec![Event::Started]))
    }

    /// Plays a move for the side to move.
    pub fn submit_move(&self, who: ParticipantId, m: Move, now: SystemTime) -> Result<Transition, Rejection> {
        self.expect_status(&[Status::Playing])?;

        match self.mode {
            Mode::Match => match self.side_of(who) {
                None => return Err(Rejection::NotSeated(who)),
                Some(side) if side != self.turn => return Err(Rejection::NotYourTurn(self.turn)),
                Some(_) => {}
            },

            Mode::Practice => {
                if who != self.host && self.seats.of(who).is_none() {
                    return Err(Rejection::NotSeated(who));
                }
            }
        }

        if !self.board.moves(self.turn).contains(&m) {
            return Err(Rejection::IllegalMove(m));
        }

        let mover = self.turn;
        let mut next = self.clone();
        next.board = self.board.play(&m);
        next.clocks = self.clocks.credit(mover, self.config.increment());
        next.turn = !mover;
        next.last_move_at = Some(now);
        next.history.push(m.clone());

        let mut events = vec![Event::Moved(m)];

        if next.board.moves(next.turn).is_empty() {
            events.push(next.finish(Outcome::Immobilized(next.turn)));
        }

        Ok(self.advance(next, events))
    }

    /// Takes one second from the clock of the side to move.
    #[instrument(level = "trace", skip(self), fields(session = %self.id, version = self.version), err)]
    pub fn tick(&self) -> Result<Transition, Rejection> {
        self.expect_status(&[Status::Playing])?;

        if self.history.is_empty() {
            return Err(Rejection::ClockIdle);
        }

        let mut next = self.clone();
        next.clocks = self.clocks.tick(self.turn);

        let mut events = Vec::new();
        if next.clocks.is_flagged(self.turn) {
            events.push(next.finish(Outcome::LossOnTime(self.turn)));
        }

        Ok(self.advance(next, events))
    }

    /// Offers a draw to the opponent.
    pub fn propose_draw(&self, who: ParticipantId) -> Result<Transition, Rejection> {
        self.expect_status(&[Status::Playing])?;
        self.expect_seated(who)?;

        if let Some(proposer) = self.draw_offer {
            return Err(Rejection::DrawPending(proposer));
        }

        let mut next = self.clone();
        next.draw_offer = Some(who);

        Ok(self.advance(next, vec![Event::DrawOffered(who)]))
    }

    /// Accepts or declines the outstanding draw offer.
    ///
    /// In practice the occupant answers their own offer, having no opponent to do so.
    pub fn respond_draw(&self, who: ParticipantId, accept: bool) -> Result<Transition, Rejection> {
        self.expect_status(&[Status::Playing])?;
        self.expect_seated(who)?;

        match self.draw_offer {
            None => return Err(Rejection::NoDrawOffer),
            Some(proposer) if proposer == who && self.mode == Mode::Match => {
                return Err(Rejection::OwnDrawOffer)
            }
            Some(_) => {}
        }

        let mut next = self.clone();
        next.draw_offer = None;

        let event = if accept {
            next.finish(Outcome::DrawByAgreement)
        } else {
            Event::DrawDeclined(who)
        };

        Ok(self.advance(next, vec![event]))
    }

    /// Concedes the match.
    pub fn resign(&self, who: ParticipantId) -> Result<Transition, Rejection> {
        self.expect_status(&[Status::Playing])?;
        let side = self.expect_seated(who)?;

        let mut next = self.clone();
        let event = next.finish(Outcome::Resignation(side));

        Ok(self.advance(next, vec![event]))
    }

    fn expect_status(&self, allowed: &[Status]) -> Result<(), Rejection> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(Rejection::Unavailable(self.status))
        }
    }

    fn expect_seated(&self, who: ParticipantId) -> Result<Color, Rejection> {
        self.side_of(who).ok_or(Rejection::NotSeated(who))
    }

    fn finish(&mut self, outcome: Outcome) -> Event {
        self.status = Status::Finished;
        self.outcome = Some(outcome);
        self.draw_offer = None;
        Event::Finished(outcome)
    }

    fn advance(&self, next: Session, events: Vec<Event>) -> Transition {
        Transition {
            session: Session {
                version: self.version + 1,
                ..next
            },
            events,
        }
    }
}
