use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Identifies a participant across sessions.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, From)]
#[derive(Deserialize, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(transparent)]
pub struct ParticipantId(pub u64);

/// Identifies a [`Session`][`crate::session::Session`].
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, From)]
#[derive(Deserialize, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(transparent)]
pub struct SessionId(pub u64);

/// One of the two playing seats of a session.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(rename_all = "lowercase")]
pub enum Seat {
    #[display(fmt = "first")]
    First,
    #[display(fmt = "second")]
    Second,
}

impl Seat {
    /// Both seats, in the order they are filled.
    pub const ALL: [Seat; 2] = [Seat::First, Seat::Second];

    #[inline(always)]
    fn index(&self) -> usize {
        *self as usize
    }
}

/// Whether a participant joins to play or to watch.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    #[display(fmt = "player")]
    Player,
    #[display(fmt = "spectator")]
    Spectator,
}

/// Whether a session is a match between two participants or a practice game.
#[derive(Debug, Display, Default, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Each seated participant plays the color of their seat.
    #[default]
    #[display(fmt = "match")]
    Match,
    /// A single occupant may play both colors.
    #[display(fmt = "practice")]
    Practice,
}

/// The occupants of the two playing seats.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Seats([Option<ParticipantId>; 2]);

impl Seats {
    /// The occupant of a [`Seat`], if any.
    #[inline(always)]
    pub fn get(&self, seat: Seat) -> Option<ParticipantId> {
        self.0[seat.index()]
    }

    /// The [`Seat`] occupied by a participant, if any.
    pub fn of(&self, who: ParticipantId) -> Option<Seat> {
        Seat::ALL.into_iter().find(|&s| self.get(s) == Some(who))
    }

    /// The first empty [`Seat`], if any.
    pub fn vacant(&self) -> Option<Seat> {
        Seat::ALL.into_iter().find(|&s| self.get(s).is_none())
    }

    /// Whether both seats are taken.
    pub fn is_full(&self) -> bool {
        self.vacant().is_none()
    }

    /// Seats a participant, replacing any previous occupant.
    pub fn take(&mut self, seat: Seat, who: ParticipantId) {
        self.0[seat.index()] = Some(who);
    }

    /// Vacates the seat of a participant, if any.
    pub fn vacate(&mut self, who: ParticipantId) -> Option<Seat> {
        let seat = self.of(who)?;
        self.0[seat.index()] = None;
        Some(seat)
    }

    /// The participants seated.
    pub fn iter(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.0.iter().flatten().copied()
    }
}
