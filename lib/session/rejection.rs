use crate::rules::{Color, Move};
use crate::session::{ParticipantId, Seat, Status};
use derive_more::{Display, Error};

/// The broad category of a [`Rejection`].
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RejectionKind {
    /// The move is not in the generator output; the mover should resubmit.
    #[display(fmt = "illegal move")]
    IllegalMove,
    /// The input came from someone not allowed to submit it.
    #[display(fmt = "wrong actor")]
    WrongActor,
    /// The session is not in a state that admits the input.
    #[display(fmt = "precondition")]
    Precondition,
}

/// The reason why an input was rejected by a [`Session`][`crate::session::Session`].
#[derive(Debug, Display, Clone, Eq, PartialEq, Hash, Error)]
pub enum Rejection {
    #[display(fmt = "move `{_0}` is illegal in this position")]
    IllegalMove(#[error(not(source))] Move),

    #[display(fmt = "it is {_0}'s turn to move")]
    NotYourTurn(#[error(not(source))] Color),

    #[display(fmt = "participant `{_0}` is not seated")]
    NotSeated(#[error(not(source))] ParticipantId),

    #[display(fmt = "participant `{_0}` is not in the session")]
    NotPresent(#[error(not(source))] ParticipantId),

    #[display(fmt = "participant `{_0}` is not the host")]
    NotHost(#[error(not(source))] ParticipantId),

    #[display(fmt = "participant `{_0}` is already in the session")]
    AlreadyPresent(#[error(not(source))] ParticipantId),

    #[display(fmt = "the {_0} seat is taken")]
    SeatTaken(#[error(not(source))] Seat),

    #[display(fmt = "both seats are taken")]
    NoVacantSeat,

    #[display(fmt = "both seats must be taken")]
    SeatsVacant,

    #[display(fmt = "the session is {_0}")]
    Unavailable(#[error(not(source))] Status),

    #[display(fmt = "the clock is not running before the first move")]
    ClockIdle,

    #[display(fmt = "participant `{_0}` already offered a draw")]
    DrawPending(#[error(not(source))] ParticipantId),

    #[display(fmt = "there is no draw offer")]
    NoDrawOffer,

    #[display(fmt = "the proposer cannot respond to their own draw offer")]
    OwnDrawOffer,

    #[display(fmt = "chat messages must not be blank")]
    BlankMessage,
}

impl Rejection {
    /// The [`RejectionKind`] of this rejection.
    pub fn kind(&self) -> RejectionKind {
        match self {
            Rejection::IllegalMove(_) => RejectionKind::IllegalMove,

            Rejection::NotYourTurn(_)
            | Rejection::NotSeated(_)
            | Rejection::NotPresent(_)
            | Rejection::NotHost(_) => RejectionKind::WrongActor,

            Rejection::AlreadyPresent(_)
            | Rejection::SeatTaken(_)
            | Rejection::NoVacantSeat
            | Rejection::SeatsVacant
            | Rejection::Unavailable(_)
            | Rejection::ClockIdle
            | Rejection::DrawPending(_)
            | Rejection::NoDrawOffer
            | Rejection::OwnDrawOffer
            | Rejection::BlankMessage => RejectionKind::Precondition,
        }
    }
}
