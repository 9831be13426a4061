use crate::rules::Move;
use crate::session::{MatchConfig, Outcome, ParticipantId, Presence, Seat, Session};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// An input submitted to a [`Session`] by one of its participants.
#[derive(Debug, Display, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[display(fmt = "join as {_0}")]
    Join(Presence),
    #[display(fmt = "take the {_0} seat")]
    SelectSeat(Seat),
    #[display(fmt = "leave")]
    Leave,
    #[display(fmt = "configure {_0}")]
    Configure(MatchConfig),
    #[display(fmt = "start")]
    Start,
    #[display(fmt = "move {_0}")]
    SubmitMove(Move),
    #[display(fmt = "propose a draw")]
    ProposeDraw,
    #[display(fmt = "respond to the draw offer")]
    RespondDraw { accept: bool },
    #[display(fmt = "resign")]
    Resign,
}

/// Something that happened as the result of a transition.
#[derive(Debug, Display, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    #[display(fmt = "`{_0}` joined as {_1}")]
    Joined(ParticipantId, Presence),
    #[display(fmt = "`{_0}` took the {_1} seat")]
    Seated(ParticipantId, Seat),
    #[display(fmt = "`{_0}` left")]
    Left(ParticipantId),
    #[display(fmt = "match reconfigured to {_0}")]
    Reconfigured(MatchConfig),
    #[display(fmt = "match started")]
    Started,
    #[display(fmt = "{_0}")]
    Moved(Move),
    #[display(fmt = "`{_0}` offered a draw")]
    DrawOffered(ParticipantId),
    #[display(fmt = "`{_0}` declined the draw offer")]
    DrawDeclined(ParticipantId),
    #[display(fmt = "match finished: {_0}")]
    Finished(Outcome),
}

/// The result of an accepted input: the next snapshot and what happened.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Transition {
    pub session: Session,
    pub events: Vec<Event>,
}
