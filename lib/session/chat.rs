use crate::session::ParticipantId;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Identifies a chat [`Message`].
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, From)]
#[derive(Deserialize, Serialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

/// A chat message posted to a session.
#[derive(Debug, Display, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[display(fmt = "{sender_name}: {text}")]
pub struct Message {
    pub id: MessageId,
    pub sender: ParticipantId,
    pub sender_name: String,
    pub text: String,
    #[serde(with = "humantime_serde")]
    pub timestamp: SystemTime,
}
