use crate::service::{ArbiterConfig, Repository, RepositoryError};
use crate::session::*;
use crate::util::IdGenerator;
use derive_more::{Display, Error, From};
use std::time::SystemTime;
use tracing::{debug, instrument, warn};

/// The reason why the [`Arbiter`] could not carry out a request.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
pub enum ArbiterError {
    #[display(fmt = "rejected: {_0}")]
    Rejected(Rejection),

    #[display(fmt = "repository failure: {_0}")]
    Repository(RepositoryError),
}

/// Applies inputs to sessions stored in a [`Repository`].
///
/// Every input is validated against the latest snapshot and the resulting snapshot is
/// written back with a compare-and-swap. If another writer got there first,
/// the input is validated again against the newer snapshot.
#[derive(Debug)]
pub struct Arbiter<R> {
    repository: R,
    ids: IdGenerator,
    attempts: usize,
}

impl<R: Repository> Arbiter<R> {
    /// Constructs an [`Arbiter`] with the given configuration.
    pub fn new(repository: R, config: ArbiterConfig) -> Self {
        Arbiter {
            repository,
            ids: IdGenerator::default(),
            attempts: config.attempts.max(1),
        }
    }

    /// The underlying [`Repository`].
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Opens a new session hosted by a participant.
    #[instrument(level = "debug", skip(self), err)]
    pub async fn open(
        &self,
        host: ParticipantId,
        mode: Mode,
        config: MatchConfig,
    ) -> Result<Session, ArbiterError> {
        let session = Session::new(self.ids.next(), host, mode, config);
        self.repository.create(session.clone()).await?;
        Ok(session)
    }

    /// Applies an [`Action`] submitted by a participant.
    #[instrument(level = "debug", skip(self), err)]
    pub async fn execute(
        &self,
        id: SessionId,
        who: ParticipantId,
        action: Action,
        now: SystemTime,
    ) -> Result<Transition, ArbiterError> {
        self.transition(id, |s| s.execute(who, action.clone(), now))
            .await
    }

    /// Ticks the clock of a session.
    #[instrument(level = "trace", skip(self), err)]
    pub async fn tick(&self, id: SessionId) -> Result<Transition, ArbiterError> {
        self.transition(id, Session::tick).await
    }

    /// Posts a chat message on behalf of a participant.
    #[instrument(level = "debug", skip(self, name, text), err)]
    pub async fn chat(
        &self,
        id: SessionId,
        who: ParticipantId,
        name: String,
        text: String,
        now: SystemTime,
    ) -> Result<Message, ArbiterError> {
        let session = self.repository.fetch(id).await?;

        if !session.is_present(who) {
            return Err(Rejection::NotPresent(who).into());
        }

        let text = text.trim();
        if text.is_empty() {
            return Err(Rejection::BlankMessage.into());
        }

        let message = Message {
            id: self.ids.next(),
            sender: who,
            sender_name: name,
            text: text.into(),
            timestamp: now,
        };

        self.repository.append_chat(id, message.clone()).await?;
        Ok(message)
    }

    async fn transition<F>(&self, id: SessionId, f: F) -> Result<Transition, ArbiterError>
    where
        F: Fn(&Session) -> Result<Transition, Rejection>,
    {
        let mut attempt = 1;

        loop {
            let session = self.repository.fetch(id).await?;

            let transition = f(&session).map_err(|r| {
                debug!(session = %id, version = session.version(), rejection = %r);
                r
            })?;

            match self.repository.update(transition.session.clone()).await {
                Ok(()) => return Ok(transition),
                Err(e @ RepositoryError::Conflict { .. }) if attempt < self.attempts => {
                    warn!(session = %id, attempt, error = %e, "retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
