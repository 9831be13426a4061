use crate::service::{Notification, Repository, RepositoryError};
use crate::session::{Message, Session, SessionId};
use async_stream::stream;
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use std::collections::{hash_map::Entry, HashMap};
use tokio::sync::{broadcast, RwLock};
use tracing::{instrument, trace, warn};

/// How many notifications a subscriber may fall behind before missing some.
const BACKLOG: usize = 64;

#[derive(Debug)]
struct Record {
    session: Session,
    chat: Vec<Message>,
    channel: broadcast::Sender<Notification>,
}

impl Record {
    fn notify(&self, notification: Notification) {
        if self.channel.send(notification).is_err() {
            trace!(session = %self.session.id(), "no subscribers");
        }
    }
}

/// A [`Repository`] that keeps sessions in memory.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    records: RwLock<HashMap<SessionId, Record>>,
}

impl InMemoryRepository {
    /// The chat messages posted to a session, oldest first.
    pub async fn chat(&self, id: SessionId) -> Result<Vec<Message>, RepositoryError> {
        let records = self.records.read().await;
        let record = records.get(&id).ok_or(RepositoryError::NotFound(id))?;
        Ok(record.chat.clone())
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    #[instrument(level = "trace", skip(self, session), fields(session = %session.id()), err)]
    async fn create(&self, session: Session) -> Result<(), RepositoryError> {
        match self.records.write().await.entry(session.id()) {
            Entry::Occupied(_) => Err(RepositoryError::AlreadyExists(session.id())),
            Entry::Vacant(e) => {
                let (channel, _) = broadcast::channel(BACKLOG);
                e.insert(Record {
                    session,
                    chat: Vec::new(),
                    channel,
                });

                Ok(())
            }
        }
    }

    #[instrument(level = "trace", skip(self, session), fields(session = %session.id(), version = session.version()), err)]
    async fn update(&self, session: Session) -> Result<(), RepositoryError> {
        let mut records = self.records.write().await;
        let id = session.id();
        let record = records.get_mut(&id).ok_or(RepositoryError::NotFound(id))?;

        let expected = record.session.version() + 1;
        if session.version() != expected {
            return Err(RepositoryError::Conflict {
                id,
                expected,
                found: session.version(),
            });
        }

        record.session = session;
        record.notify(Notification::Updated(record.session.clone()));
        Ok(())
    }

    #[instrument(level = "trace", skip(self), err)]
    async fn fetch(&self, id: SessionId) -> Result<Session, RepositoryError> {
        let records = self.records.read().await;
        let record = records.get(&id).ok_or(RepositoryError::NotFound(id))?;
        Ok(record.session.clone())
    }

    #[instrument(level = "trace", skip(self, message), fields(message = %message.id), err)]
    async fn append_chat(&self, id: SessionId, message: Message) -> Result<(), RepositoryError> {
        let mut records = self.records.write().await;
        let record = records.get_mut(&id).ok_or(RepositoryError::NotFound(id))?;
        record.chat.push(message.clone());
        record.notify(Notification::ChatAppended(message));
        Ok(())
    }

    #[instrument(level = "trace", skip(self), err)]
    async fn subscribe(
        &self,
        id: SessionId,
    ) -> Result<BoxStream<'static, Notification>, RepositoryError> {
        let records = self.records.read().await;
        let record = records.get(&id).ok_or(RepositoryError::NotFound(id))?;
        let mut rx = record.channel.subscribe();

        Ok(Box::pin(stream! {
            loop {
                match rx.recv().await {
                    Ok(notification) => yield notification,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(session = %id, skipped, "subscriber fell behind");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }))
    }
}
