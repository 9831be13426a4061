use crate::session::{Message, Session, SessionId};
use async_trait::async_trait;
use derive_more::{Display, Error};
use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The reason why a [`Repository`] operation failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Hash, Error)]
pub enum RepositoryError {
    #[display(fmt = "session `{_0}` does not exist")]
    NotFound(#[error(not(source))] SessionId),

    #[display(fmt = "session `{_0}` already exists")]
    AlreadyExists(#[error(not(source))] SessionId),

    #[display(fmt = "session `{id}` expected version {expected}, found {found}")]
    Conflict {
        id: SessionId,
        expected: u64,
        found: u64,
    },
}

/// A change to a session, as broadcast to its subscribers.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notification {
    /// The authoritative snapshot of the session.
    Updated(Session),
    /// A chat message was posted to the session.
    ChatAppended(Message),
}

/// Trait for types that persist [`Session`] snapshots and broadcast their changes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Repository: Send + Sync {
    /// Stores a new session.
    async fn create(&self, session: Session) -> Result<(), RepositoryError>;

    /// Replaces the stored snapshot of a session.
    ///
    /// The snapshot is refused with [`RepositoryError::Conflict`]
    /// unless its version is exactly one above the stored one.
    async fn update(&self, session: Session) -> Result<(), RepositoryError>;

    /// Loads the current snapshot of a session.
    async fn fetch(&self, id: SessionId) -> Result<Session, RepositoryError>;

    /// Posts a chat message to a session.
    async fn append_chat(&self, id: SessionId, message: Message) -> Result<(), RepositoryError>;

    /// Streams the changes to a session from now on.
    async fn subscribe(
        &self,
        id: SessionId,
    ) -> Result<BoxStream<'static, Notification>, RepositoryError>;
}

#[async_trait]
impl<T: Repository + ?Sized> Repository for Arc<T> {
    async fn create(&self, session: Session) -> Result<(), RepositoryError> {
        (**self).create(session).await
    }

    async fn update(&self, session: Session) -> Result<(), RepositoryError> {
        (**self).update(session).await
    }

    async fn fetch(&self, id: SessionId) -> Result<Session, RepositoryError> {
        (**self).fetch(id).await
    }

    async fn append_chat(&self, id: SessionId, message: Message) -> Result<(), RepositoryError> {
        (**self).append_chat(id, message).await
    }

    async fn subscribe(
        &self,
        id: SessionId,
    ) -> Result<BoxStream<'static, Notification>, RepositoryError> {
        (**self).subscribe(id).await
    }
}
