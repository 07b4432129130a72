//! Driving port for message queries.

use async_trait::async_trait;

use crate::domain::{Error, Message, PublicUser, UserId};

/// Domain use-case port for reading conversations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagesQuery: Send + Sync {
    /// Messages between `user` and `other`, oldest first.
    async fn chat(&self, user: UserId, other: UserId) -> Result<Vec<Message>, Error>;

    /// Users `user` has exchanged messages with.
    async fn contacts(&self, user: UserId) -> Result<Vec<PublicUser>, Error>;
}
