//! Driving port for friendship transitions.

use async_trait::async_trait;

use crate::domain::{Error, FriendshipOutcome, UserId};

/// Domain use-case port for the friendship state machine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FriendshipsCommand: Send + Sync {
    /// Ask `target` to become friends, or accept their pending request.
    async fn request(&self, caller: UserId, target: UserId) -> Result<FriendshipOutcome, Error>;

    /// Accept the pending request `requester` sent to the caller.
    async fn accept(&self, caller: UserId, requester: UserId) -> Result<FriendshipOutcome, Error>;

    /// Remove the friendship (pending or accepted) and the pair's chat.
    async fn delete(&self, caller: UserId, other: UserId) -> Result<FriendshipOutcome, Error>;
}
