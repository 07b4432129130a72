//! Port abstraction for friendship persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Friendship, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by friendship repository adapters.
    pub enum FriendshipPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "friendship repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "friendship repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FriendshipRepository: Send + Sync {
    /// The row linking `a` and `b`, whichever of them requested it.
    async fn find_between(
        &self,
        a: UserId,
        b: UserId,
    ) -> Result<Option<Friendship>, FriendshipPersistenceError>;

    /// Store a new pending request.
    async fn insert(&self, friendship: &Friendship) -> Result<(), FriendshipPersistenceError>;

    /// Mark the pending request from `requester` to `target` as accepted.
    async fn accept(
        &self,
        requester: UserId,
        target: UserId,
    ) -> Result<Option<Friendship>, FriendshipPersistenceError>;

    /// Remove the pair's row and their chat atomically; `false` when no row
    /// existed.
    async fn delete(&self, a: UserId, b: UserId) -> Result<bool, FriendshipPersistenceError>;

    /// Users with a pending request addressed to `user`.
    async fn list_pending_requesters(
        &self,
        user: UserId,
    ) -> Result<Vec<User>, FriendshipPersistenceError>;

    /// Users with an accepted friendship with `user`.
    async fn list_friends(&self, user: UserId) -> Result<Vec<User>, FriendshipPersistenceError>;
}
