//! Driving port for friendship queries.

use async_trait::async_trait;

use crate::domain::{Error, PublicUser, UserId};

/// Domain use-case port for listing friends and requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FriendshipsQuery: Send + Sync {
    /// Users with an accepted friendship with `user`.
    async fn friends(&self, user: UserId) -> Result<Vec<PublicUser>, Error>;

    /// Users waiting for `user` to accept their request.
    async fn pending_requests(&self, user: UserId) -> Result<Vec<PublicUser>, Error>;
}
