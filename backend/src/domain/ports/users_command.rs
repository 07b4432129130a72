//! Driving port for user mutations.

use async_trait::async_trait;

use crate::domain::{Error, NewUser, PublicUser, UserId, UserPatch};

/// Domain use-case port for registering, editing and removing users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Register a user; the email must not be taken.
    async fn register(&self, user: NewUser) -> Result<PublicUser, Error>;

    /// Apply a partial update to the caller's own profile.
    async fn update(&self, caller: UserId, patch: UserPatch) -> Result<PublicUser, Error>;

    /// Delete the caller and everything that references them.
    async fn delete(&self, caller: UserId) -> Result<(), Error>;
}
