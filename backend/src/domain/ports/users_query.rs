//! Driving port for user-facing queries.

use async_trait::async_trait;

use crate::domain::{Error, PublicUser, UserId, UserStatistics};

/// Domain use-case port for reading users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Every registered user.
    async fn list(&self) -> Result<Vec<PublicUser>, Error>;

    /// A single user; not found when absent.
    async fn get(&self, id: UserId) -> Result<PublicUser, Error>;

    /// Users whose email contains `fragment`.
    async fn search_by_email(&self, fragment: &str) -> Result<Vec<PublicUser>, Error>;

    /// Activity figures for an existing user.
    async fn statistics(&self, id: UserId) -> Result<UserStatistics, Error>;
}
