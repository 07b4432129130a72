//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{User, UserId, UserRegistration, UserStatistics};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique constraint rejected the email address.
        DuplicateEmail { email: String } => "user email already stored: {email}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user and return it with its assigned identifier.
    async fn insert(&self, user: &UserRegistration) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Every user whose email matches exactly.
    async fn find_by_email(&self, email: &str) -> Result<Vec<User>, UserPersistenceError>;

    /// Users whose email contains `fragment`, ignoring case.
    async fn search_by_email(&self, fragment: &str) -> Result<Vec<User>, UserPersistenceError>;

    /// Every user ordered by identifier.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Overwrite the stored row with `user`, returning `None` when it vanished.
    async fn update(&self, user: &User) -> Result<Option<User>, UserPersistenceError>;

    /// Delete the user together with owned events, their assistances, the
    /// user's own assistances, friendships and messages, atomically.
    ///
    /// Returns `false` when no such user existed.
    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError>;

    /// Aggregate activity figures for `id`.
    async fn statistics(&self, id: UserId) -> Result<UserStatistics, UserPersistenceError>;
}
