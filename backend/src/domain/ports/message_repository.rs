//! Port abstraction for message persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Message, NewMessage, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by message repository adapters.
    pub enum MessagePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "message repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "message repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Store a message and return it with its assigned identifier.
    async fn insert(&self, message: &NewMessage) -> Result<Message, MessagePersistenceError>;

    /// Messages exchanged between `a` and `b` in either direction, oldest
    /// first.
    async fn chat(&self, a: UserId, b: UserId) -> Result<Vec<Message>, MessagePersistenceError>;

    /// Users that exchanged at least one message with `user`.
    async fn contacts(&self, user: UserId) -> Result<Vec<User>, MessagePersistenceError>;
}
