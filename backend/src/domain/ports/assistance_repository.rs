//! Port abstraction for assistance persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Assistance, EventId, NewAssistance, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by assistance repository adapters.
    pub enum AssistancePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "assistance repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "assistance repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssistanceRepository: Send + Sync {
    /// Fetch the attendance of `user` at `event`.
    async fn find(
        &self,
        user: UserId,
        event: EventId,
    ) -> Result<Option<Assistance>, AssistancePersistenceError>;

    /// Store a new attendance without feedback.
    async fn insert(&self, assistance: &NewAssistance)
    -> Result<Assistance, AssistancePersistenceError>;

    /// Overwrite rating and comment, returning `None` when the row vanished.
    async fn update(
        &self,
        assistance: &Assistance,
    ) -> Result<Option<Assistance>, AssistancePersistenceError>;

    /// Remove an attendance; `false` when none existed.
    async fn delete(&self, user: UserId, event: EventId)
    -> Result<bool, AssistancePersistenceError>;

    /// Every attendance at `event`.
    async fn list_by_event(&self, event: EventId)
    -> Result<Vec<Assistance>, AssistancePersistenceError>;

    /// Every attendance by `user`.
    async fn list_by_user(&self, user: UserId)
    -> Result<Vec<Assistance>, AssistancePersistenceError>;
}
