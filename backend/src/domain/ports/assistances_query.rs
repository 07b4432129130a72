//! Driving port for attendance queries.

use async_trait::async_trait;

use crate::domain::{Assistance, Error, EventId, UserId};

/// Domain use-case port for reading attendance.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssistancesQuery: Send + Sync {
    /// The attendance of `user` at `event`; not found when absent.
    async fn get(&self, user: UserId, event: EventId) -> Result<Assistance, Error>;

    /// Every attendance at an existing event.
    async fn for_event(&self, event: EventId) -> Result<Vec<Assistance>, Error>;
}
