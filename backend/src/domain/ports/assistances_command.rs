//! Driving port for attendance mutations.

use async_trait::async_trait;

use crate::domain::{
    Assistance, AssistanceCreation, AssistancePatch, Error, EventId, NewAssistance, UserId,
};

/// Domain use-case port for registering attendance and feedback.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssistancesCommand: Send + Sync {
    /// Register attendance; repeating the call reports the existing row.
    async fn create(&self, assistance: NewAssistance) -> Result<AssistanceCreation, Error>;

    /// Rate or comment on a finished event the caller attended.
    async fn update(
        &self,
        caller: UserId,
        event: EventId,
        patch: AssistancePatch,
    ) -> Result<Assistance, Error>;

    /// Remove `attendee`'s attendance. Allowed for the attendee and for the
    /// event owner.
    async fn delete(&self, caller: UserId, event: EventId, attendee: UserId) -> Result<(), Error>;
}
