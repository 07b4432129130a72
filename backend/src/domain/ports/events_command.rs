//! Driving port for event mutations.

use async_trait::async_trait;

use crate::domain::{Error, Event, EventId, EventPatch, NewEvent, UserId};

/// Domain use-case port for creating, editing and removing events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventsCommand: Send + Sync {
    /// Store a new event owned by `event.owner_id`.
    async fn create(&self, event: NewEvent) -> Result<Event, Error>;

    /// Apply a partial update; only the owner may do so.
    async fn update(&self, caller: UserId, id: EventId, patch: EventPatch) -> Result<Event, Error>;

    /// Delete an event and its assistances; only the owner may do so.
    async fn delete(&self, caller: UserId, id: EventId) -> Result<(), Error>;
}
