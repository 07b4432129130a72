//! Port abstraction for event persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{AttendedEvent, Event, EventId, EventSearch, EventTimeline, NewEvent, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by event repository adapters.
    pub enum EventPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "event repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "event repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Store a new event and return it with its assigned identifier.
    async fn insert(&self, event: &NewEvent) -> Result<Event, EventPersistenceError>;

    /// Fetch an event by identifier.
    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, EventPersistenceError>;

    /// Events starting after now, soonest first.
    async fn list_upcoming(&self) -> Result<Vec<Event>, EventPersistenceError>;

    /// Events whose title and/or location contain the given fragments.
    async fn search(&self, search: &EventSearch) -> Result<Vec<Event>, EventPersistenceError>;

    /// Events created by `owner` within `timeline`.
    async fn list_by_owner(
        &self,
        owner: UserId,
        timeline: EventTimeline,
    ) -> Result<Vec<Event>, EventPersistenceError>;

    /// Events `user` attends within `timeline`, with the user's feedback.
    async fn list_attended(
        &self,
        user: UserId,
        timeline: EventTimeline,
    ) -> Result<Vec<AttendedEvent>, EventPersistenceError>;

    /// Upcoming events from owners ranked by the average rating of their
    /// finished events, best first.
    async fn popular(&self) -> Result<Vec<Event>, EventPersistenceError>;

    /// Overwrite the stored row with `event`, returning `None` when it vanished.
    async fn update(&self, event: &Event) -> Result<Option<Event>, EventPersistenceError>;

    /// Delete the event and its assistances atomically.
    async fn delete(&self, id: EventId) -> Result<bool, EventPersistenceError>;
}
