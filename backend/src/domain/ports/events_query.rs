//! Driving port for event queries.

use async_trait::async_trait;

use crate::domain::{AttendedEvent, Error, Event, EventId, EventSearch, EventTimeline, UserId};

/// Domain use-case port for reading events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventsQuery: Send + Sync {
    /// Events that have not started yet.
    async fn upcoming(&self) -> Result<Vec<Event>, Error>;

    /// A single event; not found when absent.
    async fn get(&self, id: EventId) -> Result<Event, Error>;

    /// Events matching the title and/or location fragments.
    async fn search(&self, search: &EventSearch) -> Result<Vec<Event>, Error>;

    /// Upcoming events by the best rated owners.
    async fn popular(&self) -> Result<Vec<Event>, Error>;

    /// Events created by an existing user.
    async fn by_owner(&self, owner: UserId, timeline: EventTimeline) -> Result<Vec<Event>, Error>;

    /// Events an existing user attends, with their feedback.
    async fn attended_by(
        &self,
        user: UserId,
        timeline: EventTimeline,
    ) -> Result<Vec<AttendedEvent>, Error>;
}
