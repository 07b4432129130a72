//! Event services: creation, owner-only edits and the read models.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    EventPersistenceError, EventRepository, EventsCommand, EventsQuery, UserRepository,
};
use crate::domain::user_service::{USER_NOT_FOUND_MESSAGE, map_user_error};
use crate::domain::{
    AttendedEvent, Error, Event, EventId, EventPatch, EventSearch, EventTimeline, NewEvent, UserId,
    ValidationRules,
};

/// Referenced event is absent.
pub const EVENT_NOT_FOUND_MESSAGE: &str = "Event does not exist or was not found";
/// Caller tried to change someone else's event.
pub const NOT_EVENT_OWNER_MESSAGE: &str = "User is not the owner of the event";

/// Event service implementing the event driving ports.
#[derive(Clone)]
pub struct EventService<E, U> {
    events: Arc<E>,
    users: Arc<U>,
    rules: ValidationRules,
}

impl<E, U> EventService<E, U> {
    /// Create a new service over the given repositories.
    pub fn new(events: Arc<E>, users: Arc<U>, rules: ValidationRules) -> Self {
        Self {
            events,
            users,
            rules,
        }
    }
}

pub(crate) fn map_event_error(error: EventPersistenceError) -> Error {
    match error {
        EventPersistenceError::Connection { message } => Error::store_unavailable("event", message),
        EventPersistenceError::Query { message } => Error::store_failed("event", message),
    }
}

impl<E, U> EventService<E, U>
where
    E: EventRepository,
    U: UserRepository,
{
    /// Whether `user` owns `event`; missing events and lookup failures count
    /// as not owned.
    pub async fn is_owner(&self, user: UserId, event: EventId) -> bool {
        matches!(
            self.events.find_by_id(event).await,
            Ok(Some(found)) if found.is_owned_by(user)
        )
    }

    async fn require_event(&self, id: EventId) -> Result<Event, Error> {
        self.events
            .find_by_id(id)
            .await
            .map_err(map_event_error)?
            .ok_or_else(|| Error::not_found(EVENT_NOT_FOUND_MESSAGE))
    }

    /// Resolve `id` for a change by `caller`: 404 when absent, then 403 unless
    /// [`Self::is_owner`] holds.
    async fn require_owned(&self, caller: UserId, id: EventId) -> Result<Event, Error> {
        let event = self.require_event(id).await?;
        if !self.is_owner(caller, id).await {
            return Err(Error::forbidden(NOT_EVENT_OWNER_MESSAGE));
        }
        Ok(event)
    }

    async fn require_user(&self, id: UserId) -> Result<(), Error> {
        match self.users.find_by_id(id).await.map_err(map_user_error)? {
            Some(_) => Ok(()),
            None => Err(Error::not_found(USER_NOT_FOUND_MESSAGE)),
        }
    }
}

#[async_trait]
impl<E, U> EventsCommand for EventService<E, U>
where
    E: EventRepository,
    U: UserRepository,
{
    async fn create(&self, event: NewEvent) -> Result<Event, Error> {
        let stored = self.events.insert(&event).await.map_err(map_event_error)?;
        info!(event_id = %stored.id, owner_id = %stored.owner_id, "event created");
        Ok(stored)
    }

    async fn update(&self, caller: UserId, id: EventId, patch: EventPatch) -> Result<Event, Error> {
        let stored = self.require_owned(caller, id).await?;
        patch.validate_against(&stored, &self.rules)?;
        let merged = patch.apply(stored);
        self.events
            .update(&merged)
            .await
            .map_err(map_event_error)?
            .ok_or_else(|| Error::not_found(EVENT_NOT_FOUND_MESSAGE))
    }

    async fn delete(&self, caller: UserId, id: EventId) -> Result<(), Error> {
        self.require_owned(caller, id).await?;
        if !self.events.delete(id).await.map_err(map_event_error)? {
            return Err(Error::not_found(EVENT_NOT_FOUND_MESSAGE));
        }
        info!(event_id = %id, "event deleted with its assistances");
        Ok(())
    }
}

#[async_trait]
impl<E, U> EventsQuery for EventService<E, U>
where
    E: EventRepository,
    U: UserRepository,
{
    async fn upcoming(&self) -> Result<Vec<Event>, Error> {
        self.events.list_upcoming().await.map_err(map_event_error)
    }

    async fn get(&self, id: EventId) -> Result<Event, Error> {
        self.require_event(id).await
    }

    async fn search(&self, search: &EventSearch) -> Result<Vec<Event>, Error> {
        self.events.search(search).await.map_err(map_event_error)
    }

    async fn popular(&self) -> Result<Vec<Event>, Error> {
        self.events.popular().await.map_err(map_event_error)
    }

    async fn by_owner(&self, owner: UserId, timeline: EventTimeline) -> Result<Vec<Event>, Error> {
        self.require_user(owner).await?;
        self.events
            .list_by_owner(owner, timeline)
            .await
            .map_err(map_event_error)
    }

    async fn attended_by(
        &self,
        user: UserId,
        timeline: EventTimeline,
    ) -> Result<Vec<AttendedEvent>, Error> {
        self.require_user(user).await?;
        self.events
            .list_attended(user, timeline)
            .await
            .map_err(map_event_error)
    }
}

#[cfg(test)]
#[path = "event_service_tests.rs"]
mod tests;
