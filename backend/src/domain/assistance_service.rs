//! Attendance registration and post-event feedback.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use crate::domain::event_service::{EVENT_NOT_FOUND_MESSAGE, map_event_error};
use crate::domain::ports::{
    AssistancePersistenceError, AssistanceRepository, AssistancesCommand, AssistancesQuery,
    EventRepository,
};
use crate::domain::{
    Assistance, AssistanceCreation, AssistancePatch, Error, Event, EventId, NewAssistance, UserId,
};

/// Referenced attendance is absent.
pub const ASSISTANCE_NOT_FOUND_MESSAGE: &str = "Assistance does not exist or was not found";
/// Feedback attempted before the event ended.
pub const EVENT_NOT_FINISHED_MESSAGE: &str = "Event has not finished yet";
/// Caller is neither the attendee nor the event owner.
pub const NOT_ASSISTANCE_OWNER_MESSAGE: &str =
    "User is not the attendee nor the owner of the event";

/// Assistance service implementing the attendance driving ports.
#[derive(Clone)]
pub struct AssistanceService<A, E> {
    assistances: Arc<A>,
    events: Arc<E>,
}

impl<A, E> AssistanceService<A, E> {
    /// Create a new service over the given repositories.
    pub fn new(assistances: Arc<A>, events: Arc<E>) -> Self {
        Self {
            assistances,
            events,
        }
    }
}

fn map_assistance_error(error: AssistancePersistenceError) -> Error {
    match error {
        AssistancePersistenceError::Connection { message } => {
            Error::store_unavailable("assistance", message)
        }
        AssistancePersistenceError::Query { message } => Error::store_failed("assistance", message),
    }
}

impl<A, E> AssistanceService<A, E>
where
    A: AssistanceRepository,
    E: EventRepository,
{
    async fn require_event(&self, id: EventId) -> Result<Event, Error> {
        self.events
            .find_by_id(id)
            .await
            .map_err(map_event_error)?
            .ok_or_else(|| Error::not_found(EVENT_NOT_FOUND_MESSAGE))
    }

    async fn require_assistance(&self, user: UserId, event: EventId) -> Result<Assistance, Error> {
        self.assistances
            .find(user, event)
            .await
            .map_err(map_assistance_error)?
            .ok_or_else(|| Error::not_found(ASSISTANCE_NOT_FOUND_MESSAGE))
    }
}

#[async_trait]
impl<A, E> AssistancesCommand for AssistanceService<A, E>
where
    A: AssistanceRepository,
    E: EventRepository,
{
    async fn create(&self, assistance: NewAssistance) -> Result<AssistanceCreation, Error> {
        self.require_event(assistance.event_id).await?;
        if let Some(existing) = self
            .assistances
            .find(assistance.user_id, assistance.event_id)
            .await
            .map_err(map_assistance_error)?
        {
            debug!(
                user_id = %assistance.user_id,
                event_id = %assistance.event_id,
                "attendance already registered"
            );
            return Ok(AssistanceCreation::AlreadyExists(existing));
        }
        let stored = self
            .assistances
            .insert(&assistance)
            .await
            .map_err(map_assistance_error)?;
        info!(user_id = %stored.user_id, event_id = %stored.event_id, "attendance registered");
        Ok(AssistanceCreation::Created(stored))
    }

    async fn update(
        &self,
        caller: UserId,
        event: EventId,
        patch: AssistancePatch,
    ) -> Result<Assistance, Error> {
        let found = self.require_event(event).await?;
        let stored = self.require_assistance(caller, event).await?;
        if !found.has_finished(Utc::now()) {
            return Err(Error::forbidden(EVENT_NOT_FINISHED_MESSAGE));
        }
        self.assistances
            .update(&patch.apply(stored))
            .await
            .map_err(map_assistance_error)?
            .ok_or_else(|| Error::not_found(ASSISTANCE_NOT_FOUND_MESSAGE))
    }

    async fn delete(&self, caller: UserId, event: EventId, attendee: UserId) -> Result<(), Error> {
        let found = self.require_event(event).await?;
        if caller != attendee && !found.is_owned_by(caller) {
            return Err(Error::forbidden(NOT_ASSISTANCE_OWNER_MESSAGE));
        }
        let deleted = self
            .assistances
            .delete(attendee, event)
            .await
            .map_err(map_assistance_error)?;
        if !deleted {
            return Err(Error::not_found(ASSISTANCE_NOT_FOUND_MESSAGE));
        }
        info!(user_id = %attendee, event_id = %event, removed_by = %caller, "attendance removed");
        Ok(())
    }
}

#[async_trait]
impl<A, E> AssistancesQuery for AssistanceService<A, E>
where
    A: AssistanceRepository,
    E: EventRepository,
{
    async fn get(&self, user: UserId, event: EventId) -> Result<Assistance, Error> {
        self.require_assistance(user, event).await
    }

    async fn for_event(&self, event: EventId) -> Result<Vec<Assistance>, Error> {
        self.require_event(event).await?;
        self.assistances
            .list_by_event(event)
            .await
            .map_err(map_assistance_error)
    }
}
