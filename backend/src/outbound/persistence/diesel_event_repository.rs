//! PostgreSQL-backed `EventRepository` implementation using Diesel ORM.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{EventPersistenceError, EventRepository};
use crate::domain::{
    AttendedEvent, Event, EventId, EventSearch, EventTimeline, NewEvent, UserId,
};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, map_stored_value_error,
};
use super::like::contains_pattern;
use super::models::{EventChangeset, EventRow, NewEventRow, StoredValueError};
use super::pool::{DbPool, PoolError};
use super::schema::{assistances, events};

/// Narrow a boxed query over `events` to the rows inside a timeline window.
macro_rules! filter_timeline {
    ($query:expr, $timeline:expr, $now:expr) => {{
        let query = $query;
        let now = $now;
        match $timeline {
            EventTimeline::All => query,
            EventTimeline::Future => query.filter(events::start_date.gt(now)),
            EventTimeline::Finished => query.filter(events::end_date.lt(now)),
            EventTimeline::Active => {
                query.filter(events::start_date.lt(now).and(events::end_date.gt(now)))
            }
        }
    }};
}

/// Diesel-backed implementation of the event repository port.
#[derive(Clone)]
pub struct DieselEventRepository {
    pool: DbPool,
}

impl DieselEventRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EventPersistenceError {
    map_basic_pool_error(error, EventPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> EventPersistenceError {
    map_basic_diesel_error(
        error,
        EventPersistenceError::query,
        EventPersistenceError::connection,
    )
}

fn map_decode_error(error: StoredValueError) -> EventPersistenceError {
    map_stored_value_error(error, EventPersistenceError::query)
}

fn decode_rows(rows: Vec<EventRow>) -> Result<Vec<Event>, EventPersistenceError> {
    rows.into_iter()
        .map(Event::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(map_decode_error)
}

/// Order `upcoming` by the rank of their owner in `scores`, best first.
///
/// Owners missing from `scores` never organised a finished, attended event
/// and are left out. Owners whose attendees never rated rank last. Events of
/// the same owner keep their incoming order.
fn rank_by_owner_score(scores: Vec<(i32, Option<f64>)>, upcoming: Vec<Event>) -> Vec<Event> {
    let mut ranked_owners = scores;
    ranked_owners.sort_by(|(a_owner, a), (b_owner, b)| {
        let a = a.unwrap_or(f64::NEG_INFINITY);
        let b = b.unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a).then(a_owner.cmp(b_owner))
    });
    let rank: HashMap<i32, usize> = ranked_owners
        .into_iter()
        .enumerate()
        .map(|(position, (owner, _))| (owner, position))
        .collect();

    let mut popular: Vec<(usize, Event)> = upcoming
        .into_iter()
        .filter_map(|event| rank.get(&event.owner_id.get()).map(|r| (*r, event)))
        .collect();
    popular.sort_by_key(|(position, _)| *position);
    popular.into_iter().map(|(_, event)| event).collect()
}

#[async_trait]
impl EventRepository for DieselEventRepository {
    async fn insert(&self, event: &NewEvent) -> Result<Event, EventPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(events::table)
            .values(NewEventRow::from(event))
            .returning(EventRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Event::try_from(row).map_err(map_decode_error)
    }

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, EventPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = events::table
            .find(id.get())
            .select(EventRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Event::try_from).transpose().map_err(map_decode_error)
    }

    async fn list_upcoming(&self) -> Result<Vec<Event>, EventPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = events::table
            .filter(events::start_date.gt(Utc::now()))
            .order((events::start_date.asc(), events::id.asc()))
            .select(EventRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        decode_rows(rows)
    }

    async fn search(&self, search: &EventSearch) -> Result<Vec<Event>, EventPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = events::table
            .select(EventRow::as_select())
            .order((events::start_date.asc(), events::id.asc()))
            .into_boxed();
        if let Some(title) = search.title.as_deref() {
            query = query.filter(events::title.ilike(contains_pattern(title)));
        }
        if let Some(location) = search.location.as_deref() {
            query = query.filter(events::location.ilike(contains_pattern(location)));
        }
        let rows = query.load(&mut conn).await.map_err(map_diesel_error)?;
        decode_rows(rows)
    }

    async fn list_by_owner(
        &self,
        owner: UserId,
        timeline: EventTimeline,
    ) -> Result<Vec<Event>, EventPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let query = events::table
            .filter(events::owner_id.eq(owner.get()))
            .order((events::start_date.asc(), events::id.asc()))
            .select(EventRow::as_select())
            .into_boxed();
        let rows = filter_timeline!(query, timeline, Utc::now())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        decode_rows(rows)
    }

    async fn list_attended(
        &self,
        user: UserId,
        timeline: EventTimeline,
    ) -> Result<Vec<AttendedEvent>, EventPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let query = events::table
            .inner_join(assistances::table)
            .filter(assistances::user_id.eq(user.get()))
            .order((events::start_date.asc(), events::id.asc()))
            .select((
                EventRow::as_select(),
                assistances::rating,
                assistances::comment,
            ))
            .into_boxed();
        let rows: Vec<(EventRow, Option<f64>, Option<String>)> =
            filter_timeline!(query, timeline, Utc::now())
                .load(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(row, rating, comment)| {
                Event::try_from(row).map(|event| AttendedEvent {
                    event,
                    rating,
                    comment,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_decode_error)
    }

    async fn popular(&self) -> Result<Vec<Event>, EventPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let now = Utc::now();
        let scores: Vec<(i32, Option<f64>)> = assistances::table
            .inner_join(events::table)
            .filter(events::end_date.lt(now))
            .group_by(events::owner_id)
            .select((events::owner_id, diesel::dsl::avg(assistances::rating)))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows = events::table
            .filter(events::start_date.gt(now))
            .order((events::start_date.asc(), events::id.asc()))
            .select(EventRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rank_by_owner_score(scores, decode_rows(rows)?))
    }

    async fn update(&self, event: &Event) -> Result<Option<Event>, EventPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(events::table.find(event.id.get()))
            .set(EventChangeset::from(event))
            .returning(EventRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Event::try_from).transpose().map_err(map_decode_error)
    }

    async fn delete(&self, id: EventId) -> Result<bool, EventPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let event_id = id.get();
        let removed = conn
            .transaction(|conn| {
                async move {
                    diesel::delete(assistances::table.filter(assistances::event_id.eq(event_id)))
                        .execute(conn)
                        .await?;
                    diesel::delete(events::table.find(event_id)).execute(conn).await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}
