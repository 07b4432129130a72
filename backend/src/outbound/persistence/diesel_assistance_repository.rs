//! PostgreSQL-backed `AssistanceRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AssistancePersistenceError, AssistanceRepository};
use crate::domain::{Assistance, EventId, NewAssistance, UserId};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, map_stored_value_error,
};
use super::models::{AssistanceFeedback, AssistanceRow, StoredValueError};
use super::pool::{DbPool, PoolError};
use super::schema::assistances;

/// Diesel-backed implementation of the assistance repository port.
#[derive(Clone)]
pub struct DieselAssistanceRepository {
    pool: DbPool,
}

impl DieselAssistanceRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AssistancePersistenceError {
    map_basic_pool_error(error, AssistancePersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AssistancePersistenceError {
    map_basic_diesel_error(
        error,
        AssistancePersistenceError::query,
        AssistancePersistenceError::connection,
    )
}

fn map_decode_error(error: StoredValueError) -> AssistancePersistenceError {
    map_stored_value_error(error, AssistancePersistenceError::query)
}

fn decode_rows(rows: Vec<AssistanceRow>) -> Result<Vec<Assistance>, AssistancePersistenceError> {
    rows.into_iter()
        .map(Assistance::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(map_decode_error)
}

#[async_trait]
impl AssistanceRepository for DieselAssistanceRepository {
    async fn find(
        &self,
        user: UserId,
        event: EventId,
    ) -> Result<Option<Assistance>, AssistancePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = assistances::table
            .find((user.get(), event.get()))
            .select(AssistanceRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Assistance::try_from)
            .transpose()
            .map_err(map_decode_error)
    }

    async fn insert(
        &self,
        assistance: &NewAssistance,
    ) -> Result<Assistance, AssistancePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(assistances::table)
            .values(AssistanceRow::from(assistance))
            .returning(AssistanceRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Assistance::try_from(row).map_err(map_decode_error)
    }

    async fn update(
        &self,
        assistance: &Assistance,
    ) -> Result<Option<Assistance>, AssistancePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let key = (assistance.user_id.get(), assistance.event_id.get());
        let row = diesel::update(assistances::table.find(key))
            .set(AssistanceFeedback::from(assistance))
            .returning(AssistanceRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Assistance::try_from)
            .transpose()
            .map_err(map_decode_error)
    }

    async fn delete(
        &self,
        user: UserId,
        event: EventId,
    ) -> Result<bool, AssistancePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(assistances::table.find((user.get(), event.get())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn list_by_event(
        &self,
        event: EventId,
    ) -> Result<Vec<Assistance>, AssistancePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = assistances::table
            .filter(assistances::event_id.eq(event.get()))
            .order(assistances::user_id.asc())
            .select(AssistanceRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        decode_rows(rows)
    }

    async fn list_by_user(
        &self,
        user: UserId,
    ) -> Result<Vec<Assistance>, AssistancePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = assistances::table
            .filter(assistances::user_id.eq(user.get()))
            .order(assistances::event_id.asc())
            .select(AssistanceRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        decode_rows(rows)
    }
}
