//! PostgreSQL-backed `MessageRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MessagePersistenceError, MessageRepository};
use crate::domain::{Message, NewMessage, User, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{MessageRow, NewMessageRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{messages, users};

/// Diesel-backed implementation of the message repository port.
#[derive(Clone)]
pub struct DieselMessageRepository {
    pool: DbPool,
}

impl DieselMessageRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MessagePersistenceError {
    map_basic_pool_error(error, MessagePersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> MessagePersistenceError {
    map_basic_diesel_error(
        error,
        MessagePersistenceError::query,
        MessagePersistenceError::connection,
    )
}

#[async_trait]
impl MessageRepository for DieselMessageRepository {
    async fn insert(&self, message: &NewMessage) -> Result<Message, MessagePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(messages::table)
            .values(NewMessageRow::from(message))
            .returning(MessageRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(Message::from)
            .map_err(map_diesel_error)
    }

    async fn chat(&self, a: UserId, b: UserId) -> Result<Vec<Message>, MessagePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (a, b) = (a.get(), b.get());
        let rows: Vec<MessageRow> = messages::table
            .filter(
                (messages::sender_user_id.eq(a).and(messages::receiver_user_id.eq(b)))
                    .or(messages::sender_user_id.eq(b).and(messages::receiver_user_id.eq(a))),
            )
            .order((messages::timestamp.asc(), messages::id.asc()))
            .select(MessageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Message::from).collect())
    }

    async fn contacts(&self, user: UserId) -> Result<Vec<User>, MessagePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = user.get();
        let receivers = messages::table
            .filter(messages::sender_user_id.eq(id))
            .select(messages::receiver_user_id);
        let senders = messages::table
            .filter(messages::receiver_user_id.eq(id))
            .select(messages::sender_user_id);
        let rows: Vec<UserRow> = users::table
            .filter(users::id.eq_any(receivers).or(users::id.eq_any(senders)))
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(User::from).collect())
    }
}
