//! PostgreSQL-backed `FriendshipRepository` implementation using Diesel ORM.
//!
//! A pair has at most one row, stored with the requester first; every lookup
//! therefore checks both orderings.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{FriendshipPersistenceError, FriendshipRepository};
use crate::domain::{Friendship, FriendshipStatus, User, UserId};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, map_stored_value_error,
};
use super::models::{FriendshipRow, StoredValueError, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{friendships, messages, users};

/// Diesel-backed implementation of the friendship repository port.
#[derive(Clone)]
pub struct DieselFriendshipRepository {
    pool: DbPool,
}

impl DieselFriendshipRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FriendshipPersistenceError {
    map_basic_pool_error(error, FriendshipPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> FriendshipPersistenceError {
    map_basic_diesel_error(
        error,
        FriendshipPersistenceError::query,
        FriendshipPersistenceError::connection,
    )
}

fn map_decode_error(error: StoredValueError) -> FriendshipPersistenceError {
    map_stored_value_error(error, FriendshipPersistenceError::query)
}

#[async_trait]
impl FriendshipRepository for DieselFriendshipRepository {
    async fn find_between(
        &self,
        a: UserId,
        b: UserId,
    ) -> Result<Option<Friendship>, FriendshipPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (a, b) = (a.get(), b.get());
        let row = friendships::table
            .filter(
                (friendships::user_id.eq(a).and(friendships::friend_user_id.eq(b)))
                    .or(friendships::user_id.eq(b).and(friendships::friend_user_id.eq(a))),
            )
            .select(FriendshipRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Friendship::try_from)
            .transpose()
            .map_err(map_decode_error)
    }

    async fn insert(&self, friendship: &Friendship) -> Result<(), FriendshipPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(friendships::table)
            .values(FriendshipRow::from(friendship))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn accept(
        &self,
        requester: UserId,
        target: UserId,
    ) -> Result<Option<Friendship>, FriendshipPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(
            friendships::table
                .find((requester.get(), target.get()))
                .filter(friendships::status.eq(FriendshipStatus::Requested.as_str())),
        )
        .set(friendships::status.eq(FriendshipStatus::Accepted.as_str()))
        .returning(FriendshipRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        row.map(Friendship::try_from)
            .transpose()
            .map_err(map_decode_error)
    }

    async fn delete(&self, a: UserId, b: UserId) -> Result<bool, FriendshipPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (a, b) = (a.get(), b.get());
        let removed = conn
            .transaction(|conn| {
                async move {
                    diesel::delete(messages::table.filter(
                        (messages::sender_user_id.eq(a).and(messages::receiver_user_id.eq(b)))
                            .or(messages::sender_user_id.eq(b).and(messages::receiver_user_id.eq(a))),
                    ))
                    .execute(conn)
                    .await?;
                    diesel::delete(friendships::table.filter(
                        (friendships::user_id.eq(a).and(friendships::friend_user_id.eq(b)))
                            .or(friendships::user_id.eq(b).and(friendships::friend_user_id.eq(a))),
                    ))
                    .execute(conn)
                    .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn list_pending_requesters(
        &self,
        user: UserId,
    ) -> Result<Vec<User>, FriendshipPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let requesters = friendships::table
            .filter(friendships::friend_user_id.eq(user.get()))
            .filter(friendships::status.eq(FriendshipStatus::Requested.as_str()))
            .select(friendships::user_id);
        let rows: Vec<UserRow> = users::table
            .filter(users::id.eq_any(requesters))
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn list_friends(&self, user: UserId) -> Result<Vec<User>, FriendshipPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = user.get();
        let accepted = FriendshipStatus::Accepted.as_str();
        let targets = friendships::table
            .filter(friendships::user_id.eq(id))
            .filter(friendships::status.eq(accepted))
            .select(friendships::friend_user_id);
        let requesters = friendships::table
            .filter(friendships::friend_user_id.eq(id))
            .filter(friendships::status.eq(accepted))
            .select(friendships::user_id);
        let rows: Vec<UserRow> = users::table
            .filter(users::id.eq_any(targets).or(users::id.eq_any(requesters)))
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(User::from).collect())
    }
}
