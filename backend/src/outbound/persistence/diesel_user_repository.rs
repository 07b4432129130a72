//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Account deletion removes every row that references the user in one
//! transaction, so a failure part-way leaves the account untouched.

use async_trait::async_trait;
use diesel::dsl::{count_star, sql};
use diesel::prelude::*;
use diesel::sql_types::{Double, Nullable};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{FriendshipStatus, User, UserId, UserRegistration, UserStatistics};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::like::contains_pattern;
use super::models::{NewUserRow, UserChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{assistances, events, friendships, messages, users};

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

/// Map a write failure, singling out the unique email constraint.
fn map_write_error(error: diesel::result::Error, email: &str) -> UserPersistenceError {
    if is_unique_violation(&error) {
        debug!("email uniqueness constraint rejected write");
        return UserPersistenceError::duplicate_email(email);
    }
    map_diesel_error(error)
}

/// Mean rating of the owner's assistances, rounded to two decimals by the
/// database. `NULL` when nobody rated.
const ROUNDED_AVERAGE_RATING: &str = "round(avg(assistances.rating)::numeric, 2)::float8";

/// Remove the user and every dependent row.
///
/// Order matters: assistances on the user's events go before the events,
/// and every referencing row goes before the user.
async fn delete_cascade(
    conn: &mut AsyncPgConnection,
    id: i32,
) -> Result<usize, diesel::result::Error> {
    diesel::delete(
        messages::table.filter(
            messages::sender_user_id
                .eq(id)
                .or(messages::receiver_user_id.eq(id)),
        ),
    )
    .execute(conn)
    .await?;
    diesel::delete(
        friendships::table.filter(
            friendships::user_id
                .eq(id)
                .or(friendships::friend_user_id.eq(id)),
        ),
    )
    .execute(conn)
    .await?;
    let owned_events = events::table
        .filter(events::owner_id.eq(id))
        .select(events::id);
    diesel::delete(
        assistances::table.filter(
            assistances::user_id
                .eq(id)
                .or(assistances::event_id.eq_any(owned_events)),
        ),
    )
    .execute(conn)
    .await?;
    diesel::delete(events::table.filter(events::owner_id.eq(id)))
        .execute(conn)
        .await?;
    diesel::delete(users::table.find(id)).execute(conn).await
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &UserRegistration) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(users::table)
            .values(NewUserRow::from(user))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(User::from)
            .map_err(|error| map_write_error(error, &user.email))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(User::from))
            .map_err(map_diesel_error)
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn search_by_email(&self, fragment: &str) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .filter(users::email.ilike(contains_pattern(fragment)))
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn update(&self, user: &User) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(users::table.find(user.id.get()))
            .set(UserChangeset::from(user))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map(|row| row.map(User::from))
            .map_err(|error| map_write_error(error, &user.email))
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = conn
            .transaction(|conn| async move { delete_cascade(conn, id.get()).await }.scope_boxed())
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn statistics(&self, id: UserId) -> Result<UserStatistics, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = id.get();

        let average: Option<f64> = assistances::table
            .inner_join(events::table)
            .filter(events::owner_id.eq(user_id))
            .select(sql::<Nullable<Double>>(ROUNDED_AVERAGE_RATING))
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let created_events: i64 = events::table
            .filter(events::owner_id.eq(user_id))
            .select(count_star())
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let attended_events: i64 = assistances::table
            .filter(assistances::user_id.eq(user_id))
            .select(count_star())
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let friends: i64 = friendships::table
            .filter(friendships::status.eq(FriendshipStatus::Accepted.as_str()))
            .filter(
                friendships::user_id
                    .eq(user_id)
                    .or(friendships::friend_user_id.eq(user_id)),
            )
            .select(count_star())
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(UserStatistics {
            user_id: id,
            average_score: average.unwrap_or_default(),
            created_events,
            attended_events,
            friends,
        })
    }
}
