//! User registration, profile and authentication services.
//!
//! [`UserService`] implements the user driving ports on top of the user
//! repository, the password hasher and the token codec.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    LoginService, PasswordHashError, PasswordHasher, TokenCodec, TokenVerifier, UserPersistenceError,
    UserRepository, UsersCommand, UsersQuery,
};
use crate::domain::{
    Credentials, Error, LoginToken, NewUser, PublicUser, User, UserId, UserPatch, UserStatistics,
};

/// Registration or email change collides with another account.
pub const EMAIL_TAKEN_MESSAGE: &str = "Already exists a user with the same email address";
/// Referenced user is absent.
pub const USER_NOT_FOUND_MESSAGE: &str = "User does not exist or was not found";
/// Login failed; deliberately vague about which half was wrong.
pub const INVALID_CREDENTIALS_LOGIN_MESSAGE: &str = "Invalid email address or password";
/// Bearer token rejected.
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid authentication token or not registered user";
const DUPLICATE_EMAIL_ROWS_MESSAGE: &str =
    "Erroneously exist multiple users with the same email address";

/// User service implementing the user driving ports.
#[derive(Clone)]
pub struct UserService<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
}

impl<U, H, T> UserService<U, H, T> {
    /// Create a new service over the given adapters.
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }
}

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::store_unavailable("user", message),
        UserPersistenceError::Query { message } => Error::store_failed("user", message),
        UserPersistenceError::DuplicateEmail { .. } => Error::invalid_request(EMAIL_TAKEN_MESSAGE),
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

impl<U, H, T> UserService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenCodec,
{
    /// Whether exactly one user is registered with `email`.
    ///
    /// Lookup failures and ambiguous results count as absent; the unique
    /// email constraint still rejects the write in those cases.
    pub async fn exists_by_email(&self, email: &str) -> bool {
        match self.users.find_by_email(email).await {
            Ok(users) => users.len() == 1,
            Err(error) => {
                debug!(%error, "email existence lookup failed");
                false
            }
        }
    }

    async fn require_user(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND_MESSAGE))
    }
}

#[async_trait]
impl<U, H, T> UsersCommand for UserService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenCodec,
{
    async fn register(&self, user: NewUser) -> Result<PublicUser, Error> {
        if self.exists_by_email(&user.email).await {
            return Err(Error::invalid_request(EMAIL_TAKEN_MESSAGE));
        }
        let hash = self.hasher.hash(&user.password).await.map_err(map_hash_error)?;
        let stored = self
            .users
            .insert(&user.into_registration(hash))
            .await
            .map_err(map_user_error)?;
        info!(user_id = %stored.id, "user registered");
        Ok(stored.into())
    }

    async fn update(&self, caller: UserId, patch: UserPatch) -> Result<PublicUser, Error> {
        let stored = self.require_user(caller).await?;
        if let Some(email) = patch.email.as_deref() {
            if email != stored.email && self.exists_by_email(email).await {
                return Err(Error::invalid_request(EMAIL_TAKEN_MESSAGE));
            }
        }
        let password_hash = match patch.password.as_deref() {
            Some(plaintext) => Some(self.hasher.hash(plaintext).await.map_err(map_hash_error)?),
            None => None,
        };
        let merged = patch.apply(stored, password_hash);
        let updated = self
            .users
            .update(&merged)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND_MESSAGE))?;
        Ok(updated.into())
    }

    async fn delete(&self, caller: UserId) -> Result<(), Error> {
        let deleted = self.users.delete(caller).await.map_err(map_user_error)?;
        if !deleted {
            return Err(Error::not_found(USER_NOT_FOUND_MESSAGE));
        }
        info!(user_id = %caller, "user deleted with dependent rows");
        Ok(())
    }
}

#[async_trait]
impl<U, H, T> UsersQuery for UserService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenCodec,
{
    async fn list(&self) -> Result<Vec<PublicUser>, Error> {
        let users = self.users.list().await.map_err(map_user_error)?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    async fn get(&self, id: UserId) -> Result<PublicUser, Error> {
        self.require_user(id).await.map(PublicUser::from)
    }

    async fn search_by_email(&self, fragment: &str) -> Result<Vec<PublicUser>, Error> {
        let users = self.users.search_by_email(fragment).await.map_err(map_user_error)?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    async fn statistics(&self, id: UserId) -> Result<UserStatistics, Error> {
        self.require_user(id).await?;
        self.users.statistics(id).await.map_err(map_user_error)
    }
}

#[async_trait]
impl<U, H, T> LoginService for UserService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenCodec,
{
    async fn login(&self, credentials: &Credentials) -> Result<LoginToken, Error> {
        let mut matches = self
            .users
            .find_by_email(&credentials.email)
            .await
            .map_err(map_user_error)?;
        if matches.len() > 1 {
            warn!(count = matches.len(), "email shared by several users");
            return Err(Error::internal(DUPLICATE_EMAIL_ROWS_MESSAGE));
        }
        let user = matches
            .pop()
            .ok_or_else(|| Error::unauthorized(INVALID_CREDENTIALS_LOGIN_MESSAGE))?;
        let verified = self
            .hasher
            .verify(&credentials.password, &user.password_hash)
            .await
            .map_err(map_hash_error)?;
        if !verified {
            return Err(Error::unauthorized(INVALID_CREDENTIALS_LOGIN_MESSAGE));
        }
        let token = self
            .tokens
            .sign(user.id)
            .map_err(|error| Error::internal(error.to_string()))?;
        Ok(LoginToken {
            token,
            user_id: user.id,
        })
    }
}

#[async_trait]
impl<U, H, T> TokenVerifier for UserService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenCodec,
{
    async fn verify(&self, token: &str) -> Result<UserId, Error> {
        let id = self.tokens.verify(token).map_err(|error| {
            debug!(%error, "bearer token rejected");
            Error::unauthorized(INVALID_TOKEN_MESSAGE)
        })?;
        match self.users.find_by_id(id).await.map_err(map_user_error)? {
            Some(user) => Ok(user.id),
            None => Err(Error::unauthorized(INVALID_TOKEN_MESSAGE)),
        }
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
