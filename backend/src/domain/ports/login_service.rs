//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call [`LoginService`] to exchange credentials for a token
//! and [`TokenVerifier`] to turn a bearer token back into a live user.

use async_trait::async_trait;

use crate::domain::{Credentials, Error, LoginToken, UserId};

/// Domain use-case port for issuing tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Check the credentials and issue a token for the matching user.
    async fn login(&self, credentials: &Credentials) -> Result<LoginToken, Error>;
}

/// Domain use-case port for authenticating bearer tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify the token signature and confirm the user still exists.
    async fn verify(&self, token: &str) -> Result<UserId, Error>;
}
