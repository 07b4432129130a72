//! `PasswordHasher` adapter backed by bcrypt.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Salted bcrypt hashing on tokio's blocking pool.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Hasher using bcrypt's default work factor.
    pub fn new() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Hasher with an explicit work factor, mainly to keep tests fast.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

fn map_bcrypt_error(error: bcrypt::BcryptError) -> PasswordHashError {
    debug!(%error, "bcrypt operation failed");
    PasswordHashError::hashing(error.to_string())
}

fn map_join_error(error: tokio::task::JoinError) -> PasswordHashError {
    PasswordHashError::hashing(format!("hashing task aborted: {error}"))
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError> {
        let plaintext = zeroize::Zeroizing::new(plaintext.to_owned());
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(plaintext.as_str(), cost))
            .await
            .map_err(map_join_error)?
            .map_err(map_bcrypt_error)
    }

    async fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, PasswordHashError> {
        let plaintext = zeroize::Zeroizing::new(plaintext.to_owned());
        let digest = digest.to_owned();
        let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(plaintext.as_str(), &digest))
            .await
            .map_err(map_join_error)?;
        match outcome {
            Ok(matches) => Ok(matches),
            // A stored value that is not a bcrypt digest can never match.
            Err(bcrypt::BcryptError::InvalidHash(_) | bcrypt::BcryptError::InvalidPrefix(_)) => {
                Ok(false)
            }
            Err(error) => Err(map_bcrypt_error(error)),
        }
    }
}
