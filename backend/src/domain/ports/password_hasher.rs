//! Port for one-way password hashing.
use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hashing or verification could not run.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Salted one-way hash with constant-time verification.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash `plaintext` with a fresh salt.
    async fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError>;

    /// Whether `plaintext` produces `digest`.
    async fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, PasswordHashError>;
}
