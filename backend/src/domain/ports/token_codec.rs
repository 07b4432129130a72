//! Port for signed identity tokens.
use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Failures raised while issuing or reading tokens.
    pub enum TokenError {
        /// The token is malformed or its signature does not match.
        Invalid { message: String } => "token rejected: {message}",
        /// The claims could not be encoded.
        Encoding { message: String } => "token encoding failed: {message}",
    }
}

/// Issues and verifies tokens that carry only a user identifier.
///
/// Tokens do not expire; callers must still confirm the user exists.
#[cfg_attr(test, mockall::automock)]
pub trait TokenCodec: Send + Sync {
    /// Sign a token for `user`.
    fn sign(&self, user: UserId) -> Result<String, TokenError>;

    /// Check the signature and return the embedded identifier.
    fn verify(&self, token: &str) -> Result<UserId, TokenError>;
}
