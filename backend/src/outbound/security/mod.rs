//! Credential adapters: password hashing and bearer token signing.

mod bcrypt_hasher;
mod signed_token;

pub use bcrypt_hasher::BcryptPasswordHasher;
pub use signed_token::SignedTokenCodec;
