//! HTTP inbound adapter exposing REST endpoints.

pub mod assistances;
pub mod auth;
pub mod error;
pub mod events;
pub mod friendships;
pub mod health;
pub mod messages;
pub mod parsers;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;
