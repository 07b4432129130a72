//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Each repository implements one domain port on top of a shared `bb8` pool
//! of `diesel-async` connections. Row structs (`models.rs`) and table
//! definitions (`schema.rs`) stay private to this module; adapters translate
//! them into domain types and map every database failure onto the port's
//! error enum.
//!
//! Multi-table deletions (users, events, friendships) run inside a single
//! transaction.
//!
//! # Example
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use social_events::outbound::persistence::{
//!     DbPool, DieselUserRepository, PoolConfig, run_pending_migrations,
//! };
//!
//! let url = "postgres://localhost/events";
//! run_pending_migrations(url).await?;
//! let pool = DbPool::new(PoolConfig::new(url)).await?;
//! let users = DieselUserRepository::new(pool);
//! # let _ = users;
//! # Ok(())
//! # }
//! ```

mod diesel_assistance_repository;
mod diesel_basic_error_mapping;
mod diesel_event_repository;
mod diesel_friendship_repository;
mod diesel_message_repository;
mod diesel_user_repository;
mod like;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_assistance_repository::DieselAssistanceRepository;
pub use diesel_event_repository::DieselEventRepository;
pub use diesel_friendship_repository::DieselFriendshipRepository;
pub use diesel_message_repository::DieselMessageRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
