//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`], [`TokenCodec`]) are
//! implemented by outbound adapters. Driving ports (`*Command`, `*Query`,
//! [`LoginService`], [`TokenVerifier`]) are implemented by domain services
//! and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod assistance_repository;
mod assistances_command;
mod assistances_query;
mod event_repository;
mod events_command;
mod events_query;
mod friendship_repository;
mod friendships_command;
mod friendships_query;
mod login_service;
mod message_repository;
mod messages_command;
mod messages_query;
mod password_hasher;
mod token_codec;
mod user_repository;
mod users_command;
mod users_query;

#[cfg(test)]
pub use assistance_repository::MockAssistanceRepository;
pub use assistance_repository::{AssistancePersistenceError, AssistanceRepository};
#[cfg(test)]
pub use assistances_command::MockAssistancesCommand;
pub use assistances_command::AssistancesCommand;
#[cfg(test)]
pub use assistances_query::MockAssistancesQuery;
pub use assistances_query::AssistancesQuery;
#[cfg(test)]
pub use event_repository::MockEventRepository;
pub use event_repository::{EventPersistenceError, EventRepository};
#[cfg(test)]
pub use events_command::MockEventsCommand;
pub use events_command::EventsCommand;
#[cfg(test)]
pub use events_query::MockEventsQuery;
pub use events_query::EventsQuery;
#[cfg(test)]
pub use friendship_repository::MockFriendshipRepository;
pub use friendship_repository::{FriendshipPersistenceError, FriendshipRepository};
#[cfg(test)]
pub use friendships_command::MockFriendshipsCommand;
pub use friendships_command::FriendshipsCommand;
#[cfg(test)]
pub use friendships_query::MockFriendshipsQuery;
pub use friendships_query::FriendshipsQuery;
#[cfg(test)]
pub use login_service::{MockLoginService, MockTokenVerifier};
pub use login_service::{LoginService, TokenVerifier};
#[cfg(test)]
pub use message_repository::MockMessageRepository;
pub use message_repository::{MessagePersistenceError, MessageRepository};
#[cfg(test)]
pub use messages_command::MockMessagesCommand;
pub use messages_command::MessagesCommand;
#[cfg(test)]
pub use messages_query::MockMessagesQuery;
pub use messages_query::MessagesQuery;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use token_codec::MockTokenCodec;
pub use token_codec::{TokenCodec, TokenError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::UsersCommand;
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
