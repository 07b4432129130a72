//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed entities for users, events, assistances,
//! friendships and messages, the validation that produces them from raw
//! payloads, and the services implementing the driving ports. Nothing here
//! knows about HTTP or SQL.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failures and their categories.
//! - Entity types (`User`, `Event`, `Assistance`, `Friendship`, `Message`) and
//!   their `Raw*` payloads, patches and identifiers.
//! - Services (`UserService`, `EventService`, ...) generic over the driven
//!   ports in [`ports`].

pub mod error;
pub mod ports;
pub mod rules;
pub mod trace_id;
pub mod validation;

mod assistance;
mod assistance_service;
mod event;
mod event_service;
mod friendship;
mod friendship_service;
mod message;
mod message_service;
mod user;
mod user_service;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::assistance::{
    Assistance, AssistanceCreation, AssistanceField, AssistancePatch, INVALID_ASSISTANCE_MESSAGE,
    NewAssistance, RawAssistance,
};
pub use self::assistance_service::{
    ASSISTANCE_NOT_FOUND_MESSAGE, AssistanceService, EVENT_NOT_FINISHED_MESSAGE,
    NOT_ASSISTANCE_OWNER_MESSAGE,
};
pub use self::error::{Error, ErrorCode};
pub use self::event::{
    AttendedEvent, Event, EventCategory, EventField, EventFormat, EventId, EventPatch, EventSearch,
    EventTimeline, INVALID_EVENT_MESSAGE, INVALID_SEARCH_MESSAGE, NewEvent, RawEvent,
    RawEventSearch, START_BEFORE_END_MESSAGE, SearchField, TimelineQuery,
};
pub use self::event_service::{EVENT_NOT_FOUND_MESSAGE, EventService, NOT_EVENT_OWNER_MESSAGE};
pub use self::friendship::{
    AcceptRejection, AcceptTransition, Friendship, FriendshipOutcome, FriendshipStatus,
    RequestTransition, accept_transition, request_transition,
};
pub use self::friendship_service::{
    FRIENDSHIP_NOT_FOUND_MESSAGE, FriendshipService, OWN_REQUEST_MESSAGE,
    REQUEST_NOT_FOUND_MESSAGE, SELF_ACCEPT_MESSAGE, SELF_DELETE_MESSAGE, SELF_REQUEST_MESSAGE,
};
pub use self::message::{INVALID_MESSAGE_MESSAGE, Message, MessageField, NewMessage, RawMessage};
pub use self::message_service::{
    MessageService, RECEIVER_NOT_FOUND_MESSAGE, SELF_MESSAGE_MESSAGE,
};
pub use self::rules::{RatingRange, RatingRangeError, ValidationRules};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Credentials, CredentialsField, INVALID_CREDENTIALS_MESSAGE, INVALID_USER_MESSAGE, LoginToken,
    NewUser, PublicUser, RawCredentials, RawUser, User, UserField, UserId, UserPatch,
    UserRegistration, UserStatistics,
};
pub use self::user_service::{
    EMAIL_TAKEN_MESSAGE, INVALID_CREDENTIALS_LOGIN_MESSAGE, INVALID_TOKEN_MESSAGE,
    USER_NOT_FOUND_MESSAGE, UserService,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use social_events::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
