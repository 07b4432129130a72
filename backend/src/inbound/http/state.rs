//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ValidationRules;
use crate::domain::ports::{
    AssistancesCommand, AssistancesQuery, EventsCommand, EventsQuery, FriendshipsCommand,
    FriendshipsQuery, LoginService, MessagesCommand, MessagesQuery, TokenVerifier, UsersCommand,
    UsersQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub tokens: Arc<dyn TokenVerifier>,
    pub users: Arc<dyn UsersCommand>,
    pub users_query: Arc<dyn UsersQuery>,
    pub events: Arc<dyn EventsCommand>,
    pub events_query: Arc<dyn EventsQuery>,
    pub assistances: Arc<dyn AssistancesCommand>,
    pub assistances_query: Arc<dyn AssistancesQuery>,
    pub friendships: Arc<dyn FriendshipsCommand>,
    pub friendships_query: Arc<dyn FriendshipsQuery>,
    pub messages: Arc<dyn MessagesCommand>,
    pub messages_query: Arc<dyn MessagesQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub tokens: Arc<dyn TokenVerifier>,
    pub users: Arc<dyn UsersCommand>,
    pub users_query: Arc<dyn UsersQuery>,
    pub events: Arc<dyn EventsCommand>,
    pub events_query: Arc<dyn EventsQuery>,
    pub assistances: Arc<dyn AssistancesCommand>,
    pub assistances_query: Arc<dyn AssistancesQuery>,
    pub friendships: Arc<dyn FriendshipsCommand>,
    pub friendships_query: Arc<dyn FriendshipsQuery>,
    pub messages: Arc<dyn MessagesCommand>,
    pub messages_query: Arc<dyn MessagesQuery>,
    /// Limits applied when validating request bodies.
    pub rules: ValidationRules,
}

impl HttpState {
    /// Construct state from a ports bundle and the validation limits.
    pub fn new(ports: HttpStatePorts, rules: ValidationRules) -> Self {
        let HttpStatePorts {
            login,
            tokens,
            users,
            users_query,
            events,
            events_query,
            assistances,
            assistances_query,
            friendships,
            friendships_query,
            messages,
            messages_query,
        } = ports;
        Self {
            login,
            tokens,
            users,
            users_query,
            events,
            events_query,
            assistances,
            assistances_query,
            friendships,
            friendships_query,
            messages,
            messages_query,
            rules,
        }
    }
}
