//! Test helpers for inbound HTTP components.
//!
//! [`StateBuilder`] starts every port as a bare mock; tests install only the
//! mocks whose expectations they care about. A call on a port without
//! expectations panics, which is how tests assert "never reached".

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::{AUTHORIZATION, HeaderName};
use actix_web::{App, web};

use crate::domain::ports::{
    MockAssistancesCommand, MockAssistancesQuery, MockEventsCommand, MockEventsQuery,
    MockFriendshipsCommand, MockFriendshipsQuery, MockLoginService, MockMessagesCommand,
    MockMessagesQuery, MockTokenVerifier, MockUsersCommand, MockUsersQuery,
};
use crate::domain::{Error, INVALID_TOKEN_MESSAGE, UserId, ValidationRules};
use crate::inbound::http::parsers::{json_config, query_config};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Token accepted by [`StateBuilder::authenticated_as`].
pub const TEST_TOKEN: &str = "test-token";

/// Build an `Authorization: Bearer <token>` header pair.
pub fn bearer(token: &str) -> (HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

/// Mock-backed [`HttpState`] builder.
#[derive(Default)]
pub struct StateBuilder {
    login: MockLoginService,
    tokens: MockTokenVerifier,
    users: MockUsersCommand,
    users_query: MockUsersQuery,
    events: MockEventsCommand,
    events_query: MockEventsQuery,
    assistances: MockAssistancesCommand,
    assistances_query: MockAssistancesQuery,
    friendships: MockFriendshipsCommand,
    friendships_query: MockFriendshipsQuery,
    messages: MockMessagesCommand,
    messages_query: MockMessagesQuery,
}

macro_rules! port_setters {
    ($($field:ident: $mock:ty),* $(,)?) => {
        $(
            #[doc = concat!("Replace the `", stringify!($field), "` port.")]
            pub fn $field(mut self, mock: $mock) -> Self {
                self.$field = mock;
                self
            }
        )*
    };
}

impl StateBuilder {
    port_setters! {
        login: MockLoginService,
        tokens: MockTokenVerifier,
        users: MockUsersCommand,
        users_query: MockUsersQuery,
        events: MockEventsCommand,
        events_query: MockEventsQuery,
        assistances: MockAssistancesCommand,
        assistances_query: MockAssistancesQuery,
        friendships: MockFriendshipsCommand,
        friendships_query: MockFriendshipsQuery,
        messages: MockMessagesCommand,
        messages_query: MockMessagesQuery,
    }

    /// Accept [`TEST_TOKEN`] as `user`; any other token is rejected.
    pub fn authenticated_as(self, user: i32) -> Self {
        let mut tokens = MockTokenVerifier::new();
        tokens.expect_verify().returning(move |token| {
            if token == TEST_TOKEN {
                Ok(UserId::new(user))
            } else {
                Err(Error::unauthorized(INVALID_TOKEN_MESSAGE))
            }
        });
        self.tokens(tokens)
    }

    /// Finish the state with default validation rules.
    pub fn build(self) -> web::Data<HttpState> {
        let ports = HttpStatePorts {
            login: Arc::new(self.login),
            tokens: Arc::new(self.tokens),
            users: Arc::new(self.users),
            users_query: Arc::new(self.users_query),
            events: Arc::new(self.events),
            events_query: Arc::new(self.events_query),
            assistances: Arc::new(self.assistances),
            assistances_query: Arc::new(self.assistances_query),
            friendships: Arc::new(self.friendships),
            friendships_query: Arc::new(self.friendships_query),
            messages: Arc::new(self.messages),
            messages_query: Arc::new(self.messages_query),
        };
        web::Data::new(HttpState::new(ports, ValidationRules::default()))
    }
}

/// App wired with `state`, the extractor configs used in production and the
/// routes registered by `routes`.
pub fn test_app(
    state: web::Data<HttpState>,
    routes: impl FnOnce(&mut web::ServiceConfig),
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .app_data(json_config())
        .app_data(query_config())
        .configure(routes)
}
