//! Wire Diesel repositories and security adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;

use social_events::domain::{
    AssistanceService, EventService, FriendshipService, MessageService, UserService,
};
use social_events::inbound::http::state::{HttpState, HttpStatePorts};
use social_events::outbound::persistence::{
    DieselAssistanceRepository, DieselEventRepository, DieselFriendshipRepository,
    DieselMessageRepository, DieselUserRepository,
};
use social_events::outbound::security::{BcryptPasswordHasher, SignedTokenCodec};

use super::ServerConfig;

/// Build the handler state shared by every worker.
///
/// Each service is constructed once; its command and query ports point at
/// the same instance.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let pool = &config.db_pool;
    let users_repo = Arc::new(DieselUserRepository::new(pool.clone()));
    let events_repo = Arc::new(DieselEventRepository::new(pool.clone()));

    let users = Arc::new(UserService::new(
        users_repo.clone(),
        Arc::new(BcryptPasswordHasher::new()),
        Arc::new(SignedTokenCodec::new(config.token_secret.as_str())),
    ));
    let events = Arc::new(EventService::new(
        events_repo.clone(),
        users_repo.clone(),
        config.rules,
    ));
    let assistances = Arc::new(AssistanceService::new(
        Arc::new(DieselAssistanceRepository::new(pool.clone())),
        events_repo,
    ));
    let friendships = Arc::new(FriendshipService::new(
        Arc::new(DieselFriendshipRepository::new(pool.clone())),
        users_repo.clone(),
    ));
    let messages = Arc::new(MessageService::new(
        Arc::new(DieselMessageRepository::new(pool.clone())),
        users_repo,
    ));

    web::Data::new(HttpState::new(
        HttpStatePorts {
            login: users.clone(),
            tokens: users.clone(),
            users: users.clone(),
            users_query: users,
            events: events.clone(),
            events_query: events,
            assistances: assistances.clone(),
            assistances_query: assistances,
            friendships: friendships.clone(),
            friendships_query: friendships,
            messages: messages.clone(),
            messages_query: messages,
        },
        config.rules,
    ))
}
