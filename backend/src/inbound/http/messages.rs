//! Direct message API handlers.
//!
//! ```text
//! POST /messages                {"receiver_user_id":2,"content":"See you there!"}
//! GET  /messages
//! GET  /messages/{user_id}
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::Utc;

use crate::domain::{Message, PublicUser, RawMessage};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerIdentity;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::parsers::{USER_ID, parse_user_id};
use crate::inbound::http::state::HttpState;

/// Send a message from the caller.
#[utoipa::path(
    post,
    path = "/messages",
    request_body = RawMessage,
    responses(
        (status = 201, description = "Message stored", body = Message),
        (status = 400, description = "Invalid fields or message to self", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 404, description = "Receiver not found", body = ErrorEnvelope)
    ),
    tags = ["messages"],
    operation_id = "sendMessage"
)]
#[post("/messages")]
pub async fn send_message(
    identity: BearerIdentity,
    state: web::Data<HttpState>,
    payload: web::Json<RawMessage>,
) -> ApiResult<HttpResponse> {
    let message = payload
        .into_inner()
        .into_new_message(identity.user_id(), Utc::now(), &state.rules)?;
    let stored = state.messages.send(message).await?;
    Ok(HttpResponse::Created().json(stored))
}

/// Users the caller has exchanged messages with.
#[utoipa::path(
    get,
    path = "/messages",
    responses(
        (status = 200, description = "Contacts", body = [PublicUser]),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["messages"],
    operation_id = "listContacts"
)]
#[get("/messages")]
pub async fn list_contacts(
    identity: BearerIdentity,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<PublicUser>>> {
    state
        .messages_query
        .contacts(identity.user_id())
        .await
        .map(web::Json)
}

/// Conversation between the caller and another user, oldest first.
#[utoipa::path(
    get,
    path = "/messages/{user_id}",
    params(("user_id" = i32, Path, description = "Other participant")),
    responses(
        (status = 200, description = "Chat", body = [Message]),
        (status = 400, description = "Invalid user ID", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 404, description = "User not found", body = ErrorEnvelope)
    ),
    tags = ["messages"],
    operation_id = "getChat"
)]
#[get("/messages/{user_id}")]
pub async fn get_chat(
    identity: BearerIdentity,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Message>>> {
    let other = parse_user_id(&path, USER_ID)?;
    state
        .messages_query
        .chat(identity.user_id(), other)
        .await
        .map(web::Json)
}

/// Register the message routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(send_message)
        .service(list_contacts)
        .service(get_chat);
}
