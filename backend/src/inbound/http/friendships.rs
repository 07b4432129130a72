//! Friendship API handlers.
//!
//! ```text
//! GET    /friendships
//! GET    /friendships/requests
//! POST   /friendships/{user_id}
//! PUT    /friendships/{user_id}
//! DELETE /friendships/{user_id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::{FriendshipOutcome, PublicUser};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerIdentity;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::parsers::{FieldName, parse_user_id};
use crate::inbound::http::schemas::StatusMessage;
use crate::inbound::http::state::HttpState;

const FRIEND_ID: FieldName = FieldName::new("friend_user_id");

fn outcome_response(outcome: FriendshipOutcome) -> HttpResponse {
    let mut response = match outcome {
        FriendshipOutcome::RequestSent => HttpResponse::Created(),
        FriendshipOutcome::RequestAlreadySent
        | FriendshipOutcome::RequestAccepted
        | FriendshipOutcome::AlreadyFriends
        | FriendshipOutcome::Deleted => HttpResponse::Ok(),
    };
    response.json(StatusMessage::new(outcome.message()))
}

/// Users the caller is friends with.
#[utoipa::path(
    get,
    path = "/friendships",
    responses(
        (status = 200, description = "Friends", body = [PublicUser]),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["friendships"],
    operation_id = "listFriends"
)]
#[get("/friendships")]
pub async fn list_friends(
    identity: BearerIdentity,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<PublicUser>>> {
    state
        .friendships_query
        .friends(identity.user_id())
        .await
        .map(web::Json)
}

/// Users waiting for the caller to accept their request.
#[utoipa::path(
    get,
    path = "/friendships/requests",
    responses(
        (status = 200, description = "Pending requesters", body = [PublicUser]),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["friendships"],
    operation_id = "listFriendRequests"
)]
#[get("/friendships/requests")]
pub async fn list_requests(
    identity: BearerIdentity,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<PublicUser>>> {
    state
        .friendships_query
        .pending_requests(identity.user_id())
        .await
        .map(web::Json)
}

/// Send a friend request, or accept the one the target already sent.
#[utoipa::path(
    post,
    path = "/friendships/{user_id}",
    params(("user_id" = i32, Path, description = "Target user")),
    responses(
        (status = 201, description = "Friend request sent", body = StatusMessage),
        (status = 200, description = "Already sent, accepted or already friends", body = StatusMessage),
        (status = 400, description = "Invalid user ID or self request", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 404, description = "Target user not found", body = ErrorEnvelope)
    ),
    tags = ["friendships"],
    operation_id = "requestFriendship"
)]
#[post("/friendships/{user_id}")]
pub async fn request_friendship(
    identity: BearerIdentity,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let target = parse_user_id(&path, FRIEND_ID)?;
    let outcome = state
        .friendships
        .request(identity.user_id(), target)
        .await?;
    Ok(outcome_response(outcome))
}

/// Accept the request the given user sent to the caller.
#[utoipa::path(
    put,
    path = "/friendships/{user_id}",
    params(("user_id" = i32, Path, description = "Requesting user")),
    responses(
        (status = 200, description = "Accepted or already friends", body = StatusMessage),
        (status = 400, description = "Invalid user ID, self or own request", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 404, description = "No pending request", body = ErrorEnvelope)
    ),
    tags = ["friendships"],
    operation_id = "acceptFriendship"
)]
#[put("/friendships/{user_id}")]
pub async fn accept_friendship(
    identity: BearerIdentity,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let requester = parse_user_id(&path, FRIEND_ID)?;
    let outcome = state
        .friendships
        .accept(identity.user_id(), requester)
        .await?;
    Ok(outcome_response(outcome))
}

/// Remove a friendship or pending request, and the pair's chat.
#[utoipa::path(
    delete,
    path = "/friendships/{user_id}",
    params(("user_id" = i32, Path, description = "Other user")),
    responses(
        (status = 200, description = "Friendship deleted", body = StatusMessage),
        (status = 400, description = "Invalid user ID or self", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 404, description = "Friendship not found", body = ErrorEnvelope)
    ),
    tags = ["friendships"],
    operation_id = "deleteFriendship"
)]
#[delete("/friendships/{user_id}")]
pub async fn delete_friendship(
    identity: BearerIdentity,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let other = parse_user_id(&path, FRIEND_ID)?;
    let outcome = state
        .friendships
        .delete(identity.user_id(), other)
        .await?;
    Ok(outcome_response(outcome))
}

/// Register the friendship routes in matching order.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_friends)
        .service(list_requests)
        .service(request_friendship)
        .service(accept_friendship)
        .service(delete_friendship);
}
