//! Users API handlers.
//!
//! ```text
//! POST   /users                      {"name":..,"last_name":..,"email":..,"password":..,"image_url":..}
//! POST   /users/login                {"email":"ann@example.com","password":"correct horse"}
//! GET    /users
//! GET    /users/search?email=ann
//! GET    /users/{user_id}
//! PUT    /users                      partial user body
//! DELETE /users
//! GET    /users/{user_id}/statistics
//! GET    /users/{user_id}/events?timeline=future
//! GET    /users/{user_id}/assistances?timeline=finished
//! ```
//!
//! `/users/search` must be registered before `/users/{user_id}`.

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::{
    AttendedEvent, Event, LoginToken, PublicUser, RawCredentials, RawUser, TimelineQuery,
    UserStatistics,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerIdentity;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::parsers::{EmailSearch, USER_ID, parse_user_id};
use crate::inbound::http::schemas::StatusMessage;
use crate::inbound::http::state::HttpState;

/// Acknowledgement sent once an account is removed.
pub const USER_DELETED_MESSAGE: &str = "User deleted";

/// Register a new user.
#[utoipa::path(
    post,
    path = "/users",
    request_body = RawUser,
    responses(
        (status = 201, description = "User registered", body = PublicUser),
        (status = 400, description = "Invalid fields or email taken", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RawUser>,
) -> ApiResult<HttpResponse> {
    let user = payload.into_inner().into_new_user(&state.rules)?;
    let created = state.users.register(user).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/users/login",
    request_body = RawCredentials,
    responses(
        (status = 200, description = "Token issued", body = LoginToken),
        (status = 400, description = "Invalid fields", body = ErrorEnvelope),
        (status = 401, description = "Invalid credentials", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/users/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<RawCredentials>,
) -> ApiResult<web::Json<LoginToken>> {
    let credentials = payload.into_inner().into_credentials(&state.rules)?;
    let token = state.login.login(&credentials).await?;
    Ok(web::Json(token))
}

/// List every registered user.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Users", body = [PublicUser]),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    _identity: BearerIdentity,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<PublicUser>>> {
    state.users_query.list().await.map(web::Json)
}

/// Find users by a fragment of their email address.
#[utoipa::path(
    get,
    path = "/users/search",
    params(EmailSearch),
    responses(
        (status = 200, description = "Matching users", body = [PublicUser]),
        (status = 400, description = "Missing or blank email", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "searchUsers"
)]
#[get("/users/search")]
pub async fn search_users(
    _identity: BearerIdentity,
    state: web::Data<HttpState>,
    query: web::Query<EmailSearch>,
) -> ApiResult<web::Json<Vec<PublicUser>>> {
    let fragment = query.into_inner().into_fragment()?;
    state
        .users_query
        .search_by_email(&fragment)
        .await
        .map(web::Json)
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/users/{user_id}",
    params(("user_id" = i32, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = PublicUser),
        (status = 400, description = "Invalid user ID", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 404, description = "User not found", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{user_id}")]
pub async fn get_user(
    _identity: BearerIdentity,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PublicUser>> {
    let id = parse_user_id(&path, USER_ID)?;
    state.users_query.get(id).await.map(web::Json)
}

/// Partially update the caller's profile.
#[utoipa::path(
    put,
    path = "/users",
    request_body = RawUser,
    responses(
        (status = 200, description = "Updated user", body = PublicUser),
        (status = 400, description = "Invalid fields or email taken", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users")]
pub async fn update_user(
    identity: BearerIdentity,
    state: web::Data<HttpState>,
    payload: web::Json<RawUser>,
) -> ApiResult<web::Json<PublicUser>> {
    let patch = payload.into_inner().into_patch(&state.rules)?;
    state
        .users
        .update(identity.user_id(), patch)
        .await
        .map(web::Json)
}

/// Delete the caller together with their events, attendance, friendships
/// and messages.
#[utoipa::path(
    delete,
    path = "/users",
    responses(
        (status = 200, description = "User deleted", body = StatusMessage),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users")]
pub async fn delete_user(
    identity: BearerIdentity,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<StatusMessage>> {
    state.users.delete(identity.user_id()).await?;
    Ok(web::Json(StatusMessage::new(USER_DELETED_MESSAGE)))
}

/// Activity figures of a user.
#[utoipa::path(
    get,
    path = "/users/{user_id}/statistics",
    params(("user_id" = i32, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Statistics", body = UserStatistics),
        (status = 400, description = "Invalid user ID", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 404, description = "User not found", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "getUserStatistics"
)]
#[get("/users/{user_id}/statistics")]
pub async fn user_statistics(
    _identity: BearerIdentity,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserStatistics>> {
    let id = parse_user_id(&path, USER_ID)?;
    state.users_query.statistics(id).await.map(web::Json)
}

/// Events created by a user.
#[utoipa::path(
    get,
    path = "/users/{user_id}/events",
    params(("user_id" = i32, Path, description = "User identifier"), TimelineQuery),
    responses(
        (status = 200, description = "Owned events", body = [Event]),
        (status = 400, description = "Invalid user ID or timeline", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 404, description = "User not found", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "listUserEvents"
)]
#[get("/users/{user_id}/events")]
pub async fn user_events(
    _identity: BearerIdentity,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<TimelineQuery>,
) -> ApiResult<web::Json<Vec<Event>>> {
    let id = parse_user_id(&path, USER_ID)?;
    state
        .events_query
        .by_owner(id, query.timeline)
        .await
        .map(web::Json)
}

/// Events a user attends, with the feedback they left.
#[utoipa::path(
    get,
    path = "/users/{user_id}/assistances",
    params(("user_id" = i32, Path, description = "User identifier"), TimelineQuery),
    responses(
        (status = 200, description = "Attended events", body = [AttendedEvent]),
        (status = 400, description = "Invalid user ID or timeline", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 404, description = "User not found", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "listUserAssistances"
)]
#[get("/users/{user_id}/assistances")]
pub async fn user_assistances(
    _identity: BearerIdentity,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<TimelineQuery>,
) -> ApiResult<web::Json<Vec<AttendedEvent>>> {
    let id = parse_user_id(&path, USER_ID)?;
    state
        .events_query
        .attended_by(id, query.timeline)
        .await
        .map(web::Json)
}

/// Register the user routes in matching order.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(list_users)
        .service(search_users)
        .service(update_user)
        .service(delete_user)
        .service(user_statistics)
        .service(user_events)
        .service(user_assistances)
        .service(get_user);
}

#[cfg(test)]
mod tests;
