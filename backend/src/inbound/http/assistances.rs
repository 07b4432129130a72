//! Attendance API handlers.
//!
//! ```text
//! GET    /events/{event_id}/assistances
//! POST   /events/{event_id}/assistances            {"format":"online"}
//! PUT    /events/{event_id}/assistances            {"rating":8,"comment":"Great talks"}
//! DELETE /events/{event_id}/assistances
//! GET    /events/{event_id}/assistances/{user_id}
//! DELETE /events/{event_id}/assistances/{user_id}
//! GET    /assistances/{user_id}/{event_id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::{Assistance, AssistanceCreation, EventId, RawAssistance, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerIdentity;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::parsers::{USER_ID, parse_event_id, parse_user_id};
use crate::inbound::http::schemas::StatusMessage;
use crate::inbound::http::state::HttpState;

/// Acknowledgement sent once an attendance is removed.
pub const ASSISTANCE_DELETED_MESSAGE: &str = "Assistance deleted";

fn parse_pair(event: &str, user: &str) -> ApiResult<(EventId, UserId)> {
    Ok((parse_event_id(event)?, parse_user_id(user, USER_ID)?))
}

/// Every attendance at an event.
#[utoipa::path(
    get,
    path = "/events/{event_id}/assistances",
    params(("event_id" = i32, Path, description = "Event identifier")),
    responses(
        (status = 200, description = "Attendance", body = [Assistance]),
        (status = 400, description = "Invalid event ID", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 404, description = "Event not found", body = ErrorEnvelope)
    ),
    tags = ["assistances"],
    operation_id = "listEventAssistances"
)]
#[get("/events/{event_id}/assistances")]
pub async fn list_assistances(
    _identity: BearerIdentity,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Assistance>>> {
    let event = parse_event_id(&path)?;
    state.assistances_query.for_event(event).await.map(web::Json)
}

/// Register the caller's attendance. Repeating the call is harmless.
#[utoipa::path(
    post,
    path = "/events/{event_id}/assistances",
    params(("event_id" = i32, Path, description = "Event identifier")),
    request_body = RawAssistance,
    responses(
        (status = 201, description = "Attendance registered", body = StatusMessage),
        (status = 200, description = "Already registered", body = StatusMessage),
        (status = 400, description = "Invalid fields", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 404, description = "Event not found", body = ErrorEnvelope)
    ),
    tags = ["assistances"],
    operation_id = "createAssistance"
)]
#[post("/events/{event_id}/assistances")]
pub async fn create_assistance(
    identity: BearerIdentity,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<RawAssistance>,
) -> ApiResult<HttpResponse> {
    let event = parse_event_id(&path)?;
    let assistance = payload
        .into_inner()
        .into_new_assistance(identity.user_id(), event, &state.rules)?;
    let outcome = state.assistances.create(assistance).await?;
    let mut response = match outcome {
        AssistanceCreation::Created(_) => HttpResponse::Created(),
        AssistanceCreation::AlreadyExists(_) => HttpResponse::Ok(),
    };
    Ok(response.json(StatusMessage::new(outcome.message())))
}

/// Rate or comment on a finished event the caller attended.
#[utoipa::path(
    put,
    path = "/events/{event_id}/assistances",
    params(("event_id" = i32, Path, description = "Event identifier")),
    request_body = RawAssistance,
    responses(
        (status = 200, description = "Updated attendance", body = Assistance),
        (status = 400, description = "Invalid fields", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 403, description = "Event has not finished yet", body = ErrorEnvelope),
        (status = 404, description = "Event or attendance not found", body = ErrorEnvelope)
    ),
    tags = ["assistances"],
    operation_id = "updateAssistance"
)]
#[put("/events/{event_id}/assistances")]
pub async fn update_assistance(
    identity: BearerIdentity,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<RawAssistance>,
) -> ApiResult<web::Json<Assistance>> {
    let event = parse_event_id(&path)?;
    let patch = payload.into_inner().into_patch(&state.rules)?;
    state
        .assistances
        .update(identity.user_id(), event, patch)
        .await
        .map(web::Json)
}

/// Withdraw the caller's attendance.
#[utoipa::path(
    delete,
    path = "/events/{event_id}/assistances",
    params(("event_id" = i32, Path, description = "Event identifier")),
    responses(
        (status = 200, description = "Attendance removed", body = StatusMessage),
        (status = 400, description = "Invalid event ID", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 404, description = "Event or attendance not found", body = ErrorEnvelope)
    ),
    tags = ["assistances"],
    operation_id = "deleteOwnAssistance"
)]
#[delete("/events/{event_id}/assistances")]
pub async fn delete_own_assistance(
    identity: BearerIdentity,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<StatusMessage>> {
    let event = parse_event_id(&path)?;
    let caller = identity.user_id();
    state.assistances.delete(caller, event, caller).await?;
    Ok(web::Json(StatusMessage::new(ASSISTANCE_DELETED_MESSAGE)))
}

/// One user's attendance at an event.
#[utoipa::path(
    get,
    path = "/events/{event_id}/assistances/{user_id}",
    params(
        ("event_id" = i32, Path, description = "Event identifier"),
        ("user_id" = i32, Path, description = "Attendee identifier")
    ),
    responses(
        (status = 200, description = "Attendance", body = Assistance),
        (status = 400, description = "Invalid identifier", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 404, description = "Attendance not found", body = ErrorEnvelope)
    ),
    tags = ["assistances"],
    operation_id = "getEventAssistance"
)]
#[get("/events/{event_id}/assistances/{user_id}")]
pub async fn get_event_assistance(
    _identity: BearerIdentity,
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<Assistance>> {
    let (event, user) = path.into_inner();
    let (event, user) = parse_pair(&event, &user)?;
    state.assistances_query.get(user, event).await.map(web::Json)
}

/// Remove an attendee from an event. Allowed for the attendee and for the
/// event owner.
#[utoipa::path(
    delete,
    path = "/events/{event_id}/assistances/{user_id}",
    params(
        ("event_id" = i32, Path, description = "Event identifier"),
        ("user_id" = i32, Path, description = "Attendee identifier")
    ),
    responses(
        (status = 200, description = "Attendance removed", body = StatusMessage),
        (status = 400, description = "Invalid identifier", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 403, description = "Caller may not remove this attendance", body = ErrorEnvelope),
        (status = 404, description = "Event or attendance not found", body = ErrorEnvelope)
    ),
    tags = ["assistances"],
    operation_id = "deleteEventAssistance"
)]
#[delete("/events/{event_id}/assistances/{user_id}")]
pub async fn delete_event_assistance(
    identity: BearerIdentity,
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<StatusMessage>> {
    let (event, user) = path.into_inner();
    let (event, attendee) = parse_pair(&event, &user)?;
    state
        .assistances
        .delete(identity.user_id(), event, attendee)
        .await?;
    Ok(web::Json(StatusMessage::new(ASSISTANCE_DELETED_MESSAGE)))
}

/// One user's attendance at an event, addressed user first.
#[utoipa::path(
    get,
    path = "/assistances/{user_id}/{event_id}",
    params(
        ("user_id" = i32, Path, description = "Attendee identifier"),
        ("event_id" = i32, Path, description = "Event identifier")
    ),
    responses(
        (status = 200, description = "Attendance", body = Assistance),
        (status = 400, description = "Invalid identifier", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 404, description = "Attendance not found", body = ErrorEnvelope)
    ),
    tags = ["assistances"],
    operation_id = "getAssistance"
)]
#[get("/assistances/{user_id}/{event_id}")]
pub async fn get_assistance(
    _identity: BearerIdentity,
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<Assistance>> {
    let (user, event) = path.into_inner();
    let (event, user) = parse_pair(&event, &user)?;
    state.assistances_query.get(user, event).await.map(web::Json)
}

/// Register the attendance routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_assistances)
        .service(create_assistance)
        .service(update_assistance)
        .service(delete_own_assistance)
        .service(get_event_assistance)
        .service(delete_event_assistance)
        .service(get_assistance);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockAssistancesCommand, MockAssistancesQuery};
    use crate::domain::test_fixtures::sample_assistance;
    use crate::domain::{
        ASSISTANCE_NOT_FOUND_MESSAGE, EVENT_NOT_FINISHED_MESSAGE, EventFormat, Error,
        INVALID_ASSISTANCE_MESSAGE, NOT_ASSISTANCE_OWNER_MESSAGE,
    };
    use crate::inbound::http::parsers::{INVALID_EVENT_ID_MESSAGE, INVALID_USER_ID_MESSAGE};
    use crate::inbound::http::test_utils::{StateBuilder, TEST_TOKEN, bearer, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case(
        AssistanceCreation::Created(sample_assistance(3, 7)),
        StatusCode::CREATED,
        "Assistance created"
    )]
    #[case(
        AssistanceCreation::AlreadyExists(sample_assistance(3, 7)),
        StatusCode::OK,
        "Assistance already exists"
    )]
    #[actix_web::test]
    async fn create_reports_whether_a_row_was_added(
        #[case] outcome: AssistanceCreation,
        #[case] status: StatusCode,
        #[case] message: &str,
    ) {
        let mut assistances = MockAssistancesCommand::new();
        assistances
            .expect_create()
            .withf(|new| {
                new.user_id == UserId::new(3)
                    && new.event_id == EventId::new(7)
                    && new.format == EventFormat::Online
            })
            .times(1)
            .return_once(move |_| Ok(outcome));
        let state = StateBuilder::default()
            .authenticated_as(3)
            .assistances(assistances)
            .build();
        let app = actix_test::init_service(test_app(state, configure)).await;

        let request = actix_test::TestRequest::post()
            .uri("/events/7/assistances")
            .insert_header(bearer(TEST_TOKEN))
            .set_json(json!({ "format": "online" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), status);
        let body: StatusMessage = actix_test::read_body_json(response).await;
        assert_eq!(body.message, message);
    }

    #[actix_web::test]
    async fn create_requires_a_known_format() {
        let state = StateBuilder::default().authenticated_as(3).build();
        let app = actix_test::init_service(test_app(state, configure)).await;

        let request = actix_test::TestRequest::post()
            .uri("/events/7/assistances")
            .insert_header(bearer(TEST_TOKEN))
            .set_json(json!({ "format": "hybrid" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["error"], INVALID_ASSISTANCE_MESSAGE);
        assert_eq!(body["details"]["invalid_fields"][0]["field"], "format");
    }

    #[actix_web::test]
    async fn update_returns_the_merged_row() {
        let mut assistances = MockAssistancesCommand::new();
        assistances
            .expect_update()
            .withf(|caller, event, patch| {
                *caller == UserId::new(3)
                    && *event == EventId::new(7)
                    && patch.rating == Some(8.0)
                    && patch.comment.is_none()
            })
            .times(1)
            .returning(|_, _, _| {
                let mut assistance = sample_assistance(3, 7);
                assistance.rating = Some(8.0);
                Ok(assistance)
            });
        let state = StateBuilder::default()
            .authenticated_as(3)
            .assistances(assistances)
            .build();
        let app = actix_test::init_service(test_app(state, configure)).await;

        let request = actix_test::TestRequest::put()
            .uri("/events/7/assistances")
            .insert_header(bearer(TEST_TOKEN))
            .set_json(json!({ "rating": 8 }))
            .to_request();
        let body: Assistance = actix_test::call_and_read_body_json(&app, request).await;

        assert_eq!(body.rating, Some(8.0));
    }

    #[rstest]
    #[case(Error::forbidden(EVENT_NOT_FINISHED_MESSAGE), StatusCode::FORBIDDEN)]
    #[case(Error::not_found(ASSISTANCE_NOT_FOUND_MESSAGE), StatusCode::NOT_FOUND)]
    #[actix_web::test]
    async fn update_surfaces_domain_refusals(#[case] error: Error, #[case] status: StatusCode) {
        let mut assistances = MockAssistancesCommand::new();
        assistances
            .expect_update()
            .return_once(move |_, _, _| Err(error));
        let state = StateBuilder::default()
            .authenticated_as(3)
            .assistances(assistances)
            .build();
        let app = actix_test::init_service(test_app(state, configure)).await;

        let request = actix_test::TestRequest::put()
            .uri("/events/7/assistances")
            .insert_header(bearer(TEST_TOKEN))
            .set_json(json!({ "comment": "Loved it" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), status);
    }

    #[actix_web::test]
    async fn own_attendance_is_deleted_for_the_caller() {
        let mut assistances = MockAssistancesCommand::new();
        assistances
            .expect_delete()
            .withf(|caller, event, attendee| {
                *caller == UserId::new(3) && *event == EventId::new(7) && *attendee == UserId::new(3)
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        let state = StateBuilder::default()
            .authenticated_as(3)
            .assistances(assistances)
            .build();
        let app = actix_test::init_service(test_app(state, configure)).await;

        let request = actix_test::TestRequest::delete()
            .uri("/events/7/assistances")
            .insert_header(bearer(TEST_TOKEN))
            .to_request();
        let body: StatusMessage = actix_test::call_and_read_body_json(&app, request).await;

        assert_eq!(body, StatusMessage::new(ASSISTANCE_DELETED_MESSAGE));
    }

    #[actix_web::test]
    async fn owners_remove_other_attendees() {
        let mut assistances = MockAssistancesCommand::new();
        assistances
            .expect_delete()
            .withf(|caller, event, attendee| {
                *caller == UserId::new(1) && *event == EventId::new(7) && *attendee == UserId::new(3)
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        let state = StateBuilder::default()
            .authenticated_as(1)
            .assistances(assistances)
            .build();
        let app = actix_test::init_service(test_app(state, configure)).await;

        let request = actix_test::TestRequest::delete()
            .uri("/events/7/assistances/3")
            .insert_header(bearer(TEST_TOKEN))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn strangers_cannot_remove_attendees() {
        let mut assistances = MockAssistancesCommand::new();
        assistances
            .expect_delete()
            .returning(|_, _, _| Err(Error::forbidden(NOT_ASSISTANCE_OWNER_MESSAGE)));
        let state = StateBuilder::default()
            .authenticated_as(2)
            .assistances(assistances)
            .build();
        let app = actix_test::init_service(test_app(state, configure)).await;

        let request = actix_test::TestRequest::delete()
            .uri("/events/7/assistances/3")
            .insert_header(bearer(TEST_TOKEN))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[rstest]
    #[case("/events/7/assistances/3")]
    #[case("/assistances/3/7")]
    #[actix_web::test]
    async fn both_addressing_schemes_resolve_the_same_row(#[case] uri: &str) {
        let mut assistances_query = MockAssistancesQuery::new();
        assistances_query
            .expect_get()
            .withf(|user, event| *user == UserId::new(3) && *event == EventId::new(7))
            .times(1)
            .returning(|user, event| Ok(sample_assistance(user.get(), event.get())));
        let state = StateBuilder::default()
            .authenticated_as(1)
            .assistances_query(assistances_query)
            .build();
        let app = actix_test::init_service(test_app(state, configure)).await;

        let request = actix_test::TestRequest::get()
            .uri(uri)
            .insert_header(bearer(TEST_TOKEN))
            .to_request();
        let body: Assistance = actix_test::call_and_read_body_json(&app, request).await;

        assert_eq!(body, sample_assistance(3, 7));
    }

    #[rstest]
    #[case("/events/x/assistances/3", INVALID_EVENT_ID_MESSAGE)]
    #[case("/events/7/assistances/x", INVALID_USER_ID_MESSAGE)]
    #[case("/assistances/x/7", INVALID_USER_ID_MESSAGE)]
    #[case("/assistances/3/0", INVALID_EVENT_ID_MESSAGE)]
    #[actix_web::test]
    async fn malformed_identifiers_are_bad_requests(#[case] uri: &str, #[case] message: &str) {
        let state = StateBuilder::default().authenticated_as(1).build();
        let app = actix_test::init_service(test_app(state, configure)).await;

        let request = actix_test::TestRequest::get()
            .uri(uri)
            .insert_header(bearer(TEST_TOKEN))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["error"], message);
    }

    #[actix_web::test]
    async fn event_attendance_is_listed() {
        let mut assistances_query = MockAssistancesQuery::new();
        assistances_query
            .expect_for_event()
            .withf(|event| *event == EventId::new(7))
            .returning(|_| Ok(vec![sample_assistance(3, 7), sample_assistance(4, 7)]));
        let state = StateBuilder::default()
            .authenticated_as(1)
            .assistances_query(assistances_query)
            .build();
        let app = actix_test::init_service(test_app(state, configure)).await;

        let request = actix_test::TestRequest::get()
            .uri("/events/7/assistances")
            .insert_header(bearer(TEST_TOKEN))
            .to_request();
        let body: Vec<Assistance> = actix_test::call_and_read_body_json(&app, request).await;

        assert_eq!(body.len(), 2);
    }
}
