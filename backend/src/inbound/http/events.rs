//! Events API handlers.
//!
//! ```text
//! GET    /events
//! POST   /events                     full event body
//! GET    /events/search?title=rust&location=madrid
//! GET    /events/popular
//! GET    /events/{event_id}
//! PUT    /events/{event_id}          partial event body
//! DELETE /events/{event_id}
//! ```
//!
//! `/events/search` and `/events/popular` must be registered before
//! `/events/{event_id}`.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::Utc;

use crate::domain::{Event, RawEvent, RawEventSearch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerIdentity;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::parsers::parse_event_id;
use crate::inbound::http::schemas::StatusMessage;
use crate::inbound::http::state::HttpState;

/// Acknowledgement sent once an event is removed.
pub const EVENT_DELETED_MESSAGE: &str = "Event deleted";

/// Events that have not started yet.
#[utoipa::path(
    get,
    path = "/events",
    responses(
        (status = 200, description = "Upcoming events", body = [Event]),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["events"],
    operation_id = "listUpcomingEvents"
)]
#[get("/events")]
pub async fn list_events(
    _identity: BearerIdentity,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<Event>>> {
    state.events_query.upcoming().await.map(web::Json)
}

/// Create an event owned by the caller.
#[utoipa::path(
    post,
    path = "/events",
    request_body = RawEvent,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Invalid fields", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["events"],
    operation_id = "createEvent"
)]
#[post("/events")]
pub async fn create_event(
    identity: BearerIdentity,
    state: web::Data<HttpState>,
    payload: web::Json<RawEvent>,
) -> ApiResult<HttpResponse> {
    let event = payload
        .into_inner()
        .into_new_event(identity.user_id(), Utc::now(), &state.rules)?;
    let created = state.events.create(event).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Events whose title and/or location contain the given fragments.
#[utoipa::path(
    get,
    path = "/events/search",
    params(RawEventSearch),
    responses(
        (status = 200, description = "Matching events", body = [Event]),
        (status = 400, description = "No usable search criterion", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["events"],
    operation_id = "searchEvents"
)]
#[get("/events/search")]
pub async fn search_events(
    _identity: BearerIdentity,
    state: web::Data<HttpState>,
    query: web::Query<RawEventSearch>,
) -> ApiResult<web::Json<Vec<Event>>> {
    let search = query.into_inner().into_search(&state.rules)?;
    state.events_query.search(&search).await.map(web::Json)
}

/// Upcoming events ranked by how well their owners' past events were rated.
#[utoipa::path(
    get,
    path = "/events/popular",
    responses(
        (status = 200, description = "Popular events, best first", body = [Event]),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["events"],
    operation_id = "listPopularEvents"
)]
#[get("/events/popular")]
pub async fn popular_events(
    _identity: BearerIdentity,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<Event>>> {
    state.events_query.popular().await.map(web::Json)
}

/// Fetch one event.
#[utoipa::path(
    get,
    path = "/events/{event_id}",
    params(("event_id" = i32, Path, description = "Event identifier")),
    responses(
        (status = 200, description = "Event", body = Event),
        (status = 400, description = "Invalid event ID", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 404, description = "Event not found", body = ErrorEnvelope)
    ),
    tags = ["events"],
    operation_id = "getEvent"
)]
#[get("/events/{event_id}")]
pub async fn get_event(
    _identity: BearerIdentity,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Event>> {
    let id = parse_event_id(&path)?;
    state.events_query.get(id).await.map(web::Json)
}

/// Partially update an event the caller owns.
#[utoipa::path(
    put,
    path = "/events/{event_id}",
    params(("event_id" = i32, Path, description = "Event identifier")),
    request_body = RawEvent,
    responses(
        (status = 200, description = "Updated event", body = Event),
        (status = 400, description = "Invalid fields", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 403, description = "Caller does not own the event", body = ErrorEnvelope),
        (status = 404, description = "Event not found", body = ErrorEnvelope)
    ),
    tags = ["events"],
    operation_id = "updateEvent"
)]
#[put("/events/{event_id}")]
pub async fn update_event(
    identity: BearerIdentity,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<RawEvent>,
) -> ApiResult<web::Json<Event>> {
    let id = parse_event_id(&path)?;
    let patch = payload.into_inner().into_patch(&state.rules)?;
    state
        .events
        .update(identity.user_id(), id, patch)
        .await
        .map(web::Json)
}

/// Delete an event the caller owns, with its attendance.
#[utoipa::path(
    delete,
    path = "/events/{event_id}",
    params(("event_id" = i32, Path, description = "Event identifier")),
    responses(
        (status = 200, description = "Event deleted", body = StatusMessage),
        (status = 400, description = "Invalid event ID", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 403, description = "Caller does not own the event", body = ErrorEnvelope),
        (status = 404, description = "Event not found", body = ErrorEnvelope)
    ),
    tags = ["events"],
    operation_id = "deleteEvent"
)]
#[delete("/events/{event_id}")]
pub async fn delete_event(
    identity: BearerIdentity,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<StatusMessage>> {
    let id = parse_event_id(&path)?;
    state.events.delete(identity.user_id(), id).await?;
    Ok(web::Json(StatusMessage::new(EVENT_DELETED_MESSAGE)))
}

/// Register the event routes in matching order.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_events)
        .service(create_event)
        .service(search_events)
        .service(popular_events)
        .service(get_event)
        .service(update_event)
        .service(delete_event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockEventsCommand, MockEventsQuery};
    use crate::domain::test_fixtures::future_event;
    use crate::domain::{
        EVENT_NOT_FOUND_MESSAGE, EventCategory, EventFormat, EventId, INVALID_SEARCH_MESSAGE,
        NOT_EVENT_OWNER_MESSAGE, Error, UserId,
    };
    use crate::inbound::http::parsers::INVALID_EVENT_ID_MESSAGE;
    use crate::inbound::http::test_utils::{StateBuilder, TEST_TOKEN, bearer, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn event_body() -> Value {
        json!({
            "title": "Rust meetup",
            "image_url": "https://cdn.example.com/event.png",
            "format": "face-to-face",
            "location": "Madrid",
            "description": "Talks and pizza",
            "start_date": "2099-05-01T18:00:00Z",
            "end_date": "2099-05-01T21:00:00Z",
            "max_attendees": 40,
            "ticket_price": 0,
            "category": "technology",
        })
    }

    #[actix_web::test]
    async fn create_sets_the_caller_as_owner() {
        let mut events = MockEventsCommand::new();
        events
            .expect_create()
            .withf(|event| {
                event.owner_id == UserId::new(5)
                    && event.title == "Rust meetup"
                    && event.format == EventFormat::FaceToFace
                    && event.category == EventCategory::Technology
            })
            .times(1)
            .returning(|_| Ok(future_event(1, 5)));
        let state = StateBuilder::default()
            .authenticated_as(5)
            .events(events)
            .build();
        let app = actix_test::init_service(test_app(state, configure)).await;

        let request = actix_test::TestRequest::post()
            .uri("/events")
            .insert_header(bearer(TEST_TOKEN))
            .set_json(event_body())
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Event = actix_test::read_body_json(response).await;
        assert_eq!(body.owner_id, UserId::new(5));
    }

    #[actix_web::test]
    async fn create_rejects_an_end_before_the_start() {
        let state = StateBuilder::default().authenticated_as(5).build();
        let app = actix_test::init_service(test_app(state, configure)).await;
        let mut body = event_body();
        body["end_date"] = json!("2099-04-30T18:00:00Z");

        let request = actix_test::TestRequest::post()
            .uri("/events")
            .insert_header(bearer(TEST_TOKEN))
            .set_json(body)
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn upcoming_events_are_listed() {
        let mut events_query = MockEventsQuery::new();
        events_query
            .expect_upcoming()
            .returning(|| Ok(vec![future_event(1, 2), future_event(2, 3)]));
        let state = StateBuilder::default()
            .authenticated_as(5)
            .events_query(events_query)
            .build();
        let app = actix_test::init_service(test_app(state, configure)).await;

        let request = actix_test::TestRequest::get()
            .uri("/events")
            .insert_header(bearer(TEST_TOKEN))
            .to_request();
        let body: Vec<Event> = actix_test::call_and_read_body_json(&app, request).await;

        assert_eq!(body.len(), 2);
    }

    #[rstest]
    #[case("/events/search?title=rust", Some("rust"), None)]
    #[case("/events/search?location=Madrid", None, Some("Madrid"))]
    #[case("/events/search?title=rust&location=Madrid", Some("rust"), Some("Madrid"))]
    #[actix_web::test]
    async fn search_forwards_the_supplied_criteria(
        #[case] uri: &str,
        #[case] title: Option<&'static str>,
        #[case] location: Option<&'static str>,
    ) {
        let mut events_query = MockEventsQuery::new();
        events_query
            .expect_search()
            .withf(move |search| {
                search.title.as_deref() == title && search.location.as_deref() == location
            })
            .times(1)
            .returning(|_| Ok(Vec::new()));
        let state = StateBuilder::default()
            .authenticated_as(5)
            .events_query(events_query)
            .build();
        let app = actix_test::init_service(test_app(state, configure)).await;

        let request = actix_test::TestRequest::get()
            .uri(uri)
            .insert_header(bearer(TEST_TOKEN))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[rstest]
    #[case("/events/search")]
    #[case("/events/search?title=")]
    #[actix_web::test]
    async fn search_without_criteria_is_rejected(#[case] uri: &str) {
        let state = StateBuilder::default().authenticated_as(5).build();
        let app = actix_test::init_service(test_app(state, configure)).await;

        let request = actix_test::TestRequest::get()
            .uri(uri)
            .insert_header(bearer(TEST_TOKEN))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["error"], INVALID_SEARCH_MESSAGE);
    }

    #[actix_web::test]
    async fn popular_is_not_mistaken_for_an_event_id() {
        let mut events_query = MockEventsQuery::new();
        events_query
            .expect_popular()
            .times(1)
            .returning(|| Ok(vec![future_event(4, 2)]));
        let state = StateBuilder::default()
            .authenticated_as(5)
            .events_query(events_query)
            .build();
        let app = actix_test::init_service(test_app(state, configure)).await;

        let request = actix_test::TestRequest::get()
            .uri("/events/popular")
            .insert_header(bearer(TEST_TOKEN))
            .to_request();
        let body: Vec<Event> = actix_test::call_and_read_body_json(&app, request).await;

        assert_eq!(body[0].id, EventId::new(4));
    }

    #[rstest]
    #[case("x")]
    #[case("0")]
    #[actix_web::test]
    async fn malformed_event_ids_are_bad_requests(#[case] raw: &str) {
        let state = StateBuilder::default().authenticated_as(5).build();
        let app = actix_test::init_service(test_app(state, configure)).await;

        let request = actix_test::TestRequest::get()
            .uri(&format!("/events/{raw}"))
            .insert_header(bearer(TEST_TOKEN))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["error"], INVALID_EVENT_ID_MESSAGE);
    }

    #[actix_web::test]
    async fn update_passes_caller_and_patch() {
        let mut events = MockEventsCommand::new();
        events
            .expect_update()
            .withf(|caller, id, patch| {
                *caller == UserId::new(5)
                    && *id == EventId::new(9)
                    && patch.title.as_deref() == Some("Renamed")
                    && patch.location.is_none()
            })
            .times(1)
            .returning(|_, _, _| {
                let mut event = future_event(9, 5);
                event.title = "Renamed".to_owned();
                Ok(event)
            });
        let state = StateBuilder::default()
            .authenticated_as(5)
            .events(events)
            .build();
        let app = actix_test::init_service(test_app(state, configure)).await;

        let request = actix_test::TestRequest::put()
            .uri("/events/9")
            .insert_header(bearer(TEST_TOKEN))
            .set_json(json!({ "title": "Renamed" }))
            .to_request();
        let body: Event = actix_test::call_and_read_body_json(&app, request).await;

        assert_eq!(body.title, "Renamed");
    }

    #[rstest]
    #[case(Error::not_found(EVENT_NOT_FOUND_MESSAGE), StatusCode::NOT_FOUND)]
    #[case(Error::forbidden(NOT_EVENT_OWNER_MESSAGE), StatusCode::FORBIDDEN)]
    #[actix_web::test]
    async fn delete_surfaces_ownership_failures(#[case] error: Error, #[case] status: StatusCode) {
        let message = error.message().to_owned();
        let mut events = MockEventsCommand::new();
        events
            .expect_delete()
            .return_once(move |_, _| Err(error));
        let state = StateBuilder::default()
            .authenticated_as(5)
            .events(events)
            .build();
        let app = actix_test::init_service(test_app(state, configure)).await;

        let request = actix_test::TestRequest::delete()
            .uri("/events/9")
            .insert_header(bearer(TEST_TOKEN))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), status);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["error"], message);
    }

    #[actix_web::test]
    async fn delete_acknowledges_the_removal() {
        let mut events = MockEventsCommand::new();
        events
            .expect_delete()
            .withf(|caller, id| *caller == UserId::new(5) && *id == EventId::new(9))
            .times(1)
            .returning(|_, _| Ok(()));
        let state = StateBuilder::default()
            .authenticated_as(5)
            .events(events)
            .build();
        let app = actix_test::init_service(test_app(state, configure)).await;

        let request = actix_test::TestRequest::delete()
            .uri("/events/9")
            .insert_header(bearer(TEST_TOKEN))
            .to_request();
        let body: StatusMessage = actix_test::call_and_read_body_json(&app, request).await;

        assert_eq!(body, StatusMessage::new(EVENT_DELETED_MESSAGE));
    }
}
