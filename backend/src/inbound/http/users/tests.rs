//! Tests for the users handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{
    MockEventsQuery, MockLoginService, MockUsersCommand, MockUsersQuery,
};
use crate::domain::test_fixtures::{future_event, sample_user};
use crate::domain::{
    EventTimeline, Error, INVALID_CREDENTIALS_LOGIN_MESSAGE, INVALID_TOKEN_MESSAGE,
    INVALID_USER_MESSAGE, USER_NOT_FOUND_MESSAGE, UserId,
};
use crate::inbound::http::parsers::INVALID_USER_ID_MESSAGE;
use crate::inbound::http::test_utils::{StateBuilder, TEST_TOKEN, bearer, test_app};

fn ann() -> PublicUser {
    sample_user(1, "ann@example.com").to_public()
}

fn registration_body() -> Value {
    json!({
        "name": "Ann",
        "last_name": "Lee",
        "email": "ann@example.com",
        "password": "correct horse",
        "image_url": "https://cdn.example.com/avatar.png",
    })
}

#[actix_web::test]
async fn register_returns_the_created_public_user() {
    let mut users = MockUsersCommand::new();
    users
        .expect_register()
        .withf(|user| user.email == "ann@example.com" && user.password.as_str() == "correct horse")
        .times(1)
        .returning(|_| Ok(ann()));
    let state = StateBuilder::default().users(users).build();
    let app = actix_test::init_service(test_app(state, configure)).await;

    let request = actix_test::TestRequest::post()
        .uri("/users")
        .set_json(registration_body())
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["email"], "ann@example.com");
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[actix_web::test]
async fn register_lists_every_invalid_field() {
    let state = StateBuilder::default().build();
    let app = actix_test::init_service(test_app(state, configure)).await;

    let request = actix_test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "name": "Ann", "email": "not-an-email", "password": "short" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["error"], INVALID_USER_MESSAGE);
    let fields: Vec<&str> = body["details"]["invalid_fields"]
        .as_array()
        .expect("invalid fields")
        .iter()
        .filter_map(|failure| failure["field"].as_str())
        .collect();
    assert_eq!(fields, ["last_name", "email", "password", "image_url"]);
}

#[actix_web::test]
async fn login_returns_the_issued_token() {
    let mut login_service = MockLoginService::new();
    login_service
        .expect_login()
        .withf(|credentials| credentials.email == "ann@example.com")
        .returning(|_| {
            Ok(LoginToken {
                token: "signed".to_owned(),
                user_id: UserId::new(1),
            })
        });
    let state = StateBuilder::default().login(login_service).build();
    let app = actix_test::init_service(test_app(state, configure)).await;

    let request = actix_test::TestRequest::post()
        .uri("/users/login")
        .set_json(json!({ "email": "ann@example.com", "password": "correct horse" }))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(body, json!({ "token": "signed", "user_id": 1 }));
}

#[actix_web::test]
async fn login_failures_are_unauthorised() {
    let mut login_service = MockLoginService::new();
    login_service
        .expect_login()
        .returning(|_| Err(Error::unauthorized(INVALID_CREDENTIALS_LOGIN_MESSAGE)));
    let state = StateBuilder::default().login(login_service).build();
    let app = actix_test::init_service(test_app(state, configure)).await;

    let request = actix_test::TestRequest::post()
        .uri("/users/login")
        .set_json(json!({ "email": "ann@example.com", "password": "wrong password" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["error"], INVALID_CREDENTIALS_LOGIN_MESSAGE);
    assert_eq!(body["http_status_code"], 401);
}

#[rstest]
#[case::list("/users")]
#[case::search("/users/search?email=ann")]
#[case::single("/users/1")]
#[case::statistics("/users/1/statistics")]
#[case::events("/users/1/events")]
#[case::assistances("/users/1/assistances")]
#[actix_web::test]
async fn reads_require_a_bearer_token(#[case] uri: &str) {
    let state = StateBuilder::default().authenticated_as(1).build();
    let app = actix_test::init_service(test_app(state, configure)).await;

    let request = actix_test::TestRequest::get().uri(uri).to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["error"], INVALID_TOKEN_MESSAGE);
}

#[actix_web::test]
async fn search_is_not_mistaken_for_a_user_id() {
    let mut users_query = MockUsersQuery::new();
    users_query
        .expect_search_by_email()
        .withf(|fragment| fragment == "ann")
        .times(1)
        .returning(|_| Ok(vec![ann()]));
    let state = StateBuilder::default()
        .authenticated_as(9)
        .users_query(users_query)
        .build();
    let app = actix_test::init_service(test_app(state, configure)).await;

    let request = actix_test::TestRequest::get()
        .uri("/users/search?email=%20ann%20")
        .insert_header(bearer(TEST_TOKEN))
        .to_request();
    let body: Vec<PublicUser> = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(body, vec![ann()]);
}

#[rstest]
#[case("/users/search")]
#[case("/users/search?email=")]
#[case("/users/search?email=%20%20")]
#[actix_web::test]
async fn blank_searches_are_rejected(#[case] uri: &str) {
    let state = StateBuilder::default().authenticated_as(9).build();
    let app = actix_test::init_service(test_app(state, configure)).await;

    let request = actix_test::TestRequest::get()
        .uri(uri)
        .insert_header(bearer(TEST_TOKEN))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[case("abc")]
#[case("0")]
#[case("-4")]
#[case("1.5")]
#[actix_web::test]
async fn malformed_user_ids_are_bad_requests(#[case] raw: &str) {
    let state = StateBuilder::default().authenticated_as(9).build();
    let app = actix_test::init_service(test_app(state, configure)).await;

    let request = actix_test::TestRequest::get()
        .uri(&format!("/users/{raw}"))
        .insert_header(bearer(TEST_TOKEN))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["error"], INVALID_USER_ID_MESSAGE);
    assert_eq!(body["details"]["field"], "user_id");
}

#[actix_web::test]
async fn unknown_users_are_not_found() {
    let mut users_query = MockUsersQuery::new();
    users_query
        .expect_get()
        .withf(|id| *id == UserId::new(42))
        .returning(|_| Err(Error::not_found(USER_NOT_FOUND_MESSAGE)));
    let state = StateBuilder::default()
        .authenticated_as(9)
        .users_query(users_query)
        .build();
    let app = actix_test::init_service(test_app(state, configure)).await;

    let request = actix_test::TestRequest::get()
        .uri("/users/42")
        .insert_header(bearer(TEST_TOKEN))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["error"], USER_NOT_FOUND_MESSAGE);
}

#[actix_web::test]
async fn update_applies_the_patch_to_the_caller() {
    let mut users = MockUsersCommand::new();
    users
        .expect_update()
        .withf(|caller, patch| {
            *caller == UserId::new(1)
                && patch.name.as_deref() == Some("Annie")
                && patch.email.is_none()
                && patch.password.is_none()
        })
        .times(1)
        .returning(|_, _| {
            let mut user = ann();
            user.name = "Annie".to_owned();
            Ok(user)
        });
    let state = StateBuilder::default()
        .authenticated_as(1)
        .users(users)
        .build();
    let app = actix_test::init_service(test_app(state, configure)).await;

    let request = actix_test::TestRequest::put()
        .uri("/users")
        .insert_header(bearer(TEST_TOKEN))
        .set_json(json!({ "name": "Annie" }))
        .to_request();
    let body: PublicUser = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(body.name, "Annie");
}

#[actix_web::test]
async fn delete_acknowledges_the_removal() {
    let mut users = MockUsersCommand::new();
    users
        .expect_delete()
        .withf(|caller| *caller == UserId::new(1))
        .times(1)
        .returning(|_| Ok(()));
    let state = StateBuilder::default()
        .authenticated_as(1)
        .users(users)
        .build();
    let app = actix_test::init_service(test_app(state, configure)).await;

    let request = actix_test::TestRequest::delete()
        .uri("/users")
        .insert_header(bearer(TEST_TOKEN))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(body, json!({ "message": USER_DELETED_MESSAGE }));
}

#[actix_web::test]
async fn statistics_are_returned_for_the_requested_user() {
    let mut users_query = MockUsersQuery::new();
    users_query
        .expect_statistics()
        .withf(|id| *id == UserId::new(3))
        .returning(|id| {
            Ok(UserStatistics {
                user_id: id,
                average_score: 7.25,
                created_events: 2,
                attended_events: 5,
                friends: 1,
            })
        });
    let state = StateBuilder::default()
        .authenticated_as(1)
        .users_query(users_query)
        .build();
    let app = actix_test::init_service(test_app(state, configure)).await;

    let request = actix_test::TestRequest::get()
        .uri("/users/3/statistics")
        .insert_header(bearer(TEST_TOKEN))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;

    insta::assert_json_snapshot!(body, @r#"
    {
      "attended_events": 5,
      "average_score": 7.25,
      "created_events": 2,
      "friends": 1,
      "user_id": 3
    }
    "#);
}

#[rstest]
#[case("/users/3/events", EventTimeline::All)]
#[case("/users/3/events?timeline=future", EventTimeline::Future)]
#[case("/users/3/events?timeline=active", EventTimeline::Active)]
#[case("/users/3/events?timeline=finished", EventTimeline::Finished)]
#[actix_web::test]
async fn owned_events_forward_the_timeline(#[case] uri: &str, #[case] expected: EventTimeline) {
    let mut events_query = MockEventsQuery::new();
    events_query
        .expect_by_owner()
        .withf(move |owner, timeline| *owner == UserId::new(3) && *timeline == expected)
        .times(1)
        .returning(|_, _| Ok(vec![future_event(10, 3)]));
    let state = StateBuilder::default()
        .authenticated_as(1)
        .events_query(events_query)
        .build();
    let app = actix_test::init_service(test_app(state, configure)).await;

    let request = actix_test::TestRequest::get()
        .uri(uri)
        .insert_header(bearer(TEST_TOKEN))
        .to_request();
    let body: Vec<Event> = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(body.len(), 1);
    assert_eq!(body[0].owner_id, UserId::new(3));
}

#[actix_web::test]
async fn attended_events_carry_the_feedback_inline() {
    let mut events_query = MockEventsQuery::new();
    events_query
        .expect_attended_by()
        .withf(|user, timeline| *user == UserId::new(1) && *timeline == EventTimeline::Finished)
        .returning(|_, _| {
            Ok(vec![AttendedEvent {
                event: future_event(10, 3),
                rating: Some(9.0),
                comment: Some("Great".to_owned()),
            }])
        });
    let state = StateBuilder::default()
        .authenticated_as(1)
        .events_query(events_query)
        .build();
    let app = actix_test::init_service(test_app(state, configure)).await;

    let request = actix_test::TestRequest::get()
        .uri("/users/1/assistances?timeline=finished")
        .insert_header(bearer(TEST_TOKEN))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(body[0]["id"], 10);
    assert_eq!(body[0]["rating"], 9.0);
    assert_eq!(body[0]["comment"], "Great");
}

#[actix_web::test]
async fn unknown_timelines_are_rejected() {
    let state = StateBuilder::default().authenticated_as(1).build();
    let app = actix_test::init_service(test_app(state, configure)).await;

    let request = actix_test::TestRequest::get()
        .uri("/users/1/assistances?timeline=someday")
        .insert_header(bearer(TEST_TOKEN))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], "malformed_query");
}
