//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST handler of the inbound layer, the domain
//! payloads they exchange and the bearer token security scheme. Swagger UI
//! serves it in debug builds.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    Assistance, AttendedEvent, ErrorCode, Event, EventCategory, EventFormat, EventTimeline,
    FriendshipStatus, LoginToken, Message, PublicUser, RawAssistance, RawCredentials, RawEvent,
    RawMessage, RawUser, UserStatistics,
};
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::schemas::StatusMessage;

/// Name of the bearer token scheme referenced by protected operations.
pub const BEARER_SCHEME: &str = "BearerToken";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let mut scheme = Http::new(HttpAuthScheme::Bearer);
        scheme.description = Some("Token issued by POST /users/login.".to_owned());
        components.add_security_scheme(BEARER_SCHEME, SecurityScheme::Http(scheme));
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Social events API",
        description = "Users, events, assistances, friendships and direct messages."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::search_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::users::user_statistics,
        crate::inbound::http::users::user_events,
        crate::inbound::http::users::user_assistances,
        crate::inbound::http::events::list_events,
        crate::inbound::http::events::create_event,
        crate::inbound::http::events::search_events,
        crate::inbound::http::events::popular_events,
        crate::inbound::http::events::get_event,
        crate::inbound::http::events::update_event,
        crate::inbound::http::events::delete_event,
        crate::inbound::http::assistances::list_assistances,
        crate::inbound::http::assistances::create_assistance,
        crate::inbound::http::assistances::update_assistance,
        crate::inbound::http::assistances::delete_own_assistance,
        crate::inbound::http::assistances::get_event_assistance,
        crate::inbound::http::assistances::delete_event_assistance,
        crate::inbound::http::assistances::get_assistance,
        crate::inbound::http::friendships::list_friends,
        crate::inbound::http::friendships::list_requests,
        crate::inbound::http::friendships::request_friendship,
        crate::inbound::http::friendships::accept_friendship,
        crate::inbound::http::friendships::delete_friendship,
        crate::inbound::http::messages::send_message,
        crate::inbound::http::messages::list_contacts,
        crate::inbound::http::messages::get_chat,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        PublicUser,
        LoginToken,
        UserStatistics,
        RawUser,
        RawCredentials,
        Event,
        AttendedEvent,
        RawEvent,
        EventFormat,
        EventCategory,
        EventTimeline,
        Assistance,
        RawAssistance,
        FriendshipStatus,
        Message,
        RawMessage,
        StatusMessage,
        ErrorEnvelope,
        ErrorCode,
    )),
    tags(
        (name = "users", description = "Registration, login and profiles"),
        (name = "events", description = "Event lifecycle and discovery"),
        (name = "assistances", description = "Attendance and feedback"),
        (name = "friendships", description = "Friend requests"),
        (name = "messages", description = "Direct messages"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the registered paths and schema field structure.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("PublicUser", "email")]
    #[case("Event", "start_date")]
    #[case("Assistance", "rating")]
    #[case("Message", "receiver_user_id")]
    #[case("ErrorEnvelope", "http_status_code")]
    fn schemas_expose_their_fields(#[case] name: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get(name).expect("schema registered");

        assert_object_schema_has_field(schema, field);
    }

    #[test]
    fn public_user_schema_omits_the_password() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get("PublicUser").expect("schema registered");

        match schema {
            RefOr::T(Schema::Object(obj)) => assert!(!obj.properties.contains_key("password")),
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/users")]
    #[case("/users/login")]
    #[case("/users/search")]
    #[case("/events/{event_id}/assistances/{user_id}")]
    #[case("/friendships/requests")]
    #[case("/messages/{user_id}")]
    #[case("/health/ready")]
    fn paths_are_registered(#[case] path: &str) {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn bearer_scheme_is_declared() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");

        assert!(components.security_schemes.contains_key(BEARER_SCHEME));
    }
}
