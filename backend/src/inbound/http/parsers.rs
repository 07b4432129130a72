//! Request parsing helpers shared by the HTTP handlers.
//!
//! Path identifiers, malformed bodies and malformed query strings all fail
//! with a 400 carrying the offending field and value in `details`. Entity
//! bodies themselves are validated by the domain `Raw*` conversions.

use actix_web::{HttpRequest, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::domain::{Error, EventId, UserId};

/// Body is not JSON or not shaped like an object.
pub const INVALID_BODY_MESSAGE: &str = "Data from the request body must be a valid JSON";
/// Query string could not be decoded.
pub const INVALID_QUERY_MESSAGE: &str = "Query parameters must be properly fulfilled";
/// User identifier path segment is not a positive integer.
pub const INVALID_USER_ID_MESSAGE: &str = "Invalid user ID";
/// Event identifier path segment is not a positive integer.
pub const INVALID_EVENT_ID_MESSAGE: &str = "Invalid event ID";
/// User search without a usable email fragment.
pub const INVALID_USER_SEARCH_MESSAGE: &str = "User search fields must be properly fulfilled";

/// Parsing error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParseErrorCode {
    InvalidId,
    MalformedBody,
    MalformedQuery,
    InvalidFields,
}

impl ParseErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_id",
            Self::MalformedBody => "malformed_body",
            Self::MalformedQuery => "malformed_query",
            Self::InvalidFields => "invalid_fields",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const USER_ID: FieldName = FieldName::new("user_id");
pub(crate) const EVENT_ID: FieldName = FieldName::new("event_id");

fn invalid_id_error(message: &'static str, field: FieldName, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": ParseErrorCode::InvalidId.as_str(),
    }))
}

/// Parse a user identifier path segment.
pub(crate) fn parse_user_id(raw: &str, field: FieldName) -> Result<UserId, Error> {
    UserId::parse(raw).ok_or_else(|| invalid_id_error(INVALID_USER_ID_MESSAGE, field, raw))
}

/// Parse an event identifier path segment.
pub(crate) fn parse_event_id(raw: &str) -> Result<EventId, Error> {
    EventId::parse(raw).ok_or_else(|| invalid_id_error(INVALID_EVENT_ID_MESSAGE, EVENT_ID, raw))
}

/// Query parameters of the user search.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmailSearch {
    /// Case-insensitive substring of the email address.
    pub email: Option<String>,
}

impl EmailSearch {
    /// The trimmed fragment, rejecting blank or missing values.
    pub(crate) fn into_fragment(self) -> Result<String, Error> {
        self.email
            .map(|email| email.trim().to_owned())
            .filter(|email| !email.is_empty())
            .ok_or_else(|| {
                Error::invalid_request(INVALID_USER_SEARCH_MESSAGE).with_details(json!({
                    "code": ParseErrorCode::InvalidFields.as_str(),
                    "invalid_fields": [
                        { "field": "email", "message": crate::domain::validation::INVALID_STRING_MESSAGE }
                    ],
                }))
            })
    }
}

/// JSON extractor settings: malformed bodies become the standard envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        Error::invalid_request(INVALID_BODY_MESSAGE)
            .with_details(json!({
                "code": ParseErrorCode::MalformedBody.as_str(),
                "reason": err.to_string(),
            }))
            .into()
    })
}

/// Query extractor settings: undecodable query strings become the standard
/// envelope.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req: &HttpRequest| {
        Error::invalid_request(INVALID_QUERY_MESSAGE)
            .with_details(json!({
                "code": ParseErrorCode::MalformedQuery.as_str(),
                "reason": err.to_string(),
            }))
            .into()
    })
}
