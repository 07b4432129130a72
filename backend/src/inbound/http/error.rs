//! HTTP adapter mapping for domain errors.
//!
//! Every failure leaves the service as the same JSON envelope:
//!
//! ```text
//! { "error": "...", "http_status_code": 404, "code": "not_found",
//!   "trace_id": "...", "details": {...}, "stacktrace": {...} }
//! ```
//!
//! `details` carries client-facing context such as per-field validation
//! failures. `stacktrace` carries the sanitised store diagnostic and is only
//! emitted for server faults.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Wire representation of a failed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    /// Human-readable message.
    #[schema(example = "Event does not exist or was not found")]
    pub error: String,
    /// HTTP status repeated in the body.
    #[schema(example = 404)]
    pub http_status_code: u16,
    /// Stable machine-readable category.
    pub code: ErrorCode,
    /// Correlation identifier, also sent as the `trace-id` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    /// Client-facing context, e.g. `invalid_fields`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
    /// Server-side diagnostic; present for 5xx responses only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub stacktrace: Option<Value>,
}

impl ErrorEnvelope {
    /// Build the envelope for `error` answered with `status`.
    pub fn new(error: &Error, status: StatusCode) -> Self {
        let stacktrace = if status.is_server_error() {
            error.diagnostic().cloned()
        } else {
            None
        };
        Self {
            error: error.message().to_owned(),
            http_status_code: status.as_u16(),
            code: error.code(),
            trace_id: error.trace_id().map(str::to_owned),
            details: error.details().cloned(),
            stacktrace,
        }
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            warn!(code = ?self.code(), message = %self.message(), "request failed on the server side");
        }
        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(ErrorEnvelope::new(self, status))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}
