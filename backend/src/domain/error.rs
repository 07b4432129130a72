//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses or any other protocol-specific envelope.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;

use crate::domain::TraceId;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// Authentication failed or is missing.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// An unexpected error occurred inside the domain or its backing store.
    InternalError,
}

/// Domain error payload.
///
/// `details` carries client-facing context (per-field validation failures);
/// `diagnostic` carries server-side context (sanitised store failures) and is
/// only exposed by adapters for server faults.
///
/// # Examples
/// ```
/// use social_events::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("missing");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    message: String,
    trace_id: Option<String>,
    details: Option<Value>,
    diagnostic: Option<Value>,
}

impl Error {
    /// Create a new error, capturing the trace identifier in scope.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
            diagnostic: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Correlation identifier captured when the error was raised.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Client-facing supplementary details.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Server-side diagnostic context.
    pub fn diagnostic(&self) -> Option<&Value> {
        self.diagnostic.as_ref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use social_events::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("bad").with_details(json!({ "field": "name" }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attach diagnostic context describing a server-side failure.
    pub fn with_diagnostic(mut self, diagnostic: Value) -> Self {
        self.diagnostic = Some(diagnostic);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// A repository could not reach its backing store. Surfaces as an
    /// internal error whose diagnostic kind is `connection`.
    ///
    /// Port error messages are already free of SQL text, so they are kept as
    /// diagnostic context.
    pub fn store_unavailable(store: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::internal(format!("{store} repository unavailable: {message}"))
            .with_diagnostic(json!({ "store": store, "kind": "connection", "message": message }))
    }

    /// A repository operation failed inside the backing store.
    pub fn store_failed(store: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::internal(format!("{store} repository error: {message}"))
            .with_diagnostic(json!({ "store": store, "kind": "query", "message": message }))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
    #[case(Error::unauthorized("no"), ErrorCode::Unauthorized)]
    #[case(Error::forbidden("nope"), ErrorCode::Forbidden)]
    #[case(Error::not_found("missing"), ErrorCode::NotFound)]
    #[case(Error::internal("boom"), ErrorCode::InternalError)]
    fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
        assert_eq!(error.code(), expected);
    }

    #[tokio::test]
    async fn new_captures_trace_id_in_scope() {
        let trace_id: TraceId = "00000000-0000-0000-0000-000000000000"
            .parse()
            .expect("valid UUID");
        let error = TraceId::scope(trace_id, async { Error::internal("boom") }).await;
        assert_eq!(error.trace_id(), Some(trace_id.to_string().as_str()));
    }

    #[test]
    fn new_has_no_trace_id_out_of_scope() {
        assert!(Error::internal("boom").trace_id().is_none());
    }

    #[rstest]
    #[case(Error::store_unavailable("user", "database connection error"), ErrorCode::InternalError, "connection")]
    #[case(Error::store_failed("event", "database error"), ErrorCode::InternalError, "query")]
    fn store_errors_carry_diagnostic(
        #[case] error: Error,
        #[case] code: ErrorCode,
        #[case] kind: &str,
    ) {
        assert_eq!(error.code(), code);
        let diagnostic = error.diagnostic().expect("diagnostic attached");
        assert_eq!(diagnostic["kind"], json!(kind));
        assert!(error.details().is_none());
    }

    #[test]
    fn details_and_diagnostic_are_independent() {
        let error = Error::internal("boom")
            .with_details(json!({ "field": "name" }))
            .with_diagnostic(json!({ "kind": "query" }));
        assert_eq!(error.details(), Some(&json!({ "field": "name" })));
        assert_eq!(error.diagnostic(), Some(&json!({ "kind": "query" })));
    }
}
