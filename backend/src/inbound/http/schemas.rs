//! Response payloads shared by several handlers.
//!
//! Entity bodies reuse the domain types directly; this module only holds the
//! wrappers that exist purely for the HTTP surface.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Acknowledgement returned by mutations that have no entity to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusMessage {
    #[schema(example = "Event deleted")]
    pub message: String,
}

impl StatusMessage {
    /// Wrap a client-facing message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    #[test]
    fn serialises_as_a_single_message_field() {
        let body = serde_json::to_value(StatusMessage::new("User deleted")).expect("json");
        assert_eq!(body, serde_json::json!({ "message": "User deleted" }));
    }

    #[test]
    fn schema_exposes_the_message_property() {
        let schema = serde_json::to_string(&StatusMessage::schema()).expect("schema json");
        assert!(schema.contains("\"message\""), "schema: {schema}");
    }
}
