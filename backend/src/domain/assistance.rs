//! Attendance records and post-event feedback.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::validation::{
    EntityField, FieldCollector, FieldMode, INVALID_STRING_MESSAGE, InvalidFields, RawField,
    parse_enum, parse_rating, parse_string,
};
use crate::domain::{EventFormat, EventId, UserId, ValidationRules};

/// Summary attached to rejected assistance payloads.
pub const INVALID_ASSISTANCE_MESSAGE: &str = "All assistance information must be properly fulfilled";

/// A user's attendance at an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Assistance {
    pub user_id: UserId,
    pub event_id: EventId,
    pub format: EventFormat,
    /// Post-event rating; unset until the attendee rates the event.
    pub rating: Option<f64>,
    pub comment: Option<String>,
}

/// Assistance fields a client may supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistanceField {
    Format,
    Rating,
    Comment,
}

impl EntityField for AssistanceField {
    fn name(self) -> &'static str {
        match self {
            Self::Format => "format",
            Self::Rating => "rating",
            Self::Comment => "comment",
        }
    }

    fn message(self, rules: &ValidationRules) -> String {
        match self {
            Self::Format => EventFormat::choices_message(),
            Self::Rating => format!(
                "Must be a number between {} and {}",
                rules.rating().min(),
                rules.rating().max()
            ),
            Self::Comment => INVALID_STRING_MESSAGE.to_owned(),
        }
    }
}

/// Validated attendance registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssistance {
    pub user_id: UserId,
    pub event_id: EventId,
    pub format: EventFormat,
}

/// Validated feedback update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssistancePatch {
    pub rating: Option<f64>,
    pub comment: Option<String>,
}

impl AssistancePatch {
    /// Overlay the supplied feedback on `stored`.
    pub fn apply(self, stored: Assistance) -> Assistance {
        let Self { rating, comment } = self;
        Assistance {
            rating: rating.or(stored.rating),
            comment: comment.or(stored.comment),
            ..stored
        }
    }
}

/// Assistance payload as received, before validation.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RawAssistance {
    #[serde(default)]
    #[schema(value_type = Option<EventFormat>)]
    pub format: RawField,
    #[serde(default)]
    #[schema(value_type = Option<f64>, example = 8.5)]
    pub rating: RawField,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "Great talks")]
    pub comment: RawField,
}

impl RawAssistance {
    /// Validate a registration; only the attendance format is read.
    pub fn into_new_assistance(
        self,
        user_id: UserId,
        event_id: EventId,
        rules: &ValidationRules,
    ) -> Result<NewAssistance, InvalidFields<AssistanceField>> {
        let mut collector = FieldCollector::new(FieldMode::Required, rules);
        let format = collector.field(
            AssistanceField::Format,
            &self.format,
            parse_enum::<EventFormat>,
        );
        collector.finish(INVALID_ASSISTANCE_MESSAGE, || {
            Some(NewAssistance {
                user_id,
                event_id,
                format: format?,
            })
        })
    }

    /// Validate a feedback update. At least one of rating or comment must be
    /// supplied.
    pub fn into_patch(
        self,
        rules: &ValidationRules,
    ) -> Result<AssistancePatch, InvalidFields<AssistanceField>> {
        let mut collector = FieldCollector::new(FieldMode::Optional, rules);
        let rating = collector.field(AssistanceField::Rating, &self.rating, |value| {
            parse_rating(value, rules)
        });
        let comment = collector.field(AssistanceField::Comment, &self.comment, parse_string);
        if !self.rating.is_present() && !self.comment.is_present() {
            collector.reject(AssistanceField::Rating);
            collector.reject(AssistanceField::Comment);
        }
        collector.finish(INVALID_ASSISTANCE_MESSAGE, || {
            Some(AssistancePatch { rating, comment })
        })
    }
}

/// Result of registering attendance.
#[derive(Debug, Clone, PartialEq)]
pub enum AssistanceCreation {
    /// A new row was stored.
    Created(Assistance),
    /// The user was already registered; nothing changed.
    AlreadyExists(Assistance),
}

impl AssistanceCreation {
    /// The stored attendance either way.
    pub fn assistance(&self) -> &Assistance {
        match self {
            Self::Created(assistance) | Self::AlreadyExists(assistance) => assistance,
        }
    }

    /// Client-facing description.
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Created(_) => "Assistance created",
            Self::AlreadyExists(_) => "Assistance already exists",
        }
    }
}
