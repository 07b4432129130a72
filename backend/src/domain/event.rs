//! Event data model, validation and merge rules.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::validation::{
    EntityField, FieldCollector, FieldMode, INVALID_DATE_MESSAGE, INVALID_NUMBER_MESSAGE,
    INVALID_STRING_MESSAGE, InvalidFields, RawField, parse_count, parse_date, parse_enum,
    parse_number, parse_string,
};
use crate::domain::{UserId, ValidationRules};

/// Summary attached to rejected event payloads.
pub const INVALID_EVENT_MESSAGE: &str = "All event information must be properly fulfilled";
/// Summary attached to rejected search parameters.
pub const INVALID_SEARCH_MESSAGE: &str = "Event search fields must be properly fulfilled";
/// Message for a start date that does not precede the end date.
pub const START_BEFORE_END_MESSAGE: &str = "Must be a valid ISO 8601 date before the end date";

/// Server-assigned event identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = i32, example = 1)]
pub struct EventId(i32);

impl EventId {
    /// Wrap a raw identifier.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Parse a path segment, accepting positive integers only.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<i32>().ok().filter(|id| *id > 0).map(Self)
    }

    /// Underlying integer.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i32> for EventId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

/// How an event (or an attendance) takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum EventFormat {
    #[serde(rename = "face-to-face")]
    FaceToFace,
    #[serde(rename = "online")]
    Online,
}

impl EventFormat {
    /// Every accepted format.
    pub const ALL: [Self; 2] = [Self::FaceToFace, Self::Online];

    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FaceToFace => "face-to-face",
            Self::Online => "online",
        }
    }

    /// Inverse of [`EventFormat::as_str`].
    pub fn from_wire(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|format| format.as_str() == raw)
    }

    /// Validation message listing the accepted formats.
    pub fn choices_message() -> String {
        choices(Self::ALL.map(Self::as_str))
    }
}

/// Closed set of event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Music,
    Sports,
    Arts,
    Technology,
    Education,
    Gastronomy,
    Business,
    Leisure,
    Other,
}

impl EventCategory {
    /// Every accepted category.
    pub const ALL: [Self; 9] = [
        Self::Music,
        Self::Sports,
        Self::Arts,
        Self::Technology,
        Self::Education,
        Self::Gastronomy,
        Self::Business,
        Self::Leisure,
        Self::Other,
    ];

    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Music => "music",
            Self::Sports => "sports",
            Self::Arts => "arts",
            Self::Technology => "technology",
            Self::Education => "education",
            Self::Gastronomy => "gastronomy",
            Self::Business => "business",
            Self::Leisure => "leisure",
            Self::Other => "other",
        }
    }

    /// Inverse of [`EventCategory::as_str`].
    pub fn from_wire(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.as_str() == raw)
    }
}

fn choices<const N: usize>(values: [&str; N]) -> String {
    format!("Must be one of: {}", values.join(", "))
}

/// Time window used by owner and attendee listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EventTimeline {
    #[default]
    All,
    /// Not started yet.
    Future,
    /// Already ended.
    Finished,
    /// Started but not ended.
    Active,
}

/// Stored event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Event {
    pub id: EventId,
    #[schema(example = "Rust meetup")]
    pub title: String,
    pub owner_id: UserId,
    pub creation_date: DateTime<Utc>,
    pub image_url: String,
    pub format: EventFormat,
    pub link: Option<String>,
    pub location: Option<String>,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub max_attendees: Option<i32>,
    pub ticket_price: f64,
    pub category: EventCategory,
}

impl Event {
    /// Whether the event ended before `now`.
    pub fn has_finished(&self, now: DateTime<Utc>) -> bool {
        self.end_date < now
    }

    /// Whether `user` created the event.
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner_id == user
    }
}

/// Event joined with the caller's attendance feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AttendedEvent {
    #[serde(flatten)]
    pub event: Event,
    pub rating: Option<f64>,
    pub comment: Option<String>,
}

/// Editable event fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventField {
    Title,
    ImageUrl,
    Format,
    Link,
    Location,
    Description,
    StartDate,
    EndDate,
    MaxAttendees,
    TicketPrice,
    Category,
}

impl EntityField for EventField {
    fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::ImageUrl => "image_url",
            Self::Format => "format",
            Self::Link => "link",
            Self::Location => "location",
            Self::Description => "description",
            Self::StartDate => "start_date",
            Self::EndDate => "end_date",
            Self::MaxAttendees => "max_attendees",
            Self::TicketPrice => "ticket_price",
            Self::Category => "category",
        }
    }

    fn message(self, _rules: &ValidationRules) -> String {
        match self {
            Self::Title | Self::ImageUrl | Self::Link | Self::Location | Self::Description => {
                INVALID_STRING_MESSAGE.to_owned()
            }
            Self::StartDate => START_BEFORE_END_MESSAGE.to_owned(),
            Self::EndDate => INVALID_DATE_MESSAGE.to_owned(),
            Self::MaxAttendees | Self::TicketPrice => INVALID_NUMBER_MESSAGE.to_owned(),
            Self::Format => EventFormat::choices_message(),
            Self::Category => choices(EventCategory::ALL.map(EventCategory::as_str)),
        }
    }
}

/// Validated event ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub owner_id: UserId,
    pub creation_date: DateTime<Utc>,
    pub title: String,
    pub image_url: String,
    pub format: EventFormat,
    pub link: Option<String>,
    pub location: Option<String>,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub max_attendees: Option<i32>,
    pub ticket_price: f64,
    pub category: EventCategory,
}

/// Validated partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub format: Option<EventFormat>,
    pub link: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub max_attendees: Option<i32>,
    pub ticket_price: Option<f64>,
    pub category: Option<EventCategory>,
}

impl EventPatch {
    /// Overlay the supplied fields on `stored`. Identity, ownership and the
    /// creation timestamp never change.
    pub fn apply(self, stored: Event) -> Event {
        let Self {
            title,
            image_url,
            format,
            link,
            location,
            description,
            start_date,
            end_date,
            max_attendees,
            ticket_price,
            category,
        } = self;
        Event {
            id: stored.id,
            owner_id: stored.owner_id,
            creation_date: stored.creation_date,
            title: title.unwrap_or(stored.title),
            image_url: image_url.unwrap_or(stored.image_url),
            format: format.unwrap_or(stored.format),
            link: link.or(stored.link),
            location: location.or(stored.location),
            description: description.unwrap_or(stored.description),
            start_date: start_date.unwrap_or(stored.start_date),
            end_date: end_date.unwrap_or(stored.end_date),
            max_attendees: max_attendees.or(stored.max_attendees),
            ticket_price: ticket_price.unwrap_or(stored.ticket_price),
            category: category.unwrap_or(stored.category),
        }
    }
}

/// Event payload as received, before validation.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RawEvent {
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "Rust meetup")]
    pub title: RawField,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub image_url: RawField,
    #[serde(default)]
    #[schema(value_type = Option<EventFormat>)]
    pub format: RawField,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub link: RawField,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub location: RawField,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: RawField,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "2030-05-01T18:00:00Z")]
    pub start_date: RawField,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "2030-05-01T21:00:00Z")]
    pub end_date: RawField,
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    pub max_attendees: RawField,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub ticket_price: RawField,
    #[serde(default)]
    #[schema(value_type = Option<EventCategory>)]
    pub category: RawField,
}

struct CheckedEvent {
    title: Option<String>,
    image_url: Option<String>,
    format: Option<EventFormat>,
    link: Option<String>,
    location: Option<String>,
    description: Option<String>,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    max_attendees: Option<i32>,
    ticket_price: Option<f64>,
    category: Option<EventCategory>,
}

impl RawEvent {
    /// Run every field through its validator.
    fn check(&self, collector: &mut FieldCollector<'_, EventField>) -> CheckedEvent {
        let title = collector.field(EventField::Title, &self.title, parse_string);
        let image_url = collector.field(EventField::ImageUrl, &self.image_url, parse_string);
        let format = collector.field(EventField::Format, &self.format, parse_enum::<EventFormat>);
        let description = collector.field(EventField::Description, &self.description, parse_string);
        let start_date = collector.field(EventField::StartDate, &self.start_date, parse_date);
        let end_date = collector.field(EventField::EndDate, &self.end_date, parse_date);
        let ticket_price = collector.field(EventField::TicketPrice, &self.ticket_price, parse_number);
        let category =
            collector.field(EventField::Category, &self.category, parse_enum::<EventCategory>);

        let (link, location, max_attendees) = match format {
            Some(EventFormat::Online) => (
                collector.field(EventField::Link, &self.link, parse_string),
                self.location.value().and_then(parse_string),
                self.max_attendees.value().and_then(parse_count),
            ),
            Some(EventFormat::FaceToFace) => (
                self.link.value().and_then(parse_string),
                collector.field(EventField::Location, &self.location, parse_string),
                collector.field(EventField::MaxAttendees, &self.max_attendees, parse_count),
            ),
            None => (
                collector.field(EventField::Link, &self.link, parse_string),
                collector.field(EventField::Location, &self.location, parse_string),
                collector.field(EventField::MaxAttendees, &self.max_attendees, parse_count),
            ),
        };

        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start >= end {
                collector.reject(EventField::StartDate);
            }
        }

        CheckedEvent {
            title,
            image_url,
            format,
            link,
            location,
            description,
            start_date,
            end_date,
            max_attendees,
            ticket_price,
            category,
        }
    }

    /// Validate a creation payload. Owner and creation timestamp come from the
    /// server, never from the body.
    pub fn into_new_event(
        self,
        owner_id: UserId,
        creation_date: DateTime<Utc>,
        rules: &ValidationRules,
    ) -> Result<NewEvent, InvalidFields<EventField>> {
        let mut collector = FieldCollector::new(FieldMode::Required, rules);
        let checked = self.check(&mut collector);
        collector.finish(INVALID_EVENT_MESSAGE, || {
            Some(NewEvent {
                owner_id,
                creation_date,
                title: checked.title?,
                image_url: checked.image_url?,
                format: checked.format?,
                link: checked.link,
                location: checked.location,
                description: checked.description?,
                start_date: checked.start_date?,
                end_date: checked.end_date?,
                max_attendees: checked.max_attendees,
                ticket_price: checked.ticket_price?,
                category: checked.category?,
            })
        })
    }

    /// Validate an update payload field by field. Rules spanning the stored
    /// row are checked by [`EventPatch::validate_against`].
    pub fn into_patch(self, rules: &ValidationRules) -> Result<EventPatch, InvalidFields<EventField>> {
        let mut collector = FieldCollector::new(FieldMode::Optional, rules);
        let checked = self.check(&mut collector);
        collector.finish(INVALID_EVENT_MESSAGE, || {
            Some(EventPatch {
                title: checked.title,
                image_url: checked.image_url,
                format: checked.format,
                link: checked.link,
                location: checked.location,
                description: checked.description,
                start_date: checked.start_date,
                end_date: checked.end_date,
                max_attendees: checked.max_attendees,
                ticket_price: checked.ticket_price,
                category: checked.category,
            })
        })
    }
}

impl EventPatch {
    /// Check the rules that depend on the stored row: a single supplied date
    /// is compared with the stored counterpart, and the merged event must
    /// carry the fields its format needs.
    pub fn validate_against(
        &self,
        stored: &Event,
        rules: &ValidationRules,
    ) -> Result<(), InvalidFields<EventField>> {
        let mut collector = FieldCollector::new(FieldMode::Optional, rules);

        if self.start_date.is_some() || self.end_date.is_some() {
            let start = self.start_date.unwrap_or(stored.start_date);
            let end = self.end_date.unwrap_or(stored.end_date);
            if start >= end {
                collector.reject(EventField::StartDate);
            }
        }

        match self.format.unwrap_or(stored.format) {
            EventFormat::Online => {
                if self.link.is_none() && stored.link.is_none() {
                    collector.reject(EventField::Link);
                }
            }
            EventFormat::FaceToFace => {
                if self.location.is_none() && stored.location.is_none() {
                    collector.reject(EventField::Location);
                }
                if self.max_attendees.is_none() && stored.max_attendees.is_none() {
                    collector.reject(EventField::MaxAttendees);
                }
            }
        }

        collector.finish(INVALID_EVENT_MESSAGE, || Some(()))
    }
}

/// Search parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Location,
}

impl EntityField for SearchField {
    fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Location => "location",
        }
    }

    fn message(self, _rules: &ValidationRules) -> String {
        INVALID_STRING_MESSAGE.to_owned()
    }
}

/// Search query as received.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RawEventSearch {
    /// Substring of the event title.
    pub title: Option<String>,
    /// Substring of the event location.
    pub location: Option<String>,
}

/// Validated search; at least one criterion is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSearch {
    pub title: Option<String>,
    pub location: Option<String>,
}

impl RawEventSearch {
    /// Validate the search parameters. Supplied parameters must be non-blank
    /// and at least one must be supplied.
    pub fn into_search(
        self,
        rules: &ValidationRules,
    ) -> Result<EventSearch, InvalidFields<SearchField>> {
        let mut collector = FieldCollector::new(FieldMode::Optional, rules);
        let title = collector.field(SearchField::Title, &RawField::from(self.title), parse_string);
        let location = collector.field(
            SearchField::Location,
            &RawField::from(self.location),
            parse_string,
        );
        if title.is_none() && location.is_none() && !collector.has_failures() {
            collector.reject(SearchField::Title);
            collector.reject(SearchField::Location);
        }
        collector.finish(INVALID_SEARCH_MESSAGE, || Some(EventSearch { title, location }))
    }
}

/// Timeline query parameter.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TimelineQuery {
    /// Window to list; defaults to `all`.
    #[serde(default)]
    pub timeline: EventTimeline,
}
