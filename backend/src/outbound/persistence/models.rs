//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and never
//! leave it. Conversions into domain types are fallible wherever a column
//! stores the wire spelling of a closed domain enum.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    Assistance, Event, EventCategory, EventFormat, EventId, Friendship, FriendshipStatus, Message,
    NewAssistance, NewEvent, NewMessage, User, UserId, UserRegistration,
};

use super::schema::{assistances, events, friendships, messages, users};

/// A stored column value that no longer maps onto the domain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unexpected {column} value in storage: {value}")]
pub(crate) struct StoredValueError {
    pub column: &'static str,
    pub value: String,
}

fn decode<T>(
    column: &'static str,
    raw: String,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<T, StoredValueError> {
    parse(&raw).ok_or(StoredValueError { column, value: raw })
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub image_url: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let UserRow {
            id,
            name,
            last_name,
            email,
            password,
            image_url,
        } = row;
        Self {
            id: UserId::new(id),
            name,
            last_name,
            email,
            password_hash: password,
            image_url,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub image_url: &'a str,
}

impl<'a> From<&'a UserRegistration> for NewUserRow<'a> {
    fn from(user: &'a UserRegistration) -> Self {
        Self {
            name: &user.name,
            last_name: &user.last_name,
            email: &user.email,
            password: &user.password_hash,
            image_url: &user.image_url,
        }
    }
}

/// Full overwrite of the mutable user columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserChangeset<'a> {
    pub name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub image_url: &'a str,
}

impl<'a> From<&'a User> for UserChangeset<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            name: &user.name,
            last_name: &user.last_name,
            email: &user.email,
            password: &user.password_hash,
            image_url: &user.image_url,
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EventRow {
    pub id: i32,
    pub title: String,
    pub owner_id: i32,
    pub creation_date: DateTime<Utc>,
    pub image_url: String,
    pub format: String,
    pub link: Option<String>,
    pub location: Option<String>,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub max_attendees: Option<i32>,
    pub ticket_price: f64,
    pub category: String,
}

impl TryFrom<EventRow> for Event {
    type Error = StoredValueError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let EventRow {
            id,
            title,
            owner_id,
            creation_date,
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
        } = row;
        Ok(Self {
            id: EventId::new(id),
            title,
            owner_id: UserId::new(owner_id),
            creation_date,
            image_url,
            format: decode("events.format", format, EventFormat::from_wire)?,
            link,
            location,
            description,
            start_date,
            end_date,
            max_attendees,
            ticket_price,
            category: decode("events.category", category, EventCategory::from_wire)?,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = events)]
pub(crate) struct NewEventRow<'a> {
    pub title: &'a str,
    pub owner_id: i32,
    pub creation_date: DateTime<Utc>,
    pub image_url: &'a str,
    pub format: &'static str,
    pub link: Option<&'a str>,
    pub location: Option<&'a str>,
    pub description: &'a str,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub max_attendees: Option<i32>,
    pub ticket_price: f64,
    pub category: &'static str,
}

impl<'a> From<&'a NewEvent> for NewEventRow<'a> {
    fn from(event: &'a NewEvent) -> Self {
        Self {
            title: &event.title,
            owner_id: event.owner_id.get(),
            creation_date: event.creation_date,
            image_url: &event.image_url,
            format: event.format.as_str(),
            link: event.link.as_deref(),
            location: event.location.as_deref(),
            description: &event.description,
            start_date: event.start_date,
            end_date: event.end_date,
            max_attendees: event.max_attendees,
            ticket_price: event.ticket_price,
            category: event.category.as_str(),
        }
    }
}

/// Overwrite of every column an owner may edit. Unset optionals are written
/// as NULL so the row mirrors the merged domain event.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = events)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct EventChangeset<'a> {
    pub title: &'a str,
    pub image_url: &'a str,
    pub format: &'static str,
    pub link: Option<&'a str>,
    pub location: Option<&'a str>,
    pub description: &'a str,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub max_attendees: Option<i32>,
    pub ticket_price: f64,
    pub category: &'static str,
}

impl<'a> From<&'a Event> for EventChangeset<'a> {
    fn from(event: &'a Event) -> Self {
        Self {
            title: &event.title,
            image_url: &event.image_url,
            format: event.format.as_str(),
            link: event.link.as_deref(),
            location: event.location.as_deref(),
            description: &event.description,
            start_date: event.start_date,
            end_date: event.end_date,
            max_attendees: event.max_attendees,
            ticket_price: event.ticket_price,
            category: event.category.as_str(),
        }
    }
}

// ---------------------------------------------------------------------------
// Assistances
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = assistances)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AssistanceRow {
    pub user_id: i32,
    pub event_id: i32,
    pub format: String,
    pub rating: Option<f64>,
    pub comment: Option<String>,
}

impl TryFrom<AssistanceRow> for Assistance {
    type Error = StoredValueError;

    fn try_from(row: AssistanceRow) -> Result<Self, Self::Error> {
        let AssistanceRow {
            user_id,
            event_id,
            format,
            rating,
            comment,
        } = row;
        Ok(Self {
            user_id: UserId::new(user_id),
            event_id: EventId::new(event_id),
            format: decode("assistances.format", format, EventFormat::from_wire)?,
            rating,
            comment,
        })
    }
}

impl From<&NewAssistance> for AssistanceRow {
    fn from(assistance: &NewAssistance) -> Self {
        Self {
            user_id: assistance.user_id.get(),
            event_id: assistance.event_id.get(),
            format: assistance.format.as_str().to_owned(),
            rating: None,
            comment: None,
        }
    }
}

/// Feedback columns; both are written so the row mirrors the merged value.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = assistances)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct AssistanceFeedback<'a> {
    pub rating: Option<f64>,
    pub comment: Option<&'a str>,
}

impl<'a> From<&'a Assistance> for AssistanceFeedback<'a> {
    fn from(assistance: &'a Assistance) -> Self {
        Self {
            rating: assistance.rating,
            comment: assistance.comment.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Friendships
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = friendships)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FriendshipRow {
    pub user_id: i32,
    pub friend_user_id: i32,
    pub status: String,
}

impl TryFrom<FriendshipRow> for Friendship {
    type Error = StoredValueError;

    fn try_from(row: FriendshipRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: UserId::new(row.user_id),
            friend_user_id: UserId::new(row.friend_user_id),
            status: decode("friendships.status", row.status, FriendshipStatus::from_wire)?,
        })
    }
}

impl From<&Friendship> for FriendshipRow {
    fn from(friendship: &Friendship) -> Self {
        Self {
            user_id: friendship.user_id.get(),
            friend_user_id: friendship.friend_user_id.get(),
            status: friendship.status.as_str().to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MessageRow {
    pub id: i32,
    pub sender_user_id: i32,
    pub receiver_user_id: i32,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            sender_user_id: UserId::new(row.sender_user_id),
            receiver_user_id: UserId::new(row.receiver_user_id),
            content: row.content,
            timestamp: row.timestamp,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = messages)]
pub(crate) struct NewMessageRow<'a> {
    pub sender_user_id: i32,
    pub receiver_user_id: i32,
    pub content: &'a str,
    pub timestamp: DateTime<Utc>,
}

impl<'a> From<&'a NewMessage> for NewMessageRow<'a> {
    fn from(message: &'a NewMessage) -> Self {
        Self {
            sender_user_id: message.sender_user_id.get(),
            receiver_user_id: message.receiver_user_id.get(),
            content: &message.content,
            timestamp: message.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_fixtures::future_event;
    use rstest::rstest;

    fn event_row(format: &str, category: &str) -> EventRow {
        let event = future_event(3, 1);
        EventRow {
            id: 3,
            title: event.title,
            owner_id: 1,
            creation_date: event.creation_date,
            image_url: event.image_url,
            format: format.to_owned(),
            link: None,
            location: event.location,
            description: event.description,
            start_date: event.start_date,
            end_date: event.end_date,
            max_attendees: event.max_attendees,
            ticket_price: event.ticket_price,
            category: category.to_owned(),
        }
    }

    #[test]
    fn event_row_decodes_wire_enums() {
        let event = Event::try_from(event_row("online", "music")).expect("decodes");
        assert_eq!(event.format, EventFormat::Online);
        assert_eq!(event.category, EventCategory::Music);
        assert_eq!(event.owner_id, UserId::new(1));
    }

    #[rstest]
    #[case("hybrid", "music", "events.format")]
    #[case("online", "cinema", "events.category")]
    fn event_row_rejects_unknown_values(
        #[case] format: &str,
        #[case] category: &str,
        #[case] column: &str,
    ) {
        let err = Event::try_from(event_row(format, category)).expect_err("unknown value");
        assert_eq!(err.column, column);
    }

    #[test]
    fn changeset_mirrors_domain_event() {
        let event = future_event(3, 1);
        let changeset = EventChangeset::from(&event);
        assert_eq!(changeset.format, "face-to-face");
        assert_eq!(changeset.category, "technology");
        assert_eq!(changeset.location, Some("Madrid"));
        assert_eq!(changeset.link, None);
    }

    #[test]
    fn friendship_row_round_trips_status() {
        let row = FriendshipRow::from(&Friendship::request(UserId::new(1), UserId::new(2)));
        assert_eq!(row.status, "requested");
        let back = Friendship::try_from(row).expect("decodes");
        assert_eq!(back.status, FriendshipStatus::Requested);
    }
}
