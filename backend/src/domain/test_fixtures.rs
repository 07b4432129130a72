//! Sample rows shared by domain and adapter unit tests.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{
    Assistance, Event, EventCategory, EventFormat, EventId, User, UserId,
};

/// A stored user with a recognisable hash.
pub fn sample_user(id: i32, email: &str) -> User {
    User {
        id: UserId::new(id),
        name: "Ann".to_owned(),
        last_name: "Lee".to_owned(),
        email: email.to_owned(),
        password_hash: format!("hash:{id}"),
        image_url: "https://cdn.example.com/avatar.png".to_owned(),
    }
}

/// A face-to-face event owned by `owner` spanning `start..end`.
pub fn sample_event(id: i32, owner: i32, start: DateTime<Utc>, end: DateTime<Utc>) -> Event {
    Event {
        id: EventId::new(id),
        title: format!("Event {id}"),
        owner_id: UserId::new(owner),
        creation_date: start - Duration::days(30),
        image_url: "https://cdn.example.com/event.png".to_owned(),
        format: EventFormat::FaceToFace,
        link: None,
        location: Some("Madrid".to_owned()),
        description: "Sample event".to_owned(),
        start_date: start,
        end_date: end,
        max_attendees: Some(50),
        ticket_price: 10.0,
        category: EventCategory::Technology,
    }
}

/// An event that ended a day ago.
pub fn finished_event(id: i32, owner: i32) -> Event {
    let now = Utc::now();
    sample_event(id, owner, now - Duration::days(2), now - Duration::days(1))
}

/// An event starting tomorrow.
pub fn future_event(id: i32, owner: i32) -> Event {
    let now = Utc::now();
    sample_event(id, owner, now + Duration::days(1), now + Duration::days(2))
}

/// An attendance without feedback.
pub fn sample_assistance(user: i32, event: i32) -> Assistance {
    Assistance {
        user_id: UserId::new(user),
        event_id: EventId::new(event),
        format: EventFormat::FaceToFace,
        rating: None,
        comment: None,
    }
}
