//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `password` holds the bcrypt hash.
    users (id) {
        id -> Int4,
        name -> Varchar,
        last_name -> Varchar,
        email -> Varchar,
        password -> Varchar,
        image_url -> Text,
    }
}

diesel::table! {
    /// Events created by users.
    ///
    /// `format` and `category` hold the wire spelling of the domain enums.
    events (id) {
        id -> Int4,
        title -> Varchar,
        owner_id -> Int4,
        creation_date -> Timestamptz,
        image_url -> Text,
        format -> Varchar,
        link -> Nullable<Text>,
        location -> Nullable<Text>,
        description -> Text,
        start_date -> Timestamptz,
        end_date -> Timestamptz,
        max_attendees -> Nullable<Int4>,
        ticket_price -> Float8,
        category -> Varchar,
    }
}

diesel::table! {
    /// Attendance of a user at an event, keyed by the pair.
    assistances (user_id, event_id) {
        user_id -> Int4,
        event_id -> Int4,
        format -> Varchar,
        rating -> Nullable<Float8>,
        comment -> Nullable<Text>,
    }
}

diesel::table! {
    /// One row per unordered pair; `user_id` is the requester.
    friendships (user_id, friend_user_id) {
        user_id -> Int4,
        friend_user_id -> Int4,
        status -> Varchar,
    }
}

diesel::table! {
    /// Direct messages.
    messages (id) {
        id -> Int4,
        sender_user_id -> Int4,
        receiver_user_id -> Int4,
        content -> Text,
        timestamp -> Timestamptz,
    }
}

diesel::joinable!(events -> users (owner_id));
diesel::joinable!(assistances -> events (event_id));
diesel::joinable!(assistances -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, events, assistances, friendships, messages);
