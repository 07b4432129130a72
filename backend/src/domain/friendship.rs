//! Friendship rows and the request/accept state machine.
//!
//! A friendship is stored once per unordered pair of users. `user_id` is the
//! requester and `friend_user_id` the target; only the target may accept.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::UserId;

/// Lifecycle of a friendship row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    Requested,
    Accepted,
}

impl FriendshipStatus {
    /// Wire and storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Accepted => "accepted",
        }
    }

    /// Inverse of [`FriendshipStatus::as_str`].
    pub fn from_wire(raw: &str) -> Option<Self> {
        [Self::Requested, Self::Accepted]
            .into_iter()
            .find(|status| status.as_str() == raw)
    }
}

/// Stored friendship between a requester and a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Friendship {
    pub user_id: UserId,
    pub friend_user_id: UserId,
    pub status: FriendshipStatus,
}

impl Friendship {
    /// A fresh request from `requester` to `target`.
    pub fn request(requester: UserId, target: UserId) -> Self {
        Self {
            user_id: requester,
            friend_user_id: target,
            status: FriendshipStatus::Requested,
        }
    }
}

/// What a friend request should do given the current row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestTransition {
    /// No row yet: store a new pending request.
    Insert,
    /// The caller already has a pending request out.
    AlreadySent,
    /// The other side asked first: accept their request.
    Accept,
    /// The pair are friends already.
    AlreadyFriends,
}

/// What accepting a request should do given the current row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptTransition {
    Accept,
    AlreadyFriends,
}

/// Reasons an accept is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptRejection {
    /// No row links the pair.
    NotFound,
    /// The caller is the requester of the pending row.
    OwnRequest,
}

/// Decide how `caller` sending a request to the other participant plays out.
///
/// # Examples
/// ```
/// use social_events::domain::{Friendship, RequestTransition, UserId, request_transition};
///
/// let (a, b) = (UserId::new(1), UserId::new(2));
/// let pending = Friendship::request(a, b);
/// assert_eq!(request_transition(None, a), RequestTransition::Insert);
/// assert_eq!(request_transition(Some(&pending), a), RequestTransition::AlreadySent);
/// assert_eq!(request_transition(Some(&pending), b), RequestTransition::Accept);
/// ```
pub fn request_transition(existing: Option<&Friendship>, caller: UserId) -> RequestTransition {
    match existing {
        None => RequestTransition::Insert,
        Some(row) => match row.status {
            FriendshipStatus::Accepted => RequestTransition::AlreadyFriends,
            FriendshipStatus::Requested if row.user_id == caller => RequestTransition::AlreadySent,
            FriendshipStatus::Requested => RequestTransition::Accept,
        },
    }
}

/// Decide how `caller` accepting a request plays out.
pub fn accept_transition(
    existing: Option<&Friendship>,
    caller: UserId,
) -> Result<AcceptTransition, AcceptRejection> {
    let row = existing.ok_or(AcceptRejection::NotFound)?;
    match row.status {
        FriendshipStatus::Accepted => Ok(AcceptTransition::AlreadyFriends),
        FriendshipStatus::Requested if row.user_id == caller => Err(AcceptRejection::OwnRequest),
        FriendshipStatus::Requested => Ok(AcceptTransition::Accept),
    }
}

/// Reported result of a friendship command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FriendshipOutcome {
    RequestSent,
    RequestAlreadySent,
    RequestAccepted,
    AlreadyFriends,
    Deleted,
}

impl FriendshipOutcome {
    /// Client-facing description.
    pub const fn message(self) -> &'static str {
        match self {
            Self::RequestSent => "Friend request sent",
            Self::RequestAlreadySent => "Friend request already sent",
            Self::RequestAccepted => "Friend request accepted",
            Self::AlreadyFriends => "Already friends",
            Self::Deleted => "Friendship deleted",
        }
    }
}
