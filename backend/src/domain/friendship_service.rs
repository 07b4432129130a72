//! Friendship state machine over unordered user pairs.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    FriendshipPersistenceError, FriendshipRepository, FriendshipsCommand, FriendshipsQuery,
    UserRepository,
};
use crate::domain::user_service::{USER_NOT_FOUND_MESSAGE, map_user_error};
use crate::domain::{
    AcceptRejection, AcceptTransition, Error, Friendship, FriendshipOutcome, PublicUser,
    RequestTransition, User, UserId, accept_transition, request_transition,
};

pub const SELF_REQUEST_MESSAGE: &str = "Cannot send a friend request to itself";
pub const SELF_ACCEPT_MESSAGE: &str = "Cannot accept a friend request from itself";
pub const SELF_DELETE_MESSAGE: &str = "Cannot delete a friendship with itself";
pub const REQUEST_NOT_FOUND_MESSAGE: &str = "Friend request not found";
pub const OWN_REQUEST_MESSAGE: &str = "Cannot accept own friend request";
pub const FRIENDSHIP_NOT_FOUND_MESSAGE: &str = "Friendship does not exist or was not found";

/// Friendship service implementing the friendship driving ports.
#[derive(Clone)]
pub struct FriendshipService<F, U> {
    friendships: Arc<F>,
    users: Arc<U>,
}

impl<F, U> FriendshipService<F, U> {
    /// Create a new service over the given repositories.
    pub fn new(friendships: Arc<F>, users: Arc<U>) -> Self {
        Self { friendships, users }
    }
}

fn map_friendship_error(error: FriendshipPersistenceError) -> Error {
    match error {
        FriendshipPersistenceError::Connection { message } => {
            Error::store_unavailable("friendship", message)
        }
        FriendshipPersistenceError::Query { message } => Error::store_failed("friendship", message),
    }
}

fn public(users: Vec<User>) -> Vec<PublicUser> {
    users.into_iter().map(PublicUser::from).collect()
}

impl<F, U> FriendshipService<F, U>
where
    F: FriendshipRepository,
    U: UserRepository,
{
    async fn require_user(&self, id: UserId) -> Result<(), Error> {
        match self.users.find_by_id(id).await.map_err(map_user_error)? {
            Some(_) => Ok(()),
            None => Err(Error::not_found(USER_NOT_FOUND_MESSAGE)),
        }
    }

    async fn current(&self, a: UserId, b: UserId) -> Result<Option<Friendship>, Error> {
        self.friendships
            .find_between(a, b)
            .await
            .map_err(map_friendship_error)
    }

    async fn accept_pending(
        &self,
        requester: UserId,
        target: UserId,
    ) -> Result<FriendshipOutcome, Error> {
        self.friendships
            .accept(requester, target)
            .await
            .map_err(map_friendship_error)?
            .ok_or_else(|| Error::not_found(REQUEST_NOT_FOUND_MESSAGE))?;
        info!(requester = %requester, target = %target, "friend request accepted");
        Ok(FriendshipOutcome::RequestAccepted)
    }
}

#[async_trait]
impl<F, U> FriendshipsCommand for FriendshipService<F, U>
where
    F: FriendshipRepository,
    U: UserRepository,
{
    async fn request(&self, caller: UserId, target: UserId) -> Result<FriendshipOutcome, Error> {
        if caller == target {
            return Err(Error::invalid_request(SELF_REQUEST_MESSAGE));
        }
        self.require_user(target).await?;
        let existing = self.current(caller, target).await?;
        match request_transition(existing.as_ref(), caller) {
            RequestTransition::Insert => {
                self.friendships
                    .insert(&Friendship::request(caller, target))
                    .await
                    .map_err(map_friendship_error)?;
                info!(requester = %caller, target = %target, "friend request sent");
                Ok(FriendshipOutcome::RequestSent)
            }
            RequestTransition::AlreadySent => Ok(FriendshipOutcome::RequestAlreadySent),
            RequestTransition::Accept => self.accept_pending(target, caller).await,
            RequestTransition::AlreadyFriends => Ok(FriendshipOutcome::AlreadyFriends),
        }
    }

    async fn accept(&self, caller: UserId, requester: UserId) -> Result<FriendshipOutcome, Error> {
        if caller == requester {
            return Err(Error::invalid_request(SELF_ACCEPT_MESSAGE));
        }
        self.require_user(requester).await?;
        let existing = self.current(caller, requester).await?;
        match accept_transition(existing.as_ref(), caller) {
            Ok(AcceptTransition::Accept) => self.accept_pending(requester, caller).await,
            Ok(AcceptTransition::AlreadyFriends) => Ok(FriendshipOutcome::AlreadyFriends),
            Err(AcceptRejection::NotFound) => Err(Error::not_found(REQUEST_NOT_FOUND_MESSAGE)),
            Err(AcceptRejection::OwnRequest) => Err(Error::invalid_request(OWN_REQUEST_MESSAGE)),
        }
    }

    async fn delete(&self, caller: UserId, other: UserId) -> Result<FriendshipOutcome, Error> {
        if caller == other {
            return Err(Error::invalid_request(SELF_DELETE_MESSAGE));
        }
        self.require_user(other).await?;
        let deleted = self
            .friendships
            .delete(caller, other)
            .await
            .map_err(map_friendship_error)?;
        if !deleted {
            return Err(Error::not_found(FRIENDSHIP_NOT_FOUND_MESSAGE));
        }
        info!(user_id = %caller, other = %other, "friendship and chat deleted");
        Ok(FriendshipOutcome::Deleted)
    }
}

#[async_trait]
impl<F, U> FriendshipsQuery for FriendshipService<F, U>
where
    F: FriendshipRepository,
    U: UserRepository,
{
    async fn friends(&self, user: UserId) -> Result<Vec<PublicUser>, Error> {
        self.friendships
            .list_friends(user)
            .await
            .map(public)
            .map_err(map_friendship_error)
    }

    async fn pending_requests(&self, user: UserId) -> Result<Vec<PublicUser>, Error> {
        self.friendships
            .list_pending_requesters(user)
            .await
            .map(public)
            .map_err(map_friendship_error)
    }
}

#[cfg(test)]
#[path = "friendship_service_tests.rs"]
mod tests;
