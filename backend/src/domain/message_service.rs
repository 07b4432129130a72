//! Direct messaging between users.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    MessagePersistenceError, MessageRepository, MessagesCommand, MessagesQuery, UserRepository,
};
use crate::domain::user_service::{USER_NOT_FOUND_MESSAGE, map_user_error};
use crate::domain::{Error, Message, NewMessage, PublicUser, UserId};

pub const SELF_MESSAGE_MESSAGE: &str = "Cannot send a message to itself";
pub const RECEIVER_NOT_FOUND_MESSAGE: &str = "Message receiver does not exist or was not found";

/// Message service implementing the messaging driving ports.
#[derive(Clone)]
pub struct MessageService<M, U> {
    messages: Arc<M>,
    users: Arc<U>,
}

impl<M, U> MessageService<M, U> {
    /// Create a new service over the given repositories.
    pub fn new(messages: Arc<M>, users: Arc<U>) -> Self {
        Self { messages, users }
    }
}

fn map_message_error(error: MessagePersistenceError) -> Error {
    match error {
        MessagePersistenceError::Connection { message } => {
            Error::store_unavailable("message", message)
        }
        MessagePersistenceError::Query { message } => Error::store_failed("message", message),
    }
}

impl<M, U> MessageService<M, U>
where
    M: MessageRepository,
    U: UserRepository,
{
    async fn user_exists(&self, id: UserId) -> Result<bool, Error> {
        Ok(self
            .users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .is_some())
    }
}

#[async_trait]
impl<M, U> MessagesCommand for MessageService<M, U>
where
    M: MessageRepository,
    U: UserRepository,
{
    async fn send(&self, message: NewMessage) -> Result<Message, Error> {
        if message.sender_user_id == message.receiver_user_id {
            return Err(Error::invalid_request(SELF_MESSAGE_MESSAGE));
        }
        if !self.user_exists(message.receiver_user_id).await? {
            return Err(Error::not_found(RECEIVER_NOT_FOUND_MESSAGE));
        }
        let stored = self
            .messages
            .insert(&message)
            .await
            .map_err(map_message_error)?;
        debug!(
            message_id = stored.id,
            sender = %stored.sender_user_id,
            receiver = %stored.receiver_user_id,
            "message stored"
        );
        Ok(stored)
    }
}

#[async_trait]
impl<M, U> MessagesQuery for MessageService<M, U>
where
    M: MessageRepository,
    U: UserRepository,
{
    async fn chat(&self, user: UserId, other: UserId) -> Result<Vec<Message>, Error> {
        if !self.user_exists(other).await? {
            return Err(Error::not_found(USER_NOT_FOUND_MESSAGE));
        }
        self.messages
            .chat(user, other)
            .await
            .map_err(map_message_error)
    }

    async fn contacts(&self, user: UserId) -> Result<Vec<PublicUser>, Error> {
        let users = self
            .messages
            .contacts(user)
            .await
            .map_err(map_message_error)?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::User;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::test_fixtures::sample_user;
    use chrono::{Duration, Utc};

    /// Append-only store honouring the repository contract.
    #[derive(Default)]
    struct InMemoryMessages {
        rows: Mutex<Vec<Message>>,
    }

    impl InMemoryMessages {
        fn rows(&self) -> std::sync::MutexGuard<'_, Vec<Message>> {
            self.rows.lock().expect("messages lock")
        }
    }

    #[async_trait]
    impl MessageRepository for InMemoryMessages {
        async fn insert(&self, message: &NewMessage) -> Result<Message, MessagePersistenceError> {
            let mut rows = self.rows();
            let stored = Message {
                id: i32::try_from(rows.len()).expect("row count") + 1,
                sender_user_id: message.sender_user_id,
                receiver_user_id: message.receiver_user_id,
                content: message.content.clone(),
                timestamp: message.timestamp,
            };
            rows.push(stored.clone());
            Ok(stored)
        }

        async fn chat(&self, a: UserId, b: UserId) -> Result<Vec<Message>, MessagePersistenceError> {
            let mut chat: Vec<Message> = self
                .rows()
                .iter()
                .filter(|message| message.between(a, b))
                .cloned()
                .collect();
            chat.sort_by_key(|message| (message.timestamp, message.id));
            Ok(chat)
        }

        async fn contacts(&self, user: UserId) -> Result<Vec<User>, MessagePersistenceError> {
            let mut ids: Vec<i32> = self
                .rows()
                .iter()
                .filter_map(|message| {
                    if message.sender_user_id == user {
                        Some(message.receiver_user_id.get())
                    } else if message.receiver_user_id == user {
                        Some(message.sender_user_id.get())
                    } else {
                        None
                    }
                })
                .collect();
            ids.sort_unstable();
            ids.dedup();
            Ok(ids
                .into_iter()
                .map(|id| sample_user(id, "contact@example.com"))
                .collect())
        }
    }

    fn everyone_exists() -> MockUserRepository {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_user(id.get(), "someone@example.com"))));
        users
    }

    fn make_service(
        users: MockUserRepository,
    ) -> MessageService<InMemoryMessages, MockUserRepository> {
        MessageService::new(Arc::new(InMemoryMessages::default()), Arc::new(users))
    }

    fn message(from: i32, to: i32, content: &str, offset_secs: i64) -> NewMessage {
        NewMessage {
            sender_user_id: UserId::new(from),
            receiver_user_id: UserId::new(to),
            content: content.to_owned(),
            timestamp: Utc::now() + Duration::seconds(offset_secs),
        }
    }

    #[tokio::test]
    async fn sending_to_self_is_rejected() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().never();
        let service = make_service(users);

        let err = service.send(message(1, 1, "hi", 0)).await.expect_err("self");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), SELF_MESSAGE_MESSAGE);
    }

    #[tokio::test]
    async fn unknown_receiver_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().return_once(|_| Ok(None));
        let service = make_service(users);

        let err = service.send(message(1, 2, "hi", 0)).await.expect_err("unknown");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), RECEIVER_NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn chat_is_symmetric_and_excludes_third_parties() {
        let service = make_service(everyone_exists());
        service.send(message(1, 2, "hello", 0)).await.expect("sent");
        service.send(message(2, 1, "hey", 1)).await.expect("sent");
        service.send(message(1, 3, "other chat", 2)).await.expect("sent");
        service.send(message(3, 2, "also other", 3)).await.expect("sent");

        let from_a = service.chat(UserId::new(1), UserId::new(2)).await.expect("chat");
        let from_b = service.chat(UserId::new(2), UserId::new(1)).await.expect("chat");
        assert_eq!(from_a, from_b);
        let contents: Vec<&str> = from_a.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["hello", "hey"]);
    }

    #[tokio::test]
    async fn contacts_lists_each_partner_once() {
        let service = make_service(everyone_exists());
        service.send(message(1, 2, "a", 0)).await.expect("sent");
        service.send(message(2, 1, "b", 1)).await.expect("sent");
        service.send(message(3, 1, "c", 2)).await.expect("sent");

        let contacts = service.contacts(UserId::new(1)).await.expect("contacts");
        let ids: Vec<UserId> = contacts.iter().map(|user| user.id).collect();
        assert_eq!(ids, [UserId::new(2), UserId::new(3)]);
    }

    #[tokio::test]
    async fn chat_with_unknown_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().return_once(|_| Ok(None));
        let service = make_service(users);

        let err = service
            .chat(UserId::new(1), UserId::new(9))
            .await
            .expect_err("unknown");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
