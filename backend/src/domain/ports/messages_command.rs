//! Driving port for sending messages.

use async_trait::async_trait;

use crate::domain::{Error, Message, NewMessage};

/// Domain use-case port for direct messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagesCommand: Send + Sync {
    /// Deliver a message to an existing user other than the sender.
    async fn send(&self, message: NewMessage) -> Result<Message, Error>;
}
