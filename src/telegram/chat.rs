//! Chat sink used by the dispatcher and pollers.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::MessageId;

use crate::core::error::ChatError;

/// The two chat operations task reporting needs.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Sends a new text message and returns its id for later edits.
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageId, ChatError>;

    /// Replaces the text of a message previously sent by the bot.
    async fn edit_text(&self, chat_id: ChatId, message_id: MessageId, text: &str) -> Result<(), ChatError>;
}

#[async_trait]
impl ChatApi for Bot {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageId, ChatError> {
        let message = self.send_message(chat_id, text).await?;
        Ok(message.id)
    }

    async fn edit_text(&self, chat_id: ChatId, message_id: MessageId, text: &str) -> Result<(), ChatError> {
        match self.edit_message_text(chat_id, message_id, text).await {
            Ok(_) => Ok(()),
            // Same text twice in a row is not a delivery failure
            Err(e) if e.to_string().contains("message is not modified") => {
                log::debug!("Message {} in chat {} already up to date", message_id.0, chat_id);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
