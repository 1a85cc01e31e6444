//! Recording chat sink
//!
//! Records every send and edit attempt, including the ones it was told to fail.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use teloxide::types::{ChatId, MessageId};
use teloxide::{ApiError, RequestError};
use ytrelay::core::ChatError;
use ytrelay::telegram::ChatApi;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCall {
    Send { chat_id: ChatId, text: String },
    Edit { chat_id: ChatId, message_id: MessageId, text: String },
}

pub struct RecordingChat {
    calls: Mutex<Vec<ChatCall>>,
    next_message_id: AtomicI32,
    fail_sends: AtomicBool,
    fail_edits: AtomicBool,
}

impl Default for RecordingChat {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_message_id: AtomicI32::new(100),
            fail_sends: AtomicBool::new(false),
            fail_edits: AtomicBool::new(false),
        }
    }
}

impl RecordingChat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_sends() -> Self {
        let chat = Self::default();
        chat.fail_sends.store(true, Ordering::SeqCst);
        chat
    }

    pub fn failing_edits() -> Self {
        let chat = Self::default();
        chat.fail_edits.store(true, Ordering::SeqCst);
        chat
    }

    pub fn calls(&self) -> Vec<ChatCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ChatCall::Send { text, .. } => Some(text),
                ChatCall::Edit { .. } => None,
            })
            .collect()
    }

    pub fn edited_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ChatCall::Edit { text, .. } => Some(text),
                ChatCall::Send { .. } => None,
            })
            .collect()
    }

    /// Edits aimed at one message, in order.
    pub fn edits_of(&self, message_id: MessageId) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ChatCall::Edit {
                    message_id: id, text, ..
                } if id == message_id => Some(text),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ChatApi for RecordingChat {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageId, ChatError> {
        self.calls.lock().unwrap().push(ChatCall::Send {
            chat_id,
            text: text.to_string(),
        });
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(ChatError::Telegram(RequestError::Api(ApiError::BotBlocked)));
        }
        Ok(MessageId(self.next_message_id.fetch_add(1, Ordering::SeqCst)))
    }

    async fn edit_text(&self, chat_id: ChatId, message_id: MessageId, text: &str) -> Result<(), ChatError> {
        self.calls.lock().unwrap().push(ChatCall::Edit {
            chat_id,
            message_id,
            text: text.to_string(),
        });
        if self.fail_edits.load(Ordering::SeqCst) {
            return Err(ChatError::Telegram(RequestError::Api(ApiError::MessageToEditNotFound)));
        }
        Ok(())
    }
}
