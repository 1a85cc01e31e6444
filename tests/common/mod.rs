//! Common test utilities
//!
//! This module is shared across all integration tests

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use teloxide::types::{ChatId, MessageId};
use ytrelay::backend::{TaskBackend, TaskPreset};
use ytrelay::core::{DispatchMode, PollSettings};
use ytrelay::tasks::{TaskDispatcher, TaskHandle};
use ytrelay::telegram::ChatApi;

use crate::mocks::{MockBackend, RecordingChat};

pub const TEST_CHAT: ChatId = ChatId(42);
pub const TEST_MESSAGE: MessageId = MessageId(7);

/// No delay between attempts, so polling tests run instantly
pub fn fast_polling(max_attempts: u32) -> PollSettings {
    PollSettings {
        interval: Duration::ZERO,
        max_attempts,
    }
}

pub fn test_handle(task_id: &str) -> TaskHandle {
    TaskHandle {
        task_id: task_id.to_string(),
        chat_id: TEST_CHAT,
        message_id: TEST_MESSAGE,
    }
}

/// Shared doubles plus a dispatcher wired to them.
pub struct Harness {
    pub backend: Arc<MockBackend>,
    pub chat: Arc<RecordingChat>,
    pub dispatcher: TaskDispatcher,
}

impl Harness {
    pub fn new(backend: MockBackend, chat: RecordingChat, mode: DispatchMode, poll: PollSettings) -> Self {
        let backend = Arc::new(backend);
        let chat = Arc::new(chat);
        let dispatcher = TaskDispatcher::new(
            Arc::clone(&backend) as Arc<dyn TaskBackend>,
            Arc::clone(&chat) as Arc<dyn ChatApi>,
            poll,
            mode,
            TaskPreset::default(),
        );
        Self {
            backend,
            chat,
            dispatcher,
        }
    }

    pub fn inline(backend: MockBackend) -> Self {
        Self::new(backend, RecordingChat::new(), DispatchMode::Inline, fast_polling(5))
    }
}
