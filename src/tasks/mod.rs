//! Task submission and status tracking
//!
//! - `dispatcher`: sends the acknowledgment, creates the backend task and
//!   hands it to a poller
//! - `poller`: watches one task until it reaches a terminal state
//! - `messages`: the texts shown in the task's status message

pub mod dispatcher;
pub mod messages;
pub mod poller;

use teloxide::types::{ChatId, MessageId};

pub use dispatcher::{PollerHandle, Submission, TaskDispatcher};
pub use messages::StatusText;
pub use poller::{PollState, StatusPoller};

/// One accepted backend task and the chat message that reports on it.
///
/// Created once per successful submission and moved into exactly one poller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHandle {
    pub task_id: String,
    pub chat_id: ChatId,
    pub message_id: MessageId,
}
