//! Status polling for a single backend task.

use std::sync::Arc;

use super::messages::StatusText;
use super::TaskHandle;
use crate::backend::{TaskBackend, TaskResult, TaskState};
use crate::core::config::PollSettings;
use crate::telegram::ChatApi;

/// Where a poller currently is.
///
/// `Pending` and `Processing` are the only non-terminal states. `TimedOut` is
/// reached only when the attempt budget runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum PollState {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
    TimedOut,
}

impl PollState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, PollState::Pending | PollState::Processing)
    }
}

/// Polls one task and mirrors its progress into the handle's message.
///
/// The poller owns its handle and attempt counter; nothing is shared with
/// other pollers apart from the stateless clients.
pub struct StatusPoller {
    backend: Arc<dyn TaskBackend>,
    chat: Arc<dyn ChatApi>,
    handle: TaskHandle,
    settings: PollSettings,
}

impl StatusPoller {
    pub fn new(backend: Arc<dyn TaskBackend>, chat: Arc<dyn ChatApi>, handle: TaskHandle, settings: PollSettings) -> Self {
        Self {
            backend,
            chat,
            handle,
            settings,
        }
    }

    /// Polls until a terminal status or until `max_attempts` queries were made.
    ///
    /// Sleeps `interval` between attempts, never after the last one. Once a
    /// terminal text has been shown no further edits are made.
    pub async fn run(self) -> PollState {
        let task_id = self.handle.task_id.clone();
        log::info!(
            "Polling task {} (every {:?}, at most {} attempts)",
            task_id,
            self.settings.interval,
            self.settings.max_attempts
        );

        for attempt in 0..self.settings.max_attempts {
            if attempt > 0 {
                tokio::time::sleep(self.settings.interval).await;
            }

            if let Some(state) = self.poll_once(attempt).await {
                if state.is_terminal() {
                    log::info!("Task {} finished as {} after {} attempt(s)", task_id, state, attempt + 1);
                    return state;
                }
            }
        }

        log::warn!(
            "Task {} still running after {} attempts, giving up",
            task_id,
            self.settings.max_attempts
        );
        self.show(&StatusText::TimedOut).await;
        PollState::TimedOut
    }

    /// One status query. `None` means the attempt produced nothing usable.
    async fn poll_once(&self, attempt: u32) -> Option<PollState> {
        let task_id = &self.handle.task_id;
        let status = match self.backend.task_status(task_id).await {
            Ok(status) => status,
            Err(e) => {
                log::warn!("Status query {} for task {} failed: {}", attempt + 1, task_id, e);
                return None;
            }
        };

        match status.status {
            TaskState::Completed => {
                let text = self.completion_text().await;
                self.show(&text).await;
                Some(PollState::Completed)
            }
            TaskState::Failed => {
                self.show(&StatusText::Failed {
                    reason: status.error_message,
                })
                .await;
                Some(PollState::Failed)
            }
            TaskState::Cancelled => {
                self.show(&StatusText::Cancelled).await;
                Some(PollState::Cancelled)
            }
            TaskState::Pending | TaskState::Processing => {
                self.show(&StatusText::Processing {
                    task_id: task_id.clone(),
                    attempt,
                })
                .await;
                Some(if status.status == TaskState::Pending {
                    PollState::Pending
                } else {
                    PollState::Processing
                })
            }
            TaskState::Unknown => {
                log::warn!("Task {} reported an unrecognised status", task_id);
                None
            }
        }
    }

    async fn completion_text(&self) -> StatusText {
        match self.backend.task_results(&self.handle.task_id).await {
            Ok(results) => match TaskResult::select_primary(&results) {
                Some(primary) => StatusText::Completed {
                    file_name: primary.file_name.clone(),
                    size_bytes: primary.file_size_bytes,
                },
                None => StatusText::CompletedWithoutDetails,
            },
            Err(e) => {
                log::warn!("Could not list results of task {}: {}", self.handle.task_id, e);
                StatusText::CompletedWithoutDetails
            }
        }
    }

    /// Edits the status message; failures are logged and polling goes on.
    async fn show(&self, text: &StatusText) {
        if let Err(e) = self
            .chat
            .edit_text(self.handle.chat_id, self.handle.message_id, &text.to_message())
            .await
        {
            log::warn!(
                "Failed to update message for task {} in chat {}: {}",
                self.handle.task_id,
                self.handle.chat_id,
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!PollState::Pending.is_terminal());
        assert!(!PollState::Processing.is_terminal());
        for state in [
            PollState::Completed,
            PollState::Failed,
            PollState::Cancelled,
            PollState::TimedOut,
        ] {
            assert!(state.is_terminal(), "{} should be terminal", state);
        }
    }
}
