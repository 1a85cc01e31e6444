//! Task submission: acknowledgment, backend call and poller launch.

use std::sync::Arc;

use teloxide::types::{ChatId, MessageId};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use super::messages::StatusText;
use super::poller::{PollState, StatusPoller};
use super::TaskHandle;
use crate::backend::{BackendError, CreateTaskRequest, TaskBackend, TaskPreset};
use crate::core::config::{DispatchMode, PollSettings, Settings};
use crate::core::error::AppResult;
use crate::links::ExtractedLink;
use crate::telegram::ChatApi;

/// Detail shown when the backend could not be reached at all
const NO_RESPONSE_DETAIL: &str = "no response from backend";
/// Detail shown when an accepted task comes back without an id
const MISSING_TASK_ID_DETAIL: &str = "missing task id";

/// Outcome of [`TaskDispatcher::submit`].
#[derive(Debug)]
pub enum Submission {
    /// Backend refused the link; the user has been told why
    Rejected { detail: String },
    /// Backend answered from an earlier download; no polling needed
    Reused,
    /// Inline mode: the poller already ran to this state
    Completed(PollState),
    /// Detached mode: the poller runs in the background
    Detached(PollerHandle),
}

/// Control over a background poller.
#[derive(Debug)]
pub struct PollerHandle {
    task_id: String,
    cancel: CancellationToken,
    join: JoinHandle<Option<PollState>>,
}

impl PollerHandle {
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Stops this poller without touching any other.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Waits for the poller. `None` if it was cancelled or panicked.
    pub async fn join(self) -> Option<PollState> {
        match self.join.await {
            Ok(state) => state,
            Err(e) => {
                log::error!("Poller for task {} did not finish: {}", self.task_id, e);
                None
            }
        }
    }
}

/// Submits links to the backend and starts one poller per accepted task.
pub struct TaskDispatcher {
    backend: Arc<dyn TaskBackend>,
    chat: Arc<dyn ChatApi>,
    poll: PollSettings,
    mode: DispatchMode,
    preset: TaskPreset,
    tracker: TaskTracker,
    shutdown: CancellationToken,
}

impl TaskDispatcher {
    pub fn new(
        backend: Arc<dyn TaskBackend>,
        chat: Arc<dyn ChatApi>,
        poll: PollSettings,
        mode: DispatchMode,
        preset: TaskPreset,
    ) -> Self {
        Self {
            backend,
            chat,
            poll,
            mode,
            preset,
            tracker: TaskTracker::new(),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn from_settings(settings: &Settings, backend: Arc<dyn TaskBackend>, chat: Arc<dyn ChatApi>) -> Self {
        Self::new(
            backend,
            chat,
            settings.poll,
            settings.dispatch_mode,
            settings.preset.clone(),
        )
    }

    /// Number of background pollers still running.
    pub fn active_pollers(&self) -> usize {
        self.tracker.len()
    }

    /// Submits one link on behalf of `chat_id`.
    ///
    /// Always sends the acknowledgment first, then edits that same message
    /// exactly once with the submission result. Errors after the
    /// acknowledgment turn into a best-effort generic error edit before being
    /// returned.
    pub async fn submit(&self, chat_id: ChatId, link: &ExtractedLink) -> AppResult<Submission> {
        let message_id = self.chat.send_text(chat_id, &StatusText::Started.to_message()).await?;

        match self.dispatch(chat_id, message_id, link).await {
            Ok(submission) => Ok(submission),
            Err(e) => {
                log::error!("Processing of {} for chat {} failed: {}", link, chat_id, e);
                if let Err(edit_err) = self
                    .chat
                    .edit_text(chat_id, message_id, &StatusText::Error.to_message())
                    .await
                {
                    log::warn!("Could not report the failure to chat {}: {}", chat_id, edit_err);
                }
                Err(e)
            }
        }
    }

    async fn dispatch(&self, chat_id: ChatId, message_id: MessageId, link: &ExtractedLink) -> AppResult<Submission> {
        let request = CreateTaskRequest::new(link.as_str(), chat_id.0, &self.preset);

        let reply = match self.backend.create_task(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("Backend did not accept {} for chat {}: {}", link, chat_id, e);
                let detail = match e {
                    BackendError::Rejected { detail, .. } => detail,
                    BackendError::Transport(_) | BackendError::InvalidUrl(_) => NO_RESPONSE_DETAIL.to_string(),
                };
                return self.reject(chat_id, message_id, detail).await;
            }
        };

        if reply.is_reused() {
            log::info!("Reusing existing download of {} for chat {}", link, chat_id);
            self.chat
                .edit_text(chat_id, message_id, &StatusText::Reused.to_message())
                .await?;
            return Ok(Submission::Reused);
        }

        let task_id = match reply.download_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => id,
            None => {
                log::warn!("Backend accepted {} without returning a task id", link);
                return self.reject(chat_id, message_id, MISSING_TASK_ID_DETAIL.to_string()).await;
            }
        };

        log::info!("Task {} created for {} (chat {})", task_id, link, chat_id);
        self.chat
            .edit_text(
                chat_id,
                message_id,
                &StatusText::Queued {
                    task_id: task_id.clone(),
                }
                .to_message(),
            )
            .await?;

        let handle = TaskHandle {
            task_id,
            chat_id,
            message_id,
        };
        Ok(self.start_poller(handle).await)
    }

    async fn reject(&self, chat_id: ChatId, message_id: MessageId, detail: String) -> AppResult<Submission> {
        let text = StatusText::Rejected { detail: detail.clone() };
        self.chat.edit_text(chat_id, message_id, &text.to_message()).await?;
        Ok(Submission::Rejected { detail })
    }

    async fn start_poller(&self, handle: TaskHandle) -> Submission {
        let task_id = handle.task_id.clone();
        let poller = StatusPoller::new(
            Arc::clone(&self.backend),
            Arc::clone(&self.chat),
            handle,
            self.poll,
        );

        match self.mode {
            DispatchMode::Inline => Submission::Completed(poller.run().await),
            DispatchMode::Detached => {
                let cancel = self.shutdown.child_token();
                let token = cancel.clone();
                let id = task_id.clone();
                let join = self.tracker.spawn(async move {
                    tokio::select! {
                        state = poller.run() => Some(state),
                        _ = token.cancelled() => {
                            log::info!("Polling of task {} cancelled", id);
                            None
                        }
                    }
                });
                Submission::Detached(PollerHandle { task_id, cancel, join })
            }
        }
    }

    /// Cancels every background poller and waits for them to stop.
    pub async fn shutdown(&self) {
        let active = self.tracker.len();
        if active > 0 {
            log::info!("Stopping {} background poller(s)", active);
        }
        self.shutdown.cancel();
        self.tracker.close();
        self.tracker.wait().await;
    }
}
