//! Task backend abstraction
//!
//! The bot never downloads anything itself; it asks the processing backend to
//! create a task and then watches it. `TaskBackend` is the seam between the
//! Telegram side and that API, with `HttpBackend` as the production client.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use http::HttpBackend;

/// Errors from the task backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Network failure, timeout, or an undecodable body
    #[error("Backend transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status or `success = false`
    #[error("Backend rejected request (status {status}): {detail}")]
    Rejected { status: u16, detail: String },

    /// An endpoint URL could not be built from the configured base
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}

impl BackendError {
    /// Transport problems are transient; everything else is a definitive answer.
    pub fn is_transport(&self) -> bool {
        matches!(self, BackendError::Transport(_))
    }
}

/// Output format presets sent with every new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPreset {
    pub format: String,
    pub quality: String,
    pub resolution: String,
}

impl Default for TaskPreset {
    fn default() -> Self {
        Self {
            format: "mp4".to_string(),
            quality: "720p".to_string(),
            resolution: "720p".to_string(),
        }
    }
}

/// `POST /tasks` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub url: String,
    /// Chat id as text, the backend stores it as a string
    pub chat_id: String,
    pub format: String,
    pub quality: String,
    pub resolution: String,
}

impl CreateTaskRequest {
    pub fn new(url: impl Into<String>, chat_id: i64, preset: &TaskPreset) -> Self {
        Self {
            url: url.into(),
            chat_id: chat_id.to_string(),
            format: preset.format.clone(),
            quality: preset.quality.clone(),
            resolution: preset.resolution.clone(),
        }
    }
}

/// `POST /tasks` reply. Error replies carry the same shape with `success = false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateTaskResponse {
    pub success: bool,
    pub download_id: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl CreateTaskResponse {
    /// Whether the backend answered from a previous download instead of queueing work.
    pub fn is_reused(&self) -> bool {
        self.message
            .as_deref()
            .map(|m| {
                let m = m.to_lowercase();
                m.contains("reusing existing result") || m.contains("completed by reusing")
            })
            .unwrap_or(false)
    }

    /// Best available human-readable failure detail.
    pub fn failure_detail(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Task lifecycle as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// `GET /tasks/{id}` reply (only the fields the bot reads).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusResponse {
    pub status: TaskState,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// One artifact from `GET /tasks/{id}/results`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskResult {
    pub file_name: Option<String>,
    pub file_size_bytes: Option<u64>,
    pub is_primary_result: Option<bool>,
}

impl TaskResult {
    /// Picks the result flagged primary, or the first one if none is.
    pub fn select_primary(results: &[TaskResult]) -> Option<&TaskResult> {
        results
            .iter()
            .find(|r| r.is_primary_result.unwrap_or(false))
            .or_else(|| results.first())
    }
}

/// `GET /tasks/processing/status` reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessingStatus {
    pub available_slots: u32,
    pub currently_processing: u32,
    pub memory_pressure: Option<String>,
    pub max_concurrent_tasks: Option<u32>,
    pub has_enough_memory: Option<bool>,
}

impl ProcessingStatus {
    /// Slots in use plus slots free.
    pub fn total_slots(&self) -> u32 {
        self.currently_processing.saturating_add(self.available_slots)
    }
}

/// Operations the bot needs from the processing backend.
///
/// Every call is a single bounded request; implementations hold no per-task state.
#[async_trait]
pub trait TaskBackend: Send + Sync {
    /// Submits a link for processing.
    async fn create_task(&self, request: &CreateTaskRequest) -> Result<CreateTaskResponse, BackendError>;

    /// Reads the current state of a task.
    async fn task_status(&self, task_id: &str) -> Result<TaskStatusResponse, BackendError>;

    /// Lists the artifacts of a completed task.
    async fn task_results(&self, task_id: &str) -> Result<Vec<TaskResult>, BackendError>;

    /// Reads aggregate capacity and memory pressure.
    async fn processing_status(&self) -> Result<ProcessingStatus, BackendError>;
}
