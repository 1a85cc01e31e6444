//! ytrelay - Telegram front end for a YouTube processing backend
//!
//! The bot extracts video links from chat messages, submits them to the
//! backend task API and keeps one status message per task up to date until
//! the task finishes or the polling budget runs out.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging and formatting helpers
//! - `links`: link extraction and normalization
//! - `backend`: task API abstraction and its HTTP client
//! - `tasks`: submission and status polling
//! - `telegram`: bot construction, commands and the handler tree
//! - `cli`: command line interface

pub mod backend;
pub mod cli;
pub mod core;
pub mod links;
pub mod tasks;
pub mod telegram;

// Re-export commonly used types for convenience
pub use backend::{BackendError, HttpBackend, TaskBackend};
pub use crate::core::{AppError, AppResult, Settings};
pub use links::{ExtractedLink, LinkMode, LinkPolicy};
pub use tasks::{PollState, StatusPoller, Submission, TaskDispatcher, TaskHandle};
pub use telegram::{schema, ChatApi, HandlerDeps};
