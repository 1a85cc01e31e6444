//! User-facing status texts for a single task message.

use crate::core::utils::{format_size_mib, progress_dots};

/// Fallback name when the backend does not report one
const DEFAULT_FILE_NAME: &str = "video";

/// Every text the bot can put into a task's status message.
///
/// The message is sent once as [`StatusText::Started`] and then edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusText {
    /// Acknowledgment sent before the backend is contacted
    Started,
    /// Backend refused the submission
    Rejected { detail: String },
    /// Backend answered from a previous download
    Reused,
    /// Task accepted, polling about to start
    Queued { task_id: String },
    /// Non-terminal poll result
    Processing { task_id: String, attempt: u32 },
    Completed {
        file_name: Option<String>,
        size_bytes: Option<u64>,
    },
    /// Completed but the results could not be listed
    CompletedWithoutDetails,
    Failed { reason: Option<String> },
    Cancelled,
    TimedOut,
    /// Unexpected internal failure
    Error,
}

impl StatusText {
    pub fn to_message(&self) -> String {
        match self {
            StatusText::Started => "🔄 Processing started...".to_string(),
            StatusText::Rejected { detail } => {
                format!("❌ Failed to start processing: {}. Please try again.", detail)
            }
            StatusText::Reused => "✅ Video ready! (Reused existing download)".to_string(),
            StatusText::Queued { task_id } => format!("🔄 Processing... Task ID: {}", task_id),
            StatusText::Processing { task_id, attempt } => {
                format!("🔄 Processing{} Task ID: {}", progress_dots(*attempt), task_id)
            }
            StatusText::Completed { file_name, size_bytes } => {
                let name = file_name
                    .as_deref()
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or(DEFAULT_FILE_NAME);
                match format_size_mib(*size_bytes) {
                    Some(size) => format!("✅ Video ready! ({})\n📁 {}", size, name),
                    None => format!("✅ Video ready!\n📁 {}", name),
                }
            }
            StatusText::CompletedWithoutDetails => "✅ Video ready!".to_string(),
            StatusText::Failed { reason } => {
                let reason = reason
                    .as_deref()
                    .filter(|r| !r.trim().is_empty())
                    .unwrap_or("Unknown error");
                format!("❌ Processing failed: {}", reason)
            }
            StatusText::Cancelled => "❌ Processing was cancelled".to_string(),
            StatusText::TimedOut => "⏰ Processing is taking longer than expected. Please check back later.".to_string(),
            StatusText::Error => "❌ An error occurred while processing your request.".to_string(),
        }
    }
}
