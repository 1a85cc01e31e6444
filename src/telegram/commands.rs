//! Replies to `/start`, `/help` and `/status`.

use indoc::indoc;
use teloxide::types::ChatId;

use super::bot::Command;
use super::chat::ChatApi;
use crate::backend::{BackendError, ProcessingStatus, TaskBackend};
use crate::core::error::AppResult;

const START_TEXT: &str = indoc! {"
    🎥 YouTube Video Downloader Bot

    Send me a YouTube URL and I'll download it for you!

    Commands:
    /start - Show this message
    /status - Check bot status
    /help - Show help information"};

const HELP_TEXT: &str = indoc! {"
    📖 Help - YouTube Video Downloader Bot

    How to use:
    1. Send me a YouTube URL (youtube.com or youtu.be)
    2. I'll start processing your video
    3. Wait for the video to be ready
    4. The video will be sent to you when complete

    Features:
    • Automatic video download and upload
    • Reuse of previously downloaded videos
    • Real-time processing status
    • Support for various video qualities

    Commands:
    /start - Show welcome message
    /status - Check bot and backend status
    /help - Show this help message"};

/// Shown when the backend answered the health check with an error status
pub const STATUS_REJECTED_TEXT: &str = "❌ Backend: Connection failed";
/// Shown when the backend could not be reached
pub const STATUS_UNAVAILABLE_TEXT: &str = "❌ Backend: Unavailable";

pub fn start_text() -> &'static str {
    START_TEXT
}

pub fn help_text() -> &'static str {
    HELP_TEXT
}

/// Renders a healthy backend's capacity report.
pub fn format_processing_status(status: &ProcessingStatus) -> String {
    format!(
        "🤖 Bot Status: Online\n🔄 Processing slots: {}/{}\n💾 Memory pressure: {}\n✅ Backend: Connected",
        status.currently_processing,
        status.total_slots(),
        status
            .memory_pressure
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or("UNKNOWN")
    )
}

/// Performs one live health check and renders the result.
pub async fn status_text(backend: &dyn TaskBackend) -> String {
    match backend.processing_status().await {
        Ok(status) => format_processing_status(&status),
        Err(e @ BackendError::Rejected { .. }) => {
            log::warn!("Backend health check rejected: {}", e);
            STATUS_REJECTED_TEXT.to_string()
        }
        Err(e) => {
            log::error!("Error checking backend status: {}", e);
            STATUS_UNAVAILABLE_TEXT.to_string()
        }
    }
}

/// Answers one command in `chat_id`.
pub async fn handle_command(
    chat: &dyn ChatApi,
    backend: &dyn TaskBackend,
    chat_id: ChatId,
    cmd: &Command,
) -> AppResult<()> {
    let reply = match cmd {
        Command::Start => start_text().to_string(),
        Command::Help => help_text().to_string(),
        Command::Status => status_text(backend).await,
    };
    chat.send_text(chat_id, &reply).await?;
    Ok(())
}
