//! Plain-text message handling: link extraction and submission.

use teloxide::types::ChatId;

use super::types::HandlerDeps;
use crate::core::error::AppResult;
use crate::tasks::Submission;

/// Reply when a message contains no acceptable link
pub const INVALID_LINK_TEXT: &str = "Please send a valid YouTube URL";

/// Handles one inbound text message.
///
/// Each extracted link is submitted independently; a failure for one link is
/// logged and does not affect the others. Returns the submissions that went
/// through, which is empty when the text held no valid link.
pub async fn handle_text(deps: &HandlerDeps, chat_id: ChatId, text: &str) -> AppResult<Vec<Submission>> {
    let links = match deps.links.extract(text) {
        Ok(links) => links,
        Err(e) => {
            log::debug!("No usable link from chat {}: {}", chat_id, e);
            deps.chat.send_text(chat_id, INVALID_LINK_TEXT).await?;
            return Ok(Vec::new());
        }
    };

    log::info!("Chat {} sent {} link(s)", chat_id, links.len());

    let mut submissions = Vec::with_capacity(links.len());
    for link in &links {
        match deps.dispatcher.submit(chat_id, link).await {
            Ok(submission) => submissions.push(submission),
            Err(e) => log::error!("Failed to process {} for chat {}: {}", link, chat_id, e),
        }
    }
    Ok(submissions)
}
