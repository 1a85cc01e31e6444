//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::messages::handle_text;
use super::types::{HandlerDeps, HandlerError};
use crate::telegram::bot::Command;
use crate::telegram::commands::handle_command;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// Commands are matched first; any other text that does not look like a
/// command goes to link handling.
///
/// # Arguments
/// * `deps` - Handler dependencies (task dispatcher, backend, chat sink, link policy)
///
/// # Returns
/// The complete handler tree for the bot
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_messages = deps;

    dptree::entry()
        // Command handler
        .branch(command_handler(deps_commands))
        // Message handler for URLs and text
        .branch(message_handler(deps_messages))
}

/// Handler for /start, /help and /status
fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                log::info!("Received command: {:?} from chat {}", cmd, msg.chat.id);

                if let Err(e) = handle_command(deps.chat.as_ref(), deps.backend.as_ref(), msg.chat.id, &cmd).await {
                    log::error!("Command {:?} failed for chat {}: {}", cmd, msg.chat.id, e);
                }
                Ok(())
            }
        },
    ))
}

/// Handler for plain text that may contain video links
fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.text().map(|text| !text.starts_with('/')).unwrap_or(false))
        .endpoint(move |msg: Message| {
            let deps = deps.clone();
            async move {
                let text = msg.text().unwrap_or_default();
                if let Err(e) = handle_text(&deps, msg.chat.id, text).await {
                    log::error!("Message handling failed for chat {}: {}", msg.chat.id, e);
                }
                Ok(())
            }
        })
}
