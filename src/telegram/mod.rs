//! Telegram bot integration and handlers

pub mod bot;
pub mod chat;
pub mod commands;
pub mod handlers;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use chat::ChatApi;
pub use handlers::{handle_text, schema, HandlerDeps, HandlerError};
