//! Telegram bot handler tree configuration
//!
//! This module provides the main dispatcher schema for the Telegram bot.
//! The handlers are organized in a testable way, allowing integration tests
//! to drive the same code paths as production without a live dispatcher.

mod messages;
mod schema;
mod types;

pub use messages::{handle_text, INVALID_LINK_TEXT};
pub use schema::schema;
pub use types::{HandlerDeps, HandlerError};
