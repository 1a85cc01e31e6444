use thiserror::Error;

use crate::backend::BackendError;

/// Centralized error type for the bot.
///
/// Every fallible path in a handler ends up here so the per-message boundary
/// can log one consistent value before making its best-effort user edit.
///
/// # Example
///
/// ```no_run
/// use ytrelay::core::error::AppError;
///
/// fn report(err: &AppError) {
///     log::error!("request failed: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Chat platform errors (send/edit)
    #[error("Chat error: {0}")]
    Chat(#[from] ChatError),

    /// Task backend errors
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

/// Errors raised while talking to the chat platform.
#[derive(Error, Debug)]
pub enum ChatError {
    /// Telegram Bot API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),
}

/// Errors raised while building [`Settings`](crate::core::config::Settings).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Layering or extraction failure (bad TOML, wrong value types)
    #[error(transparent)]
    Figment(#[from] Box<figment::Error>),

    /// A URL-valued key failed to parse or uses an unsupported scheme
    #[error("Invalid URL in '{key}': {reason}")]
    InvalidUrl { key: &'static str, reason: String },

    /// Any other out-of-range value
    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: &'static str, reason: String },

    /// `run` needs a bot token
    #[error("Bot token is not configured (set TELEGRAM_BOT_TOKEN or YTRELAY_BOT_TOKEN)")]
    MissingBotToken,
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Figment(Box::new(err))
    }
}
