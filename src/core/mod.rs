//! Core utilities, configuration, errors, and logging

pub mod config;
pub mod error;
pub mod logging;
pub mod utils;

// Re-exports for convenience
pub use config::{DispatchMode, PollSettings, Settings};
pub use error::{AppError, AppResult, ChatError, ConfigError};
pub use logging::{init_logger, install_panic_hook, log_startup_configuration};
