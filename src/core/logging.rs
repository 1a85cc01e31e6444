//! Logging initialization
//!
//! This module provides:
//! - Logger initialization (console, plus file when configured)
//! - A panic hook that routes panics through the logger
//! - A startup summary of the effective configuration

use std::fs::File;
use std::path::Path;

use anyhow::Result;
use simplelog::*;

use crate::core::config::Settings;

/// Initialize logger for console output and, optionally, a log file
///
/// # Arguments
/// * `level` - Maximum level to emit
/// * `log_file_path` - Path to the log file, if file logging is wanted
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to create the file or a logger was already installed
pub fn init_logger(level: LevelFilter, log_file_path: Option<&Path>) -> Result<()> {
    let config = ConfigBuilder::new()
        .add_filter_allow_str("ytrelay")
        .add_filter_allow_str("teloxide")
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];

    if let Some(path) = log_file_path {
        let log_file = File::create(path)
            .map_err(|e| anyhow::anyhow!("Failed to create log file {}: {}", path.display(), e))?;
        loggers.push(WriteLogger::new(level, config, log_file));
    }

    CombinedLogger::init(loggers).map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs panics instead of letting them vanish inside detached tasks.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        if let Some(msg) = panic_info.payload().downcast_ref::<&str>() {
            log::error!("Panic message: {}", msg);
        }
    }));
}

/// Logs the effective configuration at startup. The bot token is never printed.
pub fn log_startup_configuration(settings: &Settings) {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("Backend: {}", settings.backend_url);
    if let Some(ref api_url) = settings.bot_api_url {
        log::info!("Bot API: {}", api_url);
    }
    log::info!(
        "Polling: every {:?}, up to {} attempts, {} mode",
        settings.poll.interval,
        settings.poll.max_attempts,
        settings.dispatch_mode
    );
    log::info!(
        "Links: {} mode (trailing params {})",
        settings.links.mode,
        if settings.links.allow_trailing_params {
            "allowed"
        } else {
            "rejected"
        }
    );
    log::info!(
        "Preset: {} {} ({})",
        settings.preset.format,
        settings.preset.quality,
        settings.preset.resolution
    );
    if settings.bot_token.is_some() {
        log::info!("Bot token: configured");
    } else {
        log::warn!("Bot token: not set");
    }
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}
