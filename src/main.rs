use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use teloxide::prelude::*;

use ytrelay::backend::{HttpBackend, TaskBackend};
use ytrelay::cli::{Cli, Commands};
use ytrelay::core::{init_logger, install_panic_hook, log_startup_configuration, Settings};
use ytrelay::links::LinkPolicy;
use ytrelay::tasks::TaskDispatcher;
use ytrelay::telegram::commands::status_text;
use ytrelay::telegram::{create_bot, schema, setup_bot_commands, ChatApi, HandlerDeps};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (configuration, logging, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Route panics in detached pollers through the logger
    install_panic_hook();

    // Load environment variables from .env if present
    let _ = dotenv();

    let mut settings = Settings::load(cli.config.as_deref())?;

    // Initialize logger (console, plus file when configured)
    init_logger(settings.log_level, settings.log_file.as_deref())?;

    // Dispatch to appropriate command
    match cli.command {
        Some(Commands::Run { dispatch_mode }) => {
            if let Some(mode) = dispatch_mode {
                settings.dispatch_mode = mode;
            }
            run_bot(settings).await
        }
        Some(Commands::CheckUrl {
            text,
            strict,
            allow_trailing_params,
        }) => {
            let policy = if strict {
                LinkPolicy::strict(allow_trailing_params)
            } else {
                settings.links
            };
            run_check_url(&text, policy)
        }
        Some(Commands::Status) => run_status(&settings).await,
        None => {
            // No command specified - default to running the bot
            log::info!("No command specified, running bot in default mode");
            run_bot(settings).await
        }
    }
}

/// Run the bot until Ctrl-C, then stop every background poller
async fn run_bot(settings: Settings) -> Result<()> {
    log_startup_configuration(&settings);

    let bot = create_bot(&settings)?;
    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to set bot commands: {}", e);
    }

    let backend: Arc<dyn TaskBackend> = Arc::new(HttpBackend::from_settings(&settings)?);
    let chat: Arc<dyn ChatApi> = Arc::new(bot.clone());
    let dispatcher = Arc::new(TaskDispatcher::from_settings(
        &settings,
        Arc::clone(&backend),
        Arc::clone(&chat),
    ));
    let deps = HandlerDeps::new(Arc::clone(&dispatcher), backend, chat, settings.links);

    log::info!("Bot started, waiting for messages");
    Dispatcher::builder(bot, schema(deps))
        .error_handler(LoggingErrorHandler::with_custom_text("An error has occurred in the dispatcher"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("Dispatcher shutdown gracefully");
    dispatcher.shutdown().await;
    Ok(())
}

/// Print the normalized links a message would be submitted with
fn run_check_url(text: &str, policy: LinkPolicy) -> Result<()> {
    let links = policy
        .extract(text)
        .map_err(|e| anyhow::anyhow!("{} ({} mode)", e, policy.mode))?;

    for link in links {
        println!("{}\t{}", link.video_id(), link);
    }
    Ok(())
}

/// One live health check against the backend
async fn run_status(settings: &Settings) -> Result<()> {
    let backend = HttpBackend::from_settings(settings)?;
    log::info!("Checking backend at {}", backend.base_url());
    println!("{}", status_text(&backend).await);
    Ok(())
}
