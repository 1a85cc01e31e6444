use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::config::DispatchMode;

#[derive(Parser, Debug)]
#[command(name = "ytrelay")]
#[command(author, version, about = "Telegram bot that relays YouTube links to a processing backend", long_about = None)]
pub struct Cli {
    /// Optional TOML configuration file, layered under the environment
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot (default when no command is given)
    Run {
        /// Override how pollers run: inline or detached
        #[arg(long, value_name = "MODE")]
        dispatch_mode: Option<DispatchMode>,
    },

    /// Extract and print the links a message would be submitted with
    CheckUrl {
        /// Message text to check
        text: String,

        /// Require the whole text to be exactly one watch or short link
        #[arg(long)]
        strict: bool,

        /// In strict mode, accept extra query parameters after the video id
        #[arg(long, requires = "strict")]
        allow_trailing_params: bool,
    },

    /// Query the backend once and print its processing status
    Status,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
