//! Process-wide configuration
//!
//! Settings are layered once at startup and then passed around explicitly:
//! 1. built-in defaults
//! 2. optional TOML file (`--config`)
//! 3. legacy environment names (`TELEGRAM_BOT_TOKEN`, `BOT_TOKEN`, `BACKEND_URL`, `BOT_API_URL`)
//! 4. `YTRELAY_*` environment variables

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use log::LevelFilter;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::backend::TaskPreset;
use crate::core::error::ConfigError;
use crate::links::{LinkMode, LinkPolicy};

/// Prefix for environment overrides, e.g. `YTRELAY_POLL_INTERVAL_SECS=2`
pub const ENV_PREFIX: &str = "YTRELAY_";

/// Backend defaults, matching the docker-compose service name
pub mod backend {
    /// Base URL of the task API; `/tasks` is appended per request
    pub const DEFAULT_URL: &str = "http://app:8080/api/v1";

    /// Per-request timeout (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 10;
}

/// Polling defaults
pub mod polling {
    /// Delay between status checks (in seconds)
    pub const INTERVAL_SECS: u64 = 5;

    /// Maximum number of status checks (120 * 5s = 10 minutes)
    pub const MAX_ATTEMPTS: u32 = 120;
}

/// How a dispatched task's status poller is run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DispatchMode {
    /// Poll inside the message handler; the handler returns once the task is terminal
    Inline,
    /// Spawn the poller as a background task; the handler returns right away
    Detached,
}

/// Attempt budget and cadence for one status poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(polling::INTERVAL_SECS),
            max_attempts: polling::MAX_ATTEMPTS,
        }
    }
}

/// Serialized shape of the configuration, as seen by figment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSettings {
    pub bot_token: Option<String>,
    pub bot_api_url: Option<String>,
    pub backend_url: String,
    pub request_timeout_secs: u64,
    pub poll_interval_secs: u64,
    pub max_poll_attempts: u32,
    pub dispatch_mode: DispatchMode,
    pub link_mode: LinkMode,
    pub allow_trailing_params: bool,
    pub video_format: String,
    pub video_quality: String,
    pub video_resolution: String,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for RawSettings {
    fn default() -> Self {
        let preset = TaskPreset::default();
        Self {
            bot_token: None,
            bot_api_url: None,
            backend_url: backend::DEFAULT_URL.to_string(),
            request_timeout_secs: backend::REQUEST_TIMEOUT_SECS,
            poll_interval_secs: polling::INTERVAL_SECS,
            max_poll_attempts: polling::MAX_ATTEMPTS,
            dispatch_mode: DispatchMode::Detached,
            link_mode: LinkMode::Permissive,
            allow_trailing_params: false,
            video_format: preset.format,
            video_quality: preset.quality,
            video_resolution: preset.resolution,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

/// Validated, immutable runtime configuration.
#[derive(Debug)]
pub struct Settings {
    pub bot_token: Option<SecretString>,
    pub bot_api_url: Option<Url>,
    pub backend_url: Url,
    pub request_timeout: Duration,
    pub poll: PollSettings,
    pub dispatch_mode: DispatchMode,
    pub links: LinkPolicy,
    pub preset: TaskPreset,
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Layers every configuration source and validates the result.
    ///
    /// # Errors
    /// Returns `ConfigError` when a source cannot be parsed or a value is out of range.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let raw: RawSettings = Self::figment(config_file).extract()?;
        Self::from_raw(raw)
    }

    /// The provider chain used by [`Settings::load`].
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(RawSettings::default()));
        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }

        figment
            .merge(
                Env::raw()
                    .only(&["TELEGRAM_BOT_TOKEN", "BOT_TOKEN", "BACKEND_URL", "BOT_API_URL"])
                    .map(|key| {
                        if key.as_str().ends_with("BOT_TOKEN") || key.as_str().ends_with("bot_token") {
                            "bot_token".into()
                        } else {
                            key.as_str().to_ascii_lowercase().into()
                        }
                    }),
            )
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Validates raw values and converts them into runtime types.
    pub fn from_raw(raw: RawSettings) -> Result<Self, ConfigError> {
        let backend_url = parse_http_url("backend_url", &raw.backend_url)?;
        let bot_api_url = raw
            .bot_api_url
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_http_url("bot_api_url", s))
            .transpose()?;

        if raw.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_secs",
                reason: "must be at least 1 second".to_string(),
            });
        }
        if raw.max_poll_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_poll_attempts",
                reason: "must be at least 1".to_string(),
            });
        }

        let log_level = LevelFilter::from_str(raw.log_level.trim()).map_err(|_| ConfigError::InvalidValue {
            key: "log_level",
            reason: format!("unknown level '{}'", raw.log_level),
        })?;

        let bot_token = raw
            .bot_token
            .filter(|t| !t.trim().is_empty())
            .map(SecretString::from);

        Ok(Self {
            bot_token,
            bot_api_url,
            backend_url,
            request_timeout: Duration::from_secs(raw.request_timeout_secs),
            poll: PollSettings {
                interval: Duration::from_secs(raw.poll_interval_secs),
                max_attempts: raw.max_poll_attempts,
            },
            dispatch_mode: raw.dispatch_mode,
            links: LinkPolicy {
                mode: raw.link_mode,
                allow_trailing_params: raw.allow_trailing_params,
            },
            preset: TaskPreset {
                format: raw.video_format,
                quality: raw.video_quality,
                resolution: raw.video_resolution,
            },
            log_level,
            log_file: raw.log_file,
        })
    }

    /// Returns the bot token or the error `run` reports when it is absent.
    pub fn require_bot_token(&self) -> Result<&SecretString, ConfigError> {
        self.bot_token.as_ref().ok_or(ConfigError::MissingBotToken)
    }
}

fn parse_http_url(key: &'static str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|e| ConfigError::InvalidUrl {
        key,
        reason: format!("{} ({})", value, e),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl {
            key,
            reason: format!("{} (unsupported scheme: {})", value, url.scheme()),
        });
    }
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl {
            key,
            reason: format!("{} (cannot be used as a base URL)", value),
        });
    }

    Ok(url)
}
