//! YouTube link extraction and normalization
//!
//! Two policies:
//! - `strict`: the whole message must be exactly one watch or youtu.be link
//! - `permissive`: every embedded link is picked out of free-form text
//!
//! Both normalize to `https://www.youtube.com/watch?v=<id>` or
//! `https://youtu.be/<id>` and collapse links that name the same video.

use std::fmt;

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Length of a YouTube video id
pub const VIDEO_ID_LEN: usize = 11;

/// Exact watch link, optionally followed by more query parameters (group 2).
static STRICT_WATCH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i:https?://(?:www\.|m\.)?youtube\.com/watch\?v=)([A-Za-z0-9_-]+)(&\S*)?$")
        .expect("Failed to compile strict watch regex")
});

/// Exact short link, optionally followed by a query string (group 2).
static STRICT_SHORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i:https?://youtu\.be/)([A-Za-z0-9_-]+)(\?\S*)?$").expect("Failed to compile strict short regex")
});

/// Embedded youtube.com-family links; the scheme is optional.
static EMBEDDED_LONG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i:(?:https?://)?(?:www\.|m\.|music\.)?youtube(?:-nocookie)?\.com/(?:watch\?(?:[^\s#]*?&)?v=|embed/|v/|shorts/|live/))([A-Za-z0-9_-]+)",
    )
    .expect("Failed to compile embedded link regex")
});

/// Embedded youtu.be links; the scheme is optional.
static EMBEDDED_SHORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i:(?:https?://)?youtu\.be/)([A-Za-z0-9_-]+)").expect("Failed to compile embedded short regex")
});

/// Which link shapes a message may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LinkMode {
    Strict,
    Permissive,
}

/// Raised when a message holds no acceptable link.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("No supported YouTube link in message")]
pub struct InvalidLink;

/// A normalized, absolute link to a single video.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtractedLink {
    url: String,
    video_id: String,
}

impl ExtractedLink {
    fn watch(video_id: &str) -> Self {
        Self {
            url: format!("https://www.youtube.com/watch?v={}", video_id),
            video_id: video_id.to_string(),
        }
    }

    fn short(video_id: &str) -> Self {
        Self {
            url: format!("https://youtu.be/{}", video_id),
            video_id: video_id.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }
}

impl fmt::Display for ExtractedLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Link acceptance rules, built from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkPolicy {
    pub mode: LinkMode,
    /// Accept (and strip) query parameters after the id in strict mode
    pub allow_trailing_params: bool,
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self {
            mode: LinkMode::Permissive,
            allow_trailing_params: false,
        }
    }
}

impl LinkPolicy {
    pub fn strict(allow_trailing_params: bool) -> Self {
        Self {
            mode: LinkMode::Strict,
            allow_trailing_params,
        }
    }

    pub fn permissive() -> Self {
        Self::default()
    }

    /// Extracts normalized links from a message according to this policy.
    ///
    /// # Errors
    /// Returns `InvalidLink` when nothing acceptable was found.
    pub fn extract(&self, text: &str) -> Result<Vec<ExtractedLink>, InvalidLink> {
        let links = match self.mode {
            LinkMode::Strict => validate_strict(text, self.allow_trailing_params).map(|link| vec![link])?,
            LinkMode::Permissive => extract_embedded(text),
        };

        if links.is_empty() {
            return Err(InvalidLink);
        }
        Ok(links)
    }
}

/// Accepts the message only if the whole trimmed text is one supported link.
///
/// # Examples
/// ```
/// use ytrelay::links::validate_strict;
///
/// assert!(validate_strict("https://www.youtube.com/watch?v=dQw4w9WgXcQ", false).is_ok());
/// assert!(validate_strict("https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PL1", false).is_err());
/// assert!(validate_strict("https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PL1", true).is_ok());
/// assert!(validate_strict("https://youtu.be/https://youtu.be/dQw4w9WgXcQ", true).is_err());
/// ```
pub fn validate_strict(text: &str, allow_trailing_params: bool) -> Result<ExtractedLink, InvalidLink> {
    let text = text.trim();

    let (caps, build): (_, fn(&str) -> ExtractedLink) = if let Some(caps) = STRICT_WATCH.captures(text) {
        (caps, ExtractedLink::watch)
    } else if let Some(caps) = STRICT_SHORT.captures(text) {
        (caps, ExtractedLink::short)
    } else {
        return Err(InvalidLink);
    };

    let video_id = caps.get(1).map(|m| m.as_str()).ok_or(InvalidLink)?;
    if video_id.len() != VIDEO_ID_LEN {
        return Err(InvalidLink);
    }
    if caps.get(2).is_some() && !allow_trailing_params {
        return Err(InvalidLink);
    }

    Ok(build(video_id))
}

/// Scans free-form text for every supported link, in order of appearance.
///
/// Id tokens of the wrong length are skipped. Links to the same video collapse
/// into the first one seen, whichever host form it used.
pub fn extract_embedded(text: &str) -> Vec<ExtractedLink> {
    let long = EMBEDDED_LONG.captures_iter(text).filter_map(|caps| {
        let whole = caps.get(0)?;
        let id = caps.get(1)?.as_str();
        (id.len() == VIDEO_ID_LEN).then(|| (whole.start(), ExtractedLink::watch(id)))
    });
    let short = EMBEDDED_SHORT.captures_iter(text).filter_map(|caps| {
        let whole = caps.get(0)?;
        let id = caps.get(1)?.as_str();
        (id.len() == VIDEO_ID_LEN).then(|| (whole.start(), ExtractedLink::short(id)))
    });

    long.chain(short)
        .sorted_by_key(|(start, _)| *start)
        .map(|(_, link)| link)
        .unique_by(|link| link.video_id.clone())
        .collect()
}
