// SPDX-License-Identifier: MPL-2.0
//! Media item classification.
//!
//! A media item is just a URL string. Its kind is a pure function of that
//! string, computed at render time by [`classify`].

pub mod embed;
pub mod intent;
pub mod window;

pub use embed::{embed_url, thumbnail_url, EmbedTarget, EMBED_ORIGINS};
pub use intent::PlaybackIntent;

use url::Url;

/// Represents the ways a media URL can be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    /// A direct video file played by a native `<video>` element.
    Video,
    YouTube,
    Instagram,
    TikTok,
    /// Recognized but not embeddable; rendered as a placeholder.
    Twitter,
}

impl MediaKind {
    /// Third-party players living in a cross-origin iframe.
    #[must_use]
    pub fn is_embed(self) -> bool {
        matches!(
            self,
            MediaKind::YouTube | MediaKind::Instagram | MediaKind::TikTok
        )
    }

    /// Kinds with a timeline that can play, pause and make sound.
    #[must_use]
    pub fn is_playable(self) -> bool {
        self == MediaKind::Video || self.is_embed()
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::YouTube => "youtube",
            MediaKind::Instagram => "instagram",
            MediaKind::TikTok => "tiktok",
            MediaKind::Twitter => "twitter",
        }
    }
}

/// How a media URL is put on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    Image,
    /// Native `<video>`.
    Video,
    /// Third-party player in an iframe.
    Frame,
    /// Caption in place of media that cannot be shown.
    Placeholder,
}

impl Presentation {
    /// Presentation of `url`. Platform URLs without an extractable id and
    /// Twitter/X links become placeholders.
    #[must_use]
    pub fn of(url: &str) -> Self {
        match classify(url) {
            MediaKind::Image => Presentation::Image,
            MediaKind::Video => Presentation::Video,
            kind if kind.is_embed() && EmbedTarget::from_url(url).is_some() => Presentation::Frame,
            _ => Presentation::Placeholder,
        }
    }

    /// Has a timeline that can play and make sound.
    #[must_use]
    pub fn is_playable(self) -> bool {
        matches!(self, Presentation::Video | Presentation::Frame)
    }
}

/// Supported media extensions
pub mod extensions {
    /// Video file extensions played natively.
    pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "m4v", "mov", "webm", "ogg", "ogv", "mkv", "avi"];
}

/// Host and path of a URL, lowercased host without a leading `www.`.
///
/// Relative or malformed URLs fall back to a best-effort split of the raw string.
pub(crate) fn host_and_path(raw: &str) -> (String, String) {
    if let Ok(url) = Url::parse(raw) {
        let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
        let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
        return (host, url.path().to_string());
    }
    let without_scheme = raw.split_once("://").map_or(raw, |(_, rest)| rest);
    let without_scheme = without_scheme.strip_prefix("//").unwrap_or(without_scheme);
    let (host, path) = match without_scheme.find('/') {
        Some(idx) if without_scheme[..idx].contains('.') => {
            (&without_scheme[..idx], &without_scheme[idx..])
        }
        _ => ("", without_scheme),
    };
    let host = host.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    let path = path.split(['?', '#']).next().unwrap_or_default().to_string();
    (host, path)
}

/// Whether `host` is `domain` or one of its subdomains.
pub(crate) fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

fn has_video_extension(path: &str) -> bool {
    path.rsplit_once('.').is_some_and(|(_, ext)| {
        !ext.contains('/')
            && extensions::VIDEO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
    })
}

/// Classifies a media URL.
///
/// Priority: Instagram post/reel, TikTok, YouTube, Twitter/X, known video
/// extension, and finally image.
#[must_use]
pub fn classify(url: &str) -> MediaKind {
    let (host, path) = host_and_path(url.trim());

    if host_matches(&host, "instagram.com") && (path.contains("/reel/") || path.contains("/p/")) {
        return MediaKind::Instagram;
    }
    if host_matches(&host, "tiktok.com") {
        return MediaKind::TikTok;
    }
    if host_matches(&host, "youtube.com")
        || host_matches(&host, "youtu.be")
        || host_matches(&host, "youtube-nocookie.com")
    {
        return MediaKind::YouTube;
    }
    if host_matches(&host, "twitter.com") || host_matches(&host, "x.com") {
        return MediaKind::Twitter;
    }
    if has_video_extension(&path) {
        return MediaKind::Video;
    }
    MediaKind::Image
}
