// SPDX-License-Identifier: MPL-2.0
//! Embed URL construction and static previews for third-party platforms.

use super::{classify, MediaKind};

/// Thumbnail shown for Instagram items (their previews need an API token).
pub const INSTAGRAM_ICON: &str = "assets/icons/instagram.svg";

/// Generic preview for items without a derivable thumbnail.
pub const PLACEHOLDER_THUMBNAIL: &str = "assets/icons/media-placeholder.svg";

/// Origins worth preconnecting to before any embed is on screen.
pub const EMBED_ORIGINS: &[&str] = &[
    "https://www.youtube.com",
    "https://i.ytimg.com",
    "https://www.instagram.com",
    "https://www.tiktok.com",
];

const YOUTUBE_ID_MARKERS: &[&str] = &["watch?v=", "&v=", "youtu.be/", "/shorts/", "/embed/", "/live/"];

/// A platform item whose id could be extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedTarget {
    YouTube { id: String },
    /// `reel` distinguishes `/reel/<id>` from `/p/<id>` posts.
    Instagram { id: String, reel: bool },
    TikTok { id: String },
}

impl EmbedTarget {
    /// Extracts the platform id from a page URL. `None` when the URL is not a
    /// supported embed or carries no recognizable id.
    #[must_use]
    pub fn from_url(url: &str) -> Option<Self> {
        match classify(url) {
            MediaKind::YouTube => youtube_id(url).map(|id| EmbedTarget::YouTube { id }),
            MediaKind::Instagram => instagram_id(url),
            MediaKind::TikTok => {
                segment_after(url, "/video/", |c| c.is_ascii_digit())
                    .map(|id| EmbedTarget::TikTok { id })
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> MediaKind {
        match self {
            EmbedTarget::YouTube { .. } => MediaKind::YouTube,
            EmbedTarget::Instagram { .. } => MediaKind::Instagram,
            EmbedTarget::TikTok { .. } => MediaKind::TikTok,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            EmbedTarget::YouTube { id }
            | EmbedTarget::Instagram { id, .. }
            | EmbedTarget::TikTok { id } => id,
        }
    }
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// The run of `accept` characters following the first occurrence of `marker`.
fn segment_after(url: &str, marker: &str, accept: impl Fn(char) -> bool) -> Option<String> {
    let start = url.find(marker)? + marker.len();
    let id: String = url[start..].chars().take_while(|c| accept(*c)).collect();
    (!id.is_empty()).then_some(id)
}

fn youtube_id(url: &str) -> Option<String> {
    YOUTUBE_ID_MARKERS
        .iter()
        .find_map(|marker| segment_after(url, marker, is_id_char))
}

fn instagram_id(url: &str) -> Option<EmbedTarget> {
    for (marker, reel) in [("/reel/", true), ("/reels/", true), ("/p/", false)] {
        if let Some(id) = segment_after(url, marker, is_id_char) {
            return Some(EmbedTarget::Instagram { id, reel });
        }
    }
    None
}

/// Builds the platform's embed URL with autoplay and the given mute policy.
#[must_use]
pub fn embed_url(target: &EmbedTarget, muted: bool) -> String {
    let mute = u8::from(muted);
    match target {
        EmbedTarget::YouTube { id } => format!(
            "https://www.youtube.com/embed/{id}?autoplay=1&mute={mute}&playsinline=1&enablejsapi=1&loop=1&playlist={id}&rel=0&modestbranding=1"
        ),
        EmbedTarget::Instagram { id, reel } => {
            let section = if *reel { "reel" } else { "p" };
            format!("https://www.instagram.com/{section}/{id}/embed/")
        }
        EmbedTarget::TikTok { id } => format!(
            "https://www.tiktok.com/player/v1/{id}?autoplay=1&muted={mute}&loop=1&controls=1"
        ),
    }
}

/// Static preview image for a media URL.
#[must_use]
pub fn thumbnail_url(url: &str) -> String {
    match classify(url) {
        MediaKind::Image => url.to_string(),
        MediaKind::YouTube => match youtube_id(url) {
            Some(id) => format!("https://img.youtube.com/vi/{id}/mqdefault.jpg"),
            None => PLACEHOLDER_THUMBNAIL.to_string(),
        },
        MediaKind::Instagram => INSTAGRAM_ICON.to_string(),
        _ => PLACEHOLDER_THUMBNAIL.to_string(),
    }
}
