// SPDX-License-Identifier: MPL-2.0
//! Boundary between the orchestration state machines and the page.
//!
//! Everything the lightbox and overlay do to the document (injecting markup,
//! toggling class hooks, driving native `<video>` elements, posting messages
//! to embedded players) goes through [`MediaHost`]. A browser shell implements
//! it on top of the DOM; [`RecordingHost`] implements it in memory.

mod recording;
mod tracker;

pub use recording::{HostCall, RecordingHost, VideoStatus};
pub use tracker::{AudioObservation, AudioTracker};

use crate::error::{HostError, PlayError};
use crate::media_state::Volume;
use crate::view::ViewNode;
use serde_json::Value;
use std::fmt;

/// Identifier of a node injected by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(String);

impl ElementId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The document body (scroll lock and `reels-mode` live here).
    #[must_use]
    pub fn body() -> Self {
        Self::new("body")
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derives a child id (`<self>-<suffix>`).
    #[must_use]
    pub fn child(&self, suffix: &str) -> Self {
        Self(format!("{}-{}", self.0, suffix))
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Network hints injected into the document head.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceHint {
    /// `<link rel="preconnect" href=origin>`
    Preconnect(String),
    /// `<link rel="preload" as="video" href=url>`
    Preload(String),
}

/// Native media element notifications forwarded by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementEventKind {
    /// Playback actually started (`playing`).
    Playing,
    /// Playback paused (`pause`), with the element's `currentTime`.
    Pause { current_time: f64 },
    /// `volumechange`, with the element's new state.
    VolumeChange { muted: bool, volume: f32 },
    /// `loadeddata` / `load`.
    Loaded,
    /// `error`.
    Failed,
}

/// An event raised by an element this crate injected.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementEvent {
    pub element: ElementId,
    pub kind: ElementEventKind,
}

impl ElementEvent {
    #[must_use]
    pub fn new(element: ElementId, kind: ElementEventKind) -> Self {
        Self { element, kind }
    }
}

/// Document operations required by the media surfaces.
///
/// Methods addressing a missing element are expected to be no-ops (or return
/// the corresponding error) rather than panic: callers re-query by id because
/// containers can disappear mid-animation.
pub trait MediaHost {
    /// Appends `node` to `parent`, or to the body when `parent` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::MissingElement`] when `parent` is not attached.
    fn mount(&mut self, parent: Option<&ElementId>, node: ViewNode) -> Result<(), HostError>;

    /// Replaces the element `target` (and its subtree) with `node`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::MissingElement`] when `target` is not attached.
    fn replace(&mut self, target: &ElementId, node: ViewNode) -> Result<(), HostError>;

    /// Removes `target` and its subtree.
    fn remove(&mut self, target: &ElementId);

    fn exists(&self, target: &ElementId) -> bool;

    fn set_class(&mut self, target: &ElementId, class: &str, enabled: bool);

    fn set_style(&mut self, target: &ElementId, property: &str, value: &str);

    fn set_text(&mut self, target: &ElementId, text: &str);

    /// Locks (or restores) page scrolling while an overlay is open.
    fn set_scroll_locked(&mut self, locked: bool);

    /// Calls `play()` on a native video and reports the promise outcome.
    ///
    /// # Errors
    ///
    /// Returns the rejection reason, most commonly [`PlayError::NotAllowed`].
    fn play(&mut self, video: &ElementId) -> Result<(), PlayError>;

    fn pause(&mut self, video: &ElementId);

    fn set_muted(&mut self, video: &ElementId, muted: bool);

    fn set_volume(&mut self, video: &ElementId, volume: Volume);

    /// Pauses, clears `src` and calls `load()` so the element drops its resources.
    fn release_media(&mut self, video: &ElementId);

    /// Fire-and-forget `contentWindow.postMessage(payload, '*')` on an iframe.
    ///
    /// # Errors
    ///
    /// Returns an error when the frame is gone or refuses the message.
    fn post_message(&mut self, frame: &ElementId, payload: &Value) -> Result<(), HostError>;

    fn add_resource_hint(&mut self, hint: ResourceHint);
}

/// Result of [`play_with_muted_fallback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Started with the requested mute state.
    Started,
    /// Refused at first, started after forcing `muted = true`.
    StartedMuted,
    /// Refused twice. The element was left muted and paused.
    Rejected,
    /// The element is gone.
    Missing,
}

impl PlayOutcome {
    #[must_use]
    pub fn started(self) -> bool {
        matches!(self, PlayOutcome::Started | PlayOutcome::StartedMuted)
    }

    /// Whether the fallback changed the element's `muted` flag.
    #[must_use]
    pub fn forced_muted(self) -> bool {
        matches!(self, PlayOutcome::StartedMuted | PlayOutcome::Rejected)
    }
}

/// Calls `play()`, retrying once forced muted when the first attempt is refused.
///
/// The second rejection is swallowed: the user can still tap to play.
pub fn play_with_muted_fallback(host: &mut dyn MediaHost, video: &ElementId) -> PlayOutcome {
    match host.play(video) {
        Ok(()) => PlayOutcome::Started,
        Err(PlayError::MissingElement(_)) => PlayOutcome::Missing,
        Err(err) => {
            tracing::debug!(element = %video, error = %err, "play rejected, retrying muted");
            host.set_muted(video, true);
            match host.play(video) {
                Ok(()) => PlayOutcome::StartedMuted,
                Err(err) => {
                    tracing::debug!(element = %video, error = %err, "muted play rejected");
                    PlayOutcome::Rejected
                }
            }
        }
    }
}

/// Pauses, mutes and releases a native video before its node goes away.
pub fn silence_video(host: &mut dyn MediaHost, video: &ElementId) {
    host.pause(video);
    host.set_muted(video, true);
    host.release_media(video);
}
