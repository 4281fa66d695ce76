// SPDX-License-Identifier: MPL-2.0
//! Per-item record of explicit user actions.
//!
//! Once the user pauses or mutes something themselves, automatic play/unmute
//! attempts leave it alone until the user navigates away and back.

/// Explicit user playback decisions for one rendered item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackIntent {
    /// The user paused a video that was actually playing.
    pub user_paused: bool,
    /// The user muted (or zeroed the volume of) the item.
    pub user_muted: bool,
    /// The element reported `playing` at least once since it was rendered.
    seen_playing: bool,
}

impl PlaybackIntent {
    /// Whether automatic commands must back off entirely.
    #[must_use]
    pub fn blocks_automation(&self) -> bool {
        self.user_paused || self.user_muted
    }

    pub fn record_playing(&mut self) {
        self.seen_playing = true;
    }

    /// Records a `pause` event. Only counts as manual when the element had
    /// been playing and got past `min_secs`; autoplay blocks pause at ~0.
    ///
    /// Returns whether the pause was treated as manual.
    pub fn record_pause(&mut self, current_time: f64, min_secs: f64) -> bool {
        if self.seen_playing && current_time > min_secs {
            self.user_paused = true;
        }
        self.user_paused
    }
}
