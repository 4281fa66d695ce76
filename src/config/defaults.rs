// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **Audio**: Shared preferred volume
//! - **Lightbox**: Idle auto-hide, gesture thresholds, loader fallbacks
//! - **Pulse**: Unmute/play burst cadence
//! - **Overlay**: Reels overlay settle delay, fullscreen polling, thumbnails
//! - **Intent**: Heuristics separating user actions from autoplay side effects

// ==========================================================================
// Audio Defaults
// ==========================================================================

/// Default preferred volume (0.0 to 1.0). Low enough not to startle.
pub const DEFAULT_VOLUME: f32 = 0.3;

/// Minimum volume level.
pub const MIN_VOLUME: f32 = 0.0;

/// Maximum volume level.
pub const MAX_VOLUME: f32 = 1.0;

// ==========================================================================
// Lightbox Defaults
// ==========================================================================

/// Quiet period before lightbox controls hide (milliseconds).
pub const DEFAULT_IDLE_HIDE_MS: u64 = 2_000;

/// Horizontal drag distance that triggers next/prev (pixels).
pub const DEFAULT_SWIPE_THRESHOLD_PX: f32 = 50.0;

/// Downward drag distance that dismisses the lightbox (pixels).
pub const DEFAULT_DISMISS_THRESHOLD_PX: f32 = 100.0;

/// Motion needed before a drag locks onto an axis (pixels).
pub const DEFAULT_AXIS_LOCK_PX: f32 = 10.0;

/// Loader fallback for images (milliseconds).
pub const DEFAULT_IMAGE_LOAD_TIMEOUT_MS: u64 = 3_000;

/// Loader fallback for native video files (milliseconds).
pub const DEFAULT_VIDEO_LOAD_TIMEOUT_MS: u64 = 6_000;

/// Loader fallback for third-party embeds (milliseconds).
pub const DEFAULT_EMBED_LOAD_TIMEOUT_MS: u64 = 10_000;

/// Number of items kept mounted around the current one (current ± 2).
pub const RENDER_WINDOW_SIZE: usize = 5;

// ==========================================================================
// Pulse Defaults
// ==========================================================================

/// Total pulse attempts for the lightbox: one immediate plus nine repeats.
pub const DEFAULT_PULSE_ATTEMPTS: u32 = 10;

/// Interval between lightbox pulse attempts (milliseconds).
pub const DEFAULT_PULSE_INTERVAL_MS: u64 = 400;

// ==========================================================================
// Overlay Defaults
// ==========================================================================

/// Delay between opening the overlay and starting playback (milliseconds).
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 350;

/// How often the overlay checks whether its fullscreen lightbox closed (milliseconds).
pub const DEFAULT_FULLSCREEN_POLL_MS: u64 = 500;

/// Maximum thumbnails shown under the primary player.
pub const DEFAULT_MAX_THUMBNAILS: usize = 8;

/// Total pulse attempts for the overlay's centre player.
pub const DEFAULT_OVERLAY_PULSE_ATTEMPTS: u32 = 6;

/// Interval between overlay pulse attempts (milliseconds).
pub const DEFAULT_OVERLAY_PULSE_INTERVAL_MS: u64 = 500;

/// Element the overlay attaches to inside the product detail panel.
pub const DEFAULT_OVERLAY_CONTAINER: &str = "product-modal-nav";

// ==========================================================================
// Intent Defaults
// ==========================================================================

/// A pause only counts as manual once playback passed this point (seconds).
/// Autoplay-blocked elements report a pause at ~0.0.
pub const DEFAULT_MANUAL_PAUSE_MIN_SECS: f64 = 0.1;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(DEFAULT_VOLUME >= MIN_VOLUME);
    assert!(DEFAULT_VOLUME <= MAX_VOLUME);

    assert!(DEFAULT_AXIS_LOCK_PX > 0.0);
    assert!(DEFAULT_SWIPE_THRESHOLD_PX > DEFAULT_AXIS_LOCK_PX);
    assert!(DEFAULT_DISMISS_THRESHOLD_PX > DEFAULT_AXIS_LOCK_PX);

    assert!(DEFAULT_IMAGE_LOAD_TIMEOUT_MS <= DEFAULT_VIDEO_LOAD_TIMEOUT_MS);
    assert!(DEFAULT_VIDEO_LOAD_TIMEOUT_MS <= DEFAULT_EMBED_LOAD_TIMEOUT_MS);

    assert!(RENDER_WINDOW_SIZE % 2 == 1);

    assert!(DEFAULT_PULSE_ATTEMPTS > 0);
    assert!(DEFAULT_OVERLAY_PULSE_ATTEMPTS > 0);
    assert!(DEFAULT_PULSE_INTERVAL_MS > 0);
    assert!(DEFAULT_OVERLAY_PULSE_INTERVAL_MS > 0);
    assert!(DEFAULT_FULLSCREEN_POLL_MS > 0);

    assert!(DEFAULT_MAX_THUMBNAILS > 0);
    assert!(DEFAULT_MANUAL_PAUSE_MIN_SECS >= 0.0);
};
