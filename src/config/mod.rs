// SPDX-License-Identifier: MPL-2.0
//! This module handles the crate's configuration, including loading and saving
//! tuning values to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! The configuration is organized into logical sections:
//! - `[general]` - Language
//! - `[audio]` - Preferred volume used before the user picks one
//! - `[lightbox]` - Idle auto-hide, gestures, keyboard and loader fallbacks
//! - `[pulse]` - Lightbox unmute/play burst cadence
//! - `[overlay]` - Reels overlay container, settle delay, polling and thumbnails
//! - `[intent]` - Thresholds used to tell manual pauses from autoplay blocks
//!
//! Every field has a default, so partial files are valid. Invalid files fall
//! back to defaults with a warning instead of failing startup.
//!
//! # Examples
//!
//! ```no_run
//! use vibedrips_media::config::{self, Config};
//!
//! let (mut config, _warning) = config::load();
//! config.general.language = Some("fr".to_string());
//! config::save_to_path(&config, "settings.toml".as_ref()).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::error::Result;
use crate::pulse::PulsePolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// General settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneralConfig {
    /// UI language code (e.g., "en-US", "fr").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Audio settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    /// Volume used until the user sets one (0.0 to 1.0).
    pub default_volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            default_volume: DEFAULT_VOLUME,
        }
    }
}

/// Full-screen lightbox settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightboxConfig {
    pub idle_hide_ms: u64,
    pub swipe_threshold_px: f32,
    pub dismiss_threshold_px: f32,
    pub axis_lock_px: f32,
    /// Escape closes, arrow keys navigate.
    pub keyboard: bool,
    pub image_load_timeout_ms: u64,
    pub video_load_timeout_ms: u64,
    pub embed_load_timeout_ms: u64,
}

impl Default for LightboxConfig {
    fn default() -> Self {
        Self {
            idle_hide_ms: DEFAULT_IDLE_HIDE_MS,
            swipe_threshold_px: DEFAULT_SWIPE_THRESHOLD_PX,
            dismiss_threshold_px: DEFAULT_DISMISS_THRESHOLD_PX,
            axis_lock_px: DEFAULT_AXIS_LOCK_PX,
            keyboard: true,
            image_load_timeout_ms: DEFAULT_IMAGE_LOAD_TIMEOUT_MS,
            video_load_timeout_ms: DEFAULT_VIDEO_LOAD_TIMEOUT_MS,
            embed_load_timeout_ms: DEFAULT_EMBED_LOAD_TIMEOUT_MS,
        }
    }
}

impl LightboxConfig {
    #[must_use]
    pub fn idle_hide(&self) -> Duration {
        Duration::from_millis(self.idle_hide_ms)
    }
}

/// Pulse burst cadence for the lightbox.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PulseConfig {
    pub attempts: u32,
    pub interval_ms: u64,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_PULSE_ATTEMPTS,
            interval_ms: DEFAULT_PULSE_INTERVAL_MS,
        }
    }
}

impl PulseConfig {
    #[must_use]
    pub fn policy(&self) -> PulsePolicy {
        PulsePolicy::new(self.attempts, Duration::from_millis(self.interval_ms))
    }
}

/// Reels overlay settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OverlayConfig {
    /// Id of the element inside the product detail panel that hosts the overlay.
    pub container: String,
    pub settle_delay_ms: u64,
    pub fullscreen_poll_ms: u64,
    pub max_thumbnails: usize,
    pub pulse_attempts: u32,
    pub pulse_interval_ms: u64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            container: DEFAULT_OVERLAY_CONTAINER.to_string(),
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            fullscreen_poll_ms: DEFAULT_FULLSCREEN_POLL_MS,
            max_thumbnails: DEFAULT_MAX_THUMBNAILS,
            pulse_attempts: DEFAULT_OVERLAY_PULSE_ATTEMPTS,
            pulse_interval_ms: DEFAULT_OVERLAY_PULSE_INTERVAL_MS,
        }
    }
}

impl OverlayConfig {
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    #[must_use]
    pub fn fullscreen_poll(&self) -> Duration {
        Duration::from_millis(self.fullscreen_poll_ms)
    }

    #[must_use]
    pub fn pulse_policy(&self) -> PulsePolicy {
        PulsePolicy::new(
            self.pulse_attempts,
            Duration::from_millis(self.pulse_interval_ms),
        )
    }
}

/// Heuristics separating deliberate user actions from autoplay side effects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IntentConfig {
    pub manual_pause_min_secs: f64,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            manual_pause_min_secs: DEFAULT_MANUAL_PAUSE_MIN_SECS,
        }
    }
}

// =============================================================================
// Root Config
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub audio: AudioConfig,
    pub lightbox: LightboxConfig,
    pub pulse: PulseConfig,
    pub overlay: OverlayConfig,
    pub intent: IntentConfig,
}

fn config_file_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

/// Loads the configuration from the default location.
///
/// Returns the config together with an optional i18n key describing why the
/// defaults were used instead of the file contents.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from `base_dir/settings.toml` (or the default location).
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    let Some(path) = config_file_path_with_override(base_dir) else {
        return (Config::default(), None);
    };
    if !path.exists() {
        return (Config::default(), None);
    }
    match load_from_path(&path) {
        Ok(config) => (config, None),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "falling back to default config");
            (Config::default(), Some("notification-config-parse-error".to_string()))
        }
    }
}

/// Reads and parses a config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Writes a config file, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if serialization or any filesystem operation fails.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
