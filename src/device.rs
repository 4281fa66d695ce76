// SPDX-License-Identifier: MPL-2.0
//! Runtime environment classification.
//!
//! The host hands over an [`Environment`] snapshot (typically serialized from
//! `navigator`/`matchMedia` in the page) and [`Device`] answers the handful of
//! questions the autoplay policy depends on. Nothing here has state or fails.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Substrings identifying mobile and tablet user agents (compared lowercase).
const MOBILE_UA_MARKERS: &[&str] = &[
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
    "mobile",
    "silk",
    "kindle",
];

/// Viewport width at or below which a touch device is treated as mobile.
const NARROW_VIEWPORT_PX: u32 = 768;

/// CSS `display-mode` the page currently matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    #[default]
    Browser,
    Standalone,
    MinimalUi,
    Fullscreen,
}

/// Snapshot of the browser environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Environment {
    pub user_agent: String,
    /// `navigator.platform` (e.g. `MacIntel`, `iPhone`, `Win32`).
    pub platform: String,
    pub max_touch_points: u32,
    pub display_mode: DisplayMode,
    /// Safari's non-standard `navigator.standalone`.
    pub navigator_standalone: bool,
    pub referrer: String,
    pub viewport_width: u32,
    pub has_touch: bool,
}

/// Default mute behaviour derived from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// iOS: audible autoplay is always refused.
    Ios,
    /// Desktop or installed PWA: the visit is deliberate, start with sound.
    Unmuted,
    /// Plain mobile browser tab: start muted.
    Muted,
}

impl Strategy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Ios => "ios",
            Strategy::Unmuted => "unmuted",
            Strategy::Muted => "muted",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ios" => Ok(Strategy::Ios),
            "unmuted" => Ok(Strategy::Unmuted),
            "muted" => Ok(Strategy::Muted),
            other => Err(format!("unknown strategy `{other}`")),
        }
    }
}

/// Read-only environment classifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Device {
    env: Environment,
    forced: Option<Strategy>,
}

impl Device {
    #[must_use]
    pub fn new(env: Environment) -> Self {
        Self { env, forced: None }
    }

    /// A device whose strategy is fixed regardless of the environment.
    ///
    /// Used by the CLI `--strategy` flag and by tests.
    #[must_use]
    pub fn with_strategy(strategy: Strategy) -> Self {
        Self {
            env: Environment::default(),
            forced: Some(strategy),
        }
    }

    #[must_use]
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Launched from a home-screen icon (or an Android app wrapper).
    #[must_use]
    pub fn is_pwa(&self) -> bool {
        self.env.display_mode != DisplayMode::Browser
            || self.env.navigator_standalone
            || self.env.referrer.starts_with("android-app://")
    }

    /// iPhone/iPad/iPod, including iPadOS reporting a desktop Mac platform.
    #[must_use]
    pub fn is_ios(&self) -> bool {
        let ua = &self.env.user_agent;
        if ua.contains("iPhone") || ua.contains("iPad") || ua.contains("iPod") {
            return true;
        }
        self.env.platform == "MacIntel" && self.env.max_touch_points > 1
    }

    #[must_use]
    pub fn is_mobile(&self) -> bool {
        let ua = self.env.user_agent.to_lowercase();
        if MOBILE_UA_MARKERS.iter().any(|marker| ua.contains(marker)) {
            return true;
        }
        self.env.viewport_width > 0
            && self.env.viewport_width <= NARROW_VIEWPORT_PX
            && self.env.has_touch
    }

    #[must_use]
    pub fn strategy(&self) -> Strategy {
        if let Some(strategy) = self.forced {
            return strategy;
        }
        if self.is_ios() {
            Strategy::Ios
        } else if !self.is_mobile() || self.is_pwa() {
            Strategy::Unmuted
        } else {
            Strategy::Muted
        }
    }
}
