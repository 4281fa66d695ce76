// SPDX-License-Identifier: MPL-2.0
//! Volume domain type shared by every media element.
//!
//! This module provides a type-safe wrapper for volume values,
//! ensuring they are always within the valid range (0.0–1.0).

use crate::config::{DEFAULT_VOLUME, MAX_VOLUME, MIN_VOLUME};
use std::fmt;
use std::str::FromStr;

/// Volume level, guaranteed to be within valid range (0.0–1.0).
///
/// # Example
///
/// ```
/// use vibedrips_media::media_state::Volume;
///
/// let vol = Volume::new(0.5);
/// assert_eq!(vol.value(), 0.5);
///
/// // Values outside range are clamped
/// let too_loud = Volume::new(2.0);
/// assert_eq!(too_loud.value(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume(f32);

impl Volume {
    /// Creates a new volume level, clamping to valid range. NaN maps to the default.
    #[must_use]
    pub fn new(volume: f32) -> Self {
        if volume.is_nan() {
            return Self::default();
        }
        Self(volume.clamp(MIN_VOLUME, MAX_VOLUME))
    }

    /// Returns the volume value as f32.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Volume on the 0–100 scale used by the YouTube iframe API.
    #[must_use]
    pub fn percent(self) -> u8 {
        // Clamped to 0.0..=1.0, so the product always fits.
        (self.0 * 100.0).round() as u8
    }

    /// Returns true if volume is effectively muted (below audible threshold).
    #[must_use]
    pub fn is_muted(self) -> bool {
        self.0 < 0.001
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(DEFAULT_VOLUME)
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Volume {
    type Err = std::num::ParseFloatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<f32>().map(Self::new)
    }
}
