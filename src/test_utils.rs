// SPDX-License-Identifier: MPL-2.0
//! Test utilities for volume comparisons and shared fixtures.
//!
//! Volumes cross the host boundary as `f32` and get rounded by the browser,
//! so tests compare them with the `approx` macros rather than `assert_eq!`.

pub use approx::{assert_abs_diff_eq, assert_relative_eq};

use crate::config::Config;
use crate::device::{Device, Strategy};
use crate::i18n::I18n;
use crate::media_state::MediaState;
use std::rc::Rc;

/// Default epsilon for f32 comparisons.
/// Suitable for values that should be "exactly equal" but may have minor floating-point errors.
pub const F32_EPSILON: f32 = 1e-6;

/// In-memory shared state with a fixed strategy, plus English strings.
pub fn fixtures(strategy: Strategy) -> (Config, Rc<MediaState>, Rc<I18n>) {
    let config = Config::default();
    let i18n = I18n::new(Some("en-US".to_string()), &config);
    let state = MediaState::in_memory(Device::with_strategy(strategy));
    (config, Rc::new(state), Rc::new(i18n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_use_english_and_requested_strategy() {
        let (_, state, i18n) = fixtures(Strategy::Ios);
        assert_eq!(state.strategy(), Strategy::Ios);
        assert_eq!(i18n.tr("lightbox-close"), "Close");
        assert_relative_eq!(state.volume().value(), 0.3, epsilon = F32_EPSILON);
    }
}
