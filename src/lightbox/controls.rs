// SPDX-License-Identifier: MPL-2.0
//! Controls visibility sub-component for the lightbox.

use std::time::{Duration, Instant};

/// Controls visibility state driven by an idle timer.
#[derive(Debug, Clone)]
pub struct State {
    /// Whether close/arrows/counter are visible.
    visible: bool,
    /// Last pointer, touch or key activity.
    last_activity: Option<Instant>,
    hide_delay: Duration,
}

/// Messages for the controls sub-component.
#[derive(Debug, Clone, Copy)]
pub enum Message {
    /// Any pointer/touch/key activity at the given time.
    Activity(Instant),
    /// Check if controls should be hidden due to inactivity.
    CheckTimeout(Instant),
}

/// Effects produced by visibility changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    VisibilityChanged(bool),
}

impl State {
    /// Controls start visible; the idle timer starts at `now`.
    #[must_use]
    pub fn new(hide_delay: Duration, now: Instant) -> Self {
        Self {
            visible: true,
            last_activity: Some(now),
            hide_delay,
        }
    }

    pub fn handle(&mut self, msg: Message) -> Effect {
        match msg {
            Message::Activity(now) => {
                self.last_activity = Some(now);
                if self.visible {
                    Effect::None
                } else {
                    self.visible = true;
                    Effect::VisibilityChanged(true)
                }
            }
            Message::CheckTimeout(now) => {
                let Some(last) = self.last_activity else {
                    return Effect::None;
                };
                if self.visible && now.saturating_duration_since(last) >= self.hide_delay {
                    self.visible = false;
                    return Effect::VisibilityChanged(false);
                }
                Effect::None
            }
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Stops the idle timer (lightbox closed).
    pub fn stop(&mut self) {
        self.last_activity = None;
    }
}
