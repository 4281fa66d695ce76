// SPDX-License-Identifier: MPL-2.0
//! Bounded repeating task for best-effort unmute/play bursts.
//!
//! Embedded players ignore commands sent before they are ready and never say
//! when they are, so a burst re-asserts the same commands on a fixed cadence.
//! [`PulseTask`] owns no timer: the owner polls it with the current time and
//! performs one attempt for every `Some` it returns.

use std::time::{Duration, Instant};

/// Attempt count and spacing of a burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulsePolicy {
    attempts: u32,
    interval: Duration,
}

impl PulsePolicy {
    /// Creates a policy. At least one attempt is always made.
    #[must_use]
    pub fn new(attempts: u32, interval: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            interval,
        }
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// A running (or finished) burst.
#[derive(Debug, Clone, Default)]
pub struct PulseTask {
    state: Option<Running>,
}

#[derive(Debug, Clone)]
struct Running {
    policy: PulsePolicy,
    done: u32,
    next_due: Instant,
}

impl PulseTask {
    /// Starts a burst whose first attempt is due at `now`.
    ///
    /// Restarting replaces any burst in progress.
    pub fn start(&mut self, now: Instant, policy: PulsePolicy) {
        self.state = Some(Running {
            policy,
            done: 0,
            next_due: now,
        });
    }

    /// Returns the attempt number (1-based) due at `now`, if any.
    ///
    /// `stop` is checked before each due attempt; when it returns true the
    /// burst is cancelled and nothing is returned. Missed attempts are not
    /// replayed: a late poll yields one attempt and reschedules from `now`.
    pub fn poll(&mut self, now: Instant, stop: impl FnOnce() -> bool) -> Option<u32> {
        let running = self.state.as_mut()?;
        if now < running.next_due {
            return None;
        }
        if stop() {
            self.state = None;
            return None;
        }
        running.done += 1;
        let attempt = running.done;
        if running.done >= running.policy.attempts {
            self.state = None;
        } else {
            running.next_due = now + running.policy.interval;
        }
        Some(attempt)
    }

    pub fn cancel(&mut self) {
        self.state = None;
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state.is_none()
    }

    /// When the next attempt is due, or `None` when finished.
    #[must_use]
    pub fn next_due(&self) -> Option<Instant> {
        self.state.as_ref().map(|running| running.next_due)
    }
}
