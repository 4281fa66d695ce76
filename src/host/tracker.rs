// SPDX-License-Identifier: MPL-2.0
//! Audio state of one native video, as requested by us versus as reported.
//!
//! Every `set_muted`/`set_volume` makes the element fire `volumechange`, and
//! every `pause()` fires `pause`. The tracker remembers which notifications
//! our own calls will produce, so that only changes made through the native
//! controls count as user actions.

use super::{play_with_muted_fallback, ElementId, MediaHost, PlayOutcome};
use crate::media_state::Volume;

/// Volume of a freshly created media element.
const NATIVE_DEFAULT_VOLUME: f32 = 1.0;

/// Volumes closer than this are considered equal (host rounding).
const VOLUME_EPSILON: f32 = 0.005;

/// Upper bound on unconsumed echoes.
const MAX_PENDING_ECHOES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Snapshot {
    muted: bool,
    volume: Volume,
}

impl Snapshot {
    fn same_as(&self, other: &Self) -> bool {
        self.muted == other.muted && same_volume(self.volume, other.volume)
    }
}

fn same_volume(a: Volume, b: Volume) -> bool {
    (a.value() - b.value()).abs() < VOLUME_EPSILON
}

/// Classification of a `volumechange` notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioObservation {
    /// Caused by one of our own calls.
    Echo,
    /// Nothing changed.
    Unchanged,
    /// The user changed mute or volume.
    User { muted: bool, volume: Volume },
}

impl AudioObservation {
    /// The user silenced the element (muted or volume zero).
    #[must_use]
    pub fn is_user_silence(&self) -> bool {
        matches!(self, AudioObservation::User { muted, volume } if *muted || volume.is_muted())
    }
}

#[derive(Debug, Clone)]
pub struct AudioTracker {
    applied: Snapshot,
    echoes: Vec<Snapshot>,
    pause_echo: bool,
}

impl AudioTracker {
    /// Tracker for an element mounted with the given `muted` attribute.
    #[must_use]
    pub fn new(muted: bool) -> Self {
        Self {
            applied: Snapshot {
                muted,
                volume: Volume::new(NATIVE_DEFAULT_VOLUME),
            },
            echoes: Vec::new(),
            pause_echo: false,
        }
    }

    #[must_use]
    pub fn muted(&self) -> bool {
        self.applied.muted
    }

    #[must_use]
    pub fn volume(&self) -> Volume {
        self.applied.volume
    }

    fn expect_echo(&mut self, snapshot: Snapshot) {
        if self.echoes.len() >= MAX_PENDING_ECHOES {
            self.echoes.remove(0);
        }
        self.echoes.push(snapshot);
    }

    /// Applies mute and volume, calling the host only for actual changes.
    pub fn apply(&mut self, host: &mut dyn MediaHost, video: &ElementId, muted: bool, volume: Volume) {
        let mut next = self.applied;
        if !same_volume(next.volume, volume) {
            host.set_volume(video, volume);
            next.volume = volume;
            self.expect_echo(next);
        }
        if next.muted != muted {
            host.set_muted(video, muted);
            next.muted = muted;
            self.expect_echo(next);
        }
        self.applied = next;
    }

    /// [`play_with_muted_fallback`], keeping track of a forced mute.
    pub fn play(&mut self, host: &mut dyn MediaHost, video: &ElementId) -> PlayOutcome {
        let outcome = play_with_muted_fallback(host, video);
        if outcome.forced_muted() && !self.applied.muted {
            self.applied.muted = true;
            self.expect_echo(self.applied);
        }
        outcome
    }

    /// Pauses the element; the `pause` event it triggers is ours.
    pub fn pause(&mut self, host: &mut dyn MediaHost, video: &ElementId) {
        host.pause(video);
        self.pause_echo = true;
    }

    /// Whether a reported `pause` was caused by [`pause`](Self::pause).
    pub fn observe_pause(&mut self) -> bool {
        std::mem::take(&mut self.pause_echo)
    }

    /// A reported `playing`. Pausing an already paused element fires no
    /// event, so an echo still pending at this point will never arrive.
    pub fn observe_playing(&mut self) {
        self.pause_echo = false;
    }

    /// Classifies a reported `volumechange`.
    pub fn observe(&mut self, muted: bool, volume: f32) -> AudioObservation {
        let observed = Snapshot {
            muted,
            volume: Volume::new(volume),
        };
        if let Some(echo) = self.echoes.iter().position(|e| e.same_as(&observed)) {
            self.echoes.drain(..=echo);
            return AudioObservation::Echo;
        }
        // Echoes arrive in order; whatever is still pending was coalesced away.
        self.echoes.clear();
        if self.applied.same_as(&observed) {
            return AudioObservation::Unchanged;
        }
        self.applied = observed;
        AudioObservation::User {
            muted,
            volume: observed.volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostCall, RecordingHost};
    use crate::view::ViewNode;

    fn video(host: &mut RecordingHost, muted: bool) -> ElementId {
        let id = ElementId::new("v");
        host.mount(None, ViewNode::new("video").id(id.clone()).flag_if("muted", muted))
            .expect("body exists");
        id
    }

    #[test]
    fn apply_only_touches_what_changed() {
        let mut host = RecordingHost::new();
        let id = video(&mut host, true);
        let mut tracker = AudioTracker::new(true);

        tracker.apply(&mut host, &id, true, Volume::new(0.3));
        tracker.apply(&mut host, &id, true, Volume::new(0.3));
        assert_eq!(host.calls().len(), 2); // mount + one set_volume
        assert!(tracker.muted());
    }

    #[test]
    fn own_changes_echo_back() {
        let mut host = RecordingHost::new();
        let id = video(&mut host, true);
        let mut tracker = AudioTracker::new(true);
        tracker.apply(&mut host, &id, false, Volume::new(0.3));

        assert_eq!(tracker.observe(true, 0.3), AudioObservation::Echo);
        assert_eq!(tracker.observe(false, 0.3), AudioObservation::Echo);
        assert_eq!(tracker.observe(false, 0.3), AudioObservation::Unchanged);
    }

    #[test]
    fn native_control_changes_are_user_actions() {
        let mut tracker = AudioTracker::new(false);
        let observation = tracker.observe(true, 1.0);
        assert!(observation.is_user_silence());

        let observation = tracker.observe(false, 0.0);
        assert!(observation.is_user_silence());

        let observation = tracker.observe(false, 0.5);
        assert_eq!(
            observation,
            AudioObservation::User {
                muted: false,
                volume: Volume::new(0.5)
            }
        );
        assert!(!observation.is_user_silence());
    }

    #[test]
    fn pending_echoes_do_not_mask_later_user_actions() {
        let mut host = RecordingHost::new();
        let id = video(&mut host, true);
        let mut tracker = AudioTracker::new(true);
        tracker.apply(&mut host, &id, true, Volume::new(0.3));

        // The user unmutes before our echo is reported, then mutes again.
        assert!(matches!(tracker.observe(false, 0.3), AudioObservation::User { .. }));
        assert!(tracker.observe(true, 0.3).is_user_silence());
    }

    #[test]
    fn own_pause_is_an_echo_once() {
        let mut host = RecordingHost::new();
        let id = video(&mut host, false);
        let mut tracker = AudioTracker::new(false);
        assert!(!tracker.observe_pause());

        tracker.pause(&mut host, &id);
        assert!(host.calls().contains(&HostCall::Pause(id.clone())));
        assert!(tracker.observe_pause());
        assert!(!tracker.observe_pause());
    }

    #[test]
    fn playing_drops_a_pause_echo_that_never_came() {
        let mut host = RecordingHost::new();
        let id = video(&mut host, false);
        let mut tracker = AudioTracker::new(false);

        tracker.pause(&mut host, &id);
        tracker.observe_playing();
        assert!(!tracker.observe_pause());
    }

    #[test]
    fn forced_mute_is_remembered() {
        let mut host = RecordingHost::new();
        host.reject_unmuted_play(true);
        let id = video(&mut host, false);
        let mut tracker = AudioTracker::new(false);

        assert_eq!(tracker.play(&mut host, &id), PlayOutcome::StartedMuted);
        assert!(tracker.muted());
        assert_eq!(tracker.observe(true, 1.0), AudioObservation::Echo);
    }
}
