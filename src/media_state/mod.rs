// SPDX-License-Identifier: MPL-2.0
//! Process-wide audio trust state.
//!
//! [`MediaState`] answers one question for every media surface: should new
//! playback start muted? It combines the device [`Strategy`] with a persisted
//! "the user has unmuted before" flag, and owns the single preferred volume.
//! Changes are broadcast as [`AudioEvent`]s so open surfaces converge without
//! further user gestures.

mod store;
mod volume;

pub use store::{MemoryStore, StateStore};
pub use volume::Volume;

use crate::device::{Device, Strategy};
use tokio::sync::broadcast;

/// Storage key of the unmute session flag.
pub const UNMUTED_KEY: &str = "vibedrips.media.unmuted";

/// Storage key of the preferred volume.
pub const VOLUME_KEY: &str = "vibedrips.media.volume";

/// Capacity of the notification channel. Slow listeners only lose old events.
const EVENT_CAPACITY: usize = 16;

/// Notifications emitted when the shared audio state changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioEvent {
    /// The user performed an unmuting gesture.
    Unmuted,
    /// The preferred volume changed.
    VolumeChanged(Volume),
}

/// Shared audio state, injected into the lightbox and overlay.
pub struct MediaState {
    device: Device,
    store: Box<dyn StateStore>,
    default_volume: Volume,
    events: broadcast::Sender<AudioEvent>,
}

impl std::fmt::Debug for MediaState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaState")
            .field("strategy", &self.device.strategy())
            .field("unmuted", &self.is_unmuted())
            .field("volume", &self.volume())
            .finish()
    }
}

impl MediaState {
    #[must_use]
    pub fn new(device: Device, store: Box<dyn StateStore>, default_volume: Volume) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            device,
            store,
            default_volume,
            events,
        }
    }

    /// In-memory state with the default volume.
    #[must_use]
    pub fn in_memory(device: Device) -> Self {
        Self::new(device, Box::new(MemoryStore::new()), Volume::default())
    }

    #[must_use]
    pub fn device(&self) -> &Device {
        &self.device
    }

    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.device.strategy()
    }

    /// Whether the user has ever unmuted media in this profile.
    #[must_use]
    pub fn is_unmuted(&self) -> bool {
        self.store.get(UNMUTED_KEY).as_deref() == Some("true")
    }

    /// Records the unmute gesture and notifies every listener.
    pub fn set_unmuted(&self) {
        if let Err(err) = self.store.set(UNMUTED_KEY, "true") {
            tracing::warn!(error = %err, "failed to persist unmute session");
        }
        tracing::debug!("media unmuted for this profile");
        // No receivers is fine: nothing is open.
        let _ = self.events.send(AudioEvent::Unmuted);
    }

    /// Mute policy for newly started playback.
    #[must_use]
    pub fn should_start_muted(&self) -> bool {
        match self.device.strategy() {
            Strategy::Ios => true,
            Strategy::Unmuted => false,
            Strategy::Muted => !self.is_unmuted(),
        }
    }

    /// The shared preferred volume (persisted value, else the configured default).
    #[must_use]
    pub fn volume(&self) -> Volume {
        self.store
            .get(VOLUME_KEY)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(self.default_volume)
    }

    /// Persists a new preferred volume and broadcasts it when it changed.
    pub fn set_volume(&self, volume: Volume) {
        if self.volume() == volume {
            return;
        }
        if let Err(err) = self.store.set(VOLUME_KEY, &volume.to_string()) {
            tracing::warn!(error = %err, "failed to persist volume");
        }
        let _ = self.events.send(AudioEvent::VolumeChanged(volume));
    }

    /// Subscribes to future [`AudioEvent`]s.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AudioEvent> {
        self.events.subscribe()
    }
}

/// Drains every pending event from `receiver` without blocking.
///
/// Lagged receivers skip the lost events and keep going.
pub fn drain_events(receiver: &mut broadcast::Receiver<AudioEvent>) -> Vec<AudioEvent> {
    let mut events = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(event) => events.push(event),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "audio event listener lagged");
            }
            Err(_) => break,
        }
    }
    events
}
