// SPDX-License-Identifier: MPL-2.0
//! Inline reels overlay on the product detail panel.
//!
//! Keeps five sibling products mounted around the current one (wrapping around
//! the scoped product list). Each slot shows one primary player and a strip of
//! thumbnails; only the centre slot may play. Playback starts after a settle
//! delay so it does not compete with the opening animation.
//!
//! Going fullscreen pauses the overlay and hands the current media to the
//! lightbox. [`MediaOverlay::tick`] polls until the lightbox is gone and then
//! resumes.

mod product;
mod view;

pub use product::{Product, ProductScope};

use crate::config::{Config, OverlayConfig};
use crate::host::{
    silence_video, AudioObservation, AudioTracker, ElementEvent, ElementEventKind, ElementId,
    MediaHost, ResourceHint,
};
use crate::i18n::I18n;
use crate::media::window::promote;
use crate::media::{PlaybackIntent, Presentation, EMBED_ORIGINS};
use crate::media_state::{AudioEvent, MediaState};
use crate::pulse::{PulsePolicy, PulseTask};
use crate::remote::{RemoteCommand, RemoteControl};
use crate::view::classes;
use crate::view::player;
use std::rc::Rc;
use std::time::{Duration, Instant};
use view::{Ids, SlotNodes, SlotSpec};

/// Position of the current product inside the five-slot window.
const CENTER_POSITION: usize = 2;

/// Media to show fullscreen, produced by [`MediaOverlay::open_fullscreen`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullscreenRequest {
    pub media: Vec<String>,
    pub index: usize,
}

#[derive(Debug)]
pub struct MediaOverlay {
    ids: Ids,
    config: OverlayConfig,
    pulse_policy: PulsePolicy,
    manual_pause_min_secs: f64,
    state: Rc<MediaState>,
    i18n: Rc<I18n>,
    remote: RemoteControl,
    scope: ProductScope,
    /// Media of the current product, in display order (index 0 is live).
    media: Vec<String>,
    active: bool,
    render: u64,
    swap: u64,
    slots: Vec<SlotNodes>,
    audio: Option<AudioTracker>,
    intent: PlaybackIntent,
    playing: bool,
    playback_due: Option<Instant>,
    unmute_on_playing: bool,
    pulse: PulseTask,
    pulse_unmute: bool,
    fullscreen_poll: Option<Instant>,
}

impl MediaOverlay {
    /// Creates an inactive overlay. `generation` scopes every element id.
    #[must_use]
    pub fn new(generation: u64, config: &Config, state: Rc<MediaState>, i18n: Rc<I18n>) -> Self {
        Self {
            ids: Ids::new(generation),
            config: config.overlay.clone(),
            pulse_policy: config.overlay.pulse_policy(),
            manual_pause_min_secs: config.intent.manual_pause_min_secs,
            state,
            i18n,
            remote: RemoteControl::default(),
            scope: ProductScope::default(),
            media: Vec::new(),
            active: false,
            render: 0,
            swap: 0,
            slots: Vec::new(),
            audio: None,
            intent: PlaybackIntent::default(),
            playing: false,
            playback_due: None,
            unmute_on_playing: false,
            pulse: PulseTask::default(),
            pulse_unmute: false,
            fullscreen_poll: None,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn root_id(&self) -> &ElementId {
        self.ids.root()
    }

    #[must_use]
    pub fn scope(&self) -> &ProductScope {
        &self.scope
    }

    /// Replaces the scoped product list (e.g. after the page filters change).
    pub fn set_scope(&mut self, scope: ProductScope) {
        self.scope = scope;
    }

    /// Current product's media in display order. Index 0 is the live item.
    #[must_use]
    pub fn media(&self) -> &[String] {
        &self.media
    }

    /// Product index shown in each of the five slots, left to right.
    #[must_use]
    pub fn window(&self) -> Vec<usize> {
        self.slots.iter().map(|slot| slot.product).collect()
    }

    /// Id of the centre slot's live player.
    #[must_use]
    pub fn player_id(&self) -> Option<&ElementId> {
        self.centre_player().map(|player| &player.id)
    }

    /// Id of the primary player rendered at `position` (0..5).
    #[must_use]
    pub fn slot_player_id(&self, position: usize) -> Option<&ElementId> {
        self.slots
            .get(position)
            .and_then(|slot| slot.player.as_ref())
            .map(|player| &player.id)
    }

    /// Id of the thumbnail for media `index` in the centre slot.
    #[must_use]
    pub fn thumb_id(&self, index: usize) -> Option<ElementId> {
        (index > 0 && index < self.media.len())
            .then(|| self.slots.get(CENTER_POSITION))
            .flatten()
            .map(|slot| slot.thumb(self.swap, index))
    }

    #[must_use]
    pub fn is_pulsing(&self) -> bool {
        !self.pulse.is_finished()
    }

    /// Whether the overlay is paused behind its fullscreen lightbox.
    #[must_use]
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen_poll.is_some()
    }

    #[must_use]
    pub fn intent(&self) -> PlaybackIntent {
        self.intent
    }

    fn centre_player(&self) -> Option<&view::PlayerNode> {
        self.slots
            .get(CENTER_POSITION)
            .and_then(|slot| slot.player.as_ref())
    }

    /// Opens the overlay on `product`.
    ///
    /// The product becomes current within the scope, or the only product when
    /// the scope does not contain it. Returns false when the container is
    /// missing.
    pub fn open(&mut self, host: &mut dyn MediaHost, product: Product, now: Instant) -> bool {
        let container = ElementId::new(self.config.container.as_str());
        if !host.exists(&container) {
            tracing::warn!(container = %container, "overlay container not found");
            return false;
        }
        if self.active {
            self.close(host);
        }
        match self.scope.position_of(&product.id) {
            Some(index) => {
                self.scope.set_current(index);
            }
            None => self.scope = ProductScope::single(product),
        }
        if let Err(err) = host.mount(Some(&container), view::container(&self.ids, Vec::new())) {
            tracing::warn!(error = %err, "overlay could not be attached");
            return false;
        }
        self.active = true;
        host.set_class(&ElementId::body(), classes::REELS_MODE, true);
        host.set_class(self.ids.root(), classes::ACTIVE, true);
        tracing::debug!(root = %self.ids.root(), product = self.scope.current_index(), "overlay opened");
        self.refresh_cache(host, now);
        true
    }

    /// Re-renders the five sibling slots around the current product.
    ///
    /// Neighbours are paused and muted right away; the centre starts after the
    /// settle delay. Direct video files of the neighbours are preloaded.
    pub fn refresh_cache(&mut self, host: &mut dyn MediaHost, now: Instant) {
        if !self.active {
            return;
        }
        self.stop_playback(host);
        self.silence_slots(host);
        self.render += 1;
        self.swap = 0;
        self.intent = PlaybackIntent::default();
        self.media = self
            .scope
            .current()
            .map(|product| product.reference_media.clone())
            .unwrap_or_default();

        let muted = self.state.should_start_muted();
        let window = self.scope.window();
        let mut nodes = Vec::with_capacity(window.len());
        let mut slots = Vec::with_capacity(window.len());
        for (position, product_index) in window.into_iter().enumerate() {
            let Some(product) = self.scope.get(product_index) else {
                continue;
            };
            let center = position == CENTER_POSITION;
            let media = if center {
                self.media.as_slice()
            } else {
                product.reference_media.as_slice()
            };
            let spec = SlotSpec {
                render: self.render,
                position,
                product_index,
                product,
                media,
                center,
                muted,
                max_thumbnails: self.config.max_thumbnails,
            };
            let (node, slot) = view::slot(&self.ids, &spec, &self.i18n);
            nodes.push(node);
            slots.push(slot);
        }
        if let Err(err) = host.replace(&self.ids.track(), view::track(&self.ids, nodes)) {
            tracing::warn!(error = %err, "overlay track vanished");
            self.slots.clear();
            return;
        }
        self.slots = slots;

        for (position, slot) in self.slots.iter().enumerate() {
            if position == CENTER_POSITION {
                continue;
            }
            let Some(player) = slot.player.as_ref() else {
                continue;
            };
            match player.presentation {
                Presentation::Video => {
                    host.pause(&player.id);
                    host.set_muted(&player.id, true);
                }
                Presentation::Frame => {
                    self.remote.pause(host, &player.id);
                }
                Presentation::Image | Presentation::Placeholder => {}
            }
        }
        self.add_resource_hints(host);

        self.audio = self
            .centre_player()
            .filter(|player| player.presentation == Presentation::Video)
            .map(|player| AudioTracker::new(player.muted));
        self.playback_due = Some(now + self.config.settle_delay());
        tracing::debug!(
            render = self.render,
            product = self.scope.current_index(),
            window = ?self.window(),
            "overlay cache refreshed"
        );
    }

    fn add_resource_hints(&self, host: &mut dyn MediaHost) {
        for origin in EMBED_ORIGINS {
            host.add_resource_hint(ResourceHint::Preconnect((*origin).to_string()));
        }
        for (position, slot) in self.slots.iter().enumerate() {
            if position == CENTER_POSITION {
                continue;
            }
            if let Some(player) = slot
                .player
                .as_ref()
                .filter(|player| player.presentation == Presentation::Video)
            {
                host.add_resource_hint(ResourceHint::Preload(player.url.clone()));
            }
        }
    }

    /// Makes product `index` of the scope current and rebuilds the window.
    pub fn show_product(&mut self, host: &mut dyn MediaHost, index: usize, now: Instant) -> bool {
        if !self.active || !self.scope.set_current(index) {
            return false;
        }
        self.refresh_cache(host, now);
        true
    }

    /// Promotes thumbnail `index` to the live player.
    ///
    /// Only the primary and thumbnail regions of the centre slot are
    /// re-rendered. Index 0 or out of range is a no-op.
    pub fn swap_media(&mut self, host: &mut dyn MediaHost, index: usize, now: Instant) -> bool {
        if !self.active || index == 0 || index >= self.media.len() {
            return false;
        }
        self.stop_playback(host);
        if let Some(player) = self.centre_player() {
            if player.presentation == Presentation::Video {
                host.release_media(&player.id);
            }
        }
        self.media = promote(&self.media, index);
        self.swap += 1;
        self.intent = PlaybackIntent::default();

        let muted = self.state.should_start_muted();
        let Some(slot) = self.slots.get_mut(CENTER_POSITION) else {
            return false;
        };
        let primary = view::primary(slot, self.swap, &self.media, true, muted, true, &self.i18n);
        let thumbs = view::thumbs(
            slot,
            self.swap,
            &self.media,
            self.config.max_thumbnails,
            true,
            &self.i18n,
        );
        let (primary_id, thumbs_id) = (slot.primary.clone(), slot.thumbs.clone());
        if let Err(err) = host.replace(&primary_id, primary) {
            tracing::warn!(error = %err, "overlay primary region vanished");
            return false;
        }
        if let Err(err) = host.replace(&thumbs_id, thumbs) {
            tracing::warn!(error = %err, "overlay thumbnail grid vanished");
        }
        self.audio = self
            .centre_player()
            .filter(|player| player.presentation == Presentation::Video)
            .map(|player| AudioTracker::new(player.muted));
        tracing::debug!(index, swap = self.swap, "overlay media swapped");
        self.toggle_playback(host, true, now);
        true
    }

    /// Starts or stops the centre player.
    pub fn toggle_playback(&mut self, host: &mut dyn MediaHost, play: bool, now: Instant) {
        if !self.active {
            return;
        }
        self.playback_due = None;
        if !play {
            self.stop_playback(host);
            return;
        }
        let Some(player) = self.centre_player().cloned() else {
            return;
        };
        self.playing = true;
        let muted = self.state.should_start_muted() || self.intent.user_muted;
        match player.presentation {
            Presentation::Video => {
                let volume = self.state.volume();
                if let Some(audio) = self.audio.as_mut() {
                    // Unmuting before playback has begun is unreliable; start
                    // muted and unmute on `playing`.
                    audio.apply(host, &player.id, true, volume);
                    self.unmute_on_playing = !muted;
                    if !self.intent.user_paused {
                        audio.play(host, &player.id);
                    }
                }
            }
            Presentation::Frame => {
                if !self.intent.blocks_automation() {
                    self.pulse_unmute = !muted;
                    self.pulse.start(now, self.pulse_policy);
                    self.run_pulse(host, now);
                }
            }
            Presentation::Image | Presentation::Placeholder => {}
        }
    }

    fn stop_playback(&mut self, host: &mut dyn MediaHost) {
        self.playing = false;
        self.unmute_on_playing = false;
        self.pulse.cancel();
        let Some(player) = self.centre_player().cloned() else {
            return;
        };
        match player.presentation {
            Presentation::Video => {
                let volume = self.state.volume();
                match self.audio.as_mut() {
                    Some(audio) => {
                        audio.pause(host, &player.id);
                        audio.apply(host, &player.id, true, volume);
                    }
                    None => host.pause(&player.id),
                }
            }
            Presentation::Frame => {
                self.remote.pause(host, &player.id);
            }
            Presentation::Image | Presentation::Placeholder => {}
        }
    }

    fn run_pulse(&mut self, host: &mut dyn MediaHost, now: Instant) {
        let stop = !self.active || !self.playing || self.intent.blocks_automation();
        let Some(attempt) = self.pulse.poll(now, || stop) else {
            return;
        };
        let Some(player) = self.centre_player().filter(|p| p.presentation == Presentation::Frame)
        else {
            self.pulse.cancel();
            return;
        };
        tracing::trace!(attempt, element = %player.id, unmute = self.pulse_unmute, "overlay pulse");
        self.remote
            .assert_playing(host, &player.id, self.pulse_unmute, self.state.volume());
    }

    /// Pauses the overlay and returns the media to show fullscreen.
    pub fn open_fullscreen(
        &mut self,
        host: &mut dyn MediaHost,
        now: Instant,
    ) -> Option<FullscreenRequest> {
        if !self.active || self.media.is_empty() {
            return None;
        }
        self.toggle_playback(host, false, now);
        self.fullscreen_poll = Some(now + self.config.fullscreen_poll());
        tracing::debug!(items = self.media.len(), "overlay handed off to fullscreen");
        Some(FullscreenRequest {
            media: self.media.clone(),
            index: 0,
        })
    }

    /// Advances timers: the settle delay, fullscreen polling and the pulse.
    ///
    /// `lightbox_open` reports whether the fullscreen lightbox is still up.
    pub fn tick(&mut self, host: &mut dyn MediaHost, now: Instant, lightbox_open: bool) {
        if !self.active {
            return;
        }
        if let Some(due) = self.fullscreen_poll {
            if due <= now {
                if lightbox_open {
                    self.fullscreen_poll = Some(now + self.config.fullscreen_poll());
                } else {
                    tracing::debug!("fullscreen closed, resuming overlay");
                    self.fullscreen_poll = None;
                    self.toggle_playback(host, true, now);
                }
            }
            return;
        }
        if self.playback_due.is_some_and(|due| due <= now) {
            self.toggle_playback(host, true, now);
        }
        self.run_pulse(host, now);
    }

    /// Reacts to a shared audio state change.
    pub fn handle_audio_event(&mut self, host: &mut dyn MediaHost, event: AudioEvent, now: Instant) {
        if !self.active || !self.playing {
            return;
        }
        let Some(player) = self.centre_player().cloned() else {
            return;
        };
        match event {
            AudioEvent::Unmuted => {
                if self.intent.user_muted {
                    return;
                }
                match player.presentation {
                    Presentation::Video => {
                        let volume = self.state.volume();
                        if let Some(audio) = self.audio.as_mut() {
                            audio.apply(host, &player.id, false, volume);
                        }
                    }
                    Presentation::Frame if !self.intent.blocks_automation() => {
                        self.pulse_unmute = true;
                        self.pulse.start(now, self.pulse_policy);
                        self.run_pulse(host, now);
                    }
                    _ => {}
                }
            }
            AudioEvent::VolumeChanged(volume) => match player.presentation {
                Presentation::Video => {
                    if let Some(audio) = self.audio.as_mut() {
                        let muted = audio.muted();
                        audio.apply(host, &player.id, muted, volume);
                    }
                }
                Presentation::Frame => {
                    self.remote
                        .send(host, &player.id, RemoteCommand::SetVolume(volume));
                }
                _ => {}
            },
        }
    }

    /// Routes a media element event. Only the live centre player is listened to.
    pub fn handle_element_event(&mut self, host: &mut dyn MediaHost, event: &ElementEvent) {
        if !self.active {
            return;
        }
        let Some(player) = self
            .centre_player()
            .filter(|player| player.id == event.element)
            .cloned()
        else {
            tracing::trace!(element = %event.element, "ignoring overlay event");
            return;
        };
        match event.kind {
            ElementEventKind::Playing => {
                self.intent.record_playing();
                if let Some(audio) = self.audio.as_mut() {
                    audio.observe_playing();
                }
                if std::mem::take(&mut self.unmute_on_playing) && !self.intent.user_muted {
                    let volume = self.state.volume();
                    if let Some(audio) = self.audio.as_mut() {
                        audio.apply(host, &player.id, false, volume);
                    }
                }
            }
            ElementEventKind::Pause { current_time } => {
                if self.audio.as_mut().is_some_and(AudioTracker::observe_pause) {
                    tracing::trace!(current_time, "overlay pause echo");
                    return;
                }
                if self
                    .intent
                    .record_pause(current_time, self.manual_pause_min_secs)
                {
                    tracing::debug!(current_time, "overlay manual pause, backing off");
                    self.pulse.cancel();
                }
            }
            ElementEventKind::VolumeChange { muted, volume } => {
                let Some(audio) = self.audio.as_mut() else {
                    return;
                };
                let observation = audio.observe(muted, volume);
                let AudioObservation::User { volume, .. } = observation else {
                    return;
                };
                if observation.is_user_silence() {
                    tracing::debug!("overlay user muted, backing off");
                    self.intent.user_muted = true;
                    self.unmute_on_playing = false;
                    self.pulse.cancel();
                } else {
                    self.intent.user_muted = false;
                    if !self.state.is_unmuted() {
                        self.state.set_unmuted();
                    }
                    self.state.set_volume(volume);
                }
            }
            ElementEventKind::Loaded => {}
            ElementEventKind::Failed => self.show_failure(host, &player),
        }
    }

    fn show_failure(&mut self, host: &mut dyn MediaHost, player: &view::PlayerNode) {
        tracing::debug!(element = %player.id, url = %player.url, "overlay media failed to load");
        self.pulse.cancel();
        if player.presentation == Presentation::Video {
            host.release_media(&player.id);
        }
        let caption = player::placeholder(
            player.id.clone(),
            classes::MEDIA_PRIMARY,
            &self.i18n.tr("media-unavailable"),
        );
        if let Err(err) = host.replace(&player.id, caption) {
            tracing::debug!(error = %err, "failed overlay media already detached");
        }
        if let Some(live) = self
            .slots
            .get_mut(CENTER_POSITION)
            .and_then(|slot| slot.player.as_mut())
        {
            live.presentation = Presentation::Placeholder;
        }
        self.audio = None;
    }

    /// Stops every player of the window.
    fn silence_slots(&mut self, host: &mut dyn MediaHost) {
        for player in self.slots.iter().filter_map(|slot| slot.player.as_ref()) {
            match player.presentation {
                Presentation::Video => silence_video(host, &player.id),
                Presentation::Frame => {
                    self.remote.pause(host, &player.id);
                }
                Presentation::Image | Presentation::Placeholder => {}
            }
        }
    }

    /// Closes the overlay. Media is silenced before the container loses `active`.
    pub fn close(&mut self, host: &mut dyn MediaHost) {
        if !self.active {
            return;
        }
        self.pulse.cancel();
        self.playing = false;
        self.unmute_on_playing = false;
        self.playback_due = None;
        self.fullscreen_poll = None;
        self.silence_slots(host);
        host.set_class(self.ids.root(), classes::ACTIVE, false);
        host.set_class(&ElementId::body(), classes::REELS_MODE, false);
        host.remove(self.ids.root());
        self.slots.clear();
        self.audio = None;
        self.active = false;
        tracing::debug!(root = %self.ids.root(), "overlay closed");
    }

    /// Settle delay configured for this overlay.
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        self.config.settle_delay()
    }
}
