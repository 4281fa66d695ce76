// SPDX-License-Identifier: MPL-2.0
//! Full-screen media lightbox.
//!
//! Shows a sequence of media URLs with a five-slot render window (current ± 2)
//! and reconciles browser autoplay policy with what the user explicitly did:
//!
//! - the centre item plays, neighbours are mounted paused and muted;
//! - embeds that must start muted get a shield and the "tap for sound" pill;
//!   the first tap records the unmute gesture and starts an unmute burst;
//! - a manual pause or mute on an item stops every automatic attempt on it
//!   until the user navigates away and back;
//! - `close()` silences every video and frame before the overlay hides.
//!
//! The lightbox never reads the clock. Inputs and element events carry the
//! current time, and [`MediaLightbox::tick`] advances the idle timer, loader
//! fallbacks and the pulse burst.

mod controls;
mod gesture;
mod view;

pub use gesture::{DragFeedback, DragTracker, Gesture, Thresholds};

use crate::config::{Config, LightboxConfig};
use crate::host::{
    silence_video, AudioObservation, AudioTracker, ElementEvent, ElementEventKind, ElementId,
    MediaHost, PlayOutcome,
};
use crate::i18n::I18n;
use crate::media::window::render_window;
use crate::media::{MediaKind, PlaybackIntent, Presentation};
use crate::media_state::{AudioEvent, MediaState, Volume};
use crate::pulse::{PulsePolicy, PulseTask};
use crate::remote::{RemoteCommand, RemoteControl};
use crate::view::classes;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};
use view::{Ids, ItemNodes};

const SNAP_BACK_TRANSITION: &str = "transform 0.3s cubic-bezier(0.25, 0.8, 0.25, 1)";

/// Keys the lightbox reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

/// User input routed to the active lightbox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightboxInput {
    Key(Key),
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    ShieldTap,
    Next,
    Prev,
    Close,
    /// Any other pointer/touch activity (keeps controls visible).
    Activity,
}

/// Outcome of an input, for the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// The current index changed.
    Navigated(usize),
    /// The lightbox closed itself.
    Closed,
}

#[derive(Debug, Clone)]
struct Slot {
    nodes: ItemNodes,
    loader_deadline: Option<Instant>,
    audio: AudioTracker,
}

impl Slot {
    fn apply_audio(&mut self, host: &mut dyn MediaHost, muted: bool, volume: Volume) {
        self.audio.apply(host, &self.nodes.media, muted, volume);
    }

    fn play(&mut self, host: &mut dyn MediaHost) -> PlayOutcome {
        self.audio.play(host, &self.nodes.media)
    }
}

/// The full-screen viewer. Owned by [`crate::app::MediaContext`], which keeps
/// at most one alive.
#[derive(Debug)]
pub struct MediaLightbox {
    ids: Ids,
    config: LightboxConfig,
    pulse_policy: PulsePolicy,
    manual_pause_min_secs: f64,
    state: Rc<MediaState>,
    i18n: Rc<I18n>,
    remote: RemoteControl,
    items: Vec<String>,
    current: usize,
    render: u64,
    open: bool,
    slots: Vec<Slot>,
    intents: HashMap<usize, PlaybackIntent>,
    controls: Option<controls::State>,
    drag: DragTracker,
    pulse: PulseTask,
    pulse_unmute: bool,
    audio_unlocked: bool,
}

impl MediaLightbox {
    /// Creates a closed lightbox. `generation` scopes every element id.
    #[must_use]
    pub fn new(generation: u64, config: &Config, state: Rc<MediaState>, i18n: Rc<I18n>) -> Self {
        let lightbox = &config.lightbox;
        Self {
            ids: Ids::new(generation),
            config: lightbox.clone(),
            pulse_policy: config.pulse.policy(),
            manual_pause_min_secs: config.intent.manual_pause_min_secs,
            state,
            i18n,
            remote: RemoteControl::default(),
            items: Vec::new(),
            current: 0,
            render: 0,
            open: false,
            slots: Vec::new(),
            intents: HashMap::new(),
            controls: None,
            drag: DragTracker::new(Thresholds {
                axis_lock: lightbox.axis_lock_px,
                swipe: lightbox.swipe_threshold_px,
                dismiss: lightbox.dismiss_threshold_px,
            }),
            pulse: PulseTask::default(),
            pulse_unmute: false,
            audio_unlocked: false,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    #[must_use]
    pub fn root_id(&self) -> &ElementId {
        self.ids.root()
    }

    #[must_use]
    pub fn counter_id(&self) -> ElementId {
        self.ids.counter()
    }

    #[must_use]
    pub fn prev_id(&self) -> ElementId {
        self.ids.prev()
    }

    #[must_use]
    pub fn next_id(&self) -> ElementId {
        self.ids.next()
    }

    #[must_use]
    pub fn pill_id(&self) -> ElementId {
        self.ids.pill()
    }

    #[must_use]
    pub fn track_id(&self) -> ElementId {
        self.ids.track()
    }

    /// Id of the media element currently rendered for item `index`.
    #[must_use]
    pub fn media_id(&self, index: usize) -> Option<&ElementId> {
        self.slot_of(index).map(|pos| &self.slots[pos].nodes.media)
    }

    /// Id of the loader currently shown for item `index`.
    #[must_use]
    pub fn loader_id(&self, index: usize) -> Option<&ElementId> {
        self.slot_of(index)
            .and_then(|pos| self.slots[pos].nodes.loader.as_ref())
    }

    /// Whether any rendered item still waits for the unmute gesture.
    #[must_use]
    pub fn has_shield(&self) -> bool {
        self.slots.iter().any(|slot| slot.nodes.shield.is_some())
    }

    /// Id of the centre shield, if one is up.
    #[must_use]
    pub fn shield_id(&self) -> Option<&ElementId> {
        self.centre().and_then(|pos| self.slots[pos].nodes.shield.as_ref())
    }

    #[must_use]
    pub fn controls_visible(&self) -> bool {
        self.controls.as_ref().is_some_and(controls::State::is_visible)
    }

    #[must_use]
    pub fn is_pulsing(&self) -> bool {
        !self.pulse.is_finished()
    }

    /// Explicit user decisions recorded for item `index`.
    #[must_use]
    pub fn intent(&self, index: usize) -> PlaybackIntent {
        self.intents.get(&index).copied().unwrap_or_default()
    }

    fn slot_of(&self, index: usize) -> Option<usize> {
        self.slots.iter().position(|slot| slot.nodes.index == index)
    }

    fn centre(&self) -> Option<usize> {
        self.slot_of(self.current)
    }

    fn load_timeout(&self, presentation: Presentation) -> Option<Duration> {
        let ms = match presentation {
            Presentation::Image => self.config.image_load_timeout_ms,
            Presentation::Video => self.config.video_load_timeout_ms,
            Presentation::Frame => self.config.embed_load_timeout_ms,
            Presentation::Placeholder => return None,
        };
        Some(Duration::from_millis(ms))
    }

    /// Opens the lightbox on `items`, starting at `start` (clamped).
    ///
    /// An empty list is logged and ignored. Returns whether the lightbox is open.
    pub fn open(
        &mut self,
        host: &mut dyn MediaHost,
        items: Vec<String>,
        start: usize,
        now: Instant,
    ) -> bool {
        if items.is_empty() {
            tracing::warn!("lightbox open requested without media");
            return false;
        }
        if self.open {
            self.close(host);
        }
        let start = start.min(items.len() - 1);
        self.items = items;
        self.current = start;
        self.intents.clear();
        self.audio_unlocked = false;
        self.render += 1;

        let muted = self.state.should_start_muted();
        let (track, nodes) = view::track(
            &self.ids,
            self.render,
            &render_window(start, self.items.len()),
            &self.items,
            start,
            muted,
            &self.i18n,
        );
        let pill = nodes.iter().any(|n| n.index == start && n.shield.is_some());
        let root = view::root(&self.ids, track, start, self.items.len(), pill, &self.i18n);
        if let Err(err) = host.mount(None, root) {
            tracing::warn!(error = %err, "lightbox could not be attached");
            return false;
        }
        host.set_scroll_locked(true);
        host.set_class(self.ids.root(), classes::ACTIVE, true);
        self.open = true;
        self.controls = Some(controls::State::new(self.config.idle_hide(), now));
        tracing::debug!(
            root = %self.ids.root(),
            items = self.items.len(),
            start,
            muted,
            "lightbox opened"
        );
        self.adopt(host, nodes, now);
        true
    }

    /// Takes over freshly rendered items and applies the playback policy.
    fn adopt(&mut self, host: &mut dyn MediaHost, nodes: Vec<ItemNodes>, now: Instant) {
        self.slots = nodes
            .into_iter()
            .map(|nodes| Slot {
                loader_deadline: self.load_timeout(nodes.presentation).map(|t| now + t),
                audio: AudioTracker::new(nodes.muted),
                nodes,
            })
            .collect();
        self.apply_policy(host, now);
    }

    fn apply_policy(&mut self, host: &mut dyn MediaHost, now: Instant) {
        let muted = self.state.should_start_muted();
        let volume = self.state.volume();
        let current = self.current;
        let intent = self.intent(current);

        for slot in &mut self.slots {
            let center = slot.nodes.index == current;
            match slot.nodes.presentation {
                Presentation::Video if center => {
                    slot.apply_audio(host, muted || intent.user_muted, volume);
                    if !intent.user_paused {
                        slot.play(host);
                    }
                }
                Presentation::Video => {
                    slot.apply_audio(host, true, volume);
                    slot.audio.pause(host, &slot.nodes.media);
                }
                Presentation::Frame if !center => {
                    self.remote.pause(host, &slot.nodes.media);
                }
                _ => {}
            }
        }

        let playable = self
            .centre()
            .is_some_and(|pos| self.slots[pos].nodes.presentation.is_playable());
        if playable && !intent.blocks_automation() {
            self.start_burst(host, now, !muted);
        }
    }

    /// Starts a burst and performs its immediate first attempt.
    fn start_burst(&mut self, host: &mut dyn MediaHost, now: Instant, unmute: bool) {
        self.pulse_unmute = unmute;
        self.pulse.start(now, self.pulse_policy);
        self.run_pulse(host, now);
    }

    fn run_pulse(&mut self, host: &mut dyn MediaHost, now: Instant) {
        let stop = !self.open || self.intent(self.current).blocks_automation();
        let Some(attempt) = self.pulse.poll(now, || stop) else {
            return;
        };
        let Some(pos) = self.centre() else {
            self.pulse.cancel();
            return;
        };
        let volume = self.state.volume();
        let unmute = self.pulse_unmute;
        let slot = &mut self.slots[pos];
        tracing::trace!(attempt, element = %slot.nodes.media, unmute, "pulse");
        match slot.nodes.presentation {
            Presentation::Video => {
                if unmute {
                    slot.apply_audio(host, false, volume);
                }
                slot.play(host);
            }
            Presentation::Frame => {
                self.remote
                    .assert_playing(host, &slot.nodes.media, unmute, volume);
            }
            _ => self.pulse.cancel(),
        }
    }

    /// Advances timers: control auto-hide, loader fallbacks and the pulse burst.
    pub fn tick(&mut self, host: &mut dyn MediaHost, now: Instant) {
        if !self.open {
            return;
        }
        if let Some(controls) = self.controls.as_mut() {
            if let controls::Effect::VisibilityChanged(visible) =
                controls.handle(controls::Message::CheckTimeout(now))
            {
                host.set_class(self.ids.root(), classes::CONTROLS_HIDDEN, !visible);
            }
        }
        for pos in 0..self.slots.len() {
            if self.slots[pos].loader_deadline.is_some_and(|due| due <= now) {
                tracing::debug!(element = %self.slots[pos].nodes.media, "loader timed out");
                self.dismiss_loader(host, pos);
            }
        }
        self.run_pulse(host, now);
    }

    fn note_activity(&mut self, host: &mut dyn MediaHost, now: Instant) {
        if let Some(controls) = self.controls.as_mut() {
            if let controls::Effect::VisibilityChanged(visible) =
                controls.handle(controls::Message::Activity(now))
            {
                host.set_class(self.ids.root(), classes::CONTROLS_HIDDEN, !visible);
            }
        }
    }

    /// Routes one user input. Closed lightboxes ignore everything.
    pub fn handle_input(
        &mut self,
        host: &mut dyn MediaHost,
        input: LightboxInput,
        now: Instant,
    ) -> Effect {
        if !self.open {
            return Effect::None;
        }
        self.note_activity(host, now);
        match input {
            LightboxInput::Key(key) if self.config.keyboard => match key {
                Key::Escape => self.close(host),
                Key::ArrowLeft => self.prev(host, now),
                Key::ArrowRight => self.next(host, now),
                Key::Other => Effect::None,
            },
            LightboxInput::Key(_) | LightboxInput::Activity => Effect::None,
            LightboxInput::PointerDown { x, y } => {
                self.drag.begin(x, y);
                Effect::None
            }
            LightboxInput::PointerMove { x, y } => {
                let track = self.ids.track();
                match self.drag.update(x, y) {
                    DragFeedback::None => {}
                    DragFeedback::Horizontal(dx) => {
                        host.set_class(&track, classes::DRAGGING, true);
                        host.set_style(&track, "transition", "none");
                        host.set_style(&track, "transform", &format!("translate3d({dx}px, 0, 0)"));
                    }
                    DragFeedback::Vertical(dy) => {
                        host.set_class(&track, classes::DRAGGING, true);
                        host.set_style(&track, "transition", "none");
                        host.set_style(&track, "transform", &format!("translate3d(0, {dy}px, 0)"));
                    }
                }
                Effect::None
            }
            LightboxInput::PointerUp => {
                let gesture = self.drag.end();
                if gesture != Gesture::None {
                    host.set_class(&self.ids.track(), classes::DRAGGING, false);
                }
                let effect = match gesture {
                    Gesture::Next => self.next(host, now),
                    Gesture::Prev => self.prev(host, now),
                    Gesture::Dismiss => return self.close(host),
                    Gesture::SnapBack | Gesture::None => Effect::None,
                };
                if gesture != Gesture::None && effect == Effect::None {
                    self.snap_back(host);
                }
                effect
            }
            LightboxInput::ShieldTap => {
                self.shield_tap(host, now);
                Effect::None
            }
            LightboxInput::Next => self.next(host, now),
            LightboxInput::Prev => self.prev(host, now),
            LightboxInput::Close => self.close(host),
        }
    }

    fn snap_back(&mut self, host: &mut dyn MediaHost) {
        let track = self.ids.track();
        host.set_style(&track, "transition", SNAP_BACK_TRANSITION);
        host.set_style(&track, "transform", "translate3d(0, 0, 0)");
    }

    /// Moves to the next item. No-op on the last one.
    pub fn next(&mut self, host: &mut dyn MediaHost, now: Instant) -> Effect {
        if !self.open || self.current + 1 >= self.items.len() {
            return Effect::None;
        }
        self.navigate(host, self.current + 1, now)
    }

    /// Moves to the previous item. No-op on the first one.
    pub fn prev(&mut self, host: &mut dyn MediaHost, now: Instant) -> Effect {
        if !self.open || self.current == 0 {
            return Effect::None;
        }
        self.navigate(host, self.current - 1, now)
    }

    fn navigate(&mut self, host: &mut dyn MediaHost, target: usize, now: Instant) -> Effect {
        self.pulse.cancel();
        self.silence_window(host);
        // Leaving an item forgets both its manual pause and mute.
        self.intents.remove(&self.current);
        self.current = target;
        self.render += 1;

        let muted = self.state.should_start_muted();
        let (track, nodes) = view::track(
            &self.ids,
            self.render,
            &render_window(target, self.items.len()),
            &self.items,
            target,
            muted,
            &self.i18n,
        );
        if let Err(err) = host.replace(&self.ids.track(), track) {
            tracing::warn!(error = %err, "lightbox track vanished, closing");
            self.slots.clear();
            self.close(host);
            return Effect::Closed;
        }
        let len = self.items.len();
        host.set_text(&self.ids.counter(), &view::counter_text(target, len));
        host.set_class(&self.ids.prev(), classes::NAV_DISABLED, target == 0);
        host.set_class(&self.ids.next(), classes::NAV_DISABLED, target + 1 >= len);
        let pill = nodes.iter().any(|n| n.index == target && n.shield.is_some());
        host.set_class(&self.ids.pill(), classes::VISIBLE, pill);
        tracing::debug!(index = target, "lightbox navigated");

        self.adopt(host, nodes, now);
        Effect::Navigated(target)
    }

    /// Stops every video and frame of the current render window.
    fn silence_window(&mut self, host: &mut dyn MediaHost) {
        for slot in &self.slots {
            match slot.nodes.presentation {
                Presentation::Video => silence_video(host, &slot.nodes.media),
                Presentation::Frame => {
                    self.remote.pause(host, &slot.nodes.media);
                }
                Presentation::Image | Presentation::Placeholder => {}
            }
        }
    }

    /// Closes the lightbox. Media is silenced before the overlay loses `active`.
    pub fn close(&mut self, host: &mut dyn MediaHost) -> Effect {
        if !self.open {
            return Effect::None;
        }
        self.pulse.cancel();
        if let Some(controls) = self.controls.as_mut() {
            controls.stop();
        }
        self.drag.cancel();
        self.silence_window(host);
        host.set_class(self.ids.root(), classes::ACTIVE, false);
        host.set_scroll_locked(false);
        host.remove(self.ids.root());
        self.slots.clear();
        self.open = false;
        tracing::debug!(root = %self.ids.root(), "lightbox closed");
        Effect::Closed
    }

    fn release_shields(&mut self, host: &mut dyn MediaHost) {
        for slot in &mut self.slots {
            if let Some(shield) = slot.nodes.shield.take() {
                host.remove(&shield);
            }
        }
        host.set_class(&self.ids.pill(), classes::VISIBLE, false);
    }

    fn shield_tap(&mut self, host: &mut dyn MediaHost, now: Instant) {
        if !self.has_shield() {
            return;
        }
        self.state.set_unmuted();
        self.audio_unlocked = true;
        self.release_shields(host);
        if let Some(intent) = self.intents.get_mut(&self.current) {
            intent.user_muted = false;
        }
        if !self.intent(self.current).user_paused {
            self.start_burst(host, now, true);
        }
    }

    /// Reacts to a shared audio state change.
    pub fn handle_audio_event(&mut self, host: &mut dyn MediaHost, event: AudioEvent, now: Instant) {
        if !self.open {
            return;
        }
        match event {
            AudioEvent::Unmuted => {
                if self.audio_unlocked {
                    return;
                }
                self.audio_unlocked = true;
                self.release_shields(host);
                let playable = self
                    .centre()
                    .is_some_and(|pos| self.slots[pos].nodes.presentation.is_playable());
                if playable && !self.intent(self.current).blocks_automation() {
                    self.start_burst(host, now, true);
                }
            }
            AudioEvent::VolumeChanged(volume) => {
                let current = self.current;
                for slot in &mut self.slots {
                    match slot.nodes.presentation {
                        Presentation::Video => {
                            let muted = slot.audio.muted();
                            slot.apply_audio(host, muted, volume);
                        }
                        Presentation::Frame if slot.nodes.index == current => {
                            self.remote.send(
                                host,
                                &slot.nodes.media,
                                RemoteCommand::SetVolume(volume),
                            );
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    /// Routes a media element event. Events from nodes that are no longer
    /// rendered are ignored.
    pub fn handle_element_event(&mut self, host: &mut dyn MediaHost, event: &ElementEvent) {
        if !self.open {
            return;
        }
        let Some(pos) = self
            .slots
            .iter()
            .position(|slot| slot.nodes.media == event.element)
        else {
            tracing::trace!(element = %event.element, "ignoring event from stale element");
            return;
        };
        let index = self.slots[pos].nodes.index;
        match event.kind {
            ElementEventKind::Playing => {
                self.slots[pos].audio.observe_playing();
                self.intents.entry(index).or_default().record_playing();
            }
            ElementEventKind::Pause { current_time } => {
                if self.slots[pos].audio.observe_pause() {
                    tracing::trace!(index, current_time, "pause echo");
                    return;
                }
                let intent = self.intents.entry(index).or_default();
                let was_paused = intent.user_paused;
                if intent.record_pause(current_time, self.manual_pause_min_secs) && !was_paused {
                    tracing::debug!(index, current_time, "manual pause, backing off");
                    if index == self.current {
                        self.pulse.cancel();
                    }
                }
            }
            ElementEventKind::VolumeChange { muted, volume } => {
                self.volume_changed(pos, muted, volume);
            }
            ElementEventKind::Loaded => self.dismiss_loader(host, pos),
            ElementEventKind::Failed => self.show_failure(host, pos),
        }
    }

    fn volume_changed(&mut self, pos: usize, muted: bool, volume: f32) {
        let slot = &mut self.slots[pos];
        let observation = slot.audio.observe(muted, volume);
        let AudioObservation::User { volume, .. } = observation else {
            return;
        };
        let index = slot.nodes.index;

        let silenced = observation.is_user_silence();
        self.intents.entry(index).or_default().user_muted = silenced;
        if silenced {
            tracing::debug!(index, "user muted, backing off");
            if index == self.current {
                self.pulse.cancel();
            }
        } else {
            tracing::debug!(index, volume = %volume, "user unmuted");
            self.audio_unlocked = true;
            if !self.state.is_unmuted() {
                self.state.set_unmuted();
            }
            self.state.set_volume(volume);
        }
    }

    fn dismiss_loader(&mut self, host: &mut dyn MediaHost, pos: usize) {
        let slot = &mut self.slots[pos];
        slot.loader_deadline = None;
        if let Some(loader) = slot.nodes.loader.take() {
            host.remove(&loader);
        }
    }

    fn show_failure(&mut self, host: &mut dyn MediaHost, pos: usize) {
        self.dismiss_loader(host, pos);
        let slot = &mut self.slots[pos];
        tracing::debug!(element = %slot.nodes.media, kind = slot.nodes.kind.as_str(), "media failed to load");
        if slot.nodes.presentation == Presentation::Video {
            host.release_media(&slot.nodes.media);
        }
        let caption = view::failure(slot.nodes.media.clone(), &self.i18n);
        if let Err(err) = host.replace(&slot.nodes.media, caption) {
            tracing::debug!(error = %err, "failed media already detached");
        }
        slot.nodes.presentation = Presentation::Placeholder;
        let had_shield = slot.nodes.shield.take();
        let index = slot.nodes.index;
        if let Some(shield) = had_shield {
            host.remove(&shield);
            host.set_class(&self.ids.pill(), classes::VISIBLE, false);
        }
        if index == self.current {
            self.pulse.cancel();
        }
    }

    /// Kind of the item at the centre of the window.
    #[must_use]
    pub fn current_kind(&self) -> Option<MediaKind> {
        self.centre().map(|pos| self.slots[pos].nodes.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{Device, Strategy};
    use crate::host::RecordingHost;
    use crate::media_state::drain_events;
    use crate::test_utils::{assert_abs_diff_eq, fixtures, F32_EPSILON};

    fn lightbox(strategy: Strategy) -> (MediaLightbox, Rc<MediaState>) {
        let (config, state, i18n) = fixtures(strategy);
        let lb = MediaLightbox::new(1, &config, Rc::clone(&state), i18n);
        (lb, state)
    }

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|u| (*u).to_string()).collect()
    }

    #[test]
    fn empty_open_is_ignored() {
        let (mut lb, _) = lightbox(Strategy::Muted);
        let mut host = RecordingHost::new();
        assert!(!lb.open(&mut host, Vec::new(), 0, Instant::now()));
        assert!(host.calls().is_empty());
    }

    #[test]
    fn start_index_is_clamped() {
        let (mut lb, _) = lightbox(Strategy::Muted);
        let mut host = RecordingHost::new();
        assert!(lb.open(&mut host, urls(&["a.jpg", "b.jpg"]), 9, Instant::now()));
        assert_eq!(lb.current_index(), 1);
        assert_eq!(host.text(&lb.counter_id()), Some("2 / 2"));
    }

    #[test]
    fn controls_hide_after_idle_and_return_on_activity() {
        let (mut lb, _) = lightbox(Strategy::Muted);
        let mut host = RecordingHost::new();
        let start = Instant::now();
        lb.open(&mut host, urls(&["a.jpg"]), 0, start);

        lb.tick(&mut host, start + Duration::from_secs(2));
        assert!(host.has_class(lb.root_id(), classes::CONTROLS_HIDDEN));
        assert!(!lb.controls_visible());

        lb.handle_input(&mut host, LightboxInput::Activity, start + Duration::from_secs(3));
        assert!(!host.has_class(lb.root_id(), classes::CONTROLS_HIDDEN));
    }

    #[test]
    fn loader_falls_back_after_timeout() {
        let (mut lb, _) = lightbox(Strategy::Muted);
        let mut host = RecordingHost::new();
        let start = Instant::now();
        lb.open(&mut host, urls(&["a.jpg", "b.mp4"]), 0, start);
        let image_loader = lb.loader_id(0).cloned().expect("image loader");
        let video_loader = lb.loader_id(1).cloned().expect("video loader");

        lb.tick(&mut host, start + Duration::from_secs(3));
        assert!(!host.exists(&image_loader));
        assert!(host.exists(&video_loader));

        lb.tick(&mut host, start + Duration::from_secs(6));
        assert!(!host.exists(&video_loader));
    }

    #[test]
    fn loaded_event_removes_loader_and_failure_shows_caption() {
        let (mut lb, _) = lightbox(Strategy::Muted);
        let mut host = RecordingHost::new();
        lb.open(&mut host, urls(&["a.jpg", "b.jpg"]), 0, Instant::now());
        let media = lb.media_id(0).cloned().expect("media");
        let loader = lb.loader_id(0).cloned().expect("loader");

        lb.handle_element_event(&mut host, &ElementEvent::new(media.clone(), ElementEventKind::Loaded));
        assert!(!host.exists(&loader));

        let other = lb.media_id(1).cloned().expect("media");
        lb.handle_element_event(&mut host, &ElementEvent::new(other.clone(), ElementEventKind::Failed));
        assert!(host.has_class(&other, classes::PLACEHOLDER));
    }

    #[test]
    fn stale_events_are_ignored_after_navigation() {
        let (mut lb, _) = lightbox(Strategy::Unmuted);
        let mut host = RecordingHost::new();
        let now = Instant::now();
        lb.open(&mut host, urls(&["a.mp4", "b.mp4"]), 0, now);
        let old = lb.media_id(0).cloned().expect("video");
        lb.next(&mut host, now);

        lb.handle_element_event(&mut host, &ElementEvent::new(old, ElementEventKind::Playing));
        lb.handle_element_event(
            &mut host,
            &ElementEvent::new(
                lb.media_id(0).cloned().expect("re-rendered"),
                ElementEventKind::Pause { current_time: 3.0 },
            ),
        );
        assert!(!lb.intent(0).user_paused);
    }

    #[test]
    fn own_volume_changes_are_not_user_actions() {
        let (mut lb, state) = lightbox(Strategy::Unmuted);
        let mut host = RecordingHost::new();
        let mut rx = state.subscribe();
        lb.open(&mut host, urls(&["a.mp4"]), 0, Instant::now());
        let video = lb.media_id(0).cloned().expect("video");

        // Echo of the volume the lightbox applied on open.
        lb.handle_element_event(
            &mut host,
            &ElementEvent::new(
                video,
                ElementEventKind::VolumeChange {
                    muted: false,
                    volume: state.volume().value(),
                },
            ),
        );
        assert!(!lb.intent(0).user_muted);
        assert!(drain_events(&mut rx).is_empty());
    }

    #[test]
    fn user_mute_then_unmute_through_native_controls() {
        let (mut lb, state) = lightbox(Strategy::Muted);
        let mut host = RecordingHost::new();
        let now = Instant::now();
        lb.open(&mut host, urls(&["a.mp4"]), 0, now);
        let video = lb.media_id(0).cloned().expect("video");

        lb.handle_element_event(
            &mut host,
            &ElementEvent::new(
                video.clone(),
                ElementEventKind::VolumeChange {
                    muted: false,
                    volume: 0.8,
                },
            ),
        );
        assert!(state.is_unmuted());
        assert_eq!(state.volume(), Volume::new(0.8));
        assert!(!lb.intent(0).user_muted);

        lb.handle_element_event(
            &mut host,
            &ElementEvent::new(
                video,
                ElementEventKind::VolumeChange {
                    muted: true,
                    volume: 0.8,
                },
            ),
        );
        assert!(lb.intent(0).user_muted);
        assert!(!lb.is_pulsing());
    }

    #[test]
    fn keyboard_can_be_disabled() {
        let state = Rc::new(MediaState::in_memory(Device::with_strategy(Strategy::Muted)));
        let mut config = Config::default();
        config.lightbox.keyboard = false;
        let mut lb = MediaLightbox::new(1, &config, state, Rc::new(I18n::default()));
        let mut host = RecordingHost::new();
        let now = Instant::now();
        lb.open(&mut host, urls(&["a.jpg", "b.jpg"]), 0, now);

        assert_eq!(
            lb.handle_input(&mut host, LightboxInput::Key(Key::ArrowRight), now),
            Effect::None
        );
        assert_eq!(
            lb.handle_input(&mut host, LightboxInput::Key(Key::Escape), now),
            Effect::None
        );
        assert!(lb.is_open());
    }

    #[test]
    fn drag_feedback_moves_track_and_snaps_back() {
        let (mut lb, _) = lightbox(Strategy::Muted);
        let mut host = RecordingHost::new();
        let now = Instant::now();
        lb.open(&mut host, urls(&["a.jpg", "b.jpg"]), 0, now);
        let track = lb.track_id();

        lb.handle_input(&mut host, LightboxInput::PointerDown { x: 100.0, y: 100.0 }, now);
        lb.handle_input(&mut host, LightboxInput::PointerMove { x: 80.0, y: 101.0 }, now);
        assert_eq!(host.style(&track, "transform"), Some("translate3d(-20px, 0, 0)"));
        assert!(host.has_class(&track, classes::DRAGGING));

        assert_eq!(lb.handle_input(&mut host, LightboxInput::PointerUp, now), Effect::None);
        assert_eq!(host.style(&track, "transform"), Some("translate3d(0, 0, 0)"));
        assert_eq!(host.style(&track, "transition"), Some(SNAP_BACK_TRANSITION));
        assert!(!host.has_class(&track, classes::DRAGGING));
    }

    #[test]
    fn swipe_at_the_end_snaps_back() {
        let (mut lb, _) = lightbox(Strategy::Muted);
        let mut host = RecordingHost::new();
        let now = Instant::now();
        lb.open(&mut host, urls(&["a.jpg"]), 0, now);
        lb.handle_input(&mut host, LightboxInput::PointerDown { x: 200.0, y: 0.0 }, now);
        lb.handle_input(&mut host, LightboxInput::PointerMove { x: 100.0, y: 0.0 }, now);
        assert_eq!(lb.handle_input(&mut host, LightboxInput::PointerUp, now), Effect::None);
        assert_eq!(host.style(&lb.track_id(), "transform"), Some("translate3d(0, 0, 0)"));
    }

    #[test]
    fn pull_down_closes() {
        let (mut lb, _) = lightbox(Strategy::Muted);
        let mut host = RecordingHost::new();
        let now = Instant::now();
        lb.open(&mut host, urls(&["a.jpg"]), 0, now);
        lb.handle_input(&mut host, LightboxInput::PointerDown { x: 0.0, y: 0.0 }, now);
        lb.handle_input(&mut host, LightboxInput::PointerMove { x: 0.0, y: 150.0 }, now);
        assert_eq!(lb.handle_input(&mut host, LightboxInput::PointerUp, now), Effect::Closed);
        assert!(!host.is_scroll_locked());
    }

    #[test]
    fn volume_broadcast_converges_rendered_videos() {
        let (mut lb, _) = lightbox(Strategy::Unmuted);
        let mut host = RecordingHost::new();
        let now = Instant::now();
        lb.open(&mut host, urls(&["a.mp4", "b.mp4"]), 0, now);

        lb.handle_audio_event(&mut host, AudioEvent::VolumeChanged(Volume::new(0.7)), now);
        for index in 0..2 {
            let id = lb.media_id(index).expect("video");
            let status = host.video(id).expect("tracked");
            assert_abs_diff_eq!(status.volume, 0.7, epsilon = F32_EPSILON);
        }
    }
}
