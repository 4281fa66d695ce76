// SPDX-License-Identifier: MPL-2.0
//! Explicit owner of the media surfaces of one page.
//!
//! [`MediaContext`] wires the shared [`MediaState`], localization and
//! configuration into at most one [`MediaLightbox`] and at most one
//! [`MediaOverlay`]. Opening a surface closes (and silences) the previous
//! instance of the same kind, and every input or element event is routed to
//! the live instances only, so a superseded instance can never react again.
//!
//! The context is also where [`AudioEvent`]s broadcast by the shared state are
//! forwarded to the surfaces, on every [`MediaContext::tick`].

pub mod paths;
pub mod persisted_state;

use crate::config::{self, Config};
use crate::device::Device;
use crate::host::{ElementEvent, MediaHost};
use crate::i18n::I18n;
use crate::lightbox::{Effect, LightboxInput, MediaLightbox};
use crate::media_state::{drain_events, AudioEvent, MediaState, MemoryStore, StateStore, Volume};
use crate::overlay::{MediaOverlay, Product, ProductScope};
use persisted_state::FileStore;
use std::rc::Rc;
use std::time::Instant;
use tokio::sync::broadcast;

/// Start-up options, usually parsed from the command line.
#[derive(Debug, Clone, Default)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `fr`, `en-US`).
    pub lang: Option<String>,
    /// Optional data directory override (for the persisted media state).
    /// Takes precedence over `VIBEDRIPS_DATA_DIR`.
    pub data_dir: Option<String>,
    /// Optional config directory override (for settings.toml).
    /// Takes precedence over `VIBEDRIPS_CONFIG_DIR`.
    pub config_dir: Option<String>,
    /// Keep the media state in memory instead of the data directory.
    pub ephemeral: bool,
}

/// Owner of the page's media surfaces.
#[derive(Debug)]
pub struct MediaContext {
    config: Config,
    i18n: Rc<I18n>,
    state: Rc<MediaState>,
    audio_events: broadcast::Receiver<AudioEvent>,
    lightbox: Option<MediaLightbox>,
    overlay: Option<MediaOverlay>,
    scope: ProductScope,
    generation: u64,
    warnings: Vec<String>,
}

impl MediaContext {
    #[must_use]
    pub fn new(config: Config, i18n: I18n, state: MediaState) -> Self {
        let state = Rc::new(state);
        Self {
            audio_events: state.subscribe(),
            config,
            i18n: Rc::new(i18n),
            state,
            lightbox: None,
            overlay: None,
            scope: ProductScope::default(),
            generation: 0,
            warnings: Vec::new(),
        }
    }

    /// Loads configuration and persisted state as described by `flags`.
    ///
    /// Unreadable files fall back to defaults; their i18n warning keys are
    /// available through [`MediaContext::warnings`].
    #[must_use]
    pub fn bootstrap(flags: Flags, device: Device) -> Self {
        paths::init_cli_overrides(flags.data_dir, flags.config_dir);
        let mut warnings = Vec::new();
        let (config, config_warning) = config::load();
        warnings.extend(config_warning);

        let store: Box<dyn StateStore> = if flags.ephemeral {
            Box::new(MemoryStore::new())
        } else {
            match FileStore::open() {
                Some((store, warning)) => {
                    warnings.extend(warning);
                    Box::new(store)
                }
                None => {
                    tracing::warn!("no data directory available, media state is not persisted");
                    Box::new(MemoryStore::new())
                }
            }
        };
        let i18n = I18n::new(flags.lang, &config);
        let state = MediaState::new(device, store, Volume::new(config.audio.default_volume));
        tracing::info!(
            strategy = %state.strategy(),
            unmuted = state.is_unmuted(),
            locale = %i18n.current_locale(),
            "media context ready"
        );
        let mut context = Self::new(config, i18n, state);
        context.warnings = warnings;
        context
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn i18n(&self) -> &I18n {
        &self.i18n
    }

    #[must_use]
    pub fn state(&self) -> &MediaState {
        &self.state
    }

    /// I18n keys of start-up problems worth telling the user about.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// The live lightbox, if one is open.
    #[must_use]
    pub fn lightbox(&self) -> Option<&MediaLightbox> {
        self.lightbox.as_ref().filter(|lb| lb.is_open())
    }

    /// The live overlay, if one is active.
    #[must_use]
    pub fn overlay(&self) -> Option<&MediaOverlay> {
        self.overlay.as_ref().filter(|overlay| overlay.is_active())
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Opens a lightbox on `items`, closing the current one first.
    pub fn open_lightbox(
        &mut self,
        host: &mut dyn MediaHost,
        items: Vec<String>,
        start: usize,
        now: Instant,
    ) -> bool {
        self.close_lightbox(host);
        let generation = self.next_generation();
        let mut lightbox = MediaLightbox::new(
            generation,
            &self.config,
            Rc::clone(&self.state),
            Rc::clone(&self.i18n),
        );
        if !lightbox.open(host, items, start, now) {
            return false;
        }
        self.lightbox = Some(lightbox);
        true
    }

    pub fn close_lightbox(&mut self, host: &mut dyn MediaHost) {
        if let Some(mut lightbox) = self.lightbox.take() {
            lightbox.close(host);
        }
    }

    /// Routes user input to the live lightbox.
    pub fn lightbox_input(
        &mut self,
        host: &mut dyn MediaHost,
        input: LightboxInput,
        now: Instant,
    ) -> Effect {
        let Some(lightbox) = self.lightbox.as_mut() else {
            return Effect::None;
        };
        let effect = lightbox.handle_input(host, input, now);
        if effect == Effect::Closed {
            self.lightbox = None;
        }
        effect
    }

    /// Sets the product list the overlay browses.
    pub fn set_product_scope(&mut self, scope: ProductScope) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.set_scope(scope.clone());
        }
        self.scope = scope;
    }

    /// Opens the reels overlay on `product`, closing the current one first.
    pub fn open_overlay(&mut self, host: &mut dyn MediaHost, product: Product, now: Instant) -> bool {
        self.close_overlay(host);
        let generation = self.next_generation();
        let mut overlay = MediaOverlay::new(
            generation,
            &self.config,
            Rc::clone(&self.state),
            Rc::clone(&self.i18n),
        );
        overlay.set_scope(self.scope.clone());
        if !overlay.open(host, product, now) {
            return false;
        }
        self.scope = overlay.scope().clone();
        self.overlay = Some(overlay);
        true
    }

    pub fn close_overlay(&mut self, host: &mut dyn MediaHost) {
        if let Some(mut overlay) = self.overlay.take() {
            overlay.close(host);
        }
    }

    /// Moves the overlay to product `index` of the scope.
    pub fn show_product(&mut self, host: &mut dyn MediaHost, index: usize, now: Instant) -> bool {
        let shown = self
            .overlay
            .as_mut()
            .is_some_and(|overlay| overlay.show_product(host, index, now));
        if shown {
            self.scope.set_current(index);
        }
        shown
    }

    /// Promotes thumbnail `index` of the overlay's current product.
    pub fn swap_media(&mut self, host: &mut dyn MediaHost, index: usize, now: Instant) -> bool {
        self.overlay
            .as_mut()
            .is_some_and(|overlay| overlay.swap_media(host, index, now))
    }

    pub fn toggle_overlay_playback(&mut self, host: &mut dyn MediaHost, play: bool, now: Instant) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.toggle_playback(host, play, now);
        }
    }

    /// Pauses the overlay and shows its current media in the lightbox.
    ///
    /// The overlay resumes on a later [`tick`](Self::tick) once the lightbox
    /// is gone.
    pub fn open_overlay_fullscreen(&mut self, host: &mut dyn MediaHost, now: Instant) -> bool {
        let Some(request) = self
            .overlay
            .as_mut()
            .and_then(|overlay| overlay.open_fullscreen(host, now))
        else {
            return false;
        };
        self.open_lightbox(host, request.media, request.index, now)
    }

    /// Routes a media element event to whichever live surface owns it.
    pub fn element_event(&mut self, host: &mut dyn MediaHost, event: &ElementEvent) {
        if let Some(lightbox) = self.lightbox.as_mut() {
            lightbox.handle_element_event(host, event);
        }
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.handle_element_event(host, event);
        }
    }

    /// Forwards pending audio events and advances every timer.
    pub fn tick(&mut self, host: &mut dyn MediaHost, now: Instant) {
        for event in drain_events(&mut self.audio_events) {
            tracing::trace!(?event, "forwarding audio event");
            if let Some(lightbox) = self.lightbox.as_mut() {
                lightbox.handle_audio_event(host, event, now);
            }
            if let Some(overlay) = self.overlay.as_mut() {
                overlay.handle_audio_event(host, event, now);
            }
        }
        if let Some(lightbox) = self.lightbox.as_mut() {
            lightbox.tick(host, now);
        }
        if self.lightbox.as_ref().is_some_and(|lb| !lb.is_open()) {
            self.lightbox = None;
        }
        let lightbox_open = self.lightbox.is_some();
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.tick(host, now, lightbox_open);
        }
    }

    /// Closes every surface.
    pub fn close_all(&mut self, host: &mut dyn MediaHost) {
        self.close_lightbox(host);
        self.close_overlay(host);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Strategy;
    use crate::host::{ElementId, RecordingHost};

    fn context(strategy: Strategy) -> MediaContext {
        MediaContext::new(
            Config::default(),
            I18n::default(),
            MediaState::in_memory(Device::with_strategy(strategy)),
        )
    }

    #[test]
    fn reopening_replaces_the_lightbox() {
        let mut ctx = context(Strategy::Unmuted);
        let mut host = RecordingHost::new();
        let now = Instant::now();

        assert!(ctx.open_lightbox(&mut host, vec!["a.mp4".into()], 0, now));
        let first = ctx.lightbox().expect("open").root_id().clone();
        assert!(ctx.open_lightbox(&mut host, vec!["b.mp4".into()], 0, now));
        let second = ctx.lightbox().expect("open").root_id().clone();

        assert_ne!(first, second);
        assert!(!host.exists(&first));
        assert!(host.exists(&second));
    }

    #[test]
    fn failed_open_leaves_no_lightbox() {
        let mut ctx = context(Strategy::Muted);
        let mut host = RecordingHost::new();
        assert!(!ctx.open_lightbox(&mut host, Vec::new(), 0, Instant::now()));
        assert!(ctx.lightbox().is_none());
        assert_eq!(
            ctx.lightbox_input(&mut host, LightboxInput::Next, Instant::now()),
            Effect::None
        );
    }

    #[test]
    fn closing_input_drops_the_instance() {
        let mut ctx = context(Strategy::Muted);
        let mut host = RecordingHost::new();
        let now = Instant::now();
        ctx.open_lightbox(&mut host, vec!["a.jpg".into()], 0, now);

        assert_eq!(
            ctx.lightbox_input(&mut host, LightboxInput::Close, now),
            Effect::Closed
        );
        assert!(ctx.lightbox().is_none());
    }

    #[test]
    fn overlay_without_container_is_not_kept() {
        let mut ctx = context(Strategy::Muted);
        let mut host = RecordingHost::new();
        let product = Product::new("p", vec!["a.jpg".into()]);
        assert!(!ctx.open_overlay(&mut host, product, Instant::now()));
        assert!(ctx.overlay().is_none());

        host.add_container(ElementId::new(ctx.config().overlay.container.clone()));
        let product = Product::new("p", vec!["a.jpg".into()]);
        assert!(ctx.open_overlay(&mut host, product, Instant::now()));
        assert!(ctx.overlay().is_some());
    }
}
