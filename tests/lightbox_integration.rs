// SPDX-License-Identifier: MPL-2.0
use std::time::{Duration, Instant};
use vibedrips_media::app::MediaContext;
use vibedrips_media::config::Config;
use vibedrips_media::device::{Device, Strategy};
use vibedrips_media::host::{ElementEvent, ElementEventKind, ElementId, HostCall, MediaHost, RecordingHost};
use vibedrips_media::i18n::I18n;
use vibedrips_media::lightbox::{Effect, Key, LightboxInput};
use vibedrips_media::media_state::MediaState;
use vibedrips_media::view::classes;

fn context(strategy: Strategy) -> MediaContext {
    let config = Config::default();
    let i18n = I18n::new(Some("en-US".to_string()), &config);
    MediaContext::new(config, i18n, MediaState::in_memory(Device::with_strategy(strategy)))
}

fn urls(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn media_id(ctx: &MediaContext, index: usize) -> ElementId {
    ctx.lightbox()
        .and_then(|lb| lb.media_id(index))
        .cloned()
        .expect("item is rendered")
}

#[test]
fn opening_a_second_lightbox_silences_and_detaches_the_first() {
    let mut ctx = context(Strategy::Unmuted);
    let mut host = RecordingHost::new();
    let now = Instant::now();

    ctx.open_lightbox(&mut host, urls(&["a.mp4", "b.mp4"]), 0, now);
    let first_root = ctx.lightbox().expect("open").root_id().clone();
    let first_video = media_id(&ctx, 0);
    assert!(!host.video(&first_video).expect("video").paused);

    ctx.open_lightbox(&mut host, urls(&["c.mp4", "d.mp4", "e.mp4"]), 0, now);
    let second_video = media_id(&ctx, 0);

    let first = host.video(&first_video).expect("video");
    assert!(first.paused);
    assert!(first.muted);
    assert!(first.released);
    assert!(!host.exists(&first_root));
    assert!(!host.video(&second_video).expect("video").paused);

    // Keys reach the new instance only.
    let effect = ctx.lightbox_input(&mut host, LightboxInput::Key(Key::ArrowRight), now);
    assert_eq!(effect, Effect::Navigated(1));
    assert_eq!(ctx.lightbox().expect("open").items().len(), 3);

    // Events from the superseded instance change nothing.
    host.clear_calls();
    ctx.element_event(&mut host, &ElementEvent::new(first_video, ElementEventKind::Failed));
    assert!(host.calls().is_empty());
}

#[test]
fn navigation_is_clamped_at_both_ends() {
    let mut ctx = context(Strategy::Muted);
    let mut host = RecordingHost::new();
    let now = Instant::now();
    ctx.open_lightbox(&mut host, urls(&["a.jpg", "b.jpg", "c.jpg"]), 0, now);

    assert_eq!(ctx.lightbox_input(&mut host, LightboxInput::Prev, now), Effect::None);
    assert_eq!(ctx.lightbox().expect("open").current_index(), 0);

    ctx.lightbox_input(&mut host, LightboxInput::Next, now);
    ctx.lightbox_input(&mut host, LightboxInput::Next, now);
    assert_eq!(ctx.lightbox_input(&mut host, LightboxInput::Next, now), Effect::None);
    let lightbox = ctx.lightbox().expect("open");
    assert_eq!(lightbox.current_index(), 2);
    assert_eq!(host.text(&lightbox.counter_id()), Some("3 / 3"));
    assert!(host.has_class(&lightbox.next_id(), classes::NAV_DISABLED));
    assert!(!host.has_class(&lightbox.prev_id(), classes::NAV_DISABLED));
}

#[test]
fn close_silences_media_before_hiding() {
    let mut ctx = context(Strategy::Unmuted);
    let mut host = RecordingHost::new();
    let now = Instant::now();
    ctx.open_lightbox(
        &mut host,
        urls(&["a.mp4", "https://www.youtube.com/watch?v=XYZ", "b.mp4"]),
        1,
        now,
    );
    let root = ctx.lightbox().expect("open").root_id().clone();
    let videos = [media_id(&ctx, 0), media_id(&ctx, 2)];
    let frame = media_id(&ctx, 1);
    host.clear_calls();

    ctx.close_lightbox(&mut host);

    let hidden = host
        .position(|call| {
            matches!(call, HostCall::SetClass { target, class, enabled: false }
                if *target == root && class == classes::ACTIVE)
        })
        .expect("active removed");
    for video in &videos {
        let paused = host
            .position(|call| *call == HostCall::Pause(video.clone()))
            .expect("video paused");
        assert!(paused < hidden);
        assert!(host.video(video).expect("video").paused);
    }
    let frame_paused = host
        .position(|call| {
            matches!(call, HostCall::PostMessage { frame: f, payload }
                if *f == frame && payload.get("func").and_then(|v| v.as_str()) == Some("pauseVideo"))
        })
        .expect("frame paused");
    assert!(frame_paused < hidden);
    assert!(!host.is_scroll_locked());
    assert!(!host.exists(&root));
}

#[test]
fn manual_pause_stops_automation_until_navigating_back() {
    let mut ctx = context(Strategy::Unmuted);
    let mut host = RecordingHost::new();
    let t0 = Instant::now();
    ctx.open_lightbox(&mut host, urls(&["a.mp4", "b.mp4"]), 0, t0);
    let video = media_id(&ctx, 0);

    ctx.element_event(&mut host, &ElementEvent::new(video.clone(), ElementEventKind::Playing));
    ctx.element_event(
        &mut host,
        &ElementEvent::new(video.clone(), ElementEventKind::Pause { current_time: 2.5 }),
    );
    assert!(ctx.lightbox().expect("open").intent(0).user_paused);
    host.clear_calls();

    let mut t = t0;
    for _ in 0..12 {
        t += Duration::from_millis(400);
        ctx.tick(&mut host, t);
    }
    assert_eq!(host.play_attempts(&video), 0);
    assert!(!host
        .calls()
        .iter()
        .any(|call| matches!(call, HostCall::SetMuted { video: v, .. } if *v == video)));

    ctx.lightbox_input(&mut host, LightboxInput::Next, t);
    ctx.lightbox_input(&mut host, LightboxInput::Prev, t);
    let fresh = media_id(&ctx, 0);
    assert_ne!(fresh, video);
    assert!(!ctx.lightbox().expect("open").intent(0).user_paused);
    assert!(host.play_attempts(&fresh) >= 1);
}

#[test]
fn autoplay_pause_at_time_zero_is_not_manual() {
    let mut ctx = context(Strategy::Unmuted);
    let mut host = RecordingHost::new();
    let now = Instant::now();
    ctx.open_lightbox(&mut host, urls(&["a.mp4"]), 0, now);
    let video = media_id(&ctx, 0);

    ctx.element_event(&mut host, &ElementEvent::new(video.clone(), ElementEventKind::Playing));
    ctx.element_event(
        &mut host,
        &ElementEvent::new(video, ElementEventKind::Pause { current_time: 0.0 }),
    );
    assert!(!ctx.lightbox().expect("open").intent(0).user_paused);
}

#[test]
fn single_image_shows_counter_and_disables_both_arrows() {
    let mut ctx = context(Strategy::Muted);
    let mut host = RecordingHost::new();
    assert!(ctx.open_lightbox(&mut host, urls(&["a.jpg"]), 0, Instant::now()));

    let lightbox = ctx.lightbox().expect("open");
    assert!(host.has_class(lightbox.root_id(), classes::ACTIVE));
    assert!(host.has_class(lightbox.root_id(), classes::LIGHTBOX_OVERLAY));
    assert_eq!(host.text(&lightbox.counter_id()), Some("1 / 1"));
    assert!(host.has_class(&lightbox.prev_id(), classes::NAV_DISABLED));
    assert!(host.has_class(&lightbox.next_id(), classes::NAV_DISABLED));
    assert!(host.is_scroll_locked());
}

#[test]
fn muted_embed_is_shielded_until_tapped() {
    let mut ctx = context(Strategy::Muted);
    let mut host = RecordingHost::new();
    let now = Instant::now();
    assert!(!ctx.state().is_unmuted());
    ctx.open_lightbox(&mut host, urls(&["https://youtube.com/watch?v=XYZ"]), 0, now);

    let frame = media_id(&ctx, 0);
    let src = host.attr(&frame, "src").expect("embed src");
    assert!(src.contains("/embed/XYZ"));
    assert!(src.contains("mute=1"));
    let lightbox = ctx.lightbox().expect("open");
    assert!(lightbox.has_shield());
    assert!(host.has_class(&lightbox.pill_id(), classes::VISIBLE));
    assert_eq!(host.text(&lightbox.pill_id()), Some("Tap for sound"));
    host.clear_calls();

    ctx.lightbox_input(&mut host, LightboxInput::ShieldTap, now);

    assert!(ctx.state().is_unmuted());
    assert!(!ctx.state().should_start_muted());
    let lightbox = ctx.lightbox().expect("open");
    assert!(!lightbox.has_shield());
    assert!(lightbox.is_pulsing());
    let funcs: Vec<_> = host
        .messages_to(&frame)
        .into_iter()
        .filter_map(|m| m.get("func").and_then(|f| f.as_str()))
        .collect();
    assert!(funcs.contains(&"unMute"));
    assert!(funcs.contains(&"playVideo"));
}

#[test]
fn ios_keeps_videos_muted_after_the_gesture() {
    let mut ctx = context(Strategy::Ios);
    let mut host = RecordingHost::new();
    ctx.state().set_unmuted();
    ctx.open_lightbox(&mut host, urls(&["a.mp4"]), 0, Instant::now());

    let video = media_id(&ctx, 0);
    assert!(host.video(&video).expect("video").muted);
}

#[test]
fn mute_choice_is_forgotten_after_navigating_away_and_back() {
    let mut ctx = context(Strategy::Unmuted);
    let mut host = RecordingHost::new();
    let now = Instant::now();
    ctx.open_lightbox(&mut host, urls(&["a.mp4", "b.mp4"]), 0, now);
    let video = media_id(&ctx, 0);

    ctx.element_event(
        &mut host,
        &ElementEvent::new(video, ElementEventKind::VolumeChange { muted: true, volume: 0.3 }),
    );
    assert!(ctx.lightbox().expect("open").intent(0).user_muted);
    assert!(!ctx.lightbox().expect("open").is_pulsing());

    ctx.lightbox_input(&mut host, LightboxInput::Next, now);
    ctx.lightbox_input(&mut host, LightboxInput::Prev, now);

    let lightbox = ctx.lightbox().expect("open");
    assert!(!lightbox.intent(0).user_muted);
    assert!(lightbox.is_pulsing());
    let fresh = media_id(&ctx, 0);
    assert!(!host.video(&fresh).expect("video").muted);
}

fn unmute_sends(host: &RecordingHost, frame: &ElementId) -> usize {
    host.messages_to(frame)
        .into_iter()
        .filter(|m| m.get("func").and_then(|f| f.as_str()) == Some("unMute"))
        .count()
}

#[test]
fn shield_tap_runs_the_full_unmute_burst() {
    let mut ctx = context(Strategy::Muted);
    let mut host = RecordingHost::new();
    let t0 = Instant::now();
    ctx.open_lightbox(&mut host, urls(&["https://youtu.be/XYZ"]), 0, t0);
    let frame = media_id(&ctx, 0);
    assert_eq!(unmute_sends(&host, &frame), 0);

    ctx.lightbox_input(&mut host, LightboxInput::ShieldTap, t0);
    assert_eq!(unmute_sends(&host, &frame), 1);

    let interval = ctx.config().pulse.policy().interval();
    for step in 1..=12 {
        ctx.tick(&mut host, t0 + interval * step);
    }
    assert_eq!(unmute_sends(&host, &frame), 10);
    assert!(!ctx.lightbox().expect("open").is_pulsing());
}

#[test]
fn closing_mid_burst_stops_the_sends() {
    let mut ctx = context(Strategy::Muted);
    let mut host = RecordingHost::new();
    let t0 = Instant::now();
    ctx.open_lightbox(&mut host, urls(&["https://youtu.be/XYZ"]), 0, t0);
    let frame = media_id(&ctx, 0);
    ctx.lightbox_input(&mut host, LightboxInput::ShieldTap, t0);

    let interval = ctx.config().pulse.policy().interval();
    ctx.tick(&mut host, t0 + interval);
    ctx.tick(&mut host, t0 + interval * 2);
    assert_eq!(unmute_sends(&host, &frame), 3);

    ctx.lightbox_input(&mut host, LightboxInput::Close, t0 + interval * 2);
    for step in 3..=12 {
        ctx.tick(&mut host, t0 + interval * step);
    }
    assert_eq!(unmute_sends(&host, &frame), 3);
}

#[test]
fn user_mute_mid_burst_stops_the_attempts() {
    let mut ctx = context(Strategy::Unmuted);
    let mut host = RecordingHost::new();
    let t0 = Instant::now();
    ctx.open_lightbox(&mut host, urls(&["a.mp4"]), 0, t0);
    let video = media_id(&ctx, 0);
    let interval = ctx.config().pulse.policy().interval();
    ctx.tick(&mut host, t0 + interval);
    assert!(ctx.lightbox().expect("open").is_pulsing());

    ctx.element_event(
        &mut host,
        &ElementEvent::new(video.clone(), ElementEventKind::VolumeChange { muted: true, volume: 0.3 }),
    );
    assert!(!ctx.lightbox().expect("open").is_pulsing());
    host.clear_calls();

    for step in 2..=12 {
        ctx.tick(&mut host, t0 + interval * step);
    }
    assert_eq!(host.play_attempts(&video), 0);
    assert!(!host
        .calls()
        .iter()
        .any(|call| matches!(call, HostCall::SetMuted { video: v, muted: false } if *v == video)));
}
