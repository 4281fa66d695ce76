// SPDX-License-Identifier: MPL-2.0
use std::time::{Duration, Instant};
use vibedrips_media::app::MediaContext;
use vibedrips_media::config::Config;
use vibedrips_media::device::{Device, Strategy};
use vibedrips_media::host::{ElementEvent, ElementEventKind, ElementId, HostCall, RecordingHost};
use vibedrips_media::i18n::I18n;
use vibedrips_media::lightbox::LightboxInput;
use vibedrips_media::media::window::{promote, sibling_window};
use vibedrips_media::media_state::MediaState;
use vibedrips_media::overlay::{Product, ProductScope};
use vibedrips_media::view::classes;

fn setup(strategy: Strategy) -> (MediaContext, RecordingHost) {
    let config = Config::default();
    let i18n = I18n::new(Some("en-US".to_string()), &config);
    let mut host = RecordingHost::new();
    host.add_container(ElementId::new(config.overlay.container.as_str()));
    let ctx = MediaContext::new(config, i18n, MediaState::in_memory(Device::with_strategy(strategy)));
    (ctx, host)
}

fn product(id: &str, media: &[&str]) -> Product {
    Product::new(id, media.iter().map(|m| (*m).to_string()).collect())
}

fn catalog(n: usize) -> Vec<Product> {
    (0..n)
        .map(|i| product(&format!("sku-{i}"), &[format!("https://cdn.example.com/{i}.jpg").as_str()]))
        .collect()
}

#[test]
fn swap_rotation_follows_click_order() {
    let media = ["a", "b", "c", "d"];
    assert_eq!(promote(&media, 2), ["c", "b", "d", "a"]);
    assert_eq!(promote(&media, 1), ["b", "c", "d", "a"]);
    assert_eq!(promote(&media, 0), media);
}

#[test]
fn sibling_window_wraps_in_both_directions() {
    assert_eq!(sibling_window(0, 5), vec![3, 4, 0, 1, 2]);
    assert_eq!(sibling_window(4, 5), vec![2, 3, 4, 0, 1]);
    assert_eq!(sibling_window(0, 2), vec![0, 1, 0, 1, 0]);
}

#[test]
fn overlay_renders_the_sibling_window_of_the_scope() {
    let (mut ctx, mut host) = setup(Strategy::Muted);
    ctx.set_product_scope(ProductScope::new(catalog(5), 0));
    let now = Instant::now();

    assert!(ctx.open_overlay(&mut host, product("sku-0", &["https://cdn.example.com/0.jpg"]), now));
    let overlay = ctx.overlay().expect("active");
    assert_eq!(overlay.window(), vec![3, 4, 0, 1, 2]);
    assert!(host.has_class(overlay.root_id(), classes::ACTIVE));
    assert!(host.has_class(&ElementId::body(), classes::REELS_MODE));
    assert_eq!(host.ids_with_class(classes::MEDIA_OVERLAY_SLOT).len(), 5);
    assert_eq!(host.ids_with_class(classes::CENTER_SLOT).len(), 1);

    assert!(ctx.show_product(&mut host, 4, now));
    assert_eq!(ctx.overlay().expect("active").window(), vec![2, 3, 4, 0, 1]);
    assert_eq!(host.ids_with_class(classes::MEDIA_OVERLAY_SLOT).len(), 5);
}

#[test]
fn swapping_media_reuses_the_slot() {
    let (mut ctx, mut host) = setup(Strategy::Muted);
    let now = Instant::now();
    ctx.open_overlay(&mut host, product("p", &["a.jpg", "b.jpg", "c.jpg", "d.jpg"]), now);
    let slots_before = host.ids_with_class(classes::MEDIA_OVERLAY_SLOT);

    assert!(ctx.swap_media(&mut host, 2, now));
    let overlay = ctx.overlay().expect("active");
    assert_eq!(overlay.media(), ["c.jpg", "b.jpg", "d.jpg", "a.jpg"]);
    assert_eq!(host.ids_with_class(classes::MEDIA_OVERLAY_SLOT), slots_before);
    for index in 1..4 {
        let thumb = overlay.thumb_id(index).expect("thumb");
        assert!(host.has_class(&thumb, classes::SNAIL_ENTER));
        assert_eq!(host.attr(&thumb, "data-index"), Some(index.to_string().as_str()));
    }
}

#[test]
fn fullscreen_hands_off_to_the_lightbox_and_resumes() {
    let (mut ctx, mut host) = setup(Strategy::Unmuted);
    let t0 = Instant::now();
    ctx.open_overlay(&mut host, product("p", &["clip.mp4", "b.jpg"]), t0);
    let settle = ctx.config().overlay.settle_delay();
    ctx.tick(&mut host, t0 + settle);
    let player = ctx.overlay().and_then(|o| o.player_id()).cloned().expect("player");
    assert!(!host.video(&player).expect("video").paused);

    let t1 = t0 + settle;
    assert!(ctx.open_overlay_fullscreen(&mut host, t1));
    assert!(host.video(&player).expect("video").paused);
    let lightbox = ctx.lightbox().expect("fullscreen lightbox");
    assert_eq!(lightbox.items(), ["clip.mp4", "b.jpg"]);
    assert_eq!(lightbox.current_index(), 0);

    let poll = ctx.config().overlay.fullscreen_poll();
    ctx.tick(&mut host, t1 + poll);
    assert!(host.video(&player).expect("video").paused);

    ctx.lightbox_input(&mut host, LightboxInput::Close, t1 + poll);
    assert!(ctx.lightbox().is_none());
    ctx.tick(&mut host, t1 + poll * 2);
    assert!(!ctx.overlay().expect("active").is_fullscreen());
    assert!(!host.video(&player).expect("video").paused);
}

#[test]
fn own_pause_for_fullscreen_does_not_count_as_user_pause() {
    let (mut ctx, mut host) = setup(Strategy::Unmuted);
    let t0 = Instant::now();
    ctx.open_overlay(&mut host, product("p", &["clip.mp4"]), t0);
    let t1 = t0 + ctx.config().overlay.settle_delay();
    ctx.tick(&mut host, t1);
    let player = ctx.overlay().and_then(|o| o.player_id()).cloned().expect("player");
    ctx.element_event(&mut host, &ElementEvent::new(player.clone(), ElementEventKind::Playing));

    assert!(ctx.open_overlay_fullscreen(&mut host, t1));
    // The browser reports the pause issued for the hand-off.
    ctx.element_event(
        &mut host,
        &ElementEvent::new(player.clone(), ElementEventKind::Pause { current_time: 5.0 }),
    );
    assert!(!ctx.overlay().expect("active").intent().user_paused);

    ctx.lightbox_input(&mut host, LightboxInput::Close, t1);
    ctx.tick(&mut host, t1 + ctx.config().overlay.fullscreen_poll());
    assert!(!ctx.overlay().expect("active").is_fullscreen());
    assert!(!host.video(&player).expect("video").paused);

    // A pause the user makes afterwards still backs the overlay off.
    ctx.element_event(&mut host, &ElementEvent::new(player.clone(), ElementEventKind::Playing));
    ctx.element_event(
        &mut host,
        &ElementEvent::new(player, ElementEventKind::Pause { current_time: 7.0 }),
    );
    assert!(ctx.overlay().expect("active").intent().user_paused);
}

#[test]
fn unmute_in_fullscreen_carries_over_to_the_overlay() {
    let (mut ctx, mut host) = setup(Strategy::Muted);
    let t0 = Instant::now();
    ctx.open_overlay(&mut host, product("p", &["https://youtu.be/XYZ"]), t0);
    let settle = ctx.config().overlay.settle_delay();
    ctx.tick(&mut host, t0 + settle);
    let frame = ctx.overlay().and_then(|o| o.player_id()).cloned().expect("frame");

    let t1 = t0 + settle;
    ctx.open_overlay_fullscreen(&mut host, t1);
    ctx.lightbox_input(&mut host, LightboxInput::ShieldTap, t1);
    assert!(ctx.state().is_unmuted());
    ctx.lightbox_input(&mut host, LightboxInput::Close, t1);
    host.clear_calls();

    ctx.tick(&mut host, t1 + ctx.config().overlay.fullscreen_poll());
    let funcs: Vec<_> = host
        .messages_to(&frame)
        .into_iter()
        .filter_map(|m| m.get("func").and_then(|f| f.as_str()))
        .collect();
    assert_eq!(funcs, ["unMute", "setVolume", "playVideo"]);
}

#[test]
fn closing_the_overlay_stops_every_player() {
    let (mut ctx, mut host) = setup(Strategy::Unmuted);
    ctx.set_product_scope(ProductScope::new(
        (0..5)
            .map(|i| product(&format!("sku-{i}"), &[format!("https://cdn.example.com/{i}.mp4").as_str()]))
            .collect(),
        2,
    ));
    let now = Instant::now();
    ctx.open_overlay(&mut host, product("sku-2", &["https://cdn.example.com/2.mp4"]), now);
    ctx.tick(&mut host, now + Duration::from_secs(1));
    let videos = host.ids_with_tag("video");
    assert_eq!(videos.len(), 5);

    ctx.close_all(&mut host);
    for video in &videos {
        let status = host.video(video).expect("video");
        assert!(status.paused && status.muted && status.released);
    }
    assert!(host
        .calls()
        .iter()
        .any(|call| matches!(call, HostCall::Remove { .. })));
    assert!(ctx.overlay().is_none());
}
