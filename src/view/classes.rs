// SPDX-License-Identifier: MPL-2.0
//! CSS class hooks shared with external stylesheets.
//!
//! These names are part of the page contract: stylesheets and other scripts
//! key off them, so renaming one is a breaking change.

pub const ACTIVE: &str = "active";
pub const CENTER_SLOT: &str = "center-slot";
pub const VISIBLE: &str = "visible";
pub const HIDDEN: &str = "hidden";

// Lightbox
pub const LIGHTBOX_OVERLAY: &str = "lightbox-overlay";
pub const CONTROLS_HIDDEN: &str = "controls-hidden";
pub const LIGHTBOX_TRACK: &str = "lightbox-track";
pub const LIGHTBOX_SLOT: &str = "lightbox-slot";
pub const EMPTY_SLOT: &str = "empty-slot";
pub const LIGHTBOX_MEDIA: &str = "lightbox-media";
pub const LIGHTBOX_CLOSE: &str = "lightbox-close";
pub const LIGHTBOX_NAV: &str = "lightbox-nav";
pub const LIGHTBOX_PREV: &str = "lightbox-prev";
pub const LIGHTBOX_NEXT: &str = "lightbox-next";
pub const NAV_DISABLED: &str = "lightbox-nav-disabled";
pub const LIGHTBOX_COUNTER: &str = "lightbox-counter";
pub const SHIELD: &str = "lightbox-shield";
pub const ENGAGEMENT_PILL: &str = "engagement-pill";
pub const LOADER: &str = "media-loader";
pub const CAPTION: &str = "media-caption";
pub const PLACEHOLDER: &str = "media-placeholder";
pub const DRAGGING: &str = "dragging";

// Media overlay
pub const MEDIA_OVERLAY_CONTAINER: &str = "media-overlay-container";
pub const MEDIA_OVERLAY_TRACK: &str = "media-overlay-track";
pub const MEDIA_OVERLAY_SLOT: &str = "media-overlay-slot";
pub const MEDIA_PRIMARY: &str = "media-primary";
pub const MEDIA_THUMBS: &str = "media-thumbs";
pub const MEDIA_THUMB: &str = "media-thumb";
pub const FULLSCREEN_BUTTON: &str = "media-fullscreen";
pub const NO_MEDIA: &str = "media-empty";
pub const SNAIL_ENTER: &str = "snail-enter";
pub const REELS_MODE: &str = "reels-mode";
