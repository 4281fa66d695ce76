// SPDX-License-Identifier: MPL-2.0
//! `vibedrips_media` drives the media surfaces of the VibeDrips storefront: the
//! full-screen lightbox and the inline reels overlay.
//!
//! The crate is headless. It decides what to render and which playback calls
//! to make, and talks to the page through the [`host::MediaHost`] trait. The
//! core problem it solves is reconciling browser autoplay restrictions with
//! what the user explicitly asked for: start muted when the platform demands
//! it, unmute everywhere after one gesture, and never fight a manual pause.

#![doc(html_root_url = "https://docs.rs/vibedrips_media/0.3.0")]

pub mod app;
pub mod config;
pub mod device;
pub mod error;
pub mod host;
pub mod i18n;
pub mod lightbox;
pub mod media;
pub mod media_state;
pub mod overlay;
pub mod pulse;
pub mod remote;
pub mod view;

#[cfg(test)]
pub(crate) mod test_utils;
