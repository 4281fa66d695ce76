// SPDX-License-Identifier: MPL-2.0
//! Player markup shared by the lightbox and the reels overlay.

use super::{classes, ViewNode};
use crate::host::ElementId;
use crate::i18n::I18n;
use crate::media::{classify, embed_url, EmbedTarget, Presentation};

/// Permissions granted to embedded players.
pub const FRAME_ALLOW: &str = "autoplay; encrypted-media; fullscreen; picture-in-picture";

/// One media element to render.
#[derive(Debug, Clone)]
pub struct PlayerSpec<'a> {
    pub id: ElementId,
    pub url: &'a str,
    /// Initial mute state (`muted` attribute, or the embed URL's mute flag).
    pub muted: bool,
    /// Eagerly buffer (the item expected to play next).
    pub eager: bool,
    /// Class marking the element's role in its surface.
    pub role_class: &'static str,
}

/// Caption shown in place of media that cannot (or could not) be shown.
#[must_use]
pub fn placeholder(id: ElementId, role_class: &str, message: &str) -> ViewNode {
    ViewNode::new("div")
        .id(id)
        .class(role_class)
        .class(classes::PLACEHOLDER)
        .child(ViewNode::new("p").class(classes::CAPTION).text(message))
}

/// Builds the element for `spec.url` and reports how it is presented.
#[must_use]
pub fn player(spec: &PlayerSpec<'_>, i18n: &I18n) -> (ViewNode, Presentation) {
    let presentation = Presentation::of(spec.url);
    let node = match presentation {
        Presentation::Image => ViewNode::new("img")
            .id(spec.id.clone())
            .class(spec.role_class)
            .attr("src", spec.url)
            .attr("alt", "")
            .attr("loading", if spec.eager { "eager" } else { "lazy" })
            .attr("draggable", "false"),
        Presentation::Video => ViewNode::new("video")
            .id(spec.id.clone())
            .class(spec.role_class)
            .attr("src", spec.url)
            .attr("preload", if spec.eager { "auto" } else { "metadata" })
            .flag("playsinline")
            .flag("loop")
            .flag("controls")
            .flag_if("muted", spec.muted),
        Presentation::Frame => match EmbedTarget::from_url(spec.url) {
            Some(target) => ViewNode::new("iframe")
                .id(spec.id.clone())
                .class(spec.role_class)
                .attr("src", embed_url(&target, spec.muted))
                .attr("allow", FRAME_ALLOW)
                .attr("data-platform", target.kind().as_str())
                .flag("allowfullscreen"),
            None => placeholder(spec.id.clone(), spec.role_class, &i18n.tr("media-unsupported")),
        },
        Presentation::Placeholder => {
            placeholder(spec.id.clone(), spec.role_class, &i18n.tr("media-unsupported"))
        }
    };
    tracing::trace!(url = spec.url, kind = classify(spec.url).as_str(), "player built");
    (node, presentation)
}
