// SPDX-License-Identifier: MPL-2.0
//! Reels overlay markup.

use super::product::Product;
use crate::host::ElementId;
use crate::i18n::I18n;
use crate::media::{thumbnail_url, Presentation};
use crate::view::player::{self, PlayerSpec};
use crate::view::{classes, ViewNode};

/// Element ids of one overlay instance.
#[derive(Debug, Clone)]
pub(crate) struct Ids {
    root: ElementId,
}

impl Ids {
    pub(crate) fn new(generation: u64) -> Self {
        Self {
            root: ElementId::new(format!("mo{generation}")),
        }
    }

    pub(crate) fn root(&self) -> &ElementId {
        &self.root
    }

    pub(crate) fn track(&self) -> ElementId {
        self.root.child("track")
    }

    pub(crate) fn slot(&self, render: u64, position: usize) -> ElementId {
        self.root.child(&format!("r{render}-p{position}"))
    }
}

/// Ids of one rendered sibling slot.
#[derive(Debug, Clone)]
pub(crate) struct SlotNodes {
    pub(crate) product: usize,
    pub(crate) slot: ElementId,
    pub(crate) primary: ElementId,
    pub(crate) thumbs: ElementId,
    pub(crate) player: Option<PlayerNode>,
}

/// The primary player of a slot.
#[derive(Debug, Clone)]
pub(crate) struct PlayerNode {
    pub(crate) id: ElementId,
    pub(crate) presentation: Presentation,
    pub(crate) url: String,
    pub(crate) muted: bool,
}

impl SlotNodes {
    fn new(product: usize, slot: ElementId) -> Self {
        Self {
            product,
            primary: slot.child("primary"),
            thumbs: slot.child("thumbs"),
            slot,
            player: None,
        }
    }

    pub(crate) fn fullscreen(&self) -> ElementId {
        self.slot.child("fullscreen")
    }

    fn player_id(&self, swap: u64) -> ElementId {
        self.slot.child(&format!("m{swap}-player"))
    }

    pub(crate) fn thumb(&self, swap: u64, index: usize) -> ElementId {
        self.slot.child(&format!("m{swap}-thumb{index}"))
    }
}

/// Primary region: the live player plus the fullscreen button.
///
/// `swap` scopes the player id so events from a demoted player never match.
pub(crate) fn primary(
    nodes: &mut SlotNodes,
    swap: u64,
    media: &[String],
    center: bool,
    muted: bool,
    animate: bool,
    i18n: &I18n,
) -> ViewNode {
    let region = ViewNode::new("div")
        .id(nodes.primary.clone())
        .class(classes::MEDIA_PRIMARY)
        .class_if(classes::SNAIL_ENTER, animate);
    let Some(url) = media.first() else {
        nodes.player = None;
        return region;
    };
    // Only the centre slot may make sound.
    let muted = muted || !center;
    let id = nodes.player_id(swap);
    let (player, presentation) = player::player(
        &PlayerSpec {
            id: id.clone(),
            url,
            muted,
            eager: center,
            role_class: classes::MEDIA_PRIMARY,
        },
        i18n,
    );
    nodes.player = Some(PlayerNode {
        id,
        presentation,
        url: url.clone(),
        muted,
    });
    region.child(player).child(
        ViewNode::new("button")
            .id(nodes.fullscreen())
            .class(classes::FULLSCREEN_BUTTON)
            .attr("type", "button")
            .attr("aria-label", i18n.tr("overlay-fullscreen")),
    )
}

/// Thumbnail grid for everything but the live item.
pub(crate) fn thumbs(
    nodes: &SlotNodes,
    swap: u64,
    media: &[String],
    max_thumbnails: usize,
    animate: bool,
    i18n: &I18n,
) -> ViewNode {
    let label = i18n.tr("overlay-thumbnail");
    let thumbs = media
        .iter()
        .enumerate()
        .skip(1)
        .take(max_thumbnails)
        .map(|(index, url)| {
            let thumb = ViewNode::new("button")
                .id(nodes.thumb(swap, index))
                .class(classes::MEDIA_THUMB)
                .class_if(classes::SNAIL_ENTER, animate)
                .attr("type", "button")
                .attr("data-index", index.to_string())
                .attr("aria-label", label.clone())
                .child(
                    ViewNode::new("img")
                        .attr("src", thumbnail_url(url))
                        .attr("alt", "")
                        .attr("loading", "lazy"),
                );
            if animate {
                thumb.attr("data-stagger", index.to_string())
            } else {
                thumb
            }
        });
    ViewNode::new("div")
        .id(nodes.thumbs.clone())
        .class(classes::MEDIA_THUMBS)
        .children(thumbs)
}

/// Inputs for rendering one sibling slot.
pub(crate) struct SlotSpec<'a> {
    pub(crate) render: u64,
    pub(crate) position: usize,
    pub(crate) product_index: usize,
    pub(crate) product: &'a Product,
    /// Media order to show (the centre product's may be rotated).
    pub(crate) media: &'a [String],
    pub(crate) center: bool,
    pub(crate) muted: bool,
    pub(crate) max_thumbnails: usize,
}

pub(crate) fn slot(ids: &Ids, spec: &SlotSpec<'_>, i18n: &I18n) -> (ViewNode, SlotNodes) {
    let mut nodes = SlotNodes::new(spec.product_index, ids.slot(spec.render, spec.position));
    let node = ViewNode::new("div")
        .id(nodes.slot.clone())
        .class(classes::MEDIA_OVERLAY_SLOT)
        .class_if(classes::CENTER_SLOT, spec.center)
        .attr("data-product", spec.product.id.as_str());
    if spec.media.is_empty() {
        let panel = ViewNode::new("div")
            .id(nodes.slot.child("empty"))
            .class(classes::NO_MEDIA)
            .text(i18n.tr("overlay-no-media"));
        return (node.child(panel), nodes);
    }
    let primary = primary(&mut nodes, 0, spec.media, spec.center, spec.muted, false, i18n);
    let thumbs = thumbs(&nodes, 0, spec.media, spec.max_thumbnails, false, i18n);
    (node.child(primary).child(thumbs), nodes)
}

/// Overlay container around the five slots.
pub(crate) fn container(ids: &Ids, slots: Vec<ViewNode>) -> ViewNode {
    ViewNode::new("div")
        .id(ids.root().clone())
        .class(classes::MEDIA_OVERLAY_CONTAINER)
        .child(track(ids, slots))
}

pub(crate) fn track(ids: &Ids, slots: Vec<ViewNode>) -> ViewNode {
    ViewNode::new("div")
        .id(ids.track())
        .class(classes::MEDIA_OVERLAY_TRACK)
        .children(slots)
}
