// SPDX-License-Identifier: MPL-2.0
//! Lightbox markup.

use crate::host::ElementId;
use crate::i18n::I18n;
use crate::media::{classify, MediaKind, Presentation};
use crate::view::player::{self, PlayerSpec};
use crate::view::{classes, ViewNode};

/// Element ids of one lightbox instance.
///
/// Per-item ids embed the render pass, so events raised by a node from an
/// earlier pass never match the live window.
#[derive(Debug, Clone)]
pub(crate) struct Ids {
    root: ElementId,
}

impl Ids {
    pub(crate) fn new(generation: u64) -> Self {
        Self {
            root: ElementId::new(format!("lb{generation}")),
        }
    }

    pub(crate) fn root(&self) -> &ElementId {
        &self.root
    }

    pub(crate) fn track(&self) -> ElementId {
        self.root.child("track")
    }

    pub(crate) fn close(&self) -> ElementId {
        self.root.child("close")
    }

    pub(crate) fn prev(&self) -> ElementId {
        self.root.child("prev")
    }

    pub(crate) fn next(&self) -> ElementId {
        self.root.child("next")
    }

    pub(crate) fn counter(&self) -> ElementId {
        self.root.child("counter")
    }

    pub(crate) fn pill(&self) -> ElementId {
        self.root.child("pill")
    }

    fn slot(&self, render: u64, position: usize) -> ElementId {
        self.root.child(&format!("r{render}-s{position}"))
    }

    fn item(&self, render: u64, index: usize) -> ElementId {
        self.root.child(&format!("r{render}-i{index}"))
    }
}

/// Ids and facts about one rendered item.
#[derive(Debug, Clone)]
pub(crate) struct ItemNodes {
    pub(crate) index: usize,
    pub(crate) kind: MediaKind,
    pub(crate) presentation: Presentation,
    pub(crate) media: ElementId,
    pub(crate) loader: Option<ElementId>,
    pub(crate) shield: Option<ElementId>,
    /// Initial `muted` state of the element.
    pub(crate) muted: bool,
}

fn loader_node(id: ElementId, i18n: &I18n) -> ViewNode {
    ViewNode::new("div")
        .id(id)
        .class(classes::LOADER)
        .attr("role", "status")
        .attr("aria-label", i18n.tr("media-loading"))
}

/// Caption replacing media that failed to load.
pub(crate) fn failure(id: ElementId, i18n: &I18n) -> ViewNode {
    player::placeholder(id, classes::LIGHTBOX_MEDIA, &i18n.tr("media-unavailable"))
}

fn item(
    ids: &Ids,
    render: u64,
    index: usize,
    url: &str,
    center: bool,
    muted: bool,
    i18n: &I18n,
) -> (Vec<ViewNode>, ItemNodes) {
    let base = ids.item(render, index);
    let media = base.child("media");
    // Only the centre item may make sound.
    let muted = muted || !center;
    let (node, presentation) = player::player(
        &PlayerSpec {
            id: media.clone(),
            url,
            muted,
            eager: center,
            role_class: classes::LIGHTBOX_MEDIA,
        },
        i18n,
    );

    let mut nodes = Vec::with_capacity(3);
    let loader = (presentation != Presentation::Placeholder).then(|| {
        let id = base.child("loader");
        nodes.push(loader_node(id.clone(), i18n));
        id
    });
    nodes.push(node);
    let shield = (center && muted && presentation == Presentation::Frame).then(|| {
        let id = base.child("shield");
        nodes.push(ViewNode::new("div").id(id.clone()).class(classes::SHIELD));
        id
    });

    let facts = ItemNodes {
        index,
        kind: classify(url),
        presentation,
        media,
        loader,
        shield,
        muted,
    };
    (nodes, facts)
}

/// The five-slot track. `window` holds the item index for each position.
pub(crate) fn track(
    ids: &Ids,
    render: u64,
    window: &[Option<usize>],
    items: &[String],
    current: usize,
    muted: bool,
    i18n: &I18n,
) -> (ViewNode, Vec<ItemNodes>) {
    let center_position = window.len() / 2;
    let mut rendered = Vec::new();
    let slots = window.iter().copied().enumerate().map(|(position, index)| {
        let slot = ViewNode::new("div")
            .id(ids.slot(render, position))
            .class(classes::LIGHTBOX_SLOT)
            .class_if(classes::CENTER_SLOT, position == center_position)
            .attr("data-offset", (position as isize - center_position as isize).to_string());
        let Some((index, url)) = index.and_then(|i| items.get(i).map(|url| (i, url))) else {
            return slot.class(classes::EMPTY_SLOT);
        };
        let (nodes, facts) = item(ids, render, index, url, index == current, muted, i18n);
        rendered.push(facts);
        slot.attr("data-index", index.to_string()).children(nodes)
    });
    let slots: Vec<ViewNode> = slots.collect();
    let node = ViewNode::new("div")
        .id(ids.track())
        .class(classes::LIGHTBOX_TRACK)
        .children(slots);
    (node, rendered)
}

fn nav_button(id: ElementId, side: &str, label: &str, disabled: bool) -> ViewNode {
    ViewNode::new("button")
        .id(id)
        .class(classes::LIGHTBOX_NAV)
        .class(side)
        .class_if(classes::NAV_DISABLED, disabled)
        .attr("type", "button")
        .attr("aria-label", label)
}

/// Counter text, 1-based.
pub(crate) fn counter_text(current: usize, len: usize) -> String {
    format!("{} / {}", current + 1, len)
}

/// The whole overlay around an already built track.
pub(crate) fn root(
    ids: &Ids,
    track: ViewNode,
    current: usize,
    len: usize,
    pill_visible: bool,
    i18n: &I18n,
) -> ViewNode {
    ViewNode::new("div")
        .id(ids.root().clone())
        .class(classes::LIGHTBOX_OVERLAY)
        .attr("role", "dialog")
        .attr("aria-modal", "true")
        .attr("aria-label", i18n.tr("lightbox-dialog"))
        .child(
            ViewNode::new("button")
                .id(ids.close())
                .class(classes::LIGHTBOX_CLOSE)
                .attr("type", "button")
                .attr("aria-label", i18n.tr("lightbox-close")),
        )
        .child(nav_button(
            ids.prev(),
            classes::LIGHTBOX_PREV,
            &i18n.tr("lightbox-previous"),
            current == 0,
        ))
        .child(track)
        .child(nav_button(
            ids.next(),
            classes::LIGHTBOX_NEXT,
            &i18n.tr("lightbox-next"),
            current + 1 >= len,
        ))
        .child(
            ViewNode::new("div")
                .id(ids.counter())
                .class(classes::LIGHTBOX_COUNTER)
                .text(counter_text(current, len)),
        )
        .child(
            ViewNode::new("div")
                .id(ids.pill())
                .class(classes::ENGAGEMENT_PILL)
                .class_if(classes::VISIBLE, pill_visible)
                .text(i18n.tr("lightbox-tap-for-sound")),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::window::render_window;

    fn items(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|u| (*u).to_string()).collect()
    }

    #[test]
    fn ids_are_scoped_by_generation_and_render() {
        let ids = Ids::new(3);
        assert_eq!(ids.root().as_str(), "lb3");
        assert_eq!(ids.item(2, 7).child("media").as_str(), "lb3-r2-i7-media");
        assert_ne!(ids.item(1, 0), ids.item(2, 0));
    }

    #[test]
    fn track_marks_center_and_empty_slots() {
        let i18n = I18n::default();
        let ids = Ids::new(1);
        let items = items(&["a.jpg", "b.jpg"]);
        let (node, rendered) = track(&ids, 1, &render_window(0, 2), &items, 0, true, &i18n);

        let slots = node.child_nodes();
        assert_eq!(slots.len(), 5);
        assert!(slots[0].has_class(classes::EMPTY_SLOT));
        assert!(slots[1].has_class(classes::EMPTY_SLOT));
        assert!(slots[2].has_class(classes::CENTER_SLOT));
        assert!(!slots[3].has_class(classes::EMPTY_SLOT));
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].presentation, Presentation::Image);
    }

    #[test]
    fn only_a_muted_center_embed_gets_a_shield() {
        let i18n = I18n::default();
        let ids = Ids::new(1);
        let items = items(&["https://youtu.be/AAA", "https://youtu.be/BBB"]);
        let window = render_window(0, 2);

        let (_, muted) = track(&ids, 1, &window, &items, 0, true, &i18n);
        assert!(muted[0].shield.is_some());
        assert!(muted[1].shield.is_none());

        let (_, audible) = track(&ids, 2, &window, &items, 0, false, &i18n);
        assert!(audible[0].shield.is_none());
    }

    #[test]
    fn neighbours_are_always_muted() {
        let i18n = I18n::default();
        let ids = Ids::new(1);
        let items = items(&["a.mp4", "b.mp4", "https://youtu.be/CCC"]);
        let (node, rendered) = track(&ids, 1, &render_window(0, 3), &items, 0, false, &i18n);

        let center = node.find(&rendered[0].media).expect("center video");
        assert!(!center.has_attr("muted"));
        let neighbour = node.find(&rendered[1].media).expect("neighbour video");
        assert!(neighbour.has_attr("muted"));
        let frame = node.find(&rendered[2].media).expect("neighbour frame");
        assert!(frame.get_attr("src").is_some_and(|src| src.contains("mute=1")));
    }

    #[test]
    fn unsupported_items_render_a_caption_without_loader() {
        let i18n = I18n::default();
        let ids = Ids::new(1);
        let items = items(&["https://x.com/a/status/1", "https://youtube.com/"]);
        let (_, rendered) = track(&ids, 1, &render_window(0, 2), &items, 0, true, &i18n);
        assert!(rendered
            .iter()
            .all(|item| item.presentation == Presentation::Placeholder && item.loader.is_none()));
    }

    #[test]
    fn single_item_disables_both_arrows() {
        let i18n = I18n::default();
        let ids = Ids::new(1);
        let (track_node, _) = track(&ids, 1, &render_window(0, 1), &items(&["a.jpg"]), 0, true, &i18n);
        let root = root(&ids, track_node, 0, 1, false, &i18n);

        let prev = root.find(&ids.prev()).expect("prev");
        let next = root.find(&ids.next()).expect("next");
        assert!(prev.has_class(classes::NAV_DISABLED));
        assert!(next.has_class(classes::NAV_DISABLED));
        assert_eq!(
            root.find(&ids.counter()).and_then(ViewNode::text_content),
            Some("1 / 1")
        );
    }
}
