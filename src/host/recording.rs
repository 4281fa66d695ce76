// SPDX-License-Identifier: MPL-2.0
//! In-memory [`MediaHost`] that records every call.
//!
//! Tracks which identified nodes are attached, their classes/styles/text and
//! the state of native videos, and can simulate autoplay-policy rejections.
//! Used by the test suites, the benchmarks and the CLI `simulate` command.

use super::{ElementId, MediaHost, ResourceHint};
use crate::error::{HostError, PlayError};
use crate::media_state::Volume;
use crate::view::ViewNode;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// One recorded host operation, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Mount {
        parent: Option<ElementId>,
        root: Option<ElementId>,
    },
    Replace {
        target: ElementId,
    },
    Remove {
        target: ElementId,
    },
    SetClass {
        target: ElementId,
        class: String,
        enabled: bool,
    },
    SetStyle {
        target: ElementId,
        property: String,
        value: String,
    },
    SetText {
        target: ElementId,
        text: String,
    },
    ScrollLock(bool),
    Play {
        video: ElementId,
        started: bool,
    },
    Pause(ElementId),
    SetMuted {
        video: ElementId,
        muted: bool,
    },
    SetVolume {
        video: ElementId,
        volume: f32,
    },
    Release(ElementId),
    PostMessage {
        frame: ElementId,
        payload: Value,
    },
    Hint(ResourceHint),
}

/// Simulated state of a native `<video>`.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoStatus {
    pub paused: bool,
    pub muted: bool,
    pub volume: f32,
    pub released: bool,
    pub src: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct NodeRecord {
    tag: String,
    parent: Option<ElementId>,
    classes: BTreeSet<String>,
    styles: BTreeMap<String, String>,
    attrs: BTreeMap<String, String>,
    text: Option<String>,
}

#[derive(Debug, Default)]
pub struct RecordingHost {
    nodes: HashMap<ElementId, NodeRecord>,
    videos: HashMap<ElementId, VideoStatus>,
    calls: Vec<HostCall>,
    hints: Vec<ResourceHint>,
    scroll_locked: bool,
    reject_unmuted_play: bool,
    reject_all_play: bool,
    reject_messages: bool,
}

impl RecordingHost {
    #[must_use]
    pub fn new() -> Self {
        let mut host = Self::default();
        host.nodes.insert(
            ElementId::body(),
            NodeRecord {
                tag: "body".to_string(),
                ..Default::default()
            },
        );
        host
    }

    /// Attaches a pre-existing page element (e.g. the product panel nav area).
    pub fn add_container(&mut self, id: ElementId) {
        self.nodes.insert(
            id,
            NodeRecord {
                tag: "div".to_string(),
                parent: Some(ElementId::body()),
                ..Default::default()
            },
        );
    }

    /// Simulates a browser that refuses audible autoplay.
    pub fn reject_unmuted_play(&mut self, reject: bool) {
        self.reject_unmuted_play = reject;
    }

    /// Simulates a browser that refuses every programmatic `play()`.
    pub fn reject_all_play(&mut self, reject: bool) {
        self.reject_all_play = reject;
    }

    /// Makes every `post_message` fail.
    pub fn reject_messages(&mut self, reject: bool) {
        self.reject_messages = reject;
    }

    #[must_use]
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    #[must_use]
    pub fn hints(&self) -> &[ResourceHint] {
        &self.hints
    }

    #[must_use]
    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    #[must_use]
    pub fn video(&self, id: &ElementId) -> Option<&VideoStatus> {
        self.videos.get(id)
    }

    #[must_use]
    pub fn tag(&self, id: &ElementId) -> Option<&str> {
        self.nodes.get(id).map(|n| n.tag.as_str())
    }

    #[must_use]
    pub fn has_class(&self, id: &ElementId, class: &str) -> bool {
        self.nodes
            .get(id)
            .is_some_and(|node| node.classes.contains(class))
    }

    #[must_use]
    pub fn attr(&self, id: &ElementId, name: &str) -> Option<&str> {
        self.nodes
            .get(id)
            .and_then(|node| node.attrs.get(name))
            .map(String::as_str)
    }

    #[must_use]
    pub fn style(&self, id: &ElementId, property: &str) -> Option<&str> {
        self.nodes
            .get(id)
            .and_then(|node| node.styles.get(property))
            .map(String::as_str)
    }

    #[must_use]
    pub fn text(&self, id: &ElementId) -> Option<&str> {
        self.nodes.get(id).and_then(|node| node.text.as_deref())
    }

    /// Attached elements carrying `class`, sorted by id.
    #[must_use]
    pub fn ids_with_class(&self, class: &str) -> Vec<ElementId> {
        let mut ids: Vec<ElementId> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.classes.contains(class))
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Attached elements with the given tag, sorted by id.
    #[must_use]
    pub fn ids_with_tag(&self, tag: &str) -> Vec<ElementId> {
        let mut ids: Vec<ElementId> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.tag == tag)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Payloads delivered to `frame`, in order.
    #[must_use]
    pub fn messages_to(&self, frame: &ElementId) -> Vec<&Value> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::PostMessage { frame: f, payload } if f == frame => Some(payload),
                _ => None,
            })
            .collect()
    }

    /// Number of `play()` calls addressed to `video`.
    #[must_use]
    pub fn play_attempts(&self, video: &ElementId) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, HostCall::Play { video: v, .. } if v == video))
            .count()
    }

    /// Position of the first call matching `predicate`.
    #[must_use]
    pub fn position(&self, predicate: impl Fn(&HostCall) -> bool) -> Option<usize> {
        self.calls.iter().position(predicate)
    }

    fn insert_tree(&mut self, parent: Option<ElementId>, node: &ViewNode) {
        let mut next_parent = parent.clone();
        if let Some(id) = node.element_id() {
            let record = NodeRecord {
                tag: node.tag().to_string(),
                parent: parent.clone(),
                classes: node.class_list().iter().cloned().collect(),
                styles: BTreeMap::new(),
                attrs: node
                    .attributes()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
                text: node.text_content().map(str::to_string),
            };
            if node.tag() == "video" {
                self.videos.insert(
                    id.clone(),
                    VideoStatus {
                        paused: true,
                        muted: node.has_attr("muted"),
                        volume: 1.0,
                        released: false,
                        src: node.get_attr("src").map(str::to_string),
                    },
                );
            }
            self.nodes.insert(id.clone(), record);
            next_parent = Some(id.clone());
        }
        for child in node.child_nodes() {
            self.insert_tree(next_parent.clone(), child);
        }
    }

    fn remove_tree(&mut self, target: &ElementId) {
        let children: Vec<ElementId> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.parent.as_ref() == Some(target))
            .map(|(id, _)| id.clone())
            .collect();
        for child in children {
            self.remove_tree(&child);
        }
        self.nodes.remove(target);
    }
}

impl MediaHost for RecordingHost {
    fn mount(&mut self, parent: Option<&ElementId>, node: ViewNode) -> Result<(), HostError> {
        let parent = parent.cloned().unwrap_or_else(ElementId::body);
        if !self.nodes.contains_key(&parent) {
            return Err(HostError::MissingElement(parent));
        }
        self.calls.push(HostCall::Mount {
            parent: Some(parent.clone()),
            root: node.element_id().cloned(),
        });
        self.insert_tree(Some(parent), &node);
        Ok(())
    }

    fn replace(&mut self, target: &ElementId, node: ViewNode) -> Result<(), HostError> {
        let Some(record) = self.nodes.get(target) else {
            return Err(HostError::MissingElement(target.clone()));
        };
        let parent = record.parent.clone();
        self.calls.push(HostCall::Replace {
            target: target.clone(),
        });
        self.remove_tree(target);
        self.insert_tree(parent, &node);
        Ok(())
    }

    fn remove(&mut self, target: &ElementId) {
        self.calls.push(HostCall::Remove {
            target: target.clone(),
        });
        self.remove_tree(target);
    }

    fn exists(&self, target: &ElementId) -> bool {
        self.nodes.contains_key(target)
    }

    fn set_class(&mut self, target: &ElementId, class: &str, enabled: bool) {
        self.calls.push(HostCall::SetClass {
            target: target.clone(),
            class: class.to_string(),
            enabled,
        });
        if let Some(node) = self.nodes.get_mut(target) {
            if enabled {
                node.classes.insert(class.to_string());
            } else {
                node.classes.remove(class);
            }
        }
    }

    fn set_style(&mut self, target: &ElementId, property: &str, value: &str) {
        self.calls.push(HostCall::SetStyle {
            target: target.clone(),
            property: property.to_string(),
            value: value.to_string(),
        });
        if let Some(node) = self.nodes.get_mut(target) {
            node.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn set_text(&mut self, target: &ElementId, text: &str) {
        self.calls.push(HostCall::SetText {
            target: target.clone(),
            text: text.to_string(),
        });
        if let Some(node) = self.nodes.get_mut(target) {
            node.text = Some(text.to_string());
        }
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.calls.push(HostCall::ScrollLock(locked));
        self.scroll_locked = locked;
    }

    fn play(&mut self, video: &ElementId) -> Result<(), PlayError> {
        let outcome = match self.videos.get_mut(video) {
            Some(_) if !self.nodes.contains_key(video) => {
                Err(PlayError::MissingElement(video.clone()))
            }
            Some(status) => {
                if self.reject_all_play || (self.reject_unmuted_play && !status.muted) {
                    Err(PlayError::NotAllowed)
                } else {
                    status.paused = false;
                    Ok(())
                }
            }
            None => Err(PlayError::MissingElement(video.clone())),
        };
        self.calls.push(HostCall::Play {
            video: video.clone(),
            started: outcome.is_ok(),
        });
        outcome
    }

    fn pause(&mut self, video: &ElementId) {
        self.calls.push(HostCall::Pause(video.clone()));
        if let Some(status) = self.videos.get_mut(video) {
            status.paused = true;
        }
    }

    fn set_muted(&mut self, video: &ElementId, muted: bool) {
        self.calls.push(HostCall::SetMuted {
            video: video.clone(),
            muted,
        });
        if let Some(status) = self.videos.get_mut(video) {
            status.muted = muted;
        }
    }

    fn set_volume(&mut self, video: &ElementId, volume: Volume) {
        self.calls.push(HostCall::SetVolume {
            video: video.clone(),
            volume: volume.value(),
        });
        if let Some(status) = self.videos.get_mut(video) {
            status.volume = volume.value();
        }
    }

    fn release_media(&mut self, video: &ElementId) {
        self.calls.push(HostCall::Release(video.clone()));
        if let Some(status) = self.videos.get_mut(video) {
            status.paused = true;
            status.released = true;
            status.src = None;
        }
    }

    fn post_message(&mut self, frame: &ElementId, payload: &Value) -> Result<(), HostError> {
        if !self.nodes.contains_key(frame) {
            return Err(HostError::MissingElement(frame.clone()));
        }
        if self.reject_messages {
            return Err(HostError::MessageRejected("frame not ready".to_string()));
        }
        self.calls.push(HostCall::PostMessage {
            frame: frame.clone(),
            payload: payload.clone(),
        });
        Ok(())
    }

    fn add_resource_hint(&mut self, hint: ResourceHint) {
        self.calls.push(HostCall::Hint(hint.clone()));
        if !self.hints.contains(&hint) {
            self.hints.push(hint);
        }
    }
}
