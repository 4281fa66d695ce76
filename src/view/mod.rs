// SPDX-License-Identifier: MPL-2.0
//! Structured markup descriptions.
//!
//! Views are built as [`ViewNode`] trees instead of concatenated HTML so the
//! state machines can reason about the ids they inject. Hosts either walk the
//! tree directly or serialize it with [`ViewNode::to_html`].

pub mod classes;
pub mod player;

use crate::host::ElementId;

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &["img", "source", "br", "input", "link", "meta"];

/// A single element and its subtree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewNode {
    tag: String,
    id: Option<ElementId>,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<ViewNode>,
}

impl ViewNode {
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn id(mut self, id: ElementId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        if !self.classes.iter().any(|c| c == class) {
            self.classes.push(class.to_string());
        }
        self
    }

    /// Adds `class` only when `enabled`.
    #[must_use]
    pub fn class_if(self, class: &str, enabled: bool) -> Self {
        if enabled {
            self.class(class)
        } else {
            self
        }
    }

    /// Sets an attribute, replacing a previous value with the same name.
    #[must_use]
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
        self
    }

    /// Sets a boolean attribute (`muted`, `playsinline`, ...).
    #[must_use]
    pub fn flag(self, name: &str) -> Self {
        self.attr(name, "")
    }

    /// Sets a boolean attribute only when `enabled`.
    #[must_use]
    pub fn flag_if(self, name: &str, enabled: bool) -> Self {
        if enabled {
            self.flag(name)
        } else {
            self
        }
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn child(mut self, child: ViewNode) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = ViewNode>) -> Self {
        self.children.extend(children);
        self
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn element_id(&self) -> Option<&ElementId> {
        self.id.as_ref()
    }

    #[must_use]
    pub fn class_list(&self) -> &[String] {
        &self.classes
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    #[must_use]
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.get_attr(name).is_some()
    }

    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attrs
    }

    #[must_use]
    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref()
    }

    #[must_use]
    pub fn child_nodes(&self) -> &[ViewNode] {
        &self.children
    }

    /// Finds the node carrying `id` in this subtree.
    #[must_use]
    pub fn find(&self, id: &ElementId) -> Option<&ViewNode> {
        if self.id.as_ref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Depth-first list of nodes in this subtree (including `self`).
    #[must_use]
    pub fn descendants(&self) -> Vec<&ViewNode> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.descendants());
        }
        out
    }

    /// Ids of every identified node in this subtree, depth-first.
    #[must_use]
    pub fn ids(&self) -> Vec<&ElementId> {
        self.descendants()
            .into_iter()
            .filter_map(|node| node.id.as_ref())
            .collect()
    }

    /// Serializes the subtree as HTML.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        if let Some(id) = &self.id {
            out.push_str(" id=\"");
            out.push_str(&escape(id.as_str()));
            out.push('"');
        }
        if !self.classes.is_empty() {
            out.push_str(" class=\"");
            out.push_str(&escape(&self.classes.join(" ")));
            out.push('"');
        }
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            if !value.is_empty() {
                out.push_str("=\"");
                out.push_str(&escape(value));
                out.push('"');
            }
        }
        out.push('>');
        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            return;
        }
        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
