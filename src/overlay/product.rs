// SPDX-License-Identifier: MPL-2.0
//! Products as seen by the reels overlay.

use crate::media::window::sibling_window;
use serde::{Deserialize, Serialize};

/// A catalog product with its ordered media URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub reference_media: Vec<String>,
}

impl Product {
    #[must_use]
    pub fn new(id: impl Into<String>, reference_media: Vec<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            reference_media,
        }
    }

    #[must_use]
    pub fn has_media(&self) -> bool {
        !self.reference_media.is_empty()
    }
}

/// The filtered product list the page is browsing, and which one is current.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductScope {
    products: Vec<Product>,
    current: usize,
}

impl ProductScope {
    /// `current` is clamped into range.
    #[must_use]
    pub fn new(products: Vec<Product>, current: usize) -> Self {
        let current = current.min(products.len().saturating_sub(1));
        Self { products, current }
    }

    /// A scope holding just `product`.
    #[must_use]
    pub fn single(product: Product) -> Self {
        Self::new(vec![product], 0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current(&self) -> Option<&Product> {
        self.products.get(self.current)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Product> {
        self.products.get(index)
    }

    #[must_use]
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.products.iter().position(|p| p.id == id)
    }

    /// Moves the current product. Returns false when `index` is out of range.
    pub fn set_current(&mut self, index: usize) -> bool {
        if index >= self.products.len() {
            return false;
        }
        self.current = index;
        true
    }

    /// Product indices of the five-slot sibling window around the current one.
    #[must_use]
    pub fn window(&self) -> Vec<usize> {
        sibling_window(self.current, self.products.len())
    }
}
