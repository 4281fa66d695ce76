// SPDX-License-Identifier: MPL-2.0
//! Index arithmetic for render windows and media rotation.

use crate::config::RENDER_WINDOW_SIZE;

const HALF: isize = (RENDER_WINDOW_SIZE / 2) as isize;

/// The five indices around `current` (`[i-2, i-1, i, i+1, i+2]`), `None` where
/// the index falls outside `0..len`.
#[must_use]
pub fn render_window(current: usize, len: usize) -> [Option<usize>; RENDER_WINDOW_SIZE] {
    let mut window = [None; RENDER_WINDOW_SIZE];
    for (slot, offset) in window.iter_mut().zip(-HALF..=HALF) {
        let index = current as isize + offset;
        if index >= 0 && (index as usize) < len {
            *slot = Some(index as usize);
        }
    }
    window
}

/// The five sibling indices around `center`, wrapping modulo `total` in both
/// directions so the window is always full. Empty when `total` is zero.
#[must_use]
pub fn sibling_window(center: usize, total: usize) -> Vec<usize> {
    if total == 0 {
        return Vec::new();
    }
    let total = total as isize;
    let center = center as isize % total;
    (-HALF..=HALF)
        .map(|offset| ((center + offset) % total + total) % total)
        .map(|index| index as usize)
        .collect()
}

/// Promotes `media[index]` to the live position.
///
/// The new order is `[clicked, rest…, old_live]`, where `rest` keeps the
/// relative order of everything except the clicked and previously live items.
/// Out-of-range indices and `0` leave the list unchanged.
#[must_use]
pub fn promote<T: Clone>(media: &[T], index: usize) -> Vec<T> {
    if index == 0 || index >= media.len() {
        return media.to_vec();
    }
    let mut rotated = Vec::with_capacity(media.len());
    rotated.push(media[index].clone());
    rotated.extend(
        media
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != 0 && *i != index)
            .map(|(_, item)| item.clone()),
    );
    rotated.push(media[0].clone());
    rotated
}
