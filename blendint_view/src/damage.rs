// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage summary types returned from commit.

use alloc::vec::Vec;
use kurbo::Rect;

/// Repaint regions collected by [`crate::ViewTree::commit`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Damage {
    /// World-space rectangles that should be repainted.
    pub dirty_rects: Vec<Rect>,
}

impl Damage {
    /// Returns the union of all damage rects.
    pub fn union_rect(&self) -> Option<Rect> {
        let mut it = self.dirty_rects.iter().copied();
        let first = it.next()?;
        Some(it.fold(first, |acc, r| acc.union(r)))
    }

    /// Returns `true` when nothing needs repainting.
    pub fn is_empty(&self) -> bool {
        self.dirty_rects.is_empty()
    }

    /// Merge another damage set into this one.
    pub fn extend(&mut self, other: Self) {
        self.dirty_rects.extend(other.dirty_rects);
    }

    /// Record a rect; zero-area rects are dropped.
    pub(crate) fn push(&mut self, rect: Rect) {
        if rect.area() > 0.0 {
            self.dirty_rects.push(rect);
        }
    }
}
