// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! BlendInt Layout: container views for the BlendInt view tree.
//!
//! Containers own the geometry of their children. Each one implements
//! [`Layout`](blendint_view::Layout) so that:
//!
//! - it vetoes size and position requests its children originate themselves
//!   (margin, corner and visibility requests pass);
//! - it re-lays out its children when its own size or margin changes, when a
//!   child is added or removed, and when a child is shown or hidden;
//! - its preferred size is derived from its children's preferred sizes plus its
//!   own margin and spacing, and it wants to expand when any child does.
//!
//! Layout depends only on preferred sizes and the container's own geometry, so
//! running it twice in a row yields identical rectangles.
//!
//! ## Containers
//!
//! - [`LinearLayout`]: a row or a column.
//! - [`TableLayout`]: a fixed grid of cells filled in row-major order.
//! - [`StackLayout`]: pages stacked on top of each other, one visible at a time.
//!
//! [`Tracks`] is the prefix-sum helper they share to distribute space along an axis.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod linear;
mod stack;
mod table;
mod track;

pub use linear::LinearLayout;
pub use stack::StackLayout;
pub use table::TableLayout;
pub use track::Tracks;

use blendint_view::{ViewFlags, ViewId, ViewTree};

/// Main axis of a [`LinearLayout`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Left to right.
    Horizontal,
    /// Top to bottom.
    Vertical,
}

bitflags::bitflags! {
    /// Placement of children inside spare room.
    ///
    /// At most one horizontal and one vertical flag is meaningful; with none
    /// set on an axis, children are centred on it.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Alignment: u8 {
        /// Flush with the left edge.
        const LEFT    = 0b00_0001;
        /// Flush with the right edge.
        const RIGHT   = 0b00_0010;
        /// Centred horizontally.
        const HCENTER = 0b00_0100;
        /// Flush with the top edge.
        const TOP     = 0b00_1000;
        /// Flush with the bottom edge.
        const BOTTOM  = 0b01_0000;
        /// Centred vertically.
        const VCENTER = 0b10_0000;
        /// Centred on both axes.
        const CENTER = Self::HCENTER.bits() | Self::VCENTER.bits();
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self::CENTER
    }
}

impl Alignment {
    /// Portion of horizontal `slack` placed left of the children.
    pub fn horizontal_share(self, slack: f64) -> f64 {
        let slack = slack.max(0.0);
        if self.contains(Self::LEFT) {
            0.0
        } else if self.contains(Self::RIGHT) {
            slack
        } else {
            slack * 0.5
        }
    }

    /// Portion of vertical `slack` placed above the children.
    pub fn vertical_share(self, slack: f64) -> f64 {
        let slack = slack.max(0.0);
        if self.contains(Self::TOP) {
            0.0
        } else if self.contains(Self::BOTTOM) {
            slack
        } else {
            slack * 0.5
        }
    }
}

pub(crate) fn visible_children(tree: &ViewTree, me: ViewId) -> impl Iterator<Item = ViewId> + '_ {
    tree.children_of(me)
        .iter()
        .copied()
        .filter(|c| tree.flags(*c).is_some_and(|f| f.contains(ViewFlags::VISIBLE)))
}

pub(crate) fn own_expand_x(tree: &ViewTree, me: ViewId) -> bool {
    tree.flags(me).is_some_and(|f| f.contains(ViewFlags::EXPAND_X))
}

pub(crate) fn own_expand_y(tree: &ViewTree, me: ViewId) -> bool {
    tree.flags(me).is_some_and(|f| f.contains(ViewFlags::EXPAND_Y))
}
