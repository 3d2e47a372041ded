// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the view tree: identifiers, flags and node geometry.

use kurbo::{Point, Rect, Size};

/// Identifier for a view in the tree (generational).
///
/// A removed view's id never resolves again, even after its slot is reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ViewId(pub(crate) u32, pub(crate) u32);

impl ViewId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Per-view flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ViewFlags: u16 {
        /// The view and its subtree are drawn and can be hit.
        ///
        /// Owned by the geometry update protocol, see
        /// [`ViewTree::set_visible`](crate::ViewTree::set_visible).
        const VISIBLE   = 0b0000_0001;
        /// The view can be the target of pointer events.
        const PICKABLE  = 0b0000_0010;
        /// The view can receive keyboard focus.
        const FOCUSABLE = 0b0000_0100;
        /// The view is a top-level frame.
        const FRAME     = 0b0000_1000;
        /// The frame floats above docked frames.
        const FLOATING  = 0b0001_0000;
        /// The view wants extra horizontal space from its container.
        const EXPAND_X  = 0b0010_0000;
        /// The view wants extra vertical space from its container.
        const EXPAND_Y  = 0b0100_0000;
    }
}

impl Default for ViewFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE
    }
}

bitflags::bitflags! {
    /// Which corners of a view are rounded.
    ///
    /// Corners are named in screen terms: `TOP_*` corners sit at the larger y
    /// since the tree uses a y-up coordinate system.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct RoundType: u8 {
        /// Top-left corner.
        const TOP_LEFT     = 0b0001;
        /// Top-right corner.
        const TOP_RIGHT    = 0b0010;
        /// Bottom-right corner.
        const BOTTOM_RIGHT = 0b0100;
        /// Bottom-left corner.
        const BOTTOM_LEFT  = 0b1000;
        /// Both top corners.
        const TOP = Self::TOP_LEFT.bits() | Self::TOP_RIGHT.bits();
        /// Both bottom corners.
        const BOTTOM = Self::BOTTOM_LEFT.bits() | Self::BOTTOM_RIGHT.bits();
        /// All four corners.
        const ALL = Self::TOP.bits() | Self::BOTTOM.bits();
    }
}

/// Inner spacing between a view's edge and its content.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Margin {
    /// Left inset.
    pub left: f64,
    /// Right inset.
    pub right: f64,
    /// Top inset.
    pub top: f64,
    /// Bottom inset.
    pub bottom: f64,
}

impl Margin {
    /// No inset.
    pub const ZERO: Self = Self::uniform(0.0);

    /// Create a margin from its four insets.
    pub const fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// The same inset on every side.
    pub const fn uniform(v: f64) -> Self {
        Self::new(v, v, v, v)
    }

    /// `left + right`.
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// `top + bottom`.
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    /// Clamp negative or NaN insets to zero.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self::new(
            non_negative(self.left),
            non_negative(self.right),
            non_negative(self.top),
            non_negative(self.bottom),
        )
    }

    /// The content rectangle of a view of `size`, in the view's own coordinates.
    ///
    /// Collapses to an empty rectangle when the margin exceeds the size.
    pub fn content_rect(&self, size: Size) -> Rect {
        let x0 = self.left.min(size.width);
        let y0 = self.bottom.min(size.height);
        let x1 = (size.width - self.right).max(x0);
        let y1 = (size.height - self.top).max(y0);
        Rect::new(x0, y0, x1, y1)
    }
}

/// Clamp a scalar to `[0, ∞)`, mapping NaN to zero.
pub(crate) fn non_negative(v: f64) -> f64 {
    if v > 0.0 { v } else { 0.0 }
}

/// Initial description of a view.
///
/// `position` is relative to the parent's origin (its bottom-left corner).
#[derive(Clone, Debug, PartialEq)]
pub struct ViewNode {
    /// Offset from the parent's origin.
    pub position: Point,
    /// Width and height.
    pub size: Size,
    /// Inner spacing.
    pub margin: Margin,
    /// Rounded corners.
    pub round_type: RoundType,
    /// Corner radius.
    pub round_radius: f64,
    /// Stacking order among siblings; higher is drawn above and hit first.
    pub z_index: i32,
    /// Size a container should aim for; `None` uses `size`.
    pub size_hint: Option<Size>,
    /// Visibility, picking, focus and layout flags.
    pub flags: ViewFlags,
}

impl Default for ViewNode {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            size: Size::ZERO,
            margin: Margin::ZERO,
            round_type: RoundType::empty(),
            round_radius: 0.0,
            z_index: 0,
            size_hint: None,
            flags: ViewFlags::default(),
        }
    }
}

impl ViewNode {
    /// A node of `size` at the parent's origin.
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
            ..Self::default()
        }
    }

    /// Builder-style position.
    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Point::new(x, y);
        self
    }

    /// Builder-style flag insertion.
    #[must_use]
    pub fn with_flags(mut self, flags: ViewFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Builder-style margin.
    #[must_use]
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }
}
