// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interfaces to the rendering and text collaborators.
//!
//! The tree never talks to a graphics API. Views describe what they draw
//! through [`RenderingServices`], which the application owns and passes into
//! [`ViewTree::draw`](crate::ViewTree::draw). [`DisplayList`] is a recording
//! implementation useful for tests and headless runs.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use kurbo::{Point, Rect, RoundedRect, RoundedRectRadii, Size};

use crate::types::{Margin, RoundType, ViewFlags, ViewId};

/// Opaque style role resolved to concrete paint by the renderer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StyleRole {
    /// Frame or panel background.
    Background,
    /// Widget body.
    Inner,
    /// Widget body while pressed or selected.
    InnerSelected,
    /// Widget body while hovered.
    InnerHovered,
    /// Widget outline.
    Outline,
    /// Text.
    Text,
    /// Slider or progress fill.
    Item,
}

/// Drawing back end supplied by the application.
pub trait RenderingServices {
    /// Fill a rounded rectangle.
    fn fill_rounded_rect(&mut self, shape: RoundedRect, role: StyleRole);
    /// Stroke the outline of a rounded rectangle.
    fn stroke_rounded_rect(&mut self, shape: RoundedRect, role: StyleRole);
    /// Draw a run of text with its baseline origin at `origin`.
    fn text(&mut self, origin: Point, text: &str, role: StyleRole);
    /// Restrict drawing to `rect` until the matching [`pop_clip`](Self::pop_clip).
    fn push_clip(&mut self, rect: Rect);
    /// Undo the last [`push_clip`](Self::push_clip).
    fn pop_clip(&mut self);
}

/// Font selection passed to [`TextMeasure`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Font {
    /// Pixel size.
    pub size: f64,
}

impl Default for Font {
    fn default() -> Self {
        Self { size: 12.0 }
    }
}

/// Text measurement service.
pub trait TextMeasure {
    /// Size of `text` laid out on one line with `font`.
    fn measure(&self, text: &str, font: &Font) -> Size;
}

/// A [`TextMeasure`] where every character has the same advance.
///
/// ```
/// use blendint_view::{Font, MonospaceMeasure, TextMeasure};
///
/// let m = MonospaceMeasure { advance: 0.5, line_height: 1.25 };
/// let s = m.measure("abcd", &Font { size: 10.0 });
/// assert_eq!((s.width, s.height), (20.0, 12.5));
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MonospaceMeasure {
    /// Advance per character as a fraction of the font size.
    pub advance: f64,
    /// Line height as a fraction of the font size.
    pub line_height: f64,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self {
            advance: 0.6,
            line_height: 1.2,
        }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure(&self, text: &str, font: &Font) -> Size {
        let chars = text.chars().count() as f64;
        Size::new(chars * self.advance * font.size, self.line_height * font.size)
    }
}

/// Geometry snapshot handed to [`Drawable`](crate::Drawable) hooks.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DrawInfo {
    /// The view being drawn.
    pub id: ViewId,
    /// World-space rectangle.
    pub rect: Rect,
    /// Inner spacing.
    pub margin: Margin,
    /// Rounded corners.
    pub round_type: RoundType,
    /// Corner radius.
    pub round_radius: f64,
    /// Current flags.
    pub flags: ViewFlags,
}

impl DrawInfo {
    /// The view's outline with its rounded corners applied.
    pub fn rounded_rect(&self) -> RoundedRect {
        let r = |corner| {
            if self.round_type.contains(corner) {
                self.round_radius
            } else {
                0.0
            }
        };
        // Kurbo names corners for y-down space; in this y-up tree its "top"
        // corners sit at the smaller y, which is our bottom edge.
        let radii = RoundedRectRadii::new(
            r(RoundType::BOTTOM_LEFT),
            r(RoundType::BOTTOM_RIGHT),
            r(RoundType::TOP_RIGHT),
            r(RoundType::TOP_LEFT),
        );
        RoundedRect::from_rect(self.rect, radii)
    }

    /// [`DrawInfo::rounded_rect`] moved so its bottom-left corner is at the origin.
    ///
    /// Useful for draw data that must survive moves, which do not regenerate it.
    pub fn local_rounded_rect(&self) -> RoundedRect {
        self.rounded_rect() - self.rect.origin().to_vec2()
    }

    /// World-space content rectangle (inside the margin).
    pub fn content_rect(&self) -> Rect {
        self.margin.content_rect(self.rect.size()) + self.rect.origin().to_vec2()
    }
}

/// A recorded drawing command.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// See [`RenderingServices::fill_rounded_rect`].
    Fill(RoundedRect, StyleRole),
    /// See [`RenderingServices::stroke_rounded_rect`].
    Stroke(RoundedRect, StyleRole),
    /// See [`RenderingServices::text`].
    Text(Point, String, StyleRole),
    /// See [`RenderingServices::push_clip`].
    PushClip(Rect),
    /// See [`RenderingServices::pop_clip`].
    PopClip,
}

/// A [`RenderingServices`] implementation that records commands.
#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    /// Commands in submission order.
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Recorded text runs, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text(_, s, _) => Some(s.as_str()),
            _ => None,
        })
    }
}

impl RenderingServices for DisplayList {
    fn fill_rounded_rect(&mut self, shape: RoundedRect, role: StyleRole) {
        self.commands.push(DrawCommand::Fill(shape, role));
    }

    fn stroke_rounded_rect(&mut self, shape: RoundedRect, role: StyleRole) {
        self.commands.push(DrawCommand::Stroke(shape, role));
    }

    fn text(&mut self, origin: Point, text: &str, role: StyleRole) {
        self.commands
            .push(DrawCommand::Text(origin, text.to_string(), role));
    }

    fn push_clip(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::PushClip(rect));
    }

    fn pop_clip(&mut self) {
        self.commands.push(DrawCommand::PopClip);
    }
}
