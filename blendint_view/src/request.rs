// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry change requests.

use kurbo::{Point, Size};

use crate::types::{Margin, RoundType, ViewId, non_negative};

/// Kind tag of a [`GeometryChange`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Parent-relative position.
    Position,
    /// Width and height.
    Size,
    /// Inner spacing.
    Margin,
    /// Rounded corners.
    RoundType,
    /// Corner radius.
    RoundRadius,
    /// Visibility flag.
    Visibility,
}

/// A new value for one geometry field.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GeometryChange {
    /// New parent-relative position.
    Position(Point),
    /// New size.
    Size(Size),
    /// New margin.
    Margin(Margin),
    /// New rounded corners.
    RoundType(RoundType),
    /// New corner radius.
    RoundRadius(f64),
    /// Show or hide.
    Visibility(bool),
}

impl GeometryChange {
    /// The kind tag.
    pub fn kind(&self) -> ChangeKind {
        match self {
            Self::Position(_) => ChangeKind::Position,
            Self::Size(_) => ChangeKind::Size,
            Self::Margin(_) => ChangeKind::Margin,
            Self::RoundType(_) => ChangeKind::RoundType,
            Self::RoundRadius(_) => ChangeKind::RoundRadius,
            Self::Visibility(_) => ChangeKind::Visibility,
        }
    }

    /// Clamp the value into its valid range.
    ///
    /// Sizes, margins and radii are clamped to zero; NaN coordinates become zero.
    #[must_use]
    pub fn sanitized(self) -> Self {
        match self {
            Self::Position(p) => {
                Self::Position(Point::new(finite_or_zero(p.x), finite_or_zero(p.y)))
            }
            Self::Size(s) => {
                Self::Size(Size::new(non_negative(s.width), non_negative(s.height)))
            }
            Self::Margin(m) => Self::Margin(m.clamped()),
            Self::RoundRadius(r) => Self::RoundRadius(non_negative(r)),
            other => other,
        }
    }

    /// Whether the change can alter the rectangles of the target's children.
    ///
    /// Position changes only translate the subtree, and corner changes only
    /// affect the target's own drawing.
    pub fn affects_children(&self) -> bool {
        matches!(self, Self::Size(_) | Self::Margin(_))
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v }
}

/// One step of geometry propagation.
///
/// `source` is the view whose own field is changing or, for layout-driven
/// changes, the container that issued the request. `target` is the view the
/// change applies to.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UpdateRequest {
    /// Originator of the request.
    pub source: ViewId,
    /// View receiving this step.
    pub target: ViewId,
    /// The new value.
    pub change: GeometryChange,
}

impl UpdateRequest {
    /// The kind tag of the change.
    pub fn kind(&self) -> ChangeKind {
        self.change.kind()
    }

    /// `true` when the target originated the change itself rather than
    /// receiving it from its container.
    pub fn is_self_originated(&self) -> bool {
        self.source == self.target
    }
}
