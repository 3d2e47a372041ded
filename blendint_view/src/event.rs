// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event-time context for [`Interactive`](crate::Interactive) hooks.
//!
//! Event hooks see the tree read-only. Anything that would mutate it (a
//! geometry change, a focus change, pointer capture, destroying a view) is
//! recorded as a [`Deferred`] action and applied by the caller once the hook
//! has returned and the view is back in the tree.

use alloc::vec::Vec;
use blendint_responder::types::Phase;
use kurbo::{Point, Size, Vec2};

use crate::request::GeometryChange;
use crate::tree::ViewTree;
use crate::types::{Margin, ViewId};
use crate::view::View;

/// A mutation requested from an event hook.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Deferred {
    /// Run a self-originated geometry request for a view.
    Geometry(ViewId, GeometryChange),
    /// Move keyboard focus to a view.
    Focus(ViewId),
    /// Clear keyboard focus.
    ClearFocus,
    /// Route all pointer events to a view until released.
    CapturePointer(ViewId),
    /// End pointer capture.
    ReleasePointer,
    /// Repaint a view.
    Redraw(ViewId),
    /// Remove a view and its subtree.
    Destroy(ViewId),
}

/// Context passed to event hooks.
#[derive(Debug)]
pub struct EventCtx<'a> {
    tree: &'a ViewTree,
    id: ViewId,
    phase: Phase,
    cursor: Point,
    deferred: &'a mut Vec<Deferred>,
}

impl<'a> EventCtx<'a> {
    /// Create a context for `id`.
    pub fn new(
        tree: &'a ViewTree,
        id: ViewId,
        phase: Phase,
        cursor: Point,
        deferred: &'a mut Vec<Deferred>,
    ) -> Self {
        Self {
            tree,
            id,
            phase,
            cursor,
            deferred,
        }
    }

    /// The view receiving the event.
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Propagation phase of this delivery.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Read-only access to the tree.
    pub fn tree(&self) -> &ViewTree {
        self.tree
    }

    /// Cursor position in window coordinates.
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Cursor position relative to this view's bottom-left corner.
    pub fn local_cursor(&self) -> Point {
        let origin = self.tree.world_origin(self.id).unwrap_or(Point::ZERO);
        (self.cursor - origin).to_point()
    }

    /// Whether the cursor is inside this view.
    pub fn contains_cursor(&self) -> bool {
        self.tree
            .world_bounds(self.id)
            .is_some_and(|r| r.contains(self.cursor))
    }

    /// Current size of this view.
    pub fn size(&self) -> Size {
        self.tree.size(self.id).unwrap_or(Size::ZERO)
    }

    /// Current parent-relative position of this view.
    pub fn position(&self) -> Point {
        self.tree.position(self.id).unwrap_or(Point::ZERO)
    }

    /// Ask to resize this view.
    pub fn request_resize(&mut self, size: Size) {
        self.request_geometry(self.id, GeometryChange::Size(size));
    }

    /// Ask to move this view within its parent.
    pub fn request_position(&mut self, position: Point) {
        self.request_geometry(self.id, GeometryChange::Position(position));
    }

    /// Ask to move this view by `delta`.
    pub fn request_move_by(&mut self, delta: Vec2) {
        let position = self.position() + delta;
        self.request_position(position);
    }

    /// Ask to change this view's margin.
    pub fn request_margin(&mut self, margin: Margin) {
        self.request_geometry(self.id, GeometryChange::Margin(margin));
    }

    /// Ask to show or hide this view.
    pub fn request_visible(&mut self, visible: bool) {
        self.request_geometry(self.id, GeometryChange::Visibility(visible));
    }

    /// Ask for any geometry change on any view.
    ///
    /// The request runs the full protocol, so the target's container may veto it.
    pub fn request_geometry(&mut self, target: ViewId, change: GeometryChange) {
        self.deferred.push(Deferred::Geometry(target, change));
    }

    /// Ask for keyboard focus.
    pub fn request_focus(&mut self) {
        self.deferred.push(Deferred::Focus(self.id));
    }

    /// Give up keyboard focus.
    pub fn clear_focus(&mut self) {
        self.deferred.push(Deferred::ClearFocus);
    }

    /// Receive all pointer events until [`EventCtx::release_pointer`] or
    /// the button is released.
    pub fn capture_pointer(&mut self) {
        self.deferred.push(Deferred::CapturePointer(self.id));
    }

    /// End pointer capture.
    pub fn release_pointer(&mut self) {
        self.deferred.push(Deferred::ReleasePointer);
    }

    /// Repaint this view on the next frame.
    pub fn request_redraw(&mut self) {
        self.deferred.push(Deferred::Redraw(self.id));
    }

    /// Remove a view (possibly this one) once event handling has finished.
    pub fn request_destroy(&mut self, id: ViewId) {
        self.deferred.push(Deferred::Destroy(id));
    }
}

impl ViewTree {
    /// Check out the behaviour of `id` and run `f` with an [`EventCtx`].
    ///
    /// Returns `None` for stale ids and views already running a hook.
    pub fn with_event_ctx<R>(
        &mut self,
        id: ViewId,
        phase: Phase,
        cursor: Point,
        deferred: &mut Vec<Deferred>,
        f: impl FnOnce(&mut dyn View, &mut EventCtx<'_>) -> R,
    ) -> Option<R> {
        let mut view = self.take_view(id)?;
        let out = {
            let mut cx = EventCtx::new(self, id, phase, cursor, deferred);
            f(view.as_mut(), &mut cx)
        };
        self.put_view(id, view);
        Some(out)
    }
}
