// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capability traits implemented by view behaviours.
//!
//! A view's behaviour is split into three small traits, each with defaults
//! for every hook, so a concrete view only overrides what it cares about:
//!
//! - [`Layout`]: the geometry update protocol hooks and size preferences.
//! - [`Interactive`]: pointer, keyboard, hover and focus hooks.
//! - [`Drawable`]: draw-data regeneration and drawing.
//!
//! [`View`] is implemented for every type that has all three. Hit-testability
//! and focusability are not hooks; they are [`ViewFlags`](crate::ViewFlags)
//! bits consulted by the tree and the routing layer.

use core::any::Any;

use blendint_responder::types::Response;
use kurbo::Size;

use crate::ViewTree;
use crate::event::EventCtx;
use crate::input::{KeyEvent, MouseEvent};
use crate::render::{DrawInfo, RenderingServices};
use crate::request::{ChangeKind, UpdateRequest};
use crate::types::{ViewFlags, ViewId};
use crate::update::UpdateCtx;

/// [`Layout::update_test`] for views that own their children's geometry.
///
/// Children may not move or resize themselves; margin, corner and visibility
/// requests pass.
///
/// ```
/// use blendint_view::{Empty, GeometryChange, UpdateRequest, ViewNode, ViewTree, container_test};
/// use kurbo::Size;
///
/// let mut tree = ViewTree::new();
/// let id = tree.insert(None, ViewNode::default(), Empty);
/// let request = |change| UpdateRequest { source: id, target: id, change };
/// assert!(!container_test(&request(GeometryChange::Size(Size::new(1.0, 1.0)))));
/// assert!(container_test(&request(GeometryChange::Visibility(false))));
/// ```
pub fn container_test(request: &UpdateRequest) -> bool {
    !matches!(request.kind(), ChangeKind::Size | ChangeKind::Position)
}

/// Geometry protocol hooks.
pub trait Layout {
    /// Test phase: may this view's child `request.source` change its own
    /// geometry as described?
    ///
    /// Called on the parent before anything mutates. Returning `false` drops
    /// the request entirely.
    fn update_test(&self, tree: &ViewTree, me: ViewId, request: &UpdateRequest) -> bool {
        let _ = (tree, me, request);
        true
    }

    /// Commit phase: the stored field of `cx.id()` already holds the new value.
    ///
    /// Containers re-lay out their children here through `cx`.
    fn perform_update(&mut self, cx: &mut UpdateCtx<'_>, request: &UpdateRequest) {
        let _ = (cx, request);
    }

    /// Report phase: a child changed its own geometry.
    ///
    /// Informational; requests this view issued for its children are never
    /// reported back to it.
    fn report_update(&mut self, cx: &mut UpdateCtx<'_>, request: &UpdateRequest) {
        let _ = (cx, request);
    }

    /// A child was added, inserted, detached or removed.
    fn children_changed(&mut self, cx: &mut UpdateCtx<'_>) {
        let _ = cx;
    }

    /// Size this view would like from its container.
    ///
    /// The default is the node's size hint.
    fn preferred_size(&self, tree: &ViewTree, me: ViewId) -> Size {
        tree.size_hint(me).unwrap_or(Size::ZERO)
    }

    /// Whether this view wants extra horizontal space.
    fn is_expand_x(&self, tree: &ViewTree, me: ViewId) -> bool {
        tree.flags(me)
            .is_some_and(|f| f.contains(ViewFlags::EXPAND_X))
    }

    /// Whether this view wants extra vertical space.
    fn is_expand_y(&self, tree: &ViewTree, me: ViewId) -> bool {
        tree.flags(me)
            .is_some_and(|f| f.contains(ViewFlags::EXPAND_Y))
    }
}

/// Event hooks.
///
/// Hooks returning [`Response`] take part in capture → target → bubble
/// propagation; the phase is available from [`EventCtx::phase`].
#[allow(unused_variables, reason = "Default hooks ignore their arguments.")]
pub trait Interactive {
    /// The cursor entered this view.
    fn hover_in(&mut self, cx: &mut EventCtx<'_>) {}

    /// The cursor left this view.
    fn hover_out(&mut self, cx: &mut EventCtx<'_>) {}

    /// This view gained keyboard focus.
    fn focus_on(&mut self, cx: &mut EventCtx<'_>) {}

    /// This view lost keyboard focus.
    fn focus_off(&mut self, cx: &mut EventCtx<'_>) {}

    /// The cursor moved.
    fn mouse_move(&mut self, cx: &mut EventCtx<'_>, event: &MouseEvent) -> Response {
        Response::Ignore
    }

    /// A mouse button went down.
    ///
    /// Finishing the press captures the pointer for this view until release.
    fn mouse_press(&mut self, cx: &mut EventCtx<'_>, event: &MouseEvent) -> Response {
        Response::Ignore
    }

    /// A mouse button went up.
    fn mouse_release(&mut self, cx: &mut EventCtx<'_>, event: &MouseEvent) -> Response {
        Response::Ignore
    }

    /// A press and its release resolved to a click on this view.
    fn click(&mut self, cx: &mut EventCtx<'_>, event: &MouseEvent) {}

    /// A key went down or repeated.
    fn key_press(&mut self, cx: &mut EventCtx<'_>, event: &KeyEvent) -> Response {
        Response::Ignore
    }

    /// A key went up.
    fn key_release(&mut self, cx: &mut EventCtx<'_>, event: &KeyEvent) -> Response {
        Response::Ignore
    }

    /// A character was typed.
    fn text_input(&mut self, cx: &mut EventCtx<'_>, ch: char) -> Response {
        Response::Ignore
    }

    /// The context-menu button went down.
    fn context_menu_press(&mut self, cx: &mut EventCtx<'_>, event: &MouseEvent) -> Response {
        Response::Ignore
    }

    /// The context-menu button went up.
    fn context_menu_release(&mut self, cx: &mut EventCtx<'_>, event: &MouseEvent) -> Response {
        Response::Ignore
    }
}

/// Drawing hooks.
pub trait Drawable {
    /// Rebuild cached draw data after a geometry change.
    ///
    /// Called lazily, just before [`Drawable::draw`], once per batch of changes.
    fn regenerate_draw_data(&mut self, info: &DrawInfo, services: &mut dyn RenderingServices) {
        let _ = (info, services);
    }

    /// Draw this view. Children are drawn afterwards by the tree.
    fn draw(&self, info: &DrawInfo, services: &mut dyn RenderingServices) {
        let _ = (info, services);
    }
}

/// A complete view behaviour.
pub trait View: Layout + Interactive + Drawable + Any + core::fmt::Debug {
    /// Upcast for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;
    /// Mutable upcast for downcasting to the concrete type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Layout + Interactive + Drawable + Any + core::fmt::Debug> View for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A view with no behaviour of its own: a spacer or a plain background.
#[derive(Clone, Copy, Debug, Default)]
pub struct Empty;

impl Layout for Empty {}
impl Interactive for Empty {}
impl Drawable for Empty {}
