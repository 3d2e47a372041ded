// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Top-level frames.

use blendint_view::{
    DrawInfo, Drawable, EventCtx, Interactive, Layout, MouseButton, MouseEvent, Phase,
    RenderingServices, Response, StyleRole, UpdateCtx, UpdateRequest, ViewFlags, ViewId, ViewNode,
    ViewTree, container_test,
};
use kurbo::{Point, RoundedRect, Size};
use tracing::trace;

#[derive(Copy, Clone, Debug)]
struct Drag {
    /// cursor in window space at press
    grab: Point,
    /// frame position at press
    origin: Point,
}

/// A top-level container holding a single content view.
///
/// The first child fills the area inside the frame's margin; further children
/// are left where they are. Children may not move or resize themselves.
///
/// A frame with [`ViewFlags::FLOATING`] can be dragged: a left press that no
/// descendant finished reaches the frame in the bubble phase, the frame
/// finishes it (which captures the pointer) and follows the cursor until the
/// release.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    drag: Option<Drag>,
    focused: bool,
    outline: Option<RoundedRect>,
}

impl Frame {
    /// A new frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// A docked frame node of the given size.
    pub fn docked(width: f64, height: f64) -> ViewNode {
        ViewNode::sized(width, height)
            .with_flags(ViewFlags::default() | ViewFlags::FRAME | ViewFlags::FOCUSABLE)
    }

    /// A floating frame node at `(x, y)`.
    pub fn floating(x: f64, y: f64, width: f64, height: f64) -> ViewNode {
        let mut node = ViewNode::sized(width, height).at(x, y).with_flags(
            ViewFlags::default() | ViewFlags::FRAME | ViewFlags::FOCUSABLE | ViewFlags::FLOATING,
        );
        node.z_index = 1;
        node
    }

    /// Whether the frame currently holds keyboard focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    fn fill(cx: &mut UpdateCtx<'_>) {
        if let Some(&content) = cx.children().first() {
            let rect = cx.content_rect();
            cx.set_child_geometry(content, rect);
        }
    }
}

impl Layout for Frame {
    fn update_test(&self, _: &ViewTree, _: ViewId, request: &UpdateRequest) -> bool {
        container_test(request)
    }

    fn perform_update(&mut self, cx: &mut UpdateCtx<'_>, request: &UpdateRequest) {
        if request.change.affects_children() {
            Self::fill(cx);
        }
    }

    fn children_changed(&mut self, cx: &mut UpdateCtx<'_>) {
        Self::fill(cx);
    }

    fn preferred_size(&self, tree: &ViewTree, me: ViewId) -> Size {
        let margin = tree.margin(me).unwrap_or_default();
        match tree.children_of(me).first() {
            Some(&content) => {
                let p = tree.preferred_size(content);
                Size::new(p.width + margin.horizontal(), p.height + margin.vertical())
            }
            None => tree.size_hint(me).unwrap_or(Size::ZERO),
        }
    }
}

impl Interactive for Frame {
    fn focus_on(&mut self, cx: &mut EventCtx<'_>) {
        self.focused = true;
        cx.request_redraw();
    }

    fn focus_off(&mut self, cx: &mut EventCtx<'_>) {
        self.focused = false;
        cx.request_redraw();
    }

    fn mouse_press(&mut self, cx: &mut EventCtx<'_>, event: &MouseEvent) -> Response {
        let floating = cx
            .tree()
            .flags(cx.id())
            .is_some_and(|f| f.contains(ViewFlags::FLOATING));
        if !floating || event.button != Some(MouseButton::Left) || cx.phase() == Phase::Capture {
            return Response::Ignore;
        }
        trace!(frame = ?cx.id(), "frame drag started");
        self.drag = Some(Drag {
            grab: event.position,
            origin: cx.position(),
        });
        Response::Finish
    }

    fn mouse_move(&mut self, cx: &mut EventCtx<'_>, event: &MouseEvent) -> Response {
        let Some(drag) = self.drag else {
            return Response::Ignore;
        };
        cx.request_position(drag.origin + (event.position - drag.grab));
        Response::Finish
    }

    fn mouse_release(&mut self, _: &mut EventCtx<'_>, _: &MouseEvent) -> Response {
        if self.drag.take().is_some() {
            Response::Finish
        } else {
            Response::Ignore
        }
    }
}

impl Drawable for Frame {
    fn regenerate_draw_data(&mut self, info: &DrawInfo, _: &mut dyn RenderingServices) {
        self.outline = Some(info.local_rounded_rect());
    }

    fn draw(&self, info: &DrawInfo, services: &mut dyn RenderingServices) {
        let Some(outline) = self.outline else {
            return;
        };
        let shape = outline + info.rect.origin().to_vec2();
        services.fill_rounded_rect(shape, StyleRole::Background);
        if self.focused {
            services.stroke_rounded_rect(shape, StyleRole::Outline);
        }
    }
}
