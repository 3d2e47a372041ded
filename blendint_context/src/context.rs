// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The window-level entry point.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use blendint_event_state::click::{ClickResult, ClickState};
use blendint_responder::dispatcher;
use blendint_responder::focus::{FocusEvent, FocusState};
use blendint_responder::hover::{HoverEvent, HoverState};
use blendint_responder::router::Router;
use blendint_responder::types::{Dispatch, ParentLookup, ResolvedHit};
use blendint_view::{
    Damage, Deferred, EventCtx, KeyAction, KeyCode, KeyEvent, Modifiers, MouseAction,
    MouseButton, MouseEvent, Phase, QueryFilter, RenderingServices, Response, View, ViewFlags,
    ViewId, ViewNode, ViewTree,
};
use hashbrown::HashSet;
use kurbo::{Point, Rect, Size};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::config::ContextConfig;
use crate::root::RootView;

/// Parent lookup that stops below the root, so routed paths start at a frame.
struct FrameScope<'a> {
    tree: &'a ViewTree,
    root: ViewId,
}

impl ParentLookup<ViewId> for FrameScope<'_> {
    fn parent_of(&self, node: &ViewId) -> Option<ViewId> {
        self.tree.parent_of(*node).filter(|p| *p != self.root)
    }
}

/// Owner of a [`ViewTree`] and of all per-window input state.
///
/// The windowing glue feeds raw input into the `on_*` entry points. The
/// context finds the target, keeps hover, focus and pointer capture up to
/// date, and delivers each event through the capture → target → bubble
/// sequence until a view finishes it.
///
/// Top-level frames are the children of [`Context::root`]. Docked frames tile
/// the window; floating frames (with [`ViewFlags::FLOATING`] and a higher
/// `z_index`) sit above them and win hit testing where they overlap.
///
/// Capture belongs to the button whose press established it: only that
/// button's release goes to the holder and ends the capture. Other buttons
/// act on whatever is under the cursor, and never move focus while the
/// pointer is captured.
///
/// Every tracking slot holds a generational [`ViewId`]. Removed views are
/// purged from hover, focus, capture and pending presses before the next
/// event is routed, and ids that were detached from the root are dropped the
/// same way.
///
/// ```
/// use blendint_context::Context;
/// use blendint_view::{Empty, MouseAction, MouseButton, Modifiers, ViewFlags, ViewNode};
///
/// let mut cx = Context::new(400.0, 300.0);
/// let frame = cx.add_frame(
///     ViewNode::default().with_flags(ViewFlags::FOCUSABLE),
///     Empty,
/// );
/// assert_eq!(cx.tree().size(frame).map(|s| s.width), Some(400.0));
///
/// cx.on_cursor_move(10.0, 10.0);
/// assert_eq!(cx.hovered(), &[frame]);
///
/// cx.on_mouse_button(MouseButton::Left, MouseAction::Press, Modifiers::empty());
/// assert_eq!(cx.focused_frame(), Some(frame));
///
/// cx.on_resize(800.0, 300.0);
/// assert_eq!(cx.tree().size(frame).map(|s| s.width), Some(800.0));
/// ```
#[derive(Debug)]
pub struct Context {
    tree: ViewTree,
    root: ViewId,
    config: ContextConfig,
    router: Router<ViewId>,
    captured_by: Option<MouseButton>,
    hover: HoverState<ViewId>,
    frame_focus: FocusState<ViewId>,
    widget_focus: FocusState<ViewId>,
    active_frame: Option<ViewId>,
    clicks: ClickState<ViewId>,
    cursor: Point,
    modifiers: Modifiers,
    time: u64,
    destroyed: Rc<RefCell<Vec<ViewId>>>,
}

impl Context {
    /// A context for a window of the given size with the default policy.
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_config(ContextConfig::default(), width, height)
    }

    /// A context for a window of the given size.
    pub fn with_config(config: ContextConfig, width: f64, height: f64) -> Self {
        let mut tree = ViewTree::new();
        let destroyed = Rc::new(RefCell::new(Vec::new()));
        let sink = destroyed.clone();
        let _ = tree
            .on_destroyed()
            .connect(move |id| sink.borrow_mut().push(*id));
        let mut node = ViewNode::sized(width, height);
        node.flags = ViewFlags::VISIBLE;
        let root = tree.insert(
            None,
            node,
            RootView {
                docked_fill: config.docked_frames_fill,
            },
        );
        Self {
            tree,
            root,
            clicks: ClickState::with_thresholds(
                config.click_distance_threshold,
                config.click_time_threshold,
            ),
            config,
            router: Router::new(),
            captured_by: None,
            hover: HoverState::new(),
            frame_focus: FocusState::new(),
            widget_focus: FocusState::new(),
            active_frame: None,
            cursor: Point::ZERO,
            modifiers: Modifiers::empty(),
            time: 0,
            destroyed,
        }
    }

    /// The view tree.
    pub fn tree(&self) -> &ViewTree {
        &self.tree
    }

    /// The view tree, for building content and driving geometry directly.
    ///
    /// Views removed through it are purged from the input state at the next
    /// entry point.
    pub fn tree_mut(&mut self) -> &mut ViewTree {
        &mut self.tree
    }

    /// The window-sized root; its children are the top-level frames.
    pub fn root(&self) -> ViewId {
        self.root
    }

    /// The policy in use.
    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// Frame receiving keyboard input when no widget is focused.
    pub fn focused_frame(&self) -> Option<ViewId> {
        self.frame_focus.focused()
    }

    /// Widget receiving keyboard input.
    pub fn focused_widget(&self) -> Option<ViewId> {
        self.widget_focus.focused()
    }

    /// The frame the cursor was last over, or that was last pressed.
    pub fn active_frame(&self) -> Option<ViewId> {
        self.active_frame
    }

    /// The hovered chain, from a frame down to the innermost hovered view.
    pub fn hovered(&self) -> &[ViewId] {
        self.hover.current_path()
    }

    /// The view holding pointer capture.
    pub fn captured(&self) -> Option<ViewId> {
        self.router.captured()
    }

    /// Last cursor position, window space.
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Set the clock, in milliseconds, used for click recognition.
    pub fn set_time(&mut self, millis: u64) {
        self.time = millis;
    }

    /// Add a top-level frame.
    ///
    /// [`ViewFlags::FRAME`] is added to `node`'s flags.
    pub fn add_frame<V: View>(&mut self, node: ViewNode, view: V) -> ViewId {
        let id = self
            .tree
            .insert(Some(self.root), node.with_flags(ViewFlags::FRAME), view);
        debug!(frame = ?id, "frame added");
        id
    }

    /// Remove a top-level frame and everything in it.
    ///
    /// Returns `false` if `frame` is not a live frame of this context.
    pub fn remove_frame(&mut self, frame: ViewId) -> bool {
        if self.tree.parent_of(frame) != Some(self.root) {
            return false;
        }
        self.destroy(frame)
    }

    /// Draw `frame` above the other floating frames.
    ///
    /// Docked frames tile and never overlap, so raising one returns `false`.
    pub fn raise_frame(&mut self, frame: ViewId) -> bool {
        if self.tree.parent_of(frame) != Some(self.root) || !self.is_floating(frame) {
            return false;
        }
        if self.tree.children_of(self.root).last() == Some(&frame) {
            return true;
        }
        self.tree.add_child(self.root, frame).is_ok()
    }

    /// Remove `id` and its subtree, purging every reference to them.
    ///
    /// The root cannot be destroyed.
    pub fn destroy(&mut self, id: ViewId) -> bool {
        if id == self.root {
            warn!("refusing to destroy the context root");
            return false;
        }
        let removed = !self.tree.remove(id).is_empty();
        self.purge();
        removed
    }

    /// Give keyboard focus to the frame `frame` and clear the focused widget.
    pub fn set_focused_frame(&mut self, frame: ViewId) -> bool {
        self.purge();
        if self.tree.parent_of(frame) != Some(self.root) || !self.is_focusable(frame) {
            return false;
        }
        self.transfer_focus(Some(frame), None);
        true
    }

    /// Give keyboard focus to `id`.
    ///
    /// A frame becomes the focused frame. Any other view must be focusable; it
    /// becomes the focused widget and its frame the focused frame.
    pub fn set_focus(&mut self, id: ViewId) -> bool {
        self.purge();
        if self.tree.parent_of(id) == Some(self.root) {
            return self.set_focused_frame(id);
        }
        if !self.is_focusable(id) {
            return false;
        }
        let Some(frame) = self.frame_of(id) else {
            return false;
        };
        let frame = if self.is_focusable(frame) {
            Some(frame)
        } else {
            self.frame_focus.focused()
        };
        self.transfer_focus(frame, Some(id));
        true
    }

    /// Drop keyboard focus from the focused widget; the frame keeps it.
    pub fn clear_focus(&mut self) {
        self.purge();
        let frame = self.frame_focus.focused();
        self.transfer_focus(frame, None);
    }

    /// The window was resized.
    pub fn on_resize(&mut self, width: f64, height: f64) {
        self.purge();
        let _ = self.tree.resize(self.root, Size::new(width, height));
        self.purge();
    }

    /// The cursor moved to `(x, y)` in window space.
    pub fn on_cursor_move(&mut self, x: f64, y: f64) {
        self.purge();
        self.cursor = Point::new(x, y);
        let hits = self.hits();
        let chain = self
            .router
            .select(&hits)
            .and_then(|i| hits[i].path.clone())
            .unwrap_or_default();
        self.update_hover(&chain);
        if self.router.captured().is_none() {
            self.active_frame = chain.first().copied();
        }

        let event = MouseEvent {
            modifiers: self.modifiers,
            ..MouseEvent::moved(self.cursor)
        };
        let seq = self.router.handle_with_hits(&self.hits(), &self.scope());
        let _ = self.deliver(&seq, |v, cx| v.mouse_move(cx, &event));

        for target in self.clicks.on_move(self.cursor) {
            trace!(?target, "press moved beyond click distance");
        }
    }

    /// A mouse button changed state at the current cursor position.
    pub fn on_mouse_button(
        &mut self,
        button: MouseButton,
        action: MouseAction,
        modifiers: Modifiers,
    ) {
        self.purge();
        self.modifiers = modifiers;
        let event = MouseEvent {
            position: self.cursor,
            button: Some(button),
            action,
            modifiers,
        };
        match (action, button) {
            (MouseAction::Press, MouseButton::Right) => {
                if self.router.captured().is_none() {
                    self.focus_under_cursor();
                }
                let _ = self.deliver_focused(|v, cx| v.context_menu_press(cx, &event));
            }
            (MouseAction::Release, MouseButton::Right) => {
                let _ = self.deliver_focused(|v, cx| v.context_menu_release(cx, &event));
            }
            (MouseAction::Press, _) => self.press(&event),
            (MouseAction::Release, _) => self.release(&event),
            (MouseAction::Move, _) => trace!("move reported as a button event; ignored"),
        }
    }

    /// A key changed state.
    pub fn on_key(&mut self, key: KeyCode, scancode: i32, action: KeyAction, modifiers: Modifiers) {
        self.purge();
        self.modifiers = modifiers;
        let event = KeyEvent {
            key,
            scancode,
            action,
            modifiers,
        };
        let finished = match action {
            KeyAction::Press | KeyAction::Repeat => {
                self.deliver_focused(|v, cx| v.key_press(cx, &event))
            }
            KeyAction::Release => self.deliver_focused(|v, cx| v.key_release(cx, &event)),
        };
        if finished.is_none() {
            trace!(?key, ?action, "key event not consumed");
        }
    }

    /// A character was typed.
    pub fn on_text_input(&mut self, ch: char) {
        self.purge();
        if self.deliver_focused(|v, cx| v.text_input(cx, ch)).is_none() {
            trace!(?ch, "text input not consumed");
        }
    }

    /// Draw the window. Floating frames draw last.
    pub fn draw(&mut self, services: &mut dyn RenderingServices) {
        self.tree.draw(self.root, services);
    }

    /// Collect repaint damage since the last call.
    pub fn commit(&mut self) -> Damage {
        self.tree.commit()
    }

    /// Collect repaint damage since the last call and return its bounds, if
    /// anything needs repainting.
    pub fn needs_redraw(&mut self) -> Option<Rect> {
        self.commit().union_rect()
    }

    fn press(&mut self, event: &MouseEvent) {
        let captured = self.router.captured();
        if captured.is_none() {
            self.focus_under_cursor();
        }
        let hits = self.hits();
        let seq = self.button_sequence(&hits, event.button);
        let Some(target) = seq
            .iter()
            .find(|d| d.phase == Phase::Target)
            .map(|d| d.node)
        else {
            trace!(cursor = ?self.cursor, "press hit nothing");
            return;
        };
        if captured.is_none()
            && let Some(frame) = self.frame_of(target)
        {
            self.active_frame = Some(frame);
            if self.is_floating(frame) {
                let _ = self.raise_frame(frame);
            }
        }
        let finished = self.deliver(&seq, |v, cx| v.mouse_press(cx, event));
        let holder = finished.map(|d| d.node);
        if captured.is_none() {
            if let Some(holder) = holder
                && self.router.captured().is_none()
                && self.tree.is_alive(holder)
            {
                trace!(?holder, button = ?event.button, "pointer captured by press");
                self.router.capture(Some(holder));
            }
            if self.router.captured().is_some() {
                self.captured_by = event.button;
            }
        }
        if let Some(button) = event.button {
            self.clicks.on_down(
                button.code(),
                holder.unwrap_or(target),
                event.position,
                self.time,
            );
        }
    }

    fn release(&mut self, event: &MouseEvent) {
        let ends_capture = self.router.captured().is_some() && self.owns_capture(event.button);
        let hits = self.hits();
        let seq = self.button_sequence(&hits, event.button);
        let _ = self.deliver(&seq, |v, cx| v.mouse_release(cx, event));

        let under = self.router.select(&hits).map(|i| hits[i].node);
        if let Some(button) = event.button {
            match self
                .clicks
                .on_up(button.code(), under.as_ref(), event.position, self.time)
            {
                ClickResult::Click(target) if self.tree.is_alive(target) => {
                    self.notify(target, |v, cx| v.click(cx, event));
                }
                ClickResult::Click(_) => {}
                ClickResult::Suppressed(pressed) => {
                    trace!(?pressed, "release did not resolve to a click");
                }
            }
        }
        if ends_capture && let Some(holder) = self.router.captured() {
            trace!(?holder, "pointer capture released");
            self.set_capture(None);
        }
    }

    /// Whether a release of `button` ends the current capture.
    ///
    /// Capture taken outside a press ends with any button's release.
    fn owns_capture(&self, button: Option<MouseButton>) -> bool {
        self.captured_by.is_none_or(|b| Some(b) == button)
    }

    fn set_capture(&mut self, holder: Option<ViewId>) {
        self.router.capture(holder);
        self.captured_by = None;
    }

    /// Route a button event to the capture holder if `button` owns the
    /// capture, otherwise to the view under the cursor.
    fn button_sequence(
        &self,
        hits: &[ResolvedHit<ViewId>],
        button: Option<MouseButton>,
    ) -> Vec<Dispatch<ViewId>> {
        if self.router.captured().is_none() || self.owns_capture(button) {
            return self.router.handle_with_hits(hits, &self.scope());
        }
        self.router
            .select(hits)
            .map(|i| self.router.dispatch_for(hits[i].node, &self.scope()))
            .unwrap_or_default()
    }

    /// Move focus to the frame and deepest focusable widget under the cursor.
    fn focus_under_cursor(&mut self) {
        if !self.config.focus_on_press {
            return;
        }
        let hits = self.hits();
        let Some(path) = self.router.select(&hits).and_then(|i| hits[i].path.clone()) else {
            return;
        };
        let Some(&frame) = path.first() else {
            return;
        };
        let old_frame = self.frame_focus.focused();
        let new_frame = if self.is_focusable(frame) {
            Some(frame)
        } else {
            old_frame
        };
        let widget = path
            .iter()
            .rev()
            .copied()
            .find(|&v| v != frame && self.is_focusable(v) && !self.is_frame(v));
        let new_widget = match widget {
            Some(w) => Some(w),
            None if new_frame == old_frame => self.widget_focus.focused(),
            None => None,
        };
        self.transfer_focus(new_frame, new_widget);
    }

    /// Update both focus slots. Notifications run widget-off, frame-off,
    /// frame-on, widget-on.
    fn transfer_focus(&mut self, frame: Option<ViewId>, widget: Option<ViewId>) {
        let widget_events = self.widget_focus.set(widget);
        let frame_events = self.frame_focus.set(frame);
        if widget_events.is_empty() && frame_events.is_empty() {
            return;
        }
        debug!(?frame, ?widget, "focus changed");
        let mut order: SmallVec<[FocusEvent<ViewId>; 4]> = SmallVec::new();
        let offs = |e: &&FocusEvent<ViewId>| matches!(e, FocusEvent::Off(_));
        order.extend(widget_events.iter().filter(offs).copied());
        order.extend(frame_events.iter().filter(offs).copied());
        order.extend(frame_events.iter().filter(|e| !offs(e)).copied());
        order.extend(widget_events.iter().filter(|e| !offs(e)).copied());
        for e in order {
            match e {
                FocusEvent::Off(id) => self.notify(id, |v, cx| v.focus_off(cx)),
                FocusEvent::On(id) => self.notify(id, |v, cx| v.focus_on(cx)),
            }
        }
    }

    fn update_hover(&mut self, chain: &[ViewId]) {
        let transition = self.hover.update_path(chain);
        if transition.is_empty() {
            return;
        }
        debug!(chain = ?chain, "hover changed");
        for e in transition {
            match e {
                HoverEvent::Leave(id) => self.notify(id, |v, cx| v.hover_out(cx)),
                HoverEvent::Enter(id) => self.notify(id, |v, cx| v.hover_in(cx)),
            }
        }
    }

    /// One candidate per top-level frame under the cursor, in paint order.
    fn hits(&self) -> Vec<ResolvedHit<ViewId>> {
        let filter = QueryFilter::new().pickable();
        self.tree
            .paint_order(self.root)
            .into_iter()
            .filter_map(|frame| {
                let hit = self.tree.hit_test_from(frame, self.cursor, filter)?;
                Some(ResolvedHit {
                    node: hit.node,
                    path: Some(hit.path),
                    depth: self.tree.z_index(frame).unwrap_or(0),
                })
            })
            .collect()
    }

    fn scope(&self) -> FrameScope<'_> {
        FrameScope {
            tree: &self.tree,
            root: self.root,
        }
    }

    /// Route an event to the focused widget, else the focused frame.
    fn deliver_focused(
        &mut self,
        hook: impl FnMut(&mut dyn View, &mut EventCtx<'_>) -> Response,
    ) -> Option<Dispatch<ViewId>> {
        let target = self
            .widget_focus
            .focused()
            .or_else(|| self.frame_focus.focused())?;
        let seq = self.router.dispatch_for(target, &self.scope());
        self.deliver(&seq, hook)
    }

    /// Walk `seq` until a view finishes the event, then apply what the
    /// handlers asked for.
    fn deliver(
        &mut self,
        seq: &[Dispatch<ViewId>],
        mut hook: impl FnMut(&mut dyn View, &mut EventCtx<'_>) -> Response,
    ) -> Option<Dispatch<ViewId>> {
        let mut deferred = Vec::new();
        let cursor = self.cursor;
        let tree = &mut self.tree;
        let finished = dispatcher::run(seq, &mut deferred, |d, deferred| {
            tree.with_event_ctx(d.node, d.phase, cursor, deferred, &mut hook)
                .unwrap_or(Response::Ignore)
        })
        .copied();
        if let Some(d) = finished {
            trace!(node = ?d.node, phase = ?d.phase, "event finished");
        }
        self.apply(deferred);
        finished
    }

    /// Run a non-propagating hook on one view.
    fn notify(&mut self, id: ViewId, hook: impl FnOnce(&mut dyn View, &mut EventCtx<'_>)) {
        let mut deferred = Vec::new();
        let _ = self
            .tree
            .with_event_ctx(id, Phase::Target, self.cursor, &mut deferred, hook);
        self.apply(deferred);
    }

    fn apply(&mut self, deferred: Vec<Deferred>) {
        for action in deferred {
            match action {
                Deferred::Geometry(id, change) => {
                    let _ = self.tree.request(id, change);
                }
                Deferred::Focus(id) => {
                    let _ = self.set_focus(id);
                }
                Deferred::ClearFocus => self.clear_focus(),
                Deferred::CapturePointer(id) if self.tree.is_alive(id) => {
                    self.set_capture(Some(id));
                }
                Deferred::CapturePointer(_) => {}
                Deferred::ReleasePointer => self.set_capture(None),
                Deferred::Redraw(id) => self.tree.request_redraw(id),
                Deferred::Destroy(id) => {
                    let _ = self.destroy(id);
                }
            }
        }
        self.purge();
    }

    /// Drop every reference to views that were removed or detached from the root.
    fn purge(&mut self) {
        let dead: HashSet<ViewId> = self.destroyed.borrow_mut().drain(..).collect();
        let tree = &self.tree;
        let root = self.root;
        let gone = |id: ViewId| {
            dead.contains(&id) || !tree.is_alive(id) || !tree.is_ancestor_of(root, id)
        };
        let mut purged = self.hover.retain(|id| !gone(id));
        purged |= self.frame_focus.purge_if(gone);
        purged |= self.widget_focus.purge_if(gone);
        if self.active_frame.is_some_and(gone) {
            self.active_frame = None;
            purged = true;
        }
        if self.router.captured().is_some_and(gone) {
            self.router.capture(None);
            self.captured_by = None;
            purged = true;
        }
        self.clicks.retain(|id| !gone(*id));
        if purged {
            debug!(destroyed = dead.len(), "purged stale views from input state");
        }
    }

    /// The top-level frame containing `id`.
    fn frame_of(&self, id: ViewId) -> Option<ViewId> {
        let mut cur = id;
        loop {
            let parent = self.tree.parent_of(cur)?;
            if parent == self.root {
                return Some(cur);
            }
            cur = parent;
        }
    }

    fn has_flag(&self, id: ViewId, flag: ViewFlags) -> bool {
        self.tree.flags(id).is_some_and(|f| f.contains(flag))
    }

    fn is_focusable(&self, id: ViewId) -> bool {
        self.has_flag(id, ViewFlags::FOCUSABLE)
    }

    fn is_frame(&self, id: ViewId) -> bool {
        self.has_flag(id, ViewFlags::FRAME)
    }

    fn is_floating(&self, id: ViewId) -> bool {
        self.has_flag(id, ViewFlags::FLOATING)
    }
}
