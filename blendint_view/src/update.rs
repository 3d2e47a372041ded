// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The geometry update protocol.
//!
//! Every change to a view's position, size, margin, corners or visibility is
//! an [`UpdateRequest`] that runs three phases:
//!
//! 1. **Test.** The target's container may veto the change through
//!    [`Layout::update_test`](crate::Layout::update_test). Nothing has been
//!    mutated yet; a veto drops the request.
//! 2. **Commit.** The stored field takes the new value, draw data is marked
//!    stale and the target's
//!    [`Layout::perform_update`](crate::Layout::perform_update) runs. A
//!    container re-lays out its children from here through [`UpdateCtx`].
//! 3. **Report.** If the target changed its own geometry, its container hears
//!    about it through [`Layout::report_update`](crate::Layout::report_update).
//!
//! Requests a container issues for its children skip the test phase (the
//! container is the authority) and are not reported back to it.
//!
//! A request whose value equals the stored one is dropped before the test
//! phase. A request aimed at a view whose own hook is currently running is
//! dropped with a warning; hooks only ever reach their children.

use alloc::vec::Vec;
use kurbo::{Point, Rect, Size};
use tracing::{debug, trace, warn};

use crate::request::{GeometryChange, UpdateRequest};
use crate::tree::{Node, ViewTree};
use crate::types::{Margin, RoundType, ViewFlags, ViewId};

impl ViewTree {
    /// Resize a view. Returns `true` if the size changed.
    pub fn resize(&mut self, id: ViewId, size: Size) -> bool {
        self.request(id, GeometryChange::Size(size))
    }

    /// Move a view within its parent. Returns `true` if the position changed.
    pub fn set_position(&mut self, id: ViewId, position: Point) -> bool {
        self.request(id, GeometryChange::Position(position))
    }

    /// Change the inner spacing. Returns `true` if the margin changed.
    pub fn set_margin(&mut self, id: ViewId, margin: Margin) -> bool {
        self.request(id, GeometryChange::Margin(margin))
    }

    /// Change which corners are rounded.
    pub fn set_round_type(&mut self, id: ViewId, round_type: RoundType) -> bool {
        self.request(id, GeometryChange::RoundType(round_type))
    }

    /// Change the corner radius.
    pub fn set_round_radius(&mut self, id: ViewId, radius: f64) -> bool {
        self.request(id, GeometryChange::RoundRadius(radius))
    }

    /// Show or hide a view and its subtree.
    pub fn set_visible(&mut self, id: ViewId, visible: bool) -> bool {
        self.request(id, GeometryChange::Visibility(visible))
    }

    /// Run a self-originated change through all three phases.
    ///
    /// Returns `true` if the change was applied. Stale ids, unchanged values,
    /// vetoes and re-entrant requests all return `false` without side effects.
    pub fn request(&mut self, id: ViewId, change: GeometryChange) -> bool {
        let change = change.sanitized();
        let Some(node) = self.node_ref(id) else {
            trace!(?id, "geometry request for a stale view");
            return false;
        };
        if node.view.is_none() {
            warn!(?id, kind = ?change.kind(), "re-entrant geometry request dropped");
            return false;
        }
        if stores(node, &change) {
            return false;
        }
        let parent = node.parent;
        let req = UpdateRequest {
            source: id,
            target: id,
            change,
        };

        if let Some(parent) = parent {
            let Some(pnode) = self.node_ref(parent) else {
                return false;
            };
            let Some(pview) = pnode.view.as_ref() else {
                warn!(?id, ?parent, kind = ?req.kind(), "container busy; geometry request dropped");
                return false;
            };
            if !pview.update_test(self, parent, &req) {
                debug!(?id, ?parent, kind = ?req.kind(), "geometry request vetoed by container");
                return false;
            }
        }

        if !self.apply(req) {
            return false;
        }
        if let Some(parent) = parent {
            self.report(parent, &req);
        }
        true
    }

    /// Commit phase: store the value, mark dirty, run `perform_update`.
    fn apply(&mut self, req: UpdateRequest) -> bool {
        let Some(node) = self.node_opt_mut(req.target) else {
            return false;
        };
        let Some(mut view) = node.view.take() else {
            warn!(id = ?req.target, kind = ?req.kind(), "re-entrant geometry request dropped");
            return false;
        };
        store(node, req.change);
        // A view resizing itself also moves the size its container aims for.
        if let GeometryChange::Size(s) = req.change
            && req.is_self_originated()
            && node.local.size_hint.is_none()
        {
            node.size_hint = s;
        }
        node.dirty.repaint = true;
        if !matches!(
            req.change,
            GeometryChange::Position(_) | GeometryChange::Visibility(_)
        ) {
            node.dirty.draw_data = true;
        }
        trace!(source = ?req.source, id = ?req.target, change = ?req.change, "geometry applied");
        {
            let mut cx = UpdateCtx::new(self, req.target);
            view.perform_update(&mut cx, &req);
        }
        self.put_view(req.target, view);
        true
    }

    fn report(&mut self, parent: ViewId, req: &UpdateRequest) {
        let Some(mut view) = self.take_view(parent) else {
            return;
        };
        {
            let mut cx = UpdateCtx::new(self, parent);
            view.report_update(&mut cx, req);
        }
        self.put_view(parent, view);
    }
}

/// Whether `node` already holds the value `change` would store.
fn stores(node: &Node, change: &GeometryChange) -> bool {
    let local = &node.local;
    match *change {
        GeometryChange::Position(p) => local.position == p,
        GeometryChange::Size(s) => local.size == s,
        GeometryChange::Margin(m) => local.margin == m,
        GeometryChange::RoundType(r) => local.round_type == r,
        GeometryChange::RoundRadius(r) => local.round_radius == r,
        GeometryChange::Visibility(v) => local.flags.contains(ViewFlags::VISIBLE) == v,
    }
}

fn store(node: &mut Node, change: GeometryChange) {
    let local = &mut node.local;
    match change {
        GeometryChange::Position(p) => local.position = p,
        GeometryChange::Size(s) => local.size = s,
        GeometryChange::Margin(m) => local.margin = m,
        GeometryChange::RoundType(r) => local.round_type = r,
        GeometryChange::RoundRadius(r) => local.round_radius = r,
        GeometryChange::Visibility(v) => local.flags.set(ViewFlags::VISIBLE, v),
    }
}

/// Mutable access handed to [`Layout`](crate::Layout) hooks.
///
/// Geometry can only be changed for the direct children of [`UpdateCtx::id`];
/// those changes skip the test phase and are not reported back.
#[derive(Debug)]
pub struct UpdateCtx<'a> {
    tree: &'a mut ViewTree,
    id: ViewId,
}

impl<'a> UpdateCtx<'a> {
    pub(crate) fn new(tree: &'a mut ViewTree, id: ViewId) -> Self {
        Self { tree, id }
    }

    /// The view whose hook is running.
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Read-only view of the whole tree.
    pub fn tree(&self) -> &ViewTree {
        self.tree
    }

    /// Current size of this view.
    pub fn size(&self) -> Size {
        self.tree.size(self.id).unwrap_or(Size::ZERO)
    }

    /// Current margin of this view.
    pub fn margin(&self) -> Margin {
        self.tree.margin(self.id).unwrap_or(Margin::ZERO)
    }

    /// Area inside the margin, in this view's local coordinates.
    pub fn content_rect(&self) -> Rect {
        self.margin().content_rect(self.size())
    }

    /// Direct children, in insertion order.
    pub fn children(&self) -> Vec<ViewId> {
        self.tree.children_of(self.id).to_vec()
    }

    /// Direct children that are currently visible.
    pub fn visible_children(&self) -> Vec<ViewId> {
        self.tree
            .children_of(self.id)
            .iter()
            .copied()
            .filter(|c| {
                self.tree
                    .flags(*c)
                    .is_some_and(|f| f.contains(ViewFlags::VISIBLE))
            })
            .collect()
    }

    /// Size a child would like.
    pub fn preferred_size(&self, child: ViewId) -> Size {
        self.tree.preferred_size(child)
    }

    /// Whether a child wants extra horizontal space.
    pub fn is_expand_x(&self, child: ViewId) -> bool {
        self.tree.is_expand_x(child)
    }

    /// Whether a child wants extra vertical space.
    pub fn is_expand_y(&self, child: ViewId) -> bool {
        self.tree.is_expand_y(child)
    }

    /// Resize a child.
    pub fn resize_child(&mut self, child: ViewId, size: Size) -> bool {
        self.child_request(child, GeometryChange::Size(size))
    }

    /// Move a child.
    pub fn set_child_position(&mut self, child: ViewId, position: Point) -> bool {
        self.child_request(child, GeometryChange::Position(position))
    }

    /// Show or hide a child.
    pub fn set_child_visible(&mut self, child: ViewId, visible: bool) -> bool {
        self.child_request(child, GeometryChange::Visibility(visible))
    }

    /// Place a child at `rect` (local to this view): position first, then size.
    pub fn set_child_geometry(&mut self, child: ViewId, rect: Rect) -> bool {
        let moved = self.set_child_position(child, rect.origin());
        let resized = self.resize_child(child, rect.size());
        moved || resized
    }

    /// Any change to a child.
    pub fn child_request(&mut self, child: ViewId, change: GeometryChange) -> bool {
        if self.tree.parent_of(child) != Some(self.id) {
            warn!(container = ?self.id, ?child, "geometry request for a view that is not a child");
            return false;
        }
        let change = change.sanitized();
        match self.tree.node_ref(child) {
            Some(node) if !stores(node, &change) => {}
            _ => return false,
        }
        self.tree.apply(UpdateRequest {
            source: self.id,
            target: child,
            change,
        })
    }

    /// Mark this view for repaint.
    pub fn request_redraw(&mut self) {
        self.tree.request_redraw(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawInfo, RenderingServices};
    use crate::request::ChangeKind;
    use crate::view::{Drawable, Empty, Interactive, Layout};
    use crate::{ViewNode, ViewTree};
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    type Log = Rc<RefCell<Vec<(&'static str, UpdateRequest)>>>;

    /// Records every protocol hook; vetoes the kinds in `deny`.
    #[derive(Debug)]
    struct Recorder {
        log: Log,
        deny: Vec<ChangeKind>,
        /// Children resized to this view's width on every size change.
        stretch_children: bool,
        regenerated: usize,
    }

    impl Recorder {
        fn new(log: &Log) -> Self {
            Self {
                log: log.clone(),
                deny: Vec::new(),
                stretch_children: false,
                regenerated: 0,
            }
        }
    }

    impl Layout for Recorder {
        fn update_test(&self, _: &ViewTree, _: ViewId, request: &UpdateRequest) -> bool {
            self.log.borrow_mut().push(("test", *request));
            !self.deny.contains(&request.kind())
        }

        fn perform_update(&mut self, cx: &mut UpdateCtx<'_>, request: &UpdateRequest) {
            self.log.borrow_mut().push(("perform", *request));
            if self.stretch_children
                && let GeometryChange::Size(s) = request.change
            {
                for c in cx.children() {
                    cx.resize_child(c, Size::new(s.width, 10.0));
                }
            }
        }

        fn report_update(&mut self, _: &mut UpdateCtx<'_>, request: &UpdateRequest) {
            self.log.borrow_mut().push(("report", *request));
        }
    }

    impl Interactive for Recorder {}

    impl Drawable for Recorder {
        fn regenerate_draw_data(&mut self, _: &DrawInfo, _: &mut dyn RenderingServices) {
            self.regenerated += 1;
        }
    }

    fn names(log: &Log) -> Vec<&'static str> {
        log.borrow().iter().map(|(n, _)| *n).collect()
    }

    #[test]
    fn three_phases_in_order() {
        let log = Log::default();
        let mut tree = ViewTree::new();
        let parent = tree.insert(None, ViewNode::sized(100.0, 100.0), Recorder::new(&log));
        let child = tree.insert(Some(parent), ViewNode::sized(10.0, 10.0), Recorder::new(&log));
        log.borrow_mut().clear();

        assert!(tree.resize(child, Size::new(20.0, 20.0)));
        assert_eq!(names(&log), vec!["test", "perform", "report"]);
        let (_, req) = log.borrow()[2];
        assert_eq!(req.source, child);
        assert_eq!(req.target, child);
        assert_eq!(tree.size(child), Some(Size::new(20.0, 20.0)));
    }

    #[test]
    fn veto_leaves_no_trace() {
        let log = Log::default();
        let mut tree = ViewTree::new();
        let mut container = Recorder::new(&log);
        container.deny.push(ChangeKind::Position);
        let parent = tree.insert(None, ViewNode::sized(100.0, 100.0), container);
        let child = tree.insert(Some(parent), ViewNode::sized(10.0, 10.0), Recorder::new(&log));
        log.borrow_mut().clear();

        assert!(!tree.set_position(child, Point::new(5.0, 5.0)));
        assert_eq!(names(&log), vec!["test"]);
        assert_eq!(tree.position(child), Some(Point::ZERO));

        // Other kinds still pass.
        assert!(tree.set_margin(child, Margin::uniform(1.0)));
    }

    #[test]
    fn unchanged_values_are_dropped_before_test() {
        let log = Log::default();
        let mut tree = ViewTree::new();
        let parent = tree.insert(None, ViewNode::sized(100.0, 100.0), Recorder::new(&log));
        let child = tree.insert(Some(parent), ViewNode::sized(10.0, 10.0), Recorder::new(&log));
        log.borrow_mut().clear();

        assert!(!tree.resize(child, Size::new(10.0, 10.0)));
        assert!(!tree.set_visible(child, true));
        assert!(!tree.set_position(child, Point::ZERO));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn container_driven_changes_skip_test_and_report() {
        let log = Log::default();
        let mut tree = ViewTree::new();
        let mut container = Recorder::new(&log);
        container.stretch_children = true;
        container.deny.push(ChangeKind::Size);
        let root = tree.insert(None, ViewNode::sized(100.0, 100.0), container);
        let child = tree.insert(Some(root), ViewNode::sized(10.0, 10.0), Recorder::new(&log));
        log.borrow_mut().clear();

        assert!(tree.resize(root, Size::new(300.0, 50.0)));
        let entries = log.borrow().clone();
        assert_eq!(entries.len(), 2, "{entries:?}");
        assert_eq!(entries[0].0, "perform");
        assert_eq!(entries[0].1.target, root);
        assert_eq!(entries[1].0, "perform");
        assert_eq!(entries[1].1.source, root);
        assert_eq!(entries[1].1.target, child);
        assert_eq!(tree.size(child), Some(Size::new(300.0, 10.0)));

        // The same change from the child itself is vetoed.
        assert!(!tree.resize(child, Size::new(1.0, 1.0)));
    }

    #[test]
    fn hooks_cannot_reach_non_children() {
        let mut tree = ViewTree::new();
        let root = tree.insert(None, ViewNode::sized(10.0, 10.0), Empty);
        let a = tree.insert(Some(root), ViewNode::sized(5.0, 5.0), Empty);
        let b = tree.insert(Some(a), ViewNode::sized(1.0, 1.0), Empty);
        let changed = tree.update_view::<Empty, _>(root, |_, cx| {
            (
                cx.resize_child(b, Size::new(2.0, 2.0)),
                cx.resize_child(a, Size::new(6.0, 6.0)),
            )
        });
        assert_eq!(changed, Some((false, true)));
        assert_eq!(tree.size(b), Some(Size::new(1.0, 1.0)));
    }

    #[test]
    fn requests_to_busy_views_are_dropped() {
        let mut tree = ViewTree::new();
        let root = tree.insert(None, ViewNode::sized(10.0, 10.0), Empty);
        let view = tree.take_view(root).unwrap();
        assert!(!tree.resize(root, Size::new(1.0, 1.0)));
        tree.put_view(root, view);
        assert!(tree.resize(root, Size::new(1.0, 1.0)));
    }

    #[test]
    fn sanitizes_before_comparing() {
        let mut tree = ViewTree::new();
        let n = tree.insert(None, ViewNode::sized(0.0, 0.0), Empty);
        assert!(!tree.resize(n, Size::new(-5.0, -1.0)));
        assert!(tree.resize(n, Size::new(-5.0, 3.0)));
        assert_eq!(tree.size(n), Some(Size::new(0.0, 3.0)));
        assert!(!tree.set_round_radius(n, f64::NAN));
    }

    #[test]
    fn draw_data_regenerates_lazily_once() {
        let log = Log::default();
        let mut tree = ViewTree::new();
        let n = tree.insert(None, ViewNode::sized(10.0, 10.0), Recorder::new(&log));
        let mut list = crate::DisplayList::new();
        tree.draw(n, &mut list);
        assert_eq!(tree.view::<Recorder>(n).unwrap().regenerated, 1);

        assert!(tree.resize(n, Size::new(20.0, 20.0)));
        assert!(tree.set_margin(n, Margin::uniform(2.0)));
        assert_eq!(tree.view::<Recorder>(n).unwrap().regenerated, 1);
        tree.draw(n, &mut list);
        tree.draw(n, &mut list);
        assert_eq!(tree.view::<Recorder>(n).unwrap().regenerated, 2);

        // Moving does not invalidate draw data.
        assert!(tree.set_position(n, Point::new(3.0, 3.0)));
        tree.draw(n, &mut list);
        assert_eq!(tree.view::<Recorder>(n).unwrap().regenerated, 2);
    }
}
