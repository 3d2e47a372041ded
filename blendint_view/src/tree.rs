// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: ownership, structure, queries and drawing.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use blendint_responder::types::ParentLookup;
use kurbo::{Point, Rect, Size};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::damage::Damage;
use crate::render::{DrawInfo, RenderingServices};
use crate::signal::Signal;
use crate::types::{Margin, RoundType, ViewFlags, ViewId, ViewNode};
use crate::update::UpdateCtx;
use crate::view::View;

/// The view tree.
///
/// Every node owns its geometry ([`ViewNode`]) and a boxed [`View`]
/// behaviour. Parents own their children: removing a node removes its whole
/// subtree. All other references into the tree are [`ViewId`]s, which go stale
/// when their node is removed and never alias a later node.
///
/// Geometry is changed through the update protocol entry points
/// ([`ViewTree::resize`], [`ViewTree::set_position`], ...). Queries such as
/// [`ViewTree::world_bounds`] and [`ViewTree::hit_test_from`] always see the
/// latest committed protocol state; [`ViewTree::commit`] only summarizes what
/// needs repainting.
///
/// ## Example
///
/// ```rust
/// use blendint_view::{Empty, ViewNode, ViewTree};
/// use kurbo::Rect;
///
/// let mut tree = ViewTree::new();
/// let root = tree.insert(None, ViewNode::sized(100.0, 100.0), Empty);
/// let child = tree.insert(Some(root), ViewNode::sized(10.0, 10.0).at(20.0, 30.0), Empty);
///
/// assert_eq!(tree.world_bounds(child), Some(Rect::new(20.0, 30.0, 30.0, 40.0)));
///
/// // Positions are parent-relative: moving the root moves the child.
/// assert!(tree.set_position(root, kurbo::Point::new(5.0, 5.0)));
/// assert_eq!(tree.world_bounds(child), Some(Rect::new(25.0, 35.0, 35.0, 45.0)));
/// ```
pub struct ViewTree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    /// damage from nodes removed since the last commit
    pending: Damage,
    destroyed: Signal<ViewId>,
}

impl fmt::Debug for ViewTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewTree")
            .field("nodes_total", &self.nodes.len())
            .field("nodes_alive", &self.len())
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl Default for ViewTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Results of a hit test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hit {
    /// The matched view.
    pub node: ViewId,
    /// Path from the start of the search to the view (inclusive).
    pub path: Vec<ViewId>,
}

/// Filters applied during hit testing.
#[derive(Clone, Copy, Debug)]
pub struct QueryFilter {
    /// Bitfield of required view flags. Only views containing all these flags can match.
    pub required_flags: ViewFlags,
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self {
            required_flags: ViewFlags::empty(),
        }
    }
}

impl QueryFilter {
    /// Create a new empty filter (includes all visible views).
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter to only pickable views.
    pub fn pickable(mut self) -> Self {
        self.required_flags |= ViewFlags::PICKABLE;
        self
    }

    /// Filter to only focusable views.
    pub fn focusable(mut self) -> Self {
        self.required_flags |= ViewFlags::FOCUSABLE;
        self
    }

    /// Check if a view's flags satisfy this filter.
    pub fn matches(&self, flags: ViewFlags) -> bool {
        flags.contains(self.required_flags)
    }
}

/// Why a bind was refused.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BindError {
    /// The parent or the child id is stale.
    Stale,
    /// A view cannot be its own parent.
    SelfBind,
    /// The new parent is a descendant of the child.
    Cycle,
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stale => "view id is stale",
            Self::SelfBind => "a view cannot be bound to itself",
            Self::Cycle => "binding would make a view its own ancestor",
        })
    }
}

impl core::error::Error for BindError {}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Dirty {
    /// world rect must be reported on the next commit
    pub(crate) repaint: bool,
    /// `regenerate_draw_data` runs before the next draw
    pub(crate) draw_data: bool,
}

#[derive(Debug)]
pub(crate) struct Node {
    generation: u32,
    pub(crate) parent: Option<ViewId>,
    pub(crate) children: Vec<ViewId>,
    pub(crate) local: ViewNode,
    /// resolved `local.size_hint`
    pub(crate) size_hint: Size,
    pub(crate) dirty: Dirty,
    /// world rect reported by the last commit, `None` while hidden
    painted: Option<Rect>,
    /// `None` while the view is checked out for a hook
    pub(crate) view: Option<Box<dyn View>>,
}

impl Node {
    fn new(generation: u32, mut local: ViewNode, view: Box<dyn View>) -> Self {
        local.size = Size::new(
            crate::types::non_negative(local.size.width),
            crate::types::non_negative(local.size.height),
        );
        local.margin = local.margin.clamped();
        local.round_radius = crate::types::non_negative(local.round_radius);
        let size_hint = local.size_hint.unwrap_or(local.size);
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            local,
            size_hint,
            dirty: Dirty {
                repaint: true,
                draw_data: true,
            },
            painted: None,
            view: Some(view),
        }
    }

    fn is_visible(&self) -> bool {
        self.local.flags.contains(ViewFlags::VISIBLE)
    }
}

impl ViewTree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            pending: Damage::default(),
            destroyed: Signal::new(),
        }
    }

    /// Insert a new view as the last child of `parent` (or as a root if `None`).
    ///
    /// A stale `parent` inserts a root. The parent's
    /// [`children_changed`](crate::Layout::children_changed) hook runs before
    /// this returns, so containers lay the new child out immediately.
    pub fn insert<V: View>(&mut self, parent: Option<ViewId>, local: ViewNode, view: V) -> ViewId {
        let node = Node::new(0, local, Box::new(view));
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node { generation, ..node });
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ViewId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node { generation, ..node }));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ViewId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = ViewId::new(idx, generation);
        match parent {
            Some(p) if self.is_alive(p) => {
                self.link_parent(id, p, usize::MAX);
                self.notify_children_changed(p);
            }
            Some(p) => warn!(?p, "insert under a stale parent; inserted as root"),
            None => {}
        }
        id
    }

    /// Bind `child` as the last child of `parent`.
    ///
    /// See [`ViewTree::insert_child`].
    pub fn add_child(&mut self, parent: ViewId, child: ViewId) -> Result<(), BindError> {
        self.insert_child(parent, usize::MAX, child)
    }

    /// Bind `child` under `parent` at `index` (clamped to the child count).
    ///
    /// The child is first unbound from its current parent, which is told
    /// through [`children_changed`](crate::Layout::children_changed); then the
    /// new parent is told.
    pub fn insert_child(
        &mut self,
        parent: ViewId,
        index: usize,
        child: ViewId,
    ) -> Result<(), BindError> {
        if !self.is_alive(parent) || !self.is_alive(child) {
            return Err(BindError::Stale);
        }
        if parent == child {
            return Err(BindError::SelfBind);
        }
        if self.is_ancestor_of(child, parent) {
            warn!(?parent, ?child, "refusing to bind a view beneath its own subtree");
            return Err(BindError::Cycle);
        }
        let old = self.node_ref(child).and_then(|n| n.parent);
        if let Some(old) = old {
            self.unlink_parent(child, old);
            if old != parent {
                self.notify_children_changed(old);
            }
        }
        self.link_parent(child, parent, index);
        self.notify_children_changed(parent);
        Ok(())
    }

    /// Unbind `id` from its parent, keeping it alive as a root.
    ///
    /// Returns `false` for stale ids and roots.
    pub fn detach(&mut self, id: ViewId) -> bool {
        let Some(parent) = self.parent_of(id) else {
            return false;
        };
        self.unlink_parent(id, parent);
        self.notify_children_changed(parent);
        true
    }

    /// Remove a view and its subtree.
    ///
    /// The [`on_destroyed`](Self::on_destroyed) signal fires for every removed
    /// view (parent before children) while the views are still alive; then the
    /// views are dropped and the former parent is told through
    /// [`children_changed`](crate::Layout::children_changed).
    ///
    /// Returns the removed ids, empty for a stale id.
    pub fn remove(&mut self, id: ViewId) -> Vec<ViewId> {
        if !self.is_alive(id) {
            return Vec::new();
        }
        let subtree = self.subtree(id);
        for v in &subtree {
            self.destroyed.emit(v);
        }
        let parent = self.parent_of(id);
        if let Some(p) = parent {
            self.unlink_parent(id, p);
        }
        for v in &subtree {
            if let Some(node) = self.nodes[v.idx()].take() {
                if let Some(r) = node.painted {
                    self.pending.push(r);
                }
                self.free_list.push(v.idx());
            }
        }
        debug!(?id, count = subtree.len(), "removed view subtree");
        if let Some(p) = parent {
            self.notify_children_changed(p);
        }
        subtree
    }

    /// Signal fired for each view about to be destroyed.
    pub fn on_destroyed(&self) -> &Signal<ViewId> {
        &self.destroyed
    }

    /// Update the z index among siblings.
    pub fn set_z_index(&mut self, id: ViewId, z: i32) {
        if let Some(n) = self.node_opt_mut(id)
            && n.local.z_index != z
        {
            n.local.z_index = z;
            n.dirty.repaint = true;
        }
    }

    /// Update flags other than [`ViewFlags::VISIBLE`], which is left as is.
    ///
    /// Use [`ViewTree::set_visible`] to show or hide a view. A change of the
    /// expand flags re-lays out the parent.
    pub fn set_flags(&mut self, id: ViewId, flags: ViewFlags) {
        let Some(n) = self.node_opt_mut(id) else {
            return;
        };
        let flags = (flags - ViewFlags::VISIBLE) | (n.local.flags & ViewFlags::VISIBLE);
        if n.local.flags == flags {
            return;
        }
        let expand = ViewFlags::EXPAND_X | ViewFlags::EXPAND_Y;
        let relayout = (n.local.flags & expand) != (flags & expand);
        n.local.flags = flags;
        if relayout && let Some(p) = n.parent {
            self.notify_children_changed(p);
        }
    }

    /// Change the size a container should aim for; `None` uses the current size.
    ///
    /// The parent re-lays out when the resolved hint changes.
    pub fn set_size_hint(&mut self, id: ViewId, hint: Option<Size>) {
        let Some(n) = self.node_opt_mut(id) else {
            return;
        };
        n.local.size_hint = hint;
        let resolved = hint.unwrap_or(n.local.size);
        if n.size_hint == resolved {
            return;
        }
        n.size_hint = resolved;
        if let Some(p) = n.parent {
            self.notify_children_changed(p);
        }
    }

    /// Tell the container of `id` that the view's preferred size or expansion
    /// changed, so it lays its children out again.
    pub fn preferred_size_changed(&mut self, id: ViewId) {
        if let Some(p) = self.parent_of(id) {
            self.notify_children_changed(p);
        }
    }

    /// Mark a view for repaint on the next [`ViewTree::commit`].
    pub fn request_redraw(&mut self, id: ViewId) {
        if let Some(n) = self.node_opt_mut(id) {
            n.dirty.repaint = true;
        }
    }

    /// Collect repaint damage since the last commit.
    ///
    /// Reports the old and new world rectangles of every view that moved,
    /// resized, appeared or disappeared, the rectangles of views marked for
    /// repaint, and the last rectangles of removed views.
    pub fn commit(&mut self) -> Damage {
        let mut damage = core::mem::take(&mut self.pending);
        let mut stack: Vec<(ViewId, Point, bool)> = self
            .roots()
            .into_iter()
            .map(|r| (r, Point::ZERO, true))
            .collect();
        while let Some((id, parent_origin, parent_visible)) = stack.pop() {
            let Some(node) = self.nodes[id.idx()].as_mut() else {
                continue;
            };
            let origin = parent_origin + node.local.position.to_vec2();
            let visible = parent_visible && node.is_visible();
            let rect = visible.then(|| Rect::from_origin_size(origin, node.local.size));
            if rect != node.painted {
                if let Some(old) = node.painted {
                    damage.push(old);
                }
                if let Some(new) = rect {
                    damage.push(new);
                }
            } else if node.dirty.repaint
                && let Some(r) = rect
            {
                damage.push(r);
            }
            node.painted = rect;
            node.dirty.repaint = false;
            for &child in node.children.iter().rev() {
                stack.push((child, origin, visible));
            }
        }
        damage
    }

    /// Hit test a world-space point within the subtree rooted at `start`.
    ///
    /// - Invisible views and their subtrees never match.
    /// - A child is only tested where it lies inside its parent's bounds.
    /// - Children are tested before their parent: higher `z_index` first,
    ///   then the most recently added first. The first view that contains the
    ///   point and satisfies `filter` wins; views that fail the filter are
    ///   transparent and let their parent match.
    pub fn hit_test_from(&self, start: ViewId, point: Point, filter: QueryFilter) -> Option<Hit> {
        let parent_origin = match self.parent_of(start) {
            Some(p) => self.world_origin(p)?,
            None => Point::ZERO,
        };
        if !self.is_alive(start) {
            return None;
        }
        let mut path = Vec::new();
        if self.hit_recursive(start, parent_origin, point, filter, &mut path) {
            let node = *path.last()?;
            Some(Hit { node, path })
        } else {
            None
        }
    }

    fn hit_recursive(
        &self,
        id: ViewId,
        parent_origin: Point,
        point: Point,
        filter: QueryFilter,
        path: &mut Vec<ViewId>,
    ) -> bool {
        let Some(node) = self.node_ref(id) else {
            return false;
        };
        if !node.is_visible() {
            return false;
        }
        let origin = parent_origin + node.local.position.to_vec2();
        if !Rect::from_origin_size(origin, node.local.size).contains(point) {
            return false;
        }
        path.push(id);
        for child in self.paint_order(id).into_iter().rev() {
            if self.hit_recursive(child, origin, point, filter, path) {
                return true;
            }
        }
        if filter.matches(node.local.flags) {
            return true;
        }
        path.pop();
        false
    }

    /// Draw the subtree rooted at `root`.
    ///
    /// Invisible subtrees are skipped. Views whose draw data is stale get
    /// [`regenerate_draw_data`](crate::Drawable::regenerate_draw_data) first.
    /// Children draw after their parent, lower `z_index` first, clipped to
    /// the parent's rectangle.
    pub fn draw(&mut self, root: ViewId, services: &mut dyn RenderingServices) {
        let parent_origin = self
            .parent_of(root)
            .and_then(|p| self.world_origin(p))
            .unwrap_or(Point::ZERO);
        self.draw_recursive(root, parent_origin, services);
    }

    fn draw_recursive(
        &mut self,
        id: ViewId,
        parent_origin: Point,
        services: &mut dyn RenderingServices,
    ) {
        let children = self.paint_order(id);
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        if !node.is_visible() {
            return;
        }
        let origin = parent_origin + node.local.position.to_vec2();
        let info = DrawInfo {
            id,
            rect: Rect::from_origin_size(origin, node.local.size),
            margin: node.local.margin,
            round_type: node.local.round_type,
            round_radius: node.local.round_radius,
            flags: node.local.flags,
        };
        let regenerate = core::mem::take(&mut node.dirty.draw_data);
        if let Some(view) = node.view.as_mut() {
            if regenerate {
                view.regenerate_draw_data(&info, services);
            }
            view.draw(&info, services);
        }
        if children.is_empty() {
            return;
        }
        services.push_clip(info.rect);
        for child in children {
            self.draw_recursive(child, origin, services);
        }
        services.pop_clip();
    }

    /// Children of `id` in drawing order: ascending `z_index`, insertion order on ties.
    pub fn paint_order(&self, id: ViewId) -> SmallVec<[ViewId; 16]> {
        let mut out: SmallVec<[ViewId; 16]> = self.children_of(id).iter().copied().collect();
        // Stable sort keeps insertion order among equal z.
        out.sort_by_key(|c| self.z_index(*c).unwrap_or(0));
        out
    }

    /// Borrow the behaviour of `id` as `T`.
    ///
    /// Returns `None` for stale ids, for views of another type and while the
    /// view is running one of its own hooks.
    pub fn view<T: View>(&self, id: ViewId) -> Option<&T> {
        self.node_ref(id)?.view.as_ref()?.as_any().downcast_ref::<T>()
    }

    /// Mutably borrow the behaviour of `id` as `T`.
    ///
    /// For state that does not affect geometry; geometry goes through the
    /// update protocol or [`ViewTree::update_view`].
    pub fn view_mut<T: View>(&mut self, id: ViewId) -> Option<&mut T> {
        self.node_opt_mut(id)?
            .view
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<T>()
    }

    /// Run `f` with the behaviour of `id` and an [`UpdateCtx`] for it.
    ///
    /// This is how application code drives container operations that move
    /// children (switching a stack's active page, for example).
    pub fn update_view<T: View, R>(
        &mut self,
        id: ViewId,
        f: impl FnOnce(&mut T, &mut UpdateCtx<'_>) -> R,
    ) -> Option<R> {
        let mut view = self.take_view(id)?;
        let out = match view.as_any_mut().downcast_mut::<T>() {
            Some(v) => {
                let mut cx = UpdateCtx::new(self, id);
                Some(f(v, &mut cx))
            }
            None => None,
        };
        self.put_view(id, view);
        out
    }

    /// Returns `true` if `id` refers to a live view.
    pub fn is_alive(&self, id: ViewId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Number of live views.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Returns `true` if the tree has no live views.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live views without a parent, in slot order.
    pub fn roots(&self) -> Vec<ViewId> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| match n {
                Some(n) if n.parent.is_none() =>
                {
                    #[allow(
                        clippy::cast_possible_truncation,
                        reason = "ViewId uses 32-bit indices by design."
                    )]
                    Some(ViewId::new(i as u32, n.generation))
                }
                _ => None,
            })
            .collect()
    }

    /// Returns the parent of a view if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: ViewId) -> Option<ViewId> {
        self.node_ref(id)?.parent
    }

    /// Get the children of a view, or an empty slice if the view is stale.
    pub fn children_of(&self, id: ViewId) -> &[ViewId] {
        self.node_ref(id).map_or(&[], |n| &n.children)
    }

    /// Returns `true` if `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_of(&self, ancestor: ViewId, id: ViewId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == ancestor {
                return self.is_alive(c);
            }
            cur = self.parent_of(c);
        }
        false
    }

    /// Root → `id` path (inclusive), empty for stale ids.
    pub fn path_to(&self, id: ViewId) -> Vec<ViewId> {
        if !self.is_alive(id) {
            return Vec::new();
        }
        blendint_responder::router::reconstruct_path(id, self)
    }

    /// Parent-relative position.
    pub fn position(&self, id: ViewId) -> Option<Point> {
        self.node_ref(id).map(|n| n.local.position)
    }

    /// Current size.
    pub fn size(&self, id: ViewId) -> Option<Size> {
        self.node_ref(id).map(|n| n.local.size)
    }

    /// Size a container should aim for.
    pub fn size_hint(&self, id: ViewId) -> Option<Size> {
        self.node_ref(id).map(|n| n.size_hint)
    }

    /// Inner spacing.
    pub fn margin(&self, id: ViewId) -> Option<Margin> {
        self.node_ref(id).map(|n| n.local.margin)
    }

    /// Rounded corners.
    pub fn round_type(&self, id: ViewId) -> Option<RoundType> {
        self.node_ref(id).map(|n| n.local.round_type)
    }

    /// Corner radius.
    pub fn round_radius(&self, id: ViewId) -> Option<f64> {
        self.node_ref(id).map(|n| n.local.round_radius)
    }

    /// Returns the flags of a view if the identifier is live.
    pub fn flags(&self, id: ViewId) -> Option<ViewFlags> {
        self.node_ref(id).map(|n| n.local.flags)
    }

    /// Returns the z-index of a view if the identifier is live.
    pub fn z_index(&self, id: ViewId) -> Option<i32> {
        self.node_ref(id).map(|n| n.local.z_index)
    }

    /// Returns `true` if the view and all its ancestors are visible.
    pub fn is_visible(&self, id: ViewId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            match self.node_ref(c) {
                Some(n) if n.is_visible() => cur = n.parent,
                _ => return false,
            }
        }
        true
    }

    /// The rectangle of `id` in its parent's coordinates.
    pub fn local_rect(&self, id: ViewId) -> Option<Rect> {
        self.node_ref(id)
            .map(|n| Rect::from_origin_size(n.local.position, n.local.size))
    }

    /// World-space origin (bottom-left corner) of a view.
    pub fn world_origin(&self, id: ViewId) -> Option<Point> {
        let mut node = self.node_ref(id)?;
        let mut origin = node.local.position;
        while let Some(p) = node.parent {
            node = self.node_ref(p)?;
            origin += node.local.position.to_vec2();
        }
        Some(origin)
    }

    /// World-space rectangle of a view.
    pub fn world_bounds(&self, id: ViewId) -> Option<Rect> {
        let size = self.size(id)?;
        Some(Rect::from_origin_size(self.world_origin(id)?, size))
    }

    /// Size the view would like from its container.
    pub fn preferred_size(&self, id: ViewId) -> Size {
        match self.node_ref(id) {
            Some(Node {
                view: Some(view), ..
            }) => view.preferred_size(self, id),
            Some(node) => node.size_hint,
            None => Size::ZERO,
        }
    }

    /// Whether the view wants extra horizontal space.
    pub fn is_expand_x(&self, id: ViewId) -> bool {
        match self.node_ref(id) {
            Some(Node {
                view: Some(view), ..
            }) => view.is_expand_x(self, id),
            Some(node) => node.local.flags.contains(ViewFlags::EXPAND_X),
            None => false,
        }
    }

    /// Whether the view wants extra vertical space.
    pub fn is_expand_y(&self, id: ViewId) -> bool {
        match self.node_ref(id) {
            Some(Node {
                view: Some(view), ..
            }) => view.is_expand_y(self, id),
            Some(node) => node.local.flags.contains(ViewFlags::EXPAND_Y),
            None => false,
        }
    }

    /// Get the next view in depth-first traversal order.
    ///
    /// Returns `None` if no next view exists or if the current view is stale.
    pub fn next_depth_first(&self, current: ViewId) -> Option<ViewId> {
        if let Some(&first) = self.children_of(current).first() {
            return Some(first);
        }
        let mut node = current;
        while let Some(parent) = self.parent_of(node) {
            if let Some(next) = self.sibling(node, 1) {
                return Some(next);
            }
            node = parent;
        }
        None
    }

    /// Get the previous view in reverse depth-first traversal order.
    ///
    /// Returns `None` if no previous view exists or if the current view is stale.
    pub fn prev_depth_first(&self, current: ViewId) -> Option<ViewId> {
        if !self.is_alive(current) {
            return None;
        }
        let Some(mut node) = self.sibling(current, -1) else {
            return self.parent_of(current);
        };
        while let Some(&last) = self.children_of(node).last() {
            node = last;
        }
        Some(node)
    }

    fn sibling(&self, id: ViewId, offset: isize) -> Option<ViewId> {
        let siblings = self.children_of(self.parent_of(id)?);
        let pos = siblings.iter().position(|&c| c == id)?;
        siblings.get(pos.checked_add_signed(offset)?).copied()
    }

    /// Pre-order list of `id` and its descendants.
    fn subtree(&self, id: ViewId) -> Vec<ViewId> {
        let mut out = Vec::new();
        let mut stack = alloc::vec![id];
        while let Some(v) = stack.pop() {
            out.push(v);
            stack.extend(self.children_of(v).iter().rev().copied());
        }
        out
    }

    // --- internals ---

    pub(crate) fn node_ref(&self, id: ViewId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    pub(crate) fn node_opt_mut(&mut self, id: ViewId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    /// Check a behaviour out for a hook. `None` if stale or already checked out.
    pub(crate) fn take_view(&mut self, id: ViewId) -> Option<Box<dyn View>> {
        let view = self.node_opt_mut(id)?.view.take();
        if view.is_none() {
            trace!(?id, "view is busy in one of its own hooks");
        }
        view
    }

    pub(crate) fn put_view(&mut self, id: ViewId, view: Box<dyn View>) {
        if let Some(n) = self.node_opt_mut(id) {
            debug_assert!(n.view.is_none(), "view checked in twice");
            n.view = Some(view);
        }
    }

    pub(crate) fn notify_children_changed(&mut self, parent: ViewId) {
        let Some(mut view) = self.take_view(parent) else {
            return;
        };
        {
            let mut cx = UpdateCtx::new(self, parent);
            view.children_changed(&mut cx);
        }
        self.put_view(parent, view);
    }

    fn link_parent(&mut self, id: ViewId, parent: ViewId, index: usize) {
        if let Some(p) = self.node_opt_mut(parent) {
            let index = index.min(p.children.len());
            p.children.insert(index, id);
        }
        if let Some(n) = self.node_opt_mut(id) {
            n.parent = Some(parent);
            n.dirty.repaint = true;
        }
    }

    fn unlink_parent(&mut self, id: ViewId, parent: ViewId) {
        if let Some(p) = self.node_opt_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.node_opt_mut(id) {
            n.parent = None;
        }
    }
}

impl ParentLookup<ViewId> for ViewTree {
    fn parent_of(&self, node: &ViewId) -> Option<ViewId> {
        Self::parent_of(self, *node)
    }
}
