// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stacked pages with a single visible child.

use blendint_view::{
    ChangeKind, Drawable, Interactive, Layout, UpdateCtx, UpdateRequest, ViewId, ViewTree,
    container_test,
};
use kurbo::Size;
use tracing::debug;


/// Every child fills the content rectangle; only the active one is visible.
///
/// Switching pages only toggles visibility, so rectangles never change when
/// the active index does.
///
/// ```
/// use blendint_layout::StackLayout;
/// use blendint_view::{Empty, ViewNode, ViewTree};
///
/// let mut tree = ViewTree::new();
/// let stack = tree.insert(None, ViewNode::sized(100.0, 50.0), StackLayout::default());
/// let a = tree.insert(Some(stack), ViewNode::sized(1.0, 1.0), Empty);
/// let b = tree.insert(Some(stack), ViewNode::sized(1.0, 1.0), Empty);
/// assert!(tree.is_visible(a) && !tree.is_visible(b));
///
/// assert!(StackLayout::set_active(&mut tree, stack, 1));
/// assert!(!tree.is_visible(a) && tree.is_visible(b));
/// assert_eq!(tree.local_rect(a), tree.local_rect(b));
/// ```
#[derive(Clone, Debug, Default)]
pub struct StackLayout {
    active: usize,
}

impl StackLayout {
    /// A stack showing its first child.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the visible child.
    pub fn active(&self) -> usize {
        self.active
    }

    /// Show child `index` of the stack `id` and hide the previously active one.
    ///
    /// Returns `false` if `id` is not a stack or `index` is out of range.
    pub fn set_active(tree: &mut ViewTree, id: ViewId, index: usize) -> bool {
        tree.update_view::<Self, _>(id, |s, cx| {
            let children = cx.children();
            if index >= children.len() {
                debug!(stack = ?cx.id(), index, "stack index out of range");
                return false;
            }
            if let Some(&old) = children.get(s.active)
                && s.active != index
            {
                cx.set_child_visible(old, false);
            }
            s.active = index;
            cx.set_child_visible(children[index], true);
            true
        })
        .unwrap_or(false)
    }

    fn fill(&mut self, cx: &mut UpdateCtx<'_>) {
        let children = cx.children();
        if children.is_empty() {
            self.active = 0;
            return;
        }
        self.active = self.active.min(children.len() - 1);
        let content = cx.content_rect();
        for (i, child) in children.into_iter().enumerate() {
            cx.set_child_geometry(child, content);
            cx.set_child_visible(child, i == self.active);
        }
    }
}

impl Layout for StackLayout {
    fn update_test(&self, _: &ViewTree, _: ViewId, request: &UpdateRequest) -> bool {
        // Pages are shown and hidden by the stack alone.
        container_test(request) && request.kind() != ChangeKind::Visibility
    }

    fn perform_update(&mut self, cx: &mut UpdateCtx<'_>, request: &UpdateRequest) {
        if request.change.affects_children() {
            self.fill(cx);
        }
    }

    fn children_changed(&mut self, cx: &mut UpdateCtx<'_>) {
        self.fill(cx);
    }

    fn preferred_size(&self, tree: &ViewTree, me: ViewId) -> Size {
        let margin = tree.margin(me).unwrap_or_default();
        let inner = tree
            .children_of(me)
            .iter()
            .map(|c| tree.preferred_size(*c))
            .fold(Size::ZERO, |acc, p| {
                Size::new(acc.width.max(p.width), acc.height.max(p.height))
            });
        Size::new(
            inner.width + margin.horizontal(),
            inner.height + margin.vertical(),
        )
    }

    fn is_expand_x(&self, tree: &ViewTree, me: ViewId) -> bool {
        crate::own_expand_x(tree, me) || tree.children_of(me).iter().any(|c| tree.is_expand_x(*c))
    }

    fn is_expand_y(&self, tree: &ViewTree, me: ViewId) -> bool {
        crate::own_expand_y(tree, me) || tree.children_of(me).iter().any(|c| tree.is_expand_y(*c))
    }
}

impl Interactive for StackLayout {}
impl Drawable for StackLayout {}

#[cfg(test)]
mod tests {
    use super::*;
    use blendint_view::{Empty, Margin, ViewNode};
    use kurbo::Rect;

    #[test]
    fn pages_fill_content_and_switching_keeps_rects() {
        let mut tree = ViewTree::new();
        let stack = tree.insert(
            None,
            ViewNode::sized(100.0, 60.0).with_margin(Margin::uniform(5.0)),
            StackLayout::new(),
        );
        let pages: alloc::vec::Vec<_> = (0..3)
            .map(|_| tree.insert(Some(stack), ViewNode::sized(10.0, 10.0), Empty))
            .collect();
        for p in &pages {
            assert_eq!(tree.local_rect(*p), Some(Rect::new(5.0, 5.0, 95.0, 55.0)));
        }
        assert!(StackLayout::set_active(&mut tree, stack, 2));
        assert_eq!(tree.view::<StackLayout>(stack).map(StackLayout::active), Some(2));
        assert!(!tree.is_visible(pages[0]));
        assert!(tree.is_visible(pages[2]));
        assert!(!StackLayout::set_active(&mut tree, stack, 3));
        for p in &pages {
            assert_eq!(tree.local_rect(*p), Some(Rect::new(5.0, 5.0, 95.0, 55.0)));
        }
    }

    #[test]
    fn children_cannot_show_themselves() {
        let mut tree = ViewTree::new();
        let stack = tree.insert(None, ViewNode::sized(10.0, 10.0), StackLayout::new());
        let _a = tree.insert(Some(stack), ViewNode::sized(1.0, 1.0), Empty);
        let b = tree.insert(Some(stack), ViewNode::sized(1.0, 1.0), Empty);
        assert!(!tree.set_visible(b, true));
        assert!(!tree.is_visible(b));
    }

    #[test]
    fn removing_the_active_page_clamps_index() {
        let mut tree = ViewTree::new();
        let stack = tree.insert(None, ViewNode::sized(10.0, 10.0), StackLayout::new());
        let a = tree.insert(Some(stack), ViewNode::sized(1.0, 1.0), Empty);
        let b = tree.insert(Some(stack), ViewNode::sized(1.0, 1.0), Empty);
        assert!(StackLayout::set_active(&mut tree, stack, 1));
        let _ = tree.remove(b);
        assert!(tree.is_visible(a));
        assert_eq!(tree.view::<StackLayout>(stack).map(StackLayout::active), Some(0));
    }

    #[test]
    fn preferred_size_is_the_largest_page() {
        let mut tree = ViewTree::new();
        let stack = tree.insert(None, ViewNode::sized(0.0, 0.0), StackLayout::new());
        let _ = tree.insert(Some(stack), ViewNode::sized(30.0, 5.0), Empty);
        let _ = tree.insert(Some(stack), ViewNode::sized(10.0, 25.0), Empty);
        assert_eq!(tree.preferred_size(stack), Size::new(30.0, 25.0));
    }
}
