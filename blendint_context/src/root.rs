// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The window-sized view that owns the top-level frames.

use alloc::vec::Vec;
use blendint_view::{
    ChangeKind, Drawable, Interactive, Layout, UpdateCtx, UpdateRequest, ViewFlags, ViewId,
    ViewTree,
};
use kurbo::{Point, Rect};

/// Root behaviour: docked frames tile the window left to right, floating
/// frames keep their own geometry but stay inside the window.
#[derive(Clone, Debug)]
pub(crate) struct RootView {
    pub(crate) docked_fill: bool,
}

fn is_floating(tree: &ViewTree, id: ViewId) -> bool {
    tree.flags(id)
        .is_some_and(|f| f.contains(ViewFlags::FLOATING))
}

impl RootView {
    #[allow(
        clippy::cast_precision_loss,
        reason = "Frame counts are far below f64 precision limits."
    )]
    fn arrange(&self, cx: &mut UpdateCtx<'_>) {
        let (floating, docked): (Vec<ViewId>, Vec<ViewId>) = cx
            .children()
            .into_iter()
            .partition(|c| is_floating(cx.tree(), *c));
        if self.docked_fill {
            let docked: Vec<ViewId> = docked
                .into_iter()
                .filter(|c| cx.tree().is_visible(*c))
                .collect();
            let window = cx.size();
            let n = docked.len() as f64;
            for (i, frame) in docked.into_iter().enumerate() {
                let x0 = window.width * i as f64 / n;
                let x1 = window.width * (i + 1) as f64 / n;
                cx.set_child_geometry(frame, Rect::new(x0, 0.0, x1, window.height));
            }
        }
        for frame in floating {
            Self::clamp(cx, frame);
        }
    }

    /// Pull a floating frame back inside the window.
    fn clamp(cx: &mut UpdateCtx<'_>, frame: ViewId) {
        let tree = cx.tree();
        let (Some(pos), Some(size)) = (tree.position(frame), tree.size(frame)) else {
            return;
        };
        let window = cx.size();
        let x = pos.x.min(window.width - size.width).max(0.0);
        let y = pos.y.min(window.height - size.height).max(0.0);
        cx.set_child_position(frame, Point::new(x, y));
    }
}

impl Layout for RootView {
    fn update_test(&self, tree: &ViewTree, _: ViewId, request: &UpdateRequest) -> bool {
        match request.kind() {
            ChangeKind::Size | ChangeKind::Position => {
                !self.docked_fill || is_floating(tree, request.source)
            }
            _ => true,
        }
    }

    fn perform_update(&mut self, cx: &mut UpdateCtx<'_>, request: &UpdateRequest) {
        if request.change.affects_children() {
            self.arrange(cx);
        }
    }

    fn report_update(&mut self, cx: &mut UpdateCtx<'_>, request: &UpdateRequest) {
        match request.kind() {
            ChangeKind::Visibility => self.arrange(cx),
            ChangeKind::Size | ChangeKind::Position if is_floating(cx.tree(), request.source) => {
                Self::clamp(cx, request.source);
            }
            _ => {}
        }
    }

    fn children_changed(&mut self, cx: &mut UpdateCtx<'_>) {
        self.arrange(cx);
    }
}

impl Interactive for RootView {}
impl Drawable for RootView {}

#[cfg(test)]
mod tests {
    use super::*;
    use blendint_view::{Empty, ViewNode};
    use kurbo::Size;

    fn root(tree: &mut ViewTree) -> ViewId {
        tree.insert(
            None,
            ViewNode::sized(300.0, 100.0),
            RootView { docked_fill: true },
        )
    }

    fn floating(x: f64, y: f64) -> ViewNode {
        ViewNode::sized(50.0, 50.0)
            .at(x, y)
            .with_flags(ViewFlags::FRAME | ViewFlags::FLOATING)
    }

    #[test]
    fn docked_frames_tile_and_retile_on_hide() {
        let mut tree = ViewTree::new();
        let root = root(&mut tree);
        let a = tree.insert(Some(root), ViewNode::sized(1.0, 1.0), Empty);
        let b = tree.insert(Some(root), ViewNode::sized(1.0, 1.0), Empty);
        let c = tree.insert(Some(root), ViewNode::sized(1.0, 1.0), Empty);
        assert_eq!(tree.local_rect(a), Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert_eq!(tree.local_rect(c), Some(Rect::new(200.0, 0.0, 300.0, 100.0)));

        assert!(!tree.resize(b, Size::new(10.0, 10.0)));
        assert!(tree.set_visible(b, false));
        assert_eq!(tree.local_rect(c), Some(Rect::new(150.0, 0.0, 300.0, 100.0)));
    }

    #[test]
    fn floating_frames_stay_inside_the_window() {
        let mut tree = ViewTree::new();
        let root = root(&mut tree);
        let f = tree.insert(Some(root), floating(280.0, -20.0), Empty);
        assert_eq!(tree.position(f), Some(Point::new(250.0, 0.0)));

        assert!(tree.set_position(f, Point::new(100.0, 30.0)));
        assert_eq!(tree.position(f), Some(Point::new(100.0, 30.0)));
        assert!(tree.set_position(f, Point::new(-5.0, 90.0)));
        assert_eq!(tree.position(f), Some(Point::new(0.0, 50.0)));

        assert!(tree.resize(root, Size::new(120.0, 60.0)));
        assert_eq!(tree.position(f), Some(Point::new(0.0, 10.0)));
    }
}
