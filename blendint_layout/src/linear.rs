// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Horizontal and vertical box layout.

use alloc::vec::Vec;
use blendint_view::{
    ChangeKind, Drawable, Interactive, Layout, UpdateCtx, UpdateRequest, ViewId, ViewTree,
    container_test,
};
use kurbo::{Rect, Size};

use crate::track::Tracks;
use crate::{Alignment, Orientation, visible_children};

/// Places visible children one after another along an axis.
///
/// Along the main axis each child gets its preferred extent. Slack goes to
/// children that want to expand, in equal shares, or else is distributed by
/// the main-axis alignment; when space is short every child shrinks in
/// proportion to its preferred extent. Across the axis, expanding children fill
/// the content rectangle and the others keep their preferred extent, placed by
/// the cross alignment.
///
/// Vertical layouts run top to bottom, horizontal layouts left to right.
///
/// ```
/// use blendint_layout::{Alignment, LinearLayout, Orientation};
/// use blendint_view::{Empty, ViewNode, ViewTree};
/// use kurbo::Rect;
///
/// let mut tree = ViewTree::new();
/// let col = tree.insert(
///     None,
///     ViewNode::sized(200.0, 200.0),
///     LinearLayout::new(Orientation::Vertical)
///         .with_alignment(Alignment::TOP)
///         .with_space(10.0),
/// );
/// let a = tree.insert(Some(col), ViewNode::sized(200.0, 80.0), Empty);
/// let b = tree.insert(Some(col), ViewNode::sized(200.0, 80.0), Empty);
///
/// assert_eq!(tree.local_rect(a), Some(Rect::new(0.0, 120.0, 200.0, 200.0)));
/// assert_eq!(tree.local_rect(b), Some(Rect::new(0.0, 30.0, 200.0, 110.0)));
/// ```
#[derive(Clone, Debug)]
pub struct LinearLayout {
    /// Main axis.
    pub orientation: Orientation,
    /// Placement of slack and of children narrower than the cross axis.
    pub alignment: Alignment,
    /// Gap between adjacent children.
    pub space: f64,
}

impl Default for LinearLayout {
    fn default() -> Self {
        Self::new(Orientation::Horizontal)
    }
}

impl LinearLayout {
    /// A centred layout along `orientation` with a 2 px gap.
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            alignment: Alignment::CENTER,
            space: 2.0,
        }
    }

    /// Builder-style alignment.
    #[must_use]
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Builder-style spacing.
    #[must_use]
    pub fn with_space(mut self, space: f64) -> Self {
        self.space = space;
        self
    }

    /// Change the gap of the layout `id` and re-lay it out.
    pub fn set_space(tree: &mut ViewTree, id: ViewId, space: f64) -> bool {
        Self::reconfigure(tree, id, |l| l.space = space)
    }

    /// Change the alignment of the layout `id` and re-lay it out.
    pub fn set_alignment(tree: &mut ViewTree, id: ViewId, alignment: Alignment) -> bool {
        Self::reconfigure(tree, id, |l| l.alignment = alignment)
    }

    /// Change the orientation of the layout `id` and re-lay it out.
    pub fn set_orientation(tree: &mut ViewTree, id: ViewId, orientation: Orientation) -> bool {
        Self::reconfigure(tree, id, |l| l.orientation = orientation)
    }

    fn reconfigure(tree: &mut ViewTree, id: ViewId, f: impl FnOnce(&mut Self)) -> bool {
        tree.update_view::<Self, _>(id, |l, cx| {
            f(l);
            l.layout(cx);
        })
        .is_some()
    }

    /// Recompute every visible child's rectangle.
    pub fn layout(&self, cx: &mut UpdateCtx<'_>) {
        let children = cx.visible_children();
        if children.is_empty() {
            return;
        }
        let content = cx.content_rect();
        let vertical = self.orientation == Orientation::Vertical;
        let prefs: Vec<Size> = children.iter().map(|c| cx.preferred_size(*c)).collect();
        let main_expand: Vec<bool> = children
            .iter()
            .map(|c| {
                if vertical {
                    cx.is_expand_y(*c)
                } else {
                    cx.is_expand_x(*c)
                }
            })
            .collect();

        let (available, cross_available) = if vertical {
            (content.height(), content.width())
        } else {
            (content.width(), content.height())
        };
        let mut tracks = Tracks::from_extents(
            prefs
                .iter()
                .map(|p| if vertical { p.height } else { p.width }),
            self.space,
        );
        let slack = tracks.fit(available, &main_expand);
        let lead = if vertical {
            self.alignment.vertical_share(slack)
        } else {
            self.alignment.horizontal_share(slack)
        };

        for (i, child) in children.iter().enumerate() {
            let extent = tracks.extent_at(i);
            let offset = lead + tracks.offset_at(i);
            let rect = if vertical {
                let w = if cx.is_expand_x(*child) {
                    cross_available
                } else {
                    prefs[i].width.min(cross_available)
                };
                let x0 = content.x0 + self.alignment.horizontal_share(cross_available - w);
                let y1 = content.y1 - offset;
                Rect::new(x0, y1 - extent, x0 + w, y1)
            } else {
                let h = if cx.is_expand_y(*child) {
                    cross_available
                } else {
                    prefs[i].height.min(cross_available)
                };
                let y0 = content.y1 - h - self.alignment.vertical_share(cross_available - h);
                let x0 = content.x0 + offset;
                Rect::new(x0, y0, x0 + extent, y0 + h)
            };
            cx.set_child_geometry(*child, rect);
        }
    }
}

impl Layout for LinearLayout {
    fn update_test(&self, _: &ViewTree, _: ViewId, request: &UpdateRequest) -> bool {
        container_test(request)
    }

    fn perform_update(&mut self, cx: &mut UpdateCtx<'_>, request: &UpdateRequest) {
        if request.change.affects_children() {
            self.layout(cx);
        }
    }

    fn report_update(&mut self, cx: &mut UpdateCtx<'_>, request: &UpdateRequest) {
        if matches!(request.kind(), ChangeKind::Visibility | ChangeKind::Margin) {
            self.layout(cx);
        }
    }

    fn children_changed(&mut self, cx: &mut UpdateCtx<'_>) {
        self.layout(cx);
    }

    fn preferred_size(&self, tree: &ViewTree, me: ViewId) -> Size {
        let margin = tree.margin(me).unwrap_or_default();
        let mut main = 0.0_f64;
        let mut cross = 0.0_f64;
        let mut count = 0_usize;
        for child in visible_children(tree, me) {
            let p = tree.preferred_size(child);
            let (m, c) = match self.orientation {
                Orientation::Horizontal => (p.width, p.height),
                Orientation::Vertical => (p.height, p.width),
            };
            main += m;
            cross = cross.max(c);
            count += 1;
        }
        #[allow(
            clippy::cast_precision_loss,
            reason = "Child counts are far below f64 precision limits."
        )]
        let gaps = count.saturating_sub(1) as f64 * self.space;
        main += gaps;
        match self.orientation {
            Orientation::Horizontal => {
                Size::new(main + margin.horizontal(), cross + margin.vertical())
            }
            Orientation::Vertical => {
                Size::new(cross + margin.horizontal(), main + margin.vertical())
            }
        }
    }

    fn is_expand_x(&self, tree: &ViewTree, me: ViewId) -> bool {
        crate::own_expand_x(tree, me) || visible_children(tree, me).any(|c| tree.is_expand_x(c))
    }

    fn is_expand_y(&self, tree: &ViewTree, me: ViewId) -> bool {
        crate::own_expand_y(tree, me) || visible_children(tree, me).any(|c| tree.is_expand_y(c))
    }
}

impl Interactive for LinearLayout {}
impl Drawable for LinearLayout {}

#[cfg(test)]
mod tests {
    use super::*;
    use blendint_view::{Empty, Margin, ViewFlags, ViewNode};
    use kurbo::Point;

    fn column(tree: &mut ViewTree, alignment: Alignment) -> ViewId {
        tree.insert(
            None,
            ViewNode::sized(200.0, 200.0),
            LinearLayout::new(Orientation::Vertical)
                .with_alignment(alignment)
                .with_space(10.0),
        )
    }

    #[test]
    fn top_alignment_leaves_slack_at_the_bottom() {
        let mut tree = ViewTree::new();
        let col = column(&mut tree, Alignment::TOP);
        let a = tree.insert(Some(col), ViewNode::sized(200.0, 80.0), Empty);
        let b = tree.insert(Some(col), ViewNode::sized(200.0, 80.0), Empty);
        assert_eq!(tree.local_rect(a), Some(Rect::new(0.0, 120.0, 200.0, 200.0)));
        assert_eq!(tree.local_rect(b), Some(Rect::new(0.0, 30.0, 200.0, 110.0)));
    }

    #[test]
    fn expanding_child_takes_the_slack() {
        let mut tree = ViewTree::new();
        let col = column(&mut tree, Alignment::TOP);
        let a = tree.insert(Some(col), ViewNode::sized(200.0, 80.0), Empty);
        let b = tree.insert(
            Some(col),
            ViewNode::sized(200.0, 80.0).with_flags(ViewFlags::default() | ViewFlags::EXPAND_Y),
            Empty,
        );
        assert_eq!(tree.local_rect(a), Some(Rect::new(0.0, 120.0, 200.0, 200.0)));
        assert_eq!(tree.local_rect(b), Some(Rect::new(0.0, 0.0, 200.0, 110.0)));
    }

    #[test]
    fn bottom_alignment_puts_slack_on_top() {
        let mut tree = ViewTree::new();
        let col = column(&mut tree, Alignment::BOTTOM);
        let a = tree.insert(Some(col), ViewNode::sized(100.0, 80.0), Empty);
        let b = tree.insert(Some(col), ViewNode::sized(100.0, 80.0), Empty);
        assert_eq!(tree.local_rect(a), Some(Rect::new(50.0, 90.0, 150.0, 170.0)));
        assert_eq!(tree.local_rect(b), Some(Rect::new(50.0, 0.0, 150.0, 80.0)));
    }

    #[test]
    fn horizontal_runs_left_to_right_inside_margin() {
        let mut tree = ViewTree::new();
        let row = tree.insert(
            None,
            ViewNode::sized(100.0, 40.0).with_margin(Margin::uniform(5.0)),
            LinearLayout::new(Orientation::Horizontal)
                .with_alignment(Alignment::LEFT | Alignment::TOP)
                .with_space(2.0),
        );
        let a = tree.insert(Some(row), ViewNode::sized(20.0, 10.0), Empty);
        let b = tree.insert(Some(row), ViewNode::sized(30.0, 10.0), Empty);
        assert_eq!(tree.local_rect(a), Some(Rect::new(5.0, 25.0, 25.0, 35.0)));
        assert_eq!(tree.local_rect(b), Some(Rect::new(27.0, 25.0, 57.0, 35.0)));
    }

    #[test]
    fn shrinks_proportionally_when_short() {
        let mut tree = ViewTree::new();
        let row = tree.insert(
            None,
            ViewNode::sized(110.0, 10.0),
            LinearLayout::new(Orientation::Horizontal).with_space(10.0),
        );
        let a = tree.insert(Some(row), ViewNode::sized(100.0, 10.0), Empty);
        let b = tree.insert(Some(row), ViewNode::sized(100.0, 10.0), Empty);
        assert_eq!(tree.size(a), Some(Size::new(50.0, 10.0)));
        assert_eq!(tree.local_rect(b), Some(Rect::new(60.0, 0.0, 110.0, 10.0)));

        // Preferred sizes are untouched, so growing back restores them.
        assert!(tree.resize(row, Size::new(300.0, 10.0)));
        assert_eq!(tree.size(a), Some(Size::new(100.0, 10.0)));
    }

    #[test]
    fn hidden_children_are_skipped_and_relayout_on_show() {
        let mut tree = ViewTree::new();
        let col = column(&mut tree, Alignment::TOP);
        let a = tree.insert(Some(col), ViewNode::sized(200.0, 80.0), Empty);
        let b = tree.insert(Some(col), ViewNode::sized(200.0, 80.0), Empty);
        assert!(tree.set_visible(a, false));
        assert_eq!(tree.position(b), Some(Point::new(0.0, 120.0)));
        assert!(tree.set_visible(a, true));
        assert_eq!(tree.position(b), Some(Point::new(0.0, 30.0)));
    }

    #[test]
    fn vetoes_manual_child_geometry() {
        let mut tree = ViewTree::new();
        let col = column(&mut tree, Alignment::TOP);
        let a = tree.insert(Some(col), ViewNode::sized(200.0, 80.0), Empty);
        assert!(!tree.resize(a, Size::new(10.0, 10.0)));
        assert!(!tree.set_position(a, Point::new(3.0, 3.0)));
        assert!(tree.set_margin(a, Margin::uniform(1.0)));
    }

    #[test]
    fn margin_change_relayouts_and_move_translates() {
        let mut tree = ViewTree::new();
        let col = column(&mut tree, Alignment::TOP);
        let a = tree.insert(Some(col), ViewNode::sized(200.0, 80.0), Empty);
        let before = tree.world_bounds(a).unwrap();

        assert!(tree.set_position(col, Point::new(7.0, 9.0)));
        let moved = tree.world_bounds(a).unwrap();
        assert_eq!(moved, before + kurbo::Vec2::new(7.0, 9.0));
        assert_eq!(moved.size(), before.size());

        assert!(tree.set_margin(col, Margin::uniform(10.0)));
        assert_eq!(tree.local_rect(a), Some(Rect::new(10.0, 110.0, 190.0, 190.0)));
    }

    #[test]
    fn preferred_size_sums_main_axis() {
        let mut tree = ViewTree::new();
        let col = tree.insert(
            None,
            ViewNode::sized(0.0, 0.0).with_margin(Margin::uniform(1.0)),
            LinearLayout::new(Orientation::Vertical).with_space(4.0),
        );
        let _ = tree.insert(Some(col), ViewNode::sized(30.0, 10.0), Empty);
        let _ = tree.insert(Some(col), ViewNode::sized(50.0, 20.0), Empty);
        assert_eq!(tree.preferred_size(col), Size::new(52.0, 36.0));
    }

    #[test]
    fn set_space_relayouts() {
        let mut tree = ViewTree::new();
        let col = column(&mut tree, Alignment::TOP);
        let _ = tree.insert(Some(col), ViewNode::sized(200.0, 80.0), Empty);
        let b = tree.insert(Some(col), ViewNode::sized(200.0, 80.0), Empty);
        assert!(LinearLayout::set_space(&mut tree, col, 0.0));
        assert_eq!(tree.position(b), Some(Point::new(0.0, 40.0)));
    }
}
