// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed grid layout.

use alloc::vec;
use alloc::vec::Vec;
use blendint_view::{
    ChangeKind, Drawable, Interactive, Layout, UpdateCtx, UpdateRequest, ViewFlags, ViewId,
    ViewTree, container_test,
};
use kurbo::{Rect, Size};
use tracing::debug;

use crate::track::Tracks;

/// A grid of `rows × columns` cells.
///
/// The child at index `i` occupies cell `(i / columns, i % columns)`; children
/// beyond the last cell are left alone. Each column is as wide as its widest
/// visible child and each row as tall as its tallest, with slack shared by
/// the columns and rows that hold an expanding child. Children fill their
/// cells. Rows run top to bottom.
#[derive(Clone, Debug)]
pub struct TableLayout {
    rows: usize,
    columns: usize,
    /// Gap between adjacent rows and columns.
    pub space: f64,
}

struct Grid {
    columns: Tracks,
    rows: Tracks,
    /// `(child, row, column)` for every visible child with a cell.
    cells: Vec<(ViewId, usize, usize)>,
    expand_columns: Vec<bool>,
    expand_rows: Vec<bool>,
}

impl TableLayout {
    /// A table with the given shape and a 2 px gap.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            space: 2.0,
        }
    }

    /// Builder-style spacing.
    #[must_use]
    pub fn with_space(mut self, space: f64) -> Self {
        self.space = space;
        self
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Reshape the table `id` and re-lay it out.
    pub fn set_shape(tree: &mut ViewTree, id: ViewId, rows: usize, columns: usize) -> bool {
        tree.update_view::<Self, _>(id, |t, cx| {
            t.rows = rows;
            t.columns = columns;
            t.layout(cx);
        })
        .is_some()
    }

    fn grid(&self, tree: &ViewTree, me: ViewId) -> Grid {
        let mut widths = vec![0.0_f64; self.columns];
        let mut heights = vec![0.0_f64; self.rows];
        let mut expand_columns = vec![false; self.columns];
        let mut expand_rows = vec![false; self.rows];
        let mut cells = Vec::new();
        let capacity = self.rows.saturating_mul(self.columns);
        for (i, &child) in tree.children_of(me).iter().enumerate() {
            if i >= capacity {
                debug!(table = ?me, ?child, "child has no cell");
                break;
            }
            let visible = tree
                .flags(child)
                .is_some_and(|f| f.contains(ViewFlags::VISIBLE));
            if !visible {
                continue;
            }
            let (r, c) = (i / self.columns, i % self.columns);
            let p = tree.preferred_size(child);
            widths[c] = widths[c].max(p.width);
            heights[r] = heights[r].max(p.height);
            expand_columns[c] |= tree.is_expand_x(child);
            expand_rows[r] |= tree.is_expand_y(child);
            cells.push((child, r, c));
        }
        Grid {
            columns: Tracks::from_extents(widths, self.space),
            rows: Tracks::from_extents(heights, self.space),
            cells,
            expand_columns,
            expand_rows,
        }
    }

    /// Recompute every visible child's rectangle.
    pub fn layout(&self, cx: &mut UpdateCtx<'_>) {
        if self.rows == 0 || self.columns == 0 {
            return;
        }
        let content = cx.content_rect();
        let mut grid = self.grid(cx.tree(), cx.id());
        let _ = grid.columns.fit(content.width(), &grid.expand_columns);
        let _ = grid.rows.fit(content.height(), &grid.expand_rows);
        for &(child, r, c) in &grid.cells {
            let x0 = content.x0 + grid.columns.offset_at(c);
            let y1 = content.y1 - grid.rows.offset_at(r);
            let rect = Rect::new(
                x0,
                y1 - grid.rows.extent_at(r),
                x0 + grid.columns.extent_at(c),
                y1,
            );
            cx.set_child_geometry(child, rect);
        }
    }
}

impl Layout for TableLayout {
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
        if self.rows == 0 || self.columns == 0 {
            return Size::new(margin.horizontal(), margin.vertical());
        }
        let mut grid = self.grid(tree, me);
        Size::new(
            grid.columns.total() + margin.horizontal(),
            grid.rows.total() + margin.vertical(),
        )
    }

    fn is_expand_x(&self, tree: &ViewTree, me: ViewId) -> bool {
        crate::own_expand_x(tree, me) || self.grid(tree, me).expand_columns.contains(&true)
    }

    fn is_expand_y(&self, tree: &ViewTree, me: ViewId) -> bool {
        crate::own_expand_y(tree, me) || self.grid(tree, me).expand_rows.contains(&true)
    }
}

impl Interactive for TableLayout {}
impl Drawable for TableLayout {}
