// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static text.

use alloc::string::String;
use blendint_view::{
    DrawInfo, Drawable, Font, Interactive, Layout, RenderingServices, StyleRole, TextMeasure,
    ViewFlags, ViewId, ViewNode, ViewTree,
};
use kurbo::{Point, Size};

/// One line of text, left-aligned and vertically centred in its content rectangle.
#[derive(Clone, Debug)]
pub struct Label {
    text: String,
    font: Font,
    text_size: Size,
}

impl Label {
    /// A label showing `text`, measured with `measure`.
    pub fn new(text: impl Into<String>, measure: &dyn TextMeasure, font: Font) -> Self {
        let text = text.into();
        let text_size = measure.measure(&text, &font);
        Self {
            text,
            font,
            text_size,
        }
    }

    /// A non-pickable node sized to the text.
    pub fn node(&self) -> ViewNode {
        let mut node = ViewNode::sized(self.text_size.width, self.text_size.height);
        node.flags.remove(ViewFlags::PICKABLE);
        node
    }

    /// The text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text of label `id`.
    ///
    /// The label's container is told its preferred size changed.
    pub fn set_text(
        tree: &mut ViewTree,
        id: ViewId,
        text: impl Into<String>,
        measure: &dyn TextMeasure,
    ) -> bool {
        let Some(label) = tree.view_mut::<Self>(id) else {
            return false;
        };
        label.text = text.into();
        label.text_size = measure.measure(&label.text, &label.font);
        tree.preferred_size_changed(id);
        tree.request_redraw(id);
        true
    }
}

impl Layout for Label {
    fn preferred_size(&self, tree: &ViewTree, me: ViewId) -> Size {
        let margin = tree.margin(me).unwrap_or_default();
        Size::new(
            self.text_size.width + margin.horizontal(),
            self.text_size.height + margin.vertical(),
        )
    }
}

impl Interactive for Label {}

impl Drawable for Label {
    fn draw(&self, info: &DrawInfo, services: &mut dyn RenderingServices) {
        let content = info.content_rect();
        let y = content.center().y - self.text_size.height * 0.5;
        services.text(Point::new(content.x0, y), &self.text, StyleRole::Text);
    }
}
