// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Push button.

use alloc::string::String;
use blendint_view::{
    DrawInfo, Drawable, EventCtx, Font, Interactive, KeyCode, KeyEvent, Layout, Margin,
    MouseButton, MouseEvent, Phase, RenderingServices, Response, RoundType, Signal, StyleRole,
    TextMeasure, ViewFlags, ViewId, ViewNode, ViewTree,
};
use kurbo::{Point, RoundedRect, Size};

/// Horizontal and vertical padding around the text.
const PADDING: Margin = Margin::new(8.0, 8.0, 3.0, 3.0);

/// A focusable push button with a text caption.
///
/// Emits [`Button::clicked`] when a press and its release resolve to a click,
/// or when Enter is pressed while focused.
#[derive(Debug)]
pub struct Button {
    text: String,
    font: Font,
    text_size: Size,
    hovered: bool,
    pressed: bool,
    clicked: Signal<()>,
    body: Option<RoundedRect>,
}

impl Button {
    /// A button showing `text`, measured with `measure`.
    pub fn new(text: impl Into<String>, measure: &dyn TextMeasure, font: Font) -> Self {
        let text = text.into();
        let text_size = measure.measure(&text, &font);
        Self {
            text,
            font,
            text_size,
            hovered: false,
            pressed: false,
            clicked: Signal::new(),
            body: None,
        }
    }

    /// A focusable node sized to fit the caption.
    pub fn node(&self) -> ViewNode {
        let size = self.content_size();
        let mut node = ViewNode::sized(size.width, size.height)
            .with_flags(ViewFlags::default() | ViewFlags::FOCUSABLE);
        node.round_type = RoundType::ALL;
        node.round_radius = 4.0;
        node
    }

    /// The signal fired on every click.
    pub fn clicked(&self) -> &Signal<()> {
        &self.clicked
    }

    /// The caption.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the cursor is over the button.
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Whether the button is held down.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Replace the caption of button `id` and let its container re-lay out.
    pub fn set_text(
        tree: &mut ViewTree,
        id: ViewId,
        text: impl Into<String>,
        measure: &dyn TextMeasure,
    ) -> bool {
        let Some(button) = tree.view_mut::<Self>(id) else {
            return false;
        };
        button.text = text.into();
        button.text_size = measure.measure(&button.text, &button.font);
        tree.preferred_size_changed(id);
        tree.request_redraw(id);
        true
    }

    fn content_size(&self) -> Size {
        Size::new(
            self.text_size.width + PADDING.horizontal(),
            self.text_size.height + PADDING.vertical(),
        )
    }

    fn role(&self) -> StyleRole {
        if self.pressed {
            StyleRole::InnerSelected
        } else if self.hovered {
            StyleRole::InnerHovered
        } else {
            StyleRole::Inner
        }
    }
}

impl Layout for Button {
    fn preferred_size(&self, tree: &ViewTree, me: ViewId) -> Size {
        let margin = tree.margin(me).unwrap_or_default();
        let s = self.content_size();
        Size::new(s.width + margin.horizontal(), s.height + margin.vertical())
    }
}

impl Interactive for Button {
    fn hover_in(&mut self, cx: &mut EventCtx<'_>) {
        self.hovered = true;
        cx.request_redraw();
    }

    fn hover_out(&mut self, cx: &mut EventCtx<'_>) {
        self.hovered = false;
        cx.request_redraw();
    }

    fn mouse_press(&mut self, cx: &mut EventCtx<'_>, event: &MouseEvent) -> Response {
        if cx.phase() != Phase::Target || event.button != Some(MouseButton::Left) {
            return Response::Ignore;
        }
        self.pressed = true;
        cx.request_redraw();
        Response::Finish
    }

    fn mouse_release(&mut self, cx: &mut EventCtx<'_>, _: &MouseEvent) -> Response {
        if !self.pressed {
            return Response::Ignore;
        }
        self.pressed = false;
        cx.request_redraw();
        Response::Finish
    }

    fn click(&mut self, _: &mut EventCtx<'_>, _: &MouseEvent) {
        self.clicked.emit(&());
    }

    fn key_press(&mut self, cx: &mut EventCtx<'_>, event: &KeyEvent) -> Response {
        if cx.phase() == Phase::Target && event.key == KeyCode::ENTER {
            self.clicked.emit(&());
            return Response::Finish;
        }
        Response::Ignore
    }
}

impl Drawable for Button {
    fn regenerate_draw_data(&mut self, info: &DrawInfo, _: &mut dyn RenderingServices) {
        self.body = Some(info.local_rounded_rect());
    }

    fn draw(&self, info: &DrawInfo, services: &mut dyn RenderingServices) {
        if let Some(body) = self.body {
            let shape = body + info.rect.origin().to_vec2();
            services.fill_rounded_rect(shape, self.role());
            services.stroke_rounded_rect(shape, StyleRole::Outline);
        }
        let content = info.content_rect();
        let origin = Point::new(
            content.center().x - self.text_size.width * 0.5,
            content.center().y - self.text_size.height * 0.5,
        );
        services.text(origin, &self.text, StyleRole::Text);
    }
}
