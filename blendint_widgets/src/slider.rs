// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Horizontal value slider.

use blendint_view::{
    DrawInfo, Drawable, EventCtx, Interactive, KeyAction, KeyCode, KeyEvent, Layout, MouseButton,
    MouseEvent, Phase, RenderingServices, Response, RoundType, Signal, StyleRole, ViewFlags,
    ViewId, ViewNode, ViewTree,
};
use kurbo::{Rect, RoundedRect, Size};

/// A horizontal slider over `[min, max]`.
///
/// Pressing inside the slider jumps to the cursor and drags until release;
/// the left and right arrow keys move by `step` while focused. Every change of
/// value fires [`Slider::value_changed`].
#[derive(Debug)]
pub struct Slider {
    value: f64,
    min: f64,
    max: f64,
    step: f64,
    dragging: bool,
    value_changed: Signal<f64>,
    track: Option<RoundedRect>,
}

impl Slider {
    /// A slider over `[min, max]` starting at `min`.
    ///
    /// The bounds are swapped if given in the wrong order.
    pub fn new(min: f64, max: f64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            value: min,
            min,
            max,
            step: (max - min) / 100.0,
            dragging: false,
            value_changed: Signal::new(),
            track: None,
        }
    }

    /// Builder-style keyboard step.
    #[must_use]
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step.abs();
        self
    }

    /// A focusable node of the given size.
    pub fn node(width: f64, height: f64) -> ViewNode {
        let mut node = ViewNode::sized(width, height)
            .with_flags(ViewFlags::default() | ViewFlags::FOCUSABLE | ViewFlags::EXPAND_X);
        node.round_type = RoundType::ALL;
        node.round_radius = height * 0.5;
        node
    }

    /// Current value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Lower bound.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Whether a pointer drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// The signal fired with the new value on every change.
    pub fn value_changed(&self) -> &Signal<f64> {
        &self.value_changed
    }

    /// Set the value of slider `id`, clamped into its range.
    ///
    /// Returns `true` if the value changed.
    pub fn set_value(tree: &mut ViewTree, id: ViewId, value: f64) -> bool {
        let Some(slider) = tree.view_mut::<Self>(id) else {
            return false;
        };
        let changed = slider.assign(value);
        if changed {
            tree.request_redraw(id);
        }
        changed
    }

    /// Fraction of the range covered by the current value.
    pub fn fraction(&self) -> f64 {
        let span = self.max - self.min;
        if span > 0.0 {
            (self.value - self.min) / span
        } else {
            0.0
        }
    }

    fn assign(&mut self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        let value = value.clamp(self.min, self.max);
        if value == self.value {
            return false;
        }
        self.value = value;
        self.value_changed.emit(&value);
        true
    }

    fn follow(&mut self, cx: &mut EventCtx<'_>) {
        let width = cx.size().width;
        if width <= 0.0 {
            return;
        }
        let t = (cx.local_cursor().x / width).clamp(0.0, 1.0);
        if self.assign(self.min + t * (self.max - self.min)) {
            cx.request_redraw();
        }
    }
}

impl Layout for Slider {}

impl Interactive for Slider {
    fn mouse_press(&mut self, cx: &mut EventCtx<'_>, event: &MouseEvent) -> Response {
        if cx.phase() != Phase::Target || event.button != Some(MouseButton::Left) {
            return Response::Ignore;
        }
        self.dragging = true;
        self.follow(cx);
        Response::Finish
    }

    fn mouse_move(&mut self, cx: &mut EventCtx<'_>, _: &MouseEvent) -> Response {
        if !self.dragging {
            return Response::Ignore;
        }
        self.follow(cx);
        Response::Finish
    }

    fn mouse_release(&mut self, _: &mut EventCtx<'_>, _: &MouseEvent) -> Response {
        if core::mem::take(&mut self.dragging) {
            Response::Finish
        } else {
            Response::Ignore
        }
    }

    fn key_press(&mut self, cx: &mut EventCtx<'_>, event: &KeyEvent) -> Response {
        if cx.phase() != Phase::Target || event.action == KeyAction::Release {
            return Response::Ignore;
        }
        let delta = match event.key {
            KeyCode::LEFT => -self.step,
            KeyCode::RIGHT => self.step,
            _ => return Response::Ignore,
        };
        if self.assign(self.value + delta) {
            cx.request_redraw();
        }
        Response::Finish
    }
}

impl Drawable for Slider {
    fn regenerate_draw_data(&mut self, info: &DrawInfo, _: &mut dyn RenderingServices) {
        self.track = Some(info.local_rounded_rect());
    }

    fn draw(&self, info: &DrawInfo, services: &mut dyn RenderingServices) {
        let Some(track) = self.track else {
            return;
        };
        let offset = info.rect.origin().to_vec2();
        services.fill_rounded_rect(track + offset, StyleRole::Inner);
        let filled = Rect::from_origin_size(
            info.rect.origin(),
            Size::new(info.rect.width() * self.fraction(), info.rect.height()),
        );
        if filled.width() > 0.0 {
            services.fill_rounded_rect(
                RoundedRect::from_rect(filled, track.radii()),
                StyleRole::Item,
            );
        }
        services.stroke_rounded_rect(track + offset, StyleRole::Outline);
    }
}
