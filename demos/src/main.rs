// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless BlendInt walkthrough.
//!
//! Builds a window with two docked frames and one floating frame, feeds it a
//! scripted sequence of pointer and keyboard input, and logs what each step
//! did to focus, hover and the widgets.
//!
//! Run:
//! - `cargo run -p blendint_demos`
//! - `RUST_LOG=blendint_view=trace cargo run -p blendint_demos` to also see
//!   every geometry request.

mod logging;

use std::cell::Cell;
use std::rc::Rc;

use blendint_context::Context;
use blendint_layout::{LinearLayout, Orientation, TableLayout};
use blendint_view::{
    DisplayList, Font, KeyAction, KeyCode, Modifiers, MonospaceMeasure, MouseAction, MouseButton,
    ViewId, ViewNode,
};
use blendint_widgets::{Button, Frame, Label, Slider};
use kurbo::Point;
use tracing::{info, warn};

const WINDOW: (f64, f64) = (640.0, 360.0);

/// Ids of the views the script pokes at.
struct Scene {
    settings: ViewId,
    slider: ViewId,
    reset: ViewId,
    palette: ViewId,
    reset_requested: Rc<Cell<bool>>,
}

fn build(cx: &mut Context) -> Scene {
    let measure = MonospaceMeasure::default();
    let font = Font::default();

    // Left: a column of controls.
    let settings = cx.add_frame(Frame::docked(0.0, 0.0), Frame::new());
    let column = cx.tree_mut().insert(
        Some(settings),
        ViewNode::default(),
        LinearLayout::new(Orientation::Vertical).with_space(6.0),
    );
    let title = Label::new("Volume", &measure, font);
    let node = title.node();
    let _ = cx.tree_mut().insert(Some(column), node, title);
    let slider = cx
        .tree_mut()
        .insert(Some(column), Slider::node(200.0, 16.0), Slider::new(0.0, 10.0));
    let reset = Button::new("Reset", &measure, font);
    let reset_requested = Rc::new(Cell::new(false));
    let flag = reset_requested.clone();
    let _ = reset.clicked().connect(move |()| flag.set(true));
    let node = reset.node();
    let reset = cx.tree_mut().insert(Some(column), node, reset);

    // Right: a 2x2 grid of buttons.
    let tools = cx.add_frame(Frame::docked(0.0, 0.0), Frame::new());
    let grid = cx.tree_mut().insert(
        Some(tools),
        ViewNode::default(),
        TableLayout::new(2, 2).with_space(4.0),
    );
    for name in ["Cut", "Copy", "Paste", "Undo"] {
        let button = Button::new(name, &measure, font);
        let _ = button.clicked().connect(move |()| info!(button = name, "clicked"));
        let node = button.node();
        let _ = cx.tree_mut().insert(Some(grid), node, button);
    }

    // A floating palette over both.
    let palette = cx.add_frame(Frame::floating(240.0, 120.0, 160.0, 90.0), Frame::new());
    let hint = Label::new("Drag me", &measure, font);
    let node = hint.node();
    let _ = cx.tree_mut().insert(Some(palette), node, hint);

    Scene {
        settings,
        slider,
        reset,
        palette,
        reset_requested,
    }
}

fn center(cx: &Context, id: ViewId) -> Point {
    cx.tree()
        .world_bounds(id)
        .map_or(Point::ZERO, |r| r.center())
}

fn move_to(cx: &mut Context, p: Point) {
    cx.on_cursor_move(p.x, p.y);
}

fn click_at(cx: &mut Context, p: Point) {
    move_to(cx, p);
    cx.on_mouse_button(MouseButton::Left, MouseAction::Press, Modifiers::empty());
    cx.on_mouse_button(MouseButton::Left, MouseAction::Release, Modifiers::empty());
}

fn press_key(cx: &mut Context, key: KeyCode) {
    cx.on_key(key, 0, KeyAction::Press, Modifiers::empty());
    cx.on_key(key, 0, KeyAction::Release, Modifiers::empty());
}

fn slider_value(cx: &Context, id: ViewId) -> f64 {
    cx.tree().view::<Slider>(id).map_or(f64::NAN, Slider::value)
}

fn report(cx: &mut Context, step: &str) {
    let damage = cx.needs_redraw();
    info!(
        step,
        focused_frame = ?cx.focused_frame(),
        focused_widget = ?cx.focused_widget(),
        hovered = ?cx.hovered(),
        ?damage,
        "state",
    );
}

fn main() {
    if let Err(err) = logging::init_logging() {
        eprintln!("unable to install log subscriber: {err}");
    }

    let mut cx = Context::new(WINDOW.0, WINDOW.1);
    let scene = build(&mut cx);
    report(&mut cx, "built");

    // Drag the slider thumb from the middle to the right end.
    let s = center(&cx, scene.slider);
    move_to(&mut cx, s);
    cx.on_mouse_button(MouseButton::Left, MouseAction::Press, Modifiers::empty());
    move_to(&mut cx, Point::new(s.x + 500.0, s.y));
    cx.on_mouse_button(MouseButton::Left, MouseAction::Release, Modifiers::empty());
    info!(value = slider_value(&cx, scene.slider), "slider dragged");
    report(&mut cx, "slider");

    // The focused slider steps with the arrow keys.
    press_key(&mut cx, KeyCode::LEFT);
    press_key(&mut cx, KeyCode::LEFT);
    info!(value = slider_value(&cx, scene.slider), "slider stepped");

    // Reset through the button.
    let reset_center = center(&cx, scene.reset);
    click_at(&mut cx, reset_center);
    if scene.reset_requested.take() {
        let _ = Slider::set_value(cx.tree_mut(), scene.slider, 0.0);
    }
    info!(value = slider_value(&cx, scene.slider), "slider reset");
    report(&mut cx, "reset");

    // Drag the palette far past the window corner; it stays inside.
    let grab = center(&cx, scene.palette);
    move_to(&mut cx, grab);
    cx.on_mouse_button(MouseButton::Left, MouseAction::Press, Modifiers::empty());
    move_to(&mut cx, Point::new(grab.x + 1000.0, grab.y + 1000.0));
    cx.on_mouse_button(MouseButton::Left, MouseAction::Release, Modifiers::empty());
    info!(rect = ?cx.tree().local_rect(scene.palette), "palette dragged");

    // Shrink the window; every frame is laid out again.
    cx.on_resize(480.0, 240.0);
    info!(
        settings = ?cx.tree().local_rect(scene.settings),
        palette = ?cx.tree().local_rect(scene.palette),
        "resized",
    );
    report(&mut cx, "resize");

    let mut list = DisplayList::new();
    cx.draw(&mut list);
    let texts: Vec<&str> = list.texts().collect();
    info!(commands = list.commands.len(), ?texts, "drawn");

    if !cx.destroy(scene.palette) {
        warn!("palette was already gone");
    }
    report(&mut cx, "palette closed");
}
