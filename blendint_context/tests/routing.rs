// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event routing through a [`Context`]: hover chains, focus transfer, pointer
//! capture, keyboard routing and the purge of destroyed views.

mod common;

use std::cell::Cell;
use std::rc::Rc;

use blendint_context::Context;
use blendint_view::{
    Drawable, Empty, EventCtx, Font, Interactive, KeyAction, KeyCode, Layout, Modifiers,
    MonospaceMeasure, MouseAction, MouseButton, MouseEvent, Response, ViewFlags, ViewNode,
};
use blendint_widgets::{Button, Frame};
use common::{Recorder, drain, focusable, log};
use kurbo::Point;

fn press(cx: &mut Context, button: MouseButton) {
    cx.on_mouse_button(button, MouseAction::Press, Modifiers::empty());
}

fn release(cx: &mut Context, button: MouseButton) {
    cx.on_mouse_button(button, MouseAction::Release, Modifiers::empty());
}

fn key(cx: &mut Context, key: KeyCode) {
    cx.on_key(key, 0, KeyAction::Press, Modifiers::empty());
}

#[test]
fn hover_transitions_are_the_symmetric_difference_leaves_first() {
    let log = log();
    let mut cx = Context::new(200.0, 100.0);
    let frame = cx.add_frame(ViewNode::default(), Recorder::new("F", &log));
    let tree = cx.tree_mut();
    let a = tree.insert(
        Some(frame),
        ViewNode::sized(40.0, 40.0).at(10.0, 10.0),
        Recorder::new("a", &log),
    );
    let a1 = tree.insert(
        Some(a),
        ViewNode::sized(10.0, 10.0).at(5.0, 5.0),
        Recorder::new("a1", &log),
    );
    let b = tree.insert(
        Some(frame),
        ViewNode::sized(40.0, 40.0).at(100.0, 10.0),
        Recorder::new("b", &log),
    );

    cx.on_cursor_move(12.0, 12.0);
    assert_eq!(cx.hovered(), &[frame, a]);
    assert_eq!(drain(&log), ["F hover_in", "a hover_in", "a move"]);

    cx.on_cursor_move(20.0, 20.0);
    assert_eq!(cx.hovered(), &[frame, a, a1]);
    assert_eq!(drain(&log), ["a1 hover_in", "a1 move"]);

    // Sibling switch: every leave precedes every enter.
    cx.on_cursor_move(110.0, 20.0);
    assert_eq!(cx.hovered(), &[frame, b]);
    assert_eq!(
        drain(&log),
        ["a1 hover_out", "a hover_out", "b hover_in", "b move"]
    );

    // Moving within the same view changes nothing but the move itself.
    cx.on_cursor_move(111.0, 21.0);
    assert_eq!(drain(&log), ["b move"]);

    cx.on_cursor_move(500.0, 500.0);
    assert!(cx.hovered().is_empty());
    assert_eq!(drain(&log), ["b hover_out", "F hover_out"]);
}

#[test]
fn press_transfers_focus_off_before_on_and_before_delivery() {
    let log = log();
    let mut cx = Context::new(200.0, 100.0);
    let fa = cx.add_frame(focusable(0.0, 0.0), Recorder::new("A", &log));
    let fb = cx.add_frame(focusable(0.0, 0.0), Recorder::new("B", &log));
    let a = cx
        .tree_mut()
        .insert(Some(fa), focusable(20.0, 20.0).at(10.0, 10.0), Recorder::new("a", &log));
    let b = cx
        .tree_mut()
        .insert(Some(fb), focusable(20.0, 20.0).at(10.0, 10.0), Recorder::new("b", &log));

    cx.on_cursor_move(15.0, 15.0);
    let _ = drain(&log);
    press(&mut cx, MouseButton::Left);
    assert_eq!(
        drain(&log),
        [
            "A focus_on",
            "a focus_on",
            "A press Capture",
            "a press Target",
            "A press Bubble",
        ]
    );
    assert_eq!((cx.focused_frame(), cx.focused_widget()), (Some(fa), Some(a)));

    release(&mut cx, MouseButton::Left);
    assert_eq!(
        drain(&log),
        [
            "A release Capture",
            "a release Target",
            "A release Bubble",
            "a click",
        ]
    );

    cx.on_cursor_move(115.0, 15.0);
    let _ = drain(&log);
    press(&mut cx, MouseButton::Left);
    assert_eq!(
        drain(&log),
        [
            "a focus_off",
            "A focus_off",
            "B focus_on",
            "b focus_on",
            "B press Capture",
            "b press Target",
            "B press Bubble",
        ]
    );
    assert_eq!((cx.focused_frame(), cx.focused_widget()), (Some(fb), Some(b)));
    assert_eq!(cx.active_frame(), Some(fb));
}

#[test]
fn pressing_a_frame_background_keeps_its_focused_widget() {
    let log = log();
    let mut cx = Context::new(100.0, 100.0);
    let frame = cx.add_frame(focusable(0.0, 0.0), Recorder::new("F", &log));
    let w = cx
        .tree_mut()
        .insert(Some(frame), focusable(20.0, 20.0).at(10.0, 10.0), Recorder::new("w", &log));
    cx.on_cursor_move(15.0, 15.0);
    press(&mut cx, MouseButton::Left);
    release(&mut cx, MouseButton::Left);

    cx.on_cursor_move(80.0, 80.0);
    let _ = drain(&log);
    press(&mut cx, MouseButton::Left);
    assert_eq!(cx.focused_widget(), Some(w));
    assert_eq!(drain(&log), ["F press Target"]);
}

#[test]
fn capture_survives_leaving_the_bounds() {
    let log = log();
    let mut cx = Context::new(200.0, 100.0);
    let frame = cx.add_frame(ViewNode::default(), Recorder::new("F", &log));
    let w = cx.tree_mut().insert(
        Some(frame),
        ViewNode::sized(20.0, 20.0).at(10.0, 10.0),
        Recorder::new("w", &log).grabbing(),
    );

    cx.on_cursor_move(15.0, 15.0);
    let _ = drain(&log);
    press(&mut cx, MouseButton::Left);
    assert_eq!(drain(&log), ["F press Capture", "w press Target"]);
    assert_eq!(cx.captured(), Some(w));

    // Leaving the bounds is a real hover change; the move still goes to `w`.
    cx.on_cursor_move(100.0, 80.0);
    assert_eq!(cx.hovered(), &[frame]);
    assert_eq!(drain(&log), ["w hover_out", "w move"]);

    release(&mut cx, MouseButton::Left);
    assert_eq!(drain(&log), ["F release Capture", "w release Target"]);
    assert_eq!(cx.captured(), None);

    // Without capture the next move goes to whatever is under the cursor.
    cx.on_cursor_move(101.0, 80.0);
    assert_eq!(drain(&log), ["F move"]);
}

#[test]
fn a_second_button_neither_ends_nor_steals_the_capture() {
    let log = log();
    let mut cx = Context::new(200.0, 100.0);
    let frame = cx.add_frame(ViewNode::default(), Recorder::new("F", &log));
    let w = cx.tree_mut().insert(
        Some(frame),
        ViewNode::sized(20.0, 20.0).at(10.0, 10.0),
        Recorder::new("w", &log).grabbing(),
    );

    cx.on_cursor_move(15.0, 15.0);
    press(&mut cx, MouseButton::Left);
    cx.on_cursor_move(100.0, 80.0);
    let _ = drain(&log);

    // The middle button acts on what is under the cursor.
    press(&mut cx, MouseButton::Middle);
    assert_eq!(drain(&log), ["F press Target"]);
    assert_eq!(cx.captured(), Some(w));
    release(&mut cx, MouseButton::Middle);
    assert_eq!(drain(&log), ["F release Target", "F click"]);
    assert_eq!(cx.captured(), Some(w));

    // Moves still follow the capture.
    cx.on_cursor_move(101.0, 80.0);
    assert_eq!(drain(&log), ["w move"]);

    release(&mut cx, MouseButton::Left);
    assert_eq!(drain(&log), ["F release Capture", "w release Target"]);
    assert_eq!(cx.captured(), None);
}

#[test]
fn a_right_press_during_a_capture_keeps_focus() {
    let log = log();
    let mut cx = Context::new(200.0, 100.0);
    let fa = cx.add_frame(focusable(0.0, 0.0), Recorder::new("A", &log));
    let fb = cx.add_frame(focusable(0.0, 0.0), Recorder::new("B", &log));
    let a = cx.tree_mut().insert(
        Some(fa),
        focusable(20.0, 20.0).at(10.0, 10.0),
        Recorder::new("a", &log).grabbing(),
    );
    let _b = cx
        .tree_mut()
        .insert(Some(fb), focusable(20.0, 20.0).at(10.0, 10.0), Recorder::new("b", &log));

    cx.on_cursor_move(15.0, 15.0);
    press(&mut cx, MouseButton::Left);
    assert_eq!(cx.captured(), Some(a));
    assert_eq!((cx.focused_frame(), cx.focused_widget()), (Some(fa), Some(a)));

    cx.on_cursor_move(115.0, 15.0);
    let _ = drain(&log);
    press(&mut cx, MouseButton::Right);
    // The menu opens on the focused widget; nothing gains or loses focus.
    assert_eq!(drain(&log), ["A menu Capture", "a menu Target"]);
    assert_eq!((cx.focused_frame(), cx.focused_widget()), (Some(fa), Some(a)));
    assert_eq!(cx.captured(), Some(a));

    release(&mut cx, MouseButton::Left);
    assert_eq!(cx.captured(), None);
    assert_eq!((cx.focused_frame(), cx.focused_widget()), (Some(fa), Some(a)));
}

#[test]
fn a_release_near_the_press_still_clicks() {
    let log = log();
    let mut cx = Context::new(200.0, 100.0);
    let frame = cx.add_frame(ViewNode::default(), Recorder::new("F", &log));
    let _w = cx.tree_mut().insert(
        Some(frame),
        ViewNode::sized(20.0, 20.0).at(10.0, 10.0),
        Recorder::new("w", &log),
    );
    cx.set_time(1_000);
    cx.on_cursor_move(29.0, 15.0);
    press(&mut cx, MouseButton::Left);
    // Two pixels to the right is outside `w` but within the click distance.
    cx.on_cursor_move(31.0, 15.0);
    cx.set_time(1_100);
    let _ = drain(&log);
    release(&mut cx, MouseButton::Left);
    assert_eq!(drain(&log), ["F release Target", "w click"]);
}

#[test]
fn destroyed_views_leave_no_trace() {
    let log = log();
    let mut cx = Context::new(100.0, 100.0);
    let frame = cx.add_frame(focusable(0.0, 0.0), Recorder::new("F", &log));
    let w = cx.tree_mut().insert(
        Some(frame),
        focusable(20.0, 20.0).at(10.0, 10.0),
        Recorder::new("w", &log).grabbing(),
    );
    cx.on_cursor_move(15.0, 15.0);
    press(&mut cx, MouseButton::Left);
    assert_eq!(cx.focused_widget(), Some(w));
    assert_eq!(cx.captured(), Some(w));
    assert_eq!(cx.hovered(), &[frame, w]);

    assert!(cx.destroy(w));
    assert_eq!(cx.focused_widget(), None);
    assert_eq!(cx.captured(), None);
    assert_eq!(cx.hovered(), &[frame]);
    assert_eq!(cx.focused_frame(), Some(frame));

    let _ = drain(&log);
    key(&mut cx, KeyCode::ENTER);
    cx.on_cursor_move(16.0, 16.0);
    release(&mut cx, MouseButton::Left);
    assert_eq!(
        drain(&log),
        ["F key Target", "F move", "F release Target"]
    );
    assert!(!cx.destroy(w));
}

#[test]
fn views_removed_behind_the_context_are_purged_at_the_next_event() {
    let log = log();
    let mut cx = Context::new(100.0, 100.0);
    let frame = cx.add_frame(focusable(0.0, 0.0), Recorder::new("F", &log));
    cx.on_cursor_move(50.0, 50.0);
    press(&mut cx, MouseButton::Left);
    assert_eq!(cx.focused_frame(), Some(frame));

    let removed = cx.tree_mut().remove(frame);
    assert_eq!(removed, [frame]);
    let _ = drain(&log);
    key(&mut cx, KeyCode::ENTER);
    cx.on_text_input('q');
    assert!(drain(&log).is_empty());
    assert_eq!(cx.focused_frame(), None);
    assert_eq!(cx.active_frame(), None);
    assert!(cx.hovered().is_empty());
}

/// Destroys itself when pressed.
#[derive(Debug, Default)]
struct SelfDestruct;

impl Layout for SelfDestruct {}
impl Drawable for SelfDestruct {}
impl Interactive for SelfDestruct {
    fn mouse_press(&mut self, cx: &mut EventCtx<'_>, _: &MouseEvent) -> Response {
        cx.request_destroy(cx.id());
        Response::Finish
    }
}

#[test]
fn a_view_destroying_itself_from_a_handler_is_never_captured() {
    let mut cx = Context::new(100.0, 100.0);
    let frame = cx.add_frame(ViewNode::default(), Empty);
    let doomed = cx.tree_mut().insert(
        Some(frame),
        ViewNode::sized(20.0, 20.0).with_flags(ViewFlags::FOCUSABLE),
        SelfDestruct,
    );
    cx.on_cursor_move(5.0, 5.0);
    press(&mut cx, MouseButton::Left);
    assert!(!cx.tree().is_alive(doomed));
    assert_eq!(cx.captured(), None);
    assert_eq!(cx.focused_widget(), None);
    assert_eq!(cx.hovered(), &[frame]);
    release(&mut cx, MouseButton::Left);
}

#[test]
fn keys_go_to_the_focused_widget_then_bubble_to_its_frame() {
    let log = log();
    let mut cx = Context::new(100.0, 100.0);

    // Nobody focused: dropped.
    key(&mut cx, KeyCode::TAB);
    assert!(drain(&log).is_empty());

    let frame = cx.add_frame(focusable(0.0, 0.0), Recorder::new("F", &log).eating_keys());
    let w = cx
        .tree_mut()
        .insert(Some(frame), focusable(10.0, 10.0), Recorder::new("w", &log));
    assert!(cx.set_focus(w));
    let _ = drain(&log);

    key(&mut cx, KeyCode::TAB);
    assert_eq!(drain(&log), ["F key Capture", "w key Target", "F key Bubble"]);

    cx.on_text_input('z');
    assert_eq!(drain(&log), ["w text z"]);

    cx.clear_focus();
    assert_eq!(drain(&log), ["w focus_off"]);
    key(&mut cx, KeyCode::TAB);
    assert_eq!(drain(&log), ["F key Target"]);
}

#[test]
fn right_press_focuses_then_opens_the_context_menu() {
    let log = log();
    let mut cx = Context::new(100.0, 100.0);
    let frame = cx.add_frame(focusable(0.0, 0.0), Recorder::new("F", &log));
    let _w = cx
        .tree_mut()
        .insert(Some(frame), focusable(20.0, 20.0), Recorder::new("w", &log));
    cx.on_cursor_move(5.0, 5.0);
    let _ = drain(&log);
    press(&mut cx, MouseButton::Right);
    assert_eq!(
        drain(&log),
        ["F focus_on", "w focus_on", "F menu Capture", "w menu Target"]
    );
    assert_eq!(cx.captured(), None);
}

#[test]
fn buttons_click_from_the_pointer_and_the_keyboard() {
    let measure = MonospaceMeasure::default();
    let mut cx = Context::new(200.0, 100.0);
    let frame = cx.add_frame(Frame::docked(0.0, 0.0), Frame::new());
    let _content = cx
        .tree_mut()
        .insert(Some(frame), ViewNode::default(), Empty);
    let button = Button::new("OK", &measure, Font::default());
    let clicks = Rc::new(Cell::new(0));
    let sink = clicks.clone();
    let _ = button.clicked().connect(move |()| sink.set(sink.get() + 1));
    let node = button.node().at(10.0, 10.0);
    let id = cx.tree_mut().insert(Some(frame), node, button);

    cx.on_cursor_move(15.0, 15.0);
    press(&mut cx, MouseButton::Left);
    assert_eq!(cx.captured(), Some(id));
    assert!(cx.tree().view::<Button>(id).is_some_and(Button::is_pressed));
    release(&mut cx, MouseButton::Left);
    assert_eq!(clicks.get(), 1);
    assert_eq!(cx.focused_widget(), Some(id));

    // Dragging off before releasing cancels the click.
    press(&mut cx, MouseButton::Left);
    cx.on_cursor_move(150.0, 90.0);
    release(&mut cx, MouseButton::Left);
    assert_eq!(clicks.get(), 1);
    assert!(cx.tree().view::<Button>(id).is_some_and(|b| !b.is_pressed()));

    key(&mut cx, KeyCode::ENTER);
    assert_eq!(clicks.get(), 2);
}

#[test]
fn floating_frames_win_hits_raise_on_press_and_drag() {
    let mut cx = Context::new(400.0, 300.0);
    let docked = cx.add_frame(Frame::docked(0.0, 0.0), Frame::new());
    let f1 = cx.add_frame(Frame::floating(50.0, 50.0, 100.0, 100.0), Frame::new());
    let f2 = cx.add_frame(Frame::floating(100.0, 100.0, 100.0, 100.0), Frame::new());

    cx.on_cursor_move(120.0, 120.0);
    assert_eq!(cx.hovered(), &[f2]);
    cx.on_cursor_move(10.0, 10.0);
    assert_eq!(cx.hovered(), &[docked]);

    // Pressing the lower floating frame raises it and starts a drag.
    cx.on_cursor_move(60.0, 60.0);
    press(&mut cx, MouseButton::Left);
    assert_eq!(cx.tree().children_of(cx.root()), &[docked, f2, f1]);
    assert_eq!(cx.captured(), Some(f1));
    assert_eq!(cx.focused_frame(), Some(f1));

    cx.on_cursor_move(80.0, 70.0);
    assert_eq!(cx.tree().position(f1), Some(Point::new(70.0, 60.0)));
    cx.on_cursor_move(120.0, 120.0);
    assert_eq!(cx.hovered(), &[f1]);

    // Dragging past the window edge is clamped.
    cx.on_cursor_move(2_000.0, 2_000.0);
    assert_eq!(cx.tree().position(f1), Some(Point::new(300.0, 200.0)));
    release(&mut cx, MouseButton::Left);
    assert!(cx.tree().view::<Frame>(f1).is_some_and(|f| !f.is_dragging()));

    cx.on_cursor_move(310.0, 210.0);
    assert_eq!(cx.tree().position(f1), Some(Point::new(300.0, 200.0)));
}
