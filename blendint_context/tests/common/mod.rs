// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![allow(dead_code, reason = "Each test binary uses a subset of the helpers.")]

use std::cell::RefCell;
use std::rc::Rc;

use blendint_view::{
    Drawable, EventCtx, Interactive, KeyEvent, Layout, MouseEvent, Phase, Response, UpdateCtx,
    UpdateRequest, ViewFlags, ViewNode,
};

pub(crate) type Log = Rc<RefCell<Vec<String>>>;

pub(crate) fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// Take the recorded entries, leaving the log empty.
pub(crate) fn drain(log: &Log) -> Vec<String> {
    std::mem::take(&mut *log.borrow_mut())
}

/// A view that records every hook it receives as `"<name> <hook>"`.
#[derive(Debug)]
pub(crate) struct Recorder {
    pub(crate) name: &'static str,
    pub(crate) log: Log,
    /// Finish presses and releases at the target, capturing the pointer.
    pub(crate) grab: bool,
    /// Finish key presses at the target or while bubbling.
    pub(crate) eat_keys: bool,
    /// Stretch the first child over the content rectangle, like a frame.
    pub(crate) fill: bool,
}

impl Recorder {
    pub(crate) fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: log.clone(),
            grab: false,
            eat_keys: false,
            fill: false,
        }
    }

    pub(crate) fn grabbing(mut self) -> Self {
        self.grab = true;
        self
    }

    pub(crate) fn eating_keys(mut self) -> Self {
        self.eat_keys = true;
        self
    }

    pub(crate) fn filling(mut self) -> Self {
        self.fill = true;
        self
    }

    fn record(&self, what: impl std::fmt::Display) {
        self.log.borrow_mut().push(format!("{} {what}", self.name));
    }
}

pub(crate) fn focusable(width: f64, height: f64) -> ViewNode {
    ViewNode::sized(width, height).with_flags(ViewFlags::FOCUSABLE)
}

impl Layout for Recorder {
    fn perform_update(&mut self, cx: &mut UpdateCtx<'_>, request: &UpdateRequest) {
        self.record(format_args!("perform {:?}", request.kind()));
        if self.fill
            && request.change.affects_children()
            && let Some(&child) = cx.children().first()
        {
            let rect = cx.content_rect();
            cx.set_child_geometry(child, rect);
        }
    }

    fn children_changed(&mut self, cx: &mut UpdateCtx<'_>) {
        if self.fill
            && let Some(&child) = cx.children().first()
        {
            let rect = cx.content_rect();
            cx.set_child_geometry(child, rect);
        }
    }
}

impl Interactive for Recorder {
    fn hover_in(&mut self, _: &mut EventCtx<'_>) {
        self.record("hover_in");
    }

    fn hover_out(&mut self, _: &mut EventCtx<'_>) {
        self.record("hover_out");
    }

    fn focus_on(&mut self, _: &mut EventCtx<'_>) {
        self.record("focus_on");
    }

    fn focus_off(&mut self, _: &mut EventCtx<'_>) {
        self.record("focus_off");
    }

    fn mouse_move(&mut self, cx: &mut EventCtx<'_>, _: &MouseEvent) -> Response {
        if cx.phase() == Phase::Target {
            self.record("move");
        }
        Response::Ignore
    }

    fn mouse_press(&mut self, cx: &mut EventCtx<'_>, _: &MouseEvent) -> Response {
        self.record(format_args!("press {:?}", cx.phase()));
        if self.grab && cx.phase() == Phase::Target {
            Response::Finish
        } else {
            Response::Ignore
        }
    }

    fn mouse_release(&mut self, cx: &mut EventCtx<'_>, _: &MouseEvent) -> Response {
        self.record(format_args!("release {:?}", cx.phase()));
        if self.grab && cx.phase() == Phase::Target {
            Response::Finish
        } else {
            Response::Ignore
        }
    }

    fn click(&mut self, _: &mut EventCtx<'_>, _: &MouseEvent) {
        self.record("click");
    }

    fn key_press(&mut self, cx: &mut EventCtx<'_>, _: &KeyEvent) -> Response {
        self.record(format_args!("key {:?}", cx.phase()));
        if self.eat_keys && cx.phase() != Phase::Capture {
            Response::Finish
        } else {
            Response::Ignore
        }
    }

    fn text_input(&mut self, cx: &mut EventCtx<'_>, ch: char) -> Response {
        if cx.phase() != Phase::Target {
            return Response::Ignore;
        }
        self.record(format_args!("text {ch}"));
        Response::Finish
    }

    fn context_menu_press(&mut self, cx: &mut EventCtx<'_>, _: &MouseEvent) -> Response {
        self.record(format_args!("menu {:?}", cx.phase()));
        if cx.phase() == Phase::Target {
            Response::Finish
        } else {
            Response::Ignore
        }
    }
}

impl Drawable for Recorder {}
