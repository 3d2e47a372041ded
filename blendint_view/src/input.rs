// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input snapshots delivered to views.

use kurbo::Point;

/// Mouse button.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Secondary button; opens context menus.
    Right,
    /// Wheel button.
    Middle,
    /// Any other button, by platform code.
    Other(u8),
}

impl MouseButton {
    /// A stable numeric code for keyed bookkeeping.
    pub fn code(self) -> u8 {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Middle => 2,
            Self::Other(n) => n.saturating_add(3),
        }
    }
}

/// What the mouse did.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MouseAction {
    /// Cursor moved.
    Move,
    /// Button went down.
    Press,
    /// Button went up.
    Release,
}

/// Key state change.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Key went down.
    Press,
    /// Key went up.
    Release,
    /// Auto-repeat while held.
    Repeat,
}

bitflags::bitflags! {
    /// Active keyboard modifiers.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT   = 0b0001;
        /// Control.
        const CONTROL = 0b0010;
        /// Alt / Option.
        const ALT     = 0b0100;
        /// Super / Command.
        const SUPER   = 0b1000;
    }
}

/// Platform key code as produced by the windowing glue.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyCode(pub u32);

impl KeyCode {
    /// Escape.
    pub const ESCAPE: Self = Self(256);
    /// Enter / Return.
    pub const ENTER: Self = Self(257);
    /// Tab.
    pub const TAB: Self = Self(258);
    /// Backspace.
    pub const BACKSPACE: Self = Self(259);
    /// Right arrow.
    pub const RIGHT: Self = Self(262);
    /// Left arrow.
    pub const LEFT: Self = Self(263);
    /// Down arrow.
    pub const DOWN: Self = Self(264);
    /// Up arrow.
    pub const UP: Self = Self(265);
}

/// A mouse event, in window coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MouseEvent {
    /// Cursor position, window space, origin bottom-left.
    pub position: Point,
    /// The button involved; `None` for plain moves.
    pub button: Option<MouseButton>,
    /// What happened.
    pub action: MouseAction,
    /// Modifiers held at the time.
    pub modifiers: Modifiers,
}

impl MouseEvent {
    /// A cursor move to `position`.
    pub fn moved(position: Point) -> Self {
        Self {
            position,
            button: None,
            action: MouseAction::Move,
            modifiers: Modifiers::empty(),
        }
    }
}

/// A keyboard event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// Platform key code.
    pub key: KeyCode,
    /// Hardware scancode.
    pub scancode: i32,
    /// Press, release or repeat.
    pub action: KeyAction,
    /// Modifiers held at the time.
    pub modifiers: Modifiers,
}
