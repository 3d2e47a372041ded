// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! BlendInt Widgets: stock views for the BlendInt view tree.
//!
//! - [`Frame`]: a top-level container. Docked frames tile the window,
//!   floating frames sit above them and can be dragged.
//! - [`Button`]: a focusable push button with a [`clicked`](Button::clicked) signal.
//! - [`Label`]: one line of static text.
//! - [`Slider`]: a horizontal value slider with a
//!   [`value_changed`](Slider::value_changed) signal.
//!
//! Widgets keep their state in the view behaviour and their geometry in the
//! [`ViewTree`](blendint_view::ViewTree). Operations that need both, such as
//! [`Label::set_text`], are associated functions taking the tree and an id.
//!
//! ```
//! use blendint_view::{Font, MonospaceMeasure, ViewTree};
//! use blendint_widgets::{Frame, Label};
//!
//! let mut tree = ViewTree::new();
//! let frame = tree.insert(None, Frame::docked(200.0, 100.0), Frame::new());
//! let label = Label::new("Hello", &MonospaceMeasure::default(), Font::default());
//! let node = label.node();
//! let id = tree.insert(Some(frame), node, label);
//!
//! // The frame's content fills it.
//! assert_eq!(tree.size(id).map(|s| (s.width, s.height)), Some((200.0, 100.0)));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod button;
mod frame;
mod label;
mod slider;

pub use button::Button;
pub use frame::Frame;
pub use label::Label;
pub use slider::Slider;
