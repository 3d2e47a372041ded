// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! BlendInt Context: the window-level entry point of a BlendInt UI.
//!
//! [`Context`] owns a [`ViewTree`](blendint_view::ViewTree) whose root is sized
//! to the window and whose children are top-level frames. The windowing glue
//! drives it through plain synchronous calls:
//!
//! - [`Context::on_resize`] resizes the root through the geometry update
//!   protocol, which re-lays out every frame.
//! - [`Context::on_cursor_move`] updates the hovered chain (leaves before
//!   enters) and routes the move.
//! - [`Context::on_mouse_button`] moves focus on press (off before on) before
//!   the press is delivered; the view that finishes a press captures the
//!   pointer until the release.
//! - [`Context::on_key`] and [`Context::on_text_input`] go to the focused
//!   widget, or the focused frame when no widget has focus.
//!
//! Delivery uses the responder sequence from `blendint_responder`: capture
//! from the frame down, then the target, then bubble back up, stopping at the
//! first view that returns [`Response::Finish`](blendint_view::Response::Finish).
//! Handlers only see the tree read-only; what they ask for is applied once the
//! sequence is done.
//!
//! ## Example
//!
//! ```
//! use blendint_context::Context;
//! use blendint_view::{Empty, MouseAction, MouseButton, Modifiers, ViewFlags, ViewNode};
//!
//! let mut cx = Context::new(300.0, 200.0);
//! let frame = cx.add_frame(ViewNode::default().with_flags(ViewFlags::FOCUSABLE), Empty);
//! let widget = cx.tree_mut().insert(
//!     Some(frame),
//!     ViewNode::sized(40.0, 20.0).at(10.0, 10.0).with_flags(ViewFlags::FOCUSABLE),
//!     Empty,
//! );
//!
//! cx.on_cursor_move(20.0, 20.0);
//! assert_eq!(cx.hovered(), &[frame, widget]);
//!
//! cx.on_mouse_button(MouseButton::Left, MouseAction::Press, Modifiers::empty());
//! assert_eq!(cx.focused_widget(), Some(widget));
//!
//! // Destroying a view clears every reference to it.
//! assert!(cx.destroy(widget));
//! assert_eq!(cx.focused_widget(), None);
//! assert_eq!(cx.hovered(), &[frame]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod context;
mod root;

pub use config::ContextConfig;
pub use context::Context;
