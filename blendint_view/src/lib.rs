// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! BlendInt View: a Kurbo-native view tree with a geometry update protocol.
//!
//! A [`ViewTree`] owns a hierarchy of views. Each view has plain geometry
//! (position, size, margin, rounded corners, visibility, z order, flags) held
//! by the tree, plus a boxed [`View`] behaviour that reacts to geometry
//! changes, input and drawing.
//!
//! ## Coordinates
//!
//! The tree is y-up: a view's origin is its bottom-left corner and positions
//! are relative to the parent's origin. A view's world origin is the sum of
//! the positions along its ancestor chain.
//!
//! ## Geometry update protocol
//!
//! Geometry never changes behind a view's back. The entry points
//! ([`ViewTree::resize`], [`ViewTree::set_position`], [`ViewTree::set_margin`],
//! [`ViewTree::set_round_type`], [`ViewTree::set_round_radius`],
//! [`ViewTree::set_visible`]) run a test → commit → report cycle described in
//! [`update`]. Containers implement [`Layout`] to veto changes from their
//! children and to position children from
//! [`perform_update`](Layout::perform_update).
//!
//! ## Lifetime and identity
//!
//! [`ViewId`] is generational: once a view is removed its id is stale and
//! every API treats it as absent. [`ViewTree::on_destroyed`] fires for each
//! removed view before teardown so that external state (hover, focus,
//! capture) can be purged.
//!
//! ## Example
//!
//! ```rust
//! use blendint_view::{Empty, Margin, ViewNode, ViewTree};
//! use kurbo::{Point, Rect, Size};
//!
//! let mut tree = ViewTree::new();
//! let root = tree.insert(None, ViewNode::sized(200.0, 100.0), Empty);
//! let child = tree.insert(Some(root), ViewNode::sized(50.0, 20.0).at(10.0, 10.0), Empty);
//!
//! assert!(tree.resize(child, Size::new(60.0, 20.0)));
//! // Redundant requests are dropped.
//! assert!(!tree.resize(child, Size::new(60.0, 20.0)));
//! assert!(tree.set_margin(root, Margin::uniform(4.0)));
//!
//! let damage = tree.commit();
//! assert!(damage.union_rect().is_some());
//! assert_eq!(tree.world_bounds(child), Some(Rect::new(10.0, 10.0, 70.0, 30.0)));
//! assert_eq!(
//!     tree.hit_test_from(root, Point::new(20.0, 15.0), Default::default()).map(|h| h.node),
//!     Some(child)
//! );
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod damage;
mod event;
mod input;
mod render;
mod request;
mod signal;
mod tree;
mod types;
pub mod update;
mod view;

pub use damage::Damage;
pub use event::{Deferred, EventCtx};
pub use input::{KeyAction, KeyCode, KeyEvent, Modifiers, MouseAction, MouseButton, MouseEvent};
pub use render::{
    DisplayList, DrawCommand, DrawInfo, Font, MonospaceMeasure, RenderingServices, StyleRole,
    TextMeasure,
};
pub use request::{ChangeKind, GeometryChange, UpdateRequest};
pub use signal::{Signal, Subscription};
pub use tree::{BindError, Hit, QueryFilter, ViewTree};
pub use types::{Margin, RoundType, ViewFlags, ViewId, ViewNode};
pub use update::UpdateCtx;
pub use view::{Drawable, Empty, Interactive, Layout, View, container_test};

pub use blendint_responder::types::{Phase, Response};
