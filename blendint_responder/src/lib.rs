// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! BlendInt Responder: deterministic, `no_std` event routing for view trees.
//!
//! ## Overview
//!
//! This crate builds the responder chain sequence (capture → target → bubble)
//! from pre-resolved hits. It does not perform hit testing; feed it
//! [`ResolvedHit`](crate::types::ResolvedHit) values and it emits a
//! deterministic propagation sequence you can dispatch.
//!
//! ## Workflow
//!
//! 1) Pick candidates, for example one per top-level frame under the cursor,
//!    each with a root → target path and a stacking depth.
//! 2) Route: [`Router`](crate::router::Router) selects exactly one target,
//!    nearest depth first and last candidate on ties, and emits its sequence.
//!    Pointer capture overrides selection until released.
//! 3) Dispatch: [`dispatcher::run`] visits the sequence until a handler
//!    returns [`Response::Finish`](crate::types::Response::Finish).
//! 4) Hover: derive the path with [`path_from_dispatch`](crate::hover::path_from_dispatch)
//!    and feed it to [`HoverState`](crate::hover::HoverState), which reports
//!    leaves (inner → outer) before enters (outer → inner).
//!
//! ## Focus
//!
//! Focus routing is separate from pointer routing.
//! Use [`Router::dispatch_for`](router::Router::dispatch_for) to emit a
//! sequence for the focused node and [`FocusState`](crate::focus::FocusState)
//! to compute `Off`/`On` transitions when focus moves.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod dispatcher;
pub mod focus;
pub mod hover;
pub mod router;
pub mod types;
