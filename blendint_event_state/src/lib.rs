// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! BlendInt Event State: small state machines that sit between raw input and
//! view routing.
//!
//! - [`click`]: pairs presses with releases and decides whether a release is a
//!   click, tolerating views that move under the cursor during the press.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod click;
