// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher helper: walk a dispatch sequence and honor finish responses.
//!
//! - [`Response::Finish`] aborts propagation immediately (no target or bubble
//!   entries if raised in capture).
//! - [`Response::Ignore`] moves on to the next entry.
//! - The return value reports where propagation stopped, if it did.
//!
//! ```
//! use blendint_responder::dispatcher;
//! use blendint_responder::types::{Dispatch, Phase, Response};
//!
//! let seq = vec![
//!     Dispatch::capture(1_u32),
//!     Dispatch::target(2),
//!     Dispatch::bubble(1),
//! ];
//!
//! let mut seen = Vec::new();
//! let stop_at = dispatcher::run(&seq, &mut seen, |d, seen| {
//!     seen.push((d.phase, d.node));
//!     if d.phase == Phase::Target { Response::Finish } else { Response::Ignore }
//! });
//!
//! assert_eq!(stop_at, Some(&Dispatch::target(2)));
//! assert_eq!(seen, vec![(Phase::Capture, 1), (Phase::Target, 2)]);
//! ```

use crate::types::{Dispatch, Response};

/// Run a handler over a dispatch sequence and honor finish responses.
///
/// Returns `None` if the full sequence was visited, or `Some(d)` with the
/// entry whose handler returned [`Response::Finish`].
pub fn run<'a, K, E>(
    seq: &'a [Dispatch<K>],
    event: &mut E,
    mut handler: impl FnMut(&Dispatch<K>, &mut E) -> Response,
) -> Option<&'a Dispatch<K>> {
    for d in seq {
        if handler(d, event).is_finished() {
            return Some(d);
        }
    }
    None
}
