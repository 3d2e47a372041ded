// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-slot focus tracking.
//!
//! [`FocusState`] holds at most one focused node and reports the transition
//! when it changes: the old node loses focus before the new node gains it.

use smallvec::SmallVec;

/// A focus transition for one node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FocusEvent<K> {
    /// The node lost focus.
    Off(K),
    /// The node gained focus.
    On(K),
}

/// Focus slot.
///
/// ```
/// use blendint_responder::focus::{FocusEvent, FocusState};
///
/// let mut focus = FocusState::new();
/// assert_eq!(focus.set(Some(1)).as_slice(), &[FocusEvent::On(1)]);
/// assert_eq!(focus.set(Some(2)).as_slice(), &[FocusEvent::Off(1), FocusEvent::On(2)]);
/// assert!(focus.set(Some(2)).is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct FocusState<K> {
    focused: Option<K>,
}

impl<K> Default for FocusState<K> {
    fn default() -> Self {
        Self { focused: None }
    }
}

impl<K: Copy + Eq> FocusState<K> {
    /// Create an empty focus slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// The focused node.
    pub fn focused(&self) -> Option<K> {
        self.focused
    }

    /// Move focus to `node` and return the transition, `Off` before `On`.
    pub fn set(&mut self, node: Option<K>) -> SmallVec<[FocusEvent<K>; 2]> {
        let mut out = SmallVec::new();
        if self.focused == node {
            return out;
        }
        if let Some(old) = self.focused {
            out.push(FocusEvent::Off(old));
        }
        if let Some(new) = node {
            out.push(FocusEvent::On(new));
        }
        self.focused = node;
        out
    }

    /// Clear the slot without a transition if `stale` returns `true` for the
    /// focused node.
    pub fn purge_if(&mut self, stale: impl FnOnce(K) -> bool) -> bool {
        match self.focused {
            Some(k) if stale(k) => {
                self.focused = None;
                true
            }
            _ => false,
        }
    }
}
