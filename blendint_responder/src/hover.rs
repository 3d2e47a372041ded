// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover transitions between consecutive root → target paths.
//!
//! [`HoverState`] keeps the currently hovered chain. Feeding it a new chain
//! returns the transition: every node that left the chain (innermost first)
//! followed by every node that joined it (outermost first). Membership is by
//! identity, so the result is exactly the symmetric difference of the two
//! chains and leaves always precede enters.
//!
//! ```
//! use blendint_responder::hover::{HoverEvent, HoverState};
//!
//! let mut hover = HoverState::new();
//! assert_eq!(
//!     hover.update_path(&[1, 2, 3]).as_slice(),
//!     &[HoverEvent::Enter(1), HoverEvent::Enter(2), HoverEvent::Enter(3)]
//! );
//! assert_eq!(
//!     hover.update_path(&[1, 4]).as_slice(),
//!     &[HoverEvent::Leave(3), HoverEvent::Leave(2), HoverEvent::Enter(4)]
//! );
//! ```

use smallvec::SmallVec;

use crate::types::{Dispatch, Phase};

/// A hover transition for one node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HoverEvent<K> {
    /// The cursor entered the node.
    Enter(K),
    /// The cursor left the node.
    Leave(K),
}

/// Transitions produced by one hover update.
pub type HoverTransition<K> = SmallVec<[HoverEvent<K>; 8]>;

/// The currently hovered chain, outermost first.
#[derive(Clone, Debug)]
pub struct HoverState<K> {
    current: SmallVec<[K; 8]>,
}

impl<K> Default for HoverState<K> {
    fn default() -> Self {
        Self {
            current: SmallVec::new(),
        }
    }
}

impl<K: Copy + Eq> HoverState<K> {
    /// Create an empty hover state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The hovered chain, outermost first.
    pub fn current_path(&self) -> &[K] {
        &self.current
    }

    /// The innermost hovered node.
    pub fn innermost(&self) -> Option<K> {
        self.current.last().copied()
    }

    /// Returns `true` if `node` is in the hovered chain.
    pub fn contains(&self, node: K) -> bool {
        self.current.contains(&node)
    }

    /// Replace the hovered chain and return the transition.
    pub fn update_path(&mut self, new_path: &[K]) -> HoverTransition<K> {
        let mut out = HoverTransition::new();
        for &old in self.current.iter().rev() {
            if !new_path.contains(&old) {
                out.push(HoverEvent::Leave(old));
            }
        }
        for &new in new_path {
            if !self.current.contains(&new) {
                out.push(HoverEvent::Enter(new));
            }
        }
        self.current.clear();
        self.current.extend_from_slice(new_path);
        out
    }

    /// Leave every hovered node, innermost first.
    pub fn clear(&mut self) -> HoverTransition<K> {
        self.update_path(&[])
    }

    /// Drop nodes for which `keep` returns `false` without emitting transitions.
    ///
    /// Used to purge destroyed or detached nodes; they must not receive a
    /// leave notification.
    pub fn retain(&mut self, mut keep: impl FnMut(K) -> bool) -> bool {
        let before = self.current.len();
        self.current.retain(|k| keep(*k));
        before != self.current.len()
    }
}

/// Extract the root → target path (inclusive) from a dispatch sequence.
pub fn path_from_dispatch<K: Copy>(seq: &[Dispatch<K>]) -> SmallVec<[K; 8]> {
    seq.iter()
        .take_while(|d| d.phase != Phase::Bubble)
        .map(|d| d.node)
        .collect()
}
