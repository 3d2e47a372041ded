// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types shared by the router, dispatcher, hover and focus helpers.

use alloc::vec::Vec;

/// Propagation phase of a single dispatch entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Root → parent of the target.
    Capture,
    /// The target itself.
    Target,
    /// Parent of the target → root.
    Bubble,
}

/// Result of delivering an event to one view.
///
/// `Finish` stops propagation: no later entry of the dispatch sequence is
/// visited. `Ignore` offers the event to the next entry, which for the bubble
/// phase is the parent of the current node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Response {
    /// The event was fully handled.
    Finish,
    /// Keep offering the event to the next candidate.
    #[default]
    Ignore,
}

impl Response {
    /// Returns `true` for [`Response::Finish`].
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Finish)
    }
}

/// One step of a responder sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dispatch<K> {
    /// Phase this entry belongs to.
    pub phase: Phase,
    /// Node receiving the event.
    pub node: K,
}

impl<K> Dispatch<K> {
    /// A capture-phase entry.
    pub const fn capture(node: K) -> Self {
        Self {
            phase: Phase::Capture,
            node,
        }
    }

    /// The target entry.
    pub const fn target(node: K) -> Self {
        Self {
            phase: Phase::Target,
            node,
        }
    }

    /// A bubble-phase entry.
    pub const fn bubble(node: K) -> Self {
        Self {
            phase: Phase::Bubble,
            node,
        }
    }
}

/// A candidate target produced by hit testing.
///
/// `depth` ranks candidates: higher is nearer to the viewer. When `path` is
/// `None` the router reconstructs it through a [`ParentLookup`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedHit<K> {
    /// The candidate node.
    pub node: K,
    /// Optional root → node path (inclusive).
    pub path: Option<Vec<K>>,
    /// Stacking depth, higher wins.
    pub depth: i32,
}

/// Parent lookup used to reconstruct root → target paths.
pub trait ParentLookup<K> {
    /// Returns the parent of `node`, or `None` for roots and unknown nodes.
    fn parent_of(&self, node: &K) -> Option<K>;
}

/// A [`ParentLookup`] that knows no parents; paths collapse to the node itself.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoParent;

impl<K> ParentLookup<K> for NoParent {
    fn parent_of(&self, _: &K) -> Option<K> {
        None
    }
}
