// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Router implementation.
//!
//! ## Overview
//!
//! Orders hits, reconstructs paths, and emits dispatch steps.
//! Produces a capture → target → bubble sequence for the selected target.
//!
//! ## Target Selection
//!
//! - Ranks candidates by [`ResolvedHit::depth`](crate::types::ResolvedHit::depth), higher is nearer.
//! - Equal-depth ties are stable and the last candidate wins, so callers list
//!   candidates oldest first (for example in insertion order of top-level frames).
//! - `capture` overrides selection entirely until released.

use alloc::vec::Vec;

use crate::types::{Dispatch, ParentLookup, Phase, ResolvedHit};

/// Deterministic responder chain router.
///
/// The router holds the pointer-capture slot. Parent information is supplied
/// per call, so the same router can be used while the tree it routes over is
/// mutated between events.
///
/// ```
/// use blendint_responder::router::Router;
/// use blendint_responder::types::{NoParent, Phase, ResolvedHit};
///
/// let router: Router<u32> = Router::new();
/// let hits = [
///     ResolvedHit { node: 2, path: Some(vec![1, 2]), depth: 0 },
///     ResolvedHit { node: 9, path: Some(vec![9]), depth: 1 },
/// ];
/// let seq = router.handle_with_hits(&hits, &NoParent);
/// assert_eq!(seq.len(), 1);
/// assert_eq!((seq[0].phase, seq[0].node), (Phase::Target, 9));
/// ```
#[derive(Clone, Debug)]
pub struct Router<K> {
    capture: Option<K>,
}

impl<K> Default for Router<K> {
    fn default() -> Self {
        Self { capture: None }
    }
}

impl<K: Copy + Eq> Router<K> {
    /// Create a router with no pointer capture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or release the captured node for pointer events.
    pub fn capture(&mut self, node: Option<K>) {
        self.capture = node;
    }

    /// The node currently holding pointer capture.
    pub fn captured(&self) -> Option<K> {
        self.capture
    }

    /// Select the winning candidate among `hits`.
    ///
    /// Returns the index of the winner, ignoring capture.
    pub fn select(&self, hits: &[ResolvedHit<K>]) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, h) in hits.iter().enumerate() {
            match best {
                // `>=` keeps the stable last-wins rule on equal depth.
                Some(j) if h.depth < hits[j].depth => {}
                _ => best = Some(i),
            }
        }
        best
    }

    /// Handle a pre-resolved sequence of hits and produce a propagation sequence.
    ///
    /// When capture is set the captured node is routed to regardless of the
    /// hits. Its path comes from a matching hit if one exists, otherwise from
    /// `parents`.
    pub fn handle_with_hits(
        &self,
        hits: &[ResolvedHit<K>],
        parents: &impl ParentLookup<K>,
    ) -> Vec<Dispatch<K>> {
        if let Some(cap) = self.capture {
            let path = match hits.iter().rev().find(|h| h.node == cap) {
                Some(ResolvedHit {
                    path: Some(path), ..
                }) => path.clone(),
                _ => reconstruct_path(cap, parents),
            };
            return emit_path(&path);
        }

        let Some(i) = self.select(hits) else {
            return Vec::new();
        };
        let best = &hits[i];
        match &best.path {
            Some(path) => emit_path(path),
            None => emit_path(&reconstruct_path(best.node, parents)),
        }
    }

    /// Emit a dispatch sequence for a specific target node by reconstructing its path.
    ///
    /// Capture is not consulted; this is intended for focused routing
    /// (keyboard, text input, context menus).
    pub fn dispatch_for(&self, target: K, parents: &impl ParentLookup<K>) -> Vec<Dispatch<K>> {
        emit_path(&reconstruct_path(target, parents))
    }
}

/// Collect the root → `target` path through `parents`.
pub fn reconstruct_path<K: Copy>(target: K, parents: &impl ParentLookup<K>) -> Vec<K> {
    let mut out = Vec::new();
    let mut cur = target;
    // Collect to root; caller ensures acyclic ancestry.
    loop {
        out.push(cur);
        match parents.parent_of(&cur) {
            Some(p) => cur = p,
            None => break,
        }
    }
    out.reverse();
    out
}

fn emit_path<K: Copy>(path: &[K]) -> Vec<Dispatch<K>> {
    let Some((target, ancestors)) = path.split_last() else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(ancestors.len() * 2 + 1);
    for &n in ancestors {
        out.push(Dispatch {
            phase: Phase::Capture,
            node: n,
        });
    }
    out.push(Dispatch::target(*target));
    for &n in ancestors.iter().rev() {
        out.push(Dispatch::bubble(n));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NoParent;
    use alloc::vec;

    struct Parents;
    impl ParentLookup<u32> for Parents {
        fn parent_of(&self, node: &u32) -> Option<u32> {
            match node {
                3 => Some(2),
                2 => Some(1),
                _ => None,
            }
        }
    }

    fn phases(seq: &[Dispatch<u32>]) -> Vec<(Phase, u32)> {
        seq.iter().map(|d| (d.phase, d.node)).collect()
    }

    #[test]
    fn simple_path_dispatch() {
        let router = Router::new();
        let hits = vec![ResolvedHit {
            node: 3,
            path: Some(vec![1, 2, 3]),
            depth: 0,
        }];
        let out = router.handle_with_hits(&hits, &NoParent);
        assert_eq!(
            phases(&out),
            vec![
                (Phase::Capture, 1),
                (Phase::Capture, 2),
                (Phase::Target, 3),
                (Phase::Bubble, 2),
                (Phase::Bubble, 1),
            ]
        );
    }

    #[test]
    fn higher_depth_wins() {
        let router = Router::new();
        let hits = vec![
            ResolvedHit {
                node: 1,
                path: None,
                depth: 5,
            },
            ResolvedHit {
                node: 2,
                path: None,
                depth: 1,
            },
        ];
        assert_eq!(router.select(&hits), Some(0));
    }

    #[test]
    fn equal_depth_last_wins() {
        let router = Router::new();
        let hits = vec![
            ResolvedHit {
                node: 1,
                path: None,
                depth: 0,
            },
            ResolvedHit {
                node: 2,
                path: None,
                depth: 0,
            },
        ];
        let out = router.handle_with_hits(&hits, &NoParent);
        assert_eq!(phases(&out), vec![(Phase::Target, 2)]);
    }

    #[test]
    fn missing_path_is_reconstructed() {
        let router = Router::new();
        let hits = vec![ResolvedHit {
            node: 3,
            path: None,
            depth: 0,
        }];
        let out = router.handle_with_hits(&hits, &Parents);
        assert_eq!(out.first().map(|d| d.node), Some(1));
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn capture_overrides_selection_and_reconstructs_path() {
        let mut router = Router::new();
        router.capture(Some(3));
        let hits = vec![ResolvedHit {
            node: 9,
            path: Some(vec![9]),
            depth: 999,
        }];
        let out = router.handle_with_hits(&hits, &Parents);
        assert_eq!(
            phases(&out),
            vec![
                (Phase::Capture, 1),
                (Phase::Capture, 2),
                (Phase::Target, 3),
                (Phase::Bubble, 2),
                (Phase::Bubble, 1),
            ]
        );
        router.capture(None);
        let out = router.handle_with_hits(&hits, &Parents);
        assert_eq!(phases(&out), vec![(Phase::Target, 9)]);
    }

    #[test]
    fn capture_with_no_hits_still_routes() {
        let mut router = Router::new();
        router.capture(Some(2));
        let out = router.handle_with_hits(&[], &Parents);
        assert_eq!(
            phases(&out),
            vec![(Phase::Capture, 1), (Phase::Target, 2), (Phase::Bubble, 1)]
        );
    }

    #[test]
    fn no_hits_no_dispatch() {
        let router: Router<u32> = Router::new();
        assert!(router.handle_with_hits(&[], &NoParent).is_empty());
    }

    #[test]
    fn dispatch_for_ignores_capture() {
        let mut router = Router::new();
        router.capture(Some(1));
        let out = router.dispatch_for(2, &Parents);
        assert_eq!(
            phases(&out),
            vec![(Phase::Capture, 1), (Phase::Target, 2), (Phase::Bubble, 1)]
        );
    }
}
