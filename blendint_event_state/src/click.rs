// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Press/release pairing and click recognition.
//!
//! A press is recorded per mouse button together with the view it landed on.
//! The matching release resolves it:
//!
//! 1. **Same view**: the release lands on the pressed view; always a click.
//! 2. **Different view within tolerance**: the pressed view moved or resized
//!    under the cursor (a button animating on press, a layout shift). If the
//!    cursor stayed within the distance threshold for the whole press and the
//!    release came within the time threshold, the click still goes to the
//!    pressed view.
//! 3. Otherwise the click is suppressed.
//!
//! A threshold of `None` means unlimited tolerance; when both are `None` only
//! same-view releases click.
//!
//! ```
//! use blendint_event_state::click::{ClickResult, ClickState};
//! use kurbo::Point;
//!
//! let mut state: ClickState<u32> = ClickState::with_thresholds(Some(4.0), Some(300));
//! state.on_down(0, 7, Point::new(10.0, 10.0), 1_000);
//! assert!(state.on_move(Point::new(12.0, 11.0)).is_empty());
//! assert_eq!(state.on_up(0, Some(&8), Point::new(12.0, 11.0), 1_100), ClickResult::Click(7));
//! ```

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use kurbo::Point;

/// Mouse button code.
pub type Button = u8;

/// Click recognition state.
#[derive(Clone, Debug)]
pub struct ClickState<K> {
    presses: BTreeMap<Button, Press<K>>,
    /// Distance the cursor may travel before a release on another view stops
    /// counting as a click.
    pub distance_threshold: Option<f64>,
    /// Milliseconds after the press during which a release on another view
    /// still counts as a click.
    pub time_threshold: Option<u64>,
}

/// An active press.
#[derive(Clone, Debug, PartialEq)]
pub struct Press<K> {
    /// View the press landed on.
    pub target: K,
    /// Cursor position at press time.
    pub position: Point,
    /// Timestamp of the press in milliseconds.
    pub time: u64,
    /// Set once the cursor moved beyond the distance threshold.
    pub distance_exceeded: bool,
}

/// Outcome of a release.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickResult<K> {
    /// Deliver a click to this view.
    Click(K),
    /// No click; carries the pressed view if there was a press.
    Suppressed(Option<K>),
}

impl<K> Default for ClickState<K> {
    fn default() -> Self {
        Self {
            presses: BTreeMap::new(),
            distance_threshold: Some(4.0),
            time_threshold: Some(250),
        }
    }
}

impl<K: PartialEq + Clone> ClickState<K> {
    /// Create a click state with the default 4 px and 250 ms tolerances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a click state with explicit tolerances.
    pub fn with_thresholds(distance_threshold: Option<f64>, time_threshold: Option<u64>) -> Self {
        Self {
            presses: BTreeMap::new(),
            distance_threshold,
            time_threshold,
        }
    }

    /// Record a press of `button` on `target`, replacing any earlier press of
    /// the same button.
    pub fn on_down(&mut self, button: Button, target: K, position: Point, time: u64) {
        self.presses.insert(
            button,
            Press {
                target,
                position,
                time,
                distance_exceeded: false,
            },
        );
    }

    /// Resolve the release of `button`.
    ///
    /// `current` is the view under the cursor at release time, if any.
    pub fn on_up(
        &mut self,
        button: Button,
        current: Option<&K>,
        position: Point,
        time: u64,
    ) -> ClickResult<K> {
        let Some(press) = self.presses.remove(&button) else {
            return ClickResult::Suppressed(None);
        };
        if current == Some(&press.target) {
            return ClickResult::Click(press.target);
        }
        if (self.distance_threshold.is_none() && self.time_threshold.is_none())
            || press.distance_exceeded
        {
            return ClickResult::Suppressed(Some(press.target));
        }
        let distance_ok = self
            .distance_threshold
            .is_none_or(|t| press.position.distance(position) <= t);
        let time_ok = self
            .time_threshold
            .is_none_or(|t| time.saturating_sub(press.time) <= t);
        if distance_ok && time_ok {
            ClickResult::Click(press.target)
        } else {
            ClickResult::Suppressed(Some(press.target))
        }
    }

    /// Track cursor movement during active presses.
    ///
    /// Returns the targets whose press just exceeded the distance threshold.
    pub fn on_move(&mut self, position: Point) -> Vec<K> {
        let mut exceeded = Vec::new();
        let Some(limit) = self.distance_threshold else {
            return exceeded;
        };
        for press in self.presses.values_mut() {
            if !press.distance_exceeded && press.position.distance(position) > limit {
                press.distance_exceeded = true;
                exceeded.push(press.target.clone());
            }
        }
        exceeded
    }

    /// The active press of `button`.
    pub fn press(&self, button: Button) -> Option<&Press<K>> {
        self.presses.get(&button)
    }

    /// Returns `true` if any button is held on `target`.
    pub fn is_pressed_on(&self, target: &K) -> bool {
        self.presses.values().any(|p| p.target == *target)
    }

    /// Cancel the press of `button`. Returns `true` if one was active.
    pub fn cancel(&mut self, button: Button) -> bool {
        self.presses.remove(&button).is_some()
    }

    /// Drop presses whose target no longer satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&K) -> bool) {
        self.presses.retain(|_, p| keep(&p.target));
    }

    /// Drop every active press.
    pub fn clear(&mut self) {
        self.presses.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_target_clicks_regardless_of_distance() {
        let mut state: ClickState<u32> = ClickState::new();
        state.on_down(0, 1, Point::new(0.0, 0.0), 0);
        let _ = state.on_move(Point::new(500.0, 0.0));
        assert_eq!(
            state.on_up(0, Some(&1), Point::new(500.0, 0.0), 10_000),
            ClickResult::Click(1)
        );
    }

    #[test]
    fn release_without_press_is_suppressed() {
        let mut state: ClickState<u32> = ClickState::new();
        assert_eq!(
            state.on_up(0, Some(&1), Point::ZERO, 0),
            ClickResult::Suppressed(None)
        );
    }

    #[test]
    fn other_button_release_does_not_resolve_press() {
        let mut state: ClickState<u32> = ClickState::new();
        state.on_down(0, 1, Point::ZERO, 0);
        assert_eq!(
            state.on_up(1, Some(&1), Point::ZERO, 0),
            ClickResult::Suppressed(None)
        );
        assert!(state.press(0).is_some());
    }

    #[test]
    fn different_target_outside_time_is_suppressed() {
        let mut state: ClickState<u32> = ClickState::with_thresholds(Some(4.0), Some(100));
        state.on_down(0, 1, Point::ZERO, 0);
        assert_eq!(
            state.on_up(0, Some(&2), Point::new(1.0, 0.0), 101),
            ClickResult::Suppressed(Some(1))
        );
    }

    #[test]
    fn released_over_nothing_within_tolerance_clicks() {
        let mut state: ClickState<u32> = ClickState::new();
        state.on_down(0, 1, Point::ZERO, 0);
        assert_eq!(
            state.on_up(0, None, Point::new(2.0, 2.0), 50),
            ClickResult::Click(1)
        );
    }

    #[test]
    fn move_beyond_threshold_blocks_other_target_click() {
        let mut state: ClickState<u32> = ClickState::with_thresholds(Some(4.0), None);
        state.on_down(0, 1, Point::ZERO, 0);
        assert_eq!(state.on_move(Point::new(10.0, 0.0)), alloc::vec![1]);
        // Reported only once.
        assert!(state.on_move(Point::new(20.0, 0.0)).is_empty());
        assert_eq!(
            state.on_up(0, Some(&2), Point::ZERO, 0),
            ClickResult::Suppressed(Some(1))
        );
    }

    #[test]
    fn no_thresholds_only_same_target() {
        let mut state: ClickState<u32> = ClickState::with_thresholds(None, None);
        state.on_down(0, 1, Point::ZERO, 0);
        assert_eq!(
            state.on_up(0, Some(&2), Point::ZERO, 0),
            ClickResult::Suppressed(Some(1))
        );
    }

    #[test]
    fn retain_drops_presses_on_removed_targets() {
        let mut state: ClickState<u32> = ClickState::new();
        state.on_down(0, 1, Point::ZERO, 0);
        state.on_down(2, 5, Point::ZERO, 0);
        state.retain(|t| *t != 1);
        assert!(!state.is_pressed_on(&1));
        assert!(state.is_pressed_on(&5));
        assert!(state.cancel(2));
        assert!(!state.cancel(2));
    }
}
