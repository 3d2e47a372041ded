// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runs of extents along one axis, with spacing and a lazily-maintained prefix-sum cache.

use alloc::vec::Vec;

/// A run of track extents (rows, columns, or the items of a linear layout)
/// separated by a fixed `space`.
///
/// Offsets are computed from prefix sums that are rebuilt lazily from the first
/// extent that changed.
///
/// ```
/// use blendint_layout::Tracks;
///
/// let mut t = Tracks::from_extents([80.0, 80.0], 10.0);
/// assert_eq!(t.total(), 170.0);
/// assert_eq!(t.offset_at(1), 90.0);
///
/// // Give all 30 units of slack to the second track.
/// assert_eq!(t.fit(200.0, &[false, true]), 0.0);
/// assert_eq!(t.extent_at(1), 110.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Tracks {
    extents: Vec<f64>,
    starts: Vec<f64>,
    space: f64,
    dirty_from: Option<usize>,
}

impl Tracks {
    /// Creates an empty run.
    pub fn new(space: f64) -> Self {
        Self {
            extents: Vec::new(),
            starts: Vec::new(),
            space: clamp(space),
            dirty_from: Some(0),
        }
    }

    /// Creates a run from a sequence of extents.
    pub fn from_extents(extents: impl IntoIterator<Item = f64>, space: f64) -> Self {
        let mut t = Self::new(space);
        for e in extents {
            t.push(e);
        }
        t
    }

    /// Appends a track. Negative and NaN extents become zero.
    pub fn push(&mut self, extent: f64) {
        self.extents.push(clamp(extent));
        self.starts.push(0.0);
        self.mark_dirty(self.extents.len() - 1);
    }

    /// Number of tracks.
    pub fn len(&self) -> usize {
        self.extents.len()
    }

    /// Returns `true` if there are no tracks.
    pub fn is_empty(&self) -> bool {
        self.extents.is_empty()
    }

    /// Gap between adjacent tracks.
    pub fn space(&self) -> f64 {
        self.space
    }

    /// Extent of track `index`, zero when out of range.
    pub fn extent_at(&self, index: usize) -> f64 {
        self.extents.get(index).copied().unwrap_or(0.0)
    }

    /// Replaces the extent of track `index`.
    pub fn set_extent(&mut self, index: usize, extent: f64) {
        if let Some(e) = self.extents.get_mut(index) {
            *e = clamp(extent);
            self.mark_dirty(index);
        }
    }

    /// Offset of the start of track `index` from the start of the run.
    pub fn offset_at(&mut self, index: usize) -> f64 {
        if self.extents.is_empty() {
            return 0.0;
        }
        let i = index.min(self.extents.len() - 1);
        self.ensure_prefix();
        self.starts[i]
    }

    /// Total extent including the gaps between tracks.
    pub fn total(&mut self) -> f64 {
        let Some(last) = self.extents.len().checked_sub(1) else {
            return 0.0;
        };
        self.offset_at(last) + self.extents[last]
    }

    /// Sum of the track extents alone.
    fn content(&self) -> f64 {
        self.extents.iter().sum()
    }

    /// Fit the run into `available`.
    ///
    /// With room to spare, the slack is shared equally by the tracks flagged in
    /// `expand`; if none are flagged the slack is returned untouched. Short of
    /// room, every track shrinks in proportion to its extent while the gaps
    /// stay fixed. Returns the slack left over.
    pub fn fit(&mut self, available: f64, expand: &[bool]) -> f64 {
        let total = self.total();
        if total > available {
            let gaps = total - self.content();
            let room = clamp(available - gaps);
            let content = self.content();
            let scale = if content > 0.0 { room / content } else { 0.0 };
            for e in &mut self.extents {
                *e *= scale;
            }
            self.mark_dirty(0);
            return 0.0;
        }
        let slack = available - total;
        let growing: Vec<usize> = (0..self.extents.len())
            .filter(|i| expand.get(*i).copied().unwrap_or(false))
            .collect();
        if growing.is_empty() || slack <= 0.0 {
            return clamp(slack);
        }
        #[allow(
            clippy::cast_precision_loss,
            reason = "Track counts are far below f64 precision limits."
        )]
        let share = slack / growing.len() as f64;
        for i in growing {
            self.extents[i] += share;
        }
        self.mark_dirty(0);
        0.0
    }

    fn mark_dirty(&mut self, from: usize) {
        self.dirty_from = Some(self.dirty_from.map_or(from, |d| d.min(from)));
    }

    fn ensure_prefix(&mut self) {
        let Some(from) = self.dirty_from.take() else {
            return;
        };
        let mut pos = match from.checked_sub(1) {
            Some(prev) => self.starts[prev] + self.extents[prev] + self.space,
            None => 0.0,
        };
        for i in from..self.extents.len() {
            self.starts[i] = pos;
            pos += self.extents[i] + self.space;
        }
    }
}

fn clamp(v: f64) -> f64 {
    if v > 0.0 { v } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_include_spacing() {
        let mut t = Tracks::from_extents([10.0, 20.0, 30.0], 5.0);
        assert_eq!(t.offset_at(0), 0.0);
        assert_eq!(t.offset_at(1), 15.0);
        assert_eq!(t.offset_at(2), 40.0);
        assert_eq!(t.total(), 70.0);
    }

    #[test]
    fn set_extent_invalidates_following_offsets() {
        let mut t = Tracks::from_extents([10.0, 10.0, 10.0], 0.0);
        assert_eq!(t.offset_at(2), 20.0);
        t.set_extent(0, 15.0);
        assert_eq!(t.offset_at(2), 25.0);
        assert_eq!(t.offset_at(1), 15.0);
    }

    #[test]
    fn negative_and_nan_extents_clamp() {
        let mut t = Tracks::from_extents([-5.0, f64::NAN, 4.0], 1.0);
        assert_eq!(t.extent_at(0), 0.0);
        assert_eq!(t.extent_at(1), 0.0);
        assert_eq!(t.total(), 6.0);
    }

    #[test]
    fn shrink_is_proportional_and_keeps_gaps() {
        let mut t = Tracks::from_extents([100.0, 300.0], 10.0);
        assert_eq!(t.fit(210.0, &[]), 0.0);
        assert_eq!(t.extent_at(0), 50.0);
        assert_eq!(t.extent_at(1), 150.0);
        assert_eq!(t.total(), 210.0);
    }

    #[test]
    fn slack_without_expanders_is_returned() {
        let mut t = Tracks::from_extents([10.0, 10.0], 0.0);
        assert_eq!(t.fit(50.0, &[false, false]), 30.0);
        assert_eq!(t.total(), 20.0);
    }

    #[test]
    fn slack_is_shared_by_expanders() {
        let mut t = Tracks::from_extents([10.0, 10.0, 10.0], 0.0);
        assert_eq!(t.fit(60.0, &[true, false, true]), 0.0);
        assert_eq!(t.extent_at(0), 25.0);
        assert_eq!(t.extent_at(1), 10.0);
        assert_eq!(t.extent_at(2), 25.0);
        assert_eq!(t.offset_at(2), 35.0);
    }
}
