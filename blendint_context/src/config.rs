// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Context policy.

/// Tunables for a [`Context`](crate::Context).
///
/// ```
/// use blendint_context::ContextConfig;
///
/// let config = ContextConfig {
///     focus_on_press: false,
///     ..ContextConfig::default()
/// };
/// assert_eq!(config.click_time_threshold, Some(250));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ContextConfig {
    /// How far, in pixels, the cursor may travel between press and release
    /// for a release on another view to still click the pressed one.
    ///
    /// `None` means unlimited.
    pub click_distance_threshold: Option<f64>,
    /// How long, in milliseconds, a release on another view may follow the
    /// press and still click the pressed one.
    ///
    /// `None` means unlimited.
    pub click_time_threshold: Option<u64>,
    /// Move keyboard focus to the pressed frame and widget on every press.
    pub focus_on_press: bool,
    /// Tile docked frames across the window and refuse their own size and
    /// position requests. When `false` docked frames keep whatever geometry
    /// they are given.
    pub docked_frames_fill: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            click_distance_threshold: Some(4.0),
            click_time_threshold: Some(250),
            focus_on_press: true,
            docked_frames_fill: true,
        }
    }
}
