//! Viewport membership
//!
//! A simple axis-aligned overlap test between an element and the visible
//! part of the viewport. It does not compute visible area.

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, ViewportMetrics};

/// Pixel insets applied to the viewport before the overlap test
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Offsets {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Offsets {
    pub fn new(top: f64, left: f64, right: f64, bottom: f64) -> Self {
        Self {
            top,
            left,
            right,
            bottom,
        }
    }
}

/// Tuning for [`is_in_view`]
///
/// The defaults (zero cushion, zero offsets) count any overlap with the
/// raw viewport as "in view".
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewabilityConfig {
    /// Fraction (0..=1) of the element that must be exposed past the
    /// viewport edge it is entering from
    pub cushion: f64,
    /// Viewport insets in pixels
    pub offsets: Offsets,
}

impl ViewabilityConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cushion, clamped into `0..=1`
    pub fn cushion(mut self, cushion: f64) -> Self {
        self.cushion = cushion.clamp(0.0, 1.0);
        self
    }

    /// Set the viewport insets
    pub fn offsets(mut self, offsets: Offsets) -> Self {
        self.offsets = offsets;
        self
    }

    /// Whether the cushion is inside `0..=1`
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.cushion)
    }
}

/// Whether an element is in view
///
/// Visible bounds are `[offsets.top, height - offsets.bottom]` and
/// `[offsets.left, width - offsets.right]`. On each axis the element's
/// span is shrunk by `dimension * cushion` before the inclusive overlap
/// test, so a larger cushion requires more of the element to be exposed.
pub fn is_in_view(rect: &Rect, viewport: &ViewportMetrics, config: &ViewabilityConfig) -> bool {
    let cushion = config.cushion.clamp(0.0, 1.0);
    let offsets = &config.offsets;

    let visible_top = offsets.top;
    let visible_bottom = viewport.height - offsets.bottom;
    let visible_left = offsets.left;
    let visible_right = viewport.width - offsets.right;

    let inset_y = rect.height * cushion;
    let inset_x = rect.width * cushion;

    let in_vertically = rect.top + inset_y <= visible_bottom && rect.bottom - inset_y >= visible_top;
    let in_horizontally =
        rect.left + inset_x <= visible_right && rect.right - inset_x >= visible_left;

    in_vertically && in_horizontally
}
