// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wheel configuration: style attributes, physics tuning, and density helpers.

use alloc::string::ToString;

use crate::WheelError;

/// Converts density-independent pixels to device pixels, rounding to nearest.
#[must_use]
pub fn dp_to_px(density: f64, dp: f64) -> i32 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Pixel sizes derived from dp values are small and positive"
    )]
    let px = (dp * density + 0.5) as i32;
    px
}

/// An 8-bit RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, `255` is opaque.
    pub a: u8,
}

impl Color {
    /// Creates an opaque color.
    #[must_use]
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Creates a color with explicit alpha.
    #[must_use]
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parses `#RRGGBB` or `#AARRGGBB`, the forms used by style attributes.
    pub fn from_hex(literal: &str) -> Result<Self, WheelError> {
        let invalid = || WheelError::InvalidColor(literal.to_string());
        let digits = literal.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        match digits.len() {
            6 => Ok(Self::from_rgb8(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Self::from_rgba8(
                channel(2)?,
                channel(4)?,
                channel(6)?,
                channel(0)?,
            )),
            _ => Err(invalid()),
        }
    }

    /// Returns this color with its alpha multiplied by `factor` (clamped to `0..=1`).
    #[must_use]
    pub fn with_alpha_factor(self, factor: f64) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "The product is within 0..=255 after clamping"
        )]
        let a = (f64::from(self.a) * factor + 0.5) as u8;
        Self { a, ..self }
    }
}

/// How rows near the center line are styled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RenderPolicy {
    /// The two rows straddling the separator lines are painted twice, clipped at
    /// each line, with outer styling outside the lens and inner styling inside.
    #[default]
    Fold,
    /// Rows are painted once with continuous scale and alpha; rows near the
    /// center are magnified instead of being split at the separators.
    Continuous,
}

/// How a release velocity above the fling threshold is turned into motion.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlingPolicy {
    /// Glide under constant deceleration (px/s²) without bounds, then re-snap
    /// to the nearest row once the glide ends or leaves the overfling band.
    Simulated {
        /// Deceleration in px/s².
        deceleration: f64,
    },
    /// Project a landing offset `offset - velocity / damping`, snap it to a row
    /// boundary, and settle there directly.
    Projected {
        /// Divisor applied to the release velocity.
        damping: f64,
    },
}

/// Whether a drag may pull the wheel past its first or last row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverscrollMode {
    /// Drags are hard-clamped to the valid offset range.
    Never,
    /// Drags may always overscroll by up to the configured distance.
    Always,
    /// Drags may overscroll only when there is more than one row.
    #[default]
    IfContentScrolls,
}

/// How the host constrains the wheel's height during measurement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HeightSpec {
    /// The host dictates the full height (padding included); row height is derived from it.
    Exact(f64),
    /// The wheel picks its own height from the configured row height.
    Wrap,
}

/// Immutable configuration of a wheel.
///
/// All sizes are device pixels. Use [`WheelConfig::for_density`] to get the
/// density-scaled defaults, then override fields with struct-update syntax:
///
/// ```rust
/// use understory_wheel::{RenderPolicy, WheelConfig};
///
/// let config = WheelConfig {
///     visible_item_count: 5,
///     render_policy: RenderPolicy::Continuous,
///     ..WheelConfig::for_density(2.0)
/// };
/// assert_eq!(config.item_height, 90);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WheelConfig {
    /// Number of rows visible on the front of the wheel; must be odd.
    pub visible_item_count: usize,
    /// Row height used when the host lets the wheel size itself.
    pub item_height: i32,
    /// Text size of the selected (inner) row.
    pub text_size: f64,
    /// Text color between the separator lines.
    pub inner_text_color: Color,
    /// Text color outside the separator lines.
    pub outer_text_color: Color,
    /// Separator line color.
    pub separator_color: Color,
    /// Separator line stroke width.
    pub separator_width: f64,
    /// Display density (device pixels per dp).
    pub density: f64,
    /// Visual treatment of rows near the center.
    pub render_policy: RenderPolicy,
    /// Fling behavior.
    pub fling_policy: FlingPolicy,
    /// Drag overscroll behavior.
    pub overscroll_mode: OverscrollMode,
    /// Maximum rubber-band distance while dragging.
    pub overscroll_distance: i32,
    /// How far a simulated fling may travel past either end before it is cut short.
    pub overfling_distance: i32,
    /// Distance the pointer must travel before a drag starts.
    pub touch_slop: f64,
    /// Release speeds at or below this (px/s) snap instead of flinging.
    pub min_fling_velocity: f64,
    /// Release speeds are clamped to this magnitude (px/s).
    pub max_fling_velocity: f64,
    /// Duration of the settle animation in milliseconds.
    pub settle_duration_ms: u64,
    /// Rows projected thinner than this are skipped.
    pub min_visible_row_height: f64,
}

impl WheelConfig {
    /// Returns the defaults for a display with the given density.
    #[must_use]
    pub fn for_density(density: f64) -> Self {
        let px = |dp: f64| dp_to_px(density, dp);
        Self {
            visible_item_count: 7,
            item_height: px(45.0),
            text_size: f64::from(px(16.0)),
            inner_text_color: Color::from_rgb8(0x37, 0x37, 0x37),
            outer_text_color: Color::from_rgb8(0xAF, 0xAF, 0xAF),
            separator_color: Color::from_rgb8(0xE7, 0xE7, 0xE7),
            separator_width: 1.0,
            density,
            render_policy: RenderPolicy::Fold,
            fling_policy: FlingPolicy::Simulated {
                deceleration: 2000.0 * density,
            },
            overscroll_mode: OverscrollMode::IfContentScrolls,
            overscroll_distance: 0,
            overfling_distance: px(6.0),
            touch_slop: f64::from(px(8.0)),
            min_fling_velocity: 50.0 * density,
            max_fling_velocity: 8000.0 * density,
            settle_duration_ms: 300,
            min_visible_row_height: f64::from(px(1.0)),
        }
    }

    /// Text size for rows outside the separator lines.
    #[must_use]
    pub fn outer_text_size(&self) -> f64 {
        self.text_size - f64::from(dp_to_px(self.density, 1.0))
    }

    /// Checks the invariants the engine relies on.
    ///
    /// Row height is checked again at measurement time, since an exact host
    /// height can still derive a degenerate row.
    pub fn validate(&self) -> Result<(), WheelError> {
        if self.visible_item_count == 0 || self.visible_item_count % 2 == 0 {
            return Err(WheelError::InvalidVisibleItemCount(self.visible_item_count));
        }
        if !(self.density.is_finite() && self.density > 0.0) {
            return Err(WheelError::InvalidDensity(self.density));
        }
        if self.item_height <= 0 {
            return Err(WheelError::DegenerateGeometry(self.item_height));
        }
        if self.settle_duration_ms == 0 {
            return Err(WheelError::InvalidDuration);
        }
        Ok(())
    }

    /// Rubber-band limit for a wheel whose valid range ends at `max_offset`,
    /// or `None` when drags must be hard-clamped.
    #[must_use]
    pub fn overscroll_limit(&self, max_offset: i32) -> Option<i32> {
        match self.overscroll_mode {
            OverscrollMode::Never => None,
            OverscrollMode::Always => Some(self.overscroll_distance.max(0)),
            OverscrollMode::IfContentScrolls if max_offset > 0 => {
                Some(self.overscroll_distance.max(0))
            }
            OverscrollMode::IfContentScrolls => None,
        }
    }
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self::for_density(1.0)
    }
}
