// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Projection of flat rows onto the front half of a virtual cylinder.
//!
//! The visible window is a vertical slice through a cylinder whose front half
//! holds `visible_item_count` rows. Each row spans `item_angle = π / count`
//! radians of arc, so a row of height `h` sits on a cylinder of radius
//! `R = h / (2·sin(item_angle / 2))`. A row whose arc runs from `angle0` to
//! `angle1` (measured from the top pole) occupies
//! `(cos(angle0) − cos(angle1))·R` pixels of screen height.
//!
//! Everything here is pure: the same inputs always produce the same
//! [`CurveProjection`], and nothing is cached between frames.

use core::f64::consts::{FRAC_PI_2, PI};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Insets;
use smallvec::SmallVec;

use crate::{HeightSpec, RenderPolicy, WheelConfig, WheelError};

/// Lower bound on any vertical scale handed to a host.
pub const MIN_SCALE: f64 = 0.05;
/// Scale rate at which continuous styling starts magnifying a row.
pub const MAGNIFY_THRESHOLD: f64 = 0.90;
/// Scale reached by a row sitting exactly on the center line.
pub const MAX_MAGNIFIED_SCALE: f64 = 1.2;
/// Scale rate at which a magnified row becomes fully opaque.
pub const ALPHA_SATURATION: f64 = 0.99;

/// Per-row, per-frame result of projecting a row onto the cylinder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveProjection {
    /// Row slot, `0..=visible_item_count`, counted from the top of the window.
    pub row: usize,
    /// Vertical center of the row on screen, relative to the top of the content box.
    pub center_y: f64,
    /// Pre-scale drawing position: `center_y / scale_y`, for hosts that scale
    /// around the content origin before drawing.
    pub draw_y: f64,
    /// On-screen height of the row.
    pub curved_height: f64,
    /// Vertical scale to apply to the row's content.
    pub scale_y: f64,
    /// Opacity, `0.0..=1.0`.
    pub alpha: f64,
    /// `false` when the row is too thin to be worth painting.
    pub visible: bool,
}

impl CurveProjection {
    /// Applies a render policy to a raw projection.
    ///
    /// [`RenderPolicy::Fold`] leaves the projection untouched. [`RenderPolicy::Continuous`]
    /// remaps scale and alpha through [`continuous_style`] and recomputes the
    /// pre-scale drawing position.
    #[must_use]
    pub fn styled(self, policy: RenderPolicy) -> Self {
        match policy {
            RenderPolicy::Fold => self,
            RenderPolicy::Continuous => {
                if !self.visible {
                    return self;
                }
                let style = continuous_style(self.scale_y);
                Self {
                    scale_y: style.scale,
                    alpha: style.alpha,
                    draw_y: self.center_y / style.scale,
                    ..self
                }
            }
        }
    }
}

/// Scale and opacity produced by the continuous styling law.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowStyle {
    /// Vertical scale, at least [`MIN_SCALE`].
    pub scale: f64,
    /// Opacity, `0.0..=1.0`.
    pub alpha: f64,
    /// Whether the row is past [`MAGNIFY_THRESHOLD`] and should use inner styling.
    pub magnified: bool,
}

/// Continuous styling law shared by the custom-draw and recycling variants.
///
/// Below [`MAGNIFY_THRESHOLD`] both scale and alpha track the scale rate
/// (floored at [`MIN_SCALE`]). From the threshold up, scale rises linearly to
/// [`MAX_MAGNIFIED_SCALE`] at a rate of `1.0`, and alpha rises linearly to
/// `1.0` at [`ALPHA_SATURATION`].
#[must_use]
pub fn continuous_style(scale_rate: f64) -> RowStyle {
    let rate = scale_rate.clamp(MIN_SCALE, 1.0);
    if rate < MAGNIFY_THRESHOLD {
        return RowStyle {
            scale: rate,
            alpha: rate,
            magnified: false,
        };
    }
    let t = (rate - MAGNIFY_THRESHOLD) / (1.0 - MAGNIFY_THRESHOLD);
    let fade = ((rate - MAGNIFY_THRESHOLD) / (ALPHA_SATURATION - MAGNIFY_THRESHOLD)).min(1.0);
    RowStyle {
        scale: MAGNIFY_THRESHOLD + t * (MAX_MAGNIFIED_SCALE - MAGNIFY_THRESHOLD),
        alpha: MAGNIFY_THRESHOLD + fade * (1.0 - MAGNIFY_THRESHOLD),
        magnified: true,
    }
}

/// Projects row `row` of the visible window.
///
/// `item_offset` is how far the wheel has scrolled into the current item
/// (`0..item_height`). Rows whose projected height is below
/// `min_visible_height` are returned with `visible == false`.
#[must_use]
pub fn project(
    row: usize,
    item_offset: f64,
    item_height: f64,
    visible_item_count: usize,
    radius: f64,
    min_visible_height: f64,
) -> CurveProjection {
    let item_angle = PI / visible_item_count as f64;
    let shift = item_angle * (item_offset / item_height);
    let angle0 = (row as f64 * item_angle - shift).clamp(0.0, PI);
    let angle1 = ((row + 1) as f64 * item_angle - shift).clamp(0.0, PI);
    let curved_height = (angle0.cos() - angle1.cos()) * radius;
    let scale_y = curved_height / item_height;
    let center_y = (1.0 - angle0.cos()) * radius + curved_height / 2.0;
    let visible = curved_height > 0.0 && curved_height >= min_visible_height;
    CurveProjection {
        row,
        center_y,
        draw_y: if visible { center_y / scale_y } else { 0.0 },
        curved_height,
        scale_y,
        alpha: 1.0,
        visible,
    }
}

/// Where a point at arc distance `distance` from the display center lands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcPlacement {
    /// Vertical center on screen, relative to the top of the content box.
    pub center_y: f64,
    /// Raw foreshortening factor, `cos(arc)`; feed it to [`continuous_style`].
    pub scale_rate: f64,
}

/// Maps a signed distance along the cylinder surface to a screen position.
///
/// Positive distances lie above the center line. A distance of `π·R/2` reaches
/// the top pole.
#[must_use]
pub fn project_arc(distance: f64, radius: f64) -> ArcPlacement {
    let arc = distance / radius;
    ArcPlacement {
        center_y: (1.0 - arc.sin()) * radius,
        scale_rate: arc.cos(),
    }
}

/// Configured cylinder for a custom-drawn wheel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelGeometry {
    visible_item_count: usize,
    item_height: i32,
    item_angle: f64,
    radius: f64,
    min_visible_height: f64,
}

impl WheelGeometry {
    /// Builds the cylinder that fits `visible_item_count` rows of `item_height`.
    pub fn new(
        visible_item_count: usize,
        item_height: i32,
        min_visible_height: f64,
    ) -> Result<Self, WheelError> {
        if visible_item_count == 0 || visible_item_count % 2 == 0 {
            return Err(WheelError::InvalidVisibleItemCount(visible_item_count));
        }
        if item_height <= 0 {
            return Err(WheelError::DegenerateGeometry(item_height));
        }
        let item_angle = PI / visible_item_count as f64;
        let radius = f64::from(item_height) / (2.0 * (item_angle / 2.0).sin());
        Ok(Self {
            visible_item_count,
            item_height,
            item_angle,
            radius,
            min_visible_height,
        })
    }

    /// Number of rows on the front of the cylinder.
    #[must_use]
    pub const fn visible_item_count(&self) -> usize {
        self.visible_item_count
    }

    /// Flat row height.
    #[must_use]
    pub const fn item_height(&self) -> i32 {
        self.item_height
    }

    /// Arc spanned by one row, `π / visible_item_count`.
    #[must_use]
    pub const fn item_angle(&self) -> f64 {
        self.item_angle
    }

    /// Cylinder radius.
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Height of the content box, `2·R`.
    #[must_use]
    pub fn diameter(&self) -> f64 {
        self.radius * 2.0
    }

    /// Slot that straddles the top separator line at rest.
    #[must_use]
    pub const fn center_slot(&self) -> usize {
        self.visible_item_count / 2
    }

    /// Positions of the top and bottom separator lines, relative to the content top.
    #[must_use]
    pub fn separators(&self) -> (f64, f64) {
        let half = f64::from(self.item_height) / 2.0;
        (self.radius - half, self.radius + half)
    }

    /// Projects a single row slot. See [`project`].
    #[must_use]
    pub fn project(&self, row: usize, item_offset: f64) -> CurveProjection {
        project(
            row,
            item_offset,
            f64::from(self.item_height),
            self.visible_item_count,
            self.radius,
            self.min_visible_height,
        )
    }

    /// Projects every slot `0..=visible_item_count`; the extra slot keeps the
    /// bottom edge covered while a row scrolls out at the top.
    #[must_use]
    pub fn project_rows(&self, item_offset: f64) -> SmallVec<[CurveProjection; 16]> {
        (0..=self.visible_item_count)
            .map(|row| self.project(row, item_offset))
            .collect()
    }

    /// Scroll distance implied by a tap at content-space `y`.
    ///
    /// Returns `None` for taps outside the cylinder and `Some(0.0)` for taps
    /// within half a row of the center line. Other taps are mapped back
    /// through the cylinder to their arc distance from the center, so snapping
    /// `offset + distance` lands on the tapped row.
    #[must_use]
    pub fn tap_distance(&self, y: f64) -> Option<f64> {
        if !(0.0..=self.diameter()).contains(&y) {
            return None;
        }
        let angle = ((self.radius - y) / self.radius).clamp(-1.0, 1.0).acos();
        let distance = (angle - FRAC_PI_2) * self.radius;
        if distance.abs() < f64::from(self.item_height) / 2.0 {
            Some(0.0)
        } else {
            Some(distance)
        }
    }
}

/// Result of measuring a custom-drawn wheel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelMetrics {
    /// Cylinder used for drawing and hit testing.
    pub geometry: WheelGeometry,
    /// Full height of the wheel, padding included.
    pub height: f64,
    /// Padding around the content box.
    pub padding: Insets,
}

impl WheelMetrics {
    /// Measures the wheel under a host height constraint.
    ///
    /// With [`HeightSpec::Exact`] the row height is derived from the content
    /// height; with [`HeightSpec::Wrap`] the content height is derived from the
    /// configured row height. A derived row height of zero or less is a
    /// configuration error and is reported here, once, rather than per frame.
    pub fn measure(
        config: &WheelConfig,
        spec: HeightSpec,
        padding: Insets,
    ) -> Result<Self, WheelError> {
        if config.visible_item_count == 0 || config.visible_item_count % 2 == 0 {
            return Err(WheelError::InvalidVisibleItemCount(
                config.visible_item_count,
            ));
        }
        let item_angle = PI / config.visible_item_count as f64;
        let half_sin = (item_angle / 2.0).sin();
        let vertical_padding = padding.y0 + padding.y1;
        let (height, diameter, item_height) = match spec {
            HeightSpec::Exact(height) => {
                let diameter = height - vertical_padding;
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "Row heights are whole pixels; truncation matches the host's integer layout"
                )]
                let item_height = (diameter / 2.0 * half_sin * 2.0) as i32;
                (height, diameter, item_height)
            }
            HeightSpec::Wrap => {
                let diameter = f64::from(config.item_height) / half_sin;
                (vertical_padding + diameter, diameter, config.item_height)
            }
        };
        if item_height <= 0 {
            log::error!(
                "wheel measured a degenerate row height of {item_height}px (content height {diameter})"
            );
            return Err(WheelError::DegenerateGeometry(item_height));
        }
        let geometry = WheelGeometry {
            visible_item_count: config.visible_item_count,
            item_height,
            item_angle,
            radius: diameter / 2.0,
            min_visible_height: config.min_visible_row_height,
        };
        Ok(Self {
            geometry,
            height,
            padding,
        })
    }
}
