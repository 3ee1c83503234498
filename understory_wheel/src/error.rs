// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors.
//!
//! Only construction and measurement can fail. Everything that happens per
//! frame or per input event is absorbed locally (clamped, ignored, or modeled
//! as `None`), so none of these variants are produced while scrolling.

use alloc::string::String;

/// Errors surfaced while configuring or measuring a wheel.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum WheelError {
    /// The number of visible rows must be odd and non-zero so a single row
    /// sits on the center line.
    #[error("visible item count must be odd and non-zero, got {0}")]
    InvalidVisibleItemCount(usize),
    /// Measurement produced a row height that cannot drive the geometry.
    #[error("item height must be positive, got {0}px")]
    DegenerateGeometry(i32),
    /// The display density must be a positive, finite scale factor.
    #[error("density must be positive and finite, got {0}")]
    InvalidDensity(f64),
    /// A color attribute could not be parsed.
    #[error("invalid color literal {0:?}, expected #RRGGBB or #AARRGGBB")]
    InvalidColor(String),
    /// The settle animation needs a non-zero duration.
    #[error("settle duration must be non-zero")]
    InvalidDuration,
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::WheelError;

    #[test]
    fn messages_name_the_offending_value() {
        assert_eq!(
            WheelError::InvalidVisibleItemCount(4).to_string(),
            "visible item count must be odd and non-zero, got 4"
        );
        assert_eq!(
            WheelError::DegenerateGeometry(0).to_string(),
            "item height must be positive, got 0px"
        );
    }
}
