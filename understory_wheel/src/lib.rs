// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_wheel --heading-base-level=0

//! Understory Wheel: geometry, selection, and scroll physics for curved wheel pickers.
//!
//! A wheel picker shows a short window of rows as if they were painted on the
//! front half of a rotating cylinder: the selected row sits flat in the middle
//! between two separator lines, and rows above and below foreshorten as they
//! roll away. This crate is the renderer-agnostic engine behind such a
//! control. It never draws pixels, owns no timers, and knows nothing about any
//! particular widget system.
//!
//! The pieces, leaves first:
//!
//! - [`WheelGeometry`] projects a row slot and scroll position onto the
//!   cylinder, producing a [`CurveProjection`] (screen position, vertical
//!   scale, opacity, visibility). [`WheelMetrics`] derives the geometry from a
//!   host's height constraint.
//! - [`OffsetModel`] owns the items, the integer scroll offset, and the
//!   selected index, and notifies a single selection listener.
//! - [`ScrollPhysics`] is the drag, fling, and snap-to-row state machine. It
//!   animates through an [`AnimationDriver`] supplied by the host; [`FrameDriver`]
//!   is a deterministic driver for headless use.
//! - [`GestureTracker`] turns raw pointer events into drags, releases with a
//!   velocity estimate, and taps.
//! - [`CurvedRenderer`] plans each frame for a host [`WheelPainter`], with
//!   either the two-tone [`RenderPolicy::Fold`] or the magnifying
//!   [`RenderPolicy::Continuous`] look. [`DisplayList`] records a frame.
//! - [`RecyclingCurvedLayout`] is the alternative consumer for virtualized
//!   lists with rows of any height: it asks a host [`Recycler`] for children as
//!   rows enter the visible arc and hands them back as they leave.
//! - [`WheelView`] ties the custom-drawn pieces together behind one object a
//!   host view can forward its callbacks to.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Insets, Rect};
//! use understory_wheel::{DisplayList, FrameDriver, HeightSpec, WheelConfig, WheelView};
//!
//! let config = WheelConfig::for_density(2.0);
//! let mut wheel = WheelView::new(config, FrameDriver::default()).unwrap();
//! wheel.set_items((1..=12).map(|m| format!("month {m}")).collect());
//! let height = wheel.measure(HeightSpec::Wrap, Insets::ZERO).unwrap();
//!
//! // Animate to the fifth month.
//! wheel.scroll_to_index(4, true, 0);
//! while let Some(fraction) = wheel.driver_mut().next_fraction() {
//!     wheel.tick(fraction);
//! }
//! assert_eq!(wheel.current_data().map(String::as_str), Some("month 5"));
//!
//! // Plan a frame; a real host would replay this into its own canvas.
//! let mut frame = DisplayList::new();
//! wheel.draw(Rect::new(0.0, 0.0, 240.0, height), &mut frame);
//! assert!(frame.rows().any(|row| row.text == "month 5"));
//! ```
//!
//! Configuration errors ([`WheelError`]) surface only from construction and
//! measurement. Everything that happens while scrolling is clamped or ignored
//! instead, and logged through the `log` facade where it is worth knowing about.
//!
//! This crate is `no_std` and uses `alloc`. Enable the `libm` feature instead
//! of the default `std` feature for targets without a standard library.

#![no_std]

extern crate alloc;

mod animation;
mod config;
mod error;
mod frames;
mod geometry;
mod gesture;
mod item;
mod layout;
mod offset;
mod physics;
mod render;
mod view;

pub use animation::{AnimationDriver, AnimationRequest, FrameDriver, Interpolator};
pub use config::{
    Color, FlingPolicy, HeightSpec, OverscrollMode, RenderPolicy, WheelConfig, dp_to_px,
};
pub use error::WheelError;
pub use frames::{FrameMap, RowFrame};
pub use geometry::{
    ALPHA_SATURATION, ArcPlacement, CurveProjection, MAGNIFY_THRESHOLD, MAX_MAGNIFIED_SCALE,
    MIN_SCALE, RowStyle, WheelGeometry, WheelMetrics, continuous_style, project, project_arc,
};
pub use gesture::{Contact, GestureEnd, GestureTracker, PointerId};
pub use item::WheelItem;
pub use layout::{ChildPlacement, Recycler, RecyclingCurvedLayout};
pub use offset::{OffsetModel, SelectionListener};
pub use physics::{FlingTarget, PhysicsState, ScrollPhysics, snap_offset};
pub use render::{CurvedRenderer, DisplayList, DrawCommand, RowPaint, Tone, WheelPainter};
pub use view::WheelView;
