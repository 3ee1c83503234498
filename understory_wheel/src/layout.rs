// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A recycling layout that bends a virtualized list onto the wheel cylinder.
//!
//! Rows are laid end to end on an unrolled strip (a [`FrameMap`]). The display
//! window is a stretch of that strip as long as a quarter turn in each
//! direction from the center line, `curve_space = vertical_space·π/2`. Every
//! row intersecting the window gets a live child from the host's [`Recycler`],
//! positioned by mapping its distance from the window's midpoint through
//! [`project_arc`] and styled by [`continuous_style`]. Rows leaving the window
//! are handed back.
//!
//! Unlike the custom-drawn wheel, scrolling here is bounded by index: the
//! window can travel from the first row's resting offset to the last row's,
//! and never past either.

use alloc::vec::Vec;
use core::f64::consts::PI;

use hashbrown::HashMap;

use crate::{FrameMap, continuous_style, project_arc};

/// Where and how to show one live child, relative to the top of the content box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChildPlacement {
    /// Item index.
    pub index: usize,
    /// Top edge of the child's unscaled box.
    pub top: f64,
    /// Bottom edge of the child's unscaled box.
    pub bottom: f64,
    /// Vertical scale to apply around the box center.
    pub scale_y: f64,
    /// Opacity.
    pub alpha: f64,
}

/// Child provisioning service supplied by the host.
///
/// The layout decides which indices need children; pooling and creation of
/// the underlying widgets stay with the host.
pub trait Recycler {
    /// Host-side handle to a live child.
    type Handle;

    /// Measures the height of item `index`.
    fn measure(&mut self, index: usize) -> f64;
    /// Provides a child showing item `index`.
    fn acquire(&mut self, index: usize) -> Self::Handle;
    /// Applies a placement to a live child.
    fn position(&mut self, handle: &mut Self::Handle, placement: &ChildPlacement);
    /// Takes back a child that left the display window.
    fn release(&mut self, handle: Self::Handle);
}

/// Curved layout over a virtualized list with rows of any height.
#[derive(Debug)]
pub struct RecyclingCurvedLayout<H> {
    frames: FrameMap,
    live: HashMap<usize, H>,
    scroll_offset: f64,
    vertical_space: f64,
    curve_space: f64,
}

impl<H> Default for RecyclingCurvedLayout<H> {
    fn default() -> Self {
        Self {
            frames: FrameMap::new(),
            live: HashMap::new(),
            scroll_offset: 0.0,
            vertical_space: 0.0,
            curve_space: 0.0,
        }
    }
}

impl<H> RecyclingCurvedLayout<H> {
    /// Creates a layout that has not been laid out yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames from the last full layout.
    #[must_use]
    pub fn frames(&self) -> &FrameMap {
        &self.frames
    }

    /// Start of the display window along the unrolled strip.
    #[must_use]
    pub const fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Length of the display window, `vertical_space·π/2`.
    #[must_use]
    pub const fn curve_space(&self) -> f64 {
        self.curve_space
    }

    /// Distance from the window start to the first row when it rests on the
    /// center line: a quarter of the cylinder's circumference minus half the
    /// first row.
    #[must_use]
    pub fn base_offset(&self) -> f64 {
        -self.resting_offset(0)
    }

    /// Scroll offset at which row `index` (clamped) rests on the center line.
    #[must_use]
    pub fn resting_offset(&self, index: usize) -> f64 {
        self.frames.offset_for_index(index) - self.curve_space / 2.0
    }

    /// Row under the center line, or `None` before the first layout.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        if self.frames.is_empty() {
            return None;
        }
        Some(
            self.frames
                .index_for_offset(self.scroll_offset + self.curve_space / 2.0),
        )
    }

    /// Scroll delta that would bring the row under the center line to rest.
    #[must_use]
    pub fn snap_delta(&self) -> f64 {
        self.selected_index()
            .map_or(0.0, |index| self.resting_offset(index) - self.scroll_offset)
    }

    /// Indices that currently have a live child, ascending.
    #[must_use]
    pub fn live_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.live.keys().copied().collect();
        indices.sort_unstable();
        indices
    }

    /// Direction toward `target` for a host's programmatic smooth scroll:
    /// `-1.0` if it precedes the first live child, `1.0` otherwise, and `None`
    /// when there are no live children.
    #[must_use]
    pub fn compute_scroll_vector_for_position(&self, target: usize) -> Option<f64> {
        let first = self.live.keys().copied().min()?;
        Some(if target < first { -1.0 } else { 1.0 })
    }

    /// Full layout pass: measures every item, rebuilds the frames, and shows
    /// the window with `target_index` (clamped) resting on the center line.
    ///
    /// With zero items every live child is released and nothing is laid out.
    pub fn layout<R: Recycler<Handle = H>>(
        &mut self,
        recycler: &mut R,
        item_count: usize,
        vertical_space: f64,
        target_index: usize,
    ) {
        self.release_all(recycler);
        if item_count == 0 {
            self.frames.clear();
            self.scroll_offset = 0.0;
            return;
        }
        self.frames
            .rebuild((0..item_count).map(|index| recycler.measure(index)));
        self.vertical_space = vertical_space.max(0.0);
        self.curve_space = self.vertical_space * PI / 2.0;
        self.scroll_offset = self.resting_offset(target_index);
        self.recycle_and_fill(recycler);
        log::debug!(
            "wheel layout: {item_count} rows, {} live around row {}",
            self.live.len(),
            target_index.min(item_count - 1)
        );
    }

    /// Scrolls by `delta`, bounded by the first and last resting offsets.
    ///
    /// Returns the distance actually travelled; `0.0` before the first layout.
    pub fn scroll_by<R: Recycler<Handle = H>>(&mut self, recycler: &mut R, delta: f64) -> f64 {
        if self.frames.is_empty() {
            return 0.0;
        }
        let min = self.resting_offset(0);
        let max = self.resting_offset(self.frames.len() - 1);
        let target = (self.scroll_offset + delta).clamp(min, max);
        let travel = target - self.scroll_offset;
        self.scroll_offset = target;
        self.recycle_and_fill(recycler);
        travel
    }

    /// Jumps so row `index` (clamped) rests on the center line, returning the travel.
    pub fn scroll_to_index<R: Recycler<Handle = H>>(
        &mut self,
        recycler: &mut R,
        index: usize,
    ) -> f64 {
        let delta = self.resting_offset(index) - self.scroll_offset;
        self.scroll_by(recycler, delta)
    }

    /// Releases every live child.
    pub fn release_all<R: Recycler<Handle = H>>(&mut self, recycler: &mut R) {
        for (_, handle) in self.live.drain() {
            recycler.release(handle);
        }
    }

    fn recycle_and_fill<R: Recycler<Handle = H>>(&mut self, recycler: &mut R) {
        let start = self.scroll_offset;
        let range = self.frames.visible_range(start, start + self.curve_space);
        for (_, handle) in self.live.extract_if(|index, _| !range.contains(index)) {
            recycler.release(handle);
        }
        for index in range {
            let Some(placement) = self.place(index) else {
                continue;
            };
            let handle = self
                .live
                .entry(index)
                .or_insert_with(|| recycler.acquire(index));
            recycler.position(handle, &placement);
        }
        log::trace!(
            "wheel window at {:.1}: {} live",
            self.scroll_offset,
            self.live.len()
        );
    }

    fn place(&self, index: usize) -> Option<ChildPlacement> {
        let frame = self.frames.frame(index)?;
        let radius = self.vertical_space / 2.0;
        if radius <= 0.0 {
            return None;
        }
        let display_mid = self.scroll_offset + self.curve_space / 2.0;
        let arc = project_arc(display_mid - frame.mid(), radius);
        let style = continuous_style(arc.scale_rate);
        let half = frame.height() / 2.0;
        Some(ChildPlacement {
            index,
            top: arc.center_y - half,
            bottom: arc.center_y + half,
            scale_y: style.scale,
            alpha: style.alpha,
        })
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;
    use core::f64::consts::PI;

    use hashbrown::HashMap;

    use super::{ChildPlacement, Recycler, RecyclingCurvedLayout};

    const EPS: f64 = 1e-9;

    #[derive(Debug, Default)]
    struct Pool {
        heights: Vec<f64>,
        measured: usize,
        acquired: Vec<usize>,
        released: Vec<usize>,
        placed: HashMap<usize, ChildPlacement>,
    }

    impl Pool {
        fn uniform(len: usize, height: f64) -> Self {
            Self {
                heights: vec![height; len],
                ..Self::default()
            }
        }
    }

    impl Recycler for Pool {
        type Handle = usize;

        fn measure(&mut self, index: usize) -> f64 {
            self.measured += 1;
            self.heights[index]
        }

        fn acquire(&mut self, index: usize) -> usize {
            self.acquired.push(index);
            index
        }

        fn position(&mut self, handle: &mut usize, placement: &ChildPlacement) {
            self.placed.insert(*handle, *placement);
        }

        fn release(&mut self, handle: usize) {
            self.released.push(handle);
            self.placed.remove(&handle);
        }
    }

    fn laid_out(pool: &mut Pool, target: usize) -> RecyclingCurvedLayout<usize> {
        let mut layout = RecyclingCurvedLayout::new();
        let len = pool.heights.len();
        layout.layout(pool, len, 200.0, target);
        layout
    }

    #[test]
    fn layout_rests_target_row_on_the_center_line() {
        let mut pool = Pool::uniform(5, 50.0);
        let layout = laid_out(&mut pool, 0);
        assert_eq!(pool.measured, 5);
        assert!((layout.curve_space() - 100.0 * PI).abs() < EPS);
        assert!((layout.base_offset() - (PI * 200.0 / 4.0 - 25.0)).abs() < EPS);
        assert!((layout.scroll_offset() + layout.base_offset()).abs() < EPS);
        assert_eq!(layout.live_indices(), [0, 1, 2, 3]);
        assert_eq!(layout.selected_index(), Some(0));

        let center = pool.placed[&0];
        assert!((center.top - 75.0).abs() < EPS);
        assert!((center.bottom - 125.0).abs() < EPS);
        assert!((center.scale_y - 1.2).abs() < EPS);
        assert!((center.alpha - 1.0).abs() < EPS);

        let next = pool.placed[&1];
        let expected = (1.0 + 0.5_f64.sin()) * 100.0;
        assert!(((next.top + next.bottom) / 2.0 - expected).abs() < EPS);
        assert!((next.scale_y - 0.5_f64.cos()).abs() < EPS);
        assert!((next.alpha - next.scale_y).abs() < EPS);
    }

    #[test]
    fn scrolling_is_bounded_by_first_and_last_rows() {
        let mut pool = Pool::uniform(5, 50.0);
        let mut layout = laid_out(&mut pool, 0);

        let travel = layout.scroll_by(&mut pool, 1_000.0);
        assert!((travel - 200.0).abs() < EPS);
        assert_eq!(layout.selected_index(), Some(4));
        assert_eq!(layout.live_indices(), [1, 2, 3, 4]);
        assert_eq!(pool.released, [0]);
        assert_eq!(pool.acquired, [0, 1, 2, 3, 4]);

        assert_eq!(layout.scroll_by(&mut pool, 10.0), 0.0);
        let back = layout.scroll_by(&mut pool, -1_000.0);
        assert!((back + 200.0).abs() < EPS);
        assert_eq!(layout.selected_index(), Some(0));
    }

    #[test]
    fn snap_delta_and_scroll_vector() {
        let mut pool = Pool::uniform(5, 50.0);
        let mut layout = laid_out(&mut pool, 0);
        layout.scroll_by(&mut pool, 30.0);
        assert_eq!(layout.selected_index(), Some(1));
        assert!((layout.snap_delta() - 20.0).abs() < 1e-6);

        layout.scroll_to_index(&mut pool, 4);
        assert_eq!(layout.compute_scroll_vector_for_position(0), Some(-1.0));
        assert_eq!(layout.compute_scroll_vector_for_position(3), Some(1.0));
        assert!(layout.snap_delta().abs() < 1e-9);
    }

    #[test]
    fn heterogeneous_rows_center_on_their_midpoints() {
        let mut pool = Pool {
            heights: vec![20.0, 80.0, 40.0],
            ..Pool::default()
        };
        let layout = laid_out(&mut pool, 1);
        assert!((layout.resting_offset(1) - (60.0 - 50.0 * PI)).abs() < EPS);
        let center = pool.placed[&1];
        assert!((center.bottom - center.top - 80.0).abs() < EPS);
        assert!(((center.top + center.bottom) / 2.0 - 100.0).abs() < EPS);
        assert_eq!(layout.resting_offset(9), layout.resting_offset(2));
    }

    #[test]
    fn empty_and_unlaid_layouts_do_nothing() {
        let mut pool = Pool::uniform(3, 50.0);
        let mut layout: RecyclingCurvedLayout<usize> = RecyclingCurvedLayout::new();
        assert_eq!(layout.scroll_by(&mut pool, 40.0), 0.0);
        assert_eq!(layout.selected_index(), None);
        assert_eq!(layout.compute_scroll_vector_for_position(2), None);

        layout.layout(&mut pool, 3, 200.0, 0);
        assert!(!layout.live_indices().is_empty());
        layout.layout(&mut pool, 0, 200.0, 0);
        assert!(layout.live_indices().is_empty());
        assert!(pool.placed.is_empty());
        assert_eq!(layout.scroll_by(&mut pool, 40.0), 0.0);
    }
}
