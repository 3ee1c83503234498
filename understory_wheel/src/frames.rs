// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cumulative row frames for wheels whose rows may differ in height.

use alloc::vec::Vec;
use core::ops::Range;

/// Flat extent of one row along the unrolled wheel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowFrame {
    /// Item index.
    pub index: usize,
    /// Distance from the start of the first row to the top of this row.
    pub top: f64,
    /// Distance from the start of the first row to the bottom of this row.
    pub bottom: f64,
}

impl RowFrame {
    /// Row height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Vertical midpoint of the row.
    #[must_use]
    pub fn mid(&self) -> f64 {
        (self.top + self.bottom) / 2.0
    }
}

/// Index-to-frame mapping, rebuilt wholesale whenever item count or sizes change.
///
/// Frames are laid end to end starting at `0.0`, so lookups by offset can
/// binary search instead of scanning.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameMap {
    frames: Vec<RowFrame>,
}

impl FrameMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every frame from a sequence of measured heights.
    ///
    /// Negative heights are treated as zero.
    pub fn rebuild<I>(&mut self, heights: I)
    where
        I: IntoIterator<Item = f64>,
    {
        self.frames.clear();
        let mut top = 0.0;
        for (index, height) in heights.into_iter().enumerate() {
            debug_assert!(height.is_finite(), "row heights must be finite; got {height}");
            let height = if height.is_sign_negative() { 0.0 } else { height };
            self.frames.push(RowFrame {
                index,
                top,
                bottom: top + height,
            });
            top += height;
        }
    }

    /// Drops every frame.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if there are no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame of `index`, if it exists.
    #[must_use]
    pub fn frame(&self, index: usize) -> Option<&RowFrame> {
        self.frames.get(index)
    }

    /// All frames in index order.
    #[must_use]
    pub fn frames(&self) -> &[RowFrame] {
        &self.frames
    }

    /// Sum of every row height.
    #[must_use]
    pub fn total_height(&self) -> f64 {
        self.frames.last().map_or(0.0, |f| f.bottom)
    }

    /// Index of the row containing `offset`.
    ///
    /// Offsets before the first row map to the first index and offsets past
    /// the last row map to the last index. Returns `0` when empty.
    #[must_use]
    pub fn index_for_offset(&self, offset: f64) -> usize {
        let past = self.frames.partition_point(|f| f.top <= offset);
        past.saturating_sub(1)
    }

    /// Midpoint of the frame for `index`, after clamping it to the valid range.
    ///
    /// Returns `0.0` when empty.
    #[must_use]
    pub fn offset_for_index(&self, index: usize) -> f64 {
        let index = index.min(self.frames.len().saturating_sub(1));
        self.frames.get(index).map_or(0.0, RowFrame::mid)
    }

    /// Indices of rows that strictly intersect `start..end`.
    ///
    /// A row that only touches the window at an edge is not included.
    #[must_use]
    pub fn visible_range(&self, start: f64, end: f64) -> Range<usize> {
        let first = self.frames.partition_point(|f| f.bottom <= start);
        let last = self.frames.partition_point(|f| f.top < end);
        first..last.max(first)
    }
}

#[cfg(test)]
mod tests {
    use super::FrameMap;

    fn map(heights: &[f64]) -> FrameMap {
        let mut map = FrameMap::new();
        map.rebuild(heights.iter().copied());
        map
    }

    #[test]
    fn frames_accumulate() {
        let m = map(&[10.0, 20.0, -5.0, 30.0]);
        assert_eq!(m.len(), 4);
        let f = m.frame(1).unwrap();
        assert_eq!((f.top, f.bottom, f.height()), (10.0, 30.0, 20.0));
        assert_eq!(m.frame(2).unwrap().height(), 0.0);
        assert_eq!(m.total_height(), 60.0);
    }

    #[test]
    fn index_lookup_clamps_at_both_ends() {
        let m = map(&[10.0, 20.0, 30.0]);
        assert_eq!(m.index_for_offset(-100.0), 0);
        assert_eq!(m.index_for_offset(0.0), 0);
        assert_eq!(m.index_for_offset(9.9), 0);
        assert_eq!(m.index_for_offset(10.0), 1);
        assert_eq!(m.index_for_offset(59.0), 2);
        assert_eq!(m.index_for_offset(1_000.0), 2);
        assert_eq!(FrameMap::new().index_for_offset(5.0), 0);
    }

    #[test]
    fn midpoints_round_trip() {
        let m = map(&[10.0, 20.0, 30.0, 5.0]);
        for index in 0..m.len() {
            let mid = m.offset_for_index(index);
            assert_eq!(m.index_for_offset(mid), index);
            assert_eq!(m.offset_for_index(m.index_for_offset(mid)), mid);
        }
        assert_eq!(m.offset_for_index(99), 62.5);
    }

    #[test]
    fn visible_range_uses_strict_intersection() {
        let m = map(&[10.0, 10.0, 10.0, 10.0]);
        assert_eq!(m.visible_range(10.0, 20.0), 1..2);
        assert_eq!(m.visible_range(5.0, 25.0), 0..3);
        assert_eq!(m.visible_range(-30.0, 0.0), 0..0);
        assert_eq!(m.visible_range(40.0, 90.0), 4..4);
        assert_eq!(m.visible_range(-5.0, 100.0), 0..4);
    }
}
