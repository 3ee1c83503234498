// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll offset and selection bookkeeping for a uniform-row wheel.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

/// Single-slot callback invoked with `(index, item)` when the selection changes.
pub type SelectionListener<T> = Box<dyn FnMut(usize, &T)>;

/// Owns the item list, the scroll offset, and the selected index.
///
/// The offset lives in `0..=max_offset()` where
/// `max_offset = (len - 1) * item_height`, and the selected index is always
/// `offset / item_height`. The listener fires only when that index differs
/// from the previously notified one, and when the item list is replaced.
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use understory_wheel::OffsetModel;
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let mut model = OffsetModel::new(60);
/// let sink = seen.clone();
/// model.set_listener(move |index, item: &&str| sink.borrow_mut().push((index, *item)));
///
/// model.set_items(vec!["A", "B", "C"]);
/// model.set_offset(60);
/// model.set_offset(60);
/// assert_eq!(model.current_data(), Some(&"B"));
/// assert_eq!(*seen.borrow(), [(0, "A"), (1, "B")]);
/// ```
pub struct OffsetModel<T> {
    items: Vec<T>,
    item_height: i32,
    offset: i32,
    index: usize,
    overscroll: i32,
    listener: Option<SelectionListener<T>>,
    needs_redraw: bool,
}

impl<T: fmt::Debug> fmt::Debug for OffsetModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OffsetModel")
            .field("items", &self.items)
            .field("item_height", &self.item_height)
            .field("offset", &self.offset)
            .field("index", &self.index)
            .field("overscroll", &self.overscroll)
            .field("has_listener", &self.listener.is_some())
            .field("needs_redraw", &self.needs_redraw)
            .finish()
    }
}

impl<T> OffsetModel<T> {
    /// Creates an empty model with the given row height.
    ///
    /// Row heights come out of measurement, which already rejects
    /// non-positive values; anything below one pixel is raised to one here.
    #[must_use]
    pub fn new(item_height: i32) -> Self {
        debug_assert!(item_height > 0, "item height must be positive");
        Self {
            items: Vec::new(),
            item_height: item_height.max(1),
            offset: 0,
            index: 0,
            overscroll: 0,
            listener: None,
            needs_redraw: true,
        }
    }

    /// Installs the selection listener, replacing any previous one.
    pub fn set_listener(&mut self, listener: impl FnMut(usize, &T) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Removes the selection listener.
    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    /// Replaces the items and resets the selection to the first one.
    ///
    /// The listener is notified with `(0, items[0])` even though the index
    /// may already have been `0`; nothing is notified for an empty list.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.offset = 0;
        self.index = 0;
        self.overscroll = 0;
        self.needs_redraw = true;
        self.notify();
    }

    /// The items, in wheel order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Flat row height.
    #[must_use]
    pub const fn item_height(&self) -> i32 {
        self.item_height
    }

    /// Changes the row height after a re-measure, keeping the selected index.
    pub fn set_item_height(&mut self, item_height: i32) {
        debug_assert!(item_height > 0, "item height must be positive");
        let item_height = item_height.max(1);
        if item_height == self.item_height {
            return;
        }
        self.item_height = item_height;
        self.offset = self.offset_for_index(self.index);
        self.overscroll = 0;
        self.needs_redraw = true;
    }

    /// Largest valid offset, `(len - 1) * item_height`, or `0` when empty.
    #[must_use]
    pub fn max_offset(&self) -> i32 {
        let last = i32::try_from(self.items.len().saturating_sub(1)).unwrap_or(i32::MAX);
        last.saturating_mul(self.item_height)
    }

    /// Current scroll offset.
    #[must_use]
    pub const fn offset(&self) -> i32 {
        self.offset
    }

    /// Currently selected index; `0` when empty.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// How far into the selected row the wheel has scrolled.
    #[must_use]
    pub const fn item_offset(&self) -> i32 {
        self.offset % self.item_height
    }

    /// Transient rubber-band distance past either end; negative above the first row.
    #[must_use]
    pub const fn overscroll(&self) -> i32 {
        self.overscroll
    }

    /// The selected item, or `None` when there are no items.
    #[must_use]
    pub fn current_data(&self) -> Option<&T> {
        self.items.get(self.index)
    }

    /// Index selected at `offset`, after clamping it to the valid range.
    #[must_use]
    pub fn index_for_offset(&self, offset: i32) -> usize {
        let clamped = offset.clamp(0, self.max_offset());
        let index = usize::try_from(clamped / self.item_height).unwrap_or(0);
        index.min(self.items.len().saturating_sub(1))
    }

    /// Offset at which `index` is selected and at rest, after clamping the index.
    #[must_use]
    pub fn offset_for_index(&self, index: usize) -> i32 {
        let index = index.min(self.items.len().saturating_sub(1));
        i32::try_from(index)
            .unwrap_or(i32::MAX)
            .saturating_mul(self.item_height)
    }

    /// Sets the offset, clamped to `0..=max_offset()`.
    ///
    /// Returns `true` if the selected index changed, in which case the
    /// listener has been notified.
    pub fn set_offset(&mut self, raw: i32) -> bool {
        let clamped = raw.clamp(0, self.max_offset());
        if clamped != self.offset {
            self.offset = clamped;
            self.needs_redraw = true;
        }
        let index = self.index_for_offset(clamped);
        if index == self.index {
            return false;
        }
        log::trace!("wheel selection {} -> {}", self.index, index);
        self.index = index;
        self.notify();
        true
    }

    /// Moves the offset by `delta`, clamped, and returns the distance actually travelled.
    pub fn scroll_by(&mut self, delta: i32) -> i32 {
        let before = self.offset;
        self.set_offset(before.saturating_add(delta));
        self.offset - before
    }

    /// Applies a drag delta.
    ///
    /// With `overscroll_limit == None` the offset is hard-clamped. Otherwise the
    /// part of the drag that falls past either end is kept as a rubber-band
    /// residual of at most `overscroll_limit`, and dragging back consumes that
    /// residual before the offset moves again.
    pub fn drag_by(&mut self, delta: i32, overscroll_limit: Option<i32>) {
        let target = self
            .offset
            .saturating_add(self.overscroll)
            .saturating_add(delta);
        let clamped = target.clamp(0, self.max_offset());
        let overscroll = match overscroll_limit {
            Some(limit) => target.saturating_sub(clamped).clamp(-limit, limit),
            None => 0,
        };
        if overscroll != self.overscroll {
            self.overscroll = overscroll;
            self.needs_redraw = true;
        }
        self.set_offset(clamped);
    }

    /// Drops the rubber-band residual and returns what it was.
    pub fn release_overscroll(&mut self) -> i32 {
        let residual = core::mem::take(&mut self.overscroll);
        if residual != 0 {
            self.needs_redraw = true;
        }
        residual
    }

    /// Item shown in row slot `slot` of a window of `visible_item_count` rows.
    ///
    /// The selected item sits in slot `visible_item_count / 2`.
    #[must_use]
    pub fn item_at_slot(&self, slot: usize, visible_item_count: usize) -> Option<(usize, &T)> {
        let index = (slot + self.index).checked_sub(visible_item_count / 2)?;
        self.items.get(index).map(|item| (index, item))
    }

    /// Returns whether the offset changed since the last call, and clears the flag.
    pub fn take_redraw_request(&mut self) -> bool {
        core::mem::take(&mut self.needs_redraw)
    }

    fn notify(&mut self) {
        if let (Some(listener), Some(item)) = (self.listener.as_mut(), self.items.get(self.index)) {
            listener(self.index, item);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::OffsetModel;

    type Log = Rc<RefCell<Vec<(usize, &'static str)>>>;

    fn model(item_height: i32, items: &[&'static str]) -> (OffsetModel<&'static str>, Log) {
        let log: Log = Rc::default();
        let mut model = OffsetModel::new(item_height);
        let sink = log.clone();
        model.set_listener(move |index, item| sink.borrow_mut().push((index, *item)));
        model.set_items(items.to_vec());
        (model, log)
    }

    #[test]
    fn set_items_notifies_first_item_even_when_index_is_unchanged() {
        let (mut model, log) = model(60, &["A", "B", "C"]);
        assert_eq!(*log.borrow(), vec![(0, "A")]);
        model.set_offset(120);
        model.set_items(vec!["X", "Y"]);
        assert_eq!(model.offset(), 0);
        assert_eq!(model.index(), 0);
        assert_eq!(*log.borrow(), vec![(0, "A"), (2, "C"), (0, "X")]);
    }

    #[test]
    fn set_offset_selects_and_notifies_once() {
        let (mut model, log) = model(60, &["A", "B", "C"]);
        log.borrow_mut().clear();
        assert!(model.set_offset(60));
        assert!(!model.set_offset(60));
        assert_eq!(model.index(), 1);
        assert_eq!(model.current_data(), Some(&"B"));
        assert_eq!(*log.borrow(), vec![(1, "B")]);
    }

    #[test]
    fn offsets_clamp_to_valid_range() {
        let (mut model, _) = model(60, &["A", "B", "C"]);
        model.set_offset(-500);
        assert_eq!(model.offset(), 0);
        model.set_offset(10_000);
        assert_eq!(model.offset(), 120);
        assert_eq!(model.index(), 2);
        assert_eq!(model.scroll_by(-70), -70);
        assert_eq!(model.offset(), 50);
        assert_eq!(model.item_offset(), 50);
        assert_eq!(model.scroll_by(-100), -50);
    }

    #[test]
    fn single_item_never_moves() {
        let (mut model, log) = model(100, &["only"]);
        assert_eq!(model.max_offset(), 0);
        for raw in [-10, 0, 1, 99, 100, 1_000] {
            model.set_offset(raw);
            assert_eq!((model.offset(), model.index()), (0, 0));
        }
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn empty_items_have_no_selection_and_no_notification() {
        let (mut model, log) = model(60, &[]);
        assert!(log.borrow().is_empty());
        assert_eq!(model.current_data(), None);
        model.set_offset(200);
        assert_eq!(model.offset(), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn index_and_offset_conversions_bracket_each_offset() {
        let (model, _) = model(45, &["a", "b", "c", "d", "e"]);
        for offset in 0..model.max_offset() {
            let index = model.index_for_offset(offset);
            assert_eq!(index, usize::try_from(offset / 45).unwrap());
            assert!(model.offset_for_index(index) <= offset);
            assert!(offset < model.offset_for_index(index + 1));
        }
        assert_eq!(model.index_for_offset(-1), 0);
        assert_eq!(model.index_for_offset(i32::MAX), 4);
        assert_eq!(model.offset_for_index(99), 180);
    }

    #[test]
    fn drag_keeps_bounded_rubber_band_residual() {
        let (mut model, _) = model(60, &["A", "B", "C"]);
        model.drag_by(-30, Some(20));
        assert_eq!((model.offset(), model.overscroll()), (0, -20));
        // Dragging back first consumes the residual.
        model.drag_by(25, Some(20));
        assert_eq!((model.offset(), model.overscroll()), (5, 0));

        model.drag_by(200, Some(20));
        assert_eq!((model.offset(), model.overscroll()), (120, 20));
        assert_eq!(model.release_overscroll(), 20);
        assert_eq!(model.overscroll(), 0);

        model.drag_by(50, None);
        assert_eq!((model.offset(), model.overscroll()), (120, 0));
    }

    #[test]
    fn slots_map_around_the_selected_item() {
        let (mut model, _) = model(60, &["A", "B", "C"]);
        assert_eq!(model.item_at_slot(2, 7), None);
        assert_eq!(model.item_at_slot(3, 7), Some((0, &"A")));
        assert_eq!(model.item_at_slot(5, 7), Some((2, &"C")));
        assert_eq!(model.item_at_slot(6, 7), None);
        model.set_offset(60);
        assert_eq!(model.item_at_slot(2, 7), Some((0, &"A")));
    }

    #[test]
    fn item_height_change_keeps_selection() {
        let (mut model, log) = model(60, &["A", "B", "C"]);
        model.set_offset(130);
        model.set_item_height(40);
        assert_eq!((model.offset(), model.index()), (80, 2));
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn redraw_requests_track_offset_changes() {
        let (mut model, _) = model(60, &["A", "B"]);
        assert!(model.take_redraw_request());
        assert!(!model.take_redraw_request());
        model.set_offset(0);
        assert!(!model.take_redraw_request());
        model.set_offset(10);
        assert!(model.take_redraw_request());
    }
}
