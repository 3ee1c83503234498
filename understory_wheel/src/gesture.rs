// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer tracking for a wheel: touch slop, active-pointer hand-off, taps, and release velocity.
//!
//! The tracker turns raw pointer events into the few things the scroll state
//! machine cares about:
//!
//! - a drag delta in offset space, once the active pointer has moved past the touch slop;
//! - a release with an estimated vertical velocity when the last pointer lifts after a drag;
//! - a tap when the last pointer lifts without ever dragging.
//!
//! ## Usage
//!
//! ```
//! use understory_wheel::{GestureEnd, GestureTracker};
//! use kurbo::Point;
//!
//! let mut tracker = GestureTracker::new(8.0);
//! tracker.on_down(None, Point::new(0.0, 100.0), 0);
//!
//! // Within the slop: no drag yet.
//! assert_eq!(tracker.on_move(None, Point::new(0.0, 95.0), 10), None);
//!
//! // Past the slop: the slop itself is not part of the drag.
//! assert_eq!(tracker.on_move(None, Point::new(0.0, 80.0), 20), Some(12.0));
//!
//! assert!(matches!(
//!     tracker.on_up(None, Point::new(0.0, 80.0), 30),
//!     GestureEnd::Release { .. }
//! ));
//! ```
//!
//! ## Multiple pointers
//!
//! A new pointer going down takes over the drag. When the active pointer lifts
//! while others are still down, the lowest remaining pointer id takes over from
//! its own last position, so the wheel does not jump.

use alloc::collections::BTreeMap;
use core::num::NonZeroU64;

use kurbo::Point;
use smallvec::SmallVec;

/// Pointer identifier for tracking multiple concurrent contacts.
pub type PointerId = NonZeroU64;

/// Pointer used when the host does not distinguish pointers.
const PRIMARY: PointerId = NonZeroU64::MIN;

/// Samples older than this are ignored when estimating release velocity.
const VELOCITY_WINDOW_MS: u64 = 100;

/// State for a pointer that is currently down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    /// Position at pointer down.
    pub down_position: Point,
    /// Timestamp of pointer down, in milliseconds.
    pub down_time: u64,
    /// Most recent vertical position.
    pub last_y: f64,
}

/// What lifting a pointer means for the wheel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEnd {
    /// Other pointers are still down; the gesture continues.
    Continue,
    /// The last pointer lifted after a drag. `velocity` is in px/s, positive
    /// when the pointer was moving down the screen.
    Release {
        /// Estimated vertical pointer velocity.
        velocity: f64,
    },
    /// The last pointer lifted without dragging.
    Tap(Point),
    /// The pointer was not being tracked.
    Ignored,
}

/// Touch-slop and multi-pointer aware drag recognizer.
#[derive(Clone, Debug)]
pub struct GestureTracker {
    contacts: BTreeMap<PointerId, Contact>,
    active: Option<PointerId>,
    dragging: bool,
    /// Distance the active pointer must travel before a drag starts.
    pub touch_slop: f64,
    samples: SmallVec<[(u64, f64); 8]>,
}

impl GestureTracker {
    /// Creates a tracker with the given touch slop.
    pub fn new(touch_slop: f64) -> Self {
        Self {
            contacts: BTreeMap::new(),
            active: None,
            dragging: false,
            touch_slop: touch_slop.max(0.0),
            samples: SmallVec::new(),
        }
    }

    /// Whether any pointer is down.
    pub fn is_active(&self) -> bool {
        !self.contacts.is_empty()
    }

    /// Whether the current gesture has turned into a drag.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Pointer whose motion drives the drag.
    pub fn active_pointer(&self) -> Option<PointerId> {
        self.active
    }

    /// State of a tracked pointer.
    pub fn contact(&self, pointer_id: PointerId) -> Option<&Contact> {
        self.contacts.get(&pointer_id)
    }

    /// Records a pointer down.
    ///
    /// Returns `true` if this starts a new gesture, i.e. no other pointer was down.
    /// The new pointer becomes the active one either way.
    pub fn on_down(
        &mut self,
        pointer_id: Option<PointerId>,
        position: Point,
        timestamp: u64,
    ) -> bool {
        let pointer_id = pointer_id.unwrap_or(PRIMARY);
        let first = self.contacts.is_empty();
        if first {
            self.dragging = false;
        }
        self.contacts.insert(
            pointer_id,
            Contact {
                down_position: position,
                down_time: timestamp,
                last_y: position.y,
            },
        );
        self.activate(pointer_id, timestamp);
        first
    }

    /// Records a pointer move.
    ///
    /// Returns the drag delta in offset space (positive when the pointer moves
    /// up, which scrolls toward later rows), or `None` if the move does not
    /// drive the wheel: it came from an inactive pointer, or the gesture is
    /// still within the touch slop.
    pub fn on_move(
        &mut self,
        pointer_id: Option<PointerId>,
        position: Point,
        timestamp: u64,
    ) -> Option<f64> {
        let pointer_id = pointer_id.unwrap_or(PRIMARY);
        let Some(contact) = self.contacts.get_mut(&pointer_id) else {
            log::warn!("move for untracked pointer {pointer_id} ignored");
            return None;
        };
        if self.active != Some(pointer_id) {
            contact.last_y = position.y;
            return None;
        }
        let mut delta = contact.last_y - position.y;
        if !self.dragging {
            if delta.abs() <= self.touch_slop {
                return None;
            }
            self.dragging = true;
            delta -= self.touch_slop.copysign(delta);
            log::debug!("wheel drag started by pointer {pointer_id}");
        }
        contact.last_y = position.y;
        self.record(timestamp, position.y);
        Some(delta)
    }

    /// Records a pointer up and reports what it means for the gesture.
    pub fn on_up(
        &mut self,
        pointer_id: Option<PointerId>,
        position: Point,
        timestamp: u64,
    ) -> GestureEnd {
        let pointer_id = pointer_id.unwrap_or(PRIMARY);
        if self.contacts.remove(&pointer_id).is_none() {
            log::warn!("up for untracked pointer {pointer_id} ignored");
            return GestureEnd::Ignored;
        }
        let was_active = self.active == Some(pointer_id);
        if let Some((&next, _)) = self.contacts.first_key_value() {
            if was_active {
                self.activate(next, timestamp);
            }
            return GestureEnd::Continue;
        }
        self.active = None;
        if core::mem::take(&mut self.dragging) {
            if was_active {
                self.record(timestamp, position.y);
            }
            let velocity = self.velocity();
            self.samples.clear();
            GestureEnd::Release { velocity }
        } else {
            self.samples.clear();
            GestureEnd::Tap(position)
        }
    }

    /// Forgets every pointer. Returns `true` if a drag was in progress.
    pub fn cancel(&mut self) -> bool {
        self.contacts.clear();
        self.active = None;
        self.samples.clear();
        core::mem::take(&mut self.dragging)
    }

    fn activate(&mut self, pointer_id: PointerId, timestamp: u64) {
        self.active = Some(pointer_id);
        self.samples.clear();
        if let Some(contact) = self.contacts.get(&pointer_id) {
            self.samples.push((timestamp, contact.last_y));
        }
    }

    fn record(&mut self, timestamp: u64, y: f64) {
        if self.samples.len() == self.samples.inline_size() {
            self.samples.remove(0);
        }
        self.samples.push((timestamp, y));
    }

    /// Vertical velocity over the most recent samples, in px/s.
    fn velocity(&self) -> f64 {
        let Some(&(last_time, last_y)) = self.samples.last() else {
            return 0.0;
        };
        let cutoff = last_time.saturating_sub(VELOCITY_WINDOW_MS);
        let Some(&(first_time, first_y)) = self.samples.iter().find(|(time, _)| *time >= cutoff)
        else {
            return 0.0;
        };
        let elapsed = last_time.saturating_sub(first_time);
        if elapsed == 0 {
            return 0.0;
        }
        (last_y - first_y) / elapsed as f64 * 1000.0
    }
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new(8.0)
    }
}

#[cfg(test)]
mod tests {
    use core::num::NonZeroU64;

    use kurbo::Point;

    use super::{GestureEnd, GestureTracker, PointerId};

    fn id(n: u64) -> Option<PointerId> {
        NonZeroU64::new(n)
    }

    fn at(y: f64) -> Point {
        Point::new(10.0, y)
    }

    #[test]
    fn slop_is_consumed_once() {
        let mut t = GestureTracker::new(8.0);
        assert!(t.on_down(None, at(100.0), 0));
        assert_eq!(t.on_move(None, at(104.0), 5), None);
        assert!(!t.is_dragging());
        // Downward past the slop scrolls toward earlier rows.
        assert_eq!(t.on_move(None, at(110.0), 10), Some(-2.0));
        assert!(t.is_dragging());
        assert_eq!(t.on_move(None, at(115.0), 15), Some(-5.0));
    }

    #[test]
    fn lift_without_drag_is_a_tap() {
        let mut t = GestureTracker::new(8.0);
        t.on_down(None, at(50.0), 0);
        t.on_move(None, at(53.0), 10);
        assert_eq!(t.on_up(None, at(53.0), 20), GestureEnd::Tap(at(53.0)));
        assert!(!t.is_active());
    }

    #[test]
    fn release_reports_recent_velocity() {
        let mut t = GestureTracker::new(0.0);
        t.on_down(None, at(300.0), 0);
        for step in 1..=10_u32 {
            t.on_move(None, at(300.0 - 10.0 * f64::from(step)), u64::from(step) * 10);
        }
        let GestureEnd::Release { velocity } = t.on_up(None, at(200.0), 100) else {
            panic!("expected a release");
        };
        // 10px every 10ms, moving up the screen.
        assert!((velocity + 1000.0).abs() < 1e-9, "velocity was {velocity}");
        assert!(!t.is_dragging());
    }

    #[test]
    fn stationary_release_has_no_velocity() {
        let mut t = GestureTracker::new(0.0);
        t.on_down(None, at(0.0), 0);
        t.on_move(None, at(30.0), 10);
        let end = t.on_up(None, at(30.0), 500);
        assert_eq!(end, GestureEnd::Release { velocity: 0.0 });
    }

    #[test]
    fn second_pointer_takes_over_and_hands_back() {
        let mut t = GestureTracker::new(0.0);
        t.on_down(id(1), at(100.0), 0);
        assert_eq!(t.on_move(id(1), at(90.0), 10), Some(10.0));

        assert!(!t.on_down(id(2), at(300.0), 20));
        assert_eq!(t.active_pointer(), id(2));
        // The old pointer no longer drives the wheel.
        assert_eq!(t.on_move(id(1), at(80.0), 30), None);
        assert_eq!(t.on_move(id(2), at(290.0), 30), Some(10.0));

        // Lifting the active pointer hands the drag back without a jump.
        assert_eq!(t.on_up(id(2), at(290.0), 40), GestureEnd::Continue);
        assert_eq!(t.active_pointer(), id(1));
        assert_eq!(t.on_move(id(1), at(75.0), 50), Some(5.0));
        assert!(matches!(t.on_up(id(1), at(75.0), 60), GestureEnd::Release { .. }));
    }

    #[test]
    fn untracked_pointers_are_ignored() {
        let mut t = GestureTracker::default();
        assert_eq!(t.on_move(id(7), at(0.0), 0), None);
        assert_eq!(t.on_up(id(7), at(0.0), 0), GestureEnd::Ignored);
    }

    #[test]
    fn cancel_forgets_everything() {
        let mut t = GestureTracker::new(0.0);
        t.on_down(None, at(0.0), 0);
        t.on_move(None, at(20.0), 10);
        assert!(t.cancel());
        assert!(!t.is_active());
        assert_eq!(t.on_up(None, at(20.0), 20), GestureEnd::Ignored);
    }
}
