// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The custom-drawn wheel: one object a host view can forward its callbacks to.

use alloc::vec::Vec;

use kurbo::{Insets, Point, Rect};

use crate::{
    AnimationDriver, CurvedRenderer, GestureEnd, GestureTracker, HeightSpec, OffsetModel,
    PhysicsState, PointerId, ScrollPhysics, WheelConfig, WheelError, WheelGeometry, WheelItem,
    WheelMetrics, WheelPainter,
};

/// A custom-drawn wheel picker.
///
/// Owns the item list and selection ([`OffsetModel`]), the scroll state
/// machine ([`ScrollPhysics`]), pointer tracking ([`GestureTracker`]), and
/// paint planning ([`CurvedRenderer`]). The host supplies measurement
/// constraints, pointer events, animation ticks through its
/// [`AnimationDriver`], and a [`WheelPainter`].
///
/// Pointer positions and paint bounds are in the view's own coordinate space,
/// with the origin at its top-left corner, padding included.
///
/// ```rust
/// use kurbo::{Point, Rect};
/// use understory_wheel::{DisplayList, FrameDriver, WheelConfig, WheelView};
///
/// let mut wheel = WheelView::new(WheelConfig::default(), FrameDriver::new(16)).unwrap();
/// wheel.set_items(vec!["a", "b", "c", "d"]);
///
/// // Drag up by two rows and let go without velocity.
/// wheel.pointer_down(None, Point::new(50.0, 200.0), 0);
/// wheel.pointer_move(None, Point::new(50.0, 100.0), 50);
/// wheel.pointer_up(None, Point::new(50.0, 100.0), 500);
/// while let Some(fraction) = wheel.driver_mut().next_fraction() {
///     wheel.tick(fraction);
/// }
/// assert_eq!(wheel.current_data(), Some(&"c"));
///
/// let mut list = DisplayList::new();
/// wheel.draw(Rect::new(0.0, 0.0, 200.0, wheel.metrics().height), &mut list);
/// assert!(list.rows().any(|row| row.text == "c"));
/// ```
#[derive(Debug)]
pub struct WheelView<T, D> {
    config: WheelConfig,
    metrics: WheelMetrics,
    model: OffsetModel<T>,
    physics: ScrollPhysics,
    gesture: GestureTracker,
    renderer: CurvedRenderer,
    driver: D,
    drag_remainder: f64,
}

impl<T: WheelItem, D: AnimationDriver> WheelView<T, D> {
    /// Creates a wheel sized from the configured row height.
    ///
    /// Fails if `config` does not validate.
    pub fn new(config: WheelConfig, driver: D) -> Result<Self, WheelError> {
        config.validate()?;
        let metrics = WheelMetrics::measure(&config, HeightSpec::Wrap, Insets::ZERO)?;
        Ok(Self {
            model: OffsetModel::new(metrics.geometry.item_height()),
            physics: ScrollPhysics::new(&config),
            gesture: GestureTracker::new(config.touch_slop),
            renderer: CurvedRenderer::new(&config),
            metrics,
            config,
            driver,
            drag_remainder: 0.0,
        })
    }

    /// Re-measures under a host constraint and returns the full height.
    ///
    /// A new row height keeps the selected index. On error the previous
    /// measurement stays in effect.
    pub fn measure(&mut self, spec: HeightSpec, padding: Insets) -> Result<f64, WheelError> {
        let metrics = WheelMetrics::measure(&self.config, spec, padding)?;
        if metrics.geometry.item_height() != self.model.item_height() {
            self.physics.stop(&mut self.driver);
            self.model.set_item_height(metrics.geometry.item_height());
        }
        self.metrics = metrics;
        Ok(metrics.height)
    }

    /// Configuration the wheel was built with.
    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    /// Result of the latest measurement.
    pub fn metrics(&self) -> &WheelMetrics {
        &self.metrics
    }

    /// Cylinder used for drawing and taps.
    pub fn geometry(&self) -> &WheelGeometry {
        &self.metrics.geometry
    }

    /// Items, offset, and selection.
    pub fn model(&self) -> &OffsetModel<T> {
        &self.model
    }

    /// Phase of the scroll state machine.
    pub fn physics_state(&self) -> PhysicsState {
        self.physics.state()
    }

    /// The host's animation driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// The host's animation driver, mutably, for pulling ticks from it.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Replaces the items, stopping any animation and selecting the first item.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.physics.stop(&mut self.driver);
        self.drag_remainder = 0.0;
        self.model.set_items(items);
    }

    /// Installs the selection listener.
    pub fn set_on_selection_changed(&mut self, listener: impl FnMut(usize, &T) + 'static) {
        self.model.set_listener(listener);
    }

    /// The selected item, or `None` when there are no items.
    pub fn current_data(&self) -> Option<&T> {
        self.model.current_data()
    }

    /// The selected index; `0` when there are no items.
    pub fn current_index(&self) -> usize {
        self.model.index()
    }

    /// Plans one frame into `painter`. `bounds` is the full view, padding included.
    pub fn draw<P: WheelPainter>(&self, bounds: Rect, painter: &mut P) {
        let padding = self.metrics.padding;
        let content = Rect::new(
            bounds.x0 + padding.x0,
            bounds.y0 + padding.y0,
            bounds.x1 - padding.x1,
            bounds.y1 - padding.y1,
        );
        self.renderer
            .paint(&self.metrics.geometry, &self.model, content, painter);
    }

    /// A pointer went down. The first pointer of a gesture stops any animation.
    pub fn pointer_down(&mut self, pointer_id: Option<PointerId>, position: Point, timestamp: u64) {
        if self.gesture.on_down(pointer_id, position, timestamp) {
            self.touch_down();
        }
    }

    /// A pointer moved. Moves of untracked or inactive pointers are ignored.
    pub fn pointer_move(&mut self, pointer_id: Option<PointerId>, position: Point, timestamp: u64) {
        if let Some(delta) = self.gesture.on_move(pointer_id, position, timestamp) {
            self.drag(delta);
        }
    }

    /// A pointer lifted. The last pointer either releases the drag or taps.
    pub fn pointer_up(&mut self, pointer_id: Option<PointerId>, position: Point, timestamp: u64) {
        match self.gesture.on_up(pointer_id, position, timestamp) {
            GestureEnd::Release { velocity } => self.release(velocity, timestamp),
            GestureEnd::Tap(at) => self.tap(at, timestamp),
            GestureEnd::Continue | GestureEnd::Ignored => {}
        }
    }

    /// The host took the pointer stream away; the wheel settles on the nearest row.
    pub fn pointer_cancel(&mut self, timestamp: u64) {
        if self.gesture.cancel() {
            self.release(0.0, timestamp);
        } else {
            self.physics
                .settle_in_place(&mut self.model, &mut self.driver, timestamp);
        }
    }

    /// Stops any animation and freezes the offset, ready for a drag.
    pub fn touch_down(&mut self) {
        self.physics.touch_down(&mut self.driver);
        self.drag_remainder = 0.0;
    }

    /// Applies a drag delta in offset space (positive scrolls toward later rows).
    ///
    /// Fractional pixels are carried over to the next delta.
    pub fn drag(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        self.drag_remainder += delta;
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Per-event drag deltas are a few hundred pixels at most"
        )]
        let whole = self.drag_remainder as i32;
        self.drag_remainder -= f64::from(whole);
        if whole != 0 {
            self.physics
                .drag(&mut self.model, &mut self.driver, whole);
        }
    }

    /// Ends a drag with vertical pointer `velocity` (px/s, positive downward).
    pub fn release(&mut self, velocity: f64, now_ms: u64) {
        self.drag_remainder = 0.0;
        self.physics
            .release(&mut self.model, &mut self.driver, velocity, now_ms);
    }

    /// A tap at `position`: tapping a row above or below the center scrolls it into place.
    ///
    /// Any other tap only settles a wheel that a touch-down froze between rows.
    pub fn tap(&mut self, position: Point, now_ms: u64) {
        let y = position.y - self.metrics.padding.y0;
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Tap distances are bounded by the cylinder's half circumference"
        )]
        let distance = self
            .metrics
            .geometry
            .tap_distance(y)
            .map_or(0, |distance| distance as i32);
        if distance != 0 {
            self.physics
                .settle_by(&mut self.model, &mut self.driver, distance, now_ms);
        } else {
            self.physics
                .settle_in_place(&mut self.model, &mut self.driver, now_ms);
        }
    }

    /// Selects `index`, clamped to the item range.
    pub fn scroll_to_index(&mut self, index: usize, animated: bool, now_ms: u64) {
        self.physics
            .scroll_to_index(&mut self.model, &mut self.driver, index, animated, now_ms);
    }

    /// Delivers an animation tick. Returns `true` while animating.
    pub fn tick(&mut self, fraction: f64) -> bool {
        self.physics
            .tick(&mut self.model, &mut self.driver, fraction)
    }

    /// Delivers an animation tick at host time `now_ms`. Returns `true` while animating.
    pub fn tick_at(&mut self, now_ms: u64) -> bool {
        self.physics
            .tick_at(&mut self.model, &mut self.driver, now_ms)
    }

    /// Returns whether anything visible changed since the last call.
    pub fn take_redraw_request(&mut self) -> bool {
        self.model.take_redraw_request()
    }

    /// The view left the screen: stop animating and forget every pointer.
    pub fn detach(&mut self) {
        self.gesture.cancel();
        self.physics.stop(&mut self.driver);
        self.model.release_overscroll();
        self.drag_remainder = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use kurbo::{Insets, Point, Rect};

    use super::WheelView;
    use crate::{DisplayList, FrameDriver, HeightSpec, PhysicsState, WheelConfig, WheelError};

    fn wheel(len: usize) -> WheelView<alloc::string::String, FrameDriver> {
        let config = WheelConfig {
            item_height: 60,
            ..WheelConfig::default()
        };
        let mut view = WheelView::new(config, FrameDriver::new(16)).unwrap();
        view.set_items((0..len).map(|i| alloc::format!("{i}")).collect());
        view
    }

    fn settle(view: &mut WheelView<alloc::string::String, FrameDriver>) {
        while let Some(fraction) = view.driver_mut().next_fraction() {
            view.tick(fraction);
        }
    }

    #[test]
    fn construction_validates_config() {
        let even = WheelConfig {
            visible_item_count: 4,
            ..WheelConfig::default()
        };
        let err = WheelView::<&str, _>::new(even, FrameDriver::default()).unwrap_err();
        assert_eq!(err, WheelError::InvalidVisibleItemCount(4));
    }

    #[test]
    fn slow_drag_release_snaps_to_nearest_row() {
        let mut view = wheel(20);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        view.set_on_selection_changed(move |index, _| sink.borrow_mut().push(index));

        view.pointer_down(None, Point::new(10.0, 300.0), 0);
        // 8px of slop, then 100px of drag.
        view.pointer_move(None, Point::new(10.0, 192.0), 1_000);
        assert_eq!(view.model().offset(), 100);
        assert_eq!(view.physics_state(), PhysicsState::Dragging);
        view.pointer_up(None, Point::new(10.0, 192.0), 2_000);
        assert_eq!(view.physics_state(), PhysicsState::Settling);
        settle(&mut view);
        assert_eq!(view.model().offset(), 120);
        assert_eq!(view.current_index(), 2);
        assert_eq!(*seen.borrow(), [1, 2]);
    }

    #[test]
    fn fractional_drags_accumulate() {
        let mut view = wheel(5);
        view.touch_down();
        for _ in 0..4 {
            view.drag(0.5);
        }
        assert_eq!(view.model().offset(), 2);
        view.drag(-2.75);
        assert_eq!(view.model().offset(), 0);
    }

    #[test]
    fn tapping_a_lower_row_selects_it() {
        let mut view = wheel(20);
        let geometry = *view.geometry();
        let (_, bottom) = geometry.separators();
        // Center of the row just below the selected one.
        let y = geometry.project(geometry.center_slot() + 1, 0.0).center_y;
        assert!(y > bottom);
        view.pointer_down(None, Point::new(10.0, y), 0);
        view.pointer_up(None, Point::new(10.0, y), 50);
        settle(&mut view);
        assert_eq!(view.current_index(), 1);

        // Tapping the selected row does nothing.
        view.pointer_down(None, Point::new(10.0, geometry.radius()), 100);
        view.pointer_up(None, Point::new(10.0, geometry.radius()), 150);
        assert_eq!(view.physics_state(), PhysicsState::Idle);
        assert_eq!(view.current_index(), 1);
    }

    #[test]
    fn touch_down_freezes_a_running_settle() {
        let mut view = wheel(20);
        view.scroll_to_index(10, true, 0);
        for _ in 0..5 {
            let fraction = view.driver_mut().next_fraction().unwrap();
            view.tick(fraction);
        }
        let frozen = view.model().offset();
        assert!(frozen > 0 && frozen < 600);
        view.pointer_down(None, Point::new(10.0, 100.0), 80);
        assert!(!view.driver().is_running());
        assert_eq!(view.physics_state(), PhysicsState::Idle);
        assert!(!view.tick(1.0));
        assert_eq!(view.model().offset(), frozen);
    }

    #[test]
    fn tap_during_settle_still_lands_on_a_row() {
        let mut view = wheel(20);
        let radius = view.geometry().radius();
        let taps = [radius, -50.0];
        for (round, y) in taps.into_iter().enumerate() {
            view.scroll_to_index(10 * round, false, 0);
            view.scroll_to_index(10 - 5 * round, true, 0);
            for _ in 0..5 {
                let fraction = view.driver_mut().next_fraction().unwrap();
                view.tick(fraction);
            }
            assert_ne!(view.model().offset() % 60, 0, "tap at {y}");

            view.pointer_down(None, Point::new(10.0, y), 100);
            view.pointer_up(None, Point::new(10.0, y), 150);
            settle(&mut view);
            assert_eq!(view.model().offset() % 60, 0, "tap at {y}");
            assert_eq!(view.physics_state(), PhysicsState::Idle);
        }
    }

    #[test]
    fn cancel_without_drag_settles_a_frozen_wheel() {
        let mut view = wheel(20);
        view.scroll_to_index(10, true, 0);
        for _ in 0..5 {
            let fraction = view.driver_mut().next_fraction().unwrap();
            view.tick(fraction);
        }
        view.pointer_down(None, Point::new(10.0, 100.0), 80);
        view.pointer_cancel(90);
        settle(&mut view);
        assert_eq!(view.model().offset() % 60, 0);
        assert_eq!(view.physics_state(), PhysicsState::Idle);
    }

    #[test]
    fn exact_measure_keeps_selection() {
        let mut view = wheel(20);
        view.scroll_to_index(4, false, 0);
        let height = view
            .measure(HeightSpec::Exact(320.0), Insets::new(0.0, 10.0, 0.0, 10.0))
            .unwrap();
        assert_eq!(height, 320.0);
        assert_eq!(view.geometry().item_height(), 66);
        assert_eq!(view.model().offset(), 264);
        assert_eq!(view.current_index(), 4);

        assert_eq!(
            view.measure(HeightSpec::Exact(2.0), Insets::ZERO),
            Err(WheelError::DegenerateGeometry(0))
        );
        assert_eq!(view.geometry().item_height(), 66);
    }

    #[test]
    fn draw_offsets_content_by_padding() {
        let mut view = wheel(3);
        view.measure(HeightSpec::Wrap, Insets::new(4.0, 10.0, 4.0, 10.0))
            .unwrap();
        let mut list = DisplayList::new();
        let height = view.metrics().height;
        view.draw(Rect::new(0.0, 0.0, 100.0, height), &mut list);
        let center = list
            .rows()
            .find(|row| row.index == 0)
            .map(|row| row.center)
            .unwrap();
        assert_eq!(center.x, 50.0);
        assert!((center.y - (10.0 + view.geometry().radius())).abs() < 1e-9);
        assert!(view.take_redraw_request());
    }

    #[test]
    fn cancel_and_detach_leave_the_wheel_at_rest() {
        let mut view = wheel(10);
        view.pointer_down(None, Point::new(10.0, 300.0), 0);
        view.pointer_move(None, Point::new(10.0, 258.0), 10);
        assert_eq!(view.model().offset(), 34);
        view.pointer_cancel(20);
        settle(&mut view);
        assert_eq!(view.model().offset(), 60);

        view.scroll_to_index(5, true, 30);
        view.detach();
        assert!(!view.driver().is_running());
        assert_eq!(view.physics_state(), PhysicsState::Idle);
    }
}
