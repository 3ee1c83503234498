// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag, fling, and snap-to-row settling.
//!
//! ## States
//!
//! - `Idle → Dragging → (Settling | Flinging | Idle)` for a drag that is released.
//! - `Idle → Flinging → Settling → Idle` for a fast release.
//!
//! While dragging, pointer deltas go straight to the [`OffsetModel`]. On
//! release, a slow pointer snaps to the nearest row boundary and a fast one
//! flings according to the configured [`FlingPolicy`]; either way the wheel
//! ends up resting on a row boundary. A touch-down cancels any animation at
//! its current offset.

use crate::{
    AnimationDriver, AnimationRequest, FlingPolicy, Interpolator, OffsetModel, WheelConfig,
};

/// Where a release lands: the nearest row boundary to `offset`, clamped to `0..=max_offset`.
///
/// A remainder below `item_height / 2` (integer division) rounds toward the
/// earlier row, anything else toward the later one. For odd row heights the
/// row just short of half-way therefore already rounds up.
#[must_use]
pub fn snap_offset(offset: i32, item_height: i32, max_offset: i32) -> i32 {
    let item_height = item_height.max(1);
    let rem = offset.rem_euclid(item_height);
    let base = offset - rem;
    let target = if rem < item_height / 2 {
        base
    } else {
        base.saturating_add(item_height)
    };
    target.clamp(0, max_offset.max(0))
}

/// Phase of the scroll state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PhysicsState {
    /// At rest, or frozen under a pointer that has not started dragging.
    #[default]
    Idle,
    /// Following pointer deltas.
    Dragging,
    /// Gliding after a fast release.
    Flinging,
    /// Animating onto a row boundary.
    Settling,
}

/// An in-flight offset animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlingTarget {
    /// Offset when the animation started.
    pub from_offset: i32,
    /// Offset the animation ends on.
    pub to_offset: i32,
    /// Host timestamp at which the animation started.
    pub start_ms: u64,
    /// Length of the animation.
    pub duration_ms: u64,
}

impl FlingTarget {
    /// The request handed to the animation driver.
    #[must_use]
    pub const fn request(&self) -> AnimationRequest {
        AnimationRequest {
            from: self.from_offset,
            to: self.to_offset,
            duration_ms: self.duration_ms,
            curve: Interpolator::Decelerate,
        }
    }
}

/// Scroll state machine driving an [`OffsetModel`].
#[derive(Clone, Debug)]
pub struct ScrollPhysics {
    state: PhysicsState,
    target: Option<FlingTarget>,
    config: WheelConfig,
}

impl ScrollPhysics {
    /// Creates an idle state machine tuned by `config`.
    #[must_use]
    pub fn new(config: &WheelConfig) -> Self {
        Self {
            state: PhysicsState::Idle,
            target: None,
            config: config.clone(),
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn state(&self) -> PhysicsState {
        self.state
    }

    /// The running animation, if any.
    #[must_use]
    pub const fn target(&self) -> Option<&FlingTarget> {
        self.target.as_ref()
    }

    /// Whether an animation is running.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.target.is_some()
    }

    /// A pointer went down: stop any animation where it is.
    ///
    /// The model keeps the last ticked offset, which becomes the reference for
    /// the drag that may follow.
    pub fn touch_down<D: AnimationDriver>(&mut self, driver: &mut D) {
        self.stop(driver);
    }

    /// Stops any animation and returns to [`PhysicsState::Idle`].
    pub fn stop<D: AnimationDriver>(&mut self, driver: &mut D) {
        if let Some(target) = self.target.take() {
            log::debug!("wheel animation toward {} cancelled", target.to_offset);
            driver.cancel();
        }
        self.state = PhysicsState::Idle;
    }

    /// Applies a drag delta in offset space (positive scrolls toward later rows).
    ///
    /// A running animation is stopped first, as if the pointer had just gone down.
    pub fn drag<T, D: AnimationDriver>(
        &mut self,
        model: &mut OffsetModel<T>,
        driver: &mut D,
        delta: i32,
    ) {
        if self.target.is_some() {
            self.stop(driver);
        }
        self.state = PhysicsState::Dragging;
        let limit = self.config.overscroll_limit(model.max_offset());
        model.drag_by(delta, limit);
    }

    /// The pointer was released with vertical `velocity` in pointer space
    /// (px/s, positive when the pointer moves down the screen).
    pub fn release<T, D: AnimationDriver>(
        &mut self,
        model: &mut OffsetModel<T>,
        driver: &mut D,
        velocity: f64,
        now_ms: u64,
    ) {
        model.release_overscroll();
        let max = self.config.max_fling_velocity.abs();
        let velocity = if velocity.is_finite() {
            velocity.clamp(-max, max)
        } else {
            0.0
        };
        if velocity.abs() > self.config.min_fling_velocity.abs() {
            self.fling(model, driver, velocity, now_ms);
        } else {
            self.settle_toward(model, driver, model.offset(), now_ms);
        }
    }

    /// Settles onto the nearest row boundary unless an animation is already running.
    ///
    /// Used after a gesture that froze the wheel without dragging it, so the
    /// wheel never comes to rest between rows.
    pub fn settle_in_place<T, D: AnimationDriver>(
        &mut self,
        model: &mut OffsetModel<T>,
        driver: &mut D,
        now_ms: u64,
    ) {
        if self.target.is_none() {
            model.release_overscroll();
            self.settle_toward(model, driver, model.offset(), now_ms);
        }
    }

    /// Scrolls by `distance` and settles on the row boundary nearest to where that lands.
    pub fn settle_by<T, D: AnimationDriver>(
        &mut self,
        model: &mut OffsetModel<T>,
        driver: &mut D,
        distance: i32,
        now_ms: u64,
    ) {
        let landing = model.offset().saturating_add(distance);
        self.settle_toward(model, driver, landing, now_ms);
    }

    /// Selects `index` (clamped to the item range), either animated or immediately.
    pub fn scroll_to_index<T, D: AnimationDriver>(
        &mut self,
        model: &mut OffsetModel<T>,
        driver: &mut D,
        index: usize,
        animated: bool,
        now_ms: u64,
    ) {
        let to = model.offset_for_index(index);
        if animated {
            let duration_ms = self.settle_duration_ms();
            self.animate(model, driver, PhysicsState::Settling, to, duration_ms, now_ms);
        } else {
            self.stop(driver);
            model.release_overscroll();
            model.set_offset(to);
        }
    }

    /// Delivers a tick at elapsed `fraction` of the running animation.
    ///
    /// Returns `true` while an animation (possibly a follow-up settle) is still running.
    pub fn tick<T, D: AnimationDriver>(
        &mut self,
        model: &mut OffsetModel<T>,
        driver: &mut D,
        fraction: f64,
    ) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        let fraction = fraction.clamp(0.0, 1.0);
        let raw = target.request().value_at(fraction);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Elapsed time is bounded by the animation duration"
        )]
        let now_ms = target.start_ms + (fraction * target.duration_ms as f64) as u64;
        match self.state {
            PhysicsState::Flinging => {
                let max = model.max_offset();
                let band = self.config.overfling_distance.max(0);
                model.set_offset(raw);
                let escaped = raw < -band || raw > max.saturating_add(band);
                if escaped || fraction >= 1.0 {
                    if escaped {
                        log::debug!("wheel fling left the overfling band at {raw}");
                        driver.cancel();
                    }
                    self.target = None;
                    self.settle_toward(model, driver, model.offset(), now_ms);
                }
                self.target.is_some()
            }
            PhysicsState::Settling => {
                model.set_offset(raw);
                if fraction >= 1.0 {
                    self.target = None;
                    self.state = PhysicsState::Idle;
                }
                self.target.is_some()
            }
            PhysicsState::Idle | PhysicsState::Dragging => {
                self.target = None;
                false
            }
        }
    }

    /// Delivers a tick at host time `now_ms`. See [`ScrollPhysics::tick`].
    pub fn tick_at<T, D: AnimationDriver>(
        &mut self,
        model: &mut OffsetModel<T>,
        driver: &mut D,
        now_ms: u64,
    ) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        let fraction = target.request().fraction_at(target.start_ms, now_ms);
        self.tick(model, driver, fraction)
    }

    fn settle_duration_ms(&self) -> u64 {
        self.config.settle_duration_ms.max(1)
    }

    fn fling<T, D: AnimationDriver>(
        &mut self,
        model: &mut OffsetModel<T>,
        driver: &mut D,
        velocity: f64,
        now_ms: u64,
    ) {
        // Pointer moving down scrolls toward earlier rows.
        let offset_velocity = -velocity;
        match self.config.fling_policy {
            FlingPolicy::Projected { damping } => {
                let damping = if damping > 0.0 { damping } else { 1.0 };
                let landing = f64::from(model.offset()) + offset_velocity / damping;
                self.settle_toward(model, driver, saturate(landing), now_ms);
            }
            FlingPolicy::Simulated { deceleration } => {
                if deceleration <= 0.0 {
                    self.settle_toward(model, driver, model.offset(), now_ms);
                    return;
                }
                let speed = offset_velocity.abs();
                let distance = speed * speed / (2.0 * deceleration) * offset_velocity.signum();
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "Glide durations are seconds long at most"
                )]
                let duration_ms = (speed / deceleration * 1000.0) as u64;
                let to = saturate(f64::from(model.offset()) + distance);
                log::debug!("wheel fling at {speed:.0}px/s toward {to} over {duration_ms}ms");
                self.animate(
                    model,
                    driver,
                    PhysicsState::Flinging,
                    to,
                    duration_ms.max(1),
                    now_ms,
                );
            }
        }
    }

    fn settle_toward<T, D: AnimationDriver>(
        &mut self,
        model: &mut OffsetModel<T>,
        driver: &mut D,
        landing: i32,
        now_ms: u64,
    ) {
        let to = snap_offset(landing, model.item_height(), model.max_offset());
        let duration_ms = self.settle_duration_ms();
        self.animate(model, driver, PhysicsState::Settling, to, duration_ms, now_ms);
    }

    fn animate<T, D: AnimationDriver>(
        &mut self,
        model: &OffsetModel<T>,
        driver: &mut D,
        state: PhysicsState,
        to: i32,
        duration_ms: u64,
        now_ms: u64,
    ) {
        if self.target.take().is_some() {
            driver.cancel();
        }
        let from = model.offset();
        if from == to {
            self.state = PhysicsState::Idle;
            return;
        }
        let target = FlingTarget {
            from_offset: from,
            to_offset: to,
            start_ms: now_ms,
            duration_ms,
        };
        driver.start(&target.request());
        self.target = Some(target);
        self.state = state;
    }
}

fn saturate(value: f64) -> i32 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Float to int casts saturate at the i32 bounds"
    )]
    let value = value as i32;
    value
}
