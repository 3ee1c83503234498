// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value laws for offset animations and the driver seam that schedules them.
//!
//! The engine never owns a timer. When it wants the offset to travel from one
//! value to another it hands an [`AnimationRequest`] to an [`AnimationDriver`];
//! the host then delivers ticks (elapsed fractions of the requested duration)
//! back to [`ScrollPhysics::tick`](crate::ScrollPhysics::tick). Everything runs
//! on the UI thread, so a cancellation takes effect before the next tick.

/// Easing curve applied to the elapsed fraction of an animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interpolator {
    /// Constant speed.
    Linear,
    /// Starts fast and slows to a stop, `1 - (1 - t)²`.
    ///
    /// This is also the exact position law of a glide under constant
    /// deceleration, which is why simulated flings use it too.
    #[default]
    Decelerate,
}

impl Interpolator {
    /// Maps an elapsed fraction (clamped to `0..=1`) to a progress fraction.
    #[must_use]
    pub fn sample(self, fraction: f64) -> f64 {
        let t = fraction.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Decelerate => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

/// A request to move the offset from `from` to `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationRequest {
    /// Offset at fraction `0`.
    pub from: i32,
    /// Offset at fraction `1`.
    pub to: i32,
    /// Wall-clock duration the driver should stretch the animation over.
    pub duration_ms: u64,
    /// Easing applied to the elapsed fraction.
    pub curve: Interpolator,
}

impl AnimationRequest {
    /// Offset at the given elapsed fraction.
    ///
    /// Intermediate values truncate toward zero like an integer value
    /// animator; fraction `1` always yields exactly `to`.
    #[must_use]
    pub fn value_at(&self, fraction: f64) -> i32 {
        if fraction >= 1.0 {
            return self.to;
        }
        let progress = self.curve.sample(fraction);
        let from = f64::from(self.from);
        let span = f64::from(self.to) - from;
        #[allow(
            clippy::cast_possible_truncation,
            reason = "The result lies between two i32 endpoints"
        )]
        let value = (from + span * progress) as i32;
        value
    }

    /// Elapsed fraction at `now_ms` for an animation that started at `start_ms`.
    #[must_use]
    pub fn fraction_at(&self, start_ms: u64, now_ms: u64) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(start_ms);
        (elapsed as f64 / self.duration_ms as f64).min(1.0)
    }
}

/// Scheduling service supplied by the host.
///
/// `start` asks for ticks to begin for a new animation, replacing any running
/// one; `cancel` stops them. Ticks are delivered by the host calling back into
/// the engine, never from inside these methods.
pub trait AnimationDriver {
    /// Begins delivering ticks for `request`.
    fn start(&mut self, request: &AnimationRequest);
    /// Stops delivering ticks.
    fn cancel(&mut self);
}

/// A deterministic driver that advances a fixed frame interval per tick.
///
/// Useful for headless hosts, tests, and demos: call
/// [`FrameDriver::next_fraction`] once per frame and feed the result to the
/// engine until it returns `None`.
#[derive(Clone, Debug)]
pub struct FrameDriver {
    frame_ms: u64,
    elapsed_ms: u64,
    active: Option<AnimationRequest>,
    started: usize,
}

impl FrameDriver {
    /// Creates a driver that advances `frame_ms` per tick.
    #[must_use]
    pub fn new(frame_ms: u64) -> Self {
        Self {
            frame_ms: frame_ms.max(1),
            elapsed_ms: 0,
            active: None,
            started: 0,
        }
    }

    /// Whether an animation is currently scheduled.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// The animation currently scheduled, if any.
    #[must_use]
    pub const fn active(&self) -> Option<&AnimationRequest> {
        self.active.as_ref()
    }

    /// Number of animations started so far.
    #[must_use]
    pub const fn started(&self) -> usize {
        self.started
    }

    /// Advances one frame and returns the elapsed fraction to deliver, or
    /// `None` when nothing is running. The final frame yields `1.0`.
    pub fn next_fraction(&mut self) -> Option<f64> {
        let request = self.active?;
        self.elapsed_ms = self.elapsed_ms.saturating_add(self.frame_ms);
        let fraction = request.fraction_at(0, self.elapsed_ms);
        if fraction >= 1.0 {
            self.active = None;
        }
        Some(fraction)
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(16)
    }
}

impl AnimationDriver for FrameDriver {
    fn start(&mut self, request: &AnimationRequest) {
        self.active = Some(*request);
        self.elapsed_ms = 0;
        self.started += 1;
    }

    fn cancel(&mut self) {
        self.active = None;
    }
}
