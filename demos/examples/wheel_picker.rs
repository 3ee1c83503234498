// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drives a custom-drawn wheel through a slow drag, a fling, and a tap,
//! printing the planned frame after each one settles.
//!
//! ```sh
//! cargo run -p understory_wheel_demos --example wheel_picker
//! ```

use kurbo::{Insets, Point, Rect};
use understory_wheel::{
    DisplayList, FrameDriver, HeightSpec, RenderPolicy, WheelConfig, WheelError, WheelView,
};
use understory_wheel_demos::{init_tracing, print_frame};

type Wheel = WheelView<String, FrameDriver>;

fn main() -> Result<(), WheelError> {
    init_tracing();

    let policy = if std::env::args().any(|arg| arg == "--continuous") {
        RenderPolicy::Continuous
    } else {
        RenderPolicy::Fold
    };
    let config = WheelConfig {
        render_policy: policy,
        ..WheelConfig::for_density(2.0)
    };
    let mut wheel = Wheel::new(config, FrameDriver::new(16))?;
    wheel.set_on_selection_changed(|index, item: &String| {
        tracing::info!("selection changed to {index} ({item})");
    });
    wheel.set_items((0..10).map(|i| format!("item {i}")).collect());
    let padding = Insets::uniform_xy(0.0, 8.0);
    let height = wheel.measure(HeightSpec::Wrap, padding)?;
    let bounds = Rect::new(0.0, 0.0, 320.0, height);
    snapshot(&wheel, bounds, "at rest");

    // Drag up by about a row and a half, then hold still before lifting.
    let x = bounds.center().x;
    let mut y = bounds.center().y;
    let mut now = 0;
    wheel.pointer_down(None, Point::new(x, y), now);
    for _ in 0..15 {
        now += 16;
        y -= 10.0;
        wheel.pointer_move(None, Point::new(x, y), now);
    }
    now += 400;
    wheel.pointer_up(None, Point::new(x, y), now);
    settle(&mut wheel);
    snapshot(&wheel, bounds, "after a slow drag");

    // A quick flick upward.
    y = bounds.center().y;
    wheel.pointer_down(None, Point::new(x, y), now);
    for _ in 0..6 {
        now += 8;
        y -= 20.0;
        wheel.pointer_move(None, Point::new(x, y), now);
    }
    wheel.pointer_up(None, Point::new(x, y), now);
    settle(&mut wheel);
    snapshot(&wheel, bounds, "after a fling");

    // Tap the row just above the selected one.
    let geometry = *wheel.geometry();
    let above = geometry.project(geometry.center_slot() - 1, 0.0);
    let tap = Point::new(x, padding.y0 + above.center_y);
    now += 1_000;
    wheel.pointer_down(None, tap, now);
    wheel.pointer_up(None, tap, now + 60);
    settle(&mut wheel);
    snapshot(&wheel, bounds, "after a tap above center");

    Ok(())
}

fn settle(wheel: &mut Wheel) {
    let mut frames = 0;
    while let Some(fraction) = wheel.driver_mut().next_fraction() {
        wheel.tick(fraction);
        frames += 1;
    }
    tracing::info!(
        "settled after {frames} frames at offset {} on {:?}",
        wheel.model().offset(),
        wheel.current_data()
    );
}

fn snapshot(wheel: &Wheel, bounds: Rect, label: &str) {
    let mut frame = DisplayList::new();
    wheel.draw(bounds, &mut frame);
    print_frame(label, &frame);
}
