// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scrolls a recycling curved layout over rows of mixed heights and reports
//! which children the host is asked to create, move, and recycle.
//!
//! ```sh
//! cargo run -p understory_wheel_demos --example wheel_layout
//! ```

use understory_wheel::{ChildPlacement, Recycler, RecyclingCurvedLayout};
use understory_wheel_demos::init_tracing;

/// A stand-in for a host widget pool.
#[derive(Debug, Default)]
struct LabelPool {
    heights: Vec<f64>,
    pooled: Vec<Label>,
    created: usize,
}

#[derive(Debug)]
struct Label {
    id: usize,
    index: usize,
}

impl Recycler for LabelPool {
    type Handle = Label;

    fn measure(&mut self, index: usize) -> f64 {
        self.heights[index]
    }

    fn acquire(&mut self, index: usize) -> Label {
        let label = match self.pooled.pop() {
            Some(label) => Label { index, ..label },
            None => {
                self.created += 1;
                Label {
                    id: self.created,
                    index,
                }
            }
        };
        tracing::debug!("label #{} now shows row {index}", label.id);
        label
    }

    fn position(&mut self, label: &mut Label, placement: &ChildPlacement) {
        tracing::trace!(
            "label #{} row {} at {:.1}..{:.1} scale {:.2} alpha {:.2}",
            label.id,
            label.index,
            placement.top,
            placement.bottom,
            placement.scale_y,
            placement.alpha
        );
    }

    fn release(&mut self, label: Label) {
        tracing::debug!("label #{} released from row {}", label.id, label.index);
        self.pooled.push(label);
    }
}

fn main() {
    init_tracing();

    let mut pool = LabelPool {
        heights: (0..40).map(|i| if i % 5 == 0 { 72.0 } else { 48.0 }).collect(),
        ..LabelPool::default()
    };
    let count = pool.heights.len();
    let mut layout = RecyclingCurvedLayout::new();
    layout.layout(&mut pool, count, 360.0, 3);
    tracing::info!(
        "laid out around row {:?}, live rows {:?}",
        layout.selected_index(),
        layout.live_indices()
    );

    // Scroll down in small steps, snapping to the nearest row at the end.
    let mut travelled = 0.0;
    for _ in 0..40 {
        travelled += layout.scroll_by(&mut pool, 25.0);
    }
    let snap = layout.snap_delta();
    travelled += layout.scroll_by(&mut pool, snap);
    tracing::info!(
        "travelled {travelled:.1}px to row {:?}, live rows {:?}",
        layout.selected_index(),
        layout.live_indices()
    );

    // Scrolling is bounded by the last row.
    let extra = layout.scroll_by(&mut pool, 100_000.0);
    tracing::info!(
        "asked for 100000px, moved {extra:.1}px to row {:?}",
        layout.selected_index()
    );
    if let Some(direction) = layout.compute_scroll_vector_for_position(0) {
        tracing::info!("row 0 lies in direction {direction}");
    }

    tracing::info!(
        "{} labels created for {} rows",
        pool.created,
        layout.frames().len()
    );
}
