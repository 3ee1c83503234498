// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Helpers shared by the `understory_wheel` demos.
//!
//! The demos are headless: instead of drawing, they print what a host would
//! draw. Run them with `RUST_LOG=understory_wheel=trace` to also see the
//! engine's own log output.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use understory_wheel::{DisplayList, DrawCommand, Tone};

/// Installs a formatting subscriber filtered by `RUST_LOG`.
///
/// The engine logs through the `log` facade; the subscriber's log bridge
/// forwards those records here too.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,understory_wheel=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Logs a recorded frame, one line per command.
pub fn print_frame(label: &str, frame: &DisplayList) {
    tracing::info!("-- {label} --");
    for command in &frame.commands {
        match command {
            DrawCommand::Separator { line, .. } => {
                tracing::info!("{:>7.1}  ---------------- separator", line.p0.y);
            }
            DrawCommand::Row(row) => {
                let tone = match row.tone {
                    Tone::Inner => "inner",
                    Tone::Outer => "outer",
                };
                let clip = row
                    .clip
                    .map(|r| format!(" clip {:.1}..{:.1}", r.y0, r.y1))
                    .unwrap_or_default();
                tracing::info!(
                    "{:>7.1}  {:<12} {tone} scale {:.2} alpha {:.2}{clip}",
                    row.center.y,
                    row.text,
                    row.scale_y,
                    row.alpha,
                );
            }
        }
    }
}
