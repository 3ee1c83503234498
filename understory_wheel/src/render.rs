// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint planning for a custom-drawn wheel.
//!
//! [`CurvedRenderer`] never touches pixels. Each frame it projects the visible
//! slots through a [`WheelGeometry`] and hands the host's [`WheelPainter`] two
//! separator lines plus one [`RowPaint`] per row pass. Under
//! [`RenderPolicy::Fold`] the two rows that straddle the separator lines are
//! emitted twice, each pass clipped to one side of its line, so text looks
//! refracted as it enters and leaves the lens.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Line, Point, Rect};

use crate::{
    Color, CurveProjection, OffsetModel, RenderPolicy, WheelConfig, WheelGeometry, WheelItem,
    continuous_style,
};

/// Which text style a row pass uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    /// Between the separator lines (or magnified, under the continuous policy).
    Inner,
    /// Everywhere else.
    Outer,
}

/// One row pass handed to a [`WheelPainter`].
#[derive(Clone, Debug, PartialEq)]
pub struct RowPaint<'a> {
    /// Item index.
    pub index: usize,
    /// Slot in the visible window, counted from the top.
    pub slot: usize,
    /// Text to draw.
    pub text: Cow<'a, str>,
    /// Center of the row on screen, in the same space as the content rectangle.
    pub center: Point,
    /// Vertical position to draw at after scaling by `scale_y` around the content top.
    pub draw_y: f64,
    /// Vertical scale.
    pub scale_y: f64,
    /// Opacity already folded into `color`.
    pub alpha: f64,
    /// Text style.
    pub tone: Tone,
    /// Text color, with `alpha` applied.
    pub color: Color,
    /// Text size for `tone`.
    pub text_size: f64,
    /// Clip for this pass, or `None` to draw unclipped.
    pub clip: Option<Rect>,
}

/// Drawing service supplied by the host.
pub trait WheelPainter {
    /// Draws a separator line.
    fn separator(&mut self, line: Line, color: Color, width: f64);
    /// Draws one row pass.
    fn row(&mut self, row: &RowPaint<'_>);
}

/// Plans the paint for a custom-drawn wheel.
#[derive(Clone, Debug, PartialEq)]
pub struct CurvedRenderer {
    policy: RenderPolicy,
    text_size: f64,
    outer_text_size: f64,
    inner_color: Color,
    outer_color: Color,
    separator_color: Color,
    separator_width: f64,
}

impl CurvedRenderer {
    /// Creates a renderer styled by `config`.
    #[must_use]
    pub fn new(config: &WheelConfig) -> Self {
        Self {
            policy: config.render_policy,
            text_size: config.text_size,
            outer_text_size: config.outer_text_size(),
            inner_color: config.inner_text_color,
            outer_color: config.outer_text_color,
            separator_color: config.separator_color,
            separator_width: config.separator_width,
        }
    }

    /// The policy rows are styled with.
    #[must_use]
    pub const fn policy(&self) -> RenderPolicy {
        self.policy
    }

    /// Paints one frame into `content`, the padded box of the wheel.
    ///
    /// Separators are drawn even when there are no items.
    pub fn paint<T: WheelItem, P: WheelPainter>(
        &self,
        geometry: &WheelGeometry,
        model: &OffsetModel<T>,
        content: Rect,
        painter: &mut P,
    ) {
        let (top_sep, bottom_sep) = geometry.separators();
        let top_line = content.y0 + top_sep;
        let bottom_line = content.y0 + bottom_sep;
        for y in [top_line, bottom_line] {
            painter.separator(
                Line::new((content.x0, y), (content.x1, y)),
                self.separator_color,
                self.separator_width,
            );
        }
        if model.is_empty() {
            return;
        }

        // A rubber-band residual shifts the whole picture past the end row.
        let item_offset = f64::from(model.item_offset() + model.overscroll());
        let count = geometry.visible_item_count();
        let center_slot = geometry.center_slot();
        for raw in geometry.project_rows(item_offset) {
            if !raw.visible {
                continue;
            }
            let Some((index, item)) = model.item_at_slot(raw.row, count) else {
                continue;
            };
            let text = item.show_text();
            match self.policy {
                RenderPolicy::Fold => {
                    let above = |line: f64| Rect::new(content.x0, content.y0, content.x1, line);
                    let below = |line: f64| Rect::new(content.x0, line, content.x1, content.y1);
                    let mut pass = |tone, clip| {
                        self.emit(painter, index, &text, &raw, content, tone, clip);
                    };
                    if raw.row == center_slot {
                        pass(Tone::Outer, Some(above(top_line)));
                        pass(Tone::Inner, Some(below(top_line)));
                    } else if raw.row == center_slot + 1 {
                        pass(Tone::Inner, Some(above(bottom_line)));
                        pass(Tone::Outer, Some(below(bottom_line)));
                    } else {
                        pass(Tone::Outer, None);
                    }
                }
                RenderPolicy::Continuous => {
                    let tone = if continuous_style(raw.scale_y).magnified {
                        Tone::Inner
                    } else {
                        Tone::Outer
                    };
                    let styled = raw.styled(RenderPolicy::Continuous);
                    self.emit(painter, index, &text, &styled, content, tone, None);
                }
            }
        }
    }

    fn emit<P: WheelPainter>(
        &self,
        painter: &mut P,
        index: usize,
        text: &str,
        projection: &CurveProjection,
        content: Rect,
        tone: Tone,
        clip: Option<Rect>,
    ) {
        let (color, text_size) = match tone {
            Tone::Inner => (self.inner_color, self.text_size),
            Tone::Outer => (self.outer_color, self.outer_text_size),
        };
        painter.row(&RowPaint {
            index,
            slot: projection.row,
            text: Cow::Borrowed(text),
            center: Point::new(content.center().x, content.y0 + projection.center_y),
            draw_y: projection.draw_y,
            scale_y: projection.scale_y,
            alpha: projection.alpha,
            tone,
            color: color.with_alpha_factor(projection.alpha),
            text_size,
            clip,
        });
    }
}

/// A recorded paint command.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// A separator line.
    Separator {
        /// Line geometry.
        line: Line,
        /// Stroke color.
        color: Color,
        /// Stroke width.
        width: f64,
    },
    /// A row pass, with its text owned.
    Row(RowPaint<'static>),
}

/// A [`WheelPainter`] that records what it is asked to draw.
///
/// Handy for headless hosts that replay the frame into their own renderer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayList {
    /// Commands in paint order.
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    /// Creates an empty display list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every recorded command.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Recorded row passes, in paint order.
    pub fn rows(&self) -> impl Iterator<Item = &RowPaint<'static>> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Row(row) => Some(row),
            DrawCommand::Separator { .. } => None,
        })
    }
}

impl WheelPainter for DisplayList {
    fn separator(&mut self, line: Line, color: Color, width: f64) {
        self.commands
            .push(DrawCommand::Separator { line, color, width });
    }

    fn row(&mut self, row: &RowPaint<'_>) {
        let text: String = row.text.clone().into_owned();
        self.commands.push(DrawCommand::Row(RowPaint {
            text: Cow::Owned(text),
            ..row.clone()
        }));
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kurbo::Rect;

    use super::{CurvedRenderer, DisplayList, DrawCommand, Tone};
    use crate::{OffsetModel, RenderPolicy, WheelConfig, WheelGeometry};

    type Fixture = (
        CurvedRenderer,
        WheelGeometry,
        OffsetModel<alloc::string::String>,
        Rect,
    );

    fn setup(policy: RenderPolicy, len: usize) -> Fixture {
        let config = WheelConfig {
            item_height: 60,
            render_policy: policy,
            ..WheelConfig::default()
        };
        let geometry = WheelGeometry::new(7, 60, 1.0).unwrap();
        let mut model = OffsetModel::new(60);
        model.set_items((0..len).map(|i| alloc::format!("item {i}")).collect());
        let content = Rect::new(10.0, 5.0, 210.0, 5.0 + geometry.diameter());
        (CurvedRenderer::new(&config), geometry, model, content)
    }

    #[test]
    fn separators_are_drawn_without_items() {
        let (renderer, geometry, model, content) = setup(RenderPolicy::Fold, 0);
        let mut list = DisplayList::new();
        renderer.paint(&geometry, &model, content, &mut list);
        assert_eq!(list.commands.len(), 2);
        let (top, bottom) = geometry.separators();
        let DrawCommand::Separator { line, width, .. } = &list.commands[0] else {
            panic!("expected a separator first");
        };
        assert_eq!(line.p0.y, 5.0 + top);
        assert_eq!((line.p0.x, line.p1.x), (10.0, 210.0));
        assert_eq!(*width, 1.0);
        let DrawCommand::Separator { line, .. } = &list.commands[1] else {
            panic!("expected a second separator");
        };
        assert_eq!(line.p0.y, 5.0 + bottom);
    }

    #[test]
    fn fold_splits_rows_at_the_separator_lines() {
        let (renderer, geometry, model, content) = setup(RenderPolicy::Fold, 3);
        let mut list = DisplayList::new();
        renderer.paint(&geometry, &model, content, &mut list);
        let rows: Vec<_> = list.rows().collect();
        let passes: Vec<_> = rows.iter().map(|r| (r.index, r.slot, r.tone)).collect();
        assert_eq!(
            passes,
            [
                (0, 3, Tone::Outer),
                (0, 3, Tone::Inner),
                (1, 4, Tone::Inner),
                (1, 4, Tone::Outer),
                (2, 5, Tone::Outer),
            ]
        );

        let (top, bottom) = geometry.separators();
        assert_eq!(rows[0].clip, Some(Rect::new(10.0, 5.0, 210.0, 5.0 + top)));
        assert_eq!(rows[1].clip, Some(Rect::new(10.0, 5.0 + top, 210.0, content.y1)));
        assert_eq!(rows[2].clip, Some(Rect::new(10.0, 5.0, 210.0, 5.0 + bottom)));
        assert_eq!(rows[3].clip, Some(Rect::new(10.0, 5.0 + bottom, 210.0, content.y1)));
        assert_eq!(rows[4].clip, None);

        assert_eq!(rows[1].text, "item 0");
        assert_eq!(rows[1].text_size, 16.0);
        assert_eq!(rows[0].text_size, 15.0);
        assert!((rows[1].center.y - (5.0 + geometry.radius())).abs() < 1e-9);
        assert_eq!(rows[1].center.x, 110.0);
    }

    #[test]
    fn hidden_slots_are_skipped() {
        let (renderer, geometry, mut model, content) = setup(RenderPolicy::Fold, 20);
        model.set_offset(300);
        let mut list = DisplayList::new();
        renderer.paint(&geometry, &model, content, &mut list);
        // Seven slots at rest, two of them split; the extra slot is too thin.
        assert_eq!(list.rows().count(), 9);
        assert!(list.rows().all(|r| r.slot < 7));
        assert_eq!(list.rows().next().map(|r| r.index), Some(2));
    }

    #[test]
    fn continuous_policy_magnifies_the_center_row() {
        let (renderer, geometry, model, content) = setup(RenderPolicy::Continuous, 3);
        let mut list = DisplayList::new();
        renderer.paint(&geometry, &model, content, &mut list);
        let rows: Vec<_> = list.rows().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.clip.is_none()));
        assert_eq!(rows[0].tone, Tone::Inner);
        assert!((rows[0].scale_y - 1.2).abs() < 1e-6);
        // The neighbor sits just past the magnification threshold.
        assert_eq!(rows[1].tone, Tone::Inner);
        assert!(rows[1].scale_y < 1.0);
        assert_eq!(rows[2].tone, Tone::Outer);
        assert!(rows[2].alpha < 0.7);
        assert!(rows[2].color.a < 255);
    }
}
