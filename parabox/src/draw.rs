// Copyright 2026 the Parabox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing a laid out paragraph.

use peniko::kurbo::{Affine, Point, Rect};

use crate::layout::{InsertionPoint, LayoutBox, ParagraphBox, Selection};
use crate::renderer::Segment;
use crate::source::{InlineObject, TextSource};

/// Trait for surfaces a paragraph can be drawn onto.
///
/// All positions are already transformed into surface coordinates.
pub trait Painter<S> {
    /// Draws a text segment with its baseline origin at `origin`.
    fn draw_segment(&mut self, segment: &S, source: &TextSource, start: usize, origin: Point);

    /// Draws an embedded object filling `bounds`.
    fn draw_inline_box(&mut self, object: &InlineObject, bounds: Rect);

    /// Fills a rectangle with the selection highlight.
    fn fill_range(&mut self, bounds: Rect);

    /// Draws an insertion caret.
    fn draw_caret(&mut self, bounds: Rect);
}

/// Returns the transform mapping `src` onto `dst`, scaling each axis independently.
///
/// A degenerate `src` axis is not scaled.
pub fn coord_map(src: Rect, dst: Rect) -> Affine {
    let scale = |from: f64, to: f64| if from == 0. { 1. } else { to / from };
    Affine::translate(dst.origin().to_vec2())
        * Affine::scale_non_uniform(
            scale(src.width(), dst.width()),
            scale(src.height(), dst.height()),
        )
        * Affine::translate(-src.origin().to_vec2())
}

impl<S: Segment> ParagraphBox<S> {
    /// Draws every box, in line order.
    pub fn draw(&self, painter: &mut impl Painter<S>, transform: Affine) {
        for line in self.lines() {
            let baseline = f64::from(line.baseline());
            for item in line.boxes() {
                match item {
                    LayoutBox::String(b) => {
                        let origin = transform * Point::new(f64::from(b.left), baseline);
                        painter.draw_segment(&b.segment, &self.source, b.start, origin);
                    }
                    LayoutBox::Inline(b) => {
                        let run = self.source.run_at(b.start);
                        let object = self.source.object(run);
                        let top = baseline - f64::from(b.ascent);
                        let bounds = Rect::from_origin_size(
                            (f64::from(b.left), top),
                            (f64::from(b.width), f64::from(object.height)),
                        );
                        painter.draw_inline_box(object, transform.transform_rect_bbox(bounds));
                    }
                }
            }
        }
    }

    /// Highlights the text of `selection`.
    pub fn draw_selection(
        &self,
        painter: &mut impl Painter<S>,
        selection: &Selection,
        transform: Affine,
    ) {
        self.selection_rects_with(selection, |rect| {
            painter.fill_range(transform.transform_rect_bbox(rect));
        });
    }

    /// Draws a caret `width` wide at `point`. Does nothing if the point is not laid out.
    pub fn draw_caret(
        &self,
        painter: &mut impl Painter<S>,
        point: InsertionPoint,
        width: f32,
        transform: Affine,
    ) {
        if let Some(rect) = self.caret_rect(point, width) {
            painter.draw_caret(transform.transform_rect_bbox(rect));
        }
    }
}
