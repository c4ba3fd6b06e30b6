// Copyright 2026 the Parabox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit testing, carets and selection geometry.

use alloc::vec::Vec;
use core::ops::Range;

use peniko::kurbo::{Point, Rect};

use super::{LayoutBox, LineData, ParagraphBox};
use crate::renderer::Segment;

/// Which side of an offset an insertion point is attached to.
///
/// Matters where two positions share an offset, such as the end of one line and the start
/// of the next.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Affinity {
    /// Attached to the character that logically follows.
    #[default]
    Downstream,
    /// Attached to the character that logically precedes.
    Upstream,
}

/// A position between characters of the rendered text.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct InsertionPoint {
    /// Rendered offset.
    pub offset: usize,
    /// Which neighboring character the point belongs to, deciding the line at a wrap.
    pub affinity: Affinity,
}

impl InsertionPoint {
    /// Creates an insertion point at `offset`.
    pub fn new(offset: usize, affinity: Affinity) -> Self {
        Self { offset, affinity }
    }

    /// An insertion point attached to the following character.
    pub fn downstream(offset: usize) -> Self {
        Self::new(offset, Affinity::Downstream)
    }

    /// An insertion point attached to the preceding character.
    pub fn upstream(offset: usize) -> Self {
        Self::new(offset, Affinity::Upstream)
    }
}

/// A range of rendered text between two insertion points.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Selection {
    /// Where the selection started.
    pub anchor: InsertionPoint,
    /// Where the selection currently ends. May precede the anchor.
    pub focus: InsertionPoint,
}

impl Selection {
    /// Creates a selection extending from `anchor` to `focus`.
    pub fn new(anchor: InsertionPoint, focus: InsertionPoint) -> Self {
        Self { anchor, focus }
    }

    /// A collapsed selection at `point`.
    pub fn caret(point: InsertionPoint) -> Self {
        Self::new(point, point)
    }

    /// Returns `true` if the selection covers no text.
    pub fn is_collapsed(&self) -> bool {
        self.anchor.offset == self.focus.offset
    }

    /// The selected rendered range, in logical order.
    pub fn text_range(&self) -> Range<usize> {
        let (a, b) = (self.anchor.offset, self.focus.offset);
        a.min(b)..a.max(b)
    }
}

impl<S: Segment> ParagraphBox<S> {
    /// Returns the index of the line containing `point`.
    ///
    /// An upstream point at the start of a line belongs to the end of the previous line.
    /// Returns `None` for an empty paragraph or an offset past the end of the text.
    pub fn line_for_point(&self, point: InsertionPoint) -> Option<usize> {
        let last = self.lines.last()?;
        if point.offset > last.text_range.end {
            return None;
        }
        let index = self
            .lines
            .partition_point(|line| line.text_range.end <= point.offset)
            .min(self.lines.len() - 1);
        if index > 0
            && point.affinity == Affinity::Upstream
            && point.offset == self.lines[index].text_range.start
        {
            return Some(index - 1);
        }
        Some(index)
    }

    /// Returns the line index and the index, within that line, of the box containing
    /// `point`.
    pub fn box_for_point(&self, point: InsertionPoint) -> Option<(usize, usize)> {
        let line_index = self.line_for_point(point)?;
        let boxes = &self.boxes[self.lines[line_index].box_range.clone()];
        let index = boxes
            .partition_point(|item| item.end() <= point.offset)
            .min(boxes.len().checked_sub(1)?);
        if index > 0 && point.affinity == Affinity::Upstream && point.offset == boxes[index].start()
        {
            return Some((line_index, index - 1));
        }
        Some((line_index, index))
    }

    /// Returns the horizontal position of `point`, relative to the left edge of the
    /// paragraph, along with its line.
    fn point_to_x(&self, point: InsertionPoint) -> Option<(usize, f32)> {
        let (line_index, box_index) = self.box_for_point(point)?;
        let line = &self.lines[line_index];
        let item = &self.boxes[line.box_range.start + box_index];
        let offset = point.offset.clamp(item.start(), item.end());
        let x = match item {
            LayoutBox::String(b) => {
                b.left + b.segment.offset_to_x(&self.source, b.start, offset, point.affinity)
            }
            LayoutBox::Inline(b) if offset == b.start => b.left,
            LayoutBox::Inline(b) => b.left + b.width,
        };
        Some((line_index, x))
    }

    /// Returns the rectangle of a caret at `point`, `width` wide and spanning its line.
    pub fn caret_rect(&self, point: InsertionPoint, width: f32) -> Option<Rect> {
        let (line_index, x) = self.point_to_x(point)?;
        let line = &self.lines[line_index];
        let x = f64::from(x);
        Some(Rect::new(
            x,
            f64::from(line.top),
            x + f64::from(width),
            f64::from(line.bottom()),
        ))
    }

    /// Returns the rectangles covering the text of `selection`, one per box.
    pub fn selection_rects(&self, selection: &Selection) -> Vec<Rect> {
        let mut rects = Vec::new();
        self.selection_rects_with(selection, |rect| rects.push(rect));
        rects
    }

    /// Invokes `f` with each rectangle covering the text of `selection`.
    pub fn selection_rects_with(&self, selection: &Selection, mut f: impl FnMut(Rect)) {
        if selection.is_collapsed() {
            return;
        }
        let range = selection.text_range();
        let first = self
            .lines
            .partition_point(|line| line.text_range.end <= range.start);
        for line in self.lines[first..]
            .iter()
            .take_while(|line| line.text_range.start < range.end)
        {
            self.line_selection(line, &range, &mut f);
        }
    }

    fn line_selection(&self, line: &LineData, range: &Range<usize>, f: &mut impl FnMut(Rect)) {
        let (top, bottom) = (f64::from(line.top), f64::from(line.bottom()));
        for item in &self.boxes[line.box_range.clone()] {
            let start = range.start.max(item.start());
            let end = range.end.min(item.end());
            if start >= end {
                continue;
            }
            let (x0, x1) = match item {
                LayoutBox::String(b) => {
                    let (x0, x1) = b.segment.range_extent(&self.source, b.start, start..end);
                    (b.left + x0, b.left + x1)
                }
                LayoutBox::Inline(b) => (b.left, b.left + b.width),
            };
            f(Rect::new(f64::from(x0), top, f64::from(x1), bottom));
        }
    }

    /// Returns the vertical coordinate separating line `index` from the next one.
    ///
    /// This is midway between the bottom of the line and the top of the next, or the
    /// bottom of the line if it is the last.
    pub fn split_boundary(&self, index: usize) -> Option<f32> {
        let line = self.lines.get(index)?;
        Some(match self.lines.get(index + 1) {
            Some(next) => (line.bottom() + next.top) * 0.5,
            None => line.bottom(),
        })
    }

    /// Returns the insertion point nearest to `point`, in paragraph coordinates.
    pub fn hit_test(&self, point: Point) -> InsertionPoint {
        let Some(last) = self.lines.len().checked_sub(1) else {
            return InsertionPoint::default();
        };
        let y = point.y as f32;
        let x = point.x as f32;
        let line_index = (0..last)
            .find(|&i| self.split_boundary(i).is_some_and(|split| y < split))
            .unwrap_or(last);
        let line = &self.lines[line_index];
        let boxes = &self.boxes[line.box_range.clone()];
        let Some(item) = boxes
            .iter()
            .find(|item| x < item.left() + item.width())
            .or(boxes.last())
        else {
            return InsertionPoint::downstream(line.text_range.start);
        };
        let (offset, affinity) = match item {
            LayoutBox::String(b) => b.segment.hit_test(&self.source, b.start, x - b.left),
            LayoutBox::Inline(b) if x < b.left + b.width * 0.5 => (b.start, Affinity::Downstream),
            LayoutBox::Inline(b) => (b.start + b.len, Affinity::Upstream),
        };
        InsertionPoint::new(offset, affinity)
    }
}
