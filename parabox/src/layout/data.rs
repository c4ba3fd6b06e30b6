// Copyright 2026 the Parabox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::Range;

use crate::renderer::{EndSegment, Segment};
use crate::source::InlineObject;
use crate::util::shift;

/// A box holding a renderer-produced segment of text.
#[derive(Clone, Debug, PartialEq)]
pub struct StringBox<S> {
    pub(crate) segment: S,
    /// Rendered offset where the segment begins.
    pub(crate) start: usize,
    pub(crate) len: usize,
    pub(crate) width: f32,
    pub(crate) ascent: f32,
    pub(crate) descent: f32,
    /// Break classification at the end of the segment, after run-boundary adjustment.
    pub(crate) class: EndSegment,
    /// Horizontal offset from the left edge of the paragraph.
    pub(crate) left: f32,
}

impl<S: Segment> StringBox<S> {
    pub(crate) fn new(segment: S, start: usize, len: usize, width: f32, class: EndSegment) -> Self {
        Self {
            start,
            len,
            width,
            ascent: segment.ascent(),
            descent: segment.descent(),
            segment,
            class,
            left: 0.,
        }
    }
}

impl<S> StringBox<S> {
    /// Returns the renderer segment.
    pub fn segment(&self) -> &S {
        &self.segment
    }

    /// Returns the classification of the break at the end of the box.
    pub fn class(&self) -> EndSegment {
        self.class
    }
}

/// A box holding an embedded object.
#[derive(Clone, Debug, PartialEq)]
pub struct InlineBox {
    /// Identifier of the object.
    pub(crate) id: u64,
    pub(crate) start: usize,
    pub(crate) len: usize,
    pub(crate) width: f32,
    pub(crate) ascent: f32,
    pub(crate) descent: f32,
    pub(crate) left: f32,
}

impl InlineBox {
    pub(crate) fn new(object: &InlineObject, rendered: Range<usize>) -> Self {
        Self {
            id: object.id,
            start: rendered.start,
            len: rendered.len(),
            width: object.width,
            ascent: object.ascent,
            descent: (object.height - object.ascent).max(0.),
            left: 0.,
        }
    }

    /// Returns the identifier of the embedded object.
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// A box within a line.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutBox<S> {
    /// A segment of text.
    String(StringBox<S>),
    /// An embedded object.
    Inline(InlineBox),
}

impl<S> LayoutBox<S> {
    /// Rendered offset where the box begins.
    pub fn start(&self) -> usize {
        match self {
            Self::String(b) => b.start,
            Self::Inline(b) => b.start,
        }
    }

    /// Number of rendered bytes covered.
    pub fn len(&self) -> usize {
        match self {
            Self::String(b) => b.len,
            Self::Inline(b) => b.len,
        }
    }

    /// Returns `true` if the box covers no text. Boxes built by layout never are.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rendered offset where the box ends.
    pub fn end(&self) -> usize {
        self.start() + self.len()
    }

    /// Range of rendered text covered.
    pub fn text_range(&self) -> Range<usize> {
        self.start()..self.end()
    }

    /// Advance width.
    pub fn width(&self) -> f32 {
        match self {
            Self::String(b) => b.width,
            Self::Inline(b) => b.width,
        }
    }

    /// Distance from the top of the box to the baseline.
    pub fn ascent(&self) -> f32 {
        match self {
            Self::String(b) => b.ascent,
            Self::Inline(b) => b.ascent,
        }
    }

    /// Distance from the baseline to the bottom of the box.
    pub fn descent(&self) -> f32 {
        match self {
            Self::String(b) => b.descent,
            Self::Inline(b) => b.descent,
        }
    }

    /// Horizontal offset from the left edge of the paragraph.
    pub fn left(&self) -> f32 {
        match self {
            Self::String(b) => b.left,
            Self::Inline(b) => b.left,
        }
    }

    /// The break classification for string boxes, `None` for embedded boxes.
    pub fn class(&self) -> Option<EndSegment> {
        match self {
            Self::String(b) => Some(b.class),
            Self::Inline(_) => None,
        }
    }

    /// Returns `true` for embedded boxes.
    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline(_))
    }

    pub(crate) fn set_left(&mut self, left: f32) {
        match self {
            Self::String(b) => b.left = left,
            Self::Inline(b) => b.left = left,
        }
    }

    pub(crate) fn shift(&mut self, delta: isize) {
        match self {
            Self::String(b) => b.start = shift(b.start, delta),
            Self::Inline(b) => b.start = shift(b.start, delta),
        }
    }
}

/// Stored data for one line.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LineData {
    /// Range of rendered text covered.
    pub(crate) text_range: Range<usize>,
    /// Range of boxes in the paragraph's arena.
    pub(crate) box_range: Range<usize>,
    /// Offset of the first box from the left edge of the paragraph.
    pub(crate) left: f32,
    /// Sum of box widths.
    pub(crate) width: f32,
    pub(crate) ascent: f32,
    pub(crate) descent: f32,
    pub(crate) top: f32,
}

impl LineData {
    pub(crate) fn height(&self) -> f32 {
        self.ascent + self.descent
    }

    pub(crate) fn bottom(&self) -> f32 {
        self.top + self.height()
    }

    /// Right edge of the line content.
    pub(crate) fn extent(&self) -> f32 {
        self.left + self.width
    }
}
