// Copyright 2026 the Parabox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paragraph layout.

mod cursor;
mod data;
mod line_builder;
mod relayout;

use alloc::vec::Vec;
use core::ops::Range;

use peniko::kurbo::Rect;

use self::line_builder::{BuiltLine, LineBuilder};
use crate::error::LayoutError;
use crate::renderer::{Renderer, Segment};
use crate::source::TextSource;

pub(crate) use self::data::LineData;

pub use self::cursor::{Affinity, InsertionPoint, Selection};
pub use self::data::{InlineBox, LayoutBox, StringBox};

/// Vertical spacing between the tops of consecutive lines.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum LineHeight {
    /// Each line is as tall as its content.
    #[default]
    Natural,
    /// Each line is as tall as its content, but no shorter than the given height.
    AtLeast(f32),
    /// Every line is exactly the given height.
    Exactly(f32),
}

impl LineHeight {
    /// Returns the vertical space occupied by a line whose content is `natural` tall.
    pub fn slot(self, natural: f32) -> f32 {
        match self {
            Self::Natural => natural,
            Self::AtLeast(height) => natural.max(height),
            Self::Exactly(height) => height,
        }
    }
}

/// Parameters for laying out a paragraph.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LayoutOptions {
    /// Width available to each line.
    pub max_width: f32,
    /// Extra offset applied to the start of the first line. Reduces the width available
    /// to it.
    pub first_line_indent: f32,
    /// Vertical spacing of lines.
    pub line_height: LineHeight,
    /// Base direction of the paragraph. Runs whose direction differs are laid out with
    /// their trailing whitespace kept in separate boxes.
    pub rtl: bool,
}

impl LayoutOptions {
    /// Returns default options with the given maximum width.
    pub fn with_max_width(max_width: f32) -> Self {
        Self {
            max_width,
            ..Self::default()
        }
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            max_width: f32::MAX,
            first_line_indent: 0.,
            line_height: LineHeight::Natural,
            rtl: false,
        }
    }
}

/// A laid out paragraph.
///
/// Owns its [`TextSource`] together with the lines produced by the most recent layout.
/// Lines partition the rendered text in order; each holds at least one box.
#[derive(Clone, Debug)]
pub struct ParagraphBox<S> {
    pub(crate) source: TextSource,
    pub(crate) options: LayoutOptions,
    pub(crate) lines: Vec<LineData>,
    pub(crate) boxes: Vec<LayoutBox<S>>,
    pub(crate) width: f32,
    pub(crate) height: f32,
}

impl<S> ParagraphBox<S> {
    /// Creates a paragraph over `source`. It has no lines until laid out.
    pub fn new(source: TextSource) -> Self {
        Self {
            source,
            options: LayoutOptions::default(),
            lines: Vec::new(),
            boxes: Vec::new(),
            width: 0.,
            height: 0.,
        }
    }

    /// Returns the content of the paragraph.
    pub fn source(&self) -> &TextSource {
        &self.source
    }

    /// Returns mutable access to the content.
    ///
    /// Changes made through it are not tracked. The paragraph must be laid out again with
    /// [`ParagraphBox::layout`], or with [`ParagraphBox::relayout`] given a matching
    /// [`crate::Edit`].
    pub fn source_mut(&mut self) -> &mut TextSource {
        &mut self.source
    }

    /// Returns the options of the most recent layout.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Returns `true` if the paragraph was laid out right to left.
    pub fn is_rtl(&self) -> bool {
        self.options.rtl
    }

    /// Returns the number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if there are no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the line at `index`.
    pub fn line(&self, index: usize) -> Option<Line<'_, S>> {
        Some(Line {
            index,
            paragraph: self,
            data: self.lines.get(index)?,
        })
    }

    /// Returns an iterator over the lines.
    pub fn lines(&self) -> impl Iterator<Item = Line<'_, S>> + '_ + Clone {
        self.lines
            .iter()
            .enumerate()
            .map(move |(index, data)| Line {
                index,
                paragraph: self,
                data,
            })
    }

    /// Returns every box, in line order.
    pub fn boxes(&self) -> &[LayoutBox<S>] {
        &self.boxes
    }

    /// Width of the laid out content.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Height of the laid out content.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Returns the rectangle `(0, 0, width, height)`.
    pub fn bounds(&self) -> Rect {
        Rect::new(0., 0., f64::from(self.width), f64::from(self.height))
    }
}

impl<S: Segment> ParagraphBox<S> {
    /// Lays out the whole paragraph, replacing any previous layout.
    ///
    /// On error the previous layout is kept.
    pub fn layout<R>(&mut self, renderer: &R, options: LayoutOptions) -> Result<(), LayoutError>
    where
        R: Renderer<Segment = S>,
    {
        let mut scratch = LineLayout::default();
        let builder = LineBuilder::new(renderer, &self.source, &options);
        let text_len = self.source.rendered_len();
        let mut offset = 0;
        while offset < text_len {
            let built = builder.build_line(offset, scratch.lines.len())?;
            offset = built.text_range.end;
            scratch.push(built, options.line_height);
        }
        self.options = options;
        scratch.swap_into(self);
        log::debug!(
            "laid out {text_len} bytes in {} lines, {} x {}",
            self.lines.len(),
            self.width,
            self.height
        );
        Ok(())
    }

    /// Replaces the logical range `range` of the source with `text` and updates the layout,
    /// returning the area that must be repainted.
    pub fn replace<R>(
        &mut self,
        renderer: &R,
        range: Range<usize>,
        text: &str,
    ) -> Result<Rect, LayoutError>
    where
        R: Renderer<Segment = S>,
    {
        let edit = self.source.replace(range, text);
        self.relayout(renderer, edit)
    }
}

/// Lines and boxes under construction, swapped into a [`ParagraphBox`] once complete.
#[derive(Clone, Debug)]
pub(crate) struct LineLayout<S> {
    pub(crate) lines: Vec<LineData>,
    pub(crate) boxes: Vec<LayoutBox<S>>,
}

impl<S> Default for LineLayout<S> {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            boxes: Vec::new(),
        }
    }
}

impl<S> LineLayout<S> {
    /// Top of the next line to be pushed.
    pub(crate) fn next_top(&self, line_height: LineHeight) -> f32 {
        self.lines
            .last()
            .map_or(0., |line| line.top + line_height.slot(line.height()))
    }

    pub(crate) fn push(&mut self, built: BuiltLine<S>, line_height: LineHeight) {
        let top = self.next_top(line_height);
        let (data, boxes) = built.into_data(self.boxes.len(), top);
        self.lines.push(data);
        self.boxes.extend(boxes);
    }

    /// Moves the lines into `paragraph` and updates its dimensions.
    pub(crate) fn swap_into(&mut self, paragraph: &mut ParagraphBox<S>) {
        core::mem::swap(&mut self.lines, &mut paragraph.lines);
        core::mem::swap(&mut self.boxes, &mut paragraph.boxes);
        let (width, height) = measure(&paragraph.lines, &paragraph.options);
        paragraph.width = width;
        paragraph.height = height;
    }
}

/// Computes the width and height of a list of lines.
fn measure(lines: &[LineData], options: &LayoutOptions) -> (f32, f32) {
    let width = match lines {
        [] => 0.,
        [line] => line.extent(),
        _ => lines
            .iter()
            .map(LineData::extent)
            .fold(0_f32, f32::max)
            .min(options.max_width),
    };
    let height = lines
        .last()
        .map_or(0., |line| line.top + options.line_height.slot(line.height()));
    (width, height)
}

/// A line in a laid out paragraph.
#[derive(Debug)]
pub struct Line<'a, S> {
    index: usize,
    paragraph: &'a ParagraphBox<S>,
    data: &'a LineData,
}

impl<S> Clone for Line<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Line<'_, S> {}

impl<'a, S> Line<'a, S> {
    /// Returns the index of the line.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the range of rendered text covered.
    pub fn text_range(&self) -> Range<usize> {
        self.data.text_range.clone()
    }

    /// Returns the boxes of the line, left to right.
    pub fn boxes(&self) -> &'a [LayoutBox<S>] {
        &self.paragraph.boxes[self.data.box_range.clone()]
    }

    /// Offset of the first box from the left edge of the paragraph.
    pub fn left(&self) -> f32 {
        self.data.left
    }

    /// Combined width of the boxes.
    pub fn width(&self) -> f32 {
        self.data.width
    }

    /// Maximum ascent of the boxes.
    pub fn ascent(&self) -> f32 {
        self.data.ascent
    }

    /// Maximum descent of the boxes.
    pub fn descent(&self) -> f32 {
        self.data.descent
    }

    /// Height of the content, `ascent + descent`.
    pub fn height(&self) -> f32 {
        self.data.height()
    }

    /// Distance from the top of the paragraph to the top of the line.
    pub fn top(&self) -> f32 {
        self.data.top
    }

    /// Distance from the top of the paragraph to the baseline.
    pub fn baseline(&self) -> f32 {
        self.data.top + self.data.ascent
    }

    /// Returns the rectangle covering the content of the line.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            f64::from(self.data.left),
            f64::from(self.data.top),
            f64::from(self.data.extent()),
            f64::from(self.data.bottom()),
        )
    }
}
