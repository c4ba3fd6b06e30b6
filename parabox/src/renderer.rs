// Copyright 2026 the Parabox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The measuring and shaping capability consumed by layout.
//!
//! Parabox never measures text itself. For each candidate span it asks a [`Renderer`] for a
//! [`Segment`]: an opaque, measured, drawable piece of a single writing-system run, together
//! with an [`EndSegment`] classification of the break at its end. Implementations must be
//! deterministic: identical requests yield identical answers, which is what allows lines to
//! be reused after an edit.

use core::fmt::Debug;
use core::ops::Range;

use icu_properties::CodePointMapData;
use icu_properties::props::LineBreak;

use crate::layout::Affinity;
use crate::source::{TextSource, WritingSystem};

/// How the renderer may choose the end of a segment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BreakMode {
    /// Only at line-break opportunities between words.
    Word,
    /// Anywhere, clipping the text at the last character that fits.
    Clip,
}

/// Which whitespace a segment may contain at its end.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TrailingWs {
    /// Whitespace is treated like any other text.
    #[default]
    IncludeAll,
    /// The segment must not end with whitespace.
    NoWhitespace,
    /// The segment must consist of whitespace only.
    OnlyWhitespace,
}

/// Classification of the break at the end of a segment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndSegment {
    /// The segment reached the search limit and everything fit. Whether a line may end
    /// there is unknown.
    NoMore,
    /// The segment reached the search limit and a line may end there.
    OkayBreak,
    /// The segment ended at a good break because the rest did not fit. More lines follow.
    MoreLines,
    /// The segment ended at a writing-system boundary. A line may end there only if the
    /// final character permits a break after it.
    WsBreak,
    /// The segment stopped because of the trailing-whitespace mode; text of the other kind
    /// follows in the same run.
    MoreWhitespace,
    /// The segment ends after a mandatory break character.
    HardBreak,
    /// The segment ends where no line break is permitted. Only produced when clipping.
    BadBreak,
}

/// A request for the next segment of a line.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BreakRequest {
    /// Rendered offset where the segment starts.
    pub run_start: usize,
    /// End of the writing-system run. Text up to here may be examined for context.
    pub run_limit: usize,
    /// The segment must not extend beyond this offset.
    pub search_limit: usize,
    /// If set, something must be returned even if nothing fits.
    pub must_fit: bool,
    /// Width remaining on the line.
    pub available_width: f32,
    /// Preferred way to end the segment.
    pub primary: BreakMode,
    /// Way to end the segment when the primary mode finds nothing.
    pub fallback: BreakMode,
    /// Trailing whitespace handling.
    pub trailing_ws: TrailingWs,
    /// Writing system of the run.
    pub writing_system: WritingSystem,
    /// Base direction of the paragraph.
    pub paragraph_rtl: bool,
}

impl BreakRequest {
    /// The range the segment must come from.
    pub fn range(&self) -> Range<usize> {
        self.run_start..self.search_limit
    }
}

/// A segment proposed by the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentBreak<S> {
    /// The measured segment.
    pub segment: S,
    /// Number of rendered bytes consumed.
    pub len: usize,
    /// Width consumed on the line.
    pub width: f32,
    /// Classification of the break at the end of the segment.
    pub class: EndSegment,
}

/// The answer to a [`BreakRequest`].
#[derive(Clone, Debug, PartialEq)]
pub enum BreakOutcome<S> {
    /// A segment was found.
    Found(SegmentBreak<S>),
    /// Nothing fits in the available width. Never valid when `must_fit` was set.
    NothingFit,
}

/// An opaque, measured piece of rendered text produced by a [`Renderer`].
///
/// Offsets passed to segment methods are rendered offsets; `start` is where the segment
/// begins in the source.
pub trait Segment: Clone + Debug {
    /// Number of rendered bytes covered.
    fn len(&self) -> usize;

    /// Returns `true` if the segment covers no text.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Advance width.
    fn width(&self) -> f32;

    /// Distance from the top of the segment to its baseline.
    fn ascent(&self) -> f32;

    /// Distance from the baseline to the bottom of the segment.
    fn descent(&self) -> f32;

    /// Horizontal position, relative to the segment's left edge, of an insertion point at
    /// `offset` (in `start..=start + len`).
    fn offset_to_x(
        &self,
        source: &TextSource,
        start: usize,
        offset: usize,
        affinity: Affinity,
    ) -> f32;

    /// Horizontal extent, relative to the segment's left edge, of the text in `range`
    /// (a subrange of the segment).
    fn range_extent(&self, source: &TextSource, start: usize, range: Range<usize>) -> (f32, f32) {
        let a = self.offset_to_x(source, start, range.start, Affinity::Downstream);
        let b = self.offset_to_x(source, start, range.end, Affinity::Upstream);
        (a.min(b), a.max(b))
    }

    /// Resolves a horizontal position, relative to the segment's left edge, to the nearest
    /// insertion point.
    fn hit_test(&self, source: &TextSource, start: usize, x: f32) -> (usize, Affinity);
}

/// The measuring and shaping service used by layout.
pub trait Renderer {
    /// The segment type produced.
    type Segment: Segment;

    /// Finds the longest acceptable segment for `request`.
    fn find_break_point(
        &self,
        source: &TextSource,
        request: &BreakRequest,
    ) -> BreakOutcome<Self::Segment>;

    /// Returns `true` if text in `writing_system` runs right to left.
    fn is_right_to_left(&self, writing_system: WritingSystem) -> bool;

    /// Returns the Unicode line-break property of a rendered character.
    fn line_break_property(&self, ch: char) -> LineBreak {
        CodePointMapData::<LineBreak>::new().get(ch)
    }
}

/// Returns `true` if a line may end after a character with the line-break property `lb`.
pub fn allows_break_after(lb: LineBreak) -> bool {
    matches!(
        lb,
        LineBreak::Space
            | LineBreak::BreakAfter
            | LineBreak::BreakBoth
            | LineBreak::Hyphen
            | LineBreak::ZWSpace
            | LineBreak::MandatoryBreak
            | LineBreak::CarriageReturn
            | LineBreak::LineFeed
            | LineBreak::NextLine
    )
}

/// Returns `true` if a line must end after a character with the line-break property `lb`.
pub fn is_mandatory_break(lb: LineBreak) -> bool {
    matches!(
        lb,
        LineBreak::MandatoryBreak
            | LineBreak::CarriageReturn
            | LineBreak::LineFeed
            | LineBreak::NextLine
    )
}
