// Copyright 2026 the Parabox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic implementations of the rendering traits, for tests and examples.
//!
//! [`MonoRenderer`] gives every character an advance equal to its font size, except zero
//! width spaces and mandatory breaks, which are zero wide. Ascent and descent are 0.8 and
//! 0.2 of the font size. Line-break opportunities follow the Unicode line-break property of
//! the preceding character. Whitespace is measured like any other character.

use alloc::vec::Vec;
use core::ops::Range;

use icu_properties::CodePointMapData;
use icu_properties::props::LineBreak;
use peniko::kurbo::{Point, Rect};
use smallvec::SmallVec;

use crate::draw::Painter;
use crate::layout::Affinity;
use crate::renderer::{
    BreakMode, BreakOutcome, BreakRequest, EndSegment, Renderer, Segment, SegmentBreak, TrailingWs,
    allows_break_after, is_mandatory_break,
};
use crate::source::{InlineObject, TextSource, WritingSystem};

/// Slack allowed when comparing widths.
const FIT_EPSILON: f32 = 1e-3;

/// Advance of the character `ch` at rendered offset `ich`.
fn advance(source: &TextSource, ich: usize, ch: char, lb: LineBreak) -> f32 {
    if ch == '\u{200B}' || is_mandatory_break(lb) {
        0.
    } else {
        source.style_at(ich).font_size
    }
}

/// A measured character.
#[derive(Copy, Clone, Debug)]
struct CharInfo {
    ch: char,
    /// Rendered offset just past the character.
    end: usize,
    lb: LineBreak,
    width: f32,
    font_size: f32,
}

/// A segment measured by [`MonoRenderer`].
#[derive(Clone, Debug, PartialEq)]
pub struct MonoSegment {
    len: usize,
    width: f32,
    ascent: f32,
    descent: f32,
    rtl: bool,
}

impl MonoSegment {
    /// Returns `true` if the segment runs right to left.
    pub fn is_rtl(&self) -> bool {
        self.rtl
    }

    /// Advance of each character of the segment starting at `start`, in logical order.
    fn advances<'a>(
        &self,
        source: &'a TextSource,
        start: usize,
    ) -> impl Iterator<Item = (usize, f32)> + 'a {
        let lb = CodePointMapData::<LineBreak>::new();
        source
            .fetch(start, start + self.len)
            .char_indices()
            .map(move |(i, ch)| (start + i, advance(source, start + i, ch, lb.get(ch))))
    }
}

impl Segment for MonoSegment {
    fn len(&self) -> usize {
        self.len
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn ascent(&self) -> f32 {
        self.ascent
    }

    fn descent(&self) -> f32 {
        self.descent
    }

    fn offset_to_x(
        &self,
        source: &TextSource,
        start: usize,
        offset: usize,
        _affinity: Affinity,
    ) -> f32 {
        let before: f32 = self
            .advances(source, start)
            .take_while(|(ich, _)| *ich < offset)
            .map(|(_, width)| width)
            .sum();
        if self.rtl { self.width - before } else { before }
    }

    fn hit_test(&self, source: &TextSource, start: usize, x: f32) -> (usize, Affinity) {
        let x = if self.rtl { self.width - x } else { x };
        let mut acc = 0.;
        for (ich, width) in self.advances(source, start) {
            if x < acc + width * 0.5 {
                return (ich, Affinity::Downstream);
            }
            acc += width;
        }
        (start + self.len, Affinity::Upstream)
    }
}

/// A renderer with fixed advances, see the [module documentation](self).
#[derive(Clone, Debug, Default)]
pub struct MonoRenderer {
    rtl: SmallVec<[WritingSystem; 4]>,
}

impl MonoRenderer {
    /// Creates a renderer treating every writing system as left to right.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `writing_system` as right to left.
    #[must_use]
    pub fn with_rtl(mut self, writing_system: WritingSystem) -> Self {
        self.rtl.push(writing_system);
        self
    }

    fn measure(&self, source: &TextSource, range: Range<usize>) -> Vec<CharInfo> {
        source
            .fetch(range.start, range.end)
            .char_indices()
            .map(|(i, ch)| {
                let ich = range.start + i;
                let lb = self.line_break_property(ch);
                CharInfo {
                    ch,
                    end: ich + ch.len_utf8(),
                    lb,
                    width: advance(source, ich, ch, lb),
                    font_size: source.style_at(ich).font_size,
                }
            })
            .collect()
    }

    fn segment(
        &self,
        request: &BreakRequest,
        chars: &[CharInfo],
        class: EndSegment,
    ) -> BreakOutcome<MonoSegment> {
        let font_size = chars.iter().map(|c| c.font_size).fold(0_f32, f32::max);
        let width: f32 = chars.iter().map(|c| c.width).sum();
        let len = chars.last().map_or(0, |c| c.end) - request.run_start;
        BreakOutcome::Found(SegmentBreak {
            segment: MonoSegment {
                len,
                width,
                ascent: font_size * 0.8,
                descent: font_size * 0.2,
                rtl: self.is_right_to_left(request.writing_system),
            },
            len,
            width,
            class,
        })
    }

    /// Emits the first `count` characters, dropping trailing whitespace when the request
    /// forbids it.
    fn finish(
        &self,
        request: &BreakRequest,
        chars: &[CharInfo],
        count: usize,
        class: EndSegment,
    ) -> BreakOutcome<MonoSegment> {
        if request.trailing_ws == TrailingWs::NoWhitespace {
            let kept = chars[..count]
                .iter()
                .rposition(|c| !c.ch.is_whitespace() || is_mandatory_break(c.lb))
                .map_or(0, |i| i + 1);
            if kept > 0 && kept < count {
                return self.segment(request, &chars[..kept], EndSegment::MoreWhitespace);
            }
        }
        self.segment(request, &chars[..count], class)
    }

    /// Handles a whitespace-only request. Returns `None` if the text does not start with
    /// whitespace.
    fn whitespace(
        &self,
        source: &TextSource,
        request: &BreakRequest,
        chars: &[CharInfo],
    ) -> Option<BreakOutcome<MonoSegment>> {
        let mut width = 0.;
        let mut count = 0;
        let mut class = None;
        for c in chars {
            if !c.ch.is_whitespace() {
                class = Some(EndSegment::MoreWhitespace);
                break;
            }
            if width + c.width > request.available_width + FIT_EPSILON {
                class = Some(EndSegment::MoreLines);
                break;
            }
            width += c.width;
            count += 1;
            if is_mandatory_break(c.lb) {
                class = Some(EndSegment::HardBreak);
                break;
            }
        }
        let class = class.unwrap_or_else(|| {
            if request.search_limit == request.run_limit {
                EndSegment::OkayBreak
            } else if source.char_at(request.search_limit).is_whitespace() {
                EndSegment::MoreLines
            } else {
                EndSegment::MoreWhitespace
            }
        });
        if count == 0 {
            return match class {
                EndSegment::MoreWhitespace => None,
                _ if request.must_fit => {
                    Some(self.segment(request, &chars[..1], EndSegment::MoreLines))
                }
                _ => Some(BreakOutcome::NothingFit),
            };
        }
        Some(self.segment(request, &chars[..count], class))
    }
}

impl Renderer for MonoRenderer {
    type Segment = MonoSegment;

    fn find_break_point(
        &self,
        source: &TextSource,
        request: &BreakRequest,
    ) -> BreakOutcome<MonoSegment> {
        let chars = self.measure(source, request.range());
        if chars.is_empty() {
            return BreakOutcome::NothingFit;
        }
        if request.trailing_ws == TrailingWs::OnlyWhitespace {
            if let Some(outcome) = self.whitespace(source, request, &chars) {
                return outcome;
            }
        }

        let mut width = 0.;
        let mut fit = 0;
        for c in &chars {
            if width + c.width > request.available_width + FIT_EPSILON {
                break;
            }
            width += c.width;
            fit += 1;
            if is_mandatory_break(c.lb) {
                return self.segment(request, &chars[..fit], EndSegment::HardBreak);
            }
        }

        if fit == chars.len() {
            let permitted = allows_break_after(chars[fit - 1].lb);
            if request.search_limit == request.run_limit {
                let class = if permitted {
                    EndSegment::OkayBreak
                } else {
                    EndSegment::NoMore
                };
                return self.finish(request, &chars, fit, class);
            }
            if permitted {
                return self.finish(request, &chars, fit, EndSegment::MoreLines);
            }
        }

        if let Some(i) = chars[..fit].iter().rposition(|c| allows_break_after(c.lb)) {
            return self.finish(request, &chars, i + 1, EndSegment::MoreLines);
        }
        if request.primary == BreakMode::Clip || request.fallback == BreakMode::Clip {
            let count = fit.max(1);
            let class = if allows_break_after(chars[count - 1].lb) {
                EndSegment::MoreLines
            } else {
                EndSegment::BadBreak
            };
            return self.segment(request, &chars[..count], class);
        }
        BreakOutcome::NothingFit
    }

    fn is_right_to_left(&self, writing_system: WritingSystem) -> bool {
        self.rtl.contains(&writing_system)
    }
}

/// A drawing operation recorded by [`RecordingPainter`].
#[derive(Clone, Debug, PartialEq)]
pub enum PaintOp {
    /// A text segment.
    Segment {
        /// Rendered range of the segment.
        text: Range<usize>,
        /// Left end of the baseline.
        origin: Point,
    },
    /// An embedded object.
    InlineBox {
        /// Identifier of the object.
        id: u64,
        /// Where the object is drawn.
        bounds: Rect,
    },
    /// A selection highlight.
    Fill(Rect),
    /// A caret.
    Caret(Rect),
}

/// A [`Painter`] that records what it is asked to draw.
#[derive(Clone, Debug, Default)]
pub struct RecordingPainter {
    /// Operations in the order they were issued.
    pub ops: Vec<PaintOp>,
}

impl<S: Segment> Painter<S> for RecordingPainter {
    fn draw_segment(&mut self, segment: &S, _source: &TextSource, start: usize, origin: Point) {
        self.ops.push(PaintOp::Segment {
            text: start..start + segment.len(),
            origin,
        });
    }

    fn draw_inline_box(&mut self, object: &InlineObject, bounds: Rect) {
        self.ops.push(PaintOp::InlineBox {
            id: object.id,
            bounds,
        });
    }

    fn fill_range(&mut self, bounds: Rect) {
        self.ops.push(PaintOp::Fill(bounds));
    }

    fn draw_caret(&mut self, bounds: Rect) {
        self.ops.push(PaintOp::Caret(bounds));
    }
}
