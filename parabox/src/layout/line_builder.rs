// Copyright 2026 the Parabox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy construction of a single line.

use alloc::vec::Vec;
use core::ops::Range;

use smallvec::SmallVec;

use super::data::{InlineBox, LayoutBox, LineData, StringBox};
use super::LayoutOptions;
use crate::error::LayoutError;
use crate::renderer::{
    BreakMode, BreakOutcome, BreakRequest, EndSegment, Renderer, SegmentBreak, TrailingWs,
    allows_break_after,
};
use crate::source::{RenderRun, TextSource};
use crate::util::prev_char_boundary;

/// Why the end of a line was rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Rejection {
    /// The line ends inside a word.
    BadBreak,
    /// The line ends at a writing-system boundary after a character that does not permit a
    /// break.
    NoBreakAfter,
}

/// Outcome of a single building step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    Continue,
    LineDone,
    Backtrack(Rejection),
}

/// A box placed on the line being built, along with what is needed to request it again.
#[derive(Clone, Debug)]
struct Pending<S> {
    item: LayoutBox<S>,
    /// End of the writing-system run the box came from.
    run_limit: usize,
    /// Width that was available when the box was requested.
    available: f32,
    /// Trailing whitespace mode the box was requested with.
    ws_mode: TrailingWs,
}

/// Mutable state of the line being built.
#[derive(Clone, Debug)]
struct LineState<S> {
    /// Index of the line in the paragraph.
    line: usize,
    start: usize,
    offset: usize,
    /// Index of the render run containing `offset`.
    run: usize,
    /// Width of the boxes placed so far.
    x: f32,
    /// Left edge of the line.
    left: f32,
    max_width: f32,
    /// Whitespace mode for the next request in the current run, if one has been chosen.
    ws_mode: Option<TrailingWs>,
    boxes: SmallVec<[Pending<S>; 8]>,
}

impl<S> LineState<S> {
    fn available(&self) -> f32 {
        (self.max_width - self.x).max(0.)
    }

    fn push(&mut self, pending: Pending<S>) {
        self.offset = pending.item.end();
        self.x += pending.item.width();
        self.boxes.push(pending);
    }

    fn pop(&mut self) -> Option<Pending<S>> {
        let pending = self.boxes.pop()?;
        self.offset = pending.item.start();
        self.x -= pending.item.width();
        Some(pending)
    }
}

/// A line produced by [`LineBuilder::build_line`], not yet placed in a paragraph.
#[derive(Clone, Debug)]
pub(crate) struct BuiltLine<S> {
    pub(crate) text_range: Range<usize>,
    pub(crate) left: f32,
    pub(crate) width: f32,
    pub(crate) ascent: f32,
    pub(crate) descent: f32,
    pub(crate) boxes: Vec<LayoutBox<S>>,
}

impl<S> BuiltLine<S> {
    /// Converts into stored line data with boxes at `box_start` in the arena.
    pub(crate) fn into_data(self, box_start: usize, top: f32) -> (LineData, Vec<LayoutBox<S>>) {
        let data = LineData {
            text_range: self.text_range,
            box_range: box_start..box_start + self.boxes.len(),
            left: self.left,
            width: self.width,
            ascent: self.ascent,
            descent: self.descent,
            top,
        };
        (data, self.boxes)
    }
}

/// Builds lines of a paragraph one at a time.
pub(crate) struct LineBuilder<'a, R: Renderer> {
    renderer: &'a R,
    source: &'a TextSource,
    options: &'a LayoutOptions,
    text_len: usize,
}

impl<'a, R: Renderer> LineBuilder<'a, R> {
    pub(crate) fn new(renderer: &'a R, source: &'a TextSource, options: &'a LayoutOptions) -> Self {
        Self {
            renderer,
            source,
            options,
            text_len: source.rendered_len(),
        }
    }

    /// Builds the line starting at rendered offset `start`, which must be less than the
    /// length of the rendered text.
    pub(crate) fn build_line(
        &self,
        start: usize,
        line: usize,
    ) -> Result<BuiltLine<R::Segment>, LayoutError> {
        debug_assert!(start < self.text_len, "line must start before the end of the text");
        let indent = if line == 0 {
            self.options.first_line_indent
        } else {
            0.
        };
        let mut state = LineState {
            line,
            start,
            offset: start,
            run: self.source.run_index_at(start),
            x: 0.,
            left: indent,
            max_width: self.options.max_width - indent,
            ws_mode: None,
            boxes: SmallVec::new(),
        };

        while self.pack(&mut state)? == Step::Continue {}

        loop {
            match self.check_end(&state) {
                Step::Backtrack(reason) => {
                    log::trace!(
                        "line {line}: rejecting end at {} ({reason:?})",
                        state.offset
                    );
                    if self.backtrack(&mut state)? == Step::LineDone {
                        break;
                    }
                }
                _ => break,
            }
        }

        Ok(Self::arrange(state))
    }

    /// Adds the next box to the line.
    fn pack(&self, state: &mut LineState<R::Segment>) -> Result<Step, LayoutError> {
        if state.offset >= self.text_len {
            return Ok(Step::LineDone);
        }
        let runs = self.source.render_runs();
        while runs[state.run].rendered.end <= state.offset {
            state.run += 1;
            state.ws_mode = None;
        }
        let run = &runs[state.run];

        if run.is_box() {
            let object = self.source.object(run);
            if !state.boxes.is_empty() && state.x + object.width > state.max_width {
                return Ok(Step::LineDone);
            }
            let available = state.available();
            state.push(Pending {
                item: LayoutBox::Inline(InlineBox::new(object, run.rendered.clone())),
                run_limit: run.rendered.end,
                available,
                ws_mode: TrailingWs::IncludeAll,
            });
            return Ok(Step::Continue);
        }

        let mode = self.ws_mode(state, run);
        let must_fit = state.boxes.is_empty();
        let request = BreakRequest {
            run_start: state.offset,
            run_limit: run.rendered.end,
            search_limit: run.rendered.end,
            must_fit,
            available_width: state.available(),
            primary: BreakMode::Word,
            fallback: if must_fit {
                BreakMode::Clip
            } else {
                BreakMode::Word
            },
            trailing_ws: mode,
            writing_system: run.writing_system,
            paragraph_rtl: self.options.rtl,
        };
        let found = match self.renderer.find_break_point(self.source, &request) {
            BreakOutcome::Found(found) => found,
            BreakOutcome::NothingFit if must_fit => {
                return Err(LayoutError::nothing_fit(state.offset, state.line));
            }
            BreakOutcome::NothingFit => return Ok(Step::LineDone),
        };
        self.validate(&request, &found, state.line)?;

        let end = state.offset + found.len;
        let class = self.reclassify(found.class, end, state.run);
        log::trace!(
            "line {}: segment {}..{end} width {} {class:?}",
            state.line,
            state.offset,
            found.width
        );
        let available = request.available_width;
        state.push(Pending {
            item: LayoutBox::String(StringBox::new(
                found.segment,
                request.run_start,
                found.len,
                found.width,
                class,
            )),
            run_limit: request.run_limit,
            available,
            ws_mode: mode,
        });
        state.ws_mode = Some(match (mode, class) {
            (TrailingWs::NoWhitespace, EndSegment::MoreWhitespace) => TrailingWs::OnlyWhitespace,
            (TrailingWs::OnlyWhitespace, _) => TrailingWs::NoWhitespace,
            (mode, _) => mode,
        });

        Ok(match class {
            EndSegment::NoMore
            | EndSegment::OkayBreak
            | EndSegment::WsBreak
            | EndSegment::MoreWhitespace => Step::Continue,
            EndSegment::MoreLines | EndSegment::HardBreak | EndSegment::BadBreak => {
                Step::LineDone
            }
        })
    }

    /// Chooses the trailing whitespace mode for the next request in `run`.
    ///
    /// Runs whose direction disagrees with the paragraph alternate between whitespace and
    /// non-whitespace segments so that trailing whitespace can be placed separately.
    fn ws_mode(&self, state: &LineState<R::Segment>, run: &RenderRun) -> TrailingWs {
        let mixed = self.renderer.is_right_to_left(run.writing_system) != self.options.rtl;
        if !mixed {
            return TrailingWs::IncludeAll;
        }
        match state.ws_mode {
            Some(TrailingWs::OnlyWhitespace) => TrailingWs::OnlyWhitespace,
            _ if self.source.char_at(state.offset).is_whitespace() => TrailingWs::OnlyWhitespace,
            _ => TrailingWs::NoWhitespace,
        }
    }

    /// Adjusts the class of a segment that consumed its whole run.
    ///
    /// The renderer only sees one run, so it cannot know what follows. A box may always be
    /// broken before; anything else is a writing-system boundary.
    fn reclassify(&self, class: EndSegment, end: usize, run: usize) -> EndSegment {
        let runs = self.source.render_runs();
        if class != EndSegment::NoMore || end != runs[run].rendered.end || end >= self.text_len {
            return class;
        }
        match runs.get(run + 1) {
            Some(next) if next.is_box() => EndSegment::OkayBreak,
            Some(_) => EndSegment::WsBreak,
            None => class,
        }
    }

    fn validate(
        &self,
        request: &BreakRequest,
        found: &SegmentBreak<R::Segment>,
        line: usize,
    ) -> Result<(), LayoutError> {
        let end = request.run_start + found.len;
        if found.len == 0
            || end > request.search_limit
            || !self.source.rendered_text().is_char_boundary(end)
        {
            log::warn!(
                "renderer returned segment of length {} for {:?}",
                found.len,
                request.range()
            );
            return Err(LayoutError::invalid_segment(request.run_start, line));
        }
        Ok(())
    }

    /// Decides whether the line may end where packing stopped.
    fn check_end(&self, state: &LineState<R::Segment>) -> Step {
        if state.offset >= self.text_len {
            return Step::LineDone;
        }
        let Some(last) = state.boxes.last() else {
            return Step::LineDone;
        };
        let LayoutBox::String(string_box) = &last.item else {
            return Step::LineDone;
        };
        match string_box.class {
            EndSegment::BadBreak => Step::Backtrack(Rejection::BadBreak),
            EndSegment::WsBreak | EndSegment::NoMore => {
                let text = self.source.fetch(string_box.start, state.offset);
                let permitted = text
                    .chars()
                    .next_back()
                    .is_some_and(|ch| allows_break_after(self.renderer.line_break_property(ch)));
                if permitted {
                    Step::LineDone
                } else {
                    Step::Backtrack(Rejection::NoBreakAfter)
                }
            }
            _ => Step::LineDone,
        }
    }

    /// Moves the end of the line back after a rejection.
    ///
    /// First asks the renderer for a shorter version of the last box. Failing that, removes
    /// the last box unless it is the only one, in which case the bad break is kept.
    fn backtrack(&self, state: &mut LineState<R::Segment>) -> Result<Step, LayoutError> {
        let Some(last) = state.boxes.last() else {
            return Ok(Step::LineDone);
        };
        let LayoutBox::String(string_box) = &last.item else {
            return Ok(Step::LineDone);
        };
        let start = string_box.start;
        let end = start + string_box.len;
        let shorter = prev_char_boundary(self.source.rendered_text(), end);

        if shorter > start {
            let request = BreakRequest {
                run_start: start,
                run_limit: last.run_limit,
                search_limit: shorter,
                must_fit: false,
                available_width: last.available,
                primary: BreakMode::Word,
                fallback: BreakMode::Word,
                trailing_ws: last.ws_mode,
                writing_system: self.source.writing_system_at(start),
                paragraph_rtl: self.options.rtl,
            };
            let outcome = self.renderer.find_break_point(self.source, &request);
            if let BreakOutcome::Found(found) = outcome {
                self.validate(&request, &found, state.line)?;
                let retry = last.clone();
                state.pop();
                let class = found.class;
                state.push(Pending {
                    item: LayoutBox::String(StringBox::new(
                        found.segment,
                        start,
                        found.len,
                        found.width,
                        class,
                    )),
                    ..retry
                });
                log::trace!("line {}: shortened last box to {start}..{}", state.line, state.offset);
                if retry.ws_mode == TrailingWs::NoWhitespace
                    && class == EndSegment::MoreWhitespace
                {
                    self.append_whitespace(state, &retry, end)?;
                }
                return Ok(Step::Continue);
            }
        }

        if state.boxes.len() > 1 {
            state.pop();
            state.run = self.source.run_index_at(state.offset);
            log::trace!("line {}: removed last box, line ends at {}", state.line, state.offset);
            return Ok(Step::Continue);
        }

        log::debug!(
            "line {}: no acceptable break in {}..{}, keeping clipped line",
            state.line,
            state.start,
            state.offset
        );
        Ok(Step::LineDone)
    }

    /// Places the whitespace following a shortened box, up to the end of the box it
    /// replaced.
    fn append_whitespace(
        &self,
        state: &mut LineState<R::Segment>,
        replaced: &Pending<R::Segment>,
        limit: usize,
    ) -> Result<(), LayoutError> {
        if state.offset >= limit {
            return Ok(());
        }
        let request = BreakRequest {
            run_start: state.offset,
            run_limit: replaced.run_limit,
            search_limit: limit,
            must_fit: false,
            available_width: state.available(),
            primary: BreakMode::Word,
            fallback: BreakMode::Word,
            trailing_ws: TrailingWs::OnlyWhitespace,
            writing_system: self.source.writing_system_at(state.offset),
            paragraph_rtl: self.options.rtl,
        };
        if let BreakOutcome::Found(found) = self.renderer.find_break_point(self.source, &request) {
            self.validate(&request, &found, state.line)?;
            let available = request.available_width;
            state.push(Pending {
                item: LayoutBox::String(StringBox::new(
                    found.segment,
                    request.run_start,
                    found.len,
                    found.width,
                    found.class,
                )),
                run_limit: request.run_limit,
                available,
                ws_mode: TrailingWs::OnlyWhitespace,
            });
        }
        Ok(())
    }

    /// Positions the boxes of a finished line and measures it.
    fn arrange(state: LineState<R::Segment>) -> BuiltLine<R::Segment> {
        let mut x = state.left;
        let mut ascent = 0_f32;
        let mut descent = 0_f32;
        let mut boxes = Vec::with_capacity(state.boxes.len());
        for pending in state.boxes {
            let mut item = pending.item;
            item.set_left(x);
            x += item.width();
            ascent = ascent.max(item.ascent());
            descent = descent.max(item.descent());
            boxes.push(item);
        }
        BuiltLine {
            text_range: state.start..state.offset,
            left: state.left,
            width: x - state.left,
            ascent,
            descent,
            boxes,
        }
    }
}
