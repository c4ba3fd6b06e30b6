// Copyright 2026 the Parabox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental layout after an edit.

use peniko::kurbo::Rect;

use super::line_builder::LineBuilder;
use super::{LineData, LineLayout, ParagraphBox};
use crate::error::LayoutError;
use crate::renderer::{Renderer, Segment, allows_break_after};
use crate::source::Edit;
use crate::util::{nearly_eq, shift};

/// Vertical and horizontal extent of the area changed by a relayout.
#[derive(Copy, Clone, Debug)]
struct Damage {
    top: f32,
    bottom: f32,
    right: f32,
}

impl Damage {
    fn add(damage: &mut Option<Self>, top: f32, bottom: f32, right: f32) {
        *damage = Some(match *damage {
            Some(d) => Self {
                top: d.top.min(top),
                bottom: d.bottom.max(bottom),
                right: d.right.max(right),
            },
            None => Self { top, bottom, right },
        });
    }
}

impl<S: Segment> ParagraphBox<S> {
    /// Updates the layout after the source changed by `edit`, returning the area that must
    /// be repainted.
    ///
    /// Lines before the edit that cannot have changed are kept, and lines after it are
    /// reused, shifted, as soon as the rebuilt lines reach one of their starting offsets.
    /// The result is identical to a full [`ParagraphBox::layout`] with the same options.
    /// On error the previous layout is kept.
    ///
    /// The edit must describe the change since the last layout; a mismatch panics.
    pub fn relayout<R>(&mut self, renderer: &R, edit: Edit) -> Result<Rect, LayoutError>
    where
        R: Renderer<Segment = S>,
    {
        let text_len = self.source.rendered_len();
        let old_bounds = self.bounds();
        if self.lines.is_empty() || text_len == 0 {
            log::debug!("relayout of empty paragraph, laying out from scratch");
            self.layout(renderer, self.options)?;
            return Ok(old_bounds.union(self.bounds()));
        }

        let old_len = self.lines.last().map_or(0, |line| line.text_range.end);
        let delta = edit.delta();
        assert!(
            edit.old_end() <= old_len && shift(old_len, delta) == text_len,
            "edit {edit:?} does not match laid out length {old_len} and text length {text_len}"
        );

        // A line is kept when the text between its end and the edit allows a break.
        let breaks_before_edit = |end: usize| {
            end <= edit.start
                && self
                    .source
                    .fetch(end, edit.start)
                    .chars()
                    .any(|ch| allows_break_after(renderer.line_break_property(ch)))
        };
        let prefix = self
            .lines
            .iter()
            .take_while(|line| breaks_before_edit(line.text_range.end))
            .count();

        let box_end = prefix
            .checked_sub(1)
            .map_or(0, |last| self.lines[last].box_range.end);
        let mut scratch = LineLayout {
            lines: self.lines[..prefix].to_vec(),
            boxes: self.boxes[..box_end].to_vec(),
        };
        let line_height = self.options.line_height;

        // Old lines after the edit, candidates for reuse. The first line is never reused
        // since it may carry an indent.
        let mut candidate = (prefix.max(1)..self.lines.len())
            .find(|&i| self.lines[i].text_range.start >= edit.old_end())
            .unwrap_or(self.lines.len());

        let builder = LineBuilder::new(renderer, &self.source, &self.options);
        let mut offset = scratch.lines.last().map_or(0, |line| line.text_range.end);
        let mut resync = None;
        while offset < text_len {
            let built = builder.build_line(offset, scratch.lines.len())?;
            offset = built.text_range.end;
            scratch.push(built, line_height);
            while candidate < self.lines.len()
                && shift(self.lines[candidate].text_range.start, delta) < offset
            {
                candidate += 1;
            }
            if candidate < self.lines.len()
                && shift(self.lines[candidate].text_range.start, delta) == offset
            {
                resync = Some(candidate);
                break;
            }
        }
        let rebuilt_end = scratch.lines.len();
        let old_tail = resync.unwrap_or(self.lines.len());

        let mut damage = None;
        for line in &self.lines[prefix..old_tail] {
            Damage::add(&mut damage, line.top, self.slot_bottom(line), line.extent());
        }
        for line in &scratch.lines[prefix..rebuilt_end] {
            Damage::add(&mut damage, line.top, self.slot_bottom(line), line.extent());
        }

        if let Some(first) = resync {
            log::trace!(
                "relayout resynchronized at old line {first}, new offset {offset}, delta {delta}"
            );
            let mut settled = false;
            for old in &self.lines[first..] {
                let top = if settled {
                    old.top
                } else {
                    scratch.next_top(line_height)
                };
                if nearly_eq(top, old.top) {
                    settled = true;
                } else {
                    Damage::add(&mut damage, old.top, self.slot_bottom(old), old.extent());
                    let moved_bottom = top + line_height.slot(old.height());
                    Damage::add(&mut damage, top, moved_bottom, old.extent());
                }
                let box_start = scratch.boxes.len();
                scratch
                    .boxes
                    .extend(self.boxes[old.box_range.clone()].iter().map(|item| {
                        let mut item = item.clone();
                        item.shift(delta);
                        item
                    }));
                let start = shift(old.text_range.start, delta);
                let end = shift(old.text_range.end, delta);
                scratch.lines.push(LineData {
                    text_range: start..end,
                    box_range: box_start..scratch.boxes.len(),
                    top,
                    ..old.clone()
                });
            }
        }

        let old_width = self.width;
        let old_height = self.height;
        scratch.swap_into(self);
        log::debug!(
            "relayout of {edit:?}: kept {prefix} lines, rebuilt {}, reused {}",
            rebuilt_end - prefix,
            self.lines.len() - rebuilt_end
        );

        if self.height > old_height {
            Damage::add(&mut damage, old_height, self.height, 0.);
        }
        let right = damage
            .map_or(0_f32, |d| d.right)
            .max(old_width)
            .max(self.width);
        let mut rect = damage.map_or(Rect::ZERO, |d| {
            Rect::new(0., f64::from(d.top), f64::from(right), f64::from(d.bottom))
        });
        if self.width > old_width {
            let band = Rect::new(
                f64::from(old_width),
                0.,
                f64::from(self.width),
                f64::from(self.height.max(old_height)),
            );
            rect = rect.union(band);
        }
        Ok(rect)
    }

    fn slot_bottom(&self, line: &LineData) -> f32 {
        line.top + self.options.line_height.slot(line.height())
    }
}
