// Copyright 2026 the Parabox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::testing::{MonoRenderer, MonoSegment};
use crate::{
    BreakOutcome, BreakRequest, EndSegment, InlineObject, LayoutOptions, ParagraphBox, Renderer,
    RunStyle, SourceBuilder, TextSource, WritingSystem,
};

pub(crate) const LATIN: WritingSystem = WritingSystem(1);
pub(crate) const HEBREW: WritingSystem = WritingSystem(2);
pub(crate) const GREEK: WritingSystem = WritingSystem(3);

/// Style with ten unit wide characters.
pub(crate) fn style(writing_system: WritingSystem) -> RunStyle {
    RunStyle::new(writing_system, 10.0)
}

/// Content for a source built by [`source`].
pub(crate) enum Item<'a> {
    Text(&'a str, WritingSystem),
    Object(u64, f32, f32),
}

pub(crate) fn source(items: &[Item<'_>]) -> TextSource {
    let mut builder = SourceBuilder::new(style(LATIN));
    for item in items {
        match *item {
            Item::Text(text, ws) => builder.push_text(text, style(ws)),
            Item::Object(id, width, height) => {
                builder.push_object(InlineObject::new(id, width, height));
            }
        }
    }
    builder.build()
}

pub(crate) fn latin(text: &str) -> TextSource {
    source(&[Item::Text(text, LATIN)])
}

pub(crate) fn lay_out(source: TextSource, max_width: f32) -> ParagraphBox<MonoSegment> {
    lay_out_with(&MonoRenderer::new(), source, LayoutOptions::with_max_width(max_width))
}

pub(crate) fn lay_out_with<R: Renderer<Segment = MonoSegment>>(
    renderer: &R,
    source: TextSource,
    options: LayoutOptions,
) -> ParagraphBox<MonoSegment> {
    let mut paragraph = ParagraphBox::new(source);
    paragraph.layout(renderer, options).unwrap();
    paragraph
}

/// Rendered text of each line.
pub(crate) fn line_texts<S>(paragraph: &ParagraphBox<S>) -> Vec<&str> {
    paragraph
        .lines()
        .map(|line| {
            let range = line.text_range();
            paragraph.source().fetch(range.start, range.end)
        })
        .collect()
}

/// Rendered text of each box of line `index`.
pub(crate) fn box_texts<S>(paragraph: &ParagraphBox<S>, index: usize) -> Vec<&str> {
    paragraph
        .line(index)
        .unwrap()
        .boxes()
        .iter()
        .map(|item| paragraph.source().fetch(item.start(), item.end()))
        .collect()
}

/// Wraps a [`MonoRenderer`], replacing the `NoMore` classification with another.
pub(crate) struct ClassOverride {
    pub(crate) inner: MonoRenderer,
    pub(crate) class: EndSegment,
}

impl Renderer for ClassOverride {
    type Segment = MonoSegment;

    fn find_break_point(
        &self,
        source: &TextSource,
        request: &BreakRequest,
    ) -> BreakOutcome<MonoSegment> {
        match self.inner.find_break_point(source, request) {
            BreakOutcome::Found(mut found) if found.class == EndSegment::NoMore => {
                found.class = self.class;
                BreakOutcome::Found(found)
            }
            outcome => outcome,
        }
    }

    fn is_right_to_left(&self, writing_system: WritingSystem) -> bool {
        self.inner.is_right_to_left(writing_system)
    }
}
