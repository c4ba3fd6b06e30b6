// Copyright 2026 the Parabox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Utility functions and types shared across tests.

mod asserts;
pub(crate) mod samples;

pub(crate) use asserts::{assert_eq_layout, assert_valid_layout};

use parabox::testing::{MonoRenderer, MonoSegment};
use parabox::{
    InlineObject, LayoutOptions, ParagraphBox, RunStyle, SourceBuilder, TextSource, WritingSystem,
};

pub(crate) const LATIN: WritingSystem = WritingSystem(1);
pub(crate) const ARABIC: WritingSystem = WritingSystem(2);
pub(crate) const CYRILLIC: WritingSystem = WritingSystem(3);

/// Style with ten unit wide characters.
pub(crate) fn style(writing_system: WritingSystem) -> RunStyle {
    RunStyle::new(writing_system, 10.0)
}

/// Renderer treating [`ARABIC`] as right to left.
pub(crate) fn renderer() -> MonoRenderer {
    MonoRenderer::new().with_rtl(ARABIC)
}

/// Content for a source built by [`source`].
#[derive(Clone, Copy, Debug)]
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

pub(crate) fn lay_out(source: TextSource, options: LayoutOptions) -> ParagraphBox<MonoSegment> {
    let mut paragraph = ParagraphBox::new(source);
    paragraph.layout(&renderer(), options).unwrap();
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
