// Copyright 2026 the Parabox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Invariants checked over many widths and options.

use parabox::testing::MonoSegment;
use parabox::{EndSegment, LayoutBox, LayoutOptions, LineHeight, ParagraphBox, TextSource};

use crate::util::samples::{five_lines, mixed};
use crate::util::{Item, LATIN, assert_eq_layout, assert_valid_layout, lay_out, renderer, source};

/// Widths from narrower than a character to wider than any sample.
fn widths() -> impl Iterator<Item = f32> {
    (1..=60).map(|i| i as f32 * 7.5)
}

fn option_sets() -> Vec<LayoutOptions> {
    let mut sets = Vec::new();
    for max_width in widths() {
        let plain = LayoutOptions::with_max_width(max_width);
        sets.push(plain);
        sets.push(LayoutOptions { rtl: true, ..plain });
        sets.push(LayoutOptions {
            first_line_indent: 12.5,
            line_height: LineHeight::AtLeast(13.0),
            ..plain
        });
    }
    sets
}

fn samples() -> Vec<(&'static str, TextSource)> {
    vec![
        ("five lines", five_lines()),
        ("mixed", mixed()),
        (
            "objects only",
            source(&[
                Item::Object(1, 30.0, 10.0),
                Item::Object(2, 45.0, 5.0),
                Item::Object(3, 10.0, 30.0),
            ]),
        ),
        (
            "zero width",
            source(&[Item::Text("a\u{200B}b\u{200B}c\n\nd-e f", LATIN)]),
        ),
    ]
}

fn for_each_layout(mut check: impl FnMut(&ParagraphBox<MonoSegment>, &LayoutOptions, &str)) {
    for (name, sample) in samples() {
        for options in option_sets() {
            let case = format!("{name} with {options:?}");
            let paragraph = lay_out(sample.clone(), options);
            check(&paragraph, &options, &case);
        }
    }
}

#[test]
fn properties_lines_cover_text() {
    for_each_layout(|paragraph, _, case| assert_valid_layout(paragraph, case));
}

#[test]
fn properties_lines_fit_unless_first_box_is_too_wide() {
    for_each_layout(|paragraph, options, case| {
        for line in paragraph.lines() {
            let available = options.max_width - line.left();
            if line.width() > available + 1e-3 {
                assert!(
                    line.boxes()[0].width() > available,
                    "line {} overflows with {case}",
                    line.index()
                );
            }
        }
    });
}

#[test]
fn properties_lines_stack_without_gaps() {
    for_each_layout(|paragraph, options, case| {
        let mut top = 0.0;
        for line in paragraph.lines() {
            assert_eq!(line.top(), top, "line {} top with {case}", line.index());
            assert_eq!(line.baseline(), line.top() + line.ascent());
            top = line.top() + options.line_height.slot(line.height());
        }
        assert_eq!(paragraph.height(), top, "height with {case}");
    });
}

#[test]
fn properties_boxes_are_placed_left_to_right() {
    for_each_layout(|paragraph, _, case| {
        for line in paragraph.lines() {
            let mut x = line.left();
            for item in line.boxes() {
                assert_eq!(item.left(), x, "box at {} with {case}", item.start());
                x += item.width();
            }
            assert_eq!(x - line.left(), line.width(), "line width with {case}");
        }
    });
}

#[test]
fn properties_no_more_only_at_end_of_text() {
    for_each_layout(|paragraph, _, case| {
        let text_len = paragraph.source().rendered_len();
        for item in paragraph.boxes() {
            if item.class() == Some(EndSegment::NoMore) {
                assert_eq!(item.end(), text_len, "box at {} with {case}", item.start());
            }
        }
    });
}

#[test]
fn properties_writing_system_breaks_only_at_run_boundaries() {
    for_each_layout(|paragraph, _, case| {
        let source = paragraph.source();
        for item in paragraph.boxes() {
            if item.class() == Some(EndSegment::WsBreak) {
                let next = source.run_at(item.end());
                let at = item.start();
                assert_eq!(next.rendered.start, item.end(), "box at {at} with {case}");
                assert!(!next.is_box(), "box at {at} with {case}");
            }
        }
    });
}

#[test]
fn properties_inline_boxes_match_objects() {
    for_each_layout(|paragraph, _, case| {
        let source = paragraph.source();
        for item in paragraph.boxes() {
            if let LayoutBox::Inline(inline) = item {
                let object = source.object(source.run_at(item.start()));
                assert_eq!(inline.id(), object.id, "{case}");
                assert_eq!(item.width(), object.width, "{case}");
                assert_eq!(item.len(), 3, "{case}");
            }
        }
    });
}

#[test]
fn properties_layout_is_repeatable() {
    for (name, sample) in samples() {
        let mut paragraph = lay_out(sample.clone(), LayoutOptions::with_max_width(90.0));
        for options in option_sets().into_iter().step_by(7) {
            let case = format!("{name} with {options:?}");
            paragraph.layout(&renderer(), options).unwrap();
            let fresh = lay_out(sample.clone(), options);
            assert_eq_layout(&paragraph, &fresh, &case);
        }
    }
}

#[test]
fn properties_paragraph_width_is_bounded() {
    for_each_layout(|paragraph, options, case| {
        let widest = paragraph
            .lines()
            .map(|line| line.left() + line.width())
            .fold(0., f32::max);
        if paragraph.len() > 1 {
            assert_eq!(paragraph.width(), widest.min(options.max_width), "{case}");
        } else {
            assert_eq!(paragraph.width(), widest, "{case}");
        }
    });
}
