// Copyright 2026 the Parabox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::testing::MonoRenderer;
use crate::{EndSegment, LayoutBox, LayoutOptions, LineHeight};

use super::utils::{
    ClassOverride, GREEK, HEBREW, Item, LATIN, box_texts, latin, lay_out, lay_out_with,
    line_texts, source,
};

#[test]
fn single_line_at_ample_width() {
    let paragraph = lay_out(latin("The quick fox jumps."), 1000.0);
    assert_eq!(paragraph.len(), 1);
    let line = paragraph.line(0).unwrap();
    assert_eq!(line.text_range(), 0..20);
    assert_eq!(line.boxes().len(), 1);
    assert_eq!(line.width(), 200.0);
    assert_eq!(paragraph.width(), 200.0);
    assert_eq!(paragraph.height(), 10.0);
}

#[test]
fn wraps_after_space() {
    let paragraph = lay_out(latin("The quick fox jumps."), 100.0);
    assert_eq!(line_texts(&paragraph), ["The quick ", "fox jumps."]);
    assert_eq!(paragraph.boxes()[0].class(), Some(EndSegment::MoreLines));
}

#[test]
fn clips_word_longer_than_line() {
    let paragraph = lay_out(latin("abcdefghij"), 50.0);
    assert_eq!(line_texts(&paragraph), ["abcde", "fghij"]);
    assert_eq!(paragraph.boxes()[0].class(), Some(EndSegment::BadBreak));
}

#[test]
fn always_places_one_character() {
    let paragraph = lay_out(latin("abc"), 5.0);
    assert_eq!(line_texts(&paragraph), ["a", "b", "c"]);
}

#[test]
fn object_that_does_not_fit_starts_new_line() {
    let paragraph = lay_out(
        source(&[
            Item::Text("Hello ", LATIN),
            Item::Object(1, 50.0, 10.0),
            Item::Text("world", LATIN),
        ]),
        100.0,
    );
    assert_eq!(paragraph.len(), 2);
    assert_eq!(line_texts(&paragraph)[0], "Hello ");
    let first = paragraph.line(0).unwrap();
    // Finalized with 40 units unused.
    assert_eq!(first.width(), 60.0);
    let second = paragraph.line(1).unwrap();
    assert_eq!(second.text_range(), 6..14);
    assert!(second.boxes()[0].is_inline());
    assert_eq!(second.boxes()[1].left(), 50.0);
}

#[test]
fn oversized_object_on_empty_line() {
    let paragraph = lay_out(source(&[Item::Object(1, 500.0, 10.0)]), 100.0);
    assert_eq!(paragraph.len(), 1);
    assert_eq!(paragraph.line(0).unwrap().width(), 500.0);
}

#[test]
fn object_metrics_extend_line() {
    let paragraph = lay_out(
        source(&[Item::Text("ab", LATIN), Item::Object(1, 20.0, 30.0)]),
        1000.0,
    );
    let line = paragraph.line(0).unwrap();
    // Objects sit on the baseline.
    assert_eq!(line.ascent(), 30.0);
    assert_eq!(line.descent(), 2.0);
    assert_eq!(line.height(), 32.0);
}

#[test]
fn backtracks_from_writing_system_boundary() {
    // "ab cd" ends in a letter, so the line may not end at the boundary with "efg".
    let paragraph = lay_out(
        source(&[Item::Text("ab cd", LATIN), Item::Text("efg", GREEK)]),
        70.0,
    );
    assert_eq!(line_texts(&paragraph), ["ab ", "cdefg"]);
    assert_eq!(box_texts(&paragraph, 0), ["ab "]);
    assert_eq!(box_texts(&paragraph, 1), ["cd", "efg"]);
}

#[test]
fn backtrack_removes_unbreakable_box() {
    let paragraph = lay_out(
        source(&[
            Item::Text("ab ", LATIN),
            Item::Text("cd", GREEK),
            Item::Text("efg", LATIN),
        ]),
        60.0,
    );
    assert_eq!(line_texts(&paragraph), ["ab ", "cdefg"]);
}

#[test]
fn writing_system_boundary_after_space_is_kept() {
    let paragraph = lay_out(
        source(&[Item::Text("ab ", LATIN), Item::Text("cdef", GREEK)]),
        50.0,
    );
    assert_eq!(line_texts(&paragraph), ["ab ", "cdef"]);
    assert_eq!(paragraph.boxes()[0].class(), Some(EndSegment::OkayBreak));
}

#[test]
fn hard_breaks_end_lines() {
    let paragraph = lay_out(latin("ab\ncd\u{2028}ef"), 1000.0);
    assert_eq!(line_texts(&paragraph), ["ab\n", "cd\u{2028}", "ef"]);
    assert_eq!(paragraph.boxes()[0].class(), Some(EndSegment::HardBreak));
    // Mandatory breaks take no space.
    assert_eq!(paragraph.line(0).unwrap().width(), 20.0);
}

#[test]
fn mixed_direction_whitespace_in_separate_box() {
    let renderer = MonoRenderer::new().with_rtl(HEBREW);
    let paragraph = lay_out_with(
        &renderer,
        source(&[Item::Text("abc def ghi", HEBREW)]),
        LayoutOptions::with_max_width(80.0),
    );
    assert_eq!(line_texts(&paragraph), ["abc def ", "ghi"]);
    assert_eq!(box_texts(&paragraph, 0), ["abc def", " "]);
    let LayoutBox::String(first) = &paragraph.boxes()[0] else {
        panic!("expected a string box");
    };
    assert!(first.segment().is_rtl());
    assert_eq!(first.class(), EndSegment::MoreWhitespace);
}

#[test]
fn agreeing_direction_keeps_whitespace_attached() {
    let renderer = MonoRenderer::new().with_rtl(HEBREW);
    let options = LayoutOptions {
        rtl: true,
        ..LayoutOptions::with_max_width(80.0)
    };
    let paragraph = lay_out_with(
        &renderer,
        source(&[Item::Text("abc def ghi", HEBREW)]),
        options,
    );
    assert!(paragraph.is_rtl());
    assert_eq!(box_texts(&paragraph, 0), ["abc def "]);
}

#[test]
fn first_line_indent() {
    let options = LayoutOptions {
        first_line_indent: 30.0,
        ..LayoutOptions::with_max_width(100.0)
    };
    let paragraph = lay_out_with(&MonoRenderer::new(), latin("aaaa bbbb cccc"), options);
    assert_eq!(line_texts(&paragraph), ["aaaa ", "bbbb cccc"]);
    let first = paragraph.line(0).unwrap();
    assert_eq!(first.left(), 30.0);
    assert_eq!(first.boxes()[0].left(), 30.0);
    assert_eq!(paragraph.line(1).unwrap().left(), 0.0);
}

#[test]
fn line_height_modes() {
    let text = "aaaa bbbb cccc";
    let tops = |line_height| {
        let options = LayoutOptions {
            line_height,
            ..LayoutOptions::with_max_width(50.0)
        };
        let paragraph = lay_out_with(&MonoRenderer::new(), latin(text), options);
        let tops: Vec<f32> = paragraph.lines().map(|line| line.top()).collect();
        (tops, paragraph.height())
    };
    assert_eq!(tops(LineHeight::Natural), (vec![0.0, 10.0, 20.0], 30.0));
    assert_eq!(tops(LineHeight::AtLeast(15.0)), (vec![0.0, 15.0, 30.0], 45.0));
    assert_eq!(tops(LineHeight::AtLeast(5.0)), (vec![0.0, 10.0, 20.0], 30.0));
    assert_eq!(tops(LineHeight::Exactly(8.0)), (vec![0.0, 8.0, 16.0], 24.0));
}

#[test]
fn width_of_multiple_lines_is_capped() {
    let paragraph = lay_out(
        source(&[Item::Text("ab ", LATIN), Item::Object(1, 80.0, 10.0)]),
        50.0,
    );
    assert_eq!(paragraph.len(), 2);
    assert_eq!(paragraph.line(1).unwrap().width(), 80.0);
    assert_eq!(paragraph.width(), 50.0);
}

#[test]
fn width_of_single_line_is_its_extent() {
    let paragraph = lay_out(source(&[Item::Object(1, 80.0, 10.0)]), 50.0);
    assert_eq!(paragraph.width(), 80.0);
}

#[test]
fn empty_source_has_no_lines() {
    let paragraph = lay_out(latin(""), 100.0);
    assert!(paragraph.is_empty());
    assert_eq!(paragraph.width(), 0.0);
    assert_eq!(paragraph.height(), 0.0);
}

#[test]
fn no_more_before_object_becomes_okay_break() {
    let paragraph = lay_out(
        source(&[Item::Text("abc", LATIN), Item::Object(1, 10.0, 10.0)]),
        1000.0,
    );
    assert_eq!(paragraph.boxes()[0].class(), Some(EndSegment::OkayBreak));
}

#[test]
fn no_more_before_other_writing_system_becomes_ws_break() {
    let paragraph = lay_out(
        source(&[Item::Text("abc", LATIN), Item::Text("def", GREEK)]),
        1000.0,
    );
    assert_eq!(paragraph.boxes()[0].class(), Some(EndSegment::WsBreak));
    // The final segment keeps its class.
    assert_eq!(paragraph.boxes()[1].class(), Some(EndSegment::NoMore));
}

#[test]
fn renderer_classification_is_kept_at_boundaries() {
    let renderer = ClassOverride {
        inner: MonoRenderer::new(),
        class: EndSegment::HardBreak,
    };
    let paragraph = lay_out_with(
        &renderer,
        source(&[Item::Text("abc", LATIN), Item::Object(1, 10.0, 10.0)]),
        LayoutOptions::default(),
    );
    assert_eq!(paragraph.boxes()[0].class(), Some(EndSegment::HardBreak));
    assert_eq!(paragraph.len(), 2);
}

#[test]
fn group_of_runs_with_different_sizes() {
    let mut builder = crate::SourceBuilder::new(super::utils::style(LATIN));
    builder.push_text("ab", crate::RunStyle::new(LATIN, 10.0));
    builder.push_text("cd", crate::RunStyle::new(LATIN, 20.0));
    let paragraph = lay_out(builder.build(), 1000.0);
    assert_eq!(box_texts(&paragraph, 0), ["abcd"]);
    let line = paragraph.line(0).unwrap();
    assert_eq!(line.width(), 60.0);
    assert_eq!(line.ascent(), 16.0);
}
