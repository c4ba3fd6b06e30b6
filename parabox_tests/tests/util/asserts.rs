// Copyright 2026 the Parabox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Various helper functions to assert truths during testing.

use parabox::{ParagraphBox, Segment};

/// Assert that two paragraphs have identical lines and boxes.
pub(crate) fn assert_eq_layout<S: Segment + PartialEq>(
    a: &ParagraphBox<S>,
    b: &ParagraphBox<S>,
    case: &str,
) {
    assert_eq!(a.len(), b.len(), "line count mismatch with {case}");

    for (i, (line_a, line_b)) in a.lines().zip(b.lines()).enumerate() {
        assert_eq!(
            line_a.text_range(),
            line_b.text_range(),
            "line {i} text range mismatch with {case}"
        );
        assert_eq!(line_a.top(), line_b.top(), "line {i} top mismatch with {case}");
        assert_eq!(line_a.left(), line_b.left(), "line {i} left mismatch with {case}");
        assert_eq!(
            line_a.width(),
            line_b.width(),
            "line {i} width mismatch with {case}"
        );
        assert_eq!(
            line_a.ascent(),
            line_b.ascent(),
            "line {i} ascent mismatch with {case}"
        );
        assert_eq!(
            line_a.descent(),
            line_b.descent(),
            "line {i} descent mismatch with {case}"
        );
        assert_eq!(
            line_a.boxes(),
            line_b.boxes(),
            "line {i} boxes mismatch with {case}"
        );
    }

    assert_eq!(a.width(), b.width(), "width mismatch with {case}");
    assert_eq!(a.height(), b.height(), "height mismatch with {case}");
}

/// Assert the structural invariants every layout must satisfy.
pub(crate) fn assert_valid_layout<S: Segment>(paragraph: &ParagraphBox<S>, case: &str) {
    let text_len = paragraph.source().rendered_len();
    let mut expected_start = 0;
    for line in paragraph.lines() {
        let i = line.index();
        let range = line.text_range();
        assert_eq!(
            range.start, expected_start,
            "line {i} does not continue the previous one with {case}"
        );
        assert!(!line.boxes().is_empty(), "line {i} has no boxes with {case}");
        let mut box_start = range.start;
        for item in line.boxes() {
            assert_eq!(item.start(), box_start, "box gap in line {i} with {case}");
            assert!(!item.is_empty(), "empty box in line {i} with {case}");
            box_start = item.end();
        }
        assert_eq!(
            box_start, range.end,
            "boxes do not cover line {i} with {case}"
        );
        expected_start = range.end;
    }
    assert_eq!(
        expected_start, text_len,
        "lines do not cover the text with {case}"
    );
}
