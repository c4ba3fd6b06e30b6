// Copyright 2026 the Parabox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Misc helpers.

#[cfg(feature = "libm")]
#[allow(unused_imports)]
use core_maths::CoreFloat;

pub(crate) fn nearly_eq(x: f32, y: f32) -> bool {
    (x - y).abs() < f32::EPSILON
}

/// Returns the offset of the character boundary preceding `index` in `text`.
///
/// `index` must be a character boundary greater than zero.
pub(crate) fn prev_char_boundary(text: &str, index: usize) -> usize {
    debug_assert!(index > 0, "no boundary precedes offset 0");
    let mut i = index - 1;
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Converts a signed length delta into a shifted offset.
pub(crate) fn shift(offset: usize, delta: isize) -> usize {
    offset
        .checked_add_signed(delta)
        .expect("edit delta moved an offset below zero")
}
