// Copyright 2026 the Parabox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Error returned when a [`Renderer`](crate::Renderer) breaks its contract during layout.
///
/// Carries a non-exhaustive [`ErrorKind`] plus the rendered offset at which the offending
/// request was made and the index of the line being built. Layout never fails for any
/// other reason: invalid offsets are programmer errors and panic, and bad line breaks are
/// corrected or accepted as part of normal line assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutError {
    /// The non-exhaustive category describing this error.
    kind: ErrorKind,

    /// Rendered offset of the request that failed.
    offset: usize,

    /// Index of the line that was being assembled.
    line: usize,
}

impl LayoutError {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The rendered offset at which the renderer was asked for a segment.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The index of the line that was being assembled.
    pub fn line(&self) -> usize {
        self.line
    }

    pub(crate) fn nothing_fit(offset: usize, line: usize) -> Self {
        Self {
            kind: ErrorKind::NothingFit,
            offset,
            line,
        }
    }

    pub(crate) fn invalid_segment(offset: usize, line: usize) -> Self {
        Self {
            kind: ErrorKind::InvalidSegment,
            offset,
            line,
        }
    }
}

impl core::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            ErrorKind::NothingFit => write!(
                f,
                "renderer found nothing to fit at offset {} of empty line {}",
                self.offset, self.line
            ),
            ErrorKind::InvalidSegment => write!(
                f,
                "renderer returned a segment outside the requested range at offset {} (line {})",
                self.offset, self.line
            ),
        }
    }
}

impl core::error::Error for LayoutError {}

/// The non-exhaustive category of a [`LayoutError`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The renderer answered [`NothingFit`](crate::BreakOutcome::NothingFit) to a request
    /// with `must_fit` set, so the line could not make progress.
    NothingFit,

    /// The renderer returned an empty segment, one that does not end on a character
    /// boundary, or one extending past the search limit.
    InvalidSegment,
}
