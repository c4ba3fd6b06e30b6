// Copyright 2026 the Parabox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paragraph layout and line breaking.
//!
//! Parabox turns the logical content of a paragraph (styled text runs and embedded
//! objects, held by a [`TextSource`]) into a list of lines made of boxes. Measuring and
//! shaping text is left to a caller-supplied [`Renderer`], which proposes measured
//! [`Segment`]s together with a classification of the break at their end. Parabox decides
//! where lines end, corrects invalid breaks by backtracking, and after an edit reuses every
//! line the edit cannot have affected.
//!
//! ## Features
//!
//! - `std` (enabled by default): Use the standard library.
//! - `libm`: Use `core_maths` for floating point support in `no_std` builds.
//! - `testing`: Expose [`testing::MonoRenderer`], a deterministic fixed-advance renderer.
//!
//! ## Example
//!
//! ```
//! # #[cfg(feature = "testing")]
//! # {
//! use parabox::testing::MonoRenderer;
//! use parabox::{LayoutOptions, ParagraphBox, RunStyle, SourceBuilder, WritingSystem};
//!
//! let style = RunStyle::new(WritingSystem(1), 10.0);
//! let mut builder = SourceBuilder::new(style);
//! builder.push_text("The quick fox jumps over the lazy dog.", style);
//! let mut paragraph = ParagraphBox::new(builder.build());
//!
//! let renderer = MonoRenderer::new();
//! paragraph
//!     .layout(&renderer, LayoutOptions::with_max_width(120.0))
//!     .unwrap();
//! assert!(paragraph.len() > 1);
//! # }
//! ```

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("parabox requires either the `std` or `libm` feature to be enabled");

extern crate alloc;

pub use peniko::kurbo;

mod error;
mod util;

pub mod draw;
pub mod layout;
pub mod renderer;
pub mod source;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

#[cfg(test)]
mod tests;

pub use draw::Painter;
pub use error::{ErrorKind, LayoutError};
pub use layout::{
    Affinity, InlineBox, InsertionPoint, LayoutBox, LayoutOptions, Line, LineHeight,
    ParagraphBox, Selection, StringBox,
};
pub use renderer::{
    BreakMode, BreakOutcome, BreakRequest, EndSegment, Renderer, Segment, SegmentBreak,
    TrailingWs,
};
pub use source::{
    ClientRun, Edit, InlineObject, Orc, OrcExpansion, RenderRun, RenderRunKind, RunStyle,
    SourceBuilder, TextRun, TextSource, WritingSystem,
};
