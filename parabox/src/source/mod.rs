// Copyright 2026 the Parabox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paragraph content: client runs and the rendered stream derived from them.

mod map;

use alloc::string::String;
use alloc::vec::Vec;
use core::cell::OnceCell;
use core::ops::Range;

use self::map::SourceMap;

pub use map::{RenderRun, RenderRunKind};

/// The object replacement character standing in for embedded objects.
pub const OBJECT_REPLACEMENT: &str = "\u{FFFC}";

/// Identifier selecting script-specific shaping, directionality and measurement rules.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WritingSystem(pub u32);

/// Style shared by the characters of a text run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RunStyle {
    /// Writing system of the run.
    pub writing_system: WritingSystem,
    /// Font size in layout units.
    pub font_size: f32,
}

impl RunStyle {
    /// Creates a style for the given writing system and font size.
    pub const fn new(writing_system: WritingSystem, font_size: f32) -> Self {
        Self {
            writing_system,
            font_size,
        }
    }
}

impl Default for RunStyle {
    fn default() -> Self {
        Self::new(WritingSystem::default(), 16.0)
    }
}

/// A run of styled text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    /// The text of the run.
    pub text: String,
    /// The style of every character in the run.
    pub style: RunStyle,
    /// Text rendered in place of the run while it is empty, such as a prompt.
    pub substitute: Option<String>,
}

impl TextRun {
    /// Creates a text run without substitute text.
    pub fn new(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
            substitute: None,
        }
    }
}

/// An object laid out inline with text, such as a picture.
#[derive(Clone, Debug, PartialEq)]
pub struct InlineObject {
    /// User-specified identifier for the object.
    pub id: u64,
    /// Width in layout units.
    pub width: f32,
    /// Height in layout units.
    pub height: f32,
    /// Distance from the top of the object to the baseline it sits on.
    pub ascent: f32,
}

impl InlineObject {
    /// Creates an object whose bottom edge sits on the baseline.
    pub fn new(id: u64, width: f32, height: f32) -> Self {
        Self {
            id,
            width,
            height,
            ascent: height,
        }
    }
}

/// What an object replacement character expands to when rendered.
#[derive(Clone, Debug, PartialEq)]
pub enum OrcExpansion {
    /// An embedded object.
    Object(InlineObject),
    /// Text shown in place of the placeholder, such as a footnote caller or caption.
    Caption(TextRun),
}

/// A placeholder character owned by some external object.
#[derive(Clone, Debug, PartialEq)]
pub struct Orc {
    /// Identifier of the owning object.
    pub id: u64,
    /// What the placeholder renders as.
    pub expansion: OrcExpansion,
}

/// An authored unit of paragraph content.
#[derive(Clone, Debug, PartialEq)]
pub enum ClientRun {
    /// Styled text.
    Text(TextRun),
    /// An embedded object.
    Object(InlineObject),
    /// A placeholder character with an expansion.
    Orc(Orc),
}

impl ClientRun {
    /// Returns the logical text of the run: its characters for text, a single object
    /// replacement character otherwise.
    pub fn logical_text(&self) -> &str {
        match self {
            Self::Text(run) => &run.text,
            Self::Object(_) | Self::Orc(_) => OBJECT_REPLACEMENT,
        }
    }

    fn style(&self) -> Option<&RunStyle> {
        match self {
            Self::Text(run) => Some(&run.style),
            Self::Orc(Orc {
                expansion: OrcExpansion::Caption(caption),
                ..
            }) => Some(&caption.style),
            Self::Object(_) | Self::Orc(_) => None,
        }
    }

    fn object(&self) -> Option<&InlineObject> {
        match self {
            Self::Object(object)
            | Self::Orc(Orc {
                expansion: OrcExpansion::Object(object),
                ..
            }) => Some(object),
            _ => None,
        }
    }
}

/// A content edit expressed in rendered offsets.
///
/// `deleted` bytes starting at `start` in the previous rendered stream were replaced by
/// `inserted` bytes starting at `start` in the current one.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Edit {
    /// First rendered offset touched by the edit.
    pub start: usize,
    /// Number of rendered bytes inserted.
    pub inserted: usize,
    /// Number of rendered bytes deleted.
    pub deleted: usize,
}

impl Edit {
    /// Creates an edit description.
    pub fn new(start: usize, inserted: usize, deleted: usize) -> Self {
        Self {
            start,
            inserted,
            deleted,
        }
    }

    /// The net change in rendered length.
    pub fn delta(&self) -> isize {
        self.inserted as isize - self.deleted as isize
    }

    /// End of the edited range in the previous rendered stream.
    pub fn old_end(&self) -> usize {
        self.start + self.deleted
    }

    /// End of the edited range in the current rendered stream.
    pub fn new_end(&self) -> usize {
        self.start + self.inserted
    }
}

/// The content of a paragraph.
///
/// Holds the ordered client runs and lazily derives the rendered stream and its
/// [`RenderRun`]s, which are rebuilt on first access after any mutation. Offsets passed to
/// accessors must be in bounds and on character boundaries; violating this panics.
#[derive(Clone, Debug)]
pub struct TextSource {
    runs: Vec<ClientRun>,
    default_style: RunStyle,
    map: OnceCell<SourceMap>,
}

impl TextSource {
    /// Creates an empty source. `default_style` applies to embedded objects and to text
    /// inserted where no text run exists.
    pub fn new(default_style: RunStyle) -> Self {
        Self {
            runs: Vec::new(),
            default_style,
            map: OnceCell::new(),
        }
    }

    fn map(&self) -> &SourceMap {
        self.map
            .get_or_init(|| SourceMap::build(&self.runs, &self.default_style))
    }

    fn invalidate(&mut self) {
        self.map = OnceCell::new();
    }

    /// Returns the client runs.
    pub fn runs(&self) -> &[ClientRun] {
        &self.runs
    }

    /// Returns the style used for objects and for text inserted outside any text run.
    pub fn default_style(&self) -> &RunStyle {
        &self.default_style
    }

    /// Appends a client run.
    pub fn push_run(&mut self, run: ClientRun) {
        self.runs.push(run);
        self.invalidate();
    }

    /// Replaces every client run.
    ///
    /// The returned edit covers the whole rendered stream.
    pub fn set_runs(&mut self, runs: Vec<ClientRun>) -> Edit {
        let deleted = self.rendered_len();
        self.runs = runs;
        self.invalidate();
        Edit::new(0, self.rendered_len(), deleted)
    }

    /// Returns the derived render runs.
    pub fn render_runs(&self) -> &[RenderRun] {
        &self.map().runs
    }

    /// Returns the full rendered text.
    pub fn rendered_text(&self) -> &str {
        &self.map().rendered
    }

    /// Returns the length of the rendered stream.
    pub fn rendered_len(&self) -> usize {
        self.map().rendered.len()
    }

    /// Returns the length of the logical text.
    pub fn logical_len(&self) -> usize {
        self.map().logical_len
    }

    /// Returns `true` if nothing is rendered.
    pub fn is_empty(&self) -> bool {
        self.rendered_len() == 0
    }

    /// Returns the rendered text in `ich_min..ich_lim`.
    pub fn fetch(&self, ich_min: usize, ich_lim: usize) -> &str {
        let rendered = &self.map().rendered;
        assert!(
            ich_min <= ich_lim && ich_lim <= rendered.len(),
            "range {ich_min}..{ich_lim} out of bounds for len {}",
            rendered.len()
        );
        assert!(
            rendered.is_char_boundary(ich_min) && rendered.is_char_boundary(ich_lim),
            "range {ich_min}..{ich_lim} not on UTF-8 boundary"
        );
        &rendered[ich_min..ich_lim]
    }

    /// Returns the character starting at rendered offset `ich`.
    pub fn char_at(&self, ich: usize) -> char {
        let len = self.rendered_len();
        self.fetch(ich, len)
            .chars()
            .next()
            .unwrap_or_else(|| panic!("rendered offset {ich} out of bounds for len {len}"))
    }

    /// Returns the index of the render run containing rendered offset `ich`.
    pub fn run_index_at(&self, ich: usize) -> usize {
        self.map().run_index(ich)
    }

    /// Returns the render run containing rendered offset `ich`.
    pub fn run_at(&self, ich: usize) -> &RenderRun {
        let map = self.map();
        &map.runs[map.run_index(ich)]
    }

    /// Returns the writing system of the character at rendered offset `ich`.
    pub fn writing_system_at(&self, ich: usize) -> WritingSystem {
        self.run_at(ich).writing_system
    }

    /// Returns the style of the character at rendered offset `ich`.
    pub fn style_at(&self, ich: usize) -> &RunStyle {
        let client = self.map().client_index(ich);
        self.runs[client].style().unwrap_or(&self.default_style)
    }

    /// Returns the object rendered by a [`RenderRunKind::Box`] run.
    ///
    /// Panics if the run is not a box.
    pub fn object(&self, run: &RenderRun) -> &InlineObject {
        let RenderRunKind::Box { client } = run.kind else {
            panic!("render run {:?} is not an embedded box", run.rendered);
        };
        self.runs[client]
            .object()
            .unwrap_or_else(|| panic!("client run {client} holds no object"))
    }

    /// Maps a logical offset to the rendered stream.
    pub fn logical_to_rendered(&self, ich: usize) -> usize {
        self.map().logical_to_rendered(ich)
    }

    /// Maps a rendered offset to the logical text.
    pub fn rendered_to_logical(&self, ich: usize) -> usize {
        self.map().rendered_to_logical(ich)
    }

    /// Replaces the logical range `range` with `text`, returning the change in rendered
    /// offsets.
    ///
    /// Text is inserted into the text run containing `range.start`, falling back to the
    /// run ending there, or a new run in the default style. Embedded objects inside the
    /// range are removed.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> Edit {
        let logical_len = self.logical_len();
        assert!(
            range.start <= range.end && range.end <= logical_len,
            "range {}..{} out of bounds for len {logical_len}",
            range.start,
            range.end
        );
        let map = self.map().clone();
        let old_len = map.rendered.len();

        let mut touched: Option<Range<usize>> = None;

        // Remove the logical range, client by client.
        let mut removed = Vec::new();
        for (index, span) in map.clients.iter().enumerate() {
            if span.logical.start >= range.end || span.logical.end <= range.start {
                continue;
            }
            widen(&mut touched, index);
            match &mut self.runs[index] {
                ClientRun::Text(run) => {
                    let local_start = range.start.max(span.logical.start) - span.logical.start;
                    let local_end = range.end.min(span.logical.end) - span.logical.start;
                    assert!(
                        run.text.is_char_boundary(local_start)
                            && run.text.is_char_boundary(local_end),
                        "range {}..{} not on UTF-8 boundary",
                        range.start,
                        range.end
                    );
                    run.text.replace_range(local_start..local_end, "");
                }
                ClientRun::Object(_) | ClientRun::Orc(_) => {
                    assert!(
                        range.start <= span.logical.start && span.logical.end <= range.end,
                        "range {}..{} splits an object replacement character",
                        range.start,
                        range.end
                    );
                    removed.push(index);
                }
            }
        }

        // Insert into the text run containing the start, else the one ending there.
        let mut exact = touched.as_ref().is_none_or(|r| r.len() == 1) && removed.is_empty();
        if !text.is_empty() {
            let target = map
                .clients
                .iter()
                .enumerate()
                .filter(|(index, span)| {
                    matches!(self.runs[*index], ClientRun::Text(_))
                        && span.logical.start <= range.start
                        && range.start <= span.logical.end
                })
                .min_by_key(|(_, span)| span.logical.end == range.start)
                .map(|(index, span)| (index, span.logical.start));
            match target {
                Some((index, logical_start)) => {
                    if touched.as_ref().is_some_and(|r| !r.contains(&index)) {
                        exact = false;
                    }
                    widen(&mut touched, index);
                    if let ClientRun::Text(run) = &mut self.runs[index] {
                        let local = range.start - logical_start;
                        assert!(
                            run.text.is_char_boundary(local),
                            "offset {} not on UTF-8 boundary",
                            range.start
                        );
                        run.text.insert_str(local, text);
                    }
                }
                None => {
                    let index = map
                        .clients
                        .partition_point(|span| span.logical.end <= range.start);
                    let run = ClientRun::Text(TextRun::new(text, self.default_style));
                    self.runs.insert(index, run);
                    for removed in &mut removed {
                        if *removed >= index {
                            *removed += 1;
                        }
                    }
                    let rendered_start = map
                        .clients
                        .get(index)
                        .map_or(old_len, |span| span.rendered.start);
                    for index in removed.into_iter().rev() {
                        self.runs.remove(index);
                    }
                    self.invalidate();
                    let deleted = match touched {
                        Some(r) => map.clients[r.end - 1].rendered.end - rendered_start,
                        None => 0,
                    };
                    let inserted = self.rendered_len() + deleted - old_len;
                    return Edit::new(rendered_start, inserted, deleted);
                }
            }
        }
        for index in removed.into_iter().rev() {
            self.runs.remove(index);
        }
        self.invalidate();

        let Some(touched) = touched else {
            return Edit::new(map.logical_to_rendered(range.start), 0, 0);
        };
        let first = &map.clients[touched.start];
        let still_linear = match self.runs.get(touched.start) {
            Some(ClientRun::Text(run)) => !run.text.is_empty(),
            _ => false,
        };
        if exact && first.linear && first.logical.len() > 0 && still_linear {
            let start = first.rendered.start + (range.start - first.logical.start);
            return Edit::new(start, text.len(), range.len());
        }
        let old_span = first.rendered.start..map.clients[touched.end - 1].rendered.end;
        let new_len = self.rendered_len();
        Edit::new(old_span.start, new_len + old_span.len() - old_len, old_span.len())
    }
}

fn widen(touched: &mut Option<Range<usize>>, index: usize) {
    *touched = Some(match touched.take() {
        Some(range) => range.start.min(index)..range.end.max(index + 1),
        None => index..index + 1,
    });
}

/// Builder for a [`TextSource`].
#[derive(Clone, Debug)]
pub struct SourceBuilder {
    source: TextSource,
}

impl SourceBuilder {
    /// Creates a builder. See [`TextSource::new`] for the meaning of `default_style`.
    pub fn new(default_style: RunStyle) -> Self {
        Self {
            source: TextSource::new(default_style),
        }
    }

    /// Appends a run of text.
    pub fn push_text(&mut self, text: &str, style: RunStyle) {
        self.source
            .push_run(ClientRun::Text(TextRun::new(text, style)));
    }

    /// Appends a run of text that renders `substitute` while it is empty.
    pub fn push_text_with_substitute(&mut self, text: &str, substitute: &str, style: RunStyle) {
        self.source.push_run(ClientRun::Text(TextRun {
            text: text.into(),
            style,
            substitute: Some(substitute.into()),
        }));
    }

    /// Appends an embedded object.
    pub fn push_object(&mut self, object: InlineObject) {
        self.source.push_run(ClientRun::Object(object));
    }

    /// Appends a placeholder character.
    pub fn push_orc(&mut self, orc: Orc) {
        self.source.push_run(ClientRun::Orc(orc));
    }

    /// Consumes the builder, returning the source.
    pub fn build(self) -> TextSource {
        self.source
    }
}
