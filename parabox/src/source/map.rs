// Copyright 2026 the Parabox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Derivation of render runs from client runs.

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

use super::{ClientRun, Orc, OrcExpansion, RunStyle, WritingSystem};

/// The kind of a [`RenderRun`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RenderRunKind {
    /// Text from a single client run.
    Simple,
    /// Text merged from adjacent client runs sharing a writing system.
    Group,
    /// A single embedded object, occupying one object replacement character.
    Box {
        /// Index of the client run holding the object.
        client: usize,
    },
    /// Caption text standing in for an object replacement character.
    Orc,
    /// Stand-in text shown for a logically empty client run.
    Substitute,
}

/// A contiguous span of the rendered stream derived from one or more client runs.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderRun {
    /// What produced the span.
    pub kind: RenderRunKind,
    /// Writing system of the text. Boxes report the source's default writing system.
    pub writing_system: WritingSystem,
    /// Range of logical text covered.
    pub logical: Range<usize>,
    /// Range of rendered text covered.
    pub rendered: Range<usize>,
    /// Range of client runs covered.
    pub clients: Range<usize>,
}

impl RenderRun {
    /// Returns `true` if the run is an embedded box.
    pub fn is_box(&self) -> bool {
        matches!(self.kind, RenderRunKind::Box { .. })
    }

    /// Returns `true` if logical and rendered offsets inside the run map one to one.
    pub fn is_linear(&self) -> bool {
        matches!(
            self.kind,
            RenderRunKind::Simple | RenderRunKind::Group | RenderRunKind::Box { .. }
        )
    }
}

/// Logical and rendered extent of a single client run.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ClientSpan {
    pub(crate) logical: Range<usize>,
    pub(crate) rendered: Range<usize>,
    /// True if offsets inside the span map one to one.
    pub(crate) linear: bool,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct SourceMap {
    pub(crate) rendered: String,
    pub(crate) logical_len: usize,
    pub(crate) runs: Vec<RenderRun>,
    pub(crate) clients: Vec<ClientSpan>,
}

impl SourceMap {
    pub(crate) fn build(runs: &[ClientRun], default_style: &RunStyle) -> Self {
        let mut map = Self::default();
        for (index, client) in runs.iter().enumerate() {
            let logical_start = map.logical_len;
            let rendered_start = map.rendered.len();
            let logical_len = client.logical_text().len();
            let mut linear = true;
            match client {
                ClientRun::Text(run) if !run.text.is_empty() => {
                    map.rendered.push_str(&run.text);
                    map.push_text(index, run.style.writing_system, logical_len);
                }
                ClientRun::Text(run) => {
                    if let Some(substitute) = run.substitute.as_deref().filter(|s| !s.is_empty())
                    {
                        map.rendered.push_str(substitute);
                        map.push_run(
                            RenderRunKind::Substitute,
                            run.style.writing_system,
                            index,
                            logical_start..logical_start,
                        );
                        linear = false;
                    }
                }
                ClientRun::Object(_)
                | ClientRun::Orc(Orc {
                    expansion: OrcExpansion::Object(_),
                    ..
                }) => {
                    map.rendered.push_str(client.logical_text());
                    map.push_run(
                        RenderRunKind::Box { client: index },
                        default_style.writing_system,
                        index,
                        logical_start..logical_start + logical_len,
                    );
                }
                ClientRun::Orc(Orc {
                    expansion: OrcExpansion::Caption(caption),
                    ..
                }) => {
                    linear = false;
                    if !caption.text.is_empty() {
                        map.rendered.push_str(&caption.text);
                        map.push_run(
                            RenderRunKind::Orc,
                            caption.style.writing_system,
                            index,
                            logical_start..logical_start + logical_len,
                        );
                    }
                }
            }
            map.logical_len += logical_len;
            map.clients.push(ClientSpan {
                logical: logical_start..map.logical_len,
                rendered: rendered_start..map.rendered.len(),
                linear,
            });
        }
        map
    }

    fn push_text(&mut self, client: usize, writing_system: WritingSystem, logical_len: usize) {
        let rendered_end = self.rendered.len();
        if let Some(prev) = self.runs.last_mut() {
            let mergeable = matches!(prev.kind, RenderRunKind::Simple | RenderRunKind::Group)
                && prev.writing_system == writing_system
                && prev.rendered.end + logical_len == rendered_end;
            if mergeable {
                prev.kind = RenderRunKind::Group;
                prev.logical.end = self.logical_len + logical_len;
                prev.rendered.end = rendered_end;
                prev.clients.end = client + 1;
                return;
            }
        }
        let logical_start = self.logical_len;
        self.push_run(
            RenderRunKind::Simple,
            writing_system,
            client,
            logical_start..logical_start + logical_len,
        );
    }

    /// Pushes a run ending at the current end of the rendered stream.
    fn push_run(
        &mut self,
        kind: RenderRunKind,
        writing_system: WritingSystem,
        client: usize,
        logical: Range<usize>,
    ) {
        // The span of the client being pushed is recorded after its runs, so the previous
        // client's end is where this run starts.
        let rendered_start = self.clients.last().map_or(0, |span| span.rendered.end);
        self.runs.push(RenderRun {
            kind,
            writing_system,
            logical,
            rendered: rendered_start..self.rendered.len(),
            clients: client..client + 1,
        });
    }

    /// Index of the render run containing the rendered offset `ich`.
    pub(crate) fn run_index(&self, ich: usize) -> usize {
        assert!(
            ich < self.rendered.len(),
            "rendered offset {ich} out of bounds for len {}",
            self.rendered.len()
        );
        self.runs.partition_point(|run| run.rendered.end <= ich)
    }

    /// Index of the client run whose rendered span contains `ich`.
    pub(crate) fn client_index(&self, ich: usize) -> usize {
        assert!(
            ich < self.rendered.len(),
            "rendered offset {ich} out of bounds for len {}",
            self.rendered.len()
        );
        self.clients.partition_point(|span| span.rendered.end <= ich)
    }

    pub(crate) fn logical_to_rendered(&self, ich: usize) -> usize {
        assert!(
            ich <= self.logical_len,
            "logical offset {ich} out of bounds for len {}",
            self.logical_len
        );
        let index = self.clients.partition_point(|span| span.logical.end <= ich);
        let Some(span) = self.clients.get(index) else {
            return self.rendered.len();
        };
        if span.linear {
            span.rendered.start + (ich - span.logical.start)
        } else if ich <= span.logical.start {
            span.rendered.start
        } else {
            span.rendered.end
        }
    }

    pub(crate) fn rendered_to_logical(&self, ich: usize) -> usize {
        assert!(
            ich <= self.rendered.len(),
            "rendered offset {ich} out of bounds for len {}",
            self.rendered.len()
        );
        let index = self.clients.partition_point(|span| span.rendered.end <= ich);
        let Some(span) = self.clients.get(index) else {
            return self.logical_len;
        };
        if span.linear {
            span.logical.start + (ich - span.rendered.start)
        } else {
            span.logical.start
        }
    }
}
