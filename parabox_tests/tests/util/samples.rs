// Copyright 2026 the Parabox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sample content used by several tests.

use parabox::{InlineObject, Orc, OrcExpansion, SourceBuilder, TextRun, TextSource};

use super::{ARABIC, CYRILLIC, Item, LATIN, latin, source, style};

/// Wraps into five lines at a width of 200:
///
/// ```text
/// "aaaaaaaaa bbbbbbbbb "    0..20
/// "aaaaaaaaa bbbbbbbbb "   20..40
/// "ccc ddd "               40..48
/// "eeeeeeeeeeeeeee "       48..64
/// "ggggggggg hhhh"         64..78
/// ```
pub(crate) const FIVE_LINES: &str =
    "aaaaaaaaa bbbbbbbbb aaaaaaaaa bbbbbbbbb ccc ddd eeeeeeeeeeeeeee ggggggggg hhhh";

pub(crate) fn five_lines() -> TextSource {
    latin(FIVE_LINES)
}

/// Text in three writing systems with two embedded objects.
pub(crate) fn mixed() -> TextSource {
    source(&[
        Item::Text("Some words in a row, ", LATIN),
        Item::Object(1, 35.0, 12.0),
        Item::Text(" then ", LATIN),
        Item::Text("slova po russki ", CYRILLIC),
        Item::Text("kalimat arabiya ", ARABIC),
        Item::Text("and finally\nmore text after a hard break. ", LATIN),
        Item::Object(2, 20.0, 20.0),
        Item::Text("Antidisestablishmentarianism ends it.", LATIN),
    ])
}

/// A Latin word running into a Cyrillic one, forcing a break between writing systems.
///
/// At a width of 60 this wraps into `"aa "`, `"bb"`, `"cccccc"` and `"cc"`.
pub(crate) fn forced_break() -> TextSource {
    source(&[Item::Text("aa bb", LATIN), Item::Text("cccccccc", CYRILLIC)])
}

/// Text with an empty run showing a substitute, a captioned placeholder and an object
/// placeholder.
pub(crate) fn annotated() -> TextSource {
    let mut builder = SourceBuilder::new(style(LATIN));
    builder.push_text("Dear ", style(LATIN));
    builder.push_text_with_substitute("", "recipient", style(LATIN));
    builder.push_text(", see note", style(LATIN));
    builder.push_orc(Orc {
        id: 3,
        expansion: OrcExpansion::Caption(TextRun::new("[1]", style(CYRILLIC))),
    });
    builder.push_text(" about bb", style(LATIN));
    builder.push_text("cccccccc dd", style(CYRILLIC));
    builder.push_orc(Orc {
        id: 4,
        expansion: OrcExpansion::Object(InlineObject::new(4, 25.0, 12.0)),
    });
    builder.push_text(" end", style(ARABIC));
    builder.build()
}
