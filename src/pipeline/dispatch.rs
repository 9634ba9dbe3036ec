//! Block classification and dispatch.
//!
//! Classification is an ordered list of [`BlockRule`]s, each pairing a
//! predicate with a renderer. The first rule whose predicate accepts the
//! block at the cursor renders it; paragraph accepts everything and is
//! always last. Predicates only look at the current block, except code fence
//! and table which may look ahead, and renderers report how many blocks they
//! consumed so the cursor can skip past them.
//!
//! ## Rule order
//!
//! | # | Kind | Test |
//! |---|------|------|
//! | 1 | Heading | 1–6 `#` then whitespace |
//! | 2 | List | first line starts with `1. ` or `-`/`*`/`+` and a space |
//! | 3 | Blockquote | starts with `> ` (escaped: `&gt; `) |
//! | 4 | Code fence | starts with ```` ``` ```` or `~~~` |
//! | 5 | Horizontal rule | only `---…` or `===…` |
//! | 6 | Table | contains `|` and the next block is a separator row |
//! | 7 | Image | exactly one `![alt](url)` |
//! | 8 | Local image | exactly one `![alt](file:path)` |
//! | 9 | Paragraph | anything |
//!
//! Rule 7 accepts every block rule 8 would, so rule 8 never fires in this
//! order. [`LocalImagePolicy::Embed`] selects a table with the two swapped.

use crate::config::{ConversionConfig, LocalImagePolicy};
use crate::error::Md2ZhihuError;
use crate::pipeline::blocks;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Resolved kind of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Heading,
    List,
    Blockquote,
    CodeFence,
    HorizontalRule,
    Table,
    Image,
    LocalImage,
    Paragraph,
}

/// Read position in the segmented document.
#[derive(Debug, Clone, Copy)]
pub struct BlockCursor<'a> {
    blocks: &'a [&'a str],
    index: usize,
}

impl<'a> BlockCursor<'a> {
    pub fn new(blocks: &'a [&'a str], index: usize) -> Self {
        Self { blocks, index }
    }

    /// The block under the cursor. Empty if the cursor is past the end.
    pub fn current(&self) -> &'a str {
        self.blocks.get(self.index).copied().unwrap_or("")
    }

    /// The block `n` positions after the current one.
    pub fn peek(&self, n: usize) -> Option<&'a str> {
        self.blocks.get(self.index + n).copied()
    }

    /// The current block and everything after it.
    pub fn remaining(&self) -> &'a [&'a str] {
        self.blocks.get(self.index..).unwrap_or(&[])
    }
}

/// Output of a block renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub html: String,
    /// Number of blocks consumed, current one included. Always ≥ 1.
    pub span: usize,
}

impl Rendered {
    pub fn single(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            span: 1,
        }
    }
}

pub type Predicate = fn(&BlockCursor<'_>) -> bool;
pub type Renderer = fn(&BlockCursor<'_>, &ConversionConfig) -> Result<Rendered, Md2ZhihuError>;

/// One row of the dispatch table.
pub struct BlockRule {
    pub kind: BlockKind,
    pub matches: Predicate,
    pub render: Renderer,
}

const HEADING: BlockRule = BlockRule {
    kind: BlockKind::Heading,
    matches: is_heading,
    render: blocks::render_heading,
};
const LIST: BlockRule = BlockRule {
    kind: BlockKind::List,
    matches: is_list,
    render: blocks::render_list,
};
const BLOCKQUOTE: BlockRule = BlockRule {
    kind: BlockKind::Blockquote,
    matches: is_blockquote,
    render: blocks::render_blockquote,
};
const CODE_FENCE: BlockRule = BlockRule {
    kind: BlockKind::CodeFence,
    matches: is_code_fence,
    render: blocks::render_code_fence,
};
const HORIZONTAL_RULE: BlockRule = BlockRule {
    kind: BlockKind::HorizontalRule,
    matches: is_horizontal_rule,
    render: blocks::render_horizontal_rule,
};
const TABLE: BlockRule = BlockRule {
    kind: BlockKind::Table,
    matches: is_table,
    render: blocks::render_table,
};
const IMAGE: BlockRule = BlockRule {
    kind: BlockKind::Image,
    matches: is_image,
    render: blocks::render_image,
};
const LOCAL_IMAGE: BlockRule = BlockRule {
    kind: BlockKind::LocalImage,
    matches: is_local_image,
    render: blocks::render_local_image,
};
const PARAGRAPH: BlockRule = BlockRule {
    kind: BlockKind::Paragraph,
    matches: always,
    render: blocks::render_paragraph,
};

/// Platform rule order.
pub static RULES: [BlockRule; 9] = [
    HEADING,
    LIST,
    BLOCKQUOTE,
    CODE_FENCE,
    HORIZONTAL_RULE,
    TABLE,
    IMAGE,
    LOCAL_IMAGE,
    PARAGRAPH,
];

/// Same as [`RULES`] with the local-image rule ahead of the image rule.
pub static RULES_LOCAL_FIRST: [BlockRule; 9] = [
    HEADING,
    LIST,
    BLOCKQUOTE,
    CODE_FENCE,
    HORIZONTAL_RULE,
    TABLE,
    LOCAL_IMAGE,
    IMAGE,
    PARAGRAPH,
];

pub fn rules_for(policy: LocalImagePolicy) -> &'static [BlockRule] {
    match policy {
        LocalImagePolicy::Inline => &RULES,
        LocalImagePolicy::Embed => &RULES_LOCAL_FIRST,
    }
}

/// The first rule in `rules` accepting the block at `cursor`.
pub fn classify<'r>(rules: &'r [BlockRule], cursor: &BlockCursor<'_>) -> &'r BlockRule {
    rules
        .iter()
        .find(|rule| (rule.matches)(cursor))
        .unwrap_or(&PARAGRAPH)
}

/// A rendered block together with its kind and how many blocks it covered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBlock {
    pub kind: BlockKind,
    pub html: String,
    pub span: usize,
}

/// Render every block in order.
///
/// Fails only if a local image cannot be read; nothing rendered so far is
/// returned in that case.
pub fn dispatch(
    blocks: &[&str],
    config: &ConversionConfig,
) -> Result<Vec<RenderedBlock>, Md2ZhihuError> {
    let rules = rules_for(config.local_images);
    let mut out = Vec::with_capacity(blocks.len());
    let mut index = 0;

    while index < blocks.len() {
        let cursor = BlockCursor::new(blocks, index);
        let rule = classify(rules, &cursor);
        let rendered = (rule.render)(&cursor, config)?;
        let span = rendered.span.max(1);
        debug!("Block {} → {:?} (span {})", index + 1, rule.kind, span);

        out.push(RenderedBlock {
            kind: rule.kind,
            html: rendered.html,
            span,
        });
        index += span;
    }

    Ok(out)
}

// ── Predicates ───────────────────────────────────────────────────────────────

static RE_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{1,6}\s").unwrap());
static RE_LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9]+\.\s|[-*+]\s)").unwrap());
static RE_HORIZONTAL_RULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:-{3,}|={3,})$").unwrap());
static RE_TABLE_SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\|?\s*:?-{3,}:?\s*\|(?:\s*:?-{3,}:?\s*\|)*(?:\s*:?-{3,}:?)?\s*$").unwrap()
});
// Sources may hold one level of balanced parentheses (`Foo_(bar)`); an
// unbalanced `)` ends the source, so two images in one block never match.
pub(crate) static RE_IMAGE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^!\[([^\]\n]*)\]\(((?:[^()\n]|\([^()\n]*\))*)\)$").unwrap()
});
pub(crate) static RE_LOCAL_IMAGE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^!\[([^\]\n]*)\]\(file:((?:[^()\n]|\([^()\n]*\))*)\)$").unwrap()
});

fn always(_: &BlockCursor<'_>) -> bool {
    true
}

fn is_heading(cursor: &BlockCursor<'_>) -> bool {
    RE_HEADING.is_match(cursor.current())
}

fn is_list(cursor: &BlockCursor<'_>) -> bool {
    let first = cursor.current().lines().next().unwrap_or("").trim();
    RE_LIST_MARKER.is_match(first)
}

fn is_blockquote(cursor: &BlockCursor<'_>) -> bool {
    cursor.current().starts_with("&gt; ")
}

pub(crate) fn is_fence_line(line: &str) -> bool {
    line.starts_with("```") || line.starts_with("~~~")
}

fn is_code_fence(cursor: &BlockCursor<'_>) -> bool {
    is_fence_line(cursor.current())
}

fn is_horizontal_rule(cursor: &BlockCursor<'_>) -> bool {
    RE_HORIZONTAL_RULE.is_match(cursor.current())
}

fn is_table(cursor: &BlockCursor<'_>) -> bool {
    cursor.current().contains('|')
        && cursor
            .peek(1)
            .is_some_and(|next| RE_TABLE_SEPARATOR.is_match(next.trim()))
}

fn is_image(cursor: &BlockCursor<'_>) -> bool {
    RE_IMAGE_BLOCK.is_match(cursor.current())
}

fn is_local_image(cursor: &BlockCursor<'_>) -> bool {
    RE_LOCAL_IMAGE_BLOCK.is_match(cursor.current())
}
