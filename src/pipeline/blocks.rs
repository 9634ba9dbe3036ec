//! Block renderers: one function per [`BlockKind`](super::dispatch::BlockKind).
//!
//! Every renderer has the [`Renderer`](super::dispatch::Renderer) signature
//! so the dispatch table can hold them uniformly. All but the local image
//! renderer are infallible; they return `Ok` unconditionally.
//!
//! Lists and blockquotes are single-level on purpose: a list is a flat
//! sequence of items and a blockquote is one text blob, whatever the
//! indentation or repeated `>` markers say.

use crate::config::ConversionConfig;
use crate::dialect;
use crate::error::Md2ZhihuError;
use crate::pipeline::dispatch::{
    is_fence_line, BlockCursor, Rendered, RE_IMAGE_BLOCK, RE_LOCAL_IMAGE_BLOCK,
};
use crate::pipeline::encode::encode_local_image;
use crate::pipeline::inline::render_inline;
use crate::pipeline::preprocess::unescape_html;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::warn;

// ── Heading ──────────────────────────────────────────────────────────────────

static RE_HEADING_PARTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)^(#+)\s+(.*)$").unwrap());

pub fn render_heading(
    cursor: &BlockCursor<'_>,
    config: &ConversionConfig,
) -> Result<Rendered, Md2ZhihuError> {
    let Some(caps) = RE_HEADING_PARTS.captures(cursor.current()) else {
        return render_paragraph(cursor, config);
    };
    let level = caps[1].len();
    let body = render_inline(&caps[2]);
    Ok(Rendered::single(format!("<h{level}>{body}</h{level}>")))
}

// ── List ─────────────────────────────────────────────────────────────────────

static RE_ORDERED_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+\.\s").unwrap());
static RE_ITEM_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+\.\s+|^[-*+]\s+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            ListKind::Ordered => "ol",
            ListKind::Unordered => "ul",
        }
    }
}

/// A flat list: every line of the block is one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub kind: ListKind,
    pub items: Vec<String>,
}

/// The first line fixes the list kind; each line loses one leading marker.
pub fn parse_list(block: &str) -> List {
    let first = block.lines().next().unwrap_or("").trim();
    let kind = if RE_ORDERED_MARKER.is_match(first) {
        ListKind::Ordered
    } else {
        ListKind::Unordered
    };
    let items = block
        .lines()
        .map(|line| RE_ITEM_MARKER.replace(line.trim(), "").into_owned())
        .collect();
    List { kind, items }
}

pub fn render_list(
    cursor: &BlockCursor<'_>,
    _config: &ConversionConfig,
) -> Result<Rendered, Md2ZhihuError> {
    let list = parse_list(cursor.current());
    let tag = list.kind.tag();
    let mut html = format!("<{tag}>");
    for item in &list.items {
        html.push_str("<li>");
        html.push_str(&render_inline(item));
        html.push_str("</li>");
    }
    html.push_str(&format!("</{tag}>"));
    Ok(Rendered::single(html))
}

// ── Blockquote ───────────────────────────────────────────────────────────────

static RE_QUOTE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^&gt;\s?").unwrap());

pub fn render_blockquote(
    cursor: &BlockCursor<'_>,
    _config: &ConversionConfig,
) -> Result<Rendered, Md2ZhihuError> {
    let text = cursor
        .current()
        .lines()
        .map(|line| RE_QUOTE_MARKER.replace(line, ""))
        .collect::<Vec<_>>()
        .join("\n");
    let body = render_inline(text.trim());
    Ok(Rendered::single(format!("<blockquote>{body}</blockquote>")))
}

// ── Code fence ───────────────────────────────────────────────────────────────

/// A fenced code block, possibly assembled from several blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFence {
    pub lang: String,
    pub body: String,
}

/// Parse a fence starting at `blocks[0]`, returning it and the number of
/// blocks it spans.
///
/// Blocks after the first are the segmenter's split of blank lines inside
/// the fence and are rejoined with one blank line. A fence that is never
/// closed runs to the end of the document.
pub fn parse_code_fence(blocks: &[&str]) -> (CodeFence, usize) {
    let opener = blocks
        .first()
        .and_then(|b| b.lines().next())
        .unwrap_or("");
    let lang = opener
        .get(3..)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(dialect::CODE_LANG_PLACEHOLDER)
        .to_string();

    let mut body: Vec<&str> = Vec::new();
    for (offset, block) in blocks.iter().enumerate() {
        let lines: Vec<&str> = block.split('\n').collect();
        let start = if offset == 0 {
            1
        } else {
            body.push("");
            0
        };

        for (n, &line) in lines.iter().enumerate().skip(start) {
            if is_fence_line(line) {
                if n + 1 < lines.len() {
                    warn!(
                        "Dropping {} line(s) after closing code fence",
                        lines.len() - n - 1
                    );
                }
                let fence = CodeFence {
                    lang,
                    body: body.join("\n").trim().to_string(),
                };
                return (fence, offset + 1);
            }
            body.push(line);
        }
    }

    warn!(
        "Unterminated code fence; consuming the remaining {} block(s)",
        blocks.len()
    );
    let fence = CodeFence {
        lang,
        body: body.join("\n").trim().to_string(),
    };
    (fence, blocks.len().max(1))
}

/// The body is not inline-rendered; it is already escaped.
pub fn render_code_fence(
    cursor: &BlockCursor<'_>,
    _config: &ConversionConfig,
) -> Result<Rendered, Md2ZhihuError> {
    let (fence, span) = parse_code_fence(cursor.remaining());
    Ok(Rendered {
        html: format!(r#"<pre lang="{}">{}</pre>"#, fence.lang, fence.body),
        span,
    })
}

// ── Horizontal rule ──────────────────────────────────────────────────────────

pub fn render_horizontal_rule(
    _cursor: &BlockCursor<'_>,
    _config: &ConversionConfig,
) -> Result<Rendered, Md2ZhihuError> {
    Ok(Rendered::single(dialect::HORIZONTAL_RULE))
}

// ── Table ────────────────────────────────────────────────────────────────────

/// Header and body cells; the separator row is only a detection signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table<'a> {
    pub header: Vec<&'a str>,
    pub rows: Vec<Vec<&'a str>>,
}

/// Split on `|`, trim, and drop empty pieces.
///
/// A blank cell disappears rather than becoming an empty `<td>`, so a row
/// with blank cells can end up shorter than the header.
fn split_cells(text: &str) -> Vec<&str> {
    text.split('|')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect()
}

pub fn parse_table<'a>(header: &'a str, body: Option<&'a str>) -> Table<'a> {
    let rows = body
        .map(|b| {
            b.lines()
                .filter(|line| !line.trim().is_empty())
                .map(split_cells)
                .collect()
        })
        .unwrap_or_default();
    Table {
        header: split_cells(header),
        rows,
    }
}

/// Consumes the header block, the separator block and the body block.
pub fn render_table(
    cursor: &BlockCursor<'_>,
    _config: &ConversionConfig,
) -> Result<Rendered, Md2ZhihuError> {
    let body = cursor.peek(2);
    if body.is_none() {
        warn!("Table has no body block; rendering header only");
    }
    let table = parse_table(cursor.current(), body);

    let mut html = String::from(dialect::TABLE_OPEN);
    html.push_str("<tr>");
    for cell in &table.header {
        html.push_str(&format!("<th>{}</th>", render_inline(cell)));
    }
    html.push_str("</tr>");
    for row in &table.rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", render_inline(cell)));
        }
        html.push_str("</tr>");
    }
    html.push_str(dialect::TABLE_CLOSE);

    Ok(Rendered {
        html,
        span: if body.is_some() { 3 } else { 2 },
    })
}

// ── Images ───────────────────────────────────────────────────────────────────

pub fn render_image(
    cursor: &BlockCursor<'_>,
    config: &ConversionConfig,
) -> Result<Rendered, Md2ZhihuError> {
    let Some(caps) = RE_IMAGE_BLOCK.captures(cursor.current()) else {
        return render_paragraph(cursor, config);
    };
    let (alt, src) = (&caps[1], &caps[2]);
    let html = if dialect::is_equation_src(src) {
        dialect::display_equation(&dialect::equation_src_img(src, alt))
    } else {
        dialect::figure_img(src)
    };
    Ok(Rendered::single(html))
}

/// Embed `file:<path>` as a data URI. A read failure aborts the conversion.
pub fn render_local_image(
    cursor: &BlockCursor<'_>,
    config: &ConversionConfig,
) -> Result<Rendered, Md2ZhihuError> {
    let Some(caps) = RE_LOCAL_IMAGE_BLOCK.captures(cursor.current()) else {
        return render_paragraph(cursor, config);
    };
    let path = unescape_html(&caps[2]);
    let uri = encode_local_image(Path::new(&path), config.max_local_image_bytes)?;
    Ok(Rendered::single(dialect::plain_img(&uri, &caps[1])))
}

// ── Paragraph ────────────────────────────────────────────────────────────────

static RE_DISPLAY_MATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\$(.*)\$\$").unwrap());

/// A block holding `$$…$$` anywhere becomes that one display equation and
/// nothing else.
pub fn render_paragraph(
    cursor: &BlockCursor<'_>,
    _config: &ConversionConfig,
) -> Result<Rendered, Md2ZhihuError> {
    let block = cursor.current();
    if block.trim().is_empty() {
        return Ok(Rendered::single(dialect::EMPTY_PARAGRAPH));
    }
    if let Some(caps) = RE_DISPLAY_MATH.captures(block) {
        let img = dialect::equation_img(&caps[1]);
        return Ok(Rendered::single(dialect::display_equation(&img)));
    }
    Ok(Rendered::single(format!("<p>{}</p>", render_inline(block))))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::pipeline::dispatch::Renderer;

    fn render(renderer: Renderer, blocks: &[&str]) -> Rendered {
        renderer(&BlockCursor::new(blocks, 0), &ConversionConfig::default()).unwrap()
    }

    #[test]
    fn test_heading() {
        assert_eq!(render(render_heading, &["## Hi *there*"]).html, "<h2>Hi <i>there</i></h2>");
    }

    #[test]
    fn test_multiline_heading_keeps_remainder() {
        assert_eq!(render(render_heading, &["# A\nB"]).html, "<h1>A<br/>B</h1>");
    }

    #[test]
    fn test_ordered_list() {
        let html = render(render_list, &["1. one\n2. **two**"]).html;
        assert_eq!(html, "<ol><li>one</li><li><b>two</b></li></ol>");
    }

    #[test]
    fn test_list_is_flat() {
        let list = parse_list("- a\n  - nested\ncontinued");
        assert_eq!(list.kind, ListKind::Unordered);
        assert_eq!(list.items, ["a", "nested", "continued"]);
    }

    #[test]
    fn test_list_strips_one_marker() {
        let list = parse_list("1. - x");
        assert_eq!(list.kind, ListKind::Ordered);
        assert_eq!(list.items, ["- x"]);
    }

    #[test]
    fn test_blockquote() {
        let html = render(render_blockquote, &["&gt; first\n&gt; second\n&gt;"]).html;
        assert_eq!(html, "<blockquote>first<br/>second</blockquote>");
    }

    #[test]
    fn test_code_fence_single_block() {
        let r = render(render_code_fence, &["```rust\nfn main() {}\n```"]);
        assert_eq!(r.html, r#"<pre lang="rust">fn main() {}</pre>"#);
        assert_eq!(r.span, 1);
    }

    #[test]
    fn test_code_fence_default_lang() {
        let (fence, _) = parse_code_fence(&["~~~\nx\n~~~"]);
        assert_eq!(fence.lang, "text");
    }

    #[test]
    fn test_code_fence_spans_blank_lines() {
        let blocks = ["```py\na = 1", "b = 2\n```", "after"];
        let (fence, span) = parse_code_fence(&blocks);
        assert_eq!(fence.body, "a = 1\n\nb = 2");
        assert_eq!(span, 2);
    }

    #[test]
    fn test_text_after_closing_fence_is_dropped() {
        let blocks = ["```\ncode\n```\ntrailing text", "next"];
        let (fence, span) = parse_code_fence(&blocks);
        assert_eq!(fence.body, "code");
        assert_eq!(span, 1);
        assert_eq!(
            render(render_code_fence, &blocks).html,
            r#"<pre lang="text">code</pre>"#
        );
    }

    #[test]
    fn test_unterminated_fence_consumes_rest() {
        let blocks = ["```\na", "b", "c"];
        let (fence, span) = parse_code_fence(&blocks);
        assert_eq!(fence.body, "a\n\nb\n\nc");
        assert_eq!(span, 3);
    }

    #[test]
    fn test_code_keeps_escaped_brackets() {
        let r = render(render_code_fence, &["```html\n&lt;div&gt;\n```"]);
        assert_eq!(r.html, r#"<pre lang="html">&lt;div&gt;</pre>"#);
    }

    #[test]
    fn test_table() {
        let r = render(render_table, &["A | B", "---|---", "1 | 2\n3 | 4"]);
        assert_eq!(r.span, 3);
        assert!(r.html.starts_with(dialect::TABLE_OPEN));
        assert!(r.html.contains("<tr><th>A</th><th>B</th></tr>"));
        assert!(r.html.contains("<tr><td>1</td><td>2</td></tr><tr><td>3</td><td>4</td></tr>"));
        assert!(r.html.ends_with(dialect::TABLE_CLOSE));
    }

    #[test]
    fn test_table_drops_blank_cells() {
        let table = parse_table("| A | B | C |", Some("| 1 |  | 3 |"));
        assert_eq!(table.header, ["A", "B", "C"]);
        assert_eq!(table.rows, [vec!["1", "3"]]);
    }

    #[test]
    fn test_table_without_body() {
        let r = render(render_table, &["A | B", "---|---"]);
        assert_eq!(r.span, 2);
        assert!(r.html.contains("<th>A</th>"));
        assert!(!r.html.contains("<td>"));
    }

    #[test]
    fn test_figure_image() {
        let html = render(render_image, &["![cat](https://img/cat.png)"]).html;
        assert_eq!(html, dialect::figure_img("https://img/cat.png"));
    }

    #[test]
    fn test_equation_image_block() {
        let html = render(render_image, &["![x](//www.zhihu.com/equation?tex=x)"]).html;
        assert_eq!(
            html,
            r#"<p> <img eeimg="1" src="//www.zhihu.com/equation?tex=x" alt="x"/> </p>"#
        );
    }

    #[test]
    fn test_local_image_missing_file() {
        let cursor_blocks = ["![me](file:/no/such/file.png)"];
        let err = render_local_image(
            &BlockCursor::new(&cursor_blocks, 0),
            &ConversionConfig::default(),
        )
        .unwrap_err();
        assert!(err.is_local_image_error());
    }

    #[test]
    fn test_paragraph() {
        assert_eq!(render(render_paragraph, &["hello\nworld"]).html, "<p>hello<br/>world</p>");
    }

    #[test]
    fn test_empty_paragraph_placeholder() {
        assert_eq!(render(render_paragraph, &["   "]).html, "<p><br></p>");
    }

    #[test]
    fn test_display_math_replaces_block() {
        let html = render(render_paragraph, &["before $$a+b$$ after"]).html;
        assert_eq!(
            html,
            r#"<p> <img eeimg="1" src="//www.zhihu.com/equation?tex=a%2Bb" alt="a+b"/> </p>"#
        );
    }
}
