//! Inline pipeline: ordered text substitutions applied to span content.
//!
//! There is no inline AST. Each rule is a total `&str → String` rewrite and
//! the rules run left to right, once each, in the order of [`INLINE_RULES`].
//! The order is load-bearing:
//!
//! - bold runs before italic, so `**x**` never leaves stray `*` behind;
//! - links run before images, so `![alt](src)` with a non-empty alt becomes
//!   `!` followed by a link, and only `![](src)` reaches the image rule;
//! - line breaks run before inline math, so a formula split across lines
//!   keeps its `<br/>` inside the equation's alt text.
//!
//! Input is already HTML-escaped; rules only ever add markup.

use crate::dialect;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// A single inline rewrite.
pub type InlineRule = fn(&str) -> String;

/// The pipeline, in application order.
pub const INLINE_RULES: [(&str, InlineRule); 8] = [
    ("bold", bold),
    ("italic", italic),
    ("link", link),
    ("code", code),
    ("footnote", footnote),
    ("image", image),
    ("line_break", line_break),
    ("math", math),
];

/// Run every inline rule over `text`.
pub fn render_inline(text: &str) -> String {
    INLINE_RULES
        .iter()
        .fold(text.to_string(), |acc, (_, rule)| rule(&acc))
}

// ── Rule 1: Bold ─────────────────────────────────────────────────────────────

static RE_BOLD_STAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static RE_BOLD_UNDERSCORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"__(.*?)__").unwrap());

fn bold(input: &str) -> String {
    let s = RE_BOLD_STAR.replace_all(input, "<b>${1}</b>");
    RE_BOLD_UNDERSCORE.replace_all(&s, "<b>${1}</b>").into_owned()
}

// ── Rule 2: Italic ───────────────────────────────────────────────────────────

static RE_ITALIC_STAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").unwrap());
static RE_ITALIC_UNDERSCORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"_(.*?)_").unwrap());

fn italic(input: &str) -> String {
    let s = RE_ITALIC_STAR.replace_all(input, "<i>${1}</i>");
    RE_ITALIC_UNDERSCORE
        .replace_all(&s, "<i>${1}</i>")
        .into_owned()
}

// ── Rule 3: Link ─────────────────────────────────────────────────────────────

static RE_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

fn link(input: &str) -> String {
    RE_LINK
        .replace_all(input, r#"<a href="${2}">${1}</a>"#)
        .into_owned()
}

// ── Rule 4: Inline code ──────────────────────────────────────────────────────

static RE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").unwrap());

fn code(input: &str) -> String {
    RE_CODE.replace_all(input, "<code>${1}</code>").into_owned()
}

// ── Rule 5: Footnote marker ──────────────────────────────────────────────────

static RE_FOOTNOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\^(\d+)\]").unwrap());

fn footnote(input: &str) -> String {
    RE_FOOTNOTE
        .replace_all(input, |caps: &Captures<'_>| dialect::footnote_sup(&caps[1]))
        .into_owned()
}

// ── Rule 6: Inline image ─────────────────────────────────────────────────────

static RE_IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap());

fn image(input: &str) -> String {
    RE_IMAGE
        .replace_all(input, |caps: &Captures<'_>| {
            let (alt, src) = (&caps[1], &caps[2]);
            if dialect::is_equation_src(src) {
                dialect::equation_src_img(src, alt)
            } else {
                dialect::plain_img(src, alt)
            }
        })
        .into_owned()
}

// ── Rule 7: Line break ───────────────────────────────────────────────────────

fn line_break(input: &str) -> String {
    input.replace('\n', dialect::LINE_BREAK)
}

// ── Rule 8: Inline math ──────────────────────────────────────────────────────

static RE_MATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$(.*?)\$").unwrap());

fn math(input: &str) -> String {
    RE_MATH
        .replace_all(input, |caps: &Captures<'_>| dialect::equation_img(&caps[1]))
        .into_owned()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_both_delimiters() {
        assert_eq!(render_inline("**a** and __b__"), "<b>a</b> and <b>b</b>");
    }

    #[test]
    fn test_italic_both_delimiters() {
        assert_eq!(render_inline("*a* and _b_"), "<i>a</i> and <i>b</i>");
    }

    #[test]
    fn test_bold_wraps_nested_italic() {
        assert_eq!(
            render_inline("**bold *and* more**"),
            "<b>bold <i>and</i> more</b>"
        );
    }

    #[test]
    fn test_bold_is_non_greedy() {
        assert_eq!(render_inline("**a** x **b**"), "<b>a</b> x <b>b</b>");
    }

    #[test]
    fn test_link() {
        assert_eq!(
            render_inline("see [docs](https://docs.rs)"),
            r#"see <a href="https://docs.rs">docs</a>"#
        );
    }

    #[test]
    fn test_inline_code() {
        assert_eq!(render_inline("run `ls -la`"), "run <code>ls -la</code>");
    }

    #[test]
    fn test_footnote_marker() {
        let html = render_inline("claim[^3]");
        assert!(html.starts_with("claim<sup "), "got: {html}");
        assert!(html.contains(r#"data-numero="3""#));
        assert!(html.ends_with(">[3]</sup>"));
    }

    #[test]
    fn test_link_rule_shadows_image_with_alt() {
        assert_eq!(
            render_inline("![cat](cat.png)"),
            r#"!<a href="cat.png">cat</a>"#
        );
    }

    #[test]
    fn test_image_without_alt() {
        assert_eq!(
            render_inline("![](cat.png)"),
            r#"<img src="cat.png" alt="" />"#
        );
    }

    #[test]
    fn test_equation_image_without_alt() {
        assert_eq!(
            render_inline("![](//www.zhihu.com/equation?tex=x)"),
            r#"<img eeimg="1" src="//www.zhihu.com/equation?tex=x" alt=""/>"#
        );
    }

    #[test]
    fn test_line_breaks() {
        assert_eq!(render_inline("a\nb\nc"), "a<br/>b<br/>c");
    }

    #[test]
    fn test_inline_math() {
        let html = render_inline("$E=mc^2$");
        assert!(html.starts_with(r#"<img eeimg="1" "#), "got: {html}");
        assert!(html.contains(r#"alt="E=mc^2""#));
        assert!(html.contains(r#"src="//www.zhihu.com/equation?tex=E%3Dmc%5E2""#));
    }

    #[test]
    fn test_math_sees_line_breaks() {
        let html = render_inline("$a\nb$");
        assert!(html.contains(r#"alt="a<br/>b""#), "got: {html}");
    }

    #[test]
    fn test_italic_runs_before_math() {
        // Underscores inside a formula are consumed by the italic rule first.
        let html = render_inline("$a_1 + b_2$");
        assert!(html.contains("<i>1 + b</i>"), "got: {html}");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(render_inline("just words, 42."), "just words, 42.");
    }

    #[test]
    fn test_rule_order() {
        let names: Vec<&str> = INLINE_RULES.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            ["bold", "italic", "link", "code", "footnote", "image", "line_break", "math"]
        );
    }
}
