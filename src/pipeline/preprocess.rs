//! Pre-processing: everything that runs on the raw document before it is
//! split into blocks.
//!
//! ## Pass order
//!
//! 1. Normalise line endings (CRLF / CR → LF) so blank-line segmentation
//!    sees the same boundaries on every platform.
//! 2. Optionally promote single-dollar math to display math.
//! 3. Escape `&`, `<` and `>`.
//!
//! Escaping is last and global: every later stage works on escaped text, so
//! no angle bracket typed by the author can reach the emitted markup. Block
//! and inline rules that look for `>` therefore look for `&gt;` instead.

use crate::config::ConversionConfig;

/// Run every pre-processing pass the config asks for.
pub fn preprocess(markdown: &str, config: &ConversionConfig) -> String {
    let s = normalise_line_endings(markdown);
    let s = if config.promote_inline_math {
        promote_inline_math(&s)
    } else {
        s
    };
    escape_html(&s)
}

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

/// Escape the three HTML-significant characters. Quotes are left bare.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 8);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Inverse of [`escape_html`], for values leaving HTML (file paths, URL
/// query parameters).
pub fn unescape_html(input: &str) -> String {
    input
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Rewrite `$x$` to `$$x$$`.
///
/// A delimiter is a `$` with no `$` immediately before or after it. On each
/// line, delimiters pair up left to right; an unpaired trailing delimiter is
/// left alone. Existing `$$…$$` spans are never touched.
pub fn promote_inline_math(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 16);
    for (i, line) in input.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let bytes = line.as_bytes();
        let lone: Vec<usize> = bytes
            .iter()
            .enumerate()
            .filter(|&(j, &b)| {
                b == b'$'
                    && (j == 0 || bytes[j - 1] != b'$')
                    && bytes.get(j + 1) != Some(&b'$')
            })
            .map(|(j, _)| j)
            .collect();

        let mut last = 0;
        for pair in lone.chunks_exact(2) {
            let (open, close) = (pair[0], pair[1]);
            out.push_str(&line[last..open]);
            out.push_str("$$");
            out.push_str(&line[open + 1..close]);
            out.push_str("$$");
            last = close + 1;
        }
        out.push_str(&line[last..]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x" & 'y')</script>"#),
            r#"&lt;script&gt;alert("x" &amp; 'y')&lt;/script&gt;"#
        );
    }

    #[test]
    fn test_escape_then_unescape() {
        let raw = "a < b && c > d";
        assert_eq!(unescape_html(&escape_html(raw)), raw);
    }

    #[test]
    fn test_unescape_does_not_double_decode() {
        // "&amp;lt;" is an escaped literal "&lt;", not "<".
        assert_eq!(unescape_html("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_normalise_line_endings() {
        assert_eq!(normalise_line_endings("a\r\n\r\nb\rc"), "a\n\nb\nc");
    }

    #[test]
    fn test_promote_single_formula() {
        assert_eq!(promote_inline_math("see $x^2$ here"), "see $$x^2$$ here");
    }

    #[test]
    fn test_promote_leaves_display_math() {
        assert_eq!(promote_inline_math("$$a+b$$"), "$$a+b$$");
    }

    #[test]
    fn test_promote_pairs_left_to_right() {
        assert_eq!(promote_inline_math("$a$ and $b$"), "$$a$$ and $$b$$");
    }

    #[test]
    fn test_promote_ignores_unpaired() {
        assert_eq!(promote_inline_math("costs $5"), "costs $5");
    }

    #[test]
    fn test_promote_does_not_span_lines() {
        assert_eq!(promote_inline_math("a $b\nc$ d"), "a $b\nc$ d");
    }

    #[test]
    fn test_preprocess_respects_config() {
        let off = ConversionConfig::default();
        let on = ConversionConfig::builder()
            .promote_inline_math(true)
            .build()
            .unwrap();
        assert_eq!(preprocess("$x$ <", &off), "$x$ &lt;");
        assert_eq!(preprocess("$x$ <", &on), "$$x$$ &lt;");
    }
}
