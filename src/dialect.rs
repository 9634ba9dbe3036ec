//! Zhihu's HTML vocabulary: every platform-specific string in one place.
//!
//! The article editor rejects or silently rewrites markup that does not carry
//! its own attributes (`eeimg`, `data-draft-node`, watermark sources, …).
//! Keeping those strings here means the renderers only decide *what* to emit
//! and tests can assert against the same constants the renderers use.

use crate::pipeline::preprocess::unescape_html;

/// Prefix shared by every URL served by the equation rendering service.
pub const EQUATION_PREFIX: &str = "//www.zhihu.com/equation";

/// Query endpoint taking a percent-encoded TeX formula.
pub const EQUATION_ENDPOINT: &str = "//www.zhihu.com/equation?tex=";

/// Language attribute for code fences opened without a tag.
pub const CODE_LANG_PLACEHOLDER: &str = "text";

/// Raw width/height the editor expects on figure images. Not measured.
pub const FIGURE_PLACEHOLDER_SIZE: u32 = 256;

/// Opening tag for tables, including the editor's block metadata.
pub const TABLE_OPEN: &str =
    r#"<table data-draft-node="block" data-draft-type="table" data-size="normal"><tbody>"#;

/// Closing counterpart of [`TABLE_OPEN`].
pub const TABLE_CLOSE: &str = "</tbody></table>";

pub const HORIZONTAL_RULE: &str = "<hr />";

pub const LINE_BREAK: &str = "<br/>";

/// Rendered for a block with no content.
pub const EMPTY_PARAGRAPH: &str = "<p><br></p>";

/// Whether `src` points at the equation service.
pub fn is_equation_src(src: &str) -> bool {
    src.starts_with(EQUATION_PREFIX)
}

/// Equation image for a TeX formula.
///
/// `formula` is escaped text; the query parameter is built from the
/// unescaped formula so the service sees the characters the author typed.
pub fn equation_img(formula: &str) -> String {
    let tex = urlencoding::encode(&unescape_html(formula)).into_owned();
    format!(r#"<img eeimg="1" src="{EQUATION_ENDPOINT}{tex}" alt="{formula}"/>"#)
}

/// Equation image whose `src` is already a service URL.
pub fn equation_src_img(src: &str, alt: &str) -> String {
    format!(r#"<img eeimg="1" src="{src}" alt="{alt}"/>"#)
}

/// Display equation: an equation image centred in its own paragraph.
pub fn display_equation(img: &str) -> String {
    format!("<p> {img} </p>")
}

/// Figure image with the editor's caption and watermark attributes.
pub fn figure_img(src: &str) -> String {
    let size = FIGURE_PLACEHOLDER_SIZE;
    format!(
        r#"<img src="{src}" data-caption="" data-size="normal" data-rawwidth="{size}" data-rawheight="{size}" data-watermark="watermark" data-original-src="{src}" data-watermark-src="{src}" data-private-watermark-src=""/>"#
    )
}

/// Plain image tag, used inline and for embedded local files.
pub fn plain_img(src: &str, alt: &str) -> String {
    format!(r#"<img src="{src}" alt="{alt}" />"#)
}

/// Footnote reference marker `[n]`.
pub fn footnote_sup(num: &str) -> String {
    format!(
        r#"<sup data-text="footnote {num}" data-url="http://footnote.com" data-draft-node="inline" data-draft-type="reference" data-numero="{num}">[{num}]</sup>"#
    )
}
