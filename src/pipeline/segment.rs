//! Block segmentation: escaped text → ordered blocks.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());

/// Split on runs of two or more line feeds, trim each piece and drop the
/// ones left empty. Order is preserved.
///
/// A line holding only spaces is *not* a boundary: `"a\n  \nb"` is one block.
pub fn split_blocks(text: &str) -> Vec<&str> {
    RE_BLANK_RUN
        .split(text)
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .collect()
}
