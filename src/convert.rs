//! Conversion entry points.
//!
//! Conversion is synchronous and owns no shared state, so independent
//! documents can be converted from as many threads as the caller likes.
//! The only blocking operation is reading a `file:` image when
//! [`LocalImagePolicy::Embed`](crate::LocalImagePolicy::Embed) is set.

use crate::config::ConversionConfig;
use crate::error::Md2ZhihuError;
use crate::output::{ConversionOutput, ConversionStats};
use crate::pipeline::dispatch::{self, BlockKind};
use crate::pipeline::{preprocess, segment};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Convert Markdown to Zhihu HTML with the default configuration.
///
/// With the default config no file is ever read, so this cannot fail in
/// practice; the `Result` mirrors [`convert`].
pub fn to_html(markdown: &str) -> Result<String, Md2ZhihuError> {
    convert(markdown, &ConversionConfig::default()).map(|out| out.html)
}

/// Convert Markdown to Zhihu HTML.
///
/// # Errors
/// Returns `Err` only when a local image is embedded and cannot be read or
/// exceeds `max_local_image_bytes`. No partial output is produced.
pub fn convert(
    markdown: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Md2ZhihuError> {
    let start = Instant::now();
    let markdown = markdown.as_ref();
    info!("Starting conversion: {} bytes", markdown.len());

    // ── Step 1: Escape ───────────────────────────────────────────────────
    let escaped = preprocess::preprocess(markdown, config);

    // ── Step 2: Segment ──────────────────────────────────────────────────
    let blocks = segment::split_blocks(&escaped);
    debug!("Segmented into {} blocks", blocks.len());

    // ── Step 3: Classify and render ──────────────────────────────────────
    let rendered = dispatch::dispatch(&blocks, config)?;

    // ── Step 4: Assemble ─────────────────────────────────────────────────
    let mut html = String::with_capacity(escaped.len() * 2);
    let mut block_counts: BTreeMap<BlockKind, usize> = BTreeMap::new();
    for block in &rendered {
        html.push_str(&block.html);
        *block_counts.entry(block.kind).or_default() += 1;
    }

    let stats = ConversionStats {
        input_bytes: markdown.len(),
        segmented_blocks: blocks.len(),
        rendered_blocks: rendered.len(),
        embedded_images: block_counts
            .get(&BlockKind::LocalImage)
            .copied()
            .unwrap_or(0),
        block_counts,
        total_duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Conversion complete: {} blocks → {} bytes HTML in {}ms",
        stats.rendered_blocks,
        html.len(),
        stats.total_duration_ms
    );

    Ok(ConversionOutput { html, stats })
}

/// Read a Markdown file and convert it.
pub fn convert_file(
    path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Md2ZhihuError> {
    let path = path.as_ref();
    let markdown = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Md2ZhihuError::InputNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Md2ZhihuError::InputReadFailed {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    convert(&markdown, config)
}

/// Convert a Markdown file and write the HTML fragment to `output_path`.
///
/// Parent directories are created as needed.
pub fn convert_to_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, Md2ZhihuError> {
    let output_path = output_path.as_ref();
    let output = convert_file(input_path, config)?;

    let write_err = |e: std::io::Error| Md2ZhihuError::OutputWriteFailed {
        path: output_path.to_path_buf(),
        source: e,
    };
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(output_path, output.html.as_bytes()).map_err(write_err)?;

    info!("Wrote {}", output_path.display());
    Ok(output.stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        let out = convert("", &ConversionConfig::default()).unwrap();
        assert_eq!(out.html, "");
        assert_eq!(out.stats.segmented_blocks, 0);
    }

    #[test]
    fn test_stats_count_consumed_blocks() {
        let md = "# T\n\nA | B\n\n---|---\n\n1 | 2\n\n```\nx\n\ny\n```";
        let out = convert(md, &ConversionConfig::default()).unwrap();
        assert_eq!(out.stats.segmented_blocks, 6);
        assert_eq!(out.stats.rendered_blocks, 3);
        assert_eq!(out.stats.count(BlockKind::Heading), 1);
        assert_eq!(out.stats.count(BlockKind::Table), 1);
        assert_eq!(out.stats.count(BlockKind::CodeFence), 1);
        assert_eq!(out.stats.embedded_images, 0);
    }

    #[test]
    fn test_missing_input_file() {
        let err = convert_file("/no/such/doc.md", &ConversionConfig::default()).unwrap_err();
        assert!(matches!(err, Md2ZhihuError::InputNotFound { .. }));
    }
}
