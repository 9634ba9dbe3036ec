//! Conversion results.

use crate::pipeline::dispatch::BlockKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The HTML fragment plus statistics about how it was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Zhihu-flavoured HTML fragment, no document wrapper.
    pub html: String,
    pub stats: ConversionStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Size of the Markdown input in bytes.
    pub input_bytes: usize,
    /// Blocks produced by the segmenter.
    pub segmented_blocks: usize,
    /// Blocks rendered. Lower than `segmented_blocks` when code fences or
    /// tables consume following blocks.
    pub rendered_blocks: usize,
    /// Rendered blocks per kind.
    pub block_counts: BTreeMap<BlockKind, usize>,
    /// Local files embedded as data URIs.
    pub embedded_images: usize,
    pub total_duration_ms: u64,
}

impl ConversionStats {
    /// Number of rendered blocks of `kind`.
    pub fn count(&self, kind: BlockKind) -> usize {
        self.block_counts.get(&kind).copied().unwrap_or(0)
    }
}
