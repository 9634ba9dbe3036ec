//! # md2zhihu
//!
//! Convert Markdown documents to the HTML dialect accepted by Zhihu's article
//! editor.
//!
//! ## Why a dedicated converter?
//!
//! The editor does not take generic HTML. Equations must be images served by
//! its equation service and tagged `eeimg`, footnote markers are superscripts
//! with draft metadata, figures need caption and watermark attributes, and
//! tables carry block metadata. A CommonMark renderer produces none of this,
//! so this crate renders the dialect directly with a small, predictable
//! two-pass transformer.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Markdown
//!  │
//!  ├─ 1. Escape    &, <, > → entities (nothing the author types survives as markup)
//!  ├─ 2. Segment   split on blank lines into trimmed blocks
//!  ├─ 3. Dispatch  ordered rules: heading, list, quote, fence, rule, table, image, …
//!  ├─ 4. Render    one renderer per block kind (fences and tables consume extra blocks)
//!  ├─ 5. Inline    bold → italic → link → code → footnote → image → break → math
//!  └─ 6. Output    concatenated HTML fragment + per-kind stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! let html = md2zhihu::to_html("# Title\n\nEnergy: $E=mc^2$").unwrap();
//! assert!(html.starts_with("<h1>Title</h1><p>Energy: <img eeimg=\"1\""));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `md2zhihu` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! md2zhihu = { version = "0.1", default-features = false }
//! ```
//!
//! ## Limitations
//!
//! This is not a CommonMark implementation. Blocks are separated by blank
//! lines only, lists and blockquotes are flat, and inline syntax is resolved
//! by a fixed sequence of substitutions rather than a parser.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod dialect;
pub mod error;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, LocalImagePolicy};
pub use convert::{convert, convert_file, convert_to_file, to_html};
pub use error::Md2ZhihuError;
pub use output::{ConversionOutput, ConversionStats};
pub use pipeline::dispatch::BlockKind;
