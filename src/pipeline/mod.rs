//! Pipeline stages for Markdown-to-Zhihu conversion.
//!
//! Each submodule implements exactly one transformation step and is
//! independently testable.
//!
//! ## Data Flow
//!
//! ```text
//! preprocess ──▶ segment ──▶ dispatch ──▶ blocks ──▶ inline
//! (escape)       (split)     (classify)   (render)   (spans)
//!                                           │
//!                                           └──▶ encode (file: images)
//! ```
//!
//! 1. [`preprocess`] — normalise line endings, optional math promotion,
//!    escape `&`, `<`, `>`
//! 2. [`segment`]    — split on blank-line runs into trimmed blocks
//! 3. [`dispatch`]   — ordered rule table; picks a renderer per block and
//!    advances past every block the renderer consumed
//! 4. [`blocks`]     — one renderer per block kind
//! 5. [`inline`]     — ordered text substitutions inside spans
//! 6. [`encode`]     — read a local image and wrap it as a data URI; the
//!    only stage touching the filesystem

pub mod blocks;
pub mod dispatch;
pub mod encode;
pub mod inline;
pub mod preprocess;
pub mod segment;
