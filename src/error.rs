//! Error types for the md2zhihu library.
//!
//! Conversion is total over its input text: an unrecognised block renders as
//! a paragraph and an unmatched inline span passes through unchanged. The only
//! way a conversion itself can fail is the local image read, so most variants
//! here belong to the file-level entry points and the config builder.
//!
//! There is deliberately no partial-result type. A failed local image read
//! aborts the whole document; callers decide whether to retry with a
//! corrected path.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the md2zhihu library.
#[derive(Debug, Error)]
pub enum Md2ZhihuError {
    // ── Local image errors ────────────────────────────────────────────────
    /// A `file:` image reference points at a path that does not exist.
    #[error("Local image not found: '{path}'\nCheck the path in the image reference.")]
    LocalImageNotFound { path: PathBuf },

    /// The process cannot read the referenced image.
    #[error("Permission denied reading local image '{path}'\nTry: chmod +r {path:?}")]
    LocalImagePermissionDenied { path: PathBuf },

    /// Any other I/O failure while reading the image.
    #[error("Failed to read local image '{path}': {source}")]
    LocalImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The image is larger than `max_local_image_bytes`.
    #[error("Local image '{path}' is {size} bytes, over the {limit}-byte limit")]
    LocalImageTooLarge { path: PathBuf, size: u64, limit: u64 },

    // ── File entry points ─────────────────────────────────────────────────
    /// Markdown input file was not found.
    #[error("Markdown file not found: '{path}'")]
    InputNotFound { path: PathBuf },

    /// Markdown input exists but could not be read (permissions, invalid UTF-8).
    #[error("Failed to read Markdown file '{path}': {source}")]
    InputReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the output HTML file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Md2ZhihuError {
    /// Classify an I/O error raised while reading a local image.
    pub(crate) fn from_image_io(path: PathBuf, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Md2ZhihuError::LocalImageNotFound { path },
            std::io::ErrorKind::PermissionDenied => {
                Md2ZhihuError::LocalImagePermissionDenied { path }
            }
            _ => Md2ZhihuError::LocalImageRead { path, source },
        }
    }

    /// Whether this error came from the local image loader.
    pub fn is_local_image_error(&self) -> bool {
        matches!(
            self,
            Md2ZhihuError::LocalImageNotFound { .. }
                | Md2ZhihuError::LocalImagePermissionDenied { .. }
                | Md2ZhihuError::LocalImageRead { .. }
                | Md2ZhihuError::LocalImageTooLarge { .. }
        )
    }
}
