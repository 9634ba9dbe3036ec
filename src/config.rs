//! Configuration types for Markdown-to-Zhihu conversion.
//!
//! The converter has very few knobs: the HTML it emits is dictated by what
//! the platform accepts. What remains configurable is where the input
//! differs between authors (local image handling, single-dollar math) and
//! resource limits for embedding files.
//!
//! [`ConversionConfig`] is built via its [`ConversionConfigBuilder`] or taken
//! from [`ConversionConfig::default()`], which reproduces the platform's
//! reference behaviour exactly.

use crate::error::Md2ZhihuError;
use serde::{Deserialize, Serialize};

/// Configuration for a Markdown-to-Zhihu conversion.
///
/// # Example
/// ```rust
/// use md2zhihu::{ConversionConfig, LocalImagePolicy};
///
/// let config = ConversionConfig::builder()
///     .local_images(LocalImagePolicy::Embed)
///     .max_local_image_bytes(5 * 1024 * 1024)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// How `![alt](file:<path>)` blocks are treated. Default: [`LocalImagePolicy::Inline`].
    pub local_images: LocalImagePolicy,

    /// Upper bound on the size of an embedded local image. Default: no limit.
    ///
    /// Base64 inflates a file by a third and the whole image lands inside
    /// the HTML fragment, so large screenshots can push a draft past the
    /// platform's request size.
    pub max_local_image_bytes: Option<u64>,

    /// Rewrite lone `$x$` formulas to `$$x$$` before conversion. Default: false.
    ///
    /// With this on, a paragraph containing single-dollar math renders as a
    /// display equation instead of inline text with an equation image.
    pub promote_inline_math: bool,
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn local_images(mut self, policy: LocalImagePolicy) -> Self {
        self.config.local_images = policy;
        self
    }

    pub fn max_local_image_bytes(mut self, limit: u64) -> Self {
        self.config.max_local_image_bytes = Some(limit);
        self
    }

    pub fn promote_inline_math(mut self, v: bool) -> Self {
        self.config.promote_inline_math = v;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Md2ZhihuError> {
        if self.config.max_local_image_bytes == Some(0) {
            return Err(Md2ZhihuError::InvalidConfig(
                "max_local_image_bytes must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Treatment of standalone image blocks whose URL starts with `file:`.
///
/// The standalone-image rule matches every `![alt](url)` block, including
/// `file:` URLs, and is checked before the local-file rule. Under the default
/// ordering a local reference therefore renders like any other figure, with
/// the `file:` URL left in `src`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalImagePolicy {
    /// Keep the platform's rule order; `file:` images are emitted as-is. (default)
    #[default]
    Inline,
    /// Check the local-file rule first and embed the file as a base64 data URI.
    Embed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_preserves_reference_behaviour() {
        let c = ConversionConfig::default();
        assert_eq!(c.local_images, LocalImagePolicy::Inline);
        assert_eq!(c.max_local_image_bytes, None);
        assert!(!c.promote_inline_math);
    }

    #[test]
    fn builder_sets_fields() {
        let c = ConversionConfig::builder()
            .local_images(LocalImagePolicy::Embed)
            .max_local_image_bytes(1024)
            .promote_inline_math(true)
            .build()
            .unwrap();
        assert_eq!(c.local_images, LocalImagePolicy::Embed);
        assert_eq!(c.max_local_image_bytes, Some(1024));
        assert!(c.promote_inline_math);
    }

    #[test]
    fn zero_byte_limit_rejected() {
        let err = ConversionConfig::builder()
            .max_local_image_bytes(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, Md2ZhihuError::InvalidConfig(_)));
    }

    #[test]
    fn policy_serialises_snake_case() {
        let json = serde_json::to_string(&LocalImagePolicy::Embed).unwrap();
        assert_eq!(json, "\"embed\"");
    }
}
