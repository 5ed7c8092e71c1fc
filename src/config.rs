//! Configuration types for Markdown image inlining.
//!
//! Every knob lives in [`InlineConfig`], built via [`InlineConfigBuilder`].
//! The configuration is passed explicitly to each entry point; the library
//! keeps no process-wide state.

use crate::error::InlineError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;

/// Suffix appended to the input path to name the output file.
pub const DEFAULT_OUTPUT_SUFFIX: &str = ".tmp";

/// Configuration for one inlining run.
///
/// Built via [`InlineConfig::builder()`] or using [`InlineConfig::default()`].
///
/// # Example
/// ```rust
/// use mdinline::InlineConfig;
///
/// let config = InlineConfig::builder()
///     .inplace(true)
///     .base_dir("docs")
///     .build()
///     .unwrap();
/// assert!(config.inplace);
/// ```
#[derive(Clone)]
pub struct InlineConfig {
    /// Replace the input document with the output after a successful run. Default: false.
    pub inplace: bool,

    /// Suffix appended to the input path to name the output file. Default: `.tmp`.
    ///
    /// Must be non-empty: the output is written while the input is still
    /// being read, so the two paths may never coincide.
    pub output_suffix: String,

    /// Directory that relative local image paths are resolved against.
    ///
    /// `None` resolves them against the process working directory.
    pub base_dir: Option<PathBuf>,

    /// Timeout for each image download in seconds. Default: none.
    ///
    /// With `None` the HTTP client's own defaults apply.
    pub download_timeout_secs: Option<u64>,

    /// Receives per-image events. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for InlineConfig {
    fn default() -> Self {
        Self {
            inplace: false,
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            base_dir: None,
            download_timeout_secs: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for InlineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineConfig")
            .field("inplace", &self.inplace)
            .field("output_suffix", &self.output_suffix)
            .field("base_dir", &self.base_dir)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn InlineProgressCallback>"),
            )
            .finish()
    }
}

impl InlineConfig {
    /// Create a new builder for `InlineConfig`.
    pub fn builder() -> InlineConfigBuilder {
        InlineConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`InlineConfig`].
#[derive(Debug)]
pub struct InlineConfigBuilder {
    config: InlineConfig,
}

impl InlineConfigBuilder {
    pub fn inplace(mut self, v: bool) -> Self {
        self.config.inplace = v;
        self
    }

    pub fn output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.output_suffix = suffix.into();
        self
    }

    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.base_dir = Some(dir.into());
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = Some(secs);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<InlineConfig, InlineError> {
        let c = &self.config;
        if c.output_suffix.is_empty() {
            return Err(InlineError::InvalidConfig(
                "Output suffix must not be empty".into(),
            ));
        }
        if c.output_suffix.contains(std::path::is_separator) {
            return Err(InlineError::InvalidConfig(format!(
                "Output suffix must not contain a path separator, got '{}'",
                c.output_suffix
            )));
        }
        if c.download_timeout_secs == Some(0) {
            return Err(InlineError::InvalidConfig(
                "Download timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = InlineConfig::default();
        assert!(!c.inplace);
        assert_eq!(c.output_suffix, ".tmp");
        assert!(c.base_dir.is_none());
        assert!(c.download_timeout_secs.is_none());
    }

    #[test]
    fn builder_sets_fields() {
        let c = InlineConfig::builder()
            .inplace(true)
            .output_suffix(".inlined")
            .base_dir("/srv/docs")
            .download_timeout_secs(15)
            .build()
            .expect("valid config");
        assert!(c.inplace);
        assert_eq!(c.output_suffix, ".inlined");
        assert_eq!(c.base_dir, Some(PathBuf::from("/srv/docs")));
        assert_eq!(c.download_timeout_secs, Some(15));
    }

    #[test]
    fn empty_suffix_rejected() {
        let err = InlineConfig::builder().output_suffix("").build().unwrap_err();
        assert!(matches!(err, InlineError::InvalidConfig(_)));
    }

    #[test]
    fn suffix_with_separator_rejected() {
        let err = InlineConfig::builder()
            .output_suffix("/out.md")
            .build()
            .unwrap_err();
        assert!(matches!(err, InlineError::InvalidConfig(_)));
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = InlineConfig::builder()
            .download_timeout_secs(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, InlineError::InvalidConfig(_)));
    }

    #[test]
    fn debug_elides_callback() {
        let c = InlineConfig::builder()
            .progress_callback(std::sync::Arc::new(crate::progress::NoopProgressCallback))
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(dbg.contains("<dyn InlineProgressCallback>"));
    }
}
