//! Error types for the mdinline library.
//!
//! Every failure is fatal: a half-inlined document is worse than no output,
//! so nothing here is recovered locally. [`InlineError`] is returned from all
//! top-level `inline_*` functions and short-circuits the run through `?`.
//!
//! Variants are grouped by the stage that raises them so a diagnostic always
//! names the failing operation as well as the underlying cause.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the mdinline library.
#[derive(Debug, Error)]
pub enum InlineError {
    // ── Usage errors ──────────────────────────────────────────────────────
    /// The caller did not supply a usable document path.
    #[error("Invalid usage: {0}")]
    Usage(String),

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Document I/O errors ───────────────────────────────────────────────
    /// The input document could not be opened.
    #[error("Failed to open document '{path}': {source}")]
    InputOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading a line from the input failed (I/O error or invalid UTF-8).
    #[error("Failed to read document line {line}: {source}")]
    InputRead {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    /// The output file could not be created.
    #[error("Failed to create output file '{path}': {source}")]
    OutputCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing or flushing the output stream failed.
    #[error("Failed to write output: {source}")]
    WriteFailed {
        #[source]
        source: std::io::Error,
    },

    /// The finished output could not be moved over the original document.
    #[error("Failed to move '{from}' over '{to}': {source}")]
    ReplaceFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Image resolution errors ───────────────────────────────────────────
    /// A local image exists but could not be read.
    #[error("Failed to read image '{path}': {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The image was not a local file and fetching it over HTTP failed.
    #[error("Failed to download image '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    /// The configured download timeout elapsed.
    #[error("Download timed out after {secs}s for '{url}'")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Codec errors ──────────────────────────────────────────────────────
    /// The fetched bytes are not an image format we can decode.
    #[error("Image '{target}' could not be decoded: {source}")]
    DecodeFailed {
        target: String,
        #[source]
        source: image::ImageError,
    },

    /// Re-encoding the decoded pixels as PNG failed.
    #[error("Failed to encode image '{target}' as PNG: {source}")]
    EncodeFailed {
        target: String,
        #[source]
        source: image::ImageError,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_failed_display() {
        let e = InlineError::DownloadFailed {
            url: "http://example.com/a.png".into(),
            reason: "HTTP 404 Not Found".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("http://example.com/a.png"), "got: {msg}");
        assert!(msg.contains("404"), "got: {msg}");
    }

    #[test]
    fn download_timeout_display() {
        let e = InlineError::DownloadTimeout {
            url: "http://slow.example/a.png".into(),
            secs: 30,
        };
        assert!(e.to_string().contains("30s"));
    }

    #[test]
    fn input_read_names_line() {
        let e = InlineError::InputRead {
            line: 7,
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, "bad utf-8"),
        };
        let msg = e.to_string();
        assert!(msg.contains("line 7"), "got: {msg}");
        assert!(msg.contains("bad utf-8"), "got: {msg}");
    }

    #[test]
    fn replace_failed_names_both_paths() {
        let e = InlineError::ReplaceFailed {
            from: PathBuf::from("doc.md.tmp"),
            to: PathBuf::from("doc.md"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = e.to_string();
        assert!(msg.contains("doc.md.tmp"));
        assert!(msg.contains("'doc.md'"));
    }

    #[test]
    fn io_source_is_chained() {
        use std::error::Error as _;
        let e = InlineError::OutputCreate {
            path: PathBuf::from("/ro/doc.md.tmp"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        };
        assert!(e.source().is_some());
    }
}
