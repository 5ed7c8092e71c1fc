//! Progress-callback trait for per-image inlining events.
//!
//! Inject an [`Arc<dyn InlineProgressCallback>`] via
//! [`crate::config::InlineConfigBuilder::progress_callback`] to receive
//! events as the pipeline walks the document.
//!
//! The pipeline is strictly sequential, so events arrive in document order:
//! every `on_image_start` is followed by its `on_image_complete` before the
//! next line is read. The trait is still `Send + Sync` so one callback can be
//! shared with other threads (a UI thread rendering a progress bar, say).
//!
//! # Example
//!
//! ```rust
//! use mdinline::{InlineConfig, InlineProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     inlined: AtomicUsize,
//! }
//!
//! impl InlineProgressCallback for CountingCallback {
//!     fn on_image_complete(&self, id: &str, target: &str, payload_len: usize) {
//!         self.inlined.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{id} <- {target} ({payload_len} bytes)");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { inlined: AtomicUsize::new(0) });
//!
//! let config = InlineConfig::builder()
//!     .progress_callback(counter as Arc<dyn InlineProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::output::InlineStats;
use std::sync::Arc;

/// Called by the inlining pipeline as it processes each image reference.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait InlineProgressCallback: Send + Sync {
    /// Called before an image is resolved.
    ///
    /// # Arguments
    /// * `id`     — identifier the image will receive (`img_N`)
    /// * `target` — path or URL as written in the document
    fn on_image_start(&self, id: &str, target: &str) {
        let _ = (id, target);
    }

    /// Called once an image has been resolved and encoded.
    ///
    /// # Arguments
    /// * `payload_len` — length of the base64 payload in bytes
    fn on_image_complete(&self, id: &str, target: &str, payload_len: usize) {
        let _ = (id, target, payload_len);
    }

    /// Called when a reference already carries embedded data and is left as is.
    ///
    /// # Arguments
    /// * `line_no` — 1-indexed line number of the reference
    fn on_image_skipped(&self, line_no: usize, target: &str) {
        let _ = (line_no, target);
    }

    /// Called once after the output has been written (and moved, if in place).
    fn on_document_complete(&self, stats: &InlineStats) {
        let _ = stats;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl InlineProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::InlineConfig`].
pub type ProgressCallback = Arc<dyn InlineProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        skips: AtomicUsize,
        finished_with: AtomicUsize,
    }

    impl InlineProgressCallback for TrackingCallback {
        fn on_image_start(&self, _id: &str, _target: &str) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_image_complete(&self, _id: &str, _target: &str, _payload_len: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_image_skipped(&self, _line_no: usize, _target: &str) {
            self.skips.fetch_add(1, Ordering::SeqCst);
        }

        fn on_document_complete(&self, stats: &InlineStats) {
            self.finished_with
                .store(stats.images_inlined, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_image_start("img_0", "a.png");
        cb.on_image_complete("img_0", "a.png", 44);
        cb.on_image_skipped(3, "data:image/png;base64,AAAA");
        cb.on_document_complete(&InlineStats::default());
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_image_start("img_0", "a.png");
        tracker.on_image_complete("img_0", "a.png", 100);
        tracker.on_image_skipped(2, "x:data:image/png");
        tracker.on_image_start("img_1", "b.png");
        tracker.on_image_complete("img_1", "b.png", 200);

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.skips.load(Ordering::SeqCst), 1);

        tracker.on_document_complete(&InlineStats {
            images_inlined: 2,
            ..InlineStats::default()
        });
        assert_eq!(tracker.finished_with.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_image_start("img_0", "https://example.com/a.png");
        cb.on_image_complete("img_0", "https://example.com/a.png", 512);
    }
}
