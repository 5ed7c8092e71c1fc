//! # mdinline
//!
//! Make a Markdown document self-contained by embedding the images it
//! references.
//!
//! Every line holding an image reference such as `![logo](./logo.png)` is
//! rewritten to a link-style reference `![logo][img_0]`, and the image itself
//! is appended at the end of the document as a data declaration:
//!
//! ```text
//! [img_0]:data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAA…
//! ```
//!
//! The result renders anywhere without the original files or network access.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Markdown
//!  │
//!  ├─ 1. Parse    find the first `![alt](target)` on each line
//!  ├─ 2. Resolve  read the target from disk, or fetch it over HTTP
//!  ├─ 3. Encode   decode (PNG/JPEG/GIF/BMP) → PNG → base64
//!  ├─ 4. Rewrite  `![alt](target)` → `![alt][img_N]`
//!  └─ 5. Append   one `[img_N]:data:image/png;base64,…` line per image
//! ```
//!
//! References whose target already contains `base64` or `:data:image/` are
//! left alone, so running the tool over its own output changes nothing.
//! Every failure is fatal: the document is inlined completely or not at all.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mdinline::{inline_file, InlineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = InlineConfig::builder().inplace(true).build()?;
//!     let stats = inline_file("README.md", &config).await?;
//!     eprintln!("{} images inlined", stats.images_inlined);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `mdinline` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! mdinline = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod inline;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{InlineConfig, InlineConfigBuilder};
pub use error::InlineError;
pub use inline::{inline_document, inline_file, inline_file_sync, inline_str, output_path_for};
pub use output::{InlineRecord, InlineStats};
pub use progress::{InlineProgressCallback, NoopProgressCallback, ProgressCallback};
