//! Pipeline stages for Markdown image inlining.
//!
//! Each submodule implements one step and is testable on its own.
//!
//! ## Data Flow
//!
//! ```text
//! line ──▶ reference ──▶ resolve ──▶ encode ──▶ transform
//!          (parse)       (fs/HTTP)   (PNG+b64)  (rewrite + record)
//! ```
//!
//! 1. [`reference`] — split a line into prefix, `![alt]`, target and suffix
//! 2. [`resolve`]   — read the target from disk or fetch it over HTTP, then
//!    decode it; the only stage with I/O
//! 3. [`encode`]    — re-encode as PNG and wrap in base64
//! 4. [`transform`] — tie the three together for one line

pub mod encode;
pub mod reference;
pub mod resolve;
pub mod transform;
