//! Output types: the records collected for the appendix and the run report.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Prefix of every generated image identifier (`img_0`, `img_1`, …).
pub const IMAGE_ID_PREFIX: &str = "img_";

/// MIME type of the canonical format every payload is re-encoded to.
pub const CANONICAL_MIME: &str = "image/png";

/// Blank lines written between the body and the appendix.
pub const APPENDIX_SEPARATOR: &str = "\n\n\n\n\n";

/// Build the identifier for the `n`-th inlined image of a document.
pub fn image_id(n: usize) -> String {
    format!("{IMAGE_ID_PREFIX}{n}")
}

/// One resolved image, held until the appendix is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineRecord {
    id: String,
    payload: String,
}

impl InlineRecord {
    pub fn new(id: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            payload: payload.into(),
        }
    }

    /// Identifier referenced from the rewritten body line.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Base64 text of the canonical PNG.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// The appendix line for this record, newline included:
    /// `[img_N]:data:image/png;base64,<payload>\n`.
    pub fn declaration(&self) -> String {
        format!(
            "[{}]:data:{};base64,{}\n",
            self.id, CANONICAL_MIME, self.payload
        )
    }
}

/// Summary of one inlining run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineStats {
    /// Lines read from the input document.
    pub lines: usize,
    /// References resolved and moved into the appendix.
    pub images_inlined: usize,
    /// References left untouched because they already carry embedded data.
    pub images_skipped: usize,
    /// Total base64 bytes written to the appendix.
    pub payload_bytes: usize,
    /// Wall-clock duration of the run.
    pub duration_ms: u64,
    /// Where the output was written; `None` for in-memory runs.
    pub output_path: Option<PathBuf>,
    /// Whether the output replaced the original document.
    pub replaced: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_encounter_index() {
        assert_eq!(image_id(0), "img_0");
        assert_eq!(image_id(12), "img_12");
    }

    #[test]
    fn declaration_format() {
        let rec = InlineRecord::new(image_id(3), "iVBORw0KGgo=");
        assert_eq!(
            rec.declaration(),
            "[img_3]:data:image/png;base64,iVBORw0KGgo=\n"
        );
    }

    #[test]
    fn stats_serialise_to_json() {
        let stats = InlineStats {
            lines: 10,
            images_inlined: 2,
            images_skipped: 1,
            payload_bytes: 120,
            duration_ms: 5,
            output_path: Some(PathBuf::from("doc.md.tmp")),
            replaced: false,
        };
        let json = serde_json::to_string(&stats).expect("serialise");
        assert!(json.contains("\"images_inlined\":2"));
        let back: InlineStats = serde_json::from_str(&json).expect("deserialise");
        assert_eq!(back, stats);
    }
}
