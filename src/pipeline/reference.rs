//! Image-reference detection: split one line into its four segments.
//!
//! A line is matched against a single anchored pattern
//! `<prefix>![<alt>](<target>)<suffix>`. The prefix is lazy, so when a line
//! holds several references only the first is recognised; the rest of the
//! line, further references included, is carried verbatim in `suffix`.
//! Callers rely on that, so it is tested below rather than "fixed".
//!
//! Matching works on raw bytes: a line need not be valid UTF-8 to pass
//! through, only the target does to be resolved. The alt text may hold one
//! level of nested brackets (`![see [1]](a.png)`) and the target one level of
//! balanced parentheses (`chart_(v2).png`).

use once_cell::sync::Lazy;
use regex::bytes::Regex;

static RE_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s-u)^(?P<prefix>.*?)(?P<label>!\[(?:[^\[\]]|\[[^\[\]]*\])*\])\((?P<target>(?:[^()]|\([^()]*\))+)\)(?P<suffix>.*)$",
    )
    .expect("image reference pattern is valid")
});

/// Substrings whose presence in a target means the image is already embedded.
const EMBEDDED_MARKERS: [&str; 2] = ["base64", ":data:image/"];

/// The first image reference on a line, borrowed from that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageReference<'a> {
    /// Text before the image markup.
    pub prefix: &'a [u8],
    /// The `![alt]` markup including its brackets.
    pub label: &'a [u8],
    /// Path or URL between the parentheses.
    pub target: &'a str,
    /// Text after the closing parenthesis.
    pub suffix: &'a [u8],
}

impl<'a> ImageReference<'a> {
    /// Parse the first complete image reference on `line`, if any.
    ///
    /// A reference whose target is not valid UTF-8 cannot name a path or URL
    /// we could fetch, so such a line is treated as plain text.
    pub fn parse(line: &'a [u8]) -> Option<Self> {
        let caps = RE_REFERENCE.captures(line)?;
        Some(Self {
            prefix: caps.name("prefix")?.as_bytes(),
            label: caps.name("label")?.as_bytes(),
            target: std::str::from_utf8(caps.name("target")?.as_bytes()).ok()?,
            suffix: caps.name("suffix")?.as_bytes(),
        })
    }

    /// Whether the target already carries embedded image data.
    pub fn is_inline(&self) -> bool {
        has_embedded_data(self.target)
    }

    /// Rebuild the line with the target swapped for a bracketed identifier:
    /// `<prefix>![alt][<id>]<suffix>`.
    pub fn rewrite(&self, id: &str) -> Vec<u8> {
        let len = self.prefix.len() + self.label.len() + id.len() + 2 + self.suffix.len();
        let mut line = Vec::with_capacity(len);
        line.extend_from_slice(self.prefix);
        line.extend_from_slice(self.label);
        line.push(b'[');
        line.extend_from_slice(id.as_bytes());
        line.push(b']');
        line.extend_from_slice(self.suffix);
        line
    }
}

/// Plain substring test, so a file named `base64-logo.png` also counts.
pub fn has_embedded_data(target: &str) -> bool {
    EMBEDDED_MARKERS.iter().any(|m| target.contains(m))
}
