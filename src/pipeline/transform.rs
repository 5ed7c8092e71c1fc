//! Line transformation: rewrite one image reference into a link-style
//! reference and produce the record its appendix declaration is built from.

use crate::error::InlineError;
use crate::output::{image_id, InlineRecord};
use crate::pipeline::encode::encode_png_base64;
use crate::pipeline::reference::ImageReference;
use crate::pipeline::resolve::ImageResolver;
use crate::progress::ProgressCallback;
use tracing::{debug, info};

/// What happened to one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformedLine<'a> {
    /// No image reference; the line is written unchanged.
    Plain,
    /// The reference already embeds its data; the line is written unchanged.
    AlreadyInline { target: &'a str },
    /// The reference was resolved; `line` replaces the input line.
    Inlined { line: Vec<u8>, record: InlineRecord },
}

/// Applies the resolve → encode → rewrite sequence to single lines.
pub struct LineTransformer {
    resolver: ImageResolver,
    progress: Option<ProgressCallback>,
}

impl LineTransformer {
    pub fn new(resolver: ImageResolver, progress: Option<ProgressCallback>) -> Self {
        Self { resolver, progress }
    }

    /// Transform `line`. A resolved reference receives the id `img_<next_id>`;
    /// the caller advances `next_id` only for [`TransformedLine::Inlined`].
    pub async fn transform<'a>(
        &self,
        line: &'a [u8],
        next_id: usize,
    ) -> Result<TransformedLine<'a>, InlineError> {
        let Some(reference) = ImageReference::parse(line) else {
            return Ok(TransformedLine::Plain);
        };

        if reference.is_inline() {
            debug!("Reference already inline, leaving line as is");
            return Ok(TransformedLine::AlreadyInline {
                target: reference.target,
            });
        }

        let id = image_id(next_id);
        let target = reference.target;
        if let Some(ref cb) = self.progress {
            cb.on_image_start(&id, target);
        }

        let img = self.resolver.resolve(target).await?;
        let payload = encode_png_base64(&img, target)?;
        info!(
            "Inlined {} as {} ({}x{}, {} bytes base64)",
            target,
            id,
            img.width(),
            img.height(),
            payload.len()
        );

        if let Some(ref cb) = self.progress {
            cb.on_image_complete(&id, target, payload.len());
        }

        Ok(TransformedLine::Inlined {
            line: reference.rewrite(&id),
            record: InlineRecord::new(id, payload),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InlineConfig;
    use image::{Rgb, RgbImage};

    fn transformer_in(dir: &std::path::Path) -> LineTransformer {
        let config = InlineConfig::builder().base_dir(dir).build().unwrap();
        LineTransformer::new(ImageResolver::new(&config).unwrap(), None)
    }

    #[tokio::test]
    async fn plain_line_passes_through() {
        let dir = tempfile::tempdir().unwrap();
        let t = transformer_in(dir.path());
        assert_eq!(t.transform(b"# Title", 0).await.unwrap(), TransformedLine::Plain);
    }

    #[tokio::test]
    async fn inline_reference_is_skipped_without_resolving() {
        let dir = tempfile::tempdir().unwrap();
        let t = transformer_in(dir.path());
        // Nothing named base64-logo.png exists; a resolve attempt would fail.
        let out = t.transform(b"![x](base64-logo.png)", 0).await.unwrap();
        assert_eq!(
            out,
            TransformedLine::AlreadyInline {
                target: "base64-logo.png"
            }
        );
    }

    #[tokio::test]
    async fn local_reference_is_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        RgbImage::from_pixel(2, 2, Rgb([255, 255, 255]))
            .save(dir.path().join("logo.png"))
            .unwrap();
        let t = transformer_in(dir.path());

        match t.transform(b"See ![logo](logo.png) here", 5).await.unwrap() {
            TransformedLine::Inlined { line, record } => {
                assert_eq!(line, b"See ![logo][img_5] here");
                assert_eq!(record.id(), "img_5");
                assert!(!record.payload().is_empty());
            }
            other => panic!("expected Inlined, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn undecodable_image_aborts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.gif"), b"GIF89a-but-truncated").unwrap();
        let t = transformer_in(dir.path());
        let err = t.transform(b"![bad](bad.gif)", 0).await.unwrap_err();
        assert!(matches!(err, InlineError::DecodeFailed { .. }), "got: {err:?}");
    }

    #[tokio::test]
    async fn parenthesised_file_name_resolves_locally() {
        let dir = tempfile::tempdir().unwrap();
        RgbImage::from_pixel(3, 1, Rgb([0, 128, 0]))
            .save(dir.path().join("chart_(v2).png"))
            .unwrap();
        let t = transformer_in(dir.path());

        match t.transform(b"![c](chart_(v2).png)", 0).await.unwrap() {
            TransformedLine::Inlined { line, .. } => assert_eq!(line, b"![c][img_0]"),
            other => panic!("expected Inlined, got {other:?}"),
        }
    }
}
