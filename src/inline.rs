//! Document assembly: drive the line transformer over a whole document.
//!
//! A run moves through four stages:
//!
//! 1. **Reading**   — each input line is transformed and written immediately,
//!    in order; resolved images are collected as [`InlineRecord`]s
//! 2. **Appending** — if anything was inlined, blank separator lines and one
//!    declaration per record, in collection order
//! 3. **Flushing**  — the buffered output is flushed and closed
//! 4. **Replacing** — in-place runs move the output over the original
//!
//! Any error aborts the run where it happens. A partially written output file
//! is left behind in that case, and the original document is never replaced.

use crate::config::InlineConfig;
use crate::error::InlineError;
use crate::output::{InlineRecord, InlineStats, APPENDIX_SEPARATOR};
use crate::pipeline::resolve::ImageResolver;
use crate::pipeline::transform::{LineTransformer, TransformedLine};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tracing::{debug, info};

/// Inline every image referenced by `reader`'s document into `writer`.
///
/// This is the stream-level entry point: the caller owns both ends. Lines are
/// written as they are processed, so `writer` should be buffered. It is
/// flushed before returning.
///
/// # Errors
/// Returns the first failure from reading, resolving, encoding or writing.
pub async fn inline_document<R, W>(
    reader: R,
    writer: &mut W,
    config: &InlineConfig,
) -> Result<InlineStats, InlineError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let stats = run(reader, writer, config).await?;
    if let Some(ref cb) = config.progress_callback {
        cb.on_document_complete(&stats);
    }
    Ok(stats)
}

/// Inline images in a Markdown string held in memory.
///
/// # Example
/// ```rust,no_run
/// use mdinline::{inline_str, InlineConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let md = "# Notes\n![diagram](diagram.png)\n";
/// let out = inline_str(md, &InlineConfig::default()).await?;
/// assert!(out.contains("![diagram][img_0]"));
/// # Ok(())
/// # }
/// ```
pub async fn inline_str(input: &str, config: &InlineConfig) -> Result<String, InlineError> {
    let mut out: Vec<u8> = Vec::with_capacity(input.len());
    inline_document(input.as_bytes(), &mut out, config).await?;
    String::from_utf8(out).map_err(|e| InlineError::Internal(format!("Output is not UTF-8: {e}")))
}

/// Inline images in the document at `path`.
///
/// The result is written to `<path><output_suffix>` (`doc.md.tmp` by
/// default). With [`InlineConfig::inplace`] set, that file is then renamed
/// over `path`.
///
/// # Errors
/// Returns `Err(InlineError::Usage)` for an empty path, otherwise the first
/// failure of the run. On error the original document is untouched.
pub async fn inline_file(
    path: impl AsRef<Path>,
    config: &InlineConfig,
) -> Result<InlineStats, InlineError> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(InlineError::Usage(
            "the Markdown document path must be provided".into(),
        ));
    }

    let output_path = output_path_for(path, &config.output_suffix);
    info!(
        "Inlining images: {} → {}",
        path.display(),
        output_path.display()
    );

    let input = tokio::fs::File::open(path)
        .await
        .map_err(|source| InlineError::InputOpen {
            path: path.to_path_buf(),
            source,
        })?;

    let output = tokio::fs::File::create(&output_path)
        .await
        .map_err(|source| InlineError::OutputCreate {
            path: output_path.clone(),
            source,
        })?;

    let mut writer = BufWriter::new(output);
    let mut stats = run(BufReader::new(input), &mut writer, config).await?;
    writer
        .shutdown()
        .await
        .map_err(|source| InlineError::WriteFailed { source })?;
    drop(writer);

    // ── Replacing ────────────────────────────────────────────────────────
    if config.inplace {
        tokio::fs::rename(&output_path, path)
            .await
            .map_err(|source| InlineError::ReplaceFailed {
                from: output_path.clone(),
                to: path.to_path_buf(),
                source,
            })?;
        debug!("Replaced {}", path.display());
        stats.replaced = true;
        stats.output_path = Some(path.to_path_buf());
    } else {
        stats.output_path = Some(output_path);
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_document_complete(&stats);
    }
    Ok(stats)
}

/// Synchronous wrapper around [`inline_file`].
///
/// Creates a temporary tokio runtime internally.
pub fn inline_file_sync(
    path: impl AsRef<Path>,
    config: &InlineConfig,
) -> Result<InlineStats, InlineError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| InlineError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(inline_file(path, config))
}

/// The output path for `path`: the suffix is appended to the full file name,
/// so `notes.md` becomes `notes.md.tmp`.
pub fn output_path_for(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Reading, Appending and Flushing. Replacing belongs to [`inline_file`].
async fn run<R, W>(mut reader: R, writer: &mut W, config: &InlineConfig) -> Result<InlineStats, InlineError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let start = Instant::now();
    let transformer = LineTransformer::new(
        ImageResolver::new(config)?,
        config.progress_callback.clone(),
    );
    let mut records: Vec<InlineRecord> = Vec::new();
    let mut stats = InlineStats::default();
    let mut buf: Vec<u8> = Vec::new();

    // ── Reading ──────────────────────────────────────────────────────────
    // Lines are raw bytes: text that is not UTF-8 passes through untouched.
    loop {
        let line_no = stats.lines + 1;
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .await
            .map_err(|source| InlineError::InputRead {
                line: line_no,
                source,
            })?;
        if n == 0 {
            break;
        }
        stats.lines = line_no;
        let line = trim_line_ending(&buf);

        match transformer.transform(line, records.len()).await? {
            TransformedLine::Plain => write_line(writer, line).await?,
            TransformedLine::AlreadyInline { target } => {
                debug!("Line {}: skipping embedded image", line_no);
                stats.images_skipped += 1;
                if let Some(ref cb) = config.progress_callback {
                    cb.on_image_skipped(line_no, target);
                }
                write_line(writer, line).await?;
            }
            TransformedLine::Inlined {
                line: rewritten,
                record,
            } => {
                write_line(writer, &rewritten).await?;
                records.push(record);
            }
        }
    }

    // ── Appending ────────────────────────────────────────────────────────
    if !records.is_empty() {
        write_str(writer, APPENDIX_SEPARATOR).await?;
        for record in &records {
            write_str(writer, &record.declaration()).await?;
            stats.payload_bytes += record.payload().len();
        }
    }
    stats.images_inlined = records.len();

    // ── Flushing ─────────────────────────────────────────────────────────
    writer
        .flush()
        .await
        .map_err(|source| InlineError::WriteFailed { source })?;

    stats.duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "Inlining complete: {} lines, {} images inlined, {} skipped, {}ms",
        stats.lines, stats.images_inlined, stats.images_skipped, stats.duration_ms
    );
    Ok(stats)
}

/// Strip a trailing `\n` or `\r\n`.
fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &[u8]) -> Result<(), InlineError> {
    write_bytes(writer, line).await?;
    write_bytes(writer, b"\n").await
}

async fn write_str<W: AsyncWrite + Unpin>(writer: &mut W, s: &str) -> Result<(), InlineError> {
    write_bytes(writer, s.as_bytes()).await
}

async fn write_bytes<W: AsyncWrite + Unpin>(writer: &mut W, bytes: &[u8]) -> Result<(), InlineError> {
    writer
        .write_all(bytes)
        .await
        .map_err(|source| InlineError::WriteFailed { source })
}
