//! CLI binary for mdinline.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `InlineConfig` and reports results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use mdinline::{inline_file, InlineConfig, InlineProgressCallback, InlineStats, ProgressCallback};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a spinner naming the image being fetched,
/// plus one log line per inlined or skipped reference.
struct CliProgressCallback {
    bar: ProgressBar,
    inlined: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Inlining");
        bar.set_message("Reading document…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            inlined: AtomicUsize::new(0),
        })
    }
}

impl InlineProgressCallback for CliProgressCallback {
    fn on_image_start(&self, id: &str, target: &str) {
        self.bar.set_message(format!("{id}  {}", dim(target)));
    }

    fn on_image_complete(&self, id: &str, target: &str, payload_len: usize) {
        self.inlined.fetch_add(1, Ordering::SeqCst);
        self.bar.println(format!(
            "  {} {:<8} {}  {}",
            green("✓"),
            id,
            target,
            dim(&format!("{payload_len} bytes")),
        ));
    }

    fn on_image_skipped(&self, line_no: usize, _target: &str) {
        self.bar.println(format!(
            "  {} line {:<5} {}",
            dim("·"),
            line_no,
            dim("already embedded, skipped"),
        ));
    }

    fn on_document_complete(&self, _stats: &InlineStats) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} images inlined",
            green("✔"),
            bold(&self.inlined.load(Ordering::SeqCst).to_string())
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Write README.md.tmp with every image embedded
  mdinline -m README.md

  # Rewrite the document in place
  mdinline -m README.md -i

  # Resolve relative image paths against the document's folder
  mdinline -m docs/guide.md --base-dir docs

  # Machine-readable run summary
  mdinline -m README.md --json

TARGETS:
  Local paths are tried first. A target that is not a local file is fetched
  over HTTP; a leading `//` is dropped and `http://` is added when no scheme
  is given. PNG, JPEG, GIF and BMP are accepted; everything is embedded as PNG.
  Targets containing `base64` or `:data:image/` are left untouched.

ENVIRONMENT VARIABLES:
  RUST_LOG                Override the log filter (e.g. mdinline=debug)
"#;

/// Embed the images a Markdown document references.
#[derive(Parser, Debug)]
#[command(
    name = "mdinline",
    version,
    about = "Embed the images a Markdown document references as base64 data declarations",
    long_about = "Rewrite every `![alt](path-or-url)` image reference in a Markdown document \
to `![alt][img_N]` and append the image as a `[img_N]:data:image/png;base64,…` declaration, \
producing a single self-contained document.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// The Markdown document to process.
    #[arg(short = 'm', long = "markdown", env = "MDINLINE_MARKDOWN")]
    markdown: PathBuf,

    /// Replace the document with the output after a successful run.
    #[arg(short, long, env = "MDINLINE_INPLACE")]
    inplace: bool,

    /// Suffix appended to the document path to name the output file.
    #[arg(long, env = "MDINLINE_SUFFIX", default_value = mdinline::config::DEFAULT_OUTPUT_SUFFIX)]
    suffix: String,

    /// Directory relative image paths are resolved against (default: working directory).
    #[arg(long, env = "MDINLINE_BASE_DIR")]
    base_dir: Option<PathBuf>,

    /// HTTP download timeout per image in seconds (default: none).
    #[arg(long, env = "MDINLINE_TIMEOUT",
          value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Print the run summary as JSON on stdout.
    #[arg(long, env = "MDINLINE_JSON")]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "MDINLINE_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MDINLINE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MDINLINE_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner gives all the feedback that matters; INFO logs would
    // only interleave with it.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn InlineProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run ──────────────────────────────────────────────────────────────
    let stats = inline_file(&cli.markdown, &config)
        .await
        .with_context(|| format!("Failed to inline images in {}", cli.markdown.display()))?;

    if cli.json {
        let json = serde_json::to_string_pretty(&stats).context("Failed to serialise summary")?;
        println!("{json}");
    } else if !cli.quiet {
        let dest = stats
            .output_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        eprintln!(
            "{}  {} inlined, {} skipped  {}ms  →  {}",
            cyan("◆"),
            stats.images_inlined,
            stats.images_skipped,
            stats.duration_ms,
            bold(&dest),
        );
    }

    Ok(())
}

/// Map CLI args to `InlineConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<InlineConfig> {
    let mut builder = InlineConfig::builder()
        .inplace(cli.inplace)
        .output_suffix(cli.suffix.as_str());

    if let Some(ref dir) = cli.base_dir {
        builder = builder.base_dir(dir);
    }
    if let Some(secs) = cli.timeout {
        builder = builder.download_timeout_secs(secs);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
