//! Image resolution: turn a reference target into decoded pixels.
//!
//! A target is tried as a local file first. Only a "not found" error sends it
//! to the network; any other local failure (permissions, a directory, a bad
//! path component) is fatal, because silently fetching a same-named URL would
//! hide a broken document. The format is sniffed from the bytes, never from
//! the target's extension.

use crate::config::InlineConfig;
use crate::error::InlineError;
use image::DynamicImage;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// A URL scheme at the very start of a target (`https://`, `ftp://`, ...).
static RE_SCHEME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://").expect("scheme pattern is valid")
});

/// Resolves reference targets to images. Holds one HTTP client for the run.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    client: reqwest::Client,
    base_dir: Option<PathBuf>,
    timeout_secs: Option<u64>,
}

impl ImageResolver {
    /// Build a resolver from the run configuration.
    pub fn new(config: &InlineConfig) -> Result<Self, InlineError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.download_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| InlineError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_dir: config.base_dir.clone(),
            timeout_secs: config.download_timeout_secs,
        })
    }

    /// Fetch and decode the image named by `target`.
    pub async fn resolve(&self, target: &str) -> Result<DynamicImage, InlineError> {
        let bytes = match self.read_local(target).await? {
            Some(bytes) => bytes,
            None => self.download(target).await?,
        };
        decode(&bytes, target)
    }

    /// Where `target` would live on disk.
    fn local_path(&self, target: &str) -> PathBuf {
        match &self.base_dir {
            // `join` keeps absolute targets as they are.
            Some(dir) => dir.join(target),
            None => PathBuf::from(target),
        }
    }

    /// Read a local image. `Ok(None)` means no such file.
    async fn read_local(&self, target: &str) -> Result<Option<Vec<u8>>, InlineError> {
        let path = self.local_path(target);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                debug!("Read local image: {} ({} bytes)", path.display(), bytes.len());
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(InlineError::ImageRead { path, source }),
        }
    }

    /// Download `target` after normalising it to an absolute URL.
    async fn download(&self, target: &str) -> Result<Vec<u8>, InlineError> {
        let url = normalise_url(target);
        debug!("Fetching image: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.download_error(&url, e))?;

        if !response.status().is_success() {
            return Err(InlineError::DownloadFailed {
                url,
                reason: format!("HTTP {}", response.status()),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.download_error(&url, e))?;

        debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }

    fn download_error(&self, url: &str, e: reqwest::Error) -> InlineError {
        match self.timeout_secs {
            Some(secs) if e.is_timeout() => InlineError::DownloadTimeout {
                url: url.to_string(),
                secs,
            },
            _ => InlineError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            },
        }
    }
}

/// Normalise a non-local target into a fetchable URL.
///
/// One leading `//` (a protocol-relative reference) is stripped, then
/// `http://` is prepended unless the target starts with a scheme. A `://`
/// further in, such as a URL in a query string, does not count.
pub fn normalise_url(target: &str) -> String {
    let t = target.strip_prefix("//").unwrap_or(target);
    if RE_SCHEME.is_match(t) {
        t.to_string()
    } else {
        format!("http://{t}")
    }
}

/// Decode image bytes, detecting PNG, JPEG, GIF or BMP from the content.
fn decode(bytes: &[u8], target: &str) -> Result<DynamicImage, InlineError> {
    image::load_from_memory(bytes).map_err(|source| InlineError::DecodeFailed {
        target: target.to_string(),
        source,
    })
}
