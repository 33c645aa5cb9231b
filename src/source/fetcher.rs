//! Fetching banner indexes from local files and HTTP(S) URLs

use super::kind::SourceKind;
use super::meta::SourceMeta;
use crate::error::{BasarError, BasarResult};
use crate::index::BannerIndex;
use reqwest::header::{HeaderName, ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use reqwest::StatusCode;
use std::io;
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Default timeout for a single HTTP request
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Identifies this tool in HTTP requests
pub const USER_AGENT: &str = "basar/1.0";

/// Upper bound on a response body (the upstream indexes are a few MB)
const MAX_BODY_BYTES: u64 = 256 * 1024 * 1024;

/// Result of fetching one source
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// Decoded index, absent when the server answered 304
    pub data: Option<BannerIndex>,
    /// Validators to record for the source
    pub meta: Option<SourceMeta>,
    /// False only for `304 Not Modified`
    pub modified: bool,
}

impl FetchOutcome {
    fn modified(data: BannerIndex, meta: SourceMeta) -> Self {
        Self {
            data: Some(data),
            meta: Some(meta),
            modified: true,
        }
    }

    fn not_modified(prior: Option<SourceMeta>) -> Self {
        Self {
            data: None,
            meta: prior,
            modified: false,
        }
    }
}

/// Fetches banner indexes from sources
///
/// Cloning is cheap; clones share the HTTP connection pool.
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    /// Create a fetcher with the default request timeout
    pub fn new() -> BasarResult<Self> {
        Self::with_timeout(HTTP_TIMEOUT)
    }

    /// Create a fetcher with a custom request timeout
    pub fn with_timeout(timeout: Duration) -> BasarResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| BasarError::Internal(format!("building HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Fetch one source, sending `prior` validators as conditional headers
    ///
    /// Local files never report "not modified". A cancelled token fails the
    /// fetch with [`BasarError::Cancelled`] and drops the request, closing
    /// its connection.
    pub async fn fetch(
        &self,
        source: &str,
        prior: Option<&SourceMeta>,
        cancel: &CancellationToken,
    ) -> BasarResult<FetchOutcome> {
        if cancel.is_cancelled() {
            return Err(BasarError::Cancelled);
        }

        match SourceKind::resolve(source)? {
            SourceKind::Local(path) => fetch_local(&path).await,
            SourceKind::Remote(url) => {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Err(BasarError::Cancelled),
                    outcome = self.get(&url, prior) => outcome,
                }
            }
        }
    }

    /// Conditional GET of a remote banner index
    async fn get(&self, url: &str, prior: Option<&SourceMeta>) -> BasarResult<FetchOutcome> {
        let http_err = |source| BasarError::Http {
            url: url.to_string(),
            source,
        };

        let mut request = self.client.get(url);
        if let Some(meta) = prior {
            if let Some(etag) = meta.etag.as_deref() {
                request = request.header(IF_NONE_MATCH, etag);
            }
            if let Some(last_modified) = meta.last_modified.as_deref() {
                request = request.header(IF_MODIFIED_SINCE, last_modified);
            }
        }

        let mut response = request.send().await.map_err(http_err)?;

        let status = response.status();
        debug!("GET {} -> {}", url, status.as_u16());

        if status == StatusCode::NOT_MODIFIED {
            return Ok(FetchOutcome::not_modified(prior.cloned()));
        }
        if status != StatusCode::OK {
            return Err(BasarError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let header = |name: HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let meta = SourceMeta::from_validators(header(ETAG), header(LAST_MODIFIED));

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(http_err)? {
            if body.len() as u64 + chunk.len() as u64 > MAX_BODY_BYTES {
                return Err(BasarError::io(
                    format!("reading {}", url),
                    io::Error::other(format!("response exceeds {} bytes", MAX_BODY_BYTES)),
                ));
            }
            body.extend_from_slice(&chunk);
        }

        let data = BannerIndex::from_slice(&body).map_err(|e| BasarError::decode(url, e))?;

        Ok(FetchOutcome::modified(data, meta))
    }
}

/// Read and decode a local banner file
async fn fetch_local(path: &Path) -> BasarResult<FetchOutcome> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| BasarError::io(format!("opening {}", path.display()), e))?;

    let data = BannerIndex::from_slice(&bytes)
        .map_err(|e| BasarError::decode(path.display().to_string(), e))?;

    debug!("Read {} banners from {}", data.len(), path.display());
    Ok(FetchOutcome::modified(data, SourceMeta::fetched_now()))
}
