//! Concurrent fetching of all configured sources

use super::fetcher::{FetchOutcome, Fetcher};
use super::meta::MetaCache;
use crate::error::{BasarError, BasarResult};
use futures_util::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Outcome for one source, at the same position as the source in the input
#[derive(Debug)]
pub struct FetchResult {
    /// Position of the source in the input list
    pub index: usize,
    /// The source string as configured
    pub source: String,
    /// Fetched data or the error that stopped this source
    pub outcome: BasarResult<FetchOutcome>,
}

impl FetchResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

impl Fetcher {
    /// Fetch every source concurrently, one task per source
    ///
    /// `result[i]` always belongs to `sources[i]`. Prior validators are taken
    /// from `meta` when given. Returns once every task has finished.
    pub async fn fetch_all(
        &self,
        sources: &[String],
        meta: Option<&MetaCache>,
        cancel: &CancellationToken,
    ) -> Vec<FetchResult> {
        if sources.is_empty() {
            return Vec::new();
        }

        debug!("Fetching {} sources", sources.len());

        let handles: Vec<_> = sources
            .iter()
            .map(|source| {
                let fetcher = self.clone();
                let source = source.clone();
                let prior = meta.and_then(|m| m.get(&source)).cloned();
                let cancel = cancel.clone();

                tokio::spawn(async move { fetcher.fetch(&source, prior.as_ref(), &cancel).await })
            })
            .collect();

        join_all(handles)
            .await
            .into_iter()
            .zip(sources)
            .enumerate()
            .map(|(index, (joined, source))| FetchResult {
                index,
                source: source.clone(),
                outcome: joined.unwrap_or_else(|e| {
                    Err(BasarError::Internal(format!("fetch task for {} failed: {}", source, e)))
                }),
            })
            .collect()
    }
}
