//! Cache controller: freshness checks, forced and conditional updates

use super::lock::LockGuard;
use super::store;
use crate::config::{file_uri, Config};
use crate::error::{BasarError, BasarResult};
use crate::index::{merge, BannerIndex};
use crate::source::{FetchResult, Fetcher, MetaCache};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// State of the merged index on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Absent,
    /// Decodes and is younger than the TTL
    Fresh,
    /// Decodes but is at least TTL old
    Stale,
    /// Undecodable, or modified in the future
    Invalid,
}

/// Summary of the merged index, printed by `basar stats`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stats {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Number of banners
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<usize>,
    #[serde(rename = "size", skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Manages the merged banner index and its metadata sidecar
///
/// Writers serialize through the lock file; readers never take the lock and
/// see either the previous or the new index thanks to the atomic rename.
pub struct BannerCache {
    config: Config,
    fetcher: Fetcher,
}

impl BannerCache {
    pub fn new(config: Config) -> BasarResult<Self> {
        Ok(Self::with_fetcher(config, Fetcher::new()?))
    }

    /// Use a preconfigured fetcher (custom timeout)
    pub fn with_fetcher(config: Config, fetcher: Fetcher) -> Self {
        Self { config, fetcher }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Path of the merged index if it exists, fresh or not
    pub fn path(&self) -> Option<&Path> {
        let path = self.config.cache_file.as_path();
        path.exists().then_some(path)
    }

    /// `file://` URI of the merged index if it exists
    pub fn uri(&self) -> Option<String> {
        self.path().map(file_uri)
    }

    /// Classify the merged index on disk
    pub async fn state(&self) -> CacheState {
        let path = &self.config.cache_file;
        let metadata = match fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(_) => return CacheState::Absent,
        };

        let Some(age) = metadata.modified().ok().and_then(age_of) else {
            debug!("{} has no usable mtime", path.display());
            return CacheState::Invalid;
        };

        if let Err(e) = store::read_index(path).await {
            debug!("Cache unreadable: {}", e);
            return CacheState::Invalid;
        }

        if age < self.config.ttl {
            CacheState::Fresh
        } else {
            CacheState::Stale
        }
    }

    /// True when the merged index decodes and is within the TTL
    pub async fn is_valid(&self) -> bool {
        self.state().await == CacheState::Fresh
    }

    /// Describe the merged index; `valid` is false when it is missing or undecodable
    pub async fn stats(&self) -> Stats {
        let path = &self.config.cache_file;
        let Ok(metadata) = fs::metadata(path).await else {
            return Stats::default();
        };
        let Ok(index) = store::read_index(path).await else {
            return Stats::default();
        };

        let mtime = metadata.modified().ok();

        Stats {
            valid: true,
            path: Some(path.clone()),
            entries: Some(index.len()),
            size_bytes: Some(metadata.len()),
            age_seconds: mtime.map(|m| age_of(m).unwrap_or(Duration::ZERO).as_secs()),
            updated_at: mtime.map(DateTime::<Utc>::from),
        }
    }

    /// Remove the merged index; a missing file is not an error
    pub async fn clear(&self) -> BasarResult<()> {
        let path = &self.config.cache_file;
        match fs::remove_file(path).await {
            Ok(()) => {
                info!("Removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BasarError::io(format!("removing {}", path.display()), e)),
        }
    }

    /// Update only when the cache is not fresh
    pub async fn ensure(&self, cancel: &CancellationToken) -> BasarResult<()> {
        if self.is_valid().await {
            return Ok(());
        }
        self.update(false, cancel).await
    }

    /// Fetch every source unconditionally and publish the merge
    ///
    /// Without `force` a fresh cache is left alone. Failed sources are
    /// skipped and keep the validators already in the sidecar.
    pub async fn update(&self, force: bool, cancel: &CancellationToken) -> BasarResult<()> {
        if !force && self.is_valid().await {
            debug!("Cache is fresh, skipping update");
            return Ok(());
        }

        let _lock = LockGuard::acquire(&self.config.lock_file)?;

        let prior = store::read_meta(&self.config.meta_file).await;
        let sources = &self.config.sources;
        let results = self.fetcher.fetch_all(sources, None, cancel).await;

        let mut meta = MetaCache::new();
        let mut documents = Vec::with_capacity(results.len());

        for FetchResult { source, outcome, .. } in results {
            match outcome {
                Ok(outcome) => {
                    info!("source {}: updated", source);
                    if let Some(validators) = outcome.meta {
                        meta.insert(source, validators);
                    }
                    documents.extend(outcome.data);
                }
                Err(e) => {
                    info!("source {}: {}", source, e);
                    if let Some(old) = prior.get(&source) {
                        meta.insert(source, old.clone());
                    }
                }
            }
        }

        if documents.is_empty() {
            return Err(BasarError::AllSourcesFailed {
                attempted: sources.len(),
            });
        }

        let merged = merge(documents.iter().map(Some));
        store::write_index(&self.config.cache_file, &merged).await?;
        self.save_meta(&meta).await;

        info!("Cached {} banners", merged.len());
        Ok(())
    }

    /// Conditionally refresh using the validators in the sidecar
    ///
    /// Returns true when at least one source changed and the index was
    /// rewritten. When nothing changed and the cache is fresh, the index is
    /// not touched. Validators of failed sources carry over unchanged.
    pub async fn smart_update(&self, cancel: &CancellationToken) -> BasarResult<bool> {
        let _lock = LockGuard::acquire(&self.config.lock_file)?;

        let prior = store::read_meta(&self.config.meta_file).await;
        let sources = &self.config.sources;
        let results = self.fetcher.fetch_all(sources, Some(&prior), cancel).await;

        let mut meta = MetaCache::new();
        let mut documents: Vec<BannerIndex> = Vec::with_capacity(results.len());
        let mut any_modified = false;
        let mut current_loaded = false;

        for FetchResult { source, outcome, .. } in results {
            let outcome = match outcome {
                Ok(outcome) => outcome,
                Err(e) => {
                    info!("source {}: {}", source, e);
                    if let Some(old) = prior.get(&source) {
                        meta.insert(source, old.clone());
                    }
                    continue;
                }
            };

            let modified = outcome.modified;
            if let Some(validators) = outcome.meta {
                meta.insert(source.clone(), validators);
            }

            if modified {
                info!("source {}: updated", source);
                if let Some(data) = outcome.data {
                    documents.push(data);
                    any_modified = true;
                }
            } else {
                info!("source {}: not modified", source);
                // The current index already holds every unchanged source
                if !current_loaded {
                    current_loaded = true;
                    match store::read_index(&self.config.cache_file).await {
                        Ok(current) => documents.push(current),
                        Err(e) => debug!("No current index to carry over: {}", e),
                    }
                }
            }
        }

        self.save_meta(&meta).await;

        if !any_modified && self.is_valid().await {
            debug!("No source changed, cache is fresh");
            return Ok(false);
        }

        if documents.is_empty() {
            return Err(BasarError::AllSourcesFailed {
                attempted: sources.len(),
            });
        }

        let merged = merge(documents.iter().map(Some));
        store::write_index(&self.config.cache_file, &merged).await?;

        info!("Cached {} banners", merged.len());
        Ok(any_modified)
    }

    async fn save_meta(&self, meta: &MetaCache) {
        if let Err(e) = store::write_meta(&self.config.meta_file, meta).await {
            warn!("Failed to save source metadata: {}", e);
        }
    }
}

/// Time since `mtime`, `None` if it lies in the future
fn age_of(mtime: SystemTime) -> Option<Duration> {
    SystemTime::now().duration_since(mtime).ok()
}
