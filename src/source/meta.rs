//! Per-source validator metadata (the `meta.json` sidecar)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Validators last observed for one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMeta {
    /// Entity tag from the `ETag` response header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    /// Value of the `Last-Modified` response header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,

    /// When this source was last fetched successfully
    pub updated_at: DateTime<Utc>,
}

impl SourceMeta {
    /// Metadata carrying only the fetch time (local sources, validator-less responses)
    pub fn fetched_now() -> Self {
        Self {
            etag: None,
            last_modified: None,
            updated_at: Utc::now(),
        }
    }

    /// Metadata from response validators, dropping empty header values
    pub fn from_validators(etag: Option<String>, last_modified: Option<String>) -> Self {
        Self {
            etag: etag.filter(|v| !v.is_empty()),
            last_modified: last_modified.filter(|v| !v.is_empty()),
            updated_at: Utc::now(),
        }
    }

    /// Whether a conditional request can be made from this record
    pub fn has_validators(&self) -> bool {
        self.etag.is_some() || self.last_modified.is_some()
    }
}

/// Validator records for all sources, keyed by source string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaCache {
    #[serde(default)]
    pub sources: BTreeMap<String, SourceMeta>,
}

impl MetaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, source: &str) -> Option<&SourceMeta> {
        self.sources.get(source)
    }

    pub fn insert(&mut self, source: impl Into<String>, meta: SourceMeta) {
        self.sources.insert(source.into(), meta);
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
