//! ISF banner index document and merging
//!
//! The index maps a kernel banner to the URLs of ISF symbol files that
//! match it. This is the format volatility3 reads through `-u`/`remote_isf_url`.

mod merge;

pub use merge::merge;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Format version written to every merged index
pub const INDEX_VERSION: u32 = 1;

/// Banner index document (`{"version": 1, "linux": {banner: [url, ...]}}`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerIndex {
    /// Document format version
    #[serde(default)]
    pub version: u32,

    /// Kernel banner to symbol-file URLs
    #[serde(default)]
    pub linux: BTreeMap<String, Vec<String>>,
}

impl BannerIndex {
    /// Create an empty index at the current format version
    pub fn new() -> Self {
        Self {
            version: INDEX_VERSION,
            linux: BTreeMap::new(),
        }
    }

    /// Number of distinct banners
    pub fn len(&self) -> usize {
        self.linux.len()
    }

    pub fn is_empty(&self) -> bool {
        self.linux.is_empty()
    }

    /// URLs recorded for a banner
    pub fn urls(&self, banner: &str) -> Option<&[String]> {
        self.linux.get(banner).map(Vec::as_slice)
    }

    /// Append `urls` to `banner`, skipping any URL already present
    pub fn insert_urls<'a>(&mut self, banner: &str, urls: impl IntoIterator<Item = &'a String>) {
        let existing = self.linux.entry(banner.to_string()).or_default();
        let mut seen: HashSet<String> = existing.iter().cloned().collect();

        for url in urls {
            if seen.insert(url.clone()) {
                existing.push(url.clone());
            }
        }
    }

    /// Decode an index from JSON bytes
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Encode as compact JSON followed by a newline
    ///
    /// serde_json leaves `<`, `>` and `&` unescaped, so URLs are written verbatim.
    pub fn to_json_bytes(&self) -> serde_json::Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec(self)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}
