//! On-disk persistence for the banner index and metadata sidecar
//!
//! Writes go to `<path>.tmp`, are fsynced, then renamed over `<path>`. The
//! rename is the commit point: a reader sees the old file or the new one,
//! never a partial write.

use crate::error::{BasarError, BasarResult};
use crate::index::BannerIndex;
use crate::source::MetaCache;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Mode for created files
pub const FILE_MODE: u32 = 0o644;

/// Mode for created directories
pub const DIR_MODE: u32 = 0o755;

/// Create a directory and its parents with [`DIR_MODE`]
pub(crate) fn create_dir_all(path: &Path) -> io::Result<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder.create(path)
}

/// Sibling temporary path used while writing `path`
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Atomically replace `path` with the compact JSON encoding of `index`
pub async fn write_index(path: &Path, index: &BannerIndex) -> BasarResult<()> {
    let bytes = index.to_json_bytes()?;
    write_atomic(path, &bytes).await?;
    debug!("Wrote {} banners to {}", index.len(), path.display());
    Ok(())
}

/// Atomically replace `path` with the pretty-printed sidecar
pub async fn write_meta(path: &Path, meta: &MetaCache) -> BasarResult<()> {
    let mut bytes = serde_json::to_vec_pretty(meta)?;
    bytes.push(b'\n');
    write_atomic(path, &bytes).await
}

/// Read and decode the banner index at `path`
pub async fn read_index(path: &Path) -> BasarResult<BannerIndex> {
    let bytes = fs::read(path)
        .await
        .map_err(|e| BasarError::io(format!("reading {}", path.display()), e))?;

    BannerIndex::from_slice(&bytes).map_err(|e| BasarError::decode(path.display().to_string(), e))
}

/// Read the sidecar, treating a missing or unreadable file as empty
pub async fn read_meta(path: &Path) -> MetaCache {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return MetaCache::new(),
        Err(e) => {
            warn!("Ignoring unreadable metadata {}: {}", path.display(), e);
            return MetaCache::new();
        }
    };

    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        warn!("Ignoring corrupt metadata {}: {}", path.display(), e);
        MetaCache::new()
    })
}

/// Write `bytes` to a temp sibling, fsync, and rename over `path`
///
/// The temp file is removed on any failure before the rename completes.
async fn write_atomic(path: &Path, bytes: &[u8]) -> BasarResult<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent).map_err(|e| {
            BasarError::persist(format!("creating directory {}", parent.display()), e)
        })?;
    }

    let tmp = temp_path(path);
    let result = write_then_rename(&tmp, path, bytes).await;

    if result.is_err() {
        if let Err(e) = fs::remove_file(&tmp).await {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("Failed to remove {}: {}", tmp.display(), e);
            }
        }
    }

    result
}

async fn write_then_rename(tmp: &Path, path: &Path, bytes: &[u8]) -> BasarResult<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(FILE_MODE);

    let mut file = options
        .open(tmp)
        .await
        .map_err(|e| BasarError::persist(format!("creating {}", tmp.display()), e))?;

    file.write_all(bytes)
        .await
        .map_err(|e| BasarError::persist(format!("writing {}", tmp.display()), e))?;
    file.flush()
        .await
        .map_err(|e| BasarError::persist(format!("writing {}", tmp.display()), e))?;
    file.sync_all()
        .await
        .map_err(|e| BasarError::persist(format!("syncing {}", tmp.display()), e))?;
    drop(file);

    fs::rename(tmp, path).await.map_err(|e| {
        BasarError::persist(format!("renaming {} to {}", tmp.display(), path.display()), e)
    })
}
