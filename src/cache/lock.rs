//! Cross-process lock over the cache directory
//!
//! The lock is a plain file holding the holder's PID. Staleness is judged by
//! the file's mtime, not its contents, so a crashed holder is overridden once
//! the lock is older than [`LOCK_STALE_AFTER`]. The lock is not reentrant.

use super::store::create_dir_all;
use crate::error::{BasarError, BasarResult};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

/// Age at which an existing lock file is considered abandoned
pub const LOCK_STALE_AFTER: Duration = Duration::from_secs(5 * 60);

/// Held cache lock, released on drop
#[derive(Debug)]
pub struct LockGuard {
    path: PathBuf,
    released: bool,
}

impl LockGuard {
    /// Acquire the lock at `path` with the default staleness threshold
    pub fn acquire(path: &Path) -> BasarResult<Self> {
        Self::acquire_with(path, LOCK_STALE_AFTER)
    }

    /// Acquire the lock, overriding an existing lock at least `stale_after` old
    pub fn acquire_with(path: &Path, stale_after: Duration) -> BasarResult<Self> {
        if let Some(parent) = path.parent() {
            create_dir_all(parent)
                .map_err(|e| BasarError::io(format!("creating cache dir {}", parent.display()), e))?;
        }

        match fs::metadata(path) {
            Ok(metadata) => {
                let age = metadata
                    .modified()
                    .ok()
                    .and_then(|mtime| SystemTime::now().duration_since(mtime).ok())
                    .unwrap_or(Duration::ZERO);

                if age < stale_after {
                    debug!("Lock {} held ({}s old)", path.display(), age.as_secs());
                    return Err(BasarError::Locked {
                        path: path.to_path_buf(),
                    });
                }

                warn!(
                    "Overriding stale lock {} ({}s old)",
                    path.display(),
                    age.as_secs()
                );
                if let Err(e) = fs::remove_file(path) {
                    if e.kind() != ErrorKind::NotFound {
                        return Err(BasarError::io("removing stale lock", e));
                    }
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(BasarError::io("checking lock", e)),
        }

        // create_new closes the gap between the check above and the write
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(super::store::FILE_MODE);
        }

        let mut file = match options.open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(BasarError::Locked {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => return Err(BasarError::io("creating lock", e)),
        };

        let guard = Self {
            path: path.to_path_buf(),
            released: false,
        };

        file.write_all(std::process::id().to_string().as_bytes())
            .map_err(|e| BasarError::io("writing lock", e))?;

        debug!("Acquired lock {}", path.display());
        Ok(guard)
    }

    /// Remove the lock file; calling this more than once is a no-op
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Released lock {}", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove lock {}: {}", self.path.display(), e),
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        self.release();
    }
}
