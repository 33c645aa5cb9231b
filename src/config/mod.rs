//! Configuration and path resolution for Basar
//!
//! Paths follow the XDG base directory layout:
//!
//! | File | Location |
//! |------|----------|
//! | merged index | `$XDG_CACHE_HOME/basar/banners.json` |
//! | source metadata | `$XDG_CACHE_HOME/basar/meta.json` |
//! | lock | `$XDG_CACHE_HOME/basar/.lock` |
//! | sources | `$XDG_CONFIG_HOME/basar/sources.conf` |

pub mod sources;

pub use sources::{init_sources_file, load_sources, parse_sources, DEFAULT_SOURCES};

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Directory name used under the XDG base directories
pub const APP_NAME: &str = "basar";

/// Default cache validity
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Environment variable holding the TTL in seconds
pub const TTL_ENV: &str = "BASAR_TTL";

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub cache_dir: PathBuf,
    pub config_dir: PathBuf,
    /// Merged banner index
    pub cache_file: PathBuf,
    /// Per-source validator sidecar
    pub meta_file: PathBuf,
    pub lock_file: PathBuf,
    /// Source list, one per line
    pub config_file: PathBuf,
    /// How long the merged index stays fresh
    pub ttl: Duration,
    pub sources: Vec<String>,
}

impl Config {
    /// Load configuration from the environment
    ///
    /// Explicit directories win over the XDG locations. The TTL comes from
    /// `BASAR_TTL` and sources from `sources.conf` (built-in defaults otherwise).
    pub fn load(cache_dir: Option<PathBuf>, config_dir: Option<PathBuf>) -> Self {
        let cache_dir =
            cache_dir.unwrap_or_else(|| xdg_dir("XDG_CACHE_HOME", ".cache").join(APP_NAME));
        let config_dir =
            config_dir.unwrap_or_else(|| xdg_dir("XDG_CONFIG_HOME", ".config").join(APP_NAME));
        let ttl = parse_ttl(std::env::var(TTL_ENV).ok().as_deref());

        Self::for_dirs(cache_dir, config_dir).with_ttl(ttl)
    }

    /// Build a configuration rooted at explicit directories with the default TTL
    pub fn for_dirs(cache_dir: impl Into<PathBuf>, config_dir: impl Into<PathBuf>) -> Self {
        let cache_dir = cache_dir.into();
        let config_dir = config_dir.into();
        let config_file = config_dir.join("sources.conf");
        let sources = load_sources(&config_file);

        debug!(
            "Cache dir {}, {} sources configured",
            cache_dir.display(),
            sources.len()
        );

        Self {
            cache_file: cache_dir.join("banners.json"),
            meta_file: cache_dir.join("meta.json"),
            lock_file: cache_dir.join(".lock"),
            config_file,
            cache_dir,
            config_dir,
            ttl: DEFAULT_TTL,
            sources,
        }
    }

    /// Replace the TTL
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Replace the source list
    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    /// `file://` URI of the merged index, whether or not it exists yet
    pub fn cache_uri(&self) -> String {
        file_uri(&self.cache_file)
    }
}

/// Format a path as a `file://` URI
pub fn file_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// Parse a TTL in whole seconds; empty, zero, negative, or invalid values give the default
pub fn parse_ttl(value: Option<&str>) -> Duration {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|secs| *secs > 0)
        .map(|secs| Duration::from_secs(secs as u64))
        .unwrap_or(DEFAULT_TTL)
}

fn xdg_dir(var: &str, fallback: &str) -> PathBuf {
    resolve_xdg_dir(std::env::var_os(var), dirs::home_dir(), fallback)
}

/// XDG base directory from its variable's value, else `<home>/<fallback>`
fn resolve_xdg_dir(value: Option<OsString>, home: Option<PathBuf>, fallback: &str) -> PathBuf {
    match value {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => home.unwrap_or_else(|| PathBuf::from("/")).join(fallback),
    }
}
