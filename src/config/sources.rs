//! The `sources.conf` source list

use crate::error::{BasarError, BasarResult};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Upstream ISF banner indexes used when no sources are configured
pub const DEFAULT_SOURCES: &[&str] = &[
    "https://raw.githubusercontent.com/Abyss-W4tcher/volatility3-symbols/master/banners/banners.json",
    "https://raw.githubusercontent.com/leludo84/vol3-linux-profiles/main/banners-isf.json",
];

/// Parse source lines, skipping blanks and `#` comments
pub fn parse_sources(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Read sources from `path`, falling back to [`DEFAULT_SOURCES`]
/// when the file is missing or lists nothing
pub fn load_sources(path: &Path) -> Vec<String> {
    let sources = match std::fs::read_to_string(path) {
        Ok(content) => parse_sources(&content),
        Err(e) => {
            debug!("No sources file at {}: {}", path.display(), e);
            Vec::new()
        }
    };

    if sources.is_empty() {
        return default_sources();
    }
    sources
}

fn default_sources() -> Vec<String> {
    DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect()
}

/// Write a commented `sources.conf` listing the default sources
///
/// Fails if the file already exists.
pub async fn init_sources_file(path: &Path) -> BasarResult<()> {
    if path.exists() {
        return Err(BasarError::ConfigExists(path.to_path_buf()));
    }

    if let Some(parent) = path.parent() {
        crate::cache::store::create_dir_all(parent).map_err(|e| {
            BasarError::io(format!("creating config dir {}", parent.display()), e)
        })?;
    }

    let mut content = String::from(
        "# basar sources configuration\n\
         # One URL or local path per line\n\
         # Lines starting with # are comments\n\n",
    );
    for source in DEFAULT_SOURCES {
        content.push_str(source);
        content.push('\n');
    }

    fs::write(path, content)
        .await
        .map_err(|e| BasarError::io(format!("writing {}", path.display()), e))?;

    info!("Created {}", path.display());
    Ok(())
}
