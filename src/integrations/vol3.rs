//! Point volatility3 at the local cache via `~/.volatility3.yaml`

use crate::cache::store::FILE_MODE;
use crate::error::{BasarError, BasarResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::info;

/// volatility3 user configuration file, relative to the home directory
pub const VOL3_CONFIG_FILE: &str = ".volatility3.yaml";

/// Key volatility3 reads the banner index location from
pub const REMOTE_ISF_KEY: &str = "remote_isf_url";

pub fn config_path(home: &Path) -> PathBuf {
    home.join(VOL3_CONFIG_FILE)
}

/// Lines added to the volatility3 configuration
pub fn render_entry(uri: &str) -> String {
    format!("# Added by basar\n{}: {}\n", REMOTE_ISF_KEY, uri)
}

/// Add `remote_isf_url: <uri>` to `<home>/.volatility3.yaml`
///
/// Creates the file if needed and appends otherwise. An existing
/// `remote_isf_url` is never rewritten; that fails with
/// [`BasarError::Vol3AlreadyConfigured`].
pub async fn configure_volatility3(home: &Path, uri: &str) -> BasarResult<PathBuf> {
    let path = config_path(home);
    let entry = render_entry(uri);

    match fs::read_to_string(&path).await {
        Ok(existing) => {
            if existing.contains(REMOTE_ISF_KEY) {
                return Err(BasarError::Vol3AlreadyConfigured(path));
            }

            let mut file = OpenOptions::new()
                .append(true)
                .open(&path)
                .await
                .map_err(|e| BasarError::io(format!("opening {}", path.display()), e))?;
            file.write_all(format!("\n{}", entry).as_bytes())
                .await
                .map_err(|e| BasarError::io(format!("writing {}", path.display()), e))?;
            file.flush()
                .await
                .map_err(|e| BasarError::io(format!("writing {}", path.display()), e))?;
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let mut options = OpenOptions::new();
            options.write(true).create_new(true);
            #[cfg(unix)]
            options.mode(FILE_MODE);

            let mut file = options
                .open(&path)
                .await
                .map_err(|e| BasarError::io(format!("creating {}", path.display()), e))?;
            file.write_all(entry.as_bytes())
                .await
                .map_err(|e| BasarError::io(format!("writing {}", path.display()), e))?;
            file.flush()
                .await
                .map_err(|e| BasarError::io(format!("writing {}", path.display()), e))?;
        }
        Err(e) => return Err(BasarError::io(format!("reading {}", path.display()), e)),
    }

    info!("Configured volatility3 in {}", path.display());
    Ok(path)
}
