//! Integrations with the rest of the system: volatility3 and systemd

pub mod systemd;
pub mod vol3;

pub use systemd::install_service;
pub use vol3::configure_volatility3;

use crate::error::{BasarError, BasarResult};
use std::path::PathBuf;

/// Home directory of the invoking user
pub fn home_dir() -> BasarResult<PathBuf> {
    dirs::home_dir().ok_or(BasarError::HomeDirUnavailable)
}
