//! Init command - create sources.conf with the default sources

use crate::config::{init_sources_file, Config};
use crate::error::BasarResult;
use std::process::ExitCode;

/// Write the sources file and print its path
pub async fn execute(config: &Config) -> BasarResult<ExitCode> {
    init_sources_file(&config.config_file).await?;
    println!("{}", config.config_file.display());
    Ok(ExitCode::SUCCESS)
}
