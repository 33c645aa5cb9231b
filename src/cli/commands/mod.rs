//! CLI command implementations
//!
//! Every command returns the process exit code. Errors are printed by `main`
//! and exit with 1; [`EXIT_INVALID`] signals a missing or invalid cache.

pub mod completions;
pub mod init;
pub mod integrate;
pub mod setup;
pub mod show;
pub mod update;

use super::args::Commands;
use crate::cache::BannerCache;
use crate::error::BasarResult;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

/// Exit status when the cache is absent or invalid
pub const EXIT_INVALID: u8 = 2;

/// Run a command against the cache
pub async fn dispatch(
    command: Commands,
    cache: &BannerCache,
    cancel: &CancellationToken,
    verbose: bool,
) -> BasarResult<ExitCode> {
    match command {
        Commands::Uri => show::uri(cache, cancel).await,
        Commands::Path => show::path(cache, cancel).await,
        Commands::Stats => show::stats(cache).await,
        Commands::Check => Ok(show::check(cache).await),
        Commands::Update => update::update(cache, cancel, verbose).await,
        Commands::SmartUpdate => update::smart_update(cache, cancel, verbose).await,
        Commands::Clear => update::clear(cache).await,
        Commands::Init => init::execute(cache.config()).await,
        Commands::Setup => setup::execute(cache, cancel).await,
        Commands::InstallService => integrate::install_service().await,
        Commands::ConfigureVol3 => integrate::configure_vol3(cache).await,
        Commands::Completions(args) => completions::execute(args),
    }
}
