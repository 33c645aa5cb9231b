//! Write-side commands: update, smart-update, clear

use crate::cache::BannerCache;
use crate::error::BasarResult;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

/// Force a full update from every source
pub async fn update(
    cache: &BannerCache,
    cancel: &CancellationToken,
    verbose: bool,
) -> BasarResult<ExitCode> {
    if verbose {
        eprintln!("updating from {} sources", cache.config().sources.len());
    }

    cache.update(true, cancel).await?;

    if verbose {
        eprintln!("cached {} banners", entries(cache).await);
    }
    Ok(ExitCode::SUCCESS)
}

/// Conditional update using stored validators
pub async fn smart_update(
    cache: &BannerCache,
    cancel: &CancellationToken,
    verbose: bool,
) -> BasarResult<ExitCode> {
    if verbose {
        eprintln!(
            "checking {} sources for updates",
            cache.config().sources.len()
        );
    }

    let updated = cache.smart_update(cancel).await?;

    if verbose {
        if updated {
            eprintln!("updated: {} banners cached", entries(cache).await);
        } else {
            eprintln!("no changes");
        }
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn clear(cache: &BannerCache) -> BasarResult<ExitCode> {
    cache.clear().await?;
    Ok(ExitCode::SUCCESS)
}

async fn entries(cache: &BannerCache) -> usize {
    cache.stats().await.entries.unwrap_or(0)
}
