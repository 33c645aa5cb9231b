//! Read-side commands: uri, path, stats, check

use super::EXIT_INVALID;
use crate::cache::BannerCache;
use crate::error::BasarResult;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

/// Ensure the cache, then print its `file://` URI
pub async fn uri(cache: &BannerCache, cancel: &CancellationToken) -> BasarResult<ExitCode> {
    cache.ensure(cancel).await?;
    Ok(print_or_invalid(cache.uri()))
}

/// Ensure the cache, then print its path
pub async fn path(cache: &BannerCache, cancel: &CancellationToken) -> BasarResult<ExitCode> {
    cache.ensure(cancel).await?;
    Ok(print_or_invalid(
        cache.path().map(|p| p.display().to_string()),
    ))
}

/// Print [`crate::cache::Stats`] as pretty JSON
pub async fn stats(cache: &BannerCache) -> BasarResult<ExitCode> {
    let stats = cache.stats().await;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(ExitCode::SUCCESS)
}

/// Exit 0 when the cache is fresh and decodable
pub async fn check(cache: &BannerCache) -> ExitCode {
    if cache.is_valid().await {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_INVALID)
    }
}

fn print_or_invalid(line: Option<String>) -> ExitCode {
    match line {
        Some(line) => {
            println!("{}", line);
            ExitCode::SUCCESS
        }
        None => ExitCode::from(EXIT_INVALID),
    }
}
