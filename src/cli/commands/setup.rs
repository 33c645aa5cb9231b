//! Setup command - first-run configuration
//!
//! Steps run in order: sources config, initial update, volatility3, systemd
//! timer. Only the first two are fatal; later steps report a warning and
//! setup carries on.

use super::integrate::volatility3_uri;
use crate::cache::BannerCache;
use crate::config::init_sources_file;
use crate::error::{BasarError, BasarResult};
use crate::integrations::{self, configure_volatility3, install_service};
use crate::ui::{self, TaskSpinner, UiContext};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

/// Setup step result for the final summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepResult {
    /// Already configured or completed
    Done,
    /// Not applicable on this platform
    Skipped,
    /// Failed without aborting setup
    Warned,
}

/// Execute the setup command
pub async fn execute(cache: &BannerCache, cancel: &CancellationToken) -> BasarResult<ExitCode> {
    let ctx = UiContext::detect();
    ui::intro(&ctx, "basar setup");

    init_config(&ctx, cache).await?;
    initial_update(&ctx, cache, cancel).await?;

    let home = integrations::home_dir();
    let results = [
        configure_vol3_step(&ctx, cache, &home).await,
        timer_step(&ctx, &home).await,
    ];

    let warnings = results
        .iter()
        .filter(|r| **r == StepResult::Warned)
        .count();

    if warnings == 0 {
        ui::outro_success(&ctx, "Setup complete");
    } else {
        ui::outro_warn(
            &ctx,
            &format!("Setup complete with {} warning(s)", warnings),
        );
    }
    Ok(ExitCode::SUCCESS)
}

async fn init_config(ctx: &UiContext, cache: &BannerCache) -> BasarResult<()> {
    let path = &cache.config().config_file;
    let display = path.display().to_string();

    if path.exists() {
        ui::step_ok_detail(ctx, "Using existing sources config", &display);
        return Ok(());
    }

    init_sources_file(path).await?;
    ui::step_ok_detail(ctx, "Created sources config", &display);
    Ok(())
}

async fn initial_update(
    ctx: &UiContext,
    cache: &BannerCache,
    cancel: &CancellationToken,
) -> BasarResult<()> {
    let mut spinner = TaskSpinner::new(ctx);
    spinner.start(&format!(
        "Updating cache from {} sources...",
        cache.config().sources.len()
    ));

    match cache.update(true, cancel).await {
        Ok(()) => {
            let entries = cache.stats().await.entries.unwrap_or(0);
            spinner.stop(&format!("Cached {} banners", entries));
            Ok(())
        }
        Err(e) => {
            spinner.stop_error("Cache update failed");
            Err(e)
        }
    }
}

async fn configure_vol3_step(
    ctx: &UiContext,
    cache: &BannerCache,
    home: &BasarResult<PathBuf>,
) -> StepResult {
    let result = match home {
        Ok(home) => configure_volatility3(home, &volatility3_uri(cache)).await,
        Err(_) => Err(BasarError::HomeDirUnavailable),
    };

    match result {
        Ok(path) => {
            ui::step_ok_detail(ctx, "Configured volatility3", &path.display().to_string());
            StepResult::Done
        }
        Err(BasarError::Vol3AlreadyConfigured(path)) => {
            ui::step_warn_hint(
                ctx,
                &format!("{} already sets remote_isf_url", path.display()),
                &format!("Set it to {}", volatility3_uri(cache)),
            );
            StepResult::Warned
        }
        Err(e) => {
            ui::step_warn_hint(
                ctx,
                &format!("volatility3 not configured: {}", e),
                e.hint().unwrap_or("Run: basar configure-vol3"),
            );
            StepResult::Warned
        }
    }
}

async fn timer_step(ctx: &UiContext, home: &BasarResult<PathBuf>) -> StepResult {
    if !cfg!(target_os = "linux") {
        ui::step_info(ctx, "Skipping systemd timer (Linux only)");
        return StepResult::Skipped;
    }

    let result = match home {
        Ok(home) => install_service(home).await,
        Err(_) => Err(BasarError::HomeDirUnavailable),
    };

    match result {
        Ok(()) => {
            ui::step_ok(ctx, "Installed systemd timer (runs twice monthly)");
            StepResult::Done
        }
        Err(e) => {
            ui::step_warn_hint(
                ctx,
                &format!("Service install failed: {}", e),
                e.hint().unwrap_or("Run: basar install-service"),
            );
            StepResult::Warned
        }
    }
}
