//! configure-vol3 and install-service commands

use crate::cache::BannerCache;
use crate::error::BasarResult;
use crate::integrations::{self, configure_volatility3};
use crate::ui::{self, UiContext};
use std::process::ExitCode;

/// URI volatility3 should use, even before the first update
pub fn volatility3_uri(cache: &BannerCache) -> String {
    cache.uri().unwrap_or_else(|| cache.config().cache_uri())
}

/// Add `remote_isf_url` to `~/.volatility3.yaml`
pub async fn configure_vol3(cache: &BannerCache) -> BasarResult<ExitCode> {
    let ctx = UiContext::detect();
    let home = integrations::home_dir()?;

    let path = configure_volatility3(&home, &volatility3_uri(cache)).await?;

    ui::step_ok_detail(&ctx, "volatility3 configured", &path.display().to_string());
    Ok(ExitCode::SUCCESS)
}

/// Install and start the systemd user timer
pub async fn install_service() -> BasarResult<ExitCode> {
    let ctx = UiContext::detect();
    let home = integrations::home_dir()?;

    integrations::install_service(&home).await?;

    ui::step_ok(&ctx, "systemd timer installed (runs twice monthly)");
    Ok(ExitCode::SUCCESS)
}
