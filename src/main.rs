//! basar - Volatility3 ISF symbol cache manager
//!
//! CLI entry point that dispatches to subcommands.

use basar::cache::BannerCache;
use basar::cli::{self, Cli, Commands};
use basar::config::Config;
use basar::error::BasarResult;
use clap::Parser;
use console::style;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Set to `1` for the same output as `-v`
const VERBOSE_ENV: &str = "BASAR_VERBOSE";

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> BasarResult<ExitCode> {
    let mut cli = Cli::parse();

    let mut verbose = cli.verbose;
    if verbose == 0 && std::env::var(VERBOSE_ENV).is_ok_and(|v| v == "1") {
        verbose = 1;
    }

    // 0 = warn, 1 = info (per-source outcomes), 2+ = debug
    let filter = match verbose {
        0 => EnvFilter::new("basar=warn"),
        1 => EnvFilter::new("basar=info"),
        _ => EnvFilter::new("basar=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let command = cli.take_command();

    // Completions don't touch the cache
    if let Commands::Completions(args) = command {
        return cli::commands::completions::execute(args);
    }

    let config = Config::load(cli.cache_dir.take(), cli.config_dir.take());
    let cache = BannerCache::new(config)?;

    let cancel = CancellationToken::new();
    cli::cancel_on_signal(cancel.clone());

    cli::commands::dispatch(command, &cache, &cancel, verbose > 0).await
}
