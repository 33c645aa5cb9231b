//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// basar - Volatility3 ISF symbol cache manager
///
/// Fetches, merges, and caches ISF banner indexes from several upstream
/// sources so volatility3 can use a single local `remote_isf_url`.
#[derive(Parser, Debug)]
#[command(name = "basar")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = "First time? Run: basar setup\n\n\
    Use with volatility3: vol -u $(basar) -f dump.raw linux.pslist")]
pub struct Cli {
    /// Subcommand to execute (default: uri)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Cache directory (default: $XDG_CACHE_HOME/basar)
    #[arg(long, global = true, env = "BASAR_CACHE_DIR", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Config directory (default: $XDG_CONFIG_HOME/basar)
    #[arg(long, global = true, env = "BASAR_CONFIG_DIR", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}

impl Cli {
    /// The requested command, `uri` when none was given
    pub fn take_command(&mut self) -> Commands {
        self.command.take().unwrap_or(Commands::Uri)
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Ensure the cache and print its file:// URI
    Uri,

    /// Ensure the cache and print its path
    Path,

    /// Print cache statistics as JSON
    Stats,

    /// Exit 0 if the cache is valid, 2 otherwise
    Check,

    /// Force a full update from all sources
    Update,

    /// Update only if sources changed (ETag/Last-Modified)
    SmartUpdate,

    /// Remove the cached index
    Clear,

    /// Create sources.conf with the default sources
    Init,

    /// Complete setup: config, update, volatility3, systemd timer
    Setup,

    /// Install a systemd user timer for automatic updates (Linux)
    InstallService,

    /// Point volatility3 at the cache in ~/.volatility3.yaml
    #[command(name = "configure-vol3")]
    ConfigureVol3,

    /// Print shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the completions command
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_uri() {
        let mut cli = Cli::parse_from(["basar"]);
        assert_eq!(cli.take_command(), Commands::Uri);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn parses_kebab_case_commands() {
        let cases = [
            ("smart-update", Commands::SmartUpdate),
            ("install-service", Commands::InstallService),
            ("configure-vol3", Commands::ConfigureVol3),
            ("check", Commands::Check),
        ];

        for (arg, expected) in cases {
            let cli = Cli::parse_from(["basar", arg]);
            assert_eq!(cli.command, Some(expected), "{}", arg);
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "basar",
            "update",
            "-vv",
            "--cache-dir",
            "/tmp/c",
            "--config-dir",
            "/tmp/k",
        ]);

        assert_eq!(cli.command, Some(Commands::Update));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.cache_dir, Some(PathBuf::from("/tmp/c")));
        assert_eq!(cli.config_dir, Some(PathBuf::from("/tmp/k")));
    }

    #[test]
    fn parses_completions_shell() {
        let cli = Cli::parse_from(["basar", "completions", "zsh"]);
        match cli.command {
            Some(Commands::Completions(args)) => assert_eq!(args.shell, Shell::Zsh),
            other => panic!("expected Completions command, got {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_command() {
        assert!(Cli::try_parse_from(["basar", "frobnicate"]).is_err());
    }
}
