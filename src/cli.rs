// CLI definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ringcon_driver")]
#[command(author, version, about = "Ring-Con to arrow-key driver for Linux")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file path (default: ~/.config/ringcon/driver.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Log key taps instead of creating a virtual keyboard
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Per-command acknowledgment timeout in milliseconds
    #[arg(long, value_name = "MS", global = true)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Default)]
pub enum Commands {
    /// Connect, calibrate and turn squeezes and pulls into key taps (default)
    #[default]
    Run,

    /// List connected Joy-Con (R) controllers
    #[command(visible_alias = "ls")]
    List,

    /// Write the current config (with defaults filled in) to the config file
    InitConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_run() {
        let cli = Cli::parse_from(["ringcon_driver"]);
        assert!(cli.command.is_none());
        assert!(!cli.dry_run);
        assert!(cli.timeout_ms.is_none());
        assert!(matches!(cli.command.unwrap_or_default(), Commands::Run));
    }

    #[test]
    fn test_run_flags() {
        let cli = Cli::parse_from([
            "ringcon_driver",
            "--log-level",
            "debug",
            "run",
            "--dry-run",
            "--timeout-ms",
            "750",
        ]);
        assert_eq!(cli.log_level, "debug");
        assert!(matches!(cli.command, Some(Commands::Run)));
        assert!(cli.dry_run);
        assert_eq!(cli.timeout_ms, Some(750));
    }

    #[test]
    fn test_dry_run_without_subcommand() {
        let cli = Cli::parse_from(["ringcon_driver", "--dry-run"]);
        assert!(cli.command.is_none());
        assert!(cli.dry_run);
    }
}
