use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Command line arguments for the application
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file (defaults to ~/.octoprint-st-rc)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Poll the printer and show its state (default)
    Run,

    /// Fetch and print the printer state once, then exit
    Check,

    /// Edit the configuration file using a text-based UI
    Config,
}

/// Build the tracing env filter based on verbosity level
pub fn build_env_filter(verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::from_default_env()
            .add_directive("reqwest=warn".parse().unwrap())
            .add_directive("octoprint_status=warn".parse().unwrap()),
        1 => EnvFilter::from_default_env()
            .add_directive("reqwest=warn".parse().unwrap())
            .add_directive("octoprint_status=info".parse().unwrap()),
        2 => EnvFilter::from_default_env()
            .add_directive("reqwest=info".parse().unwrap())
            .add_directive("octoprint_status=debug".parse().unwrap()),
        _ => EnvFilter::from_default_env()
            .add_directive("reqwest=debug".parse().unwrap())
            .add_directive("octoprint_status=trace".parse().unwrap()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_no_subcommand() {
        let cli = Cli::try_parse_from(["octoprint-status"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["octoprint-status", "check", "-vv", "--config", "/tmp/rc"])
                .unwrap();
        assert_eq!(cli.command, Some(Commands::Check));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/rc")));
    }

    #[test]
    fn test_env_filter_for_each_level() {
        for verbose in 0..4 {
            let filter = build_env_filter(verbose).to_string();
            assert!(filter.contains("octoprint_status="), "{}", filter);
        }
    }
}
