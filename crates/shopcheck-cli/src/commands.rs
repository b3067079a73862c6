//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shopcheck: browser end-to-end suite for the Automation Exercise storefront
#[derive(Parser, Debug)]
#[command(name = "shopcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Shared state file (defaults to shared-state.json at the workspace root)
    #[arg(long, env = "SHOPCHECK_STATE_FILE", global = true)]
    pub state_file: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the cross-run identity and write the shared state file
    Setup(SetupArgs),

    /// Show the shared state file
    State(StateArgs),

    /// Show the effective suite configuration
    Config(ConfigArgs),

    /// Run setup, every live suite and the final cleanup
    Run(RunArgs),
}

/// Arguments for the setup command
#[derive(Parser, Debug, Default)]
pub struct SetupArgs {
    /// Replace an existing state file with a fresh identity
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the state command
#[derive(Parser, Debug, Default)]
pub struct StateArgs {
    /// Print the raw JSON record
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug, Default)]
pub struct ConfigArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the run command
#[derive(Parser, Debug, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunArgs {
    /// Parallel test threads for the main suites
    #[arg(short = 'j', long, env = "SHOPCHECK_WORKERS")]
    pub workers: Option<usize>,

    /// Only run tests whose name contains this string
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Storefront root URL
    #[arg(long, env = "SHOPCHECK_BASE_URL")]
    pub base_url: Option<String>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Reuse an existing identity instead of generating a new one
    #[arg(long)]
    pub keep_state: bool,

    /// Skip registering the identity
    #[arg(long)]
    pub skip_registration: bool,

    /// Leave the registered account in place
    #[arg(long)]
    pub skip_cleanup: bool,

    /// Print the cargo invocations without running them
    #[arg(long)]
    pub dry_run: bool,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::config::ColorChoice;

    mod cli_tests {
        use super::*;

        #[test]
        fn test_setup_force() {
            let cli = Cli::try_parse_from(["shopcheck", "setup", "--force"]).unwrap();
            match cli.command {
                Commands::Setup(args) => assert!(args.force),
                other => panic!("expected setup, got {other:?}"),
            }
        }

        #[test]
        fn test_run_flags() {
            let cli = Cli::try_parse_from([
                "shopcheck",
                "run",
                "-j",
                "2",
                "--filter",
                "cart",
                "--skip-cleanup",
            ])
            .unwrap();
            match cli.command {
                Commands::Run(args) => {
                    assert_eq!(args.workers, Some(2));
                    assert_eq!(args.filter.as_deref(), Some("cart"));
                    assert!(args.skip_cleanup);
                    assert!(!args.dry_run);
                }
                other => panic!("expected run, got {other:?}"),
            }
        }

        #[test]
        fn test_global_flags_after_subcommand() {
            let cli = Cli::try_parse_from([
                "shopcheck",
                "state",
                "--state-file",
                "/tmp/state.json",
                "-vv",
            ])
            .unwrap();
            assert_eq!(cli.verbose, 2);
            assert_eq!(cli.state_file, Some(PathBuf::from("/tmp/state.json")));
        }

        #[test]
        fn test_subcommand_required() {
            assert!(Cli::try_parse_from(["shopcheck"]).is_err());
        }

        #[test]
        fn test_non_numeric_workers_rejected() {
            assert!(Cli::try_parse_from(["shopcheck", "run", "-j", "many"]).is_err());
        }
    }

    mod color_arg_tests {
        use super::*;

        #[test]
        fn test_conversion() {
            assert_eq!(ColorChoice::from(ColorArg::Auto), ColorChoice::Auto);
            assert_eq!(ColorChoice::from(ColorArg::Always), ColorChoice::Always);
            assert_eq!(ColorChoice::from(ColorArg::Never), ColorChoice::Never);
        }
    }
}
