//! Shopcheck CLI
//!
//! ## Usage
//!
//! ```bash
//! shopcheck setup                 # Generate the shared identity
//! shopcheck state                 # Show it
//! shopcheck config --json         # Effective suite configuration
//! shopcheck run -j 4              # Setup, registration, suites, cleanup
//! ```

use clap::Parser;
use shopcheck::SuiteConfig;
use shopcheck_cli::{handlers, Cli, CliConfig, CliResult, ColorChoice, Commands, ProgressReporter, Verbosity};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let color: ColorChoice = cli.color.clone().into();
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(color)
}

fn init_logging(config: &CliConfig) {
    let filter = EnvFilter::try_from_env(shopcheck::telemetry::LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.log_directive()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(config.color.should_color())
        .try_init();
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_logging(&config);

    let mut suite = SuiteConfig::from_env()?;
    if let Some(path) = &cli.state_file {
        suite = suite.with_state_file(path);
    }
    let mut reporter =
        ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());

    match cli.command {
        Commands::Setup(args) => {
            handlers::execute_setup(&reporter, &suite.state_file, &args)?;
            Ok(())
        }
        Commands::State(args) => handlers::execute_state(&suite.state_file, &args),
        Commands::Config(args) => handlers::execute_config(&suite, &args),
        Commands::Run(args) => handlers::execute_run(&mut reporter, suite, &args).await,
    }
}
