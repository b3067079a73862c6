//! Shopcheck CLI library
//!
//! Command-line front end for the shopcheck suites: the run-setup phase,
//! state and configuration inspection, and the suite launcher.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod handlers;
mod output;
pub mod runner;

pub use commands::{Cli, ColorArg, Commands, ConfigArgs, RunArgs, SetupArgs, StateArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::ProgressReporter;
pub use runner::{RunOptions, RunOutcome, SuitePhase, SuitePlan, SuiteRunner};
