//! Command handlers, one module per subcommand

pub mod config;
pub mod run;
pub mod setup;
pub mod state;

pub use config::{execute_config, render_config};
pub use run::{execute_run, run_options, suite_config_for_run};
pub use setup::{execute_setup, init_mode};
pub use state::{execute_state, render_state};
