//! Run command handler

use crate::error::{CliError, CliResult};
use crate::handlers::setup::execute_setup;
use crate::output::ProgressReporter;
use crate::runner::{absolute_state_file, RunOptions, SuitePlan, SuiteRunner};
use crate::{RunArgs, SetupArgs};
use shopcheck::SuiteConfig;

/// Apply `run` flags on top of the environment-derived configuration
#[must_use]
pub fn suite_config_for_run(base: SuiteConfig, args: &RunArgs) -> SuiteConfig {
    let mut config = base;
    if let Some(url) = &args.base_url {
        config = config.with_base_url(url.trim_end_matches('/'));
    }
    if let Some(workers) = args.workers {
        config = config.with_workers(workers);
    }
    if args.headed {
        config.browser = config.browser.with_headless(false);
    }
    config
}

#[must_use]
pub fn run_options(config: &SuiteConfig, args: &RunArgs) -> RunOptions {
    RunOptions {
        workers: config.workers,
        filter: args.filter.clone(),
        registration: !args.skip_registration,
        cleanup: !args.skip_cleanup,
    }
}

/// Setup, then every phase of the plan
pub async fn execute_run(
    reporter: &mut ProgressReporter,
    base: SuiteConfig,
    args: &RunArgs,
) -> CliResult<()> {
    let config = suite_config_for_run(base, args);
    if config.workers == 0 {
        return Err(CliError::invalid_argument("workers must be at least 1"));
    }
    let state_file = absolute_state_file(&config.state_file)?;
    let plan = SuitePlan::new(&run_options(&config, args));

    let runner = SuiteRunner::new()
        .with_env("SHOPCHECK_STATE_FILE", state_file.display().to_string())
        .with_env("SHOPCHECK_BASE_URL", config.base_url.clone())
        .with_env("SHOPCHECK_HEADLESS", config.browser.headless.to_string());

    if args.dry_run {
        for phase in plan.phases() {
            println!("{}", runner.describe(phase));
        }
        return Ok(());
    }

    reporter.header("Shopcheck");
    let setup = SetupArgs {
        force: !args.keep_state,
    };
    execute_setup(reporter, &state_file, &setup)?;
    reporter.info(&format!(
        "{} phase(s) against {} with {} worker(s)",
        plan.phases().len(),
        config.base_url,
        config.workers
    ));

    let outcome = runner.run(&plan, reporter).await?;
    if outcome.all_passed() {
        Ok(())
    } else {
        Err(CliError::suite_run(format!(
            "failed phase(s): {}",
            outcome.failed.join(", ")
        )))
    }
}
