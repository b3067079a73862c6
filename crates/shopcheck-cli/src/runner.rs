//! Suite launcher.
//!
//! A run is a fixed sequence of `cargo test` invocations against the
//! `shopcheck` package: register the shared identity, run the main suites in
//! parallel, then delete the identity again. Cleanup runs whenever
//! registration succeeded, even if the main suites failed.

use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Package the live suites live in
pub const SUITE_PACKAGE: &str = "shopcheck";

/// Suites that can run in any order once the identity is registered
pub const MAIN_SUITES: [&str; 6] = [
    "auth",
    "product_discovery",
    "cart_checkout",
    "complex_flows",
    "general_features",
    "security",
];

/// What a run should include
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub workers: usize,
    pub filter: Option<String>,
    pub registration: bool,
    pub cleanup: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            workers: 4,
            filter: None,
            registration: true,
            cleanup: true,
        }
    }
}

/// One `cargo test` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuitePhase {
    pub name: &'static str,
    pub tests: Vec<&'static str>,
    /// `--test-threads`; `None` leaves cargo's default
    pub threads: Option<usize>,
    pub filter: Option<String>,
}

impl SuitePhase {
    /// Arguments after `cargo`
    #[must_use]
    pub fn cargo_args(&self) -> Vec<String> {
        let mut args = vec![
            "test".to_string(),
            "-p".to_string(),
            SUITE_PACKAGE.to_string(),
            "--features".to_string(),
            "browser".to_string(),
        ];
        for test in &self.tests {
            args.push("--test".to_string());
            args.push((*test).to_string());
        }
        if self.threads.is_some() || self.filter.is_some() {
            args.push("--".to_string());
        }
        if let Some(filter) = &self.filter {
            args.push(filter.clone());
        }
        if let Some(threads) = self.threads {
            args.push(format!("--test-threads={threads}"));
        }
        args
    }
}

/// The ordered phases of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuitePlan {
    pub registration: Option<SuitePhase>,
    pub main: SuitePhase,
    pub cleanup: Option<SuitePhase>,
}

impl SuitePlan {
    #[must_use]
    pub fn new(options: &RunOptions) -> Self {
        let single = |name: &'static str| SuitePhase {
            name,
            tests: vec![name],
            threads: None,
            filter: None,
        };
        Self {
            registration: options.registration.then(|| single("registration")),
            main: SuitePhase {
                name: "suites",
                tests: MAIN_SUITES.to_vec(),
                threads: Some(options.workers.max(1)),
                filter: options.filter.clone(),
            },
            cleanup: options.cleanup.then(|| single("cleanup")),
        }
    }

    /// Phases in execution order
    #[must_use]
    pub fn phases(&self) -> Vec<&SuitePhase> {
        self.registration
            .iter()
            .chain(std::iter::once(&self.main))
            .chain(self.cleanup.iter())
            .collect()
    }
}

/// How each phase ended
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    pub passed: Vec<&'static str>,
    pub failed: Vec<&'static str>,
}

impl RunOutcome {
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Resolve `path` against the current directory.
///
/// Child `cargo test` processes run with the package directory as their
/// working directory, so a relative state file would point elsewhere.
pub fn absolute_state_file(path: &Path) -> CliResult<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Spawns the phases of a [`SuitePlan`]
#[derive(Debug)]
pub struct SuiteRunner {
    cargo: String,
    env: BTreeMap<String, String>,
}

impl SuiteRunner {
    /// Uses `$CARGO` when set, else `cargo` from `PATH`
    #[must_use]
    pub fn new() -> Self {
        Self {
            cargo: std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string()),
            env: BTreeMap::new(),
        }
    }

    /// Environment passed to every child
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Shell-style rendering of one phase, for `--dry-run`
    #[must_use]
    pub fn describe(&self, phase: &SuitePhase) -> String {
        let env: Vec<String> = self.env.iter().map(|(k, v)| format!("{k}={v}")).collect();
        let mut parts = env;
        parts.push(self.cargo.clone());
        parts.extend(phase.cargo_args());
        parts.join(" ")
    }

    async fn run_phase(&self, phase: &SuitePhase) -> CliResult<bool> {
        tracing::info!(phase = phase.name, args = ?phase.cargo_args(), "starting phase");
        let status = tokio::process::Command::new(&self.cargo)
            .args(phase.cargo_args())
            .envs(&self.env)
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| CliError::suite_run(format!("cannot start {}: {e}", self.cargo)))?;
        tracing::info!(phase = phase.name, success = status.success(), "phase finished");
        Ok(status.success())
    }

    /// Execute every phase in order.
    ///
    /// A failed registration skips everything after it. Cleanup still runs
    /// after failed main suites.
    pub async fn run(
        &self,
        plan: &SuitePlan,
        reporter: &mut ProgressReporter,
    ) -> CliResult<RunOutcome> {
        let started = Instant::now();
        let mut outcome = RunOutcome::default();
        reporter.start_phases(plan.phases().len() as u64);

        let mut record = |phase: &SuitePhase, ok: bool, reporter: &ProgressReporter| {
            if ok {
                reporter.success(phase.name);
                outcome.passed.push(phase.name);
            } else {
                reporter.failure(phase.name);
                outcome.failed.push(phase.name);
            }
            reporter.advance();
        };

        let registered = match &plan.registration {
            Some(phase) => {
                reporter.phase(phase.name);
                let ok = self.run_phase(phase).await?;
                record(phase, ok, reporter);
                ok
            }
            None => true,
        };

        if registered {
            reporter.phase(plan.main.name);
            let ok = self.run_phase(&plan.main).await?;
            record(&plan.main, ok, reporter);

            if let Some(phase) = &plan.cleanup {
                reporter.phase(phase.name);
                let ok = self.run_phase(phase).await?;
                record(phase, ok, reporter);
            }
        } else {
            reporter.warning("registration failed; remaining phases skipped");
        }

        reporter.finish();
        reporter.summary(outcome.passed.len(), outcome.failed.len(), started.elapsed());
        Ok(outcome)
    }
}

impl Default for SuiteRunner {
    fn default() -> Self {
        Self::new()
    }
}
