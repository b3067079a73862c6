//! Setup command handler: the run-setup phase

use crate::error::CliResult;
use crate::output::ProgressReporter;
use crate::SetupArgs;
use shopcheck::state::{InitMode, SharedState};
use std::path::Path;

#[must_use]
pub const fn init_mode(force: bool) -> InitMode {
    if force {
        InitMode::Overwrite
    } else {
        InitMode::KeepExisting
    }
}

/// Ensure the state file exists and report the identity in it
pub fn execute_setup(
    reporter: &ProgressReporter,
    state_file: &Path,
    args: &SetupArgs,
) -> CliResult<SharedState> {
    let existed = state_file.exists();
    let state = SharedState::init(state_file, init_mode(args.force))?;
    if existed && !args.force {
        reporter.info(&format!(
            "Reusing {} ({}); pass --force for a new identity",
            state.random_email,
            state_file.display()
        ));
    } else {
        reporter.success(&format!(
            "Generated {} in {}",
            state.random_email,
            state_file.display()
        ));
    }
    Ok(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn quiet() -> ProgressReporter {
        ProgressReporter::new(false, true)
    }

    #[test]
    fn test_init_mode() {
        assert_eq!(init_mode(true), InitMode::Overwrite);
        assert_eq!(init_mode(false), InitMode::KeepExisting);
    }

    #[test]
    fn test_setup_writes_new_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shared-state.json");
        let state = execute_setup(&quiet(), &path, &SetupArgs::default()).unwrap();
        assert!(path.exists());
        assert_eq!(SharedState::load(&path).unwrap(), state);
    }

    #[test]
    fn test_setup_keeps_existing_identity() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shared-state.json");
        let first = execute_setup(&quiet(), &path, &SetupArgs::default()).unwrap();
        let second = execute_setup(&quiet(), &path, &SetupArgs::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_force_replaces_identity() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shared-state.json");
        let first = execute_setup(&quiet(), &path, &SetupArgs::default()).unwrap();
        let second = execute_setup(&quiet(), &path, &SetupArgs { force: true }).unwrap();
        assert_ne!(first.random_email, second.random_email);
    }
}
