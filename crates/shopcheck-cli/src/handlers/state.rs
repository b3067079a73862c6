//! State command handler

use crate::error::CliResult;
use crate::StateArgs;
use shopcheck::state::SharedState;
use std::path::Path;

/// Text or JSON rendering of a state record
pub fn render_state(state: &SharedState, path: &Path, json: bool) -> CliResult<String> {
    if json {
        return Ok(serde_json::to_string_pretty(state)?);
    }
    Ok(format!(
        "State file: {}\n  E-mail:   {}\n  Password: {}\n  Name:     {}",
        path.display(),
        state.random_email,
        state.password,
        state.display_name()
    ))
}

/// Print the shared state; a missing file is an error
pub fn execute_state(state_file: &Path, args: &StateArgs) -> CliResult<()> {
    let state = SharedState::load(state_file)?;
    println!("{}", render_state(&state, state_file, args.json)?);
    Ok(())
}
