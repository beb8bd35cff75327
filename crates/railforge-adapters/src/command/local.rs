//! Command runner adapter using std::process.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use railforge_core::application::ApplicationError;
use railforge_core::application::ports::{CommandOutput, CommandRunner};
use railforge_core::error::RailforgeResult;

/// Production command runner spawning real processes synchronously.
#[derive(Debug, Clone, Copy)]
pub struct LocalCommandRunner;

impl LocalCommandRunner {
    /// Create a new local command runner.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for LocalCommandRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> RailforgeResult<CommandOutput> {
        debug!(program, ?args, cwd = %cwd.display(), "spawning");

        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .output()
            .map_err(|e| ApplicationError::CommandUnavailable {
                command: program.to_string(),
                reason: e.to_string(),
            })?;

        Ok(CommandOutput {
            // -1 when the process was terminated by a signal.
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
