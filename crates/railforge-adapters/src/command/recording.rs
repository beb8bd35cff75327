//! Recording command runner for testing.

use std::path::Path;
use std::sync::{Arc, Mutex};

use railforge_core::application::ports::{CommandOutput, CommandRunner};
use railforge_core::error::RailforgeResult;

/// In-memory command runner for testing.
///
/// Records every invocation as a flat `program arg1 arg2 …` string and
/// answers from a table of configured responses; anything not configured
/// succeeds silently. Cloning shares the log, so a test can keep a handle
/// while the pipeline owns a boxed copy.
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
    inner: Arc<Mutex<RecordingRunnerInner>>,
}

#[derive(Debug, Default)]
struct RecordingRunnerInner {
    log: Vec<String>,
    responses: Vec<(String, CommandOutput)>,
}

impl RecordingRunner {
    /// Create a runner where every command succeeds silently.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the response for commands starting with `prefix`. Later
    /// entries win, so a test can override a broad prefix with a narrow one.
    pub fn respond(&self, prefix: impl Into<String>, output: CommandOutput) {
        let mut inner = self.inner.lock().unwrap();
        inner.responses.push((prefix.into(), output));
    }

    /// Every command run so far, in order.
    pub fn commands(&self) -> Vec<String> {
        self.inner.lock().unwrap().log.clone()
    }

    /// Whether any recorded command starts with `prefix`.
    pub fn ran(&self, prefix: &str) -> bool {
        self.position(prefix).is_some()
    }

    /// Index of the first recorded command starting with `prefix`.
    pub fn position(&self, prefix: &str) -> Option<usize> {
        let inner = self.inner.lock().unwrap();
        inner.log.iter().position(|c| c.starts_with(prefix))
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[&str], _cwd: &Path) -> RailforgeResult<CommandOutput> {
        let command = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");

        let mut inner = self.inner.lock().unwrap();
        inner.log.push(command.clone());

        let output = inner
            .responses
            .iter()
            .rev()
            .find(|(prefix, _)| command.starts_with(prefix.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_else(CommandOutput::ok);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn records_in_order_and_defaults_to_success() {
        let runner = RecordingRunner::new();
        let cwd = PathBuf::from("/tmp");
        runner.run("git", &["init"], &cwd).unwrap();
        runner.run("git", &["add", "."], &cwd).unwrap();

        assert_eq!(runner.commands(), ["git init", "git add ."]);
        assert!(runner.ran("git init"));
        assert!(runner.position("git init") < runner.position("git add"));
    }

    #[test]
    fn configured_response_wins_by_longest_match_last() {
        let runner = RecordingRunner::new();
        runner.respond("rails", CommandOutput::failed(1));
        runner.respond("rails --version", CommandOutput::with_stdout("Rails 6.1.4"));

        let cwd = PathBuf::from("/tmp");
        let output = runner.run("rails", &["--version"], &cwd).unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, "Rails 6.1.4");

        let output = runner.run("rails", &["g", "annotate:install"], &cwd).unwrap();
        assert!(!output.success());
    }
}
