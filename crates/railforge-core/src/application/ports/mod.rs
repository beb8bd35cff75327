//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `railforge-adapters` implement
//! these.
//!
//! All four ports here are driven (output) ports: the pipeline calls them,
//! infrastructure implements them. Substituting fakes for all four lets the
//! whole pipeline run in tests without touching a shell, a terminal, or the
//! real filesystem.

use std::fmt::Debug;
use std::path::Path;

use crate::error::RailforgeResult;

/// Captured result of one external command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Process exit status (`-1` when terminated by a signal).
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// A successful, silent invocation — the common case for fakes.
    pub fn ok() -> Self {
        Self::default()
    }

    /// A successful invocation with the given stdout.
    pub fn with_stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            ..Self::default()
        }
    }

    /// A failed invocation with the given status.
    pub fn failed(status: i32) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }
}

/// Port for invoking external tools (rails, bundler, yarn, git, gh, …).
///
/// Implemented by:
/// - `railforge_adapters::command::LocalCommandRunner` (production)
/// - `railforge_adapters::command::RecordingRunner` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    /// Spawn `program` with `args` in `cwd` and wait for it synchronously.
    ///
    /// A spawn failure (binary missing) is an `Err`; a tool that ran and
    /// exited non-zero is `Ok` with a non-zero status — callers decide
    /// whether that is fatal.
    fn run<'a>(&self, program: &str, args: &[&'a str], cwd: &Path)
    -> RailforgeResult<CommandOutput>;
}

/// Port for filesystem operations against the target project tree.
///
/// Implemented by:
/// - `railforge_adapters::filesystem::LocalFilesystem` (production)
/// - `railforge_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Read a whole file into a string.
    fn read_to_string(&self, path: &Path) -> RailforgeResult<String>;

    /// Write content to a file, replacing any existing content.
    fn write_file(&self, path: &Path, content: &str) -> RailforgeResult<()>;

    /// Append content to a file, creating it when missing.
    fn append_file(&self, path: &Path, content: &str) -> RailforgeResult<()>;

    /// Copy a file, overwriting the destination.
    fn copy_file(&self, from: &Path, to: &Path) -> RailforgeResult<()>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> RailforgeResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> RailforgeResult<()>;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> RailforgeResult<()>;

    /// Rename a file or directory.
    fn rename(&self, from: &Path, to: &Path) -> RailforgeResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Port for blocking yes/no questions to the operator.
///
/// Implemented by:
/// - `railforge_adapters::prompt::TerminalPrompter` (production)
/// - `railforge_adapters::prompt::ScriptedPrompter` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Prompter: Send + Sync {
    fn confirm(&self, question: &str) -> RailforgeResult<bool>;
}

/// A resolved template-asset location.
///
/// When the source was cloned from a remote URL, the implementation owns the
/// temporary directory and removes it on drop — cleanup is guaranteed on
/// every exit path, including unwinding.
pub trait MaterializedSource: Debug + Send {
    fn path(&self) -> &Path;
}

/// Port for resolving where template assets live.
///
/// Implemented by:
/// - `railforge_adapters::source::GitSourceMaterializer` (production:
///   local directory, or `git clone` of an http(s) URL into a scoped
///   temporary directory)
/// - `railforge_adapters::source::StaticSource` (testing)
pub trait SourceMaterializer: Send + Sync {
    fn materialize(&self, spec: &str) -> RailforgeResult<Box<dyn MaterializedSource>>;
}
