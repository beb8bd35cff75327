//! Comprehensive error handling for the Railforge CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Actionable suggestions
//! - Proper error chaining
//! - Exit code mapping

use std::path::PathBuf;
use std::{error::Error, fmt::Write as _};

use owo_colors::OwoColorize;
use thiserror::Error;

use railforge_core::application::PipelineError;
use railforge_core::error::RailforgeError;

// Re-export so callers only need `use crate::error::*`.
pub use railforge_core::error::ErrorCategory as CoreCategory;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Comprehensive CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input (validation failed).
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// The target directory does not exist.
    #[error("Target directory not found: {}", path.display())]
    TargetNotFound { path: PathBuf },

    /// The target directory is not a Rails application.
    #[error("'{}' does not look like a Rails application: {reason}", path.display())]
    NotARailsApp { path: PathBuf, reason: String },

    // ── Config errors ──────────────────────────────────────────────────────
    /// A configuration file could not be read or parsed.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ── Core errors ────────────────────────────────────────────────────────
    /// A pipeline step failed, tagged with the step name.
    ///
    /// Wrapped here so that the CLI can attach suggestions drawn from the
    /// core error's category without touching core internals.
    #[error("Configuration run failed: {0}")]
    Pipeline(#[from] PipelineError),

    /// An error propagated from `railforge-core` outside the pipeline.
    #[error("{0}")]
    Core(#[from] RailforgeError),

    // ── System errors ──────────────────────────────────────────────────────
    /// An I/O operation failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Operation cancelled by user.
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message } => vec![
                format!("Check your input: {}", message),
                "Use --help for usage information".into(),
            ],

            Self::TargetNotFound { path } => vec![
                format!("The directory '{}' does not exist", path.display()),
                "Generate the application first: rails new <name>".into(),
                "Then run: railforge <name>".into(),
            ],

            Self::NotARailsApp { path, .. } => vec![
                format!("'{}' is missing the files a Rails app would have", path.display()),
                "Run railforge inside a freshly generated Rails application".into(),
                "Generate one with: rails new <name>".into(),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {}", message),
                "Check the file passed via --config".into(),
                "Settings can also be passed as RAILFORGE_* environment variables".into(),
            ],

            Self::Pipeline(err) => {
                let mut suggestions = err.source.suggestions();
                // A deliberate decline is not a fault to repair.
                if !err.source.is_operator_abort() {
                    suggestions.push(format!(
                        "The run stopped at step '{}'; fix the cause and re-run",
                        err.step
                    ));
                }
                suggestions
            }

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {}", message),
                "Check file permissions".into(),
                "Check available disk space".into(),
            ],

            Self::Cancelled => vec![
                "Operation was cancelled".into(),
                "No changes were made".into(),
            ],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } => ErrorCategory::UserError,
            Self::TargetNotFound { .. } => ErrorCategory::NotFound,
            Self::NotARailsApp { .. } => ErrorCategory::UserError,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Pipeline(err) => core_category(&err.source),
            Self::Core(core) => core_category(core),
            Self::IoError { .. } => ErrorCategory::Internal,
            Self::Cancelled => ErrorCategory::UserError,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        // Error header
        let _ = write!(output, "\n{} {}\n\n", "✗".red().bold(), "Error:".red().bold());

        // Main error message
        let _ = writeln!(output, "  {}", self.to_string().red());

        // Error chain (if verbose)
        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                let _ = write!(output, "\n  {} {}\n", "→".dimmed(), err.to_string().dimmed());
                source = err.source();
            }
        }

        // Suggestions
        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            let _ = write!(output, "\n{}\n", "Suggestions:".yellow().bold());
            for suggestion in suggestions {
                let _ = writeln!(output, "  {}", suggestion);
            }
        }

        // Hint to re-run with -v
        if !verbose {
            output.push('\n');
            let _ = writeln!(
                output,
                "{} {}",
                "\u{2139}".blue(), // ℹ
                "Use -v / --verbose for more details.".dimmed(),
            );
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`] — no ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        let _ = write!(out, "\nError: {}\n", self);

        if verbose {
            let mut src = std::error::Error::source(self);
            while let Some(err) = src {
                let _ = writeln!(out, "  Caused by: {err}");
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                let _ = writeln!(out, "  {s}");
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

fn core_category(err: &RailforgeError) -> ErrorCategory {
    match err.category() {
        CoreCategory::Validation => ErrorCategory::UserError,
        CoreCategory::Aborted => ErrorCategory::UserError,
        CoreCategory::NotFound => ErrorCategory::NotFound,
        CoreCategory::Configuration => ErrorCategory::Configuration,
        CoreCategory::Internal => ErrorCategory::Internal,
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (validation, invalid arguments, abort).
    UserError,
    /// Resource not found.
    NotFound,
    /// Configuration error.
    Configuration,
    /// Internal/system error.
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    // ── suggestions ───────────────────────────────────────────────────────

    #[test]
    fn target_not_found_suggests_rails_new() {
        let err = CliError::TargetNotFound {
            path: PathBuf::from("/tmp/missing"),
        };
        assert!(err.suggestions().iter().any(|s| s.contains("rails new")));
    }

    #[test]
    fn pipeline_error_names_the_failed_step() {
        let err = CliError::Pipeline(PipelineError {
            step: "bundle-install",
            source: railforge_core::application::ApplicationError::CommandFailed {
                command: "bundle install".into(),
                status: 5,
                stderr: String::new(),
            }
            .into(),
        });
        assert!(err.suggestions().iter().any(|s| s.contains("bundle-install")));
    }

    // ── exit codes ────────────────────────────────────────────────────────

    #[test]
    fn exit_code_user_error() {
        assert_eq!(CliError::InvalidInput { message: "x".into() }.exit_code(), 2);
    }

    #[test]
    fn exit_code_not_found() {
        let err = CliError::TargetNotFound { path: PathBuf::from("/x") };
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn exit_code_configuration() {
        let err = CliError::ConfigError { message: "x".into(), source: None };
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn exit_code_internal() {
        let err = CliError::IoError {
            message: "x".into(),
            source: io::Error::other("e"),
        };
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn operator_abort_is_a_user_error() {
        let err = CliError::Pipeline(PipelineError {
            step: "preflight",
            source: railforge_core::application::ApplicationError::Aborted {
                reason: "requirement not met".into(),
            }
            .into(),
        });
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn operator_abort_gets_no_repair_advice() {
        let err = CliError::Pipeline(PipelineError {
            step: "preflight",
            source: railforge_core::application::ApplicationError::Aborted {
                reason: "requirement not met".into(),
            }
            .into(),
        });
        assert!(err.suggestions().iter().all(|s| !s.contains("re-run")));

        let err = CliError::Pipeline(PipelineError {
            step: "lint-setup",
            source: railforge_core::application::ApplicationError::CommandFailed {
                command: "bundle exec rubocop".into(),
                status: 1,
                stderr: String::new(),
            }
            .into(),
        });
        assert!(err.suggestions().iter().any(|s| s.contains("lint-setup")));
    }

    // ── format ────────────────────────────────────────────────────────────

    #[test]
    fn format_plain_contains_error_header() {
        let err = CliError::TargetNotFound { path: PathBuf::from("/tmp/x") };
        let s = err.format_plain(false);
        assert!(s.contains("Error:"));
        assert!(s.contains("Suggestions:"));
    }

    #[test]
    fn format_plain_verbose_omits_hint() {
        let err = CliError::Cancelled;
        let s = err.format_plain(true);
        assert!(!s.contains("--verbose"));
    }
}
