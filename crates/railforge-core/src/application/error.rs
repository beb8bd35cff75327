//! Application layer errors.
//!
//! These errors represent failures in orchestration — external commands,
//! filesystem mutations, prompts. Pure-logic failures are `DomainError`
//! from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while executing pipeline steps.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A delegated tool ran and exited non-zero. Always fatal, never
    /// retried, never rolled back.
    #[error("command `{command}` exited with status {status}")]
    CommandFailed {
        command: String,
        status: i32,
        stderr: String,
    },

    /// A delegated tool could not be started at all (not installed, not on
    /// PATH).
    #[error("command `{command}` could not be started: {reason}")]
    CommandUnavailable { command: String, reason: String },

    /// Filesystem operation failed.
    #[error("filesystem error at {}: {reason}", path.display())]
    FilesystemError { path: PathBuf, reason: String },

    /// Reading the operator's answer failed (e.g. closed stdin).
    #[error("prompt failed: {reason}")]
    PromptFailed { reason: String },

    /// The operator declined a confirmation that gates the run.
    #[error("run aborted: {reason}")]
    Aborted { reason: String },

    /// The template source could not be materialized.
    #[error("template source error: {reason}")]
    SourceError { reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::CommandFailed { command, stderr, .. } => {
                let mut s = vec![
                    format!("`{command}` failed; its own output above has the details"),
                    "Fix the cause and re-run — completed steps are not rolled back".into(),
                ];
                if !stderr.trim().is_empty() {
                    s.push(format!("stderr: {}", stderr.trim()));
                }
                s
            }
            Self::CommandUnavailable { command, .. } => vec![
                format!("`{command}` is not installed or not on PATH"),
                "Install it and re-run".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure you are running inside a freshly generated Rails app".into(),
            ],
            Self::PromptFailed { .. } => vec![
                "Could not read a yes/no answer".into(),
                "Run from an interactive terminal".into(),
            ],
            Self::Aborted { .. } => vec![
                "The run stopped at your request".into(),
                "No further steps were executed".into(),
            ],
            Self::SourceError { reason } => vec![
                format!("Template source problem: {reason}"),
                "Check the configured template source path or URL".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::CommandFailed { .. } | Self::FilesystemError { .. } => ErrorCategory::Internal,
            Self::CommandUnavailable { .. } => ErrorCategory::NotFound,
            Self::PromptFailed { .. } => ErrorCategory::Internal,
            Self::Aborted { .. } => ErrorCategory::Aborted,
            Self::SourceError { .. } => ErrorCategory::Configuration,
        }
    }
}
