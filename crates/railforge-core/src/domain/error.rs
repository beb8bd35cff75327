//! Domain layer errors.

use thiserror::Error;

pub use crate::error::ErrorCategory;
use crate::domain::textedit::EditError;

/// Errors raised by pure domain logic.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// An anchored text edit could not find its marker.
    #[error(transparent)]
    Edit(#[from] EditError),

    /// The framework version string could not be parsed.
    #[error("could not parse a Rails version out of {output:?}")]
    UnparseableVersion { output: String },

    /// The hardcoded version requirement itself is malformed.
    #[error("invalid version requirement {requirement:?}")]
    InvalidRequirement { requirement: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Edit(EditError::MarkerNotFound { marker, file }) => vec![
                format!("The marker {marker:?} was not found in {file}"),
                "The target project layout differs from a freshly generated Rails app".into(),
                "Re-run against an unmodified `rails new` output".into(),
            ],
            Self::UnparseableVersion { .. } => vec![
                "Could not determine the installed Rails version".into(),
                "Check that `rails --version` prints something like `Rails 6.1.4`".into(),
            ],
            Self::InvalidRequirement { .. } => vec![
                "The built-in version requirement is malformed".into(),
                "This is a bug, please report it".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Edit(_) => ErrorCategory::Validation,
            Self::UnparseableVersion { .. } => ErrorCategory::Validation,
            Self::InvalidRequirement { .. } => ErrorCategory::Internal,
        }
    }
}
