//! Application layer errors.
//!
//! Failures of the build and apply orchestration. Malformed declarations and
//! plans are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during build and apply.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// The sequence names a declaration the store does not hold.
    #[error("Declaration '{name}' not found")]
    DeclarationNotFound { name: String },

    /// The declaration exists but has no element with that name.
    #[error("Element '{element}' not found in declaration '{declaration}'")]
    ElementNotFound {
        declaration: String,
        element: String,
    },

    /// Required arguments were not supplied.
    #[error("Missing arguments for {step}: {}", names.join(", "))]
    MissingArgument { step: String, names: Vec<String> },

    /// Operator argument input was not a JSON object.
    #[error("Invalid argument input: {reason}")]
    InvalidArgumentInput { reason: String },

    /// Operator case selection was not a listed number.
    #[error("Invalid selection '{input}', expected a number between 1 and {options}")]
    InvalidSelection { input: String, options: usize },

    /// Template parse or execution failed.
    #[error("Failed to render {template}: {reason}")]
    Render { template: String, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    Filesystem { path: PathBuf, reason: String },

    /// Persisting an audit state failed.
    #[error("Failed to record state {index} ({step}): {reason}")]
    Recording {
        index: usize,
        step: String,
        reason: String,
    },

    /// Declaration files could not be read or decoded.
    #[error("Failed to load declarations from {path}: {reason}")]
    Load { path: PathBuf, reason: String },
}

impl ApplicationError {
    pub fn filesystem(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Filesystem {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::DeclarationNotFound { name } => vec![
                format!("No declaration named '{}' is loaded", name),
                "Try: gojen list to see available declarations".into(),
            ],
            Self::ElementNotFound { declaration, .. } => vec![
                format!("Check the elements of '{}'", declaration),
                "Try: gojen list to see available elements".into(),
            ],
            Self::MissingArgument { names, .. } => vec![
                format!("Provide: {}", names.join(", ")),
                "Pass values with --arg KEY=VALUE".into(),
            ],
            Self::InvalidArgumentInput { .. } => {
                vec![r#"Answer with a JSON object, e.g. {"Domain": "user"}"#.into()]
            }
            Self::InvalidSelection { options, .. } => {
                vec![format!("Enter a number between 1 and {}", options)]
            }
            Self::Render { template, .. } => vec![
                format!("Check the template syntax of {}", template),
                "Undefined arguments render empty; filters must exist".into(),
            ],
            Self::Filesystem { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::Recording { .. } => vec![
                "Check the store.state_dir setting".into(),
                "Or disable audit files with --no-record".into(),
            ],
            Self::Load { path, .. } => vec![
                format!("Check the declaration file {}", path.display()),
                "Declaration files must be .json, .yaml or .yml".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DeclarationNotFound { .. } | Self::ElementNotFound { .. } => {
                ErrorCategory::NotFound
            }
            Self::MissingArgument { .. }
            | Self::InvalidArgumentInput { .. }
            | Self::InvalidSelection { .. } => ErrorCategory::Input,
            Self::Render { .. } | Self::Load { .. } => ErrorCategory::Validation,
            Self::Filesystem { .. } | Self::Recording { .. } => ErrorCategory::Internal,
        }
    }
}
