// ============================================================================
// domain/error.rs - DECLARATION & SEQUENCE ERROR DOMAIN
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (kept on build reports)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid declaration '{declaration}': {reason}")]
    InvalidDeclaration { declaration: String, reason: String },

    #[error("Invalid element '{element}' of declaration '{declaration}': {reason}")]
    InvalidElement {
        declaration: String,
        element: String,
        reason: String,
    },

    #[error("'{value}' is not a valid strategy, try [{}]", valid.join(", "))]
    InvalidStrategy {
        value: String,
        valid: Vec<&'static str>,
    },

    #[error("Invalid sequence plan: {0}")]
    InvalidPlan(String),

    // ========================================================================
    // Dependency Errors
    // ========================================================================
    #[error("Declaration dependency cycle: {}", path.join(" -> "))]
    DependencyCycle { path: Vec<String> },

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidDeclaration { declaration, .. } => vec![
                format!("Check the declaration file that defines '{}'", declaration),
                "A declaration needs a name and at least one element".into(),
            ],
            Self::InvalidElement { element, .. } => vec![
                format!("Check element '{}'", element),
                "Every element needs a name and a path (its own or the declaration's)".into(),
            ],
            Self::InvalidStrategy { valid, .. } => vec![
                "Supported strategies:".into(),
                format!("  • {}", valid.join(", ")),
            ],
            Self::DependencyCycle { path } => vec![
                format!("Break the cycle between: {}", path.join(", ")),
                "Dependencies must form a DAG".into(),
            ],
            Self::InvalidPlan(msg) => vec![
                "Check your sequence file".into(),
                format!("Details: {}", msg),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidDeclaration { .. }
            | Self::InvalidElement { .. }
            | Self::InvalidStrategy { .. }
            | Self::InvalidPlan(_)
            | Self::MissingRequiredField { .. } => ErrorCategory::Validation,
            Self::DependencyCycle { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
