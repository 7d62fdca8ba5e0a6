// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (the pipeline reports them after discarding the tree)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Project name \"{name}\" is not valid: {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Duplicate path in template: {path}")]
    DuplicatePath { path: String },

    #[error("Path escapes the workspace root: {path}")]
    AbsolutePathNotAllowed { path: String },

    // ========================================================================
    // Conflict Errors
    // ========================================================================
    #[error("Project \"{name}\" already exists in the workspace ({reason})")]
    DuplicateProject { name: String, reason: String },

    // ========================================================================
    // Rendering / Document Errors
    // ========================================================================
    #[error("Template '{file}' references unknown variable '{key}'")]
    MissingSubstitution { key: String, file: String },

    #[error("Cannot parse '{path}': {reason}")]
    InvalidDocument { path: String, reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidName { name, .. } => vec![
                format!("'{}' cannot be used as a library name", name),
                "Names start with a letter and contain letters, digits or dashes".into(),
                "Scoped names look like @scope/name".into(),
                "Reserved names: test, ember, ember-cli, vendor, app".into(),
            ],
            Self::DuplicateProject { name, .. } => vec![
                format!("A project named '{}' is already registered", name),
                "Pick another name or remove the existing entry from angular.json".into(),
            ],
            Self::MissingSubstitution { key, file } => vec![
                format!("'{}' uses ${{{}}} but no such variable exists", file, key),
                "Escape a literal placeholder as $${...}".into(),
            ],
            Self::InvalidDocument { path, .. } => vec![
                format!("Fix the JSON syntax in {}", path),
                "Comments and trailing commas are not accepted".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidName { .. } | Self::MissingRequiredField { .. } => {
                ErrorCategory::Validation
            }
            Self::DuplicateProject { .. } => ErrorCategory::Conflict,
            Self::InvalidDocument { .. } => ErrorCategory::Validation,
            Self::InvalidTemplate(_)
            | Self::DuplicatePath { .. }
            | Self::AbsolutePathNotAllowed { .. }
            | Self::MissingSubstitution { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    NotFound,
    Internal,
}
