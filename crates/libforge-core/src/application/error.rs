//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::{ErrorCategory, ForgeError};

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// No `angular.json` / `.angular.json` under the workspace root.
    #[error("Could not find an Angular workspace configuration in {root}")]
    WorkspaceNotFound { root: PathBuf },

    /// A generated file collides with an existing one.
    #[error("Merge conflict: '{path}' already exists")]
    MergeConflict { path: String },

    /// The delegated generator failed; its error is carried unchanged.
    #[error("External generator '{generator}' failed: {source}")]
    DelegateGenerator {
        generator: String,
        #[source]
        source: Box<ForgeError>,
    },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Writing the staged tree to disk failed; written files were rolled back.
    #[error("Commit failed at {path}: {reason}")]
    CommitFailed { path: String, reason: String },

    /// Rollback failed (best-effort cleanup failed).
    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed { path: String, reason: String },

    /// A post-generation task failed.
    #[error("Task '{task}' failed: {reason}")]
    TaskFailed { task: String, reason: String },

    /// Store access failed (lock poisoned, etc.).
    #[error("Filesystem state is unavailable (lock poisoned)")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::WorkspaceNotFound { root } => vec![
                format!("No angular.json found in {}", root.display()),
                "Run the command from the workspace root".into(),
                "Or pass --workspace <DIR>".into(),
            ],
            Self::MergeConflict { path } => vec![
                format!("'{}' would be overwritten", path),
                "Use --force to overwrite existing files (destructive)".into(),
                "Use --skip-existing to keep existing files".into(),
                "Choose a different library name".into(),
            ],
            Self::DelegateGenerator { source, .. } => source.suggestions(),
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::CommitFailed { .. } => vec![
                "No files were left half-written".into(),
                "Check permissions and free disk space, then retry".into(),
            ],
            Self::TaskFailed { task, .. } => vec![
                format!("The files were generated, but '{}' did not finish", task),
                "Run the package manager's install command manually".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::WorkspaceNotFound { .. } => ErrorCategory::NotFound,
            Self::MergeConflict { .. } => ErrorCategory::Conflict,
            Self::DelegateGenerator { source, .. } => source.category(),
            Self::FilesystemError { .. }
            | Self::CommitFailed { .. }
            | Self::RollbackFailed { .. }
            | Self::StoreLockError => ErrorCategory::Internal,
            Self::TaskFailed { .. } => ErrorCategory::External,
        }
    }
}
