// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for libforge.
//!
//! Pure logic only: name derivation, JSON document transforms, workspace
//! registration and template expansion. Reading and writing files happens
//! in the application layer through ports.
//!
//! - **No I/O**: every function here takes and returns values
//! - **Deterministic**: same inputs, same outputs (no clocks, no env)
//! - **Cloneable errors**: `DomainError` is `Clone + PartialEq`

pub mod common;
pub mod compiler;
pub mod dependencies;
pub mod document;
pub mod error;
pub mod naming;
pub mod options;
pub mod strings;
pub mod task;
pub mod template;
pub mod workspace;

pub use common::RelativePath;
pub use dependencies::{DependencyKind, NodeDependency};
pub use document::ConfigDocument;
pub use error::{DomainError, ErrorCategory};
pub use naming::NamingContext;
pub use options::{LibraryOptions, MergePolicy, ModuleOptions};
pub use task::Task;
pub use template::{GeneratedFile, RenderContext, TemplateFile, TemplateTree};
pub use workspace::{ProjectEntry, ProjectType, WorkspaceDocument};
