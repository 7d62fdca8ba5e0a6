//! Application layer for libforge.
//!
//! This layer contains:
//! - **Tree**: the staged view of the workspace and the merger
//! - **Config mutator / rules**: read-modify-write of JSON files and the
//!   all-or-nothing step chain built on it
//! - **Services**: Use case orchestration (LibraryService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! Business rules (naming, document transforms, rendering) live in
//! `crate::domain`; this layer decides when they run and against what.

pub mod config_mutator;
pub mod error;
pub mod ports;
pub mod rules;
pub mod services;
pub mod tree;

#[cfg(test)]
pub(crate) mod testing;

pub use services::{GenerationReport, LibraryService};

// Re-export port traits (for adapter implementation)
pub use ports::{ExternalGenerator, Filesystem, TaskRunner, TemplateSource, TreeDelta};

pub use error::ApplicationError;
pub use rules::{ChainReport, RuleChain};
pub use tree::{Change, MergeOutcome, VirtualTree};
