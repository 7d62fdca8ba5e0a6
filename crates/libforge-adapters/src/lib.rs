//! Infrastructure adapters for libforge.
//!
//! This crate implements the ports defined in `libforge_core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod builtin_templates;
pub mod filesystem;
pub mod generator;
pub mod tasks;
pub mod template_loader;

// Re-export commonly used adapters
pub use builtin_templates::{BuiltinTemplateSource, TEMPLATES_DIR_ENV, resolve_template_source};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use generator::AngularModuleGenerator;
pub use tasks::ProcessTaskRunner;
pub use template_loader::DirectoryTemplateSource;
