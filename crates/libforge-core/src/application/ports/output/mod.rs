//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `libforge-adapters` crate provides implementations.

use std::path::Path;

use crate::application::tree::VirtualTree;
use crate::domain::{GeneratedFile, ModuleOptions, Task, TemplateTree};
use crate::error::ForgeResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `libforge_adapters::filesystem::LocalFilesystem` (production)
/// - `libforge_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Paths handed to the port are already joined onto the workspace root.
pub trait Filesystem: Send + Sync {
    /// Read a text file. `Ok(None)` when the file does not exist.
    fn read_file(&self, path: &Path) -> ForgeResult<Option<String>>;

    /// Write content to a file. The parent directory must exist.
    fn write_file(&self, path: &Path, content: &str) -> ForgeResult<()>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> ForgeResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> ForgeResult<()>;

    /// Remove an empty directory.
    fn remove_dir(&self, path: &Path) -> ForgeResult<()>;
}

/// Port for the library template.
///
/// Implemented by:
/// - `libforge_adapters::BuiltinTemplateSource` (embedded skeleton)
/// - `libforge_adapters::DirectoryTemplateSource` (user template directory)
pub trait TemplateSource: Send + Sync {
    /// Load every template file, paths relative to the template root.
    fn load(&self) -> ForgeResult<TemplateTree>;

    /// Where the template came from, for logs and `--dry-run` output.
    fn describe(&self) -> String;
}

/// Files produced by a delegated generator, to be merged into the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeDelta {
    pub files: Vec<GeneratedFile>,
}

impl TreeDelta {
    pub fn new(files: Vec<GeneratedFile>) -> Self {
        Self { files }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Port for the delegated `module` generator.
///
/// The generator sees the tree as staged so far (including the freshly
/// registered project) and returns the files it wants to add. It never
/// mutates the tree itself.
#[cfg_attr(test, mockall::automock)]
pub trait ExternalGenerator: Send + Sync {
    fn generate(&self, tree: &VirtualTree, options: &ModuleOptions) -> ForgeResult<TreeDelta>;
}

/// Port for executing deferred tasks once the tree is on disk.
pub trait TaskRunner: Send + Sync {
    fn run(&self, task: &Task, workspace_root: &Path) -> ForgeResult<()>;
}
