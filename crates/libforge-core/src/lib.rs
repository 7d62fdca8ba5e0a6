//! libforge core - hexagonal architecture implementation
//!
//! This crate provides the domain and application layers for the libforge
//! Angular library generator, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            libforge-cli (CLI)           │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (LibraryService, RuleChain, merge)     │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, TemplateSource, Generator) │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     libforge-adapters (Infrastructure)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (naming, documents, workspace, render)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use libforge_core::prelude::*;
//!
//! # fn run(service: LibraryService) -> ForgeResult<()> {
//! let options = LibraryOptions::new("@acme/widgets").prefix("acme");
//! let report = service.generate(Path::new("."), &options)?;
//! for task in &report.tasks {
//!     println!("pending: {task}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        Change, GenerationReport, LibraryService, VirtualTree,
        ports::{ExternalGenerator, Filesystem, TaskRunner, TemplateSource, TreeDelta},
    };
    pub use crate::domain::{
        GeneratedFile, LibraryOptions, MergePolicy, ModuleOptions, NamingContext, RelativePath,
        Task, TemplateFile, TemplateTree,
    };
    pub use crate::error::{ForgeError, ForgeResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
