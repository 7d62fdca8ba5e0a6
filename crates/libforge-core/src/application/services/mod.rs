//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "generate a library".

pub mod library_service;

pub use library_service::{GenerationReport, LibraryService};
