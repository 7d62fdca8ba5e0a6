//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `libforge-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations under the workspace root
//!   - `TemplateSource`: Where the library template comes from
//!   - `ExternalGenerator`: The delegated `module` generator
//!   - `TaskRunner`: Executes deferred tasks after commit
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{ExternalGenerator, Filesystem, TaskRunner, TemplateSource, TreeDelta};

#[cfg(test)]
pub use output::MockExternalGenerator;
