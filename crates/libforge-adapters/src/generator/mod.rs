//! Delegated generators.

mod module;

pub use module::AngularModuleGenerator;
