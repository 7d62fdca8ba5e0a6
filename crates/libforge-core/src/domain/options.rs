//! Inputs accepted by the generator and the sub-configuration it hands to
//! the delegated module generator.

use serde::{Deserialize, Serialize};

/// Selector prefix used when the caller does not supply one.
pub const DEFAULT_PREFIX: &str = "lib";

/// What to do when a generated file lands on a path that already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// Abort with a merge conflict naming the first colliding path.
    #[default]
    Error,
    /// Replace the existing content.
    Overwrite,
    /// Keep the existing file untouched.
    Skip,
}

/// Options for generating a library project.
///
/// Field names serialize to the camelCase keys templates see
/// (`skipPackageJson`, `skipTsConfig`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LibraryOptions {
    /// Raw identifier, optionally scoped (`@scope/name`).
    pub name: String,
    /// Component selector prefix; `None` falls back to [`DEFAULT_PREFIX`].
    pub prefix: Option<String>,
    pub skip_package_json: bool,
    pub skip_ts_config: bool,
    pub skip_install: bool,
    /// Override applied when the default error-on-conflict merge fails.
    pub conflict_policy: MergePolicy,
}

impl LibraryOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn skip_package_json(mut self, skip: bool) -> Self {
        self.skip_package_json = skip;
        self
    }

    pub fn skip_ts_config(mut self, skip: bool) -> Self {
        self.skip_ts_config = skip;
        self
    }

    pub fn skip_install(mut self, skip: bool) -> Self {
        self.skip_install = skip;
        self
    }

    pub fn conflict_policy(mut self, policy: MergePolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    /// Effective prefix, with blank values treated as absent.
    pub fn effective_prefix(&self) -> &str {
        match self.prefix.as_deref() {
            Some(p) if !p.trim().is_empty() => p,
            _ => DEFAULT_PREFIX,
        }
    }

    /// The install task only makes sense when the manifest was patched.
    pub fn wants_install(&self) -> bool {
        !self.skip_package_json && !self.skip_install
    }
}

/// Sub-configuration passed to the delegated `module` generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleOptions {
    pub name: String,
    pub common_module: bool,
    pub flat: bool,
    pub path: String,
    pub project: String,
}
