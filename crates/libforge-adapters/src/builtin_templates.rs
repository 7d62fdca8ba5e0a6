//! Built-in library template and template source resolution.
//!
//! The library skeleton under `templates/library/` is compiled into the
//! binary, so `libforge` works without any template directory on disk.
//!
//! # Template resolution order
//!
//! [`resolve_template_source`] picks the first of:
//!
//! 1. An explicit directory (`--templates` or `templates.local_path`).
//! 2. **`$LIBFORGE_TEMPLATES_DIR`**: environment variable override.
//! 3. The embedded skeleton.
//!
//! An explicit or environment directory that does not exist is an error,
//! not a silent fallback.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use libforge_core::{
    application::ports::TemplateSource,
    domain::{DomainError, TemplateTree},
    error::ForgeResult,
};

use crate::template_loader::{DirectoryTemplateSource, TemplateManifest};

/// Environment variable naming a template directory.
pub const TEMPLATES_DIR_ENV: &str = "LIBFORGE_TEMPLATES_DIR";

macro_rules! embed {
    ($($path:literal),+ $(,)?) => {
        &[$(($path, include_str!(concat!("../templates/library/", $path)))),+]
    };
}

const MANIFEST: &str = include_str!("../templates/library/template.toml");

const LIBRARY_FILES: &[(&str, &str)] = embed![
    "__projectRoot__/README.md",
    "__projectRoot__/client/src/public_api.ts",
    "__projectRoot__/karma.conf.js",
    "__projectRoot__/ng-package.json",
    "__projectRoot__/package.js",
    "__projectRoot__/package.json",
    "__projectRoot__/src/test.ts",
    "__projectRoot__/tsconfig.lib.json",
    "__projectRoot__/tsconfig.spec.json",
    "__projectRoot__/tslint.json",
];

/// The embedded Meteor/Angular library skeleton.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTemplateSource;

impl BuiltinTemplateSource {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateSource for BuiltinTemplateSource {
    fn load(&self) -> ForgeResult<TemplateTree> {
        let tree = LIBRARY_FILES
            .iter()
            .fold(TemplateTree::new(), |tree, (path, content)| {
                tree.with_file(*path, *content)
            });
        tree.validate()?;
        Ok(tree)
    }

    fn describe(&self) -> String {
        let label = TemplateManifest::parse(MANIFEST, Path::new("template.toml"))
            .ok()
            .and_then(|m| m.label())
            .unwrap_or_else(|| "library".into());
        format!("{label} (built-in)")
    }
}

/// Pick the template source per the module-level resolution order.
#[instrument]
pub fn resolve_template_source(explicit: Option<&Path>) -> ForgeResult<Box<dyn TemplateSource>> {
    let env_dir = std::env::var_os(TEMPLATES_DIR_ENV).map(PathBuf::from);
    resolve_from(explicit.map(Path::to_path_buf), env_dir)
}

fn resolve_from(
    explicit: Option<PathBuf>,
    env_dir: Option<PathBuf>,
) -> ForgeResult<Box<dyn TemplateSource>> {
    let candidate = explicit
        .map(|p| (p, "explicit"))
        .or_else(|| env_dir.map(|p| (p, TEMPLATES_DIR_ENV)));

    match candidate {
        Some((dir, origin)) => {
            debug!(path = %dir.display(), origin, "Candidate template directory");
            if !dir.is_dir() {
                return Err(DomainError::InvalidTemplate(format!(
                    "template directory not found: {} (from {origin})",
                    dir.display()
                ))
                .into());
            }
            info!(path = %dir.display(), "Using template directory");
            Ok(Box::new(DirectoryTemplateSource::new(dir)))
        }
        None => {
            debug!("Using built-in template");
            Ok(Box::new(BuiltinTemplateSource::new()))
        }
    }
}
