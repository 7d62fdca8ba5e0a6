//! Filesystem-based template source.
//!
//! Reads a library template from a directory. Every regular file under the
//! directory becomes one template file; its relative path may carry
//! `__key__` placeholders and its content `${key}` placeholders.
//!
//! # Directory layout expected
//!
//! ```text
//! my-template/
//! ├── template.toml                 ← optional manifest, never rendered
//! └── __projectRoot__/
//!     ├── package.js
//!     ├── ng-package.json
//!     └── client/src/public_api.ts
//! ```
//!
//! # `template.toml` format
//!
//! ```toml
//! [template]
//! name        = "meteor-angular-library"
//! version     = "1.0.0"
//! description = "Angular library packaged for ng-packagr and Meteor"  # optional
//!
//! [files]
//! exclude = ["**/*.orig"]   # optional; `*` and `**` globs on relative paths
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use glob_match::glob_match;
use serde::Deserialize;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use libforge_core::{
    application::ports::TemplateSource,
    domain::{DomainError, TemplateFile, TemplateTree},
    error::ForgeResult,
};

const MANIFEST_FILE: &str = "template.toml";

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised representation of a `template.toml` file.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TemplateManifest {
    pub template: Option<TemplateSection>,
    #[serde(default)]
    pub files: FilesSection,
}

/// `[template]` section: identity of the template.
#[derive(Debug, Deserialize, Clone)]
pub struct TemplateSection {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
}

/// `[files]` section.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct FilesSection {
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl TemplateManifest {
    pub fn parse(raw: &str, origin: &Path) -> Result<Self, DomainError> {
        toml::from_str(raw).map_err(|e| {
            DomainError::InvalidTemplate(format!("invalid '{}': {e}", origin.display()))
        })
    }

    /// `name@version`, or `None` without a `[template]` section.
    pub fn label(&self) -> Option<String> {
        self.template.as_ref().map(|t| match &t.version {
            Some(v) => format!("{}@{}", t.name, v),
            None => t.name.clone(),
        })
    }

    fn excludes(&self, path: &str) -> bool {
        self.files.exclude.iter().any(|pattern| glob_match(pattern, path))
    }
}

// ── Source ────────────────────────────────────────────────────────────────────

/// Template read from a directory on disk at [`load`](TemplateSource::load) time.
#[derive(Debug, Clone)]
pub struct DirectoryTemplateSource {
    dir: PathBuf,
}

impl DirectoryTemplateSource {
    /// The directory does not need to exist yet; `load` reports it.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn manifest(&self) -> Result<TemplateManifest, DomainError> {
        let path = self.dir.join(MANIFEST_FILE);
        match fs::read_to_string(&path) {
            Ok(raw) => TemplateManifest::parse(&raw, &path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TemplateManifest::default()),
            Err(e) => Err(DomainError::InvalidTemplate(format!(
                "failed to read '{}': {e}",
                path.display()
            ))),
        }
    }

    fn read_tree(&self) -> Result<TemplateTree, DomainError> {
        if !self.dir.is_dir() {
            return Err(DomainError::InvalidTemplate(format!(
                "template directory not found: {}",
                self.dir.display()
            )));
        }

        let manifest = self.manifest()?;
        let mut tree = TemplateTree::new();

        let walker = WalkDir::new(&self.dir)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter();
        for entry in walker {
            let entry = entry
                .map_err(|e| DomainError::InvalidTemplate(format!("directory walk error: {e}")))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let rel = entry.path().strip_prefix(&self.dir).map_err(|_| {
                DomainError::InvalidTemplate(format!(
                    "failed to relativise '{}' against '{}'",
                    entry.path().display(),
                    self.dir.display()
                ))
            })?;
            let path = normalize_path(&rel.to_string_lossy());

            if path == MANIFEST_FILE || manifest.excludes(&path) {
                debug!(%path, "Not a template file");
                continue;
            }

            let content = fs::read_to_string(entry.path()).map_err(|e| {
                DomainError::InvalidTemplate(format!("failed to read file '{path}': {e}"))
            })?;
            tree.push(TemplateFile::new(path, content));
        }

        tree.validate()?;
        Ok(tree)
    }
}

impl TemplateSource for DirectoryTemplateSource {
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    fn load(&self) -> ForgeResult<TemplateTree> {
        let tree = self.read_tree()?;
        debug!(files = tree.len(), "Template directory loaded");
        Ok(tree)
    }

    fn describe(&self) -> String {
        match self.manifest().ok().and_then(|m| m.label()) {
            Some(label) => format!("{label} ({})", self.dir.display()),
            None => self.dir.display().to_string(),
        }
    }
}

fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_template_dir(files: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for (path, content) in files {
            let full = temp.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
        temp
    }

    #[test]
    fn missing_directory_is_an_error() {
        let source = DirectoryTemplateSource::new("/definitely/not/here");
        assert!(source.load().is_err());
    }

    #[test]
    fn empty_directory_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(DirectoryTemplateSource::new(temp.path()).load().is_err());
    }

    #[test]
    fn nested_files_are_discovered_in_order() {
        let temp = make_template_dir(&[
            ("__projectRoot__/src/test.ts", "t"),
            ("__projectRoot__/package.js", "p"),
            ("__projectRoot__/client/src/public_api.ts", "a"),
        ]);

        let tree = DirectoryTemplateSource::new(temp.path()).load().unwrap();
        let paths: Vec<_> = tree.files().iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "__projectRoot__/client/src/public_api.ts",
                "__projectRoot__/package.js",
                "__projectRoot__/src/test.ts",
            ]
        );
    }

    #[test]
    fn manifest_is_read_and_never_rendered() {
        let temp = make_template_dir(&[
            (
                "template.toml",
                "[template]\nname = \"mine\"\nversion = \"2.0.0\"\n\n[files]\nexclude = [\"**/*.orig\"]\n",
            ),
            ("__projectRoot__/README.md", "# ${packageName}"),
            ("__projectRoot__/docs/old.md.orig", "stale"),
        ]);
        let source = DirectoryTemplateSource::new(temp.path());

        let tree = source.load().unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.files()[0].path, "__projectRoot__/README.md");
        assert!(source.describe().starts_with("mine@2.0.0"));
    }

    #[test]
    fn malformed_manifest_is_an_error() {
        let temp = make_template_dir(&[("template.toml", "[template"), ("a.txt", "x")]);
        assert!(DirectoryTemplateSource::new(temp.path()).load().is_err());
    }

    fn manifest_excluding(patterns: &[&str]) -> TemplateManifest {
        TemplateManifest {
            template: None,
            files: FilesSection {
                exclude: patterns.iter().map(|p| p.to_string()).collect(),
            },
        }
    }

    #[test]
    fn exclude_patterns() {
        let manifest = manifest_excluding(&["*.orig", "docs/**"]);
        assert!(manifest.excludes("a.orig"));
        assert!(!manifest.excludes("dir/a.orig"));
        assert!(manifest.excludes("docs/a/b.md"));
        assert!(!manifest.excludes("src/docs.md"));

        let nested = manifest_excluding(&["**/*.orig"]);
        assert!(nested.excludes("dir/sub/a.orig"));
        assert!(!nested.excludes("dir/sub/a.ts"));
    }

    #[test]
    fn long_paths_do_not_blow_up_matching() {
        let path = "a".repeat(40);
        let manifest = manifest_excluding(&["**/**/**/**/**/**/**/*.orig", "*a*a*a*a*a*a*a*a*b"]);

        let started = std::time::Instant::now();
        assert!(!manifest.excludes(&path));
        assert!(started.elapsed() < std::time::Duration::from_millis(500));
    }
}
