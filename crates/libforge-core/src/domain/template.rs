//! Template model and placeholder expansion.
//!
//! A [`TemplateTree`] is a flat list of files whose paths and contents may
//! contain placeholders. Rendering is pure: it turns the tree plus a
//! [`RenderContext`] into [`GeneratedFile`]s without touching any tree.
//!
//! ## Placeholder syntax
//!
//! | Where    | Form                | Example                         |
//! |----------|---------------------|---------------------------------|
//! | content  | `${key}`            | `${packageName}`                |
//! | content  | `${key\|helper}`    | `${name\|classify}`             |
//! | content  | `$${`               | literal `${`                    |
//! | path     | `__key__`           | `__projectRoot__/package.js`    |
//! | path     | `__key@helper__`    | `__name@dasherize__.module.ts`  |
//!
//! A key with no value in the context is an error
//! ([`DomainError::MissingSubstitution`]); placeholders are never left in
//! the output.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::domain::{
    common::RelativePath,
    dependencies::versions,
    error::DomainError,
    naming::NamingContext,
    options::LibraryOptions,
    strings,
};

/// One template file before expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    pub path: String,
    pub content: String,
}

impl TemplateFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// The full set of files a template contributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateTree {
    files: Vec<TemplateFile>,
}

impl TemplateTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, file: TemplateFile) {
        self.files.push(file);
    }

    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.push(TemplateFile::new(path, content));
        self
    }

    pub fn files(&self) -> &[TemplateFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.files.is_empty() {
            return Err(DomainError::InvalidTemplate("template has no files".into()));
        }

        let mut seen = HashSet::new();
        for file in &self.files {
            if !seen.insert(file.path.as_str()) {
                return Err(DomainError::DuplicatePath {
                    path: file.path.clone(),
                });
            }
        }

        Ok(())
    }
}

/// A concrete file ready to be merged into a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    pub path: RelativePath,
    pub content: String,
}

impl GeneratedFile {
    pub fn new(path: impl AsRef<str>, content: impl Into<String>) -> Result<Self, DomainError> {
        Ok(Self {
            path: RelativePath::try_new(path)?,
            content: content.into(),
        })
    }
}

/// Variables available to placeholders.
///
/// Ordered so that error messages and debug output are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    variables: BTreeMap<String, String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for the library template: raw options, derived names and the
    /// tool-chain version.
    ///
    /// `name` is the scope-stripped short name, as the module generator
    /// sees it.
    pub fn for_library(naming: &NamingContext, options: &LibraryOptions) -> Self {
        Self::new()
            .with_variable("name", &naming.short_name)
            .with_variable("prefix", &naming.prefix)
            .with_variable("skipPackageJson", options.skip_package_json.to_string())
            .with_variable("skipTsConfig", options.skip_ts_config.to_string())
            .with_variable("skipInstall", options.skip_install.to_string())
            .with_variable("projectName", &naming.project_name)
            .with_variable("packageName", &naming.package_name)
            .with_variable("projectRoot", &naming.project_root)
            .with_variable("distRoot", &naming.dist_root)
            .with_variable("sourceDir", &naming.source_dir)
            .with_variable("folderName", &naming.folder_name)
            .with_variable("relativePathToWorkspaceRoot", &naming.relative_root_path)
            .with_variable("meteorPackageName", &naming.meteor_package_name)
            .with_variable("angularLatestVersion", versions::angular_plain())
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// Expand `${...}` placeholders in file content.
    pub fn render_content(&self, text: &str, file: &str) -> Result<String, DomainError> {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(idx) = rest.find('$') {
            out.push_str(&rest[..idx]);
            let tail = &rest[idx..];

            if let Some(after) = tail.strip_prefix("$${") {
                out.push_str("${");
                rest = after;
            } else if let Some(after) = tail.strip_prefix("${") {
                let end = after.find('}').ok_or_else(|| {
                    DomainError::InvalidTemplate(format!("unterminated placeholder in '{file}'"))
                })?;
                out.push_str(&self.resolve(&after[..end], '|', file)?);
                rest = &after[end + 1..];
            } else {
                out.push('$');
                rest = &tail[1..];
            }
        }

        out.push_str(rest);
        Ok(out)
    }

    /// Expand `__key__` / `__key@helper__` placeholders in a template path.
    pub fn render_path(&self, path: &str) -> Result<String, DomainError> {
        let mut out = String::with_capacity(path.len());
        let mut rest = path;

        while let Some(start) = rest.find("__") {
            let after = &rest[start + 2..];
            let Some(end) = after.find("__") else {
                break;
            };
            let inner = &after[..end];
            if inner.is_empty() || inner.contains('/') {
                out.push_str(&rest[..start + 2]);
                rest = after;
                continue;
            }

            out.push_str(&rest[..start]);
            out.push_str(&self.resolve(inner, '@', path)?);
            rest = &after[end + 2..];
        }

        out.push_str(rest);
        Ok(out)
    }

    fn resolve(&self, expr: &str, helper_sep: char, file: &str) -> Result<String, DomainError> {
        let (key, helper) = match expr.split_once(helper_sep) {
            Some((k, h)) => (k.trim(), Some(h.trim())),
            None => (expr.trim(), None),
        };

        let value = self
            .get(key)
            .ok_or_else(|| DomainError::MissingSubstitution {
                key: key.to_string(),
                file: file.to_string(),
            })?;

        match helper {
            None => Ok(value.to_string()),
            Some(h) => strings::apply(h, value).ok_or_else(|| {
                DomainError::InvalidTemplate(format!(
                    "unknown helper '{h}' in '{file}' (expected one of: {})",
                    strings::HELPERS.join(", ")
                ))
            }),
        }
    }
}

/// Expand every file of `tree`. Pure: no tree or filesystem access.
pub fn render(tree: &TemplateTree, ctx: &RenderContext) -> Result<Vec<GeneratedFile>, DomainError> {
    tree.validate()?;

    let mut rendered = Vec::with_capacity(tree.len());
    let mut seen = HashSet::new();

    for file in tree.files() {
        let path = RelativePath::try_new(ctx.render_path(&file.path)?)?;
        if !seen.insert(path.clone()) {
            return Err(DomainError::DuplicatePath {
                path: path.to_string(),
            });
        }
        let content = ctx.render_content(&file.content, &file.path)?;
        rendered.push(GeneratedFile { path, content });
    }

    Ok(rendered)
}
