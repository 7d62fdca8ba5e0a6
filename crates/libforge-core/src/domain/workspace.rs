//! Workspace registry (`angular.json`) model.
//!
//! The workspace file is kept as a [`ConfigDocument`] so unrelated keys
//! survive registration untouched; only the project entry itself is typed.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::domain::{
    document::{ConfigDocument, ensure_object},
    error::DomainError,
};

/// Candidate workspace file names, in lookup order.
pub const WORKSPACE_FILES: [&str; 2] = ["angular.json", ".angular.json"];

/// `newProjectRoot` used when the workspace does not declare one.
pub const DEFAULT_NEW_PROJECT_ROOT: &str = "projects";

/// Builder identifiers wired into library projects.
pub mod builders {
    pub const NG_PACKAGR: &str = "@angular-devkit/build-ng-packagr:build";
    pub const KARMA: &str = "@angular-devkit/build-angular:karma";
    pub const TS_LINT: &str = "@angular-devkit/build-angular:tslint";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Application,
    Library,
}

/// One architect target: a builder plus its options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub builder: String,
    pub options: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Architect {
    pub build: TargetSpec,
    pub test: TargetSpec,
    pub lint: TargetSpec,
}

/// Entry added under `projects.<name>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    pub root: String,
    pub source_root: String,
    pub project_type: ProjectType,
    pub prefix: String,
    pub architect: Architect,
}

impl ProjectEntry {
    /// Library entry for a project rooted at `root`.
    pub fn library(root: &str, prefix: &str) -> Self {
        Self {
            root: root.to_string(),
            source_root: format!("{root}/client/src"),
            project_type: ProjectType::Library,
            prefix: prefix.to_string(),
            architect: Architect {
                build: TargetSpec {
                    builder: builders::NG_PACKAGR.into(),
                    options: json!({
                        "tsConfig": format!("{root}/tsconfig.lib.json"),
                        "project": format!("{root}/ng-package.json"),
                    }),
                },
                test: TargetSpec {
                    builder: builders::KARMA.into(),
                    options: json!({
                        "main": format!("{root}/src/test.ts"),
                        "tsConfig": format!("{root}/tsconfig.spec.json"),
                        "karmaConfig": format!("{root}/karma.conf.js"),
                    }),
                },
                lint: TargetSpec {
                    builder: builders::TS_LINT.into(),
                    options: json!({
                        "tsConfig": [
                            format!("{root}/tsconfig.lib.json"),
                            format!("{root}/tsconfig.spec.json"),
                        ],
                        "exclude": ["**/node_modules/**"],
                    }),
                },
            },
        }
    }
}

/// Typed view over a parsed workspace document.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceDocument {
    doc: ConfigDocument,
}

impl WorkspaceDocument {
    pub fn new(doc: ConfigDocument) -> Self {
        Self { doc }
    }

    pub fn into_inner(self) -> ConfigDocument {
        self.doc
    }

    /// Where new projects go. Blank or missing values fall back to
    /// [`DEFAULT_NEW_PROJECT_ROOT`].
    pub fn new_project_root(&self) -> &str {
        match self.doc.get("newProjectRoot").and_then(Value::as_str) {
            Some(root) if !root.trim().is_empty() => root,
            _ => DEFAULT_NEW_PROJECT_ROOT,
        }
    }

    pub fn project_names(&self) -> Vec<&str> {
        self.doc
            .get("projects")
            .and_then(Value::as_object)
            .map(|p| p.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn has_project(&self, name: &str) -> bool {
        self.doc
            .get("projects")
            .and_then(Value::as_object)
            .is_some_and(|p| p.contains_key(name))
    }

    /// Name of the project already rooted at `root`, if any.
    pub fn project_with_root(&self, root: &str) -> Option<&str> {
        let projects = self.doc.get("projects")?.as_object()?;
        projects.iter().find_map(|(name, entry)| {
            let existing = entry.get("root")?.as_str()?;
            (existing.trim_end_matches('/') == root.trim_end_matches('/')).then_some(name.as_str())
        })
    }

    /// Insert `entry` under `projects.<name>`.
    ///
    /// Fails without touching the document when the name or the root is
    /// already taken.
    pub fn register(&mut self, name: &str, entry: &ProjectEntry) -> Result<(), DomainError> {
        if self.has_project(name) {
            return Err(DomainError::DuplicateProject {
                name: name.to_string(),
                reason: "name already registered".into(),
            });
        }
        if let Some(other) = self.project_with_root(&entry.root) {
            return Err(DomainError::DuplicateProject {
                name: name.to_string(),
                reason: format!("root '{}' is used by project '{}'", entry.root, other),
            });
        }

        let value = serde_json::to_value(entry).map_err(|e| DomainError::InvalidDocument {
            path: self.doc.path().to_string(),
            reason: e.to_string(),
        })?;

        let path = self.doc.path().to_string();
        let projects = ensure_object(&path, self.doc.root_mut(), "projects")?;
        projects.insert(name.to_string(), value);
        Ok(())
    }
}
