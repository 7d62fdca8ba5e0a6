//! Default `module` generator: one NgModule file for the new library.

use tracing::{debug, instrument};

use libforge_core::{
    application::{ApplicationError, ports::{ExternalGenerator, TreeDelta}, tree::VirtualTree},
    domain::{
        ConfigDocument, DomainError, GeneratedFile, ModuleOptions, RelativePath,
        WorkspaceDocument, strings, workspace::WORKSPACE_FILES,
    },
    error::ForgeResult,
};

/// Writes `<path>/<name>.module.ts` (or `<path>/<name>/<name>.module.ts`
/// when not flat) declaring `export class <Name>Module {}`.
///
/// Refuses to run when `options.project` is not registered in the
/// workspace or the module file already exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct AngularModuleGenerator;

impl AngularModuleGenerator {
    pub fn new() -> Self {
        Self
    }

    fn module_path(options: &ModuleOptions) -> Result<RelativePath, DomainError> {
        let file_stem = strings::dasherize(&options.name);
        let dir = RelativePath::try_new(&options.path)?;
        if options.flat {
            dir.join(format!("{file_stem}.module.ts"))
        } else {
            dir.join(format!("{file_stem}/{file_stem}.module.ts"))
        }
    }

    fn render(options: &ModuleOptions) -> String {
        let class_name = format!("{}Module", strings::classify(&options.name));
        let (import, imports) = if options.common_module {
            ("import { CommonModule } from '@angular/common';\n", "\n    CommonModule\n  ")
        } else {
            ("", "")
        };

        format!(
            "import {{ NgModule }} from '@angular/core';\n\
             {import}\n\
             @NgModule({{\n  \
               imports: [{imports}],\n  \
               declarations: [],\n  \
               exports: []\n\
             }})\n\
             export class {class_name} {{ }}\n"
        )
    }
}

impl ExternalGenerator for AngularModuleGenerator {
    #[instrument(skip_all, fields(name = %options.name, project = %options.project))]
    fn generate(&self, tree: &VirtualTree, options: &ModuleOptions) -> ForgeResult<TreeDelta> {
        if options.name.trim().is_empty() {
            return Err(DomainError::MissingRequiredField { field: "name" }.into());
        }

        ensure_registered(tree, &options.project)?;

        let path = Self::module_path(options)?;
        if tree.exists(&path) {
            return Err(ApplicationError::MergeConflict {
                path: path.to_string(),
            }
            .into());
        }

        debug!(%path, "Module file planned");
        Ok(TreeDelta::new(vec![GeneratedFile::new(
            path,
            Self::render(options),
        )?]))
    }
}

fn ensure_registered(tree: &VirtualTree, project: &str) -> ForgeResult<()> {
    for candidate in WORKSPACE_FILES {
        let Some(text) = tree.read_str(candidate)? else {
            continue;
        };
        let workspace = WorkspaceDocument::new(ConfigDocument::parse(candidate, &text)?);
        if workspace.has_project(project) {
            return Ok(());
        }
        return Err(DomainError::InvalidDocument {
            path: candidate.to_string(),
            reason: format!("project '{project}' is not registered"),
        }
        .into());
    }

    Err(ApplicationError::WorkspaceNotFound {
        root: tree.root().to_path_buf(),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use std::{path::Path, sync::Arc};

    use super::*;
    use crate::MemoryFilesystem;

    fn tree_with_project(project: &str) -> VirtualTree {
        let fs = MemoryFilesystem::new();
        fs.insert(
            "/ws/angular.json",
            format!("{{\"projects\": {{\"{project}\": {{\"root\": \"projects/x\"}}}}}}"),
        );
        VirtualTree::open(Arc::new(fs), Path::new("/ws"))
    }

    fn options(flat: bool, common_module: bool) -> ModuleOptions {
        ModuleOptions {
            name: "widgets".into(),
            common_module,
            flat,
            path: "projects/acme-widgets/client/src/lib".into(),
            project: "@acme/widgets".into(),
        }
    }

    #[test]
    fn flat_module_without_common_module() {
        let tree = tree_with_project("@acme/widgets");
        let delta = AngularModuleGenerator.generate(&tree, &options(true, false)).unwrap();

        assert_eq!(delta.files.len(), 1);
        let file = &delta.files[0];
        assert_eq!(
            file.path.as_str(),
            "projects/acme-widgets/client/src/lib/widgets.module.ts"
        );
        assert!(file.content.contains("export class WidgetsModule { }"));
        assert!(file.content.contains("imports: []"));
        assert!(!file.content.contains("CommonModule"));
    }

    #[test]
    fn nested_module_with_common_module() {
        let tree = tree_with_project("@acme/widgets");
        let delta = AngularModuleGenerator.generate(&tree, &options(false, true)).unwrap();

        let file = &delta.files[0];
        assert!(file.path.as_str().ends_with("lib/widgets/widgets.module.ts"));
        assert!(file.content.contains("import { CommonModule } from '@angular/common';"));
    }

    #[test]
    fn unregistered_project_is_refused() {
        let tree = tree_with_project("other");
        let err = AngularModuleGenerator
            .generate(&tree, &options(true, false))
            .unwrap_err();
        assert!(err.to_string().contains("not registered"));
    }

    #[test]
    fn existing_module_file_is_refused() {
        let mut tree = tree_with_project("@acme/widgets");
        tree.create(
            RelativePath::try_new("projects/acme-widgets/client/src/lib/widgets.module.ts").unwrap(),
            "// mine",
        )
        .unwrap();

        assert!(AngularModuleGenerator.generate(&tree, &options(true, false)).is_err());
    }
}
