//! Library Service - the generation pipeline.
//!
//! One run, in order:
//! 1. Validate the name and locate the workspace document
//! 2. Render the library template and merge it into the tree
//! 3. Register the project in the workspace document
//! 4. Add tool-chain dev dependencies to `package.json` (optional)
//! 5. Map the package name onto its dist output in `tsconfig.json` (optional)
//! 6. Delegate the library's NgModule to the `module` generator
//! 7. Queue the package install (optional)
//!
//! Steps 2-7 run as one [`RuleChain`]: any failure discards the whole tree.

use std::{path::Path, sync::Arc};

use chrono::{Datelike, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError, config_mutator,
        ports::{ExternalGenerator, Filesystem, TemplateSource},
        rules::RuleChain,
        tree::{self, Change, VirtualTree},
    },
    domain::{
        DomainError, LibraryOptions, MergePolicy, ModuleOptions, NamingContext, ProjectEntry,
        RenderContext, Task, WorkspaceDocument, compiler, dependencies,
        document::ConfigDocument,
        naming,
        template::{self, GeneratedFile},
        workspace::WORKSPACE_FILES,
    },
    error::{ForgeError, ForgeResult},
};

const MODULE_GENERATOR: &str = "module";

/// Outcome of a pipeline run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    pub run_id: Uuid,
    pub naming: NamingContext,
    /// Workspace document that received the project entry.
    pub workspace_file: String,
    pub template: String,
    /// Net filesystem changes, in path order.
    pub changes: Vec<Change>,
    /// Deferred work for the host, to run after commit.
    pub tasks: Vec<Task>,
    pub applied: Vec<&'static str>,
    pub skipped: Vec<&'static str>,
    /// `false` for [`LibraryService::plan`].
    pub committed: bool,
}

/// Result of the Validate step: everything later steps need, computed once.
struct Validated {
    workspace_file: String,
    naming: NamingContext,
}

/// Generates an Angular library inside an existing workspace.
pub struct LibraryService {
    filesystem: Arc<dyn Filesystem>,
    templates: Box<dyn TemplateSource>,
    generator: Box<dyn ExternalGenerator>,
}

impl LibraryService {
    pub fn new(
        filesystem: Arc<dyn Filesystem>,
        templates: Box<dyn TemplateSource>,
        generator: Box<dyn ExternalGenerator>,
    ) -> Self {
        Self {
            filesystem,
            templates,
            generator,
        }
    }

    /// Run the pipeline and write the result under `workspace_root`.
    #[instrument(
        skip_all,
        fields(
            name = %options.name,
            workspace = %workspace_root.display()
        )
    )]
    pub fn generate(
        &self,
        workspace_root: &Path,
        options: &LibraryOptions,
    ) -> ForgeResult<GenerationReport> {
        let (staged, mut report) = self.stage(workspace_root, options)?;

        report.changes = staged.commit()?;
        report.committed = true;

        info!(
            run_id = %report.run_id,
            changes = report.changes.len(),
            tasks = report.tasks.len(),
            "Library generated"
        );
        Ok(report)
    }

    /// Run the pipeline without writing anything (dry run).
    #[instrument(
        skip_all,
        fields(
            name = %options.name,
            workspace = %workspace_root.display()
        )
    )]
    pub fn plan(
        &self,
        workspace_root: &Path,
        options: &LibraryOptions,
    ) -> ForgeResult<GenerationReport> {
        let (staged, mut report) = self.stage(workspace_root, options)?;
        report.changes = staged.changes()?;
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn stage(
        &self,
        workspace_root: &Path,
        options: &LibraryOptions,
    ) -> ForgeResult<(VirtualTree, GenerationReport)> {
        let run_id = Uuid::new_v4();
        let mut staged = VirtualTree::open(Arc::clone(&self.filesystem), workspace_root);

        let Validated {
            workspace_file,
            naming,
        } = self.validate(&staged, options)?;
        info!(
            %run_id,
            project = %naming.project_name,
            root = %naming.project_root,
            "Validated"
        );

        let entry = ProjectEntry::library(&naming.project_root, &naming.prefix);
        let module_options = ModuleOptions {
            name: naming.short_name.clone(),
            common_module: false,
            flat: true,
            path: naming.source_dir.clone(),
            project: naming.project_name.clone(),
        };

        let chain = RuleChain::new()
            .then("render-template", |t, _| {
                let files = self.render(&naming, options)?;
                merge_with_retry(t, &files, options.conflict_policy)
            })
            .then("register-project", |t, _| {
                register_project(t, &workspace_file, &naming.project_name, &entry)
            })
            .then_if(!options.skip_package_json, "add-dependencies", |t, _| {
                let deps = dependencies::library_dev_dependencies();
                config_mutator::mutate(t, dependencies::PACKAGE_JSON_PATH, |doc| {
                    Ok(dependencies::add_dependencies(doc, &deps)? > 0)
                })
                .map(drop)
            })
            .then_if(!options.skip_ts_config, "add-path-mapping", |t, _| {
                config_mutator::mutate(t, compiler::TSCONFIG_PATH, |doc| {
                    compiler::add_path_mapping(doc, &naming.package_name, &naming.dist_root)
                })
                .map(drop)
            })
            .then("module-generator", |t, _| self.delegate(t, &module_options))
            .then_if(options.wants_install(), "schedule-install", |_, tasks| {
                tasks.push(Task::node_package_install());
                Ok(())
            });

        let chain_report = chain.run(&mut staged)?;

        let report = GenerationReport {
            run_id,
            naming,
            workspace_file,
            template: self.templates.describe(),
            changes: Vec::new(),
            tasks: chain_report.tasks,
            applied: chain_report.applied,
            skipped: chain_report.skipped,
            committed: false,
        };
        Ok((staged, report))
    }

    /// Checks that must pass before anything is staged.
    fn validate(&self, tree: &VirtualTree, options: &LibraryOptions) -> ForgeResult<Validated> {
        naming::validate_project_name(&options.name)?;

        let (workspace_file, text) = find_workspace(tree)?;
        let workspace = WorkspaceDocument::new(ConfigDocument::parse(&workspace_file, &text)?);

        if workspace.has_project(&options.name) {
            return Err(DomainError::DuplicateProject {
                name: options.name.clone(),
                reason: "name already registered".into(),
            }
            .into());
        }

        let naming = naming::resolve(
            &options.name,
            options.effective_prefix(),
            workspace.new_project_root(),
        )?;

        Ok(Validated {
            workspace_file,
            naming,
        })
    }

    fn render(
        &self,
        naming: &NamingContext,
        options: &LibraryOptions,
    ) -> ForgeResult<Vec<GeneratedFile>> {
        let source = self.templates.load()?;
        debug!(files = source.len(), template = %self.templates.describe(), "Template loaded");

        let context = RenderContext::for_library(naming, options)
            .with_variable("year", Utc::now().year().to_string());

        Ok(template::render(&source, &context)?)
    }

    fn delegate(&self, tree: &mut VirtualTree, options: &ModuleOptions) -> ForgeResult<()> {
        let delta = self.generator.generate(tree, options).map_err(|source| {
            ApplicationError::DelegateGenerator {
                generator: MODULE_GENERATOR.into(),
                source: Box::new(source),
            }
        })?;

        debug!(files = delta.files.len(), "Delegate returned");
        tree::merge(tree, &delta.files, MergePolicy::Error)?;
        Ok(())
    }
}

/// `angular.json`, else `.angular.json`.
fn find_workspace(tree: &VirtualTree) -> ForgeResult<(String, String)> {
    for candidate in WORKSPACE_FILES {
        if let Some(text) = tree.read_str(candidate)? {
            return Ok((candidate.to_string(), text));
        }
    }
    Err(ApplicationError::WorkspaceNotFound {
        root: tree.root().to_path_buf(),
    }
    .into())
}

/// Merge with `MergePolicy::Error` first; a conflict is retried under the
/// caller's policy when one was given.
fn merge_with_retry(
    tree: &mut VirtualTree,
    files: &[GeneratedFile],
    policy: MergePolicy,
) -> ForgeResult<()> {
    let outcome = match tree::merge(tree, files, MergePolicy::Error) {
        Err(ForgeError::Application(ApplicationError::MergeConflict { path }))
            if policy != MergePolicy::Error =>
        {
            warn!(%path, ?policy, "Conflict, retrying with override policy");
            tree::merge(tree, files, policy)?
        }
        other => other?,
    };

    info!(
        created = outcome.created.len(),
        overwritten = outcome.overwritten.len(),
        kept = outcome.kept.len(),
        "Template merged"
    );
    Ok(())
}

fn register_project(
    tree: &mut VirtualTree,
    workspace_file: &str,
    name: &str,
    entry: &ProjectEntry,
) -> ForgeResult<()> {
    let registered = config_mutator::mutate(tree, workspace_file, |doc| {
        let mut workspace = WorkspaceDocument::new(doc.clone());
        workspace.register(name, entry)?;
        *doc = workspace.into_inner();
        Ok(true)
    })?;

    if !registered {
        return Err(ApplicationError::WorkspaceNotFound {
            root: tree.root().to_path_buf(),
        }
        .into());
    }
    Ok(())
}
