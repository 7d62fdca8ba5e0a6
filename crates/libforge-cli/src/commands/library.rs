//! Implementation of the `libforge library` command.
//!
//! Translates arguments and configuration into [`LibraryOptions`], wires the
//! adapters into a [`LibraryService`], shows the result and drains the
//! deferred tasks. No generation logic lives here.

use std::{
    io::IsTerminal as _,
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{debug, info, instrument};

use libforge_adapters::{
    AngularModuleGenerator, LocalFilesystem, ProcessTaskRunner, resolve_template_source,
};
use libforge_core::{
    application::{Change, GenerationReport, LibraryService, ports::TaskRunner},
    domain::{LibraryOptions, MergePolicy},
};

use crate::{
    cli::{GlobalArgs, LibraryArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute `libforge library`.
///
/// 1. Build options (flags over config defaults)
/// 2. Wire adapters into the service
/// 3. `--dry-run`: plan, list the changes, stop
/// 4. Confirm on an interactive terminal unless `--yes`
/// 5. Generate and commit
/// 6. Run deferred tasks with a spinner
#[instrument(skip_all, fields(library = %args.name))]
pub fn execute(
    args: LibraryArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let options = build_options(&args, &config);
    let workspace = resolve_workspace(args.workspace.as_deref())?;
    debug!(
        workspace = %workspace.display(),
        prefix = options.effective_prefix(),
        policy = ?options.conflict_policy,
        "Options resolved"
    );

    let template_dir = args.templates.clone().or(config.templates.local_path.clone());
    let service = build_service(template_dir.as_deref())?;

    if args.dry_run {
        let report = service.plan(&workspace, &options)?;
        return show_plan(&report, &output);
    }

    if wants_confirmation(&args, &global, &output) {
        let report = service.plan(&workspace, &options)?;
        show_changes(&report, &output)?;
        if !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    output.header(&format!("Generating library '{}'...", options.name))?;
    let report = service.generate(&workspace, &options)?;
    info!(run_id = %report.run_id, changes = report.changes.len(), "Library written");

    if !output.is_json() {
        show_changes(&report, &output)?;
    }

    let runner = ProcessTaskRunner::new(&config.defaults.package_manager);
    run_tasks(&report, &runner, &workspace, &output)?;

    if output.is_json() {
        output.json(&report)?;
        return Ok(());
    }

    output.success(&format!(
        "Library '{}' created at {}",
        report.naming.project_name, report.naming.project_root
    ))?;
    if !global.quiet {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!(
            "  ng build {}   # packages into {}",
            report.naming.project_name, report.naming.dist_root
        ))?;
        // package.json gained dependencies that were not installed
        if report.tasks.is_empty() && !options.skip_package_json {
            output.print(&format!("  {} install", config.defaults.package_manager))?;
        }
    }

    Ok(())
}

/// Flags win; config defaults fill the rest.
fn build_options(args: &LibraryArgs, config: &AppConfig) -> LibraryOptions {
    let policy = if args.force {
        MergePolicy::Overwrite
    } else if args.skip_existing {
        MergePolicy::Skip
    } else {
        MergePolicy::Error
    };

    LibraryOptions::new(args.name.trim())
        .prefix(args.prefix.clone().unwrap_or_else(|| config.defaults.prefix.clone()))
        .skip_package_json(args.skip_package_json)
        .skip_ts_config(args.skip_ts_config)
        .skip_install(args.skip_install || config.defaults.skip_install)
        .conflict_policy(policy)
}

fn resolve_workspace(explicit: Option<&Path>) -> CliResult<PathBuf> {
    match explicit {
        Some(dir) => Ok(dir.to_path_buf()),
        None => std::env::current_dir().with_cli_context(|| "failed to read the current directory"),
    }
}

fn build_service(template_dir: Option<&Path>) -> CliResult<LibraryService> {
    let templates = resolve_template_source(template_dir)?;
    debug!(template = %templates.describe(), "Template source selected");

    Ok(LibraryService::new(
        Arc::new(LocalFilesystem::new()),
        templates,
        Box::new(AngularModuleGenerator::new()),
    ))
}

fn wants_confirmation(args: &LibraryArgs, global: &GlobalArgs, output: &OutputManager) -> bool {
    !args.yes && !global.quiet && !output.is_json() && std::io::stdin().is_terminal()
}

fn run_tasks(
    report: &GenerationReport,
    runner: &dyn TaskRunner,
    workspace: &Path,
    output: &OutputManager,
) -> CliResult<()> {
    for task in &report.tasks {
        let spinner = output.spinner(format!("Running '{task}'..."));
        let result = runner.run(task, workspace);
        spinner.finish_and_clear();
        result?;
        output.success(&format!("Finished '{task}'"))?;
    }
    Ok(())
}

// ── Display ───────────────────────────────────────────────────────────────────

fn show_plan(report: &GenerationReport, output: &OutputManager) -> CliResult<()> {
    if output.is_json() {
        output.json(report)?;
        return Ok(());
    }

    show_changes(report, output)?;
    for task in &report.tasks {
        output.info(&format!("Would run '{task}' after writing"))?;
    }
    output.warning("Dry run: no files were written")?;
    Ok(())
}

fn show_changes(report: &GenerationReport, output: &OutputManager) -> CliResult<()> {
    output.info(&format!("Template: {}", report.template))?;
    for change in &report.changes {
        let bytes = match change {
            Change::Create { content, .. } | Change::Overwrite { content, .. } => {
                Some(content.len())
            }
            Change::Delete { .. } => None,
        };
        output.change(change.verb(), change.path().as_str(), bytes)?;
    }
    if report.changes.is_empty() {
        output.info("Nothing to change")?;
    }
    Ok(())
}

#[cfg(feature = "interactive")]
fn confirm() -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt("Write these files?")
        .default(true)
        .interact()
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: e.into(),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm() -> CliResult<bool> {
    use std::io::{self, Write};

    print!("Write these files? [Y/n] ");
    io::stdout()
        .flush()
        .with_cli_context(|| "failed to flush stdout")?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .with_cli_context(|| "failed to read confirmation input")?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::cli::{Cli, Commands};

    fn parse(argv: &[&str]) -> LibraryArgs {
        let mut full = vec!["libforge", "library"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Commands::Library(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn config_defaults_fill_unset_flags() {
        let mut config = AppConfig::default();
        config.defaults.prefix = "acme".into();
        config.defaults.skip_install = true;

        let options = build_options(&parse(&["@acme/widgets"]), &config);
        assert_eq!(options.name, "@acme/widgets");
        assert_eq!(options.effective_prefix(), "acme");
        assert!(options.skip_install);
        assert_eq!(options.conflict_policy, MergePolicy::Error);
    }

    #[test]
    fn flags_win_over_config() {
        let mut config = AppConfig::default();
        config.defaults.prefix = "acme".into();

        let options = build_options(&parse(&["x", "--prefix", "xy", "--force"]), &config);
        assert_eq!(options.effective_prefix(), "xy");
        assert_eq!(options.conflict_policy, MergePolicy::Overwrite);
    }

    #[test]
    fn skip_existing_selects_skip_policy() {
        let options = build_options(&parse(&["x", "--skip-existing"]), &AppConfig::default());
        assert_eq!(options.conflict_policy, MergePolicy::Skip);
    }

    #[test]
    fn skip_flags_are_forwarded() {
        let options = build_options(
            &parse(&["x", "--skip-package-json", "--skip-ts-config"]),
            &AppConfig::default(),
        );
        assert!(options.skip_package_json);
        assert!(options.skip_ts_config);
        assert!(!options.wants_install());
    }

    #[test]
    fn explicit_workspace_is_used_verbatim() {
        let dir = resolve_workspace(Some(Path::new("/tmp/ws"))).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/ws"));
    }

    #[test]
    fn missing_template_directory_is_reported() {
        assert!(build_service(Some(Path::new("/no/such/templates"))).is_err());
    }
}
