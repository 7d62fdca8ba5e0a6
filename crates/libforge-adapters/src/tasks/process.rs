//! Runs deferred tasks as child processes.

use std::{
    path::{Path, PathBuf},
    process::{Command, Output},
};

use tracing::{debug, info, instrument};

use libforge_core::{
    application::{ApplicationError, ports::TaskRunner},
    domain::Task,
    error::ForgeResult,
};

/// Lines of stderr kept in a failure message.
const STDERR_TAIL: usize = 5;

/// Executes `Task::NodePackageInstall` as `<package manager> install`.
#[derive(Debug, Clone)]
pub struct ProcessTaskRunner {
    package_manager: String,
}

impl ProcessTaskRunner {
    pub fn new(package_manager: impl Into<String>) -> Self {
        Self {
            package_manager: package_manager.into(),
        }
    }

    pub fn package_manager(&self) -> &str {
        &self.package_manager
    }

    /// Program and arguments for `task`, plus the directory to run in.
    pub fn command_for(&self, task: &Task, workspace_root: &Path) -> (String, Vec<String>, PathBuf) {
        match task {
            Task::NodePackageInstall { working_directory } => {
                let dir = match working_directory {
                    Some(sub) => workspace_root.join(sub),
                    None => workspace_root.to_path_buf(),
                };
                (program(&self.package_manager), vec!["install".into()], dir)
            }
        }
    }
}

impl Default for ProcessTaskRunner {
    fn default() -> Self {
        Self::new("npm")
    }
}

impl TaskRunner for ProcessTaskRunner {
    #[instrument(skip(self), fields(pm = %self.package_manager))]
    fn run(&self, task: &Task, workspace_root: &Path) -> ForgeResult<()> {
        let (program, args, dir) = self.command_for(task, workspace_root);
        debug!(%program, ?args, dir = %dir.display(), "Spawning");

        let output = Command::new(&program)
            .args(&args)
            .current_dir(&dir)
            .output()
            .map_err(|e| ApplicationError::TaskFailed {
                task: task.to_string(),
                reason: format!("could not start '{program}': {e}"),
            })?;

        if !output.status.success() {
            return Err(ApplicationError::TaskFailed {
                task: task.to_string(),
                reason: failure_reason(&output),
            }
            .into());
        }

        info!(%task, "Task finished");
        Ok(())
    }
}

/// On Windows package managers are `.cmd` shims.
fn program(package_manager: &str) -> String {
    if cfg!(windows) && !package_manager.contains('.') {
        format!("{package_manager}.cmd")
    } else {
        package_manager.to_string()
    }
}

fn failure_reason(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    let tail = lines[lines.len().saturating_sub(STDERR_TAIL)..].join("\n");

    match output.status.code() {
        Some(code) if tail.is_empty() => format!("exited with status {code}"),
        Some(code) => format!("exited with status {code}:\n{tail}"),
        None => "terminated by signal".into(),
    }
}
