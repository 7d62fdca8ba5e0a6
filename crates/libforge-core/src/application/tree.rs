//! Virtual tree: the workspace as seen by the pipeline.
//!
//! Reads fall through to the host filesystem; every write is staged in
//! memory until [`VirtualTree::commit`]. Dropping a tree discards its staged
//! changes, so an aborted run never touches the disk.

use std::{
    collections::BTreeMap,
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{GeneratedFile, MergePolicy, RelativePath},
    error::ForgeResult,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Staged {
    Written(String),
    Deleted,
}

/// In-memory overlay over the workspace directory.
#[derive(Clone)]
pub struct VirtualTree {
    host: Arc<dyn Filesystem>,
    root: PathBuf,
    staged: BTreeMap<RelativePath, Staged>,
}

impl fmt::Debug for VirtualTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualTree")
            .field("root", &self.root)
            .field("staged", &self.staged.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// One pending filesystem change, in commit order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Change {
    Create { path: RelativePath, content: String },
    Overwrite { path: RelativePath, content: String },
    Delete { path: RelativePath },
}

impl Change {
    pub fn path(&self) -> &RelativePath {
        match self {
            Self::Create { path, .. } | Self::Overwrite { path, .. } | Self::Delete { path } => {
                path
            }
        }
    }

    /// Upper-case verb used in dry-run listings.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Create { .. } => "CREATE",
            Self::Overwrite { .. } => "UPDATE",
            Self::Delete { .. } => "DELETE",
        }
    }
}

impl VirtualTree {
    /// Open a tree over `root`. Nothing is read until asked for.
    pub fn open(host: Arc<dyn Filesystem>, root: impl Into<PathBuf>) -> Self {
        Self {
            host,
            root: root.into(),
            staged: BTreeMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Current content of `path`: staged value first, then the host.
    pub fn read(&self, path: &RelativePath) -> ForgeResult<Option<String>> {
        match self.staged.get(path) {
            Some(Staged::Written(content)) => Ok(Some(content.clone())),
            Some(Staged::Deleted) => Ok(None),
            None => self.host.read_file(&path.to_path_under(&self.root)),
        }
    }

    /// Convenience for string paths, mainly well-known config files.
    pub fn read_str(&self, path: &str) -> ForgeResult<Option<String>> {
        self.read(&RelativePath::try_new(path)?)
    }

    pub fn exists(&self, path: &RelativePath) -> bool {
        match self.staged.get(path) {
            Some(Staged::Written(_)) => true,
            Some(Staged::Deleted) => false,
            None => self.host.exists(&path.to_path_under(&self.root)),
        }
    }

    /// Stage a new file. Fails if the path already exists.
    pub fn create(&mut self, path: RelativePath, content: impl Into<String>) -> ForgeResult<()> {
        if self.exists(&path) {
            return Err(ApplicationError::MergeConflict {
                path: path.to_string(),
            }
            .into());
        }
        self.staged.insert(path, Staged::Written(content.into()));
        Ok(())
    }

    /// Replace an existing file's content.
    pub fn overwrite(&mut self, path: RelativePath, content: impl Into<String>) -> ForgeResult<()> {
        if !self.exists(&path) {
            return Err(self.missing(&path));
        }
        self.staged.insert(path, Staged::Written(content.into()));
        Ok(())
    }

    pub fn delete(&mut self, path: RelativePath) -> ForgeResult<()> {
        if !self.exists(&path) {
            return Err(self.missing(&path));
        }
        self.staged.insert(path, Staged::Deleted);
        Ok(())
    }

    /// A copy of this tree whose changes stay invisible here until
    /// [`merge_branch`](Self::merge_branch).
    pub fn branch(&self) -> Self {
        self.clone()
    }

    /// Adopt every change staged on `branch`.
    ///
    /// `branch` must come from [`branch`](Self::branch) on this tree; its
    /// staging area is a superset of ours.
    pub fn merge_branch(&mut self, branch: VirtualTree) {
        self.staged = branch.staged;
    }

    /// Net changes against the host, in path order.
    ///
    /// Writes identical to what is on disk and deletes of files that never
    /// existed drop out.
    pub fn changes(&self) -> ForgeResult<Vec<Change>> {
        let mut changes = Vec::with_capacity(self.staged.len());

        for (path, staged) in &self.staged {
            let on_disk = self.host.read_file(&path.to_path_under(&self.root))?;
            match (staged, on_disk) {
                (Staged::Written(content), None) => changes.push(Change::Create {
                    path: path.clone(),
                    content: content.clone(),
                }),
                (Staged::Written(content), Some(existing)) if *content != existing => {
                    changes.push(Change::Overwrite {
                        path: path.clone(),
                        content: content.clone(),
                    })
                }
                (Staged::Deleted, Some(_)) => changes.push(Change::Delete { path: path.clone() }),
                _ => {}
            }
        }

        Ok(changes)
    }

    /// Write every staged change to the host.
    ///
    /// On the first failure, changes already applied are undone (previous
    /// contents restored, new files and directories removed) and
    /// `CommitFailed` is returned.
    #[instrument(skip_all, fields(root = %self.root.display()))]
    pub fn commit(self) -> ForgeResult<Vec<Change>> {
        let changes = self.changes()?;
        let mut journal = Journal::default();

        for change in &changes {
            if let Err(e) = self.apply(change, &mut journal) {
                warn!(path = %change.path(), error = %e, "Commit failed, rolling back");
                self.rollback(journal)?;
                return Err(ApplicationError::CommitFailed {
                    path: change.path().to_string(),
                    reason: e.to_string(),
                }
                .into());
            }
        }

        info!(changes = changes.len(), "Tree committed");
        Ok(changes)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn missing(&self, path: &RelativePath) -> crate::error::ForgeError {
        ApplicationError::FilesystemError {
            path: path.to_path_under(&self.root),
            reason: "file does not exist".into(),
        }
        .into()
    }

    fn apply(&self, change: &Change, journal: &mut Journal) -> ForgeResult<()> {
        let full = change.path().to_path_under(&self.root);
        let previous = self.host.read_file(&full)?;

        match change {
            Change::Create { content, .. } | Change::Overwrite { content, .. } => {
                if let Some(parent) = full.parent() {
                    self.ensure_dir(parent, journal)?;
                }
                self.host.write_file(&full, content)?;
            }
            Change::Delete { .. } => self.host.remove_file(&full)?,
        }

        debug!(path = %change.path(), verb = change.verb(), "Applied");
        journal.files.push((full, previous));
        Ok(())
    }

    /// Create `dir`, remembering each level that did not exist before.
    fn ensure_dir(&self, dir: &Path, journal: &mut Journal) -> ForgeResult<()> {
        let mut missing: Vec<PathBuf> = dir
            .ancestors()
            .take_while(|p| !p.as_os_str().is_empty() && !self.host.exists(p))
            .map(Path::to_path_buf)
            .collect();

        if missing.is_empty() {
            return Ok(());
        }

        self.host.create_dir_all(dir)?;
        missing.reverse();
        journal.dirs.extend(missing);
        Ok(())
    }

    fn rollback(&self, journal: Journal) -> ForgeResult<()> {
        let mut failed = None;

        for (path, previous) in journal.files.into_iter().rev() {
            let result = match previous {
                Some(content) => self.host.write_file(&path, &content),
                None => self.host.remove_file(&path),
            };
            if let Err(e) = result {
                warn!(path = %path.display(), error = %e, "Rollback failed");
                failed.get_or_insert((path, e.to_string()));
            }
        }

        for dir in journal.dirs.into_iter().rev() {
            if let Err(e) = self.host.remove_dir(&dir) {
                warn!(path = %dir.display(), error = %e, "Could not remove directory");
            }
        }

        match failed {
            Some((path, reason)) => Err(ApplicationError::RollbackFailed {
                path: path.display().to_string(),
                reason,
            }
            .into()),
            None => {
                info!("Rollback successful");
                Ok(())
            }
        }
    }
}

/// Undo log for a commit in progress.
#[derive(Default)]
struct Journal {
    files: Vec<(PathBuf, Option<String>)>,
    dirs: Vec<PathBuf>,
}

/// What [`merge`] did with each rendered file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub created: Vec<RelativePath>,
    pub overwritten: Vec<RelativePath>,
    /// Kept as-is: identical content, or a conflict under `MergePolicy::Skip`.
    pub kept: Vec<RelativePath>,
}

/// Merge rendered files into `tree` under `policy`.
///
/// Staged on a branch: on `MergeConflict` the tree is exactly as it was.
/// A file whose content already matches is never a conflict.
#[instrument(skip_all, fields(files = files.len(), ?policy))]
pub fn merge(
    tree: &mut VirtualTree,
    files: &[GeneratedFile],
    policy: MergePolicy,
) -> ForgeResult<MergeOutcome> {
    let mut branch = tree.branch();
    let mut outcome = MergeOutcome::default();

    for file in files {
        match branch.read(&file.path)? {
            None => {
                branch.create(file.path.clone(), file.content.clone())?;
                outcome.created.push(file.path.clone());
            }
            Some(existing) if existing == file.content => outcome.kept.push(file.path.clone()),
            Some(_) => match policy {
                MergePolicy::Error => {
                    return Err(ApplicationError::MergeConflict {
                        path: file.path.to_string(),
                    }
                    .into());
                }
                MergePolicy::Overwrite => {
                    branch.overwrite(file.path.clone(), file.content.clone())?;
                    outcome.overwritten.push(file.path.clone());
                }
                MergePolicy::Skip => {
                    debug!(path = %file.path, "Keeping existing file");
                    outcome.kept.push(file.path.clone());
                }
            },
        }
    }

    tree.merge_branch(branch);
    Ok(outcome)
}
