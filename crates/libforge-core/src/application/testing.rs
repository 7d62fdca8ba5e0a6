//! Test doubles for the application layer.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateSource},
    },
    domain::TemplateTree,
    error::ForgeResult,
};

/// Map-backed filesystem rooted at a fake absolute directory.
pub struct MapFilesystem {
    root: PathBuf,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
    fail_on: Option<PathBuf>,
}

impl MapFilesystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mut state = State::default();
        for dir in root.ancestors() {
            state.dirs.insert(dir.to_path_buf());
        }
        Self {
            root,
            state: Mutex::new(state),
        }
    }

    pub fn seed(&self, rel: &str, content: &str) {
        let full = self.root.join(rel);
        let mut state = self.state.lock().unwrap();
        for dir in full.ancestors().skip(1) {
            state.dirs.insert(dir.to_path_buf());
        }
        state.files.insert(full, content.to_string());
    }

    pub fn content(&self, rel: &str) -> Option<String> {
        self.state.lock().unwrap().files.get(&self.root.join(rel)).cloned()
    }

    pub fn has(&self, rel: &str) -> bool {
        self.content(rel).is_some()
    }

    pub fn has_dir(&self, rel: &str) -> bool {
        self.state.lock().unwrap().dirs.contains(&self.root.join(rel))
    }

    pub fn fail_writes_to(&self, rel: &str) {
        self.state.lock().unwrap().fail_on = Some(self.root.join(rel));
    }
}

impl Filesystem for MapFilesystem {
    fn read_file(&self, path: &Path) -> ForgeResult<Option<String>> {
        Ok(self.state.lock().unwrap().files.get(path).cloned())
    }

    fn write_file(&self, path: &Path, content: &str) -> ForgeResult<()> {
        let mut state = self.state.lock().unwrap();
        let parent_ok = path.parent().is_none_or(|p| state.dirs.contains(p));
        if state.fail_on.as_deref() == Some(path) || !parent_ok {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "write refused".into(),
            }
            .into());
        }
        state.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> ForgeResult<()> {
        let mut state = self.state.lock().unwrap();
        for dir in path.ancestors() {
            state.dirs.insert(dir.to_path_buf());
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        state.files.contains_key(path) || state.dirs.contains(path)
    }

    fn remove_file(&self, path: &Path) -> ForgeResult<()> {
        self.state.lock().unwrap().files.remove(path);
        Ok(())
    }

    fn remove_dir(&self, path: &Path) -> ForgeResult<()> {
        self.state.lock().unwrap().dirs.remove(path);
        Ok(())
    }
}

/// Template source serving a fixed tree.
pub struct FixedTemplates(pub TemplateTree);

impl TemplateSource for FixedTemplates {
    fn load(&self) -> ForgeResult<TemplateTree> {
        Ok(self.0.clone())
    }

    fn describe(&self) -> String {
        "fixed".into()
    }
}
