use std::fmt;

use serde::Serialize;

/// Deferred action scheduled by the pipeline and executed by the host after
/// the tree is committed. Tasks never touch the virtual tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Task {
    /// Install the workspace's node dependencies.
    #[serde(rename_all = "camelCase")]
    NodePackageInstall {
        /// Directory relative to the workspace root; `None` is the root.
        working_directory: Option<String>,
    },
}

impl Task {
    pub fn node_package_install() -> Self {
        Self::NodePackageInstall {
            working_directory: None,
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodePackageInstall {
                working_directory: None,
            } => write!(f, "install packages"),
            Self::NodePackageInstall {
                working_directory: Some(dir),
            } => write!(f, "install packages in {dir}"),
        }
    }
}
