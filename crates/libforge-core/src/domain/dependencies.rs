//! Dependency transform for `package.json`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::{document::ConfigDocument, error::DomainError};

pub const PACKAGE_JSON_PATH: &str = "package.json";

/// Tool-chain versions the generated library is built against.
pub mod versions {
    pub const ANGULAR: &str = "~6.1.0";
    pub const DEVKIT_BUILD_NG_PACKAGR: &str = "~0.8.0";
    pub const TYPESCRIPT: &str = "~2.9.2";
    pub const TSLIB: &str = "^1.9.0";
    pub const NG_PACKAGR: &str = "^4.2.0";
    pub const TSICKLE: &str = ">=0.29.0";

    /// Angular version without its range operator, for templates.
    pub fn angular_plain() -> String {
        ANGULAR.replace(['~', '^'], "")
    }
}

/// Section of `package.json` a dependency lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DependencyKind {
    Dev,
}

impl DependencyKind {
    pub fn section(self) -> &'static str {
        match self {
            Self::Dev => "devDependencies",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDependency {
    pub kind: DependencyKind,
    pub name: String,
    pub version: String,
}

impl NodeDependency {
    pub fn dev(name: &str, version: &str) -> Self {
        Self {
            kind: DependencyKind::Dev,
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Development dependencies every generated library needs.
pub fn library_dev_dependencies() -> Vec<NodeDependency> {
    vec![
        NodeDependency::dev("@angular/compiler-cli", versions::ANGULAR),
        NodeDependency::dev(
            "@angular-devkit/build-ng-packagr",
            versions::DEVKIT_BUILD_NG_PACKAGR,
        ),
        NodeDependency::dev(
            "@angular-devkit/build-angular",
            versions::DEVKIT_BUILD_NG_PACKAGR,
        ),
        NodeDependency::dev("ng-packagr", versions::NG_PACKAGR),
        NodeDependency::dev("tsickle", versions::TSICKLE),
        NodeDependency::dev("tslib", versions::TSLIB),
        NodeDependency::dev("typescript", versions::TYPESCRIPT),
    ]
}

/// Add `dep` unless its section already names it.
///
/// New keys go in front of the first key that sorts after them, so a sorted
/// section stays sorted. Returns whether the document changed.
pub fn add_dependency(doc: &mut ConfigDocument, dep: &NodeDependency) -> Result<bool, DomainError> {
    let section = doc.object_mut(dep.kind.section())?;
    if section.contains_key(&dep.name) {
        return Ok(false);
    }

    let mut entries: Vec<(String, Value)> = std::mem::take(section).into_iter().collect();
    let at = entries
        .iter()
        .position(|(key, _)| key.as_str() > dep.name.as_str())
        .unwrap_or(entries.len());
    entries.insert(at, (dep.name.clone(), Value::String(dep.version.clone())));
    *section = entries.into_iter().collect::<Map<String, Value>>();

    Ok(true)
}

/// Apply [`add_dependency`] for each entry; returns how many were added.
pub fn add_dependencies(
    doc: &mut ConfigDocument,
    deps: &[NodeDependency],
) -> Result<usize, DomainError> {
    let mut added = 0;
    for dep in deps {
        if add_dependency(doc, dep)? {
            added += 1;
        }
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(text: &str) -> ConfigDocument {
        ConfigDocument::parse(PACKAGE_JSON_PATH, text).unwrap()
    }

    #[test]
    fn adds_all_library_dev_dependencies() {
        let mut doc = manifest(r#"{"name": "ws", "dependencies": {"meteor-node-stubs": "^0.4.1"}}"#);
        let added = add_dependencies(&mut doc, &library_dev_dependencies()).unwrap();

        assert_eq!(added, 7);
        let dev = doc.get("devDependencies").unwrap().as_object().unwrap();
        assert_eq!(dev["ng-packagr"], "^4.2.0");
        assert_eq!(dev["tsickle"], ">=0.29.0");
        assert_eq!(dev["@angular/compiler-cli"], versions::ANGULAR);
        assert_eq!(doc.get("dependencies").unwrap()["meteor-node-stubs"], "^0.4.1");
    }

    #[test]
    fn existing_entries_are_not_overwritten_or_duplicated() {
        let mut doc = manifest(r#"{"devDependencies": {"typescript": "3.0.0"}}"#);
        let deps = library_dev_dependencies();

        add_dependencies(&mut doc, &deps).unwrap();
        let again = add_dependencies(&mut doc, &deps).unwrap();

        assert_eq!(again, 0);
        let dev = doc.get("devDependencies").unwrap().as_object().unwrap();
        assert_eq!(dev["typescript"], "3.0.0");
        assert_eq!(dev.len(), 7);
    }

    #[test]
    fn insertion_keeps_sorted_sections_sorted() {
        let mut doc = manifest(r#"{"devDependencies": {"karma": "1", "zone.js": "1"}}"#);
        add_dependency(&mut doc, &NodeDependency::dev("tslib", "^1.9.0")).unwrap();

        let keys: Vec<_> = doc
            .get("devDependencies")
            .unwrap()
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["karma", "tslib", "zone.js"]);
    }

    #[test]
    fn angular_plain_strips_range() {
        assert_eq!(versions::angular_plain(), "6.1.0");
    }
}
