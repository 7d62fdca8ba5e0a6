//! Read-modify-write of JSON config files inside a [`VirtualTree`].

use tracing::{debug, instrument};

use crate::{
    application::tree::VirtualTree,
    domain::{ConfigDocument, DomainError, RelativePath},
    error::ForgeResult,
};

/// Apply `transform` to the document at `path`.
///
/// A missing file is a no-op and returns `Ok(false)`: optional config that
/// the workspace does not use is not an error. A file that exists but does
/// not parse is. The transform reports whether it changed anything; only
/// then is the document re-serialized and staged, so untouched files keep
/// their exact bytes.
#[instrument(skip(tree, transform))]
pub fn mutate<F>(tree: &mut VirtualTree, path: &str, transform: F) -> ForgeResult<bool>
where
    F: FnOnce(&mut ConfigDocument) -> Result<bool, DomainError>,
{
    let path = RelativePath::try_new(path)?;
    let Some(text) = tree.read(&path)? else {
        debug!("Config file absent, skipping");
        return Ok(false);
    };

    let mut doc = ConfigDocument::parse(path.as_str(), &text)?;
    if !transform(&mut doc)? {
        debug!("Transform made no changes");
        return Ok(false);
    }

    tree.overwrite(path, doc.to_pretty_string())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::application::testing::MapFilesystem;
    use crate::domain::compiler;

    fn tree(files: &[(&str, &str)]) -> VirtualTree {
        let fs = Arc::new(MapFilesystem::new("/ws"));
        for (p, c) in files {
            fs.seed(p, c);
        }
        VirtualTree::open(fs, "/ws")
    }

    #[test]
    fn absent_file_is_a_no_op() {
        let mut t = tree(&[]);
        let changed = mutate(&mut t, "tsconfig.json", |_| Ok(true)).unwrap();
        assert!(!changed);
        assert!(t.changes().unwrap().is_empty());
    }

    #[test]
    fn invalid_json_is_an_error() {
        let mut t = tree(&[("tsconfig.json", "{ nope")]);
        assert!(mutate(&mut t, "tsconfig.json", |_| Ok(true)).is_err());
    }

    #[test]
    fn unchanged_document_keeps_original_bytes() {
        let original = "{\"a\":1}";
        let mut t = tree(&[("x.json", original)]);
        assert!(!mutate(&mut t, "x.json", |_| Ok(false)).unwrap());
        assert_eq!(t.read_str("x.json").unwrap().as_deref(), Some(original));
    }

    #[test]
    fn path_mapping_round_trip_keeps_unrelated_keys() {
        let mut t = tree(&[(
            "tsconfig.json",
            r#"{"compileOnSave": false, "compilerOptions": {"target": "es5", "paths": {"other": ["x"]}}}"#,
        )]);

        for _ in 0..2 {
            mutate(&mut t, "tsconfig.json", |doc| {
                compiler::add_path_mapping(doc, "@acme/widgets", "dist/acme-widgets")
            })
            .unwrap();
        }

        let text = t.read_str("tsconfig.json").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["compileOnSave"], json!(false));
        assert_eq!(value["compilerOptions"]["target"], json!("es5"));
        assert_eq!(value["compilerOptions"]["paths"]["other"], json!(["x"]));
        assert_eq!(
            value["compilerOptions"]["paths"]["@acme/widgets"],
            json!(["dist/acme-widgets"])
        );
        assert_eq!(
            value["compilerOptions"]["paths"]["@acme/widgets/*"],
            json!(["dist/acme-widgets/*"])
        );
        assert!(text.ends_with("}\n"));
    }
}
