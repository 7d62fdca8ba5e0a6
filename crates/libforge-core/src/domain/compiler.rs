//! Compiler path-mapping transform for `tsconfig.json`.

use serde_json::Value;

use crate::domain::{
    document::{ConfigDocument, ensure_array, ensure_object},
    error::DomainError,
};

pub const TSCONFIG_PATH: &str = "tsconfig.json";

/// Point `package_name` and `package_name/*` at the library's dist output.
///
/// Creates `compilerOptions.paths` and the alias arrays when absent. A target
/// already listed under an alias is not appended again, so re-running on a
/// configured workspace is a no-op. Returns whether anything changed.
pub fn add_path_mapping(
    doc: &mut ConfigDocument,
    package_name: &str,
    dist_root: &str,
) -> Result<bool, DomainError> {
    let path = doc.path().to_string();
    let compiler_options = doc.object_mut("compilerOptions")?;
    let paths = ensure_object(&path, compiler_options, "paths")?;

    let mappings = [
        (package_name.to_string(), dist_root.to_string()),
        (format!("{package_name}/*"), format!("{dist_root}/*")),
    ];

    let mut changed = false;
    for (alias, target) in mappings {
        let targets = ensure_array(&path, paths, &alias)?;
        if !targets.iter().any(|t| t.as_str() == Some(target.as_str())) {
            targets.push(Value::String(target));
            changed = true;
        }
    }

    Ok(changed)
}
