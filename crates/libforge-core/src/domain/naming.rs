//! Naming resolution.
//!
//! Every name the generator writes (folder, dist path, path alias, registry
//! key, Meteor package name) is derived here from the raw identifier and the
//! workspace's `newProjectRoot`. Nothing in this module reads ambient state,
//! so the same inputs always give the same [`NamingContext`].

use serde::Serialize;

use crate::domain::{error::DomainError, strings};

/// Names the Angular CLI refuses for new projects.
pub const RESERVED_NAMES: [&str; 5] = ["test", "ember", "ember-cli", "vendor", "app"];

/// Derived names for one library. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamingContext {
    /// Identifier exactly as given; used as the workspace registry key.
    pub project_name: String,
    /// Scope-stripped name (`widgets` for `@acme/widgets`).
    pub short_name: String,
    /// Scope without `@`, if any.
    pub scope_name: Option<String>,
    /// Dasherized identifier, used for path aliases.
    pub package_name: String,
    pub folder_name: String,
    pub project_root: String,
    pub dist_root: String,
    pub source_dir: String,
    /// `"<dasherized-scope>:"` or empty.
    pub scope_prefix: String,
    /// Flat namespaced name: `scope_prefix + dasherized short name`.
    pub meteor_package_name: String,
    /// One `..` per segment of `project_root`.
    pub relative_root_path: String,
    pub prefix: String,
}

/// Resolve every derived name for `identifier`.
///
/// `new_project_root` is the workspace convention (`"projects"` by default);
/// a blank value places the library at the workspace root.
pub fn resolve(
    identifier: &str,
    prefix: &str,
    new_project_root: &str,
) -> Result<NamingContext, DomainError> {
    validate_project_name(identifier)?;

    let (scope_name, short_name) = split_scope(identifier);

    let scope_folder = scope_name
        .map(|s| format!("{}-", strings::dasherize(s)))
        .unwrap_or_default();
    let folder_name = format!("{scope_folder}{}", strings::dasherize(short_name));

    let project_root = new_project_root
        .trim()
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .chain(std::iter::once(folder_name.as_str()))
        .collect::<Vec<_>>()
        .join("/");

    let dist_root = format!("dist/{folder_name}");
    let source_dir = format!("{project_root}/client/src/lib");

    let scope_prefix = scope_name
        .map(|s| format!("{}:", strings::dasherize(s)))
        .unwrap_or_default();
    let meteor_package_name = format!("{scope_prefix}{}", strings::dasherize(short_name));

    let relative_root_path = project_root
        .split('/')
        .map(|_| "..")
        .collect::<Vec<_>>()
        .join("/");

    Ok(NamingContext {
        project_name: identifier.to_string(),
        short_name: short_name.to_string(),
        scope_name: scope_name.map(str::to_string),
        package_name: strings::dasherize(identifier),
        folder_name,
        project_root,
        dist_root,
        source_dir,
        scope_prefix,
        meteor_package_name,
        relative_root_path,
        prefix: prefix.to_string(),
    })
}

/// Split `@scope/name` into `(Some("scope"), "name")`.
fn split_scope(identifier: &str) -> (Option<&str>, &str) {
    match identifier.strip_prefix('@').and_then(|rest| rest.split_once('/')) {
        Some((scope, name)) => (Some(scope), name),
        None => (None, identifier),
    }
}

/// Project-name predicate, applied before any derivation.
///
/// Each dash-separated part (with a scope's `/` treated as a dash) must
/// start with a letter, the scope-stripped name must not be reserved, and
/// the whole identifier must be a valid npm package name of the form
/// `[@scope/]name`.
pub fn validate_project_name(identifier: &str) -> Result<(), DomainError> {
    let invalid = |reason: &str| DomainError::InvalidName {
        name: identifier.to_string(),
        reason: reason.to_string(),
    };

    if identifier.trim().is_empty() {
        return Err(invalid("a name is required"));
    }

    let unscoped = match identifier.strip_prefix('@') {
        Some(rest) if rest.contains('/') => rest.replace('/', "-"),
        _ => identifier.to_string(),
    };

    let parts_ok = unscoped.split('-').all(|part| {
        let mut chars = part.chars();
        chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '.')
    });
    if !parts_ok {
        return Err(invalid(
            "names must start with a letter and contain only alphanumeric characters or dashes; \
             the segment after a dash must also start with a letter",
        ));
    }

    let (_, short_name) = split_scope(identifier);
    if RESERVED_NAMES.contains(&short_name) {
        return Err(invalid("it is a reserved name"));
    }

    if !is_package_name(identifier) {
        return Err(invalid("it is not a valid package name"));
    }

    Ok(())
}

/// `^(?:@[a-zA-Z0-9_-]+/)?[a-zA-Z0-9_-]+$`
fn is_package_name(identifier: &str) -> bool {
    let word = |s: &str| {
        !s.is_empty()
            && s.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    };

    match identifier.strip_prefix('@') {
        Some(rest) => match rest.split_once('/') {
            Some((scope, name)) => word(scope) && word(name),
            None => false,
        },
        None => word(identifier),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_identifier() {
        let ctx = resolve("@foo/bar", "lib", "projects").unwrap();
        assert_eq!(ctx.scope_name.as_deref(), Some("foo"));
        assert_eq!(ctx.short_name, "bar");
        assert_eq!(ctx.folder_name, "foo-bar");
        assert_eq!(ctx.project_root, "projects/foo-bar");
        assert_eq!(ctx.dist_root, "dist/foo-bar");
        assert_eq!(ctx.source_dir, "projects/foo-bar/client/src/lib");
        assert_eq!(ctx.package_name, "@foo/bar");
        assert_eq!(ctx.scope_prefix, "foo:");
        assert_eq!(ctx.meteor_package_name, "foo:bar");
        assert_eq!(ctx.relative_root_path, "../..");
    }

    #[test]
    fn unscoped_identifier() {
        let ctx = resolve("baz", "lib", "projects").unwrap();
        assert_eq!(ctx.scope_name, None);
        assert_eq!(ctx.folder_name, "baz");
        assert_eq!(ctx.project_root, "projects/baz");
        assert_eq!(ctx.scope_prefix, "");
        assert_eq!(ctx.meteor_package_name, "baz");
    }

    #[test]
    fn camel_case_names_are_dasherized() {
        let ctx = resolve("@AcmeCorp/MyWidgets", "lib", "projects").unwrap();
        assert_eq!(ctx.folder_name, "acme-corp-my-widgets");
        assert_eq!(ctx.package_name, "@acme-corp/my-widgets");
        assert_eq!(ctx.meteor_package_name, "acme-corp:my-widgets");
        assert_eq!(ctx.project_name, "@AcmeCorp/MyWidgets");
    }

    #[test]
    fn relative_root_follows_nesting_depth() {
        let ctx = resolve("baz", "lib", "libs/shared").unwrap();
        assert_eq!(ctx.project_root, "libs/shared/baz");
        assert_eq!(ctx.relative_root_path, "../../..");

        let flat = resolve("baz", "lib", "").unwrap();
        assert_eq!(flat.project_root, "baz");
        assert_eq!(flat.relative_root_path, "..");
    }

    #[test]
    fn project_root_drops_empty_and_dot_segments() {
        for root in ["./projects", "projects/", "projects//", "/projects"] {
            let ctx = resolve("baz", "lib", root).unwrap();
            assert_eq!(ctx.project_root, "projects/baz", "root: {root:?}");
            assert_eq!(ctx.relative_root_path, "../..", "root: {root:?}");
        }

        let nested = resolve("baz", "lib", "projects//libs").unwrap();
        assert_eq!(nested.project_root, "projects/libs/baz");
        assert_eq!(nested.relative_root_path, "../../..");

        let here = resolve("baz", "lib", ".").unwrap();
        assert_eq!(here.project_root, "baz");
    }

    #[test]
    fn resolution_is_deterministic() {
        let a = resolve("@acme/widgets", "acme", "projects").unwrap();
        let b = resolve("@acme/widgets", "acme", "projects").unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn rejects_invalid_names() {
        for name in ["", "  ", "1abc", "foo-1bar", "foo/bar", "foo bar", "@/bar", "@foo/", "a$b"] {
            assert!(
                matches!(validate_project_name(name), Err(DomainError::InvalidName { .. })),
                "accepted: {name:?}"
            );
        }
    }

    #[test]
    fn rejects_reserved_names() {
        for name in RESERVED_NAMES {
            assert!(validate_project_name(name).is_err(), "accepted: {name}");
        }
    }

    #[test]
    fn rejects_reserved_short_names_behind_a_scope() {
        for name in ["@acme/app", "@x/test", "@x/vendor", "@x/ember-cli"] {
            assert!(
                matches!(validate_project_name(name), Err(DomainError::InvalidName { .. })),
                "accepted: {name}"
            );
        }
        assert!(validate_project_name("@app/widgets").is_ok());
    }

    #[test]
    fn dotted_names_fail_package_check() {
        let err = validate_project_name("foo.bar").unwrap_err();
        assert!(err.to_string().contains("package name"));
    }

    #[test]
    fn accepts_valid_names() {
        for name in ["widgets", "my-lib", "MyLib", "@acme/widgets", "@acme/ui-kit", "lib2"] {
            assert!(validate_project_name(name).is_ok(), "rejected: {name}");
        }
    }
}
