//! Structured configuration documents (`angular.json`, `package.json`,
//! `tsconfig.json`).
//!
//! Documents are parsed into an insertion-ordered JSON object so that a
//! read-modify-write cycle keeps every untouched key, its position and its
//! value type. Serialization is always two-space indented with a trailing
//! newline.

use serde_json::{Map, Value};

use crate::domain::error::DomainError;

/// A parsed JSON document whose root is an object.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    path: String,
    root: Map<String, Value>,
}

impl ConfigDocument {
    /// Parse `text` read from `path`. A leading BOM is ignored.
    pub fn parse(path: impl Into<String>, text: &str) -> Result<Self, DomainError> {
        let path = path.into();
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let value: Value =
            serde_json::from_str(text).map_err(|e| DomainError::InvalidDocument {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        match value {
            Value::Object(root) => Ok(Self { path, root }),
            other => Err(DomainError::InvalidDocument {
                path,
                reason: format!("expected a JSON object at the top level, found {}", kind(&other)),
            }),
        }
    }

    pub fn from_map(path: impl Into<String>, root: Map<String, Value>) -> Self {
        Self {
            path: path.into(),
            root,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.root
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// Child object at `key`, created empty when absent.
    pub fn object_mut(&mut self, key: &str) -> Result<&mut Map<String, Value>, DomainError> {
        ensure_object(&self.path, &mut self.root, key)
    }

    pub fn to_pretty_string(&self) -> String {
        // Serializing a Map of Values cannot fail.
        let mut out = serde_json::to_string_pretty(&self.root).unwrap_or_else(|_| "{}".into());
        out.push('\n');
        out
    }
}

/// Return the object stored under `key`, inserting `{}` when it is missing.
///
/// A present value of another type is a document error, never overwritten.
pub fn ensure_object<'a>(
    path: &str,
    parent: &'a mut Map<String, Value>,
    key: &str,
) -> Result<&'a mut Map<String, Value>, DomainError> {
    let slot = parent
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));

    match slot {
        Value::Object(map) => Ok(map),
        other => Err(DomainError::InvalidDocument {
            path: path.to_string(),
            reason: format!("'{key}' must be an object, found {}", kind(other)),
        }),
    }
}

/// Return the array stored under `key`, inserting `[]` when it is missing.
pub fn ensure_array<'a>(
    path: &str,
    parent: &'a mut Map<String, Value>,
    key: &str,
) -> Result<&'a mut Vec<Value>, DomainError> {
    let slot = parent
        .entry(key.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));

    match slot {
        Value::Array(items) => Ok(items),
        other => Err(DomainError::InvalidDocument {
            path: path.to_string(),
            reason: format!("'{key}' must be an array, found {}", kind(other)),
        }),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_order_and_types() {
        let text = r#"{"zeta": 1, "alpha": true, "mid": {"b": "x", "a": null}, "n": 1.5}"#;
        let doc = ConfigDocument::parse("x.json", text).unwrap();
        let out = doc.to_pretty_string();

        let zeta = out.find("zeta").unwrap();
        let alpha = out.find("alpha").unwrap();
        assert!(zeta < alpha, "key order changed:\n{out}");
        assert!(out.contains("\"alpha\": true"));
        assert!(out.contains("\"n\": 1.5"));
        assert!(out.contains("\"a\": null"));
        assert!(out.ends_with("}\n"));
    }

    #[test]
    fn output_is_two_space_indented() {
        let doc = ConfigDocument::parse("x.json", r#"{"a":{"b":1}}"#).unwrap();
        assert_eq!(doc.to_pretty_string(), "{\n  \"a\": {\n    \"b\": 1\n  }\n}\n");
    }

    #[test]
    fn bom_is_ignored() {
        assert!(ConfigDocument::parse("x.json", "\u{feff}{}").is_ok());
    }

    #[test]
    fn rejects_non_object_root_and_bad_syntax() {
        assert!(matches!(
            ConfigDocument::parse("x.json", "[1, 2]"),
            Err(DomainError::InvalidDocument { .. })
        ));
        assert!(matches!(
            ConfigDocument::parse("x.json", "{ \"a\": }"),
            Err(DomainError::InvalidDocument { .. })
        ));
    }

    #[test]
    fn ensure_object_creates_or_rejects() {
        let mut doc = ConfigDocument::parse("x.json", r#"{"s": "str"}"#).unwrap();
        doc.object_mut("fresh").unwrap().insert("k".into(), Value::Bool(true));
        assert_eq!(doc.get("fresh").unwrap()["k"], true);
        assert!(doc.object_mut("s").is_err());
    }
}
