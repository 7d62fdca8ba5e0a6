//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The CLI
//! owns configuration; the core crate only ever sees the
//! [`LibraryOptions`](libforge_core::domain::LibraryOptions) built from it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (applied at the call-site, not here)
//! 2. `LIBFORGE_*` environment variables, `__` between key segments
//!    (`LIBFORGE_DEFAULTS__PREFIX=acme`)
//! 3. The configuration file (see [`AppConfig::active_path`])
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CliError, CliResult};

/// Name of the project-local configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".libforge.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "LIBFORGE";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Defaults for `libforge library`.
    pub defaults: Defaults,
    /// Template settings.
    pub templates: TemplateConfig,
    /// Output settings.
    pub output: OutputConfig,
    /// Log sink settings.
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub prefix: String,
    pub skip_install: bool,
    /// Program run for `Task::NodePackageInstall`.
    pub package_manager: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            prefix: libforge_core::domain::options::DEFAULT_PREFIX.into(),
            skip_install: false,
            package_manager: "npm".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory replacing the built-in library template.
    pub local_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`.
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// When set, events are also appended to this file (no ANSI codes).
    pub file: Option<PathBuf>,
}

/// Keys accepted by `config get` and `config set`.
pub const KNOWN_KEYS: [&str; 7] = [
    "defaults.prefix",
    "defaults.skip_install",
    "defaults.package_manager",
    "templates.local_path",
    "output.no_color",
    "output.format",
    "logging.file",
];

impl AppConfig {
    /// Load defaults, then the configuration file, then the environment.
    ///
    /// An explicit `config_file` (from `--config`) must exist; the implicit
    /// file is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(p) => (p.clone(), true),
            None => (Self::active_path(), false),
        };
        Self::load_from(&path, required, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_from(path: &Path, required: bool, env: Environment) -> anyhow::Result<Self> {
        tracing::debug!(path = %path.display(), required, "Loading configuration");

        let defaults =
            Config::try_from(&Self::default()).context("failed to build default configuration")?;

        Config::builder()
            .add_source(defaults)
            .add_source(File::from(path).format(FileFormat::Toml).required(required))
            .add_source(
                env.prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .ignore_empty(true),
            )
            .build()
            .with_context(|| format!("failed to read configuration from '{}'", path.display()))?
            .try_deserialize()
            .context("invalid configuration value")
    }

    /// The file `load(None)` reads and `config set` writes: `.libforge.toml`
    /// in the current directory when present, else the platform file.
    pub fn active_path() -> PathBuf {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            local
        } else {
            Self::config_path()
        }
    }

    /// Path to the platform configuration file.
    ///
    /// Uses `directories::ProjectDirs`, falling back to `.libforge.toml` in
    /// the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "libforge", "libforge")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Value at a dotted key, rendered for display. Unset values are empty.
    pub fn get(&self, key: &str) -> CliResult<String> {
        check_key(key)?;
        let tree = serde_json::to_value(self).map_err(|e| CliError::ConfigError {
            message: format!("failed to serialise configuration: {e}"),
            source: Some(Box::new(e)),
        })?;

        let value = key
            .split('.')
            .try_fold(&tree, |node, segment| node.get(segment))
            .unwrap_or(&Value::Null);

        Ok(match value {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Render as TOML, the same format `init` writes.
    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::ConfigError {
            message: format!("failed to serialise configuration: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

/// Set `key` to `raw` inside the TOML document `text`, returning the new text.
///
/// Booleans are stored as TOML booleans; the result must still deserialise
/// into an [`AppConfig`].
pub fn set_value(text: &str, key: &str, raw: &str) -> CliResult<String> {
    check_key(key)?;

    let mut doc: toml::Table = toml::from_str(text).map_err(|e| CliError::ConfigError {
        message: format!("configuration file is not valid TOML: {e}"),
        source: Some(Box::new(e)),
    })?;

    let Some((section, field)) = key.split_once('.') else {
        return Err(unknown_key(key));
    };

    let value = match raw {
        "true" => toml::Value::Boolean(true),
        "false" => toml::Value::Boolean(false),
        _ => toml::Value::String(raw.to_string()),
    };

    let table = doc
        .entry(section)
        .or_insert_with(|| toml::Value::Table(toml::Table::new()));
    let Some(table) = table.as_table_mut() else {
        return Err(CliError::ConfigError {
            message: format!("'{section}' is not a table in the configuration file"),
            source: None,
        });
    };
    table.insert(field.to_string(), value);

    let updated = toml::to_string_pretty(&doc).map_err(|e| CliError::ConfigError {
        message: format!("failed to serialise configuration: {e}"),
        source: Some(Box::new(e)),
    })?;

    toml::from_str::<AppConfig>(&updated).map_err(|e| CliError::ConfigError {
        message: format!("invalid value for '{key}': {e}"),
        source: Some(Box::new(e)),
    })?;

    Ok(updated)
}

fn check_key(key: &str) -> CliResult<()> {
    if KNOWN_KEYS.contains(&key) {
        Ok(())
    } else {
        Err(unknown_key(key))
    }
}

fn unknown_key(key: &str) -> CliError {
    CliError::ConfigError {
        message: format!("Unknown config key: '{key}'"),
        source: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env() -> Environment {
        Environment::with_prefix("LIBFORGE_TEST_UNSET_PREFIX")
    }

    #[test]
    fn defaults_match_documented_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.defaults.prefix, "lib");
        assert_eq!(cfg.defaults.package_manager, "npm");
        assert!(!cfg.defaults.skip_install);
        assert_eq!(cfg.output.format, "auto");
        assert!(cfg.logging.file.is_none());
    }

    #[test]
    fn missing_optional_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let cfg =
            AppConfig::load_from(&temp.path().join("absent.toml"), false, no_env()).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(AppConfig::load_from(&temp.path().join("absent.toml"), true, no_env()).is_err());
    }

    #[test]
    fn file_values_override_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "[defaults]\nprefix = \"acme\"\npackage_manager = \"pnpm\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load_from(&path, true, no_env()).unwrap();
        assert_eq!(cfg.defaults.prefix, "acme");
        assert_eq!(cfg.defaults.package_manager, "pnpm");
        assert!(!cfg.defaults.skip_install);
    }

    #[test]
    fn environment_overrides_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[defaults]\nprefix = \"acme\"\n").unwrap();

        let env = Environment::with_prefix(ENV_PREFIX).source(Some(
            [
                ("LIBFORGE_DEFAULTS__PREFIX".to_string(), "env".to_string()),
                ("LIBFORGE_DEFAULTS__SKIP_INSTALL".to_string(), "true".to_string()),
            ]
            .into_iter()
            .collect(),
        ));

        let cfg = AppConfig::load_from(&path, true, env).unwrap();
        assert_eq!(cfg.defaults.prefix, "env");
        assert!(cfg.defaults.skip_install);
    }

    #[test]
    fn get_known_and_unset_keys() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.get("defaults.prefix").unwrap(), "lib");
        assert_eq!(cfg.get("output.no_color").unwrap(), "false");
        assert_eq!(cfg.get("templates.local_path").unwrap(), "");
    }

    #[test]
    fn get_unknown_key_is_error() {
        assert!(matches!(
            AppConfig::default().get("does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
    }

    #[test]
    fn set_value_creates_sections_and_keeps_others() {
        let text = "[output]\nformat = \"plain\"\n";
        let updated = set_value(text, "defaults.skip_install", "true").unwrap();

        let cfg: AppConfig = toml::from_str(&updated).unwrap();
        assert!(cfg.defaults.skip_install);
        assert_eq!(cfg.output.format, "plain");
    }

    #[test]
    fn set_value_rejects_ill_typed_values() {
        assert!(set_value("", "output.no_color", "sometimes").is_err());
        assert!(set_value("", "defaults.colour", "red").is_err());
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let text = AppConfig::default().to_toml().unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, AppConfig::default());
    }
}
