//! Effective settings with provenance
//!
//! The merged settings plus where each contributing layer came from.

use confpatch_core::{PrintOptions, QuoteStyle};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use super::defaults::BuiltinDefaults;
use super::merge::merge_layers;
use crate::discover::DiscoverSettings;

/// Schema version for the `settings` output
pub const SCHEMA_VERSION: u32 = 1;

/// Largest accepted `print.indent`
pub const MAX_INDENT: u64 = 8;

/// Largest accepted `discover.max_depth`
pub const MAX_DEPTH: u64 = 64;

/// Origin of a settings layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SettingsOrigin {
    Builtin,
    User,
    Repo,
    Cli,
}

/// A contributing settings layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsSource {
    pub origin: SettingsOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Merged settings with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveSettings {
    pub schema_version: u32,

    /// The merged settings object
    pub settings: Value,

    /// Contributing layers in precedence order
    pub sources: Vec<SettingsSource>,
}

/// `$HOME/.config/confpatch/config.toml`
pub fn default_user_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config/confpatch/config.toml"))
}

/// `.confpatch.toml` in the working directory
pub fn default_repo_path() -> PathBuf {
    PathBuf::from(".confpatch.toml")
}

impl EffectiveSettings {
    /// Build effective settings from layers. Missing files are skipped.
    pub fn build(
        user_path: Option<&Path>,
        repo_path: Option<&Path>,
        cli_overrides: Option<Value>,
    ) -> Result<Self, SettingsError> {
        let mut layers = vec![BuiltinDefaults::default().to_value()];
        let mut sources = vec![SettingsSource {
            origin: SettingsOrigin::Builtin,
            path: None,
            digest: None,
        }];

        for (origin, path) in [
            (SettingsOrigin::User, user_path),
            (SettingsOrigin::Repo, repo_path),
        ] {
            let Some(path) = path.filter(|p| p.exists()) else {
                continue;
            };
            let (value, digest) = load_toml_file(path)?;
            tracing::debug!(path = %path.display(), ?origin, "loaded settings layer");
            layers.push(value);
            sources.push(SettingsSource {
                origin,
                path: Some(path.to_string_lossy().to_string()),
                digest: Some(digest),
            });
        }

        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(SettingsSource {
                origin: SettingsOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let merged = merge_layers(layers);
        validate_settings(&merged)?;

        Ok(Self {
            schema_version: SCHEMA_VERSION,
            settings: merged,
            sources,
        })
    }

    /// Presentation options for synthesized text.
    pub fn print_options(&self) -> PrintOptions {
        let defaults = BuiltinDefaults::default();
        let quote = match self.get_str("print.quote") {
            Some("double") => QuoteStyle::Double,
            _ => QuoteStyle::Single,
        };
        PrintOptions::default()
            .with_indent_width(self.get_u64("print.indent").unwrap_or(defaults.indent) as usize)
            .with_quote(quote)
            .with_trailing_comma(
                self.get_bool("print.trailing_comma")
                    .unwrap_or(defaults.trailing_comma),
            )
    }

    /// Settings for `find`.
    pub fn discover_settings(&self) -> DiscoverSettings {
        let defaults = BuiltinDefaults::default();
        DiscoverSettings {
            patterns: self
                .get_strings("discover.patterns")
                .unwrap_or(defaults.discover_patterns),
            max_depth: self
                .get_u64("discover.max_depth")
                .unwrap_or(defaults.discover_max_depth) as usize,
            skip_dirs: self
                .get_strings("discover.skip_dirs")
                .unwrap_or(defaults.discover_skip_dirs),
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Get a settings value by dotted path
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.settings;
        for part in path.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    pub fn get_u64(&self, path: &str) -> Option<u64> {
        self.get(path).and_then(|v| v.as_u64())
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|v| v.as_str())
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(|v| v.as_bool())
    }

    fn get_strings(&self, path: &str) -> Option<Vec<String>> {
        self.get(path)?
            .as_array()?
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect()
    }
}

/// Load and parse a TOML file, returning the value and digest
fn load_toml_file(path: &Path) -> Result<(Value, String), SettingsError> {
    let bytes = fs::read(path)
        .map_err(|e| SettingsError::IoError(format!("{}: {}", path.display(), e)))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hex::encode(hasher.finalize());

    let contents = String::from_utf8(bytes).map_err(|e| {
        SettingsError::ParseError(format!("{}: invalid UTF-8: {}", path.display(), e))
    })?;
    let toml_value: toml::Value = toml::from_str(&contents).map_err(|e| {
        SettingsError::ParseError(format!("{}: TOML parse error: {}", path.display(), e))
    })?;

    Ok((toml_to_json(toml_value), digest))
}

/// Convert a TOML value to JSON. Non-finite floats become null.
pub(crate) fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

fn validate_settings(settings: &Value) -> Result<(), SettingsError> {
    let get = |path: &str| {
        path.split('.')
            .try_fold(settings, |current, part| current.get(part))
    };

    match get("print.indent") {
        Some(v) if v.as_u64().is_some_and(|n| n <= MAX_INDENT) => {}
        _ => {
            return Err(SettingsError::ValidationError(format!(
                "print.indent must be an integer in [0, {MAX_INDENT}]"
            )))
        }
    }

    match get("print.quote").and_then(Value::as_str) {
        Some("single" | "double") => {}
        _ => {
            return Err(SettingsError::ValidationError(
                "print.quote must be \"single\" or \"double\"".to_string(),
            ))
        }
    }

    if !get("print.trailing_comma").is_some_and(Value::is_boolean) {
        return Err(SettingsError::ValidationError(
            "print.trailing_comma must be a boolean".to_string(),
        ));
    }

    match get("discover.max_depth").and_then(Value::as_u64) {
        Some(depth) if (1..=MAX_DEPTH).contains(&depth) => {}
        _ => {
            return Err(SettingsError::ValidationError(format!(
                "discover.max_depth must be an integer in [1, {MAX_DEPTH}]"
            )))
        }
    }

    for key in ["discover.patterns", "discover.skip_dirs"] {
        let is_string_list = get(key)
            .and_then(Value::as_array)
            .is_some_and(|items| items.iter().all(Value::is_string));
        if !is_string_list {
            return Err(SettingsError::ValidationError(format!(
                "{key} must be a list of strings"
            )));
        }
    }

    Ok(())
}

/// Settings errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_build_with_defaults_only() {
        let settings = EffectiveSettings::build(None, None, None).unwrap();

        assert_eq!(settings.schema_version, SCHEMA_VERSION);
        assert_eq!(settings.get_u64("print.indent"), Some(2));
        assert_eq!(settings.get_str("print.quote"), Some("single"));
        assert_eq!(settings.print_options(), PrintOptions::default());
    }

    #[test]
    fn test_build_with_cli_override() {
        let cli = serde_json::json!({"print": {"indent": 4, "quote": "double"}});
        let settings = EffectiveSettings::build(None, None, Some(cli)).unwrap();

        let options = settings.print_options();
        assert_eq!(options.indent, "    ");
        assert_eq!(options.quote, QuoteStyle::Double);
        assert!(options.trailing_comma);
    }

    #[test]
    fn test_validation_indent() {
        let cli = serde_json::json!({"print": {"indent": 9}});
        let err = EffectiveSettings::build(None, None, Some(cli)).unwrap_err();
        assert!(err.to_string().contains("print.indent"));
    }

    #[test]
    fn test_validation_quote() {
        let cli = serde_json::json!({"print": {"quote": "backtick"}});
        let err = EffectiveSettings::build(None, None, Some(cli)).unwrap_err();
        assert!(err.to_string().contains("print.quote"));
    }

    #[test]
    fn test_validation_patterns() {
        let cli = serde_json::json!({"discover": {"patterns": "cypress.config.ts"}});
        let err = EffectiveSettings::build(None, None, Some(cli)).unwrap_err();
        assert!(err.to_string().contains("discover.patterns"));
    }

    #[test]
    fn test_load_toml_layers() {
        let mut user = NamedTempFile::new().unwrap();
        writeln!(user, "[print]").unwrap();
        writeln!(user, "indent = 4").unwrap();
        writeln!(user, "trailing_comma = false").unwrap();

        let mut repo = NamedTempFile::new().unwrap();
        writeln!(repo, "[print]").unwrap();
        writeln!(repo, "quote = \"double\"").unwrap();
        writeln!(repo, "[discover]").unwrap();
        writeln!(repo, "skip_dirs = [\"vendor\"]").unwrap();

        let settings =
            EffectiveSettings::build(Some(user.path()), Some(repo.path()), None).unwrap();

        let options = settings.print_options();
        assert_eq!(options.indent, "    ");
        assert_eq!(options.quote, QuoteStyle::Double);
        assert!(!options.trailing_comma);
        assert_eq!(settings.discover_settings().skip_dirs, vec!["vendor"]);

        let origins: Vec<_> = settings.sources.iter().map(|s| s.origin.clone()).collect();
        assert_eq!(
            origins,
            vec![SettingsOrigin::Builtin, SettingsOrigin::User, SettingsOrigin::Repo]
        );
        assert_eq!(settings.sources[1].digest.as_ref().unwrap().len(), 64);
    }

    #[test]
    fn test_missing_files_skipped() {
        let settings = EffectiveSettings::build(
            Some(Path::new("/nonexistent/confpatch/config.toml")),
            None,
            None,
        )
        .unwrap();

        assert_eq!(settings.sources.len(), 1);
        assert_eq!(settings.sources[0].origin, SettingsOrigin::Builtin);
    }

    #[test]
    fn test_invalid_toml() {
        let mut repo = NamedTempFile::new().unwrap();
        writeln!(repo, "[print").unwrap();
        let err = EffectiveSettings::build(None, Some(repo.path()), None).unwrap_err();
        assert!(matches!(err, SettingsError::ParseError(_)));
    }

    #[test]
    fn test_toml_to_json_keeps_order() {
        let value: toml::Value = toml::from_str("b = 1\na = [true, 1.5]\n[c]\nd = \"x\"").unwrap();
        let json = toml_to_json(value);
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["b", "a", "c"]);
        assert_eq!(json["a"], serde_json::json!([true, 1.5]));
    }
}
