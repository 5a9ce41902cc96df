//! Patch input: patch files and inline assignments
//!
//! A patch is assembled from, in order:
//! 1. an optional patch file (`.json`, or `.toml` converted to JSON)
//! 2. `--set key.path=VALUE` assignments (VALUE parsed as JSON, else a string)
//! 3. `--call key.path=fn('a')` assignments (opaque call expressions)

use confpatch_core::{ConfigValue, PatchError, PatchSpec, PathKey};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::settings::toml_to_json;

/// Errors while reading patch input
#[derive(Debug, thiserror::Error)]
pub enum PatchFileError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid assignment `{0}`: expected KEY=VALUE")]
    InvalidAssignment(String),

    #[error(transparent)]
    Patch(#[from] PatchError),
}

/// Read a patch file as JSON. `.toml` files are converted; anything else is
/// read as JSON.
pub fn load_patch_file(path: &Path) -> Result<Value, PatchFileError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| PatchFileError::IoError(format!("{}: {}", path.display(), e)))?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    if is_toml {
        let value: toml::Value = toml::from_str(&contents).map_err(|e| {
            PatchFileError::ParseError(format!("{}: TOML parse error: {}", path.display(), e))
        })?;
        Ok(toml_to_json(value))
    } else {
        serde_json::from_str(&contents).map_err(|e| {
            PatchFileError::ParseError(format!("{}: JSON parse error: {}", path.display(), e))
        })
    }
}

/// Split `key.path=value` at the first `=`.
pub fn parse_assignment(text: &str) -> Result<(&str, &str), PatchFileError> {
    match text.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => Err(PatchFileError::InvalidAssignment(text.to_string())),
    }
}

/// Value of a `--set` assignment: JSON if it parses, otherwise the raw text
/// as a string.
pub fn parse_set_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Assemble a patch from a file and inline assignments.
pub fn build_patch(
    file: Option<&Path>,
    sets: &[String],
    calls: &[String],
) -> Result<PatchSpec, PatchFileError> {
    let mut patch = match file {
        Some(path) => PatchSpec::from_json(&load_patch_file(path)?)?,
        None => PatchSpec::new(),
    };

    for assignment in sets {
        let (key, raw) = parse_assignment(assignment)?;
        let path = PathKey::parse(key)?;
        let value = ConfigValue::from_json(&parse_set_value(raw), &path)?;
        patch.insert_path(key, value)?;
    }

    for assignment in calls {
        let (key, expr) = parse_assignment(assignment)?;
        patch.insert_path(key, ConfigValue::opaque(expr.trim()))?;
    }

    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("e2e.video=false").unwrap(), ("e2e.video", "false"));
        assert_eq!(parse_assignment("a=b=c").unwrap(), ("a", "b=c"));
        assert_eq!(parse_assignment("a=").unwrap(), ("a", ""));
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn test_parse_set_value() {
        assert_eq!(parse_set_value("false"), json!(false));
        assert_eq!(parse_set_value("42"), json!(42));
        assert_eq!(parse_set_value("{\"a\": 1}"), json!({"a": 1}));
        assert_eq!(parse_set_value("http://localhost:1234"), json!("http://localhost:1234"));
        assert_eq!(parse_set_value("\"quoted\""), json!("quoted"));
    }

    #[test]
    fn test_build_patch_from_assignments() {
        let patch = build_patch(
            None,
            &["baseUrl=http://localhost:1234".to_string(), "e2e.video=false".to_string()],
            &["component.devServer=componentDevServer('tsconfig.cy.json', 'swc')".to_string()],
        )
        .unwrap();
        assert_eq!(
            patch.to_json(),
            json!({
                "baseUrl": "http://localhost:1234",
                "e2e": {"video": false},
                "component": {"devServer": {"$call": "componentDevServer('tsconfig.cy.json', 'swc')"}}
            })
        );
    }

    #[test]
    fn test_build_patch_rejects_arrays_with_path() {
        let err = build_patch(None, &["e2e.browsers=[\"chrome\"]".to_string()], &[]).unwrap_err();
        assert!(err.to_string().contains("e2e.browsers"), "{err}");
    }

    #[test]
    fn test_json_patch_file_then_assignments() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{\"e2e\": {{\"video\": true, \"retries\": 1}}}}").unwrap();

        let patch =
            build_patch(Some(file.path()), &["e2e.video=false".to_string()], &[]).unwrap();
        assert_eq!(patch.to_json(), json!({"e2e": {"video": false, "retries": 1}}));
    }

    #[test]
    fn test_toml_patch_file() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "baseUrl = \"http://localhost:1234\"").unwrap();
        writeln!(file, "[component]").unwrap();
        writeln!(file, "fixturesFolder = \"cypress/fixtures/cool\"").unwrap();

        let patch = build_patch(Some(file.path()), &[], &[]).unwrap();
        assert_eq!(
            patch.to_json(),
            json!({
                "baseUrl": "http://localhost:1234",
                "component": {"fixturesFolder": "cypress/fixtures/cool"}
            })
        );
    }

    #[test]
    fn test_bad_patch_file() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(matches!(
            build_patch(Some(file.path()), &[], &[]),
            Err(PatchFileError::ParseError(_))
        ));
    }
}
