//! Built-in defaults (layer 1)

use serde::{Deserialize, Serialize};

/// Built-in default settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Spaces per indent level in synthesized text (default: 2)
    pub indent: u64,

    /// Quote style for synthesized strings (default: "single")
    pub quote: String,

    /// Trailing comma in new multi-line objects (default: true)
    pub trailing_comma: bool,

    /// File name globs for `find` (default: cypress.config.*)
    pub discover_patterns: Vec<String>,

    /// Maximum directory depth for `find` (default: 6)
    pub discover_max_depth: u64,

    /// Directory names `find` never enters
    pub discover_skip_dirs: Vec<String>,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            indent: 2,
            quote: "single".to_string(),
            trailing_comma: true,
            discover_patterns: vec!["cypress.config.{ts,js,mjs,cjs}".to_string()],
            discover_max_depth: 6,
            discover_skip_dirs: vec![
                "node_modules".to_string(),
                ".git".to_string(),
                "dist".to_string(),
            ],
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "print": {
                "indent": self.indent,
                "quote": self.quote,
                "trailing_comma": self.trailing_comma
            },
            "discover": {
                "patterns": self.discover_patterns,
                "max_depth": self.discover_max_depth,
                "skip_dirs": self.discover_skip_dirs
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let defaults = BuiltinDefaults::default();
        assert_eq!(defaults.indent, 2);
        assert_eq!(defaults.quote, "single");
        assert!(defaults.trailing_comma);
        assert_eq!(defaults.discover_max_depth, 6);
    }

    #[test]
    fn test_to_value() {
        let value = BuiltinDefaults::default().to_value();

        assert_eq!(value["print"]["indent"], 2);
        assert_eq!(value["print"]["quote"], "single");
        assert_eq!(value["discover"]["patterns"][0], "cypress.config.{ts,js,mjs,cjs}");
        assert_eq!(value["discover"]["skip_dirs"].as_array().unwrap().len(), 3);
    }
}
