//! Config document fixtures for integration tests
//!
//! - cypress.config.ts: multi-line config with a call-valued property
//! - inline.config.ts: the whole config object on one line
//! - nx-preset.config.js: spreads, methods, comments and template literals

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const CYPRESS: &str = "cypress.config.ts";
pub const INLINE: &str = "inline.config.ts";
pub const NX_PRESET: &str = "nx-preset.config.js";

/// All fixture documents
pub const ALL: &[&str] = &[CYPRESS, INLINE, NX_PRESET];

/// Path to a fixture document
pub fn config_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/configs")
        .join(name)
}

/// Load a fixture document
pub fn load(name: &str) -> String {
    fs::read_to_string(config_path(name))
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {}", name, e))
}

/// Lines of `after` that differ from the same-numbered lines of `before`
pub fn changed_lines<'a>(before: &str, after: &'a str) -> Vec<&'a str> {
    let before: Vec<&str> = before.lines().collect();
    after
        .lines()
        .enumerate()
        .filter(|(i, line)| before.get(*i) != Some(line))
        .map(|(_, line)| line)
        .collect()
}
