//! Layered settings
//!
//! Settings are merged from four layers, later layers winning:
//! 1. Built-in defaults
//! 2. User settings (~/.config/confpatch/config.toml)
//! 3. Repo settings (.confpatch.toml, or --config)
//! 4. CLI flags

mod defaults;
mod effective;
mod merge;

pub use defaults::BuiltinDefaults;
pub use effective::{
    default_repo_path, default_user_path, EffectiveSettings, SettingsError, SettingsOrigin,
    SettingsSource,
};
pub use merge::{deep_merge, merge_layers};

pub(crate) use effective::toml_to_json;
