//! Confpatch - format-preserving edits of JS/TS config files
//!
//! This crate wraps the pure edit operations of `confpatch-core` with the
//! file-system side: layered settings, config file discovery and patch
//! input files. The `confpatch` binary is built on top of it.

pub mod discover;
pub mod patch_file;
pub mod settings;

pub use confpatch_core::{
    add_or_update, read_config, remove_properties, ConfigValue, PatchError, PatchSpec, Patcher,
    PathKey, PrintOptions, QuoteStyle, RemovalSpec, StructureError, SyntaxError,
};
pub use confpatch_syntax as syntax;
pub use discover::{discover, DiscoverError, DiscoverSettings};
pub use patch_file::{build_patch, PatchFileError};
pub use settings::{EffectiveSettings, SettingsError};
