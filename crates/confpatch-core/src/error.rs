//! Error types for patch operations.

use confpatch_syntax::SyntaxError;

use crate::path::PathKey;

/// The document does not have the `export default call({ ... })` shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructureError {
    #[error("document has no `export default`")]
    NoDefaultExport,

    #[error("document has {0} default exports, expected exactly one")]
    MultipleDefaultExports(usize),

    #[error("default export is a {0}, expected a call expression")]
    NotACall(&'static str),

    #[error("`{0}(...)` is called without a config argument")]
    MissingConfigArgument(String),

    #[error("first argument of `{callee}(...)` is a {found}, expected an object literal")]
    NotAnObjectLiteral { callee: String, found: &'static str },
}

/// Any failure of [`add_or_update`](crate::add_or_update),
/// [`remove_properties`](crate::remove_properties) or
/// [`read_config`](crate::read_config). No output is produced on error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatchError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error("unsupported value at `{path}`: {detail}")]
    UnsupportedValueType { path: PathKey, detail: String },

    #[error("invalid property path `{0}`")]
    InvalidPath(String),
}

impl PatchError {
    pub(crate) fn unsupported(path: &PathKey, detail: impl Into<String>) -> Self {
        PatchError::UnsupportedValueType {
            path: path.clone(),
            detail: detail.into(),
        }
    }
}
