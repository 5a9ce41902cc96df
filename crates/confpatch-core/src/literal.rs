//! Building syntax nodes from patch values.

use confpatch_syntax::{Expr, ObjectLit, Property};
use indexmap::IndexMap;

use crate::call::build_call;
use crate::error::PatchError;
use crate::path::PathKey;
use crate::value::{format_number, ConfigValue};

/// Build the expression node for `value`, which sits at `path`.
pub fn build(value: &ConfigValue, path: &PathKey) -> Result<Expr, PatchError> {
    match value {
        ConfigValue::Number(n) => Ok(Expr::number(format_number(n))),
        ConfigValue::String(s) => Ok(Expr::string(s.as_str())),
        ConfigValue::Boolean(b) => Ok(Expr::boolean(*b)),
        ConfigValue::Object(entries) => Ok(Expr::Object(build_object(entries, path)?)),
        ConfigValue::Opaque(text) => build_call(text, path),
    }
}

/// Build a fresh object literal, keeping the entries' order.
pub fn build_object(
    entries: &IndexMap<String, ConfigValue>,
    path: &PathKey,
) -> Result<ObjectLit, PatchError> {
    let mut properties = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        properties.push(Property::new(key.as_str(), build(value, &path.child(key))?));
    }
    Ok(ObjectLit::from_properties(properties))
}
