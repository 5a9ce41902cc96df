//! Recursive merge of a patch into an existing object literal.

use std::collections::HashSet;

use confpatch_syntax::{Expr, Member, ObjectLit, Property};
use indexmap::IndexMap;
use tracing::debug;

use crate::error::PatchError;
use crate::literal::build;
use crate::path::PathKey;
use crate::value::ConfigValue;

/// Merge `patch` into `existing`, the object at `base`.
///
/// Existing members keep their order and text unless the patch names them:
/// an object patched onto an object merges recursively, anything else
/// replaces the value. Patch keys with no existing member are appended
/// after all existing members, in patch order. Errors abort the whole merge.
pub fn merge_object(
    existing: &ObjectLit,
    patch: &IndexMap<String, ConfigValue>,
    base: &PathKey,
) -> Result<ObjectLit, PatchError> {
    let mut consumed: HashSet<&str> = HashSet::new();
    let mut members = Vec::with_capacity(existing.members.len() + patch.len());

    for member in &existing.members {
        let Some((name, value)) = member
            .name()
            .and_then(|name| patch.get_key_value(name))
            .filter(|(name, _)| !consumed.contains(name.as_str()))
        else {
            members.push(member.clone());
            continue;
        };
        consumed.insert(name.as_str());
        let path = base.child(name);

        let property = match member {
            Member::Property(prop) => match (&prop.value, value) {
                (Expr::Object(object), ConfigValue::Object(nested)) => {
                    debug!(%path, "merging into existing object");
                    prop.with_value(Expr::Object(merge_object(object, nested, &path)?))
                }
                _ => {
                    debug!(%path, value = value.kind_name(), "replacing property value");
                    prop.with_value(build(value, &path)?)
                }
            },
            Member::Opaque(opaque) => {
                debug!(%path, value = value.kind_name(), "replacing shorthand or method member");
                Property::replacing(opaque, name.as_str(), build(value, &path)?)
            }
        };
        members.push(Member::Property(property));
    }

    for (name, value) in patch {
        if consumed.contains(name.as_str()) {
            continue;
        }
        let path = base.child(name);
        debug!(%path, value = value.kind_name(), "appending property");
        members.push(Member::Property(Property::new(name.as_str(), build(value, &path)?)));
    }

    Ok(ObjectLit {
        members,
        close: existing.close.clone(),
        trailing_comma: existing.trailing_comma,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use confpatch_syntax::{parse_expression, print_expr, PrintOptions};
    use pretty_assertions::assert_eq;

    fn merged(source: &str, patch: ConfigValue) -> Result<String, PatchError> {
        let Expr::Object(object) = parse_expression(source).unwrap() else {
            panic!("not an object: {source}");
        };
        let patch = patch.as_object().cloned().unwrap();
        let result = merge_object(&object, &patch, &PathKey::root())?;
        Ok(print_expr(&Expr::Object(result), &PrintOptions::default()))
    }

    #[test]
    fn test_empty_patch_is_identity() {
        let source = "{\n  a: 1, // keep\n  b: { c: 'x' },\n}";
        assert_eq!(merged(source, ConfigValue::Object(IndexMap::new())).unwrap(), source);
    }

    #[test]
    fn test_replace_scalar_keeps_siblings() {
        let source = "{\n  video: true,\n  fixturesFolder: 'cypress/fixtures', // here\n  pluginsFile: false,\n}";
        let patch = ConfigValue::object([("fixturesFolder", "cypress/fixtures/cool".into())]);
        assert_eq!(
            merged(source, patch).unwrap(),
            "{\n  video: true,\n  fixturesFolder: 'cypress/fixtures/cool', // here\n  pluginsFile: false,\n}"
        );
    }

    #[test]
    fn test_nested_merge_keeps_unmentioned_children() {
        let source = "{\n  e2e: {\n    video: true,\n    supportFile: './e2e.ts',\n  },\n}";
        let patch = ConfigValue::object([(
            "e2e",
            ConfigValue::object([("video", false.into()), ("retries", 2i64.into())]),
        )]);
        assert_eq!(
            merged(source, patch).unwrap(),
            "{\n  e2e: {\n    video: false,\n    supportFile: './e2e.ts',\n    retries: 2,\n  },\n}"
        );
    }

    #[test]
    fn test_object_onto_scalar_overwrites() {
        let source = "{ e2e: false }";
        let patch = ConfigValue::object([("e2e", ConfigValue::object([("video", true.into())]))]);
        assert_eq!(merged(source, patch).unwrap(), "{ e2e: { video: true } }");
    }

    #[test]
    fn test_scalar_onto_object_overwrites() {
        let source = "{ e2e: { video: true }, x: 1 }";
        let patch = ConfigValue::object([("e2e", "off".into())]);
        assert_eq!(merged(source, patch).unwrap(), "{ e2e: 'off', x: 1 }");
    }

    #[test]
    fn test_new_keys_appended_in_patch_order() {
        let source = "{\n  a: 1,\n}";
        let patch = ConfigValue::object([
            ("z", 26i64.into()),
            ("a", 0i64.into()),
            ("m", 13i64.into()),
        ]);
        assert_eq!(merged(source, patch).unwrap(), "{\n  a: 0,\n  z: 26,\n  m: 13,\n}");
    }

    #[test]
    fn test_named_opaque_member_is_replaced_not_duplicated() {
        let source = "{\n  baseUrl,\n  setupNodeEvents(on) {\n    return on;\n  },\n  ...rest,\n}";
        let patch = ConfigValue::object([
            ("baseUrl", "http://localhost".into()),
            ("setupNodeEvents", ConfigValue::opaque("nxSetup(on)")),
        ]);
        assert_eq!(
            merged(source, patch).unwrap(),
            "{\n  baseUrl: 'http://localhost',\n  setupNodeEvents: nxSetup(on),\n  ...rest,\n}"
        );
    }

    #[test]
    fn test_unsupported_value_aborts_whole_merge() {
        let source = "{ a: 1, b: { c: 2 } }";
        let patch = ConfigValue::object([
            ("a", 5i64.into()),
            ("b", ConfigValue::object([("c", ConfigValue::opaque("1 + 1"))])),
        ]);
        match merged(source, patch) {
            Err(PatchError::UnsupportedValueType { path, .. }) => {
                assert_eq!(path.to_string(), "b.c")
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
