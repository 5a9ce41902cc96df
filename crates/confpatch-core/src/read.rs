//! Reading a config root back as values.

use confpatch_syntax::{print_expr, Expr, Literal, Member, ObjectLit, PrintOptions};
use indexmap::IndexMap;

use crate::value::{parse_number_literal, ConfigValue};

/// Convert an object literal to values.
///
/// Literals and nested objects are read structurally; every other
/// expression is reported as [`ConfigValue::Opaque`] with its source text.
/// Shorthand and method members appear under their name as opaque values;
/// spreads are skipped.
pub fn read_object(object: &ObjectLit) -> IndexMap<String, ConfigValue> {
    let mut entries = IndexMap::with_capacity(object.members.len());
    for member in &object.members {
        match member {
            Member::Property(prop) => {
                entries.insert(prop.key.name.clone(), read_expr(&prop.value));
            }
            Member::Opaque(opaque) => {
                if let Some(name) = &opaque.name {
                    entries.insert(name.clone(), ConfigValue::Opaque(opaque.text.clone()));
                }
            }
        }
    }
    entries
}

fn read_expr(expr: &Expr) -> ConfigValue {
    match expr {
        Expr::Object(object) => ConfigValue::Object(read_object(object)),
        Expr::Literal(Literal::Str { value, .. }) => ConfigValue::String(value.clone()),
        Expr::Literal(Literal::Bool(b)) => ConfigValue::Boolean(*b),
        Expr::Literal(Literal::Number(text)) => match parse_number_literal(text) {
            Some(n) => ConfigValue::Number(n),
            None => ConfigValue::Opaque(text.clone()),
        },
        Expr::Call(_) => ConfigValue::Opaque(print_expr(expr, &PrintOptions::default())),
        Expr::Verbatim(text) => ConfigValue::Opaque(text.clone()),
    }
}
