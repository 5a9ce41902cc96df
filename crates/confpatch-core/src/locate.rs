//! Finding the config root.

use confpatch_syntax::{CallExpr, Document, Expr, ObjectLit};

use crate::error::StructureError;

/// The object literal passed to the default-exported call.
#[derive(Debug, Clone, Copy)]
pub struct ConfigRoot<'d> {
    document: &'d Document,
    segment: usize,
    call: &'d CallExpr,
    object: &'d ObjectLit,
}

impl<'d> ConfigRoot<'d> {
    pub fn call(&self) -> &'d CallExpr {
        self.call
    }

    pub fn object(&self) -> &'d ObjectLit {
        self.object
    }

    /// A copy of the document with the config root replaced.
    pub fn replace(&self, object: ObjectLit) -> Document {
        let mut document = self.document.clone();
        if let Some(export) = document.default_export_mut(self.segment) {
            if let Expr::Call(call) = &mut export.expr {
                if let Some(arg) = call.args.first_mut() {
                    arg.expr = Expr::Object(object);
                }
            }
        }
        document
    }
}

/// Locate the config root: the document must have exactly one
/// `export default`, exporting a call whose first argument is an object
/// literal.
pub fn locate(document: &Document) -> Result<ConfigRoot<'_>, StructureError> {
    let exports: Vec<_> = document.default_exports().collect();
    let (segment, export) = match exports.as_slice() {
        [] => return Err(StructureError::NoDefaultExport),
        [one] => *one,
        many => return Err(StructureError::MultipleDefaultExports(many.len())),
    };
    let Expr::Call(call) = &export.expr else {
        return Err(StructureError::NotACall(export.expr.kind_name()));
    };
    let object = match call.first_arg() {
        None => {
            return Err(StructureError::MissingConfigArgument(
                call.callee_name().to_string(),
            ))
        }
        Some(Expr::Object(object)) => object,
        Some(other) => {
            return Err(StructureError::NotAnObjectLiteral {
                callee: call.callee_name().to_string(),
                found: other.kind_name(),
            })
        }
    };
    tracing::trace!(
        callee = call.callee_name(),
        members = object.members.len(),
        "located config root"
    );
    Ok(ConfigRoot {
        document,
        segment,
        call,
        object,
    })
}
