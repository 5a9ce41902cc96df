//! Rebuilding call expressions from opaque marker text.
//!
//! Marker text such as `componentDevServer('tsconfig.cy.json', 'swc')` is
//! taken apart into a callee and its arguments with the delimiter-aware
//! scanner, so commas inside strings, nested calls and brackets never split
//! an argument. Each argument is rebuilt like a top-level scalar:
//!
//! - string, number and boolean literals become fresh literal nodes;
//! - nested calls are rebuilt recursively;
//! - identifiers (`__dirname`, `path.sep`) and object literals are kept as
//!   written.
//!
//! Anything else is rejected.

use confpatch_syntax::{
    is_identifier_path, parse_expression, split_arguments, CallExpr, Expr, Literal, Scanner,
    SyntaxError,
};

use crate::error::PatchError;
use crate::path::PathKey;
use crate::value::{format_number, parse_number_literal};

/// Build a call expression from `marker`, the opaque value stored at `path`.
pub fn build_call(marker: &str, path: &PathKey) -> Result<Expr, PatchError> {
    let text = marker.trim();
    let mut sc = Scanner::new(text);
    let callee = scan_callee(&mut sc).ok_or_else(|| {
        PatchError::unsupported(path, format!("`{text}` does not start with a function name"))
    })?;
    sc.skip_trivia().map_err(|e| unreadable(path, text, e))?;
    if sc.peek() != Some(b'(') {
        return Err(PatchError::unsupported(
            path,
            format!("`{text}` is not a call expression"),
        ));
    }
    let open = sc.pos();
    sc.skip_group().map_err(|e| unreadable(path, text, e))?;
    let close = sc.pos() - 1;
    sc.skip_trivia().map_err(|e| unreadable(path, text, e))?;
    if !sc.is_eof() {
        return Err(PatchError::unsupported(
            path,
            format!("unexpected text after the call in `{text}`"),
        ));
    }

    let inner = &text[open + 1..close];
    let ranges = split_arguments(inner).map_err(|e| unreadable(path, text, e))?;
    let mut args = Vec::with_capacity(ranges.len());
    for range in ranges {
        args.push(build_argument(&inner[range], path)?);
    }
    tracing::trace!(%path, callee, args = args.len(), "rebuilt call expression");
    Ok(Expr::Call(CallExpr::new(callee, args)))
}

fn scan_callee<'a>(sc: &mut Scanner<'a>) -> Option<&'a str> {
    let start = sc.pos();
    loop {
        sc.scan_identifier()?;
        if sc.peek() == Some(b'.') {
            sc.bump();
        } else {
            break;
        }
    }
    Some(sc.slice(start..sc.pos()))
}

fn build_argument(text: &str, path: &PathKey) -> Result<Expr, PatchError> {
    let expr = parse_expression(text).map_err(|e| unreadable(path, text, e))?;
    match expr {
        Expr::Literal(Literal::Str { value, .. }) => Ok(Expr::string(value)),
        Expr::Literal(Literal::Number(raw)) => Ok(match parse_number_literal(&raw) {
            Some(n) => Expr::number(format_number(&n)),
            None => Expr::number(raw),
        }),
        Expr::Literal(Literal::Bool(b)) => Ok(Expr::boolean(b)),
        Expr::Call(_) => build_call(text, path),
        Expr::Object(object) => Ok(Expr::Object(object)),
        Expr::Verbatim(name) if is_identifier_path(&name) => Ok(Expr::Verbatim(name)),
        Expr::Verbatim(other) => Err(PatchError::unsupported(
            path,
            format!("call argument `{other}` is not a literal, identifier, object or call"),
        )),
    }
}

fn unreadable(path: &PathKey, text: &str, err: SyntaxError) -> PatchError {
    PatchError::unsupported(path, format!("cannot read call `{text}`: {}", err.message))
}
