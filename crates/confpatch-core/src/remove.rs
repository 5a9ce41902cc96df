//! Recursive removal of properties by full path.

use confpatch_syntax::{line_end, Expr, Member, ObjectLit};
use tracing::debug;

use crate::path::{PathKey, RemovalSpec};

/// Remove every leaf member of `existing` (the object at `base`) whose full
/// path is listed in `spec`.
///
/// Object-valued properties are never removed; they are searched instead
/// and kept even when they end up empty. Paths that match nothing are
/// ignored.
///
/// Comments go with the member they describe: a removed member takes its
/// own-line comments above it and the comment after it on its line, while a
/// comment on the line of the member (or `{`) before it is kept.
pub fn remove_properties(existing: &ObjectLit, spec: &RemovalSpec, base: &PathKey) -> ObjectLit {
    let mut members = Vec::with_capacity(existing.members.len());
    let mut removed_any = false;
    let mut after_removed = false;
    // Same-line comment of the last kept member, or of `{`, before a run of
    // removed members.
    let mut carried = String::new();

    for member in &existing.members {
        let path = member.name().map(|name| base.child(name));
        let kept = match (member, &path) {
            (Member::Property(prop), Some(path)) => match &prop.value {
                Expr::Object(object) => {
                    if spec.contains(path) {
                        debug!(%path, "path names an object, searching it instead");
                    }
                    if spec.has_descendant_of(path) {
                        Some(Member::Property(
                            prop.with_value(Expr::Object(remove_properties(object, spec, path))),
                        ))
                    } else {
                        Some(member.clone())
                    }
                }
                _ if spec.contains(path) => {
                    debug!(%path, "removing property");
                    None
                }
                _ => Some(member.clone()),
            },
            (Member::Opaque(_), Some(path)) if spec.contains(path) => {
                debug!(%path, "removing shorthand or method member");
                None
            }
            _ => Some(member.clone()),
        };

        let Some(mut kept) = kept else {
            if !after_removed {
                carried = member.leading().map(line_tail).unwrap_or_default().to_string();
            }
            removed_any = true;
            after_removed = true;
            continue;
        };
        if after_removed {
            if let Some(leading) = leading_mut(&mut kept) {
                drop_removed_line_tail(leading);
                leading.insert_str(0, &carried);
            }
            carried.clear();
            after_removed = false;
        }
        members.push(kept);
    }

    let mut close = existing.close.clone();
    if after_removed {
        if let Some(close) = close.as_mut() {
            drop_removed_line_tail(close);
            close.insert_str(0, &carried);
        }
    }
    let mut trailing_comma = existing.trailing_comma;
    if members.is_empty() && removed_any {
        trailing_comma = None;
        if close.as_deref().is_some_and(|c| c.trim().is_empty()) {
            close = None;
        }
    }

    ObjectLit {
        members,
        close,
        trailing_comma,
    }
}

fn leading_mut(member: &mut Member) -> Option<&mut String> {
    match member {
        Member::Property(prop) => prop.layout.as_mut().map(|layout| &mut layout.leading),
        Member::Opaque(opaque) => Some(&mut opaque.leading),
    }
}

/// Text before the first line break of `text` when it holds a comment.
fn line_tail(text: &str) -> &str {
    match line_end(text) {
        Some(end) if !text[..end].trim().is_empty() => &text[..end],
        _ => "",
    }
}

/// A comment on the same line as a removed member (`a: 1, // note`) ends up
/// in front of the next member; drop it along with the member.
fn drop_removed_line_tail(text: &mut String) {
    let end = line_tail(text.as_str()).len();
    text.replace_range(..end, "");
}
