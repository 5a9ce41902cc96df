//! Printer: the inverse of the parser.
//!
//! Parsed nodes print their recorded text unchanged. Synthesized nodes (no
//! recorded trivia) are laid out with [`PrintOptions`]:
//!
//! - members of a multi-line object go on their own line, indented like
//!   their parsed siblings or, without any, one indent unit deeper than the
//!   line the object starts on;
//! - objects written on a single line stay on a single line, and so do new
//!   objects placed inside them;
//! - new lines end like the surrounding source (`\n` or `\r\n`);
//! - strings and non-identifier keys are quoted with the configured quote.

use crate::cst::{CallExpr, Document, Expr, Literal, Member, ObjectLit, Segment};
use crate::text::{format_key, line_end, line_terminator, quote, QuoteStyle};

/// Presentation options for synthesized nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintOptions {
    /// One level of indentation.
    pub indent: String,
    pub quote: QuoteStyle,
    /// Trailing comma after the last member of new multi-line objects.
    pub trailing_comma: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            quote: QuoteStyle::Single,
            trailing_comma: true,
        }
    }
}

impl PrintOptions {
    /// Indent with `width` spaces.
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent = " ".repeat(width);
        self
    }

    pub fn with_quote(mut self, quote: QuoteStyle) -> Self {
        self.quote = quote;
        self
    }

    pub fn with_trailing_comma(mut self, trailing_comma: bool) -> Self {
        self.trailing_comma = trailing_comma;
        self
    }
}

/// Print a document back to text.
pub fn print(doc: &Document, opts: &PrintOptions) -> String {
    let mut printer = Printer::new(opts, document_newline(doc));
    for segment in &doc.segments {
        match segment {
            Segment::Text(text) => printer.out.push_str(text),
            Segment::DefaultExport(export) => {
                printer.out.push_str(&export.head);
                printer.expr(&export.expr);
            }
        }
    }
    printer.out
}

/// Print a single expression, as if it started at column zero.
pub fn print_expr(expr: &Expr, opts: &PrintOptions) -> String {
    let mut printer = Printer::new(opts, "\n");
    printer.expr(expr);
    printer.out
}

/// Line terminator of the first line break outside the config expression.
fn document_newline(doc: &Document) -> &'static str {
    doc.segments
        .iter()
        .find_map(|segment| match segment {
            Segment::Text(text) => line_terminator(text),
            Segment::DefaultExport(export) => line_terminator(&export.head),
        })
        .unwrap_or("\n")
}

/// Line terminator used inside `obj`'s own trivia.
fn object_newline(obj: &ObjectLit) -> Option<&'static str> {
    obj.members
        .iter()
        .filter_map(Member::leading)
        .chain(obj.close.as_deref())
        .find_map(line_terminator)
}

struct Printer<'o> {
    out: String,
    opts: &'o PrintOptions,
    newline: &'static str,
    /// Inside an object laid out on one line.
    inline: bool,
}

impl<'o> Printer<'o> {
    fn new(opts: &'o PrintOptions, newline: &'static str) -> Self {
        Self {
            out: String::new(),
            opts,
            newline,
            inline: false,
        }
    }

    /// Indentation of the line currently being written.
    fn line_indent(&self) -> String {
        let line = match self.out.rfind('\n') {
            Some(i) => &self.out[i + 1..],
            None => &self.out[..],
        };
        line.chars().take_while(|c| *c == ' ' || *c == '\t').collect()
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Object(obj) => self.object(obj),
            Expr::Call(call) => self.call(call),
            Expr::Literal(lit) => self.literal(lit),
            Expr::Verbatim(text) => self.out.push_str(text),
        }
    }

    fn literal(&mut self, lit: &Literal) {
        match lit {
            Literal::Number(text) => self.out.push_str(text),
            Literal::Bool(true) => self.out.push_str("true"),
            Literal::Bool(false) => self.out.push_str("false"),
            Literal::Str { raw: Some(raw), .. } => self.out.push_str(raw),
            Literal::Str { value, raw: None } => self.out.push_str(&quote(value, self.opts.quote)),
        }
    }

    fn call(&mut self, call: &CallExpr) {
        self.out.push_str(&call.callee);
        self.out.push('(');
        for (i, arg) in call.args.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.out.push_str(&arg.leading);
            self.expr(&arg.expr);
            self.out.push_str(&arg.trailing);
        }
        if call.trailing_comma && !call.args.is_empty() {
            self.out.push(',');
        }
        self.out.push_str(&call.close);
        self.out.push(')');
    }

    fn object(&mut self, obj: &ObjectLit) {
        if obj.members.is_empty() {
            self.out.push('{');
            if let Some(close) = &obj.close {
                self.out.push_str(close);
            }
            self.out.push('}');
            return;
        }

        let base = self.line_indent();
        let newline = object_newline(obj).unwrap_or(self.newline);
        let has_source_layout = obj.members.iter().any(|m| m.leading().is_some());
        let close_breaks = obj.close.as_deref().is_some_and(|c| c.contains('\n'));
        let multiline = if has_source_layout {
            close_breaks
                || obj.members.iter().filter_map(Member::leading).any(|l| l.contains('\n'))
        } else {
            close_breaks || !self.inline
        };
        let member_indent = obj
            .members
            .iter()
            .filter_map(Member::leading)
            .find_map(|l| l.rfind('\n').map(|i| l[i + 1..].to_string()))
            .unwrap_or_else(|| format!("{base}{}", self.opts.indent));
        let new_leading = if multiline {
            format!("{newline}{member_indent}")
        } else {
            " ".to_string()
        };
        // A comment on the line of the last parsed member lives in `close`;
        // it stays on that line when new members follow.
        let last_source = obj.members.iter().rposition(|m| m.leading().is_some());
        let (close_tail, close_rest) = match (&obj.close, last_source) {
            (Some(close), Some(last)) if last + 1 < obj.members.len() => split_line_tail(close),
            (Some(close), _) => ("", close.as_str()),
            (None, _) => ("", ""),
        };

        let outer_inline = std::mem::replace(&mut self.inline, !multiline);
        self.out.push('{');
        for (i, member) in obj.members.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
                if last_source == Some(i - 1) {
                    self.out.push_str(close_tail);
                }
            }
            match member {
                Member::Property(prop) => {
                    match &prop.layout {
                        Some(layout) => self.out.push_str(&layout.leading),
                        None => self.out.push_str(&new_leading),
                    }
                    match &prop.key.raw {
                        Some(raw) => self.out.push_str(raw),
                        None => self.out.push_str(&format_key(&prop.key.name, self.opts.quote)),
                    }
                    match &prop.layout {
                        Some(layout) => self.out.push_str(&layout.separator),
                        None => self.out.push_str(": "),
                    }
                    self.expr(&prop.value);
                    if let Some(layout) = &prop.layout {
                        self.out.push_str(&layout.trailing);
                    }
                }
                Member::Opaque(op) => {
                    self.out.push_str(&op.leading);
                    self.out.push_str(&op.text);
                    self.out.push_str(&op.trailing);
                }
            }
        }

        self.inline = outer_inline;

        let trailing_comma = obj
            .trailing_comma
            .unwrap_or(multiline && self.opts.trailing_comma);
        if trailing_comma {
            self.out.push(',');
        }
        match &obj.close {
            Some(close) if has_source_layout || !close.trim().is_empty() => {
                self.out.push_str(close_rest)
            }
            _ if multiline => {
                self.out.push_str(newline);
                self.out.push_str(&base);
            }
            _ => self.out.push(' '),
        }
        self.out.push('}');
    }
}

/// Split `text` into a same-line comment before its first newline and the
/// rest.
fn split_line_tail(text: &str) -> (&str, &str) {
    match line_end(text) {
        Some(end) if !text[..end].trim().is_empty() => text.split_at(end),
        _ => ("", text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::{Property, Member};
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    const CONFIG: &str = r#"import { defineConfig } from 'cypress';

// comment with export default inside
export default defineConfig({
  baseUrl: 'http://localhost:4200', // trailing note
  component: {
    devServer: componentDevServer('tsconfig.cy.json', 'babel'),
    video   :true,
    "quoted": 1_000,
  },
  e2e: { video: false },
  ...spread(__dirname),
  setupNodeEvents(on, config) {
    on('task', { log: (m) => console.log(m) });
  },
  empty: {},
});
"#;

    fn root_mut(doc: &mut Document) -> &mut ObjectLit {
        let (index, _) = doc.default_exports().next().unwrap();
        let export = doc.default_export_mut(index).unwrap();
        match &mut export.expr {
            Expr::Call(call) => match &mut call.args[0].expr {
                Expr::Object(obj) => obj,
                other => panic!("unexpected {other:?}"),
            },
            other => panic!("unexpected {other:?}"),
        }
    }

    fn nested_mut<'d>(obj: &'d mut ObjectLit, name: &str) -> &'d mut ObjectLit {
        obj.members
            .iter_mut()
            .find_map(|m| match m {
                Member::Property(p) if p.key.name == name => match &mut p.value {
                    Expr::Object(o) => Some(o),
                    _ => None,
                },
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_roundtrip_is_byte_identical() {
        let doc = parse(CONFIG).unwrap();
        assert_eq!(print(&doc, &PrintOptions::default()), CONFIG);
    }

    #[test]
    fn test_roundtrip_odd_formatting() {
        let text = "export default defineConfig( {a:1,b:{c:'x'} , d : [1,2,] ,} ) ;\n// tail";
        let doc = parse(text).unwrap();
        assert_eq!(print(&doc, &PrintOptions::default()), text);
    }

    #[test]
    fn test_append_to_multiline_object() {
        let mut doc = parse(CONFIG).unwrap();
        let component = nested_mut(root_mut(&mut doc), "component");
        component
            .members
            .push(Member::Property(Property::new("blah", Expr::string("new"))));
        let out = print(&doc, &PrintOptions::default());
        assert!(out.contains("    \"quoted\": 1_000,\n    blah: 'new',\n  },"), "{out}");
    }

    #[test]
    fn test_append_to_inline_object() {
        let mut doc = parse(CONFIG).unwrap();
        let e2e = nested_mut(root_mut(&mut doc), "e2e");
        e2e.members
            .push(Member::Property(Property::new("my-key", Expr::number("3"))));
        let out = print(&doc, &PrintOptions::default().with_quote(QuoteStyle::Double));
        assert!(out.contains("e2e: { video: false, \"my-key\": 3 },"), "{out}");
    }

    #[test]
    fn test_append_to_empty_object() {
        let mut doc = parse(CONFIG).unwrap();
        let empty = nested_mut(root_mut(&mut doc), "empty");
        empty
            .members
            .push(Member::Property(Property::new("a", Expr::boolean(true))));
        let out = print(&doc, &PrintOptions::default());
        assert!(out.contains("  empty: {\n    a: true,\n  },\n});"), "{out}");
    }

    #[test]
    fn test_append_keeps_comment_in_empty_object() {
        let text = "export default f({\n  env: {\n    // filled in later\n  },\n});\n";
        let mut doc = parse(text).unwrap();
        let env = nested_mut(root_mut(&mut doc), "env");
        env.members
            .push(Member::Property(Property::new("a", Expr::number("1"))));
        let out = print(&doc, &PrintOptions::default());
        assert_eq!(
            out,
            "export default f({\n  env: {\n    a: 1,\n    // filled in later\n  },\n});\n"
        );
    }

    #[test]
    fn test_append_after_commented_last_member() {
        for (text, expected) in [
            (
                "export default f({\n  a: 1, // one\n});",
                "export default f({\n  a: 1, // one\n  b: 2,\n});",
            ),
            (
                "export default f({\n  a: 1 // one\n});",
                "export default f({\n  a: 1, // one\n  b: 2\n});",
            ),
        ] {
            let mut doc = parse(text).unwrap();
            root_mut(&mut doc)
                .members
                .push(Member::Property(Property::new("b", Expr::number("2"))));
            assert_eq!(print(&doc, &PrintOptions::default()), expected);
        }
    }

    #[test]
    fn test_synthesized_nested_object() {
        let obj = ObjectLit::from_properties([
            Property::new("a", Expr::number("1")),
            Property::new(
                "b",
                Expr::Object(ObjectLit::from_properties([Property::new(
                    "c",
                    Expr::string("x"),
                )])),
            ),
            Property::new("d", Expr::Object(ObjectLit::default())),
        ]);
        let out = print_expr(&Expr::Object(obj), &PrintOptions::default().with_trailing_comma(false));
        assert_eq!(out, "{\n  a: 1,\n  b: {\n    c: 'x'\n  },\n  d: {}\n}");
    }

    #[test]
    fn test_synthesized_call() {
        let call = CallExpr::new(
            "componentDevServer",
            [Expr::string("tsconfig.cy.json"), Expr::string("swc, babel")],
        );
        assert_eq!(
            print_expr(&Expr::Call(call), &PrintOptions::default()),
            "componentDevServer('tsconfig.cy.json', 'swc, babel')"
        );
    }

    #[test]
    fn test_indent_width_option() {
        let obj = ObjectLit::from_properties([Property::new("a", Expr::number("1"))]);
        let out = print_expr(&Expr::Object(obj), &PrintOptions::default().with_indent_width(4));
        assert_eq!(out, "{\n    a: 1,\n}");
    }

    #[test]
    fn test_append_keeps_crlf_line_endings() {
        let text = "export default f({\r\n  a: 1,\r\n  c: {\r\n    d: 1,\r\n  },\r\n});\r\n";
        let mut doc = parse(text).unwrap();
        let root = root_mut(&mut doc);
        nested_mut(root, "c")
            .members
            .push(Member::Property(Property::new("e", Expr::number("2"))));
        root.members.push(Member::Property(Property::new(
            "b",
            Expr::Object(ObjectLit::from_properties([Property::new("x", Expr::boolean(true))])),
        )));
        assert_eq!(
            print(&doc, &PrintOptions::default()),
            "export default f({\r\n  a: 1,\r\n  c: {\r\n    d: 1,\r\n    e: 2,\r\n  },\r\n  b: {\r\n    x: true,\r\n  },\r\n});\r\n"
        );
    }

    #[test]
    fn test_crlf_comment_stays_on_last_member_line() {
        let text = "export default f({\r\n  a: 1, // one\r\n});";
        let mut doc = parse(text).unwrap();
        root_mut(&mut doc)
            .members
            .push(Member::Property(Property::new("b", Expr::number("2"))));
        assert_eq!(
            print(&doc, &PrintOptions::default()),
            "export default f({\r\n  a: 1, // one\r\n  b: 2,\r\n});"
        );
    }

    #[test]
    fn test_new_object_inside_inline_object_stays_inline() {
        let mut doc = parse(CONFIG).unwrap();
        let e2e = nested_mut(root_mut(&mut doc), "e2e");
        e2e.members.push(Member::Property(Property::new(
            "retries",
            Expr::Object(ObjectLit::from_properties([
                Property::new("runMode", Expr::number("2")),
                Property::new("openMode", Expr::number("0")),
            ])),
        )));
        let out = print(&doc, &PrintOptions::default());
        assert!(
            out.contains("  e2e: { video: false, retries: { runMode: 2, openMode: 0 } },\n"),
            "{out}"
        );
    }
}
