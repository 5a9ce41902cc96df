//! Parser for the object-literal config grammar.
//!
//! Only the default export is parsed into nodes. Inside it the parser
//! understands object literals, calls, string/number/boolean literals and
//! object members (properties, spreads, shorthands, methods); any other
//! expression is kept as verbatim text.

use crate::cst::{
    Argument, CallExpr, DefaultExport, Document, Expr, Key, Literal, Member, ObjectLit,
    OpaqueMember, Property, PropertyLayout, Segment,
};
use crate::error::SyntaxError;
use crate::scan::{is_ident_start, Scanner};
use crate::text::{is_numeric_literal, unescape};

/// Parse a whole document.
pub fn parse(text: &str) -> Result<Document, SyntaxError> {
    let mut parser = Parser {
        sc: Scanner::new(text),
    };
    parser.document()
}

/// Parse a single standalone expression, e.g. `fn('a', 1)`.
pub fn parse_expression(text: &str) -> Result<Expr, SyntaxError> {
    let mut parser = Parser {
        sc: Scanner::new(text),
    };
    parser.sc.skip_trivia()?;
    if parser.sc.is_eof() {
        return Err(parser.sc.error(0, "expected expression"));
    }
    let expr = parser.value(true)?;
    parser.sc.skip_trivia()?;
    if !parser.sc.is_eof() {
        return Err(parser
            .sc
            .error(parser.sc.pos(), "unexpected input after expression"));
    }
    Ok(expr)
}

struct Parser<'a> {
    sc: Scanner<'a>,
}

impl<'a> Parser<'a> {
    fn src(&self) -> &'a str {
        self.sc.source()
    }

    fn document(&mut self) -> Result<Document, SyntaxError> {
        let mut segments = Vec::new();
        let mut text_start = 0;
        let mut depth = 0usize;

        loop {
            self.sc.skip_trivia()?;
            let Some(b) = self.sc.peek() else { break };
            match b {
                b'\'' | b'"' => self.sc.skip_string()?,
                b'`' => self.sc.skip_template()?,
                b'(' | b'[' | b'{' => {
                    depth += 1;
                    self.sc.bump();
                }
                b')' | b']' | b'}' => {
                    if depth == 0 {
                        return Err(self
                            .sc
                            .error(self.sc.pos(), format!("unmatched '{}'", b as char)));
                    }
                    depth -= 1;
                    self.sc.bump();
                }
                b if is_ident_start(b) => {
                    let word_start = self.sc.pos();
                    let word = self.sc.scan_identifier().unwrap_or_default();
                    let member_access = word_start > 0 && self.src().as_bytes()[word_start - 1] == b'.';
                    if depth != 0 || word != "export" || member_access {
                        continue;
                    }
                    let after_export = self.sc.pos();
                    self.sc.skip_trivia()?;
                    if self.sc.scan_identifier() != Some("default") {
                        self.sc.set_pos(after_export);
                        continue;
                    }
                    self.sc.skip_trivia()?;
                    let expr_start = self.sc.pos();
                    if self.sc.is_eof() {
                        return Err(self.sc.error(expr_start, "expected expression after 'export default'"));
                    }
                    if word_start > text_start {
                        segments.push(Segment::Text(self.src()[text_start..word_start].to_string()));
                    }
                    let head = self.src()[word_start..expr_start].to_string();
                    let expr = self.value(false)?;
                    tracing::trace!(kind = expr.kind_name(), "parsed default export");
                    segments.push(Segment::DefaultExport(DefaultExport { head, expr }));
                    text_start = self.sc.pos();
                }
                _ => self.sc.bump(),
            }
        }

        if depth != 0 {
            return Err(self.sc.error(self.src().len(), "unexpected end of input: unclosed bracket"));
        }
        if text_start < self.src().len() {
            segments.push(Segment::Text(self.src()[text_start..].to_string()));
        }
        Ok(Document { segments })
    }

    /// Parse one expression starting at the cursor (trivia already skipped).
    ///
    /// With `strict`, a structured node is only accepted when the expression
    /// ends right after it (`'a' + 'b'` is verbatim, not a string literal).
    /// On return the cursor sits at the end of the expression, before any
    /// trailing trivia.
    fn value(&mut self, strict: bool) -> Result<Expr, SyntaxError> {
        let start = self.sc.pos();
        let parsed = match self.sc.peek() {
            Some(b'{') => Some(Expr::Object(self.object()?)),
            Some(b'\'' | b'"') => {
                self.sc.skip_string()?;
                let raw = &self.src()[start..self.sc.pos()];
                Some(Expr::Literal(Literal::Str {
                    value: unescape(&raw[1..raw.len() - 1]),
                    raw: Some(raw.to_string()),
                }))
            }
            Some(b) if b.is_ascii_digit() || b == b'.' || b == b'-' => {
                let end = self.sc.skip_expression()?;
                let text = &self.src()[start..end];
                if is_numeric_literal(text) {
                    self.sc.set_pos(end);
                    Some(Expr::number(text))
                } else {
                    None
                }
            }
            Some(b) if is_ident_start(b) => self.identifier_expr(start)?,
            _ => None,
        };

        if let Some(expr) = parsed {
            if !strict || self.at_expression_end()? {
                return Ok(expr);
            }
        }

        self.sc.set_pos(start);
        let end = self.sc.skip_expression()?;
        if end == start {
            return Err(self.sc.error(start, "expected expression"));
        }
        self.sc.set_pos(end);
        Ok(Expr::Verbatim(self.src()[start..end].to_string()))
    }

    /// `true`, `false`, or a call on an identifier path.
    fn identifier_expr(&mut self, start: usize) -> Result<Option<Expr>, SyntaxError> {
        self.scan_identifier_path();
        let word = &self.src()[start..self.sc.pos()];
        match word {
            "true" => return Ok(Some(Expr::boolean(true))),
            "false" => return Ok(Some(Expr::boolean(false))),
            _ => {}
        }
        let after_word = self.sc.pos();
        self.sc.skip_trivia()?;
        if self.sc.peek() == Some(b'<') && !self.skip_type_arguments()? {
            self.sc.set_pos(after_word);
            return Ok(None);
        }
        self.sc.skip_trivia()?;
        if self.sc.peek() != Some(b'(') {
            self.sc.set_pos(after_word);
            return Ok(None);
        }
        let callee = self.src()[start..self.sc.pos()].to_string();
        Ok(Some(Expr::Call(self.call_arguments(callee)?)))
    }

    fn scan_identifier_path(&mut self) {
        while self.sc.scan_identifier().is_some() {
            if self.sc.peek() == Some(b'.') && self.sc.peek_at(1).is_some_and(is_ident_start) {
                self.sc.bump();
            } else {
                break;
            }
        }
    }

    /// Skip `<...>` after a callee. Returns false (cursor unspecified) when
    /// the angle brackets do not balance before a delimiter.
    fn skip_type_arguments(&mut self) -> Result<bool, SyntaxError> {
        let mut depth = 0usize;
        loop {
            match self.sc.peek() {
                Some(b'<') => depth += 1,
                Some(b'>') => {
                    depth -= 1;
                    if depth == 0 {
                        self.sc.bump();
                        return Ok(true);
                    }
                }
                Some(b'\'' | b'"') => {
                    self.sc.skip_string()?;
                    continue;
                }
                Some(b'(' | b')' | b';' | b',' | b'{' | b'}') | None => return Ok(false),
                Some(_) => {}
            }
            self.sc.bump();
        }
    }

    fn at_expression_end(&mut self) -> Result<bool, SyntaxError> {
        let save = self.sc.pos();
        self.sc.skip_trivia()?;
        let at_end = matches!(self.sc.peek(), None | Some(b',' | b';' | b')' | b']' | b'}'));
        self.sc.set_pos(save);
        Ok(at_end)
    }

    /// Parse `( args )`; the cursor is on `(`.
    fn call_arguments(&mut self, callee: String) -> Result<CallExpr, SyntaxError> {
        let open = self.sc.pos();
        self.sc.bump();
        let mut args = Vec::new();
        let mut trailing_comma = false;
        let close;
        loop {
            let lead_start = self.sc.pos();
            self.sc.skip_trivia()?;
            match self.sc.peek() {
                Some(b')') => {
                    close = self.src()[lead_start..self.sc.pos()].to_string();
                    self.sc.bump();
                    break;
                }
                None => return Err(self.sc.error(open, "unclosed '(' in call expression")),
                _ => {}
            }
            let leading = self.src()[lead_start..self.sc.pos()].to_string();
            let expr = self.value(true)?;
            let trail_start = self.sc.pos();
            self.sc.skip_trivia()?;
            let trailing = self.src()[trail_start..self.sc.pos()].to_string();
            match self.sc.peek() {
                Some(b',') => {
                    self.sc.bump();
                    args.push(Argument { leading, expr, trailing });
                    trailing_comma = true;
                }
                Some(b')') => {
                    self.sc.bump();
                    args.push(Argument { leading, expr, trailing });
                    trailing_comma = false;
                    close = String::new();
                    break;
                }
                None => return Err(self.sc.error(open, "unclosed '(' in call expression")),
                _ => {
                    return Err(self
                        .sc
                        .error(self.sc.pos(), "expected ',' or ')' in argument list"))
                }
            }
        }
        Ok(CallExpr {
            callee,
            args,
            close,
            trailing_comma,
        })
    }

    /// Parse `{ members }`; the cursor is on `{`.
    fn object(&mut self) -> Result<ObjectLit, SyntaxError> {
        let open = self.sc.pos();
        self.sc.bump();
        let mut members = Vec::new();
        let mut had_comma = false;
        let close;
        loop {
            let lead_start = self.sc.pos();
            self.sc.skip_trivia()?;
            match self.sc.peek() {
                Some(b'}') => {
                    close = self.src()[lead_start..self.sc.pos()].to_string();
                    self.sc.bump();
                    break;
                }
                None => return Err(self.sc.error(open, "unclosed '{' in object literal")),
                _ => {}
            }
            let leading = self.src()[lead_start..self.sc.pos()].to_string();
            let mut member = self.member(leading)?;
            let trail_start = self.sc.pos();
            self.sc.skip_trivia()?;
            match self.sc.peek() {
                Some(b',') => {
                    member.set_trailing(self.src()[trail_start..self.sc.pos()].to_string());
                    self.sc.bump();
                    members.push(member);
                    had_comma = true;
                }
                Some(b'}') => {
                    close = self.src()[trail_start..self.sc.pos()].to_string();
                    self.sc.bump();
                    members.push(member);
                    had_comma = false;
                    break;
                }
                None => return Err(self.sc.error(open, "unclosed '{' in object literal")),
                _ => {
                    return Err(self
                        .sc
                        .error(self.sc.pos(), "expected ',' or '}' in object literal"))
                }
            }
        }
        let trailing_comma = if members.is_empty() { None } else { Some(had_comma) };
        Ok(ObjectLit {
            members,
            close: Some(close),
            trailing_comma,
        })
    }

    fn member(&mut self, leading: String) -> Result<Member, SyntaxError> {
        let start = self.sc.pos();
        let key = match self.sc.peek() {
            Some(b'.') if self.src()[start..].starts_with("...") => None,
            Some(b'\'' | b'"') => {
                self.sc.skip_string()?;
                let raw = &self.src()[start..self.sc.pos()];
                Some(Key {
                    name: unescape(&raw[1..raw.len() - 1]),
                    raw: Some(raw.to_string()),
                })
            }
            Some(b) if b.is_ascii_digit() => {
                while matches!(self.sc.peek(), Some(b) if b.is_ascii_alphanumeric() || b == b'.' || b == b'_') {
                    self.sc.bump();
                }
                let raw = &self.src()[start..self.sc.pos()];
                Some(Key {
                    name: raw.to_string(),
                    raw: Some(raw.to_string()),
                })
            }
            Some(b) if is_ident_start(b) => self.sc.scan_identifier().map(|name| Key {
                name: name.to_string(),
                raw: Some(name.to_string()),
            }),
            _ => None,
        };

        let Some(key) = key else {
            return self.opaque_member(start, leading, None);
        };

        let key_end = self.sc.pos();
        self.sc.skip_trivia()?;
        match self.sc.peek() {
            Some(b':') => {
                self.sc.bump();
                self.sc.skip_trivia()?;
                let separator = self.src()[key_end..self.sc.pos()].to_string();
                let value = self.value(true)?;
                Ok(Member::Property(Property {
                    key,
                    value,
                    layout: Some(PropertyLayout {
                        leading,
                        separator,
                        trailing: String::new(),
                    }),
                }))
            }
            Some(b'(' | b'<') => self.opaque_member(start, leading, Some(key.name)),
            Some(b',' | b'}') => {
                self.sc.set_pos(key_end);
                Ok(Member::Opaque(OpaqueMember {
                    name: Some(key.name),
                    text: self.src()[start..key_end].to_string(),
                    leading,
                    trailing: String::new(),
                }))
            }
            // `async foo() {}`, `get foo() {}`, `set foo(v) {}`
            Some(b) if is_ident_start(b) && matches!(key.name.as_str(), "async" | "get" | "set") => {
                let name = self.sc.scan_identifier().map(str::to_string);
                self.opaque_member(start, leading, name)
            }
            _ => Err(self
                .sc
                .error(self.sc.pos(), "expected ':' after property key")),
        }
    }

    fn opaque_member(
        &mut self,
        start: usize,
        leading: String,
        name: Option<String>,
    ) -> Result<Member, SyntaxError> {
        self.sc.set_pos(start);
        let end = self.sc.skip_expression()?;
        if end == start {
            return Err(self.sc.error(start, "expected object member"));
        }
        self.sc.set_pos(end);
        Ok(Member::Opaque(OpaqueMember {
            name,
            text: self.src()[start..end].to_string(),
            leading,
            trailing: String::new(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_call(doc: &Document) -> &CallExpr {
        let (_, export) = doc.default_exports().next().unwrap();
        match &export.expr {
            Expr::Call(call) => call,
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_default_export_call() {
        let doc = parse("import { defineConfig } from 'cypress';\n\nexport default defineConfig({ a: 1 });\n").unwrap();
        assert_eq!(doc.segments.len(), 3);
        let call = root_call(&doc);
        assert_eq!(call.callee_name(), "defineConfig");
        let obj = call.first_arg().and_then(Expr::as_object).unwrap();
        assert_eq!(obj.names(), vec!["a"]);
        match &doc.segments[2] {
            Segment::Text(t) => assert_eq!(t, ";\n"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_export_default_in_string_or_comment_ignored() {
        let doc = parse("const s = 'export default x';\n// export default y\n/* export default z */\n").unwrap();
        assert_eq!(doc.default_exports().count(), 0);
    }

    #[test]
    fn test_nested_export_word_ignored() {
        let doc = parse("function f() { export default 1 }\nmodule.export default").unwrap();
        assert_eq!(doc.default_exports().count(), 0);
    }

    #[test]
    fn test_property_values() {
        let doc = parse(
            "export default defineConfig({\n  n: 42,\n  s: 'it\\'s',\n  b: false,\n  c: fn('a', 1),\n  o: { x: 1 },\n  v: [1, 2],\n  e: 'a' + 'b',\n})",
        )
        .unwrap();
        let obj = root_call(&doc).first_arg().and_then(Expr::as_object).unwrap();
        let kind = |name: &str| obj.property(name).unwrap().value.kind_name();
        assert_eq!(kind("n"), "number literal");
        assert_eq!(kind("s"), "string literal");
        assert_eq!(kind("b"), "boolean literal");
        assert_eq!(kind("c"), "call expression");
        assert_eq!(kind("o"), "object literal");
        assert_eq!(kind("v"), "expression");
        assert_eq!(kind("e"), "expression");
        match &obj.property("s").unwrap().value {
            Expr::Literal(Literal::Str { value, .. }) => assert_eq!(value, "it's"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_opaque_members() {
        let doc = parse(
            "export default defineConfig({\n  ...preset(__dirname),\n  shorthand,\n  setupNodeEvents(on, config) { on('x', () => {}); },\n  async load() {},\n  'quoted-key': 1,\n})",
        )
        .unwrap();
        let obj = root_call(&doc).first_arg().and_then(Expr::as_object).unwrap();
        assert_eq!(obj.members.len(), 5);
        assert_eq!(obj.names(), vec!["shorthand", "setupNodeEvents", "load", "quoted-key"]);
        match &obj.members[0] {
            Member::Opaque(op) => assert_eq!(op.text, "...preset(__dirname)"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_object_trivia() {
        let doc = parse("export default f({\n  a: 1, // one\n  b : 2\n})").unwrap();
        let obj = root_call(&doc).first_arg().and_then(Expr::as_object).unwrap();
        assert_eq!(obj.trailing_comma, Some(false));
        assert_eq!(obj.close.as_deref(), Some("\n"));
        let Member::Property(b) = &obj.members[1] else { panic!() };
        let layout = b.layout.as_ref().unwrap();
        assert_eq!(layout.leading, " // one\n  ");
        assert_eq!(layout.separator, " : ");
    }

    #[test]
    fn test_call_type_arguments() {
        let doc = parse("export default defineConfig<Options>({ a: 1 })").unwrap();
        assert_eq!(root_call(&doc).callee, "defineConfig<Options>");
    }

    #[test]
    fn test_non_call_export_is_verbatim() {
        let doc = parse("const config = {};\nexport default config;\n").unwrap();
        let (_, export) = doc.default_exports().next().unwrap();
        assert_eq!(export.expr, Expr::Verbatim("config".to_string()));
    }

    #[test]
    fn test_parse_expression() {
        match parse_expression(" fn('a, b', 2) ").unwrap() {
            Expr::Call(call) => {
                assert_eq!(call.callee_name(), "fn");
                assert_eq!(call.args.len(), 2);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(parse_expression("").is_err());
        assert!(parse_expression("a, b").is_err());
        assert_eq!(
            parse_expression("fn(1) + 2").unwrap(),
            Expr::Verbatim("fn(1) + 2".to_string())
        );
    }

    #[test]
    fn test_syntax_errors() {
        let err = parse("export default defineConfig({ a: 'oops })").unwrap_err();
        assert!(err.message.contains("unterminated string"));
        assert_eq!(err.line, 1);

        let err = parse("export default defineConfig({\n  a: 1\n").unwrap_err();
        assert!(err.message.contains("unclosed"));

        let err = parse("export default defineConfig({ a 1 })").unwrap_err();
        assert!(err.message.contains("expected ':'"));
    }
}
