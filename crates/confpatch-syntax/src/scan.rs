//! Delimiter-aware scanner.
//!
//! The scanner understands just enough of the grammar to find where an
//! expression ends: bracket nesting, quoted strings with escapes, template
//! literals (including `${}` substitutions) and comments. Everything else is
//! treated as opaque characters.
//!
//! Regular-expression literals are not recognised.

use std::ops::Range;

use crate::error::SyntaxError;

/// Byte cursor over source text.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    pub fn source(&self) -> &'a str {
        self.src
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos.min(self.src.len());
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    pub fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + ahead).copied()
    }

    pub fn bump(&mut self) {
        if self.pos < self.src.len() {
            self.pos += 1;
        }
    }

    pub fn slice(&self, range: Range<usize>) -> &'a str {
        &self.src[range]
    }

    pub fn error(&self, offset: usize, message: impl Into<String>) -> SyntaxError {
        SyntaxError::at(self.src, offset, message)
    }

    /// Skip whitespace, line comments and block comments.
    pub fn skip_trivia(&mut self) -> Result<(), SyntaxError> {
        loop {
            match self.peek() {
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    match self.src[self.pos..].find('\n') {
                        Some(n) => self.pos += n,
                        None => self.pos = self.src.len(),
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    let start = self.pos;
                    match self.src[self.pos + 2..].find("*/") {
                        Some(n) => self.pos += n + 4,
                        None => return Err(self.error(start, "unterminated block comment")),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Skip a single- or double-quoted string. The cursor must be on the
    /// opening quote.
    pub fn skip_string(&mut self) -> Result<(), SyntaxError> {
        let start = self.pos;
        let quote = match self.peek() {
            Some(q @ (b'\'' | b'"')) => q,
            _ => return Err(self.error(start, "expected string literal")),
        };
        self.pos += 1;
        loop {
            match self.peek() {
                None | Some(b'\n') => return Err(self.error(start, "unterminated string literal")),
                Some(b'\\') => self.pos = (self.pos + 2).min(self.src.len()),
                Some(b) if b == quote => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Skip a template literal. The cursor must be on the opening backtick.
    pub fn skip_template(&mut self) -> Result<(), SyntaxError> {
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.peek() {
                None => return Err(self.error(start, "unterminated template literal")),
                Some(b'\\') => self.pos = (self.pos + 2).min(self.src.len()),
                Some(b'`') => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(b'$') if self.peek_at(1) == Some(b'{') => {
                    self.pos += 1;
                    self.skip_group()?;
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Skip a bracketed group. The cursor must be on `(`, `[` or `{`; on
    /// success it sits just past the matching closer.
    pub fn skip_group(&mut self) -> Result<(), SyntaxError> {
        let open = self.pos;
        let closer = match self.peek().and_then(closer_for) {
            Some(c) => c,
            None => return Err(self.error(open, "expected opening bracket")),
        };
        self.pos += 1;
        loop {
            self.skip_expression()?;
            match self.peek() {
                Some(b) if b == closer => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(b',' | b';') => self.pos += 1,
                Some(b) => {
                    return Err(self.error(
                        self.pos,
                        format!("expected '{}' but found '{}'", closer as char, b as char),
                    ))
                }
                None => {
                    return Err(self.error(
                        open,
                        format!("unclosed '{}'", self.src.as_bytes()[open] as char),
                    ))
                }
            }
        }
    }

    /// Scan an identifier (`[A-Za-z_$][A-Za-z0-9_$]*`, non-ASCII allowed).
    pub fn scan_identifier(&mut self) -> Option<&'a str> {
        let start = self.pos;
        match self.peek() {
            Some(b) if is_ident_start(b) => self.pos += 1,
            _ => return None,
        }
        while matches!(self.peek(), Some(b) if is_ident_continue(b)) {
            self.pos += 1;
        }
        Some(&self.src[start..self.pos])
    }

    /// Skip one expression.
    ///
    /// Stops in front of a comma or semicolon at nesting depth zero, or in
    /// front of a closing bracket that was not opened inside the expression.
    /// Returns the end offset of the last token, excluding trailing trivia.
    pub fn skip_expression(&mut self) -> Result<usize, SyntaxError> {
        let mut end = self.pos;
        let mut stack: Vec<(u8, usize)> = Vec::new();
        loop {
            self.skip_trivia()?;
            let Some(b) = self.peek() else {
                if let Some(&(_, open)) = stack.last() {
                    return Err(self.error(
                        open,
                        format!("unclosed '{}'", self.src.as_bytes()[open] as char),
                    ));
                }
                break;
            };
            match b {
                b'(' | b'[' | b'{' => {
                    stack.push((closer_for(b).unwrap_or(b), self.pos));
                    self.pos += 1;
                }
                b')' | b']' | b'}' => match stack.last() {
                    None => break,
                    Some(&(expected, _)) if expected == b => {
                        stack.pop();
                        self.pos += 1;
                    }
                    Some(&(expected, _)) => {
                        return Err(self.error(
                            self.pos,
                            format!("expected '{}' but found '{}'", expected as char, b as char),
                        ))
                    }
                },
                b',' | b';' if stack.is_empty() => break,
                b'\'' | b'"' => self.skip_string()?,
                b'`' => self.skip_template()?,
                _ => self.pos += 1,
            }
            end = self.pos;
        }
        Ok(end)
    }
}

/// Split the text between a call's parentheses into argument ranges.
///
/// Commas only separate arguments at nesting depth zero; commas inside
/// strings, template literals, comments and nested brackets are part of the
/// argument. Ranges exclude surrounding whitespace and comments. A trailing
/// comma is accepted; an empty argument (`a,,b`) is an error.
pub fn split_arguments(text: &str) -> Result<Vec<Range<usize>>, SyntaxError> {
    let mut sc = Scanner::new(text);
    let mut args = Vec::new();
    loop {
        sc.skip_trivia()?;
        if sc.is_eof() {
            break;
        }
        let start = sc.pos();
        let end = sc.skip_expression()?;
        match sc.peek() {
            None => {
                args.push(start..end);
                break;
            }
            Some(b',') if end > start => {
                args.push(start..end);
                sc.bump();
            }
            Some(b',') => return Err(sc.error(start, "empty argument")),
            Some(b) => return Err(sc.error(sc.pos(), format!("unexpected '{}'", b as char))),
        }
    }
    Ok(args)
}

pub(crate) fn closer_for(open: u8) -> Option<u8> {
    match open {
        b'(' => Some(b')'),
        b'[' => Some(b']'),
        b'{' => Some(b'}'),
        _ => None,
    }
}

pub(crate) fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80
}

pub(crate) fn is_ident_continue(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}
