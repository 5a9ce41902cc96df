//! String literal escaping, identifier and number checks.

use std::sync::OnceLock;

use regex_lite::Regex;

/// Quote character used for synthesized string literals and keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStyle {
    #[default]
    Single,
    Double,
}

impl QuoteStyle {
    pub fn as_char(self) -> char {
        match self {
            QuoteStyle::Single => '\'',
            QuoteStyle::Double => '"',
        }
    }
}

/// Render `value` as a string literal.
pub fn quote(value: &str, style: QuoteStyle) -> String {
    let q = style.as_char();
    let mut out = String::with_capacity(value.len() + 2);
    out.push(q);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if c == q => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() || c == '\u{2028}' || c == '\u{2029}' => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push(q);
    out
}

/// Decode the body of a string literal (the text between the quotes).
///
/// Unknown escapes decode to the escaped character; malformed numeric
/// escapes are kept literally.
pub fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(e) = chars.next() else {
            out.push('\\');
            break;
        };
        match e {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' if !matches!(chars.peek(), Some(d) if d.is_ascii_digit()) => out.push('\0'),
            '\n' | '\u{2028}' | '\u{2029}' => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(ch) if hex.len() == 2 => out.push(ch),
                    _ => {
                        out.push('x');
                        out.push_str(&hex);
                    }
                }
            }
            'u' => {
                let code = read_unicode_escape(&mut chars);
                match code {
                    Some(hi @ 0xD800..=0xDBFF) => {
                        let mut lookahead = chars.clone();
                        let lo = match (lookahead.next(), lookahead.next()) {
                            (Some('\\'), Some('u')) => read_unicode_escape(&mut lookahead),
                            _ => None,
                        };
                        match lo {
                            Some(lo @ 0xDC00..=0xDFFF) => {
                                chars = lookahead;
                                let combined = 0x10000 + ((hi - 0xD800) << 10) + (lo - 0xDC00);
                                out.push(char::from_u32(combined).unwrap_or('\u{fffd}'));
                            }
                            _ => out.push('\u{fffd}'),
                        }
                    }
                    Some(code) => out.push(char::from_u32(code).unwrap_or('\u{fffd}')),
                    None => out.push('u'),
                }
            }
            other => out.push(other),
        }
    }
    out
}

fn read_unicode_escape(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<u32> {
    if chars.peek() == Some(&'{') {
        chars.next();
        let mut hex = String::new();
        for c in chars.by_ref() {
            if c == '}' {
                return u32::from_str_radix(&hex, 16).ok();
            }
            hex.push(c);
        }
        return None;
    }
    let mut probe = chars.clone();
    let hex: String = probe.by_ref().take(4).collect();
    if hex.len() == 4 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        *chars = probe;
        u32::from_str_radix(&hex, 16).ok()
    } else {
        None
    }
}

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap())
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^-?(?:0[xX][0-9a-fA-F_]+|0[oO][0-7_]+|0[bB][01_]+|(?:[0-9][0-9_]*(?:\.[0-9_]*)?|\.[0-9][0-9_]*)(?:[eE][+-]?[0-9]+)?)n?$",
        )
        .unwrap()
    })
}

/// True if `name` can be written as a property key without quotes.
pub fn is_identifier(name: &str) -> bool {
    identifier_re().is_match(name)
}

/// True for `a` and member paths such as `a.b.c`.
pub fn is_identifier_path(text: &str) -> bool {
    !text.is_empty() && text.split('.').all(is_identifier)
}

/// True if `text` is a (possibly negated) numeric literal.
pub fn is_numeric_literal(text: &str) -> bool {
    number_re().is_match(text)
}

/// Format a property key, quoting it when it is not an identifier.
pub fn format_key(name: &str, style: QuoteStyle) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        quote(name, style)
    }
}

/// Byte offset where the first line of `text` ends: the start of its first
/// `\r\n` or `\n`.
pub fn line_end(text: &str) -> Option<usize> {
    let newline = text.find('\n')?;
    Some(if text[..newline].ends_with('\r') {
        newline - 1
    } else {
        newline
    })
}

/// The line terminator used by `text`, if it contains one.
pub fn line_terminator(text: &str) -> Option<&'static str> {
    let end = line_end(text)?;
    Some(if text[end..].starts_with("\r\n") {
        "\r\n"
    } else {
        "\n"
    })
}
