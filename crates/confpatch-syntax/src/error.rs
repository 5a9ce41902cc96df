//! Syntax error type.

/// Malformed input text.
///
/// Offsets are byte offsets into the parsed text; line and column are
/// 1-based, with the column counted in characters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("syntax error at line {line}, column {column}: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl SyntaxError {
    /// Build an error for `offset` within `source`.
    pub fn at(source: &str, offset: usize, message: impl Into<String>) -> Self {
        let offset = offset.min(source.len());
        let mut line = 1;
        let mut line_start = 0;
        for (i, b) in source.as_bytes()[..offset].iter().enumerate() {
            if *b == b'\n' {
                line += 1;
                line_start = i + 1;
            }
        }
        let column = source
            .get(line_start..offset)
            .map(|s| s.chars().count())
            .unwrap_or(offset - line_start)
            + 1;
        Self {
            message: message.into(),
            offset,
            line,
            column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_first_line() {
        let err = SyntaxError::at("abc", 2, "boom");
        assert_eq!((err.line, err.column), (1, 3));
    }

    #[test]
    fn test_position_later_line() {
        let err = SyntaxError::at("ab\ncd\nef", 7, "boom");
        assert_eq!((err.line, err.column), (3, 2));
        assert_eq!(err.to_string(), "syntax error at line 3, column 2: boom");
    }
}
