//! Confpatch syntax layer
//!
//! Lossless parsing and printing of JS/TS configuration documents of the
//! form `export default defineConfig({ ... })`. Printing an unmodified
//! document reproduces its input byte-for-byte.

pub mod cst;
pub mod error;
pub mod parser;
pub mod printer;
pub mod scan;
pub mod text;

pub use cst::{
    Argument, CallExpr, DefaultExport, Document, Expr, Key, Literal, Member, ObjectLit,
    OpaqueMember, Property, PropertyLayout, Segment,
};
pub use error::SyntaxError;
pub use parser::{parse, parse_expression};
pub use printer::{print, print_expr, PrintOptions};
pub use scan::{split_arguments, Scanner};
pub use text::{
    format_key, is_identifier, is_identifier_path, line_end, line_terminator, quote, unescape,
    QuoteStyle,
};
