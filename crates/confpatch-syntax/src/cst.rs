//! Concrete syntax tree.
//!
//! Nodes that come from parsed text keep the exact text around them (the
//! "trivia": whitespace, comments, separators), so printing an untouched
//! node reproduces its input byte-for-byte. Nodes built by callers carry no
//! trivia and are laid out by the printer.

/// A parsed document: verbatim text interleaved with default exports.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Text the parser does not interpret (imports, statements, comments).
    Text(String),
    DefaultExport(DefaultExport),
}

/// `export default <expr>`.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultExport {
    /// `export default` plus the trivia before the expression.
    pub head: String,
    pub expr: Expr,
}

impl Document {
    /// Default exports with their segment index, in document order.
    pub fn default_exports(&self) -> impl Iterator<Item = (usize, &DefaultExport)> {
        self.segments
            .iter()
            .enumerate()
            .filter_map(|(i, segment)| match segment {
                Segment::DefaultExport(export) => Some((i, export)),
                Segment::Text(_) => None,
            })
    }

    pub fn default_export_mut(&mut self, index: usize) -> Option<&mut DefaultExport> {
        match self.segments.get_mut(index) {
            Some(Segment::DefaultExport(export)) => Some(export),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Object(ObjectLit),
    Call(CallExpr),
    Literal(Literal),
    /// Any expression outside the understood subset, kept as written.
    Verbatim(String),
}

impl Expr {
    /// Human-readable node kind for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Object(_) => "object literal",
            Expr::Call(_) => "call expression",
            Expr::Literal(Literal::Number(_)) => "number literal",
            Expr::Literal(Literal::Str { .. }) => "string literal",
            Expr::Literal(Literal::Bool(_)) => "boolean literal",
            Expr::Verbatim(_) => "expression",
        }
    }

    pub fn as_object(&self) -> Option<&ObjectLit> {
        match self {
            Expr::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Literal(Literal::Str {
            value: value.into(),
            raw: None,
        })
    }

    pub fn number(text: impl Into<String>) -> Self {
        Expr::Literal(Literal::Number(text.into()))
    }

    pub fn boolean(value: bool) -> Self {
        Expr::Literal(Literal::Bool(value))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Numeric literal text, e.g. `42`, `1.5`, `0x1f`.
    Number(String),
    /// String literal. `raw` is the quoted source text when parsed.
    Str { value: String, raw: Option<String> },
    Bool(bool),
}

/// `{ ... }`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectLit {
    pub members: Vec<Member>,
    /// Text between the last member (or its comma) and `}`.
    /// `None` for synthesized objects.
    pub close: Option<String>,
    /// Whether the last member is followed by a comma. `None` means the
    /// printer decides.
    pub trailing_comma: Option<bool>,
}

impl ObjectLit {
    /// A synthesized object with the given properties.
    pub fn from_properties(properties: impl IntoIterator<Item = Property>) -> Self {
        Self {
            members: properties.into_iter().map(Member::Property).collect(),
            close: None,
            trailing_comma: None,
        }
    }

    /// Find a property by key name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.members.iter().find_map(|member| match member {
            Member::Property(prop) if prop.key.name == name => Some(prop),
            _ => None,
        })
    }

    /// Key names of all named members, in order.
    pub fn names(&self) -> Vec<&str> {
        self.members.iter().filter_map(Member::name).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Property(Property),
    /// Spread, shorthand or method member, kept as written.
    Opaque(OpaqueMember),
}

impl Member {
    pub fn name(&self) -> Option<&str> {
        match self {
            Member::Property(prop) => Some(&prop.key.name),
            Member::Opaque(op) => op.name.as_deref(),
        }
    }

    /// Source trivia before the member, if it came from parsed text.
    pub fn leading(&self) -> Option<&str> {
        match self {
            Member::Property(prop) => prop.layout.as_ref().map(|l| l.leading.as_str()),
            Member::Opaque(op) => Some(&op.leading),
        }
    }

    pub(crate) fn set_trailing(&mut self, trailing: String) {
        match self {
            Member::Property(prop) => {
                if let Some(layout) = prop.layout.as_mut() {
                    layout.trailing = trailing;
                }
            }
            Member::Opaque(op) => op.trailing = trailing,
        }
    }
}

/// `key: value`
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: Key,
    pub value: Expr,
    pub layout: Option<PropertyLayout>,
}

impl Property {
    /// A synthesized property.
    pub fn new(name: impl Into<String>, value: Expr) -> Self {
        Self {
            key: Key::new(name),
            value,
            layout: None,
        }
    }

    /// Same key and layout, different value.
    pub fn with_value(&self, value: Expr) -> Self {
        Self {
            key: self.key.clone(),
            value,
            layout: self.layout.clone(),
        }
    }

    /// A property taking the place of an opaque member, keeping its
    /// surrounding trivia.
    pub fn replacing(member: &OpaqueMember, name: impl Into<String>, value: Expr) -> Self {
        Self {
            key: Key::new(name),
            value,
            layout: Some(PropertyLayout {
                leading: member.leading.clone(),
                separator: ": ".to_string(),
                trailing: member.trailing.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    /// Decoded key name.
    pub name: String,
    /// Key as written in the source (identifier, quoted string or number).
    pub raw: Option<String>,
}

impl Key {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw: None,
        }
    }
}

/// Source text around a parsed property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyLayout {
    /// Text after the previous comma (or `{`) up to the key.
    pub leading: String,
    /// Text from the end of the key to the start of the value, `:` included.
    pub separator: String,
    /// Text between the value and the following comma.
    pub trailing: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueMember {
    /// Name for shorthand (`foo`) and method (`foo() {}`) members.
    pub name: Option<String>,
    pub text: String,
    pub leading: String,
    pub trailing: String,
}

/// `callee(arg, ...)`
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    /// Everything before `(`, type arguments and trivia included.
    pub callee: String,
    pub args: Vec<Argument>,
    /// Text between the last argument (or its comma) and `)`.
    pub close: String,
    pub trailing_comma: bool,
}

impl CallExpr {
    /// A synthesized call: `callee(a, b)`.
    pub fn new(callee: impl Into<String>, args: impl IntoIterator<Item = Expr>) -> Self {
        let args = args
            .into_iter()
            .enumerate()
            .map(|(i, expr)| Argument {
                leading: if i == 0 { String::new() } else { " ".to_string() },
                expr,
                trailing: String::new(),
            })
            .collect();
        Self {
            callee: callee.into(),
            args,
            close: String::new(),
            trailing_comma: false,
        }
    }

    /// Callee without type arguments or surrounding whitespace.
    pub fn callee_name(&self) -> &str {
        let end = self.callee.find('<').unwrap_or(self.callee.len());
        self.callee[..end].trim()
    }

    pub fn first_arg(&self) -> Option<&Expr> {
        self.args.first().map(|a| &a.expr)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub leading: String,
    pub expr: Expr,
    pub trailing: String,
}
