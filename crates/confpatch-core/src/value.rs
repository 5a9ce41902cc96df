//! Patch values.
//!
//! [`ConfigValue`] is the typed form of everything a patch can write into a
//! document. In JSON, an opaque call expression is spelled as the marker
//! object `{"$call": "fn('a', 1)"}`; every other JSON object is a nested
//! object value.

use indexmap::IndexMap;
use serde_json::{Number, Value};

use crate::error::PatchError;
use crate::path::PathKey;

/// Key of the JSON marker object for opaque call expressions.
pub const CALL_MARKER: &str = "$call";

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Number(Number),
    String(String),
    Boolean(bool),
    Object(IndexMap<String, ConfigValue>),
    /// Source text of a call or other computed expression.
    Opaque(String),
}

impl ConfigValue {
    pub fn opaque(text: impl Into<String>) -> Self {
        ConfigValue::Opaque(text.into())
    }

    pub fn object<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, ConfigValue)>,
        K: Into<String>,
    {
        ConfigValue::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ConfigValue::Number(_) => "number",
            ConfigValue::String(_) => "string",
            ConfigValue::Boolean(_) => "boolean",
            ConfigValue::Object(_) => "object",
            ConfigValue::Opaque(_) => "opaque expression",
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, ConfigValue>> {
        match self {
            ConfigValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Convert a JSON value found at `path`.
    pub fn from_json(value: &Value, path: &PathKey) -> Result<Self, PatchError> {
        match value {
            Value::Number(n) => Ok(ConfigValue::Number(n.clone())),
            Value::String(s) => Ok(ConfigValue::String(s.clone())),
            Value::Bool(b) => Ok(ConfigValue::Boolean(*b)),
            Value::Null => Err(PatchError::unsupported(path, "null is not supported")),
            Value::Array(_) => Err(PatchError::unsupported(path, "arrays are not supported")),
            Value::Object(map) => {
                if map.contains_key(CALL_MARKER) {
                    return match (map.len(), &map[CALL_MARKER]) {
                        (1, Value::String(text)) => Ok(ConfigValue::Opaque(text.clone())),
                        (1, _) => Err(PatchError::unsupported(
                            path,
                            format!("`{CALL_MARKER}` must hold the call text as a string"),
                        )),
                        _ => Err(PatchError::unsupported(
                            path,
                            format!("`{CALL_MARKER}` marker must be the only key"),
                        )),
                    };
                }
                let mut entries = IndexMap::with_capacity(map.len());
                for (key, item) in map {
                    entries.insert(key.clone(), ConfigValue::from_json(item, &path.child(key))?);
                }
                Ok(ConfigValue::Object(entries))
            }
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ConfigValue::Number(n) => Value::Number(n.clone()),
            ConfigValue::String(s) => Value::String(s.clone()),
            ConfigValue::Boolean(b) => Value::Bool(*b),
            ConfigValue::Object(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            ConfigValue::Opaque(text) => {
                let mut marker = serde_json::Map::new();
                marker.insert(CALL_MARKER.to_string(), Value::String(text.clone()));
                Value::Object(marker)
            }
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Boolean(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Number(value.into())
    }
}

impl From<u64> for ConfigValue {
    fn from(value: u64) -> Self {
        ConfigValue::Number(value.into())
    }
}

impl From<IndexMap<String, ConfigValue>> for ConfigValue {
    fn from(value: IndexMap<String, ConfigValue>) -> Self {
        ConfigValue::Object(value)
    }
}

/// A partial object tree of additions and updates.
///
/// Keys absent from the patch are left alone. A key holding an object merges
/// into an existing object; any other value replaces what is there.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchSpec {
    entries: IndexMap<String, ConfigValue>,
}

impl PatchSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a top-level key. A repeated key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Set a value at a dotted path, creating intermediate objects. A
    /// non-object value in the way is replaced by an object.
    pub fn insert_path(
        &mut self,
        dotted: &str,
        value: impl Into<ConfigValue>,
    ) -> Result<&mut Self, PatchError> {
        let path = PathKey::parse(dotted)?;
        let (leaf, parents) = match path.segments().split_last() {
            Some(split) => split,
            None => return Err(PatchError::InvalidPath(dotted.to_string())),
        };
        let mut map = &mut self.entries;
        for segment in parents {
            let slot = map
                .entry(segment.clone())
                .or_insert_with(|| ConfigValue::Object(IndexMap::new()));
            if !matches!(slot, ConfigValue::Object(_)) {
                *slot = ConfigValue::Object(IndexMap::new());
            }
            let ConfigValue::Object(inner) = slot else {
                return Err(PatchError::InvalidPath(dotted.to_string()));
            };
            map = inner;
        }
        map.insert(leaf.clone(), value.into());
        Ok(self)
    }

    /// Convert a JSON object. Key order is preserved.
    pub fn from_json(value: &Value) -> Result<Self, PatchError> {
        let root = PathKey::root();
        match ConfigValue::from_json(value, &root)? {
            ConfigValue::Object(entries) => Ok(Self { entries }),
            other => Err(PatchError::unsupported(
                &root,
                format!("patch must be an object, got {}", other.kind_name()),
            )),
        }
    }

    pub fn to_json(&self) -> Value {
        ConfigValue::Object(self.entries.clone()).to_json()
    }

    pub fn entries(&self) -> &IndexMap<String, ConfigValue> {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<IndexMap<String, ConfigValue>> for PatchSpec {
    fn from(entries: IndexMap<String, ConfigValue>) -> Self {
        Self { entries }
    }
}

impl<K: Into<String>> FromIterator<(K, ConfigValue)> for PatchSpec {
    fn from_iter<T: IntoIterator<Item = (K, ConfigValue)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Canonical decimal text of a number: integers without a fraction, other
/// values in shortest round-trip form, exponent notation outside
/// `1e-6..1e21` like JavaScript prints them.
pub fn format_number(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    let Some(f) = n.as_f64() else {
        return n.to_string();
    };
    let abs = f.abs();
    if f == 0.0 {
        "0".to_string()
    } else if !(1e-6..1e21).contains(&abs) {
        format!("{f:e}")
    } else {
        format!("{f}")
    }
}

/// Numeric value of a JS numeric literal, if it fits a JSON number.
/// BigInt literals (`10n`) have no JSON value.
pub fn parse_number_literal(text: &str) -> Option<Number> {
    let cleaned = text.replace('_', "");
    let (negative, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.as_str()),
    };
    if digits.ends_with('n') {
        return None;
    }
    let radix = match digits.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let magnitude = i64::from_str_radix(&digits[2..], radix).ok()?;
        return Some(Number::from(if negative { -magnitude } else { magnitude }));
    }
    if let Ok(int) = cleaned.parse::<i64>() {
        return Some(Number::from(int));
    }
    if let Ok(int) = cleaned.parse::<u64>() {
        return Some(Number::from(int));
    }
    let normalized = if digits.starts_with('.') {
        format!("{}0{}", if negative { "-" } else { "" }, digits)
    } else {
        cleaned.clone()
    };
    normalized.parse::<f64>().ok().and_then(Number::from_f64)
}
