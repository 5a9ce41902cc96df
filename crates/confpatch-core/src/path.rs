//! Property paths and removal lists.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;

use crate::error::PatchError;

/// Property names from the config root down to a node.
///
/// The empty path is the root itself and displays as `<root>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PathKey(Vec<String>);

impl PathKey {
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a dotted path such as `component.devServer`.
    pub fn parse(dotted: &str) -> Result<Self, PatchError> {
        if dotted.is_empty() {
            return Err(PatchError::InvalidPath(dotted.to_string()));
        }
        let segments: Vec<String> = dotted.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(PatchError::InvalidPath(dotted.to_string()));
        }
        Ok(Self(segments))
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// True if `self` is `other` or one of its ancestors.
    pub fn is_prefix_of(&self, other: &PathKey) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.0.join("."))
        }
    }
}

impl FromStr for PathKey {
    type Err = PatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Ordered set of property paths to delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalSpec {
    paths: IndexSet<PathKey>,
}

impl RemovalSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from dotted path strings. Duplicates collapse.
    pub fn from_dotted<I, S>(paths: I) -> Result<Self, PatchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut spec = Self::new();
        for path in paths {
            spec.insert(PathKey::parse(path.as_ref())?);
        }
        Ok(spec)
    }

    /// Returns false if the path was already present.
    pub fn insert(&mut self, path: PathKey) -> bool {
        self.paths.insert(path)
    }

    pub fn contains(&self, path: &PathKey) -> bool {
        self.paths.contains(path)
    }

    /// True if some path to remove lies strictly below `path`.
    pub fn has_descendant_of(&self, path: &PathKey) -> bool {
        self.paths
            .iter()
            .any(|p| p.0.len() > path.0.len() && path.is_prefix_of(p))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathKey> {
        self.paths.iter()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
