//! Hierarchical entity keys.

use std::fmt;

/// One `(kind, name)` step of a key path.
///
/// Names are raw bytes: PStore stores serialized logical keys as names, so
/// they are not required to be UTF-8.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathElement {
    kind: String,
    name: Vec<u8>,
}

impl PathElement {
    /// Creates a path element.
    pub fn new(kind: impl Into<String>, name: impl Into<Vec<u8>>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Returns the kind label.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the raw name bytes.
    #[must_use]
    pub fn name(&self) -> &[u8] {
        &self.name
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(\"{}\")", self.kind, self.name.escape_ascii())
    }
}

/// A hierarchical key identifying one entity in the store.
///
/// A key is a non-empty path of [`PathElement`]s. The last element names the
/// entity itself; the preceding elements are its ancestors. Construction is
/// deterministic: equal components always produce equal keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key {
    path: Vec<PathElement>,
}

impl Key {
    /// Builds a key from an optional parent and a `(kind, name)` step.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pstore_storage::Key;
    ///
    /// let root = Key::from_path(None, "PStore", "test.pstore");
    /// let child = Key::from_path(Some(&root), "PStore", vec![0x61u8]);
    /// assert_eq!(child.parent(), Some(root));
    /// ```
    pub fn from_path(parent: Option<&Key>, kind: impl Into<String>, name: impl Into<Vec<u8>>) -> Self {
        let mut path = parent.map(|p| p.path.clone()).unwrap_or_default();
        path.push(PathElement::new(kind, name));
        Self { path }
    }

    /// Returns the full path, root first.
    #[must_use]
    pub fn path(&self) -> &[PathElement] {
        &self.path
    }

    fn leaf(&self) -> &PathElement {
        // `from_path` always pushes one element, so a key is never empty.
        &self.path[self.path.len() - 1]
    }

    /// Returns the kind of the last path element.
    #[must_use]
    pub fn kind(&self) -> &str {
        self.leaf().kind()
    }

    /// Returns the raw name of the last path element.
    #[must_use]
    pub fn name(&self) -> &[u8] {
        self.leaf().name()
    }

    /// Returns the name of the last path element as text, if it is UTF-8.
    #[must_use]
    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.name()).ok()
    }

    /// Returns the parent key, or `None` for a root key.
    #[must_use]
    pub fn parent(&self) -> Option<Key> {
        if self.path.len() < 2 {
            return None;
        }
        Some(Self {
            path: self.path[..self.path.len() - 1].to_vec(),
        })
    }

    /// Returns true if `ancestor` is a strict prefix of this key's path.
    #[must_use]
    pub fn is_descendant_of(&self, ancestor: &Key) -> bool {
        self.path.len() > ancestor.path.len() && self.path.starts_with(&ancestor.path)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.path.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{element}")?;
        }
        Ok(())
    }
}
