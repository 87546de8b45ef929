//! Entities and keys-only queries.

use crate::key::Key;

/// A stored record: a key and one opaque value slot.
///
/// The value is `None` only for entities returned by a keys-only query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    key: Key,
    value: Option<Vec<u8>>,
}

impl Entity {
    /// Creates an entity holding `value`.
    pub fn new(key: Key, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key,
            value: Some(value.into()),
        }
    }

    /// Creates a key-only projection of an entity.
    #[must_use]
    pub fn key_only(key: Key) -> Self {
        Self { key, value: None }
    }

    /// Returns the entity's key.
    #[must_use]
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Returns the value payload, if it was fetched.
    #[must_use]
    pub fn value(&self) -> Option<&[u8]> {
        self.value.as_deref()
    }

    /// Consumes the entity and returns the key and payload.
    #[must_use]
    pub fn into_parts(self) -> (Key, Option<Vec<u8>>) {
        (self.key, self.value)
    }
}

/// A query for all entities of one kind under an ancestor key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    kind: String,
    ancestor: Option<Key>,
    keys_only: bool,
}

impl Query {
    /// Creates a query matching every entity of `kind`.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ancestor: None,
            keys_only: false,
        }
    }

    /// Restricts the query to descendants of `ancestor`.
    #[must_use]
    pub fn ancestor(mut self, ancestor: Key) -> Self {
        self.ancestor = Some(ancestor);
        self
    }

    /// Requests key identifiers only, without value payloads.
    #[must_use]
    pub fn keys_only(mut self) -> Self {
        self.keys_only = true;
        self
    }

    /// Returns the kind this query matches.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns true if this is a keys-only query.
    #[must_use]
    pub fn is_keys_only(&self) -> bool {
        self.keys_only
    }

    /// Returns true if `key` satisfies the kind and ancestor filters.
    #[must_use]
    pub fn matches(&self, key: &Key) -> bool {
        key.kind() == self.kind
            && self
                .ancestor
                .as_ref()
                .map_or(true, |ancestor| key.is_descendant_of(ancestor))
    }
}

/// Cursor over the entities returned by a query, in store order.
#[derive(Debug)]
pub struct QueryResults {
    inner: std::vec::IntoIter<Entity>,
}

impl QueryResults {
    /// Wraps an already materialized result set.
    #[must_use]
    pub fn new(entities: Vec<Entity>) -> Self {
        Self {
            inner: entities.into_iter(),
        }
    }
}

impl Iterator for QueryResults {
    type Item = Entity;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for QueryResults {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_matches_kind_and_ancestor() {
        let root = Key::from_path(None, "PStore", "db");
        let other_root = Key::from_path(None, "PStore", "other");
        let query = Query::new("PStore").ancestor(root.clone()).keys_only();

        assert!(query.is_keys_only());
        assert!(query.matches(&Key::from_path(Some(&root), "PStore", "a")));
        assert!(!query.matches(&Key::from_path(Some(&root), "Other", "a")));
        assert!(!query.matches(&Key::from_path(Some(&other_root), "PStore", "a")));
        assert!(!query.matches(&root));
    }

    #[test]
    fn key_only_entity_has_no_value() {
        let key = Key::from_path(None, "PStore", "db");
        let entity = Entity::key_only(key.clone());
        assert_eq!(entity.key(), &key);
        assert!(entity.value().is_none());
    }

    #[test]
    fn results_iterate_in_order() {
        let root = Key::from_path(None, "PStore", "db");
        let a = Entity::new(Key::from_path(Some(&root), "PStore", "a"), vec![1u8]);
        let b = Entity::new(Key::from_path(Some(&root), "PStore", "b"), vec![2u8]);

        let results = QueryResults::new(vec![a.clone(), b.clone()]);
        assert_eq!(results.len(), 2);
        assert_eq!(results.collect::<Vec<_>>(), vec![a, b]);
    }
}
