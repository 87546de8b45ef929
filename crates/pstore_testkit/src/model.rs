//! Reference model of namespace semantics.
//!
//! The model keeps committed records as an ordered list and applies the
//! writes of a committing transaction in order: rewriting a key keeps its
//! place, deleting and re-adding a key moves it to the end.

use crate::generators::{Op, TxnScript};

/// What the model expects an operation to return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    /// `set` returns the value it stored.
    Set(i64),
    /// `delete` returns the previous value.
    Delete(Option<i64>),
    /// `get` returns the current value.
    Get(Option<i64>),
    /// `contains` result.
    Contains(bool),
    /// `keys()` as a sorted list.
    Keys(Vec<String>),
}

/// Committed state of one namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceModel {
    committed: Vec<(String, i64)>,
}

impl NamespaceModel {
    /// Creates an empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed keys in store order.
    pub fn keys(&self) -> Vec<String> {
        self.committed.iter().map(|(k, _)| k.clone()).collect()
    }

    /// Committed value of `key`.
    pub fn get(&self, key: &str) -> Option<i64> {
        lookup(&self.committed, key)
    }

    /// Runs a script and returns what each operation should yield.
    ///
    /// The committed state changes only if the script ends by committing.
    pub fn run(&mut self, script: &TxnScript) -> Vec<Expected> {
        let mut working = self.committed.clone();
        let expected = script
            .ops
            .iter()
            .map(|op| apply(&mut working, op))
            .collect();

        if script.end.commits() {
            self.committed = working;
        }
        expected
    }
}

fn lookup(records: &[(String, i64)], key: &str) -> Option<i64> {
    records.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
}

fn apply(records: &mut Vec<(String, i64)>, op: &Op) -> Expected {
    match op {
        Op::Set(key, value) => {
            match records.iter_mut().find(|(k, _)| k == key) {
                Some(slot) => slot.1 = *value,
                None => records.push((key.clone(), *value)),
            }
            Expected::Set(*value)
        }
        Op::Delete(key) => {
            let previous = lookup(records, key);
            records.retain(|(k, _)| k != key);
            Expected::Delete(previous)
        }
        Op::Get(key) => Expected::Get(lookup(records, key)),
        Op::Contains(key) => Expected::Contains(lookup(records, key).is_some()),
        Op::Keys => {
            let mut keys: Vec<String> = records.iter().map(|(k, _)| k.clone()).collect();
            keys.sort();
            Expected::Keys(keys)
        }
    }
}
