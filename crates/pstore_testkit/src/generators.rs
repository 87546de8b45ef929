//! Property-based test generators using proptest.
//!
//! Keys are drawn from a small alphabet so that generated scripts keep
//! hitting the same keys with sets and deletes.

use proptest::prelude::*;

/// A single dictionary operation inside a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// `set(key, value)`
    Set(String, i64),
    /// `delete(key)`
    Delete(String),
    /// `get(key)`
    Get(String),
    /// `contains(key)`
    Contains(String),
    /// `keys()`
    Keys,
}

/// How a generated transaction body finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnEnd {
    /// The body returns normally.
    Return,
    /// The body calls `commit()`.
    Commit,
    /// The body calls `abort()`.
    Abort,
    /// The body returns an error.
    Fail,
}

impl TxnEnd {
    /// Returns true if the transaction's writes are kept.
    #[must_use]
    pub fn commits(self) -> bool {
        matches!(self, Self::Return | Self::Commit)
    }
}

/// A generated transaction body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxnScript {
    /// Operations in order.
    pub ops: Vec<Op>,
    /// How the body finishes.
    pub end: TxnEnd,
}

/// Strategy for generating keys from a small alphabet.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-d]{1,2}").expect("Invalid regex")
}

/// Strategy for generating values.
pub fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

/// Strategy for generating a single operation.
pub fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (key_strategy(), value_strategy()).prop_map(|(k, v)| Op::Set(k, v)),
        2 => key_strategy().prop_map(Op::Delete),
        2 => key_strategy().prop_map(Op::Get),
        1 => key_strategy().prop_map(Op::Contains),
        1 => Just(Op::Keys),
    ]
}

/// Strategy for generating how a transaction ends.
pub fn txn_end_strategy() -> impl Strategy<Value = TxnEnd> {
    prop_oneof![
        4 => Just(TxnEnd::Return),
        2 => Just(TxnEnd::Commit),
        1 => Just(TxnEnd::Abort),
        1 => Just(TxnEnd::Fail),
    ]
}

/// Strategy for generating one transaction body.
pub fn txn_script_strategy() -> impl Strategy<Value = TxnScript> {
    (prop::collection::vec(op_strategy(), 0..16), txn_end_strategy())
        .prop_map(|(ops, end)| TxnScript { ops, end })
}

/// Strategy for generating a sequence of transactions.
pub fn history_strategy() -> impl Strategy<Value = Vec<TxnScript>> {
    prop::collection::vec(txn_script_strategy(), 1..8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::strategy::ValueTree;
    use proptest::test_runner::TestRunner;

    #[test]
    fn keys_use_small_alphabet() {
        let mut runner = TestRunner::default();
        for _ in 0..64 {
            let key = key_strategy().new_tree(&mut runner).unwrap().current();
            assert!((1..=2).contains(&key.len()));
            assert!(key.chars().all(|c| ('a'..='d').contains(&c)));
        }
    }

    #[test]
    fn committing_ends() {
        assert!(TxnEnd::Return.commits());
        assert!(TxnEnd::Commit.commits());
        assert!(!TxnEnd::Abort.commits());
        assert!(!TxnEnd::Fail.commits());
    }
}
