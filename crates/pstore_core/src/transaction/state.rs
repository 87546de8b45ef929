//! Transaction state, mode and outcome.

use crate::error::ExitKind;

/// State of a transaction context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// No store transaction has been opened yet.
    NotStarted,
    /// Transaction is active and can perform operations.
    Active,
    /// Transaction has been committed.
    Committed,
    /// Transaction has been aborted or rolled back.
    Aborted,
}

impl TransactionState {
    /// Returns true once the transaction has committed or aborted.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Committed | Self::Aborted)
    }
}

/// Access mode requested when opening a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionMode {
    /// Reads and writes are allowed.
    #[default]
    ReadWrite,
    /// Writes fail with `ReadOnlyTransaction`.
    ReadOnly,
}

impl TransactionMode {
    /// Returns true for `ReadOnly`.
    #[must_use]
    pub fn is_read_only(self) -> bool {
        self == Self::ReadOnly
    }
}

/// How a transaction ended, as seen by the caller of `transaction()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionOutcome<T> {
    /// The body returned normally and the transaction was committed.
    Completed(T),
    /// The body called `commit()`; the rest of the body was skipped.
    CommittedEarly,
    /// The body called `abort()`; all writes were discarded.
    Aborted,
}

impl<T> TransactionOutcome<T> {
    pub(crate) fn from_exit(exit: ExitKind) -> Self {
        match exit {
            ExitKind::Commit => Self::CommittedEarly,
            ExitKind::Abort => Self::Aborted,
        }
    }

    /// Returns the body's value if it ran to completion.
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::CommittedEarly | Self::Aborted => None,
        }
    }

    /// Returns true if the writes were committed.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        !self.is_aborted()
    }

    /// Returns true if the writes were discarded.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(!TransactionState::NotStarted.is_terminal());
        assert!(!TransactionState::Active.is_terminal());
        assert!(TransactionState::Committed.is_terminal());
        assert!(TransactionState::Aborted.is_terminal());
    }

    #[test]
    fn default_mode_is_read_write() {
        assert_eq!(TransactionMode::default(), TransactionMode::ReadWrite);
        assert!(TransactionMode::ReadOnly.is_read_only());
    }

    #[test]
    fn outcome_accessors() {
        assert_eq!(TransactionOutcome::Completed(3).into_value(), Some(3));
        assert!(TransactionOutcome::Completed(3).is_committed());

        let early: TransactionOutcome<()> = TransactionOutcome::from_exit(ExitKind::Commit);
        assert_eq!(early, TransactionOutcome::CommittedEarly);
        assert!(early.is_committed());
        assert_eq!(early.into_value(), None);

        let aborted: TransactionOutcome<()> = TransactionOutcome::from_exit(ExitKind::Abort);
        assert!(aborted.is_aborted());
    }
}
