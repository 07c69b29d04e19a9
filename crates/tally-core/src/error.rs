//! Error types raised by the tree.
//!
//! [`AggregateError`] is the signal that carries a finished [`ErrorTree`] to a
//! caller. [`LookupError`] is returned by [`ErrorTree::get`].

use thiserror::Error;

use crate::tree::ErrorTree;

/// A failed lookup into an [`ErrorTree`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("index {index} is out of range for {len} own failures")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("index -{back} is out of range for {len} own failures")]
    FromEndOutOfRange { back: usize, len: usize },

    #[error("no sub-step named `{0}`")]
    KeyNotFound(String),
}

/// An [`ErrorTree`] surfaced as a single error.
///
/// The message is the tree's [`full_summary`](ErrorTree::full_summary).
/// Adding an `AggregateError` to a tree as a failure merges its contents
/// instead of nesting it as a leaf.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct AggregateError(ErrorTree);

impl AggregateError {
    /// Wrap a tree.
    pub fn new(tree: ErrorTree) -> Self {
        Self(tree)
    }

    /// Borrow the carried tree.
    pub fn tree(&self) -> &ErrorTree {
        &self.0
    }

    /// Unwrap the carried tree.
    pub fn into_tree(self) -> ErrorTree {
        self.0
    }

    /// Move the tree out, leaving an empty one behind.
    pub(crate) fn take_tree(&mut self) -> ErrorTree {
        std::mem::take(&mut self.0)
    }
}

impl From<ErrorTree> for AggregateError {
    fn from(tree: ErrorTree) -> Self {
        Self(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Failure;

    #[test]
    fn test_aggregate_error_displays_full_summary() {
        let mut tree = ErrorTree::new();
        tree.add_own(Failure::msg("The value is wrong"));
        tree.add_child_error("foo", Failure::msg("foo is also wrong"));

        let err = AggregateError::new(tree);
        assert_eq!(
            err.to_string(),
            "The value is wrong; foo: [foo is also wrong]"
        );
    }

    #[test]
    fn test_empty_aggregate_error_message() {
        let err = AggregateError::from(ErrorTree::new());
        assert_eq!(err.to_string(), "<no message>");
        assert!(err.into_tree().is_empty());
    }

    #[test]
    fn test_lookup_error_messages() {
        let err = LookupError::IndexOutOfRange { index: 3, len: 1 };
        assert_eq!(err.to_string(), "index 3 is out of range for 1 own failures");

        let err = LookupError::KeyNotFound("foo".to_string());
        assert_eq!(err.to_string(), "no sub-step named `foo`");
    }
}
