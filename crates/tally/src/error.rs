//! Error types for Tally operations.
//!
//! This module provides [`TallyError`], returned by [`Aggregator`](crate::Aggregator)
//! operations whenever something has to reach the caller right away.

use thiserror::Error;

use tally_core::{AggregateError, ErrorTree, Failure};

/// The error type for aggregator operations.
///
/// # Variants
///
/// `Aggregate` carries the accumulated tree. It is returned by
/// [`raise_if_any`](crate::Aggregator::raise_if_any) and, in autoraise mode,
/// by every recording operation. Its [`source`](std::error::Error::source) is
/// the [`AggregateError`], so adding it to another tree merges the contents.
///
/// `Uncaught` carries a failure produced inside a checked body whose kind is
/// outside the aggregator's [`CatchKinds`](crate::CatchKinds). It is passed on
/// unchanged.
#[derive(Debug, Error)]
pub enum TallyError {
    #[error("{0}")]
    Aggregate(#[from] AggregateError),

    #[error("{0}")]
    Uncaught(Failure),
}

impl TallyError {
    /// The accumulated tree, if this is an `Aggregate` error.
    pub fn tree(&self) -> Option<&ErrorTree> {
        match self {
            Self::Aggregate(err) => Some(err.tree()),
            Self::Uncaught(_) => None,
        }
    }

    /// Returns `true` if this error carries an accumulated tree.
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Self::Aggregate(_))
    }
}

/// Unwrap a failure that carries an uncaught [`TallyError`].
///
/// An `Uncaught` yields the failure it carried. Anything else, aggregates
/// included, is returned as is.
pub(crate) fn unwrap_failure(failure: Failure) -> Failure {
    match failure.downcast_ref::<TallyError>() {
        Some(TallyError::Uncaught(inner)) => inner.clone(),
        _ => failure,
    }
}
