//! The error aggregator.
//!
//! An [`Aggregator`] owns one [`ErrorTree`] for the duration of a single pass
//! over some sub-steps. Failures are recorded directly or captured from
//! checked bodies, and the whole tree is surfaced once at the end through
//! [`raise_if_any`](Aggregator::raise_if_any) or [`finish`](Aggregator::finish).
//!
//! # Autoraise
//!
//! With [`autoraise`](AggregatorConfig::autoraise) enabled every recording
//! operation returns [`TallyError::Aggregate`] right away. The error carries
//! everything recorded so far, not just the newest failure, so this mode is
//! fail-fast with history rather than full aggregation.

use log::{debug, trace};

use tally_core::{AggregateError, ErrorTree, Failure};

use crate::{
    config::AggregatorConfig,
    error::{TallyError, unwrap_failure},
};

/// Collects failures from independent sub-steps into one [`ErrorTree`].
///
/// # Examples
///
/// ```
/// use tally::{Aggregator, Failure};
///
/// let mut agg = Aggregator::default();
/// agg.record_own(Failure::msg("bad price")).unwrap();
/// agg.run_checked_child("x", || Err::<(), _>(Failure::msg("x failed")))
///     .unwrap();
///
/// assert!(agg.has_errors());
/// assert_eq!(agg.tree().full_summary(), "bad price; x: [x failed]");
///
/// let err = agg.raise_if_any().unwrap_err();
/// assert_eq!(err.to_string(), "bad price; x: [x failed]");
/// ```
#[derive(Debug, Default)]
pub struct Aggregator {
    root: ErrorTree,
    config: AggregatorConfig,
}

impl Aggregator {
    /// Create an aggregator with an empty tree.
    pub fn new(config: AggregatorConfig) -> Self {
        Self {
            root: ErrorTree::new(),
            config,
        }
    }

    /// Returns the configuration this aggregator was built with.
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Record a failure that belongs to the operation as a whole.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::Aggregate`] with the accumulated tree when
    /// autoraise is enabled.
    pub fn record_own(&mut self, failure: impl Into<Failure>) -> Result<(), TallyError> {
        let failure = unwrap_failure(failure.into());
        debug!(failure:? = failure; "Recording failure");
        self.root.add_own(failure);
        self.check_autoraise()
    }

    /// Record a failure under the sub-step `key`.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::Aggregate`] with the accumulated tree when
    /// autoraise is enabled.
    pub fn record_child(
        &mut self,
        key: impl Into<String>,
        failure: impl Into<Failure>,
    ) -> Result<(), TallyError> {
        let key = key.into();
        let failure = unwrap_failure(failure.into());
        debug!(step = key.as_str(), failure:? = failure; "Recording sub-step failure");
        self.root.add_child_error(key, failure);
        self.check_autoraise()
    }

    /// Run `body` and record its failure, if any, as an own failure.
    ///
    /// Returns `Ok(Some(value))` when the body succeeds and `Ok(None)` when
    /// its failure was captured.
    ///
    /// # Errors
    ///
    /// - [`TallyError::Uncaught`] if the failure is outside the configured
    ///   [`CatchKinds`](crate::CatchKinds). Nothing is recorded.
    /// - [`TallyError::Aggregate`] if the failure was recorded and autoraise
    ///   is enabled.
    pub fn run_checked<T, E, F>(&mut self, body: F) -> Result<Option<T>, TallyError>
    where
        F: FnOnce() -> Result<T, E>,
        E: Into<Failure>,
    {
        match self.intercept(body)? {
            Ok(value) => Ok(Some(value)),
            Err(failure) => {
                self.record_own(failure)?;
                Ok(None)
            }
        }
    }

    /// Run `body` and record its failure, if any, under the sub-step `key`.
    ///
    /// Behaves like [`run_checked`](Self::run_checked) otherwise.
    ///
    /// # Errors
    ///
    /// Same as [`run_checked`](Self::run_checked).
    pub fn run_checked_child<T, E, F>(
        &mut self,
        key: impl Into<String>,
        body: F,
    ) -> Result<Option<T>, TallyError>
    where
        F: FnOnce() -> Result<T, E>,
        E: Into<Failure>,
    {
        match self.intercept(body)? {
            Ok(value) => Ok(Some(value)),
            Err(failure) => {
                self.record_child(key, failure)?;
                Ok(None)
            }
        }
    }

    /// Run `body`, passing a caught failure back for recording.
    ///
    /// Aggregates coming from nested aggregators are always caught so that
    /// their trees are merged.
    fn intercept<T, E, F>(&self, body: F) -> Result<Result<T, Failure>, TallyError>
    where
        F: FnOnce() -> Result<T, E>,
        E: Into<Failure>,
    {
        let failure = match body() {
            Ok(value) => return Ok(Ok(value)),
            Err(err) => unwrap_failure(err.into()),
        };

        if failure.aggregate().is_some() || self.config.catch().catches(&failure) {
            trace!(failure:? = failure; "Caught failure from checked body");
            Ok(Err(failure))
        } else {
            debug!(failure:? = failure; "Passing on failure outside catch kinds");
            Err(TallyError::Uncaught(failure))
        }
    }

    /// Returns `true` if any failure has been recorded.
    pub fn has_errors(&self) -> bool {
        !self.root.is_empty()
    }

    /// Surface the accumulated tree if it holds any failure.
    ///
    /// The aggregator keeps its tree, so recording may continue afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::Aggregate`] with a copy of the tree if
    /// [`has_errors`](Self::has_errors) is `true`.
    pub fn raise_if_any(&self) -> Result<(), TallyError> {
        if self.has_errors() {
            return Err(self.aggregate_error().into());
        }
        Ok(())
    }

    /// Consume the aggregator, surfacing the tree if it holds any failure.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::Aggregate`] if [`has_errors`](Self::has_errors)
    /// is `true`.
    pub fn finish(self) -> Result<(), TallyError> {
        if self.has_errors() {
            debug!(failures = self.root.failure_count(); "Aggregation finished with failures");
            return Err(AggregateError::new(self.root).into());
        }
        Ok(())
    }

    /// Borrow the accumulated tree.
    pub fn tree(&self) -> &ErrorTree {
        &self.root
    }

    /// Take the accumulated tree.
    pub fn into_tree(self) -> ErrorTree {
        self.root
    }

    fn aggregate_error(&self) -> AggregateError {
        AggregateError::new(self.root.clone())
    }

    fn check_autoraise(&self) -> Result<(), TallyError> {
        if self.config.autoraise() {
            return Err(self.aggregate_error().into());
        }
        Ok(())
    }
}
