//! Catch filters for checked bodies.
//!
//! A [`CatchKinds`] decides which failures produced inside
//! [`run_checked`](crate::Aggregator::run_checked) are folded into the tree.
//! Everything it rejects is handed back to the caller as
//! [`TallyError::Uncaught`](crate::TallyError::Uncaught).
//!
//! Aggregates from nested aggregators, such as the error returned by an inner
//! [`finish`](crate::Aggregator::finish), are always caught and merged no
//! matter which kinds the filter names.
//!
//! # Example
//!
//! ```
//! # use std::{fmt, io};
//! # use tally::{CatchKinds, Failure};
//! let kinds = CatchKinds::only::<fmt::Error>().or::<io::Error>();
//!
//! assert!(kinds.catches(&Failure::new(fmt::Error)));
//! assert!(!kinds.catches(&Failure::msg("something else")));
//! assert!(CatchKinds::all().catches(&Failure::msg("something else")));
//! ```

use std::{error::Error, fmt, sync::Arc};

use tally_core::Failure;

type Matcher = Arc<dyn Fn(&Failure) -> bool + Send + Sync>;

/// The set of failure kinds an aggregator intercepts.
///
/// The default catches every failure. A failure that carries an
/// [`AggregateError`](crate::AggregateError) bypasses the filter entirely: the
/// aggregator always catches it and merges its tree, even under
/// [`only`](Self::only).
#[derive(Clone, Default)]
pub struct CatchKinds {
    /// `None` means every kind; otherwise a failure is caught if any matcher accepts it.
    matchers: Option<Vec<(&'static str, Matcher)>>,
}

impl CatchKinds {
    /// Catch every failure.
    pub fn all() -> Self {
        Self::default()
    }

    /// Catch only failures whose error type is `E`.
    pub fn only<E>() -> Self
    where
        E: Error + 'static,
    {
        Self {
            matchers: Some(Vec::new()),
        }
        .or::<E>()
    }

    /// Also catch failures whose error type is `E`.
    ///
    /// Has no effect on a filter that already catches everything.
    pub fn or<E>(self) -> Self
    where
        E: Error + 'static,
    {
        self.push(
            std::any::type_name::<E>(),
            Arc::new(|failure: &Failure| failure.is::<E>()),
        )
    }

    /// Also catch failures accepted by `predicate`.
    ///
    /// Has no effect on a filter that already catches everything.
    pub fn or_matching<F>(self, predicate: F) -> Self
    where
        F: Fn(&Failure) -> bool + Send + Sync + 'static,
    {
        self.push("<predicate>", Arc::new(predicate))
    }

    fn push(mut self, name: &'static str, matcher: Matcher) -> Self {
        if let Some(matchers) = &mut self.matchers {
            matchers.push((name, matcher));
        }
        self
    }

    /// Returns `true` if this filter catches every failure.
    pub fn catches_all(&self) -> bool {
        self.matchers.is_none()
    }

    /// Returns `true` if `failure` should be folded into the tree.
    pub fn catches(&self, failure: &Failure) -> bool {
        match &self.matchers {
            None => true,
            Some(matchers) => matchers.iter().any(|(_, matcher)| matcher(failure)),
        }
    }
}

impl fmt::Debug for CatchKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.matchers {
            None => f.write_str("CatchKinds::All"),
            Some(matchers) => f
                .debug_tuple("CatchKinds::Only")
                .field(&matchers.iter().map(|(name, _)| *name).collect::<Vec<_>>())
                .finish(),
        }
    }
}
