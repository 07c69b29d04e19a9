//! Tally - keep going past failures and report them all at once.
//!
//! Form validation, batch processing and multi-field record checks want a
//! complete list of problems, not just the first one. Tally runs independent
//! sub-steps, folds every failure into an [`ErrorTree`] keyed by step name,
//! and surfaces the whole tree as one error at the end.
//!
//! # Overview
//!
//! - [`Aggregator`] - records failures directly or captures them from checked
//!   closures.
//! - [`ErrorTree`] - the collected failures, with deterministic summaries.
//! - [`CatchKinds`] - which failure kinds count as expected problems.
//! - [`aggregate`] - runs a closure against a fresh aggregator and surfaces
//!   whatever it recorded.
//!
//! # Examples
//!
//! ```
//! use tally::{Failure, aggregate, config::AggregatorConfig};
//!
//! fn parse_age(raw: &str) -> Result<u32, std::num::ParseIntError> {
//!     raw.parse()
//! }
//!
//! let result = aggregate(AggregatorConfig::default(), |agg| {
//!     let age = agg.run_checked_child("age", || parse_age("twelve"))?;
//!     agg.run_checked_child("name", || Err::<(), _>(Failure::msg("required")))?;
//!     Ok(age)
//! });
//!
//! let err = result.unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "age: [invalid digit found in string], name: [required]"
//! );
//! ```

pub mod config;

mod aggregator;
mod catch;
mod error;
#[cfg(feature = "miette")]
pub mod report;

pub use tally_core::{AggregateError, Entry, ErrorTree, Failure, Lookup, LookupError};

pub use aggregator::Aggregator;
pub use catch::CatchKinds;
pub use error::TallyError;

use log::debug;

use config::AggregatorConfig;

/// Run `body` with a fresh [`Aggregator`] and surface what it recorded.
///
/// The body's value is returned only if nothing was recorded. An error
/// returned by the body itself, such as an autoraised aggregate or an
/// uncaught failure, is passed on unchanged.
///
/// # Errors
///
/// - Whatever `body` returns as an error.
/// - [`TallyError::Aggregate`] if the aggregator holds failures once the body
///   has returned.
pub fn aggregate<T, F>(config: AggregatorConfig, body: F) -> Result<T, TallyError>
where
    F: FnOnce(&mut Aggregator) -> Result<T, TallyError>,
{
    let mut aggregator = Aggregator::new(config);
    let value = body(&mut aggregator)?;
    debug!(has_errors = aggregator.has_errors(); "Aggregation scope finished");
    aggregator.finish()?;
    Ok(value)
}
