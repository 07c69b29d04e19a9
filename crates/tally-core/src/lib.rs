//! Tally Core Types
//!
//! This crate provides the data model behind Tally's error aggregation. It
//! includes:
//!
//! - **Failures**: Shared, opaque leaf failures ([`failure::Failure`])
//! - **Trees**: Failures grouped by named sub-step ([`tree::ErrorTree`])
//! - **Errors**: The aggregate signal and lookup failures ([`error`] module)
//!
//! The tree is a plain value. It only becomes an error when wrapped in
//! [`AggregateError`], which is also how a finished tree is folded back into
//! another one.
//!
//! # Example
//!
//! ```
//! # use tally_core::{ErrorTree, Failure};
//! let mut tree = ErrorTree::new();
//! tree.add_own(Failure::msg("bad price"));
//! tree.add_child_error("x", Failure::msg("x failed"));
//!
//! assert!(!tree.is_empty());
//! assert_eq!(tree.full_summary(), "bad price; x: [x failed]");
//! ```

pub mod error;
pub mod failure;
pub mod tree;

pub use error::{AggregateError, LookupError};
pub use failure::Failure;
pub use tree::{Entry, ErrorTree, Lookup};
