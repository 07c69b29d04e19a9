//! Adapter from error trees to [`miette`] diagnostics.
//!
//! Each leaf failure becomes its own [`Reportable`], so a report handler can
//! render every problem independently instead of one long summary line.

use miette::Diagnostic;
use thiserror::Error;

use tally_core::ErrorTree;

/// One leaf failure ready for rendering with a [`miette`] report handler.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(tally::failure))]
pub struct Reportable {
    message: String,
    step: Option<String>,
    #[help]
    help: Option<String>,
}

impl Reportable {
    /// The rendered failure.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Dotted path of the sub-step the failure was recorded under, or `None`
    /// for failures at the root.
    pub fn step(&self) -> Option<&str> {
        self.step.as_deref()
    }
}

/// Flatten `tree` into one diagnostic per leaf failure.
///
/// Diagnostics follow the order of [`ErrorTree::leaves`].
pub fn to_reportables(tree: &ErrorTree) -> Vec<Reportable> {
    tree.leaves()
        .map(|(path, failure)| {
            let step = (!path.is_empty()).then(|| path.join("."));
            let help = step.as_ref().map(|step| format!("recorded for step `{step}`"));
            Reportable {
                message: failure.to_string(),
                step,
                help,
            }
        })
        .collect()
}
