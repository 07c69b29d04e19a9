//! The nested error tree.
//!
//! An [`ErrorTree`] holds the failures raised directly at one node ("own"
//! failures) and, per named sub-step, a child tree. Children are stored in
//! insertion order, which is the order [`ErrorTree::children`] and
//! [`ErrorTree::leaves`] iterate in. Rendering is different: summaries list
//! children sorted by key so the output is reproducible.

use std::{fmt, ops::Index};

use indexmap::IndexMap;
use log::trace;

use crate::{error::LookupError, failure::Failure};

/// Placeholder rendered for a node without failures.
const NO_MESSAGE: &str = "<no message>";

/// A tree of failures keyed by sub-step name.
///
/// A fresh tree is the identity element of [`merge`](Self::merge). Failures
/// are only ever added, so once a tree is non-empty it stays non-empty.
#[derive(Debug, Clone, Default)]
pub struct ErrorTree {
    own: Vec<Failure>,
    children: IndexMap<String, ErrorTree>,
}

/// Position in an [`ErrorTree`] used by [`ErrorTree::get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// Index into the own failures.
    Own(usize),
    /// Position counted back from the last own failure, `1` being the last.
    Back(usize),
    /// Name of a sub-step.
    Child(&'a str),
}

impl From<usize> for Lookup<'_> {
    fn from(index: usize) -> Self {
        Lookup::Own(index)
    }
}

impl From<i32> for Lookup<'_> {
    /// Negative values count back from the end, so `-1` is the last failure.
    fn from(index: i32) -> Self {
        let magnitude = index.unsigned_abs() as usize;
        if index < 0 {
            Lookup::Back(magnitude)
        } else {
            Lookup::Own(magnitude)
        }
    }
}

impl<'a> From<&'a str> for Lookup<'a> {
    fn from(key: &'a str) -> Self {
        Lookup::Child(key)
    }
}

impl<'a> From<&'a String> for Lookup<'a> {
    fn from(key: &'a String) -> Self {
        Lookup::Child(key)
    }
}

/// Result of a successful [`ErrorTree::get`].
#[derive(Debug, Clone, Copy)]
pub enum Entry<'a> {
    Own(&'a Failure),
    Child(&'a ErrorTree),
}

impl fmt::Display for Entry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Own(failure) => fmt::Display::fmt(failure, f),
            Entry::Child(tree) => fmt::Display::fmt(tree, f),
        }
    }
}

impl ErrorTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure at this node.
    ///
    /// A failure carrying an [`AggregateError`](crate::AggregateError) (see
    /// [`Failure::aggregate`]) is not stored as a leaf; its tree is merged
    /// into this one instead.
    pub fn add_own(&mut self, failure: impl Into<Failure>) {
        let mut failure = failure.into();
        match failure.take_aggregate_tree() {
            Some(tree) => self.merge(tree),
            None => self.own.push(failure),
        }
    }

    /// Record a failure under the sub-step `key`, creating the child on demand.
    ///
    /// The child applies the same rule as [`add_own`](Self::add_own), so an
    /// [`AggregateError`](crate::AggregateError) is merged into the child.
    pub fn add_child_error(&mut self, key: impl Into<String>, failure: impl Into<Failure>) {
        self.children
            .entry(key.into())
            .or_default()
            .add_own(failure);
    }

    /// Merge `other` into this tree.
    ///
    /// Own failures of `other` are appended in order, and each child of
    /// `other` is merged into the child with the same key.
    pub fn merge(&mut self, other: ErrorTree) {
        trace!(
            own_failures = other.own.len(),
            children = other.children.len();
            "Merging error tree"
        );
        self.own.extend(other.own);
        for (key, child) in other.children {
            self.children.entry(key).or_default().merge(child);
        }
    }

    /// Returns `true` if no failure is recorded anywhere in the tree.
    pub fn is_empty(&self) -> bool {
        self.own.is_empty() && self.children.values().all(ErrorTree::is_empty)
    }

    /// Failures recorded directly at this node, in insertion order.
    pub fn own(&self) -> &[Failure] {
        &self.own
    }

    /// Child trees in insertion order.
    pub fn children(&self) -> &IndexMap<String, ErrorTree> {
        &self.children
    }

    /// Own failure at `index`.
    pub fn own_at(&self, index: usize) -> Option<&Failure> {
        self.own.get(index)
    }

    /// Child tree for the sub-step `key`.
    pub fn child(&self, key: &str) -> Option<&ErrorTree> {
        self.children.get(key)
    }

    /// Look up an own failure by index or a child by key.
    ///
    /// Integer literals work directly. A negative index counts back from the
    /// last own failure.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::IndexOutOfRange`],
    /// [`LookupError::FromEndOutOfRange`] or [`LookupError::KeyNotFound`] when
    /// nothing is stored at the requested position.
    ///
    /// # Example
    ///
    /// ```
    /// # use tally_core::{ErrorTree, Failure, LookupError};
    /// let mut tree = ErrorTree::new();
    /// tree.add_own(Failure::msg("The value is wrong"));
    /// tree.add_child_error("foo", Failure::msg("foo is also wrong"));
    ///
    /// assert_eq!(tree.get(0).unwrap().to_string(), "The value is wrong");
    /// assert_eq!(tree.get(-1).unwrap().to_string(), "The value is wrong");
    /// assert_eq!(tree.get("foo").unwrap().to_string(), "foo is also wrong");
    /// assert_eq!(
    ///     tree.get("bar").unwrap_err(),
    ///     LookupError::KeyNotFound("bar".to_string())
    /// );
    /// ```
    pub fn get<'k>(&self, lookup: impl Into<Lookup<'k>>) -> Result<Entry<'_>, LookupError> {
        match lookup.into() {
            Lookup::Own(index) => self
                .own
                .get(index)
                .map(Entry::Own)
                .ok_or(LookupError::IndexOutOfRange {
                    index,
                    len: self.own.len(),
                }),
            Lookup::Back(back) => self
                .own
                .len()
                .checked_sub(back)
                .filter(|_| back > 0)
                .and_then(|index| self.own.get(index))
                .map(Entry::Own)
                .ok_or(LookupError::FromEndOutOfRange {
                    back,
                    len: self.own.len(),
                }),
            Lookup::Child(key) => self
                .children
                .get(key)
                .map(Entry::Child)
                .ok_or_else(|| LookupError::KeyNotFound(key.to_string())),
        }
    }

    /// Number of leaf failures in the whole tree.
    pub fn failure_count(&self) -> usize {
        self.own.len()
            + self
                .children
                .values()
                .map(ErrorTree::failure_count)
                .sum::<usize>()
    }

    /// Every leaf failure together with the chain of sub-step names leading
    /// to it.
    ///
    /// Own failures of a node come before its children; children are visited
    /// in insertion order.
    pub fn leaves(&self) -> impl Iterator<Item = (Vec<&str>, &Failure)> {
        let mut out = Vec::with_capacity(self.failure_count());
        self.collect_leaves(&mut Vec::new(), &mut out);
        out.into_iter()
    }

    fn collect_leaves<'a>(
        &'a self,
        path: &mut Vec<&'a str>,
        out: &mut Vec<(Vec<&'a str>, &'a Failure)>,
    ) {
        out.extend(self.own.iter().map(|failure| (path.clone(), failure)));
        for (key, child) in &self.children {
            path.push(key);
            child.collect_leaves(path, out);
            path.pop();
        }
    }

    /// Comma-separated rendering of the own failures only.
    ///
    /// Returns `"<no message>"` if there are none.
    pub fn own_summary(&self) -> String {
        if self.own.is_empty() {
            return NO_MESSAGE.to_string();
        }
        join_failures(&self.own)
    }

    /// Rendering of the whole tree.
    ///
    /// Own failures come first, then `key: [child]` for every child sorted by
    /// key, the two parts separated by `"; "`. Returns `"<no message>"` for a
    /// node with neither own failures nor children.
    pub fn full_summary(&self) -> String {
        if self.own.is_empty() && self.children.is_empty() {
            return NO_MESSAGE.to_string();
        }

        let own = join_failures(&self.own);

        let mut sorted: Vec<_> = self.children.iter().collect();
        sorted.sort_by(|(a, _), (b, _)| a.cmp(b));
        let children = sorted
            .into_iter()
            .map(|(key, child)| format!("{key}: [{}]", child.full_summary()))
            .collect::<Vec<_>>()
            .join(", ");

        [own, children]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn join_failures(failures: &[Failure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_summary())
    }
}

impl Index<usize> for ErrorTree {
    type Output = Failure;

    fn index(&self, index: usize) -> &Failure {
        &self.own[index]
    }
}

impl Index<&str> for ErrorTree {
    type Output = ErrorTree;

    fn index(&self, key: &str) -> &ErrorTree {
        match self.children.get(key) {
            Some(child) => child,
            None => panic!("no sub-step named `{key}`"),
        }
    }
}
