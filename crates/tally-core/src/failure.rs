//! Leaf failures.
//!
//! A [`Failure`] is a shared handle to any error value produced by caller
//! logic. Tally never looks inside it beyond its [`Display`](fmt::Display)
//! rendering and, for catch filtering, its concrete type.

use std::{error::Error, fmt, sync::Arc};

use thiserror::Error;

use crate::{error::AggregateError, tree::ErrorTree};

/// Plain text failure created through [`Failure::msg`].
#[derive(Debug, Error)]
#[error("{0}")]
struct Message(String);

/// An opaque, cheaply clonable leaf failure.
///
/// Any `Error + Send + Sync + 'static` value converts into a `Failure`, so
/// closures returning their own error types can be handed to an aggregator
/// directly.
#[derive(Clone)]
pub struct Failure(Arc<dyn Error + Send + Sync + 'static>);

impl Failure {
    /// Wrap an error value.
    pub fn new<E>(err: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self(Arc::new(err))
    }

    /// Create a failure that only carries a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(Message(message.into()))
    }

    /// Take ownership of an already boxed error.
    pub fn from_boxed(err: Box<dyn Error + Send + Sync + 'static>) -> Self {
        Self(Arc::from(err))
    }

    /// Returns `true` if the wrapped error is of type `E`.
    pub fn is<E>(&self) -> bool
    where
        E: Error + 'static,
    {
        self.0.is::<E>()
    }

    /// Borrow the wrapped error as `E`, if it is one.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: Error + 'static,
    {
        self.0.downcast_ref::<E>()
    }

    /// The aggregate this failure carries, if any.
    ///
    /// The failure may be an [`AggregateError`] itself or an error whose
    /// [`source`](Error::source) chain leads to one. Wrappers only count if they
    /// render exactly like the aggregate, so an error that adds its own
    /// context around an aggregate stays a leaf.
    pub fn aggregate(&self) -> Option<&AggregateError> {
        let mut current: Option<&(dyn Error + 'static)> = Some(self.as_error());
        while let Some(err) = current {
            if let Some(aggregate) = err.downcast_ref::<AggregateError>() {
                if std::ptr::addr_eq(err, self.as_error())
                    || aggregate.to_string() == self.to_string()
                {
                    return Some(aggregate);
                }
                return None;
            }
            current = err.source();
        }
        None
    }

    /// Take the tree out of the aggregate this failure carries.
    ///
    /// The tree is moved out when this is the only handle to a bare
    /// [`AggregateError`], and cloned otherwise.
    pub(crate) fn take_aggregate_tree(&mut self) -> Option<ErrorTree> {
        if let Some(aggregate) =
            Arc::get_mut(&mut self.0).and_then(|err| err.downcast_mut::<AggregateError>())
        {
            return Some(aggregate.take_tree());
        }
        self.aggregate().map(|aggregate| aggregate.tree().clone())
    }

    /// Borrow the wrapped error as a trait object.
    pub fn as_error(&self) -> &(dyn Error + Send + Sync + 'static) {
        &*self.0
    }
}

impl<E> From<E> for Failure
where
    E: Error + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        Self::new(err)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}
