//! Type-erased field accessors
//!
//! The builder is generic over the bound type; the binder only sees
//! `&mut dyn Any`. Each accessor downcasts back to its owner type and
//! hands out the field it was declared with.

use std::any::Any;
use std::fmt::Display;
use std::marker::PhantomData;

use tracing::debug;

use super::Bound;
use crate::document::Document;
use crate::value::{Argument, FieldValue, Slot};

pub(crate) enum Access {
    Value(Box<dyn ValueAccess>),
    Nested(Box<dyn NestedAccess>),
    Wrapped(Box<dyn WrappedAccess>),
}

pub(crate) trait ValueAccess: Send + Sync {
    fn slot<'a>(&self, owner: &'a mut dyn Any) -> Option<Slot<'a>>;
}

pub(crate) trait NestedAccess: Send + Sync {
    fn child<'a>(&self, owner: &'a mut dyn Any) -> Option<&'a mut dyn Bound>;
}

/// Result of building a wrapped field
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Construct {
    Set,
    /// No usable argument in the document
    Missing,
    /// The argument was there but the conversion refused it
    Rejected,
    /// Owner was not the declared type
    Unreachable,
}

pub(crate) trait WrappedAccess: Send + Sync {
    fn construct(&self, owner: &mut dyn Any, document: &dyn Document, route: &str) -> Construct;
}

pub(crate) struct FieldAccessor<T, V, F> {
    get: F,
    _marker: PhantomData<fn(&mut T) -> &mut V>,
}

impl<T, V, F> FieldAccessor<T, V, F> {
    pub(crate) fn new(get: F) -> Self {
        Self {
            get,
            _marker: PhantomData,
        }
    }
}

impl<T, V, F> ValueAccess for FieldAccessor<T, V, F>
where
    T: Bound,
    V: FieldValue,
    F: Fn(&mut T) -> &mut V + Send + Sync,
{
    fn slot<'a>(&self, owner: &'a mut dyn Any) -> Option<Slot<'a>> {
        let owner = owner.downcast_mut::<T>()?;
        Some((self.get)(owner).slot())
    }
}

impl<T, C, F> NestedAccess for FieldAccessor<T, C, F>
where
    T: Bound,
    C: Bound,
    F: Fn(&mut T) -> &mut C + Send + Sync,
{
    fn child<'a>(&self, owner: &'a mut dyn Any) -> Option<&'a mut dyn Bound> {
        let owner = owner.downcast_mut::<T>()?;
        let child: &mut dyn Bound = (self.get)(owner);
        Some(child)
    }
}

pub(crate) struct WrappedAccessor<T, A, P, F> {
    get: F,
    _marker: PhantomData<fn(&mut T, A) -> Option<P>>,
}

impl<T, A, P, F> WrappedAccessor<T, A, P, F> {
    pub(crate) fn new(get: F) -> Self {
        Self {
            get,
            _marker: PhantomData,
        }
    }
}

impl<T, A, P, F> WrappedAccess for WrappedAccessor<T, A, P, F>
where
    T: Bound,
    A: Argument,
    P: TryFrom<A> + Send + 'static,
    <P as TryFrom<A>>::Error: Display,
    F: Fn(&mut T) -> &mut Option<P> + Send + Sync,
{
    fn construct(&self, owner: &mut dyn Any, document: &dyn Document, route: &str) -> Construct {
        let Some(owner) = owner.downcast_mut::<T>() else {
            return Construct::Unreachable;
        };
        let Some(argument) = A::fetch(document, route) else {
            return Construct::Missing;
        };
        match P::try_from(argument) {
            Ok(value) => {
                *(self.get)(owner) = Some(value);
                Construct::Set
            }
            Err(e) => {
                debug!(route, error = %e, "Wrapped value rejected its argument");
                Construct::Rejected
            }
        }
    }
}
