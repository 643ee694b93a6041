//! SchemaBuilder - fluent declaration of a binding manifest

use std::any::type_name;
use std::fmt::Display;
use std::marker::PhantomData;

use super::access::{Access, FieldAccessor, WrappedAccessor};
use super::{Bound, Container, FieldBinding, FieldKind, Schema, Tag};
use crate::value::{Argument, FieldValue};

/// Builds the [`Schema`] of `T`, fields in declaration order
pub struct SchemaBuilder<T> {
    container: Option<Container>,
    fields: Vec<FieldBinding>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Bound> SchemaBuilder<T> {
    pub(super) fn new() -> Self {
        Self {
            container: None,
            fields: Vec::new(),
            _marker: PhantomData,
        }
    }

    fn container_mut(&mut self) -> &mut Container {
        self.container.get_or_insert_with(Container::default)
    }

    /// Read every field under `section`
    pub fn section(mut self, section: impl Into<String>) -> Self {
        self.container_mut().section = section.into();
        self
    }

    /// The section must exist and hold values, and every field is required
    pub fn required_all(mut self) -> Self {
        self.container_mut().required_all = true;
        self
    }

    /// Bind untagged fields as well, by name
    pub fn all_fields(mut self) -> Self {
        self.container_mut().all_fields = true;
        self
    }

    /// Scalar, list, raw section or map field; the kind follows `V`
    pub fn field<V, F>(mut self, name: impl Into<String>, get: F, tag: Tag) -> Self
    where
        V: FieldValue,
        F: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        let access = Access::Value(Box::new(FieldAccessor::<T, V, F>::new(get)));
        self.fields
            .push(FieldBinding::new(name.into(), tag, V::KIND, access));
        self
    }

    /// Nested bound object, filled after the current object
    pub fn nested<C, F>(mut self, name: impl Into<String>, get: F, tag: Tag) -> Self
    where
        C: Bound,
        F: Fn(&mut T) -> &mut C + Send + Sync + 'static,
    {
        let access = Access::Nested(Box::new(FieldAccessor::<T, C, F>::new(get)));
        self.fields
            .push(FieldBinding::new(name.into(), tag, FieldKind::Nested, access));
        self
    }

    /// Field built from one argument of type `A` through `TryFrom`
    ///
    /// `A` is a scalar, a list of scalars or a [`crate::Section`].
    pub fn wrapped<A, P>(
        mut self,
        name: impl Into<String>,
        get: impl Fn(&mut T) -> &mut Option<P> + Send + Sync + 'static,
        tag: Tag,
    ) -> Self
    where
        A: Argument,
        P: TryFrom<A> + Send + 'static,
        <P as TryFrom<A>>::Error: Display,
    {
        let access = Access::Wrapped(Box::new(WrappedAccessor::<T, A, P, _>::new(get)));
        self.fields
            .push(FieldBinding::new(name.into(), tag, FieldKind::Wrapped, access));
        self
    }

    pub fn build(self) -> Schema {
        Schema {
            type_name: type_name::<T>(),
            container: self.container,
            fields: self.fields,
        }
    }
}
