//! Field value types
//!
//! Which Rust types can sit behind a binding, and how each one is filled:
//! - [`Scalar`]: typed read of a document value (String, i32, i64, f32, f64,
//!   bool and lists of those)
//! - [`FieldValue`]: a field type the binder may write, exposed as a [`Slot`]
//! - [`Argument`]: the single argument a wrapped type is built from

use std::collections::HashMap;

use serde_yaml::Value;

use crate::document::{Document, Section};
use crate::schema::FieldKind;

/// A value readable from the document with a type check
///
/// A type mismatch reads as absent.
pub trait Scalar: Sized + Clone + Default + Send + 'static {
    fn from_value(value: &Value) -> Option<Self>;
    fn to_value(&self) -> Value;
}

/// Scalars allowed inside a list
pub trait ListElement: Scalar {}

impl Scalar for String {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl Scalar for i64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            }),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn to_value(&self) -> Value {
        Value::from(*self)
    }
}

impl Scalar for i32 {
    fn from_value(value: &Value) -> Option<Self> {
        i64::from_value(value).and_then(|n| i32::try_from(n).ok())
    }

    fn to_value(&self) -> Value {
        Value::from(*self)
    }
}

impl Scalar for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn to_value(&self) -> Value {
        Value::from(*self)
    }
}

impl Scalar for f32 {
    fn from_value(value: &Value) -> Option<Self> {
        f64::from_value(value).map(|f| f as f32)
    }

    fn to_value(&self) -> Value {
        Value::from(*self)
    }
}

impl Scalar for bool {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ListElement for String {}
impl ListElement for i64 {}
impl ListElement for i32 {}
impl ListElement for f64 {}
impl ListElement for f32 {}
impl ListElement for bool {}

/// Lists skip elements of the wrong type rather than failing as a whole
impl<E: ListElement> Scalar for Vec<E> {
    fn from_value(value: &Value) -> Option<Self> {
        let items = value.as_sequence()?;
        Some(items.iter().filter_map(E::from_value).collect())
    }

    fn to_value(&self) -> Value {
        Value::Sequence(self.iter().map(Scalar::to_value).collect())
    }
}

/// Write access to one bound field, by kind
pub enum Slot<'a> {
    Scalar(&'a mut dyn ScalarSlot),
    Section(&'a mut dyn SectionSlot),
    Map(&'a mut HashMap<String, Value>),
}

/// A scalar or list field
pub trait ScalarSlot {
    /// Store the converted value, or the type's fallback when `value` is
    /// absent or of the wrong type. Returns whether a value was stored.
    fn assign(&mut self, value: Option<&Value>) -> bool;
}

/// A raw section field
pub trait SectionSlot {
    fn assign(&mut self, section: Section);
}

/// A field type the binder knows how to fill
pub trait FieldValue: Send + 'static {
    const KIND: FieldKind;

    fn slot(&mut self) -> Slot<'_>;
}

/// Fallbacks: plain types take their `Default` (zero, empty string, empty
/// list), `Option` types take `None`.
macro_rules! scalar_fields {
    ($kind:expr => $($ty:ty),+ $(,)?) => {$(
        impl ScalarSlot for $ty {
            fn assign(&mut self, value: Option<&Value>) -> bool {
                match value.and_then(<$ty as Scalar>::from_value) {
                    Some(v) => {
                        *self = v;
                        true
                    }
                    None => {
                        *self = <$ty>::default();
                        false
                    }
                }
            }
        }

        impl ScalarSlot for Option<$ty> {
            fn assign(&mut self, value: Option<&Value>) -> bool {
                *self = value.and_then(<$ty as Scalar>::from_value);
                self.is_some()
            }
        }

        impl FieldValue for $ty {
            const KIND: FieldKind = $kind;

            fn slot(&mut self) -> Slot<'_> {
                Slot::Scalar(self)
            }
        }

        impl FieldValue for Option<$ty> {
            const KIND: FieldKind = $kind;

            fn slot(&mut self) -> Slot<'_> {
                Slot::Scalar(self)
            }
        }
    )+};
}

scalar_fields!(FieldKind::Scalar => String, i64, i32, f64, f32, bool);
scalar_fields!(FieldKind::List => Vec<String>, Vec<i64>, Vec<i32>, Vec<f64>, Vec<f32>, Vec<bool>);

impl SectionSlot for Section {
    fn assign(&mut self, section: Section) {
        *self = section;
    }
}

impl SectionSlot for Option<Section> {
    fn assign(&mut self, section: Section) {
        *self = Some(section);
    }
}

impl FieldValue for Section {
    const KIND: FieldKind = FieldKind::Section;

    fn slot(&mut self) -> Slot<'_> {
        Slot::Section(self)
    }
}

impl FieldValue for Option<Section> {
    const KIND: FieldKind = FieldKind::Section;

    fn slot(&mut self) -> Slot<'_> {
        Slot::Section(self)
    }
}

impl FieldValue for HashMap<String, Value> {
    const KIND: FieldKind = FieldKind::Map;

    fn slot(&mut self) -> Slot<'_> {
        Slot::Map(self)
    }
}

/// The argument a wrapped field is constructed from
pub trait Argument: Sized + 'static {
    fn fetch(document: &dyn Document, route: &str) -> Option<Self>;
}

macro_rules! scalar_arguments {
    ($($ty:ty),+ $(,)?) => {$(
        impl Argument for $ty {
            fn fetch(document: &dyn Document, route: &str) -> Option<Self> {
                document.get(route).as_ref().and_then(<$ty as Scalar>::from_value)
            }
        }
    )+};
}

scalar_arguments!(String, i64, i32, f64, f32, bool);
scalar_arguments!(Vec<String>, Vec<i64>, Vec<i32>, Vec<f64>, Vec<f32>, Vec<bool>);

impl Argument for Section {
    fn fetch(document: &dyn Document, route: &str) -> Option<Self> {
        document.section(route)
    }
}
