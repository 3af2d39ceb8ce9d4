//! Dynamic values.
//!
//! [`Value`] is the tree that the serde bridge builds from any
//! `T: Serialize`, and that the [`value!`](crate::value) macro builds by hand.
//! Serde data has no shared references, so a `Value` tree is always acyclic.
//!
//! Unlike a JSON tree, a `Value` keeps what the flattener needs for its paths:
//!
//! - structs stay [`Object`]s named after the Rust type;
//! - maps keep keys of any shape, so a struct-keyed map produces
//!   ``Point`0``-style key tokens;
//! - integers wider than `i64` become [`BigInt`]s.
//!
//! ## Examples
//!
//! ```rust
//! use serde::Serialize;
//! use serde_flatpath::{flatten, to_value, Value};
//!
//! #[derive(Serialize)]
//! struct Point { x: i32, y: i32 }
//!
//! let value = to_value(&Point { x: 1, y: 2 }).unwrap();
//! let object = value.as_object().unwrap();
//! assert_eq!(object.type_name(), "Point");
//! assert_eq!(object.get("y").and_then(Value::as_i64), Some(2));
//!
//! let map = flatten(&value).unwrap();
//! assert_eq!(map.get("x"), Some("1"));
//! ```

use crate::inspect::{Inspect, MapView, Node, ObjectView, SequenceView};
use crate::scalar::Scalar;
use indexmap::IndexMap;
use num_bigint::BigInt;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;

/// Any value the serde bridge can produce.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    /// An integer outside the `i64` range.
    BigInt(BigInt),
    String(String),
    Array(Vec<Value>),
    /// Entries in insertion order; keys may be any value.
    Map(Vec<(Value, Value)>),
    Object(Object),
}

/// A number that fits in an `i64` or an `f64`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Converts this number to an `i64` if it has no fractional part.
    ///
    /// ```rust
    /// use serde_flatpath::Number;
    ///
    /// assert_eq!(Number::Integer(42).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.0).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.5).as_i64(), None);
    /// ```
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                    Some(*f as i64)
                } else {
                    None
                }
            }
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }

    fn scalar(&self) -> Scalar<'static> {
        match self {
            Number::Integer(i) => Scalar::I64(*i),
            Number::Float(f) => Scalar::F64(*f),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.scalar(), f)
    }
}

/// A struct-like value with a type name and ordered fields.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Object {
    type_name: &'static str,
    fields: IndexMap<String, Value>,
}

impl Object {
    #[must_use]
    pub fn new(type_name: &'static str) -> Self {
        Object {
            type_name,
            fields: IndexMap::new(),
        }
    }

    /// Name reported for this object in paths and node contexts.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(name.into(), value)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns an iterator over the fields, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.fields.iter()
    }
}

impl Value {
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_) | Value::BigInt(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Looks up a field of an object, or the entry of a map whose key is the
    /// string `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Object(object) => object.get(name),
            Value::Map(entries) => entries
                .iter()
                .find(|(key, _)| key.as_str() == Some(name))
                .map(|(_, value)| value),
            _ => None,
        }
    }
}

impl Inspect for Value {
    fn inspect(&self) -> Node<'_> {
        match self {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Scalar(Scalar::Bool(*b)),
            Value::Number(n) => Node::Scalar(n.scalar()),
            Value::BigInt(b) => b.inspect(),
            Value::String(s) => Node::str(s),
            Value::Array(items) => Node::Sequence(SequenceView::new(
                items,
                items.iter().map(|item| item as &dyn Inspect),
            )),
            Value::Map(entries) => Node::Map(MapView::new(
                entries,
                entries
                    .iter()
                    .map(|(key, value)| (key as &dyn Inspect, value as &dyn Inspect)),
            )),
            Value::Object(object) => {
                let view = ObjectView::named(object, object.type_name);
                Node::Object(
                    object
                        .fields
                        .iter()
                        .fold(view, |view, (name, value)| view.field(name.as_str(), value)),
                )
            }
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "()",
            Value::Bool(_) => "bool",
            Value::Number(Number::Integer(_)) => "i64",
            Value::Number(Number::Float(_)) => "f64",
            Value::BigInt(_) => "BigInt",
            Value::String(_) => "String",
            Value::Array(_) => "Array",
            Value::Map(_) => "Map",
            Value::Object(object) => object.type_name,
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Value::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Value::BigInt(b) => serializer.collect_str(b),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::Object(object) => {
                let mut map = serializer.serialize_map(Some(object.len()))?;
                for (name, value) in object.iter() {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
        }
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Number(Number::Integer(i64::from(v)))
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(i) => Value::Number(Number::Integer(i)),
            Err(_) => Value::BigInt(BigInt::from(v)),
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        // keep the f32's own shortest form rather than its widened digits
        let widened = v.to_string().parse::<f64>().unwrap_or(f64::from(v));
        Value::Number(Number::Float(widened))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(Number::Float(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<BigInt> for Value {
    fn from(v: BigInt) -> Self {
        Value::BigInt(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Value::Object(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
