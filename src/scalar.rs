//! Scalar leaves and their textual form.
//!
//! Every leaf written to a [`FlatMap`](crate::FlatMap) goes through
//! [`Scalar`]'s `Display` impl or through a converter registered in
//! [`Converters`]. The built-in forms are culture-invariant and parse back to
//! the same value:
//!
//! | Kind | Form |
//! |------|------|
//! | integers | decimal (`-42`, `18446744073709551615`) |
//! | floats | shortest round-trip form, `NaN`, `Infinity`, `-Infinity` |
//! | booleans | `true` / `false` |
//! | chars, strings | as is |
//!
//! ## Examples
//!
//! ```rust
//! use serde_flatpath::Scalar;
//!
//! assert_eq!(Scalar::F64(0.1).to_string(), "0.1");
//! assert_eq!(Scalar::F64(f64::NEG_INFINITY).to_string(), "-Infinity");
//! assert_eq!(Scalar::Bool(true).to_string(), "true");
//! ```

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A leaf value with a reversible string form.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar<'a> {
    Bool(bool),
    I64(i64),
    U64(u64),
    I128(i128),
    U128(u128),
    F32(f32),
    F64(f64),
    Char(char),
    Str(Cow<'a, str>),
}

impl Scalar<'_> {
    /// Wraps pre-rendered text, used for `Display`-based scalars.
    #[must_use]
    pub fn text(text: String) -> Scalar<'static> {
        Scalar::Str(Cow::Owned(text))
    }

    /// Returns `true` if this scalar is a number.
    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(
            self,
            Scalar::I64(_)
                | Scalar::U64(_)
                | Scalar::I128(_)
                | Scalar::U128(_)
                | Scalar::F32(_)
                | Scalar::F64(_)
        )
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, value: f64, text: impl fmt::Display) -> fmt::Result {
    if value.is_nan() {
        f.write_str("NaN")
    } else if value.is_infinite() {
        f.write_str(if value > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        write!(f, "{}", text)
    }
}

impl fmt::Display for Scalar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::I64(i) => write!(f, "{}", i),
            Scalar::U64(u) => write!(f, "{}", u),
            Scalar::I128(i) => write!(f, "{}", i),
            Scalar::U128(u) => write!(f, "{}", u),
            // f32 keeps its own shortest form; widening first would print 0.10000000149011612
            Scalar::F32(v) => write_float(f, f64::from(*v), v),
            Scalar::F64(v) => write_float(f, *v, v),
            Scalar::Char(c) => write!(f, "{}", c),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

type ConvertFn = dyn Fn(&dyn Any) -> Option<String> + Send + Sync;

/// Registry of custom string conversions, keyed by the concrete type.
///
/// An object whose type has a converter is classified as a scalar and
/// written with the converter's output instead of being walked member by
/// member.
///
/// # Examples
///
/// ```rust
/// use serde_flatpath::{flatten_with_options, impl_inspect, FlattenOptions};
///
/// struct Money { cents: i64 }
/// impl_inspect!(Money { cents });
///
/// struct Invoice { total: Money }
/// impl_inspect!(Invoice { total });
///
/// let options = FlattenOptions::new()
///     .with_converter(|m: &Money| format!("{}.{:02}", m.cents / 100, m.cents % 100));
/// let map = flatten_with_options(&Invoice { total: Money { cents: 1999 } }, options).unwrap();
/// assert_eq!(map.get("total"), Some("19.99"));
/// ```
#[derive(Clone, Default)]
pub struct Converters {
    by_type: HashMap<TypeId, Arc<ConvertFn>>,
}

impl Converters {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `convert` for values of type `T`, replacing any earlier rule.
    pub fn register<T, F>(&mut self, convert: F)
    where
        T: Any,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        let erased = move |value: &dyn Any| value.downcast_ref::<T>().map(&convert);
        self.by_type.insert(TypeId::of::<T>(), Arc::new(erased));
    }

    /// Returns `true` if a converter is registered for `type_id`.
    #[must_use]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.by_type.contains_key(&type_id)
    }

    /// Converts `value` with the rule registered for its concrete type.
    #[must_use]
    pub fn convert(&self, value: &dyn Any) -> Option<String> {
        self.by_type
            .get(&value.type_id())
            .and_then(|convert| convert(value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

impl fmt::Debug for Converters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converters")
            .field("registered", &self.by_type.len())
            .finish()
    }
}
